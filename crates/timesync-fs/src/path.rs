//! Path helpers shared by the matcher and the CLI

/// Normalise a path typed or pasted by the user.
///
/// Strips surrounding whitespace and double quotes, so that a path copied
/// from a file manager as `"C:\Photos\raw"` is usable as-is.
pub fn normalize_input(input: &str) -> String {
    input.trim().trim_matches('"').trim().to_string()
}

/// The final segment of a path, accepting both `/` and `\` as separators.
pub fn final_segment(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// The key used to pair targets with references.
///
/// Takes the final path segment and removes everything from its last `.`
/// onward. A name that starts with its only dot (`.bashrc`) has an empty
/// stem; a name without a dot is returned unchanged.
pub fn match_stem(name: &str) -> &str {
    let segment = final_segment(name);
    match segment.rfind('.') {
        Some(idx) => &segment[..idx],
        None => segment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo_001.jpg", "photo_001")]
    #[case("archive.tar.gz", "archive.tar")]
    #[case("README", "README")]
    #[case(".bashrc", "")]
    #[case("dir/sub/img.raw", "img")]
    #[case("dir\\sub\\img.raw", "img")]
    #[case("trailing.", "trailing")]
    fn test_match_stem(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(match_stem(input), expected);
    }

    #[rstest]
    #[case("  /photos/raw  ", "/photos/raw")]
    #[case("\"C:\\Photos\\raw\"", "C:\\Photos\\raw")]
    #[case(" \"/with space/dir\" \n", "/with space/dir")]
    #[case("", "")]
    #[case("\"\"", "")]
    fn test_normalize_input(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_input(input), expected);
    }
}
