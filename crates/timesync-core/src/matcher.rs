//! Pairing target files with reference files
//!
//! A target matches a reference when the reference's stem (file name with
//! its final extension removed) is a substring of the target's stem, so
//! `IMG_0042_edit.jpg` pairs with `IMG_0042.CR2`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use timesync_fs::{DirEntryInfo, match_stem};

/// The order in which candidate references are tried against a target.
///
/// The first candidate contained in the target's stem wins, so the order
/// decides between overlapping names such as `img` and `img_v2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// Longest stem first, ties broken lexicographically
    #[default]
    #[serde(rename = "longest")]
    LongestFirst,
    /// Lexicographic order of stems
    #[serde(rename = "lexical")]
    Lexical,
}

impl MatchPolicy {
    fn order(&self, candidates: &mut [(&str, &PathBuf)]) {
        match self {
            Self::LongestFirst => candidates.sort_by(|a, b| {
                b.0.chars()
                    .count()
                    .cmp(&a.0.chars().count())
                    .then_with(|| a.0.cmp(b.0))
            }),
            Self::Lexical => candidates.sort_by(|a, b| a.0.cmp(b.0)),
        }
    }
}

/// A target paired with the reference whose timestamps it will receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub target: PathBuf,
    pub reference: PathBuf,
}

impl MatchEntry {
    pub fn new(target: impl Into<PathBuf>, reference: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            reference: reference.into(),
        }
    }
}

/// Result of matching two directory listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Matched pairs, in target listing order
    pub entries: Vec<MatchEntry>,
    /// Names of targets no reference matched
    pub unmatched: Vec<String>,
    /// References hidden by a later reference with the same stem
    pub shadowed: Vec<PathBuf>,
}

/// Pair each target file with at most one reference file.
///
/// Directories in either listing are skipped. When two references share a
/// stem, the later one in `references` wins and the earlier one is recorded
/// in [`MatchResult::shadowed`]. References with an empty stem (`.hidden`)
/// are ignored since they would match every target.
pub fn match_files(
    targets: &[DirEntryInfo],
    references: &[DirEntryInfo],
    policy: MatchPolicy,
) -> MatchResult {
    let mut by_stem: BTreeMap<&str, &PathBuf> = BTreeMap::new();
    let mut shadowed = Vec::new();

    for reference in references.iter().filter(|e| !e.is_dir) {
        let stem = match_stem(&reference.name);
        if stem.is_empty() {
            tracing::debug!(name = %reference.name, "Skipping reference with empty stem");
            continue;
        }
        if let Some(previous) = by_stem.insert(stem, &reference.path) {
            tracing::warn!(
                stem,
                kept = %reference.path.display(),
                shadowed = %previous.display(),
                "Two references share a stem, keeping the later one"
            );
            shadowed.push(previous.clone());
        }
    }

    let mut candidates: Vec<(&str, &PathBuf)> = by_stem.into_iter().collect();
    policy.order(&mut candidates);

    let mut result = MatchResult {
        shadowed,
        ..MatchResult::default()
    };

    for target in targets.iter().filter(|e| !e.is_dir) {
        let stem = match_stem(&target.name);
        match candidates.iter().find(|(candidate, _)| stem.contains(candidate)) {
            Some((candidate, reference)) => {
                tracing::debug!(file = %target.name, reference = candidate, "Matched");
                result
                    .entries
                    .push(MatchEntry::new(target.path.clone(), (*reference).clone()));
            }
            None => {
                tracing::debug!(file = %target.name, "No matching reference");
                result.unmatched.push(target.name.clone());
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(dir: &str, name: &str) -> DirEntryInfo {
        DirEntryInfo {
            path: PathBuf::from(dir).join(name),
            name: name.to_string(),
            is_dir: false,
        }
    }

    fn subdir(dir: &str, name: &str) -> DirEntryInfo {
        DirEntryInfo {
            is_dir: true,
            ..file(dir, name)
        }
    }

    #[test]
    fn test_disjoint_names_pair_one_to_one() {
        let targets = [file("t", "photo_001.jpg"), file("t", "photo_002.jpg")];
        let references = [file("r", "photo_001.raw"), file("r", "photo_002.raw")];

        let result = match_files(&targets, &references, MatchPolicy::default());

        assert_eq!(
            result.entries,
            vec![
                MatchEntry::new("t/photo_001.jpg", "r/photo_001.raw"),
                MatchEntry::new("t/photo_002.jpg", "r/photo_002.raw"),
            ]
        );
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_unrelated_target_is_unmatched() {
        let targets = [file("t", "unrelated.txt")];
        let references = [file("r", "photo_001.raw"), file("r", "photo_002.raw")];

        let result = match_files(&targets, &references, MatchPolicy::default());

        assert!(result.entries.is_empty());
        assert_eq!(result.unmatched, vec!["unrelated.txt".to_string()]);
    }

    #[test]
    fn test_reference_stem_substring_of_target() {
        let targets = [file("t", "IMG_0042_edit.jpg")];
        let references = [file("r", "IMG_0042.CR2")];

        let result = match_files(&targets, &references, MatchPolicy::default());

        assert_eq!(result.entries, vec![MatchEntry::new("t/IMG_0042_edit.jpg", "r/IMG_0042.CR2")]);
    }

    #[test]
    fn test_longest_first_prefers_more_specific_reference() {
        let targets = [file("t", "img_v2_final.jpg")];
        let references = [file("r", "img.raw"), file("r", "img_v2.raw")];

        let result = match_files(&targets, &references, MatchPolicy::LongestFirst);
        assert_eq!(result.entries[0].reference, PathBuf::from("r/img_v2.raw"));
    }

    #[test]
    fn test_lexical_prefers_lexicographically_first() {
        let targets = [file("t", "img_v2_final.jpg")];
        let references = [file("r", "img_v2.raw"), file("r", "img.raw")];

        let result = match_files(&targets, &references, MatchPolicy::Lexical);
        assert_eq!(result.entries[0].reference, PathBuf::from("r/img.raw"));
    }

    #[test]
    fn test_equal_length_ties_break_lexicographically() {
        let targets = [file("t", "ab_cd.jpg")];
        let references = [file("r", "cd.raw"), file("r", "ab.raw")];

        let result = match_files(&targets, &references, MatchPolicy::LongestFirst);
        assert_eq!(result.entries[0].reference, PathBuf::from("r/ab.raw"));
    }

    #[test]
    fn test_duplicate_stem_later_reference_wins() {
        let targets = [file("t", "a.jpg")];
        let references = [file("r", "a.cr2"), file("r", "a.raw")];

        let result = match_files(&targets, &references, MatchPolicy::default());

        assert_eq!(result.entries[0].reference, PathBuf::from("r/a.raw"));
        assert_eq!(result.shadowed, vec![PathBuf::from("r/a.cr2")]);
    }

    #[test]
    fn test_directories_are_skipped() {
        let targets = [subdir("t", "photo_001"), file("t", "photo_001.jpg")];
        let references = [subdir("r", "photo"), file("r", "photo_001.raw")];

        let result = match_files(&targets, &references, MatchPolicy::default());

        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].target, PathBuf::from("t/photo_001.jpg"));
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_empty_stem_reference_is_ignored() {
        let targets = [file("t", "notes.txt")];
        let references = [file("r", ".hidden")];

        let result = match_files(&targets, &references, MatchPolicy::default());

        assert!(result.entries.is_empty());
        assert_eq!(result.unmatched, vec!["notes.txt".to_string()]);
    }

    #[test]
    fn test_match_policy_serde_names() {
        let policy: MatchPolicy = serde_json::from_str("\"lexical\"").unwrap();
        assert_eq!(policy, MatchPolicy::Lexical);
        assert_eq!(serde_json::to_string(&MatchPolicy::LongestFirst).unwrap(), "\"longest\"");
    }
}
