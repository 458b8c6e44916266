//! Interactive prompts for missing arguments and confirmation
//!
//! When stdin is a terminal, dialoguer draws the prompts on whichever of
//! stderr or stdout is a terminal. Otherwise answers are read line by line
//! from stdin, so `printf 'y\n' | timesync ...` works. When piped input
//! runs out, a missing path is an error, a missing shift is zero and the
//! confirmation is declined.

use std::io::{BufRead, IsTerminal, Write};

use dialoguer::console::Term;
use dialoguer::{Confirm, Input};
use timesync_core::ShiftHours;
use timesync_fs::normalize_input;

use crate::error::{CliError, Result};

/// Source of values the user did not pass on the command line
pub trait Prompter {
    /// Ask for a path; the returned value is already normalized.
    fn path(&mut self, label: &str) -> Result<String>;

    /// Ask for an hour shift; blank input means no shift.
    fn shift(&mut self) -> Result<ShiftHours>;

    /// Ask a yes/no question that defaults to no.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Pick the prompter for the current stdin/stdout/stderr setup.
pub fn prompter() -> Box<dyn Prompter> {
    if std::io::stdin().is_terminal() {
        if std::io::stderr().is_terminal() {
            return Box::new(TerminalPrompter::new(Term::stderr()));
        }
        if std::io::stdout().is_terminal() {
            return Box::new(TerminalPrompter::new(Term::stdout()));
        }
    }
    Box::new(LinePrompter::new(std::io::stdin().lock(), std::io::stderr()))
}

fn shift_prompt() -> String {
    format!(
        "Hour shift ({} to {}, blank for none)",
        ShiftHours::MIN,
        ShiftHours::MAX
    )
}

/// Normalize a path typed by the user, rejecting blank input.
pub fn validate_path_input(input: &str) -> std::result::Result<String, String> {
    let normalized = normalize_input(input);
    if normalized.is_empty() {
        Err("Path cannot be empty".to_string())
    } else {
        Ok(normalized)
    }
}

/// Parse an hour shift typed by the user; blank input is zero.
pub fn parse_shift_input(input: &str) -> std::result::Result<ShiftHours, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(ShiftHours::default());
    }
    trimmed.parse::<ShiftHours>().map_err(|e| e.to_string())
}

/// Prompts on a terminal via dialoguer
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new(term: Term) -> Self {
        Self { term }
    }
}

impl Prompter for TerminalPrompter {
    fn path(&mut self, label: &str) -> Result<String> {
        let raw: String = Input::new()
            .with_prompt(label)
            .validate_with(|input: &String| validate_path_input(input).map(|_| ()))
            .interact_text_on(&self.term)?;
        validate_path_input(&raw).map_err(CliError::user)
    }

    fn shift(&mut self) -> Result<ShiftHours> {
        let raw: String = Input::new()
            .with_prompt(shift_prompt())
            .allow_empty(true)
            .validate_with(|input: &String| parse_shift_input(input).map(|_| ()))
            .interact_text_on(&self.term)?;
        parse_shift_input(&raw).map_err(CliError::user)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact_on(&self.term)?)
    }
}

/// Line-based prompts over any reader, used when stdin is piped
///
/// Prompts and validation messages go to `output`. Invalid answers are
/// asked again until the input ends.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and read one line; `None` once the input is exhausted.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn reject(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn path(&mut self, label: &str) -> Result<String> {
        loop {
            let Some(line) = self.ask(label)? else {
                return Err(CliError::user(format!(
                    "{} was not given and the input ended before it was entered",
                    label
                )));
            };
            match validate_path_input(&line) {
                Ok(path) => return Ok(path),
                Err(message) => self.reject(&message)?,
            }
        }
    }

    fn shift(&mut self) -> Result<ShiftHours> {
        loop {
            let Some(line) = self.ask(&shift_prompt())? else {
                tracing::debug!("Input ended before a shift was entered, using 0");
                return Ok(ShiftHours::default());
            };
            match parse_shift_input(&line) {
                Ok(shift) => return Ok(shift),
                Err(message) => self.reject(&message)?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        let Some(line) = self.ask(&format!("{} [y/N]", question))? else {
            tracing::info!(question, "Input ended before an answer, declining");
            return Ok(false);
        };
        let answer = line.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_path_input_strips_quotes_and_whitespace() {
        assert_eq!(
            validate_path_input("  \"C:\\Photos\\raw\"  ").unwrap(),
            "C:\\Photos\\raw"
        );
    }

    #[test]
    fn validate_path_input_rejects_blank() {
        assert!(validate_path_input("   ").is_err());
        assert!(validate_path_input("\"\"").is_err());
    }

    #[test]
    fn parse_shift_input_blank_is_zero() {
        assert!(parse_shift_input("").unwrap().is_zero());
        assert!(parse_shift_input("   ").unwrap().is_zero());
    }

    #[test]
    fn parse_shift_input_accepts_signed_hours() {
        assert_eq!(parse_shift_input(" -5 ").unwrap().get(), -5);
        assert_eq!(parse_shift_input("+3").unwrap().get(), 3);
    }

    #[test]
    fn parse_shift_input_rejects_out_of_range_and_garbage() {
        assert!(parse_shift_input("25").is_err());
        assert!(parse_shift_input("-25").is_err());
        assert!(parse_shift_input("five").is_err());
    }

    fn lines(input: &str) -> LinePrompter<std::io::Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompter::new(std::io::Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn line_prompter_reprompts_blank_path() {
        let mut prompter = lines("\n  \"jpg\"  \n");

        assert_eq!(prompter.path("Target").unwrap(), "jpg");

        let shown = String::from_utf8(prompter.output).unwrap();
        assert_eq!(shown.matches("Target: ").count(), 2);
        assert!(shown.contains("Path cannot be empty"));
    }

    #[test]
    fn line_prompter_reads_answers_in_sequence() {
        let mut prompter = lines("a.jpg\r\na.raw\n-5\ny\n");

        assert_eq!(prompter.path("Target").unwrap(), "a.jpg");
        assert_eq!(prompter.path("Reference").unwrap(), "a.raw");
        assert_eq!(prompter.shift().unwrap().get(), -5);
        assert!(prompter.confirm("Apply these changes?").unwrap());
    }

    #[test]
    fn line_prompter_reprompts_invalid_shift() {
        let mut prompter = lines("25\nfive\n3\n");

        assert_eq!(prompter.shift().unwrap().get(), 3);

        let shown = String::from_utf8(prompter.output).unwrap();
        assert_eq!(shown.matches("Hour shift").count(), 3);
    }

    #[test]
    fn line_prompter_blank_shift_is_zero() {
        assert!(lines("\n").shift().unwrap().is_zero());
    }

    #[test]
    fn line_prompter_confirm_accepts_only_yes() {
        assert!(lines("Y\n").confirm("Apply?").unwrap());
        assert!(lines("yes\n").confirm("Apply?").unwrap());
        assert!(!lines("n\n").confirm("Apply?").unwrap());
        assert!(!lines("\n").confirm("Apply?").unwrap());
    }

    #[test]
    fn line_prompter_end_of_input_falls_back() {
        assert!(!lines("").confirm("Apply these changes?").unwrap());
        assert!(lines("").shift().unwrap().is_zero());
        assert!(lines("25\n").shift().unwrap().is_zero());

        let err = lines("").path("Target").unwrap_err();
        assert!(err.to_string().contains("Target"));
    }
}
