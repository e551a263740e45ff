//! This module contains all functions related to taking input from the user. They all use the
//! `dialoguer` crate to process the input, and they all check for input validation.
//!
//! Specifically, the two available functions take the title of the game to look up, and ask whether
//! the user wants to look up another one.

use anyhow::Result;
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use regex::Regex;

/// The pattern a title must match: between 1 and 100 characters, none of them control characters.
pub(crate) const TITLE_PATTERN: &str = r"\A[^\p{Cc}]{1,100}\z";

/// This function is in charge of taking the title of the game the user wants to look up. The title
/// comes back trimmed.
pub(crate) fn take_title(term: &Term, re: &Regex) -> Result<String> {
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "{}",
            style("Which game do you want to look up?").bold()
        ))
        .validate_with(|input: &String| validate_title(input, re))
        .interact_text_on(term)?;

    Ok(input.trim().to_owned())
}

/// This function asks the user whether they want to look up another game.
pub(crate) fn again(term: &Term) -> Result<bool> {
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{}", style("Look up another game?").bold()))
        .default(true)
        .interact_on(term)?;

    Ok(answer)
}

/// This function checks a title against the title pattern, and makes sure it isn't just blanks.
fn validate_title(input: &str, re: &Regex) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("The title can't be blank")
    } else if re.is_match(input) {
        Ok(())
    } else {
        Err("The title should be at most 100 characters long, without control characters")
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::{validate_title, TITLE_PATTERN};

    /// This function compiles the title pattern.
    fn title_re() -> Regex {
        Regex::new(TITLE_PATTERN).expect("the title pattern is valid")
    }

    #[test]
    fn accepts_ordinary_titles() {
        let re = title_re();

        for title in ["Portal 2", "Baldur's Gate 3", "NieR:Automata", "  Celeste  "] {
            assert_eq!(validate_title(title, &re), Ok(()), "{title} is a title");
        }
    }

    #[test]
    fn rejects_blank_titles() {
        let re = title_re();

        for title in ["", "   "] {
            assert!(validate_title(title, &re).is_err(), "{title:?} is blank");
        }
    }

    #[test]
    fn rejects_overlong_titles() {
        let re = title_re();
        let title = "a".repeat(101);

        assert!(validate_title(&title, &re).is_err(), "101 characters");
        assert_eq!(
            validate_title(&title[..100], &re),
            Ok(()),
            "100 characters is the limit"
        );
    }

    #[test]
    fn rejects_control_characters() {
        assert!(
            validate_title("Portal\u{7}2", &title_re()).is_err(),
            "the bell is a control character"
        );
    }
}
