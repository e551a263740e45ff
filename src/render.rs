//! This module renders the outcome of a lookup on the terminal.
//!
//! Failures are shown as a single message picked by their kind. The raw answer of the model and the
//! details of the failure are never shown; they only ever reach the logs.

use std::io::Write;

use anyhow::Result;
use console::style;

use crate::lookup::{LookupError, Outcome};
use crate::normalizer::NormalizeError;
use crate::session::Session;

/// The message shown when the model didn't recognise the game.
const NOT_FOUND_MESSAGE: &str = "That game was not recognised. Check the spelling and try again.";

/// The message shown when the answer of the model couldn't be understood.
const UNREADABLE_MESSAGE: &str = "Could not understand the lookup service's answer.";

/// This enum holds the kinds of lines an outcome is rendered as, so that the styling is decided
/// apart from the contents.
#[expect(
    clippy::arbitrary_source_item_ordering,
    reason = "The variants follow the order in which they are displayed."
)]
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Line {
    /// The name of the game.
    Title(String),
    /// The header of a section.
    Heading(&'static str),
    /// An entry in a list.
    Item(String),
    /// A paragraph of plain text.
    Text(String),
    /// A failure message.
    Error(String),
}

impl Line {
    /// This function returns the line with its terminal styling applied.
    fn styled(&self) -> String {
        match *self {
            Self::Title(ref text) => format!("{}", style(text).bold().underlined()),
            Self::Heading(text) => format!("{}", style(text).bold()),
            Self::Item(ref text) => format!("  - {text}"),
            Self::Text(ref text) => format!("  {text}"),
            Self::Error(ref text) => format!("{}", style(text).bold().red()),
        }
    }
}

/// This function pops the pending outcome from the session and writes it out, usually to the
/// terminal. Nothing is written if there is no pending outcome.
pub(crate) fn display<W: Write>(out: &mut W, session: &mut Session) -> Result<()> {
    let Some(outcome) = session.take() else {
        return Ok(());
    };

    for line in lines(&outcome) {
        writeln!(out, "{}", line.styled())?;
    }

    out.flush()?;
    Ok(())
}

/// This function turns an outcome into the lines to show for it.
pub(crate) fn lines(outcome: &Outcome) -> Vec<Line> {
    let record = match *outcome {
        Ok(ref record) => record,
        Err(ref err) => return vec![Line::Error(message(err))],
    };

    let mut output = vec![
        Line::Title(record.game_name().to_owned()),
        Line::Heading("Available on"),
    ];

    if record.platforms().is_empty() {
        output.push(Line::Text("No platforms were listed.".to_owned()));
    } else {
        output.extend(record.platforms().iter().cloned().map(Line::Item));
    }

    output.push(Line::Heading("Crossplay"));
    output.push(Line::Text(record.crossplay().to_owned()));

    output
}

/// This function picks the message shown to the user for a failed lookup.
fn message(err: &LookupError) -> String {
    match *err {
        LookupError::Answer(NormalizeError::GameNotFound) => NOT_FOUND_MESSAGE.to_owned(),
        LookupError::Answer(NormalizeError::MalformedResponse | NormalizeError::MissingField(_)) => {
            UNREADABLE_MESSAGE.to_owned()
        }
        LookupError::Service(service) => {
            format!("The lookup service could not be reached: {service}.")
        }
    }
}
