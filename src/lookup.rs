//! This module holds the submit step of a lookup: the title is turned into a query, the query is
//! sent to the model, and the answer is normalized and left in the session for display.
//!
//! Failures are stored in the session like any other outcome, so that they are shown to the user as
//! a message. The only exception are service errors that would repeat on every request, which end
//! the program instead.

use tracing::{info, warn};

use crate::messages::{Model, ResponseError};
use crate::normalizer::{normalize, NormalizeError};
use crate::prompt::PromptVersion;
use crate::record::CrossplayRecord;
use crate::session::Session;

/// The result of looking up a single title.
pub(crate) type Outcome = Result<CrossplayRecord, LookupError>;

/// This enum holds the ways a lookup may fail once the title has been submitted.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LookupError {
    /// The model answered, but the answer could not be used.
    #[error("unusable answer: {0}")]
    Answer(#[from] NormalizeError),
    /// The model could not be queried.
    #[error("service failure: {0}")]
    Service(#[from] ResponseError),
}

/// This function looks up a title and stores the outcome in the session.
///
/// # Errors
///
/// Returns the service error if it is fatal, in which case nothing is stored.
pub(crate) fn submit(
    model: &dyn Model,
    title: &str,
    version: PromptVersion,
    session: &mut Session,
) -> Result<(), ResponseError> {
    let query = version.query(title);
    let outcome = model
        .complete(&query)
        .map_err(LookupError::from)
        .and_then(|raw| normalize(&raw, version.schema()).map_err(LookupError::from));

    match outcome {
        Err(LookupError::Service(err)) if err.is_fatal() => {
            warn!(title, %err, "lookup aborted");
            return Err(err);
        }
        Ok(ref record) => info!(
            title,
            game = record.game_name(),
            platforms = record.platforms().len(),
            "lookup resolved"
        ),
        Err(ref err) => warn!(title, %err, "lookup failed"),
    }

    session.put(outcome);
    Ok(())
}
