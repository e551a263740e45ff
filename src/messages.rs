//! This module holds the client for the OpenRouter chat completions API. It sends the query built
//! out of the user's title and returns the raw text the model answered with, leaving all parsing of
//! that text to the normalizer.
//!
//! Web search is enabled through OpenRouter's `:online` model suffix.

use std::io::ErrorKind;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::prompt::SYSTEM_PROMPT;

/// The base URL of the OpenRouter API.
pub(crate) const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// The model suffix OpenRouter uses to enable web search on a request.
pub(crate) const ONLINE_SUFFIX: &str = ":online";

/// This struct holds everything the client needs to know to talk to the API. It is built once from
/// the command-line arguments and handed to [`OpenRouter::new`].
#[derive(Clone)]
pub(crate) struct ClientConfig {
    /// The API key sent as a bearer token.
    pub(crate) api_key: String,
    /// The base URL of the API, without the endpoint path.
    pub(crate) base_url: String,
    /// The OpenRouter model id.
    pub(crate) model: String,
    /// The time allowed for a whole request, from connecting to reading the body.
    pub(crate) timeout: Duration,
    /// Whether the `:online` suffix should be appended to the model id.
    pub(crate) web_search: bool,
}

impl ClientConfig {
    /// This function returns the model id to send, with the web search suffix appended if it is
    /// enabled and the id doesn't already carry it.
    fn request_model(&self) -> String {
        if self.web_search && !self.model.ends_with(ONLINE_SUFFIX) {
            format!("{}{ONLINE_SUFFIX}", self.model)
        } else {
            self.model.clone()
        }
    }
}

/// This trait is the seam between the lookup and the service answering it.
pub(crate) trait Model {
    /// Sends a query and returns the raw text of the answer.
    fn complete(&self, query: &str) -> Result<String, ResponseError>;
}

/// This struct holds a single message of the conversation sent to the model.
#[expect(
    clippy::arbitrary_source_item_ordering,
    reason = "The JSON schema needs the fields to be in this order."
)]
#[derive(Serialize)]
struct Message<'content> {
    /// This field contains the author of the message.
    role: Role,
    /// This field contains the text of the message.
    content: &'content str,
}

/// This struct holds the body of a chat completion request.
#[derive(Serialize)]
struct Request<'content> {
    /// This field contains the system message followed by the user query.
    messages: [Message<'content>; 2],
    /// This field contains the model id, suffix included.
    model: String,
}

impl<'content> Request<'content> {
    /// This function builds a request holding the fixed system message and the given query.
    fn new(query: &'content str, model: String) -> Self {
        Self {
            messages: [
                Message {
                    role: Role::System,
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: Role::User,
                    content: query,
                },
            ],
            model,
        }
    }
}

/// This struct holds the parts of a chat completion response the client cares about.
#[derive(Deserialize)]
struct Response {
    /// This field contains the generated answers; only the first one is ever read.
    choices: Vec<ResponseChoice>,
    /// This field contains the id OpenRouter gives the generation.
    #[serde(default)]
    id: String,
    /// This field contains the model that actually answered, which may differ from the requested
    /// one when OpenRouter falls back to another provider.
    #[serde(default)]
    model: String,
}

/// This struct holds one of the generated answers in a response.
#[derive(Deserialize)]
struct ResponseChoice {
    /// This field contains the reason the generation stopped.
    finish_reason: Option<String>,
    /// This field contains the generated message.
    message: ResponseMessage,
}

/// This struct holds a generated message. Its content may be null when the model only produced
/// tool calls.
#[derive(Deserialize)]
struct ResponseMessage {
    /// This field contains the text of the answer.
    content: Option<String>,
}

/// This enum holds the ways a request to the service may fail.
#[expect(
    clippy::arbitrary_source_item_ordering,
    reason = "It's easier to maintain if the errors are in the same order as the ones specified in the OpenRouter docs."
)]
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ResponseError {
    /// The request was rejected as invalid.
    #[error("bad request")]
    BadRequest,
    /// The API key was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The account has run out of credits.
    #[error("insufficient credits")]
    InsufficientCredits,
    /// The query was flagged by moderation.
    #[error("flagged input")]
    FlaggedInput,
    /// The request took longer than allowed.
    #[error("timed out")]
    TimedOut,
    /// Too many requests were sent.
    #[error("rate limited")]
    RateLimited,
    /// The model is down or answered with something that isn't a chat completion.
    #[error("model down or invalid response")]
    DownOrInvalid,
    /// No provider is available for the requested model.
    #[error("no available providers")]
    NoProviders,
    /// Anything else, transport failures included.
    #[error("unknown error")]
    Unknown,
}

impl ResponseError {
    /// Returns whether the error will keep happening on every request, so that there is no point in
    /// asking the user for another title.
    pub(crate) const fn is_fatal(self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::InsufficientCredits)
    }

    /// This function maps an HTTP status code onto the error OpenRouter documents for it.
    const fn from_status(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 => Self::InvalidCredentials,
            402 => Self::InsufficientCredits,
            403 => Self::FlaggedInput,
            408 => Self::TimedOut,
            429 => Self::RateLimited,
            502 => Self::DownOrInvalid,
            503 => Self::NoProviders,
            _ => Self::Unknown,
        }
    }
}

impl From<ureq::Error> for ResponseError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::from_status(code),
            ureq::Error::Timeout(_) => Self::TimedOut,
            ureq::Error::Io(ref io) if io.kind() == ErrorKind::TimedOut => Self::TimedOut,
            ureq::Error::Json(_) => Self::DownOrInvalid,
            _ => Self::Unknown,
        }
    }
}

/// This enum holds the roles a message may be sent with.
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    /// The role of the instructions that frame the conversation.
    System,
    /// The role of the query itself.
    User,
}

/// This struct is the client for the OpenRouter API.
pub(crate) struct OpenRouter {
    /// This field contains the HTTP agent, configured with the request timeout.
    agent: Agent,
    /// This field contains the configuration the client was built with.
    config: ClientConfig,
}

impl OpenRouter {
    /// This function creates a new client out of the given configuration.
    pub(crate) fn new(config: ClientConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build()
            .into();

        Self { agent, config }
    }

    /// This function returns the URL of the chat completions endpoint.
    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

impl Model for OpenRouter {
    fn complete(&self, query: &str) -> Result<String, ResponseError> {
        let request_body = Request::new(query, self.config.request_model());
        info!(model = %request_body.model, "querying model");

        let response: Response = self
            .agent
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send_json(&request_body)
            .and_then(|response| response.into_body().read_json::<Response>())
            .map_err(|err| {
                warn!(%err, "model request failed");
                ResponseError::from(err)
            })?;

        let Some(choice) = response.choices.into_iter().next() else {
            warn!(id = %response.id, "model answered without any choices");
            return Err(ResponseError::DownOrInvalid);
        };

        debug!(
            id = %response.id,
            model = %response.model,
            finish_reason = ?choice.finish_reason,
            "model answered"
        );

        Ok(choice.message.content.unwrap_or_default())
    }
}
