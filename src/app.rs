//! The app module contains the entry point of the tool and its command-line interface.
//!
//! It contains the `init()` function that sets everything up and runs the lookup loop, as well as
//! the welcome message and the check for the requested model against the OpenRouter API.

use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use console::{style, Term};
use indicatif::ProgressBar;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::input::{again, take_title, TITLE_PATTERN};
use crate::logger::init_logger;
use crate::lookup::submit;
use crate::messages::{ClientConfig, OpenRouter, DEFAULT_BASE_URL, ONLINE_SUFFIX};
use crate::prompt::PromptVersion;
use crate::render::display;
use crate::session::Session;

/// The model used when none is given.
const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";

/// This struct holds information about the application when it comes to the command-line argument
/// parser of choice, which is clap. Every option that talks about the API can also be set through
/// the environment, or through a `.env` file in the working directory.
#[derive(Parser)]
#[command(name = "crossplay", version, about)]
#[command(next_line_help = true)]
struct Cli {
    /// The OpenRouter API key used to query the model.
    ///
    /// This argument is only required if the environment variable OPENROUTER_API_KEY is not set
    /// with the corresponding API key.
    #[arg(long)]
    #[arg(env = "OPENROUTER_API_KEY", value_name = "YOUR_API_KEY", hide_env_values = true)]
    api_key: String,
    /// The base URL of the OpenRouter API.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    #[arg(env = "OPENROUTER_BASE_URL", value_name = "URL")]
    base_url: String,
    /// The model name to answer the lookups; Gemini 2.0 Flash by default.
    ///
    /// Models are named by the id right below their public brand name in their respective
    /// OpenRouter model page. The id is checked against the model list served at the base URL
    /// before the first lookup.
    #[arg(short, long)]
    #[arg(env = "OPENROUTER_MODEL", value_name = "MODEL_NAME")]
    model: Option<String>,
    /// Disables the web search the model performs before answering.
    #[arg(long)]
    no_web_search: bool,
    /// The version of the prompt sent to the model, which also decides how its answer is read.
    #[arg(long, value_enum, default_value_t = PromptVersion::Platforms)]
    prompt_version: PromptVersion,
    /// The number of seconds a lookup may take before it is given up on.
    #[arg(long, default_value_t = 60, value_name = "SECONDS")]
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,
    /// Logs what the tool is doing to stderr. RUST_LOG takes precedence when set.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// This function builds the configuration for the API client out of the parsed arguments.
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            timeout: Duration::from_secs(self.timeout),
            web_search: !self.no_web_search,
        }
    }
}

/// It makes up one of the fields the request to fetch models from the OpenRouter API requires. This
/// structure doesn't support all of the fields because the request is only interested in the model
/// id.
#[derive(Deserialize)]
struct Data {
    /// This field contains the name to be used on post requests in the model field for OpenRouter
    /// POST API requests.
    id: String,
}

/// This structure contains the main form of the response returned by an OpenRouter API request for
/// the list of all models available for use in the API.
#[derive(Deserialize)]
struct ModelResponse {
    /// This field contains the list of models the API serves.
    data: Vec<Data>,
}

/// Sets everything up and runs the lookup loop until the user is done.
///
/// Each iteration takes a title, submits it to the model behind a spinner, and displays whatever
/// the lookup left in the session. Failed lookups are displayed like any other, so the loop only
/// stops early on errors that would repeat for every title.
///
/// # Errors
///
/// The function may return any one of the following errors:
///
/// - io::Error
/// - dialoguer::Error
/// - regex::Error
/// - tracing_subscriber::util::TryInitError
/// - the failed check of a model given through `--model` or OPENROUTER_MODEL
/// - the service error that made further lookups pointless (invalid credentials, no credits)
pub fn init() -> Result<()> {
    // the environment file has to be loaded before clap reads the environment
    let dotenv = dotenv::dotenv();
    let cli = Cli::parse();
    init_logger(cli.verbose)?;

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(err) => debug!(%err, "no environment file loaded"),
    }

    let config = cli.client_config();
    if cli.model.is_some() {
        verify_model(&config.base_url, &config.model)?;
    }

    let term = Term::stdout();
    let title_re = Regex::new(TITLE_PATTERN)?;
    let client = OpenRouter::new(config);
    let mut session = Session::default();

    init_message(&term)?;

    loop {
        let title = take_title(&term, &title_re)?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Looking it up...");
        spinner.enable_steady_tick(Duration::from_millis(50));
        let submitted = submit(&client, &title, cli.prompt_version, &mut session);
        spinner.finish_and_clear();
        submitted?;

        display(&mut &term, &mut session)?;

        if !again(&term)? {
            break Ok(());
        }

        term.clear_screen()?;
    }
}

/// This function writes the message shown when the tool starts, after clearing the screen and
/// setting the title of the console window.
fn init_message(term: &Term) -> Result<()> {
    const MSG: &str = "Where can I play it, and with whom?";
    let msg = style(MSG).bold();

    term.clear_screen()?;
    term.set_title("crossplay");

    term.write_line(&format!("{msg}"))?;
    Ok(())
}

/// This function checks the requested model against the list of models served by the API the
/// lookups will be sent to. The web search suffix is ignored for the check, since the list only
/// holds the plain ids.
///
/// # Errors
///
/// Fails if the list can't be fetched, or if the model isn't in it.
fn verify_model(base_url: &str, model: &str) -> Result<()> {
    let id = model.strip_suffix(ONLINE_SUFFIX).unwrap_or(model);
    let response = ureq::get(format!("{}/models", base_url.trim_end_matches('/')))
        .call()
        .and_then(|response| response.into_body().read_json::<ModelResponse>())
        .context("There's been an error checking the requested model with the OpenRouter API.")?;

    if !response.data.iter().any(|data| data.id == id) {
        bail!("The requested model {model} could not be found with the OpenRouter API.");
    }

    debug!(model, "model found in the model list");
    Ok(())
}
