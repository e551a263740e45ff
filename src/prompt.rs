//! This module builds the natural-language query sent to the model out of the title a user typed
//! in. Every prompt version asks for a differently shaped answer, so each one also names the
//! [`Schema`] the normalizer has to use to read that answer.

use clap::ValueEnum;

use crate::normalizer::{Schema, NOT_FOUND_SENTINEL};

/// The system message sent along every query. It holds the rules that don't depend on the prompt
/// version.
pub(crate) const SYSTEM_PROMPT: &str = "You answer questions about video games. Search the web \
for up-to-date information before answering. Reply with a single JSON object and nothing else: no \
greeting, no explanation and no text before or after the object.";

/// This enum holds the prompt versions the tool knows how to ask and read back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum PromptVersion {
    /// The first-generation prompt, which asks for one key per console holding the consoles it can
    /// crossplay with.
    Consoles,
    /// The current prompt, which asks for a platform list and a separate crossplay summary.
    #[default]
    Platforms,
}

impl PromptVersion {
    /// This function fills the given title into the template of the prompt version.
    pub(crate) fn query(self, title: &str) -> String {
        let title = title.trim();

        match self {
            Self::Consoles => format!(
                "Where can I play {title}? Format the answer as a JSON object, with the first key \
                 being \"game_name\" holding the name of the game, and every other key being a \
                 console whose value lists the other consoles it is able to crossplay with as a \
                 comma separated string. Do not add crossplay as its own key under any \
                 circumstance. If PC only has crossplay with other PC storefronts, mention them \
                 too. If you cannot identify the game, answer with {{\"game_name\": \
                 \"{NOT_FOUND_SENTINEL}\"}}."
            ),
            Self::Platforms => format!(
                "Where can I play {title}? Format the answer as a JSON object with exactly three \
                 keys. \"game_name\" holds the full name of the game as a string. \"platforms\" \
                 holds a list of strings, one per platform or storefront the game has been \
                 released on; if the game is no longer available on a platform, keep it in the \
                 list followed by \" (no longer available)\". \"crossplay\" holds a string of 100 \
                 words or fewer describing which platforms can play together, including PC \
                 storefronts that only crossplay with each other. If you cannot identify the \
                 game, set \"game_name\" to \"{NOT_FOUND_SENTINEL}\"."
            ),
        }
    }

    /// This function returns the shape of the answers this prompt version asks for.
    pub(crate) const fn schema(self) -> Schema {
        match self {
            Self::Consoles => Schema::ConsoleMap,
            Self::Platforms => Schema::PlatformList,
        }
    }
}
