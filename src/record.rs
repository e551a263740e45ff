//! This module holds the only domain entity of the crate, the record describing where a game can be
//! played and how it fares when it comes to crossplay.
//!
//! Records are only ever built by the normalizer out of a model answer, and they are read-only from
//! then on.

/// This structure holds the information extracted from a single model answer about a single game.
///
/// The platform list keeps the exact order and spelling the model returned, including any
/// availability annotation such as "(no longer available)". Nothing is deduplicated or sorted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossplayRecord {
    /// This field contains free text on crossplay support, as written by the model.
    crossplay: String,
    /// This field contains the title as resolved by the model, which may differ from the one the
    /// user typed in.
    game_name: String,
    /// This field contains the platform and storefront names the game is playable on.
    platforms: Vec<String>,
}

impl CrossplayRecord {
    /// This function builds a new record out of the three fields extracted from an answer.
    pub(crate) const fn new(game_name: String, platforms: Vec<String>, crossplay: String) -> Self {
        Self {
            crossplay,
            game_name,
            platforms,
        }
    }

    /// Returns the free-text crossplay summary.
    #[must_use]
    pub fn crossplay(&self) -> &str {
        &self.crossplay
    }

    /// Returns the title of the game as resolved by the model.
    #[must_use]
    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    /// Returns the platforms in the order the model listed them.
    #[must_use]
    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }
}
