//! The library components of the tool. They allow taking the title of a game from the user, asking
//! an AI model with web search where that game can be played, and reading its answer back into a
//! record of platforms and crossplay support.
//!
//! The starting point of the library is the app.rs file, which contains the lookup loop. The answer
//! of the model is read by the normalizer, which is also exposed on its own.

mod app;
mod input;
mod logger;
mod lookup;
mod messages;
mod normalizer;
mod prompt;
mod record;
mod render;
mod session;

pub use app::init;
pub use normalizer::{normalize, NormalizeError, Schema};
pub use record::CrossplayRecord;
