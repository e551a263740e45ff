//! # crossplay
//!
//! This crate is a tool to find out where a video game can be played, and which of those platforms
//! can play together. You type in the title of a game, and an AI model searches the web and answers
//! with the platforms it was released on, along with a short summary of its crossplay support.
//!
//! The answer is retrieved through the OpenRouter API by means of request calls and simple
//! deserialization and serialization code. Only the parts of the API this tool needs are covered.

#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use anyhow::Result;
use crossplay::init;

fn main() -> Result<()> {
    init()
}
