//! The normalizer turns the raw text a model answered with into a validated [`CrossplayRecord`], or
//! into one of a few typed failures.
//!
//! The answer is untrusted: it may come wrapped in a markdown fence, it may be missing fields, and
//! it may not be JSON at all. The steps are always the same. First the fence is stripped, then the
//! text is parsed as a JSON object, then the fields required by the answer's schema are extracted,
//! and last the "not found" sentinel is checked for.
//!
//! Input must be strict JSON. Single-quoted objects and objects surrounded by prose are rejected as
//! malformed rather than repaired.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::record::CrossplayRecord;

mod fence;

/// The key holding the resolved title of the game.
const GAME_NAME: &str = "game_name";

/// The key holding the platform list in the current schema.
const PLATFORMS: &str = "platforms";

/// The key holding the crossplay summary in the current schema.
const CROSSPLAY: &str = "crossplay";

/// The value the model is asked to put in `game_name` when it can't identify the game.
pub(crate) const NOT_FOUND_SENTINEL: &str = "Game not found";

/// This enum holds the shapes an answer may come in. Each prompt version asks for its own shape, so
/// the normalizer is always told which one to expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
    /// An object with one `game_name` key, and every other key naming a console whose value lists
    /// the consoles it crossplays with as a comma separated string.
    ConsoleMap,
    /// An object with the `game_name`, `platforms` and `crossplay` keys.
    PlatformList,
}

/// This enum holds the reasons an answer may fail to normalize. All of them are terminal for the
/// lookup the answer belongs to.
#[expect(
    clippy::arbitrary_source_item_ordering,
    reason = "The variants follow the order in which the normalizer may produce them."
)]
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    /// The answer is not a JSON object, or one of its fields has the wrong type.
    #[error("the answer is not a well-formed JSON object")]
    MalformedResponse,
    /// The answer lacks one of the fields its schema requires.
    #[error("the answer is missing the `{0}` field")]
    MissingField(&'static str),
    /// The model answered with the "not found" sentinel for the game name.
    #[error("the model did not recognise the game")]
    GameNotFound,
}

/// Normalizes a raw model answer into a [`CrossplayRecord`].
///
/// # Errors
///
/// - [`NormalizeError::MalformedResponse`] if the text (once stripped of its fence) is not a JSON
///   object, or if a field has the wrong type.
/// - [`NormalizeError::MissingField`] with the name of the first required field that is absent,
///   checked in the order `game_name`, `platforms`, `crossplay`.
/// - [`NormalizeError::GameNotFound`] if `game_name` holds the "not found" sentinel, regardless of
///   what other fields are present.
pub fn normalize(raw: &str, schema: Schema) -> Result<CrossplayRecord, NormalizeError> {
    let body = fence::strip_fences(raw);
    trace!(raw, body, "stripped answer");

    let object = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            debug!("answer is valid JSON but not an object");
            return Err(NormalizeError::MalformedResponse);
        }
        Err(err) => {
            debug!(%err, "answer is not valid JSON");
            return Err(NormalizeError::MalformedResponse);
        }
    };

    let game_name = string_field(&object, GAME_NAME)?;
    if is_sentinel(game_name) {
        return Err(NormalizeError::GameNotFound);
    }

    match schema {
        Schema::ConsoleMap => console_map(game_name, &object),
        Schema::PlatformList => platform_list(game_name, &object),
    }
}

/// This function builds a record out of an answer in the first-generation shape, where every key
/// besides the game name is a console. Keys are read in the order the model wrote them.
fn console_map(
    game_name: &str,
    object: &Map<String, Value>,
) -> Result<CrossplayRecord, NormalizeError> {
    let mut platforms = Vec::new();
    let mut summary = Vec::new();

    for (console, partners) in object.iter().filter(|&(key, _)| key != GAME_NAME) {
        let partners = partners
            .as_str()
            .ok_or(NormalizeError::MalformedResponse)?;
        summary.push(format!("{console}: {partners}"));
        platforms.push(console.clone());
    }

    if platforms.is_empty() {
        return Err(NormalizeError::MissingField(PLATFORMS));
    }

    Ok(CrossplayRecord::new(
        game_name.to_owned(),
        platforms,
        summary.join("; "),
    ))
}

/// This function checks whether the game name is the agreed "not found" value. Case, the whitespace
/// around it and trailing punctuation such as a closing period are ignored.
fn is_sentinel(game_name: &str) -> bool {
    game_name
        .trim()
        .trim_end_matches(|ch: char| ch.is_ascii_punctuation())
        .trim_end()
        .eq_ignore_ascii_case(NOT_FOUND_SENTINEL)
}

/// This function builds a record out of an answer in the current shape.
fn platform_list(
    game_name: &str,
    object: &Map<String, Value>,
) -> Result<CrossplayRecord, NormalizeError> {
    let platforms = string_list_field(object, PLATFORMS)?;
    let crossplay = string_field(object, CROSSPLAY)?;

    Ok(CrossplayRecord::new(
        game_name.to_owned(),
        platforms,
        crossplay.to_owned(),
    ))
}

/// This function fetches a required string field from the answer.
fn string_field<'object>(
    object: &'object Map<String, Value>,
    key: &'static str,
) -> Result<&'object str, NormalizeError> {
    match object.get(key) {
        None => Err(NormalizeError::MissingField(key)),
        Some(&Value::String(ref value)) => Ok(value.as_str()),
        Some(_) => Err(NormalizeError::MalformedResponse),
    }
}

/// This function fetches a required list of strings from the answer. A mapping in place of the
/// list, or a single non-string entry in it, makes the whole answer malformed.
fn string_list_field(
    object: &Map<String, Value>,
    key: &'static str,
) -> Result<Vec<String>, NormalizeError> {
    match object.get(key) {
        None => Err(NormalizeError::MissingField(key)),
        Some(&Value::Array(ref items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or(NormalizeError::MalformedResponse)
            })
            .collect(),
        Some(_) => Err(NormalizeError::MalformedResponse),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{normalize, NormalizeError, Schema};
    use crate::record::CrossplayRecord;

    /// This function wraps a body in the fence most models use.
    fn fenced(body: &str) -> String {
        format!("```json\n{body}\n```")
    }

    #[test]
    fn normalizes_the_portal_example() {
        let raw = "```json\n{\"game_name\": \"Portal 2\", \"platforms\": [\"Steam\", \"Xbox 360 (no longer available)\"], \"crossplay\": \"No crossplay.\"}\n```";

        let record = normalize(raw, Schema::PlatformList);

        assert_eq!(
            record,
            Ok(CrossplayRecord::new(
                "Portal 2".to_owned(),
                vec![
                    "Steam".to_owned(),
                    "Xbox 360 (no longer available)".to_owned()
                ],
                "No crossplay.".to_owned(),
            )),
            "the record should carry the answer's values verbatim"
        );
    }

    #[test]
    fn fields_round_trip_exactly() {
        let platforms = [
            "PlayStation 5",
            "Nintendo Switch",
            "Steam",
            "Steam",
            "Epic Games Store",
        ];
        let answer = json!({
            "game_name": "Rocket League",
            "platforms": platforms,
            "crossplay": "Full crossplay between all platforms, with cross-progression.",
        });

        let record = normalize(&fenced(&answer.to_string()), Schema::PlatformList)
            .expect("a well-formed answer should normalize");

        assert_eq!(record.game_name(), "Rocket League", "game name is kept");
        assert_eq!(
            record.platforms(),
            platforms,
            "platforms keep order and duplicates"
        );
        assert_eq!(
            record.crossplay(),
            "Full crossplay between all platforms, with cross-progression.",
            "crossplay text is kept"
        );
    }

    #[test]
    fn fenced_and_bare_answers_normalize_alike() {
        let body = r#"{"game_name": "Hades", "platforms": ["Steam"], "crossplay": "None."}"#;

        assert_eq!(
            normalize(body, Schema::PlatformList),
            normalize(&fenced(body), Schema::PlatformList),
            "stripping the fence must not change the outcome"
        );
    }

    #[test]
    fn empty_object_misses_game_name() {
        assert_eq!(
            normalize("{}", Schema::PlatformList),
            Err(NormalizeError::MissingField("game_name")),
            "game_name is checked first"
        );
    }

    #[test]
    fn reports_each_missing_field() {
        let cases = [
            (
                r#"{"platforms": ["Steam"], "crossplay": "None."}"#,
                "game_name",
            ),
            (r#"{"game_name": "Hades", "crossplay": "None."}"#, "platforms"),
            (
                r#"{"game_name": "Hades", "platforms": ["Steam"]}"#,
                "crossplay",
            ),
        ];

        for (body, field) in cases {
            assert_eq!(
                normalize(body, Schema::PlatformList),
                Err(NormalizeError::MissingField(field)),
                "expected {field} to be reported missing"
            );
        }
    }

    #[test]
    fn sentinel_wins_over_other_fields() {
        let complete = fenced(
            r#"{"game_name": "Game not found", "platforms": ["Steam"], "crossplay": "None."}"#,
        );
        let bare = r#"{"game_name": "Game not found"}"#;
        let shouted = r#"{"game_name": "  GAME NOT FOUND "}"#;

        for raw in [complete.as_str(), bare, shouted] {
            assert_eq!(
                normalize(raw, Schema::PlatformList),
                Err(NormalizeError::GameNotFound),
                "the sentinel should be recognised in {raw}"
            );
        }
    }

    #[test]
    fn sentinel_tolerates_trailing_punctuation() {
        for name in ["Game not found.", "Game not found!", "game not found ..."] {
            let body = json!({ "game_name": name, "platforms": [], "crossplay": "" });

            assert_eq!(
                normalize(&body.to_string(), Schema::PlatformList),
                Err(NormalizeError::GameNotFound),
                "{name} should count as the sentinel"
            );
        }
    }

    #[test]
    fn titles_merely_containing_the_sentinel_resolve() {
        let body = r#"{"game_name": "Game not found: The Game", "platforms": ["Steam"], "crossplay": "None."}"#;

        let record = normalize(body, Schema::PlatformList).expect("a real title");

        assert_eq!(
            record.game_name(),
            "Game not found: The Game",
            "only the bare sentinel is special"
        );
    }

    #[test]
    fn rejects_plain_prose() {
        assert_eq!(
            normalize("I couldn't find that game, sorry!", Schema::PlatformList),
            Err(NormalizeError::MalformedResponse),
            "prose is not JSON"
        );
    }

    #[test]
    fn rejects_prose_around_the_object() {
        let raw = "Here is what I found:\n{\"game_name\": \"Hades\", \"platforms\": [], \"crossplay\": \"None.\"}\nEnjoy!";

        assert_eq!(
            normalize(raw, Schema::PlatformList),
            Err(NormalizeError::MalformedResponse),
            "the object is not searched for inside prose"
        );
    }

    #[test]
    fn rejects_empty_answers() {
        for raw in ["", "   \n", "```json\n```"] {
            assert_eq!(
                normalize(raw, Schema::PlatformList),
                Err(NormalizeError::MalformedResponse),
                "empty answers are malformed"
            );
        }
    }

    #[test]
    fn rejects_single_quoted_objects() {
        let raw = "{'game_name': 'Hades', 'platforms': ['Steam'], 'crossplay': 'None.'}";

        assert_eq!(
            normalize(raw, Schema::PlatformList),
            Err(NormalizeError::MalformedResponse),
            "single quotes are never repaired"
        );
    }

    #[test]
    fn rejects_non_object_top_level() {
        for raw in [r#"["Steam"]"#, r#""Hades""#, "42", "null"] {
            assert_eq!(
                normalize(raw, Schema::PlatformList),
                Err(NormalizeError::MalformedResponse),
                "{raw} is not an object"
            );
        }
    }

    #[test]
    fn rejects_fields_of_the_wrong_type() {
        let cases = [
            r#"{"game_name": 7, "platforms": ["Steam"], "crossplay": "None."}"#,
            r#"{"game_name": "Hades", "platforms": {"Steam": "PC"}, "crossplay": "None."}"#,
            r#"{"game_name": "Hades", "platforms": ["Steam", 3], "crossplay": "None."}"#,
            r#"{"game_name": "Hades", "platforms": ["Steam"], "crossplay": ["None."]}"#,
        ];

        for body in cases {
            assert_eq!(
                normalize(body, Schema::PlatformList),
                Err(NormalizeError::MalformedResponse),
                "{body} has a mistyped field"
            );
        }
    }

    #[test]
    fn accepts_an_empty_platform_list() {
        let record = normalize(
            r#"{"game_name": "Hades", "platforms": [], "crossplay": "None."}"#,
            Schema::PlatformList,
        )
        .expect("an empty list is still a list");

        assert!(record.platforms().is_empty(), "no platforms were listed");
    }

    #[test]
    fn console_map_keeps_document_order() {
        let raw = fenced(
            r#"{"game_name": "Minecraft", "PC": "Xbox, PlayStation", "Xbox": "PC, PlayStation", "Switch": "PC, Xbox"}"#,
        );

        let record =
            normalize(&raw, Schema::ConsoleMap).expect("a console map should normalize");

        assert_eq!(record.game_name(), "Minecraft", "game name is kept");
        assert_eq!(
            record.platforms(),
            ["PC", "Xbox", "Switch"],
            "consoles come out in the order written"
        );
        assert_eq!(
            record.crossplay(),
            "PC: Xbox, PlayStation; Xbox: PC, PlayStation; Switch: PC, Xbox",
            "the summary joins every console entry"
        );
    }

    #[test]
    fn console_map_needs_at_least_one_console() {
        assert_eq!(
            normalize(r#"{"game_name": "Minecraft"}"#, Schema::ConsoleMap),
            Err(NormalizeError::MissingField("platforms")),
            "no console entries means no platforms"
        );
    }

    #[test]
    fn console_map_rejects_non_string_entries() {
        assert_eq!(
            normalize(
                r#"{"game_name": "Minecraft", "PC": ["Xbox"]}"#,
                Schema::ConsoleMap
            ),
            Err(NormalizeError::MalformedResponse),
            "console entries must be strings"
        );
    }

    #[test]
    fn console_map_honours_the_sentinel() {
        assert_eq!(
            normalize(
                r#"{"game_name": "Game not found", "PC": "None"}"#,
                Schema::ConsoleMap
            ),
            Err(NormalizeError::GameNotFound),
            "the sentinel applies to every schema"
        );
    }
}
