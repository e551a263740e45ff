//! This module strips the markdown code fence that models like to wrap their JSON answers in.
//!
//! Only a closed set of tokens is recognised: the triple backtick fence, and a handful of language
//! tags right after the opening fence. Anything else is left in place for the parser to reject.

/// The markdown code-fence token.
const FENCE: &str = "```";

/// The language tags that may follow an opening fence.
const LANGUAGE_TAGS: [&str; 4] = ["json", "JSON", "jsonc", "json5"];

/// This function removes exactly one layer of code fence from the given text, along with its
/// language tag and the whitespace around the fenced body.
///
/// Text that does not both open and close with a fence is only trimmed, so that an unbalanced fence
/// reaches the parser untouched and gets rejected there.
pub(super) fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(inner) = trimmed
        .strip_prefix(FENCE)
        .and_then(|rest| rest.strip_suffix(FENCE))
    else {
        return trimmed;
    };

    strip_language_tag(inner.trim_start_matches([' ', '\t'])).trim()
}

/// This function removes a known language tag from the start of a fenced body. A tag only counts as
/// such if it isn't immediately followed by more word characters, so `jsonish` stays untouched.
fn strip_language_tag(body: &str) -> &str {
    LANGUAGE_TAGS
        .iter()
        .find_map(|tag| {
            body.strip_prefix(tag)
                .filter(|rest| !rest.starts_with(|ch: char| ch.is_alphanumeric()))
        })
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::strip_fences;

    #[test]
    fn strips_fence_with_language_tag() {
        let raw = "```json\n{\"game_name\": \"Celeste\"}\n```";

        assert_eq!(
            strip_fences(raw),
            "{\"game_name\": \"Celeste\"}",
            "the fence and its tag should both be gone"
        );
    }

    #[test]
    fn strips_fence_without_language_tag() {
        assert_eq!(strip_fences("```\n{}\n```"), "{}", "a bare fence is stripped");
    }

    #[test]
    fn strips_fence_without_trailing_newline() {
        assert_eq!(
            strip_fences("```json\n{\"a\": 1}```"),
            "{\"a\": 1}",
            "the closing fence may follow the body directly"
        );
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(
            strip_fences("  \n```JSON\n{}\n```\n\n"),
            "{}",
            "whitespace around the fence is trimmed"
        );
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(
            strip_fences(" {\"a\": \"```\"} "),
            "{\"a\": \"```\"}",
            "only the outer whitespace is trimmed"
        );
    }

    #[test]
    fn keeps_content_sharing_characters_with_the_fence() {
        // a free-form trim of backticks and "json" letters would eat into this body
        let raw = "```json\n{\"note\": \"json`\"}\n```";

        assert_eq!(
            strip_fences(raw),
            "{\"note\": \"json`\"}",
            "the body must come out intact"
        );
    }

    #[test]
    fn leaves_unknown_language_tag_in_place() {
        assert_eq!(
            strip_fences("```jsonish\n{}\n```"),
            "jsonish\n{}",
            "unknown tags are not stripped"
        );
    }

    #[test]
    fn leaves_unbalanced_fence_in_place() {
        assert_eq!(
            strip_fences("```json\n{}"),
            "```json\n{}",
            "an opening fence without a closing one is kept"
        );
        assert_eq!(strip_fences("```"), "```", "a lone fence is kept");
    }

    #[test]
    fn strips_a_single_layer_only() {
        assert_eq!(
            strip_fences("```\n```json\n{}\n```\n```"),
            "```json\n{}\n```",
            "nested fences are not unwrapped"
        );
    }

    #[test]
    fn stripping_is_idempotent_on_bare_json() {
        let once = strip_fences("```json\n{\"a\": [1, 2]}\n```");

        assert_eq!(strip_fences(once), once, "a second pass changes nothing");
    }
}
