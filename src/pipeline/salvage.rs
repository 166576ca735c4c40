use std::sync::LazyLock;

use regex::Regex;
use serde::de::IgnoredAny;

/// Candidate returned when nothing in the text looks like JSON.
pub const EMPTY_OBJECT: &str = "{}";

static FENCED_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fenced json pattern is valid")
});

/// Which recovery rule produced the candidate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalvageTier {
    /// The whole text already parsed.
    Verbatim,
    /// Inner text of a ```json fenced block.
    FencedBlock,
    /// First `{` through last `}`. Not checked for validity.
    BraceSpan,
    /// Nothing recoverable, literal `{}`.
    Empty,
}

impl SalvageTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verbatim => "verbatim",
            Self::FencedBlock => "fenced_block",
            Self::BraceSpan => "brace_span",
            Self::Empty => "empty",
        }
    }

    /// Whether the candidate is known to parse.
    pub fn is_verified(&self) -> bool {
        !matches!(self, Self::BraceSpan)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salvaged<'a> {
    pub text: &'a str,
    pub tier: SalvageTier,
}

/// Recover a JSON candidate from a model answer. Never fails.
///
/// Rules are tried in order and the first hit wins:
/// 1. the full text parses, returned as is
/// 2. the first ```json fenced block whose content parses
/// 3. the span from the first `{` to the last `}`
/// 4. `{}`
pub fn salvage_json(text: &str) -> Salvaged<'_> {
    if parses(text) {
        return Salvaged {
            text,
            tier: SalvageTier::Verbatim,
        };
    }

    if let Some(inner) = FENCED_JSON_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    {
        if !inner.is_empty() && parses(inner) {
            return Salvaged {
                text: inner,
                tier: SalvageTier::FencedBlock,
            };
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return Salvaged {
                text: &text[start..=end],
                tier: SalvageTier::BraceSpan,
            };
        }
    }

    Salvaged {
        text: EMPTY_OBJECT,
        tier: SalvageTier::Empty,
    }
}

fn parses(text: &str) -> bool {
    !text.is_empty() && serde_json::from_str::<IgnoredAny>(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_json_returned_unchanged() {
        let text = r#"{"a":1}"#;
        let out = salvage_json(text);
        assert_eq!(out.text, text);
        assert_eq!(out.tier, SalvageTier::Verbatim);
    }

    #[test]
    fn valid_non_object_json_is_verbatim() {
        let out = salvage_json("[1, 2]");
        assert_eq!(out.text, "[1, 2]");
        assert_eq!(out.tier, SalvageTier::Verbatim);
    }

    #[test]
    fn fenced_block_extracted() {
        let text = "Here you go:\n```json\n{\"a\":1}\n```\nThanks";
        let out = salvage_json(text);
        assert_eq!(out.text, r#"{"a":1}"#);
        assert_eq!(out.tier, SalvageTier::FencedBlock);
    }

    #[test]
    fn only_first_fenced_block_is_considered() {
        let text = "```json\n{\"a\":1}\n```\nand\n```json\n{\"b\":2}\n```";
        assert_eq!(salvage_json(text).text, r#"{"a":1}"#);
    }

    #[test]
    fn broken_fence_falls_through_to_brace_span() {
        let text = "```json\n{\"a\": }\n``` trailing }";
        let out = salvage_json(text);
        assert_eq!(out.tier, SalvageTier::BraceSpan);
        assert_eq!(out.text, "{\"a\": }\n``` trailing }");
    }

    #[test]
    fn brace_span_is_not_verified() {
        let out = salvage_json("prefix {broken json here} suffix");
        assert_eq!(out.text, "{broken json here}");
        assert_eq!(out.tier, SalvageTier::BraceSpan);
        assert!(!out.tier.is_verified());
    }

    #[test]
    fn brace_span_with_multibyte_text() {
        let out = salvage_json("Análisis: {\"riesgo\": \"Alto\"} señal");
        assert_eq!(out.text, "{\"riesgo\": \"Alto\"}");
    }

    #[test]
    fn reversed_braces_give_empty_object() {
        let out = salvage_json("} nothing {");
        assert_eq!(out.text, EMPTY_OBJECT);
        assert_eq!(out.tier, SalvageTier::Empty);
    }

    #[test]
    fn empty_and_blank_input_give_empty_object() {
        assert_eq!(salvage_json("").text, EMPTY_OBJECT);
        assert_eq!(salvage_json("   \n").tier, SalvageTier::Empty);
    }

    #[test]
    fn plain_prose_gives_empty_object() {
        let out = salvage_json("No puedo analizar este documento.");
        assert_eq!(out.text, EMPTY_OBJECT);
        assert!(out.tier.is_verified());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn fragment() -> impl Strategy<Value = String> {
            prop_oneof![
                prop::sample::select(vec![
                    "{", "}", "[", "]", "```json", "```", "\"a\":", ":", ",", "1", "null",
                    "ñ", "señal", "€", " ", "\n",
                ])
                .prop_map(str::to_string),
                "\\PC{0,6}",
            ]
        }

        fn answer() -> impl Strategy<Value = String> {
            prop::collection::vec(fragment(), 0..24).prop_map(|parts| parts.concat())
        }

        fn check(text: &str) -> Result<(), TestCaseError> {
            let out = salvage_json(text);
            match out.tier {
                SalvageTier::Verbatim => {
                    prop_assert_eq!(out.text, text);
                    prop_assert!(parses(out.text));
                }
                SalvageTier::FencedBlock => {
                    prop_assert!(text.contains(out.text));
                    prop_assert!(parses(out.text));
                }
                SalvageTier::BraceSpan => {
                    prop_assert!(text.contains(out.text));
                    prop_assert!(out.text.starts_with('{'), "text should start with an opening brace");
                    prop_assert!(out.text.ends_with('}'), "text should end with a closing brace");
                }
                SalvageTier::Empty => {
                    prop_assert_eq!(out.text, EMPTY_OBJECT);
                    prop_assert!(!parses(text));
                }
            }
            Ok(())
        }

        proptest! {
            #[test]
            fn tier_matches_candidate_for_structured_noise(text in answer()) {
                check(&text)?;
            }

            #[test]
            fn tier_matches_candidate_for_any_text(text in any::<String>()) {
                check(&text)?;
            }
        }
    }
}
