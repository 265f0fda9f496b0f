//! Reply-language routing.
//!
//! A fixed rule cascade decides which of the supported languages the coach
//! should answer in. Rules are evaluated in order and the first match wins:
//!
//! 1. Tamil script anywhere in the text
//! 2. Devanagari script anywhere in the text
//! 3. A romanized Hindi marker word
//! 4. A romanized Tamil marker word
//! 5. English
//!
//! Marker words only match on word boundaries, so `"chai"` never triggers the
//! `"hai"` marker.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Languages the coach can reply in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    #[default]
    En,
    Hi,
    Ta,
}

impl LanguageTag {
    /// All supported tags, in declaration order.
    pub const ALL: [LanguageTag; 3] = [LanguageTag::En, LanguageTag::Hi, LanguageTag::Ta];

    /// Lowercase tag, e.g. `"ta"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageTag::En => "en",
            LanguageTag::Hi => "hi",
            LanguageTag::Ta => "ta",
        }
    }

    /// Uppercase code used in prompt directives, e.g. `"TA"`.
    pub fn directive_code(&self) -> &'static str {
        match self {
            LanguageTag::En => "EN",
            LanguageTag::Hi => "HI",
            LanguageTag::Ta => "TA",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TAMIL_BLOCK: RangeInclusive<char> = '\u{0B80}'..='\u{0BFF}';
const DEVANAGARI_BLOCK: RangeInclusive<char> = '\u{0900}'..='\u{097F}';

const HINDI_MARKERS: &[&str] = &["mujhe", "mera", "meri", "hai", "nahi", "kyun", "kaise"];
const TAMIL_MARKERS: &[&str] = &[
    "ennaku",
    "enna",
    "iruku",
    "romba",
    "valikuthu",
    "seiyanum",
];

static HINDI_MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| marker_pattern(HINDI_MARKERS));
static TAMIL_MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| marker_pattern(TAMIL_MARKERS));

/// Builds `\b(?:w1|w2|...)\b` from literal marker words.
fn marker_pattern(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation))
        .expect("escaped marker literals always form a valid pattern")
}

/// How a rule inspects the text.
enum Matcher {
    /// Any code point inside the block, checked on the raw text.
    Script(RangeInclusive<char>),
    /// Whole-word marker, checked on the lowercased, trimmed text.
    Markers(&'static Lazy<Regex>),
}

struct Rule {
    matcher: Matcher,
    tag: LanguageTag,
}

impl Rule {
    fn matches(&self, raw: &str, normalized: &str) -> bool {
        match &self.matcher {
            Matcher::Script(block) => raw.chars().any(|c| block.contains(&c)),
            Matcher::Markers(pattern) => pattern.is_match(normalized),
        }
    }
}

static RULES: Lazy<[Rule; 4]> = Lazy::new(|| {
    [
        Rule {
            matcher: Matcher::Script(TAMIL_BLOCK),
            tag: LanguageTag::Ta,
        },
        Rule {
            matcher: Matcher::Script(DEVANAGARI_BLOCK),
            tag: LanguageTag::Hi,
        },
        Rule {
            matcher: Matcher::Markers(&HINDI_MARKER_PATTERN),
            tag: LanguageTag::Hi,
        },
        Rule {
            matcher: Matcher::Markers(&TAMIL_MARKER_PATTERN),
            tag: LanguageTag::Ta,
        },
    ]
});

/// Picks the reply language for a user message.
///
/// Never fails: empty or absent input resolves to [`LanguageTag::En`].
pub fn classify<'a>(text: impl Into<Option<&'a str>>) -> LanguageTag {
    let raw = match text.into() {
        Some(t) if !t.is_empty() => t,
        _ => return LanguageTag::En,
    };
    let normalized = raw.trim().to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.matches(raw, &normalized))
        .map(|rule| rule.tag)
        .unwrap_or_default()
}
