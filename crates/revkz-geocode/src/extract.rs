//! House-number and street-keyword extraction from free-text addresses.
//!
//! Both extractors sit behind traits so [`crate::AddressVerifier`] does not
//! depend on the matching strategy.

use std::collections::HashSet;

use regex::Regex;

use crate::normalize::{fold_case, normalize_whitespace};
use crate::types::StreetKeywords;

/// Address-type words that never identify a street on their own.
pub const ADDRESS_STOPWORDS: [&str; 16] = [
    "ул",
    "улица",
    "пр",
    "проспект",
    "пр-т",
    "просп",
    "площадь",
    "пл",
    "мкр",
    "микрорайон",
    "дом",
    "д",
    "корпус",
    "к",
    "строение",
    "с",
];

/// 1-5 ASCII digits, an optional 1-3 letter suffix (Latin or any Cyrillic,
/// Kazakh letters included), an optional `/` or `-` sub-number of 1-3
/// digits, as a whole word. Applied to case-folded text.
const HOUSE_NUMBER_PATTERN: &str =
    r"\b([0-9]{1,5}(?:[a-z\p{Cyrillic}]{1,3})?(?:[/-][0-9]{1,3})?)\b";

const MIN_KEYWORD_CHARS: usize = 3;

pub trait HouseNumberExtractor: Send + Sync {
    /// Returns the first house-number token in `address`, before
    /// canonicalization, or `None` when the address has none.
    fn extract(&self, address: &str) -> Option<String>;
}

pub trait StreetKeywordExtractor: Send + Sync {
    /// Returns the significant street-name tokens of `address`.
    fn extract(&self, address: &str) -> StreetKeywords;
}

/// Boundary-anchored numeric-token scan.
///
/// The first token wins, so in `"Абая 10, кв. 5"` the result is `"10"`,
/// while an apartment number written before the building number would be
/// picked instead.
#[derive(Debug, Clone)]
pub struct RegexHouseNumberExtractor {
    pattern: Regex,
}

impl RegexHouseNumberExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(HOUSE_NUMBER_PATTERN).expect("valid house number regex"),
        }
    }
}

impl Default for RegexHouseNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HouseNumberExtractor for RegexHouseNumberExtractor {
    fn extract(&self, address: &str) -> Option<String> {
        let folded = fold_case(&normalize_whitespace(address));
        self.pattern
            .captures(&folded)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

/// Splits the address into words and keeps those that are long enough and
/// not address-type stopwords. Digits and `.,;:()` act as separators.
#[derive(Debug, Clone)]
pub struct StopwordKeywordExtractor {
    stopwords: HashSet<String>,
}

impl StopwordKeywordExtractor {
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|w| fold_case(w.as_ref().trim()))
                .collect(),
        }
    }
}

impl Default for StopwordKeywordExtractor {
    fn default() -> Self {
        Self::new(ADDRESS_STOPWORDS)
    }
}

impl StreetKeywordExtractor for StopwordKeywordExtractor {
    fn extract(&self, address: &str) -> StreetKeywords {
        let separated: String = fold_case(address)
            .chars()
            .map(|c| {
                if c.is_ascii_digit() || matches!(c, '.' | ',' | ';' | ':' | '(' | ')') {
                    ' '
                } else {
                    c
                }
            })
            .collect();

        separated
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS)
            .filter(|w| !self.stopwords.contains(*w))
            .map(str::to_string)
            .collect()
    }
}
