//! Deterministic text normalisation for the inference pipeline.
//!
//! Cleans a raw document in a fixed order: digit runs, mis-escaped newline
//! artefacts, punctuation, then a light English pipeline that tokenises,
//! lemmatises, and drops stopwords. The result is the canonical form consumed
//! by the feature extractor.
//!
//! Normalisation is a projection: running it twice yields the same string as
//! running it once. The escaped-newline cleanup runs before punctuation
//! stripping because the latter would consume the backslash and leave a stray
//! `n` glued to the surrounding words.

use std::convert::Infallible;
use std::sync::LazyLock;

use regex::Regex;

use crate::providers::TextProcessor;

static DIGIT_RUNS_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "pattern is constant and valid")]
    Regex::new(r"\d+").expect("valid regex")
});
static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "pattern is constant and valid")]
    Regex::new(r"[^\s\w]").expect("valid regex")
});

/// Literal two-character sequence left behind when a newline is escaped into
/// the document text instead of encoded as a real line break.
const ESCAPED_NEWLINE: &str = "\\n";

/// Closed-class English stopwords dropped from the normalised document.
/// Filtering applies to the raw token and to its lemma, so the output never
/// contains a stopword and normalisation stays idempotent.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "between", "both", "but", "by", "can", "could", "did",
    "do", "does", "down", "during", "each", "few", "for", "from", "further", "had", "has", "have",
    "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "may", "me", "might", "more", "most", "my", "no", "nor", "not", "now", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "would", "you", "your", "yours",
];

/// Tokens the plural rules must leave untouched.
const LEMMA_EXCEPTIONS: &[&str] = &[
    "always", "its", "news", "perhaps", "species", "this", "was",
];

/// Suffixes marking a sibilant plural where the whole `es` is stripped.
const SIBILANT_PLURALS: &[&str] = &["ches", "shes", "sses", "xes", "zes"];

/// Normaliser for raw document text.
///
/// Pure and deterministic; holds no state beyond the fixed stopword and
/// lemma resources compiled into the crate.
///
/// # Examples
///
/// ```
/// use topcat::Normalizer;
///
/// let normalizer = Normalizer::default();
/// assert_eq!(
///     normalizer.normalize("The 3 jaguars, clearly!"),
///     "jaguar clearly",
/// );
/// ```
#[derive(Default, Debug, Clone)]
pub struct Normalizer;

impl Normalizer {
    /// Produce the canonical form of `input`.
    ///
    /// An input that normalises to the empty string is a valid result and
    /// flows through the rest of the pipeline without special-casing.
    ///
    /// # Examples
    ///
    /// ```
    /// use topcat::Normalizer;
    ///
    /// let normalizer = Normalizer::default();
    /// assert_eq!(normalizer.normalize("42 ?!"), "");
    /// ```
    #[must_use]
    pub fn normalize(&self, input: &str) -> String {
        let without_digits = DIGIT_RUNS_RE.replace_all(input, "");
        let without_escapes = without_digits.replace(ESCAPED_NEWLINE, "");
        let without_punctuation = NON_WORD_RE.replace_all(&without_escapes, "");
        let lemmas: Vec<String> = without_punctuation
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|token| !is_stopword(token))
            .map(|token| lemmatise(&token))
            .filter(|lemma| !is_stopword(lemma))
            .collect();
        lemmas.join(" ")
    }
}

impl TextProcessor for Normalizer {
    type Output = String;
    type Error = Infallible;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        Ok(self.normalize(input))
    }
}

fn is_stopword(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Reduce an inflected English token to a base form.
///
/// Deliberately light: plural suffixes only, mirroring what the feature
/// space was fitted against. Applying the rules twice changes nothing.
///
/// # Examples
///
/// ```
/// use topcat::normalizer::lemmatise;
///
/// assert_eq!(lemmatise("bodies"), "body");
/// assert_eq!(lemmatise("churches"), "church");
/// assert_eq!(lemmatise("jaguars"), "jaguar");
/// assert_eq!(lemmatise("glass"), "glass");
/// ```
#[must_use]
pub fn lemmatise(token: &str) -> String {
    if LEMMA_EXCEPTIONS.contains(&token) {
        return token.to_string();
    }
    if token.len() > 4 {
        if let Some(stem) = token.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    if token.len() > 3
        && SIBILANT_PLURALS
            .iter()
            .any(|suffix| token.ends_with(suffix))
    {
        if let Some(stem) = token.strip_suffix("es") {
            return stem.to_string();
        }
    }
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        return token.trim_end_matches('s').to_string();
    }
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("The 3 jaguars, clearly!", "jaguar clearly")]
    #[case("Markets rallied 12% today", "market rallied today")]
    #[case("stray\\nescape", "strayescape")]
    #[case("12345 ?!", "")]
    #[case("", "")]
    #[case("   \t ", "")]
    #[case("Churches and bodies", "church body")]
    fn normalises_expected(#[case] input: &str, #[case] expected: &str) {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize(input), expected);
    }

    #[rstest]
    #[case("The 3 jaguars, clearly!")]
    #[case("Striking theses about glasses")]
    #[case("goals scored in both matches")]
    #[case("")]
    fn normalisation_is_idempotent(#[case] input: &str) {
        let normalizer = Normalizer::default();
        let once = normalizer.normalize(input);
        assert_eq!(normalizer.normalize(&once), once);
    }

    #[rstest]
    #[case("bodies", "body")]
    #[case("classes", "class")]
    #[case("boxes", "box")]
    #[case("jaguars", "jaguar")]
    #[case("glass", "glass")]
    #[case("ties", "tie")]
    #[case("news", "news")]
    #[case("is", "is")]
    fn lemmatises_tokens(#[case] token: &str, #[case] expected: &str) {
        assert_eq!(lemmatise(token), expected);
    }

    #[test]
    fn output_never_contains_stopwords() {
        let normalizer = Normalizer::default();
        let normalized = normalizer.normalize("These theses are the most striking ones");
        for token in normalized.split_whitespace() {
            assert!(!is_stopword(token), "stopword {token} survived");
        }
    }
}
