//! Word-boundary tokenization.
//!
//! Text is split into segments along UAX#29 word boundaries. Every byte of the
//! input survives: concatenating the segments of a token stream reproduces the
//! original string exactly, which is what lets the highlighter re-emit field
//! text without losing spacing or punctuation.
//!
//! Each segment carries two flags:
//! - `word_like`: the segment contains at least one alphanumeric scalar
//!   (letters and digits group into one segment under UAX#29; whitespace and
//!   standalone punctuation come out as their own segments).
//! - `stop_word`: the normalized segment appears in the embedded stop-word
//!   list. Only ever set together with `word_like`.
//!
//! Stop words stay in the stream and count toward `word_count`; whether they
//! are indexed is the index builder's decision, not the tokenizer's.

use crate::utils::normalize;
use std::collections::HashSet;
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;

/// Multilingual stop words loaded from `data/stop_words.json`.
///
/// These words are too common to carry ranking signal, and they cause false
/// positives in fuzzy matching (e.g. "land" is one edit from "and"). The list
/// is a process-wide read-only constant, parsed once on first use.
static STOP_WORDS: LazyLock<HashSet<String>> = LazyLock::new(|| {
    let json = include_str!("../data/stop_words.json");
    parse_stop_words(json)
});

/// Flatten the per-language arrays into a single lookup set.
///
/// Each word is inserted both verbatim and normalized, so lookups succeed
/// whether or not diacritic folding is enabled.
fn parse_stop_words(json: &str) -> HashSet<String> {
    let by_language: std::collections::HashMap<String, Vec<String>> =
        serde_json::from_str(json).expect("embedded stop-word list is valid JSON");

    let mut words = HashSet::new();
    for word in by_language.into_values().flatten() {
        words.insert(normalize(&word));
        words.insert(word);
    }
    words
}

/// Check whether a normalized word is a stop word.
#[inline]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Classification flags for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenFlags {
    /// Segment contains at least one alphanumeric scalar.
    pub word_like: bool,
    /// Normalized segment is in the stop-word list. Implies `word_like`.
    pub stop_word: bool,
}

/// One segment of the input text, borrowed from the original string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub flags: TokenFlags,
}

impl Token<'_> {
    /// True for word-like tokens that are not stop words, i.e. the ones the
    /// index builder turns into vocabulary terms.
    #[inline]
    pub fn is_indexable(&self) -> bool {
        self.flags.word_like && !self.flags.stop_word
    }
}

/// A tokenized string: the full lossless segment sequence plus the count of
/// word-like segments (stop words included).
#[derive(Debug, Clone, Default)]
pub struct TokenStream<'a> {
    pub tokens: Vec<Token<'a>>,
    pub word_count: usize,
}

/// Split `text` along UAX#29 word boundaries and classify each segment.
///
/// Pure and deterministic; the only state consulted is the fixed stop-word
/// list.
///
/// # Example
///
/// ```
/// use quern::tokenize;
///
/// let stream = tokenize("The blue dogs.");
/// let words: Vec<&str> = stream
///     .tokens
///     .iter()
///     .filter(|t| t.flags.word_like)
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(words, vec!["The", "blue", "dogs"]);
/// assert_eq!(stream.word_count, 3);
/// ```
pub fn tokenize(text: &str) -> TokenStream<'_> {
    let mut tokens = Vec::new();
    let mut word_count = 0;

    for segment in text.split_word_bounds() {
        let word_like = segment.chars().any(char::is_alphanumeric);
        let stop_word = word_like && is_stop_word(&normalize(segment));
        if word_like {
            word_count += 1;
        }
        tokens.push(Token {
            text: segment,
            flags: TokenFlags {
                word_like,
                stop_word,
            },
        });
    }

    TokenStream { tokens, word_count }
}
