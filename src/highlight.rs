//! Match highlighting over ranked results.
//!
//! Both entry points re-tokenize the matched record's fields on demand and
//! annotate tokens against the result's matched-terms set. Nothing here is
//! stored: a highlight is a fresh, per-call view over the table's text.
//!
//! [`highlight_fields`] is lossless: concatenating the fragments of a field
//! reproduces that field's text byte for byte. [`snippet`] instead emits a
//! bounded window around the first match, padded with a few preceding words
//! and cut off after a fixed number of words.

use crate::search::SearchResult;
use crate::table::{field_text, Record};
use crate::tokenizer::tokenize;
use crate::utils::normalize;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// A run of text plus whether it was matched by the search.
///
/// Non-word fragments (spacing, punctuation) are never matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub matched: bool,
}

impl Fragment {
    fn new(text: &str, matched: bool) -> Self {
        Fragment {
            text: text.to_string(),
            matched,
        }
    }
}

/// Options for [`snippet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetOptions {
    /// Number of word-like tokens in the window, first match included.
    pub match_length: usize,
    /// Maximum number of word-like tokens shown before the first match.
    pub pad_start: usize,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        SnippetOptions {
            match_length: 10,
            pad_start: 4,
        }
    }
}

/// Re-tokenize each requested field of the result's record, marking the
/// tokens whose normalized form is one of the result's matched terms.
///
/// The fragment list for a field covers its text completely and in order:
/// concatenating the fragment texts reproduces the field value exactly.
///
/// # Example
///
/// ```
/// use quern::{build_index, highlight_fields, search, Table};
/// use serde_json::json;
///
/// let table = Table::new(vec![
///     json!({"title": "The blue dogs."}).as_object().unwrap().clone(),
/// ]);
/// let index = build_index(&table, &["title"]);
/// let results = search(&table, &index, "dogs");
///
/// let fields = highlight_fields(&results[0], &["title"]);
/// let rebuilt: String = fields["title"].iter().map(|f| f.text.as_str()).collect();
/// assert_eq!(rebuilt, "The blue dogs.");
/// ```
pub fn highlight_fields(
    result: &SearchResult<'_>,
    fields: &[&str],
) -> HashMap<String, Vec<Fragment>> {
    let matched = matched_set(result);

    fields
        .iter()
        .map(|&field| {
            let text = field_text(result.record, field);
            let fragments = tokenize(&text)
                .tokens
                .iter()
                .map(|token| {
                    Fragment::new(token.text, is_match(token.text, token.flags.word_like, &matched))
                })
                .collect();
            (field.to_string(), fragments)
        })
        .collect()
}

/// Produce one bounded window of fragments spanning the given fields.
///
/// The fields are scanned in order as a single token stream. Up to
/// `pad_start` word-like tokens preceding the first matched token are kept as
/// context (with their trailing spacing and punctuation attached); from the
/// first match on, every token is emitted until `match_length` word-like
/// tokens have been emitted, counting the match itself. Spacing and
/// punctuation trailing the last counted word are retained.
///
/// When none of the given fields contains a matched token (possible when
/// highlighting different fields than were indexed), the window falls back to
/// the leading `match_length` words of the first field, with nothing marked.
pub fn snippet(
    result: &SearchResult<'_>,
    fields: &[&str],
    options: &SnippetOptions,
) -> Vec<Fragment> {
    if options.match_length == 0 {
        return Vec::new();
    }

    let matched = matched_set(result);

    // Each pending entry is one pre-match word plus its trailing non-word
    // tokens; the deque keeps the last pad_start words before the match, and
    // one extra slot so the match itself can join before the flush
    let mut pending: VecDeque<Vec<Fragment>> = VecDeque::new();
    let capacity = options.pad_start + 1;

    let mut window: Vec<Fragment> = Vec::new();
    let mut in_window = false;
    let mut words_emitted = 0usize;

    'fields: for &field in fields {
        let text = field_text(result.record, field);
        for token in tokenize(&text).tokens {
            if in_window {
                if token.flags.word_like {
                    if words_emitted == options.match_length {
                        break 'fields;
                    }
                    words_emitted += 1;
                    window.push(Fragment::new(token.text, is_match(token.text, true, &matched)));
                } else {
                    // Trailing punctuation and spacing ride along uncounted
                    window.push(Fragment::new(token.text, false));
                }
                continue;
            }

            if token.flags.word_like {
                let hit = is_match(token.text, true, &matched);
                if pending.len() == capacity {
                    pending.pop_front();
                }
                pending.push_back(vec![Fragment::new(token.text, hit)]);

                if hit {
                    for entry in pending.drain(..) {
                        window.extend(entry);
                    }
                    in_window = true;
                    // Only the window from the match onward counts; the
                    // flushed padding does not
                    words_emitted = 1;
                }
            } else if let Some(last) = pending.back_mut() {
                last.push(Fragment::new(token.text, false));
            }
        }
    }

    if !in_window {
        return leading_window(result.record, fields.first().copied(), options.match_length);
    }
    window
}

/// Fallback window: the leading `match_length` words of `field`, trailing
/// non-word tokens included, nothing marked.
fn leading_window(record: &Record, field: Option<&str>, match_length: usize) -> Vec<Fragment> {
    let Some(field) = field else {
        return Vec::new();
    };

    let text = field_text(record, field);
    let mut window = Vec::new();
    let mut words_emitted = 0usize;

    for token in tokenize(&text).tokens {
        if token.flags.word_like {
            if words_emitted == match_length {
                break;
            }
            words_emitted += 1;
        }
        window.push(Fragment::new(token.text, false));
    }
    window
}

fn matched_set<'a>(result: &'a SearchResult<'_>) -> HashSet<&'a str> {
    result.matched_terms.iter().map(String::as_str).collect()
}

#[inline]
fn is_match(text: &str, word_like: bool, matched: &HashSet<&str>) -> bool {
    word_like && matched.contains(normalize(text).as_str())
}
