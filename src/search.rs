//! Query execution against a search index: fuzzy term matching and BM25
//! ranking.
//!
//! Matching is a naïve scan: every distinct query token is compared against
//! every vocabulary term with a bounded edit distance. That is O(query ×
//! vocabulary) comparisons per search, which is the right trade for the
//! corpora this engine targets (a content site's worth of vocabulary, not a
//! web-scale index). Do not swap in a smarter structure (BK-tree, automaton)
//! casually; a subtly different candidate set changes which near-miss terms
//! rank.
//!
//! # Caller contract
//!
//! `table` must be the same table the index was built from. Pairing an index
//! with a different table is a programmer error: document ids would point at
//! the wrong records and the scores would be garbage. Debug builds assert on
//! the document-count mismatch; release builds do not detect it.

use crate::fuzzy::levenshtein_within;
use crate::index::SearchIndex;
use crate::table::{Record, Table};
use crate::tokenizer::tokenize;
use crate::utils::normalize;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// BM25 term-frequency saturation parameter.
const K1: f64 = 1.5;
/// BM25 document-length normalization parameter.
const B: f64 = 0.75;

/// Default maximum edit distance for fuzzy vocabulary matches.
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// Knobs for the matching phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Vocabulary terms within this many edits of a query token match it;
    /// distance 0 is an exact match and carries no penalty.
    pub max_distance: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

/// One ranked document, borrowing its record from the searched table.
///
/// Produced fresh by every search call; nothing is cached or persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<'a> {
    /// Position of the record in its table.
    pub doc_id: usize,
    /// The matched record itself.
    pub record: &'a Record,
    /// Total BM25 score across all matched terms; always >= 0.
    pub score: f64,
    /// Distinct vocabulary terms (not query tokens) that matched this
    /// document, sorted. The highlighter marks these.
    pub matched_terms: Vec<String>,
}

/// One vocabulary term matching one query token, within one document.
struct TermMatch<'i> {
    term: &'i str,
    term_freq: u32,
    doc_freq: usize,
    distance: usize,
}

/// Search with default options. See [`search_with`].
pub fn search<'a>(table: &'a Table, index: &SearchIndex, query: &str) -> Vec<SearchResult<'a>> {
    search_with(table, index, query, &SearchOptions::default())
}

/// Tokenize `query`, match its terms against the index vocabulary (exact and
/// fuzzy), rank candidate documents with BM25, and return them ordered by
/// descending score.
///
/// Ties are broken by ascending document id, so a repeated search over the
/// same table and index returns an identical result list.
///
/// An empty query (no word-like, non-stop-word tokens) matches nothing,
/// as does any query against an empty table.
pub fn search_with<'a>(
    table: &'a Table,
    index: &SearchIndex,
    query: &str,
    options: &SearchOptions,
) -> Vec<SearchResult<'a>> {
    debug_assert_eq!(
        table.len(),
        index.doc_count,
        "search called with a table the index was not built from"
    );

    // Empty corpus: nothing can match, and the BM25 length normalization
    // must never see avg_doc_length = 0
    if index.doc_count == 0 {
        return Vec::new();
    }

    let query_terms = distinct_query_terms(query);
    // An all-stop-word or all-punctuation query matches nothing; without this
    // guard it would fall through as a zero-term loop over every document
    if query_terms.is_empty() {
        return Vec::new();
    }

    let matches = collect_matches(index, &query_terms, options.max_distance);
    let mut results = rank(table, index, matches);

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });

    debug!(
        query_terms = query_terms.len(),
        results = results.len(),
        "search complete"
    );

    results
}

/// Distinct normalized word-like, non-stop-word tokens of the query, in
/// first-appearance order.
fn distinct_query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(query)
        .tokens
        .iter()
        .filter(|token| token.is_indexable())
        .map(|token| normalize(token.text))
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

/// Matching phase: compare every query term against every vocabulary term,
/// and fan each hit out to the documents containing it.
///
/// A document can accumulate several matches for the same vocabulary term
/// (one per query token within range of it); each contributes to the score
/// independently.
fn collect_matches<'i>(
    index: &'i SearchIndex,
    query_terms: &[String],
    max_distance: usize,
) -> HashMap<usize, Vec<TermMatch<'i>>> {
    let mut matches: HashMap<usize, Vec<TermMatch<'i>>> = HashMap::new();

    for query_term in query_terms {
        for (vocab_term, postings) in &index.terms {
            let Some(distance) = levenshtein_within(query_term, vocab_term, max_distance) else {
                continue;
            };
            let doc_freq = postings.len();
            for (&doc_id, &term_freq) in postings {
                matches.entry(doc_id).or_default().push(TermMatch {
                    term: vocab_term.as_str(),
                    term_freq,
                    doc_freq,
                    distance,
                });
            }
        }
    }

    matches
}

/// Ranking phase: BM25 per match record, fuzzy penalty applied, summed per
/// document.
fn rank<'a>(
    table: &'a Table,
    index: &SearchIndex,
    matches: HashMap<usize, Vec<TermMatch<'_>>>,
) -> Vec<SearchResult<'a>> {
    matches
        .into_iter()
        .map(|(doc_id, term_matches)| {
            let doc_len = f64::from(index.doc_lengths[doc_id]);
            let mut score = 0.0;
            let mut matched: BTreeSet<&str> = BTreeSet::new();

            for m in &term_matches {
                score += term_score(m, doc_len, index);
                matched.insert(m.term);
            }

            SearchResult {
                doc_id,
                record: &table.records()[doc_id],
                score,
                matched_terms: matched.into_iter().map(str::to_owned).collect(),
            }
        })
        .collect()
}

/// BM25 contribution of one matched term, scaled down for fuzzy distance.
///
/// ```text
/// idf   = ln(1 + (N - df + 0.5) / (df + 0.5))
/// score = idf * tf * (k1 + 1) / (tf + k1 * (1 - b + b * docLen / avgDocLen))
/// score *= 1 / (distance + 1)
/// ```
fn term_score(m: &TermMatch<'_>, doc_len: f64, index: &SearchIndex) -> f64 {
    let n = index.doc_count as f64;
    let df = m.doc_freq as f64;
    let tf = f64::from(m.term_freq);

    let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();
    let saturation =
        tf * (K1 + 1.0) / (tf + K1 * (1.0 - B + B * (doc_len / index.avg_doc_length)));

    idf * saturation / (m.distance as f64 + 1.0)
}
