//! Search index construction.
//!
//! An index is built once from a table and a set of text-bearing fields, and
//! read-only thereafter. A changed corpus means building a fresh index; there
//! is no incremental update path.
//!
//! The index stores document ids and counts only, never record content. At
//! search time it must be paired with the same table it was built from; the
//! document ids are positions into that table's record sequence.
//!
//! Invariants the builder maintains (checked by [`crate::verify`]):
//! - only word-like, non-stop-word tokens become vocabulary terms;
//! - stop words still count toward every document's length;
//! - `doc_lengths` has exactly one entry per document, in table order;
//! - `avg_doc_length` is the arithmetic mean of `doc_lengths`
//!   (0.0 for an empty table).

use crate::table::{field_text, Record, Table};
use crate::tokenizer::tokenize;
use crate::utils::normalize;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// An inverted index with per-document and corpus-wide length statistics.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    /// Vocabulary term → (document id → term frequency).
    pub terms: HashMap<String, HashMap<usize, u32>>,
    /// Word-like token count per document, stop words included.
    pub doc_lengths: Vec<u32>,
    /// Arithmetic mean of `doc_lengths`; 0.0 when the table was empty.
    pub avg_doc_length: f64,
    /// Number of documents the index was built over.
    pub doc_count: usize,
}

impl SearchIndex {
    /// Number of documents containing `term`.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.terms.get(term).map_or(0, HashMap::len)
    }

    /// All vocabulary terms, in no particular order.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }
}

/// Build a search index over the named fields of `table`.
///
/// Documents are processed in table order. Each field's value is read as
/// text and tokenized; word-like tokens (stop words included) accumulate
/// into the document's length, and every word-like, non-stop-word token is
/// normalized and counted into the inverted index. Fields absent from a
/// record contribute nothing, silently.
///
/// # Example
///
/// ```
/// use quern::{build_index, Table};
/// use serde_json::json;
///
/// let table = Table::new(vec![
///     json!({"title": "Hello World"}).as_object().unwrap().clone(),
/// ]);
/// let index = build_index(&table, &["title"]);
///
/// assert_eq!(index.doc_count, 1);
/// assert_eq!(index.doc_freq("hello"), 1);
/// ```
pub fn build_index(table: &Table, fields: &[&str]) -> SearchIndex {
    let per_doc: Vec<DocumentTerms> = table
        .records()
        .iter()
        .map(|record| document_terms(record, fields))
        .collect();

    merge(per_doc)
}

/// Build a search index using a parallel map over documents.
///
/// Tokenization is the expensive half of index construction and is
/// independent per document, so the map phase runs on the rayon pool; the
/// reduce phase merges per-document term maps sequentially. Output is
/// identical to [`build_index`].
#[cfg(feature = "parallel")]
pub fn build_index_parallel(table: &Table, fields: &[&str]) -> SearchIndex {
    let per_doc: Vec<DocumentTerms> = table
        .records()
        .par_iter()
        .map(|record| document_terms(record, fields))
        .collect();

    merge(per_doc)
}

/// Sequential fallback when the `parallel` feature is off.
#[cfg(not(feature = "parallel"))]
pub fn build_index_parallel(table: &Table, fields: &[&str]) -> SearchIndex {
    build_index(table, fields)
}

/// Term frequencies and word count for a single document.
struct DocumentTerms {
    frequencies: HashMap<String, u32>,
    word_count: u32,
}

fn document_terms(record: &Record, fields: &[&str]) -> DocumentTerms {
    let mut frequencies: HashMap<String, u32> = HashMap::new();
    let mut word_count = 0u32;

    for &field in fields {
        let text = field_text(record, field);
        let stream = tokenize(&text);
        word_count += stream.word_count as u32;
        for token in &stream.tokens {
            if token.is_indexable() {
                *frequencies.entry(normalize(token.text)).or_insert(0) += 1;
            }
        }
    }

    DocumentTerms {
        frequencies,
        word_count,
    }
}

fn merge(per_doc: Vec<DocumentTerms>) -> SearchIndex {
    let doc_count = per_doc.len();
    let mut terms: HashMap<String, HashMap<usize, u32>> = HashMap::new();
    let mut doc_lengths = Vec::with_capacity(doc_count);

    for (doc_id, doc) in per_doc.into_iter().enumerate() {
        doc_lengths.push(doc.word_count);
        for (term, tf) in doc.frequencies {
            terms.entry(term).or_default().insert(doc_id, tf);
        }
    }

    let total_words: u64 = doc_lengths.iter().map(|&len| u64::from(len)).sum();
    let avg_doc_length = if doc_count == 0 {
        0.0
    } else {
        total_words as f64 / doc_count as f64
    };

    debug!(
        documents = doc_count,
        vocabulary = terms.len(),
        avg_doc_length,
        "built search index"
    );

    SearchIndex {
        terms,
        doc_lengths,
        avg_doc_length,
        doc_count,
    }
}
