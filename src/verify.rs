//! Well-formedness checks for a table/index pair.
//!
//! The engine itself never errors at runtime: malformed records degrade to
//! empty text, empty queries match nothing. The one failure class left is a
//! caller contract violation: pairing an index with a table it was not built
//! from, or handing the engine an index something else has corrupted. Those
//! are programmer errors, and this module is how tests and debug paths catch
//! them early instead of reading garbage scores.
//!
//! Release-path entry points carry only `debug_assert!`s; these checks are
//! the explicit, reportable version.

use crate::index::SearchIndex;
use crate::table::Table;
use crate::tokenizer::is_stop_word;
use thiserror::Error;

/// Why a table/index pair failed verification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantError {
    #[error("index covers {index_docs} documents but the table holds {table_docs}")]
    DocCountMismatch {
        index_docs: usize,
        table_docs: usize,
    },

    #[error("length table holds {lengths} entries for {docs} documents")]
    LengthTableMismatch { lengths: usize, docs: usize },

    #[error("term {term:?} posts document {doc_id}, beyond the corpus of {docs}")]
    PostingOutOfBounds {
        term: String,
        doc_id: usize,
        docs: usize,
    },

    #[error("term {term:?} records a zero frequency for document {doc_id}")]
    ZeroTermFrequency { term: String, doc_id: usize },

    #[error("vocabulary contains forbidden term {term:?}")]
    ForbiddenTerm { term: String },

    #[error("stored average document length {stored} differs from recomputed {expected}")]
    AverageLengthDrift { stored: f64, expected: f64 },
}

/// Verify that `index` is internally consistent and was plausibly built from
/// `table`.
///
/// Checks, in order:
/// - document counts line up across table, index, and length statistics;
/// - every posting points at a document inside the corpus, with a frequency
///   of at least one;
/// - no empty-string or stop-word keys leaked into the vocabulary;
/// - the stored average document length matches the length statistics.
///
/// Returns the first violation found.
pub fn check_index_well_formed(table: &Table, index: &SearchIndex) -> Result<(), InvariantError> {
    if index.doc_count != table.len() {
        return Err(InvariantError::DocCountMismatch {
            index_docs: index.doc_count,
            table_docs: table.len(),
        });
    }

    if index.doc_lengths.len() != index.doc_count {
        return Err(InvariantError::LengthTableMismatch {
            lengths: index.doc_lengths.len(),
            docs: index.doc_count,
        });
    }

    for (term, postings) in &index.terms {
        if term.is_empty() || is_stop_word(term) {
            return Err(InvariantError::ForbiddenTerm { term: term.clone() });
        }
        for (&doc_id, &term_freq) in postings {
            if doc_id >= index.doc_count {
                return Err(InvariantError::PostingOutOfBounds {
                    term: term.clone(),
                    doc_id,
                    docs: index.doc_count,
                });
            }
            if term_freq == 0 {
                return Err(InvariantError::ZeroTermFrequency {
                    term: term.clone(),
                    doc_id,
                });
            }
        }
    }

    let expected = if index.doc_count == 0 {
        0.0
    } else {
        let total: u64 = index.doc_lengths.iter().map(|&len| u64::from(len)).sum();
        total as f64 / index.doc_count as f64
    };
    if (index.avg_doc_length - expected).abs() > 1e-9 {
        return Err(InvariantError::AverageLengthDrift {
            stored: index.avg_doc_length,
            expected,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;
    use serde_json::json;

    fn fixture() -> (Table, SearchIndex) {
        let table = Table::new(vec![
            json!({"text": "hello world"}).as_object().unwrap().clone(),
            json!({"text": "the quick fox"}).as_object().unwrap().clone(),
        ]);
        let index = build_index(&table, &["text"]);
        (table, index)
    }

    #[test]
    fn test_freshly_built_index_verifies() {
        let (table, index) = fixture();
        assert_eq!(check_index_well_formed(&table, &index), Ok(()));
    }

    #[test]
    fn test_empty_pair_verifies() {
        let table = Table::default();
        let index = build_index(&table, &["text"]);
        assert_eq!(check_index_well_formed(&table, &index), Ok(()));
    }

    #[test]
    fn test_detects_foreign_table() {
        let (_, index) = fixture();
        let other = Table::new(vec![json!({"text": "lone"}).as_object().unwrap().clone()]);
        assert!(matches!(
            check_index_well_formed(&other, &index),
            Err(InvariantError::DocCountMismatch { .. })
        ));
    }

    #[test]
    fn test_detects_out_of_bounds_posting() {
        let (table, mut index) = fixture();
        index.terms.get_mut("hello").unwrap().insert(99, 1);
        assert!(matches!(
            check_index_well_formed(&table, &index),
            Err(InvariantError::PostingOutOfBounds { doc_id: 99, .. })
        ));
    }

    #[test]
    fn test_detects_zero_frequency() {
        let (table, mut index) = fixture();
        index.terms.get_mut("hello").unwrap().insert(1, 0);
        assert!(matches!(
            check_index_well_formed(&table, &index),
            Err(InvariantError::ZeroTermFrequency { .. })
        ));
    }

    #[test]
    fn test_detects_stop_word_in_vocabulary() {
        let (table, mut index) = fixture();
        index.terms.insert("the".to_string(), [(0, 1)].into());
        assert!(matches!(
            check_index_well_formed(&table, &index),
            Err(InvariantError::ForbiddenTerm { .. })
        ));
    }

    #[test]
    fn test_detects_average_drift() {
        let (table, mut index) = fixture();
        index.avg_doc_length += 1.0;
        assert!(matches!(
            check_index_well_formed(&table, &index),
            Err(InvariantError::AverageLengthDrift { .. })
        ));
    }
}
