//! Embedded in-memory tables with ranked, typo-tolerant full-text search.
//!
//! quern is the data core of a content pipeline: a set of records becomes an
//! immutable [`Table`], tables answer projection queries through a fluent
//! [`Query`] builder, and a [`SearchIndex`] built over a table's text fields
//! answers free-text queries with BM25-ranked, fuzzy-matched results that a
//! [`highlight_fields`] or [`snippet`] call can turn into annotated text.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐      ┌────────────┐      ┌─────────────┐
//! │  table.rs  │─────▶│  query.rs  │      │ tokenizer.rs│
//! │ (Table,    │      │ (filter/   │      │ (UAX#29,    │
//! │  Record)   │      │  select/…) │      │  stop words)│
//! └────────────┘      └────────────┘      └─────────────┘
//!       │                                        │
//!       ▼                                        ▼
//! ┌────────────┐      ┌────────────┐      ┌─────────────┐
//! │  index.rs  │─────▶│ search.rs  │─────▶│ highlight.rs│
//! │ (inverted  │      │ (fuzzy +   │      │ (fragments, │
//! │  index)    │      │  BM25)     │      │  snippets)  │
//! └────────────┘      └────────────┘      └─────────────┘
//! ```
//!
//! Data flows one way: records → table → query results, and records → table →
//! index → ranked results → highlighted fragments. Everything is synchronous
//! and allocation-local; a table and its index can be shared freely across
//! threads once built, because nothing mutates them afterwards. Updating a
//! corpus means building a fresh table/index pair, not patching the old one.
//!
//! # Usage
//!
//! ```
//! use quern::{build_index, highlight_fields, search, Table};
//! use serde_json::json;
//!
//! let table = Table::new(vec![
//!     json!({"title": "Hello World", "body": "An introduction."})
//!         .as_object().unwrap().clone(),
//!     json!({"title": "Goodbye", "body": "A farewell to hello pages."})
//!         .as_object().unwrap().clone(),
//! ]);
//!
//! let index = build_index(&table, &["title", "body"]);
//! let results = search(&table, &index, "hello");
//! assert_eq!(results.len(), 2);
//!
//! let marked = highlight_fields(&results[0], &["title"]);
//! assert!(marked["title"].iter().any(|f| f.matched));
//! ```
//!
//! # What this crate is not
//!
//! There is no persistence, no incremental indexing, no query syntax beyond
//! free text, and no I/O of any kind. Loading records and rendering results
//! belong to the callers on either side.

mod fuzzy;
mod highlight;
mod index;
mod query;
mod search;
mod table;
mod tokenizer;
mod utils;
pub mod verify;

pub use fuzzy::{levenshtein, levenshtein_within};
pub use highlight::{highlight_fields, snippet, Fragment, SnippetOptions};
pub use index::{build_index, build_index_parallel, SearchIndex};
pub use query::Query;
pub use search::{search, search_with, SearchOptions, SearchResult, DEFAULT_MAX_DISTANCE};
pub use table::{Record, Table};
pub use tokenizer::{is_stop_word, tokenize, Token, TokenFlags, TokenStream};
pub use utils::normalize;
pub use verify::{check_index_well_formed, InvariantError};
