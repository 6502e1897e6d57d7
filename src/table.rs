//! Immutable record tables.
//!
//! A [`Table`] is an ordered, fixed-length sequence of records. The position
//! of a record is its permanent document id for the lifetime of the table and
//! of every index built from it; no API exists to add, remove, or reorder
//! records. "Updating" a corpus means building a fresh `Table` (and index)
//! from a new record sequence and dropping the old pair.
//!
//! Records are plain field-name-to-value mappings with string, number,
//! boolean, or null values. Nothing about their shape is validated; a
//! malformed record simply produces absent fields later.

use crate::query::Query;
use serde_json::Value;
use std::borrow::Cow;

/// One row of a table: field name → JSON value.
pub type Record = serde_json::Map<String, Value>;

/// An ordered, immutable sequence of uniform records.
///
/// Safe to share across threads once built; every operation over a table
/// reads it immutably.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Build a table from records, stored verbatim in order.
    ///
    /// Accepts any record sequence and never fails; the engine reads whatever
    /// fields it needs later and tolerates missing ones.
    pub fn new(records: Vec<Record>) -> Self {
        Table { records }
    }

    /// The full record sequence, in document-id order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Look up a record by document id.
    pub fn get(&self, doc_id: usize) -> Option<&Record> {
        self.records.get(doc_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Start a query over this table.
    pub fn query(&self) -> Query<'_> {
        Query::over(self)
    }
}

impl From<Vec<Record>> for Table {
    fn from(records: Vec<Record>) -> Self {
        Table::new(records)
    }
}

/// Read a record field as text.
///
/// Strings pass through unchanged; numbers and booleans render in their
/// canonical display form; null, absent, and structured values read as empty.
/// This is how the index builder and the highlighter see field content, so a
/// column missing from a record yields an empty token stream rather than an
/// error.
pub(crate) fn field_text<'a>(record: &'a Record, field: &str) -> Cow<'a, str> {
    match record.get(field) {
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
        _ => Cow::Borrowed(""),
    }
}
