//! A fluent query builder over tables.
//!
//! Queries accumulate configuration through chained by-value calls and do no
//! work until [`Query::execute`]. The builder is a plain immutable value:
//! each call consumes it and returns the extended one, so a configured query
//! can't be mutated out from under a concurrent reader.
//!
//! Output rows come back in table order. That ordering is a contract, not an
//! accident: pagination and highlighting downstream rely on a stable row
//! order across executions.

use crate::table::{Record, Table};
use serde_json::Value;

type Predicate<'a> = Box<dyn Fn(&Record) -> bool + 'a>;
type Computed<'a> = Box<dyn Fn(&Record) -> Value + 'a>;

/// A lazily-evaluated query pipeline: filter → select → compute → limit.
///
/// # Example
///
/// ```
/// use quern::Table;
/// use serde_json::json;
///
/// let table = Table::new(
///     [json!({"name": "wren", "weight": 10}), json!({"name": "heron", "weight": 2200})]
///         .map(|v| v.as_object().unwrap().clone())
///         .to_vec(),
/// );
///
/// let rows = table
///     .query()
///     .filter(|r| r["weight"].as_i64().unwrap_or(0) > 100)
///     .select(["name"])
///     .execute();
///
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0]["name"], json!("heron"));
/// ```
pub struct Query<'a> {
    table: &'a Table,
    predicate: Option<Predicate<'a>>,
    selected: Option<Vec<String>>,
    computed: Vec<(String, Computed<'a>)>,
    limit: usize,
}

impl<'a> Query<'a> {
    /// Start an empty query over `table`: no predicate, all fields of the
    /// first record, no computed fields, limit = full table length.
    pub fn over(table: &'a Table) -> Self {
        Query {
            table,
            predicate: None,
            selected: None,
            computed: Vec::new(),
            limit: table.len(),
        }
    }

    /// Keep only records for which `predicate` returns true.
    ///
    /// At most one predicate is active: a later call replaces the earlier
    /// one. Callers wanting conjunctions compose them in a single closure.
    pub fn filter(mut self, predicate: impl Fn(&Record) -> bool + 'a) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Restrict output rows to the named fields.
    ///
    /// Without a `select`, rows carry the fields observed on the table's
    /// first record (none for an empty table). A selected field absent on a
    /// record is omitted from that row.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Append a computed field, derived from the source record after
    /// selection.
    ///
    /// Computed fields are independent of each other: each one sees the
    /// original record, never another computed field's output.
    pub fn with(mut self, field: impl Into<String>, compute: impl Fn(&Record) -> Value + 'a) -> Self {
        self.computed.push((field.into(), Box::new(compute)));
        self
    }

    /// Cap the number of returned rows.
    ///
    /// Negative values are ignored and leave the previous limit in place;
    /// `limit(0)` yields an empty result.
    pub fn limit(mut self, n: isize) -> Self {
        if n >= 0 {
            self.limit = n as usize;
        }
        self
    }

    /// Materialize the query.
    ///
    /// Walks records in table order, skips those failing the predicate,
    /// projects the selected fields, appends computed fields, and stops once
    /// the limit is reached. Never errors: missing fields are simply absent
    /// from the affected rows.
    pub fn execute(&self) -> Vec<Record> {
        if self.limit == 0 {
            return Vec::new();
        }

        let selected: Vec<String> = match &self.selected {
            Some(fields) => fields.clone(),
            None => self
                .table
                .records()
                .first()
                .map(|first| first.keys().cloned().collect())
                .unwrap_or_default(),
        };

        let mut rows = Vec::new();
        for record in self.table.records() {
            if let Some(predicate) = &self.predicate {
                if !predicate(record) {
                    continue;
                }
            }

            let mut row = Record::new();
            for field in &selected {
                if let Some(value) = record.get(field) {
                    row.insert(field.clone(), value.clone());
                }
            }
            for (field, compute) in &self.computed {
                row.insert(field.clone(), compute(record));
            }

            rows.push(row);
            if rows.len() == self.limit {
                break;
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number_table(n: usize) -> Table {
        let records = (0..n)
            .map(|i| {
                json!({"n": i, "even": i % 2 == 0})
                    .as_object()
                    .unwrap()
                    .clone()
            })
            .collect();
        Table::new(records)
    }

    #[test]
    fn test_execute_without_configuration_returns_all_rows() {
        let table = number_table(4);
        let rows = table.query().execute();
        assert_eq!(rows.len(), 4);
        let ns: Vec<u64> = rows.iter().map(|r| r["n"].as_u64().unwrap()).collect();
        assert_eq!(ns, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_filter_keeps_table_order() {
        let table = number_table(10);
        let rows = table
            .query()
            .filter(|r| r["even"].as_bool().unwrap())
            .execute();
        let ns: Vec<u64> = rows.iter().map(|r| r["n"].as_u64().unwrap()).collect();
        assert_eq!(ns, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_later_filter_replaces_earlier() {
        let table = number_table(6);
        let rows = table
            .query()
            .filter(|r| r["even"].as_bool().unwrap())
            .filter(|r| r["n"].as_u64().unwrap() >= 3)
            .execute();
        // Only the second predicate applies
        let ns: Vec<u64> = rows.iter().map(|r| r["n"].as_u64().unwrap()).collect();
        assert_eq!(ns, vec![3, 4, 5]);
    }

    #[test]
    fn test_select_projects_fields() {
        let table = number_table(2);
        let rows = table.query().select(["n"]).execute();
        assert_eq!(rows[0].len(), 1);
        assert!(rows[0].contains_key("n"));
        assert!(!rows[0].contains_key("even"));
    }

    #[test]
    fn test_select_missing_field_is_omitted() {
        let table = number_table(2);
        let rows = table.query().select(["n", "ghost"]).execute();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains_key("n"));
        assert!(!rows[0].contains_key("ghost"));
    }

    #[test]
    fn test_default_selection_follows_first_record() {
        let records = vec![
            json!({"a": 1}).as_object().unwrap().clone(),
            json!({"a": 2, "b": 3}).as_object().unwrap().clone(),
        ];
        let table = Table::new(records);
        let rows = table.query().execute();
        // "b" is not on the first record, so it is not selected
        assert!(!rows[1].contains_key("b"));
        assert_eq!(rows[1]["a"], json!(2));
    }

    #[test]
    fn test_with_computes_from_source_record() {
        let table = number_table(3);
        let rows = table
            .query()
            .select(["n"])
            .with("doubled", |r| json!(r["n"].as_u64().unwrap() * 2))
            .execute();
        assert_eq!(rows[2]["doubled"], json!(4));
    }

    #[test]
    fn test_computed_fields_are_independent() {
        let table = number_table(1);
        let rows = table
            .query()
            .with("a", |_| json!("first"))
            .with("b", |r| json!(r.get("a").is_none()))
            .execute();
        // "b" reads the source record, where "a" does not exist
        assert_eq!(rows[0]["b"], json!(true));
    }

    #[test]
    fn test_limit_caps_rows() {
        let table = number_table(10);
        assert_eq!(table.query().limit(3).execute().len(), 3);
        assert_eq!(table.query().limit(100).execute().len(), 10);
    }

    #[test]
    fn test_limit_zero_yields_empty() {
        let table = number_table(10);
        assert!(table.query().limit(0).execute().is_empty());
    }

    #[test]
    fn test_negative_limit_is_ignored() {
        let table = number_table(10);
        assert_eq!(table.query().limit(-1).execute().len(), 10);
        assert_eq!(table.query().limit(4).limit(-7).execute().len(), 4);
    }

    #[test]
    fn test_limit_applies_after_filter() {
        let table = number_table(10);
        let rows = table
            .query()
            .filter(|r| r["even"].as_bool().unwrap())
            .limit(2)
            .execute();
        let ns: Vec<u64> = rows.iter().map(|r| r["n"].as_u64().unwrap()).collect();
        assert_eq!(ns, vec![0, 2]);
    }

    #[test]
    fn test_query_over_empty_table() {
        let table = Table::default();
        assert!(table.query().execute().is_empty());
        assert!(table.query().limit(5).execute().is_empty());
    }
}
