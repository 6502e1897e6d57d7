//! Shared fixtures for integration tests.
#![allow(dead_code)] // not every suite uses every fixture

use quern::{Record, Table};
use serde_json::Value;

/// Turn a `json!` object literal into a record.
pub fn record(value: Value) -> Record {
    value
        .as_object()
        .expect("test fixture records are JSON objects")
        .clone()
}

/// Build a table straight from `json!` object literals.
pub fn table_of(values: &[Value]) -> Table {
    Table::new(values.iter().cloned().map(record).collect())
}

/// A small blog-shaped corpus used across the integration suites.
pub fn blog_table() -> Table {
    table_of(&[
        serde_json::json!({
            "slug": "alpine-light",
            "title": "Alpine Light",
            "body": "Photography above the treeline rewards patience. The alpine light shifts fast.",
            "category": "photography",
            "words": 612,
        }),
        serde_json::json!({
            "slug": "lens-care",
            "title": "Caring for Lenses",
            "body": "Mountain dust is hard on camera lenses. Clean them nightly.",
            "category": "photography",
            "words": 431,
        }),
        serde_json::json!({
            "slug": "trail-food",
            "title": "Trail Food That Works",
            "body": "Dense calories beat fancy meals above three thousand meters.",
            "category": "hiking",
            "words": 388,
        }),
    ])
}
