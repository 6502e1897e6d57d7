//! Integration tests for per-field highlighting and snippet windows.

mod common;

use common::{blog_table, table_of};
use quern::{build_index, highlight_fields, search, snippet, SnippetOptions};
use serde_json::json;

fn concat(fragments: &[quern::Fragment]) -> String {
    fragments.iter().map(|f| f.text.as_str()).collect()
}

#[test]
fn blue_dogs_snippet() {
    let table = table_of(&[json!({"title": "The blue dogs."})]);
    let index = build_index(&table, &["title"]);
    let results = search(&table, &index, "dogs");

    let window = snippet(&results[0], &["title"], &SnippetOptions::default());
    assert_eq!(concat(&window), "The blue dogs.");

    let marked: Vec<&str> = window
        .iter()
        .filter(|f| f.matched)
        .map(|f| f.text.as_str())
        .collect();
    assert_eq!(marked, vec!["dogs"]);
}

#[test]
fn every_highlighted_field_round_trips() {
    let table = blog_table();
    let index = build_index(&table, &["title", "body"]);

    for query in ["alpine", "lenses", "calories", "photography patience"] {
        for result in search(&table, &index, query) {
            let fields = highlight_fields(&result, &["title", "body"]);
            for (field, fragments) in &fields {
                let original = result.record[field].as_str().unwrap();
                assert_eq!(&concat(fragments), original, "field {field:?}");
            }
        }
    }
}

#[test]
fn fuzzy_matches_highlight_the_vocabulary_term() {
    let table = blog_table();
    let index = build_index(&table, &["title", "body"]);

    // The query has the typo; the stored text does not
    let results = search(&table, &index, "lanses");
    let fields = highlight_fields(&results[0], &["title"]);
    let marked: Vec<&str> = fields["title"]
        .iter()
        .filter(|f| f.matched)
        .map(|f| f.text.as_str())
        .collect();
    assert_eq!(marked, vec!["Lenses"]);
}

#[test]
fn snippet_window_is_bounded() {
    let body: String = (0..120)
        .map(|i| {
            if i == 60 {
                "needle".to_string()
            } else {
                format!("filler{i}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let table = table_of(&[json!({"body": body})]);
    let index = build_index(&table, &["body"]);
    let results = search(&table, &index, "needle");

    let options = SnippetOptions::default();
    let window = snippet(&results[0], &["body"], &options);

    let words: Vec<&quern::Fragment> = window
        .iter()
        .filter(|f| f.text.chars().any(char::is_alphanumeric))
        .collect();
    // pad_start words of context plus the counted window
    assert_eq!(words.len(), options.pad_start + options.match_length);
    assert!(words.iter().any(|f| f.matched && f.text == "needle"));
    // Context sits directly before the match
    assert_eq!(words[options.pad_start].text, "needle");
    assert_eq!(words[options.pad_start - 1].text, "filler59");
}

#[test]
fn snippet_falls_back_to_leading_words() {
    let table = table_of(&[json!({
        "summary": "Plain opening words with nothing special",
        "body": "the needle is only here",
    })]);
    let index = build_index(&table, &["summary", "body"]);
    let results = search(&table, &index, "needle");

    // The highlighted field differs from the indexed ones; no match in sight
    let window = snippet(
        &results[0],
        &["summary"],
        &SnippetOptions {
            match_length: 4,
            pad_start: 4,
        },
    );
    assert_eq!(concat(&window), "Plain opening words with ");
    assert!(window.iter().all(|f| !f.matched));
}

#[test]
fn snippet_over_no_fields_is_empty() {
    let table = table_of(&[json!({"body": "needle"})]);
    let index = build_index(&table, &["body"]);
    let results = search(&table, &index, "needle");

    assert!(snippet(&results[0], &[], &SnippetOptions::default()).is_empty());
}
