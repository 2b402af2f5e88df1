//! Testing utilities for rowflow pipelines.
//!
//! Assertion helpers for comparing row collections -- exact, order-insensitive
//! via a sort key, and tolerant for float-bearing rows -- plus a couple of
//! pre-built fixture datasets used across the integration tests.
//!
//! ```no_run
//! use rowflow::row;
//! use rowflow::testing::assert_rows_equal;
//!
//! let actual = vec![row! { "n" => 1 }];
//! assert_rows_equal(&actual, &[row! { "n" => 1 }]);
//! ```

use crate::row::Row;

/// Assert that two row collections are equal in order and content.
///
/// # Panics
/// Panics with a detailed message if the collections differ in length or at
/// any index.
pub fn assert_rows_equal(actual: &[Row], expected: &[Row]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Row collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Row mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert equality after sorting both sides by the named columns.
///
/// Useful when the operation under test leaves the order unspecified.
///
/// # Panics
/// Panics if any sort column is missing from a row, or if the sorted
/// collections differ.
pub fn assert_rows_sorted_by(actual: Vec<Row>, expected: Vec<Row>, keys: &[&str]) {
    assert_rows_equal(&sorted_by(actual, keys), &sorted_by(expected, keys));
}

/// Assert that two row collections match, comparing numeric columns with an
/// absolute tolerance and everything else exactly.
///
/// # Panics
/// Panics if lengths, column sets, or any value differ beyond `tolerance`.
pub fn assert_rows_close(actual: &[Row], expected: &[Row], tolerance: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Row collection length mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let a_cols: Vec<&str> = a.columns().collect();
        let e_cols: Vec<&str> = e.columns().collect();
        assert_eq!(
            a_cols, e_cols,
            "Column mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}"
        );
        for (column, expected_value) in e.iter() {
            let actual_value = a.get(column).expect("column present");
            let close = match (actual_value.as_f64(), expected_value.as_f64()) {
                (Ok(av), Ok(ev)) => (av - ev).abs() <= tolerance,
                _ => actual_value == expected_value,
            };
            assert!(
                close,
                "Value mismatch at index {i}, column {column:?}:\n  Expected: {expected_value:?}\n  Actual: {actual_value:?}\n  Tolerance: {tolerance}"
            );
        }
    }
}

/// A small document corpus for word-counting and TF-IDF style tests.
#[must_use]
pub fn word_corpus() -> Vec<Row> {
    vec![
        crate::row! { "doc_id" => 1, "text" => "hello, little world" },
        crate::row! { "doc_id" => 2, "text" => "little" },
        crate::row! { "doc_id" => 3, "text" => "little little little" },
        crate::row! { "doc_id" => 4, "text" => "little? hello little world" },
        crate::row! { "doc_id" => 5, "text" => "HELLO HELLO! WORLD..." },
        crate::row! { "doc_id" => 6, "text" => "world? world... world!!! WORLD!!! HELLO!!!" },
    ]
}

/// Two matches of four players each, for grouping and top-N tests.
#[must_use]
pub fn match_scores() -> Vec<Row> {
    vec![
        crate::row! { "match_id" => 1, "player_id" => 1, "rank" => 42 },
        crate::row! { "match_id" => 1, "player_id" => 2, "rank" => 7 },
        crate::row! { "match_id" => 1, "player_id" => 3, "rank" => 0 },
        crate::row! { "match_id" => 1, "player_id" => 4, "rank" => 39 },
        crate::row! { "match_id" => 2, "player_id" => 5, "rank" => 15 },
        crate::row! { "match_id" => 2, "player_id" => 6, "rank" => 39 },
        crate::row! { "match_id" => 2, "player_id" => 7, "rank" => 27 },
        crate::row! { "match_id" => 2, "player_id" => 8, "rank" => 7 },
    ]
}

/// Sort rows by the named columns; convenience for asserting on unordered
/// results.
///
/// # Panics
/// Panics if any sort column is missing from a row.
#[must_use]
pub fn sorted_by(mut rows: Vec<Row>, keys: &[&str]) -> Vec<Row> {
    let keys: Vec<String> = keys.iter().map(|k| (*k).to_owned()).collect();
    rows.sort_by_key(|row| {
        row.key_tuple(&keys)
            .unwrap_or_else(|e| panic!("sort column missing: {e}"))
    });
    rows
}
