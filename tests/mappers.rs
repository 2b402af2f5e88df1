// tests/mappers.rs
use anyhow::Result;
use rowflow::testing::{assert_rows_equal, assert_rows_sorted_by};
use rowflow::*;

fn map_rows(mapper: impl Mapper + 'static, rows: Vec<Row>) -> Result<Vec<Row>> {
    Graph::new()
        .read_from_iter("input")
        .map(mapper)
        .run(Bindings::new().rows("input", rows))
}

#[test]
fn dummy_mapper_passes_rows_through() -> Result<()> {
    let rows = vec![
        row! { "test_id" => 1, "text" => "one two three" },
        row! { "test_id" => 2, "text" => "testing out stuff" },
    ];
    let out = map_rows(DummyMapper, rows.clone())?;
    assert_rows_equal(&out, &rows);
    Ok(())
}

#[test]
fn lower_case_folds_column() -> Result<()> {
    let rows = vec![
        row! { "test_id" => 1, "text" => "camelCaseTest" },
        row! { "test_id" => 2, "text" => "UPPER_CASE_TEST" },
        row! { "test_id" => 3, "text" => "wEiRdTeSt" },
    ];
    let out = map_rows(LowerCase::new("text"), rows)?;
    assert_rows_equal(
        &out,
        &[
            row! { "test_id" => 1, "text" => "camelcasetest" },
            row! { "test_id" => 2, "text" => "upper_case_test" },
            row! { "test_id" => 3, "text" => "weirdtest" },
        ],
    );
    Ok(())
}

#[test]
fn filter_punctuation_strips_ascii_punctuation() -> Result<()> {
    let rows = vec![
        row! { "test_id" => 1, "text" => "Hello, world!" },
        row! { "test_id" => 2, "text" => "Test. with. a. lot. of. dots." },
        row! { "test_id" => 3, "text" => r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"## },
    ];
    let out = map_rows(FilterPunctuation::new("text"), rows)?;
    assert_rows_equal(
        &out,
        &[
            row! { "test_id" => 1, "text" => "Hello world" },
            row! { "test_id" => 2, "text" => "Test with a lot of dots" },
            row! { "test_id" => 3, "text" => "" },
        ],
    );
    Ok(())
}

#[test]
fn split_on_whitespace_emits_one_row_per_token() -> Result<()> {
    let rows = vec![
        row! { "test_id" => 1, "text" => "one two three" },
        row! { "test_id" => 2, "text" => "tab\tsplitting\ttest" },
        row! { "test_id" => 3, "text" => "more\nlines\ntest" },
        row! { "test_id" => 4, "text" => "tricky\u{00A0}test" },
    ];
    let out = map_rows(Split::new("text"), rows)?;
    assert_rows_sorted_by(
        out,
        vec![
            row! { "test_id" => 1, "text" => "one" },
            row! { "test_id" => 1, "text" => "three" },
            row! { "test_id" => 1, "text" => "two" },
            row! { "test_id" => 2, "text" => "splitting" },
            row! { "test_id" => 2, "text" => "tab" },
            row! { "test_id" => 2, "text" => "test" },
            row! { "test_id" => 3, "text" => "lines" },
            row! { "test_id" => 3, "text" => "more" },
            row! { "test_id" => 3, "text" => "test" },
            row! { "test_id" => 4, "text" => "test" },
            row! { "test_id" => 4, "text" => "tricky" },
        ],
        &["test_id", "text"],
    );
    Ok(())
}

#[test]
fn split_on_whitespace_drops_empty_values() -> Result<()> {
    let rows = vec![row! { "test_id" => 1, "text" => "" }, row! { "test_id" => 2, "text" => "   " }];
    let out = map_rows(Split::new("text"), rows)?;
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn split_with_separator_keeps_empty_tokens() -> Result<()> {
    let rows = vec![row! { "test_id" => 1, "text" => "a,b,,c" }];
    let out = map_rows(Split::with_separator("text", ","), rows)?;
    assert_rows_equal(
        &out,
        &[
            row! { "test_id" => 1, "text" => "a" },
            row! { "test_id" => 1, "text" => "b" },
            row! { "test_id" => 1, "text" => "" },
            row! { "test_id" => 1, "text" => "c" },
        ],
    );

    let out = map_rows(Split::with_separator("text", ","), vec![row! { "test_id" => 1, "text" => "" }])?;
    assert_rows_equal(&out, &[row! { "test_id" => 1, "text" => "" }]);
    Ok(())
}

#[test]
fn product_multiplies_columns() -> Result<()> {
    let rows = vec![
        row! { "test_id" => 1, "speed" => 5, "distance" => 10 },
        row! { "test_id" => 2, "speed" => 60, "distance" => 2 },
        row! { "test_id" => 3, "speed" => 3, "distance" => 15 },
        row! { "test_id" => 4, "speed" => 100, "distance" => 0.5 },
        row! { "test_id" => 5, "speed" => 48, "distance" => 15 },
    ];
    let out = map_rows(Product::new(&["speed", "distance"], "time"), rows)?;
    assert_rows_equal(
        &out,
        &[
            row! { "test_id" => 1, "speed" => 5, "distance" => 10, "time" => 50 },
            row! { "test_id" => 2, "speed" => 60, "distance" => 2, "time" => 120 },
            row! { "test_id" => 3, "speed" => 3, "distance" => 15, "time" => 45 },
            row! { "test_id" => 4, "speed" => 100, "distance" => 0.5, "time" => 50.0 },
            row! { "test_id" => 5, "speed" => 48, "distance" => 15, "time" => 720 },
        ],
    );
    Ok(())
}

#[test]
fn filter_keeps_rows_matching_predicate() -> Result<()> {
    let rows = vec![
        row! { "test_id" => 1, "f" => 0, "g" => 0 },
        row! { "test_id" => 2, "f" => 0, "g" => 1 },
        row! { "test_id" => 3, "f" => 1, "g" => 0 },
        row! { "test_id" => 4, "f" => 1, "g" => 1 },
    ];
    let xor = Filter::new(|row: &Row| Ok(row.get("f")?.as_i64()? ^ row.get("g")?.as_i64()? != 0));
    let out = map_rows(xor, rows)?;
    assert_rows_equal(
        &out,
        &[
            row! { "test_id" => 2, "f" => 0, "g" => 1 },
            row! { "test_id" => 3, "f" => 1, "g" => 0 },
        ],
    );
    Ok(())
}

#[test]
fn filter_propagates_predicate_errors() {
    let rows = vec![row! { "test_id" => 1 }];
    let missing = Filter::new(|row: &Row| Ok(row.get("absent")?.as_i64()? > 0));
    let err = map_rows(missing, rows).unwrap_err();
    assert!(err.to_string().contains("absent"));
}

#[test]
fn project_keeps_only_listed_columns() -> Result<()> {
    let rows = vec![
        row! { "test_id" => 1, "junk" => "x", "value" => 42 },
        row! { "test_id" => 2, "junk" => "y", "value" => 1 },
        row! { "test_id" => 3, "junk" => "z", "value" => 144 },
    ];
    let out = map_rows(Project::new(&["value"]), rows)?;
    assert_rows_equal(
        &out,
        &[
            row! { "value" => 42 },
            row! { "value" => 1 },
            row! { "value" => 144 },
        ],
    );
    Ok(())
}

#[test]
fn apply_function_stores_result_column() -> Result<()> {
    let rows = vec![row! { "a" => 3, "b" => 4 }];
    let hypot = ApplyFunction::new(
        |row: &Row| {
            let a = row.get("a")?.as_f64()?;
            let b = row.get("b")?.as_f64()?;
            Ok(Value::Float((a * a + b * b).sqrt()))
        },
        "c",
    );
    let out = map_rows(hypot, rows)?;
    assert_rows_equal(&out, &[row! { "a" => 3, "b" => 4, "c" => 5.0 }]);
    Ok(())
}

#[test]
fn idf_divides_second_column_by_first() -> Result<()> {
    let rows = vec![row! { "docs_with_word" => 2, "total_docs" => 4 }];
    let out = map_rows(Idf::new("docs_with_word", "total_docs", "idf"), rows)?;
    assert_eq!(out.len(), 1);
    let idf = out[0].get("idf")?.as_f64()?;
    assert!((idf - 2.0f64.ln()).abs() < 1e-12);
    Ok(())
}

#[test]
fn product_rejects_non_numeric_columns() {
    let rows = vec![row! { "test_id" => 1, "speed" => "fast", "distance" => 10 }];
    let err = map_rows(Product::new(&["speed", "distance"], "time"), rows).unwrap_err();
    assert!(err.to_string().contains("numeric"));
}
