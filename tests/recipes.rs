// tests/recipes.rs
use anyhow::Result;
use rowflow::recipes::{average_speed_graph, pmi_graph, tf_idf_graph, word_count_graph};
use rowflow::testing::{assert_rows_close, assert_rows_equal, word_corpus};
use rowflow::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn word_count_over_corpus() -> Result<()> {
    let graph = word_count_graph("docs", "text", "count", false);
    let out = graph.run(Bindings::new().rows("docs", word_corpus()))?;
    assert_rows_equal(
        &out,
        &[
            row! { "text" => "hello", "count" => 5 },
            row! { "text" => "little", "count" => 7 },
            row! { "text" => "world", "count" => 7 },
        ],
    );
    Ok(())
}

#[test]
fn word_count_from_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, r#"{{"doc_id": 1, "text": "a B a"}}"#)?;
    writeln!(file, r#"{{"doc_id": 2, "text": "b!"}}"#)?;
    file.flush()?;

    let graph = word_count_graph("docs", "text", "count", true);
    let out = graph.run(Bindings::new().file("docs", file.path()))?;
    assert_rows_equal(
        &out,
        &[
            row! { "text" => "a", "count" => 2 },
            row! { "text" => "b", "count" => 2 },
        ],
    );
    Ok(())
}

#[test]
fn tf_idf_over_two_documents() -> Result<()> {
    let docs = vec![
        row! { "doc_id" => 1, "text" => "hello hello world" },
        row! { "doc_id" => 2, "text" => "world" },
    ];
    let graph = tf_idf_graph("docs", "doc_id", "text", "tf_idf", false);
    let out = graph.run(Bindings::new().rows("docs", docs))?;

    // idf(hello) = ln(2/1), idf(world) = ln(2/2) = 0
    // tf(doc1, hello) = 2/3, so tf_idf(doc1, hello) = 2/3 * ln 2
    assert_rows_close(
        &out,
        &[
            row! { "doc_id" => 1, "text" => "hello", "tf_idf" => 2.0 / 3.0 * 2.0f64.ln() },
            row! { "doc_id" => 1, "text" => "world", "tf_idf" => 0.0 },
            row! { "doc_id" => 2, "text" => "world", "tf_idf" => 0.0 },
        ],
        1e-6,
    );
    Ok(())
}

#[test]
fn pmi_ranks_words_within_documents() -> Result<()> {
    let docs = vec![
        row! { "doc_id" => 1, "text" => "aaaaa aaaaa bbbbb bbbbb" },
        row! { "doc_id" => 2, "text" => "aaaaa aaaaa aaaaa ccccc" },
    ];
    let graph = pmi_graph("docs", "doc_id", "text", "pmi", false);
    let out = graph.run(Bindings::new().rows("docs", docs))?;

    // Surviving tokens: doc1 has aaaaa x2 and bbbbb x2; doc2 has aaaaa x3
    // (ccccc occurs once and is filtered). Corpus frequencies: aaaaa 5/7,
    // bbbbb 2/7. pmi = ln(local / global), descending within each doc.
    assert_rows_close(
        &out,
        &[
            row! { "doc_id" => 1, "text" => "bbbbb", "pmi" => 1.75f64.ln() },
            row! { "doc_id" => 1, "text" => "aaaaa", "pmi" => 0.7f64.ln() },
            row! { "doc_id" => 2, "text" => "aaaaa", "pmi" => 1.4f64.ln() },
        ],
        1e-6,
    );
    Ok(())
}

#[test]
fn average_speed_by_weekday_and_hour() -> Result<()> {
    // One degree of latitude along a meridian.
    let one_degree_km = 6371.0 * 1.0f64.to_radians();

    let lengths = vec![
        row! { "edge_id" => "e1", "start" => (0.0, 0.0), "end" => (0.0, 1.0) },
    ];
    let times = vec![
        // Thursday 2023-06-01, hour 12: one-hour and two-hour traversals
        row! { "edge_id" => "e1", "enter_time" => "20230601T120000.000", "leave_time" => "20230601T130000.000" },
        row! { "edge_id" => "e1", "enter_time" => "20230601T120500", "leave_time" => "20230601T140500" },
        // Friday 2023-06-02, hour 6: a half-hour traversal
        row! { "edge_id" => "e1", "enter_time" => "20230602T060000", "leave_time" => "20230602T063000" },
    ];

    let graph = average_speed_graph(
        "travel_times",
        "edge_lengths",
        "enter_time",
        "leave_time",
        "edge_id",
        "start",
        "end",
        "weekday",
        "hour",
        "speed",
        false,
    );
    let out = graph.run(
        Bindings::new()
            .rows("travel_times", times)
            .rows("edge_lengths", lengths),
    )?;

    assert_rows_close(
        &out,
        &[
            row! { "weekday" => "Fri", "hour" => 6, "speed" => one_degree_km / 0.5 },
            row! { "weekday" => "Thu", "hour" => 12, "speed" => (one_degree_km + one_degree_km / 2.0) / 2.0 },
        ],
        1e-6,
    );
    Ok(())
}
