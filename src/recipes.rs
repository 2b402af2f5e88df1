//! Ready-made text-analytics and aggregation pipelines.
//!
//! Each recipe is a pure graph constructor: it wires mappers, reducers, sorts,
//! and joins into a reusable [`Graph`] parameterized by column names. Supply
//! the data with [`Bindings`](crate::Bindings) at run time. With
//! `from_file = true` the recipe reads JSON-lines files via
//! [`jsonl::parse_row`]; otherwise it reads in-memory rows.
//!
//! These are clients of the engine, and double as its heaviest exercise: the
//! TF-IDF and PMI graphs fan a shared tokenized stream out to several
//! aggregations and join the branches back together.

use crate::graph::Graph;
use crate::io::jsonl;
use crate::joiners::InnerJoiner;
use crate::mappers::{
    ApplyFunction, Filter, FilterPunctuation, Idf, LowerCase, Product, Project, Split,
};
use crate::reducers::{Average, Count, FirstReducer, RowsCounter, TopN};
use crate::row::{Row, Value};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};

fn source(name: &str, from_file: bool) -> Graph {
    if from_file {
        Graph::new().read_from_file(name, jsonl::parse_row)
    } else {
        Graph::new().read_from_iter(name)
    }
}

/// Count words over `text_column`, ordered by count and word.
///
/// Output rows: `{text_column, count_column}`.
#[must_use]
pub fn word_count_graph(
    input: &str,
    text_column: &str,
    count_column: &str,
    from_file: bool,
) -> Graph {
    source(input, from_file)
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column))
        .sort(&[text_column])
        .reduce(Count::new(count_column), &[text_column])
        .sort(&[count_column, text_column])
}

/// TF-IDF per word/document pair, keeping the top 3 documents per word.
///
/// Input rows carry `doc_column` and `text_column`; output rows are
/// `{doc_column, text_column, result_column}`.
#[must_use]
pub fn tf_idf_graph(
    input: &str,
    doc_column: &str,
    text_column: &str,
    result_column: &str,
    from_file: bool,
) -> Graph {
    const ROWS_COUNT: &str = "rows_count";
    const TOTAL_IN_DOC: &str = "total_in_doc";
    const WORD_IN_DOC: &str = "word_in_doc";
    const DOCS_WITH_WORD: &str = "docs_with_word_count";

    let raw = source(input, from_file);

    let words = raw
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column));

    // Total number of input documents, broadcast onto every row.
    let doc_count = raw.count(RowsCounter::new(ROWS_COUNT), &[doc_column]);

    // idf = ln(total docs / docs containing the word)
    let idf = words
        .sort(&[doc_column, text_column])
        .reduce(FirstReducer, &[doc_column, text_column])
        .sort(&[doc_column])
        .join(InnerJoiner::new(), &doc_count, &[doc_column])
        .sort(&[text_column])
        .reduce(Count::new(DOCS_WITH_WORD), &[text_column, ROWS_COUNT])
        .map(Idf::new(DOCS_WITH_WORD, ROWS_COUNT, "idf"))
        .sort(&[text_column]);

    let words_per_doc = words.reduce(Count::new(TOTAL_IN_DOC), &[doc_column]).sort(&[doc_column]);

    // tf = occurrences of the word in the doc / total words in the doc
    let tf = words
        .sort(&[doc_column, text_column])
        .reduce(Count::new(WORD_IN_DOC), &[doc_column, text_column])
        .sort(&[doc_column])
        .join(InnerJoiner::new(), &words_per_doc, &[doc_column])
        .map(ApplyFunction::new(
            |row: &Row| {
                Ok(Value::Float(
                    row.get(WORD_IN_DOC)?.as_f64()? / row.get(TOTAL_IN_DOC)?.as_f64()?,
                ))
            },
            "tf",
        ))
        .sort(&[text_column]);

    tf.join(InnerJoiner::new(), &idf, &[text_column])
        .map(Product::new(&["tf", "idf"], result_column))
        .sort(&[text_column, doc_column])
        .map(Project::new(&[doc_column, text_column, result_column]))
        .reduce(TopN::new(result_column, 3), &[text_column])
        .sort(&[doc_column, text_column])
}

/// Pointwise mutual information: for every document, the top 10 words ranked
/// by `ln(frequency in the document / frequency in the whole corpus)`.
///
/// Words shorter than five characters or appearing fewer than twice in a
/// document are left out. Output rows: `{doc_column, text_column,
/// result_column}`, descending by the result within each document.
#[must_use]
pub fn pmi_graph(
    input: &str,
    doc_column: &str,
    text_column: &str,
    result_column: &str,
    from_file: bool,
) -> Graph {
    const WORDS_IN_DOC: &str = "words_in_doc";
    const TOTAL_IN_DOC: &str = "total_in_doc";
    const MENTIONS: &str = "mentions";
    const TOTAL_WORDS: &str = "total_words";

    let filter_length = {
        let text = text_column.to_owned();
        Filter::new(move |row: &Row| Ok(row.get(&text)?.as_str()?.chars().count() > 4))
    };
    let filter_occurrences =
        Filter::new(|row: &Row| Ok(row.get(WORDS_IN_DOC)?.as_i64()? >= 2));

    let tokens = source(input, from_file)
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column))
        .map(filter_length)
        .sort(&[text_column, doc_column]);

    // Occurrences of each word per document, keeping only repeated words.
    let repeated = tokens
        .reduce(Count::new(WORDS_IN_DOC), &[text_column, doc_column])
        .map(filter_occurrences)
        .sort(&[doc_column, text_column]);

    // One row per surviving token occurrence.
    let survivors = repeated.join(InnerJoiner::new(), &tokens, &[doc_column, text_column]);

    let doc_sizes = survivors
        .sort(&[doc_column])
        .reduce(Count::new(TOTAL_IN_DOC), &[doc_column])
        .sort(&[doc_column]);

    let local_frequency = survivors
        .join(InnerJoiner::new(), &doc_sizes, &[doc_column])
        .map(ApplyFunction::new(
            |row: &Row| {
                Ok(Value::Float(
                    row.get(WORDS_IN_DOC)?.as_f64()? / row.get(TOTAL_IN_DOC)?.as_f64()?,
                ))
            },
            "local_frequency",
        ));

    let mentions = survivors
        .sort(&[text_column, doc_column])
        .sort(&[text_column])
        .reduce(Count::new(MENTIONS), &[text_column])
        .sort(&[text_column]);

    let per_pair = mentions
        .join(InnerJoiner::new(), &local_frequency, &[text_column])
        .sort(&[doc_column])
        .reduce(FirstReducer, &[doc_column, text_column])
        .sort(&[doc_column]);

    let corpus_size = survivors
        .count(RowsCounter::new(TOTAL_WORDS), &[text_column, doc_column])
        .sort(&[text_column])
        .reduce(FirstReducer, &[text_column])
        .map(Project::new(&[text_column, TOTAL_WORDS]));

    per_pair
        .join(InnerJoiner::new(), &corpus_size, &[text_column])
        .map(ApplyFunction::new(
            |row: &Row| {
                Ok(Value::Float(
                    row.get(MENTIONS)?.as_f64()? / row.get(TOTAL_WORDS)?.as_f64()?,
                ))
            },
            "global_frequency",
        ))
        .map(Idf::new("global_frequency", "local_frequency", result_column))
        .map(Project::new(&[text_column, result_column, doc_column]))
        .sort(&[doc_column])
        .reduce(TopN::new(result_column, 10), &[doc_column])
}

/// Average speed in km/h by weekday and hour, from per-edge travel times and
/// edge geometry.
///
/// `input_time` rows carry enter/leave timestamps (`%Y%m%dT%H%M%S%.f`) and an
/// edge id; `input_length` rows carry the edge id and its start/end
/// coordinates as `(longitude, latitude)` pairs. Output rows:
/// `{weekday_result_column, hour_result_column, speed_result_column}`.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn average_speed_graph(
    input_time: &str,
    input_length: &str,
    enter_time_column: &str,
    leave_time_column: &str,
    edge_id_column: &str,
    start_coord_column: &str,
    end_coord_column: &str,
    weekday_result_column: &str,
    hour_result_column: &str,
    speed_result_column: &str,
    from_file: bool,
) -> Graph {
    let distance = {
        let start = start_coord_column.to_owned();
        let end = end_coord_column.to_owned();
        ApplyFunction::new(
            move |row: &Row| {
                let start = row.get(&start)?.as_coord()?;
                let end = row.get(&end)?.as_coord()?;
                Ok(Value::Float(haversine_km(start, end)))
            },
            "distance",
        )
    };

    let hours = {
        let enter = enter_time_column.to_owned();
        let leave = leave_time_column.to_owned();
        ApplyFunction::new(
            move |row: &Row| {
                let enter = parse_timestamp(row.get(&enter)?)?;
                let leave = parse_timestamp(row.get(&leave)?)?;
                let micros = leave
                    .signed_duration_since(enter)
                    .num_microseconds()
                    .context("travel interval too large")?;
                Ok(Value::Float(micros as f64 / 3_600_000_000.0))
            },
            "hours",
        )
    };

    let weekday = {
        let enter = enter_time_column.to_owned();
        ApplyFunction::new(
            move |row: &Row| {
                let enter = parse_timestamp(row.get(&enter)?)?;
                Ok(Value::Str(enter.weekday().to_string()))
            },
            weekday_result_column,
        )
    };

    let hour = {
        let enter = enter_time_column.to_owned();
        ApplyFunction::new(
            move |row: &Row| {
                let enter = parse_timestamp(row.get(&enter)?)?;
                Ok(Value::Int(enter.hour().into()))
            },
            hour_result_column,
        )
    };

    let speed = ApplyFunction::new(
        |row: &Row| {
            Ok(Value::Float(
                row.get("distance")?.as_f64()? / row.get("hours")?.as_f64()?,
            ))
        },
        speed_result_column,
    );

    let edges = source(input_length, from_file).map(distance);

    source(input_time, from_file)
        .map(hours)
        .sort(&[edge_id_column])
        .join(InnerJoiner::new(), &edges, &[edge_id_column])
        .map(speed)
        .map(weekday)
        .map(hour)
        .sort(&[weekday_result_column, hour_result_column])
        .map(Project::new(&[
            weekday_result_column,
            hour_result_column,
            speed_result_column,
        ]))
        .reduce(
            Average::new(speed_result_column),
            &[weekday_result_column, hour_result_column],
        )
}

fn parse_timestamp(value: &Value) -> Result<NaiveDateTime> {
    let text = value.as_str()?;
    NaiveDateTime::parse_from_str(text, "%Y%m%dT%H%M%S%.f")
        .with_context(|| format!("parse timestamp {text:?}"))
}

/// Great-circle distance in kilometers between `(longitude, latitude)` pairs.
fn haversine_km(start: (f64, f64), end: (f64, f64)) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let (lon1, lat1) = start;
    let (lon2, lat2) = end;
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
