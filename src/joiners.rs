//! Join strategy kernels plugged into the `Join` operation.
//!
//! A [`Joiner`] receives the join-key columns and the two equal-key groups the
//! sort-merge driver lined up -- either of which may be absent when the key
//! exists on only one side -- and emits the joined rows:
//!
//! - [`InnerJoiner`] -- Cartesian product only when both sides are present.
//! - [`OuterJoiner`] -- Cartesian product when both; pass-through otherwise.
//! - [`LeftJoiner`] / [`RightJoiner`] -- pass-through restricted to one side.
//!
//! # Merged row shape
//!
//! For each `(left, right)` pair: join-key columns come from the left row
//! (equal by construction), one-sided columns pass through under their own
//! name, and a non-key column present on *both* sides is emitted twice under
//! suffixed names (`name_1` / `name_2` by default, configurable per joiner
//! instance) -- the bare name does not appear.

use crate::row::Row;
use anyhow::Result;

/// Column-name suffixes applied to colliding non-key columns.
#[derive(Clone, Debug)]
pub struct Suffixes {
    /// Appended to the left row's copy of a colliding column.
    pub left: String,
    /// Appended to the right row's copy of a colliding column.
    pub right: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            left: "_1".to_owned(),
            right: "_2".to_owned(),
        }
    }
}

impl Suffixes {
    /// Custom suffix pair.
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// A join strategy: decides what to emit for each aligned pair of equal-key
/// groups.
pub trait Joiner: Send + Sync {
    /// Join one aligned pair of groups. `left`/`right` is `None` when the key
    /// tuple is present on only the opposite side.
    fn join(&self, keys: &[String], left: Option<&[Row]>, right: Option<&[Row]>)
    -> Result<Vec<Row>>;
}

/// Merge one `(left, right)` pair into a single output row.
fn merge_row(keys: &[String], suffixes: &Suffixes, left: &Row, right: &Row) -> Row {
    let mut merged = Row::new();
    for (name, value) in left.iter() {
        if keys.iter().any(|k| k == name) || !right.contains(name) {
            merged.set(name, value.clone());
        } else {
            merged.set(format!("{name}{}", suffixes.left), value.clone());
        }
    }
    for (name, value) in right.iter() {
        if keys.iter().any(|k| k == name) {
            continue; // key columns come from the left row
        }
        if left.contains(name) {
            merged.set(format!("{name}{}", suffixes.right), value.clone());
        } else {
            merged.set(name, value.clone());
        }
    }
    merged
}

/// Cartesian product of the two groups: outer loop left, inner loop right.
fn cartesian(keys: &[String], suffixes: &Suffixes, left: &[Row], right: &[Row]) -> Vec<Row> {
    let mut out = Vec::with_capacity(left.len() * right.len());
    for l in left {
        for r in right {
            out.push(merge_row(keys, suffixes, l, r));
        }
    }
    out
}

/* ===================== InnerJoiner ===================== */

/// Emit only pairs whose key is present on both sides.
#[derive(Default)]
pub struct InnerJoiner {
    suffixes: Suffixes,
}

impl InnerJoiner {
    /// Inner join with the default `_1` / `_2` collision suffixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inner join with custom collision suffixes.
    #[must_use]
    pub fn with_suffixes(suffixes: Suffixes) -> Self {
        Self { suffixes }
    }
}

impl Joiner for InnerJoiner {
    fn join(
        &self,
        keys: &[String],
        left: Option<&[Row]>,
        right: Option<&[Row]>,
    ) -> Result<Vec<Row>> {
        Ok(match (left, right) {
            (Some(l), Some(r)) => cartesian(keys, &self.suffixes, l, r),
            _ => Vec::new(),
        })
    }
}

/* ===================== OuterJoiner ===================== */

/// Emit pairs when both sides are present, and pass the present side through
/// unchanged when the other is absent.
#[derive(Default)]
pub struct OuterJoiner {
    suffixes: Suffixes,
}

impl OuterJoiner {
    /// Full outer join with the default collision suffixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Full outer join with custom collision suffixes.
    #[must_use]
    pub fn with_suffixes(suffixes: Suffixes) -> Self {
        Self { suffixes }
    }
}

impl Joiner for OuterJoiner {
    fn join(
        &self,
        keys: &[String],
        left: Option<&[Row]>,
        right: Option<&[Row]>,
    ) -> Result<Vec<Row>> {
        Ok(match (left, right) {
            (Some(l), Some(r)) => cartesian(keys, &self.suffixes, l, r),
            (Some(l), None) => l.to_vec(),
            (None, Some(r)) => r.to_vec(),
            (None, None) => Vec::new(),
        })
    }
}

/* ===================== LeftJoiner ===================== */

/// Like [`OuterJoiner`], but pass-through only for left-only keys; right-only
/// groups are dropped.
#[derive(Default)]
pub struct LeftJoiner {
    suffixes: Suffixes,
}

impl LeftJoiner {
    /// Left join with the default collision suffixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Left join with custom collision suffixes.
    #[must_use]
    pub fn with_suffixes(suffixes: Suffixes) -> Self {
        Self { suffixes }
    }
}

impl Joiner for LeftJoiner {
    fn join(
        &self,
        keys: &[String],
        left: Option<&[Row]>,
        right: Option<&[Row]>,
    ) -> Result<Vec<Row>> {
        Ok(match (left, right) {
            (Some(l), Some(r)) => cartesian(keys, &self.suffixes, l, r),
            (Some(l), None) => l.to_vec(),
            _ => Vec::new(),
        })
    }
}

/* ===================== RightJoiner ===================== */

/// Like [`OuterJoiner`], but pass-through only for right-only keys; left-only
/// groups are dropped.
#[derive(Default)]
pub struct RightJoiner {
    suffixes: Suffixes,
}

impl RightJoiner {
    /// Right join with the default collision suffixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Right join with custom collision suffixes.
    #[must_use]
    pub fn with_suffixes(suffixes: Suffixes) -> Self {
        Self { suffixes }
    }
}

impl Joiner for RightJoiner {
    fn join(
        &self,
        keys: &[String],
        left: Option<&[Row]>,
        right: Option<&[Row]>,
    ) -> Result<Vec<Row>> {
        Ok(match (left, right) {
            (Some(l), Some(r)) => cartesian(keys, &self.suffixes, l, r),
            (None, Some(r)) => r.to_vec(),
            _ => Vec::new(),
        })
    }
}
