//! Per-period interaction graphs.
//!
//! Records are bucketed by the calendar period their timestamp falls in, and
//! one unweighted [`InteractionGraph`] is built per non-empty period. Periods
//! are calendar-aligned: weeks run Monday to Sunday, months and years start
//! on their first day.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Serialize, Serializer};
use threadnet_core::table::{Table, Value};
use threadnet_core::timestamp::parse_timestamp;
use tracing::{debug, info, instrument};

use crate::error::{GraphError, Result};
use crate::graph::build::{InteractionGraph, build_from_rows, column};
use crate::graph::stats::{GraphProperties, graph_properties};

/// Chronologically ordered graphs, one per non-empty period.
pub type TemporalGraphs = BTreeMap<Period, InteractionGraph>;

// ---------------------------------------------------------------------------
// TimeWindow
// ---------------------------------------------------------------------------

/// Calendar granularity used to bucket records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeWindow {
    Day,
    Week,
    Month,
    Year,
}

impl TimeWindow {
    /// The period containing `date`.
    #[must_use]
    pub fn period_of(self, date: NaiveDate) -> Period {
        let start = match self {
            Self::Day => Some(date),
            Self::Week => date.checked_sub_days(Days::new(u64::from(
                date.weekday().num_days_from_monday(),
            ))),
            Self::Month => date.with_day(1),
            Self::Year => date.with_ordinal(1),
        };
        Period {
            start: start.unwrap_or(date),
            window: self,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = GraphError;

    /// Accepts `day|week|month|year` and the single-letter aliases
    /// `D|W|M|Y` in either case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "d" => Ok(Self::Day),
            "week" | "w" => Ok(Self::Week),
            "month" | "m" => Ok(Self::Month),
            "year" | "y" => Ok(Self::Year),
            _ => Err(GraphError::unknown("time window", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// One calendar bucket, identified by its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    /// First day of the period.
    pub start: NaiveDate,
    /// Granularity.
    pub window: TimeWindow,
}

impl Period {
    /// Last day of the period (inclusive).
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        let next = match self.window {
            TimeWindow::Day => self.start.checked_add_days(Days::new(1)),
            TimeWindow::Week => self.start.checked_add_days(Days::new(7)),
            TimeWindow::Month => self.start.checked_add_months(Months::new(1)),
            TimeWindow::Year => self.start.checked_add_months(Months::new(12)),
        };
        next.and_then(|d| d.pred_opt()).unwrap_or(self.start)
    }

    /// Human-readable label: `2024-01-15`, `2024-01-15/2024-01-21`,
    /// `2024-01`, or `2024`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.window {
            TimeWindow::Day => self.start.format("%Y-%m-%d").to_string(),
            TimeWindow::Week => format!(
                "{}/{}",
                self.start.format("%Y-%m-%d"),
                self.end().format("%Y-%m-%d")
            ),
            TimeWindow::Month => self.start.format("%Y-%m").to_string(),
            TimeWindow::Year => self.start.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build one unweighted interaction graph per period of `time_col`.
///
/// Timestamps may be UNIX seconds or datetime text (see
/// [`threadnet_core::timestamp`]). Records with a null timestamp are skipped.
/// A period whose records are all self-loops or have a null endpoint yields
/// no nodes and is left out of the map.
///
/// # Errors
///
/// Returns [`GraphError::ColumnNotFound`] for a missing column and
/// [`GraphError::InvalidTimestamp`] for a cell that is not a timestamp.
#[instrument(skip(table))]
pub fn build_temporal_graphs(
    table: &Table,
    time_col: &str,
    window: TimeWindow,
    source_col: &str,
    target_col: &str,
) -> Result<TemporalGraphs> {
    let source = column(table, source_col)?;
    let target = column(table, target_col)?;
    let buckets = bucket_rows(table, time_col, window)?;

    let mut graphs = TemporalGraphs::new();
    for (period, rows) in buckets {
        let graph = build_from_rows(source, target, None, rows)?;
        if graph.is_empty() {
            debug!(%period, "period has no edges, skipped");
            continue;
        }
        graphs.insert(period, graph);
    }

    info!(periods = graphs.len(), %window, "built temporal graphs");
    Ok(graphs)
}

/// Row indices per period of `time_col`; null timestamps are skipped.
fn bucket_rows(
    table: &Table,
    time_col: &str,
    window: TimeWindow,
) -> Result<BTreeMap<Period, Vec<usize>>> {
    let time = column(table, time_col)?;
    let mut buckets: BTreeMap<Period, Vec<usize>> = BTreeMap::new();
    let mut untimed = 0_usize;

    for (row, cell) in time.values.iter().enumerate() {
        let parsed = parse_timestamp(cell).map_err(|_| GraphError::InvalidTimestamp {
            column: time_col.to_string(),
            row,
            value: cell.to_string(),
        })?;
        match parsed {
            Some(dt) => buckets.entry(window.period_of(dt.date())).or_default().push(row),
            None => untimed += 1,
        }
    }

    if untimed > 0 {
        debug!(skipped = untimed, "skipped records without a timestamp");
    }
    Ok(buckets)
}

/// [`GraphProperties`] of every period graph, in chronological order.
///
/// # Errors
///
/// Propagates [`graph_properties`] failures.
pub fn temporal_properties(graphs: &TemporalGraphs) -> Result<BTreeMap<Period, GraphProperties>> {
    graphs
        .iter()
        .map(|(period, graph)| Ok((*period, graph_properties(graph)?)))
        .collect()
}

// ---------------------------------------------------------------------------
// Activity matrix
// ---------------------------------------------------------------------------

/// Record counts of the most active sources per period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityMatrix {
    /// Sources, most active first.
    pub rows: Vec<Value>,
    /// Periods in chronological order.
    pub periods: Vec<Period>,
    /// `counts[r][p]`: records of `rows[r]` in `periods[p]`.
    pub counts: Vec<Vec<f64>>,
}

/// Count records of the `top` most active values of `source_col` in each
/// period of `time_col`.
///
/// Sources are ranked by total records; ties keep first-appearance order.
/// Records with a null source or timestamp are skipped.
///
/// # Errors
///
/// Returns [`GraphError::ColumnNotFound`] for a missing column and
/// [`GraphError::InvalidTimestamp`] for a cell that is not a timestamp.
#[allow(clippy::cast_precision_loss)]
pub fn activity_matrix(
    table: &Table,
    time_col: &str,
    window: TimeWindow,
    source_col: &str,
    top: usize,
) -> Result<ActivityMatrix> {
    let source = column(table, source_col)?;
    let buckets = bucket_rows(table, time_col, window)?;

    let mut totals: Vec<(Value, usize)> = Vec::new();
    let mut slot: HashMap<&Value, usize> = HashMap::new();
    for rows in buckets.values() {
        for &row in rows {
            let id = &source.values[row];
            if id.is_null() {
                continue;
            }
            let i = *slot.entry(id).or_insert_with(|| {
                totals.push((id.clone(), 0));
                totals.len() - 1
            });
            totals[i].1 += 1;
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(top);

    let rank: HashMap<&Value, usize> = totals.iter().enumerate().map(|(i, (v, _))| (v, i)).collect();
    let periods: Vec<Period> = buckets.keys().copied().collect();
    let mut counts = vec![vec![0.0; periods.len()]; totals.len()];
    for (p, rows) in buckets.values().enumerate() {
        for &row in rows {
            if let Some(&r) = rank.get(&source.values[row]) {
                counts[r][p] += 1.0;
            }
        }
    }

    Ok(ActivityMatrix {
        rows: totals.into_iter().map(|(v, _)| v).collect(),
        periods,
        counts,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
