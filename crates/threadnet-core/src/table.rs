//! In-memory columnar table.
//!
//! A [`Table`] is an ordered list of named [`Column`]s of equal length. Cells
//! are dynamically typed [`Value`]s, inferred per cell when a file is read.
//!
//! `Value` implements `Eq`, `Hash` and `Ord` so that cells can be used
//! directly as graph node ids and as min/max operands. Numeric variants
//! compare by value (`Int(3) == Float(3.0)`), text compares
//! lexicographically, and the variant families order as
//! `Null < Bool < number < Text`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::error::{Result, TableError};

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A single table cell.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    Null,
    /// Boolean cell.
    Bool(bool),
    /// Integer cell.
    Int(i64),
    /// Finite floating-point cell.
    Float(f64),
    /// Free text.
    Text(String),
}

impl Value {
    /// Infer a typed value from a raw CSV field.
    ///
    /// Blank fields are `Null`; `true`/`false` (any case) are booleans;
    /// integers and finite floats are numeric; everything else is text and
    /// keeps its original spelling.
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Self::float(f);
            }
        }
        Self::Text(raw.to_string())
    }

    /// Wrap a float, demoting non-finite values to `Null`. `-0.0` is stored
    /// as `0.0`.
    #[must_use]
    pub fn float(f: f64) -> Self {
        if !f.is_finite() {
            Self::Null
        } else if f == 0.0 {
            Self::Float(0.0)
        } else {
            Self::Float(f)
        }
    }

    /// Return `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the cell (integers and floats only).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer view of the cell (integers and integral floats).
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) => integral(*f),
            _ => None,
        }
    }

    /// Text view of the cell.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    const fn family(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

/// Exact `i64` for an integral float inside the `i64` range.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.fract() == 0.0 && f >= -LIMIT && f < LIMIT {
        Some(f as i64)
    } else {
        None
    }
}

#[allow(clippy::cast_precision_loss)]
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    integral(f).map_or_else(|| (i as f64).total_cmp(&f), |fi| i.cmp(&fi))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    #[allow(clippy::float_cmp)]
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            // Signed zeros are equal, as they are to `Int(0)`.
            (Self::Float(a), Self::Float(b)) if a == b => Ordering::Equal,
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Int(a), Self::Float(b)) => cmp_int_float(*a, *b),
            (Self::Float(a), Self::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.family().cmp(&other.family()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family().hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            // Integral floats hash like the equal integer.
            Self::Float(f) => match integral(*f) {
                Some(i) => i.hash(state),
                None => f.to_bits().hash(state),
            },
            Self::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column header.
    pub name: String,
    /// Cells, one per row.
    pub values: Vec<Value>,
}

impl Column {
    /// Build a column from anything convertible to [`Value`].
    pub fn new<V: Into<Value>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of distinct non-null values.
    #[must_use]
    pub fn distinct_count(&self) -> usize {
        self.values
            .iter()
            .filter(|v| !v.is_null())
            .collect::<std::collections::HashSet<_>>()
            .len()
    }

    /// Minimum and maximum of the non-null values, if any.
    #[must_use]
    pub fn min_max(&self) -> Option<(Value, Value)> {
        let mut non_null = self.values.iter().filter(|v| !v.is_null());
        let first = non_null.next()?;
        let (min, max) = non_null.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some((min.clone(), max.clone()))
    }
}

/// A rectangular table of named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Build a table from columns of equal length.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RaggedColumns`] when lengths differ.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != expected) {
                return Err(TableError::RaggedColumns {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.values.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Build a table from a header and row-major records.
    ///
    /// Short rows are padded with `Null`; extra cells are dropped.
    #[must_use]
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(rows.len()),
            })
            .collect();
        for row in rows {
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.values.push(cells.next().unwrap_or(Value::Null));
            }
        }
        Self { columns }
    }

    /// Number of records.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`, as reported in load logs.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Column headers in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// All columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Return `true` if a column named `name` exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Mutable lookup of a column by name.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Look up a column, failing with [`TableError::ColumnNotFound`].
    ///
    /// # Errors
    ///
    /// Returns an error if the column is absent.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// Insert a column, replacing any existing column of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RaggedColumns`] when the length differs from
    /// the table's row count (an empty table accepts any length).
    pub fn set_column(&mut self, column: Column) -> Result<()> {
        let others = self.columns.iter().filter(|c| c.name != column.name).count();
        if others > 0 && column.values.len() != self.row_count() {
            return Err(TableError::RaggedColumns {
                column: column.name,
                expected: self.row_count(),
                actual: column.values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Keep only the named columns, in the order given. Unknown names are
    /// ignored.
    pub fn retain_columns(&mut self, names: &[String]) {
        let mut kept = Vec::with_capacity(names.len());
        for name in names {
            if let Some(pos) = self.columns.iter().position(|c| &c.name == name) {
                kept.push(self.columns.swap_remove(pos));
            }
        }
        self.columns = kept;
    }

    /// Cell at `row` in column `name`.
    #[must_use]
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        self.column(name).and_then(|c| c.values.get(row))
    }

    /// Iterate over one record's cells in column order.
    pub fn row(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.columns.iter().filter_map(move |c| c.values.get(index))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
