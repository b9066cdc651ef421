//! In-memory model of an MBE container: a file is an ordered list of
//! sheets, each a named grid of typed cells.
//!
//! The model is what editors mutate between [`parse`](crate::parse) and
//! [`generate`](crate::generate). It carries two pieces of metadata with
//! no wire form: per-row identity tokens (stable handles for UI row
//! tracking) and the row stride each sheet was parsed with (advisory
//! only; the generator always re-derives the natural stride).

use std::sync::atomic::{AtomicU64, Ordering};

use crate::format;

/// Column type, tagged on the wire as a `u32`.
///
/// `StrId` is decoded and encoded exactly like `Str` (same cell width,
/// same string-pool participation) and exists only so the tag byte
/// round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Str,
    StrId,
}

impl ColumnType {
    /// Map a wire tag to a column type, if recognised.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            format::TAG_INT => Some(Self::Int),
            format::TAG_STR => Some(Self::Str),
            format::TAG_STRID => Some(Self::StrId),
            _ => None,
        }
    }

    /// The wire tag.
    pub fn tag(self) -> u32 {
        match self {
            Self::Int => format::TAG_INT,
            Self::Str => format::TAG_STR,
            Self::StrId => format::TAG_STRID,
        }
    }

    /// Human-readable label used in rendered output.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Str => "str",
            Self::StrId => "strID",
        }
    }

    /// Width of a cell of this type in the structural block.
    pub fn cell_width(self) -> usize {
        match self {
            Self::Int => 4,
            Self::Str | Self::StrId => 8,
        }
    }

    /// Whether cells of this type live in the string pool.
    pub fn is_string(self) -> bool {
        matches!(self, Self::Str | Self::StrId)
    }

    /// The default cell value for this type (`0` or `""`).
    pub fn default_cell(self) -> Cell {
        if self.is_string() {
            Cell::Str(String::new())
        } else {
            Cell::Int(0)
        }
    }
}

/// A column definition. MBE columns are unnamed; the type is all there is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub ty: ColumnType,
}

impl Column {
    pub fn new(ty: ColumnType) -> Self {
        Self { ty }
    }

    pub fn type_name(&self) -> &'static str {
        self.ty.type_name()
    }
}

/// A single cell value.
///
/// Integers are held wider than the wire's `i32` so edits can carry any
/// value; encoding wraps to the low 32 bits two's-complement.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Str(String),
}

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

/// An ordered sequence of cells, one per column of the containing sheet.
#[derive(Debug, Clone)]
pub struct Row {
    /// Stable identity token for UI row tracking. Assigned at
    /// construction, never serialised, and ignored by [`content_eq`]
    /// comparisons.
    ///
    /// [`content_eq`]: Sheet::content_eq
    pub id: u64,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            id: NEXT_ROW_ID.fetch_add(1, Ordering::Relaxed),
            cells,
        }
    }
}

/// A named grid of typed cells.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    /// Row stride this sheet was parsed with, which may exceed the
    /// natural sum of column widths (trailing padding in each row).
    /// Advisory only: the generator always emits the natural stride.
    pub parsed_area_size_per_row: Option<u32>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
            parsed_area_size_per_row: None,
        }
    }

    /// Sum of the cell widths of this sheet's columns, which is the
    /// stride the generator emits.
    pub fn natural_row_size(&self) -> usize {
        self.columns.iter().map(|c| c.ty.cell_width()).sum()
    }

    /// A fresh row of default cells matching this sheet's columns.
    pub fn blank_row(&self) -> Row {
        Row::new(self.columns.iter().map(|c| c.ty.default_cell()).collect())
    }

    /// Content equality: row identity tokens and the parsed row stride
    /// are ignored, and `str`/`strID` columns compare as the same class.
    pub fn content_eq(&self, other: &Sheet) -> bool {
        self.name == other.name
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.ty.is_string() == b.ty.is_string())
            && self.rows.len() == other.rows.len()
            && self
                .rows
                .iter()
                .zip(&other.rows)
                .all(|(a, b)| a.cells == b.cells)
    }
}

/// An ordered sequence of sheets. Order is significant: each sheet's
/// structural block position depends on its place in the file.
#[derive(Debug, Clone, Default)]
pub struct MbeFile {
    pub sheets: Vec<Sheet>,
}

impl MbeFile {
    /// Content equality across all sheets; see [`Sheet::content_eq`].
    pub fn content_eq(&self, other: &MbeFile) -> bool {
        self.sheets.len() == other.sheets.len()
            && self
                .sheets
                .iter()
                .zip(&other.sheets)
                .all(|(a, b)| a.content_eq(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for ty in [ColumnType::Int, ColumnType::Str, ColumnType::StrId] {
            assert_eq!(ColumnType::from_tag(ty.tag()), Some(ty));
        }
        assert_eq!(ColumnType::from_tag(0), None);
        assert_eq!(ColumnType::from_tag(3), None);
    }

    #[test]
    fn widths_and_names() {
        assert_eq!(ColumnType::Int.cell_width(), 4);
        assert_eq!(ColumnType::Str.cell_width(), 8);
        assert_eq!(ColumnType::StrId.cell_width(), 8);
        assert_eq!(ColumnType::StrId.type_name(), "strID");
        assert!(!ColumnType::Int.is_string());
        assert!(ColumnType::StrId.is_string());
    }

    #[test]
    fn natural_row_size_sums_widths() {
        let sheet = Sheet::new(
            "m",
            vec![
                Column::new(ColumnType::Int),
                Column::new(ColumnType::StrId),
            ],
        );
        assert_eq!(sheet.natural_row_size(), 12);
    }

    #[test]
    fn blank_row_matches_columns() {
        let sheet = Sheet::new(
            "s",
            vec![Column::new(ColumnType::Str), Column::new(ColumnType::Int)],
        );
        let row = sheet.blank_row();
        assert_eq!(row.cells, vec![Cell::Str(String::new()), Cell::Int(0)]);
    }

    #[test]
    fn row_ids_are_distinct() {
        let a = Row::new(vec![]);
        let b = Row::new(vec![]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn content_eq_ignores_row_ids_and_stride_hint() {
        let mut a = Sheet::new("s", vec![Column::new(ColumnType::Int)]);
        a.rows.push(Row::new(vec![Cell::Int(5)]));
        let mut b = a.clone();
        b.rows = vec![Row::new(vec![Cell::Int(5)])]; // fresh id
        b.parsed_area_size_per_row = Some(16);
        assert!(a.content_eq(&b));
    }

    #[test]
    fn content_eq_treats_str_and_strid_alike() {
        let mut a = Sheet::new("s", vec![Column::new(ColumnType::Str)]);
        a.rows.push(Row::new(vec![Cell::Str("v".into())]));
        let mut b = Sheet::new("s", vec![Column::new(ColumnType::StrId)]);
        b.rows.push(Row::new(vec![Cell::Str("v".into())]));
        assert!(a.content_eq(&b));
    }

    #[test]
    fn content_eq_detects_differences() {
        let mut a = Sheet::new("s", vec![Column::new(ColumnType::Int)]);
        a.rows.push(Row::new(vec![Cell::Int(1)]));
        let mut b = a.clone();
        b.rows = vec![Row::new(vec![Cell::Int(2)])];
        assert!(!a.content_eq(&b));

        let c = Sheet::new("s", vec![Column::new(ColumnType::Str)]);
        assert!(!Sheet::new("s", vec![Column::new(ColumnType::Int)]).content_eq(&c));
    }
}
