//! MBE container parser.
//!
//! Decoding runs in four passes over the whole buffer. Pass 1 walks the
//! sheet headers. Pass 2 lays out the structural blocks, which are packed
//! back-to-back after the headers, to learn where each sheet's cell data
//! starts and where the string pool may begin. Pass 3 scans for the
//! `"CHNK"` pool and builds an offset-to-string map. Pass 4 materialises
//! rows, reading int cells inline and resolving string cells through the
//! pool map by the absolute file offset of their structural placeholder.
//!
//! The parser is tolerant on read: short buffers, truncated pool entries
//! and dangling back-references all degrade to zero/empty defaults with a
//! warning. Only a bad leading magic or an unknown column type tag abort.

use std::collections::HashMap;

use tracing::warn;

use crate::buffer;
use crate::encoding::TextEncoding;
use crate::error::{ParseError, Result};
use crate::format;
use crate::model::{Cell, Column, ColumnType, MbeFile, Row, Sheet};

/// Options applied while parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Encoding used for sheet names and pool strings.
    pub encoding: TextEncoding,
}

/// Smallest possible sheet header: name length, column count, area size
/// per row, row count, each a `u32`, with an empty name and no columns.
const MIN_SHEET_HEADER_SIZE: usize = 16;

/// Cap on `row_count × column_count` materialised per sheet (defense
/// against degenerate files declaring billions of rows).
const MAX_SHEET_CELLS: usize = 1_000_000;

/// Parse an MBE container with default options (UTF-8 strings).
pub fn parse(data: &[u8]) -> Result<MbeFile> {
    parse_with(data, &ParseOptions::default())
}

/// Parse an MBE container.
pub fn parse_with(data: &[u8], options: &ParseOptions) -> Result<MbeFile> {
    if data.len() < 4 || data[..4] != format::EXPA_MAGIC {
        return Err(ParseError::InvalidMagic);
    }

    let mut descriptors = parse_headers(data, options)?;
    let pool_start = layout_structural_blocks(data, &mut descriptors);
    let pool = parse_string_pool(data, pool_start, &descriptors, options);
    Ok(materialize(data, descriptors, &pool))
}

/// One sheet's header fields plus its structural block position.
#[derive(Debug)]
struct SheetDescriptor {
    name: String,
    columns: Vec<Column>,
    area_size_per_row: usize,
    row_count: usize,
    data_start: usize,
}

// ── Pass 1: sheet headers ─────────────────────────────────────────

fn parse_headers(data: &[u8], options: &ParseOptions) -> Result<Vec<SheetDescriptor>> {
    let mut offset = 4;
    let declared = buffer::read_u32_le(data, offset) as usize;
    offset += 4;

    // A sheet header is at least 16 bytes, so a count beyond what the
    // rest of the buffer could hold is garbage.
    let max_sheets = data.len().saturating_sub(offset) / MIN_SHEET_HEADER_SIZE;
    let sheet_count = if declared > max_sheets {
        warn!(declared, max_sheets, "sheet count exceeds buffer capacity; clamping");
        max_sheets
    } else {
        declared
    };

    let mut descriptors = Vec::with_capacity(sheet_count);
    for sheet_idx in 0..sheet_count {
        let name_len = buffer::read_u32_le(data, offset) as usize;
        offset += 4;
        let name = buffer::decode_string(data, offset, name_len, options.encoding);
        offset = offset.saturating_add(name_len);

        let column_count = buffer::read_u32_le(data, offset) as usize;
        offset += 4;
        let mut columns = Vec::with_capacity(column_count.min(data.len() / 4));
        for col_idx in 0..column_count {
            let tag = buffer::read_u32_le(data, offset);
            offset += 4;
            let ty = ColumnType::from_tag(tag).ok_or(ParseError::UnknownColumnType {
                value: tag,
                sheet: sheet_idx,
                column: col_idx,
            })?;
            columns.push(Column::new(ty));
        }

        let area_size_per_row = buffer::read_u32_le(data, offset) as usize;
        offset += 4;
        let row_count = buffer::read_u32_le(data, offset) as usize;
        offset += 4;

        descriptors.push(SheetDescriptor {
            name,
            columns,
            area_size_per_row,
            row_count,
            data_start: offset, // placeholder; assigned in pass 2
        });
    }

    // Structural blocks begin right after the last header.
    for d in &mut descriptors {
        d.data_start = offset;
    }
    Ok(descriptors)
}

// ── Pass 2: structural block layout ───────────────────────────────

/// Assign each sheet its structural block start and return the earliest
/// offset the string pool may begin at.
fn layout_structural_blocks(data: &[u8], descriptors: &mut [SheetDescriptor]) -> usize {
    let mut cursor = descriptors.first().map_or(8, |d| d.data_start);
    for d in descriptors.iter_mut() {
        d.data_start = cursor;
        cursor = cursor.saturating_add(d.area_size_per_row.saturating_mul(d.row_count));
    }
    cursor.min(data.len())
}

// ── Pass 3: string pool ───────────────────────────────────────────

fn parse_string_pool(
    data: &[u8],
    search_start: usize,
    descriptors: &[SheetDescriptor],
    options: &ParseOptions,
) -> HashMap<usize, String> {
    let mut pool = HashMap::new();

    let Some(magic_at) = buffer::find_magic(data, &format::CHNK_MAGIC, search_start) else {
        let strings_expected = descriptors
            .iter()
            .any(|d| d.row_count > 0 && d.columns.iter().any(|c| c.ty.is_string()));
        if strings_expected {
            warn!("no CHNK string pool found; string cells decode as empty");
        }
        return pool;
    };

    let mut cursor = magic_at + 4;
    let entry_count = buffer::read_u32_le(data, cursor) as usize;
    cursor += 4;

    for entry_idx in 0..entry_count {
        if cursor + 8 > data.len() {
            warn!(
                entry = entry_idx,
                entry_count, "string pool entry header truncated; stopping pool scan"
            );
            break;
        }
        let target = buffer::read_u32_le(data, cursor) as usize;
        let len_with_padding = buffer::read_u32_le(data, cursor + 4) as usize;
        cursor += 8;

        if cursor.saturating_add(len_with_padding) > data.len() {
            // Nothing can follow a body that runs past the end of the
            // buffer, so the remaining declared entries are gone too.
            warn!(
                entry = entry_idx,
                target, len_with_padding, "string pool entry body truncated; skipping"
            );
            break;
        }
        let text = buffer::decode_string(data, cursor, len_with_padding, options.encoding);
        pool.insert(target, text);
        cursor += len_with_padding;
    }

    pool
}

// ── Pass 4: row materialisation ───────────────────────────────────

fn materialize(
    data: &[u8],
    descriptors: Vec<SheetDescriptor>,
    pool: &HashMap<usize, String>,
) -> MbeFile {
    let mut sheets = Vec::with_capacity(descriptors.len());

    for d in descriptors {
        let cells_per_row = d.columns.len().max(1);
        let row_count = if d.row_count.saturating_mul(cells_per_row) > MAX_SHEET_CELLS {
            let keep = MAX_SHEET_CELLS / cells_per_row;
            warn!(
                sheet = %d.name,
                declared = d.row_count,
                keep,
                "row count exceeds cell cap; dropping rows past the cap"
            );
            keep
        } else {
            d.row_count
        };

        let mut rows = Vec::with_capacity(row_count);
        for r in 0..row_count {
            // The row cursor resets to the declared stride, which may
            // exceed the natural sum of column widths; trailing bytes in
            // each row are skipped.
            let mut cursor = d.data_start.saturating_add(d.area_size_per_row.saturating_mul(r));
            let mut cells = Vec::with_capacity(d.columns.len());
            for col in &d.columns {
                let cell = match col.ty {
                    ColumnType::Int => Cell::Int(i64::from(buffer::read_i32_le(data, cursor))),
                    ColumnType::Str | ColumnType::StrId => {
                        Cell::Str(pool.get(&cursor).cloned().unwrap_or_default())
                    }
                };
                cells.push(cell);
                cursor += col.ty.cell_width();
            }
            rows.push(Row::new(cells));
        }

        sheets.push(Sheet {
            name: d.name,
            columns: d.columns,
            rows,
            parsed_area_size_per_row: Some(d.area_size_per_row as u32),
        });
    }

    MbeFile { sheets }
}
