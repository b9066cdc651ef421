//! MBE container generator.
//!
//! Encoding runs in five phases. Phase A encodes each sheet's name and
//! computes its natural row stride. Phase B simulates the header walk to
//! pin down the exact post-header offset, since string pool entries carry
//! absolute file offsets into the structural blocks that follow it.
//! Phase C writes the headers for real and, knowing each sheet's block
//! position, collects a pool entry for every non-empty string cell.
//! Phase D writes the structural blocks (int cells inline, 8 NUL bytes
//! per string cell). Phase E emits the `"CHNK"` pool, entries sorted by
//! target offset, each body NUL-padded to keep the following entry's
//! header aligned. An empty pool emits no `"CHNK"` magic at all.
//!
//! Generation is total for any model holding the documented invariants
//! and deterministic: the same file yields the same bytes. Padding is
//! never copied from a parsed file; it is reselected here, so re-encoding
//! is canonicalising.

use crate::buffer;
use crate::format;
use crate::model::{Cell, ColumnType, MbeFile, Sheet};

struct SheetPlan<'a> {
    sheet: &'a Sheet,
    name_bytes: &'a [u8],
    padded_name_len: usize,
    row_size: usize,
}

/// Encode a file into a fresh MBE container buffer.
pub fn generate(file: &MbeFile) -> Vec<u8> {
    // Phase A: per-sheet precomputation. Names are always written UTF-8.
    let mut plans: Vec<SheetPlan> = file
        .sheets
        .iter()
        .map(|sheet| SheetPlan {
            sheet,
            name_bytes: sheet.name.as_bytes(),
            padded_name_len: 0,
            row_size: sheet.natural_row_size(),
        })
        .collect();

    // Phase B: dry-run the header walk to learn where the structural
    // blocks will start, choosing each name's padding against the
    // simulated write offset.
    let mut cursor = 8; // magic + sheet count
    for plan in &mut plans {
        cursor += 4; // name length field
        plan.padded_name_len =
            plan.name_bytes.len() + format::nul_padding(cursor, plan.name_bytes.len());
        cursor += plan.padded_name_len;
        cursor += 4; // column count
        cursor += 4 * plan.sheet.columns.len();
        cursor += 8; // area size per row + row count
    }
    let header_end = cursor;

    // Phase C: write the headers and collect pool entries, tracking each
    // string cell's absolute offset in the structural block.
    let mut out = Vec::with_capacity(header_end);
    out.extend_from_slice(&format::EXPA_MAGIC);
    buffer::write_u32_le(&mut out, file.sheets.len() as u32);

    let mut block_start = header_end;
    let mut pool_entries: Vec<(usize, &[u8])> = Vec::new();
    for plan in &plans {
        buffer::write_u32_le(&mut out, plan.padded_name_len as u32);
        out.extend_from_slice(plan.name_bytes);
        out.resize(out.len() + plan.padded_name_len - plan.name_bytes.len(), 0);
        buffer::write_u32_le(&mut out, plan.sheet.columns.len() as u32);
        for col in &plan.sheet.columns {
            buffer::write_u32_le(&mut out, col.ty.tag());
        }
        buffer::write_u32_le(&mut out, plan.row_size as u32);
        buffer::write_u32_le(&mut out, plan.sheet.rows.len() as u32);

        for (r, row) in plan.sheet.rows.iter().enumerate() {
            let mut cell_offset = block_start + r * plan.row_size;
            for (c, col) in plan.sheet.columns.iter().enumerate() {
                if col.ty.is_string() {
                    if let Some(Cell::Str(s)) = row.cells.get(c) {
                        if !s.is_empty() {
                            pool_entries.push((cell_offset, s.as_bytes()));
                        }
                    }
                }
                cell_offset += col.ty.cell_width();
            }
        }
        block_start += plan.row_size * plan.sheet.rows.len();
    }
    debug_assert_eq!(out.len(), header_end);

    // Phase D: structural blocks. Int cells wrap to the low 32 bits;
    // string cells are 8-byte placeholders the pool points back into.
    for plan in &plans {
        for row in &plan.sheet.rows {
            for (c, col) in plan.sheet.columns.iter().enumerate() {
                match (col.ty, row.cells.get(c)) {
                    (ColumnType::Int, Some(Cell::Int(v))) => {
                        buffer::write_i32_le(&mut out, *v as i32);
                    }
                    (ColumnType::Int, _) => buffer::write_i32_le(&mut out, 0),
                    (ColumnType::Str | ColumnType::StrId, _) => {
                        out.extend_from_slice(&[0u8; 8]);
                    }
                }
            }
        }
    }

    // Phase E: the string pool. Offsets are strictly increasing by
    // construction; the stable sort keeps declaration order on ties.
    if !pool_entries.is_empty() {
        pool_entries.sort_by_key(|&(offset, _)| offset);
        out.extend_from_slice(&format::CHNK_MAGIC);
        buffer::write_u32_le(&mut out, pool_entries.len() as u32);
        for (target, text) in pool_entries {
            let body_start = out.len() + 8;
            let padding = format::nul_padding(body_start, text.len());
            buffer::write_u32_le(&mut out, target as u32);
            buffer::write_u32_le(&mut out, (text.len() + padding) as u32);
            out.extend_from_slice(text);
            out.resize(out.len() + padding, 0);
        }
    }

    out
}
