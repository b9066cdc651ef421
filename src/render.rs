//! Text rendering of parsed sheets for the CLI viewer.
//!
//! Produces either tab-separated plain text or markdown tables. MBE
//! columns carry no names, so markdown tables get a header row of the
//! column type labels (`int` / `str` / `strID`).

use crate::model::{Cell, Column, MbeFile, Sheet};

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Int(v) => v.to_string(),
        Cell::Str(s) => s.clone(),
    }
}

/// Returns true if no cell in the sheet renders non-blank text. Covers
/// sheets with no rows, no columns, or only empty string cells; an int
/// cell always renders a digit and keeps its sheet visible.
fn skip_empty_sheet(sheet: &Sheet) -> bool {
    sheet.rows.iter().all(|row| {
        row.cells
            .iter()
            .all(|cell| cell_text(cell).trim().is_empty())
    })
}

// ── Plain text rendering ──────────────────────────────────────────

pub fn render_plain(file: &MbeFile) -> String {
    let mut out = String::new();
    let multiple = file.sheets.len() > 1;

    for (i, sheet) in file.sheets.iter().enumerate() {
        if skip_empty_sheet(sheet) {
            continue;
        }

        if multiple {
            if i > 0 {
                out.push('\n');
            }
            out.push_str("--- ");
            out.push_str(&sheet.name);
            out.push_str(" ---\n");
        }

        for row in &sheet.rows {
            let line: String = row
                .cells
                .iter()
                .map(cell_text)
                .collect::<Vec<_>>()
                .join("\t");
            let line = line.trim_end();
            if !line.is_empty() {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    out
}

// ── Markdown rendering ────────────────────────────────────────────

pub fn render_markdown(file: &MbeFile) -> String {
    let mut out = String::new();
    let multiple = file.sheets.len() > 1;

    for sheet in &file.sheets {
        if skip_empty_sheet(sheet) {
            continue;
        }

        if multiple {
            out.push_str("## ");
            out.push_str(&sheet.name);
            out.push_str("\n\n");
        }

        // Column type labels stand in for the header row.
        out.push_str("| ");
        out.push_str(
            &sheet
                .columns
                .iter()
                .map(Column::type_name)
                .collect::<Vec<_>>()
                .join(" | "),
        );
        out.push_str(" |\n|");
        for _ in &sheet.columns {
            out.push_str(" --- |");
        }
        out.push('\n');

        for row in &sheet.rows {
            out.push_str("| ");
            out.push_str(
                &row.cells
                    .iter()
                    .map(|c| escape_pipe(&cell_text(c)))
                    .collect::<Vec<_>>()
                    .join(" | "),
            );
            out.push_str(" |\n");
        }
        out.push('\n');
    }

    out
}

/// Escape pipe characters for markdown table cells.
fn escape_pipe(s: &str) -> String {
    s.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnType, Row, Sheet};

    fn sample_file() -> MbeFile {
        let mut people = Sheet::new(
            "people",
            vec![Column::new(ColumnType::Int), Column::new(ColumnType::Str)],
        );
        people.rows.push(Row::new(vec![
            Cell::Int(30),
            Cell::Str("Alice".into()),
        ]));
        people
            .rows
            .push(Row::new(vec![Cell::Int(25), Cell::Str("Bob".into())]));

        let mut places = Sheet::new("places", vec![Column::new(ColumnType::StrId)]);
        places.rows.push(Row::new(vec![Cell::Str("NYC".into())]));

        MbeFile {
            sheets: vec![people, places],
        }
    }

    // ── render_markdown ──────────────────────────────────────────

    #[test]
    fn markdown_multi_sheet_with_type_headers() {
        let md = render_markdown(&sample_file());
        assert!(md.contains("## people"));
        assert!(md.contains("## places"));
        assert!(md.contains("| int | str |"));
        assert!(md.contains("| --- | --- |"));
        assert!(md.contains("| 30 | Alice |"));
        assert!(md.contains("| strID |"));
        assert!(md.contains("| NYC |"));
    }

    #[test]
    fn markdown_single_sheet_has_no_heading() {
        let mut file = sample_file();
        file.sheets.truncate(1);
        let md = render_markdown(&file);
        assert!(!md.contains("## people"));
        assert!(md.contains("| 25 | Bob |"));
    }

    #[test]
    fn markdown_escapes_pipes() {
        let mut sheet = Sheet::new("s", vec![Column::new(ColumnType::Str)]);
        sheet.rows.push(Row::new(vec![Cell::Str("a|b".into())]));
        let md = render_markdown(&MbeFile {
            sheets: vec![sheet],
        });
        assert!(md.contains("a\\|b"));
    }

    #[test]
    fn markdown_skips_zero_column_sheets() {
        let file = MbeFile {
            sheets: vec![Sheet::new("empty", vec![])],
        };
        assert_eq!(render_markdown(&file), "");
    }

    #[test]
    fn markdown_skips_all_empty_sheets() {
        let mut empty = Sheet::new("blank", vec![Column::new(ColumnType::Str)]);
        empty.rows.push(Row::new(vec![Cell::Str(String::new())]));
        let mut data = Sheet::new("data", vec![Column::new(ColumnType::Str)]);
        data.rows.push(Row::new(vec![Cell::Str("Hello".into())]));

        let md = render_markdown(&MbeFile {
            sheets: vec![empty, data],
        });
        assert!(!md.contains("blank"));
        assert!(md.contains("| Hello |"));
    }

    // ── skip_empty_sheet ─────────────────────────────────────────

    #[test]
    fn empty_sheet_detected() {
        let mut sheet = Sheet::new("e", vec![Column::new(ColumnType::Str)]);
        sheet.rows.push(Row::new(vec![Cell::Str(String::new())]));
        sheet.rows.push(Row::new(vec![Cell::Str("  ".into())]));
        assert!(skip_empty_sheet(&sheet));

        let rowless = Sheet::new("r", vec![Column::new(ColumnType::Int)]);
        assert!(skip_empty_sheet(&rowless));
    }

    #[test]
    fn int_zero_is_not_blank() {
        let mut sheet = Sheet::new("z", vec![Column::new(ColumnType::Int)]);
        sheet.rows.push(Row::new(vec![Cell::Int(0)]));
        assert!(!skip_empty_sheet(&sheet));
        assert_eq!(
            render_plain(&MbeFile {
                sheets: vec![sheet],
            }),
            "0\n"
        );
    }

    // ── render_plain ─────────────────────────────────────────────

    #[test]
    fn plain_is_tab_separated() {
        let text = render_plain(&sample_file());
        assert!(text.contains("30\tAlice"));
        assert!(text.contains("25\tBob"));
        assert!(text.contains("--- people ---"));
        assert!(text.contains("--- places ---"));
    }

    #[test]
    fn plain_single_sheet_has_no_separator() {
        let mut file = sample_file();
        file.sheets.truncate(1);
        let text = render_plain(&file);
        assert!(!text.contains("---"));
    }

    #[test]
    fn negative_ints_render_with_sign() {
        let mut sheet = Sheet::new("n", vec![Column::new(ColumnType::Int)]);
        sheet.rows.push(Row::new(vec![Cell::Int(-7)]));
        let text = render_plain(&MbeFile {
            sheets: vec![sheet],
        });
        assert_eq!(text, "-7\n");
    }
}
