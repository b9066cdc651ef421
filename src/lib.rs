//! Codec for the MBE binary sheet container format.
//!
//! An MBE file is an `"EXPA"`-tagged container holding typed sheets of
//! rows with int and string columns. Int cells live inline in a
//! fixed-stride structural block; string cells are 8-byte placeholders
//! resolved through a trailing `"CHNK"` pool that addresses them by
//! absolute file offset.
//!
//! The public surface is two functions and the model between them:
//! [`parse`] decodes a byte buffer into an [`MbeFile`], and [`generate`]
//! re-encodes an [`MbeFile`] into a fresh buffer. Parsing is tolerant
//! (truncated cells and pool entries degrade to defaults with `tracing`
//! warnings); generation is total and deterministic, and re-selects all
//! alignment padding, so its output is a canonical form.
//!
//! ```
//! use mbecat::{generate, parse, Cell, Column, ColumnType, MbeFile, Sheet};
//!
//! let mut sheet = Sheet::new("scores", vec![Column::new(ColumnType::Int)]);
//! sheet.rows.push(mbecat::Row::new(vec![Cell::Int(42)]));
//! let file = MbeFile { sheets: vec![sheet] };
//!
//! let bytes = generate(&file);
//! assert!(parse(&bytes).unwrap().content_eq(&file));
//! ```

mod buffer;
pub mod encoding;
pub mod error;
mod format;
mod generator;
pub mod model;
pub mod parser;
pub mod render;

pub use encoding::TextEncoding;
pub use error::ParseError;
pub use generator::generate;
pub use model::{Cell, Column, ColumnType, MbeFile, Row, Sheet};
pub use parser::{parse, parse_with, ParseOptions};
