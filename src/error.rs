//! Error types for the MBE codec.
//!
//! Only two anomalies abort a parse: a wrong leading magic, and a column
//! type tag outside the known set (the sheet's geometry cannot be
//! trusted past that point). Everything else (truncated cells, truncated
//! pool entries, a missing pool) degrades to zero/empty defaults with a
//! `tracing` warning. Generation never fails.

/// Fatal parse errors.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The leading 4 bytes are not `"EXPA"`.
    #[error("not an MBE container (missing EXPA magic)")]
    InvalidMagic,

    /// A column type tag is not in `{2, 7, 8}`.
    #[error("sheet {sheet}, column {column}: unknown column type tag {value}")]
    UnknownColumnType {
        value: u32,
        sheet: usize,
        column: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ParseError>;
