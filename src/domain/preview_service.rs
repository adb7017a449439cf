// Domain service interface for previewing uploaded tables

use super::models::TabularPreview;
use super::value_objects::TabularFormat;

/// Rows included in a preview unless configured otherwise
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("no file was uploaded")]
    MissingFile,

    #[error("unsupported file type '{0}': expected one of csv, xlsx, xls, xlsm, xlsb")]
    UnsupportedFormat(String),

    #[error("could not process file: {0}")]
    Decode(String),

    #[error("could not process file: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, UploadError>;

/// Parser for one family of tabular formats
pub trait TabularParser: Send + Sync {
    /// Parse `bytes` into a preview holding at most `preview_rows` rows
    fn parse(&self, filename: &str, bytes: &[u8], preview_rows: usize) -> Result<TabularPreview>;

    /// Formats this parser accepts
    fn supports(&self, format: TabularFormat) -> bool;

    /// Get the name of this parser
    fn name(&self) -> &str;
}
