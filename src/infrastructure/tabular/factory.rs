use std::sync::Arc;

use super::{CsvParser, ExcelParser};
use crate::domain::{
    preview_service::{TabularParser, UploadError},
    value_objects::TabularFormat,
};

/// Picks the parser for an uploaded file from its extension
#[derive(Clone)]
pub struct ParserFactory {
    parsers: Vec<Arc<dyn TabularParser>>,
}

impl ParserFactory {
    pub fn new() -> Self {
        Self::with_parsers(vec![Arc::new(CsvParser::new()), Arc::new(ExcelParser::new())])
    }

    pub fn with_parsers(parsers: Vec<Arc<dyn TabularParser>>) -> Self {
        Self { parsers }
    }

    /// Create a parser for a specific format
    pub fn create_parser(&self, format: TabularFormat) -> Option<Arc<dyn TabularParser>> {
        self.parsers.iter().find(|p| p.supports(format)).cloned()
    }

    /// Resolve the parser for `filename`, rejecting unknown extensions
    pub fn for_filename(
        &self,
        filename: &str,
    ) -> Result<(TabularFormat, Arc<dyn TabularParser>), UploadError> {
        let unsupported = || {
            let ext = std::path::Path::new(filename)
                .extension()
                .and_then(|os| os.to_str())
                .unwrap_or("");
            UploadError::UnsupportedFormat(ext.to_string())
        };

        let format = TabularFormat::from_filename(filename).ok_or_else(unsupported)?;
        let parser = self.create_parser(format).ok_or_else(unsupported)?;
        Ok((format, parser))
    }
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}
