use crate::domain::{
    models::TabularPreview,
    preview_service::{Result, TabularParser, UploadError},
    value_objects::TabularFormat,
};

/// UTF-8 CSV with a header row. Rows may differ in length from the header.
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularParser for CsvParser {
    fn parse(&self, filename: &str, bytes: &[u8], preview_rows: usize) -> Result<TabularPreview> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| UploadError::Decode(format!("file is not valid UTF-8: {e}")))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| UploadError::Parse(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut preview = TabularPreview::new(filename, columns);
        for record in reader.records() {
            let record = record.map_err(|e| UploadError::Parse(e.to_string()))?;
            preview.push_row(record.iter().map(str::to_string).collect(), preview_rows);
        }

        Ok(preview)
    }

    fn supports(&self, format: TabularFormat) -> bool {
        format == TabularFormat::Csv
    }

    fn name(&self) -> &str {
        "csv"
    }
}
