use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsb, Xlsx};

use crate::domain::{
    models::TabularPreview,
    preview_service::{Result, TabularParser, UploadError},
    value_objects::TabularFormat,
};

/// OLE Compound Document magic bytes (used by .xls)
const OLE_MAGIC: [u8; 4] = [0xD0, 0xCF, 0x11, 0xE0];
/// ZIP archive magic bytes (used by .xlsx, .xlsm, .xlsb)
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Spreadsheet parser backed by calamine. Only the first worksheet is read
/// and its first row is the header.
pub struct ExcelParser;

impl ExcelParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularParser for ExcelParser {
    fn parse(&self, filename: &str, bytes: &[u8], preview_rows: usize) -> Result<TabularPreview> {
        let range = first_sheet_range(bytes)?;
        Ok(range_to_preview(filename, &range, preview_rows))
    }

    fn supports(&self, format: TabularFormat) -> bool {
        format.is_spreadsheet()
    }

    fn name(&self) -> &str {
        "excel"
    }
}

/// Detect the container from the content; the extension is only a hint
fn first_sheet_range(bytes: &[u8]) -> Result<Range<Data>> {
    let magic = bytes.get(..4);

    if magic == Some(OLE_MAGIC.as_slice()) {
        let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes))
            .map_err(|e| UploadError::Parse(format!("failed to open XLS: {e}")))?;
        return read_first_sheet(&mut workbook);
    }

    if magic == Some(ZIP_MAGIC.as_slice()) {
        // XLSX and XLSM first, then XLSB; they share the ZIP container
        if let Ok(mut workbook) = Xlsx::new(Cursor::new(bytes)) {
            return read_first_sheet(&mut workbook);
        }
        if let Ok(mut workbook) = Xlsb::new(Cursor::new(bytes)) {
            return read_first_sheet(&mut workbook);
        }
        return Err(UploadError::Parse(
            "failed to parse as XLSX or XLSB format".to_string(),
        ));
    }

    Err(UploadError::Parse("unrecognized spreadsheet format".to_string()))
}

fn read_first_sheet<RS, R>(workbook: &mut R) -> Result<Range<Data>>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| UploadError::Parse("workbook has no worksheets".to_string()))?;

    workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| UploadError::Parse(format!("failed to read sheet '{sheet_name}': {e:?}")))
}

fn range_to_preview(filename: &str, range: &Range<Data>, preview_rows: usize) -> TabularPreview {
    let mut rows = range.rows();

    let columns = rows
        .next()
        .map(|header| header.iter().map(cell_to_string).collect())
        .unwrap_or_default();

    let mut preview = TabularPreview::new(filename, columns);
    for row in rows {
        preview.push_row(row.iter().map(cell_to_string).collect(), preview_rows);
    }
    preview
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers without a decimal point
            if f.fract() == 0.0 {
                format!("{f:.0}")
            } else {
                format!("{f}")
            }
        }
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_owned(),
        Data::DateTime(dt) => format!("{dt}"),
        Data::Error(e) => format!("#ERROR: {e:?}"),
    }
}
