// ==========================================
// Asset import - spreadsheet parser
// ==========================================
// Stage 0: bytes → rows keyed by the header row
// Formats: workbooks (.xlsx/.xlsm/.xls/.xlsb/.ods) and CSV (.csv)
// ==========================================

use crate::domain::{CellValue, RawRow};
use crate::importer::asset_importer_trait::FileParser;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Convert one workbook cell
fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s),
        Data::Float(f) => {
            if f.is_finite() {
                CellValue::Number(*f)
            } else {
                CellValue::Empty
            }
        }
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "Sí" } else { "No" }.to_string()),
        Data::Error(_) => CellValue::Empty,
        other => CellValue::text(other.to_string()),
    }
}

/// Build rows from a header + data rows iterator (shared by both parsers)
fn build_rows<I, R>(headers: Vec<String>, data_rows: I) -> Vec<RawRow>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = CellValue>,
{
    let mut records = Vec::new();
    for (idx, data_row) in data_rows.into_iter().enumerate() {
        // header is row 1
        let mut row = RawRow::new(idx + 2);

        for (col_idx, value) in data_row.into_iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                if header.is_empty() {
                    continue;
                }
                row.insert(header.clone(), value);
            }
        }

        // skip fully blank rows
        if row.is_blank() {
            continue;
        }

        records.push(row);
    }
    records
}

// ==========================================
// ExcelParser - binary workbooks
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| ImportError::DecodeError(e.to_string()))?;

        // first sheet only
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::DecodeError("el libro no tiene hojas".to_string()))?
            .map_err(|e| ImportError::DecodeError(e.to_string()))?;

        let mut rows = range.rows();
        let header_row = rows.next().ok_or_else(|| {
            ImportError::DecodeError("la primera hoja no tiene fila de encabezados".to_string())
        })?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        Ok(build_rows(
            headers,
            rows.map(|r| r.iter().map(cell_to_value).collect::<Vec<_>>()),
        ))
    }
}

// ==========================================
// CsvParser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// `;` when the header line has more semicolons than commas
    fn detect_delimiter(bytes: &[u8]) -> u8 {
        let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or(&[]);
        let semicolons = first_line.iter().filter(|b| **b == b';').count();
        let commas = first_line.iter().filter(|b| **b == b',').count();
        if semicolons > commas {
            b';'
        } else {
            b','
        }
    }
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // rows may differ in length
            .delimiter(Self::detect_delimiter(bytes))
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::DecodeError(
                "el CSV no tiene fila de encabezados".to_string(),
            ));
        }

        let mut data_rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            data_rows.push(record.iter().map(CellValue::text).collect::<Vec<_>>());
        }

        Ok(build_rows(headers, data_rows))
    }
}

// ==========================================
// SpreadsheetParser - format picked by extension
// ==========================================
pub struct SpreadsheetParser;

impl SpreadsheetParser {
    /// `.csv` or one of the workbook formats (case-insensitive)
    pub fn is_supported_extension(ext: &str) -> bool {
        let ext = ext.to_lowercase();
        ext == "csv" || WORKBOOK_EXTENSIONS.contains(&ext.as_str())
    }
}

impl FileParser for SpreadsheetParser {
    /// Uploaded bytes are treated as a binary workbook
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        ExcelParser.parse_bytes(bytes)
    }

    fn parse_file(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if !Self::is_supported_extension(&ext) {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        if ext == "csv" {
            CsvParser.parse_file(file_path)
        } else {
            ExcelParser.parse_file(file_path)
        }
    }
}
