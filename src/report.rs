use crate::error::ReportError;
use crate::results::{NewsRecord, REPORT_HEADERS, ReportCell};
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Persists the final record list
pub trait ReportWriter {
    /// Write `records` in order, returning where they were written
    fn write(&self, records: &[NewsRecord]) -> Result<PathBuf, ReportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Json => "json",
        }
    }

    /// Writer for this format targeting `path`
    pub fn writer(&self, path: impl Into<PathBuf>) -> Box<dyn ReportWriter> {
        match self {
            ReportFormat::Xlsx => Box::new(XlsxReportWriter::new(path)),
            ReportFormat::Json => Box::new(JsonReportWriter::new(path)),
        }
    }
}

/// Single-sheet spreadsheet with a bold header row
#[derive(Debug, Clone)]
pub struct XlsxReportWriter {
    path: PathBuf,
}

impl XlsxReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for XlsxReportWriter {
    fn write(&self, records: &[NewsRecord]) -> Result<PathBuf, ReportError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header_format = Format::new().set_bold();

        for (col, header) in REPORT_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }
        worksheet.set_column_width(0, 60)?;
        worksheet.set_column_width(2, 80)?;
        worksheet.set_column_width(3, 40)?;

        for (index, record) in records.iter().enumerate() {
            let row = index as u32 + 1;
            for (col, cell) in record.to_row().into_iter().enumerate() {
                let col = col as u16;
                match cell {
                    ReportCell::Text(text) => worksheet.write_string(row, col, text)?,
                    ReportCell::Number(n) => worksheet.write_number(row, col, n)?,
                    ReportCell::Bool(b) => worksheet.write_boolean(row, col, b)?,
                };
            }
        }

        ensure_parent(&self.path)?;
        workbook.save(&self.path)?;
        ::log::info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(self.path.clone())
    }
}

/// Pretty-printed JSON array of records
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for JsonReportWriter {
    fn write(&self, records: &[NewsRecord]) -> Result<PathBuf, ReportError> {
        ensure_parent(&self.path)?;
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), records)?;
        ::log::info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(self.path.clone())
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{NO_IMAGE, RawArticle};

    fn records() -> Vec<NewsRecord> {
        vec![
            NewsRecord::build(
                RawArticle {
                    title: "Fire near Malibu".to_string(),
                    date_text: "Jan. 12, 2024".to_string(),
                    description_text: "Damage at $2,500,000".to_string(),
                    image_url: None,
                },
                1,
                true,
                Some("output/2Fwildfire.jpg".to_string()),
            ),
            NewsRecord::build(RawArticle::default(), 0, false, None),
        ]
    }

    #[test]
    fn test_xlsx_report_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("news_data.xlsx");

        let written = XlsxReportWriter::new(&path).write(&records()).unwrap();

        assert_eq!(written, path);
        let bytes = std::fs::read(&path).unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_json_report_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news_data.json");

        ReportFormat::Json.writer(&path).write(&records()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<NewsRecord> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, records());

        let raw: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(raw[0]["date"], "Jan. 12, 2024");
        assert_eq!(raw[1]["image_filename"], NO_IMAGE);
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        XlsxReportWriter::new(&path).write(&[]).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ReportFormat::default(), ReportFormat::Xlsx);
        assert_eq!(ReportFormat::Json.extension(), "json");
    }
}
