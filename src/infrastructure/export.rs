use crate::domain::{CommissionReport, REPORT_SHEET_NAME};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "Hoa_Hong_CTV";
const FALLBACK_NAME: &str = "User";

/// `Hoa_Hong_CTV_<name or "User">_<YYYY-MM-DD>.<extension>`
pub fn export_file_name(display_name: &str, date: NaiveDate, extension: &str) -> String {
    let name = if display_name.is_empty() { FALLBACK_NAME } else { display_name };
    let name: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    format!("{}_{}_{}.{}", FILE_PREFIX, name, date.format("%Y-%m-%d"), extension)
}

/// Today's date in UTC, matching an ISO-8601 timestamp's date part.
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

pub struct XlsxExporter;

impl XlsxExporter {
    /// Writes the report as a single-sheet workbook at `path`.
    pub fn export(report: &CommissionReport, path: &Path) -> Result<PathBuf> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(REPORT_SHEET_NAME)?;

        for (col, title) in report.header().iter().enumerate() {
            worksheet.write_string(0, col as u16, *title)?;
        }

        for (i, line) in report.lines.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet.write_number(row, 0, line.ordinal as f64)?;
            for (offset, cell) in line.amount_cells().iter().enumerate() {
                worksheet.write_string(row, (offset + 1) as u16, *cell)?;
            }
        }

        workbook
            .save(path)
            .with_context(|| format!("saving workbook to {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}

pub struct CsvExporter;

impl CsvExporter {
    pub fn export(report: &CommissionReport, path: &Path) -> Result<PathBuf> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;

        writer.write_record(report.header())?;
        for line in &report.lines {
            let ordinal = line.ordinal.to_string();
            let mut record = vec![ordinal.as_str()];
            record.extend(line.amount_cells());
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, RowStore};

    fn sample_report() -> CommissionReport {
        let mut store = RowStore::default();
        store.update_cell(1, Column::A, 1_000_000.0);
        store.update_cell(1, Column::B, 500_000.0);
        CommissionReport::from_rows(&store)
    }

    #[test]
    fn test_file_name_with_display_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            export_file_name("Lan", date, "xlsx"),
            "Hoa_Hong_CTV_Lan_2024-03-07.xlsx"
        );
    }

    #[test]
    fn test_file_name_without_display_name() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(
            export_file_name("", date, "csv"),
            "Hoa_Hong_CTV_User_2025-12-31.csv"
        );
    }

    #[test]
    fn test_file_name_strips_path_separators() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            export_file_name("a/b", date, "xlsx"),
            "Hoa_Hong_CTV_a_b_2024-01-01.xlsx"
        );
    }

    #[test]
    fn test_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        CsvExporter::export(&sample_report(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.get(0), Some("STT"));
        assert_eq!(headers.get(5), Some("TỔNG VNĐ"));

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 9);
        assert_eq!(
            records[0].iter().collect::<Vec<_>>(),
            vec!["1", "1.000.000", "4.000 VNĐ", "500.000", "1.000 VNĐ", "5.000 VNĐ"]
        );
    }

    #[test]
    fn test_xlsx_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let written = XlsxExporter::export(&sample_report(), &path).unwrap();

        assert_eq!(written, path);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
