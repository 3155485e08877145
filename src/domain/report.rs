//! Commission report shared by the spreadsheet and CSV exporters.

use super::format::{format_vnd, format_vnd_suffixed};
use super::models::RowStore;

pub const REPORT_HEADER: [&str; 6] = [
    "STT",
    "BILL (A) VNĐ",
    "0.4% VNĐ",
    "BILL (B) VNĐ",
    "0.2% VNĐ",
    "TỔNG VNĐ",
];

pub const REPORT_SHEET_NAME: &str = "Commission Report";

/// One exported line. The ordinal stays numeric; every amount is already
/// formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub ordinal: u32,
    pub bill_a: String,
    pub commission_a: String,
    pub bill_b: String,
    pub commission_b: String,
    pub total: String,
}

impl ReportLine {
    pub fn amount_cells(&self) -> [&str; 5] {
        [
            &self.bill_a,
            &self.commission_a,
            &self.bill_b,
            &self.commission_b,
            &self.total,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommissionReport {
    pub lines: Vec<ReportLine>,
}

impl CommissionReport {
    pub fn from_rows(store: &RowStore) -> Self {
        let lines = store
            .iter()
            .zip(1u32..)
            .map(|(row, ordinal)| ReportLine {
                ordinal,
                bill_a: format_vnd(row.bill_a),
                commission_a: format_vnd_suffixed(row.commission_a()),
                bill_b: format_vnd(row.bill_b),
                commission_b: format_vnd_suffixed(row.commission_b()),
                total: format_vnd_suffixed(row.total()),
            })
            .collect();
        Self { lines }
    }

    pub fn header(&self) -> &'static [&'static str; 6] {
        &REPORT_HEADER
    }
}
