//! Export functionality for growth schedules
//!
//! Supports:
//! - CSV export of month-by-month balances (`month,option,balance`)
//! - JSON export of any serializable engine output

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::projection::ScheduleRow;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    month: u32,
    option: &'a str,
    balance: String,
}

/// Write schedule rows as CSV, balances to 2 decimal places.
/// The header is written even when there are no rows.
pub fn write_schedule_csv<W: Write>(rows: &[ScheduleRow], writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(["month", "option", "balance"])?;
    for row in rows {
        csv.serialize(CsvRow {
            month: row.month,
            option: &row.option,
            balance: format!("{:.2}", row.balance),
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Schedule rows as a CSV string
pub fn schedule_csv_string(rows: &[ScheduleRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_schedule_csv(rows, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write schedule rows as a pretty-printed JSON array
pub fn write_schedule_json<W: Write>(rows: &[ScheduleRow], writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}

/// Write rows in the requested format
pub fn write_schedule<W: Write>(rows: &[ScheduleRow], format: ExportFormat, writer: W) -> Result<()> {
    match format {
        ExportFormat::Csv => write_schedule_csv(rows, writer),
        ExportFormat::Json => write_schedule_json(rows, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ScheduleRow> {
        vec![
            ScheduleRow {
                month: 1,
                option: "Savings Account".to_string(),
                balance: 1003.333333,
            },
            ScheduleRow {
                month: 1,
                option: "Real Estate, Tier 1".to_string(),
                balance: 1008.0,
            },
        ]
    }

    #[test]
    fn test_csv_header_and_rounding() {
        let csv = schedule_csv_string(&rows()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "month,option,balance");
        assert_eq!(lines[1], "1,Savings Account,1003.33");
        // Commas in option names are quoted
        assert_eq!(lines[2], "1,\"Real Estate, Tier 1\",1008.00");
    }

    #[test]
    fn test_empty_schedule_writes_header() {
        let csv = schedule_csv_string(&[]).unwrap();
        assert_eq!(csv, "month,option,balance\n");
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        write_schedule(&rows(), ExportFormat::Json, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[1]["balance"], 1008.0);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
