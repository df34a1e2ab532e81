//! Clinic report reshaping
//!
//! The clinic management system exports two reports, both with a chart
//! number in a `No.` column and a trailing summary row. Reshaping brings
//! them into the exact column layout of the destination data sources
//! before upload.

use anyhow::{Context, Result, bail};
use clap::ValueEnum;

use crate::table::{CellValue, Table};

/// Chart number column shared by both reports and both data sources; the
/// join key for cross-referencing.
pub const CHART_NO: &str = "차트번호";

/// Columns uploaded from the reservation report, in order.
const RESERVATION_COLUMNS: [&str; 14] = [
    "등록일",
    "예약일시",
    "차트번호",
    "고객명",
    "구분",
    "상태",
    "수술/시술",
    "상담자",
    "원장",
    "국가",
    "고객1차경로",
    "고객2차경로",
    "메모",
    "특이사항",
];

/// Columns uploaded from the billing report, in order.
const BILLING_COLUMNS: [&str; 12] = [
    "정산일",
    "차트번호",
    "고객명",
    "상태",
    "최종상태",
    "상담자",
    "국가",
    "1차경로",
    "2차경로",
    "3차경로",
    "지점",
    "수술/시술비",
];

/// Which clinic report a workbook contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// 예약 (reservation) report
    Reservation,
    /// 정산 (billing/settlement) report
    Billing,
}

impl ReportKind {
    /// Reshape a raw report table into upload form.
    pub fn preprocess(self, table: Table) -> Result<Table> {
        match self {
            ReportKind::Reservation => preprocess_reservation(table),
            ReportKind::Billing => preprocess_billing(table),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Reservation => write!(f, "reservation"),
            ReportKind::Billing => write!(f, "billing"),
        }
    }
}

fn preprocess_reservation(mut table: Table) -> Result<Table> {
    common_reshape(&mut table)?;

    // 예약일시 = 예약일 + " " + 시간, completed to a zoned timestamp
    // (the report carries clinic-local KST times without an offset)
    let date_idx = require_column(&table, "예약일")?;
    let time_idx = require_column(&table, "시간")?;
    let scheduled: Vec<CellValue> = table
        .rows
        .iter()
        .map(|row| match (&row[date_idx], &row[time_idx]) {
            (date, time) if date.is_null() || time.is_null() => CellValue::Null,
            (date, time) => parse_scheduled(&format!("{date} {time}:00.000+09:00")),
        })
        .collect();
    table.add_column("예약일시", scheduled);

    // 등록일 = date part of the 등록일시 timestamp
    let registered_idx = require_column(&table, "등록일시")?;
    let registered: Vec<CellValue> = table
        .rows
        .iter()
        .map(|row| match &row[registered_idx] {
            value if value.is_null() => CellValue::Null,
            value => CellValue::String(value.to_string().chars().take(10).collect()),
        })
        .collect();
    table.add_column("등록일", registered);

    table.select(&RESERVATION_COLUMNS)
}

/// Type the synthesized timestamp when it parses; malformed report cells
/// stay strings and still upload as-is (the API accepts both forms).
fn parse_scheduled(raw: &str) -> CellValue {
    match chrono::DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.3f%:z") {
        Ok(instant) => CellValue::DateTime(instant),
        Err(_) => CellValue::String(raw.to_string()),
    }
}

fn preprocess_billing(mut table: Table) -> Result<Table> {
    common_reshape(&mut table)?;
    table.select(&BILLING_COLUMNS)
}

/// Steps shared by both reports: rename the chart number column, drop the
/// trailing summary row, coerce chart numbers to integers.
fn common_reshape(table: &mut Table) -> Result<()> {
    if !table.rename_column("No.", CHART_NO) {
        bail!("Report is missing the 'No.' column");
    }
    if table.is_empty() {
        bail!("Report has no data rows");
    }
    // Last row is the report's total/summary line
    table.rows.pop();

    let chart_idx = require_column(table, CHART_NO)?;
    for (idx, row) in table.rows.iter_mut().enumerate() {
        let coerced = match &row[chart_idx] {
            CellValue::Int(i) => CellValue::Int(*i),
            CellValue::Float(f) if f.fract() == 0.0 => CellValue::Int(*f as i64),
            CellValue::String(s) => match s.trim().parse::<i64>() {
                Ok(i) => CellValue::Int(i),
                Err(_) => bail!("Row {}: chart number '{}' is not an integer", idx, s),
            },
            other => bail!("Row {}: chart number '{}' is not an integer", idx, other),
        };
        row[chart_idx] = coerced;
    }
    Ok(())
}

fn require_column(table: &Table, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .with_context(|| format!("Report is missing the '{}' column", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> CellValue {
        CellValue::String(text.to_string())
    }

    fn reservation_table() -> Table {
        let mut table = Table::new(
            [
                "No.", "등록일시", "예약일", "시간", "고객명", "구분", "상태", "수술/시술",
                "상담자", "원장", "국가", "고객1차경로", "고객2차경로", "메모", "특이사항",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        );
        table.push_row(vec![
            CellValue::Int(101),
            s("2024-05-01 09:12:00"),
            s("2024-05-10"),
            s("14:30"),
            s("김철수"),
            s("신규"),
            s("예약"),
            s("보톡스"),
            s("이상담"),
            s("박원장"),
            s("한국"),
            s("검색"),
            s("블로그"),
            s("메모"),
            s("없음"),
        ]);
        table.push_row(vec![
            s("102"),
            s("2024-05-02 10:00:00"),
            s("2024-05-11"),
            s("10:00"),
            s("이영희"),
            s("재진"),
            s("예약"),
            s("필러"),
            s("최상담"),
            s("박원장"),
            s("일본"),
            s("소개"),
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
        ]);
        // Trailing summary row as exported by the report
        table.push_row(vec![
            s("합계"),
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            s("2명"),
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
        ]);
        table
    }

    #[test]
    fn test_reservation_reshape() {
        let processed = ReportKind::Reservation
            .preprocess(reservation_table())
            .unwrap();
        assert_eq!(processed.columns, RESERVATION_COLUMNS);
        // Summary row dropped
        assert_eq!(processed.len(), 2);
        // Chart number coerced to integer, even from a string cell
        assert_eq!(processed.get(0, CHART_NO), Some(&CellValue::Int(101)));
        assert_eq!(processed.get(1, CHART_NO), Some(&CellValue::Int(102)));
        // Scheduled timestamp synthesized with the clinic-local offset
        let expected = chrono::DateTime::parse_from_rfc3339("2024-05-10T14:30:00+09:00").unwrap();
        assert_eq!(
            processed.get(0, "예약일시"),
            Some(&CellValue::DateTime(expected))
        );
        // Registration date is the date part of the timestamp
        assert_eq!(processed.get(0, "등록일"), Some(&s("2024-05-01")));
    }

    #[test]
    fn test_billing_reshape() {
        let mut table = Table::new(
            [
                "No.", "정산일", "고객명", "상태", "최종상태", "상담자", "국가", "1차경로",
                "2차경로", "3차경로", "지점", "수술/시술비",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        );
        table.push_row(vec![
            CellValue::Float(201.0),
            s("2024-05-12"),
            s("김철수"),
            s("완료"),
            s("정산완료"),
            s("이상담"),
            s("한국"),
            s("검색"),
            CellValue::Null,
            CellValue::Null,
            s("강남"),
            CellValue::Int(500000),
        ]);
        table.push_row(vec![s("합계"); 12]);

        let processed = ReportKind::Billing.preprocess(table).unwrap();
        assert_eq!(processed.columns, BILLING_COLUMNS);
        assert_eq!(processed.len(), 1);
        assert_eq!(processed.get(0, CHART_NO), Some(&CellValue::Int(201)));
        assert_eq!(processed.get(0, "정산일"), Some(&s("2024-05-12")));
    }

    #[test]
    fn test_missing_chart_column_is_an_error() {
        let mut table = Table::new(vec!["이름".to_string()]);
        table.push_row(vec![s("x")]);
        assert!(ReportKind::Billing.preprocess(table).is_err());
    }
}
