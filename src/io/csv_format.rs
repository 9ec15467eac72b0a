//! CSV format handling for import rows and settlement batches
//!
//! This module centralizes all delimited-format concerns, providing:
//! - The column names of the import format
//! - Conversion from header/value pairs to typed `ImportRow`s
//! - Settlement batch serialization
//!
//! All functions are pure (no file system access) for easy testing.

use crate::types::{
    FieldValue, ImportRow, ReconcileError, SettlementEntry, SettlementHeader, TransferId,
    DESCRIPTION_COLUMNS,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;

/// Field delimiter of import files and settlement batches
pub const DELIMITER: u8 = b';';

pub const COL_ACTIVITY_ID: &str = "ACTIVITY_ID";
pub const COL_TRANSACTION_KEY: &str = "UMSATZ_KEY";
pub const COL_SENDER_BANK_CODE: &str = "SENDER_BLZ";
pub const COL_SENDER_ACCOUNT: &str = "SENDER_KONTO";
pub const COL_SENDER_NAME: &str = "SENDER_NAME";
pub const COL_RECEIVER_BANK_CODE: &str = "RECEIVER_BLZ";
pub const COL_RECEIVER_ACCOUNT: &str = "RECEIVER_KONTO";
pub const COL_RECEIVER_NAME: &str = "RECEIVER_NAME";
pub const COL_AMOUNT: &str = "AMOUNT";
pub const COL_ENTRY_DATE: &str = "ENTRY_DATE";
pub const COL_DEPOT_ACTIVITY_ID: &str = "DEPOT_ACTIVITY_ID";

/// Date layouts accepted in `ENTRY_DATE`, tried in order
const ENTRY_DATE_FORMATS: [&str; 3] = ["%Y%m%d", "%Y-%m-%d", "%d.%m.%Y"];

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Parse an amount, accepting a decimal comma
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .ok()
        .or_else(|| Decimal::from_str(&raw.replace(',', ".")).ok())
}

/// Parse an entry date in any of the accepted layouts
pub fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    ENTRY_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn parse_transfer_id(raw: &str) -> Option<TransferId> {
    raw.parse().ok()
}

/// Description column index (0-based) for a `DESC<n>` column name
fn description_index(column: &str) -> Option<usize> {
    let n: usize = column.strip_prefix("DESC")?.parse().ok()?;
    (1..=DESCRIPTION_COLUMNS).contains(&n).then(|| n - 1)
}

/// Store one column value on the row
///
/// Unknown columns are ignored. Blank values leave the field absent.
pub fn assign_column(row: &mut ImportRow, column: &str, value: &str) {
    let value = non_blank(value);
    match column.trim() {
        COL_ACTIVITY_ID => row.activity_id = value.unwrap_or_default().to_string(),
        COL_TRANSACTION_KEY => row.transaction_key = value.map(str::to_string),
        COL_SENDER_BANK_CODE => row.sender_bank_code = value.map(str::to_string),
        COL_SENDER_ACCOUNT => row.sender_account = value.map(str::to_string),
        COL_SENDER_NAME => row.sender_name = value.map(str::to_string),
        COL_RECEIVER_BANK_CODE => row.receiver_bank_code = value.map(str::to_string),
        COL_RECEIVER_ACCOUNT => row.receiver_account = value.map(str::to_string),
        COL_RECEIVER_NAME => row.receiver_name = value.map(str::to_string),
        COL_AMOUNT => row.amount = FieldValue::parse_with(value, parse_amount),
        COL_ENTRY_DATE => row.entry_date = FieldValue::parse_with(value, parse_entry_date),
        COL_DEPOT_ACTIVITY_ID => {
            row.depot_activity_id = FieldValue::parse_with(value, parse_transfer_id)
        }
        other => {
            if let Some(index) = description_index(other) {
                row.descriptions[index] = value.map(str::to_string);
            }
        }
    }
}

/// Build a row from column/value pairs
///
/// # Examples
///
/// ```
/// use csv_reconciler::io::csv_format::row_from_columns;
///
/// let row = row_from_columns([("ACTIVITY_ID", "1"), ("UMSATZ_KEY", "10")]);
/// assert_eq!(row.activity_id, "1");
/// assert_eq!(row.transaction_key.as_deref(), Some("10"));
/// ```
pub fn row_from_columns<'a, I>(columns: I) -> ImportRow
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut row = ImportRow::default();
    for (column, value) in columns {
        assign_column(&mut row, column, value);
    }
    row
}

/// Write a settlement batch
///
/// The first record is the originator header:
/// `<type>;<account>;<bank code>;<name>;<entry count>;<total>`,
/// followed by one record per entry:
/// `<account>;<bank code>;<name>;<amount>;<subject>`.
/// Amounts are written with two decimal places.
///
/// # Arguments
///
/// * `header` - Originator record
/// * `entries` - Entries in append order
/// * `output` - Destination writer
///
/// # Errors
///
/// * `ReconcileError::Application` if the entry total overflows; nothing is
///   written in that case
/// * `ReconcileError::Io` if writing fails
pub fn write_settlement_batch(
    header: &SettlementHeader,
    entries: &[SettlementEntry],
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_writer(output);

    let total = entries
        .iter()
        .try_fold(Decimal::ZERO, |sum, entry| sum.checked_add(entry.amount))
        .ok_or_else(|| ReconcileError::application("settlement total overflows"))?;

    writer.write_record([
        header.record_type.clone(),
        header.account.clone(),
        header.bank_code.clone(),
        header.name.clone(),
        entries.len().to_string(),
        format!("{:.2}", total),
    ])?;

    for entry in entries {
        writer.write_record([
            entry.sender_account.clone(),
            entry.sender_bank_code.clone(),
            entry.sender_name.clone(),
            format!("{:.2}", entry.amount),
            entry.subject.clone(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("10", Some(Decimal::new(10, 0)))]
    #[case::dot("5.25", Some(Decimal::new(525, 2)))]
    #[case::comma("5,25", Some(Decimal::new(525, 2)))]
    #[case::negative("-10.00", Some(Decimal::new(-1000, 2)))]
    #[case::garbage("abc", None)]
    fn test_parse_amount(#[case] raw: &str, #[case] expected: Option<Decimal>) {
        assert_eq!(parse_amount(raw), expected);
    }

    #[rstest]
    #[case::compact("20240131", Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()))]
    #[case::iso("2024-01-31", Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()))]
    #[case::german("31.01.2024", Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()))]
    #[case::invalid("20241331", None)]
    fn test_parse_entry_date(#[case] raw: &str, #[case] expected: Option<NaiveDate>) {
        assert_eq!(parse_entry_date(raw), expected);
    }

    #[rstest]
    #[case("DESC1", Some(0))]
    #[case("DESC14", Some(13))]
    #[case("DESC0", None)]
    #[case("DESC15", None)]
    #[case("DESCRIPTION", None)]
    fn test_description_index(#[case] column: &str, #[case] expected: Option<usize>) {
        assert_eq!(description_index(column), expected);
    }

    #[test]
    fn test_row_from_columns_types_fields() {
        let row = row_from_columns([
            ("ACTIVITY_ID", " 17 "),
            ("UMSATZ_KEY", "10"),
            ("SENDER_BLZ", "00000000"),
            ("AMOUNT", "5"),
            ("ENTRY_DATE", "20240102"),
            ("DEPOT_ACTIVITY_ID", ""),
            ("DESC2", "ject"),
            ("KONTONUMMER", "000000001"),
        ]);

        assert_eq!(row.activity_id, "17");
        assert_eq!(row.transaction_key.as_deref(), Some("10"));
        assert_eq!(row.sender_bank_code.as_deref(), Some("00000000"));
        assert_eq!(row.amount, FieldValue::Valid(Decimal::new(5, 0)));
        assert_eq!(
            row.entry_date,
            FieldValue::Valid(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
        assert!(row.depot_activity_id.is_missing());
        assert_eq!(row.descriptions[1].as_deref(), Some("ject"));
        assert_eq!(row.descriptions[0], None);
    }

    #[test]
    fn test_row_from_columns_keeps_malformed_values() {
        let row = row_from_columns([("AMOUNT", "lots"), ("DEPOT_ACTIVITY_ID", "x1")]);
        assert_eq!(row.amount, FieldValue::Malformed("lots".to_string()));
        assert_eq!(row.depot_activity_id, FieldValue::Malformed("x1".to_string()));
    }

    #[rstest]
    #[case::empty(vec![], "RS;8888888888;99999999;Credit collection;0;0.00\n")]
    #[case::two_entries(
        vec![
            SettlementEntry {
                sender_account: "0101881952".to_string(),
                sender_bank_code: "30020900".to_string(),
                sender_name: "Max Mustermann".to_string(),
                amount: Decimal::new(10, 0),
                subject: "Subject".to_string(),
            },
            SettlementEntry {
                sender_account: "12345".to_string(),
                sender_bank_code: "10020030".to_string(),
                sender_name: "Erika Musterfrau".to_string(),
                amount: Decimal::new(250, 2),
                subject: "Beitrag".to_string(),
            },
        ],
        "RS;8888888888;99999999;Credit collection;2;12.50\n\
         0101881952;30020900;Max Mustermann;10.00;Subject\n\
         12345;10020030;Erika Musterfrau;2.50;Beitrag\n"
    )]
    fn test_write_settlement_batch(
        #[case] entries: Vec<SettlementEntry>,
        #[case] expected_output: &str,
    ) {
        let mut output = Vec::new();
        write_settlement_batch(&SettlementHeader::default(), &entries, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), expected_output);
    }

    #[test]
    fn test_write_settlement_batch_rejects_total_overflow() {
        let entry = SettlementEntry {
            sender_account: "0101881952".to_string(),
            sender_bank_code: "30020900".to_string(),
            sender_name: "Max Mustermann".to_string(),
            amount: Decimal::MAX,
            subject: "Subject".to_string(),
        };
        let mut output = Vec::new();

        let error = write_settlement_batch(
            &SettlementHeader::default(),
            &[entry.clone(), entry],
            &mut output,
        )
        .unwrap_err();

        assert_eq!(error.to_string(), "settlement total overflows");
        assert!(output.is_empty());
    }
}
