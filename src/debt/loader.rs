//! Load debts from CSV drafts or JSON record files

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use super::{check_records, DebtCategory, DebtDraft, DebtRecord, FeeMode};
use crate::error::PlannerResult;

/// Raw CSV row; blank cells mean "not provided"
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    creditor: String,
    #[serde(default)]
    category: Option<String>,
    balance: Option<f64>,
    minimum_payment: Option<f64>,
    interest_rate: Option<f64>,
    term_months: Option<u32>,
    fee: Option<f64>,
    fee_mode: Option<String>,
}

impl CsvRow {
    fn to_draft(self) -> PlannerResult<DebtDraft> {
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<DebtCategory>()?),
        };

        let fee_mode = match self.fee_mode.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<FeeMode>()?),
        };

        Ok(DebtDraft {
            creditor_name: self.creditor,
            category,
            balance: self.balance,
            minimum_payment: self.minimum_payment,
            interest_rate: self.interest_rate,
            term_months: self.term_months,
            fee: self.fee,
            fee_mode,
        })
    }
}

/// Load debt drafts from a CSV file
///
/// Columns: creditor, category, balance, minimum_payment, interest_rate,
/// term_months, fee, fee_mode. Drafts are not validated here.
pub fn load_drafts_csv<P: AsRef<Path>>(path: P) -> PlannerResult<Vec<DebtDraft>> {
    let file = File::open(path)?;
    load_drafts_from_reader(file)
}

/// Load debt drafts from any reader (e.g., string buffer, stdin)
pub fn load_drafts_from_reader<R: Read>(reader: R) -> PlannerResult<Vec<DebtDraft>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut drafts = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        drafts.push(row.to_draft()?);
    }

    Ok(drafts)
}

/// Load fully-formed debt records from a JSON array
///
/// Every record must pass validation; failures are reported together.
pub fn load_records_json<P: AsRef<Path>>(path: P) -> PlannerResult<Vec<DebtRecord>> {
    let file = File::open(path)?;
    let records: Vec<DebtRecord> = serde_json::from_reader(BufReader::new(file))?;
    check_records(&records)?;
    Ok(records)
}
