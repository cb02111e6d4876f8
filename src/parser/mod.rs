pub mod anchor;
pub mod dialect;
pub mod fields;
pub mod normalize;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use dialect::Dialect;

/// Marker stored for a column whose token slot is absent.
pub const MISSING: &str = "N/A";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No token matched the dialect's entity table. Every field offset is
    /// anchor-relative, so nothing can be extracted.
    #[error("no {dialect} entity code found in row")]
    NoEntityFound { dialect: Dialect },

    /// A code from the other dialect's table sat where the anchor should be.
    #[error("entity code {token:?} is not a {expected} code (wrong dialect?)")]
    DialectMismatch { token: String, expected: Dialect },

    /// The token sequence is too short for the fixed field layout.
    #[error("row too short: no value for {column}")]
    MalformedRow { column: &'static str },
}

/// What to do when a token slot is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Store the `"N/A"` marker and keep the row.
    Placeholder,
    /// Fail the row with `MalformedRow`.
    Reject,
}

/// One parsed row. Field order mirrors the dialect's declared column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineRecord {
    pub serial_no: String,
    pub unique_id: String,
    pub name: String,
    pub entity: String,
    pub authorized_on: String,
    pub authorized_length: String,
    pub authorized_capacity: String,
    pub operating_length: String,
    pub jurisdictions: String,
}

impl PipelineRecord {
    /// Cell values in declared column order, parallel to `Dialect::headers`.
    pub fn values(&self) -> [&str; 9] {
        [
            &self.serial_no,
            &self.unique_id,
            &self.name,
            &self.entity,
            &self.authorized_on,
            &self.authorized_length,
            &self.authorized_capacity,
            &self.operating_length,
            &self.jurisdictions,
        ]
    }
}

/// Four-pass pipeline: clean → tokenize → locate anchor → slice fields.
pub fn parse_row(
    raw: &str,
    dialect: Dialect,
    policy: MissingPolicy,
) -> Result<PipelineRecord, ParseError> {
    let line = normalize::clean_raw(raw, dialect);
    let tokens = normalize::tokenize(&line);
    let anchor = anchor::locate(&tokens, dialect)?;
    fields::extract(&tokens, anchor, dialect, policy)
}

/// Outcome of one row in a batch. Failures stay per-row; siblings parse on.
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub line_no: usize,
    pub raw: String,
    pub result: Result<PipelineRecord, ParseError>,
}

/// Parse a batch of rows. Rows are independent, so parsing fans out across
/// threads; collect restores input order and line numbers are 1-based.
pub fn parse_batch(rows: &[String], dialect: Dialect, policy: MissingPolicy) -> Vec<RowOutcome> {
    rows.par_iter()
        .enumerate()
        .map(|(i, raw)| RowOutcome {
            line_no: i + 1,
            raw: raw.clone(),
            result: parse_row(raw, dialect, policy),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source;

    #[test]
    fn petroleum_worked_example() {
        let row = "12 17.08 Paradip – Raipur Ranchi IOCL 17.08.2015 1108 5 1073 Odisha, Jharkhand and Chhattisgarh";
        let rec = parse_row(row, Dialect::Petroleum, MissingPolicy::Placeholder).unwrap();
        assert_eq!(rec.serial_no, "12");
        assert_eq!(rec.unique_id, "17.08");
        assert_eq!(rec.name, "Paradip – Raipur Ranchi");
        assert_eq!(rec.entity, "IOCL");
        assert_eq!(rec.authorized_on, "17.08.2015");
        assert_eq!(rec.authorized_length, "1108");
        assert_eq!(rec.authorized_capacity, "5");
        assert_eq!(rec.operating_length, "1073");
        assert_eq!(rec.jurisdictions, "Odisha, Jharkhand and Chhattisgarh");
    }

    #[test]
    fn gas_worked_example() {
        let row = "20 17.09.NGPL Chainsa-Jhajjar-Hissar GAIL 13.12.2010 455 35.00 440 Haryana, Rajasthan and Delhi";
        let rec = parse_row(row, Dialect::NaturalGas, MissingPolicy::Placeholder).unwrap();
        assert_eq!(rec.unique_id, "17.09.NGPL");
        assert_eq!(rec.name, "Chainsa-Jhajjar-Hissar");
        assert_eq!(rec.entity, "GAIL");
        assert_eq!(rec.authorized_on, "13.12.2010");
        assert_eq!(rec.authorized_length, "455");
        assert_eq!(rec.authorized_capacity, "35.00");
        assert_eq!(rec.operating_length, "440");
        assert_eq!(rec.jurisdictions, "Haryana, Rajasthan and Delhi");
    }

    #[test]
    fn oil_india_entity_joins_three_tokens() {
        let row = "15 17.09 Numaligarh – Siliguri Oil India Ltd. 01.11.2021 660 1.72 660 Assam and West Bengal";
        let rec = parse_row(row, Dialect::Petroleum, MissingPolicy::Placeholder).unwrap();
        assert_eq!(rec.entity, "Oil India Ltd.");
        assert_eq!(rec.entity.split(' ').count(), 3);
        assert_eq!(rec.authorized_on, "01.11.2021");
    }

    #[test]
    fn sample_rows_parse_clean() {
        for dialect in [Dialect::Petroleum, Dialect::NaturalGas] {
            for raw in source::sample_rows(dialect) {
                let rec = parse_row(raw, dialect, MissingPolicy::Reject)
                    .unwrap_or_else(|e| panic!("{dialect} sample failed: {e}: {raw}"));
                for (header, value) in dialect.headers().iter().zip(rec.values()) {
                    assert!(!value.is_empty(), "{dialect}: empty {header} in {raw}");
                }
            }
        }
    }

    #[test]
    fn multiline_raw_input_is_normalized() {
        let row = "14 5.09 Bina – Panki\nBPCL 21.12.2018 355\n3.49 355 Madhya Pradesh and Uttar Pradesh";
        let rec = parse_row(row, Dialect::Petroleum, MissingPolicy::Placeholder).unwrap();
        assert_eq!(rec.name, "Bina – Panki");
        assert_eq!(rec.jurisdictions, "Madhya Pradesh and Uttar Pradesh");
    }

    #[test]
    fn no_entity_yields_error_not_partial_record() {
        let row = "12 17.08 Paradip Raipur 17.08.2015 1108 5 1073 Odisha";
        let err = parse_row(row, Dialect::Petroleum, MissingPolicy::Placeholder).unwrap_err();
        assert!(matches!(err, ParseError::NoEntityFound { .. }));
    }

    #[test]
    fn batch_isolates_failures_and_keeps_order() {
        let rows: Vec<String> = [
            "10 17.06 Mundra – Delhi HPCL 23.01.2015 1334 6.9 1289 Gujarat, Rajasthan and Haryana",
            "this row matches nothing",
            "17 5.08 Mundra – Mithi Rohar (Kandla) APSEZ 28.03.2018 89 6.75 92 Gujarat",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let outcomes = parse_batch(&rows, Dialect::Petroleum, MissingPolicy::Placeholder);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes.iter().map(|o| o.line_no).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert!(outcomes[2].result.is_ok());
        assert_eq!(outcomes[2].result.as_ref().unwrap().entity, "APSEZ");
    }
}
