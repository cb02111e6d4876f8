use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::parser::dialect::Dialect;

/// Read rows from a file or stdin, one record per line, in input order.
/// Blank lines are skipped; row numbering downstream follows this order.
pub fn read_lines(path: Option<&Path>) -> Result<Vec<String>> {
    let text = match path {
        Some(p) => {
            fs::read_to_string(p).with_context(|| format!("failed to read {}", p.display()))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read rows from stdin")?;
            buf
        }
    };

    let rows: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    info!("loaded {} rows", rows.len());
    Ok(rows)
}

const PETROLEUM_SAMPLE: &[&str] = &[
    "10 17.06 Mundra – Delhi HPCL 23.01.2015 1334 6.9 1289 Gujarat, Rajasthan and Haryana",
    "11 17.07 Vizag – Secunderabad GAIL 18.05.2015 616 1.33 609 Andhra Pradesh, and Telangana",
    "12 17.08 Paradip – Raipur Ranchi IOCL 17.08.2015 1108 5 1073 Odisha, Jharkhand and Chhattisgarh",
    "13 9.01 Devangonthi – Devanhalli ATF IOCL 30.12.2016 36 0.66 36 Karnataka",
    "14 5.09 Bina – Panki BPCL 21.12.2018 355 3.49 355 Madhya Pradesh and Uttar Pradesh",
    "15 17.09 Numaligarh – Siliguri Oil India Ltd. 01.11.2021 660 1.72 660 Assam and West Bengal",
    "16 5.11 Hassan – Cherlapalli HPCL 24.06.2019 680 2.2 650 Telangana, Andhra Pradesh and Karnataka",
    "17 5.08 Mundra – Mithi Rohar (Kandla) APSEZ 28.03.2018 89 6.75 92 Gujarat",
];

const GAS_SAMPLE: &[&str] = &[
    "17 17.17.NGPL Assam Regional Network AGCL 20.12.2013 105 2.428 107 Assam",
    "18 17.18.NGPL Dukli — Maharajganj GAIL 09.01.2014 5.20 0.08 0 Agartala",
    "19 17.19.NGPL Uran-Taloja DFPCL 21.10.2014 42.00 0.70 42.00 Maharashtra",
    "20 17.09.NGPL Chainsa-Jhajjar-Hissar GAIL 13.12.2010 455 35.00 440 Haryana, Rajasthan and Delhi",
    "21 17.12.NGPL Dadri-Bawana-Nangal GAIL 15.02.2011 921 31.00 998 Punjab, Haryana, Uttar Pradesh, Uttarakhand, Delhi, and Himachal Pradesh",
];

/// Built-in demo rows, one set per dialect, lifted from the source tables.
pub fn sample_rows(dialect: Dialect) -> &'static [&'static str] {
    match dialect {
        Dialect::Petroleum => PETROLEUM_SAMPLE,
        Dialect::NaturalGas => GAS_SAMPLE,
    }
}
