// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use csv::StringRecord;

/// Shape of a downloaded ledger export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPreview {
    /// Column names, trimmed.
    pub headers: Vec<String>,
    /// Number of data rows, excluding the header.
    pub row_count: usize,
}

/// Reads the header and counts the rows of a ledger export.
///
/// Rows may have differing field counts.
///
/// # Errors
///
/// Returns an error if the bytes are not valid CSV.
pub fn preview_ledger(bytes: &[u8]) -> Result<LedgerPreview, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: StringRecord = reader.headers()?.clone();
    let mut row_count: usize = 0;
    for record in reader.records() {
        record?;
        row_count += 1;
    }

    Ok(LedgerPreview {
        headers: headers.iter().map(|h| h.trim().to_string()).collect(),
        row_count,
    })
}
