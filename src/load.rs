use std::io;

use thiserror::Error;
use tracing::warn;

/// Fatal loading failures. Anything recoverable (bad cells, bad rows) is
/// reported through [`LoadSummary`] instead.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("missing required column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("csv error in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid view config {source_name}: {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Non-fatal degradations accumulated while loading one table.
///
/// Substituted zeros follow the lenient policy: an unparsable numeric cell
/// becomes 0 and the computation continues, but every substitution is
/// counted and described so callers can surface data quality issues.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub substituted_zeros: usize,
    pub warnings: Vec<String>,
}

impl LoadSummary {
    pub fn is_clean(&self) -> bool {
        self.rows_skipped == 0 && self.substituted_zeros == 0
    }

    pub(crate) fn skip_row(&mut self, source_name: &str, row: usize, reason: &str) {
        let msg = format!("{source_name} row {row}: skipped ({reason})");
        warn!("{msg}");
        self.rows_skipped += 1;
        self.warnings.push(msg);
    }

    pub(crate) fn substitute_zero(&mut self, source_name: &str, row: usize, column: &str, raw: &str) {
        let msg = format!("{source_name} row {row}: unparsable '{raw}' in '{column}', using 0");
        warn!("{msg}");
        self.substituted_zeros += 1;
        self.warnings.push(msg);
    }
}

/// Case-insensitive header lookup. A miss is fatal before any row is read.
pub(crate) fn resolve_column(
    headers: &csv::StringRecord,
    column: &str,
    source_name: &str,
) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column))
        .ok_or_else(|| DatasetError::MissingColumn {
            column: column.to_string(),
            source_name: source_name.to_string(),
        })
}

pub(crate) fn csv_error(source_name: &str, source: csv::Error) -> DatasetError {
    DatasetError::Csv {
        source_name: source_name.to_string(),
        source,
    }
}

/// Lenient numeric parse for exported stat tables. Strips decorations like
/// thousands separators and trailing symbols; returns None for empty cells
/// and placeholder dashes.
pub(crate) fn lenient_f64(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == ',')
        .collect();
    let cleaned = cleaned.replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Leading integer of a cell, e.g. FBref-style ages ("27-103" is 27 years,
/// 103 days).
pub(crate) fn leading_u32(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse::<u32>().ok()
    }
}
