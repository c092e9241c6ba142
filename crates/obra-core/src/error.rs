//! Error types for Obra

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The reference catalog is missing, unreadable or malformed
    #[error("Catalog load error: {0}")]
    DataLoad(String),

    /// A budget line has a non-positive quantity, a negative unit price, or amounts out of range
    #[error("Invalid line item #{index} ({item}): {reason}")]
    InvalidLineItem {
        index: usize,
        item: String,
        reason: String,
    },

    /// The advisory text could not be produced (backend down, not configured, bad reply)
    #[error("Advisory unavailable: {0}")]
    AdvisoryUnavailable(String),

    /// Writing an export file failed
    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// A line whose subtotal or saving does not fit a `Decimal`
    pub(crate) fn amount_out_of_range(index: usize, item: &str) -> Self {
        Error::InvalidLineItem {
            index,
            item: item.to_string(),
            reason: "amount out of range".to_string(),
        }
    }

    /// Whether the error only affects the current request
    ///
    /// A bad budget line or a failed advisory call leaves the process usable;
    /// a catalog that cannot be loaded does not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::DataLoad(_) | Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
