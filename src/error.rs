use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuotationError {
    #[error("Config directory not found at {0}. Run 'quote init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Unknown field '{0}'. Expected one of: quotationNumber, clientName, clientAddress, date")]
    UnknownField(String),

    #[error("Unknown item field '{0}'. Expected one of: description, quantity, unitPrice")]
    UnknownItemField(String),

    #[error("Item index {index} is out of range (quotation has {len} item(s))")]
    ItemIndexOutOfRange { index: usize, len: usize },

    #[error("Stored quotation under '{key}' is unreadable: {source}")]
    StoredQuotation {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No saved quotation found. Use 'quote save' first.")]
    NoSavedQuotation,

    #[error("Failed to generate PDF: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures that abort document generation before any bytes are delivered.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("logo image not found: {0}")]
    AssetNotFound(PathBuf),

    #[error("logo image {path} could not be decoded: {source}")]
    AssetDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{rows} item rows do not fit on one page (at most {capacity})")]
    PageOverflow { rows: usize, capacity: usize },

    #[error("PDF encoding failed: {0}")]
    Encode(#[from] lopdf::Error),
}

pub type Result<T> = std::result::Result<T, QuotationError>;
