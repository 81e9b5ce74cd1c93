pub mod config;
pub mod download;
pub mod error;
pub mod pdf;
pub mod quotation;
pub mod store;

pub use config::Config;
pub use download::{DirectoryDownload, Download, DEFAULT_FILENAME};
pub use error::{QuotationError, RenderError, Result};
pub use pdf::{generate_pdf, load_asset, render, DrawInstruction, LogoAsset, RenderSettings};
pub use quotation::{parse_number, HeaderField, ItemField, LineItem, Quotation};
pub use store::{load_quotation, save_quotation, FileStore, KeyValueStore, MemoryStore};
