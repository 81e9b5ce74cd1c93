mod settings;

pub use settings::{Company, Config, PdfSettings, QuotationSettings};

use crate::error::{QuotationError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.quotation/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "quotation") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.quotation/
    let home = dirs_home().ok_or_else(|| {
        QuotationError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".quotation"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve a configured path; relative paths live under the config directory
pub fn resolve_path(configured: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(configured);
    if path.is_relative() {
        config_dir.join(path)
    } else {
        path
    }
}

/// Directory that receives generated PDFs
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    resolve_path(output_dir, config_dir)
}

/// Directory backing the key-value store
pub fn storage_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("storage")
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(QuotationError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(QuotationError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| QuotationError::ConfigParse { path, source: e })
}

/// Create the config directory with its template and working directories
pub fn init_config_dir(config_dir: &Path) -> Result<()> {
    if config_dir.exists() {
        return Err(QuotationError::AlreadyInitialized(config_dir.to_path_buf()));
    }

    fs::create_dir_all(config_dir)?;
    fs::create_dir_all(storage_dir(config_dir))?;
    fs::create_dir_all(config_dir.join("output"))?;
    fs::write(config_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
title = "QUOTATIONBOX"

[quotation]
currency_symbol = "$"
footer = "Thank you for your business!"

[pdf]
output_dir = "output"        # relative to this directory, or absolute / ~/...
filename = "invoice.pdf"
# logo = "~/Pictures/logo.png"  # optional PNG or JPEG, a plain mark is drawn otherwise
"#;
