use serde::{Deserialize, Serialize};

use crate::pdf::RenderSettings;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub quotation: QuotationSettings,
    #[serde(default)]
    pub pdf: PdfSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Company {
    /// Title printed next to the logo
    pub title: String,
}

impl Default for Company {
    fn default() -> Self {
        Self {
            title: "QUOTATIONBOX".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct QuotationSettings {
    pub currency_symbol: String,
    pub footer: String,
}

impl Default for QuotationSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            footer: "Thank you for your business!".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PdfSettings {
    pub output_dir: String,
    pub filename: String,
    pub logo: Option<String>,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            filename: "invoice.pdf".to_string(),
            logo: None,
        }
    }
}

impl Config {
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            title: self.company.title.clone(),
            currency_symbol: self.quotation.currency_symbol.clone(),
            footer: self.quotation.footer.clone(),
        }
    }
}
