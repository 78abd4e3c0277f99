use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};
use tracing::info;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "invoice.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub defaults: InvoiceDefaults,
}

/// Where the PDF renderer lives.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_ltr_path")]
    pub ltr_path: String,
    #[serde(default = "default_rtl_path")]
    pub rtl_path: String,
    /// Non-localized renderer: one path for both directions.
    #[serde(default)]
    pub single_path: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ltr_path: default_ltr_path(),
            rtl_path: default_rtl_path(),
            single_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:6543/api".to_string()
}

fn default_ltr_path() -> String {
    "generate-pdf/ltr".to_string()
}

fn default_rtl_path() -> String {
    "generate-pdf/rtl".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            filename: default_filename(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_filename() -> String {
    "invoice.pdf".to_string()
}

/// Values a fresh invoice starts out with.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceDefaults {
    #[serde(default = "default_customer_email")]
    pub customer_email: Option<String>,
    #[serde(default = "default_logo")]
    pub logo: Option<String>,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        Self {
            customer_email: default_customer_email(),
            logo: default_logo(),
        }
    }
}

fn default_customer_email() -> Option<String> {
    Some("john@example.com".to_string())
}

fn default_logo() -> Option<String> {
    Some(
        "https://github.com/user-attachments/assets/c7204bb0-f62d-41bc-b3fb-012073cd3d16"
            .to_string(),
    )
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Like [`Config::load`], but a missing file means built-in defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }
        info!(path = %path.display(), "Loading config");
        Self::load(path)
    }
}
