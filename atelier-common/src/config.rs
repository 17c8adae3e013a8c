//! Configuration loading
//!
//! Resolution follows the usual priority order: command-line argument,
//! then environment, then an optional TOML config file, then the
//! compiled default. Spreadsheet credentials are optional on purpose:
//! a missing sink must never stop the site from serving (submissions
//! degrade to a logged no-op success instead).

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5740";

/// Default sheet tab when none is configured
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Credentials and target for the spreadsheet sink
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub service_account_email: String,
    /// PEM private key with real newlines (unescaped on load)
    pub private_key: String,
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub bind_addr: String,
    /// `None` = sink unconfigured, submissions degrade to success
    pub sheets: Option<SheetsConfig>,
}

/// On-disk shape of the optional config file
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind_addr: Option<String>,
    sheets: Option<FileSheets>,
}

#[derive(Debug, Deserialize)]
struct FileSheets {
    spreadsheet_id: Option<String>,
    sheet_name: Option<String>,
    service_account_email: Option<String>,
    private_key: Option<String>,
}

const ENV_SHEETS_ID: &str = "GOOGLE_SHEETS_ID";
const ENV_SHEET_NAME: &str = "GOOGLE_SHEETS_NAME";
const ENV_SERVICE_ACCOUNT_EMAIL: &str = "GOOGLE_SERVICE_ACCOUNT_EMAIL";
const ENV_PRIVATE_KEY: &str = "GOOGLE_PRIVATE_KEY";
const ENV_BIND_ADDR: &str = "ATELIER_BIND";

/// Keys carried as literal `\n` escapes in env vars become real
/// newlines before the PEM is handed to the signer.
fn unescape_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl SiteConfig {
    /// Load configuration with CLI > env > file > default priority.
    pub fn load(cli_bind: Option<&str>, config_file: Option<&Path>) -> Result<Self> {
        let file = match config_file {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str::<FileConfig>(&content)
                    .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?
            }
            None => FileConfig::default(),
        };

        let bind_addr = cli_bind
            .map(str::to_string)
            .or_else(|| env_var(ENV_BIND_ADDR))
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let sheets = resolve_sheets(file.sheets);
        if sheets.is_none() {
            warn!(
                "Spreadsheet sink not configured ({ENV_SHEETS_ID}, \
                 {ENV_SERVICE_ACCOUNT_EMAIL}, {ENV_PRIVATE_KEY}); \
                 contact submissions will be accepted but not recorded"
            );
        }

        Ok(SiteConfig { bind_addr, sheets })
    }
}

/// All three credentials must be present to enable the sink; the sheet
/// name alone falls back to a default.
fn resolve_sheets(file: Option<FileSheets>) -> Option<SheetsConfig> {
    let file = file.unwrap_or(FileSheets {
        spreadsheet_id: None,
        sheet_name: None,
        service_account_email: None,
        private_key: None,
    });

    let spreadsheet_id = env_var(ENV_SHEETS_ID).or(file.spreadsheet_id)?;
    let service_account_email =
        env_var(ENV_SERVICE_ACCOUNT_EMAIL).or(file.service_account_email)?;
    let private_key = env_var(ENV_PRIVATE_KEY).or(file.private_key)?;
    let sheet_name = env_var(ENV_SHEET_NAME)
        .or(file.sheet_name)
        .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

    Some(SheetsConfig {
        spreadsheet_id,
        sheet_name,
        service_account_email,
        private_key: unescape_private_key(&private_key),
    })
}
