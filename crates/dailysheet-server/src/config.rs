use std::env;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Location of the ledger document
    pub ledger_path: PathBuf,
    /// Workbook name used when a new document has to be created
    pub ledger_name: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;
        let ledger_path = env::var("LEDGER_PATH")
            .unwrap_or_else(|_| "data/ledger.json".to_string())
            .into();
        let ledger_name = env::var("LEDGER_NAME").unwrap_or_else(|_| "Orders".to_string());

        Ok(Self {
            host,
            port,
            ledger_path,
            ledger_name,
        })
    }
}
