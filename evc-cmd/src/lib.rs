//! Command implementations for the EVC CLI.
//!
//! Provides subcommands for charting poll trends and for turning a CSV of
//! votes into the aggregated spreadsheet, either through the backend or
//! offline from a saved response.

use anyhow::Context;
use clap::{Args, Subcommand};
use evc_core::client::ApiClient;
use evc_core::ApiConfig;
use std::path::PathBuf;
use std::time::Duration;

pub mod export;
pub mod polls;
pub mod upload;

/// Backend connection flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Base URL of the vote-count backend
    #[arg(long, env = "API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "API_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

impl ApiArgs {
    pub fn config(&self) -> anyhow::Result<ApiConfig> {
        let url = self
            .api_url
            .as_deref()
            .context("no backend configured: pass --api-url or set API_URL")?;
        let config = ApiConfig::new(url)?;
        Ok(match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        })
    }

    pub fn client(&self) -> anyhow::Result<ApiClient> {
        let client = ApiClient::new(self.config()?).context("failed to build HTTP client")?;
        Ok(client)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch poll records and print the per-date trend of both candidates
    Polls {
        /// Write the aggregated series as CSV (data,A,B)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Render the trend chart to an SVG file
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Upload a CSV of votes for processing and save the result spreadsheet
    Upload {
        /// CSV file with the votes
        file: PathBuf,

        /// Output spreadsheet path
        #[arg(short, long, default_value = evc_export::EXPORT_FILE_NAME)]
        output: PathBuf,

        /// Also save the backend response as JSON
        #[arg(long)]
        save_json: Option<PathBuf>,
    },

    /// Convert a saved backend response (JSON) to the result spreadsheet
    Export {
        /// JSON file with the aggregated result
        json: PathBuf,

        /// Output spreadsheet path
        #[arg(short, long, default_value = evc_export::EXPORT_FILE_NAME)]
        output: PathBuf,
    },
}

pub async fn run(command: Command, api: &ApiArgs) -> anyhow::Result<()> {
    match command {
        Command::Polls { csv, svg } => {
            let client = api.client()?;
            polls::run_polls(&client, csv.as_deref(), svg.as_deref()).await?;
            Ok(())
        }
        Command::Upload {
            file,
            output,
            save_json,
        } => {
            let client = api.client()?;
            upload::run_upload(&client, &file, &output, save_json.as_deref()).await?;
            Ok(())
        }
        Command::Export { json, output } => export::run_export(&json, &output),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_requires_url() {
        let args = ApiArgs::default();
        let err = args.config().unwrap_err();
        assert!(err.to_string().contains("API_URL"));
    }

    #[test]
    fn test_config_applies_timeout() {
        let args = ApiArgs {
            api_url: Some("http://localhost:8080/".to_string()),
            timeout_secs: Some(5),
        };
        let config = args.config().unwrap();
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_rejects_bad_url() {
        let args = ApiArgs {
            api_url: Some("localhost:8080".to_string()),
            timeout_secs: None,
        };
        assert!(args.config().is_err());
    }
}
