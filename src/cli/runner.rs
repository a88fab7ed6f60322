//! CLI runner - builds the job config and runs the job

use crate::cli::commands::Cli;
use crate::config::{env_layer, file_layer, JobConfig};
use crate::engine::{Job, JobResult};
use crate::error::{Result, ResultExt};
use crate::types::JsonObject;
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Merge environment, config file and flags
    pub fn config(&self) -> Result<JobConfig> {
        self.config_from_env(std::env::vars())
    }

    /// Same as [`Runner::config`] with an explicit environment
    pub fn config_from_env<I>(&self, vars: I) -> Result<JobConfig>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let file = match self.cli.config {
            Some(ref path) => file_layer(path)?,
            None => JsonObject::new(),
        };
        JobConfig::from_layers([env_layer(vars), file, self.cli.layer()?])
    }

    /// Run the job, print the result to stdout and write the log file if asked
    pub async fn run(&self, config: JobConfig) -> Result<JobResult> {
        let write_logs = config.write_logs.clone();
        let result = Job::new(config).run().await?;

        let text = serde_json::to_string_pretty(&result)?;
        println!("{text}");

        if let Some(path) = write_logs {
            write_result(&path, &text).await?;
        }
        Ok(result)
    }
}

async fn write_result(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote job result to {}", path.display());
    Ok(())
}
