//! External strategy generator
//!
//! Runs the offline analysis step that rewrites the strategy config file.

use crate::config::GeneratorConfig;
use tokio::process::Command;

/// Runs the configured generator command to completion
#[derive(Debug, Clone)]
pub struct StrategyGenerator {
    config: GeneratorConfig,
}

impl StrategyGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Run the generator; errors carry the combined output
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut command = Command::new(&self.config.program);
        command.args(&self.config.args);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| {
            anyhow::anyhow!("failed to start {}: {}", self.config.program, e)
        })?;

        if !output.status.success() {
            anyhow::bail!(
                "{} exited with {}: {}{}",
                self.config.program,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }

        tracing::debug!(program = %self.config.program, "Strategy generator finished");
        Ok(())
    }
}
