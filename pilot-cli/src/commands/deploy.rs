//! `pilot deploy` — print the operator's Deployment manifest.

use anyhow::{Context, Result};
use clap::Args;

use pilot_codegen::deployment_for;

use super::project::ProjectArgs;

/// Arguments for `pilot deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl DeployArgs {
    pub fn run(self) -> Result<()> {
        let model = self.project.load_model()?;
        let yaml = deployment_for(&model)
            .to_yaml()
            .context("failed to render Deployment")?;
        print!("{yaml}");
        Ok(())
    }
}
