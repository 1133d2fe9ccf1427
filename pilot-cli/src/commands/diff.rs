//! `pilot diff` — show unified diffs for what generate would write.

use anyhow::{Context, Result};
use clap::Args;

use pilot_codegen::{diff_files, generate};

use super::project::ProjectArgs;

/// Arguments for `pilot diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let session = self.project.session()?;
        let files = generate(&session.model, &session.renderer).context("generation failed")?;
        let diffs = diff_files(&files, &session.out_root, session.model.module_root())
            .context("diff failed")?;

        if diffs.is_empty() {
            println!("No differences under '{}'.", session.out_root.display());
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
