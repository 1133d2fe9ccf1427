//! `pilot generate` — render and write the scaffold.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use pilot_codegen::{generate, write_files, WriteResult};

use super::project::ProjectArgs;

/// Arguments for `pilot generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    pub fn run(self) -> Result<()> {
        let session = self.project.session()?;
        let files = generate(&session.model, &session.renderer).context("generation failed")?;
        let results = write_files(
            &files,
            &session.out_root,
            session.model.module_root(),
            self.dry_run,
        )
        .with_context(|| format!("failed to write under '{}'", session.out_root.display()))?;

        print_results(session.model.module_root(), &results, self.dry_run);
        Ok(())
    }
}

fn print_results(module_root: &str, writes: &[WriteResult], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let count = |pred: fn(&WriteResult) -> bool| writes.iter().filter(|r| pred(r)).count();
    let written = count(|r| matches!(r, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }));
    let unchanged = count(|r| matches!(r, WriteResult::Unchanged { .. }));
    let skipped = count(|r| matches!(r, WriteResult::Skipped { .. }));

    if written == 0 {
        println!("{prefix}{} '{module_root}' — nothing to do", "✓".green());
    } else {
        println!(
            "{prefix}{} '{module_root}' generated ({written} written, {unchanged} unchanged, {skipped} kept)",
            "✓".green()
        );
    }

    for r in writes {
        match r {
            WriteResult::Written { path } => println!("  {}  {}", "✎".green(), path.display()),
            WriteResult::WouldWrite { path } => println!("  {}  {}", "~".yellow(), path.display()),
            WriteResult::Unchanged { path } => println!("  {}  {}", "·".bright_black(), path.display()),
            WriteResult::Skipped { path } => println!("  {}  {}", "=".cyan(), path.display()),
        }
    }
}
