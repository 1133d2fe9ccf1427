//! `pilot plan` — list the files a generation run would produce.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use pilot_codegen::plan;

use super::project::ProjectArgs;

/// Arguments for `pilot plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Tabled)]
struct PlanTableRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "template")]
    template: String,
    #[tabled(rename = "scope")]
    scope: String,
    #[tabled(rename = "if exists")]
    if_exists: String,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let model = self.project.load_model()?;
        let files = plan(&model);

        println!(
            "pilot v{} | {} {} | {} | {} files",
            env!("CARGO_PKG_VERSION"),
            model.project().kind,
            model.project().api_version,
            model.module_root(),
            files.len(),
        );

        let rows: Vec<PlanTableRow> = files
            .iter()
            .map(|f| PlanTableRow {
                file: f.relative_path(model.module_root()).to_string(),
                template: f.template_id.to_string(),
                scope: f.scope.to_string(),
                if_exists: if f.skip_if_exists { "keep" } else { "overwrite" }.to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");

        let idle: Vec<_> = model
            .phases()
            .filter(|p| !p.generates_files())
            .map(|p| p.name.0.clone())
            .collect();
        if !idle.is_empty() {
            println!(
                "{}",
                format!("No worker files for phases without inputs or outputs: {}", idle.join(", "))
                    .bright_black()
            );
        }
        Ok(())
    }
}
