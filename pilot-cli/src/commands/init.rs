//! `pilot init [dir] --api-version <group/version> --kind <Kind> [--phase ...]`

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Args;

use pilot_core::{loader, Kind, Phase, ProjectDescriptor};

/// File name `init` writes and other commands read by default.
const DESCRIPTOR_FILE: &str = "pilot.yaml";

/// Write a starter descriptor.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write pilot.yaml into.
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// API group and version of the managed resource (e.g. apps.example.com/v1).
    #[arg(long)]
    pub api_version: String,

    /// Resource kind (e.g. Widget).
    #[arg(long)]
    pub kind: String,

    /// Service name; defaults to the last segment of the module root.
    #[arg(long)]
    pub operator_name: Option<String>,

    /// Phase as `name[:inputs[:outputs]]`, lists comma-separated
    /// (e.g. `build:spec:image`). Repeatable; order is kept.
    #[arg(long = "phase", short = 'p', value_name = "PHASE")]
    pub phases: Vec<PhaseArg>,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let descriptor = ProjectDescriptor {
            api_version: self.api_version,
            kind: Kind::from(self.kind),
            operator_name: self.operator_name,
            phases: self.phases.into_iter().map(|p| p.0).collect(),
        };
        loader::validate(&descriptor).context("invalid descriptor")?;

        let path = self.dir.join(DESCRIPTOR_FILE);
        if path.exists() {
            bail!("'{}' already exists; refusing to overwrite", path.display());
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create '{}'", self.dir.display()))?;

        let yaml = serde_yaml::to_string(&descriptor).context("failed to serialize descriptor")?;
        std::fs::write(&path, yaml)
            .with_context(|| format!("failed to write '{}'", path.display()))?;

        println!("✓ Wrote {}", path.display());
        println!(
            "  {} {} with {} phase(s)",
            descriptor.kind,
            descriptor.api_version,
            descriptor.phases.len()
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PhaseArg
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse a [`Phase`] from `name[:inputs[:outputs]]`.
#[derive(Debug, Clone)]
pub struct PhaseArg(pub Phase);

impl FromStr for PhaseArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let name = parts.next().unwrap_or("").trim();
        if name.is_empty() {
            return Err(format!("phase '{s}' has no name"));
        }
        let inputs = split_list(parts.next());
        let outputs = split_list(parts.next());
        Ok(Self(Phase::new(name, inputs, outputs)))
    }
}

impl fmt::Display for PhaseArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.0.name,
            self.0.inputs.join(","),
            self.0.outputs.join(",")
        )
    }
}

fn split_list(list: Option<&str>) -> Vec<String> {
    list.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
