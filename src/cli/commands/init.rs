//! `pcfg init` command - Initialize a configurator workspace

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::core::workspace::{Workspace, WorkspaceError, WORKSPACE_DIR};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Reinitialize even if .pcfg/ already exists (overwrites config and catalog)
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let workspace = if args.force {
        Workspace::init_force(&path)
    } else {
        Workspace::init(&path)
    };

    match workspace {
        Ok(workspace) => {
            println!(
                "{} Initialized configurator workspace at {}",
                style("✓").green(),
                style(workspace.root().display()).cyan()
            );
            println!();
            println!("Created:");
            print_structure(workspace.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} Edit the catalog to match your shop",
                style(format!("$EDITOR {}/catalog.yaml", WORKSPACE_DIR)).yellow()
            );
            println!(
                "  {} Check the catalog for dangling references",
                style("pcfg catalog check").yellow()
            );
            println!(
                "  {} Configure a part interactively",
                style("pcfg configure").yellow()
            );
            Ok(())
        }
        Err(WorkspaceError::AlreadyExists(path)) => {
            println!(
                "{} Workspace already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("pcfg init --force").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(root: &Path) {
    let entries = [".pcfg/", ".pcfg/config.yaml", ".pcfg/catalog.yaml"];

    for entry in entries {
        if root.join(entry).exists() {
            let prefix = if entry.ends_with('/') { "📁" } else { "📄" };
            println!("  {} {}", prefix, style(entry).dim());
        }
    }
}
