//! `pcfg config` command - Configuration management
//!
//! View and modify the global and workspace configuration files.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::core::config::CONFIG_KEYS;
use crate::core::{Config, SinkKind, Workspace};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show only workspace config
    #[arg(long = "workspace-only", conflicts_with = "global_only")]
    pub workspace_only: bool,

    /// Show only global (user) config
    #[arg(long = "global-only")]
    pub global_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (catalog, default_format, sink)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of workspace config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of workspace config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Show only workspace config path
    #[arg(long = "workspace-only", conflicts_with = "global_only")]
    pub workspace_only: bool,

    /// Show only global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Unset(args) => run_unset(args),
        ConfigCommands::Path(args) => run_path(args),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        check_key(key)?;
        return match config.get(key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if args.workspace_only {
        show_file("Workspace config:", &workspace_config_path()?)
    } else if args.global_only {
        show_file("Global config:", &global_config_path()?)
    } else {
        println!("{}", style("Effective Configuration").bold().underlined());
        println!();

        for (key, _) in CONFIG_KEYS {
            print_config_value(key, config.get(key).as_deref());
        }

        println!();
        println!("{}", style("Config Sources (in priority order):").dim());
        println!("  1. Command-line flags (--catalog, --format)");
        println!("  2. Environment variables (PCFG_CATALOG, PCFG_FORMAT, PCFG_SINK)");
        println!("  3. Workspace config (.pcfg/config.yaml)");
        println!("  4. Global config (~/.config/pcfg/config.yaml)");
        Ok(())
    }
}

fn run_set(args: SetArgs) -> Result<()> {
    check_key(&args.key)?;
    check_value(&args.key, &args.value)?;

    let config_path = if args.global {
        global_config_path()?
    } else {
        workspace_config_path()?
    };

    let mut config_map = read_mapping(&config_path)?;
    config_map.insert(
        serde_yml::Value::String(args.key.clone()),
        serde_yml::Value::String(args.value.clone()),
    );

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope(args.global)
    );

    Ok(())
}

fn run_unset(args: UnsetArgs) -> Result<()> {
    check_key(&args.key)?;

    let config_path = if args.global {
        global_config_path()?
    } else {
        workspace_config_path()?
    };

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    if config_map
        .remove(serde_yml::Value::String(args.key.clone()))
        .is_none()
    {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope(args.global)
    );

    Ok(())
}

fn run_path(args: PathArgs) -> Result<()> {
    if args.workspace_only {
        println!("{}", workspace_config_path()?.display());
        return Ok(());
    }
    if args.global_only {
        println!("{}", global_config_path()?.display());
        return Ok(());
    }

    println!("{}", style("Configuration file paths:").bold());
    println!();

    let global_path = global_config_path()?;
    println!("  {} {}", style("Global:").cyan(), global_path.display());
    print_exists(&global_path, 9);

    println!();
    match workspace_config_path() {
        Ok(path) => {
            println!("  {} {}", style("Workspace:").cyan(), path.display());
            print_exists(&path, 12);
        }
        Err(_) => println!(
            "  {} {}",
            style("Workspace:").cyan(),
            style("(not in a pcfg workspace)").dim()
        ),
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in CONFIG_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'pcfg config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

fn scope(global: bool) -> &'static str {
    if global {
        "global"
    } else {
        "workspace"
    }
}

fn check_key(key: &str) -> Result<()> {
    if CONFIG_KEYS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        Err(miette::miette!(
            help = "run 'pcfg config keys' to list valid keys",
            "Unknown configuration key '{}'",
            key
        ))
    }
}

fn check_value(key: &str, value: &str) -> Result<()> {
    match key {
        "default_format" => value
            .parse::<OutputFormat>()
            .map(|_| ())
            .map_err(|e| miette::miette!("{}", e)),
        "sink" => value
            .parse::<SinkKind>()
            .map(|_| ())
            .map_err(|e| miette::miette!("{}", e)),
        _ => Ok(()),
    }
}

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn workspace_config_path() -> Result<PathBuf> {
    let workspace = Workspace::discover().map_err(|e| miette::miette!("{}", e))?;
    Ok(workspace.config_path())
}

fn read_mapping(path: &Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    match serde_yml::from_str::<serde_yml::Value>(&content) {
        Ok(serde_yml::Value::Mapping(map)) => Ok(map),
        Ok(serde_yml::Value::Null) => Ok(serde_yml::Mapping::new()),
        Ok(_) => Err(miette::miette!(
            "{} is not a YAML mapping",
            path.display()
        )),
        Err(e) => Err(miette::miette!("Failed to parse {}: {}", path.display(), e)),
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

fn print_exists(path: &Path, indent: usize) {
    let note = if path.exists() {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    println!("{:indent$}{}", "", note, indent = indent);
}

fn show_file(label: &str, path: &Path) -> Result<()> {
    println!("{} {}", style(label).bold(), style(path.display()).dim());
    println!();

    if path.exists() {
        let content = fs::read_to_string(path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert!(check_key("catalog").is_ok());
        assert!(check_key("sink").is_ok());
        assert!(check_key("author").is_err());
    }

    #[test]
    fn test_check_value() {
        assert!(check_value("sink", "log").is_ok());
        assert!(check_value("sink", "kafka").is_err());
        assert!(check_value("default_format", "json").is_ok());
        assert!(check_value("default_format", "xml").is_err());
        assert!(check_value("catalog", "anything.yaml").is_ok());
    }

    #[test]
    fn test_read_mapping() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        assert!(read_mapping(&path).unwrap().is_empty());

        fs::write(&path, "").unwrap();
        assert!(read_mapping(&path).unwrap().is_empty());

        fs::write(&path, "sink: log\n").unwrap();
        assert_eq!(read_mapping(&path).unwrap().len(), 1);

        fs::write(&path, "- a\n- b\n").unwrap();
        assert!(read_mapping(&path).is_err());
    }
}
