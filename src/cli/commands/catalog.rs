//! `pcfg catalog` command - Browse and check the manufacturing catalog

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{format_list, format_tolerance, load_catalog, resolve_format, yes_no};
use crate::cli::table::{Table, TableConfig};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::{MaterialId, ProcessId, RecordKind};
use crate::core::{Catalog, Config, Severity};
use crate::entities::{Finish, Material, Process};
use crate::schema::assets;

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List processes, materials, or finishes
    List(ListArgs),

    /// Show a single record's details
    Show(ShowArgs),

    /// Check the catalog for dangling references and unreachable records
    Check(CheckArgs),

    /// Print the effective catalog (YAML, or JSON with -f json)
    Dump,

    /// Print the catalog JSON Schema
    Schema,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// What to list (processes, materials, finishes)
    pub kind: RecordKind,

    /// Only records belonging to this process
    #[arg(long, short = 'p')]
    pub process: Option<ProcessId>,

    /// Only finishes compatible with this material
    #[arg(long, short = 'm')]
    pub material: Option<MaterialId>,

    /// Include inactive processes and materials
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Print only the number of matching records
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Record kind (process, material, finish)
    pub kind: RecordKind,

    /// Record id
    pub id: u32,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Run a catalog subcommand
pub fn run(cmd: CatalogCommands, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    match cmd {
        CatalogCommands::List(args) => run_list(args, global, &config),
        CatalogCommands::Show(args) => run_show(args, global, &config),
        CatalogCommands::Check(args) => run_check(args, global, &config),
        CatalogCommands::Dump => run_dump(global, &config),
        CatalogCommands::Schema => run_schema(),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(global, config)?;
    let format = resolve_format(global, config, OutputFormat::Auto);

    match args.kind {
        RecordKind::Process => {
            let processes: Vec<&Process> = catalog
                .processes
                .iter()
                .filter(|p| args.all || p.active)
                .filter(|p| args.process.map_or(true, |id| p.id == id))
                .collect();
            output(&processes, &args, format, global, || process_table(&catalog, &processes))
        }
        RecordKind::Material => {
            let materials: Vec<&Material> = catalog
                .materials
                .iter()
                .filter(|m| args.all || m.active)
                .filter(|m| args.process.map_or(true, |id| m.process_id == id))
                .collect();
            output(&materials, &args, format, global, || material_table(&materials))
        }
        RecordKind::Finish => {
            let finishes: Vec<&Finish> = catalog
                .finishes
                .iter()
                .filter(|f| args.process.map_or(true, |id| f.process_id == id))
                .filter(|f| {
                    args.material
                        .map_or(true, |id| f.restricted_materials.contains(&id))
                })
                .collect();
            output(&finishes, &args, format, global, || finish_table(&finishes))
        }
    }
}

fn output<T: Serialize>(
    records: &[T],
    args: &ListArgs,
    format: OutputFormat,
    global: &GlobalOpts,
    table: impl FnOnce() -> Table,
) -> Result<()> {
    if args.count {
        println!("{}", records.len());
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(records).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(records).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            if records.is_empty() && format == OutputFormat::Auto {
                if !global.quiet {
                    println!("No {} found.", args.kind.list_name());
                }
                return Ok(());
            }
            let config = if global.quiet {
                TableConfig::for_pipe(args.kind.as_str())
            } else {
                TableConfig::new(args.kind.as_str())
            };
            print!("{}", table().render(format, &config)?);
        }
    }

    Ok(())
}

fn process_table(catalog: &Catalog, processes: &[&Process]) -> Table {
    let mut table = Table::new(["id", "name", "active", "materials"]);
    for process in processes {
        table.push_row([
            process.id.to_string(),
            process.name.clone(),
            yes_no(process.active).to_string(),
            catalog.materials_for(process.id).count().to_string(),
        ]);
    }
    table
}

fn material_table(materials: &[&Material]) -> Table {
    let mut table = Table::new([
        "id",
        "process",
        "name",
        "colors",
        "infill",
        "tolerance",
        "custom",
        "active",
    ]);
    for material in materials {
        table.push_row([
            material.id.to_string(),
            material.process_id.to_string(),
            material.name.clone(),
            format_list(&material.color),
            format_list(&material.infill),
            material
                .default_tolerance()
                .map(format_tolerance)
                .unwrap_or_else(|| "-".to_string()),
            yes_no(material.is_custom).to_string(),
            yes_no(material.active).to_string(),
        ]);
    }
    table
}

fn finish_table(finishes: &[&Finish]) -> Table {
    let mut table = Table::new(["id", "process", "name", "materials", "custom"]);
    for finish in finishes {
        table.push_row([
            finish.id.to_string(),
            finish.process_id.to_string(),
            finish.name.clone(),
            format_list(&finish.restricted_materials),
            yes_no(finish.is_custom).to_string(),
        ]);
    }
    table
}

fn run_show(args: ShowArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(global, config)?;
    let format = resolve_format(global, config, OutputFormat::Auto);

    let not_found = || miette::miette!("No {} with id {} in the catalog", args.kind, args.id);

    match args.kind {
        RecordKind::Process => {
            let process = catalog.process(ProcessId(args.id)).ok_or_else(not_found)?;
            show(process, format, || print_process(&catalog, process))
        }
        RecordKind::Material => {
            let material = catalog.material(MaterialId(args.id)).ok_or_else(not_found)?;
            show(material, format, || print_material(&catalog, material))
        }
        RecordKind::Finish => {
            let finish = catalog
                .finish(crate::core::FinishId(args.id))
                .ok_or_else(not_found)?;
            show(finish, format, || print_finish(&catalog, finish))
        }
    }
}

fn show<T: Serialize>(record: &T, format: OutputFormat, pretty: impl FnOnce()) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(record).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(record).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => pretty(),
    }
    Ok(())
}

fn print_header(kind: RecordKind, id: impl std::fmt::Display, name: &str) {
    println!(
        "{} {} {}",
        style(kind.as_str().to_uppercase()).bold(),
        style(id).cyan(),
        style(name).bold()
    );
    println!("{}", style("─".repeat(50)).dim());
}

fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("{:<20} {}", style(label).dim(), value);
}

fn process_name(catalog: &Catalog, id: ProcessId) -> String {
    catalog
        .process(id)
        .map(|p| format!("{} ({})", p.name, p.id))
        .unwrap_or_else(|| format!("{} (unknown)", id))
}

fn print_process(catalog: &Catalog, process: &Process) {
    print_header(RecordKind::Process, process.id, &process.name);
    print_field("Active:", yes_no(process.active));

    let materials: Vec<String> = catalog
        .materials_for(process.id)
        .map(|m| format!("{} ({})", m.name, m.id))
        .collect();
    print_field("Materials:", format_list(&materials));
}

fn print_material(catalog: &Catalog, material: &Material) {
    print_header(RecordKind::Material, material.id, &material.name);
    print_field("Process:", process_name(catalog, material.process_id));
    print_field("Active:", yes_no(material.active));
    print_field("Custom:", yes_no(material.is_custom));
    print_field("Colors:", format_list(&material.color));
    print_field("Infill:", format_list(&material.infill));
    print_field(
        "Tolerance:",
        material
            .default_tolerance()
            .map(format_tolerance)
            .unwrap_or_else(|| "-".to_string()),
    );
    print_field("Tolerance options:", format_list(material.tolerance_options()));

    let finishes: Vec<String> = catalog
        .finishes_for(material.process_id, Some(material.id))
        .map(|f| format!("{} ({})", f.name, f.id))
        .collect();
    print_field("Finishes:", format_list(&finishes));
}

fn print_finish(catalog: &Catalog, finish: &Finish) {
    print_header(RecordKind::Finish, finish.id, &finish.name);
    print_field("Process:", process_name(catalog, finish.process_id));
    print_field("Custom:", yes_no(finish.is_custom));

    let materials: Vec<String> = finish
        .restricted_materials
        .iter()
        .map(|id| match catalog.material(*id) {
            Some(m) => format!("{} ({})", m.name, m.id),
            None => format!("{} (unknown)", id),
        })
        .collect();
    print_field("Materials:", format_list(&materials));
}

fn run_check(args: CheckArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(global, config)?;
    let format = resolve_format(global, config, OutputFormat::Auto);
    let issues = catalog.check();

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&issues).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&issues).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            for issue in &issues {
                let severity = match issue.severity {
                    Severity::Error => style("error").red().bold(),
                    Severity::Warning => style("warning").yellow().bold(),
                };
                println!(
                    "{} {} {}: {}",
                    severity,
                    issue.kind,
                    style(issue.id).cyan(),
                    issue.message
                );
            }

            if !global.quiet {
                if issues.is_empty() {
                    println!(
                        "{} Catalog OK: {} processes, {} materials, {} finishes",
                        style("✓").green(),
                        catalog.processes.len(),
                        catalog.materials.len(),
                        catalog.finishes.len()
                    );
                } else {
                    println!();
                    println!("{} error(s), {} warning(s)", errors, warnings);
                }
            }
        }
    }

    if errors > 0 || (args.strict && warnings > 0) {
        return Err(miette::miette!(
            "catalog check failed: {} error(s), {} warning(s)",
            errors,
            warnings
        ));
    }

    Ok(())
}

fn run_dump(global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(global, config)?;

    match resolve_format(global, config, OutputFormat::Yaml) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&catalog).into_diagnostic()?;
            println!("{}", json);
        }
        _ => print!("{}", catalog.to_yaml().into_diagnostic()?),
    }

    Ok(())
}

fn run_schema() -> Result<()> {
    let schema = assets::catalog_schema()
        .ok_or_else(|| miette::miette!("catalog schema is missing from this build"))?;
    print!("{}", schema);
    Ok(())
}
