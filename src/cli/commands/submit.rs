//! `pcfg submit` command - Configure a part from flags and submit it

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{load_catalog, open_sink, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Engine, FieldUpdate, FinishId, MaterialId, ProcessId};

#[derive(clap::Args, Debug)]
pub struct SubmitArgs {
    /// Manufacturing process
    #[arg(long, short = 'p')]
    pub process: ProcessId,

    /// Material (must belong to the process)
    #[arg(long, short = 'm')]
    pub material: MaterialId,

    /// Finish (must be offered for the material)
    #[arg(long)]
    pub finish: Option<FinishId>,

    /// Number of parts
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..))]
    pub quantity: Option<u32>,

    /// Color, for materials that offer colors
    #[arg(long)]
    pub color: Option<String>,

    /// Infill, for materials that offer infill
    #[arg(long)]
    pub infill: Option<String>,

    /// Tolerance (defaults to the material's default tolerance)
    #[arg(long, short = 't', conflicts_with = "no_tolerance")]
    pub tolerance: Option<f64>,

    /// Submit without a tolerance even if the material has a default
    #[arg(long)]
    pub no_tolerance: bool,

    /// Number of threaded holes
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: Option<u32>,

    /// Number of inserts
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub inserts: Option<u32>,

    /// Material description, used when the material is "Other"
    #[arg(long)]
    pub custom_material: Option<String>,

    /// Finish description, used when the finish is "Other"
    #[arg(long)]
    pub custom_finish: Option<String>,

    /// Print the record that would be submitted without submitting it
    #[arg(long)]
    pub dry_run: bool,
}

impl SubmitArgs {
    fn field_update(&self) -> FieldUpdate {
        let mut update = FieldUpdate::new();
        if let Some(quantity) = self.quantity {
            update = update.quantity(quantity);
        }
        if let Some(color) = &self.color {
            update = update.color(color.as_str());
        }
        if let Some(infill) = &self.infill {
            update = update.infill(infill.as_str());
        }
        if let Some(tolerance) = self.tolerance {
            update = update.tolerance(tolerance);
        }
        if self.no_tolerance {
            update = update.clear_tolerance();
        }
        if let Some(threads) = self.threads {
            update = update.threads(threads);
        }
        if let Some(inserts) = self.inserts {
            update = update.inserts(inserts);
        }
        if let Some(text) = &self.custom_material {
            update = update.custom_material(text.as_str());
        }
        if let Some(text) = &self.custom_finish {
            update = update.custom_finish(text.as_str());
        }
        update
    }
}

pub fn run(args: SubmitArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let catalog = load_catalog(global, &config)?;
    let format = resolve_format(global, &config, OutputFormat::Auto);

    let mut engine = Engine::new(&catalog);

    engine.set_process(args.process);
    if engine.selected_process().is_none() {
        return Err(miette::miette!(
            help = "run 'pcfg catalog list processes' to see the catalog",
            "Unknown process {}",
            args.process
        ));
    }

    engine.set_material(args.material);
    if engine.selection().material.is_none() {
        let ids: Vec<String> = engine
            .available_materials()
            .map(|m| m.id.to_string())
            .collect();
        return Err(miette::miette!(
            help = format!("materials for process {}: {}", args.process, ids.join(", ")),
            "Material {} is not selectable for process {}",
            args.material,
            args.process
        ));
    }

    if let Some(finish) = args.finish {
        engine.set_finish(finish);
        if engine.selection().finish.is_none() {
            let ids: Vec<String> = engine
                .available_finishes()
                .map(|f| f.id.to_string())
                .collect();
            return Err(miette::miette!(
                help = format!("finishes for material {}: {}", args.material, ids.join(", ")),
                "Finish {} is not offered for material {}",
                finish,
                args.material
            ));
        }
    }

    engine.update_fields(args.field_update());
    warn_unoffered(&engine, &args, global);

    if args.dry_run {
        let record = engine.record();
        match format {
            OutputFormat::Yaml => print!("{}", serde_yml::to_string(&record).into_diagnostic()?),
            _ => println!("{}", serde_json::to_string_pretty(&record).into_diagnostic()?),
        }
        return Ok(());
    }

    let mut sink = open_sink(format, &config);
    let record = engine.submit(&mut sink)?;

    if !global.quiet {
        eprintln!(
            "{} Submitted {} × {}",
            style("✓").green(),
            record.quantity,
            engine
                .catalog()
                .material(args.material)
                .map(|m| m.name.as_str())
                .unwrap_or("part")
        );
    }

    Ok(())
}

/// Free-form values are accepted as given; flag the ones the material doesn't list
fn warn_unoffered(engine: &Engine<'_>, args: &SubmitArgs, global: &GlobalOpts) {
    if global.quiet {
        return;
    }

    let warn = |message: String| eprintln!("{} {}", style("!").yellow(), message);

    if let Some(color) = &args.color {
        if !engine.color_options().contains(color) {
            warn(format!("color '{}' is not offered for this material", color));
        }
    }
    if let Some(infill) = &args.infill {
        if !engine.infill_options().contains(infill) {
            warn(format!("infill '{}' is not offered for this material", infill));
        }
    }
    if let Some(tolerance) = args.tolerance {
        if !engine.tolerance_options().contains(&tolerance) {
            warn(format!(
                "tolerance {} is not offered for this material",
                tolerance
            ));
        }
    }
    if args.custom_material.is_some() && !engine.custom_material_visible() {
        warn("--custom-material ignored: the material is not custom".to_string());
    }
    if args.custom_finish.is_some() && !engine.custom_finish_visible() {
        warn("--custom-finish ignored: no custom finish selected".to_string());
    }
}
