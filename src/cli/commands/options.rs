//! `pcfg options` command - Show what the cascade offers for a partial selection

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_list, format_tolerance, load_catalog, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Engine, FinishId, MaterialId, ProcessId};

#[derive(clap::Args, Debug)]
pub struct OptionsArgs {
    /// Selected process
    #[arg(long, short = 'p')]
    pub process: Option<ProcessId>,

    /// Selected material (requires --process)
    #[arg(long, short = 'm', requires = "process")]
    pub material: Option<MaterialId>,

    /// Selected finish (requires --material)
    #[arg(long, requires = "material")]
    pub finish: Option<FinishId>,
}

pub fn run(args: OptionsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let catalog = load_catalog(global, &config)?;
    let format = resolve_format(global, &config, OutputFormat::Auto);

    let mut engine = Engine::new(&catalog);
    if let Some(process) = args.process {
        engine.set_process(process);
    }
    if let Some(material) = args.material {
        engine.set_material(material);
        if engine.selection().material.is_none() && !global.quiet {
            eprintln!(
                "{} material {} is not selectable for process {}",
                style("!").yellow(),
                material,
                args.process.map(|p| p.to_string()).unwrap_or_default()
            );
        }
    }
    if let Some(finish) = args.finish {
        engine.set_finish(finish);
        if engine.selection().finish.is_none() && !global.quiet {
            eprintln!(
                "{} finish {} is not offered for this material",
                style("!").yellow(),
                finish
            );
        }
    }

    let view = engine.view();
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&view).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&view).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Id => {
            // Ids of the next level down the cascade
            if view.process.is_none() {
                view.processes.iter().for_each(|p| println!("{}", p.id));
            } else if view.material.is_none() {
                view.materials.iter().for_each(|m| println!("{}", m.id));
            } else {
                view.finishes.iter().for_each(|f| println!("{}", f.id));
            }
        }
        _ => {
            let named = |name: &str, id: &dyn std::fmt::Display| format!("{} ({})", name, id);

            let processes: Vec<String> =
                view.processes.iter().map(|p| named(&p.name, &p.id)).collect();
            print_line("Processes:", format_list(&processes));

            match view.process {
                Some(process) => print_line("Process:", named(&process.name, &process.id)),
                None => return Ok(()),
            }

            let materials: Vec<String> =
                view.materials.iter().map(|m| named(&m.name, &m.id)).collect();
            print_line(
                &format!("Materials ({}):", view.available_material_count),
                format_list(&materials),
            );

            let Some(material) = view.material else {
                return Ok(());
            };
            print_line("Material:", named(&material.name, &material.id));
            if view.custom_material_visible {
                print_line("Custom material:", "free text accepted");
            }
            print_line("Colors:", format_list(view.colors));
            print_line("Infill:", format_list(view.infills));
            let tolerances: Vec<String> =
                view.tolerances.iter().copied().map(format_tolerance).collect();
            print_line("Tolerances:", format_list(&tolerances));
            print_line(
                "Default tolerance:",
                view.displayed_tolerance
                    .map(format_tolerance)
                    .unwrap_or_else(|| "-".to_string()),
            );

            if view.finish_visible {
                let finishes: Vec<String> =
                    view.finishes.iter().map(|f| named(&f.name, &f.id)).collect();
                print_line("Finishes:", format_list(&finishes));
            }
            if let Some(finish) = view.finish {
                print_line("Finish:", named(&finish.name, &finish.id));
                if view.custom_finish_visible {
                    print_line("Custom finish:", "free text accepted");
                }
            }
        }
    }

    Ok(())
}

fn print_line(label: &str, value: impl std::fmt::Display) {
    println!("{:<20} {}", style(label).bold(), value);
}
