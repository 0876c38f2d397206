//! `pcfg configure` command - Interactive part configuration
//!
//! Walks the cascade one prompt at a time: process, material, the
//! material-scoped fields, finish, tolerance and counts. Each answer goes
//! through the engine, so later prompts only offer what is still valid.

use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_tolerance, load_catalog, open_sink, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Engine, FieldUpdate, ProcessId, SubmissionRecord};

#[derive(clap::Args, Debug)]
pub struct ConfigureArgs {
    /// Start with this process instead of prompting for one
    #[arg(long, short = 'p')]
    pub process: Option<ProcessId>,

    /// Submit without asking for confirmation, then stop after one part
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl ConfigureArgs {
    /// Whether to offer another round after a part is done
    fn asks_for_another(&self) -> bool {
        !self.yes
    }
}

pub fn run(args: ConfigureArgs, global: &GlobalOpts) -> Result<()> {
    if !Term::stderr().is_term() {
        return Err(miette::miette!(
            help = "use 'pcfg submit' to configure a part non-interactively",
            "pcfg configure needs an interactive terminal"
        ));
    }

    let config = Config::load();
    let catalog = load_catalog(global, &config)?;
    let format = resolve_format(global, &config, OutputFormat::Auto);
    let mut sink = open_sink(format, &config);

    let mut wizard = Wizard {
        engine: Engine::new(&catalog),
        theme: ColorfulTheme::default(),
    };

    let mut preset = args.process;
    loop {
        println!();
        println!("{} Configure a part", style("◆").cyan());
        println!("{}", style("─".repeat(50)).dim());

        wizard.prompt_process(preset.take())?;
        wizard.prompt_material()?;
        wizard.prompt_material_fields()?;
        wizard.prompt_finish()?;
        wizard.prompt_tolerance()?;
        wizard.prompt_counts()?;

        let record = wizard.engine.record();
        println!();
        print_summary(&wizard.engine, &record);
        println!();

        let confirmed = args.yes
            || Confirm::with_theme(&wizard.theme)
                .with_prompt("Submit this part?")
                .default(true)
                .interact()
                .into_diagnostic()?;

        if confirmed {
            wizard.engine.submit(&mut sink)?;
            eprintln!("{} Submitted", style("✓").green());
        } else {
            println!("{}", style("Discarded").dim());
        }

        if !args.asks_for_another() {
            break;
        }
        let again = Confirm::with_theme(&wizard.theme)
            .with_prompt("Configure another part?")
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !again {
            break;
        }
    }

    Ok(())
}

struct Wizard<'c> {
    engine: Engine<'c>,
    theme: ColorfulTheme,
}

impl<'c> Wizard<'c> {
    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .into_diagnostic()
    }

    fn prompt_process(&mut self, preset: Option<ProcessId>) -> Result<()> {
        if let Some(process) = preset {
            self.engine.set_process(process);
            if self.engine.selected_process().is_some() {
                return Ok(());
            }
            eprintln!("{} unknown process {}", style("!").yellow(), process);
        }

        let processes: Vec<_> = self.engine.active_processes().collect();
        if processes.is_empty() {
            return Err(miette::miette!("The catalog has no active processes"));
        }

        let names: Vec<String> = processes.iter().map(|p| p.name.clone()).collect();
        let index = self.select("Process", &names, 0)?;
        self.engine.set_process(processes[index].id);
        Ok(())
    }

    fn prompt_material(&mut self) -> Result<()> {
        let materials: Vec<_> = self.engine.available_materials().collect();
        if materials.is_empty() {
            return Err(miette::miette!(
                "No materials are available for {}",
                self.engine
                    .selected_process()
                    .map(|p| p.name.as_str())
                    .unwrap_or("this process")
            ));
        }

        let names: Vec<String> = materials.iter().map(|m| m.name.clone()).collect();
        let index = self.select(
            &format!("Material ({} available)", materials.len()),
            &names,
            0,
        )?;
        self.engine.set_material(materials[index].id);
        Ok(())
    }

    fn prompt_material_fields(&mut self) -> Result<()> {
        let mut update = FieldUpdate::new();

        if self.engine.custom_material_visible() {
            let text: String = Input::with_theme(&self.theme)
                .with_prompt("Describe the material")
                .interact_text()
                .into_diagnostic()?;
            update = update.custom_material(text);
        }

        let colors = self.engine.color_options();
        if !colors.is_empty() {
            let index = self.select("Color", colors, 0)?;
            update = update.color(colors[index].as_str());
        }

        let infills = self.engine.infill_options();
        if !infills.is_empty() {
            let index = self.select("Infill", infills, 0)?;
            update = update.infill(infills[index].as_str());
        }

        if !update.is_empty() {
            self.engine.update_fields(update);
        }
        Ok(())
    }

    fn prompt_finish(&mut self) -> Result<()> {
        if !self.engine.finish_visible() {
            return Ok(());
        }

        let finishes: Vec<_> = self.engine.available_finishes().collect();
        let mut names = vec!["(none)".to_string()];
        names.extend(finishes.iter().map(|f| f.name.clone()));

        let index = self.select("Finish", &names, 0)?;
        let Some(finish) = index.checked_sub(1).and_then(|i| finishes.get(i)) else {
            return Ok(());
        };
        self.engine.set_finish(finish.id);

        if self.engine.custom_finish_visible() {
            let text: String = Input::with_theme(&self.theme)
                .with_prompt("Describe the finish")
                .interact_text()
                .into_diagnostic()?;
            self.engine
                .update_fields(FieldUpdate::new().custom_finish(text));
        }
        Ok(())
    }

    fn prompt_tolerance(&mut self) -> Result<()> {
        let options = self.engine.tolerance_options();
        if options.is_empty() {
            return Ok(());
        }

        let labels: Vec<String> = options.iter().copied().map(format_tolerance).collect();
        let default = self
            .engine
            .displayed_tolerance()
            .and_then(|t| options.iter().position(|o| *o == t))
            .unwrap_or(0);

        let index = self.select("Tolerance", &labels, default)?;
        self.engine
            .update_fields(FieldUpdate::new().tolerance(options[index]));
        Ok(())
    }

    fn prompt_counts(&mut self) -> Result<()> {
        let selection = self.engine.selection();
        let threads = self.prompt_count("Threaded holes", selection.threads)?;
        let inserts = self.prompt_count("Inserts", selection.inserts)?;
        let quantity = self.prompt_count("Quantity", selection.quantity)?;

        self.engine.update_fields(
            FieldUpdate::new()
                .threads(threads)
                .inserts(inserts)
                .quantity(quantity),
        );
        Ok(())
    }

    fn prompt_count(&self, prompt: &str, default: u32) -> Result<u32> {
        Input::<u32>::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.max(1))
            .validate_with(|n: &u32| if *n >= 1 { Ok(()) } else { Err("must be at least 1") })
            .interact_text()
            .into_diagnostic()
    }
}

fn print_summary(engine: &Engine<'_>, record: &SubmissionRecord) {
    let field = |label: &str, value: String| {
        println!("  {:<18} {}", style(label).dim(), value);
    };
    let dash = || "-".to_string();

    field(
        "Process:",
        engine
            .selected_process()
            .map(|p| p.name.clone())
            .unwrap_or_else(dash),
    );
    field(
        "Material:",
        engine
            .selected_material()
            .map(|m| m.name.clone())
            .unwrap_or_else(dash),
    );
    if let Some(text) = &record.custom_material {
        field("Custom material:", text.clone());
    }
    if let Some(color) = &record.color {
        field("Color:", color.clone());
    }
    if let Some(infill) = &record.infill {
        field("Infill:", infill.clone());
    }
    field(
        "Finish:",
        engine
            .selected_finish()
            .map(|f| f.name.clone())
            .unwrap_or_else(dash),
    );
    if let Some(text) = &record.custom_finish {
        field("Custom finish:", text.clone());
    }
    field(
        "Tolerance:",
        record.tolerance.map(format_tolerance).unwrap_or_else(dash),
    );
    field("Threaded holes:", record.threads.to_string());
    field("Inserts:", record.inserts.to_string());
    field("Quantity:", style(record.quantity).bold().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ConfigureArgs,
    }

    fn parse(argv: &[&str]) -> ConfigureArgs {
        Harness::try_parse_from(std::iter::once("configure").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_yes_runs_a_single_part() {
        assert!(!parse(&["--yes"]).asks_for_another());
        assert!(!parse(&["-y", "-p", "2"]).asks_for_another());
    }

    #[test]
    fn test_default_offers_another_part() {
        let args = parse(&[]);
        assert!(args.asks_for_another());
        assert_eq!(args.process, None);
    }
}
