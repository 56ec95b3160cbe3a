use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::info;

use schemaform::{
    MessageCatalog, Settings,
    config::DEFAULT_SETTINGS_FILE,
    run::{Assignment, apply, field_lines, open_form},
    source::SchemaSource,
};

#[derive(Parser, Debug)]
#[command(
    name = "schemaform",
    version,
    about = "Edit and validate JSON documents against a form schema"
)]
struct Cli {
    /// Schema document: a file path or an http(s) URL.
    #[arg(short, long)]
    schema: SchemaSource,
    /// JSON document to edit. Created on the first write if missing.
    #[arg(short, long)]
    data: PathBuf,
    /// Settings file. Defaults to `.schemaform.toml` next to the document.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Validate every field right after loading.
    #[arg(long)]
    validate: bool,
    /// Do not keep a backup of the previous document.
    #[arg(long)]
    no_backup: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the field tree and the current document.
    Show,
    /// Apply `path=value` edits in order.
    Set {
        #[arg(required = true)]
        edits: Vec<Assignment>,
    },
    /// Validate every field and report violations.
    Check,
}

fn settings_path(cli: &Cli) -> PathBuf {
    match &cli.settings {
        Some(p) => p.clone(),
        None => cli
            .data
            .parent()
            .unwrap_or(Path::new("."))
            .join(DEFAULT_SETTINGS_FILE),
    }
}

fn print_errors(path: &str, errors: &[schemaform::Rule], messages: &MessageCatalog) {
    for msg in messages.render(errors) {
        println!("  {} {}", path.bold(), msg.red());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let cli = Cli::parse();

    let settings_path = settings_path(&cli);
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load settings {}", settings_path.display()))?;
    let mut config = settings.form;
    config.validate |= cli.validate;

    let mut form = open_form(&cli.schema, &cli.data, config, !cli.no_backup).await?;

    match &cli.command {
        Command::Show => {
            for line in field_lines(&form) {
                let indent = "  ".repeat(line.depth);
                let mut head = format!("{indent}{} [{}]", line.path.cyan(), line.kind);
                if line.required {
                    head.push_str(&format!(" {}", "*".red()));
                }
                match &line.value {
                    Some(v) => println!("{head} = {v:?}"),
                    None => println!("{head}"),
                }
                if let Some(options) = &line.options {
                    println!("{indent}    options: {}", options.join(", ").dimmed());
                }
                if let Some(desc) = &line.description {
                    println!("{indent}    {}", desc.dimmed());
                }
                // published when validating on load
                if let Some(errors) = form.errors(&line.path) {
                    print_errors(&line.path, errors, &settings.messages);
                }
            }
            println!("{}", form.current_document());
        }
        Command::Set { edits } => {
            let failed = apply(&mut form, edits)?;
            for (path, errors) in &failed {
                print_errors(path, errors, &settings.messages);
            }
            info!("{} edits written to {}", edits.len(), cli.data.display());
        }
        Command::Check => {
            let report = form.validate_all();
            if report.is_valid() {
                println!("{}", format!("{} fields valid", report.len()).green());
                return Ok(());
            }
            for (path, errors) in report.invalid() {
                print_errors(path, errors, &settings.messages);
            }
            let summary = format!(
                "{} violations in {} fields",
                report.error_count(),
                report.invalid().count()
            );
            println!("{}", summary.red().bold());
            std::process::exit(1);
        }
    }

    Ok(())
}
