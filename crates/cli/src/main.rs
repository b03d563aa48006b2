mod logging;

use anyhow::{Context, Result};
use batch_renamer_core::{
    apply_plan, generate_plan, load_job, ApplyResult, ChainedMetadataProvider, MetadataMap,
    PlanOptions, Progress, RenamePlan, RenameStatus,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "batch-renamer-cli")]
#[command(about = "Rename batches of files with one naming rule")]
struct Cli {
    /// Log applied renames (same as BATCH_RENAMER_LOG=info).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Plan renames and optionally apply them.
    Rename(RenameArgs),
    /// Check a job file without touching any file.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct RenameArgs {
    /// Files or folders to rename. Folders are listed.
    #[arg(long = "input", required = true)]
    inputs: Vec<PathBuf>,
    /// TOML job file selecting the transformation.
    #[arg(long)]
    job: PathBuf,
    /// JSON map of absolute path to metadata.
    #[arg(long)]
    metadata: Vec<PathBuf>,
    #[arg(long, default_value_t = false)]
    recursive: bool,
    #[arg(long, default_value_t = false)]
    include_hidden: bool,
    #[arg(long, default_value_t = false)]
    include_folders: bool,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    job: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Check(args) => cmd_check(args),
    }
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let job = load_job(&args.job)?;

    let mut provider = ChainedMetadataProvider::new();
    for path in &args.metadata {
        provider = provider.with(MetadataMap::load_json(path)?);
    }

    let options = PlanOptions {
        inputs: args.inputs,
        recursive: args.recursive,
        include_hidden: args.include_hidden,
        include_folders: args.include_folders,
    };

    let mut report = |current: usize, total: usize| {
        log::debug!("progress {current}/{total}");
    };
    let plan = generate_plan(&options, &job, &provider, &mut Progress::new(&mut report))?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Table => {
            print_table(&plan);
        }
    }

    if args.apply {
        let result = apply_plan(&plan, &mut Progress::new(&mut report));
        if matches!(args.output, OutputFormat::Json) {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_failures(&result);
        }
        eprintln!(
            "applied: {} renamed, {} not needed, {} invalid, {} failed",
            result.renamed, result.not_needed, result.invalid, result.failed
        );
        if result.failed > 0 {
            anyhow::bail!("{} renames failed", result.failed);
        }
    } else {
        eprintln!("dry run: nothing was renamed. Pass --apply to rename files.");
    }

    Ok(())
}

fn cmd_check(args: CheckArgs) -> Result<()> {
    let job = load_job(&args.job)?;
    let transformation = job.transformation();
    transformation
        .validate()
        .with_context(|| format!("invalid job file: {}", args.job.display()))?;
    println!("ok: {}", transformation.name());
    Ok(())
}

fn print_table(plan: &RenamePlan) {
    println!("original -> planned");
    for record in &plan.records {
        let marker = if !record.is_name_changed() {
            "="
        } else if record.is_valid() {
            "->"
        } else {
            "!!"
        };
        println!(
            "{} {} {}",
            record.absolute_path.display(),
            marker,
            record.effective_name()
        );
    }

    println!(
        "\ntotals: scanned={} hidden_skip={} changed={} unchanged={} invalid={}",
        plan.stats.scanned,
        plan.stats.skipped_hidden,
        plan.stats.changed,
        plan.stats.unchanged,
        plan.stats.invalid
    );
}

fn print_failures(result: &ApplyResult) {
    for outcome in &result.outcomes {
        match &outcome.status {
            RenameStatus::Invalid(reason) | RenameStatus::Failed(reason) => {
                println!("{}: {reason}", outcome.original_path.display());
            }
            RenameStatus::Renamed | RenameStatus::NotNeeded => {}
        }
    }
}
