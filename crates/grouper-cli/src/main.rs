mod commands;
mod logging;
mod progress;
mod prompt;

use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, OrganizeArgs};
use dotenv::dotenv;
use grouper_core::classify::service_from_config;
use grouper_core::{
    AppConfig, ClassificationClient, ExhaustedPolicy, OrganizeEngine, RecoveryPrompt, RunContext,
    SkipMissing,
};
use progress::CliReporter;
use prompt::StdinPrompt;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match grouper_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let outcome = match args.command {
        Some(Commands::Organize(organize)) => run_organize(&config, organize),
        Some(Commands::Scan { source }) => run_scan(&source),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config.redacted());
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = outcome {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_organize(config: &AppConfig, args: OrganizeArgs) -> anyhow::Result<()> {
    let ctx = RunContext::new(&args.source, &args.target, &args.criteria)?;

    let mut policy = config.retry_policy();
    if args.fail_on_unavailable {
        policy.on_exhausted = ExhaustedPolicy::Fail;
    }

    let service = service_from_config(config).context("Cannot set up the classifier")?;
    let classifier = ClassificationClient::new(service).with_policy(policy);

    let prompt: Arc<dyn RecoveryPrompt> = if args.non_interactive {
        Arc::new(SkipMissing)
    } else {
        Arc::new(StdinPrompt::new())
    };

    let engine = OrganizeEngine::new(classifier)
        .with_prompt(prompt)
        .with_reporter(Arc::new(CliReporter::new()))
        .with_strict_names(config.sanitize_group_names);

    let report = engine
        .start_run(ctx)?
        .wait()
        .context("File organization failed")?;

    println!();
    info!(
        "{} files scanned, {} groups, finished in {}",
        format!("{}", report.files_scanned).cyan(),
        format!("{}", report.groups).cyan(),
        format!("{:.2}s", report.duration.as_secs_f64()).green(),
    );
    info!(
        "{} moved, {} skipped, {} failed, {} unknown names, {} rejected groups",
        format!("{}", report.relocation.moved).green(),
        format!("{}", report.relocation.skipped).yellow(),
        format!("{}", report.relocation.failed).red(),
        report.relocation.unknown_names,
        report.relocation.rejected_groups,
    );

    Ok(())
}

fn run_scan(source: &str) -> anyhow::Result<()> {
    let inventory = grouper_core::scanner::scan_inventory(Path::new(source))?;

    for record in inventory.records() {
        let created = match record.created() {
            Ok(date) => date.format("%Y-%m-%d %H:%M:%S").to_string(),
            Err(_) => "-".to_string(),
        };
        println!(
            "{}  {}  {}",
            created.dimmed(),
            record.name.bold(),
            record.path.display()
        );
    }
    info!("{} files found", format!("{}", inventory.len()).cyan());

    Ok(())
}
