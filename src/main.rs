mod cli;

use clap::Parser;
use cli::{Cli, Commands, Direction};
use console::style;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::fmt::time;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

fn init_tracing() {
    let fmt_layer = fmt::layer()
        .pretty()
        .with_thread_ids(true)
        .with_timer(time::UtcTime::rfc_3339());

    Registry::default()
        .with(EnvFilter::from_default_env())
        .with(fmt_layer)
        .init();
}

fn main() -> ExitCode {
    let now = Instant::now();
    init_tracing();

    tracing::debug!("CLI starting up");
    let cli = Cli::parse();

    let result = run(cli.command);

    match result {
        Ok(json) => {
            println!("{json}");
            eprintln!(
                "{} in {:.3}s.",
                style("Finished").green().bold(),
                now.elapsed().as_secs_f32()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", serde_json::json!({ "error": err.to_string() }));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> flowlens::AnalysisResult<String> {
    let json = match command {
        Commands::Cfg { file, function } => {
            let cfg = flowlens::extract_cfg(&file, &function)?;
            serde_json::to_string_pretty(&cfg)
        }
        Commands::Dfg { file, function } => {
            let dfg = flowlens::extract_dfg(&file, &function)?;
            serde_json::to_string_pretty(&dfg)
        }
        Commands::Pdg { file, function } => {
            let pdg = flowlens::extract_pdg(&file, &function)?;
            serde_json::to_string_pretty(&pdg)
        }
        Commands::Slice {
            file,
            function,
            line,
            direction,
            var,
        } => {
            let pdg = flowlens::extract_pdg(&file, &function)?;
            let lines = match direction {
                Direction::Backward => flowlens::backward_slice(&pdg, line, var.as_deref()),
                Direction::Forward => flowlens::forward_slice(&pdg, line, var.as_deref()),
            };
            serde_json::to_string_pretty(&lines)
        }
        Commands::Deps {
            file,
            function,
            line,
        } => {
            let pdg = flowlens::extract_pdg(&file, &function)?;
            let deps = flowlens::get_dependencies(&pdg, line);
            serde_json::to_string_pretty(&deps)
        }
    };
    Ok(json.expect("serde_json serialization of a well-formed in-memory value never fails"))
}
