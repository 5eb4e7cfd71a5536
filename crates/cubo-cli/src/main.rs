mod cli;
mod commands;
mod config;
mod format;
mod style;
mod util;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{CheckArgs, StatsArgs, WatchArgs};
use crate::config::{Config, resolve_format, resolve_interval, resolve_source, resolve_thresholds};
use crate::format::FormatOptions;

/// Exit status of `check --fail-on-alert` when an alert fired.
const ALERT_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions before anything else
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "cubo", &mut io::stdout());
        return Ok(());
    }

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let no_color = cli.no_color || config.no_color;
    let base_opts = FormatOptions::new(no_color, cli.style).with_compact(cli.compact);
    let output = cli.output.as_ref();

    if let Some(path) = output {
        tracing::debug!("Output will be written to: {}", path.display());
    }

    match cli.command {
        Commands::Check {
            source,
            thresholds,
            sample,
            output: out,
            fail_on_alert,
        } => {
            let opts = base_opts.with_no_header(out.no_header);
            let eval = commands::cmd_check(CheckArgs {
                source: resolve_source(source, &config),
                sample,
                thresholds: resolve_thresholds(&thresholds, &config)?,
                format: resolve_format(cli.json, out.format, &config),
                output,
                opts: &opts,
            })?;
            if fail_on_alert && !eval.is_nominal() {
                std::process::exit(ALERT_EXIT_CODE);
            }
        }
        Commands::Watch {
            source,
            thresholds,
            output: out,
            interval,
            count,
        } => {
            let opts = base_opts.with_no_header(out.no_header);
            commands::cmd_watch(WatchArgs {
                source: resolve_source(source, &config),
                thresholds: resolve_thresholds(&thresholds, &config)?,
                interval: resolve_interval(interval, &config),
                count,
                format: resolve_format(cli.json, out.format, &config),
                output,
                opts: &opts,
            })
            .await?;
        }
        Commands::Stats {
            file,
            device,
            since,
            until,
            window,
            output: out,
        } => {
            let opts = base_opts.with_no_header(out.no_header);
            commands::cmd_stats(StatsArgs {
                file,
                device,
                since,
                until,
                window,
                format: resolve_format(cli.json, out.format, &config),
                output,
                opts: &opts,
            })?;
        }
        Commands::Devices { files, output: out } => {
            let opts = base_opts.with_no_header(out.no_header);
            let format = resolve_format(cli.json, out.format, &config);
            commands::cmd_devices(&files, format, output, &opts)?;
        }
        Commands::Config { action } => {
            commands::cmd_config(action, output, &base_opts)?;
        }
        Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }

    Ok(())
}
