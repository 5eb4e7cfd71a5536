//! Watch command implementation.
//!
//! Re-reads the data files on every refresh, so rows appended by an
//! exporter between refreshes are picked up. Arguments are parsed once up
//! front; a refresh that fails to read or parse a file is reported and
//! retried on the next tick instead of ending the loop. JSON output is one
//! compact object per line.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use cubo_core::{Indicators, Thresholds, evaluate};
use owo_colors::OwoColorize;

use crate::cli::{OutputFormat, SourceArgs};
use crate::format::{
    FormatOptions, format_evaluation_csv_header, format_evaluation_csv_line,
    format_evaluation_json, format_watch_line,
};
use crate::util::{Selection, append_output, load_inputs};

/// Arguments for the watch command.
pub struct WatchArgs<'a> {
    pub source: SourceArgs,
    pub thresholds: Thresholds,
    pub interval: u64,
    pub count: u32,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_watch(args: WatchArgs<'_>) -> Result<()> {
    let WatchArgs {
        source,
        thresholds,
        interval,
        count,
        format,
        output,
        opts,
    } = args;

    if source.env_file.is_none() && source.motion_file.is_none() {
        bail!(
            "Nothing to watch. Use --env-file and/or --motion-file (or set CUBO_ENV_FILE / \
             CUBO_MOTION_FILE)."
        );
    }

    // Bad arguments would fail every tick, so reject them before looping
    let selection = Selection::from_source(&source)?;
    let json_opts = opts.with_compact(true);

    let files = [&source.env_file, &source.motion_file]
        .into_iter()
        .flatten()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let header = if opts.no_color {
        format!("Watching: {}", files)
    } else {
        format!("Watching: {}", files.cyan())
    };
    eprintln!("{}", header);
    if count > 0 {
        eprintln!(
            "Interval: {}s | Count: {} | Press Ctrl+C to stop",
            interval, count
        );
    } else {
        eprintln!("Interval: {}s | Press Ctrl+C to stop", interval);
    }
    eprintln!("{}", "-".repeat(50));

    let mut header_written = opts.no_header;
    let mut refreshes: u32 = 0;
    let mut previous: Option<Indicators> = None;

    loop {
        // Check if we've reached the count limit
        if count > 0 && refreshes >= count {
            eprintln!("Completed {} refreshes.", refreshes);
            return Ok(());
        }

        match load_inputs(&source, &selection) {
            Ok(inputs) => {
                refreshes += 1;
                let eval = evaluate(&inputs.env, &inputs.motion, &thresholds);
                tracing::debug!(refresh = refreshes, alerts = eval.alerts.len(), "refreshed");

                let content = match format {
                    OutputFormat::Json => {
                        format_evaluation_json(&eval, inputs.latest, &thresholds, &json_opts)?
                    }
                    OutputFormat::Csv => {
                        let mut out = String::new();
                        if !header_written {
                            out.push_str(&format_evaluation_csv_header());
                            header_written = true;
                        }
                        out.push_str(&format_evaluation_csv_line(&eval, inputs.latest));
                        out
                    }
                    OutputFormat::Text => format_watch_line(&eval, previous.as_ref(), opts),
                };
                append_output(output, &content)?;
                previous = Some(eval.indicators);
            }
            Err(e) => {
                eprintln!("Refresh failed: {:#}. Retrying in {}s...", e, interval);
            }
        }

        // Check if we've reached the count limit after this refresh
        if count > 0 && refreshes >= count {
            continue; // Loop will exit at the top
        }

        // Wait for next interval with graceful shutdown support
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                return Ok(());
            }
            _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
        }
    }
}
