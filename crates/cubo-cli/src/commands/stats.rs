//! Stats command implementation.

use std::path::PathBuf;

use anyhow::Result;
use cubo_core::describe;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_stats_csv, format_stats_json, format_stats_text};
use crate::util::{Selection, load_frame, write_output};

/// Arguments for the stats command.
pub struct StatsArgs<'a> {
    pub file: PathBuf,
    pub device: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub window: Option<String>,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

pub fn cmd_stats(args: StatsArgs<'_>) -> Result<()> {
    let StatsArgs {
        file,
        device,
        since,
        until,
        window,
        format,
        output,
        opts,
    } = args;

    let selection = Selection::parse(
        device.as_deref(),
        since.as_deref(),
        until.as_deref(),
        window.as_deref(),
    )?;
    let frame = load_frame(&file, &selection)?;
    let stats = describe(&frame);

    let content = match format {
        OutputFormat::Json => format_stats_json(&stats, opts)?,
        OutputFormat::Csv => format_stats_csv(&stats, opts),
        OutputFormat::Text => format_stats_text(&stats, frame.len(), opts),
    };
    write_output(output, &content)?;
    Ok(())
}
