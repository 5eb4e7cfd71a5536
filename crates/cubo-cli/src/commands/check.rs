//! Check command implementation.

use std::path::PathBuf;

use anyhow::Result;
use cubo_core::{Evaluation, Thresholds, evaluate};

use crate::cli::{OutputFormat, SampleArgs, SourceArgs};
use crate::format::{
    FormatOptions, format_evaluation_csv, format_evaluation_json, format_evaluation_text,
};
use crate::util::{Selection, apply_sample_overrides, load_inputs, require_source, write_output};

/// Arguments for the check command.
pub struct CheckArgs<'a> {
    pub source: SourceArgs,
    pub sample: SampleArgs,
    pub thresholds: Thresholds,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

/// Evaluate once and print the result. Returns the evaluation so the caller
/// can pick an exit status.
pub fn cmd_check(args: CheckArgs<'_>) -> Result<Evaluation> {
    let CheckArgs {
        source,
        sample,
        thresholds,
        format,
        output,
        opts,
    } = args;

    require_source(&source, &sample)?;
    let selection = Selection::from_source(&source)?;

    let mut inputs = load_inputs(&source, &selection)?;
    apply_sample_overrides(&mut inputs, &sample);

    let eval = evaluate(&inputs.env, &inputs.motion, &thresholds);
    tracing::debug!(alerts = eval.alerts.len(), "evaluation complete");

    let content = match format {
        OutputFormat::Json => format_evaluation_json(&eval, inputs.latest, &thresholds, opts)?,
        OutputFormat::Csv => format_evaluation_csv(&eval, inputs.latest, opts),
        OutputFormat::Text => format_evaluation_text(&eval, inputs.latest, opts),
    };
    write_output(output, &content)?;

    Ok(eval)
}
