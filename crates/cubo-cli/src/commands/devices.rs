//! Devices command implementation.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::OutputFormat;
use crate::format::{
    DeviceListing, FormatOptions, format_devices_csv, format_devices_json, format_devices_text,
};
use crate::util::{Selection, load_frame, write_output};

pub fn cmd_devices(
    files: &[PathBuf],
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let mut listings = Vec::with_capacity(files.len());
    for path in files {
        let frame = load_frame(path, &Selection::default())?;
        listings.push(DeviceListing {
            file: path.display().to_string(),
            rows: frame.len(),
            tagged: frame.has_device_column(),
            devices: frame.devices(),
        });
    }

    let content = match format {
        OutputFormat::Json => format_devices_json(&listings, opts)?,
        OutputFormat::Csv => format_devices_csv(&listings, opts),
        OutputFormat::Text => format_devices_text(&listings, opts),
    };
    write_output(output, &content)?;
    Ok(())
}
