//! Config command implementation.

use std::path::PathBuf;

use anyhow::{Result, bail};
use owo_colors::OwoColorize;

use crate::cli::ConfigAction;
use crate::config::{Config, display_entries};
use crate::format::FormatOptions;
use crate::style;
use crate::util::write_output;

pub fn cmd_config(
    action: ConfigAction,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load();
            let entries = display_entries(&config);
            let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            let mut content = String::new();
            if opts.is_rich() {
                content.push_str(&style::format_title("Configuration", opts.no_color));
                content.push('\n');
            }
            for (key, value) in entries {
                if opts.no_color {
                    content.push_str(&format!("{:>width$}  {}\n", key, value));
                } else {
                    content.push_str(&format!("{:>width$}  {}\n", key.dimmed(), value));
                }
            }
            write_output(output, &content)?;
        }
        ConfigAction::Get { key } => {
            let config = Config::load();
            match config.get(key) {
                Some(value) => write_output(output, &format!("{}\n", value))?,
                None => bail!("{} is not set", key.name()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load();
            config.set(key, &value)?;
            config.save()?;
            eprintln!(
                "{}",
                style::format_success(&format!("Set {} = {}", key.name(), value), opts.no_color)
            );
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::load();
            config.unset(key);
            config.save()?;
            eprintln!(
                "{}",
                style::format_success(&format!("Unset {}", key.name()), opts.no_color)
            );
        }
        ConfigAction::Path => {
            write_output(output, &format!("{}\n", Config::path().display()))?;
        }
        ConfigAction::Init => {
            let path = Config::path();
            if path.exists() {
                eprintln!(
                    "{}",
                    style::format_warning(
                        &format!("Config already exists: {}", path.display()),
                        opts.no_color
                    )
                );
                return Ok(());
            }
            Config::default().save()?;
            eprintln!(
                "{}",
                style::format_success(
                    &format!("Created config: {}", path.display()),
                    opts.no_color
                )
            );
        }
    }
    Ok(())
}
