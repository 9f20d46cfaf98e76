//! Config command - inspect and edit the JSON configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value as Json;

use faktur_core::FakturConfig;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Where to write the file (default: the --config path or the user config dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value by dotted key (e.g. "report.max_tax_percent")
    Get { key: String },

    /// Change one value by dotted key; the value is read as JSON, else as a string
    Set { key: String, value: String },

    /// Print where the configuration file lives
    Path,
}

/// The configuration file the command reads and writes.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    fn new(config_path: Option<&str>) -> Self {
        Self {
            path: config_path.map(PathBuf::from).unwrap_or_else(default_config_path),
        }
    }

    /// Contents of the file as JSON, or the defaults when there is no file yet.
    fn read(&self) -> anyhow::Result<Json> {
        let config = if self.path.exists() {
            FakturConfig::from_file(&self.path)?
        } else {
            FakturConfig::default()
        };
        Ok(serde_json::to_value(config)?)
    }

    /// Validate `json` as a configuration and write it.
    fn write(&self, json: Json) -> anyhow::Result<()> {
        let config: FakturConfig = serde_json::from_value(json)
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
        write_config(&self.path, &config)
    }
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let file = ConfigFile::new(config_path);

    match args.command {
        ConfigCommand::Show => {
            if !file.path.exists() {
                eprintln!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            println!("{}", serde_json::to_string_pretty(&file.read()?)?);
        }
        ConfigCommand::Init { output, force } => {
            let target = output.unwrap_or(file.path);
            if target.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    target.display()
                );
            }
            write_config(&target, &FakturConfig::default())?;
            println!("{} Created configuration file at {}", style("✓").green(), target.display());
        }
        ConfigCommand::Get { key } => {
            let json = file.read()?;
            let value = lookup(&json, &key)
                .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        ConfigCommand::Set { key, value } => {
            let parsed: Json =
                serde_json::from_str(&value).unwrap_or_else(|_| Json::String(value.clone()));

            let mut json = file.read()?;
            let slot = lookup_mut(&mut json, &key)
                .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
            *slot = parsed.clone();
            file.write(json)?;

            println!("{} Set {} = {}", style("✓").green(), key, parsed);
        }
        ConfigCommand::Path => {
            println!("Configuration file: {}", file.path.display());
            if file.path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!();
                println!("Run 'faktur config init' to create a configuration file.");
            }
        }
    }

    Ok(())
}

fn write_config(path: &Path, config: &FakturConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    Ok(())
}

fn lookup<'a>(json: &'a Json, key: &str) -> Option<&'a Json> {
    key.split('.').try_fold(json, |node, part| node.get(part))
}

/// Only existing keys resolve, so `set` cannot add unknown settings.
fn lookup_mut<'a>(json: &'a mut Json, key: &str) -> Option<&'a mut Json> {
    key.split('.').try_fold(json, |node, part| node.get_mut(part))
}
