use std::{fs, fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment};
use log::{info, trace};

pub fn get_default_config() -> &'static str {
    include_str!("../../config/config.toml")
}

/// Loads `path`, writing the default configuration there first if it does
/// not exist. `IRITA_`-prefixed environment variables override file values
/// and `overrides` (e.g. from the command line) override both.
pub fn load_configuration(path: &Path, overrides: &[(&str, &str)]) -> Result<Config> {
    if !path.exists() {
        write_config_to(path, get_default_config()).context("Could not create default config")?;
        info!(path:% = path.display(); "Created new configuration file");
    }

    let filename = path.to_str().context("Invalid config file path")?;

    let mut builder = Config::builder()
        .add_source(config::File::with_name(filename).format(config::FileFormat::Toml))
        .add_source(Environment::with_prefix("IRITA").prefix_separator("_").separator("__"));

    for (key, value) in overrides {
        trace!("Set override: ({key}, {value})");
        builder = builder
            .set_override(*key, *value)
            .context("Could not override config property")?;
    }

    builder.build().context("Could not build config")
}

pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create parent directories")?;
    };

    let mut file = File::create(path).context("Failed to create config file")?;
    file.write_all(source.as_bytes())
        .context("Failed to write config content")?;
    file.write_all(b"\n").context("Failed to write newline")?;
    Ok(())
}
