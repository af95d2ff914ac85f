use std::path::Path;

use crate::{config::GeneratorConfig, errors::ConfigError};

/// Parses and validates a config from TOML text.
///
/// Missing tables and keys take their default values.
pub fn load_str(contents: &str) -> Result<GeneratorConfig, ConfigError> {
    let config: GeneratorConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Reads, parses and validates a config file.
pub fn load(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Loaded config from {}", path.display());
    load_str(&contents)
}

/// Can optionally load a config file.
///
/// If a path is provided, it will be the same as calling [`load`]
/// If no path is provided, the default config is returned
pub fn maybe_load(path: Option<&Path>) -> Result<GeneratorConfig, ConfigError> {
    match path {
        Some(path) => load(path),
        None => {
            tracing::debug!("No config file given, using defaults");
            Ok(GeneratorConfig::default())
        }
    }
}
