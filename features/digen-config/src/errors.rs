use std::path::PathBuf;

/// Errors when trying to load a config
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Could not read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config is not valid TOML or does not match the expected shape
    #[error("Could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A config value is syntactically fine but can not be used
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
