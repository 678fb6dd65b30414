use std::path::PathBuf;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML or has the wrong shape.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The platform does not provide a config directory.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// The platform does not provide a data directory.
    #[error("could not determine data directory")]
    NoDataDir,
}
