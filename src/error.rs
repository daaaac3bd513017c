//! Fatal configuration faults
//!
//! Anything here halts level preparation. Runtime misses (pool exhaustion,
//! spawn before init) are not errors; see `sim::SkipReason`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpawnError {
    /// The level roster has no mob definitions
    #[error("level '{level}' has an empty mob roster")]
    EmptyRoster { level: String },

    /// A tunable is out of range
    #[error("invalid engine settings: {0}")]
    InvalidSettings(String),

    /// A spawn region names a shape that does not exist
    #[error("unknown spawn region shape '{0}'")]
    UnknownShape(String),

    /// Settings file could not be read
    #[error("cannot read settings file '{path}'")]
    SettingsRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Settings JSON could not be decoded
    #[error("failed to parse engine settings")]
    SettingsParse(#[from] serde_json::Error),
}
