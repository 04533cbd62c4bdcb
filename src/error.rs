use std::io;
use std::path::PathBuf;

/// Errors produced while loading levels or running a session.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// A level file or level directory could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File or directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A tagged line (`D`, `P` or `E`) has the wrong number of fields.
    #[error("{source_id}:{line}: '{tag}' line expects {expected} fields, found {found}")]
    FieldCount {
        /// Level id the line came from.
        source_id: String,
        /// 1-based line number.
        line: usize,
        /// Line tag.
        tag: char,
        /// Fields the tag takes.
        expected: usize,
        /// Fields on the line.
        found: usize,
    },

    /// A numeric field could not be parsed.
    #[error("{source_id}:{line}: field '{field}' is not a valid number: '{value}'")]
    InvalidNumber {
        /// Level id the line came from.
        source_id: String,
        /// 1-based line number.
        line: usize,
        /// Name of the field.
        field: &'static str,
        /// Text that failed to parse.
        value: String,
    },

    /// A tile row does not hold exactly one id per grid column.
    #[error("{source_id}:{line}: tile row has {found} ids, expected {expected}")]
    TileRowWidth {
        /// Level id the line came from.
        source_id: String,
        /// 1-based line number.
        line: usize,
        /// Grid width.
        expected: usize,
        /// Ids on the row.
        found: usize,
    },

    /// More tile rows than the grid height.
    #[error("{source_id}:{line}: tile row exceeds grid height {height}")]
    TooManyRows {
        /// Level id the line came from.
        source_id: String,
        /// 1-based line number.
        line: usize,
        /// Grid height.
        height: usize,
    },

    /// A portal points at a level that was never registered.
    #[error("level '{level}': portal {portal} leads to unknown level '{destination}'")]
    UnknownDestination {
        /// Level holding the portal.
        level: String,
        /// Decoration index of the portal.
        portal: usize,
        /// Destination id as written.
        destination: String,
    },

    /// The same level source was registered twice.
    #[error("level '{id}' is already registered")]
    DuplicateLevel { id: String },

    /// A level id was requested that is not registered.
    #[error("level '{id}' is not registered")]
    UnknownLevel { id: String },

    /// A configuration value is out of range.
    #[error("invalid configuration value '{field}': {reason}")]
    InvalidConfig {
        /// Offending field.
        field: &'static str,
        /// What the field must satisfy.
        reason: String,
    },

    /// Configuration JSON could not be parsed.
    #[error("invalid configuration in {path}: {source}")]
    Config {
        /// Config file path.
        path: PathBuf,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by a render backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The texture file could not be read.
    #[error("failed to read texture {path}: {source}")]
    Io {
        /// Texture path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The texture bytes could not be decoded.
    #[error("failed to decode texture {path}: {reason}")]
    Decode { path: String, reason: String },
}
