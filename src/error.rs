use thiserror::Error;

/// The ways placing the robot can fail.
///
/// These are the only hard failures of the controller. Everything else is reported as an
/// [`Outcome`](crate::Outcome).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum PlacementError {
    #[error("Invalid position {x},{y}")]
    InvalidPosition { x: i32, y: i32 },
    #[error("Invalid facing direction {0:?}. Valid options are NORTH, SOUTH, EAST, WEST.")]
    InvalidFacing(String),
}

/// Errors raised while processing a text command.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CommandError {
    #[error("Missing arguments x, y, facing direction")]
    MissingArguments,
    #[error("Invalid position {x},{y}")]
    InvalidCoordinates { x: String, y: String },
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
