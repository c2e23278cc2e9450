use thiserror::Error;

/// Error for `cartesian_circle`
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("[Waypoints] Point count must be at least 1")]
    ZeroPoints,
    #[error("[Waypoints] Unknown plane {0:?}, expected one of \"xy\", \"yz\", \"xz\"")]
    UnknownPlane(String),
    #[error("[Params] Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("[Config] Cannot read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("[Config] Cannot parse settings file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("{}", error)]
    Other { error: String },
}

impl Error {
    /// True for errors caused by a bad argument rather than by the planner or the environment.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::ZeroPoints | Error::UnknownPlane(_) | Error::InvalidParameter { .. }
        )
    }
}
