use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading land geometry or per-species datasets.
///
/// None of these are fatal to the view: callers log them and fall back to
/// an empty or built-in rendering.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("topology has no object named '{0}'")]
    MissingObject(String),

    #[error("topology references arc {index} but only {count} arcs exist")]
    BadArc { index: i64, count: usize },

    #[error("unknown species '{0}'")]
    UnknownSpecies(String),

    #[error("unknown page '{0}' (expected distribution, threats or trend)")]
    UnknownPage(String),
}

impl DataError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DataError::Io { path: path.into(), source }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        DataError::Csv { path: path.into(), source }
    }

    pub fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        DataError::Json { origin: origin.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_input() {
        let err = DataError::UnknownSpecies("Dodo".into());
        assert_eq!(err.to_string(), "unknown species 'Dodo'");

        let err = DataError::BadArc { index: -7, count: 3 };
        assert!(err.to_string().contains("arc -7"));
    }
}
