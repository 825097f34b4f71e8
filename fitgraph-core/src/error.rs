use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or aggregating run results.
///
/// Every variant is fatal: a single bad file or generation aborts the whole
/// load, and no partial results are returned.
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a JSON array of bot records: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("generation {generation} contains no bot records")]
    EmptyGeneration { generation: usize },
    #[error("cannot derive a generation number from {}", .path.display())]
    Unnumbered { path: PathBuf },
    #[error(
        "generation {generation} appears twice ({} and {})",
        .first.display(),
        .second.display()
    )]
    DuplicateGeneration {
        generation: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error(
        "{} sorts before {} but has a higher generation number; zero-pad the names or use numeric ordering",
        .earlier.display(),
        .later.display()
    )]
    Misordered { earlier: PathBuf, later: PathBuf },
}

impl ResultsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let io = ResultsError::io(
            "runs/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        );
        assert!(io.to_string().contains("runs/missing"));

        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let parse = ResultsError::parse("runs/gen_003.json", source);
        assert!(parse.to_string().contains("gen_003.json"));

        let empty = ResultsError::EmptyGeneration { generation: 4 };
        assert_eq!(empty.to_string(), "generation 4 contains no bot records");
    }
}
