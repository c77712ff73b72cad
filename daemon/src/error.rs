use quorum_governance::{GovernanceError, RequestKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{kind} request needs `{field}`")]
    MissingField {
        kind: RequestKind,
        field: &'static str,
    },

    #[error("no request was created with ordinal {0}")]
    UnknownOrdinal(usize),

    #[error(transparent)]
    Governance(#[from] GovernanceError),
}
