use crate::gh_binary::GhError;

// -------------------------------------------------------------------------------------------------
// Error
// -------------------------------------------------------------------------------------------------
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error running gh: {0}")]
    Gh(#[from] GhError),

    #[error("expected {what} to be a JSON {expected}")]
    UnexpectedResponse {
        what: &'static str,
        expected: &'static str,
    },

    #[error("identity has no `login` field")]
    MissingLogin,

    #[error("repository record {index} is malformed: {source}")]
    MalformedRepository {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}
