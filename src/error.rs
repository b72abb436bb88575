use crate::media::MediaKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has no row at all for this entry. Unlike a row with an
    /// empty target id, this cannot be recovered by the community tables.
    #[error("no row for mal id {external_id} in the local store")]
    MissingRow { external_id: i64 },
    #[error("no mal credentials in the local store")]
    MissingCredentials,
    #[error("stored mal token is not valid json: {0}")]
    Token(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fetching {url} returned {status}")]
    Status { url: String, status: u16 },
    #[error("failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("community {kind} mapping unavailable: {source}")]
    Fallback {
        kind: MediaKind,
        #[source]
        source: MappingError,
    },
}

#[derive(Debug, Error)]
pub enum ArrError {
    #[error("api key is not a valid header value")]
    InvalidApiKey,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A non-success response that is not a recognised rejection.
    #[error("{request} returned {status}:\n{body}")]
    Rejected {
        request: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response to {request}: {source}\n{body}")]
    Decode {
        request: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Api(#[from] ArrError),
    #[error("manager reported {target_id} as already added but returned no record for it")]
    Vanished { target_id: i64 },
    #[error("record for {target_id} has no id to update")]
    MissingId { target_id: i64 },
}

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("myanimelist returned {status}:\n{body}")]
    Status { status: u16, body: String },
}
