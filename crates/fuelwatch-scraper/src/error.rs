use fuelwatch_core::RetailerSource;
use thiserror::Error;

/// Why a single retailer feed yielded no stations.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("unsupported response format ({content_type}); expected JSON")]
    UnsupportedFormat { content_type: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("payload has no station list (top-level {shape})")]
    StructuralAnomaly { shape: &'static str },
}

impl FetchError {
    /// Short, stable label used in structured log fields and run summaries.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint { .. } => "invalid_endpoint",
            Self::Transport(_) | Self::UnexpectedStatus { .. } => "transport",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Deserialize { .. } => "deserialize",
            Self::StructuralAnomaly { .. } => "structural_anomaly",
        }
    }
}

/// A [`FetchError`] attributed to the retailer whose feed produced it.
#[derive(Debug, Error)]
#[error("{retailer} ({endpoint}): {cause}")]
pub struct FetchFailure {
    pub retailer: String,
    pub endpoint: String,
    #[source]
    pub cause: FetchError,
}

impl FetchFailure {
    #[must_use]
    pub fn new(source: &RetailerSource, cause: FetchError) -> Self {
        Self {
            retailer: source.name.clone(),
            endpoint: source.endpoint.clone(),
            cause,
        }
    }
}

/// Why an individual entry inside an otherwise valid feed was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRejection {
    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("entry has no usable site_id")]
    MissingSiteId,

    #[error("entry has no postcode")]
    MissingPostcode,

    #[error("entry coordinates resolve to (0, 0)")]
    OriginCoordinates,
}
