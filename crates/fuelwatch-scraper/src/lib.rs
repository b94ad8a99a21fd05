pub mod aggregate;
pub mod aliases;
pub mod client;
pub(crate) mod coerce;
pub mod error;
pub mod normalize;

pub use aggregate::{fetch_all, AggregateResult, SourceOutcome};
pub use aliases::{aliases_for, AliasTable, STANDARD_ALIASES};
pub use client::RetailerClient;
pub use error::{FetchError, FetchFailure, RecordRejection};
pub use normalize::{
    normalize_feed, normalize_feed_with, normalize_payload, normalize_station, NormalizedFeed,
};
