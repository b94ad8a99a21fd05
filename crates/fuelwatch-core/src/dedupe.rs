//! Identity-based deduplication of canonical stations.

use std::collections::BTreeMap;

use crate::station::CanonicalStation;

/// Collapse `stations` to one record per `site_id`.
///
/// When two records share a `site_id` the one appearing later in the input
/// wins. The returned map iterates in `site_id` order.
#[must_use]
pub fn dedupe_stations<I>(stations: I) -> BTreeMap<String, CanonicalStation>
where
    I: IntoIterator<Item = CanonicalStation>,
{
    let mut unique = BTreeMap::new();
    for station in stations {
        unique.insert(station.site_id.clone(), station);
    }
    unique
}
