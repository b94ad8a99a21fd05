use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// `None` only matters for dry runs; a persisting run requires it.
    pub database_url: Option<String>,
    pub log_level: String,
    pub retailers_path: Option<PathBuf>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_retailers: usize,
    pub station_batch_size: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("retailers_path", &self.retailers_path)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_retailers", &self.max_concurrent_retailers)
            .field("station_batch_size", &self.station_batch_size)
            .finish()
    }
}
