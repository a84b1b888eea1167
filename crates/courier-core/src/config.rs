#[derive(Clone, Debug)]
pub struct CoreConfig {
    pub storage_path: String,
    pub namespace: String,
    /// Background conversation re-sync interval; 0 disables the poller.
    pub polling_interval_ms: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_path: ".courier".to_string(),
            namespace: "session".to_string(),
            polling_interval_ms: 0,
        }
    }
}
