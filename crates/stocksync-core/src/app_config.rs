use std::net::SocketAddr;

use chrono::FixedOffset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub database_url: String,
    pub erp_base_url: String,
    pub erp_com_code: String,
    pub erp_user_id: String,
    pub erp_api_cert_key: String,
    pub erp_lan_type: String,
    pub erp_zone: String,
    pub executor_id: String,
    pub executor_password: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub erp_request_timeout_secs: u64,
    pub erp_max_retries: u32,
    pub erp_retry_delay_ms: u64,
    pub erp_session_ttl_secs: u64,
    pub sync_inter_request_delay_ms: u64,
    /// Offset used for cron evaluation and for the ERP's base-date rollover.
    pub schedule_utc_offset: FixedOffset,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("erp_base_url", &self.erp_base_url)
            .field("erp_com_code", &self.erp_com_code)
            .field("erp_user_id", &self.erp_user_id)
            .field("erp_api_cert_key", &"[redacted]")
            .field("erp_lan_type", &self.erp_lan_type)
            .field("erp_zone", &self.erp_zone)
            .field("executor_id", &self.executor_id)
            .field("executor_password", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("erp_request_timeout_secs", &self.erp_request_timeout_secs)
            .field("erp_max_retries", &self.erp_max_retries)
            .field("erp_retry_delay_ms", &self.erp_retry_delay_ms)
            .field("erp_session_ttl_secs", &self.erp_session_ttl_secs)
            .field(
                "sync_inter_request_delay_ms",
                &self.sync_inter_request_delay_ms,
            )
            .field("schedule_utc_offset", &self.schedule_utc_offset)
            .finish()
    }
}
