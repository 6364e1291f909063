use std::net::SocketAddr;

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
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_token_hash_salt: String,
    pub cron_secret: Option<String>,
    pub genai_base_url: String,
    pub genai_api_key: String,
    pub genai_text_model: String,
    pub genai_image_model: String,
    pub genai_request_timeout_secs: u64,
    pub storage_base_url: String,
    pub storage_bucket: String,
    pub storage_service_key: String,
    pub author_name: String,
    pub author_role: String,
    pub schedule_tick_cron: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("api_token_hash_salt", &"[redacted]")
            .field(
                "cron_secret",
                &self.cron_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("genai_base_url", &self.genai_base_url)
            .field("genai_api_key", &"[redacted]")
            .field("genai_text_model", &self.genai_text_model)
            .field("genai_image_model", &self.genai_image_model)
            .field(
                "genai_request_timeout_secs",
                &self.genai_request_timeout_secs,
            )
            .field("storage_base_url", &self.storage_base_url)
            .field("storage_bucket", &self.storage_bucket)
            .field("storage_service_key", &"[redacted]")
            .field("author_name", &self.author_name)
            .field("author_role", &self.author_role)
            .field("schedule_tick_cron", &self.schedule_tick_cron)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
