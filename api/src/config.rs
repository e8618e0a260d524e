use std::env;

#[derive(Clone)]
pub struct Config {
    /// Base URL of the Ethos network API
    pub ethos_api_url: String,
    /// Value sent as the X-Ethos-Client identification header
    pub ethos_client_header: String,
    /// Per-request timeout for upstream fetches, in seconds
    pub fetch_timeout_secs: u64,
    /// Port the HTTP server listens on
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            ethos_api_url: env::var("ETHOS_API_URL")
                .unwrap_or_else(|_| "https://api.ethos.network".to_string()),
            ethos_client_header: env::var("ETHOS_CLIENT_HEADER")
                .unwrap_or_else(|_| "RadarAPI/0.1".to_string()),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        }
    }
}
