/// Backend used when `DATACHAT_API_URL` is not set at build time.
pub const DEFAULT_API_BASE_URL: &str = "https://rag-vercel.onrender.com";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 120_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    /// `None` leaves requests to the transport's own defaults.
    pub request_timeout_ms: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

impl Config {
    /// Reads the values baked in by the build environment.
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("DATACHAT_API_URL"),
            option_env!("DATACHAT_REQUEST_TIMEOUT_MS"),
        )
    }

    pub fn from_values(api_url: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let api_base_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let request_timeout_ms = match timeout_ms.map(|t| t.trim().parse::<u32>()) {
            Some(Ok(0)) => None,
            Some(Ok(ms)) => Some(ms),
            Some(Err(_)) | None => Some(DEFAULT_REQUEST_TIMEOUT_MS),
        };

        Config {
            api_base_url,
            request_timeout_ms,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
