use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.a1base.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_SECRET_HEADER: &str = "x-api-secret";

// Envelope key some endpoints wrap their payload in.
pub const ENVELOPE_KEY: &str = "data";

pub const ENV_API_KEY: &str = "A1BASE_API_KEY";
pub const ENV_API_SECRET: &str = "A1BASE_API_SECRET";
pub const ENV_BASE_URL: &str = "A1BASE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "A1BASE_TIMEOUT_SECS";

pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    ("content-type", "application/json"),
    ("accept", "application/json"),
];

pub fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}
