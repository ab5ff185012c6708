use std::{env, time::Duration};

// Runtime constants for the dashboard client.

pub fn backend_url() -> String {
    env::var("BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:8001".to_string())
}

pub fn auth_provider_url() -> String {
    env::var("AUTH_PROVIDER_URL").unwrap_or_else(|_| "https://auth.emergentagent.com/".to_string())
}

pub fn request_timeout() -> Duration {
    let millis = env::var("REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(10_000);
    Duration::from_millis(millis)
}
