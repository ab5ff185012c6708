use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

use crate::interface_adapters::protocol::ErrorResponse;

// The clients defined here are for reqwest clients to communicate with the dashboard backend.
// One client serves both the session calls and the page data calls so they
// share a cookie store, the way a browser shares its credential store.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    pub api_base: String,
}

#[derive(Debug)]
pub enum BackendError {
    Transport(reqwest::Error),
    Upstream {
        status: StatusCode,
        message: Option<String>,
    },
    Decode(reqwest::Error),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(err) => write!(f, "backend transport error: {err}"),
            BackendError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "backend upstream error {status}: {message}")
                } else {
                    write!(f, "backend upstream error {status}")
                }
            }
            BackendError::Decode(err) => write!(f, "backend response decode error: {err}"),
        }
    }
}

impl std::error::Error for BackendError {}

impl BackendClient {
    pub fn new(backend_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        let backend_url = backend_url.into();
        Ok(Self {
            http,
            api_base: format!("{}/api", backend_url.trim_end_matches('/')),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    pub(crate) async fn get_json<T>(&self, path: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let res = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(BackendError::Transport)?;
        read_json(res).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(BackendError::Transport)?;
        read_json(res).await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self
            .http
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(BackendError::Transport)?;
        read_json(res).await
    }

    // For calls whose success body carries nothing we use.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), BackendError> {
        let res = self
            .http
            .post(self.url(path))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(BackendError::Transport)?;
        let status = res.status();
        if !status.is_success() {
            return Err(upstream_error(status, res).await);
        }
        Ok(())
    }
}

async fn read_json<T>(res: Response) -> Result<T, BackendError>
where
    T: DeserializeOwned,
{
    let status = res.status();

    // Keep upstream status/message so callers can tell 401 apart from the rest.
    if !status.is_success() {
        return Err(upstream_error(status, res).await);
    }

    res.json::<T>().await.map_err(BackendError::Decode)
}

async fn upstream_error(status: StatusCode, res: Response) -> BackendError {
    let message = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .map(|payload| payload.detail);
    BackendError::Upstream { status, message }
}
