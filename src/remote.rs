use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::BackendConfig;

/// Remote file store shared by all syncing machines.
///
/// The sync engine needs exactly these calls; [`FilebrowserClient`] is the
/// production implementation and tests substitute an in-memory store.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Performs the startup authentication handshake. Called once before
    /// the first sync pass; failure means no pass ever runs.
    async fn authenticate(&mut self) -> Result<()>;

    /// Fetches the remote copy at `remote_path`. `Ok(None)` means the file
    /// does not exist on the backend, which is normal before the first
    /// successful upload.
    async fn download(&self, remote_path: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces the remote copy at `remote_path` with the local file's
    /// content.
    async fn upload(&self, remote_path: &str, local_path: &Path) -> Result<()>;
}

/// HTTP client for the Filebrowser API.
///
/// Authentication yields a JWT that is sent as a bearer token on every
/// subsequent call. The token is obtained once at startup and held for the
/// process lifetime.
pub struct FilebrowserClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct ResourceListing {
    #[serde(default)]
    items: Vec<ResourceItem>,
}

#[derive(Deserialize)]
struct ResourceItem {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

impl FilebrowserClient {
    /// Builds a client for `backend`. `timeout` bounds both connection
    /// establishment and each whole request, so a hung backend cannot stall
    /// the sync loop indefinitely.
    pub fn new(backend: &BackendConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(FilebrowserClient {
            http,
            base_url: backend.url.trim_end_matches('/').to_string(),
            username: backend.username.clone(),
            password: backend.password.clone(),
            token: None,
        })
    }

    fn login_url(&self) -> String {
        format!("{}/api/login", self.base_url)
    }

    fn raw_url(&self, remote_path: &str) -> String {
        format!(
            "{}/api/raw/{}",
            self.base_url,
            remote_path.trim_start_matches('/')
        )
    }

    fn resources_url(&self, remote_path: &str) -> String {
        format!(
            "{}/api/resources/{}",
            self.base_url,
            remote_path.trim_start_matches('/')
        )
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Lists the files directly under `remote_dir`.
    ///
    /// Not called by the sync cycle; exposed for tooling that inspects the
    /// backend.
    pub async fn list_files(&self, remote_dir: &str) -> Result<Vec<String>> {
        let response = self
            .with_auth(self.http.get(self.resources_url(remote_dir)))
            .send()
            .await
            .with_context(|| format!("listing {remote_dir} failed"))?;

        if !response.status().is_success() {
            return Err(anyhow!("listing {remote_dir} failed: {}", response.status()));
        }

        let listing: ResourceListing = response
            .json()
            .await
            .with_context(|| format!("listing {remote_dir} returned malformed JSON"))?;

        Ok(listing
            .items
            .into_iter()
            .filter(|item| item.kind == "file")
            .map(|item| item.name)
            .collect())
    }
}

impl RemoteStore for FilebrowserClient {
    async fn authenticate(&mut self) -> Result<()> {
        let payload = serde_json::json!({
            "username": self.username,
            "password": self.password,
        });

        let response = self
            .http
            .post(self.login_url())
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("login request to {} failed", self.base_url))?;

        if !response.status().is_success() {
            return Err(anyhow!("login failed: {}", response.status()));
        }

        let login: LoginResponse = response
            .json()
            .await
            .context("login response was malformed")?;
        self.token = Some(login.token);

        Ok(())
    }

    async fn download(&self, remote_path: &str) -> Result<Option<Vec<u8>>> {
        let response = self
            .with_auth(self.http.get(self.raw_url(remote_path)))
            .send()
            .await
            .with_context(|| format!("downloading {remote_path} failed"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(anyhow!(
                "downloading {remote_path} failed: {}",
                response.status()
            ));
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("reading download body for {remote_path} failed"))?;

        Ok(Some(bytes.to_vec()))
    }

    async fn upload(&self, remote_path: &str, local_path: &Path) -> Result<()> {
        let bytes = tokio::fs::read(local_path)
            .await
            .with_context(|| format!("failed to read {} for upload", local_path.display()))?;

        let file_name = local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "history".to_string());
        let form = Form::new().part("files", Part::bytes(bytes).file_name(file_name));

        let response = self
            .with_auth(self.http.post(self.resources_url(remote_path)))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("uploading {remote_path} failed"))?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(()),
            status => Err(anyhow!("uploading {remote_path} failed: {status}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> FilebrowserClient {
        let backend = BackendConfig {
            url: url.to_string(),
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        FilebrowserClient::new(&backend, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client("https://files.example.com");

        assert_eq!(client.login_url(), "https://files.example.com/api/login");
        assert_eq!(
            client.raw_url("home/alice/.bash_history"),
            "https://files.example.com/api/raw/home/alice/.bash_history"
        );
        assert_eq!(
            client.resources_url("home/alice/.bash_history"),
            "https://files.example.com/api/resources/home/alice/.bash_history"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = client("https://files.example.com/");
        assert_eq!(client.login_url(), "https://files.example.com/api/login");
    }

    #[test]
    fn test_absolute_remote_paths_do_not_double_slash() {
        let client = client("https://files.example.com");
        assert_eq!(
            client.raw_url("/home/alice/.bash_history"),
            "https://files.example.com/api/raw/home/alice/.bash_history"
        );
    }
}
