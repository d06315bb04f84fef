// API client module: a small blocking HTTP client that publishes files
// to a GitHub-contents-style object store and hands back the public CDN
// URL. It is intentionally synchronous: one file per run, every call
// blocks until the remote store answers.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_API_BASE: &str = "https://api.github.com/repos/cdnup/cdn/contents";
const DEFAULT_PUBLIC_BASE: &str = "https://cdn.cdnup.dev";
const DEFAULT_BRANCH: &str = "main";

/// Client for the remote object store. Holds the reqwest blocking
/// client, the contents-API base URL, the public CDN base the final
/// URLs are built from, the target branch, and where to look for the
/// auth config.
pub struct CdnClient {
    client: Client,
    api_base: String,
    public_base: String,
    branch: String,
    config_path: Option<PathBuf>,
}

/// Shape of the config file. Only the token matters; anything else in
/// the JSON object is ignored.
#[derive(Deserialize, Debug)]
struct Config {
    github_token: Option<String>,
}

/// Write request body for the contents API. `sha` is only sent when
/// replacing an existing object (update-in-place).
#[derive(Serialize, Debug)]
struct UploadRequest {
    message: String,
    content: String,
    branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

/// The only field we need from an existence probe: the version token
/// the store expects back on an overwrite.
#[derive(Deserialize, Debug)]
struct RemoteObjectInfo {
    sha: String,
}

/// Derive the remote object key: the hash plus the path's extension,
/// where the extension is everything after the final '.'. A path with
/// no '.' keeps its literal tail (legacy behavior, preserved).
pub fn object_key(file_path: &str, hash_value: &str) -> String {
    let ext = file_path.rsplit('.').next().unwrap_or(file_path);
    format!("{}.{}", hash_value, ext)
}

impl CdnClient {
    /// Create a client configured from `CDN_API_URL`, `CDN_PUBLIC_URL`
    /// and `CDN_BRANCH`, falling back to the built-in defaults. The
    /// auth config location can be overridden with `CDNUP_CONFIG`.
    pub fn from_env() -> Result<Self> {
        let api_base = std::env::var("CDN_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE.into());
        let public_base =
            std::env::var("CDN_PUBLIC_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_BASE.into());
        let branch = std::env::var("CDN_BRANCH").unwrap_or_else(|_| DEFAULT_BRANCH.into());
        let config_path = std::env::var_os("CDNUP_CONFIG").map(PathBuf::from);
        CdnClient::new(api_base, public_base, branch, config_path)
    }

    pub fn new(
        api_base: String,
        public_base: String,
        branch: String,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent("cdnup-cli")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(CdnClient {
            client,
            api_base,
            public_base,
            branch,
            config_path,
        })
    }

    /// Resolve the config file: explicit override first, then a
    /// `config.json` next to the executable, then a dotfile in the
    /// user's home directory.
    fn config_file(&self) -> PathBuf {
        if let Some(path) = &self.config_path {
            return path.clone();
        }
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let beside_exe = dir.join("config.json");
                if beside_exe.exists() {
                    return beside_exe;
                }
            }
        }
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".cdnup-config.json")
    }

    /// Load the GitHub token. A missing or empty token is fatal before
    /// any network traffic happens.
    fn load_token(&self) -> Result<String> {
        let path = self.config_file();
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&data)
            .with_context(|| format!("Malformed config {}", path.display()))?;
        match config.github_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => anyhow::bail!("github_token not found in {}", path.display()),
        }
    }

    fn auth_headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("token {}", token))
            .context("github_token contains invalid header characters")?;
        headers.insert(AUTHORIZATION, value);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        Ok(headers)
    }

    /// Upload `file_path` under the key derived from `hash_value`,
    /// returning the public URL. Probes the store first so an existing
    /// object is replaced in place rather than rejected. If
    /// `delete_local` is set, the local file is removed only after the
    /// remote write has been acknowledged.
    pub fn upload(&self, file_path: &str, hash_value: &str, delete_local: bool) -> Result<String> {
        let key = object_key(file_path, hash_value);
        let token = self.load_token()?;
        let headers = self.auth_headers(&token)?;

        let content =
            fs::read(file_path).with_context(|| format!("Failed to read file {}", file_path))?;

        let url = format!("{}/{}", self.api_base, key);

        // Probe for an existing object so we can pass its version token
        // back on the write. A non-success status just means "create".
        let probe = self
            .client
            .get(&url)
            .headers(headers.clone())
            .send()
            .context("Failed to query remote store")?;
        let sha = if probe.status().is_success() {
            let info: RemoteObjectInfo = probe.json().context("Parsing remote object info")?;
            Some(info.sha)
        } else {
            None
        };

        let req = UploadRequest {
            message: format!("Add {} via cdnup", key),
            content: BASE64.encode(&content),
            branch: self.branch.clone(),
            sha,
        };
        let res = self
            .client
            .put(&url)
            .headers(headers)
            .json(&req)
            .send()
            .context("Failed to send upload request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Failed to upload {}: {} - {}", key, status, txt);
        }

        // Only a confirmed write may cost us the local copy.
        if delete_local {
            fs::remove_file(file_path)
                .with_context(|| format!("Failed to delete local file {}", file_path))?;
        }

        Ok(format!("{}/{}", self.public_base, key))
    }
}
