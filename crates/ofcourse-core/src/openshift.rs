//! OpenShift (v2 broker REST API) client.
//!
//! Every call is a single attempt with a timeout. Failures come back as a
//! categorised [`RemoteError`]; deciding which failures are recoverable is
//! the deployment workflow's job, not this module's.

use crate::vcs::{VersionControl, DEPLOY_BRANCH};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://openshift.redhat.com/broker/rest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// RemoteError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("credentials rejected by the platform")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("platform returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    /// Connection failures and timeouts.
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("push failed: {0}")]
    Push(String),
}

impl RemoteError {
    fn transport(e: reqwest::Error) -> Self {
        RemoteError::Transport(e.to_string())
    }

    fn from_status(code: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(body)
            .ok()
            .and_then(|env| env.messages.into_iter().find_map(|m| m.text))
            .unwrap_or_else(|| body.trim().to_string());
        match code {
            401 | 403 => RemoteError::Unauthorized,
            404 => RemoteError::NotFound(message),
            _ => RemoteError::Status { code, message },
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Authorization {
    token: String,
}

#[derive(Debug, Deserialize)]
struct Domain {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Application {
    name: String,
    #[serde(default)]
    domain_id: String,
    #[serde(default)]
    app_url: String,
    #[serde(default)]
    git_url: String,
}

#[derive(Debug, Serialize)]
struct NewApplication<'a> {
    name: &'a str,
    cartridge: &'a str,
}

// ---------------------------------------------------------------------------
// AppHandle
// ---------------------------------------------------------------------------

/// An application as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppHandle {
    pub name: String,
    pub domain: String,
    /// Public URL of the running site.
    pub url: String,
    /// Git remote the site is deployed from.
    pub git_url: String,
}

impl From<Application> for AppHandle {
    fn from(app: Application) -> Self {
        Self {
            name: app.name,
            domain: app.domain_id,
            url: app.app_url,
            git_url: app.git_url,
        }
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

pub trait Platform {
    /// Exchange a username and password for a session token.
    fn authenticate(&self, user: &str, password: &str) -> Result<String, RemoteError>;

    /// Apps in `domain`, or across every domain of the account when `None`.
    fn list_apps(&self, token: &str, domain: Option<&str>) -> Result<Vec<AppHandle>, RemoteError>;

    fn default_domain(&self, token: &str) -> Result<String, RemoteError>;

    fn get_app(&self, token: &str, name: &str, domain: &str) -> Result<AppHandle, RemoteError>;

    fn create_app(
        &self,
        token: &str,
        name: &str,
        domain: &str,
        cartridge: &str,
    ) -> Result<AppHandle, RemoteError>;

    /// Publish the local repository to `app` and return its public URL.
    fn push(&self, app: &AppHandle) -> Result<String, RemoteError>;
}

// ---------------------------------------------------------------------------
// OpenShiftClient
// ---------------------------------------------------------------------------

pub struct OpenShiftClient<V> {
    http: Client,
    base_url: Url,
    vcs: V,
}

impl<V: VersionControl> OpenShiftClient<V> {
    pub fn new(base_url: impl Into<String>, vcs: V) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, vcs, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        vcs: V,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ofcourse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RemoteError::transport)?;
        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| RemoteError::Transport(format!("invalid API URL '{base_url}'")))?;
        Ok(Self {
            http,
            base_url,
            vcs,
        })
    }

    /// Endpoint URL under the API root. Each segment is percent-encoded, so
    /// names carrying `/`, `?` or `#` stay inside their own path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, RemoteError> {
        let resp = req
            .header(ACCEPT, "application/json")
            .send()
            .map_err(RemoteError::transport)?;
        let status = resp.status();
        let body = resp.text().map_err(RemoteError::transport)?;
        debug!(status = status.as_u16(), "platform response");
        if !status.is_success() {
            return Err(RemoteError::from_status(status.as_u16(), &body));
        }
        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;
        envelope
            .data
            .ok_or_else(|| RemoteError::Decode("response carries no data".to_string()))
    }
}

impl<V: VersionControl> Platform for OpenShiftClient<V> {
    fn authenticate(&self, user: &str, password: &str) -> Result<String, RemoteError> {
        debug!(user, "requesting session authorization");
        let req = self
            .http
            .post(self.url(&["user", "authorizations"]))
            .basic_auth(user, Some(password))
            .form(&[("scope", "session"), ("note", "ofcourse")]);
        let auth: Authorization = self.send(req)?;
        Ok(auth.token)
    }

    fn list_apps(&self, token: &str, domain: Option<&str>) -> Result<Vec<AppHandle>, RemoteError> {
        let url = match domain {
            Some(d) => self.url(&["domain", d, "applications"]),
            None => self.url(&["applications"]),
        };
        debug!(%url, "listing applications");
        let apps: Vec<Application> = self.send(self.http.get(url).bearer_auth(token))?;
        Ok(apps.into_iter().map(AppHandle::from).collect())
    }

    fn default_domain(&self, token: &str) -> Result<String, RemoteError> {
        let domains: Vec<Domain> =
            self.send(self.http.get(self.url(&["domains"])).bearer_auth(token))?;
        domains
            .into_iter()
            .next()
            .map(|d| d.name)
            .ok_or_else(|| RemoteError::NotFound("account has no domains".to_string()))
    }

    fn get_app(&self, token: &str, name: &str, domain: &str) -> Result<AppHandle, RemoteError> {
        let url = self.url(&["domain", domain, "application", name]);
        debug!(%url, "fetching application");
        let app: Application = self.send(self.http.get(url).bearer_auth(token))?;
        Ok(app.into())
    }

    fn create_app(
        &self,
        token: &str,
        name: &str,
        domain: &str,
        cartridge: &str,
    ) -> Result<AppHandle, RemoteError> {
        let url = self.url(&["domain", domain, "applications"]);
        debug!(%url, name, cartridge, "creating application");
        let req = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&NewApplication { name, cartridge });
        let app: Application = self.send(req)?;
        Ok(app.into())
    }

    fn push(&self, app: &AppHandle) -> Result<String, RemoteError> {
        if app.git_url.is_empty() {
            return Err(RemoteError::Push(format!(
                "app '{}' has no git remote",
                app.name
            )));
        }
        debug!(git_url = %app.git_url, "pushing repository");
        self.vcs
            .push(&app.git_url, DEPLOY_BRANCH)
            .map_err(|e| RemoteError::Push(e.to_string()))?;
        Ok(app.url.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
