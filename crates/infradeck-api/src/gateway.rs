// Fetch gateway: the single place HTTP calls are issued and responses
// normalized.
//
// Every backend client wraps a `Gateway`. It never retries and never caches;
// a failed call surfaces immediately as an `Error`.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// The backend services a console talks to. Each has its own base URL.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    Proxmox,
    Docker,
    Kubernetes,
    Vyos,
    Cloud,
}

/// Error body shape shared by the backends: `{"error": "..."}`.
/// Some frameworks answer `{"detail": "..."}` instead.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Thin async HTTP wrapper bound to one backend's base URL.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: Url,
}

impl Gateway {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a gateway from a base URL and shared transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers/TLS).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and force a trailing slash so relative paths
    /// land below it instead of replacing its last segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL. Segments are percent-encoded,
    /// so user-supplied names (policy names, pod names) cannot escape
    /// their position in the path.
    pub fn url(&self, path: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, Error> {
        self.get_with_params(path, &[]).await
    }

    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    /// Text variant used for log endpoints: the body is returned verbatim.
    pub async fn get_text(&self, path: &[&str], params: &[(&str, String)]) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {url} (text) params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Issue a mutating call whose response body is irrelevant.
    ///
    /// Only the status is checked; backends answer these with anything from
    /// `204 No Content` to `{"success": true}` to a plain-text "OK".
    pub async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &[&str],
        body: Option<&B>,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        Self::handle_empty(resp).await
    }

    /// `send` without a request body.
    pub async fn send_empty(&self, method: Method, path: &[&str]) -> Result<(), Error> {
        self.send::<()>(method, path, None).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        let raw = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(raw).map_err(|e| {
            let preview = body
                .char_indices()
                .nth(200)
                .map_or(body.as_str(), |(end, _)| &body[..end]);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Normalize a non-success response into `Error::Backend`.
    ///
    /// Prefers the structured `error` message; anything else (HTML error
    /// pages, empty bodies, JSON without the field) becomes `"HTTP <status>"`.
    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|body| body.error.or(body.detail))
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        debug!(status = status.as_u16(), %message, "backend rejected request");

        Error::Backend {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> Gateway {
        Gateway::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let gw = gateway("http://vyos.lab:8080/api");
        assert_eq!(gw.base_url().as_str(), "http://vyos.lab:8080/api/");
    }

    #[test]
    fn url_appends_segments_below_base() {
        let gw = gateway("http://vyos.lab:8080/api/");
        let url = gw.url(&["firewall", "policies", "WAN_IN", "enable"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://vyos.lab:8080/api/firewall/policies/WAN_IN/enable"
        );
    }

    #[test]
    fn url_escapes_user_supplied_segments() {
        let gw = gateway("http://vyos.lab");
        let url = gw.url(&["firewall", "policies", "a/b c"]).unwrap();
        assert_eq!(url.path(), "/firewall/policies/a%2Fb%20c");
    }

    #[test]
    fn non_base_urls_are_rejected() {
        assert!(Gateway::from_reqwest("mailto:ops@example.com", reqwest::Client::new()).is_err());
    }

    #[test]
    fn backend_names_round_trip_through_strum() {
        assert_eq!(Backend::Vyos.to_string(), "vyos");
        assert_eq!("kubernetes".parse::<Backend>().unwrap(), Backend::Kubernetes);
    }
}
