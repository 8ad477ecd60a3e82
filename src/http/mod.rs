//! HTTP client wrapper for the admin backend.
//!
//! Every backend response is wrapped in a `{code, data, msg}` envelope. This
//! module owns the one place that envelope is interpreted:
//!
//! - **Success** (`code == 0`): the `data` field is returned to the caller.
//!   If the response carries an `x-renewed-token` header, the stored access
//!   token is rotated first.
//! - **Token invalid** (`code == 401`): the stored token is cleared, the
//!   registered session-expired hook fires, and the call fails with
//!   [`Error::SessionExpired`].
//! - **Any other code**: the call fails with [`Error::Api`] carrying the
//!   envelope's `code` and `msg`.
//!
//! Binary downloads bypass envelope unwrapping entirely (see
//! [`Client::get_bytes`]). There are no retries — every failure is terminal
//! for that call.

use std::collections::HashMap;
use std::io::Read;
use std::sync::RwLock;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;

// ---------------------------------------------------------------------------
// Result codes
// ---------------------------------------------------------------------------

/// Distinguished envelope status codes returned by the backend.
pub mod code {
    /// Operation succeeded; `data` holds the payload.
    pub const SUCCESS: i64 = 0;
    /// Generic application error; `msg` holds the reason.
    pub const ERROR: i64 = 500;
    /// Access token is invalid or expired; triggers forced logout.
    pub const ACCESS_TOKEN_INVALID: i64 = 401;
}

/// Response header carrying a rotated access token.
const RENEWED_TOKEN_HEADER: &str = "x-renewed-token";

// ---------------------------------------------------------------------------
// Envelope and errors
// ---------------------------------------------------------------------------

/// The `{code, data, msg}` wrapper every backend response body follows.
///
/// `data` is absent (or `null`) for mutation endpoints, so it is always an
/// `Option` here; unit-returning calls simply ignore it.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    // No serde(default) here: it would put a `T: Default` bound on the
    // derived impl, and a missing field already deserializes to `None`.
    pub data: Option<T>,
    #[serde(default)]
    pub msg: String,
}

/// Errors surfaced by [`Client`] calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network-level failure (DNS, connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx HTTP status with no parseable envelope in the body.
    #[error("HTTP error {status}")]
    Http { status: u16 },

    /// The envelope carried a non-success code.
    #[error("{msg} (code {code})")]
    Api { code: i64, msg: String },

    /// The envelope carried the token-invalid code; the session has been
    /// torn down and the caller must log in again.
    #[error("session expired: {msg}")]
    SessionExpired { msg: String },

    /// The response body could not be read or decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] std::io::Error),

    /// Request parameters could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The envelope reported success but carried no `data` payload.
    #[error("response envelope carried no data")]
    MissingData,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    fn from_ureq(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => Error::Http { status },
            ureq::Error::Transport(t) => Error::Transport(t.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Hook invoked when a response carries the token-invalid code.
type SessionExpiredHook = Box<dyn Fn() + Send + Sync>;

/// Whether a request carries the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// Attach `Authorization: Bearer <token>` when a token is stored.
    Bearer,
    /// Never attach a token (login, captcha).
    None,
}

/// Synchronous client for the admin backend.
///
/// Holds the base URL, a client-wide timeout, and the process-wide token
/// store. The token store and the session-expired hook are the only shared
/// mutable state, guarded by `RwLock`.
pub struct Client {
    base_url: String,
    timeout: Duration,
    token: RwLock<Option<String>>,
    on_session_expired: RwLock<Option<SessionExpiredHook>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Build a client from the resolved config.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
            token: RwLock::new(None),
            on_session_expired: RwLock::new(None),
        }
    }

    /// Base URL with the trailing slash stripped, for display.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- token store --------------------------------------------------------

    /// Store the access token attached to subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    /// The currently stored access token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    /// Drop the stored access token.
    pub fn clear_token(&self) {
        *self.token.write().unwrap() = None;
    }

    /// Register a hook fired when a response carries the token-invalid code.
    ///
    /// The hook runs after the token store has been cleared and before the
    /// failing call returns. It fires at most once per failing call.
    pub fn on_session_expired(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_session_expired.write().unwrap() = Some(Box::new(hook));
    }

    // -- typed request helpers ----------------------------------------------

    /// `GET` a payload-bearing endpoint.
    pub fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&impl Serialize>,
    ) -> Result<T> {
        self.call("GET", path, query, None::<&()>, Auth::Bearer)?
            .ok_or(Error::MissingData)
    }

    /// `GET` without attaching the bearer token.
    pub fn get_public<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call("GET", path, None::<&()>, None::<&()>, Auth::None)?
            .ok_or(Error::MissingData)
    }

    /// `POST` a body and return the payload.
    pub fn post<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        self.call("POST", path, None::<&()>, Some(body), Auth::Bearer)?
            .ok_or(Error::MissingData)
    }

    /// `POST` without attaching the bearer token (login).
    pub fn post_public<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        self.call("POST", path, None::<&()>, Some(body), Auth::None)?
            .ok_or(Error::MissingData)
    }

    /// `POST` a body, ignoring any payload in the envelope.
    pub fn post_unit(&self, path: &str, body: &impl Serialize) -> Result<()> {
        self.call::<serde_json::Value, _, _>("POST", path, None::<&()>, Some(body), Auth::Bearer)?;
        Ok(())
    }

    /// `PUT` a body, ignoring any payload in the envelope.
    pub fn put_unit(&self, path: &str, body: &impl Serialize) -> Result<()> {
        self.call::<serde_json::Value, _, _>("PUT", path, None::<&()>, Some(body), Auth::Bearer)?;
        Ok(())
    }

    /// Body-less `PATCH`, ignoring any payload in the envelope.
    pub fn patch_unit(&self, path: &str) -> Result<()> {
        self.call::<serde_json::Value, (), ()>("PATCH", path, None, None, Auth::Bearer)?;
        Ok(())
    }

    /// Body-less `DELETE`, ignoring any payload in the envelope.
    pub fn delete_unit(&self, path: &str) -> Result<()> {
        self.call::<serde_json::Value, (), ()>("DELETE", path, None, None, Auth::Bearer)?;
        Ok(())
    }

    /// Fetch a binary response (file download, export).
    ///
    /// Bypasses envelope unwrapping entirely: the raw body bytes are returned
    /// as-is. The bearer token is still attached, and a non-2xx status is
    /// still inspected for the token-invalid envelope.
    pub fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let request = self.prepare("GET", path, Auth::Bearer);
        let response = request.call().map_err(|e| self.inspect_failure(e))?;
        let mut buf = Vec::new();
        response.into_reader().read_to_end(&mut buf)?;
        Ok(buf)
    }

    // -- core ---------------------------------------------------------------

    /// Build, send, and unwrap one request.
    ///
    /// Returns the envelope's `data` field on success. `Ok(None)` means the
    /// backend reported success with a null/absent payload.
    fn call<T, Q, B>(
        &self,
        method: &str,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        Q: Serialize,
        B: Serialize,
    {
        let mut request = self.prepare(method, path, auth);
        if let Some(params) = query {
            for (key, value) in query_pairs(params)? {
                request = request.query(&key, &value);
            }
        }

        let result = match body {
            Some(b) => request.send_json(serde_json::to_value(b)?),
            None => request.call(),
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => return Err(self.inspect_failure(err)),
        };

        let renewed = response.header(RENEWED_TOKEN_HEADER).map(str::to_string);
        let envelope: Envelope<T> = response.into_json()?;
        match envelope.code {
            code::SUCCESS => {
                if let Some(token) = renewed {
                    self.set_token(token);
                }
                Ok(envelope.data)
            }
            code::ACCESS_TOKEN_INVALID => Err(self.expire_session(envelope.msg)),
            other => Err(Error::Api {
                code: other,
                msg: envelope.msg,
            }),
        }
    }

    /// Build a request with URL, timeout, and (optionally) the bearer token.
    fn prepare(&self, method: &str, path: &str, auth: Auth) -> ureq::Request {
        let url = format!("{}{}", self.base_url, path);
        let mut request = ureq::request(method, &url).timeout(self.timeout);
        if auth == Auth::Bearer
            && let Some(token) = self.token()
        {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        request
    }

    /// Map a failed send to an error, checking non-2xx bodies for the
    /// token-invalid envelope.
    fn inspect_failure(&self, err: ureq::Error) -> Error {
        if let ureq::Error::Status(status, response) = err {
            match response.into_json::<Envelope<serde_json::Value>>() {
                Ok(envelope) if envelope.code == code::ACCESS_TOKEN_INVALID => {
                    self.expire_session(envelope.msg)
                }
                Ok(envelope) => Error::Api {
                    code: envelope.code,
                    msg: envelope.msg,
                },
                Err(_) => Error::Http { status },
            }
        } else {
            Error::from_ureq(err)
        }
    }

    /// Tear down the session: clear the token, fire the hook once, and build
    /// the error the failing call returns.
    fn expire_session(&self, msg: String) -> Error {
        self.clear_token();
        if let Some(hook) = self.on_session_expired.read().unwrap().as_ref() {
            hook();
        }
        Error::SessionExpired { msg }
    }
}

// ---------------------------------------------------------------------------
// Query-string serialization
// ---------------------------------------------------------------------------

/// Flatten any `Serialize` value into query key/value pairs.
///
/// `null` fields are skipped, arrays repeat the key once per element, and
/// scalars are rendered in their canonical string form. Nested objects are
/// rejected — backend query params are always flat.
fn query_pairs<Q: Serialize>(params: &Q) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(params)?;
    let map: HashMap<String, serde_json::Value> = match value {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        serde_json::Value::Null => return Ok(Vec::new()),
        other => {
            return Err(Error::Encode(serde::ser::Error::custom(format!(
                "query params must be an object, got {other}"
            ))));
        }
    };

    let mut pairs = Vec::new();
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    for key in keys {
        match &map[key] {
            serde_json::Value::Null => {}
            serde_json::Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar_to_string(item)?));
                }
            }
            scalar => pairs.push((key.clone(), scalar_to_string(scalar)?)),
        }
    }
    Ok(pairs)
}

fn scalar_to_string(value: &serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::Encode(serde::ser::Error::custom(format!(
            "unsupported query param value: {other}"
        )))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct SampleQuery {
        page_num: u32,
        page_size: u32,
        name: Option<String>,
        ids: Vec<u64>,
    }

    #[test]
    fn query_pairs_flattens_scalars_and_arrays() {
        let query = SampleQuery {
            page_num: 1,
            page_size: 20,
            name: Some("redis".to_string()),
            ids: vec![3, 5],
        };
        let pairs = query_pairs(&query).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("ids".to_string(), "3".to_string()),
                ("ids".to_string(), "5".to_string()),
                ("name".to_string(), "redis".to_string()),
                ("pageNum".to_string(), "1".to_string()),
                ("pageSize".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn query_pairs_skips_null_fields() {
        let query = SampleQuery {
            page_num: 1,
            page_size: 10,
            name: None,
            ids: vec![],
        };
        let pairs = query_pairs(&query).unwrap();
        assert!(pairs.iter().all(|(k, _)| k != "name" && k != "ids"));
    }

    #[test]
    fn query_pairs_rejects_non_object() {
        assert!(query_pairs(&"bare string").is_err());
    }

    #[test]
    fn client_strips_trailing_slash() {
        let config = ClientConfig {
            base_url: "http://localhost:8080/".to_string(),
            timeout_ms: 1000,
        };
        let client = Client::new(&config);
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn token_store_round_trip() {
        let client = Client::new(&ClientConfig::default());
        assert_eq!(client.token(), None);
        client.set_token("abc");
        assert_eq!(client.token(), Some("abc".to_string()));
        client.clear_token();
        assert_eq!(client.token(), None);
    }

    #[test]
    fn envelope_tolerates_missing_data_and_msg() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"code": 0}"#).unwrap();
        assert_eq!(envelope.code, code::SUCCESS);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.msg, "");
    }

    // Payload types are plain Deserialize structs; the envelope must not
    // demand anything more of them (notably not `Default`).
    #[derive(Debug, Deserialize)]
    struct BarePayload {
        id: u64,
    }

    #[test]
    fn envelope_works_for_payloads_without_default() {
        let envelope: Envelope<BarePayload> =
            serde_json::from_str(r#"{"code": 0, "data": {"id": 7}, "msg": "ok"}"#).unwrap();
        assert_eq!(envelope.data.unwrap().id, 7);

        let envelope: Envelope<BarePayload> =
            serde_json::from_str(r#"{"code": 0, "data": null, "msg": "ok"}"#).unwrap();
        assert!(envelope.data.is_none());

        let envelope: Envelope<BarePayload> = serde_json::from_str(r#"{"code": 0}"#).unwrap();
        assert!(envelope.data.is_none());
    }
}
