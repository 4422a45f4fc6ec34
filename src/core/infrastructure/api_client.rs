//! Authenticated HTTP client for the `/api2/json` tree.

use crate::{
    auth::application::service::login_service::LoginService,
    core::domain::{
        config::ValidationConfig,
        error::{ProxmoxError, ProxmoxResult, ValidationError},
        model::{
            api_response::ApiResponse, proxmox_auth::ProxmoxAuth,
            proxmox_connection::ProxmoxConnection,
        },
        value_object::ProxmoxTicket,
    },
};
use governor::{DefaultDirectRateLimiter, Quota};
use hyper::ext::ReasonPhrase;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::num::NonZeroU32;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Sends requests to one Proxmox server on behalf of a logged-in user.
///
/// Every request carries the `PVEAuthCookie` cookie and, when known, the
/// `CSRFPreventionToken` header. A missing or expired ticket is renewed before
/// sending; a `401 Unauthorized` answer triggers one re-login and one retry.
/// Answers are unwrapped from their `{"data": ...}` envelope.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: ProxmoxConnection,
    auth: RwLock<Option<ProxmoxAuth>>,
    config: ValidationConfig,
    rate_limiter: Option<DefaultDirectRateLimiter>,
    login_service: LoginService,
}

impl ApiClient {
    /// Creates a new `ApiClient`. The client starts unauthenticated.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Connection` if the HTTP client cannot be built and
    /// `ProxmoxError::Validation` if the rate limit has a zero component.
    pub fn new(connection: ProxmoxConnection, config: ValidationConfig) -> ProxmoxResult<Self> {
        let http_client = Client::builder()
            .danger_accept_invalid_certs(connection.accept_invalid_certs())
            .build()
            .map_err(|e| ProxmoxError::Connection(e.to_string()))?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let per_second = non_zero("requests_per_second", rl.requests_per_second)?;
                let burst = non_zero("burst_size", rl.burst_size)?;
                Some(DefaultDirectRateLimiter::direct(
                    Quota::per_second(per_second).allow_burst(burst),
                ))
            }
            None => None,
        };

        Ok(Self {
            http_client,
            connection,
            auth: RwLock::new(None),
            config,
            rate_limiter,
            login_service: LoginService::new(),
        })
    }

    pub fn connection(&self) -> &ProxmoxConnection {
        &self.connection
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Replaces the authentication state.
    pub async fn set_auth(&self, auth: ProxmoxAuth) {
        *self.auth.write().await = Some(auth);
    }

    /// Returns the current authentication state, if any.
    pub async fn auth(&self) -> Option<ProxmoxAuth> {
        self.auth.read().await.clone()
    }

    /// Returns `true` if there is a non-expired ticket.
    pub async fn is_authenticated(&self) -> bool {
        self.auth
            .read()
            .await
            .as_ref()
            .is_some_and(|a| !a.ticket().is_expired(self.config.ticket_lifetime))
    }

    /// Logs in with the stored credentials, replacing any current ticket.
    pub async fn login(&self) -> ProxmoxResult<()> {
        let auth = self
            .login_service
            .execute(&self.http_client, &self.connection)
            .await?;
        self.set_auth(auth).await;
        Ok(())
    }

    pub async fn get<T>(&self, path: &str) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::GET, path, None::<&()>, None::<&()>)
            .await
    }

    /// GET with `query` encoded as URL parameters.
    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> ProxmoxResult<T>
    where
        Q: Serialize,
        T: DeserializeOwned,
    {
        self.execute(Method::GET, path, Some(query), None::<&()>)
            .await
    }

    /// POST with `body` sent as JSON.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ProxmoxResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, None::<&()>, Some(body))
            .await
    }

    pub async fn delete<T>(&self, path: &str) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::DELETE, path, None::<&()>, None::<&()>)
            .await
    }

    /// DELETE with `query` encoded as URL parameters.
    pub async fn delete_with_query<Q, T>(&self, path: &str, query: &Q) -> ProxmoxResult<T>
    where
        Q: Serialize,
        T: DeserializeOwned,
    {
        self.execute(Method::DELETE, path, Some(query), None::<&()>)
            .await
    }

    async fn execute<Q, B, T>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> ProxmoxResult<T>
    where
        Q: Serialize,
        B: Serialize,
        T: DeserializeOwned,
    {
        let auth = self.ensure_authenticated().await?;
        let url = self.build_url(path, query)?;

        let mut response = self.send_once(method.clone(), url.clone(), body, &auth).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(path, "Ticket rejected, logging in again");
            let auth = self.renew(Some(auth.ticket())).await?;
            response = self.send_once(method, url, body, &auth).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .extensions()
                .get::<ReasonPhrase>()
                .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned());
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, reason, &body));
        }

        response
            .json::<ApiResponse<T>>()
            .await
            .map(|envelope| envelope.data)
            .map_err(|e| ProxmoxError::Connection(format!("Failed to parse response: {}", e)))
    }

    async fn send_once<B>(
        &self,
        method: Method,
        url: url::Url,
        body: Option<&B>,
        auth: &ProxmoxAuth,
    ) -> ProxmoxResult<reqwest::Response>
    where
        B: Serialize,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        debug!(%method, path = url.path(), "Sending request");
        let mut request = self
            .http_client
            .request(method, url)
            .header("Cookie", auth.ticket().as_cookie_header());
        if let Some(csrf) = auth.csrf_token() {
            request = request.header("CSRFPreventionToken", csrf.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| ProxmoxError::Connection(format!("HTTP request failed: {}", e)))
    }

    /// Joins `path` onto the API root and appends `query` as URL parameters.
    ///
    /// `query` must serialize to a JSON object. `null` fields are dropped and
    /// booleans are sent as `0`/`1`.
    fn build_url<Q>(&self, path: &str, query: Option<&Q>) -> ProxmoxResult<url::Url>
    where
        Q: Serialize,
    {
        let mut url = self.connection.url().api_url(path)?;
        let Some(query) = query else {
            return Ok(url);
        };

        let value = serde_json::to_value(query)
            .map_err(|e| ValidationError::Format(format!("Invalid query parameters: {}", e)))?;
        let serde_json::Value::Object(fields) = value else {
            return Err(ValidationError::Format(
                "Query parameters must be a key/value map".to_string(),
            )
            .into());
        };

        let pairs: Vec<(String, String)> = fields
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Bool(b) => u8::from(b).to_string(),
                    other => other.to_string(),
                };
                Some((key, value))
            })
            .collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Returns a usable ticket, logging in first if there is none.
    async fn ensure_authenticated(&self) -> ProxmoxResult<ProxmoxAuth> {
        if let Some(auth) = self.auth.read().await.as_ref()
            && !auth.ticket().is_expired(self.config.ticket_lifetime)
        {
            return Ok(auth.clone());
        }
        self.renew(None).await
    }

    /// Logs in unless another request already replaced the expired or
    /// `rejected` ticket while this one waited for the lock.
    async fn renew(&self, rejected: Option<&ProxmoxTicket>) -> ProxmoxResult<ProxmoxAuth> {
        let mut guard = self.auth.write().await;
        if let Some(current) = guard.as_ref() {
            let replaced =
                rejected.is_none_or(|ticket| ticket.as_str() != current.ticket().as_str());
            if replaced && !current.ticket().is_expired(self.config.ticket_lifetime) {
                return Ok(current.clone());
            }
        }

        debug!("No valid ticket, logging in");
        let auth = self
            .login_service
            .execute(&self.http_client, &self.connection)
            .await?;
        *guard = Some(auth.clone());
        Ok(auth)
    }
}

/// Builds the error for a non-success answer.
///
/// Proxmox puts the description in the status line's reason phrase and
/// answers `{"data":null}`; parameter check failures add an `errors` map.
/// Plain-text bodies from proxies are used when there is no reason phrase.
fn api_error(status: StatusCode, reason: Option<String>, body: &str) -> ProxmoxError {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let body = body.trim();

    let mut message = reason
        .filter(|reason| !reason.trim().is_empty())
        .or_else(|| (parsed.is_none() && !body.is_empty()).then(|| body.to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    if let Some(errors) = parsed
        .as_ref()
        .and_then(|value| value.get("errors"))
        .and_then(serde_json::Value::as_object)
        .filter(|errors| !errors.is_empty())
    {
        let details: Vec<String> = errors
            .iter()
            .map(|(field, error)| match error.as_str() {
                Some(text) => format!("{}: {}", field, text.trim()),
                None => format!("{}: {}", field, error),
            })
            .collect();
        message = format!("{} ({})", message, details.join(", "));
    }

    ProxmoxError::Api {
        status: status.as_u16(),
        message,
    }
}

fn non_zero(field: &str, value: u32) -> Result<NonZeroU32, ValidationError> {
    NonZeroU32::new(value).ok_or_else(|| ValidationError::Field {
        field: field.to_string(),
        message: "Rate limit values must be greater than zero".to_string(),
    })
}
