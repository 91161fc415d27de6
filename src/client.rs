//! Remote API client
//!
//! Thin wrapper over the dashboard API: account signup, session login,
//! login status, logout and the transaction feed. The session lives in the client's
//! cookie store, so one `ApiClient` is one session.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::parser::{ImportReport, JsonImporter, TransactionSource};

const REGISTER_PATH: &str = "/register";
const LOGIN_PATH: &str = "/login";
const LOGOUT_PATH: &str = "/logout";
const TRANSACTIONS_PATH: &str = "/home";

/// Username and password for the session login
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// New account details for signup
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(username: &str, email: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Login endpoint response
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    successful: bool,
}

/// Register endpoint response
#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    success: bool,
}

#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(&api.base_url, api.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a new account; `Ok(false)` means the server refused it.
    ///
    /// Every field must be non-empty; incomplete details are never sent.
    pub async fn register(&self, registration: &Registration) -> Result<bool> {
        if !registration.is_complete() {
            return Err(Error::InvalidData(
                "username, email and password are all required".to_string(),
            ));
        }

        debug!(username = %registration.username, "Registering account");
        let response = self
            .http_client
            .post(self.url(REGISTER_PATH))
            .json(registration)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                path: REGISTER_PATH.to_string(),
            });
        }

        let body: RegisterResponse = response.json().await?;
        Ok(body.success)
    }

    /// POST credentials; `Ok(false)` means the server said no
    pub async fn login(&self, credentials: &Credentials) -> Result<bool> {
        debug!(username = %credentials.username, "Logging in");
        let response = self
            .http_client
            .post(self.url(LOGIN_PATH))
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                path: LOGIN_PATH.to_string(),
            });
        }

        let body: LoginResponse = response.json().await?;
        Ok(body.successful)
    }

    /// Ask the server whether this session is logged in
    pub async fn login_status(&self) -> Result<bool> {
        let response = self.http_client.get(self.url(LOGIN_PATH)).send().await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Login status check refused");
            return Ok(false);
        }

        let body: LoginResponse = response.json().await?;
        Ok(body.successful)
    }

    pub async fn logout(&self) -> Result<()> {
        let response = self.http_client.post(self.url(LOGOUT_PATH)).send().await?;

        if !response.status().is_success() {
            return Err(Error::Http {
                status: response.status().as_u16(),
                path: LOGOUT_PATH.to_string(),
            });
        }
        Ok(())
    }

    /// GET the transaction feed and validate it.
    ///
    /// Any transport, status or decoding failure fails the whole load.
    pub async fn fetch_transactions(&self) -> Result<ImportReport> {
        let response = self
            .http_client
            .get(self.url(TRANSACTIONS_PATH))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Transaction feed request failed");
            return Err(Error::Http {
                status: status.as_u16(),
                path: TRANSACTIONS_PATH.to_string(),
            });
        }

        let body = response.text().await?;
        let report = JsonImporter::new().parse(&body)?;

        info!(
            accepted = report.accepted_count(),
            rejected = report.rejected_count(),
            "Fetched transactions"
        );
        Ok(report)
    }

    /// Log in (when credentials are given) and fetch in one step
    pub async fn load_transactions(&self, credentials: Option<&Credentials>) -> Result<ImportReport> {
        if let Some(credentials) = credentials {
            if !self.login(credentials).await? {
                return Err(Error::Auth(format!(
                    "server rejected credentials for {}",
                    credentials.username
                )));
            }
        }
        self.fetch_transactions().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockApiServer, MOCK_PASSWORD, MOCK_USERNAME};
    use rust_decimal_macros::dec;

    fn client_for(server: &MockApiServer) -> ApiClient {
        ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_login_and_fetch() {
        let server = MockApiServer::start().await;
        let client = client_for(&server);

        let credentials = Credentials::new(MOCK_USERNAME, MOCK_PASSWORD);
        assert!(client.login(&credentials).await.unwrap());
        assert!(client.login_status().await.unwrap());

        let report = client.fetch_transactions().await.unwrap();
        assert_eq!(report.accepted_count(), 3);
        assert_eq!(report.rejected_count(), 1);
        assert_eq!(report.transactions[0].amount, dec!(-12.5));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let server = MockApiServer::start().await;
        let client = client_for(&server);

        let credentials = Credentials::new(MOCK_USERNAME, "wrong");
        assert!(!client.login(&credentials).await.unwrap());
        assert!(!client.login_status().await.unwrap());

        let result = client.load_transactions(Some(&credentials)).await;
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn test_fetch_without_session_fails() {
        let server = MockApiServer::start().await;
        let client = client_for(&server);

        let result = client.fetch_transactions().await;
        assert!(matches!(result, Err(Error::Http { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let server = MockApiServer::start().await;
        let client = client_for(&server);

        let credentials = Credentials::new(MOCK_USERNAME, MOCK_PASSWORD);
        let report = client.load_transactions(Some(&credentials)).await.unwrap();
        assert_eq!(report.accepted_count(), 3);

        client.logout().await.unwrap();
        assert!(!client.login_status().await.unwrap());
    }

    #[tokio::test]
    async fn test_non_array_feed_fails_whole_load() {
        let server = MockApiServer::start_with_feed(r#"{"error": "maintenance"}"#).await;
        let client = client_for(&server);

        let credentials = Credentials::new(MOCK_USERNAME, MOCK_PASSWORD);
        let result = client.load_transactions(Some(&credentials)).await;
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let server = MockApiServer::start().await;
        let client = client_for(&server);

        let registration = Registration::new("newbie", "newbie@example.org", "pa55");
        assert!(client.register(&registration).await.unwrap());

        let credentials = Credentials::new("newbie", "pa55");
        assert!(client.login(&credentials).await.unwrap());
        assert!(client.login_status().await.unwrap());
    }

    #[tokio::test]
    async fn test_register_taken_username() {
        let server = MockApiServer::start().await;
        let client = client_for(&server);

        let registration = Registration::new(MOCK_USERNAME, "demo@example.org", "whatever");
        assert!(!client.register(&registration).await.unwrap());
    }

    #[tokio::test]
    async fn test_register_incomplete_is_not_sent() {
        let server = MockApiServer::start().await;
        let client = client_for(&server);

        let registration = Registration::new("someone", "", "pw");
        let result = client.register(&registration).await;
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert_eq!(server.register_calls(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Bind then drop, leaving a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = format!("http://127.0.0.1:{}", port);
        let client = ApiClient::new(&url, Duration::from_secs(2)).unwrap();
        let result = client.fetch_transactions().await;
        assert!(matches!(result, Err(Error::Request(_))));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("sam", "topsecret");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("sam"));
        assert!(!printed.contains("topsecret"));

        let registration = Registration::new("sam", "sam@example.org", "topsecret");
        let printed = format!("{:?}", registration);
        assert!(printed.contains("sam@example.org"));
        assert!(!printed.contains("topsecret"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://example.test/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://example.test");
        assert_eq!(client.url(TRANSACTIONS_PATH), "http://example.test/home");
    }
}
