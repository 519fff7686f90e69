//! HTTP client for the treasury backend.
//!
//! All requests go through [`ApiClient::request`], which attaches the
//! bearer token of the current session. The session is read per request,
//! so a login or logout takes effect on the next call without rebuilding
//! the client.

use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::ClientError;
use super::models::*;
use crate::config::ApiConfig;
use crate::session::SessionStore;
use crate::workflow::FundStatus;

const NGROK_SKIP_HEADER: &str = "ngrok-skip-browser-warning";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ClientError> {
        let mut headers = header::HeaderMap::new();
        if config.skip_ngrok_warning {
            headers.insert(NGROK_SKIP_HEADER, header::HeaderValue::from_static("true"));
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request with the session's bearer token attached
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(status = %status, url = %response.url(), "Backend responded");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_status(status, &body);
        if err.is_unauthorized() && self.session.token().is_some() {
            warn!("Backend rejected the stored token; the session may have expired");
        }
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn send_ignoring_body(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        self.send(builder).await.map(|_| ())
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    /// Exchange credentials for a token. Does not touch the session.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest { username, password };
        let result = self
            .send_json(self.request(Method::POST, "/auth/login").json(&body))
            .await;

        // 400 and 401 mean the credentials were not accepted; anything else
        // (a wrong base URL, a proxy refusing the call) is reported as is.
        match result {
            Err(ClientError::Status { status: 400, message }) => {
                Err(ClientError::Unauthorized(message))
            }
            other => other,
        }
    }

    // ------------------------------------------------------------------------
    // Fund requests
    // ------------------------------------------------------------------------

    pub async fn list_fund_requests(&self) -> Result<Vec<FundRequest>, ClientError> {
        self.send_json(self.request(Method::GET, "/pengajuan/all"))
            .await
    }

    pub async fn list_fund_requests_by_status(
        &self,
        status: FundStatus,
    ) -> Result<Vec<FundRequest>, ClientError> {
        let path = format!("/pengajuan/status/{}", status);
        self.send_json(self.request(Method::GET, &path)).await
    }

    pub async fn create_fund_request(
        &self,
        req: &NewFundRequest,
    ) -> Result<FundRequest, ClientError> {
        self.send_json(self.request(Method::POST, "/pengajuan").json(req))
            .await
    }

    /// submitted -> checking
    pub async fn send_to_approval(&self, id: i64) -> Result<(), ClientError> {
        let path = format!("/pengajuan/send/{}", id);
        self.send_ignoring_body(self.request(Method::PATCH, &path))
            .await
    }

    /// checking -> approved | rejected
    pub async fn decide(&self, id: i64, action: ApprovalAction) -> Result<(), ClientError> {
        let path = format!("/pengajuan/approve/{}", id);
        let body = ApprovalBody { action };
        self.send_ignoring_body(self.request(Method::PATCH, &path).json(&body))
            .await
    }

    /// approved -> done
    pub async fn mark_done(&self, id: i64) -> Result<(), ClientError> {
        let path = format!("/pengajuan/done/{}", id);
        self.send_ignoring_body(self.request(Method::PATCH, &path))
            .await
    }

    // ------------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------------

    pub async fn list_pemasukan(&self) -> Result<Vec<Pemasukan>, ClientError> {
        self.send_json(self.request(Method::GET, "/pemasukan")).await
    }

    pub async fn create_pemasukan(&self, entry: &NewPemasukan) -> Result<(), ClientError> {
        self.send_ignoring_body(self.request(Method::POST, "/pemasukan").json(entry))
            .await
    }

    pub async fn list_pengeluaran(&self) -> Result<Vec<Pengeluaran>, ClientError> {
        self.send_json(self.request(Method::GET, "/pengeluaran"))
            .await
    }

    pub async fn create_pengeluaran(&self, entry: &NewPengeluaran) -> Result<(), ClientError> {
        self.send_ignoring_body(self.request(Method::POST, "/pengeluaran").json(entry))
            .await
    }

    pub async fn live_contributions(&self) -> Result<Vec<LiveContribution>, ClientError> {
        let wrapped: LiveContributions = self
            .send_json(self.request(Method::GET, "/pemasukan/live-sumbangan-rt"))
            .await?;
        Ok(wrapped.data)
    }

    // ------------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------------

    pub async fn summary(&self, range: &DateRange) -> Result<Summary, ClientError> {
        self.send_json(
            self.request(Method::GET, "/laporan/summary")
                .query(&range.query()),
        )
        .await
    }

    pub async fn rekap(&self, range: &DateRange) -> Result<Rekap, ClientError> {
        self.send_json(self.request(Method::GET, "/laporan/rekap").query(&range.query()))
            .await
    }

    pub async fn saldo(&self) -> Result<Saldo, ClientError> {
        self.send_json(self.request(Method::GET, "/laporan/saldo"))
            .await
    }

    // ------------------------------------------------------------------------
    // Gallery and registrations (public)
    // ------------------------------------------------------------------------

    /// Years that have photos, newest first as the backend orders them
    pub async fn photo_years(&self) -> Result<Vec<String>, ClientError> {
        self.send_text_list(self.request(Method::GET, "/foto/years"))
            .await
    }

    pub async fn photo_categories(&self, year: &str) -> Result<Vec<String>, ClientError> {
        self.send_text_list(
            self.request(Method::GET, "/foto/categories")
                .query(&[("year", year)]),
        )
        .await
    }

    pub async fn photos(&self, year: &str, category: &str) -> Result<Vec<Photo>, ClientError> {
        let records: Option<Vec<PhotoRecord>> = self
            .send_json(
                self.request(Method::GET, "/foto/photos")
                    .query(&[("year", year), ("category", category)]),
            )
            .await?;
        Ok(records
            .unwrap_or_default()
            .into_iter()
            .map(|record| record.into_photo(year, category))
            .collect())
    }

    pub async fn list_pendaftaran(&self) -> Result<Vec<Pendaftaran>, ClientError> {
        let rows: Option<Vec<Pendaftaran>> = self
            .send_json(self.request(Method::GET, "/pendaftaran/all"))
            .await?;
        Ok(rows.unwrap_or_default())
    }

    /// A JSON array of scalars, kept as display strings
    async fn send_text_list(&self, builder: RequestBuilder) -> Result<Vec<String>, ClientError> {
        let values: Option<Vec<serde_json::Value>> = self.send_json(builder).await?;
        Ok(values
            .unwrap_or_default()
            .iter()
            .filter_map(text::from_value)
            .collect())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
