//! HTTP client for the ERP inventory API.
//!
//! Wraps `reqwest` with the ERP's session handshake, typed envelope decoding,
//! and payload-level error detection. All inventory calls POST a JSON body and
//! carry the session id as a query parameter.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Url};

use stocksync_core::{AppConfig, StockRecord};

use crate::error::ErpError;
use crate::retry::retry_with_delay;
use crate::session::SessionCache;
use crate::types::{InventoryEnvelope, LoginEnvelope, RawStockEntry};

const LOGIN_PATH: &str = "/OAPI/V2/OAPILogin";
const INVENTORY_ONE_PATH: &str = "/OAPI/V2/InventoryBalance/ViewInventoryBalanceStatus";
const INVENTORY_LIST_PATH: &str = "/OAPI/V2/InventoryBalance/GetListInventoryBalanceStatus";

/// Substring the ERP embeds in `Error.Message` when the daily call quota is
/// exhausted ("exceeded" in Korean). The payload still arrives with HTTP 200.
const QUOTA_MARKER: &str = "초과";

/// ERP connection settings, carved out of [`AppConfig`] so tests can build a
/// client without a full application configuration.
#[derive(Clone)]
pub struct ErpConfig {
    pub com_code: String,
    pub user_id: String,
    pub api_cert_key: String,
    pub lan_type: String,
    pub zone: String,
    pub request_timeout_secs: u64,
    pub session_ttl_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    /// Offset used to compute the `BASE_DATE` ("today" in the ERP's zone).
    pub base_date_offset: chrono::FixedOffset,
}

impl ErpConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            com_code: config.erp_com_code.clone(),
            user_id: config.erp_user_id.clone(),
            api_cert_key: config.erp_api_cert_key.clone(),
            lan_type: config.erp_lan_type.clone(),
            zone: config.erp_zone.clone(),
            request_timeout_secs: config.erp_request_timeout_secs,
            session_ttl_secs: config.erp_session_ttl_secs,
            max_retries: config.erp_max_retries,
            retry_delay_ms: config.erp_retry_delay_ms,
            base_date_offset: config.schedule_utc_offset,
        }
    }
}

impl std::fmt::Debug for ErpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErpConfig")
            .field("com_code", &self.com_code)
            .field("user_id", &self.user_id)
            .field("api_cert_key", &"[redacted]")
            .field("lan_type", &self.lan_type)
            .field("zone", &self.zone)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("base_date_offset", &self.base_date_offset)
            .finish()
    }
}

/// Client for the ERP inventory API.
///
/// Owns the HTTP client, credentials, and the session cache. Point `base_url`
/// at a mock server in tests.
pub struct ErpClient {
    client: Client,
    base_url: Url,
    config: ErpConfig,
    session: SessionCache,
}

impl ErpClient {
    /// Creates a new client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ErpError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ErpError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(config: ErpConfig, base_url: &str) -> Result<Self, ErpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("stocksync/0.1 (erp-inventory-sync)")
            .build()?;

        let parsed = Url::parse(base_url).map_err(|e| ErpError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let session = SessionCache::new(Duration::from_secs(config.session_ttl_secs));

        Ok(Self {
            client,
            base_url: parsed,
            config,
            session,
        })
    }

    /// Returns a live session id, logging in when the cache is empty or stale.
    ///
    /// Performs exactly one login call per cache miss; a failed login leaves
    /// the cache unchanged (the stale entry was already discarded on read).
    ///
    /// # Errors
    ///
    /// - [`ErpError::Http`] on login transport failure.
    /// - [`ErpError::Decode`] if the login response lacks the session id.
    pub async fn session_id(&self) -> Result<String, ErpError> {
        if let Some(session_id) = self.session.get().await {
            return Ok(session_id);
        }

        let session_id = self.login().await?;
        self.session.store(session_id.clone()).await;
        tracing::debug!("obtained fresh ERP session");
        Ok(session_id)
    }

    /// Fetches the stock balance for a single product code.
    ///
    /// Returns `Ok(None)` when the ERP has no record for the code or the
    /// reported quantity is not strictly positive; callers treat both as
    /// "nothing to update".
    ///
    /// # Errors
    ///
    /// - [`ErpError::QuotaExceeded`] on the embedded rate-limit marker (never
    ///   retried).
    /// - [`ErpError::NoStock`] if the payload carries no result array.
    /// - [`ErpError::Http`] on transport failure after the retry budget.
    /// - [`ErpError::Decode`] if the body or an entry does not match the
    ///   expected shape.
    pub async fn fetch_one(&self, code: &str) -> Result<Option<StockRecord>, ErpError> {
        let session_id = self.session_id().await?;
        let url = self.endpoint(INVENTORY_ONE_PATH, Some(&session_id));
        let body = serde_json::json!({
            "PROD_CD": code,
            "BASE_DATE": self.base_date(),
        });

        let entries = self
            .fetch_entries(&url, &body, &format!("inventory(code={code})"))
            .await?;

        Ok(entries
            .into_iter()
            .next()
            .map(StockRecord::from)
            .filter(|record| record.quantity > 0))
    }

    /// Fetches the full stock balance list, filtered to positive quantities.
    ///
    /// Upstream order is preserved. An empty result set is an error here:
    /// the full list only comes back empty when no stock is registered.
    ///
    /// # Errors
    ///
    /// Same kinds as [`ErpClient::fetch_one`], plus [`ErpError::NoStock`] for
    /// an empty result array.
    pub async fn fetch_all(&self) -> Result<Vec<StockRecord>, ErpError> {
        let session_id = self.session_id().await?;
        let url = self.endpoint(INVENTORY_LIST_PATH, Some(&session_id));
        let body = serde_json::json!({
            "BASE_DATE": self.base_date(),
        });

        let entries = self.fetch_entries(&url, &body, "inventory(list)").await?;
        if entries.is_empty() {
            return Err(ErpError::NoStock);
        }

        Ok(entries
            .into_iter()
            .map(StockRecord::from)
            .filter(|record| record.quantity > 0)
            .collect())
    }

    /// Performs the ERP login and returns the fresh session id.
    async fn login(&self) -> Result<String, ErpError> {
        let url = self.endpoint(LOGIN_PATH, None);
        let body = serde_json::json!({
            "COM_CODE": self.config.com_code,
            "USER_ID": self.config.user_id,
            "API_CERT_KEY": self.config.api_cert_key,
            "LAN_TYPE": self.config.lan_type,
            "ZONE": self.config.zone,
        });

        let payload = self.post_json(&url, &body).await?;
        let envelope: LoginEnvelope =
            serde_json::from_value(payload).map_err(|e| ErpError::Decode {
                context: "login".to_owned(),
                source: e,
            })?;

        Ok(envelope.data.datas.session_id)
    }

    /// POSTs `body` with the bounded retry policy and extracts the result
    /// entries from the decoded payload.
    async fn fetch_entries(
        &self,
        url: &Url,
        body: &serde_json::Value,
        context: &str,
    ) -> Result<Vec<RawStockEntry>, ErpError> {
        let payload = retry_with_delay(self.config.max_retries, self.config.retry_delay_ms, || {
            self.post_json(url, body)
        })
        .await?;

        Self::extract_entries(payload, context)
    }

    /// Sends a POST request, asserts a 2xx HTTP status, and parses the
    /// response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ErpError::Http`] on transport failure or a non-2xx status,
    /// [`ErpError::Decode`] if the body is not valid JSON.
    async fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ErpError> {
        let response = self.client.post(url.clone()).json(body).send().await?;
        let response = response.error_for_status()?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ErpError::Decode {
            context: url.to_string(),
            source: e,
        })
    }

    /// Checks the payload for the embedded quota marker, then pulls the
    /// result array out of the `Data` envelope.
    fn extract_entries(
        payload: serde_json::Value,
        context: &str,
    ) -> Result<Vec<RawStockEntry>, ErpError> {
        let envelope: InventoryEnvelope =
            serde_json::from_value(payload).map_err(|e| ErpError::Decode {
                context: context.to_owned(),
                source: e,
            })?;

        if let Some(message) = envelope.error.and_then(|e| e.message) {
            if message.contains(QUOTA_MARKER) {
                return Err(ErpError::QuotaExceeded(message));
            }
        }

        let Some(serde_json::Value::Array(items)) = envelope.data.and_then(|d| d.result) else {
            return Err(ErpError::NoStock);
        };

        items
            .into_iter()
            .map(|item| {
                serde_json::from_value::<RawStockEntry>(item).map_err(|e| ErpError::Decode {
                    context: context.to_owned(),
                    source: e,
                })
            })
            .collect()
    }

    /// Builds the full request URL, attaching the session id as a query
    /// parameter when given.
    fn endpoint(&self, path: &str, session_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        if let Some(session_id) = session_id {
            url.query_pairs_mut().append_pair("SESSION_ID", session_id);
        }
        url
    }

    /// Today in `YYYYMMDD` form, evaluated in the ERP's zone so the snapshot
    /// day rolls over together with the remote.
    fn base_date(&self) -> String {
        Utc::now()
            .with_timezone(&self.config.base_date_offset)
            .format("%Y%m%d")
            .to_string()
    }
}
