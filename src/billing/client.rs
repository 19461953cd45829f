//! Billing service client
//!
//! Fetches the current subscription of an account from the platform's
//! billing/data service over HTTP.

use crate::access::Subscription;
use crate::billing::source::SubscriptionSource;
use crate::config::BillingConfig;
use crate::error::{BillingError, BillingResult};
use crate::util::{QueryBuilder, SecretString};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// HTTP subscription source backed by the billing service
pub struct HttpSubscriptionSource {
    http: Client,
    endpoint: String,
    token: Option<SecretString>,
    max_retries: u32,
}

impl HttpSubscriptionSource {
    /// Create a new client from configuration
    pub fn new(config: &BillingConfig) -> BillingResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(format!("earthcare-access/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BillingError::Request)?;

        Ok(Self {
            http,
            endpoint: config.subscription_url(),
            token: config.token.clone(),
            max_retries: config.max_retries,
        })
    }

    /// Add the service token to a request
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Execute a request with retries
    async fn execute(&self, request: RequestBuilder) -> BillingResult<Response> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
                debug!("Retrying billing request (attempt {})", attempt + 1);
            }

            let req = request.try_clone().ok_or_else(|| {
                BillingError::InvalidResponse("Cannot clone request".to_string())
            })?;

            let result = match req.send().await {
                Ok(response) => Self::check_status(response).await,
                Err(e) => Err(BillingError::Request(e)),
            };

            match result {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, "Billing request failed");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| BillingError::InvalidResponse("Unknown error".to_string())))
    }

    /// Pass 2xx and 404 through; map everything else to an error
    async fn check_status(response: Response) -> BillingResult<Response> {
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(BillingError::from_response(status.as_u16(), &body))
    }
}

#[async_trait]
impl SubscriptionSource for HttpSubscriptionSource {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, account_id: &str) -> BillingResult<Option<Subscription>> {
        let url = format!(
            "{}{}",
            self.endpoint,
            QueryBuilder::new().param("account_id", account_id).build()
        );
        let request = self.authenticate(self.http.get(&url));

        let response = self.execute(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(account_id, "No subscription record");
            return Ok(None);
        }

        response.json::<Option<Subscription>>().await.map_err(|e| {
            BillingError::InvalidResponse(format!("Failed to parse subscription: {}", e))
        })
    }

    fn source_type(&self) -> &'static str {
        "http"
    }
}
