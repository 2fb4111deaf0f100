//! HTTP implementation of [`SessionProvider`] against the interest portal's
//! CSV report endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use trendq_core::{AppConfig, CategoryId, DateRange, TimeSeries};

use crate::error::FetchError;
use crate::parse::parse_report;
use crate::session::SessionProvider;

const CSV_CONTENT_TYPE: &str = "text/csv";

/// Client for the portal's report endpoint.
///
/// Carries an already-established session cookie; the login handshake is not
/// this crate's concern. Use [`TrendsClient::new`] for production or
/// [`TrendsClient::with_base_url`] to point at a mock server in tests.
pub struct TrendsClient {
    client: Client,
    base_url: Url,
    session_cookie: String,
}

impl TrendsClient {
    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FetchError::InvalidQuery`] if the
    /// configured base URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        Self::with_base_url(
            &config.base_url,
            &config.session_cookie,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FetchError::InvalidQuery`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        session_cookie: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| FetchError::InvalidQuery {
            reason: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            base_url,
            session_cookie: session_cookie.to_owned(),
        })
    }

    /// Builds the report URL with percent-encoded query parameters.
    ///
    /// The date window uses the portal's `MM/YYYY Nm` syntax: the start
    /// month plus the number of months covered.
    fn report_url(&self, term: &str, range: &DateRange, category: Option<&CategoryId>) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", term);
            pairs.append_pair(
                "date",
                &format!(
                    "{:02}/{} {}m",
                    range.start.month,
                    range.start.year,
                    range.months()
                ),
            );
            if let Some(cat) = category {
                pairs.append_pair("cat", cat.as_str());
            }
            pairs.append_pair("export", "1");
            pairs.append_pair("content", "1");
        }
        url
    }
}

#[async_trait]
impl SessionProvider for TrendsClient {
    async fn fetch(
        &self,
        term: &str,
        range: &DateRange,
        category: Option<&CategoryId>,
    ) -> Result<TimeSeries, FetchError> {
        let url = self.report_url(term, range, category);
        let context = format!("{term} {range}");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::COOKIE, &self.session_cookie)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::SessionInvalid {
                reason: format!("portal returned {status}"),
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(FetchError::RateLimited { retry_after_secs });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::InvalidQuery {
                reason: format!("report endpoint not found: {url}"),
            });
        }
        // Remaining non-2xx: 5xx surface as retriable Http, other 4xx as
        // non-retriable Http (see retry::is_retriable).
        let response = response.error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_owned();
        let body = response.text().await?;

        if content_type.starts_with(CSV_CONTENT_TYPE) {
            return parse_report(&body, &context);
        }

        // The portal answers some failure modes with an HTML page and 200.
        let lowered = body.to_lowercase();
        if lowered.contains("quota") {
            return Err(FetchError::RateLimited {
                retry_after_secs: 60,
            });
        }
        if lowered.contains("currently unavailable") {
            // No interest data for this query/category. An empty series is
            // still a result worth persisting so re-runs skip it.
            tracing::info!(term, %range, "portal reports no data available");
            return Ok(TimeSeries::default());
        }
        if lowered.contains("servicelogin") || lowered.contains("sign in") {
            return Err(FetchError::SessionInvalid {
                reason: "portal answered with a login page".to_owned(),
            });
        }
        Err(FetchError::InvalidQuery {
            reason: format!("unexpected {content_type} response for {context}"),
        })
    }
}
