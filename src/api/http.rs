//! reqwest client for the football-data v4 API

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::types::{
    LiveMatch, MatchesResponse, ScorersResponse, StandingEntry, StandingsResponse, TopScorer,
};
use super::LiveFeed;
use crate::config::{ApiConfig, RetryPolicy};
use crate::core::http::api_header_map;
use crate::error::{FootballError, Result};
use crate::LeagueCode;


const USER_AGENT: &str = concat!("football-analytics/", env!("CARGO_PKG_VERSION"));

/// Live data source backed by the football-data HTTP API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

enum Failure {
    Transient(String),
    Fatal(String),
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let headers = api_header_map(config.api_key.as_deref())?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FootballError::Config {
                message: format!("cannot build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `endpoint` and decode the body, retrying transient failures with
    /// exponential backoff.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let max_attempts = self.retry.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let reason = match self.try_once(&url, query).await {
                Ok(bytes) => {
                    return serde_json::from_slice(&bytes).map_err(|e| {
                        unavailable(endpoint, attempt, format!("malformed payload: {e}"))
                    });
                }
                Err(Failure::Fatal(reason)) => return Err(unavailable(endpoint, attempt, reason)),
                Err(Failure::Transient(reason)) => reason,
            };

            if attempt >= max_attempts {
                return Err(unavailable(endpoint, attempt, reason));
            }

            let delay = self.retry.backoff_for(attempt - 1);
            warn!(
                endpoint,
                attempt,
                delay_ms = delay.as_millis() as u64,
                %reason,
                "football API request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn try_once(&self, url: &str, query: &[(&str, &str)]) -> std::result::Result<Vec<u8>, Failure> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let reason = format!("HTTP {status}");
            return Err(if is_transient_status(status) {
                Failure::Transient(reason)
            } else {
                Failure::Fatal(reason)
            });
        }

        // A body cut off mid-transfer is a network failure, not a bad payload.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Failure::Transient(e.to_string()))?;
        debug!(url, bytes = bytes.len(), "football API response received");
        Ok(bytes.to_vec())
    }
}

/// Anything that went wrong on the wire is worth another attempt; only a
/// request that could never be sent as built is fatal.
fn classify_send_error(e: reqwest::Error) -> Failure {
    if e.is_builder() || e.is_redirect() {
        Failure::Fatal(e.to_string())
    } else {
        Failure::Transient(e.to_string())
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn unavailable(endpoint: &str, attempts: u32, reason: String) -> FootballError {
    FootballError::ApiUnavailable {
        endpoint: endpoint.to_string(),
        attempts,
        reason,
    }
}

impl LiveFeed for ApiClient {
    #[instrument(skip_all, fields(league = %league))]
    async fn get_standings(&self, league: &LeagueCode) -> Result<Vec<StandingEntry>> {
        let endpoint = format!("competitions/{league}/standings");
        let response: StandingsResponse = self.get_json(&endpoint, &[]).await?;
        Ok(response.into_entries())
    }

    #[instrument(skip_all, fields(league = %league))]
    async fn get_fixtures(&self, league: &LeagueCode) -> Result<Vec<LiveMatch>> {
        let endpoint = format!("competitions/{league}/matches");
        let response: MatchesResponse = self
            .get_json(&endpoint, &[("status", "SCHEDULED")])
            .await?;

        let mut fixtures: Vec<LiveMatch> = response
            .into_live_matches()
            .into_iter()
            .filter(|m| m.score.is_none())
            .collect();
        fixtures.sort_by_key(|m| m.kickoff);
        Ok(fixtures)
    }

    #[instrument(skip_all, fields(league = %league))]
    async fn get_results(&self, league: &LeagueCode) -> Result<Vec<LiveMatch>> {
        let endpoint = format!("competitions/{league}/matches");
        let response: MatchesResponse = self
            .get_json(&endpoint, &[("status", "FINISHED")])
            .await?;

        let mut results: Vec<LiveMatch> = response
            .into_live_matches()
            .into_iter()
            .filter(|m| m.score.is_some())
            .collect();
        results.sort_by(|a, b| b.kickoff.cmp(&a.kickoff));
        Ok(results)
    }

    #[instrument(skip_all, fields(league = %league))]
    async fn get_top_scorers(&self, league: &LeagueCode) -> Result<Vec<TopScorer>> {
        let endpoint = format!("competitions/{league}/scorers");
        let response: ScorersResponse = self.get_json(&endpoint, &[]).await?;
        Ok(response.into_top_scorers())
    }
}

/// Build a client that gives up after the first failed attempt.
pub fn fail_fast_client(config: &ApiConfig) -> Result<ApiClient> {
    let retry = RetryPolicy {
        max_retries: 0,
        initial_backoff: Duration::ZERO,
        max_backoff: Duration::ZERO,
        backoff_multiplier: 1.0,
    };
    ApiClient::new(&config.clone().with_retry(retry))
}
