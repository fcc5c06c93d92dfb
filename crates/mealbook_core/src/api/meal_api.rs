//! Blocking client for the remote recipe catalog.
//!
//! # Responsibility
//! - Issue the catalog's five fixed GET endpoints and decode the
//!   shared response envelope.
//! - Report transport, status and decode failures as [`ApiError`]
//!   values.
//!
//! # Invariants
//! - Every endpoint returns the same list-or-empty envelope.
//! - A transport failure is retried once before it is reported.
//! - Non-2xx statuses are reported with their code, never retried.

use crate::model::recipe::MealsResponse;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};
use ureq::Agent;

/// Public catalog base; callers inject their own for tests/staging.
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const IO_TIMEOUT: Duration = Duration::from_secs(30);
const TRANSPORT_RETRIES: u32 = 1;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure taxonomy for catalog calls.
#[derive(Debug)]
pub enum ApiError {
    /// No usable response arrived (DNS, connect, read failures).
    Transport(String),
    /// The catalog answered with a non-success status.
    Status { code: u16 },
    /// The body was not a valid response envelope.
    Decode(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "catalog transport failure: {message}"),
            Self::Status { code } => write!(f, "catalog returned status {code}"),
            Self::Decode(message) => write!(f, "catalog response not decodable: {message}"),
        }
    }
}

impl Error for ApiError {}

/// Catalog client over a fixed base URL.
///
/// Cheap to clone; the underlying agent shares its connection pool.
#[derive(Debug, Clone)]
pub struct MealApiClient {
    agent: Agent,
    base_url: String,
}

impl MealApiClient {
    /// Creates a client for the given base URL (no trailing slash
    /// required) with the standard timeout and retry policy.
    pub fn new(base_url: impl Into<String>) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .timeout_send_request(Some(IO_TIMEOUT))
            .timeout_recv_response(Some(IO_TIMEOUT))
            .build();
        Self {
            agent: config.new_agent(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client for the public catalog.
    pub fn with_default_catalog() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Recipes whose name matches `term`.
    pub fn search_by_name(&self, term: &str) -> ApiResult<MealsResponse> {
        self.get("search.php", &[("s", term)])
    }

    /// Recipes in the given category.
    pub fn filter_by_category(&self, category: &str) -> ApiResult<MealsResponse> {
        self.get("filter.php", &[("c", category)])
    }

    /// Zero-or-one recipe matching the catalog id.
    pub fn get_by_id(&self, id: &str) -> ApiResult<MealsResponse> {
        self.get("lookup.php", &[("i", id)])
    }

    /// One recipe chosen by the catalog.
    pub fn get_random(&self) -> ApiResult<MealsResponse> {
        self.get("random.php", &[])
    }

    /// The catalog's category descriptors, same envelope as recipes.
    pub fn list_categories(&self) -> ApiResult<MealsResponse> {
        self.get("categories.php", &[])
    }

    fn get(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<MealsResponse> {
        let started_at = Instant::now();
        let body = self.fetch(path, params)?;
        let response = parse_meals(&body)?;
        debug!(
            "event=api_get module=api status=ok path={path} count={} duration_ms={}",
            response.count(),
            started_at.elapsed().as_millis()
        );
        Ok(response)
    }

    fn fetch(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<String> {
        let url = format!("{}/{path}", self.base_url);
        let mut last_error = String::new();

        for attempt in 0..=TRANSPORT_RETRIES {
            let mut request = self.agent.get(&url);
            for (key, value) in params {
                request = request.query(*key, *value);
            }

            match request.call() {
                Ok(mut response) => {
                    let status = response.status();
                    if !status.is_success() {
                        return Err(ApiError::Status {
                            code: status.as_u16(),
                        });
                    }
                    return response
                        .body_mut()
                        .read_to_string()
                        .map_err(|err| ApiError::Transport(err.to_string()));
                }
                Err(err) => {
                    last_error = err.to_string();
                    if attempt < TRANSPORT_RETRIES {
                        warn!(
                            "event=api_get module=api status=retry path={path} attempt={} error={last_error}",
                            attempt + 1
                        );
                    }
                }
            }
        }

        Err(ApiError::Transport(last_error))
    }
}

/// Decodes a response body into the shared envelope.
///
/// Split out from the transport so the JSON contract is testable
/// without a network.
pub fn parse_meals(body: &str) -> ApiResult<MealsResponse> {
    serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))
}
