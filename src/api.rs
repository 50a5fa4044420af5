//! Tequila search API client, page-generator notification and logo assets

use std::sync::OnceLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::criteria::SearchCriteria;
use crate::error::{LogoError, NotifyError, SearchError};
use crate::html::GeneratedPage;
use crate::logos::{self, LogoTile};
use crate::state::{Flight, RouteLeg, SearchResponse};

pub const DEFAULT_API_URL: &str = "https://api.tequila.kiwi.com/v2/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        client_or_fallback(
            reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build(),
        )
    })
}

fn client_or_fallback(built: reqwest::Result<reqwest::Client>) -> reqwest::Client {
    match built {
        Ok(client) => client,
        Err(e) => {
            warn!("HTTP client setup failed, requests run without a timeout: {}", e);
            reqwest::Client::new()
        }
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    currency: String,
    #[serde(default)]
    data: Vec<FlightBody>,
}

#[derive(Debug, Deserialize)]
struct FlightBody {
    price: f64,
    #[serde(default)]
    booking_token: String,
    #[serde(default)]
    deep_link: String,
    #[serde(default)]
    route: Vec<RouteBody>,
}

/// Flight numbers come back as either numbers or strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlightNumber {
    Number(u64),
    Text(String),
}

impl FlightNumber {
    fn into_string(self) -> String {
        match self {
            FlightNumber::Number(n) => n.to_string(),
            FlightNumber::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RouteBody {
    #[serde(default)]
    airline: String,
    flight_no: Option<FlightNumber>,
    #[serde(rename = "flyFrom")]
    fly_from: String,
    #[serde(rename = "flyTo")]
    fly_to: String,
    #[serde(rename = "cityFrom", default)]
    city_from: String,
    #[serde(rename = "cityTo", default)]
    city_to: String,
    /// Wall-clock time, encoded as if it were UTC
    local_departure: DateTime<Utc>,
    utc_departure: DateTime<Utc>,
    local_arrival: DateTime<Utc>,
    utc_arrival: DateTime<Utc>,
    #[serde(rename = "return", default)]
    is_return: u8,
}

impl From<RouteBody> for RouteLeg {
    fn from(body: RouteBody) -> Self {
        RouteLeg {
            airline: body.airline,
            flight_no: body
                .flight_no
                .map(FlightNumber::into_string)
                .unwrap_or_default(),
            fly_from: body.fly_from,
            fly_to: body.fly_to,
            city_from: body.city_from,
            city_to: body.city_to,
            local_departure: body.local_departure.naive_utc(),
            utc_departure: body.utc_departure,
            local_arrival: body.local_arrival.naive_utc(),
            utc_arrival: body.utc_arrival,
            is_return: body.is_return == 1,
        }
    }
}

impl From<SearchBody> for SearchResponse {
    fn from(body: SearchBody) -> Self {
        SearchResponse {
            currency: body.currency,
            flights: body
                .data
                .into_iter()
                .map(|flight| Flight {
                    price: flight.price,
                    booking_token: flight.booking_token,
                    deep_link: flight.deep_link,
                    route: flight.route.into_iter().map(RouteLeg::from).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NotifyBody {
    status: String,
    message: Option<String>,
    filename: Option<String>,
}

/// Parse a search response body
pub fn parse_search_response(json: &str) -> Result<SearchResponse, serde_json::Error> {
    serde_json::from_str::<SearchBody>(json).map(SearchResponse::from)
}

// ============================================================================
// Client
// ============================================================================

/// `key=value&...` with both sides percent-encoded
pub fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Endpoints and credentials shared by every request
#[derive(Clone, Debug)]
pub struct SearchClient {
    api_url: String,
    api_key: String,
    generate_url: Option<String>,
}

impl SearchClient {
    pub fn new(api_url: String, api_key: String, generate_url: Option<String>) -> Self {
        Self {
            api_url,
            api_key,
            generate_url,
        }
    }

    pub fn can_notify(&self) -> bool {
        self.generate_url.is_some()
    }

    pub fn search_url(&self, criteria: &SearchCriteria) -> String {
        let separator = if self.api_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}",
            self.api_url,
            separator,
            encode_query(&criteria.to_query())
        )
    }

    /// One GET round trip. Non-success statuses keep the body as the error text.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResponse, SearchError> {
        let url = self.search_url(criteria);
        debug!("GET {}", url);

        let response = http_client()
            .get(&url)
            .header("apikey", &self.api_key)
            .header("content-type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: SearchBody = response.json().await?;
        Ok(body.into())
    }

    /// Post the rendered results to the page generator. Returns the generated filename, if any.
    pub async fn notify_page(&self, page: &GeneratedPage) -> Result<Option<String>, NotifyError> {
        let Some(url) = self.generate_url.as_deref() else {
            return Err(NotifyError::NotConfigured);
        };

        let response = http_client().post(url).form(page).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                status: status.as_u16(),
            });
        }

        let body: NotifyBody = response.json().await?;
        if body.status == "error" {
            return Err(NotifyError::Rejected {
                message: body.message.unwrap_or_default(),
            });
        }
        Ok(body.filename)
    }

    pub async fn fetch_logo(&self, code: &str) -> Result<LogoTile, LogoError> {
        let response = http_client().get(logos::logo_url(code)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LogoError::Status {
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        logos::decode_logo(&bytes)
    }
}
