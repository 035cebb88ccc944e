//! Places lookup backed by the MapQuest radius search API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{GatewayError, HttpClient, PlacesLookup, SearchParams};
use crate::models::RawPlace;

/// Radius search endpoint
const RADIUS_SEARCH_URL: &str = "https://www.mapquestapi.com/search/v2/radius";

/// Status codes MapQuest reports for a rejected or unauthorized key
const AUTH_STATUS_CODES: [i64; 2] = [401, 403];

#[derive(Debug, Deserialize)]
struct RadiusResponse {
    #[serde(default)]
    info: Option<ResponseInfo>,
    #[serde(rename = "searchResults", default)]
    search_results: Vec<SearchResult>,
}

/// API-level status. A non-zero code means the body carries no usable results
/// even though the HTTP status was 200.
#[derive(Debug, Deserialize)]
struct ResponseInfo {
    #[serde(default)]
    statuscode: i64,
    #[serde(default)]
    messages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: SearchFields,
}

#[derive(Debug, Default, Deserialize)]
struct SearchFields {
    #[serde(default)]
    group_sic_code_name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

impl SearchResult {
    fn into_raw(self) -> RawPlace {
        RawPlace {
            name: self.name,
            category: self.fields.group_sic_code_name.unwrap_or_default(),
            address: self.fields.address.unwrap_or_default(),
            city: self.fields.city.unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
pub struct MapQuestClient {
    http: HttpClient,
    api_key: Option<String>,
    url: String,
}

impl MapQuestClient {
    /// A key of `None` is allowed; lookups then fail with `MissingApiKey`.
    pub fn new(api_key: Option<String>) -> Result<Self, GatewayError> {
        Ok(Self::with_url(HttpClient::new()?, api_key, RADIUS_SEARCH_URL))
    }

    pub fn with_url(http: HttpClient, api_key: Option<String>, url: &str) -> Self {
        Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            url: url.to_string(),
        }
    }

    fn query(key: &str, postal_code: &str, params: &SearchParams) -> Vec<(&'static str, String)> {
        vec![
            ("key", key.to_string()),
            ("origin", postal_code.to_string()),
            ("radius", params.radius_miles.to_string()),
            ("maxMatches", params.max_matches.to_string()),
            ("ambiguities", params.ambiguities.as_str().to_string()),
            ("outFormat", "json".to_string()),
        ]
    }
}

#[async_trait]
impl PlacesLookup for MapQuestClient {
    async fn fetch_nearby(
        &self,
        postal_code: &str,
        params: &SearchParams,
    ) -> Result<Vec<RawPlace>, GatewayError> {
        let key = self.api_key.as_deref().ok_or(GatewayError::MissingApiKey)?;
        let query = Self::query(key, postal_code, params);

        let response: RadiusResponse = self.http.get_json(&self.url, &query).await?;
        let places = parse_results(response)?;
        debug!(postal_code, matches = places.len(), "Radius search complete");

        Ok(places)
    }
}

/// Results of a successful search. A missing `searchResults` is an empty
/// list only when the reported status is 0.
fn parse_results(response: RadiusResponse) -> Result<Vec<RawPlace>, GatewayError> {
    if let Some(info) = response.info {
        if info.statuscode != 0 {
            let messages = info.messages.join("; ");
            return Err(if AUTH_STATUS_CODES.contains(&info.statuscode) {
                GatewayError::AccessDenied(messages)
            } else {
                GatewayError::InvalidResponse(format!(
                    "MapQuest status {}: {}",
                    info.statuscode, messages
                ))
            });
        }
    }

    Ok(response
        .search_results
        .into_iter()
        .map(SearchResult::into_raw)
        .collect())
}
