//! Remote data gateways.
//!
//! The resolver only sees the two traits defined here. `NpsClient` scrapes
//! the nps.gov state and site pages; `MapQuestClient` runs the radius search
//! for places near a postal code. Both are only called on a cache miss.

pub mod client;
pub mod error;
pub mod mapquest;
pub mod nps;

use async_trait::async_trait;

use crate::models::{RawPlace, RawSite, SiteIndex};

pub use client::HttpClient;
pub use error::GatewayError;
pub use mapquest::MapQuestClient;
pub use nps::NpsClient;

/// Source of the state index and per-state site listings.
#[async_trait]
pub trait SiteDirectory: Send + Sync {
    /// Every state with a listing page, keyed by canonical name.
    async fn fetch_state_index(&self) -> Result<SiteIndex, GatewayError>;

    /// The sites listed at `locator`, in listing order.
    async fn fetch_sites(&self, locator: &str) -> Result<Vec<RawSite>, GatewayError>;
}

/// Source of places around a postal code.
#[async_trait]
pub trait PlacesLookup: Send + Sync {
    async fn fetch_nearby(
        &self,
        postal_code: &str,
        params: &SearchParams,
    ) -> Result<Vec<RawPlace>, GatewayError>;
}

/// Fixed parameters for the radius search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub radius_miles: u32,
    pub max_matches: u32,
    pub ambiguities: Ambiguities,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            radius_miles: 10,
            max_matches: 10,
            ambiguities: Ambiguities::Ignore,
        }
    }
}

/// How the places API should treat an origin that matches several locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ambiguities {
    Ignore,
    Allow,
}

impl Ambiguities {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ambiguities::Ignore => "ignore",
            Ambiguities::Allow => "allow",
        }
    }
}
