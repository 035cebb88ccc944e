//! Cache-or-fetch resolution for the three navigation levels.
//!
//! The resolver keeps no state of its own between calls. Every decision is
//! made by reading the `CacheStore` passed in, and every fetched result is
//! normalized and written back to it before being returned. A failed fetch
//! writes nothing.

use thiserror::Error;
use tracing::{debug, info};

use crate::api::{GatewayError, PlacesLookup, SearchParams, SiteDirectory};
use crate::cache::CacheStore;
use crate::models::{NearbyPlace, RawPlace, RawSite, SiteIndex, SiteRecord, StateName};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Unknown state: {0}")]
    UnknownState(StateName),

    #[error("Sites for {0} have not been resolved yet")]
    SitesNotResolved(StateName),

    #[error("Site {ordinal} is out of range (1-{len})")]
    OrdinalOutOfRange { ordinal: usize, len: usize },

    #[error("Gateway unavailable: {0}")]
    Gateway(#[from] GatewayError),
}

/// Whether a value came from the cache or a fresh fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Fetched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Resolved<T> {
    fn cached(value: T) -> Self {
        Self {
            value,
            source: Source::Cache,
        }
    }

    fn fetched(value: T) -> Self {
        Self {
            value,
            source: Source::Fetched,
        }
    }
}

pub struct Resolver<D, P> {
    directory: D,
    places: P,
    search: SearchParams,
}

impl<D: SiteDirectory, P: PlacesLookup> Resolver<D, P> {
    pub fn new(directory: D, places: P, search: SearchParams) -> Self {
        Self {
            directory,
            places,
            search,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn places(&self) -> &P {
        &self.places
    }

    /// The state index, fetched at most once per cache lifetime.
    pub async fn state_index(
        &self,
        store: &mut CacheStore,
    ) -> Result<Resolved<SiteIndex>, ResolveError> {
        if let Some(index) = store.state_index() {
            debug!(states = index.len(), "State index from cache");
            return Ok(Resolved::cached(index.clone()));
        }

        info!("Fetching state index");
        let index = self.directory.fetch_state_index().await?;
        store.set_state_index(index.clone());
        Ok(Resolved::fetched(index))
    }

    /// The ordered sites for `state`, including any nearby places already attached.
    ///
    /// An empty cached list counts as a miss and is fetched again.
    pub async fn sites(
        &self,
        store: &mut CacheStore,
        state: &StateName,
    ) -> Result<Resolved<Vec<SiteRecord>>, ResolveError> {
        if let Some(sites) = store.sites(state).filter(|sites| !sites.is_empty()) {
            debug!(%state, sites = sites.len(), "Sites from cache");
            return Ok(Resolved::cached(sites.to_vec()));
        }

        let index = self.state_index(store).await?.value;
        let locator = index
            .locator(state)
            .ok_or_else(|| ResolveError::UnknownState(state.clone()))?;

        info!(%state, locator, "Fetching sites");
        let sites: Vec<SiteRecord> = self
            .directory
            .fetch_sites(locator)
            .await?
            .into_iter()
            .map(RawSite::into_record)
            .collect();

        store.set_sites(state.clone(), sites.clone());
        Ok(Resolved::fetched(sites))
    }

    /// Nearby places for the site at 1-based `ordinal` within `state`.
    ///
    /// The state's sites must already be in the store; this never fetches
    /// them as a side effect. Results are attached to the site in place; an
    /// empty attached list counts as a miss and is fetched again.
    pub async fn nearby(
        &self,
        store: &mut CacheStore,
        state: &StateName,
        ordinal: usize,
    ) -> Result<Resolved<Vec<NearbyPlace>>, ResolveError> {
        let site = Self::site_at(store, state, ordinal)?;
        if let Some(nearby) = site.nearby.as_ref().filter(|nearby| !nearby.is_empty()) {
            debug!(%state, ordinal, places = nearby.len(), "Nearby places from cache");
            return Ok(Resolved::cached(nearby.clone()));
        }

        let postal_code = site.postal_code.clone();
        info!(%state, ordinal, %postal_code, "Fetching nearby places");
        let places: Vec<NearbyPlace> = self
            .places
            .fetch_nearby(&postal_code, &self.search)
            .await?
            .into_iter()
            .map(RawPlace::into_place)
            .collect();

        let sites = store
            .sites_mut(state)
            .ok_or_else(|| ResolveError::SitesNotResolved(state.clone()))?;
        let len = sites.len();
        let site = sites
            .get_mut(ordinal - 1)
            .ok_or(ResolveError::OrdinalOutOfRange { ordinal, len })?;
        site.nearby = Some(places.clone());

        Ok(Resolved::fetched(places))
    }

    fn site_at<'s>(
        store: &'s CacheStore,
        state: &StateName,
        ordinal: usize,
    ) -> Result<&'s SiteRecord, ResolveError> {
        let sites = store
            .sites(state)
            .ok_or_else(|| ResolveError::SitesNotResolved(state.clone()))?;
        ordinal
            .checked_sub(1)
            .and_then(|i| sites.get(i))
            .ok_or(ResolveError::OrdinalOutOfRange {
                ordinal,
                len: sites.len(),
            })
    }
}
