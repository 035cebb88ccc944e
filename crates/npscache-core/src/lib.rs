//! Core library for npscache.
//!
//! Browses national park sites by state and looks up places near a chosen
//! site. Every remote lookup goes through a persistent on-disk cache so a
//! path that was visited once is served locally from then on.
//!
//! - [`cache`]: the flat keyed cache document and its typed keys
//! - [`api`]: gateway traits plus the NPS and MapQuest clients
//! - [`resolver`]: cache-or-fetch decisions for each navigation level
//! - [`session`]: the three-screen state machine driven by text input

pub mod api;
pub mod cache;
pub mod models;
pub mod resolver;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{GatewayError, MapQuestClient, NpsClient, PlacesLookup, SearchParams, SiteDirectory};
pub use cache::{CacheError, CacheStore, LoadStatus};
pub use models::{NearbyPlace, SiteIndex, SiteRecord, StateName};
pub use resolver::{ResolveError, Resolved, Resolver, Source};
pub use session::{Screen, Session, Transition};
