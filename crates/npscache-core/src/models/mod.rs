//! Data models for park sites and nearby places.
//!
//! - `StateName`, `SiteIndex`: canonical state keys and their listing locators
//! - `SiteRecord`, `RawSite`: a national site, normalized and as extracted
//! - `NearbyPlace`, `RawPlace`: a point of interest, normalized and as returned

pub mod place;
pub mod site;

pub use place::{NearbyPlace, RawPlace};
pub use site::{RawSite, SiteIndex, SiteRecord, StateName};
