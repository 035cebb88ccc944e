//! In-memory gateways that count their calls.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{GatewayError, PlacesLookup, SearchParams, SiteDirectory};
use crate::models::{RawPlace, RawSite, SiteIndex};

pub fn michigan_index() -> SiteIndex {
    let mut index = SiteIndex::new();
    index.insert("Michigan", "loc:mi");
    index.insert("Wyoming", "loc:wy");
    index
}

fn michigan_sites() -> Vec<RawSite> {
    vec![
        RawSite {
            category: Some("National Park".to_string()),
            name: Some("Isle Royale".to_string()),
            locality: Some("Houghton".to_string()),
            region: Some("MI".to_string()),
            postal_code: Some("49931".to_string()),
            phone: Some("(906) 482-0984".to_string()),
        },
        RawSite {
            category: None,
            name: Some("North Country".to_string()),
            locality: Some(String::new()),
            region: None,
            postal_code: Some(String::new()),
            phone: Some("(616) 319-7906".to_string()),
        },
    ]
}

fn unavailable() -> GatewayError {
    GatewayError::ServerError("unavailable".to_string())
}

#[derive(Default)]
pub struct FakeDirectory {
    index: SiteIndex,
    index_calls: AtomicUsize,
    sites_calls: AtomicUsize,
    fail_index: AtomicBool,
    fail_sites: AtomicBool,
    last_locator: Mutex<Option<String>>,
}

impl FakeDirectory {
    pub fn michigan() -> Self {
        Self {
            index: michigan_index(),
            ..Default::default()
        }
    }

    pub fn index_calls(&self) -> usize {
        self.index_calls.load(Ordering::SeqCst)
    }

    pub fn sites_calls(&self) -> usize {
        self.sites_calls.load(Ordering::SeqCst)
    }

    pub fn fail_index(&self, fail: bool) {
        self.fail_index.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sites(&self, fail: bool) {
        self.fail_sites.store(fail, Ordering::SeqCst);
    }

    pub fn last_locator(&self) -> Option<String> {
        self.last_locator.lock().unwrap().clone()
    }
}

#[async_trait]
impl SiteDirectory for FakeDirectory {
    async fn fetch_state_index(&self) -> Result<SiteIndex, GatewayError> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_index.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.index.clone())
    }

    async fn fetch_sites(&self, locator: &str) -> Result<Vec<RawSite>, GatewayError> {
        self.sites_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_locator.lock().unwrap() = Some(locator.to_string());
        if self.fail_sites.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(michigan_sites())
    }
}

#[derive(Default)]
pub struct FakePlaces {
    calls: AtomicUsize,
    fail: AtomicBool,
    empty: AtomicBool,
    last_origin: Mutex<Option<String>>,
}

impl FakePlaces {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn return_empty(&self, empty: bool) {
        self.empty.store(empty, Ordering::SeqCst);
    }

    pub fn last_origin(&self) -> Option<String> {
        self.last_origin.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlacesLookup for FakePlaces {
    async fn fetch_nearby(
        &self,
        postal_code: &str,
        _params: &SearchParams,
    ) -> Result<Vec<RawPlace>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_origin.lock().unwrap() = Some(postal_code.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        if self.empty.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        Ok(vec![
            RawPlace {
                name: "Keweenaw Brewing".to_string(),
                category: "Eating & Drinking".to_string(),
                address: "408 Shelden Ave".to_string(),
                city: "Houghton".to_string(),
            },
            RawPlace {
                name: "Harbor".to_string(),
                ..Default::default()
            },
        ])
    }
}
