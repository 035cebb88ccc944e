use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::NearbyPlace;

/// A state name in canonical form: surrounding whitespace removed, lower-cased.
///
/// Canonicalization happens on construction and on deserialization, so a
/// name read back from disk compares equal to one typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StateName(String);

impl StateName {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for StateName {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for StateName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<StateName> for String {
    fn from(name: StateName) -> Self {
        name.0
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical state name to the locator of that state's site listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteIndex(BTreeMap<StateName, String>);

impl SiteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a locator, canonicalizing the name. Later inserts win.
    pub fn insert(&mut self, name: &str, locator: impl Into<String>) {
        self.0.insert(StateName::new(name), locator.into());
    }

    pub fn locator(&self, state: &StateName) -> Option<&str> {
        self.0.get(state).map(String::as_str)
    }

    pub fn contains(&self, state: &StateName) -> bool {
        self.0.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &StateName> {
        self.0.keys()
    }
}

impl FromIterator<(String, String)> for SiteIndex {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (name, locator) in iter {
            index.insert(&name, locator);
        }
        index
    }
}

/// A national site as stored in the cache.
///
/// The record has no key of its own; it is addressed by its 1-based position
/// in the owning state's list. `nearby` is attached on first detail view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "zipcode", default)]
    pub postal_code: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearby: Option<Vec<NearbyPlace>>,
}

impl SiteRecord {
    /// One-line summary used by the site list.
    pub fn info(&self) -> String {
        format!(
            "{} ({}): {} {}",
            self.name, self.category, self.address, self.postal_code
        )
    }
}

/// A site as pulled off a site page. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSite {
    pub category: Option<String>,
    pub name: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
}

impl RawSite {
    /// Normalize into the cached shape.
    ///
    /// Missing fields become empty strings. The address is `"<locality>, <region>"`
    /// only when both parts are present, otherwise empty.
    pub fn into_record(self) -> SiteRecord {
        let address = match (non_empty(self.locality), non_empty(self.region)) {
            (Some(locality), Some(region)) => format!("{}, {}", locality, region),
            _ => String::new(),
        };

        SiteRecord {
            category: self.category.map(|s| s.trim().to_string()).unwrap_or_default(),
            name: self.name.map(|s| s.trim().to_string()).unwrap_or_default(),
            address,
            postal_code: self.postal_code.map(|s| s.trim().to_string()).unwrap_or_default(),
            phone: self.phone.map(|s| s.trim().to_string()).unwrap_or_default(),
            nearby: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_name_canonicalizes() {
        assert_eq!(StateName::new("  Michigan "), StateName::new("michigan"));
        assert_eq!(StateName::new("NEW YORK").as_str(), "new york");
    }

    #[test]
    fn test_state_name_deserializes_canonical() {
        let name: StateName = serde_json::from_str("\" Ohio\"").unwrap();
        assert_eq!(name.as_str(), "ohio");
    }

    #[test]
    fn test_site_index_lookup_is_case_insensitive() {
        let index: SiteIndex = vec![(
            "Michigan".to_string(),
            "https://www.nps.gov/state/mi/index.htm".to_string(),
        )]
        .into_iter()
        .collect();

        assert!(index.contains(&StateName::new("MICHIGAN")));
        assert_eq!(
            index.locator(&StateName::new(" michigan")),
            Some("https://www.nps.gov/state/mi/index.htm")
        );
        assert!(!index.contains(&StateName::new("atlantis")));
    }

    #[test]
    fn test_raw_site_with_empty_address_and_postal_code() {
        let raw = RawSite {
            category: Some("National Park".to_string()),
            name: Some("Isle Royale".to_string()),
            locality: Some(String::new()),
            region: Some("MI".to_string()),
            postal_code: Some(String::new()),
            phone: Some("(906) 482-0984\n".to_string()),
        };
        let record = raw.into_record();
        assert_eq!(record.address, "");
        assert_eq!(record.postal_code, "");
        assert_eq!(record.phone, "(906) 482-0984");
        assert!(record.nearby.is_none());
    }

    #[test]
    fn test_raw_site_missing_category_is_empty() {
        let raw = RawSite {
            name: Some("Motor Cities".to_string()),
            locality: Some("Detroit".to_string()),
            region: Some("MI".to_string()),
            postal_code: Some("48207 ".to_string()),
            ..Default::default()
        };
        let record = raw.into_record();
        assert_eq!(record.category, "");
        assert_eq!(record.address, "Detroit, MI");
        assert_eq!(record.postal_code, "48207");
        assert_eq!(record.info(), "Motor Cities (): Detroit, MI 48207");
    }

    #[test]
    fn test_site_record_uses_zipcode_key_on_disk() {
        let record = SiteRecord {
            postal_code: "49931".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["zipcode"], "49931");
        assert!(json.get("nearby").is_none());
    }
}
