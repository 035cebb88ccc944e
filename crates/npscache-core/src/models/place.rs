use serde::{Deserialize, Serialize};

const NO_CATEGORY: &str = "no category";
const NO_ADDRESS: &str = "no address";
const NO_CITY: &str = "no city";

/// A point of interest near a site, as stored under the site's `nearby` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearbyPlace {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
}

impl NearbyPlace {
    pub fn info(&self) -> String {
        format!("- {} ({}): {}, {}", self.name, self.category, self.address, self.city)
    }
}

/// A radius-search match as returned by the places API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPlace {
    pub name: String,
    pub category: String,
    pub address: String,
    pub city: String,
}

impl RawPlace {
    /// Normalize into the cached shape, replacing empty fields with a
    /// `no <field>` placeholder. The name is kept as given.
    pub fn into_place(self) -> NearbyPlace {
        NearbyPlace {
            name: self.name,
            category: or_placeholder(self.category, NO_CATEGORY),
            address: or_placeholder(self.address, NO_ADDRESS),
            city: or_placeholder(self.city, NO_CITY),
        }
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_get_placeholders() {
        let raw = RawPlace {
            name: "Ranger Station".to_string(),
            category: String::new(),
            address: String::new(),
            city: String::new(),
        };
        let place = raw.into_place();
        assert_eq!(place.name, "Ranger Station");
        assert_eq!(place.category, "no category");
        assert_eq!(place.address, "no address");
        assert_eq!(place.city, "no city");
    }

    #[test]
    fn test_present_fields_are_kept() {
        let raw = RawPlace {
            name: "Keweenaw Brewing".to_string(),
            category: "Eating & Drinking".to_string(),
            address: "408 Shelden Ave".to_string(),
            city: "Houghton".to_string(),
        };
        let place = raw.into_place();
        assert_eq!(
            place.info(),
            "- Keweenaw Brewing (Eating & Drinking): 408 Shelden Ave, Houghton"
        );
    }
}
