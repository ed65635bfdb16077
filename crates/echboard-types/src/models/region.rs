//! Region identifiers and the shared region display table

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four fixed ECH markets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionId {
    #[serde(rename = "us_ech")]
    Us,
    #[serde(rename = "eu_ech")]
    Eu,
    #[serde(rename = "asia_ech")]
    Asia,
    #[serde(rename = "china_ech")]
    China,
}

/// Display configuration for a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionInfo {
    pub id: RegionId,
    /// Short label used in table headers ("US", "EU", ...)
    pub label: &'static str,
    /// Chart color as a hex string
    pub color: &'static str,
}

/// Region display table, in canonical order.
///
/// Every view reads labels and colors from here instead of redeclaring them.
pub const REGIONS: [RegionInfo; 4] = [
    RegionInfo {
        id: RegionId::Us,
        label: "US",
        color: "#3b82f6",
    },
    RegionInfo {
        id: RegionId::Eu,
        label: "EU",
        color: "#10b981",
    },
    RegionInfo {
        id: RegionId::Asia,
        label: "Asia",
        color: "#f59e0b",
    },
    RegionInfo {
        id: RegionId::China,
        label: "China",
        color: "#ef4444",
    },
];

impl RegionId {
    /// All regions in canonical order
    pub const ALL: [RegionId; 4] = [RegionId::Us, RegionId::Eu, RegionId::Asia, RegionId::China];

    /// Wire identifier (`us_ech`, `eu_ech`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionId::Us => "us_ech",
            RegionId::Eu => "eu_ech",
            RegionId::Asia => "asia_ech",
            RegionId::China => "china_ech",
        }
    }

    /// Position in canonical order (0-3)
    pub fn index(&self) -> usize {
        match self {
            RegionId::Us => 0,
            RegionId::Eu => 1,
            RegionId::Asia => 2,
            RegionId::China => 3,
        }
    }

    pub fn info(&self) -> &'static RegionInfo {
        &REGIONS[self.index()]
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn color(&self) -> &'static str {
        self.info().color
    }

    /// Match a scenario's short region tag ("us", "eu", "asia", "china").
    ///
    /// `"all"` is handled by the caller.
    pub fn from_short_tag(tag: &str) -> Option<Self> {
        match tag {
            "us" => Some(RegionId::Us),
            "eu" => Some(RegionId::Eu),
            "asia" => Some(RegionId::Asia),
            "china" => Some(RegionId::China),
            _ => None,
        }
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four wire identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegion(pub String);

impl fmt::Display for UnknownRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown region '{}'", self.0)
    }
}

impl std::error::Error for UnknownRegion {}

impl FromStr for RegionId {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegionId::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_round_trips_through_wire_name() {
        for region in RegionId::ALL {
            assert_eq!(region.as_str().parse::<RegionId>(), Ok(region));
        }
        assert!("glycerin".parse::<RegionId>().is_err());
    }

    #[test]
    fn test_region_table_is_in_canonical_order() {
        for (i, info) in REGIONS.iter().enumerate() {
            assert_eq!(info.id.index(), i);
        }
        assert_eq!(RegionId::Eu.label(), "EU");
    }

    #[test]
    fn test_region_serde_uses_wire_names() {
        let json = serde_json::to_string(&RegionId::China).unwrap();
        assert_eq!(json, "\"china_ech\"");
        let back: RegionId = serde_json::from_str("\"asia_ech\"").unwrap();
        assert_eq!(back, RegionId::Asia);
    }

    #[test]
    fn test_short_tags() {
        assert_eq!(RegionId::from_short_tag("eu"), Some(RegionId::Eu));
        assert_eq!(RegionId::from_short_tag("all"), None);
    }
}
