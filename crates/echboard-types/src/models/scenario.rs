//! Scenario catalog served by `GET /api/scenarios`

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::region::RegionId;

/// A market scenario that can be simulated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u32,
    pub name: String,
    /// Category tag (`demand`, `supply`, `regulatory`, ...)
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Short region tags (`us`, `eu`, `asia`, `china`) or `all`
    #[serde(default)]
    pub affected_regions: Vec<String>,
    /// Default parameter values, overridable per simulation
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
    /// Name of the server-side effect model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
    /// Free-form formula documentation for the info popup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub math_info: Option<serde_json::Value>,
}

impl Scenario {
    /// Regions named by `affected_regions`, with `all` expanded
    pub fn affected(&self) -> BTreeSet<RegionId> {
        affected_set(&self.affected_regions)
    }
}

/// Expand a list of short region tags into region ids
pub fn affected_set(tags: &[String]) -> BTreeSet<RegionId> {
    if tags.iter().any(|t| t == "all") {
        return RegionId::ALL.into_iter().collect();
    }
    tags.iter()
        .filter_map(|t| RegionId::from_short_tag(t))
        .collect()
}

/// Response of `GET /api/scenarios`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    pub fn get(&self, id: u32) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> BTreeSet<&str> {
        self.scenarios.iter().map(|s| s.category.as_str()).collect()
    }
}

/// Response of `GET /api/categories`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub counts: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affected_all_expands_to_every_region() {
        let tags = vec!["all".to_string()];
        assert_eq!(affected_set(&tags).len(), 4);
    }

    #[test]
    fn test_affected_skips_unknown_tags() {
        let tags = vec!["eu".to_string(), "mars".to_string(), "us".to_string()];
        let set = affected_set(&tags);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![RegionId::Us, RegionId::Eu]);
    }

    #[test]
    fn test_catalog_decodes_server_payload() {
        let json = r#"{
            "count": 1,
            "scenarios": [{
                "id": 6,
                "name": "EU Regulatory Tightening",
                "category": "regulatory",
                "description": "REACH compliance costs",
                "affected_regions": ["eu"],
                "parameters": {"supply_reduction": 0.15, "duration_months": 12},
                "logic": "eu_regulatory",
                "math_info": {"title": "EU model"}
            }]
        }"#;

        let catalog: ScenarioCatalog = serde_json::from_str(json).unwrap();
        let scenario = catalog.get(6).unwrap();
        assert_eq!(scenario.parameters["duration_months"], 12.0);
        assert!(scenario.affected().contains(&RegionId::Eu));
        assert!(catalog.categories().contains("regulatory"));
    }
}
