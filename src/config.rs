use crate::error::{ExpenseSplitError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Columns every input table must carry, before the per-party salary columns.
pub const BASE_REQUIRED_COLUMNS: [&str; 7] = [
    "for_month",
    "for_year",
    "type",
    "name",
    "amount",
    "units",
    "split_type",
];

pub const DEFAULT_PERSONAL_CATEGORY: &str = "personal";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct PartyConfig {
    #[schemars(
        description = "Column prefix for this party, e.g. 'guillem' reads guillem_salary, guillem_bonus, guillem_amount and guillem_ratio"
    )]
    pub id: String,

    #[schemars(description = "Human readable name used in chart column headers")]
    pub display_name: String,
}

impl PartyConfig {
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    pub fn salary_column(&self) -> String {
        format!("{}_salary", self.id)
    }

    pub fn bonus_column(&self) -> String {
        format!("{}_bonus", self.id)
    }

    pub fn amount_column(&self) -> String {
        format!("{}_amount", self.id)
    }

    pub fn ratio_column(&self) -> String {
        format!("{}_ratio", self.id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CoercionPolicy {
    #[schemars(
        description = "Unparseable amount, units or salary cells abort preprocessing with one issue per offending cell"
    )]
    #[default]
    Reject,

    #[schemars(description = "Unparseable required numeric cells are treated as 0")]
    ZeroFill,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct EngineConfig {
    #[schemars(description = "Ordered list of parties sharing the household costs")]
    pub parties: Vec<PartyConfig>,

    #[serde(default = "default_personal_category")]
    #[schemars(
        description = "Value of the 'type' column marking an expense as personal; every other value is shared"
    )]
    pub personal_category: String,

    #[serde(default)]
    #[schemars(description = "How unparseable required numeric cells are handled")]
    pub coercion: CoercionPolicy,
}

fn default_personal_category() -> String {
    DEFAULT_PERSONAL_CATEGORY.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parties: vec![
                PartyConfig::new("guillem", "Guillem"),
                PartyConfig::new("vero", "Vero"),
            ],
            personal_category: default_personal_category(),
            coercion: CoercionPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.parties.is_empty() {
            return Err(ExpenseSplitError::InvalidConfig(
                "at least one party is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut seen_names = HashSet::new();
        for party in &self.parties {
            if party.id.trim().is_empty() {
                return Err(ExpenseSplitError::InvalidConfig(
                    "party id must not be blank".to_string(),
                ));
            }
            if !seen.insert(party.id.as_str()) {
                return Err(ExpenseSplitError::InvalidConfig(format!(
                    "duplicate party id '{}'",
                    party.id
                )));
            }
            // Chart columns are keyed by display name.
            if !seen_names.insert(party.display_name.as_str()) {
                return Err(ExpenseSplitError::InvalidConfig(format!(
                    "duplicate party display name '{}'",
                    party.display_name
                )));
            }
        }

        if self.personal_category.trim().is_empty() {
            return Err(ExpenseSplitError::InvalidConfig(
                "personal category must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    pub fn required_columns(&self) -> Vec<String> {
        BASE_REQUIRED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.parties.iter().map(PartyConfig::salary_column))
            .collect()
    }

    pub fn is_personal(&self, category: &str) -> bool {
        category == self.personal_category
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(EngineConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_required_columns() {
        let config = EngineConfig::default();
        assert_eq!(
            config.required_columns(),
            vec![
                "for_month",
                "for_year",
                "type",
                "name",
                "amount",
                "units",
                "split_type",
                "guillem_salary",
                "vero_salary"
            ]
        );
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let json = r#"{
            "parties": [
                {"id": "alex", "display_name": "Alex"},
                {"id": "sam", "display_name": "Sam"}
            ]
        }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(config.personal_category, "personal");
        assert_eq!(config.coercion, CoercionPolicy::Reject);
        assert_eq!(config.parties[1].ratio_column(), "sam_ratio");
    }

    #[test]
    fn test_coercion_policy_snake_case() {
        let json = r#"{
            "parties": [{"id": "alex", "display_name": "Alex"}],
            "coercion": "zero_fill"
        }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(config.coercion, CoercionPolicy::ZeroFill);
    }

    #[test]
    fn test_validate_rejects_duplicates_and_empty() {
        let mut config = EngineConfig::default();
        config.parties.push(PartyConfig::new("vero", "Vero again"));
        assert!(matches!(
            config.validate(),
            Err(ExpenseSplitError::InvalidConfig(_))
        ));

        let empty = EngineConfig {
            parties: vec![],
            ..EngineConfig::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_display_names() {
        let config = EngineConfig {
            parties: vec![PartyConfig::new("alex", "Alex"), PartyConfig::new("alex2", "Alex")],
            ..EngineConfig::default()
        };
        match config.validate() {
            Err(ExpenseSplitError::InvalidConfig(msg)) => assert!(msg.contains("display name")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = EngineConfig::schema_as_json().unwrap();
        assert!(schema_json.contains("parties"));
        assert!(schema_json.contains("personal_category"));
        assert!(schema_json.contains("zero_fill"));
    }
}
