use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::LexiconError;

const CARDINAL_YML: &str = include_str!("../../data/cardinal.yml");
const STREET_TYPES_YML: &str = include_str!("../../data/street_types.yml");
const UNITS_YML: &str = include_str!("../../data/units.yml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardinalEntry {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetTypeEntry {
    pub abbr: String,
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEntry {
    pub label: String,
    pub usps: String,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitTables {
    #[serde(default)]
    pub numbered: Vec<UnitEntry>,
    #[serde(default)]
    pub unnumbered: Vec<UnitEntry>,
}

/// Raw, country-independent reference tables. Ordering inside every list is
/// preserved and significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconTables {
    pub cardinals: Vec<CardinalEntry>,
    pub street_types: Vec<StreetTypeEntry>,
    pub units: UnitTables,
}

impl LexiconTables {
    /// The tables compiled into the crate.
    pub fn builtin() -> Result<LexiconTables, LexiconError> {
        LexiconTables::from_yaml(CARDINAL_YML, STREET_TYPES_YML, UNITS_YML)
    }

    pub fn from_yaml(
        cardinals: &str,
        street_types: &str,
        units: &str,
    ) -> Result<LexiconTables, LexiconError> {
        let tables = LexiconTables {
            cardinals: serde_yaml::from_str(cardinals)?,
            street_types: serde_yaml::from_str(street_types)?,
            units: serde_yaml::from_str(units)?,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Loads `cardinal.yml`, `street_types.yml` and `units.yml` from `dir`.
    /// Files missing from the directory fall back to the built-in table.
    pub fn from_dir(dir: &Path) -> Result<LexiconTables, LexiconError> {
        let read = |name: &str, fallback: &'static str| -> Result<String, LexiconError> {
            let path = dir.join(name);
            if path.exists() {
                Ok(fs::read_to_string(path)?)
            } else {
                tracing::debug!("{} not found in {:?}, using built-in table", name, dir);
                Ok(fallback.to_string())
            }
        };
        LexiconTables::from_yaml(
            &read("cardinal.yml", CARDINAL_YML)?,
            &read("street_types.yml", STREET_TYPES_YML)?,
            &read("units.yml", UNITS_YML)?,
        )
    }

    fn validate(&self) -> Result<(), LexiconError> {
        if self.cardinals.is_empty() {
            return Err(malformed("cardinal", "no entries".to_string()));
        }
        for entry in &self.cardinals {
            if entry.name.trim().is_empty() || entry.code.trim().is_empty() {
                return Err(malformed(
                    "cardinal",
                    format!("empty name or code in {:?}", entry),
                ));
            }
        }
        if self.street_types.is_empty() {
            return Err(malformed("street type", "no entries".to_string()));
        }
        for entry in &self.street_types {
            if entry.abbr.trim().is_empty() || entry.names.iter().any(|n| n.trim().is_empty()) {
                return Err(malformed(
                    "street type",
                    format!("empty abbreviation or name in {:?}", entry),
                ));
            }
        }
        for entry in self.units.numbered.iter().chain(&self.units.unnumbered) {
            if entry.label.trim().is_empty() || entry.pattern.trim().is_empty() {
                return Err(malformed(
                    "unit abbreviation",
                    format!("empty label or pattern in {:?}", entry),
                ));
            }
        }
        Ok(())
    }
}

fn malformed(table: &'static str, reason: String) -> LexiconError {
    LexiconError::MalformedTable { table, reason }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builtin_tables_load() {
        let tables = LexiconTables::builtin().unwrap();
        assert_eq!(tables.cardinals.len(), 8);
        assert_eq!(tables.cardinals[0].code, "N");
        assert!(tables.street_types.iter().any(|entry| entry.abbr == "Hwy"));
        assert_eq!(tables.units.numbered[0].label, "Apt");
        assert_eq!(tables.units.unnumbered.last().unwrap().usps, "Uppr");
    }

    #[test]
    fn street_type_without_names() {
        let tables = LexiconTables::from_yaml(
            "- { name: north, code: N }",
            "- { abbr: Row }",
            "numbered: []",
        )
        .unwrap();
        assert!(tables.street_types[0].names.is_empty());
        assert!(tables.units.unnumbered.is_empty());
    }

    #[test]
    fn empty_code_is_malformed() {
        let err = LexiconTables::from_yaml("- { name: north, code: '' }", "- { abbr: St }", "{}")
            .unwrap_err();
        assert!(matches!(
            err,
            LexiconError::MalformedTable {
                table: "cardinal",
                ..
            }
        ));
    }

    #[test]
    fn bad_yaml_is_reported() {
        let err = LexiconTables::from_yaml("north: [", "- { abbr: St }", "{}").unwrap_err();
        assert!(matches!(err, LexiconError::Yaml(_)));
    }
}
