use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LexiconError;

const COUNTRIES_YML: &str = include_str!("../../data/countries.yml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdivision {
    pub code: String,
    pub name: String,
}

/// Country metadata used to interpret the `state` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Country {
    pub alpha2: String,
    pub name: String,
    pub subdivisions: Vec<Subdivision>,
}

impl Country {
    /// Placeholder metadata for a code the registry does not know.
    pub fn unknown(alpha2: &str) -> Country {
        Country {
            alpha2: alpha2.to_string(),
            name: alpha2.to_string(),
            subdivisions: Vec::new(),
        }
    }
}

/// Source of country and subdivision metadata.
pub trait CountryRegistry: Send + Sync {
    fn lookup(&self, alpha2: &str) -> Option<Country>;
}

#[derive(Deserialize)]
struct CountryRecord {
    name: String,
    #[serde(default)]
    subdivisions: Vec<Subdivision>,
}

/// Registry backed by `countries.yml`.
#[derive(Debug, Clone)]
pub struct BuiltinCountries {
    countries: HashMap<String, Country>,
}

impl BuiltinCountries {
    pub fn new() -> Result<BuiltinCountries, LexiconError> {
        BuiltinCountries::from_yaml(COUNTRIES_YML)
    }

    pub fn from_yaml(yaml: &str) -> Result<BuiltinCountries, LexiconError> {
        let records: HashMap<String, CountryRecord> = serde_yaml::from_str(yaml)?;
        let countries = records
            .into_iter()
            .map(|(alpha2, record)| {
                let alpha2 = alpha2.to_ascii_uppercase();
                let country = Country {
                    alpha2: alpha2.clone(),
                    name: record.name,
                    subdivisions: record.subdivisions,
                };
                (alpha2, country)
            })
            .collect();
        Ok(BuiltinCountries { countries })
    }

    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.countries.keys().map(|code| code.as_str()).collect();
        codes.sort_unstable();
        codes
    }
}

impl CountryRegistry for BuiltinCountries {
    fn lookup(&self, alpha2: &str) -> Option<Country> {
        self.countries.get(&alpha2.to_ascii_uppercase()).cloned()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = BuiltinCountries::new().unwrap();
        let us = registry.lookup("us").unwrap();
        assert_eq!(us.name, "United States");
        assert!(us
            .subdivisions
            .iter()
            .any(|sub| sub.code == "CA" && sub.name == "California"));
        assert_eq!(registry.codes(), vec!["CA", "US"]);
    }

    #[test]
    fn unknown_country() {
        let registry = BuiltinCountries::new().unwrap();
        assert!(registry.lookup("ZZ").is_none());
        let country = Country::unknown("ZZ");
        assert!(country.subdivisions.is_empty());
    }
}
