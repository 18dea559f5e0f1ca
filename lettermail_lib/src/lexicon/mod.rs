pub mod registry;
pub mod tables;

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use fst::{Set, SetBuilder};
use regex::{Regex, RegexBuilder};

use crate::{error::LexiconError, options::UnitLabels};

pub use self::registry::{BuiltinCountries, Country, CountryRegistry, Subdivision};
pub use self::tables::{CardinalEntry, LexiconTables, StreetTypeEntry, UnitEntry, UnitTables};

/// A unit designator with its compiled, anchored matcher.
#[derive(Debug, Clone)]
pub struct UnitAbbreviation {
    pub label: String,
    pub usps: String,
    pub pattern: String,
    matcher: Regex,
}

impl UnitAbbreviation {
    fn compile(entry: &UnitEntry) -> Result<UnitAbbreviation, LexiconError> {
        let matcher = RegexBuilder::new(&format!(r"\A(?:{})\z", entry.pattern))
            .case_insensitive(true)
            .build()
            .map_err(|source| LexiconError::InvalidUnitPattern {
                label: entry.label.clone(),
                source,
            })?;
        Ok(UnitAbbreviation {
            label: entry.label.clone(),
            usps: entry.usps.clone(),
            pattern: entry.pattern.clone(),
            matcher,
        })
    }

    /// True when the whole of `value` is a spelling of this designator.
    pub fn matches(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }

    pub fn canonical(&self, labels: UnitLabels) -> &str {
        match labels {
            UnitLabels::Descriptive => &self.label,
            UnitLabels::Usps => &self.usps,
        }
    }
}

/// Country specific lookup tables. Immutable once built; every key is
/// lower-cased so lookups are case-insensitive.
#[derive(Debug)]
pub struct Lexicon {
    country: Arc<Country>,
    cardinals: Vec<CardinalEntry>,
    cardinal_types: HashMap<String, String>,
    cardinal_codes: HashMap<String, String>,
    street_types: HashMap<String, String>,
    street_type_tokens: Set<Vec<u8>>,
    street_type_matchers: HashMap<String, Regex>,
    subdivision_names: HashMap<String, String>,
    subdivision_codes: HashMap<String, String>,
    units_numbered: Vec<UnitAbbreviation>,
    units_unnumbered: Vec<UnitAbbreviation>,
}

impl Lexicon {
    /// Builds the lexicon for `alpha2`, failing with `UnknownCountry` when the
    /// registry has no metadata for it.
    pub fn for_country(
        tables: &LexiconTables,
        registry: &dyn CountryRegistry,
        alpha2: &str,
    ) -> Result<Lexicon, LexiconError> {
        let country = registry
            .lookup(alpha2)
            .ok_or_else(|| LexiconError::UnknownCountry(alpha2.to_string()))?;
        Lexicon::new(tables, country)
    }

    pub fn new(tables: &LexiconTables, country: Country) -> Result<Lexicon, LexiconError> {
        let mut cardinal_types = HashMap::new();
        let mut cardinal_codes = HashMap::new();
        for entry in &tables.cardinals {
            let name = entry.name.to_lowercase();
            let code = entry.code.to_uppercase();
            cardinal_types.insert(name.clone(), code.clone());
            cardinal_codes.insert(code, name);
        }

        let mut street_types: HashMap<String, String> = HashMap::new();
        let mut street_type_matchers = HashMap::new();
        for entry in &tables.street_types {
            let mut synonyms = vec![entry.abbr.to_lowercase()];
            synonyms.extend(entry.names.iter().map(|name| name.to_lowercase()));
            for synonym in &synonyms {
                street_types
                    .entry(synonym.clone())
                    .or_insert_with(|| entry.abbr.clone());
            }
            let matcher = RegexBuilder::new(&format!(r"\b{}\b", alternation(synonyms.iter())))
                .case_insensitive(true)
                .build()
                .map_err(|err| LexiconError::MalformedTable {
                    table: "street type",
                    reason: err.to_string(),
                })?;
            street_type_matchers
                .entry(entry.abbr.to_lowercase())
                .or_insert(matcher);
        }

        let sorted_tokens: BTreeSet<&String> = street_types.keys().collect();
        let mut builder = SetBuilder::memory();
        for token in sorted_tokens {
            builder.insert(token)?;
        }
        let street_type_tokens = builder.into_set();

        let mut subdivision_names = HashMap::new();
        let mut subdivision_codes = HashMap::new();
        for sub in &country.subdivisions {
            subdivision_names.insert(sub.name.to_lowercase(), sub.code.clone());
            subdivision_codes.insert(sub.code.to_uppercase(), sub.name.clone());
        }
        if subdivision_names.is_empty() {
            tracing::warn!(
                "no subdivisions known for {}, states will not be normalized",
                country.alpha2
            );
        }

        let units_numbered = tables
            .units
            .numbered
            .iter()
            .map(UnitAbbreviation::compile)
            .collect::<Result<Vec<_>, _>>()?;
        let units_unnumbered = tables
            .units
            .unnumbered
            .iter()
            .map(UnitAbbreviation::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Lexicon {
            country: Arc::new(country),
            cardinals: tables.cardinals.clone(),
            cardinal_types,
            cardinal_codes,
            street_types,
            street_type_tokens,
            street_type_matchers,
            subdivision_names,
            subdivision_codes,
            units_numbered,
            units_unnumbered,
        })
    }

    pub fn country(&self) -> &Arc<Country> {
        &self.country
    }

    pub fn cardinals(&self) -> &[CardinalEntry] {
        &self.cardinals
    }

    /// "northwest" -> "NW"
    pub fn cardinal_type(&self, name: &str) -> Option<&str> {
        self.cardinal_types
            .get(&name.to_lowercase())
            .map(|code| code.as_str())
    }

    /// "NW" -> "northwest"
    pub fn cardinal_name(&self, code: &str) -> Option<&str> {
        self.cardinal_codes
            .get(&code.to_uppercase())
            .map(|name| name.as_str())
    }

    /// "avenue" -> "Ave"
    pub fn street_type(&self, token: &str) -> Option<&str> {
        self.street_types
            .get(&token.to_lowercase())
            .map(|abbr| abbr.as_str())
    }

    /// Exact membership test against every known street type spelling.
    pub fn is_street_type_token(&self, token: &str) -> bool {
        self.street_type_tokens.contains(token.to_lowercase())
    }

    pub fn street_type_tokens(&self) -> impl Iterator<Item = &str> {
        self.street_types.keys().map(|token| token.as_str())
    }

    /// Word-bounded matcher over the abbreviation `abbr` and all its synonyms.
    pub fn street_type_matcher(&self, abbr: &str) -> Option<&Regex> {
        self.street_type_matchers.get(&abbr.to_lowercase())
    }

    /// "california" -> "CA"
    pub fn subdivision_code(&self, name: &str) -> Option<&str> {
        self.subdivision_names
            .get(&name.to_lowercase())
            .map(|code| code.as_str())
    }

    /// "CA" -> "California"
    pub fn subdivision_name(&self, code: &str) -> Option<&str> {
        self.subdivision_codes
            .get(&code.to_uppercase())
            .map(|name| name.as_str())
    }

    /// Codes and names of every subdivision, in no particular order.
    pub fn subdivision_tokens(&self) -> impl Iterator<Item = &str> {
        self.subdivision_codes
            .keys()
            .chain(self.subdivision_codes.values())
            .map(|token| token.as_str())
    }

    pub fn units_numbered(&self) -> &[UnitAbbreviation] {
        &self.units_numbered
    }

    pub fn units_unnumbered(&self) -> &[UnitAbbreviation] {
        &self.units_unnumbered
    }
}

/// Escaped, longest-first alternation of `tokens`, wrapped in a
/// non-capturing group. An empty token list yields a group that never
/// matches.
pub(crate) fn alternation<'a, I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    let mut tokens: Vec<&str> = tokens.into_iter().map(|token| token.as_ref()).collect();
    if tokens.is_empty() {
        return r"(?:\b\B)".to_string();
    }
    tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    tokens.dedup();
    let escaped: Vec<String> = tokens.into_iter().map(regex::escape).collect();
    format!("(?:{})", escaped.join("|"))
}
