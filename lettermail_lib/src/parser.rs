use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::{
    address::Address,
    error::{Error, LexiconError},
    field::{Field, ParsedFields},
    grammar::Grammar,
    lexicon::{BuiltinCountries, Country, CountryRegistry, Lexicon, LexiconTables},
    normalize::Normalizer,
    options::{ParseFlags, ParseMode, ParseOptions},
    tokenizer,
};

/// Builds each country's grammar at most once and shares it afterwards.
#[derive(Default)]
pub struct GrammarCache {
    cells: Mutex<HashMap<String, Arc<OnceCell<Arc<Grammar>>>>>,
}

impl GrammarCache {
    pub fn new() -> GrammarCache {
        GrammarCache::default()
    }

    pub fn get_or_try_init<F>(&self, code: &str, init: F) -> Result<Arc<Grammar>, Error>
    where
        F: FnOnce() -> Result<Grammar, Error>,
    {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            cells.entry(code.to_string()).or_default().clone()
        };
        cell.get_or_try_init(|| init().map(Arc::new)).cloned()
    }

    pub fn len(&self) -> usize {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses free-form address strings.
pub struct AddressParser {
    tables: LexiconTables,
    registry: Box<dyn CountryRegistry>,
    cache: GrammarCache,
}

impl AddressParser {
    /// A parser over the built-in tables and country registry.
    pub fn new() -> Result<AddressParser, Error> {
        Ok(AddressParser::with_sources(
            LexiconTables::builtin()?,
            Box::new(BuiltinCountries::new()?),
        ))
    }

    pub fn with_sources(tables: LexiconTables, registry: Box<dyn CountryRegistry>) -> AddressParser {
        AddressParser {
            tables,
            registry,
            cache: GrammarCache::new(),
        }
    }

    pub fn cached_grammars(&self) -> usize {
        self.cache.len()
    }

    /// The grammar for `country`. A country unknown to the registry gets a
    /// lexicon without subdivisions.
    pub fn grammar(&self, country: &str) -> Result<Arc<Grammar>, Error> {
        let code = country.trim().to_ascii_uppercase();
        self.cache.get_or_try_init(&code, || {
            let lexicon = match Lexicon::for_country(&self.tables, self.registry.as_ref(), &code) {
                Ok(lexicon) => lexicon,
                Err(LexiconError::UnknownCountry(code)) => {
                    warn!("unknown country {:?}, states will be left as written", code);
                    Lexicon::new(&self.tables, Country::unknown(&code))?
                }
                Err(err) => return Err(err.into()),
            };
            debug!("building grammar for {}", code);
            Ok(Grammar::new(Arc::new(lexicon))?)
        })
    }

    /// Parses `address`, trying every grammar that applies. Table or grammar
    /// construction problems are logged and yield `None`.
    pub fn parse(&self, address: &str, options: &ParseOptions) -> Option<Address> {
        self.parse_as(address, ParseMode::Any, options)
    }

    pub fn parse_as(&self, address: &str, mode: ParseMode, options: &ParseOptions) -> Option<Address> {
        match self.try_parse_as(address, mode, options) {
            Ok(address) => address,
            Err(err) => {
                warn!("could not prepare grammar for {}: {}", options.country, err);
                None
            }
        }
    }

    pub fn try_parse(&self, address: &str, options: &ParseOptions) -> Result<Option<Address>, Error> {
        self.try_parse_as(address, ParseMode::Any, options)
    }

    pub fn try_parse_as(
        &self,
        address: &str,
        mode: ParseMode,
        options: &ParseOptions,
    ) -> Result<Option<Address>, Error> {
        let grammar = self.grammar(&options.country)?;
        let sanitized = match tokenizer::sanitize(
            address,
            options.flags.contains(ParseFlags::TRANSLITERATE),
        ) {
            Some(sanitized) => sanitized,
            None => return Ok(None),
        };

        let fields = match mode {
            ParseMode::Any => {
                if grammar.has_corner(&sanitized) {
                    debug!("corner token found, parsing {:?} as an intersection", sanitized);
                    intersectional(&grammar, &sanitized)
                } else {
                    formal(&grammar, &sanitized).or_else(|| informal(&grammar, &sanitized))
                }
            }
            ParseMode::Formal => formal(&grammar, &sanitized),
            ParseMode::Informal => informal(&grammar, &sanitized),
            ParseMode::Intersectional => intersectional(&grammar, &sanitized),
        };
        let fields = match fields {
            Some(fields) => fields,
            None => {
                debug!("no grammar matched {:?}", sanitized);
                return Ok(None);
            }
        };

        let fields = Normalizer::new(&grammar, options).run(fields);
        if fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(Address::new(
            fields,
            grammar.lexicon().country().clone(),
        )))
    }
}

fn formal(grammar: &Grammar, text: &str) -> Option<ParsedFields> {
    grammar.formal().fields(text)
}

fn informal(grammar: &Grammar, text: &str) -> Option<ParsedFields> {
    grammar
        .informal()
        .fields(text)
        .or_else(|| grammar.informal_unnumbered().fields(text))
}

fn intersectional(grammar: &Grammar, text: &str) -> Option<ParsedFields> {
    let mut fields = grammar.intersectional().fields(text)?;
    collapse_plural_type(grammar, &mut fields);
    Some(fields)
}

/// "Mission and Valencia Streets": a plural type names both streets.
fn collapse_plural_type(grammar: &Grammar, fields: &mut ParsedFields) {
    let street_type = match (fields.get(Field::StreetType), fields.get(Field::StreetType2)) {
        (Some(first), Some(second)) if first == second => first,
        (Some(first), None) => first,
        (None, Some(second)) => second,
        _ => return,
    };
    let trimmed = street_type.trim_end_matches(|ch: char| !ch.is_alphanumeric() && ch != '_');
    let singular = match trimmed
        .strip_suffix('s')
        .or_else(|| trimmed.strip_suffix('S'))
    {
        Some(singular) if !singular.is_empty() => singular.to_string(),
        _ => return,
    };
    if grammar.lexicon().is_street_type_token(&singular) {
        fields.set(Field::StreetType, singular.clone());
        fields.set(Field::StreetType2, singular);
    }
}
