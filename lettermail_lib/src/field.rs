use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A named component of a parsed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Number,
    Prefix,
    Street,
    StreetType,
    Suffix,
    UnitPrefix,
    Unit,
    City,
    State,
    PostalCode,
    PostalCodeExt,
    Prefix2,
    Street2,
    StreetType2,
    Suffix2,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::Number,
        Field::Prefix,
        Field::Street,
        Field::StreetType,
        Field::Suffix,
        Field::UnitPrefix,
        Field::Unit,
        Field::City,
        Field::State,
        Field::PostalCode,
        Field::PostalCodeExt,
        Field::Prefix2,
        Field::Street2,
        Field::StreetType2,
        Field::Suffix2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Number => "number",
            Field::Prefix => "prefix",
            Field::Street => "street",
            Field::StreetType => "street_type",
            Field::Suffix => "suffix",
            Field::UnitPrefix => "unit_prefix",
            Field::Unit => "unit",
            Field::City => "city",
            Field::State => "state",
            Field::PostalCode => "postal_code",
            Field::PostalCodeExt => "postal_code_ext",
            Field::Prefix2 => "prefix2",
            Field::Street2 => "street2",
            Field::StreetType2 => "street_type2",
            Field::Suffix2 => "suffix2",
        }
    }

    /// The field a street component lands in when it was captured by the
    /// second street of an intersection. Non-street fields map to themselves.
    pub fn secondary(self) -> Field {
        match self {
            Field::Prefix => Field::Prefix2,
            Field::Street => Field::Street2,
            Field::StreetType => Field::StreetType2,
            Field::Suffix => Field::Suffix2,
            other => other,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which occurrence of the street sub-pattern a capture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Primary,
    Secondary,
}

/// Positional identity of one capture group in a compiled grammar pattern.
///
/// The same logical field may be captured by several groups (alternative
/// branches, or both streets of an intersection). Every group gets its own
/// slot and the slot decides where the captured text ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub field: Field,
    pub side: Side,
}

impl Slot {
    pub fn resolve(&self) -> Field {
        match self.side {
            Side::Primary => self.field,
            Side::Secondary => self.field.secondary(),
        }
    }
}

/// Mutable field map for a single in-flight parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
    values: BTreeMap<Field, String>,
    pub redundant_street_type: bool,
}

impl ParsedFields {
    pub fn new() -> ParsedFields {
        ParsedFields::default()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(|value| value.as_str())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.values.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Applies `f` to the value of `field` if present. An empty result drops
    /// the field.
    pub fn update<F>(&mut self, field: Field, f: F)
    where
        F: FnOnce(&str) -> String,
    {
        if let Some(value) = self.values.get(&field) {
            let updated = f(value);
            if updated.is_empty() {
                self.values.remove(&field);
            } else {
                self.values.insert(field, updated);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn into_values(self) -> BTreeMap<Field, String> {
        self.values
    }
}
