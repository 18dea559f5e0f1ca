use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use serde::{Serialize, Serializer};
use md5::{Digest, Md5};

use crate::{
    field::{Field, ParsedFields},
    lexicon::Country,
};

/// A parsed, normalized address.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub number: Option<String>,
    pub prefix: Option<String>,
    pub street: Option<String>,
    pub street_type: Option<String>,
    pub suffix: Option<String>,
    pub unit_prefix: Option<String>,
    pub unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub postal_code_ext: Option<String>,
    pub prefix2: Option<String>,
    pub street2: Option<String>,
    pub street_type2: Option<String>,
    pub suffix2: Option<String>,
    pub redundant_street_type: bool,
    #[serde(rename = "country", serialize_with = "country_code")]
    country: Arc<Country>,
}

fn country_code<S: Serializer>(country: &Arc<Country>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&country.alpha2)
}

impl Address {
    pub(crate) fn new(fields: ParsedFields, country: Arc<Country>) -> Address {
        let redundant_street_type = fields.redundant_street_type;
        let mut values = fields.into_values();
        let mut take = |field: Field| values.remove(&field);
        Address {
            number: take(Field::Number),
            prefix: take(Field::Prefix),
            street: take(Field::Street),
            street_type: take(Field::StreetType),
            suffix: take(Field::Suffix),
            unit_prefix: take(Field::UnitPrefix),
            unit: take(Field::Unit),
            city: take(Field::City),
            state: take(Field::State),
            postal_code: take(Field::PostalCode),
            postal_code_ext: take(Field::PostalCodeExt),
            prefix2: take(Field::Prefix2),
            street2: take(Field::Street2),
            street_type2: take(Field::StreetType2),
            suffix2: take(Field::Suffix2),
            redundant_street_type,
            country,
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Number => &self.number,
            Field::Prefix => &self.prefix,
            Field::Street => &self.street,
            Field::StreetType => &self.street_type,
            Field::Suffix => &self.suffix,
            Field::UnitPrefix => &self.unit_prefix,
            Field::Unit => &self.unit,
            Field::City => &self.city,
            Field::State => &self.state,
            Field::PostalCode => &self.postal_code,
            Field::PostalCodeExt => &self.postal_code_ext,
            Field::Prefix2 => &self.prefix2,
            Field::Street2 => &self.street2,
            Field::StreetType2 => &self.street_type2,
            Field::Suffix2 => &self.suffix2,
        };
        value.as_deref()
    }

    pub fn is_intersection(&self) -> bool {
        self.street.is_some() && self.street2.is_some()
    }

    pub fn country(&self) -> &Country {
        &self.country
    }

    pub fn country_code(&self) -> &str {
        &self.country.alpha2
    }

    pub fn country_name(&self) -> &str {
        &self.country.name
    }

    /// Display name of `state`, when the country metadata knows it.
    pub fn state_name(&self) -> Option<&str> {
        let state = self.state.as_deref()?;
        self.country
            .subdivisions
            .iter()
            .find(|sub| sub.code.eq_ignore_ascii_case(state))
            .map(|sub| sub.name.as_str())
    }

    /// "95472-1234", or just the five digit code.
    pub fn full_postal_code(&self) -> Option<String> {
        let postal_code = self.postal_code.as_deref()?;
        Some(match self.postal_code_ext.as_deref() {
            Some(ext) => format!("{}-{}", postal_code, ext),
            None => postal_code.to_string(),
        })
    }

    pub fn line1(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.is_intersection() {
            parts.extend(self.prefix.as_deref());
            parts.extend(self.street.as_deref());
            parts.extend(self.street_type.as_deref());
            parts.extend(self.suffix.as_deref());
            parts.push("and");
            parts.extend(self.prefix2.as_deref());
            parts.extend(self.street2.as_deref());
            parts.extend(self.street_type2.as_deref());
            parts.extend(self.suffix2.as_deref());
        } else {
            parts.extend(self.number.as_deref());
            parts.extend(self.prefix.as_deref());
            parts.extend(self.street.as_deref());
            if !self.redundant_street_type {
                parts.extend(self.street_type.as_deref());
            }
            parts.extend(self.suffix.as_deref());
            match (self.unit_prefix.as_deref(), self.unit.as_deref()) {
                (Some(unit_prefix), unit) => {
                    parts.push(unit_prefix);
                    parts.extend(unit);
                }
                // USPS Publication 28: an unnamed unit is written "# 12".
                (None, Some(unit)) => {
                    parts.push("#");
                    parts.push(unit);
                }
                (None, None) => {}
            }
        }
        parts.join(" ")
    }

    pub fn line2(&self) -> String {
        let mut line = [self.city.as_deref(), self.state.as_deref()]
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<&str>>()
            .join(", ");
        if let Some(postal_code) = self.full_postal_code() {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&postal_code);
        }
        line
    }

    /// Mailing label form: optional leading lines (recipient, company), the
    /// two address lines and optionally the country name.
    pub fn to_snail(&self, prefixes: &[&str], include_country: bool) -> String {
        let mut lines: Vec<String> = prefixes.iter().map(|line| line.to_string()).collect();
        lines.push(self.line1());
        lines.push(self.line2());
        if include_country {
            lines.push(self.country_name().to_string());
        }
        lines.join("\n")
    }

    /// Stable key for deduplication: MD5 hex digest of the lower-cased
    /// alphanumerics of the single line form.
    pub fn ukey(&self) -> String {
        let key: String = self
            .to_string()
            .to_lowercase()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect();
        hex::encode(Md5::digest(key.as_bytes()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line1 = self.line1();
        let line2 = self.line2();
        match (line1.is_empty(), line2.is_empty()) {
            (false, false) => write!(f, "{}, {}", line1, line2),
            (false, true) => f.write_str(&line1),
            (true, _) => f.write_str(&line2),
        }
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}
