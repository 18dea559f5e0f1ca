use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::{
    field::{Field, ParsedFields},
    grammar::Grammar,
    options::ParseOptions,
    tokenizer,
};

static DIRTY_ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\A[0-9]+\s+(?:st|nd|rd|th)\z").unwrap());

const TITLE_CASED: [Field; 6] = [
    Field::Street,
    Field::StreetType,
    Field::Street2,
    Field::StreetType2,
    Field::City,
    Field::UnitPrefix,
];

type Stage = fn(&Normalizer<'_>, ParsedFields) -> ParsedFields;

/// Stage order matters: each one sees what the previous ones produced.
const STAGES: [(&str, Stage); 8] = [
    ("strip_chars", strip_chars),
    ("redundant_street_type", redundant_street_type),
    ("abbreviate_unit_prefix", abbreviate_unit_prefix),
    ("lexicon_lookup", lexicon_lookup),
    ("avoid_redundant_street_type", avoid_redundant_street_type),
    ("expand_city_cardinal", expand_city_cardinal),
    ("fix_dirty_ordinal", fix_dirty_ordinal),
    ("title_case", title_case),
];

/// Turns raw captures into canonical field values.
pub struct Normalizer<'a> {
    grammar: &'a Grammar,
    options: &'a ParseOptions,
}

impl<'a> Normalizer<'a> {
    pub fn new(grammar: &'a Grammar, options: &'a ParseOptions) -> Normalizer<'a> {
        Normalizer { grammar, options }
    }

    pub fn run(&self, fields: ParsedFields) -> ParsedFields {
        STAGES.iter().fold(fields, |fields, (name, stage)| {
            let fields = stage(self, fields);
            trace!("after {}: {:?}", name, fields);
            fields
        })
    }
}

fn strip_chars(_: &Normalizer<'_>, mut fields: ParsedFields) -> ParsedFields {
    for field in Field::ALL {
        fields.update(field, |value| {
            tokenizer::strip_chars(value, field == Field::Number)
        });
    }
    fields
}

/// A street with no captured type may still carry one inside its name
/// ("State Highway 116"). Hoist it and remember that it is redundant.
fn redundant_street_type(n: &Normalizer<'_>, mut fields: ParsedFields) -> ParsedFields {
    if fields.contains(Field::StreetType) {
        return fields;
    }
    let found = fields.get(Field::Street).and_then(|street| {
        n.grammar
            .street_pattern()
            .fields(street)
            .and_then(|matched| matched.get(Field::StreetType).map(str::to_string))
    });
    if let Some(street_type) = found {
        fields.set(Field::StreetType, street_type);
        fields.redundant_street_type = true;
    }
    fields
}

fn abbreviate_unit_prefix(n: &Normalizer<'_>, mut fields: ParsedFields) -> ParsedFields {
    let lexicon = n.grammar.lexicon();
    let canonical = fields.get(Field::UnitPrefix).and_then(|raw| {
        lexicon
            .units_numbered()
            .iter()
            .chain(lexicon.units_unnumbered())
            .filter(|unit| unit.matches(raw))
            .last()
            .map(|unit| unit.canonical(n.options.unit_labels).to_string())
    });
    if let Some(canonical) = canonical {
        fields.set(Field::UnitPrefix, canonical);
    }
    fields
}

fn lexicon_lookup(n: &Normalizer<'_>, mut fields: ParsedFields) -> ParsedFields {
    let lexicon = n.grammar.lexicon();
    for field in [Field::Prefix, Field::Prefix2, Field::Suffix, Field::Suffix2] {
        fields.update(field, |value| match lexicon.cardinal_type(value) {
            Some(code) => code.to_string(),
            None if lexicon.cardinal_name(value).is_some() => value.to_uppercase(),
            None => value.to_string(),
        });
    }
    for field in [Field::StreetType, Field::StreetType2] {
        fields.update(field, |value| {
            lexicon.street_type(value).unwrap_or(value).to_string()
        });
    }
    fields.update(Field::State, |value| match lexicon.subdivision_code(value) {
        Some(code) => code.to_string(),
        None if lexicon.subdivision_name(value).is_some() => value.to_uppercase(),
        None => value.to_string(),
    });
    fields
}

fn avoid_redundant_street_type(n: &Normalizer<'_>, mut fields: ParsedFields) -> ParsedFields {
    if !n.options.avoid_redundant_street_type() {
        return fields;
    }
    let lexicon = n.grammar.lexicon();
    for (street, street_type) in [
        (Field::Street, Field::StreetType),
        (Field::Street2, Field::StreetType2),
    ] {
        let redundant = match (fields.get(street), fields.get(street_type)) {
            (Some(name), Some(abbr)) => lexicon
                .street_type_matcher(abbr)
                .map_or(false, |matcher| matcher.is_match(name)),
            _ => false,
        };
        if redundant {
            fields.remove(street_type);
            fields.redundant_street_type = true;
        }
    }
    fields
}

fn expand_city_cardinal(n: &Normalizer<'_>, mut fields: ParsedFields) -> ParsedFields {
    let expanded = fields
        .get(Field::City)
        .and_then(|city| n.grammar.expand_city_cardinal(city));
    if let Some(city) = expanded {
        fields.set(Field::City, city);
    }
    fields
}

/// "1 ST" -> "1ST", an artifact of some parcel data.
fn fix_dirty_ordinal(_: &Normalizer<'_>, mut fields: ParsedFields) -> ParsedFields {
    fields.update(Field::Street, |street| {
        if DIRTY_ORDINAL.is_match(street) {
            street.split_whitespace().collect()
        } else {
            street.to_string()
        }
    });
    fields
}

fn title_case(n: &Normalizer<'_>, mut fields: ParsedFields) -> ParsedFields {
    let lexicon = n.grammar.lexicon();
    for field in TITLE_CASED {
        // Canonical unit labels keep their own casing ("PO Box", "PH").
        if field == Field::UnitPrefix {
            let is_label = fields.get(field).map_or(false, |value| {
                lexicon
                    .units_numbered()
                    .iter()
                    .chain(lexicon.units_unnumbered())
                    .any(|unit| unit.label == value || unit.usps == value)
            });
            if is_label {
                continue;
            }
        }
        fields.update(field, tokenizer::capitalize_words);
    }
    fields
}

#[cfg(test)]
mod test {
    use crate::field::{Field, ParsedFields};
    use crate::grammar::test::us_grammar;
    use crate::options::{ParseFlags, ParseOptions, UnitLabels};

    use super::Normalizer;

    fn fields(pairs: &[(Field, &str)]) -> ParsedFields {
        let mut fields = ParsedFields::new();
        for (field, value) in pairs {
            fields.set(*field, *value);
        }
        fields
    }

    #[test]
    fn normalize_test_strip_and_lookup() {
        let grammar = us_grammar();
        let options = ParseOptions::default();
        let out = Normalizer::new(&grammar, &options).run(fields(&[
            (Field::Number, "3813.5,"),
            (Field::Prefix, "S."),
            (Field::Street, "washington"),
            (Field::StreetType, "Avenue."),
            (Field::State, "california"),
            (Field::City, " "),
        ]));
        assert_eq!(out.get(Field::Number), Some("3813.5"));
        assert_eq!(out.get(Field::Prefix), Some("S"));
        assert_eq!(out.get(Field::Street), Some("Washington"));
        assert_eq!(out.get(Field::StreetType), Some("Ave"));
        assert_eq!(out.get(Field::State), Some("CA"));
        assert_eq!(out.get(Field::City), None);

        // Known codes are upper-cased; anything else is left as written.
        let out = Normalizer::new(&grammar, &options).run(fields(&[
            (Field::Prefix, "nw"),
            (Field::Suffix, "x"),
            (Field::State, "ca"),
        ]));
        assert_eq!(out.get(Field::Prefix), Some("NW"));
        assert_eq!(out.get(Field::Suffix), Some("x"));
        assert_eq!(out.get(Field::State), Some("CA"));
    }

    #[test]
    fn normalize_test_redundant_type() {
        let grammar = us_grammar();
        let options = ParseOptions::default();
        let out = Normalizer::new(&grammar, &options)
            .run(fields(&[(Field::Street, "County Road 43")]));
        assert_eq!(out.get(Field::StreetType), Some("Rd"));
        assert!(out.redundant_street_type);

        let options = ParseOptions::default().flags(ParseFlags::AVOID_REDUNDANT_STREET_TYPE);
        let out = Normalizer::new(&grammar, &options)
            .run(fields(&[(Field::Street, "County Road 43")]));
        assert_eq!(out.get(Field::StreetType), None);
        assert_eq!(out.get(Field::Street), Some("County Road 43"));
    }

    #[test]
    fn normalize_test_unit_labels() {
        let grammar = us_grammar();
        let options = ParseOptions::default();
        let out = Normalizer::new(&grammar, &options)
            .run(fields(&[(Field::UnitPrefix, "DEPT")]));
        assert_eq!(out.get(Field::UnitPrefix), Some("Dept"));

        let out = Normalizer::new(&grammar, &options)
            .run(fields(&[(Field::UnitPrefix, "P.O. Box")]));
        assert_eq!(out.get(Field::UnitPrefix), Some("PO Box"));

        let options = ParseOptions::default().unit_labels(UnitLabels::Usps);
        let out = Normalizer::new(&grammar, &options)
            .run(fields(&[(Field::UnitPrefix, "suite")]));
        assert_eq!(out.get(Field::UnitPrefix), Some("Ste"));

        let out = Normalizer::new(&grammar, &options)
            .run(fields(&[(Field::UnitPrefix, "#")]));
        assert_eq!(out.get(Field::UnitPrefix), Some("#"));
    }

    #[test]
    fn normalize_test_city_and_ordinal() {
        let grammar = us_grammar();
        let options = ParseOptions::default();
        let out = Normalizer::new(&grammar, &options).run(fields(&[
            (Field::Street, "1 ST"),
            (Field::City, "e San Jose"),
        ]));
        assert_eq!(out.get(Field::Street), Some("1st"));
        assert_eq!(out.get(Field::City), Some("East San Jose"));
    }

    #[test]
    fn normalize_test_idempotent() {
        let grammar = us_grammar();
        let options = ParseOptions::default().flags(ParseFlags::AVOID_REDUNDANT_STREET_TYPE);
        let normalizer = Normalizer::new(&grammar, &options);
        let once = normalizer.run(fields(&[
            (Field::Number, "1005"),
            (Field::Street, "State Highway 116"),
            (Field::UnitPrefix, "ste"),
            (Field::Unit, "500"),
            (Field::City, "n Sebastopol"),
            (Field::State, "ca"),
        ]));
        let twice = normalizer.run(once.clone());
        assert_eq!(once, twice);

        // The captured type is dropped on the first pass and must not be
        // hoisted back out of the street name on the second.
        let captured = grammar
            .formal()
            .fields("100 Main Street St, Boston, MA")
            .unwrap();
        assert_eq!(captured.get(Field::StreetType), Some("St"));
        let once = normalizer.run(captured);
        assert_eq!(once.get(Field::Street), Some("Main Street"));
        assert_eq!(once.get(Field::StreetType), None);
        assert!(once.redundant_street_type);
        let twice = normalizer.run(once.clone());
        assert_eq!(once, twice);
    }
}
