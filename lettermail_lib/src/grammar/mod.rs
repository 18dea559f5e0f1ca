pub(crate) mod locality;
pub(crate) mod street;
pub(crate) mod unit;

use std::{collections::HashMap, sync::Arc};

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::{
    error::GrammarError,
    field::{Field, ParsedFields, Side, Slot},
    lexicon::{alternation, Lexicon},
};

const SIZE_LIMIT: usize = 64 * (1 << 20);
const DFA_SIZE_LIMIT: usize = 64 * (1 << 20);

fn build_regex(name: &'static str, pattern: &str) -> Result<Regex, GrammarError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(SIZE_LIMIT)
        .dfa_size_limit(DFA_SIZE_LIMIT)
        .build()
        .map_err(|source| GrammarError::Compile {
            pattern: name,
            source,
        })
}

/// Lexicon derived alternations shared by the sub-patterns.
pub(crate) struct Alternations {
    pub cardinal: String,
    pub cardinal_code: String,
    pub street_type: String,
    pub subdivision: String,
    pub unit_numbered: String,
    pub unit_unnumbered: String,
}

impl Alternations {
    pub(crate) fn new(lexicon: &Lexicon) -> Alternations {
        let mut cardinal_tokens = Vec::new();
        let mut codes = Vec::new();
        for entry in lexicon.cardinals() {
            let dotted: String = entry.code.chars().flat_map(|ch| [ch, '.']).collect();
            cardinal_tokens.push(entry.name.clone());
            cardinal_tokens.push(dotted);
            cardinal_tokens.push(entry.code.clone());
            codes.push(entry.code.clone());
        }
        let street_types: Vec<&str> = lexicon.street_type_tokens().collect();
        let subdivisions: Vec<&str> = lexicon.subdivision_tokens().collect();
        Alternations {
            cardinal: alternation(cardinal_tokens.iter()),
            cardinal_code: alternation(codes.iter()),
            street_type: alternation(street_types.iter()),
            subdivision: format!(r"\b{}\b", alternation(subdivisions.iter())),
            unit_numbered: unit_alternation(
                lexicon.units_numbered().iter().map(|u| u.pattern.as_str()),
            ),
            unit_unnumbered: unit_alternation(
                lexicon.units_unnumbered().iter().map(|u| u.pattern.as_str()),
            ),
        }
    }
}

/// Unit patterns are regex fragments, kept in table order.
fn unit_alternation<'a>(patterns: impl Iterator<Item = &'a str>) -> String {
    let branches: Vec<String> = patterns.map(|p| format!("(?:{})", p)).collect();
    if branches.is_empty() {
        r"(?:\b\B)".to_string()
    } else {
        format!("(?:{})", branches.join("|"))
    }
}

/// Hands out uniquely named capture groups and remembers which field and
/// street occurrence each one stands for.
pub(crate) struct PatternBuilder {
    side: Side,
    next_group: usize,
    slots: HashMap<String, Slot>,
}

impl PatternBuilder {
    pub(crate) fn new() -> PatternBuilder {
        PatternBuilder {
            side: Side::Primary,
            next_group: 0,
            slots: HashMap::new(),
        }
    }

    /// Captures made after this call belong to the second street.
    pub(crate) fn secondary(&mut self) {
        self.side = Side::Secondary;
    }

    pub(crate) fn primary(&mut self) {
        self.side = Side::Primary;
    }

    pub(crate) fn capture(&mut self, field: Field, body: &str) -> String {
        let name = format!("{}_{}", field.as_str(), self.next_group);
        self.next_group += 1;
        let group = format!("(?P<{}>{})", name, body);
        self.slots.insert(
            name,
            Slot {
                field,
                side: self.side,
            },
        );
        group
    }

    pub(crate) fn compile(
        self,
        name: &'static str,
        pattern: String,
    ) -> Result<AddressPattern, GrammarError> {
        let regex = build_regex(name, &pattern)?;
        let slots = regex
            .capture_names()
            .map(|group| group.and_then(|group| self.slots.get(group).copied()))
            .collect();
        debug!(
            "compiled {} pattern: {} groups, {} bytes",
            name,
            regex.captures_len(),
            pattern.len()
        );
        Ok(AddressPattern { name, regex, slots })
    }
}

/// A compiled pattern plus the field each of its capture groups feeds.
#[derive(Debug)]
pub struct AddressPattern {
    name: &'static str,
    regex: Regex,
    slots: Vec<Option<Slot>>,
}

impl AddressPattern {
    /// Matches `text` and collects every non-empty capture into a field map.
    /// Within one street occurrence a later group overwrites an earlier one.
    ///
    /// A captured house number must be followed by a non-digit; a match
    /// that breaks this is reported as no match.
    pub fn fields(&self, text: &str) -> Option<ParsedFields> {
        let captures = self.regex.captures(text)?;
        let mut fields = ParsedFields::new();
        for (index, slot) in self.slots.iter().enumerate() {
            let (slot, matched) = match (slot, captures.get(index)) {
                (Some(slot), Some(matched)) => (slot, matched),
                _ => continue,
            };
            if slot.field == Field::Number && !delimits_number(&text[matched.end()..]) {
                debug!(
                    "{} match rejected, number {:?} runs into a digit",
                    self.name,
                    matched.as_str()
                );
                return None;
            }
            if !matched.as_str().is_empty() {
                fields.set(slot.resolve(), matched.as_str());
            }
        }
        Some(fields)
    }
}

fn delimits_number(rest: &str) -> bool {
    match rest.chars().next() {
        Some(ch) => !ch.is_ascii_digit(),
        None => false,
    }
}

/// The composed pattern set for one lexicon.
#[derive(Debug)]
pub struct Grammar {
    lexicon: Arc<Lexicon>,
    corner: Regex,
    street: AddressPattern,
    formal: AddressPattern,
    informal: AddressPattern,
    informal_unnumbered: AddressPattern,
    intersectional: AddressPattern,
    city_cardinal: Regex,
}

impl Grammar {
    pub fn new(lexicon: Arc<Lexicon>) -> Result<Grammar, GrammarError> {
        let alt = Alternations::new(&lexicon);

        let street = {
            let mut builder = PatternBuilder::new();
            let body = street::street(&mut builder, &alt);
            builder.compile("street", body)?
        };

        let formal = {
            let mut b = PatternBuilder::new();
            let pattern = format!(
                r"\A[^\w#]*{}\W*{}\W+(?:{}\W+)?{}\W*\z",
                street::number(&mut b),
                street::street(&mut b, &alt),
                unit::unit(&mut b, &alt),
                locality::place(&mut b, &alt),
            );
            b.compile("formal", pattern)?
        };

        let informal = informal_pattern(&alt, true)?;
        let informal_unnumbered = informal_pattern(&alt, false)?;

        let intersectional = {
            let mut b = PatternBuilder::new();
            let first = street::street(&mut b, &alt);
            b.secondary();
            let second = street::street(&mut b, &alt);
            b.primary();
            let pattern = format!(
                r"\A\W*{}\W*?\s+{}\s+{}\W+{}\W*\z",
                first,
                locality::CORNER,
                second,
                locality::place(&mut b, &alt),
            );
            b.compile("intersectional", pattern)?
        };

        let corner = build_regex("corner", locality::CORNER)?;
        let city_cardinal = build_regex(
            "city cardinal",
            &format!(r"\A(?P<code>{})\s+(?P<rest>\S.*)\z", alt.cardinal_code),
        )?;

        debug!("built grammar for {}", lexicon.country().alpha2);
        Ok(Grammar {
            lexicon,
            corner,
            street,
            formal,
            informal,
            informal_unnumbered,
            intersectional,
            city_cardinal,
        })
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// True when `text` contains a corner token ("and", "at", "&", "@").
    pub fn has_corner(&self, text: &str) -> bool {
        self.corner.is_match(text)
    }

    pub fn street_pattern(&self) -> &AddressPattern {
        &self.street
    }

    pub fn formal(&self) -> &AddressPattern {
        &self.formal
    }

    pub fn informal(&self) -> &AddressPattern {
        &self.informal
    }

    /// The informal pattern without the house number, tried when the
    /// number of an informal match runs into a digit.
    pub fn informal_unnumbered(&self) -> &AddressPattern {
        &self.informal_unnumbered
    }

    pub fn intersectional(&self) -> &AddressPattern {
        &self.intersectional
    }

    /// "E San Jose" -> "east San Jose". Cities not led by a cardinal code
    /// are returned as is.
    pub fn expand_city_cardinal(&self, city: &str) -> Option<String> {
        let captures = self.city_cardinal.captures(city)?;
        let name = self.lexicon.cardinal_name(&captures["code"])?;
        Some(format!("{} {}", name, &captures["rest"]))
    }
}

fn informal_pattern(alt: &Alternations, numbered: bool) -> Result<AddressPattern, GrammarError> {
    let mut b = PatternBuilder::new();
    let lead = format!(
        r"(?:{}(?:\W+|\z){})?",
        unit::unit(&mut b, alt),
        locality::place(&mut b, alt)
    );
    let number = if numbered {
        format!("(?:{})?", street::number(&mut b))
    } else {
        String::new()
    };
    let pattern = format!(
        r"\A\s*{}{}\W*{}(?:[^#\w]+|\z)(?:{}(?:\W+|\z))?(?:{})?",
        lead,
        number,
        street::street(&mut b, alt),
        unit::unit(&mut b, alt),
        locality::place(&mut b, alt),
    );
    let name = if numbered {
        "informal"
    } else {
        "informal unnumbered"
    };
    b.compile(name, pattern)
}
