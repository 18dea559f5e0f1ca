use crate::field::Field;

use super::{Alternations, PatternBuilder};

pub(crate) const CORNER: &str = r"(?:\band\b|\bat\b|&|@)";

pub(crate) fn postal_code(builder: &mut PatternBuilder) -> String {
    format!(
        r"(?:{}(?:-?{})?)",
        builder.capture(Field::PostalCode, "[0-9]{5}"),
        builder.capture(Field::PostalCodeExt, "[0-9]{4}"),
    )
}

/// City, taken reluctantly, up to a recognized subdivision.
pub(crate) fn city_state(builder: &mut PatternBuilder, alt: &Alternations) -> String {
    format!(
        r"(?:{}\W+{})",
        builder.capture(Field::City, r"[^0-9,]+?"),
        builder.capture(Field::State, &alt.subdivision),
    )
}

pub(crate) fn place(builder: &mut PatternBuilder, alt: &Alternations) -> String {
    let city_state = city_state(builder, alt);
    format!(r"(?:{}\W*)?(?:{})?", city_state, postal_code(builder))
}
