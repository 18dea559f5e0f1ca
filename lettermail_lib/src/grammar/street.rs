use crate::field::Field;

use super::{Alternations, PatternBuilder};

/// Leading house number. A single directional letter may be fused to the
/// front ("W12090"); a trailing one ("48S") is left for the street.
pub(crate) fn number(builder: &mut PatternBuilder) -> String {
    builder.capture(Field::Number, r"[nsew]?[0-9]+[.-]?[0-9]*")
}

/// The street sub-pattern. Branch order is a priority list: each later
/// branch accepts strictly more than the ones before it.
pub(crate) fn street(builder: &mut PatternBuilder, alt: &Alternations) -> String {
    let cardinal = &alt.cardinal;
    let street_type = &alt.street_type;

    // "South Street", "North Ave"
    let cardinal_named = format!(
        r"(?:{}\W+{}\b)",
        builder.capture(Field::Street, cardinal),
        builder.capture(Field::StreetType, street_type),
    );
    let prefix = format!(r"(?:{}\W+)?", builder.capture(Field::Prefix, cardinal));
    // "400 E", "30 1/2 N"
    let numbered = format!(
        r"{}(?:[^\w,]*{}\b)",
        builder.capture(Field::Street, r"[^,]*[0-9]"),
        builder.capture(Field::Suffix, cardinal),
    );
    let typed = format!(
        r"{}(?:[^\w,]+{}\b)(?:[^\w,]+{}\b)?",
        builder.capture(Field::Street, r"[^,]+"),
        builder.capture(Field::StreetType, street_type),
        builder.capture(Field::Suffix, cardinal),
    );
    let bare = format!(
        r"{}(?:[^\w,]+{}\b)?(?:[^\w,]+{}\b)?",
        builder.capture(Field::Street, r"[^,]+?"),
        builder.capture(Field::StreetType, street_type),
        builder.capture(Field::Suffix, cardinal),
    );
    format!(
        "(?:{}|{}(?:{}|{}|{}))",
        cardinal_named, prefix, numbered, typed, bare
    )
}
