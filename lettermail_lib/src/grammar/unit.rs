use crate::field::Field;

use super::{Alternations, PatternBuilder};

/// Secondary unit: a numbered designator followed by an identifier, a bare
/// `#` with an identifier, or an unnumbered designator on its own.
pub(crate) fn unit(builder: &mut PatternBuilder, alt: &Alternations) -> String {
    // A numbered designator must not run straight into another letter, so the
    // identifier is either set off by punctuation/space or starts with a
    // non-letter.
    let numbered = format!(
        r"{}(?:\W+{}|{})",
        builder.capture(Field::UnitPrefix, &alt.unit_numbered),
        builder.capture(Field::Unit, r"[\w/-]+"),
        builder.capture(Field::Unit, r"[[\w/-]&&[^a-z]][\w/-]*"),
    );
    let hash = format!(
        r"{}\W*{}",
        builder.capture(Field::UnitPrefix, "#"),
        builder.capture(Field::Unit, r"[\w/-]+"),
    );
    let unnumbered = format!(
        r"{}\b",
        builder.capture(Field::UnitPrefix, &alt.unit_unnumbered)
    );
    format!("(?:{}|{}|{})", numbered, hash, unnumbered)
}
