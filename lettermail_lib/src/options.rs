use bitflags::bitflags;

bitflags! {
    pub struct ParseFlags: u8 {
        /// Drop the street type when it already appears inside the street name.
        const AVOID_REDUNDANT_STREET_TYPE = 0b0000_0001;
        /// Transliterate the input to ASCII before matching.
        const TRANSLITERATE = 0b0000_0010;
    }
}

impl Default for ParseFlags {
    fn default() -> Self {
        ParseFlags::empty()
    }
}

/// Which canonical label a recognized unit prefix is rewritten to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitLabels {
    /// "Suite", "Floor", "Room".
    Descriptive,
    /// USPS Publication 28 abbreviations: "Ste", "Fl", "Rm".
    Usps,
}

impl Default for UnitLabels {
    fn default() -> Self {
        UnitLabels::Descriptive
    }
}

/// Which grammar(s) a parse attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Intersectional when a corner token is present, otherwise formal then informal.
    Any,
    Formal,
    Informal,
    Intersectional,
}

impl Default for ParseMode {
    fn default() -> Self {
        ParseMode::Any
    }
}

impl std::str::FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(ParseMode::Any),
            "formal" => Ok(ParseMode::Formal),
            "informal" => Ok(ParseMode::Informal),
            "intersectional" | "intersection" => Ok(ParseMode::Intersectional),
            other => Err(format!("unknown parse mode {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub country: String,
    pub flags: ParseFlags,
    pub unit_labels: UnitLabels,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            country: "US".to_string(),
            flags: ParseFlags::default(),
            unit_labels: UnitLabels::default(),
        }
    }
}

impl ParseOptions {
    pub fn country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    pub fn flags(mut self, flags: ParseFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn unit_labels(mut self, unit_labels: UnitLabels) -> Self {
        self.unit_labels = unit_labels;
        self
    }

    pub fn avoid_redundant_street_type(&self) -> bool {
        self.flags.contains(ParseFlags::AVOID_REDUNDANT_STREET_TYPE)
    }
}
