use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("unknown country code {0:?}")]
    UnknownCountry(String),
    #[error("malformed {table} table: {reason}")]
    MalformedTable { table: &'static str, reason: String },
    #[error("invalid unit abbreviation pattern for {label:?}: {source}")]
    InvalidUnitPattern {
        label: String,
        #[source]
        source: regex::Error,
    },
    #[error("failed to read lexicon data: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to open lexicon data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build street type set: {0}")]
    Fst(#[from] fst::Error),
}

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("failed to compile {pattern} pattern: {source}")]
    Compile {
        pattern: &'static str,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}
