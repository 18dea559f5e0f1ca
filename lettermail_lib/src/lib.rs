pub mod address;
pub mod error;
pub mod field;
pub mod grammar;
pub mod lexicon;
pub mod normalize;
pub mod options;
pub mod parser;
pub mod tokenizer;

pub use address::Address;
pub use error::{Error, GrammarError, LexiconError};
pub use field::{Field, ParsedFields};
pub use grammar::Grammar;
pub use lexicon::{BuiltinCountries, Country, CountryRegistry, Lexicon, LexiconTables};
pub use options::{ParseFlags, ParseMode, ParseOptions, UnitLabels};
pub use parser::{AddressParser, GrammarCache};
