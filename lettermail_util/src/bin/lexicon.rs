use std::{error::Error, path::PathBuf, process};

use clap::Parser;
use lettermail_lib::{BuiltinCountries, Lexicon, LexiconTables};
use lettermail_util::init_logging;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// ISO 3166-1 alpha-2 country code.
    #[clap(long, value_parser, default_value = "US")]
    country: String,
    /// Only dump one table: cardinals, street_types, units or subdivisions.
    #[clap(long, value_parser)]
    table: Option<String>,
    /// Directory holding replacement cardinal.yml, street_types.yml or units.yml.
    #[clap(long, value_parser)]
    tables: Option<PathBuf>,
}

fn dump(args: &Args) -> Result<Value, Box<dyn Error>> {
    let tables = match &args.tables {
        Some(dir) => LexiconTables::from_dir(dir)?,
        None => LexiconTables::builtin()?,
    };
    let registry = BuiltinCountries::new()?;
    let lexicon = Lexicon::for_country(&tables, &registry, &args.country)?;

    let mut dump = json!({
        "country": lexicon.country().alpha2,
        "cardinals": lexicon.cardinals(),
        "street_types": tables.street_types,
        "units": tables.units,
        "subdivisions": lexicon.country().subdivisions,
    });
    if let Some(table) = &args.table {
        dump = match dump.get(table.as_str()) {
            Some(value) if table != "country" => value.clone(),
            _ => return Err(format!("unknown table {:?}", table).into()),
        };
    }
    Ok(dump)
}

fn main() {
    let args = Args::parse();
    init_logging(false);

    match dump(&args).and_then(|dump| Ok(serde_json::to_string_pretty(&dump)?)) {
        Ok(dump) => println!("{}", dump),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}
