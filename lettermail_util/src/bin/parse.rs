use std::{error::Error, path::PathBuf, process};

use clap::Parser;
use lettermail_lib::{
    Address, AddressParser, BuiltinCountries, LexiconTables, ParseFlags, ParseMode,
    ParseOptions, UnitLabels,
};
use lettermail_util::{address_stream::AddressStream, init_logging};
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// The address string to parse.
    #[clap(long, value_parser)]
    str: Option<String>,
    /// A file with one address per line, optionally prefixed with `CC<TAB>`.
    #[clap(long, value_parser)]
    file: Option<PathBuf>,
    /// Default ISO 3166-1 alpha-2 country code.
    #[clap(long, value_parser, default_value = "US")]
    country: String,
    /// any, formal, informal or intersectional.
    #[clap(long, value_parser, default_value = "any")]
    mode: String,
    /// Drop the street type when the street name already contains it.
    #[clap(long, action)]
    avoid_redundant_street_type: bool,
    /// Use USPS abbreviations for unit prefixes ("Ste" rather than "Suite").
    #[clap(long, action)]
    usps_units: bool,
    /// Transliterate input to ASCII before parsing.
    #[clap(long, action)]
    transliterate: bool,
    /// Directory holding replacement cardinal.yml, street_types.yml or units.yml.
    #[clap(long, value_parser)]
    tables: Option<PathBuf>,
    /// Print every parse as a JSON object.
    #[clap(long, action)]
    json: bool,
    #[clap(long, short, action)]
    verbose: bool,
}

fn print_address(address: Option<Address>, json: bool) -> Result<(), Box<dyn Error>> {
    match address {
        Some(address) if json => println!("{}", serde_json::to_string(&address)?),
        Some(address) => println!("{}", address),
        None => println!("no match"),
    }
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.str.is_none() && args.file.is_none() {
        return Err("pass --str or --file".into());
    }
    let mode: ParseMode = args.mode.parse()?;
    let tables = match &args.tables {
        Some(dir) => LexiconTables::from_dir(dir)?,
        None => LexiconTables::builtin()?,
    };
    let parser = AddressParser::with_sources(tables, Box::new(BuiltinCountries::new()?));

    let mut flags = ParseFlags::empty();
    flags.set(
        ParseFlags::AVOID_REDUNDANT_STREET_TYPE,
        args.avoid_redundant_street_type,
    );
    flags.set(ParseFlags::TRANSLITERATE, args.transliterate);
    let unit_labels = if args.usps_units {
        UnitLabels::Usps
    } else {
        UnitLabels::Descriptive
    };
    let options = ParseOptions::default()
        .country(&args.country)
        .flags(flags)
        .unit_labels(unit_labels);

    if let Some(string) = &args.str {
        let address = parser.try_parse_as(string, mode, &options)?;
        print_address(address, args.json)?;
    }

    if let Some(file) = &args.file {
        let mut parsed = 0;
        let mut total = 0;
        for line in AddressStream::new(file)? {
            let options = match &line.country {
                Some(country) => options.clone().country(country),
                None => options.clone(),
            };
            let address = parser.try_parse_as(&line.text, mode, &options)?;
            total += 1;
            if address.is_some() {
                parsed += 1;
            }
            print_address(address, args.json)?;
        }
        info!("parsed {} of {} lines", parsed, total);
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
