use lettermail_lib::{AddressParser, ParseFlags, ParseOptions};
use once_cell::sync::Lazy;
use proptest::prelude::*;

static PARSER: Lazy<AddressParser> = Lazy::new(|| AddressParser::new().unwrap());

const CORPUS: [&str; 8] = [
    "1005 N Gravenstein Highway, Suite 500, Sebastopol, CA",
    "7800 Mill Station Rd Sebastopol CA 95472-1234",
    "36401 County Road 43, Eaton, CO 80615",
    "550 S 400 E #3206, Salt Lake City UT 84111",
    "233 S Wacker Dr 60606-6306",
    "Mission & Valencia San Francisco CA",
    "Mission and Valencia Sts San Francisco CA",
    "1 First St, e San Jose CA",
];

#[test]
fn rendered_addresses_reparse_to_the_same_fields() {
    for options in [
        ParseOptions::default(),
        ParseOptions::default().flags(ParseFlags::AVOID_REDUNDANT_STREET_TYPE),
    ] {
        for input in CORPUS {
            let first = PARSER.parse(input, &options).unwrap();
            let second = PARSER
                .parse(&first.to_string(), &options)
                .unwrap_or_else(|| panic!("{:?} rendered as {:?} did not reparse", input, first.to_string()));
            assert_eq!(first.to_string(), second.to_string(), "{:?}", input);
            assert_eq!(first.street, second.street, "{:?}", input);
            assert_eq!(first.street_type, second.street_type, "{:?}", input);
            assert_eq!(first.city, second.city, "{:?}", input);
            assert_eq!(first.state, second.state, "{:?}", input);
            assert_eq!(first.ukey(), second.ukey(), "{:?}", input);
        }
    }
}

// A PO box renders with its box number in the house number position, which
// no longer reads back as a unit.
#[test]
fn po_box_does_not_round_trip() {
    let options = ParseOptions::default();
    let first = PARSER.parse("PO Box 1288, Rome, GA, 30165", &options).unwrap();
    let second = PARSER.parse(&first.to_string(), &options);
    assert!(
        second.map_or(true, |second| second.unit_prefix != first.unit_prefix),
        "{:?} unexpectedly round tripped",
        first.to_string()
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parse_never_panics(input in "\\PC{0,48}") {
        let _ = PARSER.parse(&input, &ParseOptions::default());
    }

    #[test]
    fn parse_is_deterministic(input in "[0-9]{1,5} [A-Za-z]{3,10} (St|Ave|Rd|Hwy)(, [A-Za-z]{3,10}, CA)?") {
        let options = ParseOptions::default();
        let first = PARSER.parse(&input, &options);
        let second = PARSER.parse(&input, &options);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn numbered_streets_keep_their_number(
        number in "[1-9][0-9]{0,4}",
        street in "[A-Z][a-z]{3,9}",
    ) {
        let input = format!("{} {} Ave, Springfield, IL", number, street);
        let addr = PARSER.parse(&input, &ParseOptions::default());
        prop_assert!(addr.is_some(), "{:?} did not parse", input);
        let addr = addr.unwrap();
        prop_assert_eq!(addr.number.as_deref(), Some(number.as_str()));
        prop_assert_eq!(addr.state.as_deref(), Some("IL"));
    }
}
