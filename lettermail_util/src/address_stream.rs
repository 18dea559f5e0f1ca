use std::{
    error::Error,
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::Path,
};

use tracing::warn;

/// Reads one address per line. A line may start with a two letter country
/// code and a tab (`CA\t100 Queen St W, Toronto, ON`).
pub struct AddressStream {
    lines: Lines<BufReader<File>>,
    line_number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLine {
    pub line_number: usize,
    pub country: Option<String>,
    pub text: String,
}

impl AddressLine {
    pub fn parse(line_number: usize, line: &str) -> AddressLine {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some((code, text)) = line.split_once('\t') {
            if code.len() == 2 && code.chars().all(|ch| ch.is_ascii_alphabetic()) {
                return AddressLine {
                    line_number,
                    country: Some(code.to_ascii_uppercase()),
                    text: text.to_string(),
                };
            }
        }
        AddressLine {
            line_number,
            country: None,
            text: line.to_string(),
        }
    }
}

impl AddressStream {
    pub fn new<P: AsRef<Path>>(filename: P) -> Result<AddressStream, Box<dyn Error>> {
        let reader = BufReader::new(File::open(filename)?);

        Ok(AddressStream {
            lines: reader.lines(),
            line_number: 0,
        })
    }
}

impl Iterator for AddressStream {
    type Item = AddressLine;

    fn next(&mut self) -> Option<AddressLine> {
        match self.lines.next()? {
            Ok(line) => {
                self.line_number += 1;
                Some(AddressLine::parse(self.line_number, &line))
            }
            Err(err) => {
                warn!("stopped reading after line {}: {}", self.line_number, err);
                None
            }
        }
    }
}
