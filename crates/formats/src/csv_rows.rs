use std::fmt;
use std::io;

use csv::{ReaderBuilder, StringRecord};
use tracing::warn;

use crate::records::{Flow, Location};

pub const LOCATION_COLUMNS: [&str; 4] = ["id", "name", "lat", "lon"];
pub const FLOW_COLUMNS: [&str; 3] = ["origin", "dest", "count"];

#[derive(Debug)]
pub enum CsvRowsError {
    Csv(csv::Error),
}

impl fmt::Display for CsvRowsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvRowsError::Csv(err) => write!(f, "CSV error: {err}"),
        }
    }
}

impl std::error::Error for CsvRowsError {}

impl From<csv::Error> for CsvRowsError {
    fn from(err: csv::Error) -> Self {
        CsvRowsError::Csv(err)
    }
}

/// Reads `id,name,lat,lon` rows.
///
/// Column order does not matter and extra columns are ignored. See
/// [`parse_number`] for how coordinates are converted.
pub fn read_locations<R: io::Read>(reader: R) -> Result<Vec<Location>, CsvRowsError> {
    read_rows(reader, &LOCATION_COLUMNS, |row| Location {
        id: row.text(0),
        name: row.text(1),
        lat: row.number(2),
        lon: row.number(3),
    })
}

/// Reads `origin,dest,count` rows.
pub fn read_flows<R: io::Read>(reader: R) -> Result<Vec<Flow>, CsvRowsError> {
    read_rows(reader, &FLOW_COLUMNS, |row| Flow {
        origin: row.text(0),
        dest: row.text(1),
        count: row.number(2),
    })
}

pub fn parse_locations_str(text: &str) -> Result<Vec<Location>, CsvRowsError> {
    read_locations(text.as_bytes())
}

pub fn parse_flows_str(text: &str) -> Result<Vec<Flow>, CsvRowsError> {
    read_flows(text.as_bytes())
}

/// Numeric field conversion, following the browser's `Number(text)`.
///
/// - absent field: NaN
/// - blank text: 0
/// - signed decimal literals and `Infinity` (case-sensitive)
/// - unsigned `0x` / `0o` / `0b` integers
/// - anything else: NaN
///
/// No further validation happens; NaN flows on to the layer unchanged.
pub fn parse_number(field: Option<&str>) -> f64 {
    let Some(raw) = field else {
        return f64::NAN;
    };
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }
    if let Some(value) = parse_radix_integer(text) {
        return value;
    }

    let (sign, unsigned) = match text.as_bytes()[0] {
        b'+' => (1.0, &text[1..]),
        b'-' => (-1.0, &text[1..]),
        _ => (1.0, text),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }
    if !is_decimal_literal(unsigned) {
        return f64::NAN;
    }
    unsigned.parse::<f64>().map_or(f64::NAN, |v| sign * v)
}

/// `0x1F`, `0o17`, `0b101`. Returns NaN for a prefix with bad or no digits.
fn parse_radix_integer(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut value = 0.0_f64;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            return Some(f64::NAN);
        };
        value = value * f64::from(radix) + f64::from(d);
    }
    Some(value)
}

/// `digits [. digits] [(e|E) [+|-] digits]`, with at least one mantissa digit.
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    let digits = |i: &mut usize| {
        let start = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - start
    };

    let mut mantissa = digits(&mut i);
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        mantissa += digits(&mut i);
    }
    if mantissa == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        if digits(&mut i) == 0 {
            return false;
        }
    }
    i == bytes.len()
}

struct Row<'a> {
    record: &'a StringRecord,
    columns: &'a [Option<usize>],
}

impl Row<'_> {
    fn field(&self, column: usize) -> Option<&str> {
        self.columns[column].and_then(|idx| self.record.get(idx))
    }

    fn text(&self, column: usize) -> String {
        self.field(column).unwrap_or_default().to_string()
    }

    fn number(&self, column: usize) -> f64 {
        parse_number(self.field(column))
    }
}

fn read_rows<R, T, F>(reader: R, names: &[&str], mut build: F) -> Result<Vec<T>, CsvRowsError>
where
    R: io::Read,
    F: FnMut(&Row<'_>) -> T,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns: Vec<Option<usize>> = names
        .iter()
        .map(|name| headers.iter().position(|h| h.trim() == *name))
        .collect();
    for (name, column) in names.iter().zip(&columns) {
        if column.is_none() {
            warn!(column = *name, "CSV header is missing a column; values default");
        }
    }

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        out.push(build(&Row {
            record: &record,
            columns: &columns,
        }));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{parse_flows_str, parse_locations_str, parse_number};
    use crate::records::{Flow, Location};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_locations_by_header_name() {
        let text = "lon,id,lat,name\n-73.57,A,45.5,Alpha\n";
        let rows = parse_locations_str(text).expect("parse");
        assert_eq!(
            rows,
            vec![Location {
                id: "A".to_string(),
                name: "Alpha".to_string(),
                lat: 45.5,
                lon: -73.57,
            }]
        );
    }

    #[test]
    fn parses_flows() {
        let text = "origin,dest,count\nA,B,5\nB,A,12.5\n";
        let rows = parse_flows_str(text).expect("parse");
        assert_eq!(
            rows,
            vec![
                Flow {
                    origin: "A".to_string(),
                    dest: "B".to_string(),
                    count: 5.0,
                },
                Flow {
                    origin: "B".to_string(),
                    dest: "A".to_string(),
                    count: 12.5,
                },
            ]
        );
    }

    #[test]
    fn malformed_numbers_become_nan() {
        let text = "origin,dest,count\nA,B,lots\nA,B\n";
        let rows = parse_flows_str(text).expect("parse");
        assert_eq!(rows.len(), 2);
        assert!(rows[0].count.is_nan());
        assert!(rows[1].count.is_nan());
    }

    #[test]
    fn missing_columns_default() {
        let text = "id,lat,lon\nA,1,2\n";
        let rows = parse_locations_str(text).expect("parse");
        assert_eq!(rows[0].name, "");
        assert_eq!(rows[0].lat, 1.0);

        let rows = parse_flows_str("origin,dest\nA,B\n").expect("parse");
        assert!(rows[0].count.is_nan());
    }

    #[test]
    fn number_conversion_rules() {
        assert!(parse_number(None).is_nan());
        assert_eq!(parse_number(Some("  ")), 0.0);
        assert_eq!(parse_number(Some(" 7 ")), 7.0);
        assert_eq!(parse_number(Some("-1e3")), -1000.0);
        assert!(parse_number(Some("12abc")).is_nan());
    }

    #[test]
    fn number_conversion_follows_browser_grammar() {
        assert_eq!(parse_number(Some("+2.5")), 2.5);
        assert_eq!(parse_number(Some(".5")), 0.5);
        assert_eq!(parse_number(Some("5.")), 5.0);
        assert_eq!(parse_number(Some("1E2")), 100.0);
        assert_eq!(parse_number(Some("Infinity")), f64::INFINITY);
        assert_eq!(parse_number(Some("-Infinity")), f64::NEG_INFINITY);
        assert_eq!(parse_number(Some("0x10")), 16.0);
        assert_eq!(parse_number(Some("0o17")), 15.0);
        assert_eq!(parse_number(Some("0B101")), 5.0);

        for text in [
            "inf", "INF", "infinity", "-inf", "NaN", "nan", "+Infinity1", "-0x10", "0x", "0xg",
            "0b2", ".", "1e", "1e+", "e5", "1_000", "1.2.3",
        ] {
            assert!(parse_number(Some(text)).is_nan(), "{text:?} should be NaN");
        }
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert!(parse_flows_str("").expect("parse").is_empty());
        assert!(parse_flows_str("origin,dest,count\n").expect("parse").is_empty());
    }
}
