//! CSV loader for auction listing exports
//!
//! Source files are UTF-8 with an optional byte-order-mark signature; the
//! signature is stripped before parsing, never treated as data.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use auction_domain::model::{Auction, ValidationError, Vehicle, VehicleType};
use encoding_rs::UTF_8;
use thiserror::Error;

use crate::time::{parse_auction_datetime, DateParseError};

/// Pivot for expanding two-digit years: 00..=30 become 2000..=2030 and
/// 31..=99 become 1931..=1999. Fixed by the feed's convention, not a
/// tunable heuristic.
const TWO_DIGIT_YEAR_PIVOT: i32 = 30;

#[derive(Error, Debug)]
pub enum CsvLoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Invalid number in row {row}, column {column}: {value:?}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Invalid auction date in row {row}: {source}")]
    Date { row: usize, source: DateParseError },

    #[error("Invalid vehicle in row {row}: {source}")]
    Vehicle { row: usize, source: ValidationError },
}

/// Column indices resolved from the header row by exact, case-sensitive name
#[derive(Debug, Clone)]
pub struct ColumnMap {
    stock_number: usize,
    branch: usize,
    auction_date: usize,
    year: usize,
    make: usize,
    model: usize,
    vehicle_type: Option<usize>,
    odometer: Option<usize>,
}

impl ColumnMap {
    pub fn from_headers(headers: &csv::StringRecord) -> Result<Self, CsvLoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(CsvLoadError::MissingColumn(name))
        };
        let find_optional = |name: &str| headers.iter().position(|h| h == name);

        Ok(Self {
            stock_number: find("Stock Number")?,
            branch: find("Branch Name")?,
            auction_date: find("Auction Date")?,
            year: find("Year")?,
            make: find("Make")?,
            model: find("Model")?,
            vehicle_type: find_optional("Vehicle Type"),
            odometer: find_optional("Odometer"),
        })
    }
}

/// Load all auctions from one CSV file. Row order is preserved. The first
/// bad row aborts the whole file parse; skip-and-continue policies belong
/// to the caller.
pub fn load_auctions<P: AsRef<Path>>(path: P) -> Result<Vec<Auction>, CsvLoadError> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    // Decode as UTF-8; a leading BOM signature is consumed here
    let (decoded, _, had_errors) = UTF_8.decode(&bytes);
    if had_errors {
        eprintln!("Warning: some characters could not be decoded as UTF-8");
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(decoded.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut auctions = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row_num = row_idx + 2; // header is row 1

        auctions.push(parse_record(&columns, &record, row_num)?);
    }

    Ok(auctions)
}

/// Map one CSV record onto a validated `Auction`.
pub fn parse_record(
    columns: &ColumnMap,
    record: &csv::StringRecord,
    row_num: usize,
) -> Result<Auction, CsvLoadError> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let stock_number = field(columns.stock_number).to_string();
    let branch = field(columns.branch).to_string();

    let auction_date_utc = parse_auction_datetime(field(columns.auction_date))
        .map_err(|source| CsvLoadError::Date { row: row_num, source })?;

    let year = parse_year(field(columns.year), row_num)?;

    // An absent column or empty cell means "Other"
    let vehicle_type = columns
        .vehicle_type
        .and_then(|idx| record.get(idx))
        .filter(|s| !s.is_empty())
        .unwrap_or("Other");
    let vehicle_type = VehicleType::from_string(vehicle_type);

    let mileage = columns
        .odometer
        .and_then(|idx| record.get(idx))
        .and_then(parse_mileage);

    let vehicle = Vehicle::new(
        year,
        field(columns.make),
        field(columns.model),
        vehicle_type,
        mileage,
    )
    .map_err(|source| CsvLoadError::Vehicle { row: row_num, source })?;

    Ok(Auction::new(stock_number, branch, auction_date_utc, vehicle))
}

fn parse_year(value: &str, row_num: usize) -> Result<i32, CsvLoadError> {
    let year: i32 = value
        .trim()
        .parse()
        .map_err(|_| CsvLoadError::InvalidNumber {
            row: row_num,
            column: "Year",
            value: value.to_string(),
        })?;

    Ok(expand_two_digit_year(year))
}

/// Expand a two-digit year using the fixed pivot. Four-digit years pass
/// through unchanged.
fn expand_two_digit_year(year: i32) -> i32 {
    if year >= 100 {
        return year;
    }

    if year <= TWO_DIGIT_YEAR_PIVOT {
        2000 + year
    } else {
        1900 + year
    }
}

/// Extract an odometer reading from a raw field such as "162,022 mi".
///
/// Takes the first contiguous run of digits and grouping commas, strips the
/// commas and discards any trailing unit text. No digit run means the
/// reading is unknown, not zero and not an error.
fn parse_mileage(value: &str) -> Option<u32> {
    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "Stock Number,Branch Name,Auction Date,Year,Make,Model,Vehicle Type,Odometer";

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_expand_two_digit_year_partition() {
        assert_eq!(expand_two_digit_year(0), 2000);
        assert_eq!(expand_two_digit_year(15), 2015);
        assert_eq!(expand_two_digit_year(30), 2030);
        assert_eq!(expand_two_digit_year(31), 1931);
        assert_eq!(expand_two_digit_year(99), 1999);
        assert_eq!(expand_two_digit_year(1987), 1987);
    }

    #[test]
    fn test_two_digit_expansion_round_trips() {
        for year in (1931..=1999).chain(2000..=2030) {
            let two_digit = format!("{:02}", year % 100);
            let parsed: i32 = two_digit.parse().unwrap();
            assert_eq!(expand_two_digit_year(parsed), year);
        }
    }

    #[test]
    fn test_parse_mileage_extracts_digit_run() {
        assert_eq!(parse_mileage("162,022 mi"), Some(162_022));
        assert_eq!(parse_mileage("80,000 mi"), Some(80_000));
        assert_eq!(parse_mileage("5"), Some(5));
        assert_eq!(parse_mileage("approx 12,500 miles"), Some(12_500));
    }

    #[test]
    fn test_parse_mileage_without_digits_is_unknown() {
        assert_eq!(parse_mileage(""), None);
        assert_eq!(parse_mileage("unknown"), None);
        assert_eq!(parse_mileage("mi"), None);
        assert_eq!(parse_mileage(","), None);
    }

    #[test]
    fn test_load_parses_rows_in_order() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             A1,Dallas,\"Wed Sep 03, 3:30pm CST\",15,Toyota,Corolla,Automobiles,\"80,000 mi\"\n\
             A2,Chicago,\"Thu Sep 04, 1:00pm EST\",2018,Ford,F-150,Truck,\n"
        ));

        let auctions = load_auctions(file.path()).unwrap();
        assert_eq!(auctions.len(), 2);

        let first = &auctions[0];
        assert_eq!(first.stock_number(), "A1");
        assert_eq!(first.branch(), "Dallas");
        assert_eq!(first.vehicle().year(), 2015);
        assert_eq!(first.vehicle().mileage(), Some(80_000));
        assert_eq!(first.vehicle().vehicle_type(), VehicleType::Automobile);

        let second = &auctions[1];
        assert_eq!(second.stock_number(), "A2");
        assert_eq!(second.vehicle().mileage(), None);
    }

    #[test]
    fn test_bom_signature_is_stripped() {
        let mut content = Vec::new();
        content.extend_from_slice(b"\xef\xbb\xbf");
        content.extend_from_slice(HEADER.as_bytes());
        content.extend_from_slice(
            b"\nA1,Dallas,\"Wed Sep 03, 3:30pm CST\",2015,Toyota,Corolla,Automobiles,\n",
        );

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&content).unwrap();
        file.flush().unwrap();

        // With the BOM left in place the first header would read
        // "\u{feff}Stock Number" and column resolution would fail
        let auctions = load_auctions(file.path()).unwrap();
        assert_eq!(auctions[0].stock_number(), "A1");
    }

    #[test]
    fn test_missing_required_column_fails() {
        let file = write_csv(
            "Stock Number,Branch Name,Auction Date,Make,Model\n\
             A1,Dallas,\"Wed Sep 03, 3:30pm CST\",Toyota,Corolla\n",
        );

        let err = load_auctions(file.path()).unwrap_err();
        assert!(matches!(err, CsvLoadError::MissingColumn("Year")));
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let file = write_csv(
            "Stock Number,Branch Name,Auction Date,Year,Make,Model\n\
             A1,Dallas,\"Wed Sep 03, 3:30pm CST\",2015,Toyota,Corolla\n",
        );

        let auctions = load_auctions(file.path()).unwrap();
        assert_eq!(auctions[0].vehicle().vehicle_type(), VehicleType::Other);
        assert_eq!(auctions[0].vehicle().mileage(), None);
    }

    #[test]
    fn test_bad_date_aborts_file_with_row_number() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             A1,Dallas,\"Wed Sep 03, 3:30pm CST\",2015,Toyota,Corolla,Automobiles,\n\
             A2,Dallas,\"Wed Sep 03, 3:30pm\",2016,Honda,Civic,Automobiles,\n"
        ));

        let err = load_auctions(file.path()).unwrap_err();
        match err {
            CsvLoadError::Date { row, .. } => assert_eq!(row, 3),
            other => panic!("expected date error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_year_reports_row_and_value() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             A1,Dallas,\"Wed Sep 03, 3:30pm CST\",soon,Toyota,Corolla,Automobiles,\n"
        ));

        let err = load_auctions(file.path()).unwrap_err();
        match err {
            CsvLoadError::InvalidNumber { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Year");
                assert_eq!(value, "soon");
            }
            other => panic!("expected number error, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_year_fails_validation() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             A1,Dallas,\"Wed Sep 03, 3:30pm CST\",1899,Toyota,Corolla,Automobiles,\n"
        ));

        let err = load_auctions(file.path()).unwrap_err();
        assert!(matches!(err, CsvLoadError::Vehicle { row: 2, .. }));
    }

    #[test]
    fn test_unrecognized_vehicle_type_maps_to_other() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             A1,Dallas,\"Wed Sep 03, 3:30pm CST\",2015,Toyota,Corolla,Spaceship,\n"
        ));

        let auctions = load_auctions(file.path()).unwrap();
        assert_eq!(auctions[0].vehicle().vehicle_type(), VehicleType::Other);
    }
}
