//! Sheet download and CSV iteration

use super::row::SheetRow;
use csv::ReaderBuilder;
use std::io::Read;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading the source feed
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for sheet operations
pub type SheetResult<T> = Result<T, SheetError>;

/// Fetch the published sheet once and parse every data row.
///
/// The feed is served as UTF-8 CSV; a failed GET or a malformed stream is
/// fatal for the run (spreadsheet problems are operator problems).
pub fn fetch_sheet(client: &reqwest::blocking::Client, url: &str) -> SheetResult<Vec<SheetRow>> {
    let text = client.get(url).send()?.error_for_status()?.text()?;
    let rows = parse_sheet(text.as_bytes())?;
    debug!(url, rows = rows.len(), "fetched sheet");
    Ok(rows)
}

/// Parse CSV text into rows. The header row is dropped; data rows may be
/// ragged (trailing columns missing).
pub fn parse_sheet<R: Read>(input: R) -> SheetResult<Vec<SheetRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(SheetRow::parse(&record?));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::ItemId;

    const SHEET: &str = "\
Kohde,Lon,Lat,Nimi,Tekijä,Valmistunut,Huom,Wikipedia
https://www.wikidata.org/wiki/Q1,21.7975,61.4857,Patsas,Essi Esimerkki,,,https://fi.wikipedia.org/wiki/Patsas
ei linkkiä,,,Nimetön,,,,
https://www.wikidata.org/wiki/Q2,,,,";

    #[test]
    fn header_row_is_dropped() {
        let rows = parse_sheet(SHEET.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].item, Some(ItemId::new("Q1")));
    }

    #[test]
    fn ragged_rows_parse() {
        let rows = parse_sheet(SHEET.as_bytes()).unwrap();
        assert_eq!(rows[2].item, Some(ItemId::new("Q2")));
        assert_eq!(rows[2].wiki_url, "");
    }

    #[test]
    fn unlinked_row_has_no_item() {
        let rows = parse_sheet(SHEET.as_bytes()).unwrap();
        assert_eq!(rows[1].item, None);
        assert_eq!(rows[1].label, "Nimetön");
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let rows = parse_sheet("".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
