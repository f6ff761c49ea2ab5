//! Row parser for the source spreadsheet

use crate::repo::ItemId;
use csv::StringRecord;
use url::Url;

// Fixed column order of the published sheet. Columns 5 and 6 (publication
// date, unused) are present in the feed but not read.
const COL_ITEM_URL: usize = 0;
const COL_LONGITUDE: usize = 1;
const COL_LATITUDE: usize = 2;
const COL_LABEL: usize = 3;
const COL_CREATOR: usize = 4;
const COL_WIKI_URL: usize = 7;

/// Typed view of one sheet row.
///
/// Fields the row does not supply in usable form come out as `None` or an
/// empty string; they are "fact not supplied", never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// Item the row refers to; `None` means the row is skipped entirely
    pub item: Option<ItemId>,
    /// (longitude, latitude), present only when both fields parse as numbers
    pub coordinates: Option<(f64, f64)>,
    /// Localized label text, possibly empty
    pub label: String,
    /// Free-text creator name, possibly empty
    pub creator: String,
    /// Wiki page URL, possibly empty
    pub wiki_url: String,
}

impl SheetRow {
    /// Parse one CSV record. Missing trailing columns read as empty fields.
    pub fn parse(record: &StringRecord) -> Self {
        let longitude = field(record, COL_LONGITUDE).parse::<f64>().ok();
        let latitude = field(record, COL_LATITUDE).parse::<f64>().ok();
        // Both-or-neither: no partial coordinate
        let coordinates = match (longitude, latitude) {
            (Some(longitude), Some(latitude)) => Some((longitude, latitude)),
            _ => None,
        };
        Self {
            item: item_reference(field(record, COL_ITEM_URL)),
            coordinates,
            label: field(record, COL_LABEL).to_string(),
            creator: field(record, COL_CREATOR).to_string(),
            wiki_url: field(record, COL_WIKI_URL).to_string(),
        }
    }
}

fn field<'a>(record: &'a StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("").trim()
}

/// Extract the item ID from a reference URL like
/// `https://www.wikidata.org/wiki/Q123`. Only fields that parse as a URL
/// with a scheme count as a reference; the ID is the second path segment.
fn item_reference(field: &str) -> Option<ItemId> {
    let url = Url::parse(field).ok()?;
    let id = url.path_segments()?.nth(1)?;
    if id.is_empty() {
        return None;
    }
    Some(ItemId::new(id))
}
