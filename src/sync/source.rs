use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::mac::MacAddr;
use super::model::{ReservationRecord, ReservationSet};

const MAC_COLUMN: &str = "MAC";
const IP_COLUMN: &str = "IP";
const NAME_COLUMN: &str = "Name";
const BOM: &[u8] = b"\xef\xbb\xbf";

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Error reading {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Error parsing {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("Error parsing {} row {row}: missing {column} column", path.display())]
    MissingColumn { path: PathBuf, row: usize, column: &'static str },
}

/// Strips whitespace and one pair of surrounding quotes from a path as typed
/// at a prompt.
pub fn clean_path(input: &str) -> PathBuf {
    let trimmed = input.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| trimmed.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)))
        .unwrap_or(trimmed);

    PathBuf::from(unquoted)
}

pub fn read_reservations(path: &Path) -> Result<ReservationSet, SourceError> {
    let content = fs::read(path)
        .map_err(|source| SourceError::Io { path: path.to_owned(), source })?;

    parse_reservations(path, &content)
}

/// Rows with an empty MAC or IP are skipped; rows lacking those fields fail.
pub fn parse_reservations(path: &Path, content: impl AsRef<[u8]>) -> Result<ReservationSet, SourceError> {
    let content = content.as_ref();
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let csv_error = |source| SourceError::Csv { path: path.to_owned(), source };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let column = |name: &'static str| {
        headers.iter().position(|h| h == name).ok_or_else(|| SourceError::MissingColumn {
            path: path.to_owned(),
            row: 0,
            column: name,
        })
    };
    let mac_idx = column(MAC_COLUMN)?;
    let ip_idx = column(IP_COLUMN)?;
    let name_idx = column(NAME_COLUMN)?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row_number = idx + 1;
        let row = row.map_err(csv_error)?;
        let field = |column_idx: usize, column: &'static str| {
            row.get(column_idx).ok_or_else(|| SourceError::MissingColumn {
                path: path.to_owned(),
                row: row_number,
                column,
            })
        };

        let mac = field(mac_idx, MAC_COLUMN)?.normalize_mac();
        let ip = field(ip_idx, IP_COLUMN)?.trim();
        let name = row.get(name_idx).unwrap_or_default().trim();

        match ReservationRecord::new(mac, ip, name) {
            Some(record) => {
                if !record.hardware_address().is_well_formed_mac() {
                    warn!("{} row {}: unusual MAC address {:?}", path.display(), row_number, record.hardware_address());
                }
                records.push(record);
            }
            None => debug!("{} row {}: skipped, empty MAC or IP", path.display(), row_number),
        }
    }

    Ok(ReservationSet::new(path, records))
}
