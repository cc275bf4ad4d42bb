use std::path::Path;

use tracing::info;

use crate::error::BackupError;
use crate::{StockRecord, HEADERS};

/// Overwrites `path` with a header line and one line per record.
///
/// An empty slice leaves any existing file untouched and returns `Ok(false)`.
pub fn write_backup(path: &Path, records: &[StockRecord]) -> Result<bool, BackupError> {
    if records.is_empty() {
        return Ok(false);
    }

    let csv_error = |source| BackupError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(HEADERS).map_err(csv_error)?;
    for record in records {
        writer
            .write_record(
                HEADERS
                    .iter()
                    .map(|header| record.field(&header.to_ascii_lowercase()).unwrap_or_default()),
            )
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|source| BackupError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), rows = records.len(), "backup written");
    Ok(true)
}
