use crate::error::Result;
use crate::models::{ListingRecord, CSV_HEADER};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write the header and one row per listing
pub fn write_csv<W: Write>(writer: W, listings: &[ListingRecord]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(CSV_HEADER)?;
    for listing in listings {
        csv.write_record(listing.to_row())?;
    }
    csv.flush()?;

    Ok(())
}

/// Create (or truncate) `path` and write the export to it
pub fn write_csv_file(path: impl AsRef<Path>, listings: &[ListingRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(file, listings)?;

    info!("💾 Saved {} listings to {}", listings.len(), path.display());
    Ok(())
}
