//! CSV export of generated bars.
//!
//! Columns: `time,open,high,low,close,volume`, with `time` in epoch milliseconds.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::bar::Bar;
use crate::domain::error::FeedError;

pub fn write_bars<W: Write>(writer: W, bars: &[Bar]) -> Result<(), FeedError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for bar in bars {
        wtr.serialize(bar).map_err(std::io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_bars_to_file(path: &Path, bars: &[Bar]) -> Result<(), FeedError> {
    let file = File::create(path).map_err(|e| {
        FeedError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to create {}: {}", path.display(), e),
        ))
    })?;
    write_bars(file, bars)
}
