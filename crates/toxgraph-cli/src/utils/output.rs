use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes `value` as pretty-printed JSON to `path`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_json_to(value, &mut writer)?;
            info!("Results written to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            write_json_to(value, &mut stdout.lock())?;
        }
    }
    Ok(())
}

fn write_json_to<T: Serialize>(value: &T, writer: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
