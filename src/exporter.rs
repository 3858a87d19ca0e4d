use crate::series::Series;
use crate::utils::errors::MonitoringError;
use log::debug;
use std::fs::Permissions;
use std::io::{self, BufWriter, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

const FILE_PREFIX: &str = "fd_stats_";

/// Writes finished series as `timestamp, count` lines.
///
/// Files are named `fd_stats_<name>.csv` inside the export directory and an
/// existing file of that name is replaced.
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn destination(&self, target_name: &str) -> PathBuf {
        let name: String = target_name
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{}{}.csv", FILE_PREFIX, name))
    }

    /// Write `series` next to its destination, then rename it into place.
    pub fn export(&self, series: &Series, target_name: &str) -> Result<PathBuf, MonitoringError> {
        let path = self.destination(target_name);

        let mut staged = tempfile::Builder::new()
            .prefix(&format!(".{}", FILE_PREFIX))
            .suffix(".tmp")
            .permissions(Permissions::from_mode(0o644))
            .tempfile_in(&self.dir)
            .map_err(|e| MonitoringError::sink(&path, e))?;

        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            write_records(&mut writer, series).map_err(|e| MonitoringError::sink(&path, e))?;
            writer.flush().map_err(|e| MonitoringError::sink(&path, e))?;
        }

        debug!("Moving {} into {}", staged.path().display(), path.display());
        staged
            .persist(&path)
            .map_err(|e| MonitoringError::sink(&path, e.error))?;

        Ok(path)
    }
}

pub fn write_records<W: Write>(out: &mut W, series: &Series) -> io::Result<()> {
    for sample in series {
        writeln!(out, "{}, {}", sample.timestamp, sample.count)?;
    }
    Ok(())
}
