//! Output file that only appears under its final name once the session succeeds.
//!
//! Data goes to `<name>.part` first. commit() flushes and renames it into place; dropping the handle
//! without committing removes the partial file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

pub struct StagedFile {
    writer: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl StagedFile {
    /// Create the temporary file. Fails with AlreadyExists if the final file exists and overwriting
    /// was not requested.
    pub fn create(final_path: &Path, force_overwrite: bool) -> io::Result<Self> {
        if !force_overwrite && final_path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists (use -f to overwrite)", final_path.display()),
            ));
        }
        let mut temp_name: OsString = final_path.as_os_str().to_owned();
        temp_name.push(".part");
        let temp_path = PathBuf::from(temp_name);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        debug!("Staging output in {}", temp_path.display());
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Flush everything to disk and move the file to its final name.
    pub fn commit(mut self) -> io::Result<PathBuf> {
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&self.temp_path, &self.final_path)?;
        Ok(self.final_path.clone())
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "staged file already committed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        // Still holding the writer means commit() never ran
        if self.writer.take().is_some() || self.temp_path.exists() {
            if let Err(e) = fs::remove_file(&self.temp_path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("Could not remove {}: {}", self.temp_path.display(), e);
                }
            }
        }
    }
}
