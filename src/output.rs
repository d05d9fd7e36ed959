//! Output writer
//!
//! Rendered text is staged in a temporary file next to the destination,
//! optionally run through a formatter (`gofmt -w`), and renamed over the
//! destination. Any failure before the rename drops the temporary file and
//! leaves the destination as it was.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{GenError, Result};

/// Result of comparing a render with the file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    UpToDate,
    /// Destination differs from, or is missing, the rendered text
    Drifted,
}

#[derive(Debug, Clone)]
pub struct OutputWriter {
    path: PathBuf,
    /// Program invoked as `<formatter> -w <file>` on the staged file
    formatter: Option<String>,
}

impl OutputWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            formatter: None,
        }
    }

    pub fn with_gofmt(self, enabled: bool) -> Self {
        self.with_formatter(enabled.then(|| "gofmt".to_string()))
    }

    pub fn with_formatter(mut self, formatter: Option<String>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Write `text` into a temporary file beside the destination and format it
    fn stage(&self, text: &str) -> Result<NamedTempFile> {
        let suffix = self
            .path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let mut staged = tempfile::Builder::new()
            .prefix(".sentrydata-")
            .suffix(&suffix)
            .tempfile_in(self.directory())?;
        staged.write_all(text.as_bytes())?;
        staged.flush()?;

        if let Some(formatter) = &self.formatter {
            run_formatter(formatter, staged.path())?;
        }
        Ok(staged)
    }

    /// Text as it would land on disk, formatter applied
    pub fn finalize(&self, text: &str) -> Result<String> {
        if self.formatter.is_none() {
            return Ok(text.to_string());
        }
        fs::create_dir_all(self.directory())?;
        let staged = self.stage(text)?;
        Ok(fs::read_to_string(staged.path())?)
    }

    /// Replace the destination with `text` atomically
    pub fn write(&self, text: &str) -> Result<()> {
        fs::create_dir_all(self.directory())?;
        let staged = self.stage(text)?;

        match fs::metadata(&self.path) {
            Ok(existing) => staged.as_file().set_permissions(existing.permissions())?,
            Err(_) => default_permissions(staged.as_file())?,
        }

        staged.persist(&self.path).map_err(|e| GenError::Io(e.error))?;
        info!("wrote {}", self.path.display());
        Ok(())
    }

    /// Compare the destination with what [`write`](Self::write) would produce
    pub fn check(&self, text: &str) -> Result<CheckOutcome> {
        let current = match fs::read_to_string(&self.path) {
            Ok(current) => current,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist", self.path.display());
                return Ok(CheckOutcome::Drifted);
            }
            Err(e) => return Err(e.into()),
        };

        if current == self.finalize(text)? {
            Ok(CheckOutcome::UpToDate)
        } else {
            Ok(CheckOutcome::Drifted)
        }
    }
}

fn run_formatter(formatter: &str, path: &Path) -> Result<()> {
    debug!("{} -w {}", formatter, path.display());
    let output = Command::new(formatter)
        .arg("-w")
        .arg(path)
        .output()
        .map_err(|e| GenError::Render(format!("failed to run {formatter}: {e}")))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(GenError::Render(format!(
            "{formatter} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

#[cfg(unix)]
fn default_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with(".sentrydata-"))
            .collect()
    }

    #[test]
    fn test_write_creates_directories_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("internal/sentrydata/sentrydata.go");
        let writer = OutputWriter::new(&path);

        writer.write("package sentrydata\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "package sentrydata\n");

        writer.write("package sentrydata\n\nvar X = 1\n").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "package sentrydata\n\nvar X = 1\n"
        );
        assert!(leftovers(path.parent().unwrap()).is_empty());
    }

    #[test]
    fn test_check_detects_drift() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentrydata.go");
        let writer = OutputWriter::new(&path);

        assert_eq!(writer.check("package a\n").unwrap(), CheckOutcome::Drifted);
        writer.write("package a\n").unwrap();
        assert_eq!(writer.check("package a\n").unwrap(), CheckOutcome::UpToDate);
        assert_eq!(writer.check("package b\n").unwrap(), CheckOutcome::Drifted);
    }

    #[test]
    fn test_formatter_failure_leaves_destination_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentrydata.go");
        fs::write(&path, "package previous\n").unwrap();

        let writer = OutputWriter::new(&path)
            .with_formatter(Some("sentrydata-gen-no-such-formatter".to_string()));
        let err = writer.write("package next\n").unwrap_err();

        assert!(matches!(err, GenError::Render(_)), "{err}");
        assert_eq!(fs::read_to_string(&path).unwrap(), "package previous\n");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentrydata.go");
        OutputWriter::new(&path).write("package a\n").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
