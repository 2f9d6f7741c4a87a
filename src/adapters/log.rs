use crate::utils::error::Result;
use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only error log under the logs directory.
#[derive(Debug)]
pub struct Log {
    path: PathBuf,
    file: File,
}

impl Log {
    pub fn new(dir: &Path, filename: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(filename);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 寫入一行 `YYYY-MM-DD HH:MM:SS - message`
    pub fn write(&self, message: impl Display) -> Result<()> {
        let line = format!(
            "{} - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        );
        tracing::debug!("📝 {}", line.trim_end());
        (&self.file).write_all(line.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_appends_lines() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("storage/logs");

        let log = Log::new(&logs, "error.log").unwrap();
        log.write("first").unwrap();
        log.write(format_args!("second {}", 2)).unwrap();

        let content = std::fs::read_to_string(logs.join("error.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - first"));
        assert!(lines[1].ends_with(" - second 2"));
        // 2024-01-01 00:00:00 - ...
        assert_eq!(lines[0].find(" - "), Some(19));
    }
}
