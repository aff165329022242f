use super::{Destination, DestinationId};
use crate::{
    error::Result,
    exit_hook,
    filter::{FilterSpec, Tester},
    styles::strip_styles,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    message: &'a str,
}

/// appends admitted messages to a file, as `timestamp message` or JSON lines
///
/// The file is opened once, in append mode, and closed by [`FileSink::close`],
/// on drop, or by the process exit hook, whichever comes first.
pub struct FileSink {
    id: DestinationId,
    path: PathBuf,
    json: bool,
    // shared with the exit hook, which may close it from another thread
    file: Arc<Mutex<Option<File>>>,
    tester: Tester,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>, json: bool) -> Result<Self> {
        Self::with_filter(path, json, None)
    }

    pub fn with_filter(path: impl AsRef<Path>, json: bool, filter: Option<FilterSpec>) -> Result<Self> {
        let path = std::path::absolute(path.as_ref())?;
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        log::debug!("FileSink: Opened {}", path.display());

        let id = DestinationId::new();
        let file = Arc::new(Mutex::new(Some(file)));
        let hook_file = file.clone();
        exit_hook::attach(
            id,
            Box::new(move || {
                hook_file
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
            }),
        );

        Ok(Self {
            id,
            path,
            json,
            file,
            tester: Tester::compile(filter.as_ref()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn is_closed(&self) -> bool {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// close the file; safe to call any number of times
    pub fn close(&mut self) {
        exit_hook::detach(self.id);
        let closed = self
            .file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if closed.is_some() {
            log::debug!("FileSink: Closed {}", self.path.display());
        }
    }

    fn serialize(&self, message: &str) -> Result<String> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let message = strip_styles(message);
        let mut line = if self.json {
            serde_json::to_string(&JsonLine {
                timestamp,
                message: &message,
            })?
        } else {
            format!("{} {}", timestamp, message)
        };
        line.push('\n');
        Ok(line)
    }
}

impl Destination for FileSink {
    fn on_print(&mut self, message: &str) -> Result<()> {
        let line = self.serialize(message)?;
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(file) => file.write_all(line.as_bytes())?,
            None => log::debug!("FileSink: Dropping message, {} is closed", self.path.display()),
        }
        Ok(())
    }

    fn tester(&self) -> &Tester {
        &self.tester
    }

    fn id(&self) -> DestinationId {
        self.id
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FilterOptions, INFO, Value, values};
    use std::fs;
    use uuid::Uuid;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("taglog-test-{}", Uuid::new_v4()));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_plain_lines_are_timestamped_and_stripped() {
        let dir = TempDir::new();
        let path = dir.0.join("out.log");
        let mut sink = FileSink::new(&path, false).unwrap();
        sink.print(&[Value::from(INFO.format("hello {}", &values![1]))]).unwrap();
        sink.print(&values!["second"]).unwrap();
        sink.close();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let (timestamp, message) = lines[0].split_once(' ').unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        assert!(timestamp.ends_with('Z'));
        assert_eq!(message, "info hello 1");
        assert!(lines[1].ends_with(" second"));
    }

    #[test]
    fn test_json_lines() {
        let dir = TempDir::new();
        let path = dir.0.join("out.jsonl");
        let mut sink = FileSink::new(&path, true).unwrap();
        sink.print(&values!["\x1b[31mred\x1b[0m", "text"]).unwrap();
        drop(sink);

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(contents.trim_end()).unwrap();
        assert_eq!(parsed["message"], "red text");
        assert!(parsed["timestamp"].as_str().is_some());
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = TempDir::new();
        let path = dir.0.join("out.log");
        fs::write(&path, "existing\n").unwrap();

        let mut sink = FileSink::new(&path, false).unwrap();
        sink.print(&values!["new"]).unwrap();
        sink.close();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("existing\n"));
        assert!(contents.trim_end().ends_with(" new"));
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = TempDir::new();
        let mut sink = FileSink::new(dir.0.join("out.log"), false).unwrap();
        assert!(exit_hook::is_attached(sink.id()));

        sink.close();
        sink.close();
        assert!(sink.is_closed());
        assert!(!exit_hook::is_attached(sink.id()));
        // writes after close are dropped, not errors
        assert!(sink.print(&values!["late"]).is_ok());
    }

    #[test]
    fn test_exit_hook_closes_file() {
        let dir = TempDir::new();
        let path = dir.0.join("out.log");
        let mut sink = FileSink::new(&path, false).unwrap();
        sink.print(&values!["before exit"]).unwrap();

        assert!(exit_hook::run(sink.id()));
        assert!(sink.is_closed());
        assert!(!exit_hook::is_attached(sink.id()));

        sink.print(&values!["after exit"]).unwrap();
        sink.close();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("before exit"));
        assert!(!contents.contains("after exit"));
    }

    #[test]
    fn test_path_is_absolute() {
        let dir = TempDir::new();
        fs::create_dir_all(dir.0.join("nested")).unwrap();
        let sink = FileSink::new(dir.0.join("nested/../out.log"), false).unwrap();
        assert!(sink.path().is_absolute());
        assert!(dir.0.join("out.log").exists());
    }

    #[test]
    fn test_filter_applies() {
        let dir = TempDir::new();
        let path = dir.0.join("out.log");
        let filter = FilterSpec::from(FilterOptions::new().only(["keep"]));
        let mut sink = FileSink::with_filter(&path, false, Some(filter)).unwrap();
        sink.print(&values!["drop me"]).unwrap();
        sink.print(&values!["keep me"]).unwrap();
        sink.close();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new();
        let result = FileSink::new(dir.0.join("missing/out.log"), false);
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
