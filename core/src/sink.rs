//! Per-request CSV log sink

use std::fs::File;
use std::sync::Mutex;

use crate::error::EngineError;

/// Thread-safe CSV log of per-request outcomes
///
/// One row per completed outcome: `index,status,snippet`, with status 0 for
/// transport and encoding failures. Rows are flushed as they are written so
/// the log survives an interrupted run. Quoting follows RFC 4180, so commas,
/// quotes and embedded newlines in the snippet are safe.
#[derive(Debug)]
pub struct CsvSink {
    writer: Mutex<csv::Writer<File>>,
}

impl CsvSink {
    /// Create or truncate the log file and write the header row
    pub fn create(path: &str) -> Result<Self, EngineError> {
        let cannot_open = |reason: String| EngineError::CannotOpenLog {
            path: path.to_string(),
            reason,
        };

        let file = File::create(path).map_err(|e| cannot_open(e.to_string()))?;
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(["index", "status", "snippet"])
            .map_err(|e| cannot_open(e.to_string()))?;
        writer.flush().map_err(|e| cannot_open(e.to_string()))?;

        Ok(Self {
            writer: Mutex::new(writer),
        })
    }

    /// Append one outcome row and flush it
    pub fn append(&self, index: usize, status: u16, snippet: &str) -> csv::Result<()> {
        let mut writer = self.writer.lock().unwrap();
        writer.write_record([&index.to_string(), &status.to_string(), snippet])?;
        writer.flush()?;
        Ok(())
    }

    /// Flush any buffered rows
    pub fn finish(&self) -> csv::Result<()> {
        self.writer.lock().unwrap().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sink_path(dir: &tempfile::TempDir) -> String {
        dir.path().join("requests.csv").to_string_lossy().into_owned()
    }

    #[test]
    fn test_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = sink_path(&dir);

        let sink = CsvSink::create(&path).unwrap();
        sink.append(0, 200, "OK").unwrap();
        sink.append(1, 0, "connection refused").unwrap();
        sink.finish().unwrap();

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "index,status,snippet");
        assert_eq!(lines[1], "0,200,OK");
        assert_eq!(lines[2], "1,0,connection refused");
    }

    #[test]
    fn test_snippet_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = sink_path(&dir);

        let sink = CsvSink::create(&path).unwrap();
        sink.append(3, 500, "line one\nline \"two\", three").unwrap();
        sink.finish().unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "3");
        assert_eq!(&record[1], "500");
        assert_eq!(&record[2], "line one\nline \"two\", three");
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = sink_path(&dir);

        {
            let sink = CsvSink::create(&path).unwrap();
            sink.append(0, 200, "stale").unwrap();
        }
        let sink = CsvSink::create(&path).unwrap();
        sink.finish().unwrap();

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn test_create_bad_path() {
        let err = CsvSink::create("/nonexistent-dir/requests.csv").unwrap_err();
        assert!(matches!(err, EngineError::CannotOpenLog { .. }));
    }
}
