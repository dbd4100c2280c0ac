use std::{fs::OpenOptions, io::Write, path::Path, sync::Mutex};

use crate::sample::sample_model::EvalRecord;

/// Collects the samples of one run that need a second look into a JSONL
/// file, one record per line. Opening truncates, so the file only ever holds
/// the latest run. An unopenable path disables the log instead of failing
/// the run.
pub struct ErrorSampleLog {
    file: Option<Mutex<std::fs::File>>,
}

impl ErrorSampleLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                log::warn!("could not open error-sample log '{}': {}", path.display(), e);
                Self { file: None }
            }
        }
    }

    /// A log that drops everything.
    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Write every record; returns how many reached the file.
    pub fn log_all<'a>(&self, records: impl IntoIterator<Item = &'a EvalRecord>) -> usize {
        records.into_iter().filter(|record| self.log(record)).count()
    }

    /// Write one record. `false` when the log is disabled or the write failed.
    pub fn log(&self, record: &EvalRecord) -> bool {
        let file_mutex = match &self.file {
            Some(f) => f,
            None => return false,
        };

        let json = match serde_json::to_string(record) {
            Ok(j) => j,
            Err(e) => {
                log::warn!("failed to serialize sample {}: {}", record.uid, e);
                return false;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                log::warn!("error-sample log lock poisoned: {}", e);
                return false;
            }
        };

        match writeln!(file, "{}", json) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("failed to write sample {}: {}", record.uid, e);
                false
            }
        }
    }
}
