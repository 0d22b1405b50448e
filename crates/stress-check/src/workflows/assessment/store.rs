use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::domain::StressLevel;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const RESPONSE_COLUMNS: [&str; 4] = ["id", "timestamp", "score", "level"];

/// One row of the durable `responses` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: u64,
    pub timestamp: String,
    pub score: u32,
    pub level: StressLevel,
}

impl ResponseRecord {
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}

pub fn format_timestamp(moment: NaiveDateTime) -> String {
    moment.format(TIMESTAMP_FORMAT).to_string()
}

/// Append-only log of finished assessments.
pub trait ResponseStore: Send + Sync {
    /// Persist one result; the store assigns the id and timestamp.
    fn append(&self, score: u32, level: StressLevel) -> Result<ResponseRecord, StoreError>;
    fn list_all(&self) -> Result<Vec<ResponseRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("response table io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("response table is not valid csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("response table is corrupt: {0}")]
    Corrupt(String),
    #[error("response store unavailable: {0}")]
    Unavailable(String),
}

/// `responses` table kept as a CSV file with an `id,timestamp,score,level` header.
///
/// Every operation holds an advisory lock on the file itself, so several
/// processes (the HTTP service and a terminal session, say) can share one table.
/// Ids are derived from the rows on disk while the exclusive lock is held.
#[derive(Debug)]
pub struct CsvResponseStore {
    path: PathBuf,
}

impl CsvResponseStore {
    /// Open the table, creating it with a header row when absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;
        file.lock()?;
        if file.metadata()?.len() == 0 {
            let mut writer = csv::Writer::from_writer(&file);
            writer.write_record(RESPONSE_COLUMNS)?;
            writer.flush()?;
        }
        (&file).rewind()?;
        let existing = read_records(&file)?;
        file.unlock()?;

        tracing::debug!(path = %path.display(), rows = existing.len(), "opened response table");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResponseStore for CsvResponseStore {
    fn append(&self, score: u32, level: StressLevel) -> Result<ResponseRecord, StoreError> {
        let file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        file.lock()?;

        let next_id = read_records(&file)?
            .iter()
            .map(|record| record.id)
            .max()
            .unwrap_or(0)
            + 1;
        let record = ResponseRecord {
            id: next_id,
            timestamp: format_timestamp(Local::now().naive_local()),
            score,
            level,
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&file);
        writer.serialize(&record)?;
        writer.flush()?;
        drop(writer);
        file.sync_data()?;
        file.unlock()?;

        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        let file = File::open(&self.path)?;
        file.lock_shared()?;
        let records = read_records(&file)?;
        file.unlock()?;
        Ok(records)
    }
}

fn read_records<R: Read>(reader: R) -> Result<Vec<ResponseRecord>, StoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(reader));

    let headers = csv_reader.headers()?.clone();
    if headers.iter().ne(RESPONSE_COLUMNS) {
        return Err(StoreError::Corrupt(format!(
            "unexpected header row: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<ResponseRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// Write records as CSV with the table's header row.
pub fn write_csv<W: Write>(records: &[ResponseRecord], writer: W) -> Result<(), StoreError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(RESPONSE_COLUMNS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
