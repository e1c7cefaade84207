//! Plain text persistence: one `key:value` record per line, in ascending key
//! order, with no header and no escaping. A key or value containing the
//! delimiter does not survive a round trip.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::map::{Insertion, SkipListMap};

/// Separates key and value on every line.
pub const DELIMITER: char = ':';

/// File name used by callers that don't pick their own.
pub const STORE_FILE: &str = "dumpfile";

/// What happened to the lines read by [`SkipListMap::load`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Records added to the list.
    pub inserted: usize,
    /// Records whose key was already present. Their values were ignored.
    pub duplicates: usize,
    /// Lines that could not be turned into a record.
    pub skipped: usize,
}

/// Splits a line on the first delimiter. Blank lines, lines without a
/// delimiter and lines with an empty key or value yield `None`.
fn split_record(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(DELIMITER)?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_record<K: FromStr, V: FromStr>(line: &[u8]) -> Option<(K, V)> {
    let line = std::str::from_utf8(line).ok()?;
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (key, value) = split_record(line)?;
    Some((key.parse().ok()?, value.parse().ok()?))
}

fn open(path: &Path, create: bool) -> Result<File> {
    let file = if create { File::create(path) } else { File::open(path) };
    file.map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

impl<K: Display, V: Display> SkipListMap<K, V> {
    /// Writes every entry to `sink` as `key:value` lines in ascending key
    /// order and flushes it. Returns the number of records written.
    pub fn dump<W: Write>(&self, mut sink: W) -> Result<usize> {
        let mut written = 0;
        for (key, value) in self.iter() {
            writeln!(sink, "{}{}{}", key, DELIMITER, value)?;
            written += 1;
        }
        sink.flush()?;

        debug!("dumped {} records", written);
        Ok(written)
    }

    /// Dumps into the file at `path`, truncating it first.
    pub fn dump_to_path<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let file = open(path.as_ref(), true)?;
        self.dump(BufWriter::new(file))
    }
}

impl<K: Ord + FromStr, V: FromStr> SkipListMap<K, V> {
    /// Reads `key:value` lines from `source` and inserts them. Malformed lines
    /// are skipped, and keys already present keep their current value.
    ///
    /// The whole source is read before anything is inserted, so an I/O error
    /// leaves the list untouched.
    pub fn load<R: BufRead>(&mut self, mut source: R) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        let mut records = Vec::new();
        let mut line = Vec::new();
        let mut number = 0;

        loop {
            line.clear();
            if source.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            number += 1;

            match parse_record::<K, V>(&line) {
                Some(record) => records.push(record),
                None => {
                    if !line.iter().all(u8::is_ascii_whitespace) {
                        warn!("skipping malformed line {}", number);
                    }
                    report.skipped += 1;
                }
            }
        }

        for (key, value) in records {
            match self.insert(key, value) {
                Insertion::Inserted => report.inserted += 1,
                Insertion::AlreadyExists => report.duplicates += 1,
            }
        }

        debug!(
            "loaded {} records ({} duplicates, {} lines skipped)",
            report.inserted, report.duplicates, report.skipped
        );
        Ok(report)
    }

    /// Loads from the file at `path`.
    pub fn load_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport> {
        let file = open(path.as_ref(), false)?;
        self.load(BufReader::new(file))
    }
}
