use crate::error::StoreError;
use crate::plane::{FuelLevel, PlaneRecord};
use std::collections::HashSet;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Flat-file home of the landing queue.
///
/// ```text
/// 3
/// 4 8 4 1 0
/// 1 50 1 0 0
/// 2 35 2 1 1
/// ```
///
/// The first line holds the record count, then one `id fuel arrival emergency canceled`
/// line per plane, booleans as `0`/`1`. Records come back in the order they were written.
pub struct QueueStore {
    path: PathBuf,
}

impl QueueStore {
    pub fn new(path: impl Into<PathBuf>) -> QueueStore {
        QueueStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, records: &[PlaneRecord]) -> Result<(), StoreError> {
        std::fs::write(&self.path, Self::render(records)).map_err(|source| StoreError::Unavailable {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), planes = records.len(), "queue saved");
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<PlaneRecord>, StoreError> {
        let data = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Unavailable {
            path: self.path.clone(),
            source,
        })?;
        let records = Self::parse(&data)?;
        info!(path = %self.path.display(), planes = records.len(), "queue loaded");
        Ok(records)
    }

    pub fn render(records: &[PlaneRecord]) -> String {
        let mut out = format!("{}\n", records.len());
        for r in records {
            // writing into a String cannot fail
            let _ = writeln!(
                out,
                "{} {} {} {} {}",
                r.id,
                r.fuel_level,
                r.arrival_time,
                u8::from(r.emergency),
                u8::from(r.canceled)
            );
        }
        out
    }

    pub fn parse(data: &str) -> Result<Vec<PlaneRecord>, StoreError> {
        let mut lines = data
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (count_line, count) = match lines.next() {
            Some((n, l)) => (n, parse_field::<usize>(l, n, "record count")?),
            None => return Err(malformed(1, "missing record count")),
        };

        let mut records = Vec::with_capacity(count);
        let mut seen = HashSet::new();
        for (n, line) in lines {
            if records.len() == count {
                return Err(malformed(n, format!("more records than the declared {count}")));
            }
            let record = parse_record(line, n)?;
            if !seen.insert(record.id) {
                return Err(malformed(n, format!("duplicate plane id {}", record.id)));
            }
            debug!(line = n, id = record.id, "parsed queue record");
            records.push(record);
        }

        if records.len() != count {
            return Err(malformed(
                count_line,
                format!("declared {count} records but found {}", records.len()),
            ));
        }
        Ok(records)
    }
}

fn malformed(line: usize, reason: impl Into<String>) -> StoreError {
    StoreError::Malformed {
        line,
        reason: reason.into(),
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, line: usize, what: &str) -> Result<T, StoreError> {
    raw.parse::<T>()
        .map_err(|_| malformed(line, format!("invalid {what} '{raw}'")))
}

fn parse_flag(raw: &str, line: usize, what: &str) -> Result<bool, StoreError> {
    match raw {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(malformed(line, format!("{what} must be 0 or 1, got '{raw}'"))),
    }
}

fn parse_record(line: &str, n: usize) -> Result<PlaneRecord, StoreError> {
    let fields = line.split_whitespace().collect::<Vec<&str>>();
    let [id, fuel, arrival, emergency, canceled] = fields.as_slice() else {
        return Err(malformed(n, format!("expected 5 fields, found {}", fields.len())));
    };

    let fuel_level = parse_field::<i64>(fuel, n, "fuel level")?;
    let fuel_level = FuelLevel::new(fuel_level).map_err(|e| malformed(n, e.to_string()))?;

    Ok(PlaneRecord {
        id: parse_field(id, n, "plane id")?,
        fuel_level: fuel_level.value(),
        arrival_time: parse_field(arrival, n, "arrival time")?,
        emergency: parse_flag(emergency, n, "emergency flag")?,
        canceled: parse_flag(canceled, n, "canceled flag")?,
    })
}
