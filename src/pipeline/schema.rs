use std::collections::HashMap;

use crate::common::constants::{
    COL_ARTIST, COL_CITY, COL_DATE, COL_DAY, COL_TIME, COL_VENUE, COL_VENUE_URL,
};
use crate::common::error::ImportError;
use crate::domain::{normalize_day, Event};

/// Typed column configuration for one CSV layout: which columns must be
/// present and which are optional (defaulting to the empty string). Column
/// presence is decided here, once per import, never per row.
#[derive(Debug, Clone)]
pub struct CsvSchema {
    pub required: Vec<&'static str>,
    pub optional: Vec<&'static str>,
}

impl CsvSchema {
    /// The `day,date,city,venue,venueUrl,artist,time` layout covering a
    /// whole week in one file.
    pub fn full_week() -> Self {
        Self {
            required: vec![COL_DAY, COL_CITY, COL_VENUE, COL_ARTIST, COL_TIME],
            optional: vec![COL_DATE, COL_VENUE_URL],
        }
    }

    /// The `venue,venueUrl,artist,date,time` layout for a single day chosen
    /// outside the file.
    pub fn single_day() -> Self {
        Self {
            required: vec![COL_VENUE, COL_ARTIST, COL_TIME],
            optional: vec![COL_VENUE_URL, COL_DATE, COL_CITY],
        }
    }

    /// Resolve the header row into column indexes. Matching is lowercase
    /// exact; unrecognized columns are ignored; a missing required column
    /// aborts the whole import.
    pub fn resolve(&self, header: &[String]) -> Result<ColumnMap, ImportError> {
        let lowered: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();
        let mut indexes = HashMap::new();

        for &name in &self.required {
            match lowered.iter().position(|h| h == name) {
                Some(idx) => {
                    indexes.insert(name, idx);
                }
                None => return Err(ImportError::MissingColumn(name.to_string())),
            }
        }
        for &name in &self.optional {
            if let Some(idx) = lowered.iter().position(|h| h == name) {
                indexes.insert(name, idx);
            }
        }

        Ok(ColumnMap { indexes })
    }
}

/// Header positions resolved for one import call.
#[derive(Debug)]
pub struct ColumnMap {
    indexes: HashMap<&'static str, usize>,
}

impl ColumnMap {
    pub fn has(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    /// The trimmed cell for a named column, or `""` when the column or the
    /// cell is absent from this row.
    pub fn field<'r>(&self, row: &'r [String], name: &str) -> &'r str {
        self.indexes
            .get(name)
            .and_then(|&idx| row.get(idx))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }
}

/// One accepted data row: the canonical day key (when the layout carries a
/// day column) and the mapped event.
#[derive(Debug, Clone)]
pub struct MappedRow {
    pub day: Option<&'static str>,
    pub event: Event,
}

#[derive(Debug)]
pub struct MapOutcome {
    pub rows: Vec<MappedRow>,
    pub skipped: usize,
}

/// Map tokenized rows (header first, blank rows already dropped) into event
/// candidates. Rows missing a required field or carrying an unrecognized day
/// name are skipped silently and counted.
pub fn map_rows(rows: &[Vec<String>], schema: &CsvSchema) -> Result<MapOutcome, ImportError> {
    if rows.len() < 2 {
        return Err(ImportError::EmptyInput);
    }

    let columns = schema.resolve(&rows[0])?;
    let day_aware = columns.has(COL_DAY);

    let mut mapped = Vec::new();
    let mut skipped = 0;

    for row in &rows[1..] {
        let day = if day_aware {
            match normalize_day(columns.field(row, COL_DAY)) {
                Some(day) => Some(day),
                None => {
                    skipped += 1;
                    continue;
                }
            }
        } else {
            None
        };

        let required_missing = schema
            .required
            .iter()
            .filter(|&&name| name != COL_DAY)
            .any(|&name| columns.field(row, name).is_empty());
        if required_missing {
            skipped += 1;
            continue;
        }

        mapped.push(MappedRow {
            day,
            event: Event {
                city: columns.field(row, COL_CITY).to_string(),
                venue: columns.field(row, COL_VENUE).to_string(),
                venue_url: columns.field(row, COL_VENUE_URL).to_string(),
                artist: columns.field(row, COL_ARTIST).to_string(),
                time: columns.field(row, COL_TIME).to_string(),
                date: columns.field(row, COL_DATE).to_string(),
            },
        });
    }

    Ok(MapOutcome {
        rows: mapped,
        skipped,
    })
}
