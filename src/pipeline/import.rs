use std::cmp::Ordering;

use tracing::debug;

use crate::common::error::ImportError;
use crate::domain::WeekData;
use crate::pipeline::bucket::bucket;
use crate::pipeline::schema::{map_rows, CsvSchema};
use crate::pipeline::tokenize::tokenize;

/// Result of parsing one CSV file: the bucketed dataset plus the aggregate
/// row counts surfaced to the caller. Rejected rows are never itemized.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub week: WeekData,
    pub imported: usize,
    pub skipped: usize,
}

/// Parse a full-week CSV (`day,date,city,venue,venueUrl,artist,time`) into a
/// dataset. Each day's list is ordered by venue then time.
pub fn parse_week_csv(text: &str) -> Result<ParseOutcome, ImportError> {
    let rows = non_blank_rows(tokenize(text));
    let outcome = map_rows(&rows, &CsvSchema::full_week())?;
    let (mapped, skipped) = (outcome.rows, outcome.skipped);
    if mapped.is_empty() {
        return Err(ImportError::NoValidRows);
    }

    let imported = mapped.len();
    let mut week = bucket(
        mapped
            .into_iter()
            .filter_map(|row| row.day.map(|day| (day, row.event))),
    );

    for (_, events) in week.days.iter_mut() {
        events.sort_by(|a, b| {
            natural_cmp(&a.venue, &b.venue).then_with(|| natural_cmp(&a.time, &b.time))
        });
    }

    debug!(imported, skipped, "parsed full-week CSV");
    Ok(ParseOutcome {
        week,
        imported,
        skipped,
    })
}

/// Parse a single-day CSV (`venue,venueUrl,artist,date,time`) destined for
/// one canonical day. Arrival order is preserved.
pub fn parse_day_csv(text: &str, day: &'static str) -> Result<ParseOutcome, ImportError> {
    let rows = non_blank_rows(tokenize(text));
    let outcome = map_rows(&rows, &CsvSchema::single_day())?;
    let (mapped, skipped) = (outcome.rows, outcome.skipped);
    if mapped.is_empty() {
        return Err(ImportError::NoValidRows);
    }

    let imported = mapped.len();
    let week = bucket(mapped.into_iter().map(|row| (day, row.event)));

    debug!(imported, skipped, day, "parsed single-day CSV");
    Ok(ParseOutcome {
        week,
        imported,
        skipped,
    })
}

fn non_blank_rows(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    rows.into_iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect()
}

/// Case-insensitive string comparison with embedded unsigned integer runs
/// compared numerically, so "Venue 2" orders before "Venue 10". Ties fall
/// back to the raw strings to keep the ordering total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let av: Vec<char> = a.chars().collect();
    let bv: Vec<char> = b.chars().collect();
    let (mut i, mut j) = (0, 0);

    while i < av.len() && j < bv.len() {
        if av[i].is_ascii_digit() && bv[j].is_ascii_digit() {
            let run_a = digit_run(&av, &mut i);
            let run_b = digit_run(&bv, &mut j);
            let ord = run_a.len().cmp(&run_b.len()).then_with(|| run_a.cmp(&run_b));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = av[i].to_lowercase().cmp(bv[j].to_lowercase());
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (av.len() - i)
        .cmp(&(bv.len() - j))
        .then_with(|| a.cmp(b))
}

/// Consume a digit run starting at `*pos`, returning it without leading
/// zeros (an all-zero run keeps one digit).
fn digit_run(chars: &[char], pos: &mut usize) -> Vec<char> {
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    let run = &chars[start..*pos];
    let trimmed: Vec<char> = run.iter().skip_while(|&&c| c == '0').copied().collect();
    if trimmed.is_empty() {
        vec!['0']
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_week_csv_buckets_and_sorts() {
        let csv = "day,city,venue,artist,time\n\
                   Monday,Portland,Spare Room,The Rivets,21:00\n\
                   Monday,Portland,Bluebird Bar,Night Owls,19:00\n\
                   friday,Portland,Bluebird Bar,The Rivets,20:00";
        let outcome = parse_week_csv(csv).unwrap();

        assert_eq!(outcome.imported, 3);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.week.days.monday.len(), 2);
        assert_eq!(outcome.week.days.friday.len(), 1);
        // sorted by venue
        assert_eq!(outcome.week.days.monday[0].venue, "Bluebird Bar");
        assert_eq!(outcome.week.days.monday[1].venue, "Spare Room");
    }

    #[test]
    fn test_parse_week_csv_sorts_by_time_within_venue() {
        let csv = "day,city,venue,artist,time\n\
                   Monday,Portland,Bluebird Bar,Late Act,22:00\n\
                   Monday,Portland,Bluebird Bar,Early Act,19:30";
        let outcome = parse_week_csv(csv).unwrap();
        assert_eq!(outcome.week.days.monday[0].time, "19:30");
        assert_eq!(outcome.week.days.monday[1].time, "22:00");
    }

    #[test]
    fn test_parse_day_csv_preserves_arrival_order() {
        let csv = "venue,venueUrl,artist,date,time\n\
                   Spare Room,,The Rivets,,21:00\n\
                   Bluebird Bar,,Night Owls,,19:00";
        let outcome = parse_day_csv(csv, "Wednesday").unwrap();

        assert_eq!(outcome.imported, 2);
        assert_eq!(outcome.week.days.wednesday.len(), 2);
        assert_eq!(outcome.week.days.wednesday[0].venue, "Spare Room");
        assert_eq!(outcome.week.days.wednesday[1].venue, "Bluebird Bar");
        assert!(outcome.week.days.monday.is_empty());
    }

    #[test]
    fn test_all_rows_invalid_is_no_valid_rows() {
        let csv = "venue,artist,time\n,The Rivets,19:00\nBluebird Bar,,20:00";
        assert_eq!(parse_day_csv(csv, "Monday").unwrap_err(), ImportError::NoValidRows);
    }

    #[test]
    fn test_whitespace_only_input_is_empty() {
        assert_eq!(parse_week_csv("").unwrap_err(), ImportError::EmptyInput);
        assert_eq!(parse_week_csv("\n  \n").unwrap_err(), ImportError::EmptyInput);
    }

    #[test]
    fn test_natural_cmp_numeric_runs() {
        assert_eq!(natural_cmp("Venue 2", "Venue 10"), Ordering::Less);
        assert_eq!(natural_cmp("Venue 10", "Venue 2"), Ordering::Greater);
        // numerically equal, tie broken by the raw strings
        assert_eq!(natural_cmp("Venue 007", "Venue 7"), Ordering::Less);
    }

    #[test]
    fn test_natural_cmp_case_insensitive() {
        assert_eq!(natural_cmp("alpha", "BETA"), Ordering::Less);
        assert_eq!(natural_cmp("Zebra Room", "alpha bar"), Ordering::Greater);
        // equal ignoring case still orders deterministically
        assert_eq!(natural_cmp("bluebird", "BLUEBIRD"), Ordering::Greater);
    }
}
