use crate::domain::{ImportMode, ImportScope, WeekData};

/// Combine an incoming dataset with the current one.
///
/// `Replace` discards the affected scope: the whole week, or just the target
/// day's list for single-day imports. `Merge` appends incoming events per
/// day, skipping any event that already matches an entry of the in-progress
/// result on `(city, venue, artist, time)`. Checking against the accumulated
/// result rather than the original makes the merge idempotent and suppresses
/// duplicates inside the incoming batch itself.
pub fn combine(
    current: &WeekData,
    incoming: &WeekData,
    mode: ImportMode,
    scope: &ImportScope,
) -> WeekData {
    match (mode, scope) {
        (ImportMode::Replace, ImportScope::FullWeek) => incoming.clone(),
        (ImportMode::Replace, ImportScope::SingleDay(day)) => {
            let mut next = current.clone();
            if let (Some(dst), Some(src)) = (next.days.get_mut(day), incoming.days.get(day)) {
                *dst = src.clone();
            }
            next
        }
        (ImportMode::Merge, _) => {
            let mut next = current.clone();
            for (day, events) in incoming.days.iter() {
                let Some(dst) = next.days.get_mut(day) else {
                    continue;
                };
                for event in events {
                    if !dst.iter().any(|existing| existing.same_listing(event)) {
                        dst.push(event.clone());
                    }
                }
            }
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Event;

    fn event(city: &str, venue: &str, artist: &str, time: &str) -> Event {
        Event {
            city: city.into(),
            venue: venue.into(),
            artist: artist.into(),
            time: time.into(),
            ..Default::default()
        }
    }

    fn week_with_monday(events: Vec<Event>) -> WeekData {
        let mut week = WeekData::default();
        week.days.monday = events;
        week
    }

    #[test]
    fn test_replace_full_week_discards_current() {
        let current = week_with_monday(vec![event("", "X", "Y", "20:00")]);
        let mut incoming = WeekData::default();
        incoming.days.friday.push(event("", "Spare Room", "The Rivets", "21:00"));

        let result = combine(&current, &incoming, ImportMode::Replace, &ImportScope::FullWeek);
        assert!(result.days.monday.is_empty());
        assert_eq!(result.days.friday.len(), 1);
    }

    #[test]
    fn test_replace_single_day_keeps_other_days() {
        let mut current = week_with_monday(vec![event("", "X", "Y", "20:00")]);
        current.days.friday.push(event("", "Old Spot", "Old Act", "18:00"));

        let incoming = week_with_monday(vec![event("", "New Spot", "New Act", "19:00")]);
        let result = combine(
            &current,
            &incoming,
            ImportMode::Replace,
            &ImportScope::SingleDay("Monday"),
        );

        assert_eq!(result.days.monday.len(), 1);
        assert_eq!(result.days.monday[0].venue, "New Spot");
        assert_eq!(result.days.friday.len(), 1);
    }

    #[test]
    fn test_merge_skips_existing_duplicate() {
        let current = week_with_monday(vec![event("", "X", "Y", "20:00")]);
        let incoming = week_with_monday(vec![
            event("", "X", "Y", "20:00"),
            event("", "Z", "W", "21:00"),
        ]);

        let result = combine(&current, &incoming, ImportMode::Merge, &ImportScope::FullWeek);
        assert_eq!(result.days.monday.len(), 2);
        assert_eq!(result.days.monday[0].venue, "X");
        assert_eq!(result.days.monday[1].venue, "Z");
    }

    #[test]
    fn test_merge_suppresses_duplicates_within_batch() {
        let current = WeekData::default();
        let incoming = week_with_monday(vec![
            event("", "X", "Y", "20:00"),
            event("", "X", "Y", "20:00"),
        ]);

        let result = combine(&current, &incoming, ImportMode::Merge, &ImportScope::FullWeek);
        assert_eq!(result.days.monday.len(), 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let current = week_with_monday(vec![event("", "X", "Y", "20:00")]);
        let incoming = week_with_monday(vec![
            event("", "X", "Y", "20:00"),
            event("", "Z", "W", "21:00"),
        ]);

        let once = combine(&current, &incoming, ImportMode::Merge, &ImportScope::FullWeek);
        let twice = combine(&once, &incoming, ImportMode::Merge, &ImportScope::FullWeek);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_distinguishes_city() {
        let current = week_with_monday(vec![event("Portland", "X", "Y", "20:00")]);
        let incoming = week_with_monday(vec![event("Salem", "X", "Y", "20:00")]);

        let result = combine(&current, &incoming, ImportMode::Merge, &ImportScope::FullWeek);
        assert_eq!(result.days.monday.len(), 2);
    }

    #[test]
    fn test_merge_preserves_first_seen_entry() {
        let mut first = event("", "X", "Y", "20:00");
        first.date = "2026-08-03".to_string();
        let mut refreshed = event("", "X", "Y", "20:00");
        refreshed.date = "2026-08-10".to_string();

        let current = week_with_monday(vec![first]);
        let incoming = week_with_monday(vec![refreshed]);

        let result = combine(&current, &incoming, ImportMode::Merge, &ImportScope::FullWeek);
        assert_eq!(result.days.monday.len(), 1);
        assert_eq!(result.days.monday[0].date, "2026-08-03");
    }
}
