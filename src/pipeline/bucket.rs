use crate::domain::{Event, WeekData};

/// Group `(day, event)` pairs into a fresh seven-day dataset. Days with no
/// contributions keep their empty lists; arrival order is preserved within a
/// day.
pub fn bucket<I>(pairs: I) -> WeekData
where
    I: IntoIterator<Item = (&'static str, Event)>,
{
    let mut week = WeekData::default();
    for (day, event) in pairs {
        if let Some(list) = week.days.get_mut(day) {
            list.push(event);
        }
    }
    week
}
