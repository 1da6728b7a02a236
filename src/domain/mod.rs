use serde::{Deserialize, Serialize};

use crate::common::constants::DAYS;

/// One musical performance as it appears in the published JSON document.
///
/// `venue`, `artist` and `time` are non-empty after trimming for any event
/// that went through the importer; the remaining fields default to empty
/// strings when a source did not provide them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Event {
    #[serde(default)]
    pub city: String,
    pub venue: String,
    #[serde(rename = "venueUrl", default)]
    pub venue_url: String,
    pub artist: String,
    pub time: String,
    #[serde(default)]
    pub date: String,
}

impl Event {
    /// Two events are considered the same listing when city, venue, artist
    /// and time all match exactly. Dates are deliberately ignored so a
    /// re-imported week with refreshed dates does not double up.
    pub fn same_listing(&self, other: &Event) -> bool {
        self.city == other.city
            && self.venue == other.venue
            && self.artist == other.artist
            && self.time == other.time
    }
}

/// The weekly dataset: a mapping from weekday name to an ordered list of
/// events, serialized as `{ "days": { "Monday": [...], ... } }`.
///
/// All seven canonical keys are always present. Days that are absent in an
/// incoming JSON document deserialize to empty lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WeekData {
    #[serde(default)]
    pub days: Days,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Days {
    #[serde(rename = "Monday", default)]
    pub monday: Vec<Event>,
    #[serde(rename = "Tuesday", default)]
    pub tuesday: Vec<Event>,
    #[serde(rename = "Wednesday", default)]
    pub wednesday: Vec<Event>,
    #[serde(rename = "Thursday", default)]
    pub thursday: Vec<Event>,
    #[serde(rename = "Friday", default)]
    pub friday: Vec<Event>,
    #[serde(rename = "Saturday", default)]
    pub saturday: Vec<Event>,
    #[serde(rename = "Sunday", default)]
    pub sunday: Vec<Event>,
}

impl Days {
    pub fn get(&self, day: &str) -> Option<&Vec<Event>> {
        match day {
            "Monday" => Some(&self.monday),
            "Tuesday" => Some(&self.tuesday),
            "Wednesday" => Some(&self.wednesday),
            "Thursday" => Some(&self.thursday),
            "Friday" => Some(&self.friday),
            "Saturday" => Some(&self.saturday),
            "Sunday" => Some(&self.sunday),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, day: &str) -> Option<&mut Vec<Event>> {
        match day {
            "Monday" => Some(&mut self.monday),
            "Tuesday" => Some(&mut self.tuesday),
            "Wednesday" => Some(&mut self.wednesday),
            "Thursday" => Some(&mut self.thursday),
            "Friday" => Some(&mut self.friday),
            "Saturday" => Some(&mut self.saturday),
            "Sunday" => Some(&mut self.sunday),
            _ => None,
        }
    }

    /// Iterate the seven day lists in week order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Vec<Event>)> {
        [
            ("Monday", &self.monday),
            ("Tuesday", &self.tuesday),
            ("Wednesday", &self.wednesday),
            ("Thursday", &self.thursday),
            ("Friday", &self.friday),
            ("Saturday", &self.saturday),
            ("Sunday", &self.sunday),
        ]
        .into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut Vec<Event>)> {
        [
            ("Monday", &mut self.monday),
            ("Tuesday", &mut self.tuesday),
            ("Wednesday", &mut self.wednesday),
            ("Thursday", &mut self.thursday),
            ("Friday", &mut self.friday),
            ("Saturday", &mut self.saturday),
            ("Sunday", &mut self.sunday),
        ]
        .into_iter()
    }
}

impl WeekData {
    pub fn total_events(&self) -> usize {
        self.days.iter().map(|(_, events)| events.len()).sum()
    }
}

/// Normalize a day name to its canonical form (case-insensitive exact match).
/// Returns `None` for anything that is not one of the seven weekday names.
pub fn normalize_day(raw: &str) -> Option<&'static str> {
    let lowered = raw.trim().to_lowercase();
    DAYS.iter()
        .find(|day| day.to_lowercase() == lowered)
        .copied()
}

/// How an incoming parse result combines with the current dataset. Always
/// threaded as an explicit argument into the merge call, never ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    Replace,
    Merge,
}

/// The portion of the dataset an import affects: the whole week, or a single
/// externally-selected day (the single-day CSV template).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportScope {
    FullWeek,
    SingleDay(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_day() {
        assert_eq!(normalize_day("tuesday"), Some("Tuesday"));
        assert_eq!(normalize_day("SATURDAY"), Some("Saturday"));
        assert_eq!(normalize_day("  Friday  "), Some("Friday"));
        assert_eq!(normalize_day("Tues"), None);
        assert_eq!(normalize_day(""), None);
    }

    #[test]
    fn test_week_data_has_seven_days() {
        let week = WeekData::default();
        assert_eq!(week.days.iter().count(), 7);
        assert_eq!(week.total_events(), 0);
    }

    #[test]
    fn test_serialized_shape_uses_canonical_keys() {
        let mut week = WeekData::default();
        week.days.monday.push(Event {
            venue: "Bluebird Bar".into(),
            artist: "The Rivets".into(),
            time: "19:00".into(),
            ..Default::default()
        });

        let json = serde_json::to_value(&week).unwrap();
        assert!(json["days"]["Monday"].is_array());
        assert_eq!(json["days"]["Monday"][0]["venue"], "Bluebird Bar");
        assert_eq!(json["days"]["Monday"][0]["venueUrl"], "");
        assert!(json["days"]["Sunday"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_deserialize_tolerates_missing_days() {
        let week: WeekData =
            serde_json::from_str(r#"{"days":{"Friday":[{"venue":"X","artist":"Y","time":"20:00"}]}}"#)
                .unwrap();
        assert_eq!(week.days.friday.len(), 1);
        assert!(week.days.monday.is_empty());
        assert_eq!(week.days.friday[0].date, "");
    }
}
