use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::ScheduleEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub day: Weekday,
    pub workout_id: Uuid,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct DaySchedule {
    pub day: Weekday,
    pub entries: Vec<ScheduleEntry>,
}

/// Buckets entries into Monday..Sunday, keeping empty days.
pub fn group_by_day(entries: Vec<ScheduleEntry>) -> Vec<DaySchedule> {
    let mut days: Vec<DaySchedule> = Weekday::ALL
        .iter()
        .map(|&day| DaySchedule {
            day,
            entries: Vec::new(),
        })
        .collect();
    for entry in entries {
        if let Some(bucket) = days.iter_mut().find(|d| d.day.as_str() == entry.day) {
            bucket.entries.push(entry);
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: &str, title: &str) -> ScheduleEntry {
        ScheduleEntry {
            id: Uuid::new_v4(),
            day: day.into(),
            workout_id: Uuid::new_v4(),
            workout_title: title.into(),
            note: String::new(),
        }
    }

    #[test]
    fn groups_into_seven_ordered_days() {
        let week = group_by_day(vec![
            entry("Friday", "Run"),
            entry("Monday", "Legs"),
            entry("Monday", "Core"),
        ]);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].day, Weekday::Monday);
        assert_eq!(week[0].entries.len(), 2);
        assert_eq!(week[4].entries[0].workout_title, "Run");
        assert!(week[6].entries.is_empty());
    }

    #[test]
    fn rejects_unknown_day() {
        let body = format!(r#"{{"day":"Funday","workout_id":"{}"}}"#, Uuid::new_v4());
        assert!(serde_json::from_str::<CreateScheduleRequest>(&body).is_err());
    }
}
