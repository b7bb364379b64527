use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Task priority as exposed by the service: ordinal 1-4, 4 = most urgent.
/// Displayed to the user in the conventional inverted form (p1 = urgent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub u8);

impl Priority {
    pub const NORMAL: Priority = Priority(1);
    pub const URGENT: Priority = Priority(4);

    /// Clamp an arbitrary value into the valid 1-4 range.
    pub fn new(value: u8) -> Self {
        Priority(value.clamp(1, 4))
    }

    /// The user-facing label: service ordinal 4 is "p1".
    pub fn label(self) -> &'static str {
        match self.0 {
            4 => "p1",
            3 => "p2",
            2 => "p3",
            _ => "p4",
        }
    }

    /// Next priority in the cycle p4 → p3 → p2 → p1 → p4.
    pub fn cycled(self) -> Priority {
        if self.0 >= 4 {
            Priority(1)
        } else {
            Priority(self.0 + 1)
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NORMAL
    }
}

/// Due-date descriptor: a calendar date, optionally a precise local
/// timestamp, optionally recurring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    pub date: NaiveDate,
    #[serde(default)]
    pub datetime: Option<DateTime<Local>>,
    #[serde(default)]
    pub recurring: bool,
}

impl Due {
    /// All-day due entry on the given date.
    pub fn on(date: NaiveDate) -> Self {
        Due {
            date,
            datetime: None,
            recurring: false,
        }
    }

    /// True if this entry has already passed. All-day entries compare by
    /// calendar day; precise entries compare the full timestamp.
    pub fn is_overdue(&self, today: NaiveDate, now: DateTime<Local>) -> bool {
        match self.datetime {
            Some(dt) => dt < now,
            None => self.date < today,
        }
    }

    /// True if the entry falls on `today` and has not already passed.
    pub fn is_today(&self, today: NaiveDate, now: DateTime<Local>) -> bool {
        match self.datetime {
            Some(dt) => dt.date_naive() == today && dt >= now,
            None => self.date == today,
        }
    }
}

/// A task entity mirrored from the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due: Option<Due>,
    pub project_id: String,
    #[serde(default)]
    pub section_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Manual order within the project; tiebreak for flat lists.
    #[serde(default)]
    pub child_order: i32,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Task {
    /// Minimal constructor used by the demo backend and tests.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Task {
            id: id.into(),
            content: content.into(),
            description: None,
            checked: false,
            priority: Priority::default(),
            due: None,
            project_id: project_id.into(),
            section_id: None,
            parent_id: None,
            labels: Vec::new(),
            child_order: 0,
            is_deleted: false,
        }
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_priority_cycle_wraps() {
        assert_eq!(Priority(1).cycled(), Priority(2));
        assert_eq!(Priority(4).cycled(), Priority(1));
    }

    #[test]
    fn test_priority_labels_inverted() {
        assert_eq!(Priority(4).label(), "p1");
        assert_eq!(Priority(1).label(), "p4");
    }

    #[test]
    fn test_all_day_due_ignores_time_of_day() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let now = Local.with_ymd_and_hms(2025, 6, 10, 23, 59, 0).unwrap();
        let due = Due::on(today);
        // Late in the day, an all-day entry for today is still "today".
        assert!(due.is_today(today, now));
        assert!(!due.is_overdue(today, now));
    }

    #[test]
    fn test_precise_due_uses_full_timestamp() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let now = Local.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let mut due = Due::on(today);
        due.datetime = Some(Local.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap());
        // A 9am entry checked at noon is overdue even though the date is today.
        assert!(due.is_overdue(today, now));
        assert!(!due.is_today(today, now));
    }
}
