//! Operating days: a fixed Monday..Sunday set of flags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Day of the week. The set is closed; there is no way to add a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
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
    /// All days in week order, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a name that is not one of the seven weekdays.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weekday: {0}")]
pub struct UnknownWeekday(pub String);

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    /// Parses the exact capitalised day name used on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownWeekday(s.to_string()))
    }
}

/// Which days of the week a route operates on. All `false` by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatingDaySet {
    days: [bool; 7],
}

impl OperatingDaySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips exactly one day.
    pub fn toggle(&mut self, day: Weekday) {
        let slot = &mut self.days[day.index()];
        *slot = !*slot;
    }

    pub fn set(&mut self, day: Weekday, enabled: bool) {
        self.days[day.index()] = enabled;
    }

    #[must_use]
    pub fn contains(&self, day: Weekday) -> bool {
        self.days[day.index()]
    }

    /// Enabled days in week order.
    pub fn selected(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL.into_iter().filter(|d| self.contains(*d))
    }

    /// Every day paired with its flag, in week order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, bool)> + '_ {
        Weekday::ALL.into_iter().map(|d| (d, self.contains(d)))
    }
}

/// Wire shape `{ "Monday": bool, ..., "Sunday": bool }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperatingDaysRecord {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl From<&OperatingDaySet> for OperatingDaysRecord {
    fn from(set: &OperatingDaySet) -> Self {
        Self {
            monday: set.contains(Weekday::Monday),
            tuesday: set.contains(Weekday::Tuesday),
            wednesday: set.contains(Weekday::Wednesday),
            thursday: set.contains(Weekday::Thursday),
            friday: set.contains(Weekday::Friday),
            saturday: set.contains(Weekday::Saturday),
            sunday: set.contains(Weekday::Sunday),
        }
    }
}

impl From<OperatingDaysRecord> for OperatingDaySet {
    fn from(record: OperatingDaysRecord) -> Self {
        Self {
            days: [
                record.monday,
                record.tuesday,
                record.wednesday,
                record.thursday,
                record.friday,
                record.saturday,
                record.sunday,
            ],
        }
    }
}
