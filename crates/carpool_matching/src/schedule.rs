use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::InvalidInputError;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const WEEKDAYS: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];
}

impl FromStr for Weekday {
    type Err = InvalidInputError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" => Ok(Weekday::Mon),
            "tue" | "tuesday" => Ok(Weekday::Tue),
            "wed" | "wednesday" => Ok(Weekday::Wed),
            "thu" | "thursday" => Ok(Weekday::Thu),
            "fri" | "friday" => Ok(Weekday::Fri),
            "sat" | "saturday" => Ok(Weekday::Sat),
            "sun" | "sunday" => Ok(Weekday::Sun),
            _ => Err(InvalidInputError::Weekday(input.to_string())),
        }
    }
}

impl TryFrom<String> for Weekday {
    type Error = InvalidInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Weekday::Mon => "mon",
                Weekday::Tue => "tue",
                Weekday::Wed => "wed",
                Weekday::Thu => "thu",
                Weekday::Fri => "fri",
                Weekday::Sat => "sat",
                Weekday::Sun => "sun",
            }
        )
    }
}

/// Recurring days plus a wall-clock departure time such as `"7:30 AM"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScheduleSpec {
    pub days: BTreeSet<Weekday>,
    pub time: String,
}

impl ScheduleSpec {
    pub fn new(days: impl IntoIterator<Item = Weekday>, time: &str) -> Self {
        ScheduleSpec {
            days: days.into_iter().collect(),
            time: time.to_string(),
        }
    }

    pub fn minutes(&self) -> Result<u16, InvalidInputError> {
        parse_time(&self.time)
    }
}

/// Parses `H:MM AM|PM` into minutes since midnight. 12 AM is midnight and
/// 12 PM is noon.
pub fn parse_time(input: &str) -> Result<u16, InvalidInputError> {
    let invalid = || InvalidInputError::Time(input.to_string());

    let trimmed = input.trim();
    if trimmed.len() < 2 || !trimmed.is_char_boundary(trimmed.len() - 2) {
        return Err(invalid());
    }

    let (clock, meridiem) = trimmed.split_at(trimmed.len() - 2);
    let is_pm = match meridiem.to_ascii_uppercase().as_str() {
        "AM" => false,
        "PM" => true,
        _ => return Err(invalid()),
    };

    let (hour, minute) = clock.trim_end().split_once(':').ok_or_else(invalid)?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
        return Err(invalid());
    }

    let hour: u16 = hour.parse().map_err(|_| invalid())?;
    let minute: u16 = minute.parse().map_err(|_| invalid())?;

    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(invalid());
    }

    let hour = hour % 12 + if is_pm { 12 } else { 0 };
    Ok(hour * 60 + minute)
}

/// True when both times fall within `window_min` minutes of each other. Times
/// do not wrap around midnight.
pub fn time_match(time1: &str, time2: &str, window_min: u16) -> Result<bool, InvalidInputError> {
    let minutes1 = parse_time(time1)?;
    let minutes2 = parse_time(time2)?;

    Ok(minutes1.abs_diff(minutes2) <= window_min)
}

pub fn day_match(days1: &BTreeSet<Weekday>, days2: &BTreeSet<Weekday>) -> bool {
    !days1.is_disjoint(days2)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScheduleMatch {
    pub time: bool,
    pub days: bool,
}

pub fn evaluate_schedule(
    passenger: &ScheduleSpec,
    candidate: &ScheduleSpec,
    window_min: u16,
) -> Result<ScheduleMatch, InvalidInputError> {
    Ok(ScheduleMatch {
        time: time_match(&passenger.time, &candidate.time, window_min)?,
        days: day_match(&passenger.days, &candidate.days),
    })
}
