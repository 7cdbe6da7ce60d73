use crate::{
    models::{TaskRecurrence, TaskReminder},
    reference,
    value::{Columns, Value},
    Error,
};
use jiff::civil::{Date, Weekday};
use std::{collections::BTreeSet, fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(recurrence_error(format!("unknown frequency {other:?}"))),
        }
    }
}

/// A checked recurrence definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    /// ISO weekday numbers, Monday is 1. Empty means "the weekday of
    /// `starts_on`" for weekly rules.
    pub days_of_week: BTreeSet<i8>,
    pub starts_on: Date,
    pub ends_on: Option<Date>,
    pub max_occurrences: Option<u32>,
    pub timezone: String,
}

fn recurrence_error(message: impl Into<String>) -> Error {
    Error::Validation {
        entity: "task_recurrences",
        message: message.into(),
    }
}

fn reminder_error(message: impl Into<String>) -> Error {
    Error::Validation {
        entity: "task_reminders",
        message: message.into(),
    }
}

impl RecurrenceRule {
    pub fn from_columns(row: &dyn Columns) -> Result<Self, Error> {
        let frequency = match row.column("frequency") {
            Some(Value::Text(frequency)) => frequency.parse()?,
            _ => return Err(recurrence_error("frequency is required")),
        };
        let interval = match row.column("interval") {
            Some(Value::Int(interval)) if interval >= 1 => u32::try_from(interval)
                .map_err(|_| recurrence_error(format!("interval {interval} is too large")))?,
            other => {
                return Err(recurrence_error(format!(
                    "interval must be at least 1, got {other:?}"
                )))
            }
        };
        let days_of_week = match row.column("days_of_week") {
            Some(Value::Json(serde_json::Value::Array(days))) => days
                .iter()
                .map(|day| {
                    day.as_i64()
                        .and_then(|day| i8::try_from(day).ok())
                        .filter(|day| (1..=7).contains(day))
                        .ok_or_else(|| {
                            recurrence_error(format!("{day} is not an ISO weekday (1-7)"))
                        })
                })
                .collect::<Result<BTreeSet<_>, _>>()?,
            Some(Value::Null) | None => BTreeSet::new(),
            Some(_) => return Err(recurrence_error("days_of_week must be an array")),
        };
        let starts_on = match row.column("starts_on") {
            Some(Value::Date(date)) => date,
            _ => return Err(recurrence_error("starts_on is required")),
        };
        let ends_on = match row.column("ends_on") {
            Some(Value::Date(date)) if date < starts_on => {
                return Err(recurrence_error("ends_on precedes starts_on"))
            }
            Some(Value::Date(date)) => Some(date),
            _ => None,
        };
        let max_occurrences = match row.column("max_occurrences") {
            Some(Value::Int(count)) if count >= 1 => Some(
                u32::try_from(count)
                    .map_err(|_| {
                        recurrence_error(format!("max_occurrences {count} is too large"))
                    })?,
            ),
            Some(Value::Int(count)) => {
                return Err(recurrence_error(format!(
                    "max_occurrences must be at least 1, got {count}"
                )))
            }
            _ => None,
        };
        let timezone = match row.column("timezone") {
            Some(Value::Text(timezone)) if !timezone.trim().is_empty() => timezone,
            _ => return Err(recurrence_error("timezone is required")),
        };
        Ok(Self {
            frequency,
            interval,
            days_of_week,
            starts_on,
            ends_on,
            max_occurrences,
            timezone,
        })
    }

    pub fn weekdays(&self) -> Vec<Weekday> {
        self.days_of_week
            .iter()
            .filter_map(|day| Weekday::from_monday_one_offset(*day).ok())
            .collect()
    }
}

impl TaskRecurrence {
    pub fn rule(&self) -> Result<RecurrenceRule, Error> {
        RecurrenceRule::from_columns(self)
    }
}

pub(crate) fn validate_recurrence(
    row: &dyn Columns,
    _reference: &reference::Cache,
) -> Result<(), Error> {
    RecurrenceRule::from_columns(row).map(|_| ())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReminderState {
    Scheduled,
    Sent,
    Canceled,
}

impl TaskReminder {
    pub fn state(&self) -> ReminderState {
        if self.sent_at.is_some() {
            ReminderState::Sent
        } else if self.canceled_at.is_some() {
            ReminderState::Canceled
        } else {
            ReminderState::Scheduled
        }
    }

    /// Moves a scheduled reminder to sent. Persist with `Store::update`.
    pub fn mark_sent(&mut self, at: jiff::Timestamp) -> Result<(), Error> {
        self.ensure_scheduled("sent")?;
        self.sent_at = Some(at.into());
        Ok(())
    }

    /// Moves a scheduled reminder to canceled. Persist with `Store::update`.
    pub fn cancel(&mut self, at: jiff::Timestamp) -> Result<(), Error> {
        self.ensure_scheduled("canceled")?;
        self.canceled_at = Some(at.into());
        Ok(())
    }

    fn ensure_scheduled(&self, target: &str) -> Result<(), Error> {
        match self.state() {
            ReminderState::Scheduled => Ok(()),
            state => Err(reminder_error(format!(
                "a {state:?} reminder cannot be {target}"
            ))),
        }
    }
}

pub(crate) fn validate_reminder(
    row: &dyn Columns,
    _reference: &reference::Cache,
) -> Result<(), Error> {
    let sent = row.column("sent_at").is_some_and(|value| !value.is_null());
    let canceled = row.column("canceled_at").is_some_and(|value| !value.is_null());
    if sent && canceled {
        return Err(reminder_error(
            "a reminder cannot be both sent and canceled",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTaskRecurrence;
    use jiff::civil::date;
    use serde_json::json;

    fn weekly() -> NewTaskRecurrence {
        NewTaskRecurrence {
            team_id: 1,
            task_id: 1,
            frequency: "weekly".into(),
            interval: 1,
            days_of_week: Some(json!([1, 3, 5])),
            starts_on: date(2024, 1, 1).into(),
            ends_on: Some(date(2024, 1, 31).into()),
            max_occurrences: None,
            timezone: "Europe/Berlin".into(),
        }
    }

    #[test]
    fn parses_a_weekly_rule() {
        let rule = RecurrenceRule::from_columns(&weekly()).unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(
            rule.weekdays(),
            vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
        );
        assert_eq!(rule.ends_on, Some(date(2024, 1, 31)));
    }

    #[test]
    fn rejects_malformed_rules() {
        let mut zero_interval = weekly();
        zero_interval.interval = 0;
        let mut bad_day = weekly();
        bad_day.days_of_week = Some(json!([0, 8]));
        let mut backwards = weekly();
        backwards.ends_on = Some(date(2023, 12, 31).into());
        let mut no_timezone = weekly();
        no_timezone.timezone = " ".into();
        let mut unknown = weekly();
        unknown.frequency = "hourly".into();
        for draft in [zero_interval, bad_day, backwards, no_timezone, unknown] {
            assert!(
                matches!(
                    RecurrenceRule::from_columns(&draft),
                    Err(Error::Validation { entity: "task_recurrences", .. })
                ),
                "{draft:?}"
            );
        }
    }
}
