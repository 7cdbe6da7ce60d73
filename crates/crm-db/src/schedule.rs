use crate::tasks::{Frequency, RecurrenceRule};
use jiff::civil::Date;

/// Every occurrence of `rule` on or before `horizon`, in order.
pub fn materialize(rule: &RecurrenceRule, horizon: Date) -> Vec<Date> {
    let last = match rule.ends_on {
        Some(ends_on) if ends_on < horizon => ends_on,
        _ => horizon,
    };
    let limit = rule.max_occurrences.map(|count| count as usize);
    let interval = i64::from(rule.interval.max(1));
    let mut dates = Vec::new();
    match rule.frequency {
        Frequency::Daily | Frequency::Weekly => {
            let week_offset = i64::from(rule.starts_on.weekday().to_monday_zero_offset());
            let start_day = rule.starts_on.weekday().to_monday_one_offset();
            let mut day = rule.starts_on;
            let mut index: i64 = 0;
            while day <= last && limit.map_or(true, |limit| dates.len() < limit) {
                let due = match rule.frequency {
                    Frequency::Daily => index % interval == 0,
                    _ => {
                        let week = (index + week_offset) / 7;
                        let weekday = day.weekday().to_monday_one_offset();
                        week % interval == 0
                            && if rule.days_of_week.is_empty() {
                                weekday == start_day
                            } else {
                                rule.days_of_week.contains(&weekday)
                            }
                    }
                };
                if due {
                    dates.push(day);
                }
                day = match day.tomorrow() {
                    Ok(next) => next,
                    Err(_) => break,
                };
                index += 1;
            }
        }
        Frequency::Monthly | Frequency::Yearly => {
            let months_per_step = match rule.frequency {
                Frequency::Monthly => interval,
                _ => interval * 12,
            };
            let start_month =
                i64::from(rule.starts_on.year()) * 12 + i64::from(rule.starts_on.month() - 1);
            let mut step: i64 = 0;
            while limit.map_or(true, |limit| dates.len() < limit) {
                let month = start_month + step * months_per_step;
                step += 1;
                let (Ok(year), Ok(month)) =
                    (i16::try_from(month / 12), i8::try_from(month % 12 + 1))
                else {
                    break;
                };
                let Ok(date) = Date::new(year, month, rule.starts_on.day()) else {
                    if Date::new(year, month, 1).map_or(true, |first| first > last) {
                        break;
                    }
                    continue;
                };
                if date > last {
                    break;
                }
                dates.push(date);
            }
        }
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use std::collections::BTreeSet;

    fn rule(frequency: Frequency, interval: u32, days: &[i8], starts_on: Date) -> RecurrenceRule {
        RecurrenceRule {
            frequency,
            interval,
            days_of_week: days.iter().copied().collect::<BTreeSet<_>>(),
            starts_on,
            ends_on: None,
            max_occurrences: None,
            timezone: "UTC".into(),
        }
    }

    #[test]
    fn weekly_monday_wednesday_friday_in_january_2024() {
        let mut weekly = rule(Frequency::Weekly, 1, &[1, 3, 5], date(2024, 1, 1));
        weekly.ends_on = Some(date(2024, 1, 31));
        let dates = materialize(&weekly, date(2024, 12, 31));
        let expected: Vec<Date> = [1, 3, 5, 8, 10, 12, 15, 17, 19, 22, 24, 26, 29, 31]
            .into_iter()
            .map(|day| date(2024, 1, day))
            .collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn every_other_week_skips_alternate_weeks() {
        let biweekly = rule(Frequency::Weekly, 2, &[2], date(2024, 1, 3));
        assert_eq!(
            materialize(&biweekly, date(2024, 1, 31)),
            vec![date(2024, 1, 16), date(2024, 1, 30)]
        );
    }

    #[test]
    fn weekly_without_days_uses_the_start_weekday() {
        let weekly = rule(Frequency::Weekly, 1, &[], date(2024, 1, 3));
        assert_eq!(
            materialize(&weekly, date(2024, 1, 20)),
            vec![date(2024, 1, 3), date(2024, 1, 10), date(2024, 1, 17)]
        );
    }

    #[test]
    fn daily_honours_max_occurrences() {
        let mut daily = rule(Frequency::Daily, 3, &[], date(2024, 2, 27));
        daily.max_occurrences = Some(3);
        assert_eq!(
            materialize(&daily, date(2024, 12, 31)),
            vec![date(2024, 2, 27), date(2024, 3, 1), date(2024, 3, 4)]
        );
    }

    #[test]
    fn monthly_skips_short_months() {
        let monthly = rule(Frequency::Monthly, 1, &[], date(2024, 1, 31));
        assert_eq!(
            materialize(&monthly, date(2024, 6, 30)),
            vec![date(2024, 1, 31), date(2024, 3, 31), date(2024, 5, 31)]
        );
    }

    #[test]
    fn yearly_on_leap_day() {
        let yearly = rule(Frequency::Yearly, 1, &[], date(2024, 2, 29));
        assert_eq!(
            materialize(&yearly, date(2032, 12, 31)),
            vec![date(2024, 2, 29), date(2028, 2, 29), date(2032, 2, 29)]
        );
    }
}
