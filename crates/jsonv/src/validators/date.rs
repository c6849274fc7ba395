use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};

use super::{DateTimeValidator, DateValidator};
use crate::messages;

/// The value must not be earlier than the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotBefore<D>(pub D);

/// The value must not be later than the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotAfter<D>(pub D);

pub fn not_before<D>(bound: D) -> NotBefore<D> {
    NotBefore(bound)
}

pub fn not_after<D>(bound: D) -> NotAfter<D> {
    NotAfter(bound)
}

fn check_not_before<D: PartialOrd + Display>(value: &D, bound: &D) -> Result<(), String> {
    if value < bound {
        return Err(messages::not_before(bound));
    }
    Ok(())
}

fn check_not_after<D: PartialOrd + Display>(value: &D, bound: &D) -> Result<(), String> {
    if value > bound {
        return Err(messages::not_after(bound));
    }
    Ok(())
}

impl DateValidator for NotBefore<NaiveDate> {
    fn validate_date(&self, value: &NaiveDate) -> Result<(), String> {
        check_not_before(value, &self.0)
    }
}

impl DateValidator for NotAfter<NaiveDate> {
    fn validate_date(&self, value: &NaiveDate) -> Result<(), String> {
        check_not_after(value, &self.0)
    }
}

impl DateTimeValidator for NotBefore<DateTime<Utc>> {
    fn validate_datetime(&self, value: &DateTime<Utc>) -> Result<(), String> {
        check_not_before(value, &self.0)
    }
}

impl DateTimeValidator for NotAfter<DateTime<Utc>> {
    fn validate_datetime(&self, value: &DateTime<Utc>) -> Result<(), String> {
        check_not_after(value, &self.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn date_bounds() {
        let bound = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let day_before = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        assert!(not_after(bound).validate_date(&day_before).is_ok());
        assert_eq!(
            not_before(bound).validate_date(&day_before),
            Err("Must not be before 2020-01-01".to_string())
        );
    }

    #[test]
    fn datetime_bounds() {
        let bound = Utc.with_ymd_and_hms(2016, 3, 10, 23, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2016, 3, 11, 0, 0, 0).unwrap();
        assert!(not_before(bound).validate_datetime(&later).is_ok());
        assert_eq!(
            not_after(bound).validate_datetime(&later),
            Err("Must not be after 2016-03-10 23:00:00 UTC".to_string())
        );
    }
}
