use std::ops::{Add, Sub};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const JD_J2000: f64 = 2451545.0;
pub const SEC_PER_DAY: f64 = 86400.0;
pub const DAYS_PER_CENTURY: f64 = 36525.0;

pub mod prelude {
    pub use crate::{Epoch, TimeErrors, JD_J2000, SEC_PER_DAY};
}

#[derive(Debug, Clone, Copy, Error)]
pub enum TimeErrors {
    #[error("invalid calendar date or time of day")]
    NaiveDateTimeError,
    #[error("julian date must be finite, got {0}")]
    NonFiniteJulianDate(f64),
}

/// An instant expressed as a Julian date.
/// No time system is attached, the caller decides what the date means.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Epoch {
    jd: f64,
}

impl Epoch {
    pub const J2000: Self = Self { jd: JD_J2000 };

    pub fn from_jd(jd: f64) -> Result<Self, TimeErrors> {
        if !jd.is_finite() {
            return Err(TimeErrors::NonFiniteJulianDate(jd));
        }
        Ok(Self { jd })
    }

    pub fn from_datetime(dt: NaiveDateTime) -> Result<Self, TimeErrors> {
        let delta = dt.signed_duration_since(j2k()?);
        let seconds = delta.num_seconds() as f64 + delta.subsec_nanos() as f64 * 1e-9;
        Ok(Self {
            jd: seconds / SEC_PER_DAY + JD_J2000,
        })
    }

    pub fn from_ymdhms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) -> Result<Self, TimeErrors> {
        let sec = second.floor();
        let nano = ((second - sec) * 1e9).round();
        let dt = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(TimeErrors::NaiveDateTimeError)?
            .and_hms_nano_opt(hour, minute, sec as u32, nano as u32)
            .ok_or(TimeErrors::NaiveDateTimeError)?;
        Epoch::from_datetime(dt)
    }

    pub fn jd(&self) -> f64 {
        self.jd
    }

    /// Days elapsed since J2000.0, negative before it.
    pub fn days_since_j2000(&self) -> f64 {
        self.jd - JD_J2000
    }

    pub fn centuries_since_j2000(&self) -> f64 {
        self.days_since_j2000() / DAYS_PER_CENTURY
    }
}

fn j2k() -> Result<NaiveDateTime, TimeErrors> {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .ok_or(TimeErrors::NaiveDateTimeError)?
        .and_hms_nano_opt(12, 0, 0, 0)
        .ok_or(TimeErrors::NaiveDateTimeError)
}

/// Advances the epoch by a number of seconds.
impl Add<f64> for Epoch {
    type Output = Self;
    fn add(self, seconds: f64) -> Self::Output {
        Self {
            jd: self.jd + seconds / SEC_PER_DAY,
        }
    }
}

/// Seconds between two epochs.
impl Sub<Epoch> for Epoch {
    type Output = f64;
    fn sub(self, rhs: Epoch) -> Self::Output {
        (self.jd - rhs.jd) * SEC_PER_DAY
    }
}

impl TryFrom<NaiveDateTime> for Epoch {
    type Error = TimeErrors;
    fn try_from(datetime: NaiveDateTime) -> Result<Self, TimeErrors> {
        Epoch::from_datetime(datetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_jd_from_datetime_0() {
        let epoch = Epoch::from_ymdhms(2000, 1, 1, 12, 0, 0.0).unwrap();
        assert_abs_diff_eq!(epoch.jd(), 2451545.0, epsilon = 1e-9); //julia Dates
        assert_eq!(epoch, Epoch::J2000);
    }

    #[test]
    fn test_try_from_datetime() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_milli_opt(6, 16, 30, 500)
            .unwrap();
        let epoch: Epoch = dt.try_into().unwrap();
        assert_eq!(epoch, Epoch::from_ymdhms(2024, 1, 31, 6, 16, 30.5).unwrap());
    }

    #[test]
    fn test_jd_from_datetime_1() {
        let epoch = Epoch::from_ymdhms(2024, 1, 31, 6, 16, 30.5).unwrap();
        assert_abs_diff_eq!(epoch.jd(), 2.4603407614641204e6, epsilon = 1e-9); //julia Dates
    }

    #[test]
    fn test_jd_from_datetime_2() {
        let epoch = Epoch::from_ymdhms(2028, 2, 29, 16, 59, 59.999).unwrap();
        assert_abs_diff_eq!(epoch.jd(), 2.461831208333322e6, epsilon = 1e-9); //julia Dates
    }

    #[test]
    fn test_far_past_date() {
        let epoch = Epoch::from_ymdhms(1000, 1, 1, 0, 0, 0.0).unwrap();
        assert_abs_diff_eq!(epoch.jd(), 2.0863025e6, epsilon = 1e-9);
        assert!(epoch.days_since_j2000() < 0.0);
    }

    #[test]
    fn test_invalid_calendar_date() {
        assert!(matches!(
            Epoch::from_ymdhms(2023, 2, 29, 0, 0, 0.0),
            Err(TimeErrors::NaiveDateTimeError)
        ));
    }

    #[test]
    fn test_from_jd_rejects_nan() {
        assert!(matches!(
            Epoch::from_jd(f64::NAN),
            Err(TimeErrors::NonFiniteJulianDate(_))
        ));
        assert!(Epoch::from_jd(f64::INFINITY).is_err());
    }

    #[test]
    fn test_add_seconds() {
        let epoch = Epoch::J2000 + SEC_PER_DAY * 1.5;
        assert_abs_diff_eq!(epoch.jd(), 2451546.5, epsilon = 1e-9);
        assert_abs_diff_eq!(epoch.days_since_j2000(), 1.5, epsilon = 1e-9);
        assert_abs_diff_eq!(epoch - Epoch::J2000, 129600.0, epsilon = 1e-4);
    }

    #[test]
    fn test_centuries() {
        let epoch = Epoch::from_jd(JD_J2000 + DAYS_PER_CENTURY).unwrap();
        assert_abs_diff_eq!(epoch.centuries_since_j2000(), 1.0, epsilon = 1e-12);
    }
}
