use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A quantity of leave, in days, kept to one decimal place.
///
/// Half-day applications are `LeaveDays::HALF`; every other quantity the
/// workflow produces is a whole number of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveDays(Decimal);

impl LeaveDays {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const HALF: Self = Self(Decimal::from_parts(5, 0, 0, false, 1));

    pub fn new(value: Decimal) -> Self {
        Self(value.round_dp(1))
    }

    pub fn whole(days: i64) -> Self {
        Self(Decimal::from(days))
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Calendar-day ceiling, used wherever a day count is compared against
    /// whole-day limits.
    pub fn ceil_days(self) -> i64 {
        self.0.ceil().to_i64().unwrap_or(i64::MAX)
    }
}

impl fmt::Display for LeaveDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<u32> for LeaveDays {
    fn from(days: u32) -> Self {
        Self(Decimal::from(days))
    }
}

impl Add for LeaveDays {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for LeaveDays {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for LeaveDays {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for LeaveDays {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for LeaveDays {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HalfDaySession {
    FirstHalf,
    SecondHalf,
}

/// How the days between two dates are counted against a balance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DayCounting {
    /// Inclusive calendar-day difference; weekends and holidays are charged.
    #[default]
    Calendar,
    /// Saturdays, Sundays and the listed holidays are not charged.
    WorkingDays { holidays: BTreeSet<NaiveDate> },
}

impl DayCounting {
    /// Days charged for an inclusive `from..=to` range. Returns zero when
    /// `to` precedes `from`.
    pub fn count(&self, from: NaiveDate, to: NaiveDate) -> LeaveDays {
        if to < from {
            return LeaveDays::ZERO;
        }
        match self {
            DayCounting::Calendar => LeaveDays::whole((to - from).num_days() + 1),
            DayCounting::WorkingDays { holidays } => {
                let span = (to - from).num_days() + 1;
                let first = i64::from(from.weekday().num_days_from_monday());
                let tail = (0..span % 7).filter(|i| (first + i) % 7 < 5).count() as i64;
                let weekday_holidays = holidays.range(from..=to).filter(|d| !is_weekend(**d)).count() as i64;
                LeaveDays::whole(span / 7 * 5 + tail - weekday_holidays)
            }
        }
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn calendar_counting_is_inclusive() {
        let days = DayCounting::Calendar.count(date(2026, 3, 2), date(2026, 3, 4));
        assert_eq!(days, LeaveDays::whole(3));
        assert_eq!(DayCounting::Calendar.count(date(2026, 3, 2), date(2026, 3, 2)), LeaveDays::whole(1));
    }

    #[test]
    fn calendar_counting_charges_weekends() {
        // Friday to Monday
        let days = DayCounting::Calendar.count(date(2026, 3, 6), date(2026, 3, 9));
        assert_eq!(days, LeaveDays::whole(4));
    }

    #[test]
    fn working_days_skip_weekends_and_holidays() {
        let holidays = BTreeSet::from([date(2026, 3, 9)]);
        let counting = DayCounting::WorkingDays { holidays };
        // Friday, (Sat, Sun), Monday holiday, Tuesday
        assert_eq!(counting.count(date(2026, 3, 6), date(2026, 3, 10)), LeaveDays::whole(2));
    }

    #[test]
    fn working_days_match_a_day_by_day_walk() {
        let holidays = BTreeSet::from([date(2026, 1, 1), date(2026, 5, 1), date(2026, 12, 26)]);
        let counting = DayCounting::WorkingDays {
            holidays: holidays.clone(),
        };
        let start = date(2025, 12, 20);
        for offset in 0..420 {
            let end = start + chrono::Duration::days(offset);
            let walked = start
                .iter_days()
                .take_while(|d| *d <= end)
                .filter(|d| !is_weekend(*d) && !holidays.contains(d))
                .count() as i64;
            assert_eq!(counting.count(start, end), LeaveDays::whole(walked), "until {end}");
        }
    }

    #[test]
    fn working_days_over_the_whole_calendar_are_counted_at_once() {
        let counting = DayCounting::WorkingDays {
            holidays: BTreeSet::new(),
        };
        let days = counting.count(date(2026, 3, 2), NaiveDate::MAX);
        assert!(days.ceil_days() > 1_000_000);
    }

    #[test]
    fn reversed_range_counts_nothing() {
        assert_eq!(DayCounting::Calendar.count(date(2026, 3, 4), date(2026, 3, 2)), LeaveDays::ZERO);
    }

    #[test]
    fn half_day_displays_and_ceils() {
        assert_eq!(LeaveDays::HALF.to_string(), "0.5");
        assert_eq!(LeaveDays::HALF.ceil_days(), 1);
        assert_eq!((LeaveDays::whole(2) + LeaveDays::HALF).ceil_days(), 3);
        assert_eq!(LeaveDays::whole(10).to_string(), "10");
    }

    #[test]
    fn new_rounds_to_one_decimal() {
        let days = LeaveDays::new(Decimal::new(1234, 3));
        assert_eq!(days.to_string(), "1.2");
    }
}
