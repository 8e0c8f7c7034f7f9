//! Proleptic Gregorian calendar helpers for the simulated clock.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Days in one full 400 year Gregorian cycle
pub const DAYS_PER_CYCLE: i64 = 146_097;
/// Years in one full Gregorian cycle
pub const YEARS_PER_CYCLE: i64 = 400;

/// The loose calendar fields of the simulated clock.
///
/// Fields can hold out of range values between a mutation and the next
/// normalization, which is why they are signed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarFields {
    pub hours: i32,
    pub minutes: i32,
    pub seconds: f64,
    pub month: i32,
    pub day: i32,
    pub year: i32,
}

impl CalendarFields {
    pub const fn new(
        hours: i32,
        minutes: i32,
        seconds: f64,
        month: i32,
        day: i32,
        year: i32,
    ) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            month,
            day,
            year,
        }
    }

    /// Midnight on the first of January of `year`
    pub const fn new_year(year: i32) -> Self {
        Self::new(0, 0, 0.0, 1, 1, year)
    }

    /// Builds the fields from a calendar date time
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self::new(
            datetime.hour() as i32,
            datetime.minute() as i32,
            datetime.second() as f64,
            datetime.month() as i32,
            datetime.day() as i32,
            datetime.year(),
        )
    }

    /// The fields `delta_seconds` later, every field normalized.
    ///
    /// `None` when the delta is not finite or the year would not fit an `i32`.
    pub fn advanced_by(&self, delta_seconds: f64) -> Option<Self> {
        let (minute_carry, seconds) = carry_seconds(self.seconds + delta_seconds)?;
        let minutes = self.minutes as i64 + minute_carry;
        let hours = self.hours as i64 + minutes.div_euclid(60);
        let mut day = self.day as i64 + hours.div_euclid(24);
        let month0 = self.month as i64 - 1;
        let mut month = month0.rem_euclid(12) + 1;
        let mut year = self.year as i64 + month0.div_euclid(12);

        // Skip whole cycles, the calendar repeats itself after each one
        if day > DAYS_PER_CYCLE {
            let cycles = (day - 1) / DAYS_PER_CYCLE;
            day -= cycles * DAYS_PER_CYCLE;
            year += cycles * YEARS_PER_CYCLE;
        } else if day < 1 {
            let cycles = (DAYS_PER_CYCLE - day) / DAYS_PER_CYCLE;
            day += cycles * DAYS_PER_CYCLE;
            year -= cycles * YEARS_PER_CYCLE;
        }

        // Forward
        loop {
            let days = days_in_month(month as i32, cycle_year(year)) as i64;
            if day <= days {
                break;
            }
            day -= days;
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }

        // Backward
        while day < 1 {
            month -= 1;
            if month < 1 {
                month = 12;
                year -= 1;
            }
            day += days_in_month(month as i32, cycle_year(year)) as i64;
        }

        Some(Self {
            hours: hours.rem_euclid(24) as i32,
            minutes: minutes.rem_euclid(60) as i32,
            seconds,
            month: month as i32,
            day: day as i32,
            year: i32::try_from(year).ok()?,
        })
    }

    /// Interprets the fields as a date time.
    ///
    /// Overflowing fields roll over into the next larger unit and fractional
    /// seconds are truncated. `None` only when the result leaves the supported range.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let month0 = self.month as i64 - 1;
        let year = i32::try_from(self.year as i64 + month0.div_euclid(12)).ok()?;
        let month = (month0.rem_euclid(12) + 1) as u32;
        let first = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
        let offset = (self.day as i64 - 1) * 86_400
            + self.hours as i64 * 3_600
            + self.minutes as i64 * 60;
        let offset = offset.checked_add(self.seconds.trunc() as i64)?;
        first.checked_add_signed(Duration::try_seconds(offset)?)
    }
}

/// Minute carries beyond this cannot move the year inside `i32` anyway, and stay
/// clear of `i64` overflow in the field sums
const MAX_MINUTE_CARRY: f64 = (1u64 << 62) as f64;

/// Splits seconds into whole minutes and the remaining `[0, 60)` seconds
fn carry_seconds(seconds: f64) -> Option<(i64, f64)> {
    let carry = (seconds / 60.0).floor();
    if !carry.is_finite() || carry.abs() >= MAX_MINUTE_CARRY {
        return None;
    }
    let mut rest = seconds - carry * 60.0;
    let mut carry = carry as i64;
    // Rounding can land on either bound
    if rest >= 60.0 {
        rest -= 60.0;
        carry += 1;
    } else if rest < 0.0 {
        rest += 60.0;
        carry -= 1;
    }
    Some((carry, rest))
}

/// A year with the same leap pattern as `year`, inside `i32`
fn cycle_year(year: i64) -> i32 {
    (2000 + year.rem_euclid(YEARS_PER_CYCLE)) as i32
}

/// Number of days in `month` of `year`, `month` counts from 1.
///
/// Months past December roll over into the following years, like day zero of the
/// next month would.
pub fn days_in_month(month: i32, year: i32) -> i32 {
    let month0 = month as i64 - 1;
    let year = year as i64 + month0.div_euclid(12);
    let month = (month0.rem_euclid(12) + 1) as u32;
    // The calendar repeats every cycle, which keeps chrono inside its range
    let year = (2000 + year.rem_euclid(YEARS_PER_CYCLE)) as i32;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next.and_then(|date| date.pred_opt()) {
        Some(last) => last.day() as i32,
        None => 31,
    }
}
