use std::fmt::{self, Display};

use bevy::{
    ecs::system::Resource,
    log::{debug, warn},
};
use chrono::{Local, NaiveDateTime};
use derive_more::{Add, AddAssign, From, Into, Neg, Sub, SubAssign};

use super::calendar::{days_in_month, CalendarFields};
use crate::config::{ClockConfig, SimulationConfig};

/// Simulated seconds, signed.
/// The clock's velocity is measured in these, relative to its reference instant.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, PartialOrd, Add, Sub, AddAssign, SubAssign, Neg, From, Into,
)]
pub struct SimSeconds(pub f64);

/// A calendar clock that runs at a user controlled rate.
///
/// There are two ways to mutate it:
/// * Continuous: [SimulatedClock::update] once per frame, which accumulates
///   `velocity` and rolls the calendar forward (or backward) by the same amount.
/// * Discrete: the setters and [SimulatedClock::set_specific_time], which write the
///   calendar fields and then derive `velocity` from them.
///
/// `velocity` is the number of simulated seconds since the reference instant, the
/// calendar fields the clock was created with. It is what the orbit solver uses as
/// its time input.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulatedClock {
    fields: CalendarFields,
    time_scale: f64,
    velocity: SimSeconds,
    acceleration: SimSeconds,
    reference: NaiveDateTime,
    config: ClockConfig,
}

impl SimulatedClock {
    pub fn new(config: &ClockConfig) -> Self {
        let reference = match config.start.to_datetime() {
            Some(reference) => reference,
            None => {
                warn!(
                    "Clock start {:?} is out of range, using the default reference",
                    config.start
                );
                NaiveDateTime::default()
            }
        };
        Self {
            fields: config.start,
            time_scale: config.time_scale,
            velocity: SimSeconds(0.0),
            acceleration: SimSeconds(0.0),
            reference,
            config: config.clone(),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(&config.clock)
    }

    /// A clock with default bounds, starting at `start`
    pub fn with_start(start: CalendarFields, time_scale: f64) -> Self {
        Self::new(&ClockConfig {
            start,
            time_scale,
            ..Default::default()
        })
    }

    /* Getters */
    pub fn fields(&self) -> CalendarFields {
        self.fields
    }
    pub fn hours(&self) -> i32 {
        self.fields.hours
    }
    pub fn minutes(&self) -> i32 {
        self.fields.minutes
    }
    pub fn seconds(&self) -> f64 {
        self.fields.seconds
    }
    pub fn month(&self) -> i32 {
        self.fields.month
    }
    pub fn day(&self) -> i32 {
        self.fields.day
    }
    pub fn year(&self) -> i32 {
        self.fields.year
    }
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
    pub fn velocity(&self) -> SimSeconds {
        self.velocity
    }
    pub fn acceleration(&self) -> SimSeconds {
        self.acceleration
    }
    pub fn reference(&self) -> NaiveDateTime {
        self.reference
    }
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// The current calendar fields as a date time, seconds floored
    pub fn current_datetime(&self) -> Option<NaiveDateTime> {
        self.fields.to_datetime()
    }

    /// Called once per frame with the real time elapsed since the last one
    pub fn update(&mut self, frame_delta_seconds: f64) {
        if !frame_delta_seconds.is_finite() {
            warn!("Ignoring non finite frame delta {}", frame_delta_seconds);
            return;
        }
        self.acceleration = SimSeconds(frame_delta_seconds * self.time_scale);
        self.velocity += self.acceleration;

        if self.fields.year < self.config.floor_year {
            warn!(
                "Simulated time went past {}, resetting the clock",
                self.config.floor_year
            );
            self.acceleration = SimSeconds(0.0);
            self.velocity = SimSeconds(0.0);
            self.time_scale = 0.0;
            self.reset();
        }

        self.run(self.acceleration.0);
    }

    /// Adds `delta_seconds` to the calendar and normalizes every field.
    ///
    /// Works for any magnitude and sign in a single call. `velocity` is not touched.
    /// A delta that is not finite or that would take the year out of `i32` is refused
    /// and leaves the calendar as it was.
    pub fn run(&mut self, delta_seconds: f64) {
        match self.fields.advanced_by(delta_seconds) {
            Some(fields) => self.fields = fields,
            None => warn!(
                "Refusing to run {:?} by {} seconds, the year would leave the calendar",
                self.fields, delta_seconds
            ),
        }
    }

    /// Derives `velocity` from the calendar fields
    pub fn calculate_velocity(&mut self) {
        match self.fields.to_datetime() {
            Some(now) => {
                let elapsed = now.signed_duration_since(self.reference);
                self.velocity = SimSeconds(elapsed.num_seconds() as f64);
            }
            None => warn!(
                "Calendar {:?} is out of range, velocity left at {:?}",
                self.fields, self.velocity
            ),
        }
    }

    /* Discrete edits */
    /// Out of range values are clamped and leave `velocity` alone
    pub fn set_hours(&mut self, value: i32) {
        if (0..24).contains(&value) {
            self.fields.hours = value;
            self.calculate_velocity();
        } else {
            debug!("Clamping hours {}", value);
            self.fields.hours = value.clamp(0, 23);
        }
    }

    /// Out of range values are clamped and leave `velocity` alone
    pub fn set_minutes(&mut self, value: i32) {
        if (0..60).contains(&value) {
            self.fields.minutes = value;
            self.calculate_velocity();
        } else {
            debug!("Clamping minutes {}", value);
            self.fields.minutes = value.clamp(0, 59);
        }
    }

    /// Out of range values are clamped and leave `velocity` alone
    pub fn set_seconds(&mut self, value: f64) {
        if (0.0..60.0).contains(&value) {
            self.fields.seconds = value;
            self.calculate_velocity();
        } else {
            debug!("Clamping seconds {}", value);
            self.fields.seconds = value.max(0.0).min(59.0);
        }
    }

    /// Out of range values are clamped and leave `velocity` alone
    pub fn set_month(&mut self, value: i32) {
        if (1..=12).contains(&value) {
            self.fields.month = value;
            self.calculate_velocity();
        } else {
            debug!("Clamping month {}", value);
            self.fields.month = value.clamp(1, 12);
        }
    }

    /// Valid days depend on the current month and year
    pub fn set_day(&mut self, value: i32) {
        let max_day = days_in_month(self.fields.month, self.fields.year);
        if (1..=max_day).contains(&value) {
            self.fields.day = value;
            self.calculate_velocity();
        } else {
            debug!("Clamping day {} to 1..={}", value, max_day);
            self.fields.day = value.clamp(1, max_day);
        }
    }

    /// Valid years are `1..=max_year` from the clock config
    pub fn set_year(&mut self, value: i32) {
        let max_year = self.config.max_year;
        if (1..=max_year).contains(&value) {
            self.fields.year = value;
            self.calculate_velocity();
        } else {
            debug!("Clamping year {} to 1..={}", value, max_year);
            self.fields.year = value.clamp(1, max_year);
        }
    }

    /// Writes every calendar field at once, no validation
    pub fn set_fields(&mut self, fields: CalendarFields) {
        self.fields = fields;
        self.calculate_velocity();
    }

    /// Jumps to a specific date and time
    pub fn set_specific_time(
        &mut self,
        hours: i32,
        minutes: i32,
        seconds: f64,
        month: i32,
        day: i32,
        year: i32,
    ) {
        self.set_fields(CalendarFields::new(hours, minutes, seconds, month, day, year));
    }

    /// Jumps to the local wall clock time
    pub fn set_current_time(&mut self) {
        self.set_fields(CalendarFields::from_datetime(Local::now().naive_local()));
    }

    /// Jumps back to the floor date
    pub fn reset(&mut self) {
        self.set_fields(CalendarFields::new_year(self.config.floor_year));
    }

    /// Clamped to the configured time scale range
    pub fn set_time_scale(&mut self, value: f64) {
        if value.is_nan() {
            warn!("Ignoring NaN time scale");
            return;
        }
        self.time_scale = value.clamp(self.config.min_time_scale, self.config.max_time_scale);
    }

    /// `HH:MM:SS`, or `M/D/YYYY HH:MM:SS` with the date
    pub fn formatted_time(&self, include_date: bool) -> String {
        let fields = &self.fields;
        let time = format!(
            "{:02}:{:02}:{:02}",
            fields.hours,
            fields.minutes,
            fields.seconds.floor() as i64
        );
        if include_date {
            format!("{}/{}/{} {}", fields.month, fields.day, fields.year, time)
        } else {
            time
        }
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new(&ClockConfig::default())
    }
}

impl Display for SimulatedClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted_time(true))
    }
}
