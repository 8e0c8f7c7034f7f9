use std::{io, path::Path, str::FromStr};

use bevy::log::{info, warn};
use chrono::NaiveDate;
use rand::Rng;
use strum::{EnumProperty, IntoEnumIterator};
use strum_macros::{Display, EnumIter, EnumProperty, EnumString};

use super::{column, field, headers, open_catalog, parse_number, tsv_reader, CatalogError};
use crate::physics::orbits::components::{random_phase, OrbitalElements};

/// Who operates a satellite, from the leading letters of the `Users` column
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, EnumProperty,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum UserCategory {
    #[strum(props(prefix = "civ"))]
    Civil,
    #[strum(props(prefix = "com"))]
    Commercial,
    #[strum(props(prefix = "gov"))]
    Government,
    #[strum(props(prefix = "mil"))]
    Military,
    Other,
}

impl UserCategory {
    pub fn prefix(self) -> Option<&'static str> {
        self.get_str("prefix")
    }

    /// Only the first three letters matter, `Government/Commercial` is government
    pub fn from_users(users: &str) -> Self {
        let prefix = users.chars().take(3).collect::<String>().to_lowercase();
        UserCategory::iter()
            .find(|category| category.prefix() == Some(prefix.as_str()))
            .unwrap_or(UserCategory::Other)
    }
}

/// Which satellites are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SatelliteFilter {
    #[default]
    All,
    Category(UserCategory),
}

impl SatelliteFilter {
    pub fn matches(&self, category: UserCategory) -> bool {
        match self {
            SatelliteFilter::All => true,
            SatelliteFilter::Category(wanted) => *wanted == category,
        }
    }
}

impl FromStr for SatelliteFilter {
    type Err = strum::ParseError;

    /// Accepts `ALL` or a category label, in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(SatelliteFilter::All)
        } else {
            UserCategory::from_str(s).map(SatelliteFilter::Category)
        }
    }
}

/// One row of the satellite catalog
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteRecord {
    pub users: String,
    pub category: UserCategory,
    /// km above the surface
    pub perigee: f64,
    /// km above the surface
    pub apogee: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub period_minutes: f64,
    pub launch_date: NaiveDate,
    pub initial_phase: f64,
}

impl SatelliteRecord {
    /// Elements in the frame of a host whose spin axis is tilted by `host_tilt` radians.
    ///
    /// Catalog inclinations are measured from the equator, the orbital plane gets an
    /// extra quarter turn and the host tilt on top. The period is reversed so the
    /// satellites travel with the host's spin.
    pub fn orbital_elements(&self, host_tilt: f64) -> OrbitalElements {
        OrbitalElements {
            perigee: self.perigee,
            apogee: self.apogee,
            eccentricity: self.eccentricity,
            inclination: (self.inclination_deg + 90.0).to_radians() + host_tilt,
            period: -self.period_minutes * 60.0,
            initial_phase: self.initial_phase,
        }
    }

    pub fn is_launched(&self, date: NaiveDate) -> bool {
        self.launch_date <= date
    }
}

const LAUNCH_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

pub fn parse_launch_date(value: &str) -> Option<NaiveDate> {
    LAUNCH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Reads at most `max_satellites` rows, dropping the ones without a launch date.
/// Each satellite gets a random initial phase from `rng`.
pub fn parse_satellites<R: Rng + ?Sized>(
    text: &str,
    max_satellites: usize,
    rng: &mut R,
) -> Result<Vec<SatelliteRecord>, CatalogError> {
    read_satellites(tsv_reader(text.as_bytes()), max_satellites, rng)
}

fn read_satellites<I: io::Read, R: Rng + ?Sized>(
    mut reader: csv::Reader<I>,
    max_satellites: usize,
    rng: &mut R,
) -> Result<Vec<SatelliteRecord>, CatalogError> {
    let headers = headers(&mut reader)?;
    let users = column(&headers, "Users")?;
    let perigee = column(&headers, "Perigee")?;
    let apogee = column(&headers, "Apogee")?;
    let eccentricity = column(&headers, "Eccentricity")?;
    let inclination = column(&headers, "Inclination")?;
    let period = column(&headers, "Period")?;
    let launch = column(&headers, "Date_of_Launch")?;

    let mut satellites = Vec::new();
    for (idx, row) in reader.records().take(max_satellites).enumerate() {
        let row = row?;
        let Some(launch_date) = parse_launch_date(field(&row, launch)) else {
            warn!(
                "Skipping satellite row {}, bad launch date {:?}",
                idx + 1,
                field(&row, launch)
            );
            continue;
        };
        let user_label = field(&row, users);
        satellites.push(SatelliteRecord {
            users: user_label.to_owned(),
            category: UserCategory::from_users(user_label),
            perigee: parse_number(field(&row, perigee)),
            apogee: parse_number(field(&row, apogee)),
            eccentricity: parse_number(field(&row, eccentricity)),
            inclination_deg: parse_number(field(&row, inclination)),
            period_minutes: parse_number(field(&row, period)),
            launch_date,
            initial_phase: random_phase(rng),
        });
    }
    Ok(satellites)
}

pub fn load_satellites<R: Rng + ?Sized>(
    path: &Path,
    max_satellites: usize,
    rng: &mut R,
) -> Result<Vec<SatelliteRecord>, CatalogError> {
    let satellites = read_satellites(open_catalog(path)?, max_satellites, rng)?;
    info!("Loaded {} satellites from {}", satellites.len(), path.display());
    Ok(satellites)
}
