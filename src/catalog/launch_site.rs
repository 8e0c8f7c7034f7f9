use std::{io, path::Path};

use bevy::log::{info, warn};
use strum_macros::{Display, EnumIter, EnumString};

use super::{column, field, headers, open_catalog, tsv_reader, CatalogError};

/// How a launch went, from the `Status_Mission` column.
/// The iteration order is the stacking order of the launch site bars.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum LaunchOutcome {
    Success,
    Failure,
    #[strum(serialize = "Prelaunch Failure")]
    PrelaunchFailure,
    #[default]
    Other,
}

impl LaunchOutcome {
    /// Anything unknown, partial failures included, is [LaunchOutcome::Other]
    pub fn from_status(status: &str) -> Self {
        status.parse().unwrap_or_default()
    }
}

/// One launch from the launch site catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSiteRecord {
    /// Degrees
    pub latitude: f64,
    /// Degrees
    pub longitude: f64,
    pub outcome: LaunchOutcome,
}

pub fn parse_launch_sites(text: &str) -> Result<Vec<LaunchSiteRecord>, CatalogError> {
    read_launch_sites(tsv_reader(text.as_bytes()))
}

fn read_launch_sites<I: io::Read>(
    mut reader: csv::Reader<I>,
) -> Result<Vec<LaunchSiteRecord>, CatalogError> {
    let headers = headers(&mut reader)?;
    let latitude = column(&headers, "Latitude")?;
    let longitude = column(&headers, "Longitude")?;
    let status = column(&headers, "Status_Mission")?;

    let mut sites = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        let coordinates = (
            field(&row, latitude).parse::<f64>(),
            field(&row, longitude).parse::<f64>(),
        );
        match coordinates {
            (Ok(latitude), Ok(longitude)) => sites.push(LaunchSiteRecord {
                latitude,
                longitude,
                outcome: LaunchOutcome::from_status(field(&row, status)),
            }),
            _ => warn!("Skipping launch site row {}, bad coordinates", idx + 1),
        }
    }
    Ok(sites)
}

pub fn load_launch_sites(path: &Path) -> Result<Vec<LaunchSiteRecord>, CatalogError> {
    let sites = read_launch_sites(open_catalog(path)?)?;
    info!("Loaded {} launch sites from {}", sites.len(), path.display());
    Ok(sites)
}
