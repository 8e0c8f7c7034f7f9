//! Launch sites on the host planet, binned by proximity and drawn as stacked bars,
//! one segment per launch outcome.

use bevy::{
    app::{App, Plugin},
    ecs::system::Resource,
    math::DVec3,
};
use hashbrown::HashMap;
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::{
    catalog::launch_site::{LaunchOutcome, LaunchSiteRecord},
    config::SimulationConfig,
    physics::util::vectors::lat_long_to_vector3,
};

/// Launch sites closer than the proximity threshold, merged
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchSiteBin {
    /// Mean latitude of the merged sites, degrees
    pub latitude: f64,
    /// Mean longitude of the merged sites, degrees
    pub longitude: f64,
    pub counts: HashMap<LaunchOutcome, usize>,
}

/// One stacked segment above a bin, relative to the planet center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSiteBar {
    pub outcome: LaunchOutcome,
    pub height: f64,
    /// Thickness of the bar
    pub radius: f64,
    pub bottom: DVec3,
    pub top: DVec3,
    pub center: DVec3,
}

impl LaunchSiteBin {
    pub fn count(&self, outcome: LaunchOutcome) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Bars stacked outward from a sphere of `base_radius`, in [LaunchOutcome] order.
    /// Outcomes without launches get no bar.
    pub fn bars(
        &self,
        base_radius: f64,
        bar_scale: f64,
        bar_radius: f64,
        surface_rotation: f64,
    ) -> Vec<LaunchSiteBar> {
        let mut cumulative_height = 0.0;
        LaunchOutcome::iter()
            .filter_map(|outcome| {
                let count = self.count(outcome);
                if count == 0 {
                    return None;
                }
                let height = count as f64 * bar_scale;
                let radius = base_radius + cumulative_height;
                let bottom = lat_long_to_vector3(self.latitude, self.longitude, radius, surface_rotation);
                let top =
                    lat_long_to_vector3(self.latitude, self.longitude, radius + height, surface_rotation);
                cumulative_height += height;
                Some(LaunchSiteBar {
                    outcome,
                    height,
                    radius: bar_radius,
                    bottom,
                    top,
                    center: (bottom + top) / 2.0,
                })
            })
            .collect()
    }
}

/// Halves round toward positive infinity, on both hemispheres
fn bin_index(degrees: f64, proximity: f64) -> i64 {
    (degrees / proximity + 0.5).floor() as i64
}

/// Groups launches into bins of `proximity` degrees, sorted by latitude then longitude
pub fn group_launch_sites(sites: &[LaunchSiteRecord], proximity: f64) -> Vec<LaunchSiteBin> {
    let mut bins: HashMap<(i64, i64), (f64, f64, HashMap<LaunchOutcome, usize>)> = HashMap::new();
    for site in sites {
        let key = (
            bin_index(site.latitude, proximity),
            bin_index(site.longitude, proximity),
        );
        let (total_latitude, total_longitude, counts) = bins.entry(key).or_default();
        *total_latitude += site.latitude;
        *total_longitude += site.longitude;
        *counts.entry(site.outcome).or_default() += 1;
    }

    bins.into_iter()
        .sorted_by_key(|(key, _)| *key)
        .map(|(_, (total_latitude, total_longitude, counts))| {
            let total = counts.values().sum::<usize>() as f64;
            LaunchSiteBin {
                latitude: total_latitude / total,
                longitude: total_longitude / total,
                counts,
            }
        })
        .collect()
}

#[derive(Resource, Debug, Default, Clone)]
pub struct LaunchSiteMap {
    bins: Vec<LaunchSiteBin>,
    bars: Vec<LaunchSiteBar>,
}

impl LaunchSiteMap {
    /// Bars sit on the Earth's surface, which is rotated against its tilt
    pub fn new(sites: &[LaunchSiteRecord], config: &SimulationConfig) -> Self {
        let bins = group_launch_sites(sites, config.launch_site_proximity);
        let bars = bins
            .iter()
            .flat_map(|bin| {
                bin.bars(
                    config.earth.size,
                    config.launch_site_bar_scale,
                    config.launch_site_bar_radius,
                    -config.earth.tilt,
                )
            })
            .collect();
        Self { bins, bars }
    }

    pub fn bins(&self) -> &[LaunchSiteBin] {
        &self.bins
    }

    pub fn bars(&self) -> &[LaunchSiteBar] {
        &self.bars
    }
}

pub struct LaunchSitePlugin;

impl Plugin for LaunchSitePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LaunchSiteMap>();
    }
}
