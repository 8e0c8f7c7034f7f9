//! Headless driver: runs the simulation at a fixed frame rate and logs the simulated
//! time once per second.

use std::{path::PathBuf, time::Duration};

use bevy::{
    app::{App, AppExit, PluginGroup, ScheduleRunnerPlugin, Startup, Update},
    core::FrameCount,
    ecs::{
        event::EventWriter,
        schedule::IntoSystemConfigs,
        system::{Res, ResMut, Resource},
    },
    log::{error, info, Level, LogPlugin},
    time::{Time, Timer, TimerMode},
    MinimalPlugins,
};
use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};

use satnet::{
    catalog::{
        launch_site::load_launch_sites,
        satellite::{load_satellites, SatelliteFilter},
    },
    config::SimulationConfig,
    entities::{
        launch_sites::LaunchSiteMap, satellites::SatelliteField, SimulationPlugin,
        SimulationSet,
    },
    physics::util::clock::SimulatedClock,
};

#[derive(Parser, Debug)]
#[command(name = "satnet")]
#[command(about = "Headless satellite network simulation")]
struct Cli {
    /// Tab separated satellite catalog
    #[arg(long)]
    satellites: Option<PathBuf>,

    /// Tab separated launch site catalog
    #[arg(long)]
    launch_sites: Option<PathBuf>,

    /// Simulated seconds per real second
    #[arg(long, default_value_t = 200.0, allow_negative_numbers = true)]
    time_scale: f64,

    /// ALL, CIVIL, COMMERCIAL, GOVERNMENT or MILITARY
    #[arg(long, default_value = "ALL")]
    filter: SatelliteFilter,

    /// Seed for the satellites' initial phases
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u32>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Resource)]
struct TimeLog(Timer);

#[derive(Resource)]
struct FrameLimit(u32);

fn main() {
    let cli = Cli::parse();
    let config = SimulationConfig::default().time_scale(cli.time_scale);

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
    )
    .add_plugins(LogPlugin {
        level: cli.log_level.into(),
        ..Default::default()
    })
    .add_plugins(SimulationPlugin::new(config.clone()))
    .insert_resource(TimeLog(Timer::from_seconds(1.0, TimerMode::Repeating)))
    .add_systems(Startup, log_start_system)
    .add_systems(Update, log_time_system.after(SimulationSet::Sync));

    if let Some(path) = &cli.satellites {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        match load_satellites(path, config.max_satellites, &mut rng) {
            Ok(satellites) => {
                app.insert_resource(
                    SatelliteField::new(satellites, config.earth.tilt).with_filter(cli.filter),
                );
            }
            Err(err) => error!("{}", err),
        }
    }

    if let Some(path) = &cli.launch_sites {
        match load_launch_sites(path) {
            Ok(sites) => {
                let map = LaunchSiteMap::new(&sites, &config);
                info!(
                    "{} launch site bins, {} bars",
                    map.bins().len(),
                    map.bars().len()
                );
                app.insert_resource(map);
            }
            Err(err) => error!("{}", err),
        }
    }

    if let Some(frames) = cli.frames {
        app.insert_resource(FrameLimit(frames))
            .add_systems(Update, frame_limit_system);
    }

    app.run();
}

fn log_start_system(clock: Res<SimulatedClock>, field: Res<SatelliteField>) {
    info!(
        "Starting at {} with time scale {}, {} satellites ({:?})",
        clock.formatted_time(true),
        clock.time_scale(),
        field.len(),
        field.filter()
    );
}

fn log_time_system(
    time: Res<Time>,
    mut log: ResMut<TimeLog>,
    clock: Res<SimulatedClock>,
    field: Res<SatelliteField>,
) {
    if log.0.tick(time.delta()).just_finished() {
        info!(
            "{} ({} satellites active)",
            clock.formatted_time(true),
            field.active_count()
        );
    }
}

fn frame_limit_system(
    frames: Res<FrameCount>,
    limit: Res<FrameLimit>,
    mut exit: EventWriter<AppExit>,
) {
    if frames.0 >= limit.0 {
        info!("Stopping after {} frames", frames.0);
        exit.send(AppExit);
    }
}
