//! RPS Arena entry point
//!
//! Headless runner: drives a run with a fixed virtual frame delta until a winner
//! emerges, then prints a JSON summary. With `--snapshots` the render feed is
//! printed as JSON lines first (arena walls, per-tick bodies, conversion pulses).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use rps_arena::consts::{PULSE_DURATION, PULSE_SCALE};
use rps_arena::sim::{Arena, BodyId, BodySnapshot, Kind, KindCounts, RunObserver, Wall, WallSide};
use rps_arena::{RunPhase, Settings, start};

/// Virtual host frame delta (60 Hz display)
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "rps-arena")]
#[command(about = "Run a rock-paper-scissors arena until one kind remains")]
struct Args {
    /// JSON settings file (missing fields take defaults)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// RNG seed, overrides the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Print the render feed as JSON lines
    #[arg(long)]
    snapshots: bool,

    /// Cancel the run after this much virtual time (seconds)
    #[arg(long)]
    max_seconds: Option<f32>,
}

/// One line of the render feed
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum FeedLine {
    Arena {
        width: f32,
        height: f32,
        walls: Vec<WallRect>,
    },
    Snapshot {
        tick: u64,
        bodies: Vec<FeedBody>,
    },
    Convert {
        id: BodyId,
        kind: Kind,
        color: u32,
        pulse_scale: f32,
        pulse_duration: f32,
    },
}

#[derive(Debug, Serialize)]
struct WallRect {
    side: WallSide,
    min: Vec2,
    max: Vec2,
}

#[derive(Debug, Serialize)]
struct FeedBody {
    id: BodyId,
    kind: Kind,
    color: u32,
    pos: Vec2,
}

impl From<&BodySnapshot> for FeedBody {
    fn from(body: &BodySnapshot) -> Self {
        Self {
            id: body.id,
            kind: body.kind,
            color: body.kind.color(),
            pos: body.pos,
        }
    }
}

impl FeedLine {
    fn arena(arena: &Arena, walls: &[Wall]) -> Self {
        let walls = walls
            .iter()
            .map(|wall| {
                let (min, max) = wall.rect(arena);
                WallRect {
                    side: wall.side,
                    min,
                    max,
                }
            })
            .collect();
        FeedLine::Arena {
            width: arena.width,
            height: arena.height,
            walls,
        }
    }

    fn snapshot(tick: u64, bodies: &[BodySnapshot]) -> Self {
        FeedLine::Snapshot {
            tick,
            bodies: bodies.iter().map(FeedBody::from).collect(),
        }
    }

    fn convert(id: BodyId, kind: Kind) -> Self {
        FeedLine::Convert {
            id,
            kind,
            color: kind.color(),
            pulse_scale: PULSE_SCALE,
            pulse_duration: PULSE_DURATION,
        }
    }

    fn print(&self) {
        match serde_json::to_string(self) {
            Ok(line) => println!("{line}"),
            Err(e) => log::warn!("feed encode failed: {e}"),
        }
    }
}

/// Prints the render feed when enabled and counts conversions
struct ConsoleObserver {
    snapshots: bool,
    conversions: u64,
}

impl RunObserver for ConsoleObserver {
    fn on_snapshot(&mut self, tick: u64, bodies: &[BodySnapshot]) {
        if self.snapshots {
            FeedLine::snapshot(tick, bodies).print();
        }
    }

    fn on_convert(&mut self, id: BodyId, kind: Kind) {
        self.conversions += 1;
        log::debug!("body {id} is now {kind}");
        if self.snapshots {
            FeedLine::convert(id, kind).print();
        }
    }

    fn on_winner(&mut self, kind: Kind) {
        log::info!("{kind} wins");
    }
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    phase: RunPhase,
    winner: Option<Kind>,
    ticks: u64,
    conversions: u64,
    counts: KindCounts,
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let observer = ConsoleObserver {
        snapshots: args.snapshots,
        conversions: 0,
    };
    let mut run = match start(&settings, observer) {
        Ok(run) => run,
        Err(e) => {
            log::error!("configuration rejected: {e}");
            return ExitCode::FAILURE;
        }
    };
    if args.snapshots {
        FeedLine::arena(&run.state().arena, &run.state().walls).print();
    }

    let max_frames = args.max_seconds.map(|s| (s / FRAME_DT).ceil() as u64);
    let mut frames = 0u64;
    while run.is_running() {
        run.advance(FRAME_DT);
        frames += 1;
        if max_frames.is_some_and(|max| frames >= max) {
            log::info!("time limit reached");
            run.stop();
        }
    }

    let summary = Summary {
        seed: run.state().seed,
        phase: run.phase(),
        winner: run.winner(),
        ticks: run.state().time_ticks,
        conversions: run.observer().conversions,
        counts: run.counts(),
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("summary encode failed: {e}"),
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_all_flags() {
        let args = Args::try_parse_from([
            "rps-arena",
            "--settings",
            "arena.json",
            "--seed",
            "7",
            "--snapshots",
            "--max-seconds",
            "2.5",
        ])
        .unwrap();
        assert_eq!(args.settings, Some(PathBuf::from("arena.json")));
        assert_eq!(args.seed, Some(7));
        assert!(args.snapshots);
        assert_eq!(args.max_seconds, Some(2.5));
    }

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["rps-arena"]).unwrap();
        assert!(args.settings.is_none());
        assert!(args.seed.is_none());
        assert!(!args.snapshots);
        assert!(args.max_seconds.is_none());
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Args::try_parse_from(["rps-arena", "--seed", "abc"]).is_err());
        assert!(Args::try_parse_from(["rps-arena", "--bogus"]).is_err());
    }

    #[test]
    fn test_snapshot_line_carries_kind_color() {
        let bodies = [BodySnapshot {
            id: 3,
            kind: Kind::Scissors,
            pos: Vec2::new(10.0, 20.0),
        }];
        let json = serde_json::to_value(FeedLine::snapshot(4, &bodies)).unwrap();
        assert_eq!(json["event"], "snapshot");
        assert_eq!(json["tick"], 4);
        assert_eq!(json["bodies"][0]["color"], Kind::Scissors.color());
        assert_eq!(json["bodies"][0]["id"], 3);
    }

    #[test]
    fn test_convert_line_carries_pulse() {
        let json = serde_json::to_value(FeedLine::convert(1, Kind::Rock)).unwrap();
        assert_eq!(json["event"], "convert");
        assert_eq!(json["color"], Kind::Rock.color());
        assert_eq!(json["pulse_scale"].as_f64(), Some(PULSE_SCALE as f64));
        assert_eq!(json["pulse_duration"].as_f64(), Some(PULSE_DURATION as f64));
    }

    #[test]
    fn test_arena_line_lists_wall_rects() {
        let arena = Arena::new(800.0, 600.0);
        let walls = arena.walls(50.0);
        let json = serde_json::to_value(FeedLine::arena(&arena, &walls)).unwrap();
        assert_eq!(json["event"], "arena");
        let rects = json["walls"].as_array().unwrap();
        assert_eq!(rects.len(), walls.len());
        for (rect, wall) in rects.iter().zip(&walls) {
            let (min, max) = wall.rect(&arena);
            assert_eq!(rect["min"], serde_json::to_value(min).unwrap());
            assert_eq!(rect["max"], serde_json::to_value(max).unwrap());
        }
    }
}
