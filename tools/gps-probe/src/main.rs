use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use photo_guesser_core::geo::{Coordinate, distance_km, format_distance};
use photo_guesser_exif::{GpsSummary, gps_from_path};

const DATETIME_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser, Debug)]
#[command(
    name = "gps-probe",
    author,
    version,
    about = "Report which photo files carry usable GPS metadata",
    long_about = "Reads EXIF GPS metadata from photo files the same way the game's \
                  ingestion does and reports which files would enter a round set.\n\n\
                  Files without a complete GPS position are the ones a game would \
                  exclude from play; unreadable files are reported per file instead \
                  of aborting the run."
)]
struct Args {
    /// Photo files to probe
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Emit one JSON report instead of text lines
    #[arg(long)]
    json: bool,

    /// Reference point as "latitude,longitude"; adds each located file's
    /// distance from it
    #[arg(short, long)]
    reference: Option<String>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

/// What probing one file turned up.
#[derive(Clone, Debug)]
enum Probe {
    Located {
        summary: GpsSummary,
        distance_km: Option<f64>,
    },
    NoGps,
    Unreadable(String),
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum ProbeStatus {
    Located,
    NoGps,
    Unreadable,
}

/// One file's row in the JSON report.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinate: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    altitude_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    captured_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FileReport {
    fn new(file: &str, probe: &Probe) -> Self {
        match probe {
            Probe::Located {
                summary,
                distance_km,
            } => Self {
                coordinate: Some(summary.coordinate),
                altitude_m: summary.altitude_m,
                captured_at: summary
                    .captured_at
                    .map(|taken| taken.format(DATETIME_DISPLAY).to_string()),
                distance_km: *distance_km,
                ..Self::bare(file, ProbeStatus::Located)
            },
            Probe::NoGps => Self::bare(file, ProbeStatus::NoGps),
            Probe::Unreadable(error) => Self {
                error: Some(error.clone()),
                ..Self::bare(file, ProbeStatus::Unreadable)
            },
        }
    }

    fn bare(file: &str, status: ProbeStatus) -> Self {
        Self {
            file: file.to_owned(),
            status,
            coordinate: None,
            altitude_m: None,
            captured_at: None,
            distance_km: None,
            error: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProbeReport {
    files: Vec<FileReport>,
    summary: Summary,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
struct Summary {
    total: usize,
    located: usize,
    no_gps: usize,
    unreadable: usize,
}

impl Summary {
    fn tally<'a>(probes: impl Iterator<Item = &'a Probe>) -> Self {
        let mut summary = Self::default();
        for probe in probes {
            summary.total += 1;
            match probe {
                Probe::Located { .. } => summary.located += 1,
                Probe::NoGps => summary.no_gps += 1,
                Probe::Unreadable(_) => summary.unreadable += 1,
            }
        }
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files probed: {} located, {} without GPS, {} unreadable",
            self.total, self.located, self.no_gps, self.unreadable
        )
    }
}

async fn probe_file(path: &Path, reference: Option<Coordinate>) -> Probe {
    match gps_from_path(path).await {
        Ok(Some(summary)) => {
            let distance_km = reference.map(|point| distance_km(summary.coordinate, point));
            Probe::Located {
                summary,
                distance_km,
            }
        }
        Ok(None) => Probe::NoGps,
        Err(err) => Probe::Unreadable(err.to_string()),
    }
}

fn text_line(file: &str, probe: &Probe) -> String {
    match probe {
        Probe::Located {
            summary,
            distance_km,
        } => {
            let mut line = format!("{file}: {}", summary.coordinate);
            if let Some(altitude) = summary.altitude_m {
                line.push_str(&format!(", altitude {altitude} m"));
            }
            if let Some(taken) = summary.captured_at {
                line.push_str(&format!(", taken {}", taken.format(DATETIME_DISPLAY)));
            }
            if let Some(distance) = distance_km {
                line.push_str(&format!(", {} from reference", format_distance(*distance)));
            }
            line
        }
        Probe::NoGps => format!("{file}: no GPS position"),
        Probe::Unreadable(error) => format!("{file}: unreadable ({error})"),
    }
}

fn parse_reference(value: &str) -> Result<Coordinate> {
    let (latitude, longitude) = value
        .split_once(',')
        .context("expected \"latitude,longitude\"")?;
    let latitude: f64 = latitude
        .trim()
        .parse()
        .context("latitude is not a number")?;
    let longitude: f64 = longitude
        .trim()
        .parse()
        .context("longitude is not a number")?;
    Ok(Coordinate::new(latitude, longitude))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to stderr; stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if args.verbose { "debug" } else { "info" })
        }))
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let reference = args
        .reference
        .as_deref()
        .map(parse_reference)
        .transpose()
        .context("invalid --reference value")?;

    let mut probes = Vec::with_capacity(args.files.len());
    for path in &args.files {
        debug!(file = %path.display(), "probing");
        probes.push((path.display().to_string(), probe_file(path, reference).await));
    }

    let summary = Summary::tally(probes.iter().map(|(_, probe)| probe));

    if args.json {
        let report = ProbeReport {
            files: probes
                .iter()
                .map(|(file, probe)| FileReport::new(file, probe))
                .collect(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (file, probe) in &probes {
            println!("{}", text_line(file, probe));
        }
        println!();
        println!("{summary}");
    }

    Ok(())
}
