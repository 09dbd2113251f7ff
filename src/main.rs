// SPDX-License-Identifier: MIT
#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod detect;
mod gaze;
mod recording;
mod tui;

use std::fmt;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use num_format::{Locale, ToFormattedString};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::detect::idt::IdtParams;
use crate::detect::ivt::IvtParams;
use crate::detect::{DetectorConfig, Mode};
use crate::gaze::{Fixation, GazeSample};
use crate::recording::reader::RecordingReader;
use crate::tui::app::{App, TrialInfo};
use crate::tui::input::handle_key;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "fixate", about = "fixate: fixation detector for raw eye-tracking recordings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect fixations in one trial and print or export them
    Detect {
        /// Raw eye-tracking CSV recording
        input: PathBuf,
        /// Trial to process
        #[arg(short, long)]
        trial: i64,
        /// Sampling frequency of the recording, in Hz
        #[arg(short, long)]
        freq: u32,
        /// Detection algorithm
        #[arg(short, long, value_enum)]
        mode: Mode,
        /// I-VT velocity threshold, in pixels/ms
        #[arg(long)]
        vel_thres: Option<f64>,
        /// I-DT dispersion threshold, in pixels
        #[arg(long)]
        dis_thres: Option<f64>,
        /// Minimum fixation duration, in ms
        #[arg(long, default_value_t = 200.0)]
        dur_thres: f64,
        /// Export the fixations to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
    /// Detect fixations and view the trial in the terminal
    View {
        /// Raw eye-tracking CSV recording
        input: PathBuf,
        /// Trial to process
        #[arg(short, long)]
        trial: i64,
        /// Sampling frequency of the recording, in Hz
        #[arg(short, long)]
        freq: u32,
        /// Detection algorithm
        #[arg(short, long, value_enum)]
        mode: Mode,
        /// I-VT velocity threshold, in pixels/ms
        #[arg(long)]
        vel_thres: Option<f64>,
        /// I-DT dispersion threshold, in pixels
        #[arg(long)]
        dis_thres: Option<f64>,
        /// Minimum fixation duration, in ms
        #[arg(long, default_value_t = 200.0)]
        dur_thres: f64,
    },
    /// List the trials present in a recording
    Trials {
        /// Raw eye-tracking CSV recording
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect {
            input,
            trial,
            freq,
            mode,
            vel_thres,
            dis_thres,
            dur_thres,
            output,
            format,
        } => {
            let config = build_config(mode, vel_thres, dis_thres, dur_thres, freq)?;
            cmd_detect(&input, trial, &config, output.as_deref(), format)
        }
        Commands::View {
            input,
            trial,
            freq,
            mode,
            vel_thres,
            dis_thres,
            dur_thres,
        } => {
            let config = build_config(mode, vel_thres, dis_thres, dur_thres, freq)?;
            cmd_view(&input, trial, freq, &config)
        }
        Commands::Trials { input } => cmd_trials(&input),
    }
}

// ---------------------------------------------------------------------------
// Detector configuration
// ---------------------------------------------------------------------------

fn build_config(
    mode: Mode,
    vel_thres: Option<f64>,
    dis_thres: Option<f64>,
    dur_thres: f64,
    freq: u32,
) -> Result<DetectorConfig> {
    match mode {
        Mode::Velocity => {
            let Some(velocity_threshold) = vel_thres else {
                bail!("--vel-thres is required in velocity mode");
            };
            Ok(DetectorConfig::Velocity(IvtParams {
                velocity_threshold,
                duration_threshold_ms: dur_thres,
                sampling_frequency_hz: freq,
            }))
        }
        Mode::Dispersion => {
            let Some(dispersion_threshold) = dis_thres else {
                bail!("--dis-thres is required in dispersion mode");
            };
            Ok(DetectorConfig::Dispersion(IdtParams {
                dispersion_threshold,
                duration_threshold_ms: dur_thres,
            }))
        }
    }
}

fn load_trial(input: &Path, trial: i64) -> Result<Vec<GazeSample>> {
    let reader = RecordingReader::open(input)?;
    match reader.trial(trial) {
        Some(samples) => Ok(samples.to_vec()),
        None => {
            let available: Vec<String> = reader.trial_ids().iter().map(i64::to_string).collect();
            bail!(
                "trial {trial} not found in {} (available: {})",
                input.display(),
                available.join(", ")
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Signal handling
// ---------------------------------------------------------------------------

fn install_signal_handler() -> Result<Arc<AtomicBool>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown))
        .context("failed to register SIGINT handler")?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown))
        .context("failed to register SIGTERM handler")?;
    Ok(shutdown)
}

// ---------------------------------------------------------------------------
// Terminal setup / teardown
// ---------------------------------------------------------------------------

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("failed to create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Detect subcommand
// ---------------------------------------------------------------------------

fn cmd_detect(
    input: &Path,
    trial: i64,
    config: &DetectorConfig,
    output: Option<&Path>,
    format: ExportFormat,
) -> Result<()> {
    let samples = load_trial(input, trial)?;
    let fixations = config.detect(&samples)?;

    print_fixation_table(&mut io::stdout().lock(), &fixations)?;
    eprintln!(
        "Detected {} fixations from {} samples (trial {trial}, {})",
        fixations.len(),
        samples.len().to_formatted_string(&Locale::en),
        config.describe()
    );

    if let Some(path) = output {
        match format {
            ExportFormat::Csv => write_fixations_csv(path, &fixations)?,
            ExportFormat::Json => write_fixations_json(path, &fixations)?,
        }
        eprintln!(
            "Wrote {} fixations to {} ({format})",
            fixations.len(),
            path.display()
        );
    }

    Ok(())
}

fn print_fixation_table(out: &mut impl Write, fixations: &[Fixation]) -> Result<()> {
    if fixations.is_empty() {
        writeln!(out, "No fixations detected.").context("failed to write table")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>4}  {:>10}  {:>10}  {:>9}  {:>10}  {:>10}",
        "#", "start (ms)", "end (ms)", "dur (ms)", "x mean", "y mean"
    )
    .context("failed to write table header")?;

    for (i, f) in fixations.iter().enumerate() {
        writeln!(
            out,
            "{:>4}  {:>10}  {:>10}  {:>9}  {:>10.2}  {:>10.2}",
            i + 1,
            f.start_t,
            f.end_t,
            f.duration,
            f.x_mean,
            f.y_mean
        )
        .context("failed to write table row")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

fn write_fixations_csv(path: &Path, fixations: &[Fixation]) -> Result<()> {
    let mut out = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writeln!(out, "fixation,start_t,end_t,duration,x_mean,y_mean")
        .context("failed to write CSV header")?;

    for (i, f) in fixations.iter().enumerate() {
        writeln!(
            out,
            "{i},{},{},{},{},{}",
            f.start_t, f.end_t, f.duration, f.x_mean, f.y_mean
        )
        .context("failed to write CSV row")?;
    }

    Ok(())
}

fn write_fixations_json(path: &Path, fixations: &[Fixation]) -> Result<()> {
    let out = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(out, fixations)
        .with_context(|| format!("failed to write JSON to {}", path.display()))
}

// ---------------------------------------------------------------------------
// View subcommand
// ---------------------------------------------------------------------------

fn cmd_view(input: &Path, trial: i64, freq: u32, config: &DetectorConfig) -> Result<()> {
    let samples = load_trial(input, trial)?;
    let fixations = config.detect(&samples)?;

    let info = TrialInfo {
        trial_id: trial,
        sampling_frequency_hz: freq,
        detector: config.describe(),
        sample_count: samples.len(),
        fixation_count: fixations.len(),
    };

    let shutdown = install_signal_handler()?;
    let mut app = App::new(info, samples, fixations);
    let mut terminal = setup_terminal()?;

    let result = run_view_loop(&shutdown, &mut app, &mut terminal);

    restore_terminal(&mut terminal)?;
    result
}

fn run_view_loop(
    shutdown: &Arc<AtomicBool>,
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<()> {
    loop {
        if shutdown.load(Ordering::Relaxed) || app.should_quit {
            break;
        }

        if event::poll(EVENT_POLL_TIMEOUT).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            app.handle_action(&handle_key(key.code));
        }

        terminal
            .draw(|f| app.render(f))
            .context("failed to draw frame")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Trials subcommand
// ---------------------------------------------------------------------------

fn cmd_trials(input: &Path) -> Result<()> {
    let reader = RecordingReader::open(input)?;
    let ids = reader.trial_ids();

    if ids.is_empty() {
        eprintln!("No usable samples in {}", input.display());
        return Ok(());
    }

    let trial_count = ids.len();
    for id in ids {
        let Some(samples) = reader.trial(id) else {
            continue;
        };
        let (first, last) = (samples[0].t, samples[samples.len() - 1].t);
        println!(
            "trial {id}: {} samples, {} ms ({first}..{last} ms)",
            samples.len().to_formatted_string(&Locale::en),
            last - first
        );
    }

    eprintln!(
        "{} usable samples across {trial_count} trials",
        reader.sample_count().to_formatted_string(&Locale::en)
    );
    Ok(())
}
