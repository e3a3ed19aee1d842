//! `floodwatch`: flood-risk assessments for map locations from the command line.

use clap::{Parser, Subcommand};
use floodwatch_common::Coordinate;
use floodwatch_predict::AssessmentRequester;
use floodwatch_runner::render::{render_json, render_panel};
use floodwatch_runner::selector::parse_clicks;
use floodwatch_runner::{
    logging, AssessmentBoard, DisplayedAssessment, FloodwatchConfig, LocationSelector, MapClick,
    Overrides, Result,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "floodwatch", version, about = "Flood-risk assessment for map locations")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the prediction service.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds (default: transport default).
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Seed for demo-mode values.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print JSON instead of a text panel.
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assess a single location.
    Assess {
        /// Latitude in degrees (-90 to 90).
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees (-180 to 180).
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
    /// Replay a sequence of clicks (`lat,lon` per line) without waiting
    /// between them.
    Clicks {
        /// Click file; reads stdin when omitted.
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init_logging(cli.verbose)?;
    floodwatch_metrics::describe_metrics();

    let config = match &cli.config {
        Some(path) => FloodwatchConfig::load(path)?,
        None => FloodwatchConfig::default(),
    };
    let config = config.with_overrides(&Overrides {
        base_url: cli.base_url.clone(),
        timeout_ms: cli.timeout_ms,
        seed: cli.seed,
    });

    let requester = Arc::new(config.build_requester()?);
    info!(endpoint = %requester.endpoint(), "Using prediction service");

    let clicks = match &cli.command {
        Command::Assess { lat, lon } => {
            // Typed coordinates must already be valid; only widget clicks wrap.
            Coordinate::new(*lat, *lon)?;
            vec![MapClick::new(*lat, *lon)]
        }
        Command::Clicks { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => std::io::read_to_string(std::io::stdin())?,
            };
            parse_clicks(&text)?
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(replay(requester, clicks, cli.json))
}

/// Fire every click, print board updates as they land, then the final result.
async fn replay(requester: Arc<AssessmentRequester>, clicks: Vec<MapClick>, json: bool) -> Result<()> {
    let board = AssessmentBoard::new();
    let selector = LocationSelector::new(Arc::clone(&requester), board.clone());
    let mut updates = board.subscribe();

    let handles: Vec<_> = clicks
        .into_iter()
        .filter_map(|click| selector.on_click(click))
        .collect();
    let single = handles.len() == 1;

    let mut all_done = tokio::spawn(async move {
        for handle in handles {
            handle.join().await;
        }
    });

    // With a single click the final print below is enough.
    let mut joined = false;
    if !single {
        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let shown = updates.borrow_and_update().clone();
                    if let Some(shown) = shown {
                        print_displayed(&shown, json)?;
                    }
                }
                done = &mut all_done => {
                    if let Err(err) = done {
                        warn!(%err, "Replay task failed");
                    }
                    joined = true;
                    break;
                }
            }
        }
    }
    if !joined {
        if let Err(err) = all_done.await {
            warn!(%err, "Replay task failed");
        }
    }

    let stats = requester.stats();
    debug!(served = stats.served, substituted = stats.substituted, "Replay finished");

    match board.current() {
        Some(shown) => {
            if !single {
                println!("== displayed ==");
            }
            print_displayed(&shown, json)?;
            if board.is_stale() {
                println!(
                    "  (result from click #{}; click #{} finished earlier)",
                    shown.click,
                    board.latest_click()
                );
            }
        }
        None => println!("No location selected."),
    }
    Ok(())
}

fn print_displayed(shown: &DisplayedAssessment, json: bool) -> Result<()> {
    if json {
        let line = render_json(shown).map_err(std::io::Error::from)?;
        println!("{}", line);
    } else {
        print!("{}", render_panel(shown));
    }
    Ok(())
}
