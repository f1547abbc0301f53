//! dsaviz command-line client.
//!
//! Provides the `dsaviz` binary with subcommands to classify source files,
//! run the analysis pipeline against the configured upstream, build the
//! offline fallback trace, and play a saved trace in the terminal.
//!
//! `analyze` reads the same environment variables as `dsaviz-server`.

mod render;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dsaviz_core::{classify, normalize::fallback_result, AnalysisRequest, AnalysisResult};
use dsaviz_playback::PlaybackController;
use dsaviz_server::config::ServerConfig;
use dsaviz_server::llm_provider::HttpGenerator;
use dsaviz_server::pipeline::AnalysisPipeline;

/// Algorithm trace analysis and playback.
#[derive(Parser)]
#[command(name = "dsaviz", about = "Algorithm trace analysis and playback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print the data-structure family detected in a source file.
    Classify {
        /// Source file to classify.
        #[arg(short, long)]
        code_file: PathBuf,
    },

    /// Analyze a source file through the configured upstream.
    Analyze {
        /// Source file to analyze.
        #[arg(short, long)]
        code_file: PathBuf,

        /// Input literal, e.g. "[64, 34, 25]".
        #[arg(short, long, default_value = "")]
        input: String,

        /// Write the trace here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Play the trace in the terminal once analyzed.
        #[arg(long)]
        play: bool,

        /// Autoplay delay in milliseconds.
        #[arg(long, default_value_t = 1500)]
        interval_ms: u64,
    },

    /// Print the offline fallback trace without calling the upstream.
    Fallback {
        /// Source file used for classification.
        #[arg(short, long)]
        code_file: PathBuf,

        /// Input literal, e.g. "[64, 34, 25]".
        #[arg(short, long, default_value = "")]
        input: String,
    },

    /// Autoplay a saved trace in the terminal.
    Play {
        /// Trace JSON written by `analyze`.
        #[arg(short, long)]
        trace: PathBuf,

        /// Autoplay delay in milliseconds.
        #[arg(long, default_value_t = 1500)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Classify { code_file } => run_classify(&code_file),
        Commands::Analyze {
            code_file,
            input,
            out,
            play,
            interval_ms,
        } => run_analyze(&code_file, input, out, play, Duration::from_millis(interval_ms)).await,
        Commands::Fallback { code_file, input } => run_fallback(&code_file, &input),
        Commands::Play { trace, interval_ms } => {
            run_play(&trace, Duration::from_millis(interval_ms)).await
        }
    };
    process::exit(exit_code);
}

/// Execute the classify subcommand.
///
/// Returns exit code: 0 = success, 3 = I/O error.
fn run_classify(code_file: &Path) -> i32 {
    match read_source(code_file) {
        Ok(code) => {
            println!("{}", classify(&code));
            0
        }
        Err(code) => code,
    }
}

/// Execute the analyze subcommand.
///
/// Returns exit code: 0 = success, 1 = upstream unavailable,
/// 2 = configuration error, 3 = I/O error.
async fn run_analyze(
    code_file: &Path,
    input: String,
    out: Option<PathBuf>,
    play: bool,
    interval: Duration,
) -> i32 {
    let code = match read_source(code_file) {
        Ok(code) => code,
        Err(exit_code) => return exit_code,
    };

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };
    tracing::debug!(?config, "loaded configuration");

    let generator = match HttpGenerator::new(config.upstream) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let pipeline = AnalysisPipeline::new(Arc::new(generator), config.sampling);

    let result = match pipeline.analyze(&AnalysisRequest { code, input }).await {
        Ok(result) => {
            tracing::info!(
                algorithm_type = %result.algorithm_type,
                steps = result.steps.len(),
                "analysis finished"
            );
            result
        }
        Err(e) => {
            eprintln!("Failed to analyze algorithm: {}", e);
            return 1;
        }
    };

    let json = match serde_json::to_string_pretty(&result) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: failed to serialize result: {}", e);
            return 1;
        }
    };

    match &out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &json) {
                eprintln!("Error: failed to write '{}': {}", path.display(), e);
                return 3;
            }
            eprintln!("wrote {} step(s) to {}", result.steps.len(), path.display());
        }
        None if !play => println!("{}", json),
        None => {}
    }

    if play {
        play_result(result, interval).await;
    }
    0
}

/// Execute the fallback subcommand.
///
/// Returns exit code: 0 = success, 1 = serialization error, 3 = I/O error.
fn run_fallback(code_file: &Path, input: &str) -> i32 {
    let code = match read_source(code_file) {
        Ok(code) => code,
        Err(exit_code) => return exit_code,
    };

    let result = fallback_result(&code, input, None);
    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to serialize result: {}", e);
            1
        }
    }
}

/// Execute the play subcommand.
///
/// Returns exit code: 0 = success, 1 = invalid trace, 3 = I/O error.
async fn run_play(trace: &Path, interval: Duration) -> i32 {
    let text = match read_source(trace) {
        Ok(text) => text,
        Err(exit_code) => return exit_code,
    };

    let result: AnalysisResult = match serde_json::from_str(&text) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: '{}' is not a valid trace: {}", trace.display(), e);
            return 1;
        }
    };

    tracing::debug!(path = %trace.display(), steps = result.steps.len(), "trace loaded");
    play_result(result, interval).await;
    0
}

/// Prints each step as it becomes current until autoplay stops at the last
/// step or Ctrl-C pauses it.
async fn play_result(result: AnalysisResult, interval: Duration) {
    print!("{}", render::render_header(&result));

    let steps = result.steps;
    let Some(first) = steps.first() else {
        println!("(empty trace)");
        return;
    };
    print!("{}", render::render_step(first, 0, steps.len()));

    let controller = PlaybackController::new(interval);
    let mut updates = controller.subscribe();
    controller.load(steps.clone());

    if !controller.play() {
        return;
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut shown = 0;
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                controller.pause();
                eprintln!("paused");
                break;
            }
        }

        // The channel keeps only the latest snapshot; catch up on any
        // frames that advanced between polls.
        let snapshot = *updates.borrow_and_update();
        if snapshot.current_index != shown {
            print!("{}", render::render_advance(&steps, shown, snapshot.current_index));
            shown = snapshot.current_index;
        }
        if !snapshot.is_playing() {
            tracing::debug!(index = shown, "playback stopped");
            break;
        }
    }
}

/// Reads a file, mapping failures to exit code 3.
fn read_source(path: &Path) -> Result<String, i32> {
    std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: failed to read '{}': {}", path.display(), e);
        3
    })
}
