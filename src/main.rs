//! lyricsync Command Line Interface
//!
//! Synchronizes plain lyric text to an audio file and writes an LRC file.

use clap::{Args, Parser, Subcommand};
use log::info;
use lyricsync::config::SegmentationStrategy;
use lyricsync::recognizer::{CommandRecognizer, Recognizer, TranscriptRecognizer};
use lyricsync::{LyricsSync, SyncConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "lyricsync")]
#[command(about = "Word-level lyrics synchronization", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by commands that segment audio
#[derive(Args)]
struct SegmentArgs {
    /// JSON config file; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Window length in seconds
    #[arg(long)]
    window: Option<f64>,

    /// Hop between window starts in seconds
    #[arg(long)]
    hop: Option<f64>,

    /// Segmentation strategy
    #[arg(long, value_enum)]
    segmentation: Option<SegmentationStrategy>,

    /// Sample rate segments are resampled to
    #[arg(short, long)]
    rate: Option<u32>,
}

impl SegmentArgs {
    fn load(&self) -> Result<SyncConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => SyncConfig::from_json_file(path)?,
            None => SyncConfig::default(),
        };
        if let Some(window) = self.window {
            config.window_secs = window;
            // A lone --window keeps windows back to back
            if self.hop.is_none() && config.hop_secs > window {
                config.hop_secs = window;
            }
        }
        if let Some(hop) = self.hop {
            config.hop_secs = hop;
        }
        if let Some(strategy) = self.segmentation {
            config.segmentation = strategy;
        }
        if let Some(rate) = self.rate {
            config.target_sample_rate = rate;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize lyrics to audio and write an LRC file
    Sync {
        /// Input audio file
        #[arg(value_name = "AUDIO")]
        input: PathBuf,

        /// Plain-text lyrics, one line per lyric line
        #[arg(short, long, value_name = "TXT")]
        lyrics: PathBuf,

        /// Word-timestamped transcript JSON of the whole track
        #[arg(long, value_name = "JSON", conflicts_with = "program", required_unless_present = "program")]
        transcript: Option<PathBuf>,

        /// Speech-to-text program run once per segment
        #[arg(long = "command", value_name = "PROG")]
        program: Option<String>,

        /// Argument for --command; `{input}` is replaced by the segment WAV path
        #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true, requires = "program")]
        args: Vec<String>,

        /// Output LRC file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also write the timed word list as JSON
        #[arg(long, value_name = "FILE")]
        words: Option<PathBuf>,

        /// Parallel recognizer calls
        #[arg(long)]
        workers: Option<usize>,

        /// Per-segment recognition timeout in seconds, 0 disables it
        #[arg(long, value_name = "SECS")]
        timeout: Option<f64>,

        #[command(flatten)]
        segmenting: SegmentArgs,
    },

    /// Export the recognition segments as WAV files
    Segment {
        /// Input audio file
        #[arg(value_name = "AUDIO")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        #[command(flatten)]
        segmenting: SegmentArgs,
    },

    /// Print the lyric tokens the aligner works with
    Tokenize {
        /// Plain-text lyrics
        #[arg(value_name = "TXT")]
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    info!("lyricsync {}", lyricsync::VERSION);

    match cli.command {
        Commands::Sync {
            input,
            lyrics,
            transcript,
            program,
            args,
            output,
            words,
            workers,
            timeout,
            segmenting,
        } => {
            let mut config = segmenting.load()?;
            if let Some(workers) = workers {
                config.workers = workers;
            }
            if let Some(timeout) = timeout {
                config.recognition_timeout_secs = (timeout > 0.0).then_some(timeout);
            }

            let recognizer: Arc<dyn Recognizer> = match (transcript, program) {
                (Some(path), _) => Arc::new(TranscriptRecognizer::from_file(path)?),
                (None, Some(program)) => Arc::new(CommandRecognizer::new(program, args)),
                (None, None) => return Err("either --transcript or --command is required".into()),
            };

            let lyric_text = fs::read_to_string(&lyrics)?;
            let audio = lyricsync::decoder::decode_file(&input)?;
            let result = LyricsSync::new(recognizer, config)?.synchronize(&audio, &lyric_text)?;

            info!(
                "{:?}: {} exact, {} near, {} substituted, {} interpolated, {} rejected",
                result.quality,
                result.stats.exact,
                result.stats.near,
                result.stats.substituted,
                result.stats.interpolated,
                result.stats.rejected
            );

            match output {
                Some(path) => {
                    fs::write(&path, &result.lyrics_file)?;
                    info!("Wrote {}", path.display());
                }
                None => println!("{}", result.lyrics_file),
            }
            if let Some(path) = words {
                fs::write(&path, lyricsync::format::words_to_json(&result.words)?)?;
                info!("Wrote {}", path.display());
            }
        }
        Commands::Segment {
            input,
            output,
            segmenting,
        } => {
            let config = segmenting.load()?;
            config.validate()?;
            export_segments(&input, &output, &config)?;
        }
        Commands::Tokenize { input } => {
            let reference = lyricsync::lyrics::tokenize(&fs::read_to_string(&input)?);
            for token in &reference.tokens {
                println!(
                    "{}:{}\t{}\t{}",
                    token.line_index, token.position_in_line, token.text, token.normalized_text
                );
            }
            info!(
                "{} tokens on {} lines",
                reference.tokens.len(),
                reference.line_count
            );
        }
    }

    Ok(())
}

fn export_segments(
    input: &Path,
    output: &Path,
    config: &SyncConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let audio = lyricsync::decoder::decode_file(input)?;
    let prepared = lyricsync::filter::prepare_for_recognition(&audio, config.target_sample_rate)?;
    let segmenter = lyricsync::processor::from_config(config)?;

    fs::create_dir_all(output)?;
    let segments = segmenter.segment(&prepared)?;
    for segment in &segments {
        let path = output.join(format!(
            "segment_{:03}_{:.2}s.wav",
            segment.index, segment.global_offset
        ));
        lyricsync::encoder::write_wav(&path, &segment.signal)?;
        println!(
            "{}\t{:.2}\t{:.2}",
            path.display(),
            segment.global_offset,
            segment.global_end()
        );
    }
    info!("Exported {} segments to {}", segments.len(), output.display());
    Ok(())
}
