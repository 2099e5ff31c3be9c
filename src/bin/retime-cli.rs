use std::{io, path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use retime::{
    FfmpegLogLevel, ProgressCallback, SourceInfo, SpeedFactor, SpeedTransform, estimate,
    reveal_containing_folder, set_ffmpeg_log_level,
};

const CLI_AFTER_HELP: &str = "Examples:\n  retime-cli probe input.mp4 --json\n  retime-cli convert input.mp4 --speed 2.0 --progress\n  retime-cli convert input.mp4 --speed 0.5 --out slow.mp4\n  retime-cli completions zsh > _retime-cli";

#[derive(Debug, Parser)]
#[command(
    name = "retime",
    version,
    about = "Change video playback speed by frame decimation",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Show additional logging output.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print metadata for a video file (alias: info).
    #[command(
        about = "Print source video metadata",
        visible_alias = "info",
        after_help = "Examples:\n  retime-cli probe input.mp4\n  retime-cli probe input.mp4 --json"
    )]
    Probe {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Convert a video to a new playback speed.
    #[command(
        about = "Write a speed-changed copy of a video",
        after_help = "Examples:\n  retime-cli convert input.mp4 --speed 2.0 --progress\n  retime-cli convert input.mp4 --speed 0.25 --out quarter.mp4 --reveal"
    )]
    Convert {
        /// Input video path.
        input: PathBuf,

        /// Speed multiplier (> 0; >= 1 drops frames, < 1 lowers the rate).
        #[arg(long, default_value_t = 2.0)]
        speed: f64,

        /// Destination path. Defaults to `<stem>_x<speed>.mp4` beside the
        /// input.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Show a progress bar.
        #[arg(long)]
        progress: bool,

        /// Allow overwriting an existing destination file.
        #[arg(long)]
        overwrite: bool,

        /// Open the destination's folder in the file manager when done.
        #[arg(long)]
        reveal: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

struct BarProgress(ProgressBar);

impl ProgressCallback for BarProgress {
    fn on_progress(&self, percent: u8) {
        self.0.set_position(u64::from(percent));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .init();
    set_ffmpeg_log_level(FfmpegLogLevel::Error);

    match cli.command {
        Commands::Probe { input, json } => {
            let source = SourceInfo::probe(&input)?;
            let duration = estimate::duration_label(source.total_frames, source.frame_rate);
            let size_mb = estimate::duration_seconds(source.total_frames, source.frame_rate)
                .map(|seconds| {
                    estimate::estimated_size_mb(seconds, estimate::ADVISORY_BITRATE_MBPS)
                });

            if json {
                let value = json!({
                    "path": source.path,
                    "width": source.width,
                    "height": source.height,
                    "frame_rate": source.frame_rate,
                    "total_frames": source.total_frames,
                    "duration": duration,
                    "codec": source.codec,
                    "format": source.format,
                    "estimated_size_mb": size_mb,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", source.path.display().to_string().bold());
                println!("  Resolution:  {}x{}", source.width, source.height);
                println!("  Frame rate:  {:.2} fps", source.frame_rate);
                println!("  Frames:      ~{}", source.total_frames);
                println!("  Duration:    {duration}");
                println!("  Codec:       {}", source.codec);
                println!("  Container:   {}", source.format);
                if let Some(size_mb) = size_mb {
                    println!("  Est. size:   ~{size_mb} MB (estimate only)");
                }
            }
        }

        Commands::Convert {
            input,
            speed,
            out,
            progress,
            overwrite,
            reveal,
        } => {
            // Validated before any file is touched.
            let factor = SpeedFactor::new(speed)?;

            let source = SourceInfo::probe(&input)?;
            let destination = out.unwrap_or_else(|| source.default_output_path(factor));

            if destination.exists() && !overwrite {
                return Err(format!(
                    "output file already exists: {} (use --overwrite)",
                    destination.display()
                )
                .into());
            }

            println!(
                "Converting {} at {} -> {} (~{} of ~{} frames)",
                input.display().to_string().bold(),
                factor.to_string().cyan(),
                destination.display(),
                factor.retained_frames(source.total_frames),
                source.total_frames,
            );

            let mut transform = SpeedTransform::new(factor);
            let progress_bar = if progress {
                let bar = ProgressBar::new(100);
                let style = ProgressStyle::with_template(
                    "{spinner:.green} {bar:40.cyan/blue} {pos}% {msg}",
                )?;
                bar.set_style(style.progress_chars("##-"));
                transform = transform.with_progress(Arc::new(BarProgress(bar.clone())));
                Some(bar)
            } else {
                None
            };

            let report = transform.run(&source.path, &destination)?;

            if let Some(bar) = progress_bar {
                bar.finish_and_clear();
            }

            println!(
                "{} wrote {} frames at {:.2} fps to {}",
                "Done:".green().bold(),
                report.frames_written,
                report.output_rate,
                destination.display(),
            );

            if reveal {
                reveal_containing_folder(&destination);
            }
        }

        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
