use anyhow::Result;
use bb_cli::{config_yaml, load_config, run_analysis, schema_json, AnalyzeOptions, RunMetadata};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bb")]
#[command(about = "Basketball frame analytics from detection files", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis over a detection file
    Analyze {
        /// Input detections JSON
        #[arg(long)]
        r#in: PathBuf,

        /// Output analysis JSON
        #[arg(long)]
        out: PathBuf,

        /// Config file (.yaml/.yml/.json); defaults to BB_ANALYTICS_PROFILE
        #[arg(long)]
        config: Option<PathBuf>,

        /// Frame rate override
        #[arg(long)]
        fps: Option<f64>,

        /// Drop ball outliers and fill short gaps before analysis
        #[arg(long)]
        clean_ball: bool,

        /// Write only the box score
        #[arg(long)]
        summary_only: bool,
    },

    /// Print the JSON schema of the detection input
    Schema,

    /// Print a configuration preset as YAML
    Config {
        /// default, strict or lenient
        #[arg(long, default_value = "default")]
        profile: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Analyze { r#in, out, config, fps, clean_ball, summary_only } => {
            println!("🏀 Analyzing detections...");
            println!("   Input:  {}", r#in.display());
            println!("   Output: {}", out.display());

            let config = load_config(config.as_deref())?;
            let options = AnalyzeOptions { fps, clean_ball, summary_only };
            let metadata = run_analysis(&r#in, &out, config, &options)?;

            println!("✅ Analysis written");
            print_metadata(&metadata);
        }
        Commands::Schema => {
            println!("{}", schema_json()?);
        }
        Commands::Config { profile } => {
            print!("{}", config_yaml(&profile)?);
        }
    }

    Ok(())
}

fn print_metadata(metadata: &RunMetadata) {
    println!("\n📊 Run Summary:");
    println!("   Schema version: {}", metadata.schema_version);
    println!("   Created:        {}", metadata.created_at);
    println!("   Frames:         {} @ {:.2} fps", metadata.num_frames, metadata.frame_rate);
    println!("   Possession changes: {}", metadata.possession_changes);
    println!("   Shots:          {}", metadata.shots);
    if let Some((player, points)) = metadata.top_scorer {
        println!("   Top scorer:     #{} ({} pts)", player, points);
    }
    if metadata.skipped_calibration_frames > 0 {
        println!("   ⚠️  Frames without calibration: {}", metadata.skipped_calibration_frames);
    }
    println!("   Input size:     {} bytes", metadata.input_size);
    println!("   Output size:    {} bytes", metadata.output_size);
}
