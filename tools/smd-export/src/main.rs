//! smd-export - SMD static model export tool
//!
//! Converts OBJ meshes (directly or through an `smd.toml` manifest) into
//! `.smd` files and inspects existing ones.

use anyhow::Result;
use clap::{Parser, Subcommand};
use smd_common::{SMD_FORMAT, SmdMaterial};
use std::path::PathBuf;

use smd_export::{inspect, manifest, obj, sample};

#[derive(Parser)]
#[command(name = "smd-export")]
#[command(about = "SMD static model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an .smd file from a manifest
    Build {
        /// Path to smd.toml manifest
        #[arg(default_value = "smd.toml")]
        manifest: PathBuf,

        /// Output file (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to smd.toml manifest
        #[arg(default_value = "smd.toml")]
        manifest: PathBuf,
    },

    /// Convert a single OBJ file
    Obj {
        /// Input OBJ file
        input: PathBuf,

        /// Output .smd file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name of the generated material
        #[arg(short, long, default_value = "default")]
        material: String,

        /// Uniform scale applied to positions
        #[arg(short, long, default_value_t = 1.0)]
        scale: f32,
    },

    /// Print a summary of an .smd file
    Info {
        /// Input .smd file
        input: PathBuf,
    },

    /// Print an .smd file as JSON
    Dump {
        /// Input .smd file
        input: PathBuf,
    },

    /// Write the reference sample model
    Sample {
        /// Output .smd file
        #[arg(short, long, default_value = "sample.smd")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { manifest, output } => {
            tracing::info!("Building {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::build(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Obj {
            input,
            output,
            material,
            scale,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(SMD_FORMAT.extension));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            obj::convert_obj(&input, &output, &SmdMaterial::new(material), scale)?;
            tracing::info!("Done!");
        }

        Commands::Info { input } => {
            let file = inspect::load_smd(&input)?;
            print!("{}", inspect::summarize(&file));
        }

        Commands::Dump { input } => {
            let file = inspect::load_smd(&input)?;
            println!("{}", inspect::to_json(&file)?);
        }

        Commands::Sample { output } => {
            sample::write_sample(&output)?;
        }
    }

    Ok(())
}
