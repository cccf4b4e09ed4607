use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mxmeta::{
    infer_file, sidecar::save_inferred, MatrixFormat, MatrixMetadata, MetaConfig, MetadataFile,
};

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(about = "mxmeta - Inspect, infer and encode matrix metadata sidecars")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "MXMETA_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the metadata held in a .mtd sidecar
    Show {
        /// Sidecar file
        mtd: PathBuf,
    },
    /// Infer metadata from a CSV or IJV data file
    Infer {
        /// Data file
        data: PathBuf,

        /// Data format
        #[arg(long, default_value = "csv")]
        format: MatrixFormat,

        /// First CSV line is a header
        #[arg(long)]
        header: bool,

        /// CSV field delimiter
        #[arg(long)]
        delimiter: Option<char>,

        /// Rows and columns per block
        #[arg(long)]
        block_size: Option<i32>,

        /// Write the result to <data>.mtd
        #[arg(long)]
        write: bool,
    },
    /// Check a sidecar's shape invariants
    Validate {
        /// Sidecar file
        mtd: PathBuf,
    },
    /// Encode a sidecar into the 40-byte binary record
    Encode {
        /// Sidecar file
        mtd: PathBuf,
        /// Output record file
        out: PathBuf,
    },
    /// Decode a binary record and print it
    Decode {
        /// Record file
        record: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> mxmeta::Result<MetaConfig> {
    let config = match path {
        Some(path) => MetaConfig::from_json_file(path)?,
        None => MetaConfig::default(),
    };
    config.with_env_overrides()
}

fn run(cli: Cli) -> mxmeta::Result<()> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Show { mtd } => {
            let meta = MetadataFile::read(&mtd)?.to_metadata();
            println!("{meta}");
        }
        Commands::Infer {
            data,
            format,
            header,
            delimiter,
            block_size,
            write,
        } => {
            if header {
                config.infer.header = true;
            }
            if let Some(delimiter) = delimiter {
                config.infer.delimiter = delimiter;
            }
            if let Some(block_size) = block_size {
                mxmeta::check_block_size(block_size)?;
                config.default_block_size = block_size;
            }

            let meta = infer_file(&data, format, &config)?;
            println!("{meta}");
            if write {
                let path = save_inferred(&data, &meta, &config.infer)?;
                info!(path = %path.display(), "sidecar written");
            }
        }
        Commands::Validate { mtd } => {
            let meta = MetadataFile::read(&mtd)?.to_metadata();
            meta.validate()?;
            println!("{}: ok", mtd.display());
        }
        Commands::Encode { mtd, out } => {
            let meta = MetadataFile::read(&mtd)?.to_metadata();
            std::fs::write(&out, meta.to_record_bytes())?;
            info!(path = %out.display(), "record written");
        }
        Commands::Decode { record } => {
            let bytes = std::fs::read(&record)?;
            let meta = MatrixMetadata::from_record_bytes(&bytes)?;
            println!("{meta}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_infer() {
        let cli = Cli::try_parse_from([
            "mxmeta", "infer", "x.csv", "--format", "IJV", "--block-size", "64", "--write",
        ])
        .unwrap();
        match cli.command {
            Commands::Infer {
                format,
                block_size,
                write,
                header,
                ..
            } => {
                assert_eq!(format, MatrixFormat::Ijv);
                assert_eq!(block_size, Some(64));
                assert!(write);
                assert!(!header);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_reject_unknown_format() {
        assert!(Cli::try_parse_from(["mxmeta", "infer", "x", "--format", "orc"]).is_err());
    }
}
