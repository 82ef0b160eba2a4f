use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "dermascan",
    about = "Two-stage skin-lesion classification cascade",
    version
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify a single image file
    Classify(ClassifyArgs),
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Check whether model weights are cached locally
    Health,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Path to the image to classify
    pub image: PathBuf,

    /// Print the full prediction response as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Bind address (overrides DERMASCAN_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides DERMASCAN_PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classify() {
        let args = CliArgs::parse_from(["dermascan", "classify", "lesion.jpg", "--json"]);
        match args.command {
            Commands::Classify(c) => {
                assert_eq!(c.image, PathBuf::from("lesion.jpg"));
                assert!(c.json);
            }
            _ => panic!("expected classify"),
        }
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let args = CliArgs::parse_from(["dermascan", "serve", "--port", "9000"]);
        match args.command {
            Commands::Serve(s) => {
                assert_eq!(s.port, Some(9000));
                assert_eq!(s.host, None);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["dermascan", "-v", "health"]);
        assert!(args.verbose);
        assert!(matches!(args.command, Commands::Health));
    }
}
