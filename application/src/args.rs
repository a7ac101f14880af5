//! [`Args`] definitions.

use clap::Parser;

/// HTTP server of the property listing catalog.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Apply pending database migrations and exit without serving.
    #[arg(long)]
    pub migrate_only: bool,

    /// Store sample users and listings after applying migrations.
    #[arg(long)]
    pub seed: bool,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::Args;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from(["app"]).unwrap();
        assert_eq!(args.config, "config.toml");
        assert!(!args.migrate_only);
        assert!(!args.seed);

        let args = Args::try_parse_from([
            "app",
            "-c",
            "prod.toml",
            "--migrate-only",
            "--seed",
        ])
        .unwrap();
        assert_eq!(args.config, "prod.toml");
        assert!(args.migrate_only);
        assert!(args.seed);
    }
}
