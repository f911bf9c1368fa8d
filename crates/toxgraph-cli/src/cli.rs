use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use toxgraph::core::models::graph::Granularity;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Toxgraph Developers",
    version,
    about = "toxgraph CLI - Interaction graphs, disulfide bridges, graph descriptors and dipole moments for peptide toxin structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Only honoured when built with the `parallel` feature.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the interaction graph and report metrics, motifs, segments and the dipole moment.
    Analyze(AnalyzeArgs),
    /// Compute the electric dipole moment of a structure.
    Dipole(DipoleArgs),
    /// Summarize an atom-level graph per residue.
    Segment(SegmentArgs),
    /// List disulfide bridges between cysteine sulfur atoms.
    Disulfides(DisulfidesArgs),
}

/// Input structure and output destination shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct IoArgs {
    /// Path to the input structure file (PDB format).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the JSON output. Defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Configuration file and ad-hoc overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Residue property overrides (charge, hydrophobicity) in TOML format.
    #[arg(long, value_name = "PATH")]
    pub properties: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S graph.distance-threshold=6.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// PSF topology providing per-atom partial charges for the dipole moment.
    #[arg(long, value_name = "PATH")]
    pub psf: Option<PathBuf>,

    /// Graph granularity: 'atom' or 'residue' (alpha carbons only).
    #[arg(short, long, value_name = "LEVEL")]
    pub granularity: Option<Granularity>,

    /// Override the distance threshold (Å) for distance edges.
    #[arg(short, long, value_name = "FLOAT")]
    pub threshold: Option<f64>,
}

/// Arguments for the `dipole` subcommand.
#[derive(Args, Debug)]
pub struct DipoleArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// PSF topology providing per-atom partial charges.
    /// Without it, residue formal charges are placed on alpha carbons.
    #[arg(long, value_name = "PATH")]
    pub psf: Option<PathBuf>,

    /// Use the center of mass instead of the geometric center.
    #[arg(long)]
    pub mass_weighted: bool,
}

/// Arguments for the `segment` subcommand.
#[derive(Args, Debug)]
pub struct SegmentArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Override the distance threshold (Å) for distance edges.
    #[arg(short, long, value_name = "FLOAT")]
    pub threshold: Option<f64>,
}

/// Arguments for the `disulfides` subcommand.
#[derive(Args, Debug)]
pub struct DisulfidesArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Maximum sulfur-sulfur distance (Å) for a bridge.
    #[arg(long, value_name = "FLOAT")]
    pub max_distance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_arguments_parse() {
        let cli = Cli::try_parse_from([
            "toxgraph",
            "-vv",
            "analyze",
            "-i",
            "toxin.pdb",
            "--granularity",
            "residue",
            "-t",
            "7.5",
            "-S",
            "metrics.top-n=3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.io.input, PathBuf::from("toxin.pdb"));
        assert_eq!(args.granularity, Some(Granularity::Residue));
        assert_eq!(args.threshold, Some(7.5));
        assert_eq!(args.config.set_values, vec!["metrics.top-n=3"]);
        assert!(args.psf.is_none());
    }

    #[test]
    fn unknown_granularity_is_rejected() {
        let result = Cli::try_parse_from([
            "toxgraph", "analyze", "-i", "toxin.pdb", "-g", "molecule",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["toxgraph", "-q", "-v", "disulfides", "-i", "x.pdb"]);
        assert!(result.is_err());
    }
}
