use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gas-dedupe", version)]
#[command(about = "Find duplicate Apps Script files and pick the best version of each")]
pub(crate) struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub(crate) verbose: u8,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Report exact, similar, name-colliding and functionally duplicated scripts
    DetectDuplicates(ScanArgs),
    /// Rank each name-collision group and write a reviewable merge script
    MergeVersions(ScanArgs),
}

impl Command {
    pub(crate) fn scan_args(&self) -> &ScanArgs {
        match self {
            Command::DetectDuplicates(args) | Command::MergeVersions(args) => args,
        }
    }

    pub(crate) fn writes_merge_script(&self) -> bool {
        matches!(self, Command::MergeVersions(_))
    }
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct ScanArgs {
    /// Directories to scan; the first one holds the canonical tree
    #[arg(value_name = "ROOT")]
    pub(crate) roots: Vec<PathBuf>,

    /// Where reports are written (default: the first root)
    #[arg(long, value_name = "DIR")]
    pub(crate) output_dir: Option<PathBuf>,

    /// TOML config file (default: .gas-dedupe.toml in the first root, if present)
    #[arg(long, value_name = "FILE", env = "GAS_DEDUPE_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Scan shell scripts instead of Apps Script files
    #[arg(long)]
    pub(crate) shell: bool,

    /// Minimum similarity ratio for the similar-scripts section, in (0, 1]
    #[arg(long, value_name = "F", value_parser = parse_threshold)]
    pub(crate) similarity_threshold: Option<f64>,

    /// Skip the pairwise similarity pass above this many files
    #[arg(long, value_name = "N")]
    pub(crate) max_similarity_files: Option<usize>,

    /// Skip files larger than N bytes
    #[arg(long, value_name = "N")]
    pub(crate) max_file_size: Option<u64>,

    /// Stop after scanning N files
    #[arg(long, value_name = "N")]
    pub(crate) max_files: Option<usize>,

    /// Add an ignored directory name (repeatable)
    #[arg(long = "ignore-dir", value_name = "NAME")]
    pub(crate) ignore_dirs: Vec<String>,

    /// Do not respect .gitignore rules
    #[arg(long)]
    pub(crate) no_gitignore: bool,

    /// Canonical directory, relative to the first root
    #[arg(long, value_name = "DIR")]
    pub(crate) canonical_dir: Option<PathBuf>,

    /// Also print the JSON report to stdout
    #[arg(long)]
    pub(crate) json: bool,

    /// Print scan stats to stderr
    #[arg(long)]
    pub(crate) stats: bool,

    /// Exit non-zero when the scan was incomplete (permission, walk or budget skips)
    #[arg(long)]
    pub(crate) strict: bool,
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err("must be greater than 0 and at most 1".to_string());
    }
    Ok(value)
}
