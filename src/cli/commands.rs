use crate::project::ProjectKey;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Resumable issue-tracker harvester and training-corpus normalizer
#[derive(Parser, Debug)]
#[command(
    name = "issuecorpus",
    about = "Fetch issue-tracker records and normalize them into a training corpus",
    version,
    long_about = "issuecorpus pages through an issue tracker's search API, appends every \
                  issue to a per-project JSONL file and checkpoints its progress so \
                  interrupted runs resume where they stopped. The transform step turns \
                  the stored issues into one flat corpus file."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Fetch issues for one or more projects",
        long_about = "Requests pages of issues (newest first) for each project, appends them \
                      to <data-dir>/<project>_issues.jsonl and saves the next offset to \
                      checkpoint_<PROJECT>.json after every page.\n\n\
                      Examples:\n  \
                      issuecorpus fetch\n  \
                      issuecorpus fetch --projects KAFKA FLINK --max-issues 500"
    )]
    Fetch(FetchArgs),

    #[command(
        about = "Transform stored issues into the training corpus",
        long_about = "Reads every *_issues.jsonl file in the input folder and writes one \
                      normalized record per issue to the output file, replacing its \
                      previous contents.\n\n\
                      Examples:\n  \
                      issuecorpus transform\n  \
                      issuecorpus transform --in-folder data --out corpus.jsonl"
    )]
    Transform(TransformArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct FetchArgs {
    #[arg(
        long,
        num_args = 1..,
        value_name = "KEY",
        default_values_t = default_projects(),
        help = "Project keys to fetch"
    )]
    pub projects: Vec<ProjectKey>,

    #[arg(
        long,
        value_name = "N",
        default_value_t = 100,
        help = "Stop starting new pages once this many issues have been requested per project"
    )]
    pub max_issues: u64,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Summary format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct TransformArgs {
    #[arg(
        long,
        value_name = "DIR",
        help = "Folder containing *_issues.jsonl files (defaults to the data dir)"
    )]
    pub in_folder: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Output JSONL path (defaults to <data dir>/llm_corpus.jsonl)"
    )]
    pub out: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Summary format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn default_projects() -> Vec<ProjectKey> {
    ["HADOOP", "HIVE", "SPARK"]
        .iter()
        .filter_map(|p| ProjectKey::parse(p).ok())
        .collect()
}
