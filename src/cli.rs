//! Command line interface for musicau

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use musicau::phrase::HistogramMetric;

/// Corpus-based musicological analysis of MusicXML scores
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find phrases resembling the opening phrase of a reference piece
    DetectPhrases(DetectPhrasesCommand),

    /// Count fermatas in every piece of the corpus
    CountClosures(CountClosuresCommand),

    /// Print the normalized phrases of a single score
    Phrases(PhrasesCommand),
}

/// Options shared by every corpus run
#[derive(Args, Debug)]
pub struct CorpusArgs {
    /// Directory containing the catalogues
    #[arg(short, long)]
    pub corpus: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report file name prefix
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory the reports are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Catalogue ID to skip (repeatable)
    #[arg(long = "ignore", value_name = "CATALOGUE")]
    pub ignore: Vec<String>,

    /// Leave out the file specifiers column
    #[arg(long)]
    pub no_specifiers: bool,

    /// Part index holding the melody
    #[arg(long)]
    pub part: Option<usize>,

    /// Analyse without writing reports
    #[arg(long)]
    pub no_report: bool,
}

#[derive(Args, Debug)]
pub struct DetectPhrasesCommand {
    /// Score whose first phrase is searched for
    #[arg(short, long)]
    pub reference: PathBuf,

    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Maximum count difference ratio
    #[arg(long)]
    pub count_diff: Option<f64>,

    /// Minimum pitch histogram similarity
    #[arg(long)]
    pub histogram: Option<f64>,

    /// Minimum sequence equality
    #[arg(long)]
    pub sequence: Option<f64>,

    /// Histogram comparison
    #[arg(long)]
    pub metric: Option<MetricArg>,

    /// Encode every pitch at this octave
    #[arg(long)]
    pub fold_octave: Option<i32>,
}

#[derive(Args, Debug)]
pub struct CountClosuresCommand {
    #[command(flatten)]
    pub corpus: CorpusArgs,
}

#[derive(Args, Debug)]
pub struct PhrasesCommand {
    /// MusicXML file
    pub file: PathBuf,

    /// Part index holding the melody
    #[arg(long, default_value_t = 0)]
    pub part: usize,

    /// Encode every pitch at this octave
    #[arg(long)]
    pub fold_octave: Option<i32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MetricArg {
    Bhattacharyya,
    Hellinger,
}

impl From<MetricArg> for HistogramMetric {
    fn from(metric: MetricArg) -> Self {
        match metric {
            MetricArg::Bhattacharyya => HistogramMetric::Bhattacharyya,
            MetricArg::Hellinger => HistogramMetric::Hellinger,
        }
    }
}
