//! musicau CLI binary

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

mod cli;
use cli::{Cli, Commands, CorpusArgs};

use musicau::analysis::{load_melody, AnalysisMethod, CountClosures};
use musicau::config::AnalysisConfig;
use musicau::corpus::{analyse_catalogue_corpus, CorpusAnalysis};
use musicau::phrase::{segment_phrases, PhraseDetector, SegmenterOptions};
use musicau::report::{self, ReportOptions};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::DetectPhrases(cmd) => {
            info!("Detecting phrases like the opening of {}", cmd.reference.display());
            detect_phrases(cmd)
        }
        Commands::CountClosures(cmd) => {
            info!("Counting closures...");
            count_closures(cmd)
        }
        Commands::Phrases(cmd) => print_phrases(cmd),
    }
}

/// Config file (or defaults) with command line overrides applied
fn load_config(args: &CorpusArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(corpus) = &args.corpus {
        config.corpus_path = corpus.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(part) = args.part {
        config.melody_part = part;
    }
    if args.no_specifiers {
        config.output_file_specifiers = false;
    }
    config.catalogues_to_ignore.extend(args.ignore.iter().cloned());
    Ok(config)
}

fn report_options(config: &AnalysisConfig, args: &CorpusArgs, default_name: &str) -> ReportOptions {
    let mut options = ReportOptions::new(
        &config.output_dir,
        args.output.clone().unwrap_or_else(|| default_name.to_string()),
    );
    options.with_specifiers = config.output_file_specifiers;
    options
}

fn summarize<T>(analysis: &CorpusAnalysis<T>) {
    info!(
        "Analysis complete: {} pieces in {} catalogues, {} skipped",
        analysis.results.len(),
        analysis.catalogues.len(),
        analysis.skipped.len()
    );
    for skipped in &analysis.skipped {
        warn!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
}

fn run_corpus<M: AnalysisMethod>(
    config: &AnalysisConfig,
    method: &M,
    args: &CorpusArgs,
    default_name: &str,
) -> Result<(CorpusAnalysis<M::Output>, ReportOptions)> {
    let analysis = analyse_catalogue_corpus(&config.corpus_params(), method)
        .with_context(|| format!("Corpus analysis of {} failed", config.corpus_path.display()))?;
    summarize(&analysis);

    let options = report_options(config, args, default_name);
    if !args.no_report {
        info!("Exporting to file...");
        report::write_catalogue_reports(&analysis, method, &options).context("Failed to write catalogue reports")?;
    }
    Ok((analysis, options))
}

fn detect_phrases(cmd: cli::DetectPhrasesCommand) -> Result<()> {
    let mut config = load_config(&cmd.corpus)?;
    if let Some(value) = cmd.count_diff {
        config.thresholds.count_diff = value;
    }
    if let Some(value) = cmd.histogram {
        config.thresholds.histogram = value;
    }
    if let Some(value) = cmd.sequence {
        config.thresholds.sequence = value;
    }
    if let Some(metric) = cmd.metric {
        config.histogram_metric = metric.into();
    }
    if cmd.fold_octave.is_some() {
        config.fold_to_octave = cmd.fold_octave;
    }
    config.validate()?;

    let detector = PhraseDetector::new(&cmd.reference, config.detector_settings())
        .with_context(|| format!("Failed to compute reference phrase from {}", cmd.reference.display()))?;

    let (analysis, options) = run_corpus(&config, &detector, &cmd.corpus, "PhraseDetection")?;

    let matched = analysis.results.iter().filter(|r| r.output.has_matches()).count();
    info!("{} pieces contain a matching phrase", matched);

    if !cmd.corpus.no_report {
        report::write_phrase_match_summary(&analysis, &options).context("Failed to write match summary")?;
    }
    Ok(())
}

fn count_closures(cmd: cli::CountClosuresCommand) -> Result<()> {
    let config = load_config(&cmd.corpus)?;
    let method = CountClosures::new(config.melody_part);
    run_corpus(&config, &method, &cmd.corpus, "CountClosures")?;
    Ok(())
}

fn print_phrases(cmd: cli::PhrasesCommand) -> Result<()> {
    let notes = load_melody(&cmd.file, cmd.part)?;
    let options = SegmenterOptions {
        max_phrases: None,
        fold_to_octave: cmd.fold_octave,
    };
    let phrases = segment_phrases(&notes, &options)
        .with_context(|| format!("Failed to segment {}", cmd.file.display()))?;

    for phrase in &phrases {
        let values: Vec<String> = phrase.pitches.iter().map(|p| p.value().to_string()).collect();
        let names: Vec<String> = phrase
            .pitches
            .iter()
            .map(|p| p.decode().map(|pitch| pitch.to_string()).unwrap_or_else(|_| "?".to_string()))
            .collect();
        println!("[{}] {}", phrase.label, values.join(" "));
        println!("    {}", names.join(" "));
    }
    Ok(())
}
