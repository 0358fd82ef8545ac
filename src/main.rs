extern crate env_logger;
#[macro_use]
extern crate log;
use std::{
    fs::File,
    io::{prelude::*, stdout, BufWriter},
    path::Path,
};

use anyhow::{bail, Context, Result};
use clap::Parser;

use hexcodon::config::Settings;
use hexcodon::export::{self, ExportFormat, ExportOptions};
use hexcodon::interpret::{Interpreter, TemplateInterpreter};
use hexcodon::io::{collect_sequences, NamedSequence};
use hexcodon::report::{self, Report};
use hexcodon::{compare, hexagram, pattern, translate};

mod cli;

use cli::{Cli, Commands, SequenceArgs};

/// Creates a `BufWriter` for the given output option. This allows for an output file to be passed
/// or otherwise will default to using standard output.
///
/// If `output` is `Some`, it creates a file at the specified path and returns a `BufWriter` for it.
/// If `output` is `None`, it returns a `BufWriter` for the standard output.
///
/// # Arguments
///
/// * `output` - An `Option` containing the path to the output file as a `String`.
///
/// # Returns
///
/// A `Result` containing a `BufWriter` that implements `Write`.
fn get_writer(output: &Option<String>) -> Result<impl Write> {
    // get output as a BufWriter - equal to stdout if None
    let writer = BufWriter::new(match output {
        Some(ref x) => {
            let file = File::create(Path::new(x))
                .with_context(|| format!("Unable to create output file {x}"))?;
            Box::new(file) as Box<dyn Write + Send>
        }
        None => Box::new(stdout()) as Box<dyn Write + Send>,
    });
    Ok(writer)
}

/// Reads the command's sequences, applying the length ceiling from the settings.
fn sequences(args: &SequenceArgs, settings: &Settings) -> Result<Vec<NamedSequence>> {
    collect_sequences(
        &args.sequences,
        args.input.as_deref(),
        settings.max_sequence_length,
    )
}

/// Reads exactly two sequences for the pairwise commands.
fn sequence_pair(args: &SequenceArgs, settings: &Settings) -> Result<(String, String)> {
    let mut seqs = sequences(args, settings)?;
    if seqs.len() != 2 {
        bail!("Expected exactly two sequences, got {}", seqs.len());
    }
    let second = seqs.pop().map(|s| s.sequence).unwrap_or_default();
    let first = seqs.pop().map(|s| s.sequence).unwrap_or_default();
    Ok((first, second))
}

/// Runs one analysis per sequence.
fn per_sequence<F>(args: &SequenceArgs, settings: &Settings, analyse: F) -> Result<Vec<Report>>
where
    F: Fn(&NamedSequence, hexcodon::scheme::MappingScheme) -> Report,
{
    let scheme = args.scheme.unwrap_or(settings.scheme);
    Ok(sequences(args, settings)?
        .iter()
        .map(|s| analyse(s, scheme))
        .collect())
}

fn run(cli: &Cli, settings: &Settings) -> Result<Vec<Report>> {
    let reports = match &cli.command {
        Commands::Translate { seqs } => per_sequence(seqs, settings, |s, scheme| {
            translate::analyze_sequence(&s.sequence, &s.name, scheme).into()
        })?,
        Commands::Codon { codon, scheme } => {
            vec![report::describe_codon(codon, scheme.unwrap_or(settings.scheme)).into()]
        }
        Commands::Hexagram {
            symbol,
            king_wen,
            rule,
        } => {
            let symbol = if *king_wen {
                hexagram::by_king_wen(*symbol)
                    .map(|h| h.number)
                    .with_context(|| format!("{symbol} is not a King Wen number (1-64)"))?
            } else {
                *symbol
            };
            vec![report::describe_symbol(symbol, rule.unwrap_or(settings.nuclear_rule)).into()]
        }
        Commands::Positions { seqs } => {
            let scheme = seqs.scheme.unwrap_or(settings.scheme);
            let mut symbols = Vec::new();
            let mut positions = Vec::new();
            for s in sequences(seqs, settings)? {
                let translated = translate::translate_sequence(&s.sequence, scheme);
                positions.extend(1..=translated.len());
                symbols.extend(translated);
            }
            vec![pattern::analyze_position_patterns(&symbols, Some(positions.as_slice())).into()]
        }
        Commands::Window { seqs, window, step } => per_sequence(seqs, settings, |s, scheme| {
            let symbols = translate::translate_sequence(&s.sequence, scheme);
            pattern::sliding_window_analysis(&symbols, *window, *step).into()
        })?,
        Commands::Motifs {
            seqs,
            lengths,
            min_occurrences,
            max_motifs,
        } => per_sequence(seqs, settings, |s, scheme| {
            let symbols = translate::translate_sequence(&s.sequence, scheme);
            pattern::discover_motifs(&symbols, lengths, *min_occurrences, *max_motifs).into()
        })?,
        Commands::Conservation { seqs } => {
            let scheme = seqs.scheme.unwrap_or(settings.scheme);
            let seqs = sequences(seqs, settings)?;
            let names: Vec<String> = seqs.iter().map(|s| s.name.clone()).collect();
            let translated: Vec<Vec<u8>> = seqs
                .iter()
                .map(|s| translate::translate_sequence(&s.sequence, scheme))
                .collect();
            vec![pattern::analyze_conservation(&translated, Some(names.as_slice())).into()]
        }
        Commands::Entropy { seqs, window } => per_sequence(seqs, settings, |s, scheme| {
            let symbols = translate::translate_sequence(&s.sequence, scheme);
            pattern::calculate_position_entropy(&symbols, *window).into()
        })?,
        Commands::Runs { seqs, min_length } => per_sequence(seqs, settings, |s, scheme| {
            let symbols = translate::translate_sequence(&s.sequence, scheme);
            pattern::detect_runs(&symbols, *min_length).into()
        })?,
        Commands::Correlation { seqs, lag } => per_sequence(seqs, settings, |s, scheme| {
            let symbols = translate::translate_sequence(&s.sequence, scheme);
            pattern::calculate_correlation(&symbols, *lag).into()
        })?,
        Commands::Compare { seqs, alignment } => {
            let (first, second) = sequence_pair(seqs, settings)?;
            let scheme = seqs.scheme.unwrap_or(settings.scheme);
            vec![compare::compare_sequences(&first, &second, scheme, *alignment).into()]
        }
        Commands::Schemes {
            sequences: args,
            input,
            schemes,
        } => {
            let seqs = collect_sequences(args, input.as_deref(), settings.max_sequence_length)?;
            seqs.iter()
                .map(|s| compare::compare_mapping_schemes(&s.sequence, schemes).into())
                .collect()
        }
        Commands::Test { seqs, test } => {
            let (first, second) = sequence_pair(seqs, settings)?;
            let scheme = seqs.scheme.unwrap_or(settings.scheme);
            vec![compare::statistical_test(&first, &second, *test, scheme).into()]
        }
        Commands::Multi { seqs } => {
            let scheme = seqs.scheme.unwrap_or(settings.scheme);
            let seqs = sequences(seqs, settings)?;
            let names: Vec<String> = seqs.iter().map(|s| s.name.clone()).collect();
            let raw: Vec<&str> = seqs.iter().map(|s| s.sequence.as_str()).collect();
            vec![compare::compare_multiple(&raw, Some(names.as_slice()), scheme).into()]
        }
        Commands::Regions {
            seqs,
            window,
            min_conservation,
        } => {
            let scheme = seqs.scheme.unwrap_or(settings.scheme);
            let seqs = sequences(seqs, settings)?;
            let raw: Vec<&str> = seqs.iter().map(|s| s.sequence.as_str()).collect();
            vec![compare::find_conserved_regions(&raw, *window, *min_conservation, scheme).into()]
        }
        Commands::Interpret { symbol, context } => {
            let interpretation = TemplateInterpreter
                .generate_interpretation(*symbol, context.as_deref())
                .context("Unable to interpret symbol")?;
            vec![interpretation.into()]
        }
    };
    Ok(reports)
}

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    info!("hexcodon v{}", cli::VERSION);

    let settings = Settings::load(cli.config.as_ref())?;
    let format = cli.format.unwrap_or_default();
    let options = ExportOptions {
        pretty: settings.export.pretty && !cli.compact,
        include_metadata: settings.export.include_metadata && !cli.no_metadata,
        chart: cli.chart.or(settings.export.chart),
    };

    let reports = run(&cli, &settings)?;

    let mut writer = get_writer(&cli.output)?;
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        let text = export::export(report, format, &options)
            .with_context(|| format!("Unable to export {} report", report.analysis_type()))?;
        write!(writer, "{text}")?;
        if format != ExportFormat::Csv && format != ExportFormat::Fasta {
            writeln!(writer)?;
        }
    }
    writer.flush()?;

    let failed: Vec<&Report> = reports.iter().filter(|r| r.is_error()).collect();
    if let Some(error) = failed.first().and_then(|r| r.error()) {
        bail!(
            "{} of {} analyses failed, first with: {}",
            failed.len(),
            reports.len(),
            error.error
        );
    }

    info!("Completed successfully.");
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
