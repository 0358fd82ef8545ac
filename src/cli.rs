use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Args, Parser, Subcommand};
use hexcodon::compare::regions::{DEFAULT_MIN_CONSERVATION, DEFAULT_REGION_WINDOW};
use hexcodon::compare::TestKind;
use hexcodon::export::{ChartKind, ExportFormat};
use hexcodon::pattern::entropy::DEFAULT_ENTROPY_WINDOW;
use hexcodon::pattern::motif::{DEFAULT_MAX_MOTIFS, DEFAULT_MIN_OCCURRENCES, DEFAULT_MOTIF_LENGTHS};
use hexcodon::pattern::runs::DEFAULT_MIN_RUN_LENGTH;
use hexcodon::scheme::MappingScheme;
use hexcodon::symbol::NuclearRule;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
☯ hexcodon version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   codons as six-line symbols, and the patterns they make";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    flatten_help = true,
    styles = STYLES
)]
pub struct Cli {
    /// settings file (JSON); flags given here take precedence over it
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<ExportFormat>,

    /// output file, standard output if not given
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// the chart to produce with `--format chart`
    #[arg(long, value_enum, global = true)]
    pub chart: Option<ChartKind>,

    /// write JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    /// leave out the export metadata block
    #[arg(long, global = true)]
    pub no_metadata: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct SequenceArgs {
    /// DNA or RNA sequences
    pub sequences: Vec<String>,

    /// read sequences from a .fasta/.fastq file (may be gzipped)
    #[arg(short, long)]
    pub input: Option<String>,

    /// the nucleotide to line mapping
    #[arg(short, long, value_enum)]
    pub scheme: Option<MappingScheme>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate sequences into symbols, with statistics, amino acids and transitions
    #[command(arg_required_else_help = true)]
    Translate {
        #[command(flatten)]
        seqs: SequenceArgs,
    },

    /// Map a single codon to its symbol
    #[command(arg_required_else_help = true)]
    Codon {
        /// a three-nucleotide codon
        codon: String,

        #[arg(short, long, value_enum)]
        scheme: Option<MappingScheme>,
    },

    /// Describe a symbol: its figure, trigrams, complement and nuclear symbol
    #[command(arg_required_else_help = true)]
    Hexagram {
        /// a symbol in 1..=64
        symbol: u8,

        /// treat the number as a King Wen number instead of a symbol
        #[arg(long)]
        king_wen: bool,

        /// how the nuclear symbol is derived
        #[arg(long, value_enum)]
        rule: Option<NuclearRule>,
    },

    /// Symbol distribution and bias at each codon position, pooled over all sequences
    #[command(arg_required_else_help = true)]
    Positions {
        #[command(flatten)]
        seqs: SequenceArgs,
    },

    /// Count the symbol patterns seen through a sliding window
    #[command(arg_required_else_help = true)]
    Window {
        #[command(flatten)]
        seqs: SequenceArgs,

        /// window length, in symbols
        #[arg(short, long, default_value_t = 3)]
        window: usize,

        /// distance between window starts
        #[arg(long, default_value_t = 1)]
        step: usize,
    },

    /// Find recurring symbol motifs
    #[command(arg_required_else_help = true)]
    Motifs {
        #[command(flatten)]
        seqs: SequenceArgs,

        /// motif lengths to search, comma separated
        #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_MOTIF_LENGTHS)]
        lengths: Vec<usize>,

        /// fewest occurrences for a motif to be kept
        #[arg(long, default_value_t = DEFAULT_MIN_OCCURRENCES)]
        min_occurrences: usize,

        /// most motifs to report
        #[arg(long, default_value_t = DEFAULT_MAX_MOTIFS)]
        max_motifs: usize,
    },

    /// Per-position conservation across several sequences
    #[command(arg_required_else_help = true)]
    Conservation {
        #[command(flatten)]
        seqs: SequenceArgs,
    },

    /// Overall and local Shannon entropy of the symbols
    #[command(arg_required_else_help = true)]
    Entropy {
        #[command(flatten)]
        seqs: SequenceArgs,

        /// local window length, in symbols
        #[arg(short, long, default_value_t = DEFAULT_ENTROPY_WINDOW)]
        window: usize,
    },

    /// Stretches of a single repeated symbol
    #[command(arg_required_else_help = true)]
    Runs {
        #[command(flatten)]
        seqs: SequenceArgs,

        /// shortest run to report
        #[arg(short, long, default_value_t = DEFAULT_MIN_RUN_LENGTH)]
        min_length: usize,
    },

    /// Autocorrelation of the symbol values at a lag
    #[command(arg_required_else_help = true)]
    Correlation {
        #[command(flatten)]
        seqs: SequenceArgs,

        #[arg(short, long, default_value_t = 1)]
        lag: usize,
    },

    /// Compare two sequences position by position and by symbol content
    #[command(arg_required_else_help = true)]
    Compare {
        #[command(flatten)]
        seqs: SequenceArgs,

        /// include the aligned symbols and the differing positions
        #[arg(short, long)]
        alignment: bool,
    },

    /// Translate one sequence under several mapping schemes and compare the results
    #[command(arg_required_else_help = true)]
    Schemes {
        /// a DNA or RNA sequence
        sequences: Vec<String>,

        /// read the sequence from a .fasta/.fastq file
        #[arg(short, long)]
        input: Option<String>,

        /// schemes to compare, comma separated; all four if not given
        #[arg(long, value_enum, value_delimiter = ',')]
        schemes: Vec<MappingScheme>,
    },

    /// Test whether two sequences have different symbol distributions
    #[command(arg_required_else_help = true)]
    Test {
        #[command(flatten)]
        seqs: SequenceArgs,

        #[arg(short, long, value_enum, default_value = "chi_square")]
        test: TestKind,
    },

    /// Compare several sequences against each other
    #[command(arg_required_else_help = true)]
    Multi {
        #[command(flatten)]
        seqs: SequenceArgs,
    },

    /// Find windows where all sequences share the same symbols
    #[command(arg_required_else_help = true)]
    Regions {
        #[command(flatten)]
        seqs: SequenceArgs,

        /// window length, in symbols
        #[arg(short, long, default_value_t = DEFAULT_REGION_WINDOW)]
        window: usize,

        /// smallest conserved fraction for a window to count, within [0, 1]
        #[arg(long, default_value_t = DEFAULT_MIN_CONSERVATION)]
        min_conservation: f64,
    },

    /// Offline interpretation text for a symbol
    #[command(arg_required_else_help = true)]
    Interpret {
        /// a symbol in 1..=64
        symbol: u8,

        /// what the symbol was found in, e.g. a gene name
        #[arg(long)]
        context: Option<String>,
    },
}
