//! # CLI Module
//!
//! Argument definitions and the `cmd_*` functions behind each subcommand.
//!
//! Commands write their results to the supplied writer (stdout in the binary).
//! Diagnostics go through `tracing` to stderr.

use clap::{Args, Parser, Subcommand, ValueEnum};
use goldilocks_core::rescue::constants::seed_string;
use goldilocks_core::rescue::{DEFAULT_RATE, DEFAULT_ROUNDS, DEFAULT_SECURITY_LEVEL, DEFAULT_WIDTH};
use goldilocks_core::{
    FieldElement, FieldError, GoldilocksError, PRIME, Rescue, RescueDigest, RescueParams,
    RoundConstants, decode_constants, encode_constants,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] GoldilocksError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation `{0}` needs a second operand")]
    MissingOperand(&'static str),

    #[error("Binary output requires --output")]
    MissingOutput,

    #[error("No hash input given")]
    MissingInput,
}

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Goldilocks field arithmetic and Rescue-XLIX hashing.
#[derive(Debug, Parser)]
#[command(name = "goldilocks")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter such as `info` or `goldilocks=debug`. Falls back to `RUST_LOG`.
    #[arg(long, global = true, env = "GOLDILOCKS_LOG")]
    pub log_level: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate a field operation.
    Field(FieldArgs),
    /// Generate a round-constant table.
    Constants(ConstantsArgs),
    /// Hash elements, a file or a string.
    Hash(HashArgs),
    /// Check an exported binary constants file.
    Verify(VerifyArgs),
}

/// Rescue parameters shared by `constants` and `hash`.
#[derive(Debug, Clone, Args)]
pub struct ParamArgs {
    /// State width.
    #[arg(long, env = "GOLDILOCKS_WIDTH", default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Sponge rate.
    #[arg(long, env = "GOLDILOCKS_RATE", default_value_t = DEFAULT_RATE)]
    pub rate: usize,

    /// Number of rounds.
    #[arg(long, env = "GOLDILOCKS_ROUNDS", default_value_t = DEFAULT_ROUNDS)]
    pub rounds: usize,

    /// Security level in bits.
    #[arg(long, env = "GOLDILOCKS_SECURITY", default_value_t = DEFAULT_SECURITY_LEVEL)]
    pub security_level: usize,
}

impl Default for ParamArgs {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            rate: DEFAULT_RATE,
            rounds: DEFAULT_ROUNDS,
            security_level: DEFAULT_SECURITY_LEVEL,
        }
    }
}

impl ParamArgs {
    /// Validate into [`RescueParams`].
    pub fn params(&self) -> Result<RescueParams, CliError> {
        Ok(RescueParams::new(
            self.width,
            self.rate,
            self.rounds,
            self.security_level,
        )?)
    }
}

/// Field operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldOp {
    Add,
    Sub,
    Mul,
    Div,
    Exp,
    Inv,
    Neg,
    Square,
}

impl FieldOp {
    /// Lowercase operation name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Exp => "exp",
            Self::Inv => "inv",
            Self::Neg => "neg",
            Self::Square => "square",
        }
    }
}

#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Operation to evaluate.
    #[arg(value_enum)]
    pub op: FieldOp,

    /// First operand (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_operand)]
    pub a: u64,

    /// Second operand, or the raw exponent for `exp`.
    #[arg(value_parser = parse_operand)]
    pub b: Option<u64>,
}

/// Output format for `constants`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per round and half.
    #[default]
    Text,
    /// The table as JSON.
    Json,
    /// The checksummed binary file format.
    Binary,
}

#[derive(Debug, Args)]
pub struct ConstantsArgs {
    #[command(flatten)]
    pub params: ParamArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write to a file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Exactly one hash input.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct HashInput {
    /// Comma-separated field elements.
    #[arg(long, value_delimiter = ',', value_parser = parse_operand)]
    pub elements: Option<Vec<u64>>,

    /// File whose bytes are hashed.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// UTF-8 string whose bytes are hashed.
    #[arg(long)]
    pub text: Option<String>,
}

impl HashInput {
    fn into_source(self) -> Option<HashSource> {
        if let Some(values) = self.elements {
            return Some(HashSource::Elements(values));
        }
        if let Some(path) = self.input {
            return Some(HashSource::File(path));
        }
        self.text.map(HashSource::Text)
    }
}

#[derive(Debug, Args)]
pub struct HashArgs {
    #[command(flatten)]
    pub params: ParamArgs,

    #[command(flatten)]
    pub input: HashInput,

    /// Number of digest elements (1..=rate).
    #[arg(long)]
    pub digest_len: Option<usize>,

    /// Print a JSON report instead of hex.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Binary constants file.
    pub path: PathBuf,
}

/// What `hash` consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashSource {
    Elements(Vec<u64>),
    File(PathBuf),
    Text(String),
}

/// Parse a decimal or `0x`-prefixed hex `u64`.
pub fn parse_operand(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid operand `{s}`: {e}"))
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Run a parsed subcommand.
pub fn run<W: Write>(command: Commands, out: &mut W) -> Result<(), CliError> {
    match command {
        Commands::Field(args) => cmd_field(out, args.op, args.a, args.b),
        Commands::Constants(args) => cmd_constants(
            out,
            args.params.params()?,
            args.format,
            args.output.as_deref(),
        ),
        Commands::Hash(args) => {
            let params = args.params.params()?;
            let source = args
                .input
                .into_source()
                .ok_or(CliError::MissingInput)?;
            cmd_hash(out, params, source, args.digest_len, args.json)
        }
        Commands::Verify(args) => cmd_verify(out, &args.path),
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Evaluate `op` on `a` (and `b` for binary operations).
pub fn cmd_field<W: Write>(
    out: &mut W,
    op: FieldOp,
    a: u64,
    b: Option<u64>,
) -> Result<(), CliError> {
    for value in std::iter::once(a).chain(b) {
        if value >= PRIME && op != FieldOp::Exp {
            warn!(value, "operand is not canonical, reducing modulo p");
        }
    }

    let x = FieldElement::new(a);
    let rhs = || {
        b.map(FieldElement::new)
            .ok_or(CliError::MissingOperand(op.name()))
    };

    let result = match op {
        FieldOp::Add => x + rhs()?,
        FieldOp::Sub => x - rhs()?,
        FieldOp::Mul => x * rhs()?,
        FieldOp::Div => x.checked_div(rhs()?)?,
        FieldOp::Exp => x.exp_u64(b.ok_or(CliError::MissingOperand(op.name()))?),
        FieldOp::Inv => x.try_inv()?,
        FieldOp::Neg => -x,
        FieldOp::Square => x.square(),
    };

    debug!(op = op.name(), a, ?b, result = result.value(), "evaluated");
    writeln!(out, "{result}")?;
    Ok(())
}

/// Generate the constants table for `params` and emit it as `format`.
pub fn cmd_constants<W: Write>(
    out: &mut W,
    params: RescueParams,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), CliError> {
    if format == OutputFormat::Binary && output.is_none() {
        return Err(CliError::MissingOutput);
    }

    let table = RoundConstants::generate(&params)?;
    info!(
        width = params.width(),
        rate = params.rate(),
        rounds = params.rounds(),
        security_level = params.security_level(),
        count = table.len(),
        "Generated round constants"
    );

    let bytes = match format {
        OutputFormat::Text => render_text(&table).into_bytes(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&table)?;
            json.push('\n');
            json.into_bytes()
        }
        OutputFormat::Binary => encode_constants(&table)?,
    };

    match output {
        Some(path) => {
            write_file(path, &bytes)?;
            info!(path = %path.display(), bytes = bytes.len(), "Wrote constants");
            writeln!(
                out,
                "Wrote {} constants to {}",
                table.len(),
                path.display()
            )?;
        }
        None => out.write_all(&bytes)?,
    }
    Ok(())
}

#[derive(Serialize)]
struct HashReport<'a> {
    params: &'a RescueParams,
    digest: &'a RescueDigest,
    hex: String,
}

/// Hash `source` with a permutation built from `params`.
pub fn cmd_hash<W: Write>(
    out: &mut W,
    params: RescueParams,
    source: HashSource,
    digest_len: Option<usize>,
    json: bool,
) -> Result<(), CliError> {
    let mut rescue = Rescue::new(params)?;
    if let Some(len) = digest_len {
        rescue = rescue.with_digest_len(len)?;
    }

    let digest = match source {
        HashSource::Elements(values) => {
            if values.iter().any(|&v| v >= PRIME) {
                warn!("non-canonical elements are reduced modulo p");
            }
            let elements: Vec<FieldElement> = values.into_iter().map(FieldElement::new).collect();
            debug!(count = elements.len(), "Hashing elements");
            rescue.hash_elements(&elements)
        }
        HashSource::File(path) => {
            let bytes = read_file(&path)?;
            debug!(path = %path.display(), len = bytes.len(), "Hashing file");
            rescue.hash_bytes(&bytes)
        }
        HashSource::Text(text) => {
            debug!(len = text.len(), "Hashing text");
            rescue.hash_bytes(text.as_bytes())
        }
    };

    if json {
        let report = HashReport {
            params: &params,
            digest: &digest,
            hex: digest.to_string(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out, "{digest}")?;
    }
    Ok(())
}

/// Decode a binary constants file and check it against its own params.
pub fn cmd_verify<W: Write>(out: &mut W, path: &Path) -> Result<(), CliError> {
    let bytes = read_file(path)?;
    let table = decode_constants(&bytes)?;
    table.verify()?;

    let params = table.params();
    info!(path = %path.display(), count = table.len(), "Constants verified");
    writeln!(
        out,
        "OK: width={} rate={} rounds={} security_level={} constants={}",
        params.width(),
        params.rate(),
        params.rounds(),
        params.security_level(),
        table.len()
    )?;
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn render_text(table: &RoundConstants) -> String {
    let params = table.params();
    let mut text = String::new();
    text.push_str("# Rescue-XLIX round constants\n");
    text.push_str(&format!("# seed: {}\n", seed_string(params)));
    text.push_str(&format!(
        "# width={} rate={} rounds={} security_level={}\n",
        params.width(),
        params.rate(),
        params.rounds(),
        params.security_level()
    ));

    for half in 0..2 {
        for round in 0..params.rounds() {
            if let Some(lanes) = table.round(half, round) {
                let values: Vec<String> = lanes.iter().map(ToString::to_string).collect();
                text.push_str(&format!("{half} {round}: {}\n", values.join(" ")));
            }
        }
    }
    text
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, bytes).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// TESTS
// =============================================================================
