use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use animdat_core::{DecodedPackage, Diagnostics, LoadError, Package, package_id_from_path};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use tracing_subscriber::EnvFilter;

const DEFAULT_PREVIEW_ANIMATIONS: usize = 3;
const PREVIEW_FRAMES: usize = 2;
const PREVIEW_LAYERS: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "animdat")]
#[command(version)]
#[command(
    about = "Decoder for sprite animation packages (.dat) into JSON documents.",
    long_about = None,
    after_help = "Examples:\n  animdat decode anims0.dat\n  animdat decode anims7.dat --package 7 -o anims7.json\n  animdat parse assets/anims7.dat --package auto --stdout"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode an animation package and write it as JSON.
    #[command(alias = "parse")]
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path to a .dat animation package (a glob matching one file is accepted)
    input: PathBuf,

    /// Package identifier, or `auto` to read it from an `anims<N>.dat` file name
    #[arg(short, long, default_value = "0")]
    package: PackageArg,

    /// Output path (JSON); defaults to `<input>_parsed.json` next to the input
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write the JSON document to stdout
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Pretty-print JSON output (default)
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output
    #[arg(long)]
    compact: bool,

    /// Number of animations summarised on stderr (0 disables the preview)
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ANIMATIONS)]
    preview: usize,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if bytes remain after the package
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackageArg {
    Auto,
    Id(u32),
}

impl FromStr for PackageArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("auto") {
            return Ok(PackageArg::Auto);
        }
        value
            .parse()
            .map(PackageArg::Id)
            .map_err(|_| format!("expected a package number or 'auto', got '{value}'"))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = match &cli.command {
        Commands::Decode(args) => args.quiet,
    };
    init_tracing(quiet);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

// --quiet keeps stderr for errors only, whatever RUST_LOG says.
fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let input = resolve_input_path(&args.input)?;
    validate_input_file(&input)?;
    let package_id = resolve_package_id(args.package, &input)?;

    let output = if args.stdout {
        None
    } else {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&input));
        ensure_output_differs(&input, &output)?;
        Some(output)
    };

    if !args.quiet {
        eprintln!("Parsing {} (package {})...", input.display(), package_id);
    }
    let decoded = animdat_core::decode_file(&input, package_id)
        .map_err(|err| load_error(&input, package_id, err))?;

    if !args.quiet {
        print_summary(&decoded.diagnostics);
        print_preview(&decoded.package, args.preview);
    }

    if args.strict && !decoded.diagnostics.is_fully_consumed() {
        return Err(CliError::new(
            format!(
                "{} trailing bytes after package (read {} of {})",
                decoded.diagnostics.trailing_bytes(),
                decoded.diagnostics.bytes_consumed,
                decoded.diagnostics.buffer_len
            ),
            Some("check the package id, or drop --strict if the file is padded".to_string()),
        ));
    }

    let json = serialize_package(&decoded, args.pretty, args.compact)?;
    match output {
        None => println!("{}", json),
        Some(output) => {
            write_output(&output, &json)?;
            if !args.quiet {
                eprintln!("OK: package written -> {}", output.display());
            }
        }
    }

    Ok(())
}

fn load_error(input: &Path, package_id: u32, err: LoadError) -> CliError {
    match err {
        LoadError::Io(err) => CliError::new(
            format!("failed to read input file {}: {}", input.display(), err),
            None,
        ),
        LoadError::Decode(err) => CliError::new(
            format!("decode failed for package {}: {}", package_id, err),
            Some(format!(
                "the file ends early at offset {}; it is truncated or the package id is wrong (only package 0 starts with a package count)",
                err.offset()
            )),
        ),
    }
}

fn resolve_package_id(arg: PackageArg, input: &Path) -> Result<u32, CliError> {
    match arg {
        PackageArg::Id(id) => Ok(id),
        PackageArg::Auto => package_id_from_path(input).ok_or_else(|| {
            CliError::new(
                format!("cannot infer package id from '{}'", input.display()),
                Some("name the file anims<N>.dat or pass --package <N>".to_string()),
            )
        }),
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_parsed.json"))
}

fn ensure_output_differs(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent).ok(),
        _ => fs::canonicalize(".").ok(),
    };
    let (Some(output_dir), Some(file_name)) = (output_dir, output.file_name()) else {
        return Ok(());
    };
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn write_output(output: &Path, json: &str) -> Result<(), CliError> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(output, json)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;
    tracing::debug!(output = %output.display(), bytes = json.len(), "wrote package json");
    Ok(())
}

fn serialize_package(
    decoded: &DecodedPackage,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if compact {
        serde_json::to_string(&decoded.package)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string_pretty(&decoded.package)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_summary(diagnostics: &Diagnostics) {
    if let Some(num_packages) = diagnostics.num_packages {
        eprintln!("Num packages: {}", num_packages);
    }
    eprintln!("Num animations: {}", diagnostics.num_animations);
    eprintln!("Max sprite index: {}", diagnostics.max_sprite_index);
    eprintln!(
        "Bytes read: {}, File size: {}",
        diagnostics.bytes_consumed, diagnostics.buffer_len
    );
}

fn print_preview(package: &Package, animations: usize) {
    if animations == 0 || package.animations.is_empty() {
        return;
    }
    eprintln!("--- First {} animations ---", animations);
    for anim in package.animations.iter().take(animations) {
        eprintln!("Animation {}: {} frames", anim.id, anim.frames.len());
        for frame in anim.frames.iter().take(PREVIEW_FRAMES) {
            eprintln!(
                "  Frame {}: delay={}, layers={}",
                frame.id,
                frame.delay,
                frame.layers.len()
            );
            for layer in frame.layers.iter().take(PREVIEW_LAYERS) {
                let r = &layer.rect;
                eprintln!(
                    "    Layer: rect({},{},{},{}) sprite={} offset=({},{}) transform={}",
                    r.x, r.y, r.w, r.h, layer.sprite_index, layer.x_offset, layer.y_offset, layer.transform
                );
            }
        }
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a .dat animation package".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a .dat animation package".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "dat" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .dat file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single package file, or run once per file".to_string()),
        ));
    }

    matches.pop().ok_or_else(|| {
        CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected a .dat file".to_string()),
        )
    })
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
