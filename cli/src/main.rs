mod config;
mod diagnostics;
mod extract;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::term::termcolor::ColorChoice;
use tracing_subscriber::EnvFilter;

use config::{FileConfig, Overrides};
use docex::Document;
use harness::CheckConfig;

const SUBCOMMANDS: &[&str] = &["check", "list", "extract", "help"];

#[derive(Parser)]
#[command(
    name = "docex",
    version,
    about = "Run the Go examples embedded in a markdown document"
)]
struct Cli {
    /// Disable colored diagnostic output
    #[arg(long, global = true)]
    no_color: bool,

    /// Show debug logging on stderr
    #[arg(short = 'D', long, global = true)]
    debug: bool,

    /// TOML file supplying settings not given on the command line or environment
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every example and exit with the aggregate status
    Check(CheckArgs),

    /// List the runnable examples and where they start
    List(SourceArgs),

    /// Write each runnable example to its own file
    Extract(ExtractArgs),
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Markdown documents to scan for runnable examples [default: README.md]
    #[arg(env = "EXAMPLE_SOURCE_MD", value_name = "SOURCE")]
    sources: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct CheckArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Expected number of runnable examples [default: 4]
    #[arg(short, long, env = "EXAMPLE_SOURCE_COUNT")]
    count: Option<usize>,

    /// Go executable used to run examples [default: go]
    #[arg(long = "go", env = "EXAMPLE_GO", value_name = "PROGRAM")]
    toolchain: Option<PathBuf>,

    /// Kill an example after this many seconds (0 = no limit)
    #[arg(short, long, env = "EXAMPLE_TIMEOUT", value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Keep each example's temporary source file after it runs
    #[arg(long, env = "EXAMPLE_PRESERVE_TMPFILES")]
    preserve_tmpfiles: bool,
}

#[derive(clap::Args)]
struct ExtractArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Directory the example files are written to
    #[arg(short, long, default_value_os_t = std::env::temp_dir())]
    output_dir: PathBuf,
}

/// `docex`, `docex README.md` and `docex --count 3` all mean `docex check ...`.
///
/// Only the first positional argument can name a subcommand. Without one,
/// a help or version flag is left for the top-level parser.
fn with_default_subcommand(mut args: Vec<String>) -> Vec<String> {
    let mut first_positional = None;
    let mut wants_top_level = false;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--" => break,
            "--config" => {
                rest.next();
            }
            "-h" | "--help" | "-V" | "--version" => wants_top_level = true,
            flag if flag.starts_with('-') => {}
            positional => {
                first_positional = Some(positional);
                break;
            }
        }
    }

    let explicit = match first_positional {
        Some(name) => SUBCOMMANDS.contains(&name),
        None => wants_top_level,
    };
    if !explicit && !args.is_empty() {
        args.insert(1, "check".to_string());
    }
    args
}

fn main() {
    let args = with_default_subcommand(std::env::args().collect());
    let cli = Cli::parse_from(&args);
    init_logging(cli.debug);

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let file_config = match FileConfig::load_optional(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let exit_code = match cli.command {
        Command::Check(check_args) => do_check(check_args, file_config, color_choice),
        Command::List(source_args) => do_list(source_args, file_config),
        Command::Extract(extract_args) => do_extract(extract_args, file_config),
    };
    process::exit(exit_code);
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn check_config(args: CheckArgs, file_config: FileConfig) -> CheckConfig {
    let overrides = Overrides {
        sources: args.source.sources,
        count: args.count,
        toolchain: args.toolchain,
        timeout_secs: args.timeout,
        preserve_tmpfiles: args.preserve_tmpfiles.then_some(true),
    };
    config::resolve(overrides, file_config)
}

fn do_check(args: CheckArgs, file_config: FileConfig, color_choice: ColorChoice) -> i32 {
    let config = check_config(args, file_config);
    tracing::debug!(?config, "resolved configuration");

    let result = harness::check(&config, &mut io::stdout().lock(), &mut io::stderr().lock());
    let _ = io::stdout().flush();

    match result {
        Ok(summary) => {
            diagnostics::emit_failures(&summary, color_choice);
            summary.status
        }
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    }
}

/// Read the documents named on the command line or in the config file.
fn read_documents(source: SourceArgs, file_config: FileConfig) -> Result<Vec<Document>, i32> {
    let paths = config::resolve(
        Overrides {
            sources: source.sources,
            ..Overrides::default()
        },
        file_config,
    )
    .sources;

    paths
        .iter()
        .map(|path| {
            Document::read(path).map_err(|e| {
                eprintln!("error: cannot read '{}': {}", path.display(), e);
                1
            })
        })
        .collect()
}

fn do_list(source: SourceArgs, file_config: FileConfig) -> i32 {
    let documents = match read_documents(source, file_config) {
        Ok(d) => d,
        Err(code) => return code,
    };

    let mut out = io::stdout().lock();
    for document in &documents {
        match extract::list_examples(document, &mut out) {
            Ok(0) => eprintln!("no runnable examples found in {}", document.name),
            Ok(_) => {}
            Err(e) => {
                eprintln!("error: {}", e);
                return 1;
            }
        }
    }
    0
}

fn do_extract(args: ExtractArgs, file_config: FileConfig) -> i32 {
    let documents = match read_documents(args.source, file_config) {
        Ok(d) => d,
        Err(code) => return code,
    };

    for document in &documents {
        match extract::extract_examples(document, &args.output_dir) {
            Ok(written) => {
                for path in &written {
                    println!("{}", path.display());
                }
            }
            Err(e) => {
                eprintln!("error: {}", e);
                return 1;
            }
        }
    }
    0
}
