use clap::{Args, Parser, Subcommand};
use jsonize::{
    ExecutorImpl, InferOptions, JsonizeError, Namespaces, TransformationRegistry,
    convert_files_batch, document_namespaces, infer_map_file, load_map_file, merge_namespaces,
    write_json,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Converts XML documents to JSON with a jsonize map.
#[derive(Parser, Debug)]
#[command(name = "jsonize", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert XML files with a map.
    Convert(ConvertArgs),
    /// Derive a map from a sample XML file.
    Infer(InferArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// The jsonize map (a JSON array of rules).
    #[arg(short, long)]
    map: PathBuf,

    /// Output file for one input, output directory for several.
    #[arg(short, long)]
    output: PathBuf,

    /// Namespace binding for source paths. Prefixes declared in the first
    /// input document are bound too unless given here.
    #[arg(long = "ns", value_name = "PREFIX=URI", value_parser = parse_binding)]
    namespaces: Vec<(String, String)>,

    /// Write whatever the successful rules produced instead of failing.
    #[arg(long)]
    best_effort: bool,

    #[arg(long)]
    pretty: bool,

    /// Conversions to run at once. 0 uses every core.
    #[arg(short, long, default_value_t = 0)]
    jobs: usize,

    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct InferArgs {
    /// Where to write the inferred map.
    #[arg(short, long)]
    output: PathBuf,

    /// Key that receives element text.
    #[arg(long, default_value = "value")]
    value_tag: String,

    /// Prefix for keys that come from attributes.
    #[arg(long, default_value = "")]
    attribute_tag: String,

    /// Drop namespace prefixes from JSON keys.
    #[arg(long)]
    no_namespaces: bool,

    #[arg(long = "ns", value_name = "PREFIX=URI", value_parser = parse_binding)]
    namespaces: Vec<(String, String)>,

    input: PathBuf,
}

fn parse_binding(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((prefix, uri)) if !uri.is_empty() => Ok((prefix.to_string(), uri.to_string())),
        _ => Err(format!("expected PREFIX=URI, got '{}'", text)),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Convert(args) => run_convert(args),
        Command::Infer(args) => run_infer(args),
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Where the JSON for `input` goes.
fn output_for(input: &Path, output: &Path, several: bool) -> PathBuf {
    if several {
        let stem = input.file_stem().unwrap_or(input.as_os_str());
        output.join(format!("{}.json", stem.to_string_lossy()))
    } else {
        output.to_path_buf()
    }
}

/// Returns `Ok(false)` when at least one document failed.
fn run_convert(args: ConvertArgs) -> Result<bool, JsonizeError> {
    let explicit: Namespaces = args.namespaces.into_iter().collect();
    let namespaces = match args.inputs.first() {
        Some(first) => merge_namespaces(explicit, &document_namespaces(first)?),
        None => explicit,
    };
    let map = load_map_file(&args.map, &TransformationRegistry::default(), namespaces)?;

    let several = args.inputs.len() > 1;
    if several {
        fs::create_dir_all(&args.output)?;
    }

    let executor = ExecutorImpl::with_jobs(args.jobs);
    let results = convert_files_batch(&executor, Arc::new(map), args.inputs.clone());

    let mut all_ok = true;
    for (input, result) in args.inputs.iter().zip(results) {
        let target = output_for(input, &args.output, several);
        let value = match result {
            Ok(value) => value,
            Err(JsonizeError::Conversion(err)) if args.best_effort => {
                for failure in &err.failures {
                    log::warn!("{}: {}", input.display(), failure);
                }
                err.partial
            }
            Err(e) => {
                eprintln!("{}: {}", input.display(), e);
                all_ok = false;
                continue;
            }
        };
        write_json(&target, &value, args.pretty)?;
        log::info!("Wrote {}", target.display());
    }
    Ok(all_ok)
}

fn run_infer(args: InferArgs) -> Result<bool, JsonizeError> {
    let options = InferOptions {
        value_tag: args.value_tag,
        attribute_tag: args.attribute_tag,
        with_namespaces: !args.no_namespaces,
        namespaces: args.namespaces.into_iter().collect(),
    };
    let specs = infer_map_file(&args.input, &options)?;
    let map = serde_json::to_value(&specs)?;
    write_json(&args.output, &map, true)?;
    log::info!("Wrote map with {} rule(s) to {}", specs.len(), args.output.display());
    Ok(true)
}
