use std::path::{Path, PathBuf};

use clap::Parser;

use vnr2yagt::convert::convert_dictionary;
use vnr2yagt::progress::ConsoleProgress;

#[derive(Parser, Debug)]
#[command(name = "vnr2yagt", version)]
#[command(about = "Convert a VNR shared dictionary (XML) to the YAGT dictionary format (JSON)", long_about = None)]
struct Args {
    /// VNR shared dictionary export (.xml)
    #[arg(short, long, value_name = "XML")]
    source: PathBuf,

    /// Converted dictionary path (.json)
    #[arg(short, long, value_name = "JSON", default_value = "shareddict.json")]
    output: PathBuf,

    /// Suppress progress output on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !has_extension(&args.source, "xml") {
        anyhow::bail!("source path must end in .xml: {}", args.source.display());
    }
    if !has_extension(&args.output, "json") {
        anyhow::bail!("output path must end in .json: {}", args.output.display());
    }

    let progress = ConsoleProgress::new(!args.quiet);
    convert_dictionary(&args.source, &args.output, &progress)?;
    Ok(())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
