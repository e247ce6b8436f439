use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use image_visualizer::config::DifferencePlotConfig;
use image_visualizer::difference::DiffMethod;
use image_visualizer::driver::{default_pairs, run_reference_comparisons};
use image_visualizer::logging;

#[derive(Parser, Debug)]
#[command(
    name = "compare_outputs",
    about = "Render difference figures for rendered outputs that have a reference image",
    version
)]
struct Cli {
    /// Directory holding the candidate images and the ref_blank/ references
    #[arg(short = 'r', long = "root", default_value = ".")]
    root: PathBuf,

    /// Where difference figures are written
    #[arg(short = 'o', long = "out-dir", default_value = "output")]
    out_dir: PathBuf,

    /// Also compare bonus.png against ref_blank/bonus.png
    #[arg(long)]
    bonus: bool,

    #[arg(long, value_enum, default_value_t = DiffMethod::Signed)]
    method: DiffMethod,
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let cli = Cli::parse();

    if !cli.root.is_dir() {
        return Err(format!("Not a directory: {}", cli.root.display()).into());
    }

    let config = DifferencePlotConfig::default().with_method(cli.method);
    let written = run_reference_comparisons(
        &cli.root,
        &default_pairs(cli.bonus),
        &config,
        &cli.out_dir,
    )?;

    if written.is_empty() {
        eprintln!("No candidate images found in {}", cli.root.display());
    }
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
