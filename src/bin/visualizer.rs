use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use image_visualizer::config::{
    DifferencePlotConfig, DistributionPlotConfig, HistogramPlotConfig, QUAD_LABELS,
};
use image_visualizer::difference::{DiffMethod, analyze_image_differences};
use image_visualizer::image_data::{FloatImage, load_image};
use image_visualizer::logging;
use image_visualizer::render::{
    analyze_distribution, plot_2d_distributions, plot_channel_distributions, plot_image_difference,
    plot_rgb_histogram, plot_rgb_histograms_pair, plot_rgb_histograms_quad,
};

#[derive(Parser, Debug)]
#[command(
    name = "visualizer",
    about = "Render RGB histograms, difference figures, and channel distributions for images",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Smoothed RGB histogram of one image
    Histogram {
        image: PathBuf,
        #[command(flatten)]
        figure: FigureArgs,
    },
    /// Histograms of two images side by side
    Compare {
        first: PathBuf,
        second: PathBuf,
        #[command(flatten)]
        figure: FigureArgs,
    },
    /// Four images above their histograms
    CompareFour {
        #[arg(num_args = 4, required = true)]
        images: Vec<PathBuf>,
        /// Captions in image order
        #[arg(long, num_args = 4, default_values = QUAD_LABELS)]
        labels: Vec<String>,
        #[command(flatten)]
        figure: FigureArgs,
    },
    /// Both images, their difference heatmap, and the difference histogram
    Diff {
        first: PathBuf,
        second: PathBuf,
        #[arg(long, value_enum, default_value_t = DiffMethod::Signed)]
        method: DiffMethod,
        #[command(flatten)]
        figure: FigureArgs,
    },
    /// Print per-channel statistics of the difference of two images
    Stats {
        first: PathBuf,
        second: PathBuf,
        #[arg(long, value_enum, default_value_t = DiffMethod::Signed)]
        method: DiffMethod,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Per-channel density histograms plus mean/std/min/max
    Distribution {
        image: PathBuf,
        #[command(flatten)]
        figure: FigureArgs,
    },
    /// Pairwise channel scatter plots (R-G, R-B, G-B)
    Scatter {
        image: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output PNG path
    #[arg(short = 'o', long = "out")]
    out: PathBuf,

    /// Figure width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Figure height in pixels
    #[arg(long)]
    height: Option<u32>,
}

impl OutputArgs {
    fn resize(&self, size: &mut (u32, u32)) {
        if let Some(w) = self.width {
            size.0 = w;
        }
        if let Some(h) = self.height {
            size.1 = h;
        }
    }
}

#[derive(Args, Debug)]
struct FigureArgs {
    #[command(flatten)]
    output: OutputArgs,

    /// Histogram bin count (defaults per figure)
    #[arg(long)]
    bins: Option<usize>,
}

impl FigureArgs {
    fn apply(&self, bins: &mut usize, size: &mut (u32, u32)) {
        if let Some(b) = self.bins {
            *bins = b;
        }
        self.output.resize(size);
    }

    fn histogram(&self, mut config: HistogramPlotConfig) -> HistogramPlotConfig {
        self.apply(&mut config.bins, &mut config.size);
        config
    }
}

fn prepare_out(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn load_all(paths: &[PathBuf]) -> Result<Vec<FloatImage>, Box<dyn Error>> {
    Ok(paths.iter().map(load_image).collect::<Result<Vec<_>, _>>()?)
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Histogram { image, figure } => {
            prepare_out(&figure.output.out)?;
            let img = load_image(&image)?;
            let config = figure.histogram(HistogramPlotConfig::default());
            plot_rgb_histogram(&img, &config, &figure.output.out)?;
        }
        Command::Compare {
            first,
            second,
            figure,
        } => {
            prepare_out(&figure.output.out)?;
            let (a, b) = (load_image(&first)?, load_image(&second)?);
            let config = figure.histogram(HistogramPlotConfig::pair());
            plot_rgb_histograms_pair(&a, &b, &config, &figure.output.out)?;
        }
        Command::CompareFour {
            images,
            labels,
            figure,
        } => {
            prepare_out(&figure.output.out)?;
            let loaded: [FloatImage; 4] = load_all(&images)?
                .try_into()
                .map_err(|v: Vec<FloatImage>| format!("expected 4 images, got {}", v.len()))?;
            plot_rgb_histograms_quad(
                &loaded,
                &labels,
                &figure.histogram(HistogramPlotConfig::quad()),
                &figure.output.out,
            )?;
        }
        Command::Diff {
            first,
            second,
            method,
            figure,
        } => {
            prepare_out(&figure.output.out)?;
            let (a, b) = (load_image(&first)?, load_image(&second)?);
            let mut config = DifferencePlotConfig::default().with_method(method);
            figure.apply(&mut config.bins, &mut config.size);
            plot_image_difference(&a, &b, &config, &figure.output.out)?;
        }
        Command::Stats {
            first,
            second,
            method,
            json,
        } => {
            let report = analyze_image_differences(&first, &second, method)?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{report}");
            }
        }
        Command::Distribution { image, figure } => {
            prepare_out(&figure.output.out)?;
            let img = load_image(&image)?;
            let mut config = DistributionPlotConfig::default();
            figure.apply(&mut config.bins, &mut config.size);
            plot_channel_distributions(&img, &config, &figure.output.out)?;
            print!("{}", analyze_distribution(&img)?);
        }
        Command::Scatter { image, output } => {
            prepare_out(&output.out)?;
            let img = load_image(&image)?;
            let mut config = DistributionPlotConfig::default();
            output.resize(&mut config.size);
            plot_2d_distributions(&img, &config, &output.out)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scatter_has_no_bin_count() {
        let err = Cli::try_parse_from(["visualizer", "scatter", "a.png", "-o", "s.png", "--bins", "10"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);

        let cli = Cli::try_parse_from(["visualizer", "scatter", "a.png", "-o", "s.png", "--height", "300"])
            .expect("scatter accepts figure size");
        let Command::Scatter { output, .. } = cli.command else {
            panic!("expected scatter");
        };
        let mut size = (1500, 500);
        output.resize(&mut size);
        assert_eq!(size, (1500, 300));
    }

    #[test]
    fn histogram_figures_take_bins_and_size() {
        let cli = Cli::try_parse_from([
            "visualizer", "histogram", "a.png", "-o", "h.png", "--bins", "64", "--width", "640",
        ])
        .expect("parse");
        let Command::Histogram { figure, .. } = cli.command else {
            panic!("expected histogram");
        };
        let config = figure.histogram(HistogramPlotConfig::default());
        assert_eq!(config.bins, 64);
        assert_eq!(config.size, (640, 600));
    }

    #[test]
    fn four_image_captions_default_and_override() {
        let cli = Cli::try_parse_from([
            "visualizer", "compare-four", "a.png", "b.png", "c.png", "d.png", "-o", "q.png",
        ])
        .expect("parse");
        let Command::CompareFour { labels, .. } = cli.command else {
            panic!("expected compare-four");
        };
        assert_eq!(labels, QUAD_LABELS);

        let cli = Cli::try_parse_from([
            "visualizer", "compare-four", "a.png", "b.png", "c.png", "d.png", "-o", "q.png",
            "--labels", "w", "x", "y", "z",
        ])
        .expect("parse");
        let Command::CompareFour { labels, .. } = cli.command else {
            panic!("expected compare-four");
        };
        assert_eq!(labels, ["w", "x", "y", "z"]);
    }
}
