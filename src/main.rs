use clap::Parser;
use std::path::PathBuf;
use std::process;
use svg2kicadmod::bezier::DEFAULT_MAX_SUBDIVISION_DEPTH;
use svg2kicadmod::traverse::DEFAULT_MAX_GROUP_DEPTH;
use svg2kicadmod::{
    ConvertOptions, FootprintOptions, HorizontalAlign, TraverseOptions, VerticalAlign,
    convert_file,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Convert SVG line art into a KiCad footprint.
///
/// If a non-zero width is given the drawing is scaled to that width; with a
/// zero width and non-zero height, to that height; with both, to fit inside
/// both. Without either no scaling is done.
#[derive(Parser, Debug)]
#[command(name = "svg2kicadmod", version, about)]
struct Cli {
    /// Input SVG file
    input: PathBuf,

    /// Output .kicad_mod file
    output: PathBuf,

    /// Board layer for every polygon, e.g. F.SilkS
    layer: String,

    /// Target width in mm (0 = unconstrained)
    width_mm: Option<f64>,

    /// Target height in mm (0 = unconstrained)
    #[arg(requires = "width_mm")]
    height_mm: Option<f64>,

    /// Module name written in the footprint header
    #[arg(long, default_value = "ConvertedSvgModule")]
    name: String,

    /// Polygon outline width in mm
    #[arg(long, default_value_t = 0.01)]
    line_width: f64,

    /// Curve flatness tolerance, a positive number
    #[arg(long, default_value_t = 0.1, value_parser = parse_tolerance)]
    tolerance: f64,

    /// Horizontal anchor placed at the origin
    #[arg(long, value_enum, default_value_t = HorizontalAlign::Center)]
    halign: HorizontalAlign,

    /// Vertical anchor placed at the origin
    #[arg(long, value_enum, default_value_t = VerticalAlign::Center)]
    valign: VerticalAlign,

    /// Leave out paths with hidden or collapsed visibility
    #[arg(long)]
    skip_hidden: bool,
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("tolerance must be a positive finite number, got {}", s));
    }
    Ok(value)
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            traverse: TraverseOptions {
                tolerance: self.tolerance,
                max_subdivision_depth: DEFAULT_MAX_SUBDIVISION_DEPTH,
                max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
                skip_hidden: self.skip_hidden,
            },
            target_width: self.width_mm.unwrap_or(0.0),
            target_height: self.height_mm.unwrap_or(0.0),
            horizontal_align: self.halign,
            vertical_align: self.valign,
            footprint: FootprintOptions {
                name: self.name.clone(),
                layer: self.layer.clone(),
                line_width: self.line_width,
            },
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(e) = convert_file(&cli.input, &cli.output, &cli.options()) {
        error!("{}", e);
        process::exit(1);
    }

    println!(
        "Successfully converted '{}' to '{}'",
        cli.input.display(),
        cli.output.display()
    );
}
