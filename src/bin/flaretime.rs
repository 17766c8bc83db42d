use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use flaretime::{CurveReport, CurveSpec, Strategy, Stylesheet, TuningConfig, analyze_curve};

#[derive(Parser, Debug)]
#[command(name = "flaretime", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample the flux curve and print its peak/valley timing.
    Analyze(AnalyzeArgs),
    /// Generate a keyframes stylesheet for one refinement strategy.
    Css(CssArgs),
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Curve spec JSON overriding the built-in flare curve.
    #[arg(long)]
    curve: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CssArgs {
    /// Refinement strategy.
    #[arg(value_enum)]
    strategy: StrategyArg,

    /// Output CSS path (defaults to the strategy's historical file name).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Curve spec JSON overriding the built-in flare curve.
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Tuning JSON overriding the built-in region timing.
    #[arg(long)]
    tuning: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    ThreeStop,
    RefinedSplit,
    GradualSteps,
    ContinuousBreathing,
    BlendedOverlap,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ThreeStop => Strategy::ThreeStop,
            StrategyArg::RefinedSplit => Strategy::RefinedSplit,
            StrategyArg::GradualSteps => Strategy::GradualSteps,
            StrategyArg::ContinuousBreathing => Strategy::ContinuousBreathing,
            StrategyArg::BlendedOverlap => Strategy::BlendedOverlap,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Analyze(args) => cmd_analyze(args),
        Command::Css(args) => cmd_css(args),
    }
}

fn load_spec(path: Option<&Path>) -> anyhow::Result<CurveSpec> {
    Ok(match path {
        Some(p) => CurveSpec::from_path(p)?,
        None => CurveSpec::default(),
    })
}

fn load_tuning(path: Option<&Path>) -> anyhow::Result<TuningConfig> {
    Ok(match path {
        Some(p) => TuningConfig::from_path(p)?,
        None => TuningConfig::default(),
    })
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let spec = load_spec(args.curve.as_deref())?;
    let report = analyze_curve(&spec)?;
    print_report(&report);
    Ok(())
}

fn cmd_css(args: CssArgs) -> anyhow::Result<()> {
    let spec = load_spec(args.curve.as_deref())?;
    let tuning = load_tuning(args.tuning.as_deref())?;
    let strategy = Strategy::from(args.strategy);

    let report = analyze_curve(&spec)?;
    print_report(&report);

    let sheet = strategy.stylesheet(&report, &tuning)?;
    print_sheet_summary(&sheet);

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(strategy.default_out_file()));
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, sheet.to_string())
        .with_context(|| format!("write css '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn print_report(report: &CurveReport) {
    println!("Sampled points: {}", report.samples);
    for (i, peak) in report.peaks.iter().enumerate() {
        println!(
            "Peak {}: X={:.1}, Y={:.1} (flux height)",
            i + 1,
            peak.point.x,
            peak.point.y
        );
        print!(
            "         Path: {:.1}% | Time: {:.2}s",
            peak.percent, peak.secs
        );
        match peak.prominence {
            Some(p) => println!(" | Prominence: {p:.1}"),
            None => println!(),
        }
    }
    if let Some(valley) = &report.valley {
        println!("Valley/Shoulder between peaks:");
        println!("         X={:.1}, Y={:.1}", valley.point.x, valley.point.y);
        println!(
            "         Path: {:.1}% | Time: {:.2}s",
            valley.percent, valley.secs
        );
    }
    println!();
}

fn print_sheet_summary(sheet: &Stylesheet) {
    println!("{}:", sheet.header);
    for block in &sheet.blocks {
        let active_from = block.stops.first().and_then(|s| s.offsets.last());
        let active_to = block.stops.last().and_then(|s| s.offsets.first());
        let peak = block
            .stops
            .iter()
            .max_by(|a, b| a.style.opacity.total_cmp(&b.style.opacity))
            .and_then(|s| s.offsets.first());
        if let (Some(from), Some(to), Some(peak)) = (active_from, active_to, peak) {
            println!(
                "  {}: {} stops | active {from:.1}% - {to:.1}% | peak {peak:.1}%",
                block.name,
                block.stops.len()
            );
        }
    }
    println!();
}
