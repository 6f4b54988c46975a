use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use cutplan_core::{CutRequest, CuttingPlan, Optimizer, PlanRequest, SkipReason};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cutplan")]
#[command(about = "Bar cutting planner - work out how many stock bars a cut list needs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan cuts from a request file
    Optimize {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the plan (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Plan cuts given on the command line
    Quick {
        /// Stock bar length in mm
        #[arg(long)]
        stock: f64,

        /// Blade kerf in mm
        #[arg(long, default_value_t = 0.0)]
        kerf: f64,

        /// Pieces as LENGTH:QTY, LENGTH:QTY:CODE or LENGTHxQTY (e.g. 2000:3 1500:2:RAIL 800x4)
        #[arg(long = "cut", num_args = 1.., required = true, value_parser = parse_cut)]
        cuts: Vec<CutRequest>,

        /// Output file for the plan (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate SVG visualization from a saved plan
    Generate {
        /// Input plan file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Optimize { input, output } => {
            optimize_command(input, output)?;
        }
        Commands::Quick {
            stock,
            kerf,
            cuts,
            output,
        } => {
            run_plan(PlanRequest::new(stock, kerf, cuts), output)?;
        }
        Commands::Generate { input, output } => {
            generate_command(input, output)?;
        }
    }

    Ok(())
}

fn parse_cut(s: &str) -> std::result::Result<CutRequest, String> {
    // LENGTHxQTY is accepted as shorthand when no code is given.
    let parts: Vec<&str> = if s.contains(':') {
        s.split(':').collect()
    } else {
        s.split('x').collect()
    };
    if parts.len() < 2 || parts.len() > 3 || (parts.len() == 3 && !s.contains(':')) {
        return Err(format!(
            "invalid cut '{}', expected LENGTH:QTY[:CODE] or LENGTHxQTY",
            s
        ));
    }
    let length = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    let quantity = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;

    let cut = CutRequest::new(length, quantity);
    Ok(match parts.get(2) {
        Some(code) if !code.trim().is_empty() => cut.with_code(code.trim()),
        _ => cut,
    })
}

fn read_request(input: &Path) -> Result<PlanRequest> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let request = match input.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(request)
}

fn optimize_command(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());

    let request = read_request(&input)?;
    run_plan(request, output)
}

fn run_plan(request: PlanRequest, output: Option<PathBuf>) -> Result<()> {
    println!(
        "  {} cut lines, stock {}mm, kerf {}mm",
        request.items.len().to_string().bright_white().bold(),
        request.stock_length,
        request.kerf
    );
    println!();

    println!("{}", "🚀 Running optimization...".bright_blue());

    let optimizer = Optimizer::new(request)?;
    let plan = optimizer.optimize()?;

    println!();
    println!("{}", "✅ Optimization complete!".bright_green().bold());
    println!();

    print_plan(&plan);

    let json = serde_json::to_string_pretty(&plan)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved plan to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn print_plan(plan: &CuttingPlan) {
    println!("{}", "📊 Cutting patterns:".bright_yellow().bold());
    for pattern in &plan.patterns {
        println!(
            "  #{:<3} {:<40} used {:>8}mm  left {:>8}mm  {:>6.1}%",
            pattern.pattern_id,
            pattern.pattern_string.bright_white(),
            pattern.bar_usage,
            pattern.leftover,
            pattern.yield_percentage
        );
    }
    println!();
    println!(
        "  Total bars: {}",
        plan.summary.total_bars.to_string().bright_white().bold()
    );
    println!(
        "  Yield: {}",
        format!("{:.1}%", plan.summary.total_yield_percentage).bright_green()
    );
    println!(
        "  Scrap: {} ({}mm)",
        format!("{:.1}%", plan.summary.total_scrap_percentage).bright_white(),
        plan.summary.total_scrap_length
    );

    if !plan.skipped.is_empty() {
        println!();
        println!("{}", "  Skipped lines:".bright_red());
        for item in &plan.skipped {
            let label = item
                .code
                .as_deref()
                .or(item.description.as_deref())
                .unwrap_or("-");
            let reason = match item.reason {
                SkipReason::InvalidLength => "invalid length".to_string(),
                SkipReason::InvalidQuantity => "invalid quantity".to_string(),
                SkipReason::ExceedsStock => {
                    format!("longer than stock ({} pieces)", item.pieces)
                }
            };
            println!(
                "    • line {} [{}]: {}",
                item.index + 1,
                label.bright_white(),
                reason
            );
        }
    }

    println!();
}

fn generate_command(input: PathBuf, output: PathBuf) -> Result<()> {
    println!("{}", "🔍 Loading plan...".bright_blue());

    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let plan: CuttingPlan = serde_json::from_str(&content)?;

    println!("{}", "🎨 Generating SVG...".bright_blue());

    let svg = cutplan_core::render_svg(&plan).context("failed to render SVG")?;
    std::fs::write(&output, svg)?;

    println!();
    println!(
        "{} Saved SVG to {}",
        "✅".bright_green(),
        output.display().to_string().bright_white()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cut_length_and_quantity() {
        let cut = parse_cut("2000:3").unwrap();
        assert_eq!(cut.length, 2000.0);
        assert_eq!(cut.quantity, 3.0);
        assert!(cut.code.is_none());
    }

    #[test]
    fn test_parse_cut_with_code() {
        let cut = parse_cut("1500.5:2:RAIL-01").unwrap();
        assert_eq!(cut.length, 1500.5);
        assert_eq!(cut.code.as_deref(), Some("RAIL-01"));
    }

    #[test]
    fn test_parse_cut_x_shorthand() {
        let cut = parse_cut("1500x2").unwrap();
        assert_eq!(cut.length, 1500.0);
        assert_eq!(cut.quantity, 2.0);
        assert!(cut.code.is_none());

        assert!(parse_cut("1500x2x3").is_err());
    }

    #[test]
    fn test_parse_cut_rejects_malformed() {
        assert!(parse_cut("2000").is_err());
        assert!(parse_cut("abc:2").is_err());
        assert!(parse_cut("2000:x").is_err());
        assert!(parse_cut("1:2:3:4").is_err());
    }

    #[test]
    fn test_cli_quick_parses_repeated_cuts() {
        let cli = Cli::try_parse_from([
            "cutplan", "quick", "--stock", "6000", "--kerf", "3", "--cut", "2000:3", "--cut",
            "500:2",
        ])
        .unwrap();

        match cli.command {
            Commands::Quick {
                stock, kerf, cuts, ..
            } => {
                assert_eq!(stock, 6000.0);
                assert_eq!(kerf, 3.0);
                assert_eq!(cuts.len(), 2);
            }
            _ => panic!("expected quick command"),
        }
    }

    #[test]
    fn test_read_request_yaml() {
        let dir = std::env::temp_dir().join(format!("cutplan-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("request.yaml");
        std::fs::write(
            &path,
            "stockLength: 6000\nkerf: 2\nitems:\n  - code: A\n    length: 1000\n    quantity: 5\n",
        )
        .unwrap();

        let request = read_request(&path).unwrap();
        assert_eq!(request.stock_length, 6000.0);
        assert_eq!(request.kerf, 2.0);
        assert_eq!(request.items[0].quantity, 5.0);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
