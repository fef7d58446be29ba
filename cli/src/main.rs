use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::{ColoredString, Colorize};

use aid_simulator_core_rs::{
    Phase, PolicyConfig, RecoveryRates, RunSummary, ShockRates, Simulation, SimulationConfig,
};

/// Width of the phase distribution bars
const CHART_WIDTH: usize = 40;

/// Width of a full-scale trend bar (critical share of 100%)
const TREND_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Strategy {
    /// Uniform random selection across the whole population (baseline)
    EqualDistribution,
    /// Emergency (phase 4) households first, shortfall filled at random
    TargetPhase4,
    /// Stressed (phase 2) households first, shortfall filled at random
    EarlyIntervention,
}

impl From<Strategy> for PolicyConfig {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::EqualDistribution => PolicyConfig::EqualDistribution,
            Strategy::TargetPhase4 => PolicyConfig::TargetPhase4,
            Strategy::EarlyIntervention => PolicyConfig::EarlyIntervention,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "aid-simulator", version)]
#[command(about = "Food-insecurity simulator - compare aid strategies against shock scenarios")]
struct Args {
    /// Number of households to simulate
    #[arg(long, default_value_t = 5000)]
    households: usize,

    /// Share of households receiving aid per step, in percent
    #[arg(long, default_value_t = 20.0)]
    aid_percent: f64,

    /// Probability that a stressed (phase 2) household worsens to crisis
    #[arg(long, default_value_t = 0.3)]
    shock_2_to_3: f64,

    /// Probability that a crisis (phase 3) household worsens to emergency
    #[arg(long, default_value_t = 0.2)]
    shock_3_to_4: f64,

    /// Recovery probability for aided emergency (phase 4) households
    #[arg(long, default_value_t = 0.6)]
    recovery_4_to_3: f64,

    /// Recovery probability for aided crisis (phase 3) households
    #[arg(long, default_value_t = 0.5)]
    recovery_3_to_2: f64,

    /// Recovery probability for aided stressed (phase 2) households
    #[arg(long, default_value_t = 0.4)]
    recovery_2_to_1: f64,

    /// Number of simulation steps
    #[arg(long, default_value_t = 20)]
    steps: usize,

    /// Aid allocation strategy
    #[arg(long, value_enum, default_value_t = Strategy::EqualDistribution)]
    strategy: Strategy,

    /// RNG seed for deterministic runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    format: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = build_config(&args)?;
    log::info!(
        "run: {} households, {}% aid via {:?}, shocks {}/{}, {} steps, seed {}",
        config.num_households,
        args.aid_percent,
        config.policy,
        config.shock_rates.stressed_to_crisis,
        config.shock_rates.crisis_to_emergency,
        config.num_steps,
        config.rng_seed
    );

    let mut simulation = Simulation::new(config).context("invalid simulation parameters")?;
    let capacity = simulation.aid_capacity();

    if args.format == "console" {
        announce_banner();
    }

    let summary = simulation.run().context("simulation run failed")?;

    match args.format.as_str() {
        "json" => print_json(&summary)?,
        _ => print_console(&summary, capacity),
    }

    Ok(())
}

/// Translate CLI arguments into a core configuration.
///
/// The command line speaks percent for aid capacity; the core takes a
/// fraction. Probability and count validation is left to the engine.
fn build_config(args: &Args) -> Result<SimulationConfig> {
    if !(0.0..=100.0).contains(&args.aid_percent) {
        anyhow::bail!(
            "--aid-percent must be between 0 and 100, got {}",
            args.aid_percent
        );
    }

    Ok(SimulationConfig {
        num_households: args.households,
        aid_fraction: args.aid_percent / 100.0,
        shock_rates: ShockRates {
            stressed_to_crisis: args.shock_2_to_3,
            crisis_to_emergency: args.shock_3_to_4,
        },
        recovery_rates: RecoveryRates {
            emergency_to_crisis: args.recovery_4_to_3,
            crisis_to_stressed: args.recovery_3_to_2,
            stressed_to_minimal: args.recovery_2_to_1,
        },
        num_steps: args.steps,
        policy: args.strategy.into(),
        rng_seed: args.seed,
    })
}

fn announce_banner() {
    println!("{}", "🌾 Aid Strategy Simulator".bright_cyan().bold());
    println!("{}", "=========================".cyan());
}

fn print_console(summary: &RunSummary, capacity: usize) {
    println!();
    print_distribution(summary);
    println!();
    print_trend(&summary.history.critical_series());
    println!();
    print_headline(summary, capacity);
}

/// Final phase distribution as a severity-colored bar chart
fn print_distribution(summary: &RunSummary) {
    println!("{}", "📊 Final Phase Distribution".bright_cyan().bold());
    println!("{}", "===========================".cyan());

    let total = summary.final_counts.total().max(1);
    let max_count = summary
        .final_counts
        .iter()
        .map(|(_, count)| count)
        .max()
        .unwrap_or(1)
        .max(1);

    for (phase, count) in summary.final_counts.iter() {
        let bar = scaled_bar(count, max_count, CHART_WIDTH);
        let share = percent(count, total);
        println!(
            "{:<14} {} {} ({share:.1}%)",
            phase.to_string(),
            phase_colored(phase, &bar),
            count
        );
    }
}

/// Critical-share trajectory, one row per step
fn print_trend(series: &[f64]) {
    println!("{}", "📈 Phase 3+ Trend".bright_yellow().bold());
    println!("{}", "=================".yellow());

    let mut previous: Option<f64> = None;
    for (index, fraction) in series.iter().enumerate() {
        let pct = format!("{:>5.1}%", fraction * 100.0);
        let pct = match previous {
            Some(prev) if *fraction > prev => pct.red(),
            Some(prev) if *fraction < prev => pct.green(),
            _ => pct.normal(),
        };
        let bar = "▇".repeat((fraction * TREND_WIDTH as f64).round() as usize);
        println!("step {:>3} {pct} {bar}", index + 1);
        previous = Some(*fraction);
    }
}

/// The headline number the dashboard shows: share of households in
/// phase 3 or worse after the final step
fn print_headline(summary: &RunSummary, capacity: usize) {
    println!("{}", "🎯 Outcome".bright_cyan().bold());
    println!("{}", "==========".cyan());

    let series = summary.history.critical_series();
    let first = series.first().copied().unwrap_or(0.0);
    let last = summary.final_critical_fraction();

    let value = format!("{:.1}%", last * 100.0);
    let value = if last <= first {
        value.green().bold()
    } else {
        value.red().bold()
    };

    println!("Households in phase 3 or worse: {value}");
    println!("Aid capacity: {capacity} households per step");
    println!("Run ID: {}", summary.run_id);
}

fn print_json(summary: &RunSummary) -> Result<()> {
    let json_output = serde_json::to_string_pretty(summary)?;
    println!("{json_output}");
    Ok(())
}

/// Bar scaled against the largest phase count; nonzero counts always
/// render at least one cell
fn scaled_bar(count: usize, max_count: usize, width: usize) -> String {
    let cells = (count * width).div_ceil(max_count);
    "█".repeat(cells)
}

fn percent(count: usize, total: usize) -> f64 {
    count as f64 / total as f64 * 100.0
}

fn phase_colored(phase: Phase, text: &str) -> ColoredString {
    match phase {
        Phase::Minimal => text.green(),
        Phase::Stressed => text.yellow(),
        Phase::Crisis => text.red(),
        Phase::Emergency => text.bright_red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            households: 100,
            aid_percent: 20.0,
            shock_2_to_3: 0.3,
            shock_3_to_4: 0.2,
            recovery_4_to_3: 0.6,
            recovery_3_to_2: 0.5,
            recovery_2_to_1: 0.4,
            steps: 5,
            strategy: Strategy::EqualDistribution,
            seed: 42,
            format: "console".to_string(),
        }
    }

    #[test]
    fn build_config_converts_percent_to_fraction() {
        let config = build_config(&base_args()).unwrap();
        assert!((config.aid_fraction - 0.2).abs() < 1e-12);
        assert_eq!(config.num_households, 100);
        assert_eq!(config.num_steps, 5);
    }

    #[test]
    fn build_config_rejects_percent_out_of_range() {
        let mut args = base_args();
        args.aid_percent = 150.0;
        assert!(build_config(&args).is_err());

        args.aid_percent = -1.0;
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn strategy_maps_to_policy_config() {
        assert_eq!(
            PolicyConfig::from(Strategy::TargetPhase4),
            PolicyConfig::TargetPhase4
        );
        assert_eq!(
            PolicyConfig::from(Strategy::EarlyIntervention),
            PolicyConfig::EarlyIntervention
        );
    }

    #[test]
    fn built_config_drives_a_run() {
        let config = build_config(&base_args()).unwrap();
        let mut simulation = Simulation::new(config).unwrap();
        let summary = simulation.run().unwrap();
        assert_eq!(summary.history.len(), 5);
        assert_eq!(summary.final_counts.total(), 100);
    }

    #[test]
    fn scaled_bar_is_proportional() {
        assert_eq!(scaled_bar(0, 100, 40), "");
        assert_eq!(scaled_bar(100, 100, 40).chars().count(), 40);
        // nonzero counts never disappear from the chart
        assert_eq!(scaled_bar(1, 1000, 40).chars().count(), 1);
    }

    #[test]
    fn percent_of_total() {
        assert!((percent(25, 100) - 25.0).abs() < 1e-12);
        assert!((percent(0, 100)).abs() < 1e-12);
    }

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::parse_from(["aid-simulator"]);
        assert_eq!(args.households, 5000);
        assert!((args.aid_percent - 20.0).abs() < 1e-12);
        assert_eq!(args.steps, 20);
        assert_eq!(args.seed, 42);
        assert_eq!(args.format, "console");
    }

    #[test]
    fn args_parse_strategy_values() {
        let args = Args::parse_from(["aid-simulator", "--strategy", "target-phase4"]);
        assert!(matches!(args.strategy, Strategy::TargetPhase4));

        let args = Args::parse_from(["aid-simulator", "--strategy", "early-intervention"]);
        assert!(matches!(args.strategy, Strategy::EarlyIntervention));
    }
}
