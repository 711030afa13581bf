use clap::Args;
use offer_pulse::error::AppError;
use offer_pulse::offers::{
    calculate_score, calculate_trend, recompute_trends, score_breakdown, Observation, Score,
    ScoreBreakdown, TrendDirection, TrendInfo,
};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreReportArgs {
    /// JSON array of observations (reads stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Include the day-by-day series with recomputed trends
    #[arg(long)]
    list_series: bool,
}

pub(crate) fn run_score_report(args: ScoreReportArgs) -> Result<(), AppError> {
    let ScoreReportArgs { input, list_series } = args;

    let mut series: Vec<Observation> = match input {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => serde_json::from_reader(io::stdin().lock())?,
    };
    series.sort_by_key(|observation| observation.date);
    recompute_trends(&mut series);

    let score = calculate_score(&series);
    let trend = calculate_trend(&series);
    let breakdown = score_breakdown(&series);

    render_score_report(&series, &score, &trend, breakdown.as_ref(), list_series);
    Ok(())
}

fn render_score_report(
    series: &[Observation],
    score: &Score,
    trend: &TrendInfo,
    breakdown: Option<&ScoreBreakdown>,
    list_series: bool,
) {
    println!("Offer score report");
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => println!(
            "Observed {} day(s): {} -> {}",
            series.len(),
            first.date,
            last.date
        ),
        _ => println!("No observations provided"),
    }

    println!("\nScore: {} ({})", score.value, score.label);

    match breakdown {
        Some(breakdown) => {
            println!("\nComponents");
            for component in &breakdown.components {
                println!(
                    "- {:?}: {:+.2} ({})",
                    component.factor, component.points, component.notes
                );
            }
            println!("Raw total: {:.2}", breakdown.raw_total);
        }
        None => println!("Not enough observations for a component breakdown"),
    }

    let arrow = match trend.direction {
        TrendDirection::Up => "up",
        TrendDirection::Down => "down",
        TrendDirection::Stable => "stable",
    };
    println!(
        "\nLatest trend: {} ({:.0}%)",
        arrow,
        trend.percentage.abs()
    );

    if list_series {
        println!("\nDaily series");
        for observation in series {
            let change = match observation.trend {
                Some(trend) => format!("{trend:+.1}%"),
                None => "n/a".to_string(),
            };
            let note = match &observation.observation {
                Some(note) if !note.is_empty() => format!(" | {note}"),
                _ => String::new(),
            };
            println!(
                "- {} | {} active | {}{}",
                observation.date, observation.active_ads, change, note
            );
        }
    }
}
