use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use chicago_sports::win_prob::{Standing, matchup, probability_color};

const USAGE: &str = "usage: matchup <W-L[-T]> <W-L[-T]> [--away]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let away = args.iter().any(|a| a == "--away");
    let records = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .collect::<Vec<_>>();
    let [team, opponent] = records.as_slice() else {
        return Err(anyhow::anyhow!(USAGE));
    };

    let team: Standing = team.parse().context("team record")?;
    let opponent: Standing = opponent.parse().context("opponent record")?;
    tracing::debug!(?team, ?opponent, away, "computing matchup");

    let m = matchup(&team, &opponent, !away);
    let color = probability_color(m.team_pct);

    println!("Win probability: {}%", m.team_pct);
    println!("Opponent (own view): {}%", m.opponent_pct);
    println!("Label: {}", m.label);
    println!("Color: {} ({})", color, color.text_class());

    Ok(())
}
