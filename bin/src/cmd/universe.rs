//! Universe command implementation.

use anyhow::Result;

use crate::settings::Settings;

/// Print the instrument universe and the rename table.
pub(crate) fn run(settings: &Settings) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                     Instrument Universe                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let universe = settings.universe.universe()?;

    println!("{:<30} {}", "Source label", "Instrument");
    println!("{}", "-".repeat(60));
    for mapping in &settings.universe.instruments {
        println!("{:<30} {}", mapping.raw, mapping.canonical);
    }
    println!();

    let rate = &settings.universe.reference_rate;
    println!("Reference rate:");
    println!("  {:<28} {} (percentage points)", rate.raw, rate.canonical);
    println!();

    let momentum = &settings.momentum;
    let volatility = &settings.volatility;
    println!("Momentum:   lookback {}, holding {}", momentum.lookback, momentum.holding);
    println!(
        "Volatility: decay {}, window {}, annualization {}, weighting {:?}",
        volatility.decay, volatility.window, volatility.periods_per_year, volatility.weighting
    );
    if let Some(start) = volatility.start {
        println!("            estimates from {start}");
    }
    println!("\n{} tradable instruments.\n", universe.len());

    Ok(())
}
