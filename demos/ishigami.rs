//! Ishigami example for the simdec library.
//!
//! This example samples the Ishigami function with a Halton sequence,
//! ranks its three inputs by significance and decomposes the output into
//! scenarios of the most significant ones.

use simdec::sampling::{scale, Halton, Sampler};
use simdec::significance::rank_factors;
use simdec::{significance, Decomposition, FactorTable};

fn main() -> Result<(), simdec::Error> {
    println!("SimDec Library - Ishigami Example\n");

    let pi = std::f64::consts::PI;
    let unit = Halton::new(3)?.sample(1 << 14);
    let x = scale(&unit, &[-pi; 3], &[pi; 3])?;
    let y: Vec<f64> = x
        .rows()
        .into_iter()
        .map(|r| r[0].sin() + 7.0 * r[1].sin().powi(2) + 0.1 * r[2].powi(4) * r[0].sin())
        .collect();
    let inputs = FactorTable::from_array(["x1", "x2", "x3"], x)?;

    println!("Computing significance indices over {} runs...", inputs.runs());
    let res = significance(&inputs, &y)?;
    let si = res.ranking_indices().to_vec();
    for factor in rank_factors(&inputs.names(), &si) {
        println!(
            "  {:<4} si = {:.3}  first order = {:.3}",
            factor.name, factor.value, res.first_order[factor.index]
        );
    }
    println!();

    println!("Decomposing with dec_limit = 0.8...");
    let dec = Decomposition::new().dec_limit(0.8).run(&inputs, &y, &si)?;
    println!("  Variables: {:?}", dec.var_names);
    println!("  States:    {:?}", dec.state_counts());
    println!();

    println!("Scenarios:");
    println!("  {:>3}  {:<20} {:>6} {:>8} {:>6}", "#", "states", "count", "mean", "prob");
    for row in dec.scenario_table() {
        let mean = row.statistic.map_or("-".to_string(), |v| format!("{v:.3}"));
        println!(
            "  {:>3}  {:<20} {:>6} {:>8} {:>6.3}",
            row.number,
            row.states.join("/"),
            row.count,
            mean,
            row.probability
        );
    }
    println!();

    println!("States:");
    for state in dec.state_table() {
        println!(
            "  {:<4} {:<8} [{:.3}, {:.3}]",
            state.variable, state.state, state.min, state.max
        );
    }

    Ok(())
}
