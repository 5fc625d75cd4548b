//! End-to-end check on the Ishigami function, whose variance decomposition
//! is known in closed form.

use std::f64::consts::PI;

use simdec::sampling::{scale, Halton, Sampler};
use simdec::{significance, Decomposition, FactorTable, State};

const A: f64 = 7.0;
const B: f64 = 0.1;

fn ishigami(runs: usize) -> (FactorTable, Vec<f64>) {
    let unit = Halton::new(3).unwrap().sample(runs);
    let x = scale(&unit, &[-PI; 3], &[PI; 3]).unwrap();
    let y = x
        .rows()
        .into_iter()
        .map(|r| r[0].sin() + A * r[1].sin().powi(2) + B * r[2].powi(4) * r[0].sin())
        .collect();
    (FactorTable::from_array(["x1", "x2", "x3"], x).unwrap(), y)
}

/// Analytical first-order and x1-x3 interaction indices.
fn analytical() -> ([f64; 3], f64) {
    let pi4 = PI.powi(4);
    let pi8 = PI.powi(8);
    let v1 = 0.5 + B * pi4 / 5.0 + B * B * pi8 / 50.0;
    let v2 = A * A / 8.0;
    let v13 = B * B * pi8 * 8.0 / 225.0;
    let var = v1 + v2 + v13;
    ([v1 / var, v2 / var, 0.0], v13 / var)
}

#[test]
fn test_ishigami_indices() {
    let (inputs, y) = ishigami(1 << 18);
    let res = significance(&inputs, &y).unwrap();

    let (first, s13) = analytical();
    assert!((first[0] - 0.3139).abs() < 1e-3);
    assert!((first[1] - 0.4424).abs() < 1e-3);

    for k in 0..3 {
        assert!(
            (res.first_order[k] - first[k]).abs() < 1e-2,
            "first order of x{}: {} vs {}",
            k + 1,
            res.first_order[k],
            first[k]
        );
    }

    let si = [first[0] + s13 / 2.0, first[1], s13 / 2.0];
    for k in 0..3 {
        assert!(
            (res.si[k] - si[k]).abs() < 1e-2,
            "si of x{}: {} vs {}",
            k + 1,
            res.si[k],
            si[k]
        );
    }

    assert!(res.second_order[[0, 1]] < 1e-2);
    assert!(res.second_order[[1, 2]] < 1e-2);
    assert_eq!(res.second_order[[0, 2]], res.second_order[[2, 0]]);
}

#[test]
fn test_ishigami_is_deterministic() {
    let (inputs, y) = ishigami(1 << 12);
    let a = significance(&inputs, &y).unwrap();
    let b = significance(&inputs, &y).unwrap();
    assert_eq!(a, b);

    let si = a.si.to_vec();
    let dec_a = Decomposition::new().run(&inputs, &y, &si).unwrap();
    let dec_b = Decomposition::new().run(&inputs, &y, &si).unwrap();
    assert_eq!(dec_a, dec_b);
}

#[test]
fn test_ishigami_decomposition() {
    let (inputs, y) = ishigami(1 << 14);
    let res = significance(&inputs, &y).unwrap();
    let dec = Decomposition::new()
        .dec_limit(0.8)
        .run(&inputs, &y, &res.si.to_vec())
        .unwrap();

    // x1 and x2 carry most of the variance, in either order
    let mut names = dec.var_names.clone();
    names.sort();
    assert_eq!(names, vec!["x1", "x2"]);
    assert_eq!(dec.states, vec![State::Count(3), State::Count(3)]);
    assert_eq!(dec.n_scenarios(), 9);
    assert_eq!(dec.bins.total(), 1 << 14);

    // equal-frequency states hold about a third of the runs each
    for (factor, name) in dec.var_names.iter().enumerate() {
        let edges = dec.bin_edges.edges(factor);
        let column = inputs.column(inputs.index_of(name).unwrap());
        let low = column.iter().filter(|&&v| v < edges[1]).count();
        assert!((low as f64 / f64::from(1 << 14) - 1.0 / 3.0).abs() < 0.01);
    }

    // sin(x2)^2 is smallest around x2 = 0, i.e. in the medium state
    let x2 = dec.var_names.iter().position(|n| n == "x2").unwrap();
    let state_mean = |label: &str| {
        let values: Vec<f64> = dec
            .scenario_table()
            .into_iter()
            .filter(|row| row.states[x2] == label)
            .filter_map(|row| row.statistic)
            .collect();
        values.iter().sum::<f64>() / values.len() as f64
    };
    assert!(state_mean("medium") < state_mean("low"));
    assert!(state_mean("medium") < state_mean("high"));
}
