//! Property tests for the invariants of both engines.

use proptest::prelude::*;
use simdec::decomposition::BinSpec;
use simdec::{
    derive_states, significance, states_expansion, Decomposition, FactorTable, State,
};

/// A table of 1 to 4 factors over 20 to 150 runs, and an output depending
/// on every factor plus noise.
fn arb_model() -> impl Strategy<Value = (FactorTable, Vec<f64>)> {
    (1usize..=4, 20usize..150).prop_flat_map(|(k, n)| {
        (
            prop::collection::vec(prop::collection::vec(-100.0f64..100.0, n), k),
            prop::collection::vec(-10.0f64..10.0, n),
        )
            .prop_map(|(columns, noise)| {
                let y: Vec<f64> = (0..noise.len())
                    .map(|i| {
                        columns
                            .iter()
                            .enumerate()
                            .map(|(k, c)| (k + 1) as f64 * c[i])
                            .sum::<f64>()
                            + noise[i]
                    })
                    .collect();
                let table = columns
                    .into_iter()
                    .enumerate()
                    .fold(FactorTable::builder(), |b, (k, values)| {
                        b.numeric(format!("x{k}"), values)
                    })
                    .build()
                    .unwrap();
                (table, y)
            })
    })
}

proptest! {
    #[test]
    fn indices_are_non_negative_and_symmetric((inputs, y) in arb_model()) {
        let res = significance(&inputs, &y).unwrap();
        let k = inputs.n_factors();

        for i in 0..k {
            prop_assert!(res.first_order[i] >= 0.0);
            prop_assert_eq!(res.second_order[[i, i]], 0.0);
            for j in 0..k {
                prop_assert!(res.second_order[[i, j]] >= 0.0);
                prop_assert_eq!(res.second_order[[i, j]], res.second_order[[j, i]]);
            }
            let half_row: f64 = res.second_order.row(i).sum() / 2.0;
            prop_assert!((res.si[i] - res.first_order[i] - half_row).abs() < 1e-12);
        }
    }

    #[test]
    fn significance_is_deterministic((inputs, y) in arb_model()) {
        let a = significance(&inputs, &y).unwrap();
        let b = significance(&inputs, &y).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn scenario_count_matches_states((inputs, y) in arb_model()) {
        let si = significance(&inputs, &y).unwrap().si.to_vec();
        let dec = Decomposition::new().run(&inputs, &y, &si).unwrap();

        let expected: usize = dec.state_counts().iter().product();
        prop_assert_eq!(dec.statistic.len(), expected);
        prop_assert_eq!(dec.bins.len(), expected);
        prop_assert_eq!(dec.bin_edges.n_scenarios(), expected);
        prop_assert_eq!(dec.bins.total(), inputs.runs());

        for (samples, statistic) in dec.bins.iter().zip(dec.statistic_flat()) {
            prop_assert_eq!(samples.is_empty(), statistic.is_none());
        }
    }

    #[test]
    fn edges_cover_every_value((inputs, y) in arb_model()) {
        let si = significance(&inputs, &y).unwrap().si.to_vec();
        let dec = Decomposition::new().run(&inputs, &y, &si).unwrap();

        for (d, name) in dec.var_names.iter().enumerate() {
            let edges = dec.bin_edges.edges(d);
            prop_assert!(edges.windows(2).all(|w| w[0] < w[1]));

            let column = inputs.column(inputs.index_of(name).unwrap());
            let (lo, hi) = (edges[0], edges[edges.len() - 1]);
            prop_assert!(column.iter().all(|&v| lo <= v && v <= hi));
        }
    }

    #[test]
    fn equal_frequency_edges_with_ties(
        values in prop::collection::vec(0u8..4, 10..80),
        count in 1usize..5,
    ) {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let table = FactorTable::builder().numeric("x", values).build().unwrap();
        let spec = BinSpec::equal_frequency(&table, &[count]).unwrap();

        prop_assert!(spec.edges(0).windows(2).all(|w| w[0] < w[1]));
        let located: Vec<usize> = table.data().rows().into_iter().map(|r| spec.locate(r)).collect();
        prop_assert!(located.iter().all(|&k| k < count));
    }

    #[test]
    fn every_level_keeps_its_own_state(
        freqs in prop::collection::vec(1usize..20, 2..=5),
        shift in 0usize..50,
    ) {
        let mut x: Vec<f64> = freqs
            .iter()
            .enumerate()
            .flat_map(|(level, &n)| std::iter::repeat(level as f64).take(n))
            .collect();
        let len = x.len();
        x.rotate_left(shift % len);
        let y: Vec<f64> = x.iter().map(|v| v * 3.0 + 1.0).collect();
        let table = FactorTable::builder().numeric("x", x).build().unwrap();

        let dec = Decomposition::new().run(&table, &y, &[1.0]).unwrap();

        prop_assert_eq!(&dec.states, &vec![State::Count(freqs.len())]);
        prop_assert_eq!(dec.bins.counts(), freqs);
        for (level, samples) in dec.bins.iter().enumerate() {
            let expected = level as f64 * 3.0 + 1.0;
            prop_assert!(samples.iter().all(|&v| v == expected));
        }
    }

    #[test]
    fn states_expansion_is_idempotent((inputs, _y) in arb_model(), extra in 2usize..6) {
        let mut states = derive_states(&inputs);
        states[0] = State::Count(extra);

        let once = states_expansion(&states, &inputs).unwrap();
        let twice = states_expansion(&once, &inputs).unwrap();
        prop_assert_eq!(once, twice);
    }
}
