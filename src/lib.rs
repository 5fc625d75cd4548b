//! # SimDec
//!
//! Simulation decomposition: find out which input factors of a simulation
//! drive its output, and which combinations of their states produce
//! extreme or typical outcomes.
//!
//! ## Overview
//!
//! The library is built around two engines:
//! - **Significance**: binned first- and second-order variance indices of
//!   every factor, using an empirically calibrated bin count
//! - **Decomposition**: equal-frequency states of the most significant
//!   factors, and a statistic of the output in every combination of states
//!   (a *scenario*)
//!
//! Around them sit a state model deriving sensible state counts and labels,
//! summary tables of the scenarios, and quasi-random samplers to generate
//! simulation inputs.
//!
//! ## Quick Start
//!
//! ```rust
//! use simdec::{significance, Decomposition, FactorTable};
//!
//! let n = 3000;
//! let load: Vec<f64> = (0..n).map(|i| f64::from(i) / f64::from(n)).collect();
//! let temp: Vec<f64> = (0..n).map(|i| f64::from((i * 17) % n) / f64::from(n)).collect();
//! let stress: Vec<f64> = load.iter().zip(&temp).map(|(l, t)| 4.0 * l + t).collect();
//!
//! let inputs = FactorTable::builder()
//!     .numeric("load", load)
//!     .numeric("temp", temp)
//!     .build()?;
//!
//! let res = significance(&inputs, &stress)?;
//! assert!(res.si[0] > res.si[1]);
//!
//! let dec = Decomposition::new().run(&inputs, &stress, &res.si.to_vec())?;
//! assert_eq!(dec.var_names, vec!["load".to_string(), "temp".to_string()]);
//! assert_eq!(dec.statistic.shape(), &[3, 3]);
//! # Ok::<(), simdec::Error>(())
//! ```
//!
//! ## Logging
//!
//! Decision points (bin counts, selected factors, derived states, padded
//! scenarios) emit `tracing` events at `debug` and `trace` level. The
//! library never installs a subscriber.
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization of tables, configurations and results
//! - `parallel`: Enable parallel significance computation using rayon
//! - `python`: Enable Python bindings via PyO3

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod decomposition;
pub mod error;
pub mod sampling;
pub mod significance;
pub mod states;
pub mod stats;
pub mod table;
pub mod utils;

#[cfg(feature = "parallel")]
pub mod parallel;
#[cfg(feature = "python")]
pub mod python;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::decomposition::{
        decompose, select_factors, BinSpec, Decomposition, DecompositionConfig,
        DecompositionResult, ScenarioBins, ScenarioRow, StateRow, Statistic,
        MAX_DECOMPOSITION_FACTORS,
    };
    pub use crate::error::{Error, Result};
    pub use crate::sampling::{discrepancy, scale, Halton, LatinHypercube, Sampler};
    pub use crate::significance::{
        number_of_bins, rank_factors, select_by_explained_variance, significance, RankedFactor,
        SignificanceResult,
    };
    pub use crate::states::{derive_states, states_expansion, State};
    pub use crate::table::{Factor, FactorKind, FactorTable};

    #[cfg(feature = "parallel")]
    pub use crate::parallel::par_significance;
}

// Re-export commonly used items at crate root
pub use decomposition::{
    decompose, Decomposition, DecompositionConfig, DecompositionResult, Statistic,
};
pub use error::{Error, Result};
pub use significance::{significance, SignificanceResult};
pub use states::{derive_states, states_expansion, State};
pub use table::FactorTable;

#[cfg(feature = "parallel")]
pub use parallel::par_significance;
