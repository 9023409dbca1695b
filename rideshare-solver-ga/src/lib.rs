//! Genetic-algorithm matcher for pooled ride requests.
//!
//! [`GeneticMatcher`] implements the [`Matcher`](rideshare_core::Matcher)
//! trait. Each candidate solution maps every cluster to a vehicle or leaves it
//! unassigned. Candidates evolve through tournament selection, single-point
//! crossover and per-gene mutation, and are repaired after every change so
//! that no vehicle is ever over capacity and no cluster lies beyond the detour
//! limit. The best candidate seen is tracked separately from the population
//! and is only replaced by one that is fitter without serving fewer
//! passengers.
//!
//! After the search, idle vehicles are offered the remaining clusters under
//! progressively relaxed detour limits before the incumbent is converted into
//! [`Assignment`](rideshare_core::Assignment)s.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod fitness;
mod ledger;
mod operators;
mod post_process;
mod problem;
mod solver;

pub use solver::{FitnessWeights, GeneticMatcher, GeneticMatcherConfig};
