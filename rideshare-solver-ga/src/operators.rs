//! Population initialisation and the genetic operators.
//!
//! A candidate is a `Vec<Option<usize>>` indexed by cluster position; each
//! gene names the serving vehicle, or `None` when the cluster is unassigned.

use std::cmp::Reverse;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::ledger::CapacityLedger;
use crate::problem::Problem;

/// Genes of one candidate solution.
pub(crate) type Genes = Vec<Option<usize>>;

/// Vehicles that can still take `cluster` under the normal detour limit.
fn feasible_vehicles(
    problem: &Problem<'_>,
    ledger: &CapacityLedger,
    cluster: usize,
) -> impl Iterator<Item = usize> {
    let size = problem.size(cluster);
    (0..problem.vehicle_count())
        .filter(move |&vehicle| {
            ledger.fits(vehicle, size) && problem.within_detour(cluster, vehicle, 1.0)
        })
}

/// Assign every cluster, largest first, to its nearest feasible vehicle.
pub(crate) fn greedy_candidate(problem: &Problem<'_>) -> Genes {
    let mut genes = vec![None; problem.cluster_count()];
    let mut ledger = CapacityLedger::new(problem);
    let mut order: Vec<usize> = (0..problem.cluster_count()).collect();
    order.sort_by_key(|&cluster| Reverse(problem.size(cluster)));

    for cluster in order {
        let nearest = feasible_vehicles(problem, &ledger, cluster)
            .min_by(|a, b| problem.reach(cluster, *a).total_cmp(&problem.reach(cluster, *b)));
        if let Some(vehicle) = nearest
            && ledger.reserve(vehicle, problem.size(cluster))
            && let Some(gene) = genes.get_mut(cluster)
        {
            *gene = Some(vehicle);
        }
    }
    genes
}

/// Visit clusters in random order and give each a uniformly chosen feasible
/// vehicle.
pub(crate) fn random_candidate<R: Rng + ?Sized>(problem: &Problem<'_>, rng: &mut R) -> Genes {
    let mut genes = vec![None; problem.cluster_count()];
    let mut ledger = CapacityLedger::new(problem);
    let mut order: Vec<usize> = (0..problem.cluster_count()).collect();
    order.shuffle(rng);

    for cluster in order {
        let options: Vec<usize> = feasible_vehicles(problem, &ledger, cluster).collect();
        if let Some(&vehicle) = options.choose(rng)
            && ledger.reserve(vehicle, problem.size(cluster))
            && let Some(gene) = genes.get_mut(cluster)
        {
            *gene = Some(vehicle);
        }
    }
    genes
}

/// Index of the fittest of `size` uniformly drawn contestants.
///
/// Contestants are drawn with replacement. Returns `None` for an empty
/// population.
pub(crate) fn tournament<R: Rng + ?Sized>(
    fitness: &[f64],
    size: usize,
    rng: &mut R,
) -> Option<usize> {
    if fitness.is_empty() {
        return None;
    }
    (0..size.max(1))
        .map(|_| rng.gen_range(0..fitness.len()))
        .max_by(|a, b| {
            let fa = fitness.get(*a).copied().unwrap_or(f64::NEG_INFINITY);
            let fb = fitness.get(*b).copied().unwrap_or(f64::NEG_INFINITY);
            fa.total_cmp(&fb)
        })
}

/// Single-point crossover, applied with probability `rate`; otherwise the
/// parents are copied.
pub(crate) fn crossover<R: Rng + ?Sized>(
    first: &[Option<usize>],
    second: &[Option<usize>],
    rate: f64,
    rng: &mut R,
) -> (Genes, Genes) {
    let len = first.len().min(second.len());
    if len < 2 || !chance(rng, rate) {
        return (first.to_vec(), second.to_vec());
    }
    let cut = rng.gen_range(1..len);
    let (head_a, tail_a) = first.split_at(cut);
    let (head_b, tail_b) = second.split_at(cut);
    let child_a = head_a.iter().chain(tail_b).copied().collect();
    let child_b = head_b.iter().chain(tail_a).copied().collect();
    (child_a, child_b)
}

/// Move each gene, with probability `rate`, to a uniform choice among the
/// feasible vehicles and "unassigned", excluding its current value.
///
/// Feasibility is judged against the seats taken by the genes before it.
pub(crate) fn mutate<R: Rng + ?Sized>(
    problem: &Problem<'_>,
    genes: &mut [Option<usize>],
    rate: f64,
    rng: &mut R,
) {
    let mut ledger = CapacityLedger::new(problem);
    for (cluster, gene) in genes.iter_mut().enumerate() {
        if chance(rng, rate) {
            let mut options: Vec<Option<usize>> = feasible_vehicles(problem, &ledger, cluster)
                .filter(|vehicle| *gene != Some(*vehicle))
                .map(Some)
                .collect();
            if gene.is_some() {
                options.push(None);
            }
            if let Some(choice) = options.choose(rng) {
                *gene = *choice;
            }
        }
        if let Some(vehicle) = *gene {
            ledger.reserve(vehicle, problem.size(cluster));
        }
    }
}

/// Recompute seat usage from scratch in cluster order and unassign every
/// cluster that overflows its vehicle or lies beyond the detour limit.
pub(crate) fn repair(problem: &Problem<'_>, genes: &mut [Option<usize>]) {
    let mut ledger = CapacityLedger::new(problem);
    for (cluster, gene) in genes.iter_mut().enumerate() {
        if let Some(vehicle) = *gene {
            let keep = problem.within_detour(cluster, vehicle, 1.0)
                && ledger.reserve(vehicle, problem.size(cluster));
            if !keep {
                *gene = None;
            }
        }
    }
}

/// Bernoulli draw that tolerates out-of-range and NaN probabilities.
fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if probability.is_nan() {
        return false;
    }
    rng.gen_bool(probability.clamp(0.0, 1.0))
}
