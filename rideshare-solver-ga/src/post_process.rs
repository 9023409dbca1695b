//! Greedy placement of leftover clusters on idle vehicles.

use std::cmp::Reverse;

use rideshare_core::{SearchEvent, SearchObserver};

use crate::ledger::CapacityLedger;
use crate::problem::Problem;

/// Offer unassigned clusters, largest first, to vehicles that serve nothing,
/// once per relaxation factor.
///
/// Each idle vehicle takes at most one cluster. Returns the relaxation
/// factor applied to every cluster (`1.0` for clusters placed by the search
/// itself) and the number of clusters placed here.
pub(crate) fn place_leftovers(
    problem: &Problem<'_>,
    genes: &mut [Option<usize>],
    factors: &[f64],
    observer: &dyn SearchObserver,
) -> (Vec<f64>, usize) {
    let mut applied = vec![1.0; genes.len()];
    let mut ledger = CapacityLedger::from_genes(problem, genes);
    let mut idle: Vec<bool> = vec![true; problem.vehicle_count()];
    for vehicle in genes.iter().flatten() {
        if let Some(flag) = idle.get_mut(*vehicle) {
            *flag = false;
        }
    }
    let mut placed_total = 0;

    for &factor in factors {
        let mut waiting: Vec<usize> = genes
            .iter()
            .enumerate()
            .filter(|(_, gene)| gene.is_none())
            .map(|(cluster, _)| cluster)
            .collect();
        if waiting.is_empty() || !idle.contains(&true) {
            break;
        }
        waiting.sort_by_key(|&cluster| Reverse(problem.size(cluster)));

        let mut placed = 0;
        for cluster in waiting {
            let size = problem.size(cluster);
            let candidate = idle
                .iter()
                .enumerate()
                .filter(|(vehicle, is_idle)| {
                    **is_idle
                        && ledger.fits(*vehicle, size)
                        && problem.within_detour(cluster, *vehicle, factor)
                })
                .map(|(vehicle, _)| vehicle)
                .min_by(|a, b| problem.reach(cluster, *a).total_cmp(&problem.reach(cluster, *b)));
            let Some(vehicle) = candidate else {
                continue;
            };
            if !ledger.reserve(vehicle, size) {
                continue;
            }
            if let (Some(gene), Some(flag), Some(slot)) = (
                genes.get_mut(cluster),
                idle.get_mut(vehicle),
                applied.get_mut(cluster),
            ) {
                *gene = Some(vehicle);
                *flag = false;
                *slot = factor;
                placed += 1;
            }
        }

        observer.on_event(&SearchEvent::PostProcessed {
            relaxation_factor: factor,
            placed,
        });
        placed_total += placed;
    }

    (applied, placed_total)
}
