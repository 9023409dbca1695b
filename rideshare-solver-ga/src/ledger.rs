//! Per-candidate seat bookkeeping.

use crate::problem::Problem;

/// Seats still free on each vehicle, indexed like the vehicle slice.
///
/// Every candidate owns its ledger, so the shared vehicle list is never
/// mutated while the search runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CapacityLedger {
    remaining: Vec<usize>,
}

impl CapacityLedger {
    /// A ledger with every vehicle's available seats free.
    pub(crate) fn new(problem: &Problem<'_>) -> Self {
        Self {
            remaining: problem.vehicles().iter().map(|v| v.seats()).collect(),
        }
    }

    /// A ledger with the seats taken by `genes` already reserved.
    ///
    /// Genes that would overflow their vehicle are ignored.
    pub(crate) fn from_genes(problem: &Problem<'_>, genes: &[Option<usize>]) -> Self {
        let mut ledger = Self::new(problem);
        for (cluster, gene) in genes.iter().enumerate() {
            if let Some(vehicle) = gene {
                ledger.reserve(*vehicle, problem.size(cluster));
            }
        }
        ledger
    }

    /// Whether `vehicle` can still seat `passengers`.
    pub(crate) fn fits(&self, vehicle: usize, passengers: usize) -> bool {
        self.remaining
            .get(vehicle)
            .is_some_and(|free| *free >= passengers)
    }

    /// Take `passengers` seats on `vehicle`, returning `false` and leaving
    /// the ledger untouched when they do not fit.
    pub(crate) fn reserve(&mut self, vehicle: usize, passengers: usize) -> bool {
        match self.remaining.get_mut(vehicle) {
            Some(free) if *free >= passengers => {
                *free -= passengers;
                true
            }
            _ => false,
        }
    }

    /// Seats still free on `vehicle`.
    #[cfg(test)]
    pub(crate) fn remaining(&self, vehicle: usize) -> usize {
        self.remaining.get(vehicle).copied().unwrap_or(0)
    }
}
