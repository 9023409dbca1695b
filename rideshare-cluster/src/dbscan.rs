//! Density-based expansion over an abstract pairwise distance.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Unvisited,
    Noise,
    Member,
}

/// Outcome of a DBSCAN pass over point indices.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Partition {
    /// Dense groups, each in discovery order.
    pub(crate) clusters: Vec<Vec<usize>>,
    /// Points no core point reached, in index order.
    pub(crate) noise: Vec<usize>,
}

/// DBSCAN parameters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Dbscan {
    pub(crate) epsilon: f64,
    pub(crate) min_points: usize,
}

impl Dbscan {
    /// Partition `0..len` using `distance` as the metric.
    ///
    /// A point is core when at least `min_points` points, itself included,
    /// lie within `epsilon`. Border points join the first cluster that reaches
    /// them and never expand it.
    pub(crate) fn run<F>(&self, len: usize, distance: F) -> Partition
    where
        F: Fn(usize, usize) -> f64,
    {
        let neighbours = |point: usize| -> Vec<usize> {
            (0..len)
                .filter(|&other| distance(point, other) <= self.epsilon)
                .collect()
        };

        let mut labels = vec![Label::Unvisited; len];
        let mut partition = Partition::default();

        for seed in 0..len {
            if labels.get(seed) != Some(&Label::Unvisited) {
                continue;
            }
            let seed_neighbours = neighbours(seed);
            if seed_neighbours.len() < self.min_points {
                set_label(&mut labels, seed, Label::Noise);
                continue;
            }

            set_label(&mut labels, seed, Label::Member);
            let mut members = vec![seed];
            let mut frontier: VecDeque<usize> = seed_neighbours.into();
            while let Some(point) = frontier.pop_front() {
                match labels.get(point) {
                    Some(Label::Noise) => {
                        set_label(&mut labels, point, Label::Member);
                        members.push(point);
                    }
                    Some(Label::Unvisited) => {
                        set_label(&mut labels, point, Label::Member);
                        members.push(point);
                        let reach = neighbours(point);
                        if reach.len() >= self.min_points {
                            frontier.extend(reach);
                        }
                    }
                    Some(Label::Member) | None => {}
                }
            }
            partition.clusters.push(members);
        }

        partition.noise = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label != Label::Member)
            .map(|(index, _)| index)
            .collect();
        partition
    }
}

fn set_label(labels: &mut [Label], index: usize, label: Label) {
    if let Some(slot) = labels.get_mut(index) {
        *slot = label;
    }
}
