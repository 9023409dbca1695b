//! Progress reporting for the clustering and matching algorithms.
//!
//! Algorithms never write to global state. They hand [`SearchEvent`]s to a
//! [`SearchObserver`] supplied by the caller, which can log them, collect
//! them for tests, or drop them.

/// A notable step in a clustering or matching run.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// A clustering pass completed.
    ClusteringFinished {
        /// Requests that survived the time-window filter.
        considered: usize,
        /// Multi-member clusters found.
        clusters: usize,
        /// Requests emitted as singleton clusters.
        noise: usize,
        /// Neighbourhood threshold used, in combined-distance units.
        epsilon: f64,
    },
    /// One generation of the genetic search finished.
    GenerationCompleted {
        /// Zero-based generation index.
        generation: usize,
        /// Best fitness in the population.
        best_fitness: f64,
        /// Mean fitness of the population.
        mean_fitness: f64,
        /// Assignment ratio of the incumbent.
        assignment_ratio: f64,
    },
    /// The genetic search stopped.
    Converged {
        /// Generations executed.
        generations: usize,
        /// Fitness of the returned incumbent.
        best_fitness: f64,
        /// `true` when the stop was caused by stagnation.
        stagnated: bool,
    },
    /// A post-processing pass placed clusters at a relaxation factor.
    PostProcessed {
        /// Multiplier applied to the maximum detour.
        relaxation_factor: f64,
        /// Clusters placed during the pass.
        placed: usize,
    },
}

/// Receive [`SearchEvent`]s from an algorithm.
pub trait SearchObserver: Send + Sync {
    /// Handle a single event.
    fn on_event(&self, event: &SearchEvent);
}

/// Forward events to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SearchObserver for LogObserver {
    fn on_event(&self, event: &SearchEvent) {
        match event {
            SearchEvent::ClusteringFinished {
                considered,
                clusters,
                noise,
                epsilon,
            } => log::debug!(
                "clustered {considered} requests into {clusters} groups and {noise} singletons (eps={epsilon:.3})"
            ),
            SearchEvent::GenerationCompleted {
                generation,
                best_fitness,
                mean_fitness,
                assignment_ratio,
            } => log::debug!(
                "generation {generation}: best={best_fitness:.4} mean={mean_fitness:.4} ratio={assignment_ratio:.3}"
            ),
            SearchEvent::Converged {
                generations,
                best_fitness,
                stagnated,
            } => log::debug!(
                "search stopped after {generations} generations (best={best_fitness:.4}, stagnated={stagnated})"
            ),
            SearchEvent::PostProcessed {
                relaxation_factor,
                placed,
            } => log::debug!("post-processing at x{relaxation_factor} placed {placed} clusters"),
        }
    }
}

/// Discard every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_event(&self, _event: &SearchEvent) {}
}
