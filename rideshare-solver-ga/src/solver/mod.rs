//! `GeneticMatcher` implementation.

use std::sync::Arc;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rideshare_core::{
    Assignment, Cluster, LogObserver, MatchConstraints, MatchDiagnostics, MatchOutcome, Matcher,
    SearchEvent, SearchObserver, Vehicle,
};

use crate::fitness::{Evaluation, clusters_by_vehicle, evaluate};
use crate::operators::{
    Genes, crossover, greedy_candidate, mutate, random_candidate, repair, tournament,
};
use crate::post_process::place_leftovers;
use crate::problem::{Problem, count_f64, share_of};

/// Weights of the fitness terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessWeights {
    /// Reward for the share of requests served.
    pub assignment: f64,
    /// Penalty for the normalised detour per served passenger.
    pub detour: f64,
    /// Reward for the share of vehicles in use.
    pub utilisation: f64,
    /// Penalty per share of idle vehicles while clusters remain unassigned.
    pub idle_penalty: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            assignment: 0.75,
            detour: 0.2,
            utilisation: 0.05,
            idle_penalty: 0.05,
        }
    }
}

/// Configuration for [`GeneticMatcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticMatcherConfig {
    /// Candidates per generation.
    pub population_size: usize,
    /// Share of the initial population built greedily.
    pub greedy_fraction: f64,
    /// Contestants per tournament.
    pub tournament_size: usize,
    /// Probability of crossing two parents.
    pub crossover_rate: f64,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    /// Share of each generation carried over unchanged.
    pub elite_fraction: f64,
    /// Upper bound on generations.
    pub max_generations: usize,
    /// Generations without incumbent improvement before stopping.
    pub stagnation_limit: usize,
    /// Detour multipliers tried, in order, when placing leftover clusters on
    /// idle vehicles. Empty disables the pass.
    pub relaxation_factors: Vec<f64>,
    /// Fitness weights.
    pub weights: FitnessWeights,
    /// Seed for [`Matcher::assign`].
    pub seed: u64,
}

impl Default for GeneticMatcherConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            greedy_fraction: 0.2,
            tournament_size: 3,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            elite_fraction: 0.2,
            max_generations: 100,
            stagnation_limit: 20,
            relaxation_factors: vec![1.0, 1.5, 2.0],
            weights: FitnessWeights::default(),
            seed: 42,
        }
    }
}

/// Genetic-algorithm [`Matcher`].
///
/// # Examples
/// ```
/// use rideshare_core::{Cluster, MatchConstraints, Matcher, RideRequest, Vehicle, coordinate};
/// use rideshare_solver_ga::GeneticMatcher;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let here = coordinate(40.7128, -74.0060);
/// let cluster = Cluster::singleton(0, RideRequest::new(1, here, coordinate(40.75, -73.98), 0));
/// let vehicle = Vehicle::new(9, here, 4)?;
///
/// let outcome = GeneticMatcher::new().assign(
///     &[cluster],
///     &[vehicle],
///     &MatchConstraints { max_detour_km: 5.0 },
/// );
/// assert_eq!(outcome.assignments.len(), 1);
/// assert!(outcome.unassigned_request_ids.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GeneticMatcher {
    config: GeneticMatcherConfig,
    observer: Arc<dyn SearchObserver>,
}

impl GeneticMatcher {
    /// Construct a matcher using default configuration that reports progress
    /// through [`LogObserver`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GeneticMatcherConfig::default())
    }

    /// Construct a matcher with explicit configuration.
    #[must_use]
    pub fn with_config(config: GeneticMatcherConfig) -> Self {
        Self {
            config,
            observer: Arc::new(LogObserver),
        }
    }

    /// Replace the observability sink.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneticMatcherConfig {
        &self.config
    }

    /// Run the search with a caller-supplied random source.
    ///
    /// Equal inputs and equally seeded sources give equal outcomes, apart
    /// from the measured solve time.
    pub fn assign_with_rng<R: Rng + ?Sized>(
        &self,
        clusters: &[Cluster],
        vehicles: &[Vehicle],
        constraints: &MatchConstraints,
        rng: &mut R,
    ) -> MatchOutcome {
        let started_at = Instant::now();
        if clusters.is_empty() || vehicles.is_empty() {
            let mut outcome = MatchOutcome::unmatched(clusters);
            outcome.diagnostics.solve_time = started_at.elapsed();
            return outcome;
        }

        let problem = Problem::new(clusters, vehicles, constraints.max_detour_km);
        let mut search = Search::new(&problem, &self.config, &*self.observer);
        search.run(rng);
        let Search {
            incumbent,
            mut diagnostics,
            ..
        } = search;

        let mut genes = incumbent.genes;
        let (factors, placed) = place_leftovers(
            &problem,
            &mut genes,
            &self.config.relaxation_factors,
            &*self.observer,
        );
        diagnostics.post_processed_clusters = placed;
        diagnostics.solve_time = started_at.elapsed();

        MatchOutcome {
            assignments: build_assignments(&problem, &genes, &factors),
            unassigned_request_ids: genes
                .iter()
                .zip(clusters)
                .filter(|(gene, _)| gene.is_none())
                .flat_map(|(_, cluster)| cluster.request_ids())
                .collect(),
            diagnostics,
        }
    }
}

impl Default for GeneticMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GeneticMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneticMatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Matcher for GeneticMatcher {
    fn assign(
        &self,
        clusters: &[Cluster],
        vehicles: &[Vehicle],
        constraints: &MatchConstraints,
    ) -> MatchOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.assign_with_rng(clusters, vehicles, constraints, &mut rng)
    }
}

#[derive(Debug, Clone)]
struct Scored {
    genes: Genes,
    evaluation: Evaluation,
}

/// State of one evolutionary run.
struct Search<'p, 'a> {
    problem: &'p Problem<'a>,
    config: &'p GeneticMatcherConfig,
    observer: &'p dyn SearchObserver,
    population: Vec<Scored>,
    incumbent: Scored,
    diagnostics: MatchDiagnostics,
}

impl<'p, 'a> Search<'p, 'a> {
    fn new(
        problem: &'p Problem<'a>,
        config: &'p GeneticMatcherConfig,
        observer: &'p dyn SearchObserver,
    ) -> Self {
        let empty = vec![None; problem.cluster_count()];
        let incumbent = Scored {
            evaluation: evaluate(problem, &config.weights, &empty),
            genes: empty,
        };
        Self {
            problem,
            config,
            observer,
            population: Vec::new(),
            incumbent,
            diagnostics: MatchDiagnostics::default(),
        }
    }

    fn score(&self, genes: Genes) -> Scored {
        Scored {
            evaluation: evaluate(self.problem, &self.config.weights, &genes),
            genes,
        }
    }

    fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let size = self.config.population_size.max(1);
        let greedy = share_of(size, self.config.greedy_fraction);
        let seeded: Vec<Genes> = (0..size)
            .map(|index| {
                if index < greedy {
                    greedy_candidate(self.problem)
                } else {
                    random_candidate(self.problem, rng)
                }
            })
            .collect();
        self.population = seeded.into_iter().map(|genes| self.score(genes)).collect();
        self.sort_population();
        if let Some(best) = self.population.first() {
            self.incumbent = best.clone();
        }
        self.record_history();

        let mut stale = 0;
        let mut stagnated = false;
        for generation in 0..self.config.max_generations {
            self.advance(rng);
            if self.adopt_improvement() {
                stale = 0;
            } else {
                stale += 1;
            }
            self.diagnostics.generations_run = generation + 1;
            self.record_history();
            self.observer.on_event(&SearchEvent::GenerationCompleted {
                generation,
                best_fitness: self
                    .population
                    .first()
                    .map_or(f64::NEG_INFINITY, |s| s.evaluation.fitness),
                mean_fitness: self.mean_fitness(),
                assignment_ratio: self.incumbent.evaluation.assignment_ratio,
            });
            if stale >= self.config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        self.observer.on_event(&SearchEvent::Converged {
            generations: self.diagnostics.generations_run,
            best_fitness: self.incumbent.evaluation.fitness,
            stagnated,
        });
    }

    /// Replace the population with the next generation.
    fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let size = self.population.len();
        let elite = share_of(size, self.config.elite_fraction);
        let fitness: Vec<f64> = self
            .population
            .iter()
            .map(|s| s.evaluation.fitness)
            .collect();

        let mut next: Vec<Scored> = self.population.iter().take(elite).cloned().collect();
        while next.len() < size {
            let parents = (
                tournament(&fitness, self.config.tournament_size, rng),
                tournament(&fitness, self.config.tournament_size, rng),
            );
            let (Some(first), Some(second)) = (
                parents.0.and_then(|i| self.population.get(i)),
                parents.1.and_then(|i| self.population.get(i)),
            ) else {
                log::warn!("tournament selection returned no parent; keeping population");
                debug_assert!(false, "population is never empty during selection");
                return;
            };
            let (mut child_a, mut child_b) =
                crossover(&first.genes, &second.genes, self.config.crossover_rate, rng);
            for child in [&mut child_a, &mut child_b] {
                mutate(self.problem, child, self.config.mutation_rate, rng);
                repair(self.problem, child);
            }
            next.push(self.score(child_a));
            if next.len() < size {
                next.push(self.score(child_b));
            }
        }
        self.population = next;
        self.sort_population();
    }

    /// Adopt the fittest candidate that beats the incumbent without lowering
    /// its assignment ratio.
    fn adopt_improvement(&mut self) -> bool {
        let challenger = self
            .population
            .iter()
            .filter(|s| s.evaluation.improves_on(&self.incumbent.evaluation))
            .max_by(|a, b| a.evaluation.fitness.total_cmp(&b.evaluation.fitness))
            .cloned();
        let Some(scored) = challenger else {
            return false;
        };
        self.incumbent = scored;
        true
    }

    fn sort_population(&mut self) {
        self.population
            .sort_by(|a, b| b.evaluation.fitness.total_cmp(&a.evaluation.fitness));
    }

    fn record_history(&mut self) {
        self.diagnostics
            .best_fitness_history
            .push(self.incumbent.evaluation.fitness);
        self.diagnostics
            .assignment_ratio_history
            .push(self.incumbent.evaluation.assignment_ratio);
    }

    #[expect(clippy::float_arithmetic, reason = "mean of population fitness")]
    fn mean_fitness(&self) -> f64 {
        if self.population.is_empty() {
            return 0.0;
        }
        let total: f64 = self.population.iter().map(|s| s.evaluation.fitness).sum();
        total / count_f64(self.population.len())
    }
}

/// One [`Assignment`] per vehicle serving at least one cluster, in vehicle
/// order.
fn build_assignments(
    problem: &Problem<'_>,
    genes: &[Option<usize>],
    factors: &[f64],
) -> Vec<Assignment> {
    clusters_by_vehicle(problem, genes)
        .into_iter()
        .enumerate()
        .filter(|(_, served)| !served.is_empty())
        .filter_map(|(vehicle, served)| {
            let vehicle_id = problem.vehicles().get(vehicle)?.id;
            let members: Vec<&Cluster> = served
                .iter()
                .filter_map(|index| problem.clusters().get(*index))
                .collect();
            let relaxation_factor = served
                .iter()
                .filter_map(|index| factors.get(*index).copied())
                .fold(1.0, f64::max);
            Some(Assignment {
                vehicle_id,
                cluster_ids: members.iter().map(|c| c.id).collect(),
                request_ids: members
                    .iter()
                    .copied()
                    .flat_map(Cluster::request_ids)
                    .collect(),
                route: problem.route(vehicle, &served),
                relaxation_factor,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests;
