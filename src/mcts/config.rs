//! Search parameters.

/// Parameters of the [`super::SearchTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Exploration constant `C` of the UCB formula. Higher values favor
    /// rarely visited children.
    pub exploration: f64,
    /// Number of iterations at the start of every search call that pick
    /// columns round-robin instead of using UCB, so that the top of the tree
    /// is seeded breadth-first before the statistics become meaningful.
    pub seeding_threshold: u64,
    /// Seed of the random number generator used for playouts and random
    /// column choices. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exploration: 0.75,
            seeding_threshold: 280,
            seed: None,
        }
    }
}

impl Config {
    /// Builder pattern: set the exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Builder pattern: set the number of seeding iterations.
    #[must_use]
    pub fn with_seeding_threshold(mut self, threshold: u64) -> Self {
        self.seeding_threshold = threshold;
        self
    }

    /// Builder pattern: make the search reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
