use crate::ast::{Compiler, DerivationTree, Evaluator, SampleConfig};
use crate::error::MalformedExpression;
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use thiserror::Error;

/// Compiled trees kept around by default.
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// Sweeps at least this long are evaluated on the rayon pool.
const PARALLEL_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotError {
    #[error("empty expression")]
    EmptyExpression,

    #[error("`{0}` is already plotted")]
    AlreadyPlotted(String),

    #[error("invalid range [{0}, {1}]")]
    InvalidRange(f64, f64),

    #[error(transparent)]
    Malformed(#[from] MalformedExpression),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotConfig {
    pub sampling: SampleConfig,
    pub cache_capacity: NonZeroUsize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            sampling: SampleConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// One plotted function and its samples over the current interval.
#[derive(Debug, Clone)]
pub struct Graph {
    expression: String,
    tree: Arc<DerivationTree>,
    points: Vec<(f64, f64)>,
}

impl Graph {
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn tree(&self) -> &DerivationTree {
        &self.tree
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Points whose value is finite; division and reciprocal poles come back
    /// as `+infinity` and are skipped here.
    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied().filter(|(_, y)| y.is_finite())
    }
}

/// The set of functions being plotted together over a shared interval.
///
/// Every function is sampled when it is added and again whenever the interval
/// or the resolution changes. Compiled trees are memoized by expression text
/// so re-adding a function after [`Plotter::clear`] skips compilation.
pub struct Plotter {
    sampling: SampleConfig,
    graphs: Vec<Graph>,
    cache: LruCache<String, Arc<DerivationTree>>,
}

impl Default for Plotter {
    fn default() -> Self {
        Self::new(PlotConfig::default())
    }
}

impl Plotter {
    pub fn new(config: PlotConfig) -> Self {
        Self {
            sampling: config.sampling,
            graphs: Vec::new(),
            cache: LruCache::new(config.cache_capacity),
        }
    }

    pub fn sampling(&self) -> &SampleConfig {
        &self.sampling
    }

    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Compiles, samples and stores a function.
    ///
    /// The expression is trimmed and lower-cased first; that normalized text
    /// is what duplicate detection and [`Graph::expression`] use.
    pub fn add_function(&mut self, expression: &str) -> Result<&Graph, PlotError> {
        let normalized = expression.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(PlotError::EmptyExpression);
        }
        if self.graphs.iter().any(|g| g.expression == normalized) {
            return Err(PlotError::AlreadyPlotted(normalized));
        }

        let tree = self.compile_cached(&normalized)?;
        let points = sample_tree(&tree, &self.sampling);
        debug!("Plotted {} with {} points", normalized, points.len());

        let index = self.graphs.len();
        self.graphs.push(Graph {
            expression: normalized,
            tree,
            points,
        });
        Ok(&self.graphs[index])
    }

    pub fn remove_function(&mut self, expression: &str) -> Option<Graph> {
        let normalized = expression.trim().to_lowercase();
        let index = self
            .graphs
            .iter()
            .position(|g| g.expression == normalized)?;
        Some(self.graphs.remove(index))
    }

    /// Moves the interval, re-sampling every graph if it changed.
    pub fn set_range(&mut self, x0: f64, x1: f64) -> Result<(), PlotError> {
        if !x0.is_finite() || !x1.is_finite() || x0 > x1 {
            return Err(PlotError::InvalidRange(x0, x1));
        }
        if self.sampling.x0 != x0 || self.sampling.x1 != x1 {
            self.sampling = self.sampling.with_range(x0, x1);
            self.resample();
        }
        Ok(())
    }

    /// Changes the number of points per graph, re-sampling if it changed.
    pub fn set_count(&mut self, count: usize) {
        if self.sampling.count != count {
            self.sampling = self.sampling.with_count(count);
            self.resample();
        }
    }

    /// Drops every graph. Compiled trees stay cached.
    pub fn clear(&mut self) {
        self.graphs.clear();
    }

    fn compile_cached(
        &mut self,
        expression: &str,
    ) -> Result<Arc<DerivationTree>, MalformedExpression> {
        if let Some(tree) = self.cache.get(expression) {
            debug!("Compile cache hit for {}", expression);
            return Ok(Arc::clone(tree));
        }
        debug!("Compile cache miss for {}", expression);
        let tree = Arc::new(Compiler::compile_expression(expression)?);
        self.cache.put(expression.to_string(), Arc::clone(&tree));
        Ok(tree)
    }

    fn resample(&mut self) {
        debug!(
            "Re-sampling {} graphs over [{}, {}]",
            self.graphs.len(),
            self.sampling.x0,
            self.sampling.x1
        );
        for graph in &mut self.graphs {
            graph.points = sample_tree(&graph.tree, &self.sampling);
        }
    }
}

fn sample_tree(tree: &DerivationTree, config: &SampleConfig) -> Vec<(f64, f64)> {
    let evaluator = Evaluator::new(tree);
    if config.count >= PARALLEL_THRESHOLD {
        evaluator.par_sample_with(config)
    } else {
        evaluator.sample_with(config)
    }
}
