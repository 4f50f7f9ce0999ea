use thiserror::Error;

/// Number of workers used by the default strategy.
pub const DEFAULT_NUM_WORKERS: usize = 8;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how row stripes are executed.
///
/// Rows are always assigned statically: with `n` workers, worker `id` owns
/// rows `id, id + n, id + 2n, ...`. The strategy only decides where those
/// stripes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Run a single stripe on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run `n` stripes on a local thread pool with `n` threads.
    ///
    /// The pool is built for the call and joined before returning.
    Fixed(usize),

    /// Run one stripe per thread of the global Rayon thread pool.
    GlobalPool,
}

// `#[default]` only accepts unit variants.
impl Default for ExecutionStrategy {
    fn default() -> Self {
        ExecutionStrategy::Fixed(DEFAULT_NUM_WORKERS)
    }
}

impl ExecutionStrategy {
    /// Number of stripes the rows are split into.
    ///
    /// # Errors
    ///
    /// Returns [`ParallelError::InvalidThreadCount`] for `Fixed(0)`.
    pub fn num_workers(&self) -> Result<usize, ParallelError> {
        match self {
            ExecutionStrategy::Serial => Ok(1),
            ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
            ExecutionStrategy::Fixed(n) => Ok(*n),
            ExecutionStrategy::GlobalPool => Ok(rayon::current_num_threads()),
        }
    }
}

/// A set of rows owned by a single worker, tagged with their row index.
pub type RowStripe<'a, T> = Vec<(usize, &'a mut [T])>;

/// Distribute rows round-robin over `num_stripes` stripes.
///
/// Row `i` goes to stripe `i % num_stripes`. Stripes keep their rows in
/// ascending order.
///
/// PRECONDITION: `num_stripes > 0`.
pub fn stripe_rows<'a, T>(
    rows: impl Iterator<Item = &'a mut [T]>,
    num_stripes: usize,
) -> Vec<RowStripe<'a, T>> {
    let mut stripes: Vec<RowStripe<'a, T>> = (0..num_stripes).map(|_| Vec::new()).collect();
    for (idx, row) in rows.enumerate() {
        stripes[idx % num_stripes].push((idx, row));
    }
    stripes
}

/// Apply a function to every row, with rows striped across workers.
///
/// Each stripe is processed by exactly one worker, so writes never overlap
/// and no locking is needed. The call returns once every stripe is done.
///
/// # Arguments
///
/// * `rows` - The rows to process, typically the logical rows of an image.
/// * `strategy` - The execution strategy.
/// * `f` - Called with the row index and the mutable row.
pub fn par_iter_row_stripes<'a, T, F>(
    rows: impl Iterator<Item = &'a mut [T]>,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send + 'a,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    let num_workers = strategy.num_workers()?;
    let stripes = stripe_rows(rows, num_workers);

    match strategy {
        ExecutionStrategy::Serial => {
            stripes
                .into_iter()
                .for_each(|stripe| process_stripe(stripe, &f));
        }
        ExecutionStrategy::Fixed(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.scope(|s| {
                for stripe in stripes {
                    let f = &f;
                    s.spawn(move |_| process_stripe(stripe, f));
                }
            });
        }
        ExecutionStrategy::GlobalPool => {
            rayon::scope(|s| {
                for stripe in stripes {
                    let f = &f;
                    s.spawn(move |_| process_stripe(stripe, f));
                }
            });
        }
    }

    Ok(())
}

fn process_stripe<T, F>(stripe: RowStripe<'_, T>, f: &F)
where
    F: Fn(usize, &mut [T]),
{
    for (idx, row) in stripe {
        f(idx, row);
    }
}
