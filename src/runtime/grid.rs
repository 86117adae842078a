//! Compute grid: runs a kernel once per flat thread id

use crate::error::{Error, Result};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Default minimum number of thread ids one rayon task processes
pub const DEFAULT_MIN_LEN: usize = 4096;

/// Grid execution configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridConfig {
    /// Minimum number of consecutive thread ids per parallel task
    pub min_len: usize,
    /// Worker count for a dedicated thread pool; `None` uses rayon's global pool
    pub num_threads: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_LEN,
            num_threads: None,
        }
    }
}

impl GridConfig {
    /// Set the minimum number of thread ids per parallel task
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Run launches on a dedicated pool of `num_threads` workers
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }
}

/// Data-parallel grid of independent threads
///
/// A launch invokes the kernel for every thread id in `[0, threads)` with no
/// ordering guarantee and no synchronisation between threads. The launch
/// returns once every thread has finished; a panic in any thread propagates
/// to the caller.
///
/// With the `rayon` feature disabled, threads run sequentially in id order.
#[derive(Clone, Debug)]
pub struct Grid {
    config: GridConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            config: GridConfig::default(),
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }
}

impl Grid {
    /// Create a grid from `config`
    ///
    /// Builds a dedicated thread pool when `config.num_threads` is set.
    pub fn new(config: GridConfig) -> Result<Self> {
        if config.min_len == 0 {
            return Err(Error::invalid_argument("min_len", "must be at least 1"));
        }
        if config.num_threads == Some(0) {
            return Err(Error::invalid_argument("num_threads", "must be at least 1"));
        }

        #[cfg(feature = "rayon")]
        let pool = match config.num_threads {
            Some(n) => Some(Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("ndscatter-grid-{i}"))
                    .build()
                    .map_err(|e| Error::Backend(e.to_string()))?,
            )),
            None => None,
        };

        Ok(Self {
            config,
            #[cfg(feature = "rayon")]
            pool,
        })
    }

    /// Configuration this grid was built with
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Launch `kernel` once for every thread id in `[0, threads)`
    pub fn dispatch<F>(&self, threads: u32, kernel: F)
    where
        F: Fn(u32) + Sync + Send,
    {
        #[cfg(feature = "rayon")]
        {
            let min_len = self.config.min_len;
            self.install(|| {
                (0..threads)
                    .into_par_iter()
                    .with_min_len(min_len)
                    .for_each(&kernel)
            });
        }

        #[cfg(not(feature = "rayon"))]
        (0..threads).for_each(kernel);
    }

    /// Launch `kernel` once per slot of `out`, storing each thread's result
    ///
    /// Thread `i` owns `out[i]` exclusively. `out.len()` must fit in `u32`.
    pub fn dispatch_map<T, F>(&self, out: &mut [T], kernel: F)
    where
        T: Send,
        F: Fn(u32) -> T + Sync + Send,
    {
        debug_assert!(u32::try_from(out.len()).is_ok());

        #[cfg(feature = "rayon")]
        {
            let min_len = self.config.min_len;
            self.install(|| {
                out.par_iter_mut()
                    .enumerate()
                    .with_min_len(min_len)
                    .for_each(|(tid, slot)| *slot = kernel(tid as u32))
            });
        }

        #[cfg(not(feature = "rayon"))]
        for (tid, slot) in out.iter_mut().enumerate() {
            *slot = kernel(tid as u32);
        }
    }

    #[cfg(feature = "rayon")]
    fn install<OP>(&self, op: OP)
    where
        OP: FnOnce() + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}
