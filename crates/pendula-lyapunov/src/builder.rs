//! Chaos-map construction.
//!
//! A sweep is a [`SweepJob`]: a cursor over the cells of a [`SweepGrid`] with
//! its own copy of the parameters taken when the sweep was requested. Work
//! comes back as [`SweepChunk`]s tagged with the generation of the sweep that
//! produced them; the [`ChaosMapBuilder`] only accepts chunks from its
//! current generation, so a superseded or cancelled sweep can finish
//! harmlessly without writing into the new one.
//!
//! The builder can be driven cooperatively (`tick` computes one bounded
//! chunk and returns), by a host that farms cloned jobs out to its own
//! workers and feeds the chunks back through `accept`, or in one blocking
//! call with [`ChaosMapBuilder::compute_parallel`], which partitions rows
//! across the rayon pool.

use std::fmt;

use pendula_model::{ChaosMapConfig, Params};
use rayon::prelude::*;

use crate::result::cell_value;
use crate::{ChaosMapResult, ChaosMapSignature, LyapunovEstimator, SweepGrid};

/// Ticket for one requested sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SweepHandle {
    generation: u64,
}

impl SweepHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for SweepHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sweep #{}", self.generation)
    }
}

/// A contiguous run of computed cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepChunk {
    pub generation: u64,
    /// Row-major index of the first cell.
    pub start: usize,
    /// Clamped exponents for cells `start..start + values.len()`.
    pub values: Vec<f64>,
}

/// Everything needed to compute the cells of one sweep.
#[derive(Debug, Clone)]
pub struct SweepJob {
    generation: u64,
    grid: SweepGrid,
    params: Params,
    estimator: LyapunovEstimator,
    cursor: usize,
}

impl SweepJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn grid(&self) -> &SweepGrid {
        &self.grid
    }

    /// Cells not yet handed out by this job.
    pub fn remaining(&self) -> usize {
        self.grid.cell_count() - self.cursor
    }

    /// Compute the next `max` cells (fewer at the end), or `None` when done.
    pub fn next_chunk(&mut self, max: usize) -> Option<SweepChunk> {
        let total = self.grid.cell_count();
        if self.cursor >= total || max == 0 {
            return None;
        }
        let start = self.cursor;
        let end = (start + max).min(total);
        let values = (start..end)
            .map(|index| {
                let (col, row) = self.grid.coords(index);
                let params = self.grid.cell_params(&self.params, col, row);
                cell_value(self.estimator.estimate(&params))
            })
            .collect();
        self.cursor = end;
        Some(SweepChunk {
            generation: self.generation,
            start,
            values,
        })
    }
}

struct ActiveSweep {
    job: SweepJob,
    signature: ChaosMapSignature,
    values: Vec<f64>,
    filled: Vec<bool>,
    computed: usize,
}

/// Incremental, generation-gated chaos-map builder.
pub struct ChaosMapBuilder {
    estimator: LyapunovEstimator,
    chunk_size: usize,
    generation: u64,
    active: Option<ActiveSweep>,
    latest: Option<(u64, ChaosMapResult)>,
}

impl ChaosMapBuilder {
    pub fn new(config: &ChaosMapConfig) -> Self {
        Self {
            estimator: LyapunovEstimator::from(config),
            chunk_size: config.chunk_size.max(1),
            generation: 0,
            active: None,
            latest: None,
        }
    }

    pub fn estimator(&self) -> &LyapunovEstimator {
        &self.estimator
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Generation of the most recently started sweep.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Signature a sweep of `grid` over `params` would carry.
    pub fn signature(&self, grid: &SweepGrid, params: &Params) -> ChaosMapSignature {
        ChaosMapSignature::compute(grid, params, &self.estimator)
    }

    /// Start a sweep, or reuse the finished or running one with the same
    /// signature. Any other running sweep is superseded.
    pub fn request(&mut self, grid: SweepGrid, params: &Params) -> SweepHandle {
        let signature = self.signature(&grid, params);

        if let Some(handle) = self.reuse_latest(signature) {
            log::debug!("chaos map reused for {handle} ({})", signature.short());
            return handle;
        }
        if let Some(active) = &self.active {
            if active.signature == signature {
                return SweepHandle {
                    generation: active.job.generation,
                };
            }
        }

        let handle = self.next_generation();
        log::info!(
            "chaos map {handle} started: {}x{} over {} / {} ({})",
            grid.resolution(),
            grid.resolution(),
            grid.axis_x(),
            grid.axis_y(),
            signature.short()
        );
        let cells = grid.cell_count();
        self.active = Some(ActiveSweep {
            job: SweepJob {
                generation: handle.generation,
                grid,
                params: *params,
                estimator: self.estimator,
                cursor: 0,
            },
            signature,
            values: vec![0.0; cells],
            filled: vec![false; cells],
            computed: 0,
        });
        handle
    }

    /// Handle of the finished map if it carries `signature`. A running sweep
    /// for anything else is superseded so it can never replace that map.
    fn reuse_latest(&mut self, signature: ChaosMapSignature) -> Option<SweepHandle> {
        let generation = match &self.latest {
            Some((generation, result)) if result.signature() == signature => *generation,
            _ => return None,
        };
        if self
            .active
            .as_ref()
            .is_some_and(|active| active.signature != signature)
        {
            self.supersede_active();
            self.generation += 1;
        }
        Some(SweepHandle { generation })
    }

    fn supersede_active(&mut self) {
        if let Some(active) = self.active.take() {
            log::debug!(
                "chaos map sweep #{} superseded at {}/{} cells",
                active.job.generation,
                active.computed,
                active.job.grid.cell_count()
            );
        }
    }

    fn next_generation(&mut self) -> SweepHandle {
        self.supersede_active();
        self.generation += 1;
        SweepHandle {
            generation: self.generation,
        }
    }

    /// Compute one chunk of the running sweep. Returns true while work remains.
    pub fn tick(&mut self) -> bool {
        let chunk_size = self.chunk_size;
        let chunk = match self.active.as_mut() {
            Some(active) => active.job.next_chunk(chunk_size),
            None => return false,
        };
        if let Some(chunk) = chunk {
            self.accept(chunk);
        }
        self.active.is_some()
    }

    /// Run the current sweep to completion on this thread.
    pub fn run_to_completion(&mut self) {
        while self.tick() {}
    }

    /// A copy of the running sweep's job, for hosts that compute chunks
    /// elsewhere and return them through [`accept`](Self::accept).
    pub fn active_job(&self) -> Option<SweepJob> {
        self.active.as_ref().map(|active| active.job.clone())
    }

    /// Store a computed chunk. Chunks from any other generation, or that do
    /// not fit the grid, are dropped and `false` is returned.
    pub fn accept(&mut self, chunk: SweepChunk) -> bool {
        let Some(active) = self.active.as_mut() else {
            log::debug!("discarding chunk from sweep #{}: no sweep running", chunk.generation);
            return false;
        };
        if chunk.generation != active.job.generation {
            log::debug!(
                "discarding chunk from sweep #{} (current #{})",
                chunk.generation,
                active.job.generation
            );
            return false;
        }
        let end = chunk.start + chunk.values.len();
        if end > active.values.len() {
            log::debug!("discarding chunk {}..{end}: outside the grid", chunk.start);
            return false;
        }

        for (offset, value) in chunk.values.into_iter().enumerate() {
            let index = chunk.start + offset;
            active.values[index] = cell_value(value);
            if !active.filled[index] {
                active.filled[index] = true;
                active.computed += 1;
            }
        }

        if active.computed == active.values.len() {
            self.finish();
        }
        true
    }

    fn finish(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        let generation = active.job.generation;
        let result = ChaosMapResult::new(
            active.job.grid,
            active.job.params,
            active.signature,
            active.values,
        );
        log::info!(
            "chaos map sweep #{generation} finished: max exponent {:.4}",
            result.max_value()
        );
        self.latest = Some((generation, result));
    }

    /// Fraction of cells computed, `None` for a handle that was superseded
    /// or cancelled.
    pub fn progress(&self, handle: SweepHandle) -> Option<f64> {
        if let Some(active) = &self.active {
            if active.job.generation == handle.generation {
                return Some(active.computed as f64 / active.values.len() as f64);
            }
        }
        match &self.latest {
            Some((generation, _)) if *generation == handle.generation => Some(1.0),
            _ => None,
        }
    }

    /// The finished map for `handle`, once every cell is in.
    pub fn result(&self, handle: SweepHandle) -> Option<&ChaosMapResult> {
        match &self.latest {
            Some((generation, result)) if *generation == handle.generation => Some(result),
            _ => None,
        }
    }

    /// Stop the sweep behind `handle`. Chunks still in flight are discarded
    /// when they arrive. Returns false if it was not running.
    pub fn cancel(&mut self, handle: SweepHandle) -> bool {
        let running = self
            .active
            .as_ref()
            .is_some_and(|active| active.job.generation == handle.generation);
        if running {
            log::debug!("chaos map {handle} cancelled");
            self.active = None;
            self.generation += 1;
        }
        running
    }

    /// True while a sweep is running.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Most recently finished map, whatever its signature.
    pub fn latest(&self) -> Option<&ChaosMapResult> {
        self.latest.as_ref().map(|(_, result)| result)
    }

    /// Forget the finished map so the next request recomputes.
    pub fn discard(&mut self) {
        self.latest = None;
    }

    /// Compute a whole map on the rayon pool and publish it, superseding any
    /// running sweep. A finished map with the same signature is reused.
    pub fn compute_parallel(&mut self, grid: SweepGrid, params: &Params) -> SweepHandle {
        let signature = self.signature(&grid, params);
        if let Some(handle) = self.reuse_latest(signature) {
            return handle;
        }

        let handle = self.next_generation();
        log::info!(
            "chaos map {handle} computing in parallel: {}x{} over {} / {}",
            grid.resolution(),
            grid.resolution(),
            grid.axis_x(),
            grid.axis_y()
        );
        let values = sweep_parallel(&grid, params, &self.estimator);
        let result = ChaosMapResult::new(grid, *params, signature, values);
        log::info!(
            "chaos map {handle} finished: max exponent {:.4}",
            result.max_value()
        );
        self.latest = Some((handle.generation, result));
        handle
    }
}

/// Compute every cell of `grid`, one rayon task per row.
///
/// Rows write disjoint slices of the output; the vector is returned only
/// after all of them have joined.
pub fn sweep_parallel(
    grid: &SweepGrid,
    params: &Params,
    estimator: &LyapunovEstimator,
) -> Vec<f64> {
    let mut values = vec![0.0; grid.cell_count()];
    values
        .par_chunks_mut(grid.resolution())
        .enumerate()
        .for_each(|(row, out)| {
            for (col, slot) in out.iter_mut().enumerate() {
                let cell = grid.cell_params(params, col, row);
                *slot = cell_value(estimator.estimate(&cell));
            }
        });
    values
}
