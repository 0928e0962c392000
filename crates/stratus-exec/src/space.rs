//! The execution space: a worker pool plus completion tracking.

use std::sync::{Condvar, Mutex, PoisonError};

use rayon::prelude::*;

use crate::config::ExecConfig;
use crate::error::ExecError;
use crate::policy::{RangePolicy, TeamPolicy};
use crate::team::TeamMember;

/// Counts kernels in flight so [`ExecSpace::fence`] can wait for them.
#[derive(Default)]
struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

impl InFlight {
    fn enter(&self) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn leave(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count -= 1;
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        while *count > 0 {
            count = self
                .idle
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Decrements the in-flight count even if the kernel panics.
struct Launch<'a>(&'a InFlight);

impl<'a> Launch<'a> {
    fn start(inflight: &'a InFlight) -> Self {
        inflight.enter();
        Launch(inflight)
    }
}

impl Drop for Launch<'_> {
    fn drop(&mut self) {
        self.0.leave();
    }
}

/// A pool of workers that runs data-parallel kernels.
///
/// # Examples
///
/// ```
/// use stratus_exec::{ExecConfig, ExecSpace, TeamPolicy};
///
/// let exec = ExecSpace::new(ExecConfig { num_threads: Some(2) }).unwrap();
/// // 3 columns of 4 levels each.
/// let mut out = vec![0.0f64; 12];
/// exec.team_parallel_for("ramp", TeamPolicy::default_for(3, 4), &mut out, |team, col| {
///     let icol = team.league_rank();
///     team.team_vector_range(col.len(), |k| col[k] = (10 * icol + k) as f64);
///     team.team_barrier();
/// })
/// .unwrap();
/// exec.fence();
/// assert_eq!(out[9], 21.0);
/// ```
pub struct ExecSpace {
    pool: rayon::ThreadPool,
    config: ExecConfig,
    inflight: InFlight,
}

impl ExecSpace {
    /// Build a space with its own worker pool.
    pub fn new(config: ExecConfig) -> Result<Self, ExecError> {
        config.validate()?;
        let threads = config.resolved_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("stratus-exec-{i}"))
            .build()
            .map_err(|e| ExecError::PoolBuild {
                reason: e.to_string(),
            })?;
        log::debug!("execution space ready with {threads} worker(s)");
        Ok(Self {
            pool,
            config,
            inflight: InFlight::default(),
        })
    }

    /// Number of workers.
    pub fn concurrency(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// The configuration the space was built with.
    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Run `f(i)` for every `i` in the policy's range.
    ///
    /// Iterations may run in any order and on any worker.
    pub fn parallel_for<F>(&self, label: &str, policy: RangePolicy, f: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        log::trace!("parallel_for '{label}': {} iterations", policy.len());
        let _launch = Launch::start(&self.inflight);
        self.pool
            .install(|| policy.range().into_par_iter().for_each(&f));
    }

    /// Sum `f(i)` over the policy's range.
    pub fn parallel_reduce_sum<F>(&self, label: &str, policy: RangePolicy, f: F) -> f64
    where
        F: Fn(usize) -> f64 + Send + Sync,
    {
        log::trace!("parallel_reduce '{label}': {} iterations", policy.len());
        let _launch = Launch::start(&self.inflight);
        self.pool
            .install(|| policy.range().into_par_iter().map(&f).sum())
    }

    /// Run `f(team, chunk)` once per outer unit.
    ///
    /// `out` is split into `league_size` equal, disjoint chunks; unit `r`
    /// receives chunk `r`. Units run concurrently and may not observe each
    /// other's chunks. Fails with [`ExecError::ChunkMismatch`] if `out`
    /// does not split evenly.
    pub fn team_parallel_for<T, F>(
        &self,
        label: &str,
        policy: TeamPolicy,
        out: &mut [T],
        f: F,
    ) -> Result<(), ExecError>
    where
        T: Send,
        F: Fn(&TeamMember, &mut [T]) + Send + Sync,
    {
        let league = policy.league_size();
        if league == 0 {
            if out.is_empty() {
                return Ok(());
            }
            return Err(self.chunk_mismatch(label, policy, out.len()));
        }
        if out.len() % league != 0 {
            return Err(self.chunk_mismatch(label, policy, out.len()));
        }
        let chunk = out.len() / league;
        log::trace!(
            "team_parallel_for '{label}': league {league}, team {}, chunk {chunk}",
            policy.team_size()
        );
        let _launch = Launch::start(&self.inflight);
        let team_size = policy.team_size();
        self.pool.install(|| {
            if chunk == 0 {
                (0..league).into_par_iter().for_each(|rank| {
                    f(&TeamMember::new(rank, league, team_size), &mut []);
                });
            } else {
                out.par_chunks_mut(chunk)
                    .enumerate()
                    .for_each(|(rank, slice)| {
                        f(&TeamMember::new(rank, league, team_size), slice);
                    });
            }
        });
        Ok(())
    }

    /// Block until every kernel launched on this space has completed.
    pub fn fence(&self) {
        self.inflight.wait_idle();
        log::trace!("fence");
    }

    fn chunk_mismatch(&self, label: &str, policy: TeamPolicy, len: usize) -> ExecError {
        ExecError::ChunkMismatch {
            label: label.to_string(),
            league_size: policy.league_size(),
            len,
        }
    }
}

impl std::fmt::Debug for ExecSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecSpace")
            .field("threads", &self.concurrency())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn exec(n: usize) -> ExecSpace {
        ExecSpace::new(ExecConfig {
            num_threads: Some(n),
        })
        .unwrap()
    }

    #[test]
    fn zero_threads_rejected() {
        assert_eq!(
            ExecSpace::new(ExecConfig {
                num_threads: Some(0)
            })
            .unwrap_err(),
            ExecError::InvalidThreadCount
        );
    }

    #[test]
    fn parallel_for_visits_range() {
        let e = exec(3);
        let hits = AtomicUsize::new(0);
        e.parallel_for("count", RangePolicy::new(10, 110), |i| {
            assert!((10..110).contains(&i));
            hits.fetch_add(1, Ordering::Relaxed);
        });
        e.fence();
        assert_eq!(hits.load(Ordering::Relaxed), 100);
    }

    #[test]
    fn reduce_matches_serial_sum() {
        let e = exec(4);
        let s = e.parallel_reduce_sum("sum", RangePolicy::upto(101), |i| i as f64);
        assert_eq!(s, 5050.0);
    }

    #[test]
    fn uneven_output_rejected() {
        let e = exec(1);
        let mut out = vec![0u8; 7];
        let err = e
            .team_parallel_for("bad", TeamPolicy::new(2, 1), &mut out, |_, _| {})
            .unwrap_err();
        assert!(matches!(err, ExecError::ChunkMismatch { len: 7, .. }));
    }

    #[test]
    fn empty_league() {
        let e = exec(1);
        let mut out: Vec<f64> = Vec::new();
        e.team_parallel_for("none", TeamPolicy::new(0, 1), &mut out, |_, _| {
            panic!("no units to run")
        })
        .unwrap();
        let mut one = vec![0.0];
        assert!(e
            .team_parallel_for("none", TeamPolicy::new(0, 1), &mut one, |_, _| {})
            .is_err());
    }

    #[test]
    fn fence_waits_for_kernels_on_other_threads() {
        let e = Arc::new(exec(2));
        let done = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let e = Arc::clone(&e);
                let done = Arc::clone(&done);
                std::thread::spawn(move || {
                    e.parallel_for("work", RangePolicy::upto(64), |_| {
                        std::hint::black_box(0);
                    });
                    done.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        e.fence();
        assert_eq!(done.load(Ordering::SeqCst), 4);
    }

    proptest! {
        #[test]
        fn every_unit_gets_its_own_chunk(league in 1usize..20, chunk in 0usize..9, team in 1usize..5) {
            let e = exec(3);
            let mut out = vec![usize::MAX; league * chunk];
            let units = AtomicUsize::new(0);
            e.team_parallel_for("tag", TeamPolicy::new(league, team), &mut out, |m, slice| {
                units.fetch_add(1, Ordering::Relaxed);
                assert_eq!(m.team_size(), team);
                m.team_vector_range(slice.len(), |k| slice[k] = m.league_rank());
                m.team_barrier();
            }).unwrap();
            e.fence();
            prop_assert_eq!(units.load(Ordering::Relaxed), league);
            for (i, v) in out.iter().enumerate() {
                prop_assert_eq!(*v, i / chunk.max(1));
            }
        }
    }
}
