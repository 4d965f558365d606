// Brute-force search for a trial net whose reduction factors a target number. Every index of the
// enumeration is built, reduced and probed; the smallest index whose net yields a valid factor
// pair wins.

mod enumerate;
mod probe;

pub use self::enumerate::*;
pub use self::probe::*;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use tracing::{debug, info};

use crate::error::NetError;
use crate::inet::*;

// Indices a parallel worker claims at a time.
const CHUNK: usize = 100;

// Reports search progress: the index just examined and whether it is a solution.
pub type Progress<'a> = &'a (dyn Fn(usize, bool) + Sync);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
  pub target: u64,
  pub max_nodes: usize,
  pub gas_limit: u64,
  pub max_search: usize,
  pub progress_chunk: usize,
  pub workers: usize,
}

impl Default for SearchConfig {
  fn default() -> Self {
    SearchConfig {
      target: 0,
      max_nodes: 100,
      gas_limit: 100_000,
      max_search: 1_000_000,
      progress_chunk: 1000,
      workers: 1,
    }
  }
}

impl SearchConfig {
  pub fn new(target: u64) -> Self {
    SearchConfig { target, ..SearchConfig::default() }
  }

  pub fn validate(&self) -> Result<(), NetError> {
    if self.target <= 1 {
      return Err(NetError::InvalidTarget { target: self.target });
    }
    Ok(())
  }
}

// Builds, reduces and probes trial net `index` in a net owned by the caller.
pub fn check_index(index: usize, target: u64, inet: &mut INet) -> bool {
  inet.probe.target = target;
  if build_net(index, inet).is_err() {
    return false;
  }
  reduce_with(inet, &FactorProbe);
  has_valid_factor(inet, target)
}

// Rebuilds and reduces the net for a known solution index, for display.
pub fn solution_net(config: &SearchConfig, index: usize) -> Result<INet, NetError> {
  let mut inet = new_inet(config.max_nodes, config.gas_limit).with_target(config.target);
  build_net(index, &mut inet)?;
  reduce_with(&mut inet, &FactorProbe);
  Ok(inet)
}

// Walks the enumeration from `walk.current_index` on a single net. Indices whose net does not fit
// the arena are skipped. Returns the first solving index, leaving `walk` just past it.
pub fn search_factor(walk: &mut Enumerator, config: &SearchConfig, progress: Option<Progress>) -> Option<usize> {
  if config.validate().is_err() {
    return None;
  }
  let mut inet = new_inet(walk.max_nodes, config.gas_limit).with_target(config.target);
  let chunk = config.progress_chunk.max(1);
  let mut current_chunk = walk.current_index / chunk;
  while walk.current_index < config.max_search {
    let index = match walk.next(&mut inet) {
      Ok(index) => index,
      Err(_) => continue,
    };
    reduce_with(&mut inet, &FactorProbe);
    if has_valid_factor(&inet, config.target) {
      info!(index, a = inet.probe.factor_a, b = inet.probe.factor_b, "solution found");
      if let Some(report) = progress {
        report(index, true);
      }
      return Some(index);
    }
    if walk.current_index / chunk > current_chunk {
      current_chunk = walk.current_index / chunk;
      if let Some(report) = progress {
        report(index, false);
      }
    }
  }
  None
}

// Splits the enumeration over `config.workers` threads, each with its own net. Workers claim
// chunks of indices in increasing order and share only a found flag and the smallest solving
// index so far, so the result is the same smallest index `search_factor` would return. A net that
// is already reducing is never interrupted. Only worker 0 reports progress.
pub fn search_factor_parallel(config: &SearchConfig, progress: Option<Progress>) -> Option<usize> {
  if config.validate().is_err() {
    return None;
  }
  let workers = config.workers.max(1);
  let next = AtomicUsize::new(0);
  let found = AtomicBool::new(false);
  let best = AtomicUsize::new(usize::MAX);
  let chunk = config.progress_chunk.max(1);

  thread::scope(|scope| {
    for worker in 0..workers {
      let (next, found, best) = (&next, &found, &best);
      scope.spawn(move || {
        let mut inet = new_inet(config.max_nodes, config.gas_limit);
        let mut local_chunk = 0;
        loop {
          let start = next.fetch_add(CHUNK, Ordering::Relaxed);
          if start >= config.max_search || start > best.load(Ordering::Acquire) {
            break;
          }
          for index in start..(start + CHUNK).min(config.max_search) {
            if found.load(Ordering::Acquire) && index > best.load(Ordering::Acquire) {
              break;
            }
            if check_index(index, config.target, &mut inet) {
              found.store(true, Ordering::Release);
              best.fetch_min(index, Ordering::AcqRel);
              debug!(worker, index, "solution found");
              if let (0, Some(report)) = (worker, progress) {
                report(index, true);
              }
            } else if worker == 0 && index / chunk > local_chunk {
              local_chunk = index / chunk;
              if let Some(report) = progress {
                report(index, false);
              }
            }
          }
        }
      });
    }
  });

  match best.into_inner() {
    usize::MAX => None,
    index => Some(index),
  }
}
