// The reduction driver: drains the redex queue through the rewrite rules until the net has no
// active pairs left or the gas limit is reached.

use tracing::debug;

use super::core::*;
use super::rules::{rewrite, Outcome, Rule};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
  // No active pair was left before the gas ran out.
  Reduced,
  // The run spent its whole gas budget. The net may still hold active pairs.
  OutOfGas,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
  pub rules: u64,
  pub annis: u64,
  pub dupls: u64,
  pub erases: u64,
  pub aborts: u64,
  pub rescans: u64,
}

impl Stats {
  fn record(&mut self, outcome: Outcome) {
    self.rules += 1;
    match outcome {
      Outcome::Applied(Rule::DeltaDelta) | Outcome::Applied(Rule::GammaGamma) => self.annis += 1,
      Outcome::Applied(Rule::DeltaGamma) => self.dupls += 1,
      Outcome::Applied(Rule::Erase) => self.erases += 1,
      Outcome::Aborted(_) => self.aborts += 1,
    }
  }
}

// A check run on the net once a reduction is over. Inspections may only touch the net's probe.
pub trait Inspect {
  fn inspect(&self, inet: &mut INet);
}

impl<F: Fn(&mut INet)> Inspect for F {
  fn inspect(&self, inet: &mut INet) {
    self(inet)
  }
}

// Reduces the net until it has no active pairs or `gas_limit` rewrites were performed.
//
// Every dispatched pair costs one unit of gas, including a commutation aborted for lack of space.
// Such a pair stays in the net and keeps being retried, so a full arena ends in `OutOfGas`.
pub fn reduce(inet: &mut INet) -> Status {
  inet.gas_used = 0;
  inet.stats = Stats::default();
  inet.queue.dropped = 0;
  inet.queue.stale = 0;
  inet.queue.rescan(&inet.nodes);
  inet.stats.rescans += 1;
  while inet.gas_used < inet.gas_limit {
    let (x, y) = match inet.queue.pop(&inet.nodes) {
      Some(pair) => pair,
      None => {
        inet.queue.rescan(&inet.nodes);
        inet.stats.rescans += 1;
        if inet.queue.is_empty() {
          break;
        }
        continue;
      }
    };
    let outcome = match rewrite(inet, x, y) {
      Some(outcome) => outcome,
      None => continue,
    };
    inet.gas_used += 1;
    inet.stats.record(outcome);
    inet.queue.collect(&inet.nodes);
  }
  let status = if inet.gas_used < inet.gas_limit { Status::Reduced } else { Status::OutOfGas };
  debug!(
    ?status,
    gas_used = inet.gas_used,
    gas_limit = inet.gas_limit,
    stats = ?inet.stats,
    stale = inet.queue.stale,
    dropped = inet.queue.dropped,
    "reduction finished"
  );
  status
}

// Reduces the net, then runs an inspection over the result.
pub fn reduce_with(inet: &mut INet, inspector: &dyn Inspect) -> Status {
  let status = reduce(inet);
  inspector.inspect(inet);
  status
}
