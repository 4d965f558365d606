// The redex queue: a bounded ring of node pairs believed to be joined principal-to-principal.
// Entries are only candidates. Rewrites can consume or rewire either node after a pair was queued,
// so every pair is checked again when it is popped.

use tracing::trace;

use super::core::{addr, slot, port, Node, NodeId, MAIN};

pub const REDEX_QUEUE_CAPACITY: usize = 1024;

#[derive(Clone, Debug)]
pub struct RedexQueue {
  ring: Vec<(NodeId, NodeId)>,
  start: usize,
  len: usize,
  // Pairs rejected because the ring was full.
  pub dropped: u64,
  // Pairs discarded at pop time because they were no longer active pairs.
  pub stale: u64,
}

impl Default for RedexQueue {
  fn default() -> Self {
    RedexQueue::with_capacity(REDEX_QUEUE_CAPACITY)
  }
}

// Checks that both nodes are active and their principal ports point at each other.
pub fn is_redex(nodes: &[Node], a: NodeId, b: NodeId) -> bool {
  match (nodes.get(a as usize), nodes.get(b as usize)) {
    (Some(x), Some(y)) => {
      x.active && y.active && x.ports[0] == Some(port(b, MAIN)) && y.ports[0] == Some(port(a, MAIN))
    }
    _ => false,
  }
}

impl RedexQueue {
  pub fn with_capacity(capacity: usize) -> Self {
    RedexQueue {
      ring: vec![(0, 0); capacity.max(1)],
      start: 0,
      len: 0,
      dropped: 0,
      stale: 0,
    }
  }

  pub fn capacity(&self) -> usize {
    self.ring.len()
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn clear(&mut self) {
    self.start = 0;
    self.len = 0;
  }

  // Queues a pair if it currently is an active pair. A full ring drops the pair; the next full
  // rescan finds it again.
  pub fn push(&mut self, nodes: &[Node], a: NodeId, b: NodeId) -> bool {
    if !is_redex(nodes, a, b) {
      return false;
    }
    if self.len >= self.ring.len() {
      self.dropped += 1;
      trace!(a, b, "redex queue full, dropping pair");
      return false;
    }
    let pos = (self.start + self.len) % self.ring.len();
    self.ring[pos] = (a, b);
    self.len += 1;
    true
  }

  // Pops the oldest candidate. A candidate that stopped being an active pair is discarded and
  // reported as None, the same as an empty queue.
  pub fn pop(&mut self, nodes: &[Node]) -> Option<(NodeId, NodeId)> {
    if self.len == 0 {
      return None;
    }
    let (a, b) = self.ring[self.start];
    self.start = (self.start + 1) % self.ring.len();
    self.len -= 1;
    if is_redex(nodes, a, b) {
      Some((a, b))
    } else {
      self.stale += 1;
      trace!(a, b, "stale redex");
      None
    }
  }

  // Queues every active pair in the net. Each pair is visited once, from its lower-indexed node.
  pub fn collect(&mut self, nodes: &[Node]) {
    for (i, node) in nodes.iter().enumerate() {
      if !node.active {
        continue;
      }
      if let Some(p) = node.ports[0] {
        let other = addr(p);
        if other as usize > i && slot(p) == MAIN && nodes[other as usize].active {
          self.push(nodes, i as NodeId, other);
        }
      }
    }
  }

  // Rebuilds the queue from scratch.
  pub fn rescan(&mut self, nodes: &[Node]) {
    self.clear();
    self.collect(nodes);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::inet::core::*;

  fn pairs(count: u32) -> INet {
    let mut inet = new_inet(count as usize * 2, 10);
    for _ in 0..count {
      let a = new_node(&mut inet, NodeKind::Delta).unwrap();
      let b = new_node(&mut inet, NodeKind::Gamma).unwrap();
      connect(&mut inet, a, 0, b, 0);
    }
    inet
  }

  #[test]
  fn pops_in_fifo_order() {
    let inet = pairs(3);
    let mut queue = RedexQueue::with_capacity(8);
    queue.rescan(nodes(&inet));
    assert_eq!(queue.pop(nodes(&inet)), Some((0, 1)));
    assert_eq!(queue.pop(nodes(&inet)), Some((2, 3)));
    assert_eq!(queue.pop(nodes(&inet)), Some((4, 5)));
    assert_eq!(queue.pop(nodes(&inet)), None);
  }

  #[test]
  fn rejects_non_redexes() {
    let mut inet = new_inet(3, 10);
    let a = new_node(&mut inet, NodeKind::Delta).unwrap();
    let b = new_node(&mut inet, NodeKind::Delta).unwrap();
    connect(&mut inet, a, 0, b, 1);
    let mut queue = RedexQueue::with_capacity(4);
    assert!(!queue.push(nodes(&inet), a, b));
    assert!(queue.is_empty());
  }

  #[test]
  fn full_queue_drops() {
    let inet = pairs(3);
    let mut queue = RedexQueue::with_capacity(2);
    queue.rescan(nodes(&inet));
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.dropped, 1);
    assert_eq!(queue.pop(nodes(&inet)), Some((0, 1)));
    assert!(queue.push(nodes(&inet), 4, 5));
    assert_eq!(queue.pop(nodes(&inet)), Some((2, 3)));
    assert_eq!(queue.pop(nodes(&inet)), Some((4, 5)));
  }

  #[test]
  fn stale_pairs_are_discarded() {
    let mut inet = pairs(2);
    let mut queue = RedexQueue::with_capacity(4);
    queue.rescan(nodes(&inet));
    connect(&mut inet, 0, 0, 2, 0);
    assert_eq!(queue.pop(nodes(&inet)), None);
    assert_eq!(queue.stale, 1);
    assert_eq!(queue.pop(nodes(&inet)), None);
    assert_eq!(queue.stale, 2);
    assert!(queue.is_empty());
  }

  #[test]
  fn rescan_visits_each_pair_once() {
    let inet = pairs(4);
    let mut queue = RedexQueue::with_capacity(16);
    queue.rescan(nodes(&inet));
    queue.rescan(nodes(&inet));
    assert_eq!(queue.len(), 4);
  }
}
