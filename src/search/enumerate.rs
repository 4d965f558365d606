// Builds trial nets from an enumeration index. The topology is a pure function of the index:
// the same index always yields the same net.

use crate::error::NetError;
use crate::inet::*;

// Trial nets have between 3 and 3 + MAX_NET_SIZE - 1 nodes.
pub const MAX_NET_SIZE: usize = 10;

fn kind_for(pattern: usize, n: usize) -> NodeKind {
  match (pattern >> (n % 16)) & 3 {
    0 => NodeKind::Delta,
    1 => NodeKind::Gamma,
    _ => NodeKind::Epsilon,
  }
}

// Clears the net and rebuilds it as trial net number `index`. Node 0 is a Delta and node 1 a
// Gamma, joined at their principal ports. Every node's aux ports form a ring (aux1 to the next
// node's aux2, aux2 to the previous node's aux1) and every later node's principal port points two
// nodes ahead.
pub fn build_net(index: usize, inet: &mut INet) -> Result<(), NetError> {
  reset(inet);
  let num_nodes = 3 + index % MAX_NET_SIZE;
  let pattern = index / MAX_NET_SIZE;

  let delta = new_node(inet, NodeKind::Delta)?;
  let gamma = new_node(inet, NodeKind::Gamma)?;
  connect(inet, delta, MAIN, gamma, MAIN);
  for n in 2..num_nodes {
    new_node(inet, kind_for(pattern, n))?;
  }

  let used = used(inet);
  for i in 0..used {
    let next = ((i + 1) % used) as NodeId;
    let prev = ((i + used - 1) % used) as NodeId;
    let node = i as NodeId;
    if i >= 2 {
      connect(inet, node, MAIN, ((i + 2) % used) as NodeId, MAIN);
    }
    connect(inet, node, AUX1, next, AUX2);
    connect(inet, node, AUX2, prev, AUX1);
  }
  Ok(())
}

// Walks the enumeration in order, one index per call.
#[derive(Clone, Debug)]
pub struct Enumerator {
  pub max_nodes: usize,
  pub current_index: usize,
}

impl Enumerator {
  pub fn new(max_nodes: usize) -> Self {
    Enumerator { max_nodes, current_index: 0 }
  }

  // Builds the net for the current index and moves past it, whether or not the build succeeded.
  // Returns the index that was built.
  pub fn next(&mut self, inet: &mut INet) -> Result<usize, NetError> {
    let index = self.current_index;
    self.current_index += 1;
    build_net(index, inet).map(|_| index)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sizes_follow_index() {
    let mut inet = new_inet(20, 100);
    for index in 0..25 {
      build_net(index, &mut inet).unwrap();
      assert_eq!(used(&inet), 3 + index % 10);
      assert_eq!(kind(&inet, 0), Some(NodeKind::Delta));
      assert_eq!(kind(&inet, 1), Some(NodeKind::Gamma));
    }
  }

  #[test]
  fn builds_are_deterministic() {
    let mut a = new_inet(20, 100);
    let mut b = new_inet(20, 100);
    for index in [0usize, 7, 42, 999, 12345].iter() {
      build_net(*index, &mut a).unwrap();
      build_net(*index, &mut b).unwrap();
      assert_eq!(nodes(&a), nodes(&b));
    }
  }

  #[test]
  fn links_are_in_range_and_reciprocal() {
    let mut inet = new_inet(5, 100);
    for index in 0..10 {
      if build_net(index, &mut inet).is_err() {
        continue;
      }
      for (n, node) in nodes(&inet).iter().enumerate() {
        for (s, link) in node.ports.iter().enumerate() {
          if let Some(p) = *link {
            assert!((addr(p) as usize) < used(&inet) && slot(p) <= AUX2);
            assert_eq!(enter(&inet, p), Some(port(n as NodeId, s as SlotId)));
          }
        }
      }
    }
  }

  #[test]
  fn too_small_arena_fails() {
    let mut inet = new_inet(5, 100);
    assert_eq!(build_net(3, &mut inet), Err(NetError::CapacityExceeded { capacity: 5 }));
    assert!(build_net(2, &mut inet).is_ok());
  }

  #[test]
  fn node_kinds_follow_pattern() {
    // Three-node nets; node 2 takes its kind from bits 2..4 of index / 10.
    let expected = [
      (20, NodeKind::Delta),
      (40, NodeKind::Gamma),
      (80, NodeKind::Epsilon),
      (120, NodeKind::Epsilon),
    ];
    let mut inet = new_inet(20, 100);
    for &(index, kind_of_2) in expected.iter() {
      build_net(index, &mut inet).unwrap();
      assert_eq!(used(&inet), 3);
      assert_eq!(kind(&inet, 2), Some(kind_of_2));
    }
  }

  #[test]
  fn enumerator_advances_past_failures() {
    let mut inet = new_inet(5, 100);
    let mut walk = Enumerator::new(5);
    assert_eq!(walk.next(&mut inet), Ok(0));
    assert_eq!(walk.next(&mut inet), Ok(1));
    assert_eq!(walk.next(&mut inet), Ok(2));
    assert!(walk.next(&mut inet).is_err());
    assert_eq!(walk.current_index, 4);
  }
}
