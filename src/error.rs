use thiserror::Error;

use crate::inet::{NodeId, SlotId};

// Everything that can go wrong while building or searching a net. Running out of gas is not here:
// it is a normal outcome of `reduce`, reported through `Status`.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum NetError {
  #[error("arena is full ({capacity} nodes)")]
  CapacityExceeded { capacity: usize },

  #[error("node {node} is out of range ({used} nodes allocated)")]
  NodeOutOfRange { node: NodeId, used: usize },

  #[error("slot {slot} is out of range (nodes have 3 ports)")]
  SlotOutOfRange { slot: SlotId },

  #[error("cannot search for factors of {target}")]
  InvalidTarget { target: u64 },
}
