// Implements the node store and the wiring of an interaction net. Nodes live in a fixed-capacity
// arena and are addressed by index. They are never freed nor reused: a rewrite only clears their
// `active` flag, so a NodeId stays valid for inspection for as long as the net exists.

use tracing::trace;

use crate::error::NetError;
use super::redex::RedexQueue;
use super::reduce::Stats;

pub type NodeId = u32;

pub type SlotId = u32;

// A port is just a u32 combining address (30 bits) and slot (2 bits).
pub type Port = u32;

// Slot 0 is the principal port, slots 1 and 2 are auxiliary.
pub const MAIN: SlotId = 0;
pub const AUX1: SlotId = 1;
pub const AUX2: SlotId = 2;

// Largest arena a packed Port can address.
pub const MAX_NODES: usize = 1 << 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
  Delta,
  Gamma,
  Epsilon,
}

impl NodeKind {
  pub fn symbol(self) -> &'static str {
    match self {
      NodeKind::Delta => "δ",
      NodeKind::Gamma => "γ",
      NodeKind::Epsilon => "ε",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
  pub kind: NodeKind,
  pub ports: [Option<Port>; 3],
  pub active: bool,
}

impl Node {
  fn new(kind: NodeKind) -> Self {
    Node { kind, ports: [None; 3], active: true }
  }
}

// Scratch space for the factor search: the number being factored and what the last inspection
// extracted from the reduced net.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Probe {
  pub target: u64,
  pub factor_a: u64,
  pub factor_b: u64,
  pub found: bool,
}

#[derive(Clone, Debug)]
pub struct INet {
  pub(crate) nodes: Vec<Node>,
  pub(crate) capacity: usize,
  pub(crate) gas_limit: u64,
  pub(crate) gas_used: u64,
  pub(crate) queue: RedexQueue,
  pub(crate) stats: Stats,
  pub probe: Probe,
}

// Creates an empty net that can hold `capacity` nodes and perform `gas_limit` rewrites per run.
pub fn new_inet(capacity: usize, gas_limit: u64) -> INet {
  let capacity = capacity.min(MAX_NODES);
  INet {
    nodes: Vec::with_capacity(capacity),
    capacity,
    gas_limit,
    gas_used: 0,
    queue: RedexQueue::default(),
    stats: Stats::default(),
    probe: Probe::default(),
  }
}

impl INet {
  pub fn with_queue(mut self, queue: RedexQueue) -> Self {
    self.queue = queue;
    self
  }

  pub fn with_target(mut self, target: u64) -> Self {
    self.probe.target = target;
    self
  }
}

// Drops every node so the arena can be rebuilt from scratch. Capacity, gas limit and the probe
// target are kept.
pub fn reset(inet: &mut INet) {
  inet.nodes.clear();
  inet.gas_used = 0;
  inet.queue.clear();
  inet.stats = Stats::default();
  inet.probe = Probe { target: inet.probe.target, ..Probe::default() };
}

// Builds a port (an address / slot pair).
pub fn port(node: NodeId, slot: SlotId) -> Port {
  (node << 2) | slot
}

// Returns the address of a port.
pub fn addr(port: Port) -> NodeId {
  port >> 2
}

// Returns the slot of a port.
pub fn slot(port: Port) -> SlotId {
  port & 3
}

// Allocates a new active node with all ports free. Fails without side effects once the arena
// is full.
pub fn new_node(inet: &mut INet, kind: NodeKind) -> Result<NodeId, NetError> {
  if inet.nodes.len() >= inet.capacity {
    return Err(NetError::CapacityExceeded { capacity: inet.capacity });
  }
  let node = inet.nodes.len() as NodeId;
  inet.nodes.push(Node::new(kind));
  trace!(node, ?kind, "allocated");
  Ok(node)
}

// Number of nodes allocated so far, active or not.
pub fn used(inet: &INet) -> usize {
  inet.nodes.len()
}

// Number of nodes the arena can hold. Fixed when the net is created.
pub fn capacity(inet: &INet) -> usize {
  inet.capacity
}

// Rewrites allowed per reduction run.
pub fn gas_limit(inet: &INet) -> u64 {
  inet.gas_limit
}

// Rewrites performed by the last reduction run.
pub fn gas_used(inet: &INet) -> u64 {
  inet.gas_used
}

// Rule counters of the last reduction run.
pub fn stats(inet: &INet) -> &Stats {
  &inet.stats
}

// The pending redex candidates and their drop/stale counters.
pub fn queue(inet: &INet) -> &RedexQueue {
  &inet.queue
}

// Node at the given index, if allocated.
pub fn node(inet: &INet, node: NodeId) -> Option<&Node> {
  inet.nodes.get(node as usize)
}

// Every allocated node, in allocation order.
pub fn nodes(inet: &INet) -> &[Node] {
  &inet.nodes
}

// Kind of the node.
pub fn kind(inet: &INet, node: NodeId) -> Option<NodeKind> {
  inet.nodes.get(node as usize).map(|n| n.kind)
}

// Whether the node exists and has not been consumed by a rewrite.
pub fn is_active(inet: &INet, node: NodeId) -> bool {
  inet.nodes.get(node as usize).map_or(false, |n| n.active)
}

// Enters a port, returning the port on the other side, if any.
pub fn enter(inet: &INet, port: Port) -> Option<Port> {
  let slot = slot(port) as usize;
  if slot > 2 {
    return None;
  }
  inet.nodes.get(addr(port) as usize).and_then(|n| n.ports[slot])
}

// Enters a slot of a node, returning the (node, slot) on the other side, if any.
pub fn target(inet: &INet, node: NodeId, slot: SlotId) -> Option<(NodeId, SlotId)> {
  if slot > AUX2 {
    return None;
  }
  enter(inet, port(node, slot)).map(|p| (addr(p), self::slot(p)))
}

// Validates a node/slot pair and packs it into a port.
pub fn check_port(inet: &INet, node: NodeId, slot: SlotId) -> Result<Port, NetError> {
  if node as usize >= inet.nodes.len() {
    return Err(NetError::NodeOutOfRange { node, used: inet.nodes.len() });
  }
  if slot > AUX2 {
    return Err(NetError::SlotOutOfRange { slot });
  }
  Ok(port(node, slot))
}

fn set(inet: &mut INet, p: Port, to: Option<Port>) {
  inet.nodes[addr(p) as usize].ports[slot(p) as usize] = to;
}

// Breaks the link held by a port, on both sides.
pub fn unlink(inet: &mut INet, p: Port) {
  if let Some(q) = enter(inet, p) {
    if enter(inet, q) == Some(p) {
      set(inet, q, None);
    }
    set(inet, p, None);
  }
}

// Links two ports, first breaking whatever either of them was linked to. A fresh link between two
// active principal ports is offered to the redex queue. Both ports must be in range.
pub fn link(inet: &mut INet, a: Port, b: Port) {
  debug_assert!((addr(a) as usize) < inet.nodes.len() && slot(a) <= AUX2);
  debug_assert!((addr(b) as usize) < inet.nodes.len() && slot(b) <= AUX2);
  unlink(inet, a);
  unlink(inet, b);
  set(inet, a, Some(b));
  set(inet, b, Some(a));
  if slot(a) == MAIN && slot(b) == MAIN && is_active(inet, addr(a)) && is_active(inet, addr(b)) {
    inet.queue.push(&inet.nodes, addr(a), addr(b));
  }
}

// Connects two node ports, rejecting out-of-range nodes or slots with an error.
pub fn try_connect(
  inet: &mut INet,
  node_a: NodeId,
  slot_a: SlotId,
  node_b: NodeId,
  slot_b: SlotId,
) -> Result<(), NetError> {
  let a = check_port(inet, node_a, slot_a)?;
  let b = check_port(inet, node_b, slot_b)?;
  link(inet, a, b);
  Ok(())
}

// Connects two node ports. Out-of-range nodes or slots make this a no-op.
pub fn connect(inet: &mut INet, node_a: NodeId, slot_a: SlotId, node_b: NodeId, slot_b: SlotId) {
  if let Err(err) = try_connect(inet, node_a, slot_a, node_b, slot_b) {
    trace!(%err, "connect ignored");
  }
}

// Marks a node as consumed. Its slot and its port contents stay in place.
pub(crate) fn deactivate(inet: &mut INet, node: NodeId) {
  inet.nodes[node as usize].active = false;
}
