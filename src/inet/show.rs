// Read-only views of a net: a node census, a text dump and a Graphviz export.

use std::fmt::Write;

use itertools::Itertools;

use super::core::*;

// Number of active nodes of each kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
  pub delta: usize,
  pub gamma: usize,
  pub epsilon: usize,
}

pub fn census(inet: &INet) -> Census {
  let mut census = Census::default();
  for node in nodes(inet).iter().filter(|n| n.active) {
    match node.kind {
      NodeKind::Delta => census.delta += 1,
      NodeKind::Gamma => census.gamma += 1,
      NodeKind::Epsilon => census.epsilon += 1,
    }
  }
  census
}

fn show_link(link: Option<Port>) -> String {
  match link {
    Some(p) => format!("({},{})", addr(p), slot(p)),
    None => "-".to_string(),
  }
}

// Dumps the header counters and every active node with its port links.
pub fn show_net(inet: &INet) -> String {
  let mut out = String::new();
  let probe = &inet.probe;
  let _ = writeln!(out, "IC Net with {} used nodes out of {} max nodes", used(inet), inet.capacity);
  let _ = writeln!(out, "Gas used: {} out of {} limit", inet.gas_used, inet.gas_limit);
  let _ = writeln!(out, "Input number: {}", probe.target);
  if probe.found {
    let _ = writeln!(
      out,
      "Factors found: {} * {} = {}",
      probe.factor_a,
      probe.factor_b,
      probe.factor_a.saturating_mul(probe.factor_b)
    );
  } else {
    let _ = writeln!(out, "No factors found yet");
  }
  let _ = writeln!(out, "Nodes:");
  for (i, node) in nodes(inet).iter().enumerate().filter(|(_, n)| n.active) {
    let ports = node.ports.iter().map(|&p| show_link(p)).join(", ");
    let _ = writeln!(out, "  Node {}: Type={}, Ports=[{}]", i, node.kind.symbol(), ports);
  }
  out
}

fn port_name(slot: SlotId) -> &'static str {
  match slot {
    MAIN => "p",
    AUX1 => "a1",
    _ => "a2",
  }
}

fn color(kind: NodeKind) -> &'static str {
  match kind {
    NodeKind::Delta => "red",
    NodeKind::Gamma => "blue",
    NodeKind::Epsilon => "green",
  }
}

// Exports the active part of the net in Graphviz dot format. Every node gets three satellite
// vertices for its ports; each link between active nodes is drawn once, from its lower end.
// Links touching a principal port are drawn black, aux-to-aux links gray.
pub fn to_dot(inet: &INet) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "digraph ic_net {{");
  let _ = writeln!(out, "  rankdir=LR;");
  let active = || nodes(inet).iter().enumerate().filter(|(_, n)| n.active);
  for (i, node) in active() {
    let _ = writeln!(
      out,
      "  node{} [label=\"{}{}\", shape=circle, color={}];",
      i,
      node.kind.symbol(),
      i,
      color(node.kind)
    );
    for &(name, label) in [("p", "P"), ("a1", "A1"), ("a2", "A2")].iter() {
      let _ = writeln!(out, "  node{}_{} [label=\"{}\", shape=none, width=0, height=0];", i, name, label);
    }
    for &name in ["p", "a1", "a2"].iter() {
      let _ = writeln!(out, "  node{} -> node{}_{} [arrowhead=none];", i, i, name);
    }
  }
  for (i, node) in active() {
    for (s, link) in node.ports.iter().enumerate() {
      let p = match *link {
        Some(p) => p,
        None => continue,
      };
      let (other, other_slot) = (addr(p) as usize, slot(p));
      let lower = i < other || (i == other && (s as SlotId) < other_slot);
      if !lower || !is_active(inet, other as NodeId) {
        continue;
      }
      let style = if s as SlotId == MAIN || other_slot == MAIN { "black:black" } else { "gray:gray" };
      let _ = writeln!(
        out,
        "  node{}_{} -> node{}_{} [dir=both, color=\"{}\"];",
        i,
        port_name(s as SlotId),
        other,
        port_name(other_slot),
        style
      );
    }
  }
  let _ = writeln!(out, "}}");
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> INet {
    let mut inet = new_inet(4, 10);
    let d = new_node(&mut inet, NodeKind::Delta).unwrap();
    let g = new_node(&mut inet, NodeKind::Gamma).unwrap();
    let e = new_node(&mut inet, NodeKind::Epsilon).unwrap();
    connect(&mut inet, d, 0, g, 0);
    connect(&mut inet, d, 1, g, 2);
    connect(&mut inet, e, 0, g, 1);
    inet
  }

  #[test]
  fn census_counts_active_nodes() {
    let mut inet = sample();
    assert_eq!(census(&inet), Census { delta: 1, gamma: 1, epsilon: 1 });
    deactivate(&mut inet, 2);
    assert_eq!(census(&inet).epsilon, 0);
  }

  #[test]
  fn show_lists_active_nodes() {
    let mut inet = sample();
    deactivate(&mut inet, 2);
    let text = show_net(&inet);
    assert!(text.starts_with("IC Net with 3 used nodes out of 4 max nodes\n"));
    assert!(text.contains("No factors found yet"));
    assert!(text.contains("  Node 0: Type=δ, Ports=[(1,0), (1,2), -]\n"));
    assert!(text.contains("  Node 1: Type=γ, Ports=[(0,0), (2,0), (0,1)]\n"));
    assert!(!text.contains("Node 2:"));
  }

  #[test]
  fn dot_draws_each_link_once() {
    let inet = sample();
    let dot = to_dot(&inet);
    assert!(dot.starts_with("digraph ic_net {\n"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains("  node0 [label=\"δ0\", shape=circle, color=red];"));
    assert!(dot.contains("  node0_p -> node1_p [dir=both, color=\"black:black\"];"));
    assert!(dot.contains("  node0_a1 -> node1_a2 [dir=both, color=\"gray:gray\"];"));
    assert!(dot.contains("  node1_a1 -> node2_p [dir=both, color=\"black:black\"];"));
    assert!(!dot.contains("node1_p -> node0_p"));
    assert_eq!(dot.matches("dir=both").count(), 3);
  }

  #[test]
  fn dot_skips_inactive_nodes() {
    let mut inet = sample();
    deactivate(&mut inet, 2);
    let dot = to_dot(&inet);
    assert!(!dot.contains("node2"));
    assert_eq!(dot.matches("dir=both").count(), 2);
  }
}
