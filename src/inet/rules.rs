// Rewrite rules for active pairs. Same-kind Delta or Gamma pairs annihilate, a Delta meeting a
// Gamma commutes, and an Epsilon erases whatever it meets.

use tracing::trace;

use super::core::*;
use super::redex::is_redex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
  DeltaDelta,
  GammaGamma,
  DeltaGamma,
  Erase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
  Applied(Rule),
  // The commutation could not allocate its two nodes. The pair is left as it was.
  Aborted(Rule),
}

// Picks the rule for an unordered pair of kinds. Epsilon wins over everything, including
// another Epsilon.
pub fn rule(a: NodeKind, b: NodeKind) -> Rule {
  match (a, b) {
    (NodeKind::Epsilon, _) | (_, NodeKind::Epsilon) => Rule::Erase,
    (NodeKind::Delta, NodeKind::Delta) => Rule::DeltaDelta,
    (NodeKind::Gamma, NodeKind::Gamma) => Rule::GammaGamma,
    _ => Rule::DeltaGamma,
  }
}

// Aux partners of both nodes of a pair, read before anything is rewired.
#[derive(Clone, Copy, Debug)]
struct Wires {
  x: [Option<Port>; 2],
  y: [Option<Port>; 2],
}

fn capture(inet: &INet, x: NodeId, y: NodeId) -> Wires {
  Wires {
    x: [enter(inet, port(x, AUX1)), enter(inet, port(x, AUX2))],
    y: [enter(inet, port(y, AUX1)), enter(inet, port(y, AUX2))],
  }
}

// Detaches a pair from the rest of the net: the principal link between them and every aux link.
fn sever(inet: &mut INet, x: NodeId, y: NodeId) {
  unlink(inet, port(x, MAIN));
  unlink(inet, port(y, MAIN));
  for &node in [x, y].iter() {
    unlink(inet, port(node, AUX1));
    unlink(inet, port(node, AUX2));
  }
}

// Links two captured partners, skipping the edge when either side was free.
fn relink(inet: &mut INet, a: Option<Port>, b: Option<Port>) {
  if let (Some(a), Some(b)) = (a, b) {
    link(inet, a, b);
  }
}

// Rewrites an active pair. Returns None, touching nothing, when (x, y) is not one.
pub fn rewrite(inet: &mut INet, x: NodeId, y: NodeId) -> Option<Outcome> {
  if !is_redex(&inet.nodes, x, y) {
    return None;
  }
  let kind_x = inet.nodes[x as usize].kind;
  let kind_y = inet.nodes[y as usize].kind;
  let rule = rule(kind_x, kind_y);
  trace!(x, y, ?rule, "rewrite");
  let outcome = match rule {
    Rule::Erase => {
      if kind_x == NodeKind::Epsilon {
        erase(inet, x, y);
      } else {
        erase(inet, y, x);
      }
      Outcome::Applied(rule)
    }
    Rule::DeltaDelta => {
      annihilate(inet, x, y, true);
      Outcome::Applied(rule)
    }
    Rule::GammaGamma => {
      annihilate(inet, x, y, false);
      Outcome::Applied(rule)
    }
    Rule::DeltaGamma => {
      let (delta, gamma) = if kind_x == NodeKind::Delta { (x, y) } else { (y, x) };
      if commute(inet, delta, gamma) {
        Outcome::Applied(rule)
      } else {
        Outcome::Aborted(rule)
      }
    }
  };
  Some(outcome)
}

// Consumes both nodes and joins their aux partners, crosswise for Delta (x.1 with y.2, x.2 with
// y.1) and straight for Gamma (x.1 with y.1, x.2 with y.2).
fn annihilate(inet: &mut INet, x: NodeId, y: NodeId, crosswise: bool) {
  let wires = capture(inet, x, y);
  sever(inet, x, y);
  if crosswise {
    relink(inet, wires.x[0], wires.y[1]);
    relink(inet, wires.x[1], wires.y[0]);
  } else {
    relink(inet, wires.x[0], wires.y[0]);
    relink(inet, wires.x[1], wires.y[1]);
  }
  deactivate(inet, x);
  deactivate(inet, y);
}

// Replaces a Delta/Gamma pair with a fresh Delta/Gamma pair joined at their principal ports:
// - new delta aux1 takes the old delta's aux1 partner
// - new delta aux2 takes the old gamma's aux1 partner
// - new gamma aux1 takes the old delta's aux2 partner
// - new gamma aux2 takes the old gamma's aux2 partner
// Allocation happens before anything is touched; if the arena can't hold both nodes, whichever
// was allocated is deactivated and the pair stays wired as it was.
fn commute(inet: &mut INet, delta: NodeId, gamma: NodeId) -> bool {
  let wires = capture(inet, delta, gamma);
  let new_delta = new_node(inet, NodeKind::Delta);
  let new_gamma = new_node(inet, NodeKind::Gamma);
  let (a, b) = match (new_delta, new_gamma) {
    (Ok(a), Ok(b)) => (a, b),
    (a, b) => {
      for node in a.into_iter().chain(b) {
        deactivate(inet, node);
      }
      trace!(delta, gamma, capacity = inet.capacity, "arena full, commutation aborted");
      return false;
    }
  };
  sever(inet, delta, gamma);
  link(inet, port(a, MAIN), port(b, MAIN));
  relink(inet, Some(port(a, AUX1)), wires.x[0]);
  relink(inet, Some(port(a, AUX2)), wires.y[0]);
  relink(inet, Some(port(b, AUX1)), wires.x[1]);
  relink(inet, Some(port(b, AUX2)), wires.y[1]);
  deactivate(inet, delta);
  deactivate(inet, gamma);
  true
}

// Consumes the Epsilon node and nothing else. Neither side is unlinked, so the other node's
// principal port keeps naming the now inactive Epsilon; as the Epsilon is inactive the pair is
// never seen as a redex again.
fn erase(inet: &mut INet, epsilon: NodeId, _other: NodeId) {
  deactivate(inet, epsilon);
}
