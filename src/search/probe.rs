// Reads a factor candidate out of a reduced net. When exactly one Delta and one Gamma survive,
// their positions (index + 1) are taken as a factor pair of the net's target.

use crate::inet::*;

#[derive(Clone, Copy, Debug, Default)]
pub struct FactorProbe;

impl Inspect for FactorProbe {
  fn inspect(&self, inet: &mut INet) {
    let target = inet.probe.target;
    if target == 0 {
      return;
    }
    let census = census(inet);
    if census.delta != 1 || census.gamma != 1 {
      return;
    }
    let position = |kind: NodeKind| {
      nodes(inet).iter().rposition(|n| n.active && n.kind == kind).map_or(0, |i| i as u64 + 1)
    };
    let factor_a = position(NodeKind::Delta);
    let factor_b = position(NodeKind::Gamma);
    if factor_a.checked_mul(factor_b) == Some(target) {
      inet.probe.factor_a = factor_a;
      inet.probe.factor_b = factor_b;
      inet.probe.found = true;
    }
  }
}

// Whether the last inspection found factors whose product is `n`.
pub fn has_valid_factor(inet: &INet, n: u64) -> bool {
  let probe = &inet.probe;
  probe.found && probe.factor_a.checked_mul(probe.factor_b) == Some(n)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn checks_product() {
    let mut inet = new_inet(10, 100).with_target(6);
    inet.probe.factor_a = 2;
    inet.probe.factor_b = 3;
    inet.probe.found = true;
    assert!(has_valid_factor(&inet, 6));
    inet.probe.factor_a = 4;
    assert!(!has_valid_factor(&inet, 6));
    inet.probe.factor_a = 2;
    assert!(has_valid_factor(&inet, 6));
    assert!(!has_valid_factor(&inet, 7));
  }

  #[test]
  fn needs_single_delta_and_gamma() {
    let mut inet = new_inet(4, 100).with_target(6);
    let e = new_node(&mut inet, NodeKind::Epsilon).unwrap();
    new_node(&mut inet, NodeKind::Delta).unwrap();
    new_node(&mut inet, NodeKind::Gamma).unwrap();
    let d = new_node(&mut inet, NodeKind::Delta).unwrap();
    connect(&mut inet, e, 0, d, 0);
    reduce_with(&mut inet, &FactorProbe);
    // Erasure consumes the Epsilon only, so two Deltas survive.
    assert!(!inet.probe.found);
  }

  #[test]
  fn finds_factor_pair() {
    let mut inet = new_inet(4, 100).with_target(6);
    let e = new_node(&mut inet, NodeKind::Epsilon).unwrap();
    new_node(&mut inet, NodeKind::Delta).unwrap();
    new_node(&mut inet, NodeKind::Gamma).unwrap();
    let e2 = new_node(&mut inet, NodeKind::Epsilon).unwrap();
    connect(&mut inet, e, 0, e2, 0);
    reduce_with(&mut inet, &FactorProbe);
    assert!(inet.probe.found);
    assert_eq!((inet.probe.factor_a, inet.probe.factor_b), (2, 3));
    assert!(has_valid_factor(&inet, 6));
    assert_eq!(has_valid_factor(&inet, 6), has_valid_factor(&inet, 6));
  }

  #[test]
  fn no_target_no_probe() {
    let mut inet = new_inet(2, 100);
    new_node(&mut inet, NodeKind::Delta).unwrap();
    new_node(&mut inet, NodeKind::Gamma).unwrap();
    reduce_with(&mut inet, &FactorProbe);
    assert!(!inet.probe.found);
  }
}
