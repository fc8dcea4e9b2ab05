//! Part hierarchy tree (display grouping).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Part;

/// A node in the part hierarchy.
///
/// Internal nodes are folder groupings from the CAD structure; leaves wrap
/// a [`Part`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartNode {
    Group { name: String, children: Vec<PartNode> },
    Leaf(Part),
}

impl PartNode {
    pub fn name(&self) -> &str {
        match self {
            PartNode::Group { name, .. } => name,
            PartNode::Leaf(part) => part.name(),
        }
    }

    /// Total number of parts under this node.
    pub fn part_count(&self) -> usize {
        match self {
            PartNode::Group { children, .. } => children.iter().map(PartNode::part_count).sum(),
            PartNode::Leaf(_) => 1,
        }
    }
}

#[derive(Default)]
struct GroupAcc {
    groups: BTreeMap<String, GroupAcc>,
    leaves: Vec<Part>,
}

impl GroupAcc {
    fn insert(&mut self, part: Part, depth: usize) {
        match part.hierarchy().get(depth) {
            Some(segment) => {
                self.groups
                    .entry(segment.clone())
                    .or_default()
                    .insert(part, depth + 1);
            }
            None => self.leaves.push(part),
        }
    }

    fn into_nodes(self) -> Vec<PartNode> {
        let mut nodes: Vec<PartNode> = self
            .groups
            .into_iter()
            .map(|(name, acc)| PartNode::Group {
                name,
                children: acc.into_nodes(),
            })
            .collect();

        let mut leaves = self.leaves;
        leaves.sort_by(|a, b| a.name().cmp(b.name()).then(a.id_typed().cmp(&b.id_typed())));
        nodes.extend(leaves.into_iter().map(PartNode::Leaf));
        nodes
    }
}

/// Build a display tree from a flat part list.
///
/// Pure and deterministic for a given input: groups are ordered by name,
/// leaves by part name (id as tie-break), groups before leaves at each
/// level. Parts with an empty hierarchy become root-level leaves.
pub fn build_part_tree(parts: impl IntoIterator<Item = Part>) -> Vec<PartNode> {
    let mut root = GroupAcc::default();
    for part in parts {
        root.insert(part, 0);
    }
    root.into_nodes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fablink_core::OrderId;

    fn part(order_id: OrderId, name: &str, path: &str, hierarchy: &[&str]) -> Part {
        Part::new(
            order_id,
            name,
            path,
            hierarchy.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn groups_follow_hierarchy_segments() {
        let order_id = OrderId::new();
        let tree = build_part_tree(vec![
            part(order_id, "base", "cad/housing/base.step", &["housing"]),
            part(order_id, "lid", "cad/housing/lid.step", &["housing"]),
            part(order_id, "arm", "cad/bracket/arm.step", &["bracket"]),
        ]);

        assert_eq!(tree.len(), 2);
        // groups sorted by name
        assert_eq!(tree[0].name(), "bracket");
        assert_eq!(tree[1].name(), "housing");
        assert_eq!(tree[0].part_count(), 1);
        assert_eq!(tree[1].part_count(), 2);
    }

    #[test]
    fn nested_hierarchy_nests_groups() {
        let order_id = OrderId::new();
        let tree = build_part_tree(vec![part(
            order_id,
            "pin",
            "cad/asm/sub/pin.step",
            &["asm", "sub"],
        )]);

        match &tree[0] {
            PartNode::Group { name, children } => {
                assert_eq!(name, "asm");
                match &children[0] {
                    PartNode::Group { name, children } => {
                        assert_eq!(name, "sub");
                        assert!(matches!(children[0], PartNode::Leaf(_)));
                    }
                    other => panic!("expected nested group, got {other:?}"),
                }
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn empty_hierarchy_parts_become_root_leaves() {
        let order_id = OrderId::new();
        let tree = build_part_tree(vec![part(order_id, "solo", "cad/solo.step", &[])]);
        assert!(matches!(tree[0], PartNode::Leaf(_)));
    }

    #[test]
    fn tree_is_deterministic_regardless_of_input_order() {
        let order_id = OrderId::new();
        let a = part(order_id, "base", "cad/h/base.step", &["housing"]);
        let b = part(order_id, "lid", "cad/h/lid.step", &["housing"]);
        let c = part(order_id, "solo", "cad/solo.step", &[]);

        let t1 = build_part_tree(vec![a.clone(), b.clone(), c.clone()]);
        let t2 = build_part_tree(vec![c, b, a]);
        assert_eq!(t1, t2);
    }
}
