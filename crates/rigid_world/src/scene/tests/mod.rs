//! Whole-world tests: scripted scenarios and randomized properties


use crate::physics::Contacts;
use crate::scene::{NodeId, World};

/// Contacts flattened to sorted `(a, b)` pairs
fn sorted_pairs(lists: &[Contacts]) -> Vec<(NodeId, NodeId)> {
    let mut pairs: Vec<_> = lists.iter().flatten().map(|c| (c.a, c.b)).collect();
    pairs.sort();
    pairs
}

/// Name of a node, for readable assertion messages
fn name_of(world: &World, id: NodeId) -> &str {
    world.node(id).map_or("?", |node| node.name.as_str())
}
