//! Secondary index structures fed by catalog insertion.

use hashbrown::HashMap;

use crate::types::FlightId;

/// Origin → destinations adjacency derived from the catalog.
///
/// Destinations keep first-seen order and are deduplicated, so every
/// `(origin, destination)` pair present in the catalog appears exactly once
/// no matter how many flights share it.
#[derive(Debug, Default)]
pub struct RouteIndex {
    routes: HashMap<String, Vec<String>>,
}

impl RouteIndex {
    /// Records a route. Adding an existing pair is a no-op.
    pub fn add(&mut self, origin: &str, destination: &str) {
        let list = self.routes.entry(origin.to_string()).or_default();
        if !list.iter().any(|d| d == destination) {
            list.push(destination.to_string());
        }
    }

    /// Destinations reachable from `origin` in first-seen order, or `None`
    /// when the origin is unknown or has an empty list.
    pub fn destinations_from(&self, origin: &str) -> Option<&[String]> {
        self.routes
            .get(origin)
            .filter(|list| !list.is_empty())
            .map(|list| list.as_slice())
    }

    /// Number of distinct origins.
    pub fn origin_count(&self) -> usize {
        self.routes.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct BstNode {
    id: FlightId,
    slot: usize,
    left: Option<u32>,
    right: Option<u32>,
}

/// Binary search tree over catalog slots, keyed by flight id.
///
/// Nodes live in an arena and link by index, so the tree owns nothing and
/// never dangles. Insertion walks left-if-less, else right; a duplicate id
/// therefore becomes a right-side node shadowed by the earlier one for
/// lookups. No balancing: insertion order can degenerate the tree, which is
/// why catalog lookup keeps a linear fallback.
#[derive(Debug, Default)]
pub struct FlightIdIndex {
    nodes: Vec<BstNode>,
    root: Option<u32>,
}

impl FlightIdIndex {
    /// Indexes `id` at catalog position `slot`.
    pub fn insert(&mut self, id: FlightId, slot: usize) {
        let new = self.nodes.len() as u32;
        self.nodes.push(BstNode {
            id,
            slot,
            left: None,
            right: None,
        });

        let Some(mut cur) = self.root else {
            self.root = Some(new);
            return;
        };

        loop {
            let node = self.nodes[cur as usize];
            let child = if id < node.id {
                &mut self.nodes[cur as usize].left
            } else {
                &mut self.nodes[cur as usize].right
            };
            match *child {
                Some(next) => cur = next,
                None => {
                    *child = Some(new);
                    return;
                }
            }
        }
    }

    /// Returns the catalog slot for `id`, or `None` when unindexed.
    pub fn lookup(&self, id: FlightId) -> Option<usize> {
        let mut cur = self.root;
        while let Some(i) = cur {
            let node = &self.nodes[i as usize];
            if node.id == id {
                return Some(node.slot);
            }
            cur = if id < node.id { node.left } else { node.right };
        }
        None
    }

    /// Number of indexed entries, duplicates included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
