//! Child list reconciliation
//!
//! Brings a parent's children in line with a new list of nodes, keeping
//! nodes that are already in relative order where they are. A single
//! forward cursor walks the old children: each new node is searched for
//! from the cursor on. On a hit, the old nodes skipped over are removed
//! and the new nodes gathered since the last hit are inserted before
//! it. Nodes not found are gathered. Whatever old nodes remain after the
//! last hit are removed and the rest of the gathered nodes appended.

use crate::dom::{Dom, NodeId};
use tracing::trace;

pub fn update_children<D: Dom + ?Sized>(dom: &mut D, parent: NodeId, new_children: &[NodeId]) {
    let old_children = dom.children(parent);
    let mut cursor = 0;
    let mut pending: Vec<NodeId> = Vec::new();

    for &child in new_children {
        let Some(offset) = old_children[cursor..]
            .iter()
            .position(|existing| *existing == child)
        else {
            pending.push(child);
            continue;
        };

        let found = cursor + offset;
        for &skipped in &old_children[cursor..found] {
            dom.remove_child(parent, skipped);
        }
        for node in pending.drain(..) {
            dom.insert_before(parent, node, Some(child));
        }
        cursor = found + 1;
    }

    for &stale in &old_children[cursor..] {
        dom.remove_child(parent, stale);
    }
    for node in pending {
        dom.insert_before(parent, node, None);
    }

    trace!(
        old = old_children.len(),
        new = new_children.len(),
        "reconciled children"
    );
}
