//! Incremental binary Merkle tree over completed chunks.
//!
//! Nodes live in a small arena addressed by index; parent/child relations are
//! arena indices rather than owning references, and a slot is recycled as
//! soon as the node's chaining value has been folded into its parent. The
//! arena therefore stays proportional to the tree height, not to the input
//! length.
//!
//! Growth maintains the binary-carry invariant: no two adjacent completed
//! subtrees of equal size remain un-merged. After N completed chunks the
//! materialized shape is the canonical tree for N chunks, regardless of how
//! the input was split across absorb calls.

use alloc::vec::Vec;

use super::cargo::Cargo;

pub(crate) type NodeId = usize;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum NodeKind {
  Leaf,
  Parent,
}

/// One tree node: a leaf owning a chunk cargo, or a parent whose cargo is
/// materialized lazily when the first child chaining value arrives.
#[derive(Clone, Debug)]
pub(crate) struct Node {
  index: u64,
  kind: NodeKind,
  pub(crate) cargo: Option<Cargo>,
  pub(crate) parent: Option<NodeId>,
  pub(crate) left: Option<NodeId>,
  pub(crate) right: Option<NodeId>,
}

impl Node {
  fn leaf(index: u64, cargo: Cargo) -> Self {
    Self {
      index,
      kind: NodeKind::Leaf,
      cargo: Some(cargo),
      parent: None,
      left: None,
      right: None,
    }
  }

  fn parent_node(index: u64) -> Self {
    Self {
      index,
      kind: NodeKind::Parent,
      cargo: None,
      parent: None,
      left: None,
      right: None,
    }
  }

  /// Creation order of this node.
  pub(crate) fn index(&self) -> u64 {
    self.index
  }

  pub(crate) fn is_parent(&self) -> bool {
    self.kind == NodeKind::Parent
  }

  /// A node is the root iff it has no parent.
  pub(crate) fn is_root(&self) -> bool {
    self.parent.is_none()
  }

  /// The node's cargo, materializing a parent cargo on first access.
  ///
  /// Leaves are constructed with their cargo already staged.
  pub(crate) fn cargo_mut(&mut self) -> &mut Cargo {
    self.cargo.get_or_insert_with(Cargo::parent)
  }

  /// Whether the staged bytes are ready for compression.
  ///
  /// A leaf in the tree is always ready (partial leaves only ship at
  /// finalization); a parent is ready once both child chaining values have
  /// been folded in.
  pub(crate) fn is_ready(&self) -> bool {
    match self.kind {
      NodeKind::Leaf => true,
      NodeKind::Parent => self.cargo.as_ref().is_some_and(Cargo::is_full),
    }
  }
}

#[derive(Clone, Copy, Debug)]
struct SpineEntry {
  id: NodeId,
  /// log2 of the subtree's chunk count.
  height: u32,
}

/// Node arena plus the stack of completed, un-merged subtrees.
///
/// Spine heights strictly decrease left to right; the first entry is the
/// largest completed subtree and becomes the root once the spine is folded.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tree {
  slots: Vec<Option<Node>>,
  free: Vec<NodeId>,
  spine: Vec<SpineEntry>,
}

impl Tree {
  /// True until the first chunk has been shipped.
  pub(crate) fn is_empty(&self) -> bool {
    self.spine.is_empty()
  }

  /// Number of live nodes; bounded by tree height between reductions.
  pub(crate) fn occupied(&self) -> usize {
    self.slots.iter().filter(|slot| slot.is_some()).count()
  }

  /// The current top of the tree, once the spine has been folded.
  pub(crate) fn root(&self) -> Option<NodeId> {
    self.spine.first().map(|entry| entry.id)
  }

  pub(crate) fn node(&self, id: NodeId) -> &Node {
    match self.slots.get(id).and_then(Option::as_ref) {
      Some(node) => node,
      None => unreachable!("vacant node slot {id}"),
    }
  }

  pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
    match self.slots.get_mut(id).and_then(Option::as_mut) {
      Some(node) => node,
      None => unreachable!("vacant node slot {id}"),
    }
  }

  /// Ship a completed chunk cargo into the tree as a new leaf.
  ///
  /// Merges with the most recently completed subtree repeatedly while the
  /// two have the same height, mirroring the binary-carry pattern of the
  /// chunk counter. Newly created parents await their children's chaining
  /// values; the reduction pass fills them in.
  pub(crate) fn add_leaf(&mut self, next_index: &mut u64, cargo: Cargo) -> NodeId {
    let leaf = self.alloc(Node::leaf(bump(next_index), cargo));
    let mut top = SpineEntry { id: leaf, height: 0 };

    while self.spine.last().is_some_and(|entry| entry.height == top.height) {
      let Some(left) = self.spine.pop() else { break };
      let parent = self.alloc(Node::parent_node(bump(next_index)));
      self.link(parent, left.id, top.id);
      top = SpineEntry { id: parent, height: top.height + 1 };
    }
    self.spine.push(top);
    leaf
  }

  /// Fold the remaining completed subtrees into a single root.
  ///
  /// Finalization only: merges right to left, so the root of an N-chunk tree
  /// pairs the largest completed subtree with the fold of everything to its
  /// right.
  pub(crate) fn fold_spine(&mut self, next_index: &mut u64) {
    while self.spine.len() > 1 {
      let Some(right) = self.spine.pop() else { break };
      let Some(left) = self.spine.pop() else { break };
      let parent = self.alloc(Node::parent_node(bump(next_index)));
      self.link(parent, left.id, right.id);
      self.spine.push(SpineEntry { id: parent, height: left.height + 1 });
    }
  }

  /// Find a node whose staged bytes are ready and whose parent is waiting
  /// for its chaining value.
  ///
  /// The left child folds before the right one so the parent cargo holds
  /// `left_cv || right_cv`.
  pub(crate) fn next_ready_child(&self) -> Option<(NodeId, NodeId)> {
    self.slots.iter().enumerate().find_map(|(id, slot)| {
      let node = slot.as_ref()?;
      let parent = node.parent?;
      if !node.is_ready() {
        return None;
      }
      let parent_node = self.node(parent);
      let in_order = parent_node.left == Some(id) || parent_node.left.is_none();
      in_order.then_some((id, parent))
    })
  }

  /// Release a node whose output has been folded into its parent.
  pub(crate) fn release(&mut self, id: NodeId) {
    let Some(node) = self.slots.get_mut(id).and_then(Option::take) else {
      return;
    };
    if let Some(parent) = node.parent {
      let parent_node = self.node_mut(parent);
      if parent_node.left == Some(id) {
        parent_node.left = None;
      }
      if parent_node.right == Some(id) {
        parent_node.right = None;
      }
    }
    self.free.push(id);
  }

  fn alloc(&mut self, node: Node) -> NodeId {
    match self.free.pop() {
      Some(id) => {
        if let Some(slot) = self.slots.get_mut(id) {
          *slot = Some(node);
        }
        id
      }
      None => {
        self.slots.push(Some(node));
        self.slots.len() - 1
      }
    }
  }

  fn link(&mut self, parent: NodeId, left: NodeId, right: NodeId) {
    self.node_mut(left).parent = Some(parent);
    self.node_mut(right).parent = Some(parent);
    let parent_node = self.node_mut(parent);
    parent_node.left = Some(left);
    parent_node.right = Some(right);
  }
}

fn bump(next_index: &mut u64) -> u64 {
  let index = *next_index;
  *next_index += 1;
  index
}
