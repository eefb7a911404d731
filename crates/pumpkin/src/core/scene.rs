use log::debug;

use crate::api::types::NodeId;
use crate::components::node::Node;
use crate::error::{EngineError, Result};

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Node storage and tree structure.
///
/// Nodes sit in a generational arena; parents own the ordered list of their
/// children's handles. A handle stops resolving once its node is destroyed,
/// which is how tweens and sprite batches notice vanished targets.
///
/// Tree edits go through [`add`](Self::add), [`insert`](Self::insert) and
/// [`remove`](Self::remove) so that every node has at most one parent and
/// appears at most once among its parent's children.
#[derive(Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Store a detached node and return its handle.
    pub fn spawn(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 0, node: Some(node) });
            NodeId::new(index, 0)
        }
    }

    /// Destroy a node and its whole subtree. Returns the node itself
    /// (with an empty child list); descendants are dropped.
    pub fn destroy(&mut self, id: NodeId) -> Option<Node> {
        if !self.contains(id) {
            return None;
        }
        self.remove_from_parent(id);

        let mut doomed = Vec::new();
        self.collect_descendants(id, &mut doomed);
        if !doomed.is_empty() {
            debug!("Destroying {} descendants of {:?}", doomed.len(), id);
        }
        for child in doomed {
            self.free_slot(child);
        }

        let mut node = self.free_slot(id)?;
        node.children.clear();
        Some(node)
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.get(id) {
            for &child in &node.children {
                out.push(child);
                self.collect_descendants(child, out);
            }
        }
    }

    fn free_slot(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.len -= 1;
        Some(node)
    }

    /// Whether the handle still refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    fn require(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(EngineError::StaleNode(id))
    }

    // -- Tree structure --

    /// Append `child` to `parent`'s children.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let len = self.require(parent)?.children.len();
        self.insert(parent, child, len)
    }

    /// Insert `child` at `index` among `parent`'s children.
    pub fn insert(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        let parent_node = self.require(parent)?;
        let child_node = self.require(child)?;

        if parent_node.children.contains(&child) {
            return Err(EngineError::DuplicateChild { parent, child });
        }
        if child_node.parent.is_some() {
            return Err(EngineError::AlreadyHasParent(child));
        }
        if parent == child || self.in_parent_hierarchy(parent, child) {
            return Err(EngineError::CycleDetected(child));
        }
        let len = parent_node.children.len();
        if index > len {
            return Err(EngineError::IndexOutOfBounds { index, len });
        }

        if let Some(node) = self.get_mut(parent) {
            node.children.insert(index, child);
        }
        // A clean child would keep the world transform of its previous parent.
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
            node.local_transform_dirty = true;
        }
        Ok(())
    }

    /// Detach `child` from `parent`. Returns false (and does nothing) if it
    /// was not one of `parent`'s children.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(parent_node) = self.get_mut(parent) else {
            return false;
        };
        let Some(pos) = parent_node.children.iter().position(|&c| c == child) else {
            return false;
        };
        parent_node.children.remove(pos);
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
            node.local_transform_dirty = true;
        }
        true
    }

    /// Detach each of `children` from `parent`.
    pub fn remove_children(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            self.remove(parent, child);
        }
    }

    /// Detach every direct child of `parent`. Grandchildren stay attached
    /// to their own parents.
    pub fn remove_all_children(&mut self, parent: NodeId) {
        let Some(node) = self.get_mut(parent) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        for child in children {
            if let Some(node) = self.get_mut(child) {
                node.parent = None;
                node.local_transform_dirty = true;
            }
        }
    }

    /// Detach `id` from its parent, if it has one.
    pub fn remove_from_parent(&mut self, id: NodeId) -> bool {
        match self.parent(id) {
            Some(parent) => self.remove(parent, id),
            None => false,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Direct children in draw order. Empty for stale handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    /// First direct child with the given name.
    pub fn child_node_with_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.name == name))
    }

    /// First direct child with the given tag.
    pub fn child_node_with_tag(&self, parent: NodeId, tag: i32) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.tag == tag))
    }

    /// Whether `ancestor` appears on the parent chain above `id`.
    pub fn in_parent_hierarchy(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    // -- Iteration --

    /// Iterate over all live nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.node
                .as_ref()
                .map(|n| (NodeId::new(i as u32, slot.generation), n))
        })
    }

    /// Iterate over all live nodes mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut Node)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.node
                .as_mut()
                .map(|n| (NodeId::new(i as u32, generation), n))
        })
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Destroy every node. Outstanding handles become stale.
    pub fn clear(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(i as u32);
            }
        }
        self.len = 0;
    }
}
