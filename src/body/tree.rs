//! Fixed-capacity arena tree holding a body's parts
//!
//! Parts and nodes live in fixed-size arrays and reference each other by
//! index. Capacity is decided at compile time so damage propagation never
//! allocates; over-full insertions are rejected at load time.

use tracing::warn;

use crate::body::part::BodyPart;
use crate::core::error::{AnatomyError, Result};

/// Maximum number of parts in one body
pub const MAX_PARTS: usize = 32;

/// Maximum number of children under one node
pub const MAX_CHILDREN: usize = 16;

/// Node slots: every part plus a part-less root container
pub const MAX_NODES: usize = MAX_PARTS + 1;

/// Index of a node in a `BodyTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct NodeId(u8);

impl NodeId {
    /// Sentinel returned by rejected insertions
    pub const NULL: NodeId = NodeId(u8::MAX);

    pub const ROOT: NodeId = NodeId(0);

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Structural entry of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyNode {
    /// Slot in the part array, `None` for a pure container
    part: Option<u8>,
    parent: NodeId,
    children: [NodeId; MAX_CHILDREN],
    child_count: u8,
}

impl BodyNode {
    const EMPTY: BodyNode = BodyNode {
        part: None,
        parent: NodeId::NULL,
        children: [NodeId::NULL; MAX_CHILDREN],
        child_count: 0,
    };

    pub fn part_index(&self) -> Option<usize> {
        self.part.map(usize::from)
    }

    /// `NodeId::NULL` for the root
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children[..self.child_count as usize]
    }

    pub fn child_count(&self) -> usize {
        self.child_count as usize
    }
}

/// Arena tree of body parts
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTree {
    nodes: [BodyNode; MAX_NODES],
    node_count: usize,
    parts: [Option<BodyPart>; MAX_PARTS],
    part_count: usize,
}

impl BodyTree {
    /// Tree with a part-less root container
    pub fn new() -> Self {
        let mut nodes = [BodyNode::EMPTY; MAX_NODES];
        nodes[0].parent = NodeId::NULL;

        Self {
            nodes,
            node_count: 1,
            parts: std::array::from_fn(|_| None),
            part_count: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn part_count(&self) -> usize {
        self.part_count
    }

    /// Put a part on the root container
    pub fn set_root_part(&mut self, part: BodyPart) -> Result<()> {
        match self.nodes[0].part {
            Some(slot) => self.parts[slot as usize] = Some(part),
            None => {
                let slot = self.store_part(part)?;
                self.nodes[0].part = Some(slot);
            }
        }
        Ok(())
    }

    /// Attach `part` under `parent`
    pub fn try_insert(&mut self, parent: NodeId, part: BodyPart) -> Result<NodeId> {
        let parent_node = self.node(parent).ok_or_else(|| {
            AnatomyError::InvalidDefinition(format!(
                "cannot attach '{}' to missing node {:?}",
                part.display_name(),
                parent
            ))
        })?;

        if parent_node.child_count() >= MAX_CHILDREN {
            return Err(AnatomyError::CapacityExceeded {
                limit: MAX_CHILDREN,
                what: format!("children under node {}", parent.index()),
            });
        }
        if self.node_count >= MAX_NODES {
            return Err(AnatomyError::CapacityExceeded {
                limit: MAX_NODES,
                what: "body nodes".into(),
            });
        }

        let slot = self.store_part(part)?;
        let id = NodeId(self.node_count as u8);
        self.nodes[id.index()] = BodyNode {
            part: Some(slot),
            parent,
            ..BodyNode::EMPTY
        };
        self.node_count += 1;

        let parent_node = &mut self.nodes[parent.index()];
        parent_node.children[parent_node.child_count as usize] = id;
        parent_node.child_count += 1;

        Ok(id)
    }

    /// Attach `part` under `parent`, returning `NodeId::NULL` when rejected
    pub fn insert(&mut self, parent: NodeId, part: BodyPart) -> NodeId {
        let name = part.display_name().to_string();
        match self.try_insert(parent, part) {
            Ok(id) => id,
            Err(e) => {
                warn!(part = %name, error = %e, "Rejected body part insertion");
                NodeId::NULL
            }
        }
    }

    fn store_part(&mut self, part: BodyPart) -> Result<u8> {
        if self.part_count >= MAX_PARTS {
            return Err(AnatomyError::CapacityExceeded {
                limit: MAX_PARTS,
                what: "body parts".into(),
            });
        }
        let slot = self.part_count;
        self.parts[slot] = Some(part);
        self.part_count += 1;
        Ok(slot as u8)
    }

    pub fn node(&self, id: NodeId) -> Option<&BodyNode> {
        if id.index() < self.node_count {
            Some(&self.nodes[id.index()])
        } else {
            None
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(BodyNode::children).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)
            .map(BodyNode::parent)
            .filter(|parent| !parent.is_null())
    }

    pub fn part(&self, id: NodeId) -> Option<&BodyPart> {
        let slot = self.node(id)?.part_index()?;
        self.parts[slot].as_ref()
    }

    pub fn part_mut(&mut self, id: NodeId) -> Option<&mut BodyPart> {
        let slot = self.node(id)?.part_index()?;
        self.parts[slot].as_mut()
    }

    /// Parts in node order (parents before their children)
    pub fn parts(&self) -> impl Iterator<Item = (NodeId, &BodyPart)> + '_ {
        (0..self.node_count).filter_map(move |i| {
            let id = NodeId(i as u8);
            self.part(id).map(|part| (id, part))
        })
    }

    pub fn parts_mut(&mut self) -> impl Iterator<Item = &mut BodyPart> + '_ {
        self.parts.iter_mut().flatten()
    }

    /// First node whose part has this display name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.parts()
            .find(|(_, part)| part.display_name() == name)
            .map(|(id, _)| id)
    }

    /// Number of edges between `id` and the root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }
}

impl Default for BodyTree {
    fn default() -> Self {
        Self::new()
    }
}
