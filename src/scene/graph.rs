//! Scene graph, the CPU-side hierarchy of nodes.
//!
//! Placement writes decorative groups into the graph once, at population time.
//! `flatten()` walks the tree and produces a flat `Vec<FlatInstance>` that a
//! renderer can upload directly.

use std::collections::{HashMap, HashSet};

use glam::{Mat4, Vec2, Vec3};

use super::flatten::{FlatInstance, InstanceKind};
use super::node::{DecorLayer, InstanceShape, LocalTransform, NodeContent, SceneNode, SceneNodeId};

/// CPU-side scene graph that organizes decorations into a hierarchy.
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
    disabled_layers: HashSet<DecorLayer>,
}

impl SceneGraph {
    /// Create a new scene graph with a root Group node.
    pub fn new() -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, "root", DecorLayer::Structure, NodeContent::Group);

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
            disabled_layers: HashSet::new(),
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a child node under `parent`. Returns the new node's ID.
    pub fn add_child(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        layer: DecorLayer,
        content: NodeContent,
    ) -> SceneNodeId {
        let id = self.alloc_id();
        let mut node = SceneNode::new(id, name, layer, content);
        node.parent = Some(parent);

        self.nodes.insert(id, node);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        id
    }

    /// Add a child and set its transform in one step.
    pub fn add_child_at(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        layer: DecorLayer,
        content: NodeContent,
        transform: LocalTransform,
    ) -> SceneNodeId {
        let id = self.add_child(parent, name, layer, content);
        self.set_transform(id, transform);
        id
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    /// Set the visibility of a node.
    pub fn set_visible(&mut self, id: SceneNodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }

    /// Enable or disable every node on a layer.
    pub fn set_layer_enabled(&mut self, layer: DecorLayer, enabled: bool) {
        if enabled {
            self.disabled_layers.remove(&layer);
        } else {
            self.disabled_layers.insert(layer);
        }
    }

    pub fn is_layer_enabled(&self, layer: DecorLayer) -> bool {
        !self.disabled_layers.contains(&layer)
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Find the first direct child of the root with the given name.
    pub fn find_group(&self, name: &str) -> Option<SceneNodeId> {
        self.children(self.root)
            .find(|id| self.nodes.get(id).is_some_and(|n| n.name == name))
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes in the subtree below `id`, excluding `id` itself.
    pub fn descendant_count(&self, id: SceneNodeId) -> usize {
        self.children(id)
            .map(|c| 1 + self.descendant_count(c))
            .sum()
    }

    /// Walk the tree, propagate transforms, and collect all visible records.
    pub fn flatten(&mut self) -> Vec<FlatInstance> {
        self.propagate_transforms(self.root, Mat4::IDENTITY);

        let mut out = Vec::new();
        self.collect_visible(self.root, &mut out);
        out
    }

    fn propagate_transforms(&mut self, node_id: SceneNodeId, parent_world: Mat4) {
        let (local_mat, children) = {
            let node = match self.nodes.get(&node_id) {
                Some(n) => n,
                None => return,
            };
            (node.local_transform.to_mat4(), node.children.clone())
        };

        let world = parent_world * local_mat;

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.world_transform = world;
        }

        for child_id in children {
            self.propagate_transforms(child_id, world);
        }
    }

    fn collect_visible(&self, node_id: SceneNodeId, out: &mut Vec<FlatInstance>) {
        let node = match self.nodes.get(&node_id) {
            Some(n) => n,
            None => return,
        };

        if !node.visible || !self.is_layer_enabled(node.layer) {
            return;
        }

        let world = node.world_transform;
        match &node.content {
            NodeContent::Group => {}
            NodeContent::Billboard { texture, size } => {
                out.push(
                    FlatInstance::new(InstanceKind::Billboard, node.layer, world, *size)
                        .with_texture(texture.0),
                );
            }
            NodeContent::Decal { texture, size } => {
                out.push(
                    FlatInstance::new(InstanceKind::Decal, node.layer, world, *size)
                        .with_texture(texture.0),
                );
            }
            NodeContent::FloorAnnulus { texture, inner, outer } => {
                out.push(
                    FlatInstance::new(InstanceKind::FloorAnnulus, node.layer, world, Vec2::new(*inner, *outer))
                        .with_texture(texture.0),
                );
            }
            NodeContent::Shadow { radius, opacity } => {
                out.push(
                    FlatInstance::new(InstanceKind::Shadow, node.layer, world, Vec2::splat(*radius))
                        .with_opacity(*opacity),
                );
            }
            NodeContent::Instances { shape, texture, transforms } => {
                let kind = match shape {
                    InstanceShape::Pebble => InstanceKind::Pebble,
                    InstanceShape::Blade => InstanceKind::Blade,
                };
                for m in transforms {
                    let mut entry = FlatInstance::new(kind, node.layer, world * *m, Vec2::ONE);
                    if let Some(t) = texture {
                        entry = entry.with_texture(t.0);
                    }
                    out.push(entry);
                }
            }
        }

        for &child_id in &node.children {
            self.collect_visible(child_id, out);
        }
    }

    /// World-space origin of a node after the last `flatten()`.
    pub fn world_position(&self, id: SceneNodeId) -> Option<Vec3> {
        self.nodes
            .get(&id)
            .map(|n| n.world_transform.transform_point3(Vec3::ZERO))
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureHandle;
    use crate::scene::flatten::NO_TEXTURE;

    fn billboard() -> NodeContent {
        NodeContent::Billboard {
            texture: TextureHandle(0),
            size: Vec2::new(2.0, 3.0),
        }
    }

    #[test]
    fn test_new_scene_graph() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.get(graph.root()).unwrap().name, "root");
    }

    #[test]
    fn test_add_child() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let child = graph.add_child(root, "reef", DecorLayer::Reef, NodeContent::Group);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.get(child).unwrap().parent, Some(root));
        assert_eq!(graph.find_group("reef"), Some(child));
    }

    #[test]
    fn test_descendant_count() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let parent = graph.add_child(root, "rocks", DecorLayer::Rock, NodeContent::Group);
        let c1 = graph.add_child(parent, "c1", DecorLayer::Rock, NodeContent::Group);
        graph.add_child(parent, "c2", DecorLayer::Rock, NodeContent::Group);
        graph.add_child(c1, "plane", DecorLayer::Rock, billboard());

        assert_eq!(graph.descendant_count(root), 4);
        assert_eq!(graph.descendant_count(c1), 1);
        assert_eq!(graph.children(parent).count(), 2);
    }

    #[test]
    fn test_flatten_empty_graph() {
        let mut graph = SceneGraph::new();
        assert!(graph.flatten().is_empty());
    }

    #[test]
    fn test_flatten_transform_propagation() {
        let mut graph = SceneGraph::new();
        let root = graph.root();

        let parent = graph.add_child(root, "cluster", DecorLayer::Reef, NodeContent::Group);
        graph.set_transform(parent, LocalTransform::from_position(Vec3::new(10.0, 0.0, 0.0)));

        let child = graph.add_child(parent, "plane", DecorLayer::Reef, billboard());
        graph.set_transform(child, LocalTransform::from_position(Vec3::new(5.0, 1.0, 0.0)));

        let entries = graph.flatten();
        assert_eq!(entries.len(), 1);
        let pos = entries[0].world_matrix().transform_point3(Vec3::ZERO);
        assert!((pos - Vec3::new(15.0, 1.0, 0.0)).length() < 1e-4);
        assert_eq!(graph.world_position(child), Some(pos));
    }

    #[test]
    fn test_flatten_hidden_node_excluded() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.add_child(root, "reef", DecorLayer::Reef, NodeContent::Group);
        graph.add_child(group, "plane", DecorLayer::Reef, billboard());

        graph.set_visible(group, false);
        assert!(graph.flatten().is_empty());
    }

    #[test]
    fn test_flatten_disabled_layer_excluded() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.add_child(root, "shadow", DecorLayer::Rock, NodeContent::Shadow { radius: 4.0, opacity: 0.24 });
        graph.add_child(root, "plane", DecorLayer::Reef, billboard());

        graph.set_layer_enabled(DecorLayer::Rock, false);
        let entries = graph.flatten();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_kind(InstanceKind::Billboard));

        graph.set_layer_enabled(DecorLayer::Rock, true);
        assert_eq!(graph.flatten().len(), 2);
    }

    #[test]
    fn test_flatten_instances_expand() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let transforms = vec![
            Mat4::from_translation(Vec3::X),
            Mat4::from_translation(Vec3::Z),
            Mat4::from_translation(Vec3::NEG_X),
        ];
        graph.add_child(
            root,
            "gravel",
            DecorLayer::Gravel,
            NodeContent::Instances { shape: InstanceShape::Pebble, texture: None, transforms },
        );

        let entries = graph.flatten();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.is_kind(InstanceKind::Pebble)));
        assert!(entries.iter().all(|e| e.texture == NO_TEXTURE));
    }
}
