//! In-memory collision world built from a tagged ownership tree.
//!
//! Nodes live in an arena and reference their parent by index. Tags are
//! resolved top-down once in [`CollisionWorldBuilder::build`], and every shape
//! is placed at its composed world pose, so a probe is a handful of avian
//! collider ray casts.

use avian3d::prelude::*;
use bevy::math::Affine3A;
use bevy::prelude::*;

use super::query::{CollisionQuery, Contact};
use super::tag::CollisionTag;

/// Subdivisions used when a non-uniform scale can't be applied exactly
const SCALE_DETAIL: u32 = 10;

/// Index of a node inside a [`CollisionWorldBuilder`] / [`CollisionWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Indexed triangle soup in node-local space
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self { vertices, indices }
    }

    /// Axis-aligned rectangle on the XZ plane centered at the origin, facing +Y
    pub fn quad(half_x: f32, half_z: f32) -> Self {
        Self::new(
            vec![
                Vec3::new(-half_x, 0.0, -half_z),
                Vec3::new(half_x, 0.0, -half_z),
                Vec3::new(half_x, 0.0, half_z),
                Vec3::new(-half_x, 0.0, half_z),
            ],
            vec![[0, 2, 1], [0, 3, 2]],
        )
    }

    /// Closed box centered at the origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents;
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let indices = vec![
            // -Z
            [0, 2, 1],
            [0, 3, 2],
            // +Z
            [4, 5, 6],
            [4, 6, 7],
            // -X
            [0, 4, 7],
            [0, 7, 3],
            // +X
            [1, 2, 6],
            [1, 6, 5],
            // -Y
            [0, 1, 5],
            [0, 5, 4],
            // +Y
            [3, 7, 6],
            [3, 6, 2],
        ];
        Self::new(vertices, indices)
    }

    /// Trimesh collider for this geometry.
    ///
    /// Triangles pointing past the vertex list are dropped; `None` when no
    /// triangle is left.
    pub fn to_collider(&self) -> Option<Collider> {
        let indices: Vec<[u32; 3]> = self
            .indices
            .iter()
            .copied()
            .filter(|tri| tri.iter().all(|&i| (i as usize) < self.vertices.len()))
            .collect();
        if indices.is_empty() {
            return None;
        }
        Some(Collider::trimesh(self.vertices.clone(), indices))
    }
}

#[derive(Debug, Clone)]
struct NodeDesc {
    parent: Option<NodeId>,
    tag: Option<CollisionTag>,
    transform: Transform,
    collider: Option<Collider>,
}

/// Collects the ownership tree of the scene before it is baked.
#[derive(Debug, Default)]
pub struct CollisionWorldBuilder {
    nodes: Vec<NodeDesc>,
}

impl CollisionWorldBuilder {
    /// Appends a node under `parent` with a transform relative to it.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not issued by this builder.
    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        tag: Option<CollisionTag>,
        transform: Transform,
        collider: Option<Collider>,
    ) -> NodeId {
        if let Some(parent) = parent {
            assert!(
                parent.index() < self.nodes.len(),
                "parent {parent:?} does not belong to this collision world"
            );
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeDesc {
            parent,
            tag,
            transform,
            collider,
        });
        id
    }

    /// Adds a shape-less grouping node, typically the root of an imported model
    pub fn add_group(
        &mut self,
        parent: Option<NodeId>,
        tag: Option<CollisionTag>,
        transform: Transform,
    ) -> NodeId {
        self.add_node(parent, tag, transform, None)
    }

    /// Adds a leaf carrying any avian collider, e.g. one made with
    /// [`Collider::trimesh_from_mesh`]
    pub fn add_collider(
        &mut self,
        parent: Option<NodeId>,
        tag: Option<CollisionTag>,
        transform: Transform,
        collider: Collider,
    ) -> NodeId {
        self.add_node(parent, tag, transform, Some(collider))
    }

    /// Adds a leaf carrying triangle geometry.
    ///
    /// A mesh without a usable triangle still takes a node, but has nothing
    /// to hit.
    pub fn add_mesh(
        &mut self,
        parent: Option<NodeId>,
        tag: Option<CollisionTag>,
        transform: Transform,
        mesh: TriangleMesh,
    ) -> NodeId {
        let collider = mesh.to_collider();
        if collider.is_none() {
            debug!("collision mesh with no valid triangles ignored");
        }
        self.add_node(parent, tag, transform, collider)
    }

    /// Composes world transforms, resolves tags and places every shape.
    pub fn build(self) -> CollisionWorld {
        let mut world_transforms: Vec<Affine3A> = Vec::with_capacity(self.nodes.len());
        let mut solid: Vec<bool> = Vec::with_capacity(self.nodes.len());
        let mut shapes = Vec::new();

        // Parents always precede children, so a single forward pass is top-down.
        for node in self.nodes {
            let local = node.transform.compute_affine();
            let (world, inherited) = match node.parent {
                Some(parent) => (
                    world_transforms[parent.index()] * local,
                    solid[parent.index()],
                ),
                None => (local, true),
            };
            let is_solid = node.tag.map_or(inherited, CollisionTag::is_solid);

            world_transforms.push(world);
            solid.push(is_solid);

            // Non-solid shapes can never stop a probe
            if let Some(collider) = node.collider.filter(|_| is_solid) {
                shapes.push(PlacedShape::new(collider, &world));
            }
        }

        CollisionWorld { solid, shapes }
    }
}

/// A solid collider at its world pose, with the scale already applied to the
/// shape
#[derive(Debug, Clone)]
struct PlacedShape {
    collider: Collider,
    translation: Vec3,
    rotation: Quat,
}

impl PlacedShape {
    fn new(mut collider: Collider, world: &Affine3A) -> Self {
        let (scale, rotation, translation) = world.to_scale_rotation_translation();
        collider.set_scale(scale, SCALE_DETAIL);
        Self {
            collider,
            translation,
            rotation,
        }
    }

    fn cast(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Contact> {
        self.collider
            .cast_ray(
                self.translation,
                self.rotation,
                origin,
                direction.as_vec3(),
                max_distance,
                true,
            )
            .map(|(distance, normal)| Contact::new(distance, normal))
    }
}

/// Static world geometry with tags already resolved.
///
/// Immutable after [`CollisionWorldBuilder::build`]; safe to share between
/// any number of readers.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    solid: Vec<bool>,
    shapes: Vec<PlacedShape>,
}

impl CollisionWorld {
    pub fn builder() -> CollisionWorldBuilder {
        CollisionWorldBuilder::default()
    }

    /// Resolved tag of a node; unknown ids read as solid
    pub fn is_solid(&self, node: NodeId) -> bool {
        self.solid.get(node.index()).copied().unwrap_or(true)
    }

    pub fn node_count(&self) -> usize {
        self.solid.len()
    }

    /// Number of solid shapes a probe tests against
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// True when nothing can stop a probe
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl CollisionQuery for CollisionWorld {
    fn probe(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Contact> {
        self.shapes
            .iter()
            .filter_map(|shape| shape.cast(origin, direction, max_distance))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
