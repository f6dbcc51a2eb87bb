//! Imported 3D models.
//!
//! Only the information placement needs is kept: the bounding box of the
//! model's default scene and the transform that stands it upright, scales it
//! and centres it on the origin. The geometry itself stays with the host
//! scene graph.

mod gltf;
mod transform;

pub use transform::ModelTransform;

use crate::error::Result;
use crate::types::{BoundingBox, Extent};
use std::path::Path;

/// Summary of a parsed glTF/GLB model.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedModel {
    /// Bounds of the default scene in model space, node transforms applied.
    pub bounds: BoundingBox,
    /// Number of nodes reachable from the default scene.
    pub node_count: usize,
    /// Number of mesh primitives contributing to the bounds.
    pub primitive_count: usize,
}

impl ImportedModel {
    /// Parse GLB bytes or glTF JSON.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        gltf::parse_model(data)
    }

    /// Load a model from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Extent before any viewer transform.
    pub fn raw_extent(&self) -> Extent {
        self.bounds.extent()
    }

    /// Transform applied before texturing: upright, scaled by `scale`, centred.
    pub fn placement_transform(&self, scale: f32) -> ModelTransform {
        ModelTransform::for_bounds(&self.bounds, scale)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// glTF JSON with one node whose mesh spans `min..max`, placed by `node`.
    pub fn gltf_json(min: [f32; 3], max: [f32; 3], node: &str) -> String {
        format!(
            r#"{{
                "asset": {{ "version": "2.0" }},
                "scene": 0,
                "scenes": [ {{ "nodes": [0] }} ],
                "nodes": [ {{ "mesh": 0 {node} }} ],
                "meshes": [ {{ "primitives": [ {{ "attributes": {{ "POSITION": 0 }} }} ] }} ],
                "accessors": [ {{
                    "componentType": 5126,
                    "count": 8,
                    "type": "VEC3",
                    "min": [{}, {}, {}],
                    "max": [{}, {}, {}]
                }} ]
            }}"#,
            min[0], min[1], min[2], max[0], max[1], max[2],
            node = node,
        )
    }

    /// Wrap a JSON document in a GLB container without a BIN chunk.
    pub fn glb(json: &str) -> Vec<u8> {
        let mut bytes = json.as_bytes().to_vec();
        while bytes.len() % 4 != 0 {
            bytes.push(b' ');
        }
        let total = 12 + 8 + bytes.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes());
        glb.extend_from_slice(&bytes);
        glb
    }
}
