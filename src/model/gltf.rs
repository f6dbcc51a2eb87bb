//! glTF/GLB parsing for model bounds.

use super::ImportedModel;
use crate::error::{CardError, Result};
use crate::types::BoundingBox;
use glam::{Mat4, Quat, Vec3};
use gltf_json as json;
use json::validation::Checked::Valid;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;

pub(super) fn parse_model(data: &[u8]) -> Result<ImportedModel> {
    let json_bytes = json_chunk(data)?;
    let root: json::Root = serde_json::from_slice(json_bytes)
        .map_err(|e| CardError::ModelParseFailed(format!("invalid glTF JSON: {}", e)))?;
    scene_bounds(&root)
}

/// The JSON document: the first chunk of a GLB, or the whole input otherwise.
fn json_chunk(data: &[u8]) -> Result<&[u8]> {
    if data.len() < 4 || &data[0..4] != GLB_MAGIC {
        return Ok(data);
    }
    if data.len() < GLB_HEADER_LEN + CHUNK_HEADER_LEN {
        return Err(CardError::ModelParseFailed("truncated GLB header".to_string()));
    }

    let version = read_u32(data, 4);
    if version != 2 {
        return Err(CardError::ModelParseFailed(format!(
            "unsupported GLB version {}",
            version
        )));
    }
    let length = (read_u32(data, 8) as usize).min(data.len());

    let chunk_len = read_u32(data, GLB_HEADER_LEN) as usize;
    let chunk_type = read_u32(data, GLB_HEADER_LEN + 4);
    if chunk_type != CHUNK_TYPE_JSON {
        return Err(CardError::ModelParseFailed(
            "first GLB chunk is not JSON".to_string(),
        ));
    }

    let start = GLB_HEADER_LEN + CHUNK_HEADER_LEN;
    let end = start
        .checked_add(chunk_len)
        .filter(|&end| end <= length)
        .ok_or_else(|| CardError::ModelParseFailed("truncated GLB JSON chunk".to_string()))?;
    Ok(&data[start..end])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

/// Union of every POSITION accessor box reachable from the default scene.
fn scene_bounds(root: &json::Root) -> Result<ImportedModel> {
    let scene_index = root.scene.map(|s| s.value()).unwrap_or(0);
    let scene = root
        .scenes
        .get(scene_index)
        .ok_or_else(|| CardError::ModelParseFailed("model has no scene".to_string()))?;

    let mut bounds: Option<BoundingBox> = None;
    let mut node_count = 0;
    let mut primitive_count = 0;
    let mut stack: Vec<(usize, Mat4, usize)> = scene
        .nodes
        .iter()
        .map(|n| (n.value(), Mat4::IDENTITY, 0))
        .collect();

    while let Some((index, parent, depth)) = stack.pop() {
        // A tree can't be deeper than its node count; anything deeper is a cycle.
        if depth > root.nodes.len() {
            return Err(CardError::ModelParseFailed(
                "node hierarchy contains a cycle".to_string(),
            ));
        }
        let node = root.nodes.get(index).ok_or_else(|| {
            CardError::ModelParseFailed(format!("node index {} out of range", index))
        })?;
        node_count += 1;
        let world = parent * local_matrix(node);

        if let Some(mesh_index) = node.mesh {
            let mesh = root.meshes.get(mesh_index.value()).ok_or_else(|| {
                CardError::ModelParseFailed(format!(
                    "mesh index {} out of range",
                    mesh_index.value()
                ))
            })?;
            for primitive in &mesh.primitives {
                let positions = Valid(json::mesh::Semantic::Positions);
                let Some(accessor_index) = primitive.attributes.get(&positions) else {
                    continue;
                };
                let accessor = root.accessors.get(accessor_index.value()).ok_or_else(|| {
                    CardError::ModelParseFailed(format!(
                        "accessor index {} out of range",
                        accessor_index.value()
                    ))
                })?;
                let local = accessor_bounds(accessor)?;
                let placed = local.transformed(&world);
                bounds = Some(match bounds {
                    Some(b) => b.union(&placed),
                    None => placed,
                });
                primitive_count += 1;
            }
        }

        for child in node.children.iter().flatten() {
            stack.push((child.value(), world, depth + 1));
        }
    }

    let bounds = bounds
        .ok_or_else(|| CardError::ModelParseFailed("model has no mesh geometry".to_string()))?;
    tracing::debug!(?bounds, node_count, primitive_count, "parsed model bounds");

    Ok(ImportedModel {
        bounds,
        node_count,
        primitive_count,
    })
}

/// Node transform: an explicit matrix, or translation * rotation * scale.
fn local_matrix(node: &json::Node) -> Mat4 {
    if let Some(m) = node.matrix {
        return Mat4::from_cols_array(&m);
    }
    let translation = node.translation.map(Vec3::from).unwrap_or(Vec3::ZERO);
    let rotation = node
        .rotation
        .as_ref()
        .map(|q| Quat::from_array(q.0))
        .unwrap_or(Quat::IDENTITY);
    let scale = node.scale.map(Vec3::from).unwrap_or(Vec3::ONE);
    Mat4::from_scale_rotation_translation(scale, rotation, translation)
}

/// POSITION accessors must carry min/max, so no buffer data is read.
fn accessor_bounds(accessor: &json::Accessor) -> Result<BoundingBox> {
    let min = accessor.min.as_ref().and_then(value_to_vec3);
    let max = accessor.max.as_ref().and_then(value_to_vec3);
    match (min, max) {
        (Some(min), Some(max)) => Ok(BoundingBox::new(min, max)),
        _ => Err(CardError::ModelParseFailed(
            "POSITION accessor is missing min/max bounds".to_string(),
        )),
    }
}

fn value_to_vec3(value: &json::Value) -> Option<[f32; 3]> {
    let arr = value.as_array()?;
    if arr.len() != 3 {
        return None;
    }
    Some([
        arr[0].as_f64()? as f32,
        arr[1].as_f64()? as f32,
        arr[2].as_f64()? as f32,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::fixtures::{glb, gltf_json};
    use crate::types::Extent;

    #[test]
    fn test_parse_plain_gltf() {
        let json = gltf_json([-1.0, -2.0, -0.1], [1.0, 2.0, 0.1], "");
        let model = parse_model(json.as_bytes()).unwrap();
        assert_eq!(model.bounds.min, [-1.0, -2.0, -0.1]);
        assert_eq!(model.bounds.max, [1.0, 2.0, 0.1]);
        assert_eq!(model.node_count, 1);
    }

    #[test]
    fn test_parse_glb_container() {
        let json = gltf_json([0.0, 0.0, 0.0], [2.0, 3.0, 0.5], "");
        let model = parse_model(&glb(&json)).unwrap();
        assert_eq!(model.raw_extent(), Extent::new(2.0, 3.0, 0.5));
    }

    #[test]
    fn test_node_scale_and_translation() {
        let json = gltf_json(
            [-1.0, -1.0, -1.0],
            [1.0, 1.0, 1.0],
            r#", "scale": [2.0, 1.0, 0.5], "translation": [10.0, 0.0, 0.0]"#,
        );
        let model = parse_model(json.as_bytes()).unwrap();
        assert_eq!(model.raw_extent(), Extent::new(4.0, 2.0, 1.0));
        assert_eq!(model.bounds.center(), [10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_node_rotation() {
        // Quarter turn about X: depth and height swap.
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let node = format!(r#", "rotation": [{}, 0.0, 0.0, {}]"#, s, s);
        let json = gltf_json([-2.0, -0.5, -1.0], [2.0, 0.5, 1.0], &node);
        let dims = parse_model(json.as_bytes()).unwrap().bounds.dimensions();
        assert!((dims[0] - 4.0).abs() < 1e-5);
        assert!((dims[1] - 2.0).abs() < 1e-5);
        assert!((dims[2] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_garbage_fails_to_parse() {
        let err = parse_model(b"not a model").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelParseFailed);
    }

    #[test]
    fn test_truncated_glb() {
        let mut bytes = glb(&gltf_json([0.0; 3], [1.0; 3], ""));
        bytes.truncate(40);
        assert_eq!(parse_model(&bytes).unwrap_err().kind(), ErrorKind::ModelParseFailed);
        assert_eq!(parse_model(b"glTF").unwrap_err().kind(), ErrorKind::ModelParseFailed);
    }

    #[test]
    fn test_missing_bounds() {
        let json = r#"{
            "asset": { "version": "2.0" },
            "scenes": [ { "nodes": [0] } ],
            "nodes": [ { "mesh": 0 } ],
            "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 } } ] } ],
            "accessors": [ { "componentType": 5126, "count": 3, "type": "VEC3" } ]
        }"#;
        assert_eq!(
            parse_model(json.as_bytes()).unwrap_err().kind(),
            ErrorKind::ModelParseFailed
        );
    }

    #[test]
    fn test_no_geometry() {
        let json = r#"{
            "asset": { "version": "2.0" },
            "scenes": [ { "nodes": [0] } ],
            "nodes": [ {} ]
        }"#;
        assert!(parse_model(json.as_bytes()).is_err());
    }

    #[test]
    fn test_child_nodes_accumulate() {
        let json = r#"{
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [ { "nodes": [0] } ],
            "nodes": [
                { "children": [1, 2], "translation": [0.0, 1.0, 0.0] },
                { "mesh": 0, "translation": [-1.0, 0.0, 0.0] },
                { "mesh": 0, "translation": [1.0, 0.0, 0.0] }
            ],
            "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 } } ] } ],
            "accessors": [ {
                "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [-0.5, -0.5, -0.05], "max": [0.5, 0.5, 0.05]
            } ]
        }"#;
        let model = parse_model(json.as_bytes()).unwrap();
        assert_eq!(model.node_count, 3);
        assert_eq!(model.primitive_count, 2);
        assert_eq!(model.bounds.min, [-1.5, 0.5, -0.05]);
        assert_eq!(model.bounds.max, [1.5, 1.5, 0.05]);
    }
}
