//! glTF/GLB export.

use crate::card::{CardBody, MaterialConfig, TexturedCard};
use crate::error::{CardError, Result};
use crate::mesher::{self, BoxFace, Mesh};
use crate::texture::{ImageAsset, MagFilter, MinFilter, TextureSettings, WrapMode};
use crate::types::PlaneTransform;
use glam::Quat;
use gltf_json as json;
use json::accessor::{ComponentType, Type};
use json::buffer::Target;
use json::validation::Checked::Valid;
use json::validation::USize64;
use std::path::Path;

/// One exported primitive: geometry, material, optional image and the
/// node transform it hangs under.
struct Part {
    mesh: Mesh,
    material: MaterialConfig,
    image: Option<ImageAsset>,
    settings: TextureSettings,
    transform: Option<PlaneTransform>,
}

/// Export a card to GLB format (binary glTF) with embedded textures.
///
/// The root node carries the card's Y rotation. Box bodies become one node
/// per textured face plus one for the untextured sides; each texture plane
/// gets its own node with the placement transform, its mask baked into the
/// image alpha. Imported bodies contribute no geometry.
pub fn export_glb(card: &TexturedCard) -> Result<Vec<u8>> {
    if card.is_disposed() {
        return Err(CardError::CardDisposed);
    }

    let parts = collect_parts(card);
    if parts.is_empty() {
        return Err(CardError::Export(
            "Cannot export card without geometry".to_string(),
        ));
    }

    let mut buffer_data: Vec<u8> = Vec::new();
    let mut accessors = Vec::new();
    let mut buffer_views = Vec::new();
    let mut images = Vec::new();
    let mut samplers = Vec::new();
    let mut textures = Vec::new();
    let mut materials = Vec::new();
    let mut meshes = Vec::new();
    let mut nodes = vec![json::Node {
        camera: None,
        children: Some((1..=parts.len() as u32).map(json::Index::new).collect()),
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh: None,
        rotation: Some(unit_quaternion(Quat::from_rotation_y(card.rotation_y()))),
        scale: None,
        translation: None,
        skin: None,
        weights: None,
    }];

    for part in &parts {
        let (min, max) = match part.mesh.bounds() {
            Some(b) => (b.min, b.max),
            None => ([0.0; 3], [0.0; 3]),
        };

        let accessor_start = accessors.len() as u32;
        let views = [
            (append_f32(&mut buffer_data, &part.mesh.positions_flat()), Target::ArrayBuffer),
            (append_f32(&mut buffer_data, &part.mesh.normals_flat()), Target::ArrayBuffer),
            (append_f32(&mut buffer_data, &part.mesh.uvs_flat()), Target::ArrayBuffer),
            (append_u32(&mut buffer_data, &part.mesh.indices), Target::ElementArrayBuffer),
        ];
        let first_view = buffer_views.len() as u32;
        for ((offset, size), target) in views {
            buffer_views.push(create_buffer_view(offset, size, Some(target)));
        }

        let vertex_count = part.mesh.vertex_count();
        let index_count = part.mesh.indices.len();
        let (float, uint) = (ComponentType::F32, ComponentType::U32);
        accessors.extend([
            create_accessor(first_view, vertex_count, Type::Vec3, float, Some(min), Some(max)),
            create_accessor(first_view + 1, vertex_count, Type::Vec3, float, None, None),
            create_accessor(first_view + 2, vertex_count, Type::Vec2, float, None, None),
            create_accessor(first_view + 3, index_count, Type::Scalar, uint, None, None),
        ]);

        let mut texture_idx = None;
        let mut has_alpha = false;
        if let Some(image) = &part.image {
            let png = image.to_png()?;
            let (offset, size) = append_bytes(&mut buffer_data, &png);
            buffer_views.push(create_buffer_view(offset, size, None));

            images.push(json::Image {
                buffer_view: Some(json::Index::new(buffer_views.len() as u32 - 1)),
                mime_type: Some(json::image::MimeType("image/png".to_string())),
                uri: None,
                extensions: Default::default(),
                extras: Default::default(),
            });
            samplers.push(create_sampler(&part.settings));
            textures.push(json::Texture {
                sampler: Some(json::Index::new(samplers.len() as u32 - 1)),
                source: json::Index::new(images.len() as u32 - 1),
                extensions: Default::default(),
                extras: Default::default(),
            });
            texture_idx = Some(textures.len() as u32 - 1);
            has_alpha = image.has_transparency();
        }

        materials.push(create_material(&part.material, texture_idx, has_alpha));
        meshes.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            primitives: vec![create_primitive(
                accessor_start,
                accessor_start + 3,
                materials.len() as u32 - 1,
            )],
            weights: None,
        });

        nodes.push(json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: Some(json::Index::new(meshes.len() as u32 - 1)),
            rotation: part.transform.map(|t| unit_quaternion(t.rotation)),
            scale: None,
            translation: part.transform.map(|t| t.position.to_array()),
            skin: None,
            weights: None,
        });
    }

    let root = json::Root {
        accessors,
        buffers: vec![json::Buffer {
            byte_length: USize64(buffer_data.len() as u64),
            extensions: Default::default(),
            extras: Default::default(),
            uri: None,
        }],
        buffer_views,
        images,
        samplers,
        textures,
        materials,
        meshes,
        nodes,
        scenes: vec![json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            nodes: vec![json::Index::new(0)],
        }],
        scene: Some(json::Index::new(0)),
        ..Default::default()
    };

    let json_string = json::serialize::to_string(&root)
        .map_err(|e| CardError::Export(format!("Failed to serialize glTF JSON: {}", e)))?;
    Ok(assemble_glb(json_string.as_bytes(), &buffer_data))
}

/// Export a card and write it to `path`.
pub fn write_glb<P: AsRef<Path>>(card: &TexturedCard, path: P) -> Result<()> {
    let glb = export_glb(card)?;
    std::fs::write(path, glb)?;
    Ok(())
}

fn collect_parts(card: &TexturedCard) -> Vec<Part> {
    let mut parts = Vec::new();

    if let CardBody::Box { extent, edge_material, .. } = card.body() {
        let mut sides = Mesh::new();
        let mut side_material = *edge_material;
        for face in BoxFace::ALL {
            let material = card.box_face_material(face).unwrap_or(*edge_material);
            match card.box_face_texture(face) {
                Some(texture) => parts.push(Part {
                    mesh: mesher::box_face(extent, face, &texture.settings),
                    material,
                    image: Some((*texture.image).clone()),
                    settings: texture.settings,
                    transform: None,
                }),
                None => {
                    sides.merge(&mesher::box_face(extent, face, &TextureSettings::default()));
                    side_material = material;
                }
            }
        }
        if !sides.is_empty() {
            parts.push(Part {
                mesh: sides,
                material: side_material,
                image: None,
                settings: TextureSettings::default(),
                transform: None,
            });
        }
    }

    for plane in card.planes() {
        let settings = plane.texture.as_ref().map(|t| t.settings).unwrap_or_default();
        let image = plane.texture.as_ref().map(|t| match &plane.alpha_mask {
            Some(mask) => t.image.masked(mask),
            None => (*t.image).clone(),
        });
        parts.push(Part {
            mesh: mesher::plane(plane.width, plane.height, &settings),
            material: plane.material,
            image,
            settings,
            transform: Some(plane.transform),
        });
    }

    parts
}

/// Wrap JSON and binary payload in a GLB container.
fn assemble_glb(json_bytes: &[u8], buffer_data: &[u8]) -> Vec<u8> {
    // Pad JSON to 4-byte alignment
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let padded_json_len = json_bytes.len() + json_padding;

    // Pad buffer to 4-byte alignment
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let padded_buffer_len = buffer_data.len() + buffer_padding;

    let total_size = 12 + // GLB header
        8 + padded_json_len + // JSON chunk
        8 + padded_buffer_len; // BIN chunk

    let mut glb = Vec::with_capacity(total_size);

    // GLB Header
    glb.extend_from_slice(b"glTF"); // magic
    glb.extend_from_slice(&2u32.to_le_bytes()); // version
    glb.extend_from_slice(&(total_size as u32).to_le_bytes()); // length

    // JSON Chunk
    glb.extend_from_slice(&(padded_json_len as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // chunk type: JSON
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat(0x20u8).take(json_padding)); // padding (spaces)

    // BIN Chunk
    glb.extend_from_slice(&(padded_buffer_len as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // chunk type: BIN
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat(0u8).take(buffer_padding)); // padding (zeros)

    glb
}

/// Append data at a 4-byte aligned offset; returns (offset, length).
fn append_bytes(buffer: &mut Vec<u8>, data: &[u8]) -> (usize, usize) {
    let padding = (4 - (buffer.len() % 4)) % 4;
    buffer.extend(std::iter::repeat(0u8).take(padding));
    let offset = buffer.len();
    buffer.extend_from_slice(data);
    (offset, data.len())
}

fn append_f32(buffer: &mut Vec<u8>, values: &[f32]) -> (usize, usize) {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    append_bytes(buffer, &bytes)
}

fn append_u32(buffer: &mut Vec<u8>, values: &[u32]) -> (usize, usize) {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    append_bytes(buffer, &bytes)
}

fn unit_quaternion(q: Quat) -> json::scene::UnitQuaternion {
    json::scene::UnitQuaternion(q.normalize().to_array())
}

/// Create a buffer view.
fn create_buffer_view(
    offset: usize,
    size: usize,
    target: Option<Target>,
) -> json::buffer::View {
    json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: USize64(size as u64),
        byte_offset: Some(USize64(offset as u64)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        target: target.map(Valid),
    }
}

/// Create an accessor.
fn create_accessor(
    buffer_view: u32,
    count: usize,
    type_: Type,
    component_type: ComponentType,
    min: Option<[f32; 3]>,
    max: Option<[f32; 3]>,
) -> json::Accessor {
    json::Accessor {
        buffer_view: Some(json::Index::new(buffer_view)),
        byte_offset: Some(USize64(0)),
        count: USize64(count as u64),
        component_type: Valid(json::accessor::GenericComponentType(component_type)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(type_),
        min: min.map(|m| json::Value::from(m.to_vec())),
        max: max.map(|m| json::Value::from(m.to_vec())),
        normalized: false,
        sparse: None,
    }
}

/// Create a primitive with positions, normals and UVs in consecutive accessors.
fn create_primitive(
    positions_accessor: u32,
    indices_accessor: u32,
    material: u32,
) -> json::mesh::Primitive {
    let mut attributes = std::collections::BTreeMap::new();
    attributes.insert(
        Valid(json::mesh::Semantic::Positions),
        json::Index::new(positions_accessor),
    );
    attributes.insert(
        Valid(json::mesh::Semantic::Normals),
        json::Index::new(positions_accessor + 1),
    );
    attributes.insert(
        Valid(json::mesh::Semantic::TexCoords(0)),
        json::Index::new(positions_accessor + 2),
    );

    json::mesh::Primitive {
        attributes,
        extensions: Default::default(),
        extras: Default::default(),
        indices: Some(json::Index::new(indices_accessor)),
        material: Some(json::Index::new(material)),
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    }
}

fn create_sampler(settings: &TextureSettings) -> json::texture::Sampler {
    let wrap = |mode: WrapMode| match mode {
        WrapMode::ClampToEdge => json::texture::WrappingMode::ClampToEdge,
        WrapMode::Repeat => json::texture::WrappingMode::Repeat,
        WrapMode::MirroredRepeat => json::texture::WrappingMode::MirroredRepeat,
    };
    let min_filter = match settings.min_filter {
        MinFilter::Nearest => json::texture::MinFilter::Nearest,
        MinFilter::Linear => json::texture::MinFilter::Linear,
        MinFilter::LinearMipmapLinear => json::texture::MinFilter::LinearMipmapLinear,
    };
    let mag_filter = match settings.mag_filter {
        MagFilter::Nearest => json::texture::MagFilter::Nearest,
        MagFilter::Linear => json::texture::MagFilter::Linear,
    };

    json::texture::Sampler {
        mag_filter: Some(Valid(mag_filter)),
        min_filter: Some(Valid(min_filter)),
        wrap_s: Valid(wrap(settings.wrap_s)),
        wrap_t: Valid(wrap(settings.wrap_t)),
        extensions: Default::default(),
        extras: Default::default(),
    }
}

/// Create a PBR material from a material preset.
fn create_material(
    material: &MaterialConfig,
    texture_idx: Option<u32>,
    texture_has_alpha: bool,
) -> json::Material {
    let alpha_mode = if material.is_blended() || (material.transparent && texture_has_alpha) {
        json::material::AlphaMode::Blend
    } else {
        json::material::AlphaMode::Opaque
    };

    json::Material {
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_texture: texture_idx.map(|idx| json::texture::Info {
                index: json::Index::new(idx),
                tex_coord: 0,
                extensions: Default::default(),
                extras: Default::default(),
            }),
            base_color_factor: json::material::PbrBaseColorFactor(material.base_color_factor()),
            metallic_factor: json::material::StrengthFactor(material.metalness),
            roughness_factor: json::material::StrengthFactor(material.roughness),
            metallic_roughness_texture: None,
            extensions: Default::default(),
            extras: Default::default(),
        },
        alpha_mode: Valid(alpha_mode),
        alpha_cutoff: None,
        double_sided: material.double_sided,
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: json::material::EmissiveFactor([0.0, 0.0, 0.0]),
        extensions: Default::default(),
        extras: Default::default(),
    }
}
