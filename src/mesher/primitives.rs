//! Card geometry: the rectangular box body and flat texture planes.

use super::geometry::{Mesh, Vertex};
use crate::texture::TextureSettings;
use crate::types::Extent;
use glam::Vec3;

/// Faces of a box, in the order a box geometry assigns materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxFace {
    PosX,
    NegX,
    PosY,
    NegY,
    /// +Z, the card front.
    Front,
    /// -Z, the card back.
    Back,
}

impl BoxFace {
    pub const ALL: [BoxFace; 6] = [
        BoxFace::PosX,
        BoxFace::NegX,
        BoxFace::PosY,
        BoxFace::NegY,
        BoxFace::Front,
        BoxFace::Back,
    ];

    /// Outward normal.
    pub fn normal(&self) -> Vec3 {
        match self {
            BoxFace::PosX => Vec3::X,
            BoxFace::NegX => Vec3::NEG_X,
            BoxFace::PosY => Vec3::Y,
            BoxFace::NegY => Vec3::NEG_Y,
            BoxFace::Front => Vec3::Z,
            BoxFace::Back => Vec3::NEG_Z,
        }
    }

    /// In-face (u, v) directions with `u × v == normal`, v pointing up
    /// the image.
    fn basis(&self) -> (Vec3, Vec3) {
        match self {
            BoxFace::PosX => (Vec3::NEG_Z, Vec3::Y),
            BoxFace::NegX => (Vec3::Z, Vec3::Y),
            BoxFace::PosY => (Vec3::X, Vec3::NEG_Z),
            BoxFace::NegY => (Vec3::X, Vec3::Z),
            BoxFace::Front => (Vec3::X, Vec3::Y),
            BoxFace::Back => (Vec3::NEG_X, Vec3::Y),
        }
    }

    /// True for the two large faces that carry the card images.
    pub fn is_textured(&self) -> bool {
        matches!(self, BoxFace::Front | BoxFace::Back)
    }
}

/// One face of a box centred on the origin.
pub fn box_face(extent: &Extent, face: BoxFace, settings: &TextureSettings) -> Mesh {
    let half = Vec3::from(extent.to_array()) * 0.5;
    let normal = face.normal();
    let (u, v) = face.basis();
    let center = normal * half;
    let half_u = (u * half).length();
    let half_v = (v * half).length();

    quad(center, normal, u * half_u, v * half_v, settings)
}

/// All six faces of a box centred on the origin, in [`BoxFace::ALL`] order.
pub fn box_faces(extent: &Extent) -> [Mesh; 6] {
    BoxFace::ALL.map(|face| box_face(extent, face, &TextureSettings::default()))
}

/// A `width × height` plane in the X-Y plane facing +Z.
pub fn plane(width: f32, height: f32, settings: &TextureSettings) -> Mesh {
    quad(
        Vec3::ZERO,
        Vec3::Z,
        Vec3::X * (width * 0.5),
        Vec3::Y * (height * 0.5),
        settings,
    )
}

fn quad(
    center: Vec3,
    normal: Vec3,
    half_u: Vec3,
    half_v: Vec3,
    settings: &TextureSettings,
) -> Mesh {
    let corners = [
        (center - half_u - half_v, [0.0, 0.0]),
        (center + half_u - half_v, [1.0, 0.0]),
        (center + half_u + half_v, [1.0, 1.0]),
        (center - half_u + half_v, [0.0, 1.0]),
    ];

    let mut mesh = Mesh::new();
    let mut idx = [0u32; 4];
    for (i, (position, uv_up)) in corners.into_iter().enumerate() {
        // Settings work with v pointing up; vertices store image space.
        let [u, v] = settings.apply(uv_up);
        idx[i] = mesh.add_vertex(Vertex::new(position.to_array(), normal.to_array(), [u, 1.0 - v]));
    }
    mesh.add_quad(idx[0], idx[1], idx[2], idx[3]);
    mesh
}
