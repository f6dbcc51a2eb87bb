//! Card construction from uploaded images and optional models.

use super::{CardBody, CardConfig, CardFace, Texture, TexturePlane, TexturedCard};
use crate::error::{ErrorKind, Result};
use crate::model::{ImportedModel, ModelTransform};
use crate::placement::{
    classify_orientation, compute_placement_with_epsilon, OrientationResult, PlacementPlan,
};
use crate::texture::{CornerMaskCache, ImageAsset, TextureSettings};
use crate::types::{Axis, Extent};
use std::sync::Arc;

/// Raw inputs for one card: encoded images and an optional model file.
#[derive(Debug, Clone, Copy)]
pub struct CardRequest<'a> {
    pub front: &'a [u8],
    pub back: Option<&'a [u8]>,
    pub model: Option<&'a [u8]>,
}

impl<'a> CardRequest<'a> {
    pub fn new(front: &'a [u8]) -> Self {
        Self {
            front,
            back: None,
            model: None,
        }
    }

    pub fn with_back(mut self, back: &'a [u8]) -> Self {
        self.back = Some(back);
        self
    }

    pub fn with_model(mut self, model: &'a [u8]) -> Self {
        self.model = Some(model);
        self
    }
}

/// Builds [`TexturedCard`]s. Holds the config and the corner mask cache, so
/// repeated uploads share one mask per radius.
#[derive(Debug)]
pub struct CardBuilder {
    config: CardConfig,
    masks: CornerMaskCache,
}

impl CardBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        let config = CardConfig::default();
        Self {
            masks: CornerMaskCache::new(config.mask_size),
            config,
        }
    }

    /// Create a builder with custom configuration.
    pub fn with_config(config: CardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            masks: CornerMaskCache::new(config.mask_size),
            config,
        })
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn mask_cache(&self) -> &CornerMaskCache {
        &self.masks
    }

    /// Decode the images, then build on the model if one is given or a
    /// generated box otherwise. A model that fails to parse falls back to
    /// the box; an image that fails to decode is an error.
    pub fn build(&mut self, request: &CardRequest<'_>) -> Result<TexturedCard> {
        let front = ImageAsset::from_bytes(request.front)?;
        let back = request.back.map(ImageAsset::from_bytes).transpose()?;

        match request.model {
            Some(model) => self.build_from_model(model, front, back),
            None => self.build_from_assets(front, back),
        }
    }

    /// Like [`build`](Self::build), but an undecodable image yields the
    /// untextured placeholder instead of an error.
    pub fn build_or_placeholder(
        &mut self,
        request: &CardRequest<'_>,
    ) -> Result<TexturedCard> {
        match self.build(request) {
            Err(e) if e.kind() == ErrorKind::ImageDecodeFailed => {
                tracing::warn!(error = %e, "image decode failed, showing placeholder card");
                self.build_placeholder()
            }
            other => other,
        }
    }

    /// Generated box sized from the front image's aspect ratio.
    pub fn build_default_card(
        &mut self,
        front: &[u8],
        back: Option<&[u8]>,
    ) -> Result<TexturedCard> {
        let front = ImageAsset::from_bytes(front)?;
        let back = back.map(ImageAsset::from_bytes).transpose()?;
        self.build_from_assets(front, back)
    }

    /// Generated box from already decoded images.
    ///
    /// The box faces match the image aspect ratio exactly, so no mask is used.
    pub fn build_from_assets(
        &mut self,
        front: ImageAsset,
        back: Option<ImageAsset>,
    ) -> Result<TexturedCard> {
        let height = self.config.base_height;
        let extent = Extent::new(height * front.aspect_ratio(), height, self.config.thickness);
        let placement = self.place_box(&extent)?;

        let settings = self.config.face_texture;
        let body = CardBody::Box {
            extent,
            face_material: self.config.face_material,
            edge_material: self.config.edge_material,
        };
        Ok(TexturedCard::new(
            body,
            placement,
            Some(texture(front, settings)),
            back.map(|b| texture(b, settings)),
        ))
    }

    /// Textured planes on an imported glTF/GLB model.
    pub fn build_from_model(
        &mut self,
        model_bytes: &[u8],
        front: ImageAsset,
        back: Option<ImageAsset>,
    ) -> Result<TexturedCard> {
        let model = match ImportedModel::from_bytes(model_bytes) {
            Ok(model) => model,
            Err(e) if e.kind() == ErrorKind::ModelParseFailed => {
                tracing::warn!(error = %e, "model import failed, using default card");
                return self.build_from_assets(front, back);
            }
            Err(e) => return Err(e),
        };

        let transform = model.placement_transform(self.config.model_scale);
        let extent = transform.placed_extent(&model.bounds);
        if extent.is_degenerate() {
            tracing::warn!(
                extent = ?extent.to_array(),
                "model bounds are degenerate, using default card"
            );
            return self.build_from_assets(front, back);
        }
        tracing::debug!(
            upright = transform.is_upright(),
            width = extent.width,
            height = extent.height,
            depth = extent.depth,
            "placed imported model"
        );
        self.imported_card(Some(model), transform, extent, front, back)
    }

    /// Textured planes on a mesh whose post-transform extent the caller
    /// already knows.
    pub fn build_from_extent(
        &mut self,
        extent: Extent,
        front: ImageAsset,
        back: Option<ImageAsset>,
    ) -> Result<TexturedCard> {
        self.imported_card(None, ModelTransform::default(), extent, front, back)
    }

    /// Untextured card shown before any upload.
    pub fn build_placeholder(&self) -> Result<TexturedCard> {
        let height = self.config.base_height;
        let extent = Extent::new(
            height * self.config.placeholder_aspect,
            height,
            self.config.thickness,
        );
        let placement = self.place_box(&extent)?;
        let body = CardBody::Box {
            extent,
            face_material: self.config.placeholder_material,
            edge_material: self.config.placeholder_material,
        };
        Ok(TexturedCard::new(body, placement, None, None))
    }

    fn imported_card(
        &mut self,
        model: Option<ImportedModel>,
        transform: ModelTransform,
        extent: Extent,
        front: ImageAsset,
        back: Option<ImageAsset>,
    ) -> Result<TexturedCard> {
        let placement = self.place(&extent)?;
        let mask = self.masks.get(self.config.corner_radius)?;

        let settings = self.config.plane_texture;
        let front = texture(front, settings);
        let back = back.map(|b| texture(b, settings));

        let plane = |face: CardFace, texture: Option<Texture>| TexturePlane {
            face,
            width: placement.plane_width,
            height: placement.plane_height,
            transform: match face {
                CardFace::Front => placement.front_transform(),
                CardFace::Back => placement.back_transform(),
            },
            material: self.config.plane_material,
            texture,
            alpha_mask: Some(Arc::clone(&mask)),
            render_order: 1,
        };
        let front_plane = plane(CardFace::Front, Some(front.clone()));
        let back_plane = plane(CardFace::Back, back.clone());

        let body = CardBody::Imported {
            model,
            transform,
            extent,
        };
        Ok(TexturedCard::new(body, placement, Some(front), back).with_planes(
            front_plane,
            back_plane,
            Some(mask),
        ))
    }

    fn place(&self, extent: &Extent) -> Result<PlacementPlan> {
        let orientation = classify_orientation(extent);
        compute_placement_with_epsilon(extent, &orientation, self.config.plane_epsilon)
    }

    /// The generated box carries its images on ±Z, so it is thin along Z
    /// whatever the image aspect ratio.
    fn place_box(&self, extent: &Extent) -> Result<PlacementPlan> {
        let mut sorted_axes = [
            (Axis::Z, extent.depth),
            (Axis::X, extent.width),
            (Axis::Y, extent.height),
        ];
        sorted_axes[1..].sort_by(|a, b| a.1.total_cmp(&b.1));
        let orientation = OrientationResult {
            thin_axis: Axis::Z,
            sorted_axes,
        };
        compute_placement_with_epsilon(extent, &orientation, self.config.plane_epsilon)
    }
}

impl Default for CardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn texture(image: ImageAsset, settings: TextureSettings) -> Texture {
    Texture::new(Arc::new(image), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardState, MaterialConfig};
    use crate::model::fixtures::{glb, gltf_json};
    use crate::placement::PLANE_EPSILON;
    use crate::texture::asset::png_fixture;
    use crate::mesher::BoxFace;
    use glam::Vec3;

    #[test]
    fn test_default_card_from_portrait_image() {
        let front = png_fixture(300, 400, [200, 10, 10, 255]);
        let back = png_fixture(300, 400, [10, 10, 200, 255]);
        let mut builder = CardBuilder::new();
        let card = builder.build(&CardRequest::new(&front).with_back(&back)).unwrap();

        let extent = card.extent();
        assert!((extent.width - 3.0).abs() < 1e-6);
        assert_eq!(extent.height, 4.0);
        assert_eq!(extent.depth, 0.05);

        let plan = card.placement();
        assert_eq!(plan.thin_axis, Axis::Z);
        assert!((plan.plane_width - 3.0).abs() < 1e-6);
        assert_eq!(plan.plane_height, 4.0);
        assert!(plan.front_transform().normal().abs_diff_eq(Vec3::Z, 1e-6));
        assert!(plan.back_transform().normal().abs_diff_eq(Vec3::NEG_Z, 1e-6));

        // Faces are textured directly; no planes or mask.
        assert!(card.front_plane().is_none());
        assert!(card.corner_mask().is_none());
        assert!(builder.mask_cache().is_empty());
        assert!(card.box_face_texture(BoxFace::Back).is_some());
        assert_eq!(card.state(), CardState::Unattached);
    }

    #[test]
    fn test_default_card_without_back() {
        let front = png_fixture(8, 4, [255, 255, 255, 255]);
        let card = CardBuilder::new().build_default_card(&front, None).unwrap();
        assert_eq!(card.extent().width, 8.0);
        assert!(card.back_texture().is_none());
    }

    #[test]
    fn test_narrow_image_keeps_box_thin_along_z() {
        // 1x100 image: the box is narrower (0.04) than it is thick (0.05).
        let front = png_fixture(1, 100, [255, 255, 255, 255]);
        let card = CardBuilder::new().build_default_card(&front, None).unwrap();

        let extent = card.extent();
        assert!(extent.width < extent.depth);
        let plan = card.placement();
        assert_eq!(plan.thin_axis, Axis::Z);
        assert!((plan.plane_width - 0.04).abs() < 1e-6);
        assert_eq!(plan.plane_height, 4.0);
        assert!((plan.front_offset - (0.025 + PLANE_EPSILON)).abs() < 1e-6);
        assert_eq!(plan.back_offset, -plan.front_offset);
        assert!(plan.front_transform().normal().abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_placeholder_thin_along_z() {
        let config = CardConfig {
            thickness: 3.0,
            ..CardConfig::default()
        };
        let card = CardBuilder::with_config(config).unwrap().build_placeholder().unwrap();
        assert_eq!(card.placement().thin_axis, Axis::Z);
        assert!((card.placement().plane_width - 4.0 * 0.716).abs() < 1e-5);
    }

    #[test]
    fn test_flat_model_falls_back_to_box() {
        let front = png_fixture(3, 4, [255, 255, 255, 255]);
        let model = gltf_json([-1.0, -1.5, 0.0], [1.0, 1.5, 0.0], "");
        let mut builder = CardBuilder::new();

        let card = builder
            .build(&CardRequest::new(&front).with_model(model.as_bytes()))
            .unwrap();
        assert!(!card.body().is_imported());
        assert!((card.extent().width - 3.0).abs() < 1e-6);
        assert_eq!(card.placement().thin_axis, Axis::Z);

        let card = builder
            .build_or_placeholder(&CardRequest::new(&front).with_model(model.as_bytes()))
            .unwrap();
        assert!(card.front_texture().is_some());
    }

    #[test]
    fn test_imported_slab_stood_upright() {
        let front = png_fixture(4, 4, [255, 0, 0, 255]);
        let back = png_fixture(4, 4, [0, 0, 255, 255]);
        let model = gltf_json([-2.5, -0.5, -2.5], [2.5, 0.5, 2.5], "");
        let mut builder = CardBuilder::new();
        let card = builder
            .build(&CardRequest::new(&front).with_back(&back).with_model(model.as_bytes()))
            .unwrap();

        assert!(card.body().is_imported());
        let plan = card.placement();
        // 5 x 1 x 5 slab, rotated upright and scaled by 3.5.
        assert_eq!(plan.thin_axis, Axis::Z);
        assert!((plan.plane_width - 17.5).abs() < 1e-4);
        assert!((plan.plane_height - 17.5).abs() < 1e-4);
        assert!((plan.front_offset - (1.75 + PLANE_EPSILON)).abs() < 1e-4);

        let front_plane = card.front_plane().unwrap();
        let back_plane = card.back_plane().unwrap();
        assert_eq!(front_plane.render_order, 1);
        assert!(front_plane.material.double_sided);
        assert!(Arc::ptr_eq(
            front_plane.alpha_mask.as_ref().unwrap(),
            back_plane.alpha_mask.as_ref().unwrap()
        ));
        assert_eq!(card.corner_mask().unwrap().radius(), 0.03);
        assert_eq!(card.planes().count(), 2);
    }

    #[test]
    fn test_caller_extent_flat_slab() {
        let front = ImageAsset::new(2, 2, vec![255; 16]);
        let card = CardBuilder::new()
            .build_from_extent(Extent::new(5.0, 1.0, 5.0), front, None)
            .unwrap();
        let plan = card.placement();
        assert_eq!(plan.thin_axis, Axis::Y);
        assert_eq!(plan.plane_width, 5.0);
        assert_eq!(plan.plane_height, 5.0);

        let front_plane = card.front_plane().unwrap();
        let expected = Vec3::new(0.0, 0.5 + PLANE_EPSILON, 0.0);
        assert!(front_plane.transform.position.abs_diff_eq(expected, 1e-6));
        assert!(card.back_plane().unwrap().texture.is_none());
    }

    #[test]
    fn test_degenerate_caller_extent() {
        let front = ImageAsset::new(1, 1, vec![255; 4]);
        let err = CardBuilder::new()
            .build_from_extent(Extent::new(1.0, 0.0, 1.0), front, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateExtent);
    }

    #[test]
    fn test_bad_model_falls_back_to_box() {
        let front = png_fixture(3, 4, [255, 255, 255, 255]);
        let card = CardBuilder::new()
            .build(&CardRequest::new(&front).with_model(b"not a glb"))
            .unwrap();
        assert!(!card.body().is_imported());
        assert!((card.extent().width - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_glb_model() {
        let front = png_fixture(2, 2, [255, 255, 255, 255]);
        let model = glb(&gltf_json([-1.0, -2.0, -0.1], [1.0, 2.0, 0.1], ""));
        let card = CardBuilder::new()
            .build(&CardRequest::new(&front).with_model(&model))
            .unwrap();
        assert!(card.body().is_imported());
        assert!((card.placement().plane_height - 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_bad_image_is_an_error() {
        let err = CardBuilder::new()
            .build(&CardRequest::new(b"garbage"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImageDecodeFailed);
    }

    #[test]
    fn test_bad_image_placeholder_fallback() {
        let card = CardBuilder::new()
            .build_or_placeholder(&CardRequest::new(b"garbage"))
            .unwrap();
        assert!(card.front_texture().is_none());
        assert!((card.extent().width - 4.0 * 0.716).abs() < 1e-6);
        assert_eq!(card.box_face_material(BoxFace::Front), Some(MaterialConfig::placeholder()));
    }

    #[test]
    fn test_mask_cached_across_cards() {
        let front = ImageAsset::new(1, 1, vec![255; 4]);
        let config = CardConfig::default().with_mask_size(32);
        let mut builder = CardBuilder::with_config(config).unwrap();
        let a = builder.build_from_extent(Extent::new(2.0, 3.0, 0.1), front.clone(), None).unwrap();
        let b = builder.build_from_extent(Extent::new(4.0, 1.0, 0.2), front, None).unwrap();
        assert!(Arc::ptr_eq(a.corner_mask().unwrap(), b.corner_mask().unwrap()));
        assert_eq!(builder.mask_cache().len(), 1);
        assert_eq!(a.corner_mask().unwrap().size(), 32);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CardConfig::default().with_corner_radius(0.0);
        let err = CardBuilder::with_config(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}
