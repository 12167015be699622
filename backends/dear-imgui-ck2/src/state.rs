//! Render state setup and transform backup

use glam::Mat4;

use crate::draw::DrawData;
use crate::host::{
    BlendFactor, CullMode, FillMode, RenderContext, RenderState, ShadeMode, TextureAddress,
    TextureBlend, TextureFilter, TextureStageState, TransformKind,
};

/// Pipeline state for alpha-blended 2D UI geometry
pub const UI_RENDER_STATES: [RenderState; 10] = [
    RenderState::FillMode(FillMode::Solid),
    RenderState::CullMode(CullMode::None),
    RenderState::Wrap0(0),
    RenderState::SrcBlend(BlendFactor::SrcAlpha),
    RenderState::DestBlend(BlendFactor::InvSrcAlpha),
    RenderState::AlphaBlendEnable(true),
    RenderState::ZWriteEnable(false),
    RenderState::ZEnable(false),
    RenderState::ShadeMode(ShadeMode::Flat),
    RenderState::SpecularEnable(true),
];

/// Texture stage 0 state for UI geometry
pub const UI_STAGE_STATES: [TextureStageState; 7] = [
    TextureStageState::Address(TextureAddress::Clamp),
    TextureStageState::TextureMapBlend(TextureBlend::ModulateAlpha),
    TextureStageState::MinFilter(TextureFilter::Linear),
    TextureStageState::MagFilter(TextureFilter::Linear),
    TextureStageState::StageBlend,
    TextureStageState::TextureTransformFlags(0),
    TextureStageState::TexCoordIndex(0),
];

/// Orthographic projection mapping UI coordinates to clip space
///
/// `display_pos` maps to the top-left corner, depth range is `[0, 1]`.
pub fn create_orthographic_matrix(display_pos: [f32; 2], display_size: [f32; 2]) -> Mat4 {
    let left = display_pos[0];
    let right = display_pos[0] + display_size[0];
    let top = display_pos[1];
    let bottom = display_pos[1] + display_size[1];
    Mat4::orthographic_lh(left, right, bottom, top, 0.0, 1.0)
}

/// Establish the UI render state
///
/// Called once per frame and again whenever a draw list asks for a reset.
pub fn setup_render_state<R: RenderContext + ?Sized>(render: &mut R, draw_data: &DrawData) {
    for state in UI_RENDER_STATES {
        render.set_state(state);
    }
    for state in UI_STAGE_STATES {
        render.set_texture_stage_state(0, state);
    }

    if !render.pretransformed_vertices() {
        render.set_transform(TransformKind::World, Mat4::IDENTITY);
        render.set_transform(TransformKind::View, Mat4::IDENTITY);
        render.set_transform(
            TransformKind::Projection,
            create_orthographic_matrix(draw_data.display_pos, draw_data.display_size),
        );
    }
}

/// Host transform backup for proper state restoration
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TransformBackup {
    world: Mat4,
    view: Mat4,
    projection: Mat4,
}

impl TransformBackup {
    /// Backup host transforms before rendering
    pub fn backup<R: RenderContext + ?Sized>(render: &R) -> Self {
        Self {
            world: render.transform(TransformKind::World),
            view: render.transform(TransformKind::View),
            projection: render.transform(TransformKind::Projection),
        }
    }

    /// Restore host transforms after rendering
    pub fn restore<R: RenderContext + ?Sized>(&self, render: &mut R) {
        render.set_transform(TransformKind::World, self.world);
        render.set_transform(TransformKind::View, self.view);
        render.set_transform(TransformKind::Projection, self.projection);
    }
}
