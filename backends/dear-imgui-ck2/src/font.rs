//! Font atlas texture management

use crate::color::{self, ColorOrder};
use crate::draw::TextureId;
use crate::error::{InitError, InitResult};
use crate::host::RenderContext;
use crate::ui::UiBackend;

/// Name of the host texture object holding the font atlas
pub const FONT_TEXTURE_NAME: &str = "ImGuiFontsTexture";

/// The single font atlas texture of a backend session
///
/// Host textures do not survive a device reset, so the texture is created
/// lazily and destroyed with the device.
#[derive(Debug, Default)]
pub struct FontTexture {
    texture: Option<TextureId>,
}

impl FontTexture {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Create and upload the atlas if it does not exist yet
    pub fn ensure<U, R>(&mut self, ui: &mut U, render: &mut R) -> InitResult<TextureId>
    where
        U: UiBackend + ?Sized,
        R: RenderContext + ?Sized,
    {
        if let Some(texture) = self.texture {
            return Ok(texture);
        }

        let mut atlas = ui
            .font_atlas_rgba32()
            .ok_or_else(|| InitError::FontTexture("font atlas is not available".to_string()))?;
        let expected = atlas.width as usize * atlas.height as usize * 4;
        if atlas.pixels.len() != expected {
            return Err(InitError::FontTexture(format!(
                "atlas has {} bytes, expected {} for {}x{}",
                atlas.pixels.len(),
                expected,
                atlas.width,
                atlas.height
            )));
        }

        color::convert_pixels(&mut atlas.pixels, ColorOrder::Rgba, render.native_color_order());
        let texture = render
            .create_texture(FONT_TEXTURE_NAME, atlas.width, atlas.height, &atlas.pixels)
            .ok_or_else(|| {
                InitError::FontTexture(format!(
                    "host refused a {}x{} texture",
                    atlas.width, atlas.height
                ))
            })?;

        ui.set_font_texture_id(texture);
        self.texture = Some(texture);
        tracing::debug!(
            target: "dear-imgui-ck2",
            "Created font texture {:?} ({}x{})",
            texture,
            atlas.width,
            atlas.height
        );
        Ok(texture)
    }

    /// Destroy the texture and unbind it from the UI; a no-op when absent
    pub fn destroy<U, R>(&mut self, ui: &mut U, render: Option<&mut R>)
    where
        U: UiBackend + ?Sized,
        R: RenderContext + ?Sized,
    {
        let Some(texture) = self.texture.take() else {
            return;
        };
        match render {
            Some(render) => render.destroy_texture(texture),
            None => tracing::warn!(
                target: "dear-imgui-ck2",
                "Render context gone, font texture {:?} left to the host",
                texture
            ),
        }
        ui.set_font_texture_id(TextureId::null());
        tracing::debug!(target: "dear-imgui-ck2", "Destroyed font texture {:?}", texture);
    }
}
