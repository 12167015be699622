//! Packed color order translation
//!
//! Dear ImGui packs vertex colors as `0xAABBGGRR` (bytes R, G, B, A in
//! memory). The engine's pre-transformed vertex format expects the D3D
//! `0xAARRGGBB` layout. Mixing them up silently swaps red and blue, so every
//! color crossing the bridge goes through [`convert`].

/// Channel order of a 32-bit packed color
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorOrder {
    /// `0xAABBGGRR`, Dear ImGui's native order
    #[default]
    Rgba,
    /// `0xAARRGGBB`, D3D / engine native order
    Bgra,
}

/// Swap the red and blue channels, keeping green and alpha in place
#[inline]
pub const fn swap_red_blue(color: u32) -> u32 {
    (color & 0xFF00_FF00) | ((color & 0x0000_00FF) << 16) | ((color >> 16) & 0x0000_00FF)
}

/// Translate a packed color from one channel order to another
#[inline]
pub fn convert(color: u32, from: ColorOrder, to: ColorOrder) -> u32 {
    if from == to {
        color
    } else {
        swap_red_blue(color)
    }
}

/// Translate a tightly packed 4-byte-per-pixel bitmap in place
pub fn convert_pixels(pixels: &mut [u8], from: ColorOrder, to: ColorOrder) {
    if from == to {
        return;
    }
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}
