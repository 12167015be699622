//! Owned draw command lists
//!
//! The UI library produces a fresh [`DrawData`] every frame. The bridge only
//! reads it, so the model is a plain owned snapshot that any [`UiBackend`]
//! implementation can fill in.
//!
//! [`UiBackend`]: crate::ui::UiBackend

use std::fmt;
use std::rc::Rc;

/// Texture identifier as seen by the UI library (0 means untextured)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TextureId(usize);

impl TextureId {
    #[inline]
    pub const fn new(id: usize) -> Self {
        TextureId(id)
    }

    /// The untextured identifier
    #[inline]
    pub const fn null() -> Self {
        TextureId(0)
    }

    #[inline]
    pub const fn id(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<usize> for TextureId {
    #[inline]
    fn from(id: usize) -> Self {
        TextureId(id)
    }
}

/// UI vertex: position in UI pixels, texture coordinate, `0xAABBGGRR` color
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DrawVert {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub col: u32,
}

/// Index type of the UI library's draw lists
pub type DrawIdx = u16;

/// Parameters shared by every draw command
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DrawCmdParams {
    /// Clip rectangle `[min_x, min_y, max_x, max_y]` in UI coordinates
    pub clip_rect: [f32; 4],
    pub texture_id: TextureId,
    /// First vertex of the command inside the list's vertex buffer
    pub vtx_offset: usize,
    /// First index of the command inside the list's index buffer
    pub idx_offset: usize,
}

/// User callback attached to a draw command
pub type DrawCallback = Rc<dyn Fn(&DrawList, &DrawCmdParams)>;

/// A single draw command
#[derive(Clone)]
pub enum DrawCmd {
    /// Draw `count` indices with the given parameters
    Elements {
        count: usize,
        cmd_params: DrawCmdParams,
    },
    /// Reserved callback asking the renderer to re-apply its render state
    ResetRenderState,
    /// Arbitrary user callback
    UserCallback {
        callback: DrawCallback,
        cmd_params: DrawCmdParams,
    },
}

impl fmt::Debug for DrawCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCmd::Elements { count, cmd_params } => f
                .debug_struct("Elements")
                .field("count", count)
                .field("cmd_params", cmd_params)
                .finish(),
            DrawCmd::ResetRenderState => f.write_str("ResetRenderState"),
            DrawCmd::UserCallback { cmd_params, .. } => f
                .debug_struct("UserCallback")
                .field("cmd_params", cmd_params)
                .finish_non_exhaustive(),
        }
    }
}

/// One draw list: vertices, indices and the commands referencing them
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    vtx_buffer: Vec<DrawVert>,
    idx_buffer: Vec<DrawIdx>,
    commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        vtx_buffer: Vec<DrawVert>,
        idx_buffer: Vec<DrawIdx>,
        commands: Vec<DrawCmd>,
    ) -> Self {
        Self {
            vtx_buffer,
            idx_buffer,
            commands,
        }
    }

    #[inline]
    pub fn vtx_buffer(&self) -> &[DrawVert] {
        &self.vtx_buffer
    }

    #[inline]
    pub fn idx_buffer(&self) -> &[DrawIdx] {
        &self.idx_buffer
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Append a textured quad and the command drawing it
    pub fn add_rect(
        &mut self,
        min: [f32; 2],
        max: [f32; 2],
        col: u32,
        texture_id: TextureId,
        clip_rect: [f32; 4],
    ) -> &mut Self {
        let vtx_offset = self.vtx_buffer.len();
        let idx_offset = self.idx_buffer.len();
        self.vtx_buffer.extend_from_slice(&[
            DrawVert {
                pos: [min[0], min[1]],
                uv: [0.0, 0.0],
                col,
            },
            DrawVert {
                pos: [max[0], min[1]],
                uv: [1.0, 0.0],
                col,
            },
            DrawVert {
                pos: [max[0], max[1]],
                uv: [1.0, 1.0],
                col,
            },
            DrawVert {
                pos: [min[0], max[1]],
                uv: [0.0, 1.0],
                col,
            },
        ]);
        // Indices are relative to the command's vtx_offset.
        self.idx_buffer.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
        self.commands.push(DrawCmd::Elements {
            count: 6,
            cmd_params: DrawCmdParams {
                clip_rect,
                texture_id,
                vtx_offset,
                idx_offset,
            },
        });
        self
    }

    pub fn push_command(&mut self, cmd: DrawCmd) -> &mut Self {
        self.commands.push(cmd);
        self
    }
}

/// Everything the UI library produced for one frame
#[derive(Clone, Debug)]
pub struct DrawData {
    /// Top-left of the area covered by the draw lists
    pub display_pos: [f32; 2],
    pub display_size: [f32; 2],
    /// Framebuffer pixels per UI pixel
    pub framebuffer_scale: [f32; 2],
    draw_lists: Vec<DrawList>,
}

impl Default for DrawData {
    fn default() -> Self {
        Self {
            display_pos: [0.0, 0.0],
            display_size: [0.0, 0.0],
            framebuffer_scale: [1.0, 1.0],
            draw_lists: Vec::new(),
        }
    }
}

impl DrawData {
    pub fn new(display_pos: [f32; 2], display_size: [f32; 2], framebuffer_scale: [f32; 2]) -> Self {
        Self {
            display_pos,
            display_size,
            framebuffer_scale,
            draw_lists: Vec::new(),
        }
    }

    #[inline]
    pub fn draw_lists(&self) -> &[DrawList] {
        &self.draw_lists
    }

    pub fn push_draw_list(&mut self, list: DrawList) {
        self.draw_lists.push(list);
    }

    pub fn clear(&mut self) {
        self.draw_lists.clear();
    }

    /// Framebuffer size in pixels
    pub fn framebuffer_size(&self) -> [f32; 2] {
        [
            self.display_size[0] * self.framebuffer_scale[0],
            self.display_size[1] * self.framebuffer_scale[1],
        ]
    }
}
