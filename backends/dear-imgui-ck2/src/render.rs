//! Frame render bridge
//!
//! Replays UI draw lists through the host's immediate-mode primitive API.

use crate::color::{self, ColorOrder};
use crate::draw::{DrawCmd, DrawData, DrawList};
use crate::host::{PrimitiveVertex, RenderContext};
use crate::state::{TransformBackup, setup_render_state};

/// Draws UI frames through a host render context
#[derive(Debug, Default)]
pub struct RenderBridge {
    /// Converted vertices of the draw list being replayed, reused across frames
    vertices: Vec<PrimitiveVertex>,
}

impl RenderBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one frame of draw data
    ///
    /// A minimized window (zero framebuffer size) renders nothing. Host
    /// transforms are restored before returning.
    pub fn render<R: RenderContext + ?Sized>(&mut self, render: &mut R, draw_data: &DrawData) {
        let [fb_width, fb_height] = draw_data.framebuffer_size();
        if fb_width <= 0.0 || fb_height <= 0.0 {
            return;
        }

        let backup = TransformBackup::backup(render);
        setup_render_state(render, draw_data);

        let pretransformed = render.pretransformed_vertices();
        let color_order = render.native_color_order();
        let clip_off = draw_data.display_pos;
        let clip_scale = draw_data.framebuffer_scale;

        for draw_list in draw_data.draw_lists() {
            self.convert_vertices(draw_list, draw_data, pretransformed, color_order);

            for cmd in draw_list.commands() {
                match cmd {
                    DrawCmd::Elements { count, cmd_params } => {
                        // Project scissor/clipping rectangles into framebuffer space
                        let clip_min_x = ((cmd_params.clip_rect[0] - clip_off[0]) * clip_scale[0]).max(0.0);
                        let clip_min_y = ((cmd_params.clip_rect[1] - clip_off[1]) * clip_scale[1]).max(0.0);
                        let clip_max_x = ((cmd_params.clip_rect[2] - clip_off[0]) * clip_scale[0]).min(fb_width);
                        let clip_max_y = ((cmd_params.clip_rect[3] - clip_off[1]) * clip_scale[1]).min(fb_height);
                        if clip_max_x <= clip_min_x || clip_max_y <= clip_min_y {
                            continue;
                        }

                        let Some(vertices) = self.vertices.get(cmd_params.vtx_offset..) else {
                            continue;
                        };
                        let Some(end) = cmd_params.idx_offset.checked_add(*count) else {
                            continue;
                        };
                        let Some(indices) = draw_list.idx_buffer().get(cmd_params.idx_offset..end)
                        else {
                            continue;
                        };
                        if indices.is_empty() {
                            continue;
                        }

                        render.set_scissor([clip_min_x, clip_min_y, clip_max_x, clip_max_y]);
                        let texture = cmd_params.texture_id;
                        render.set_texture((!texture.is_null()).then_some(texture));
                        render.draw_primitive(vertices, indices);
                    }
                    DrawCmd::ResetRenderState => setup_render_state(render, draw_data),
                    DrawCmd::UserCallback {
                        callback,
                        cmd_params,
                    } => callback(draw_list, cmd_params),
                }
            }
        }

        backup.restore(render);
    }

    /// Convert a draw list's vertices into host primitives
    ///
    /// Pretransformed hosts get framebuffer pixel positions; the others get
    /// UI coordinates and rely on the orthographic projection.
    fn convert_vertices(
        &mut self,
        draw_list: &DrawList,
        draw_data: &DrawData,
        pretransformed: bool,
        color_order: ColorOrder,
    ) {
        let [off_x, off_y] = draw_data.display_pos;
        let [scale_x, scale_y] = draw_data.framebuffer_scale;

        self.vertices.clear();
        self.vertices.extend(draw_list.vtx_buffer().iter().map(|v| {
            let [x, y] = if pretransformed {
                [(v.pos[0] - off_x) * scale_x, (v.pos[1] - off_y) * scale_y]
            } else {
                v.pos
            };
            PrimitiveVertex {
                position: [x, y, 0.0, 1.0],
                color: color::convert(v.col, ColorOrder::Rgba, color_order),
                uv: v.uv,
            }
        }));
    }
}
