//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
//! Draw list: vertex/index/command buffers plus the path and shape emitters that fill them.
use super::*;
use std::fmt;
use std::rc::Rc;

/// Index type of [`DrawList::idx_buffer`].
pub type DrawIdx = u16;

/// Renderer callback stored in a [`DrawCmd`] in place of triangles.
pub type DrawCallback = Rc<dyn Fn(&DrawList, &DrawCmd)>;

#[derive(Copy, Clone, Debug, Default)]
#[repr(C)]
/// Vertex layout consumed by renderer back-ends.
pub struct DrawVert {
    /// Screen space position.
    pub pos: Vec2f,
    /// Texture coordinates.
    pub uv: Vec2f,
    /// Packed `ABGR` color.
    pub col: u32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
/// Scissor rectangle in screen space, stored as `(x1, y1, x2, y2)`.
pub struct ClipRect {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
}

impl ClipRect {
    /// Builds a clip rectangle from its edges.
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self { Self { x1, y1, x2, y2 } }

    /// Returns `true` when the rectangle is not inverted.
    pub fn is_valid(&self) -> bool { self.x1 <= self.x2 && self.y1 <= self.y2 }

    /// Intersection with `other`.
    pub fn intersect(&self, other: &ClipRect) -> ClipRect {
        ClipRect::new(self.x1.max(other.x1), self.y1.max(other.y1), self.x2.min(other.x2), self.y2.min(other.y2))
    }

    /// Converts back to a [`Rect`].
    pub fn to_rect(&self) -> Rect { Rect::new(self.x1, self.y1, self.x2, self.y2) }
}

#[derive(Clone, Default)]
/// One batch of triangles sharing a clip rectangle and a texture.
pub struct DrawCmd {
    /// Number of indices, always a multiple of 3.
    pub elem_count: u32,
    /// Scissor rectangle in screen space.
    pub clip_rect: ClipRect,
    /// Texture to bind.
    pub texture_id: TextureId,
    /// Value to add to every index of this command.
    pub vtx_offset: u32,
    /// First index of this command in the index buffer.
    pub idx_offset: u32,
    /// When set, the renderer invokes the callback instead of drawing triangles.
    pub user_callback: Option<DrawCallback>,
    /// Opaque value handed to the callback.
    pub user_callback_data: usize,
}

impl fmt::Debug for DrawCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawCmd")
            .field("elem_count", &self.elem_count)
            .field("clip_rect", &self.clip_rect)
            .field("texture_id", &self.texture_id)
            .field("vtx_offset", &self.vtx_offset)
            .field("idx_offset", &self.idx_offset)
            .field("user_callback", &self.user_callback.is_some())
            .field("user_callback_data", &self.user_callback_data)
            .finish()
    }
}

impl DrawCmd {
    /// Returns `true` if `other` can be folded into `self` by extending its element count.
    pub fn can_merge(&self, other: &DrawCmd) -> bool {
        self.clip_rect == other.clip_rect
            && self.texture_id == other.texture_id
            && self.vtx_offset == other.vtx_offset
            && self.user_callback.is_none()
            && other.user_callback.is_none()
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Tessellation switches of a [`DrawList`].
    pub struct DrawListFlags : u32 {
        /// Strokes get a one pixel translucent fringe.
        const ANTI_ALIASED_LINES = 1 << 0;
        /// Fills get a one pixel translucent fringe.
        const ANTI_ALIASED_FILL = 1 << 1;
        /// The renderer honors `vtx_offset`, so large meshes can be split under the 16-bit index limit.
        const ALLOW_VTX_OFFSET = 1 << 2;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Selects which corners of a rectangle get rounded.
    pub struct DrawCornerFlags : u32 {
        /// Top left.
        const TOP_LEFT = 1 << 0;
        /// Top right.
        const TOP_RIGHT = 1 << 1;
        /// Bottom left.
        const BOT_LEFT = 1 << 2;
        /// Bottom right.
        const BOT_RIGHT = 1 << 3;
        /// Both top corners.
        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        /// Both bottom corners.
        const BOT = Self::BOT_LEFT.bits() | Self::BOT_RIGHT.bits();
        /// Both left corners.
        const LEFT = Self::TOP_LEFT.bits() | Self::BOT_LEFT.bits();
        /// Both right corners.
        const RIGHT = Self::TOP_RIGHT.bits() | Self::BOT_RIGHT.bits();
        /// Every corner.
        const ALL = 0xF;
    }
}

#[derive(Copy, Clone, Debug)]
/// Settings shared by every draw list of a context, rebuilt at the start of each frame.
pub struct DrawListSharedData {
    /// UV of a fully opaque white texel, used by untextured primitives.
    pub tex_uv_white_pixel: Vec2f,
    /// Default text size.
    pub font_size: f32,
    /// Bezier tessellation tolerance.
    pub curve_tessellation_tol: f32,
    /// Clip rectangle used when the clip stack is empty.
    pub clip_rect_fullscreen: ClipRect,
    /// Flags a list starts the frame with.
    pub initial_flags: DrawListFlags,
    /// Unit circle sampled at 12 evenly spaced angles.
    pub circle_vtx12: [Vec2f; 12],
}

impl Default for DrawListSharedData {
    fn default() -> Self {
        let mut circle_vtx12 = [Vec2f::default(); 12];
        for (i, v) in circle_vtx12.iter_mut().enumerate() {
            let a = i as f32 * 2.0 * std::f32::consts::PI / 12.0;
            *v = vec2f(a.cos(), a.sin());
        }
        Self {
            tex_uv_white_pixel: Vec2f::default(),
            font_size: 13.0,
            curve_tessellation_tol: 1.25,
            clip_rect_fullscreen: ClipRect::new(-8192.0, -8192.0, 8192.0, 8192.0),
            initial_flags: DrawListFlags::ANTI_ALIASED_LINES | DrawListFlags::ANTI_ALIASED_FILL,
            circle_vtx12,
        }
    }
}

fn normalize_over_zero(x: f32, y: f32) -> (f32, f32) {
    let d2 = x * x + y * y;
    if d2 > 0.0 {
        let inv_len = 1.0 / d2.sqrt();
        (x * inv_len, y * inv_len)
    } else {
        (x, y)
    }
}

// keeps the miter of nearly opposite normals from exploding
fn fix_normal(x: f32, y: f32) -> (f32, f32) {
    let d2 = (x * x + y * y).max(0.5);
    let inv_len2 = 1.0 / d2;
    (x * inv_len2, y * inv_len2)
}

#[allow(clippy::too_many_arguments)]
fn path_bezier_to_casteljau(path: &mut Vec<Vec2f>, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32, x4: f32, y4: f32, tess_tol: f32, level: u32) {
    let dx = x4 - x1;
    let dy = y4 - y1;
    let d2 = ((x2 - x4) * dy - (y2 - y4) * dx).abs();
    let d3 = ((x3 - x4) * dy - (y3 - y4) * dx).abs();
    if (d2 + d3) * (d2 + d3) < tess_tol * (dx * dx + dy * dy) {
        path.push(vec2f(x4, y4));
    } else if level < 10 {
        let (x12, y12) = ((x1 + x2) * 0.5, (y1 + y2) * 0.5);
        let (x23, y23) = ((x2 + x3) * 0.5, (y2 + y3) * 0.5);
        let (x34, y34) = ((x3 + x4) * 0.5, (y3 + y4) * 0.5);
        let (x123, y123) = ((x12 + x23) * 0.5, (y12 + y23) * 0.5);
        let (x234, y234) = ((x23 + x34) * 0.5, (y23 + y34) * 0.5);
        let (x1234, y1234) = ((x123 + x234) * 0.5, (y123 + y234) * 0.5);
        path_bezier_to_casteljau(path, x1, y1, x12, y12, x123, y123, x1234, y1234, tess_tol, level + 1);
        path_bezier_to_casteljau(path, x1234, y1234, x234, y234, x34, y34, x4, y4, tess_tol, level + 1);
    }
}

/// A mesh builder: one vertex buffer, one index buffer and the draw commands slicing them.
///
/// Every primitive goes through [`DrawList::prim_reserve`] before writing vertices and indices.
/// Commands are opened lazily, merged when the clip rectangle or texture does not actually change,
/// and split when 16-bit indices would overflow and the renderer supports vertex offsets.
#[derive(Clone)]
pub struct DrawList {
    /// Draw commands, typically one GPU draw call each.
    pub cmd_buffer: Vec<DrawCmd>,
    /// Index buffer, each command consumes `elem_count` of these.
    pub idx_buffer: Vec<DrawIdx>,
    /// Vertex buffer.
    pub vtx_buffer: Vec<DrawVert>,
    /// Tessellation switches.
    pub flags: DrawListFlags,

    pub(crate) shared: DrawListSharedData,
    pub(crate) owner_name: String,
    pub(crate) vtx_current_offset: usize,
    vtx_write_end: usize,
    idx_write_end: usize,
    idx_overflowed: bool,
    clip_rect_stack: Vec<ClipRect>,
    texture_id_stack: Vec<TextureId>,
    path: Vec<Vec2f>,
    splitter: DrawListSplitter,
}

impl Default for DrawList {
    fn default() -> Self { Self::new(&DrawListSharedData::default()) }
}

impl fmt::Debug for DrawList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawList")
            .field("owner", &self.owner_name)
            .field("cmds", &self.cmd_buffer.len())
            .field("idx", &self.idx_buffer.len())
            .field("vtx", &self.vtx_buffer.len())
            .finish()
    }
}

impl DrawList {
    /// Creates an empty list bound to `shared`.
    pub fn new(shared: &DrawListSharedData) -> Self {
        Self {
            cmd_buffer: Vec::new(),
            idx_buffer: Vec::new(),
            vtx_buffer: Vec::new(),
            flags: shared.initial_flags,
            shared: *shared,
            owner_name: String::new(),
            vtx_current_offset: 0,
            vtx_write_end: 0,
            idx_write_end: 0,
            idx_overflowed: false,
            clip_rect_stack: Vec::new(),
            texture_id_stack: Vec::new(),
            path: Vec::new(),
            splitter: DrawListSplitter::default(),
        }
    }

    /// Name of the window or layer owning the list.
    pub fn owner_name(&self) -> &str { &self.owner_name }

    /// Clears the list and rebinds it to this frame's shared data.
    pub fn reset_for_new_frame(&mut self, shared: &DrawListSharedData) {
        self.shared = *shared;
        self.clear();
    }

    /// Empties every buffer and stack while keeping their allocations.
    pub fn clear(&mut self) {
        self.cmd_buffer.clear();
        self.idx_buffer.clear();
        self.vtx_buffer.clear();
        self.flags = self.shared.initial_flags;
        self.vtx_current_offset = 0;
        self.vtx_write_end = 0;
        self.idx_write_end = 0;
        self.idx_overflowed = false;
        self.clip_rect_stack.clear();
        self.texture_id_stack.clear();
        self.path.clear();
        self.splitter.clear();
    }

    /// Empties the list and releases its allocations.
    pub fn clear_free_memory(&mut self) {
        self.clear();
        self.cmd_buffer = Vec::new();
        self.idx_buffer = Vec::new();
        self.vtx_buffer = Vec::new();
        self.clip_rect_stack = Vec::new();
        self.texture_id_stack = Vec::new();
        self.path = Vec::new();
        self.splitter.clear_free_memory();
    }

    /// Copies the renderable output (commands, indices, vertices, flags) into a new list.
    pub fn clone_output(&self) -> DrawList {
        let mut dst = DrawList::new(&self.shared);
        dst.cmd_buffer = self.cmd_buffer.clone();
        dst.idx_buffer = self.idx_buffer.clone();
        dst.vtx_buffer = self.vtx_buffer.clone();
        dst.flags = self.flags;
        dst.owner_name = self.owner_name.clone();
        dst
    }

    /// Clip rectangle applied to the next primitive.
    pub fn current_clip_rect(&self) -> ClipRect { self.clip_rect_stack.last().copied().unwrap_or(self.shared.clip_rect_fullscreen) }

    /// Texture applied to the next primitive.
    pub fn current_texture_id(&self) -> TextureId { self.texture_id_stack.last().copied().unwrap_or_default() }

    /// Returns `true` once more vertices were reserved than 16-bit indices can address without
    /// vertex offsets. The indices written past that point are wrong.
    pub fn has_index_overflow(&self) -> bool { self.idx_overflowed }

    /// Index of the next vertex, relative to the current vertex offset.
    pub fn vtx_current_idx(&self) -> usize { self.vtx_buffer.len() - self.vtx_current_offset }

    // ---------------------------------------------------------------------------------------------
    // clip and texture stacks
    // ---------------------------------------------------------------------------------------------

    /// Pushes a scissor rectangle, optionally intersected with the current one.
    pub fn push_clip_rect(&mut self, cr_min: Vec2f, cr_max: Vec2f, intersect_with_current: bool) {
        let mut cr = ClipRect::new(cr_min.x, cr_min.y, cr_max.x, cr_max.y);
        if intersect_with_current {
            if let Some(current) = self.clip_rect_stack.last() {
                cr = cr.intersect(current);
            }
        }
        cr.x2 = cr.x1.max(cr.x2);
        cr.y2 = cr.y1.max(cr.y2);

        self.clip_rect_stack.push(cr);
        self.update_clip_rect();
    }

    /// Pushes the whole-screen scissor rectangle.
    pub fn push_clip_rect_full_screen(&mut self) {
        let cr = self.shared.clip_rect_fullscreen;
        self.push_clip_rect(vec2f(cr.x1, cr.y1), vec2f(cr.x2, cr.y2), false);
    }

    /// Pops the innermost scissor rectangle.
    pub fn pop_clip_rect(&mut self) {
        contract_check!(!self.clip_rect_stack.is_empty(), "pop_clip_rect on an empty clip stack ({})", self.owner_name);
        self.clip_rect_stack.pop();
        self.update_clip_rect();
    }

    /// Number of clip rectangles on the stack.
    pub fn clip_rect_depth(&self) -> usize { self.clip_rect_stack.len() }

    /// Pushes a texture binding.
    pub fn push_texture_id(&mut self, texture_id: TextureId) {
        self.texture_id_stack.push(texture_id);
        self.update_texture_id();
    }

    /// Pops the innermost texture binding.
    pub fn pop_texture_id(&mut self) {
        contract_check!(!self.texture_id_stack.is_empty(), "pop_texture_id on an empty texture stack ({})", self.owner_name);
        self.texture_id_stack.pop();
        self.update_texture_id();
    }

    /// Forces a new draw command with the current clip rectangle and texture.
    pub fn add_draw_cmd(&mut self) {
        let cmd = DrawCmd {
            clip_rect: self.current_clip_rect(),
            texture_id: self.current_texture_id(),
            vtx_offset: self.vtx_current_offset as u32,
            idx_offset: self.idx_buffer.len() as u32,
            ..DrawCmd::default()
        };
        contract_check!(cmd.clip_rect.is_valid(), "inverted clip rect {:?}", cmd.clip_rect);
        self.cmd_buffer.push(cmd);
    }

    pub(crate) fn update_clip_rect(&mut self) {
        let curr_clip = self.current_clip_rect();
        let needs_new = match self.cmd_buffer.last() {
            None => true,
            Some(cmd) => (cmd.elem_count != 0 && cmd.clip_rect != curr_clip) || cmd.user_callback.is_some(),
        };
        if needs_new {
            self.add_draw_cmd();
            return;
        }

        // an empty trailing command that would just repeat the previous one is dropped
        if self.trailing_cmd_repeats_previous(curr_clip, self.current_texture_id()) {
            self.cmd_buffer.pop();
        } else if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.clip_rect = curr_clip;
        }
    }

    pub(crate) fn update_texture_id(&mut self) {
        let curr_tex = self.current_texture_id();
        let needs_new = match self.cmd_buffer.last() {
            None => true,
            Some(cmd) => (cmd.elem_count != 0 && cmd.texture_id != curr_tex) || cmd.user_callback.is_some(),
        };
        if needs_new {
            self.add_draw_cmd();
            return;
        }

        if self.trailing_cmd_repeats_previous(self.current_clip_rect(), curr_tex) {
            self.cmd_buffer.pop();
        } else if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.texture_id = curr_tex;
        }
    }

    fn trailing_cmd_repeats_previous(&self, clip: ClipRect, tex: TextureId) -> bool {
        let n = self.cmd_buffer.len();
        if n < 2 || self.cmd_buffer[n - 1].elem_count != 0 {
            return false;
        }
        let prev = &self.cmd_buffer[n - 2];
        prev.clip_rect == clip && prev.texture_id == tex && prev.vtx_offset == self.vtx_current_offset as u32 && prev.user_callback.is_none()
    }

    /// Inserts a callback command. The renderer calls it instead of drawing triangles.
    pub fn add_callback(&mut self, callback: DrawCallback, callback_data: usize) {
        let needs_new = match self.cmd_buffer.last() {
            None => true,
            Some(cmd) => cmd.elem_count != 0 || cmd.user_callback.is_some(),
        };
        if needs_new {
            self.add_draw_cmd();
        }
        if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.user_callback = Some(callback);
            cmd.user_callback_data = callback_data;
        }
        // primitives after the callback go into a fresh command
        self.add_draw_cmd();
    }

    // ---------------------------------------------------------------------------------------------
    // channels
    // ---------------------------------------------------------------------------------------------

    /// Splits the output into `count` independent channels.
    pub fn channels_split(&mut self, count: usize) {
        let mut splitter = std::mem::take(&mut self.splitter);
        splitter.split(self, count);
        self.splitter = splitter;
    }

    /// Redirects subsequent primitives into channel `idx`.
    pub fn channels_set_current(&mut self, idx: usize) {
        let mut splitter = std::mem::take(&mut self.splitter);
        splitter.set_current_channel(self, idx);
        self.splitter = splitter;
    }

    /// Flattens every channel back into the list, in channel order.
    pub fn channels_merge(&mut self) {
        let mut splitter = std::mem::take(&mut self.splitter);
        splitter.merge(self);
        self.splitter = splitter;
    }

    /// Number of channels in use, 1 when not split.
    pub fn channels_count(&self) -> usize { self.splitter.count() }

    pub(crate) fn sync_write_cursors(&mut self) {
        self.vtx_write_end = self.vtx_buffer.len();
        self.idx_write_end = self.idx_buffer.len();
    }

    // ---------------------------------------------------------------------------------------------
    // primitive writers
    // ---------------------------------------------------------------------------------------------

    /// Reserves room for `idx_count` indices and `vtx_count` vertices in the current command.
    ///
    /// Exactly that many indices and vertices must be written before the next reservation.
    pub fn prim_reserve(&mut self, idx_count: usize, vtx_count: usize) {
        contract_check!(
            self.vtx_buffer.len() == self.vtx_write_end && self.idx_buffer.len() == self.idx_write_end,
            "previous reservation not fully written ({}): vtx {}/{} idx {}/{}",
            self.owner_name,
            self.vtx_buffer.len(),
            self.vtx_write_end,
            self.idx_buffer.len(),
            self.idx_write_end
        );

        if std::mem::size_of::<DrawIdx>() == 2 && self.vtx_current_idx() + vtx_count >= (1 << 16) {
            if self.flags.contains(DrawListFlags::ALLOW_VTX_OFFSET) {
                self.vtx_current_offset = self.vtx_buffer.len();
                self.add_draw_cmd();
            } else if !self.idx_overflowed && self.vtx_current_idx() + vtx_count > (1 << 16) {
                log::warn!(
                    "draw list {} needs more than {} vertices but the renderer has no vertex offset support, indices will wrap",
                    self.owner_name,
                    1 << 16
                );
                self.idx_overflowed = true;
            }
        }
        if self.cmd_buffer.is_empty() {
            self.add_draw_cmd();
        }

        if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.elem_count += idx_count as u32;
        }
        self.vtx_buffer.reserve(vtx_count);
        self.idx_buffer.reserve(idx_count);
        self.vtx_write_end = self.vtx_buffer.len() + vtx_count;
        self.idx_write_end = self.idx_buffer.len() + idx_count;
    }

    /// Gives back part of the last reservation that will not be written.
    pub fn prim_unreserve(&mut self, idx_count: usize, vtx_count: usize) {
        contract_check!(
            self.vtx_write_end >= self.vtx_buffer.len() + vtx_count && self.idx_write_end >= self.idx_buffer.len() + idx_count,
            "unreserving more than what is left of the reservation ({})",
            self.owner_name
        );
        if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.elem_count -= idx_count as u32;
        }
        self.vtx_write_end -= vtx_count;
        self.idx_write_end -= idx_count;
    }

    /// Writes one vertex.
    pub fn prim_write_vtx(&mut self, pos: Vec2f, uv: Vec2f, col: u32) { self.vtx_buffer.push(DrawVert { pos, uv, col }); }

    /// Writes one index.
    pub fn prim_write_idx(&mut self, idx: DrawIdx) { self.idx_buffer.push(idx); }

    /// Writes one vertex together with the index referencing it.
    pub fn prim_vtx(&mut self, pos: Vec2f, uv: Vec2f, col: u32) {
        let idx = self.vtx_current_idx() as DrawIdx;
        self.prim_write_idx(idx);
        self.prim_write_vtx(pos, uv, col);
    }

    fn write_indices(&mut self, indices: &[usize]) { self.idx_buffer.extend(indices.iter().map(|i| *i as DrawIdx)); }

    /// Axis aligned rectangle made of two triangles. Needs 6 indices and 4 vertices reserved.
    pub fn prim_rect(&mut self, a: Vec2f, c: Vec2f, col: u32) {
        let uv = self.shared.tex_uv_white_pixel;
        self.prim_quad_uv(a, vec2f(c.x, a.y), c, vec2f(a.x, c.y), uv, uv, uv, uv, col);
    }

    /// Textured axis aligned rectangle. Needs 6 indices and 4 vertices reserved.
    pub fn prim_rect_uv(&mut self, a: Vec2f, c: Vec2f, uv_a: Vec2f, uv_c: Vec2f, col: u32) {
        self.prim_quad_uv(a, vec2f(c.x, a.y), c, vec2f(a.x, c.y), uv_a, vec2f(uv_c.x, uv_a.y), uv_c, vec2f(uv_a.x, uv_c.y), col);
    }

    /// Textured quad. Needs 6 indices and 4 vertices reserved.
    #[allow(clippy::too_many_arguments)]
    pub fn prim_quad_uv(&mut self, a: Vec2f, b: Vec2f, c: Vec2f, d: Vec2f, uv_a: Vec2f, uv_b: Vec2f, uv_c: Vec2f, uv_d: Vec2f, col: u32) {
        let idx = self.vtx_current_idx();
        self.write_indices(&[idx, idx + 1, idx + 2, idx, idx + 2, idx + 3]);
        self.prim_write_vtx(a, uv_a, col);
        self.prim_write_vtx(b, uv_b, col);
        self.prim_write_vtx(c, uv_c, col);
        self.prim_write_vtx(d, uv_d, col);
    }

    // ---------------------------------------------------------------------------------------------
    // path api
    // ---------------------------------------------------------------------------------------------

    /// Discards the current path.
    pub fn path_clear(&mut self) { self.path.clear(); }

    /// Appends a point to the path.
    pub fn path_line_to(&mut self, pos: Vec2f) { self.path.push(pos); }

    /// Appends a point unless it repeats the last one.
    pub fn path_line_to_merge_duplicate(&mut self, pos: Vec2f) {
        match self.path.last() {
            Some(last) if last.x == pos.x && last.y == pos.y => (),
            _ => self.path.push(pos),
        }
    }

    /// Points of the path under construction.
    pub fn path(&self) -> &[Vec2f] { &self.path }

    /// Fills the path as a convex polygon (clockwise for anti-aliasing) and clears it.
    pub fn path_fill_convex(&mut self, col: u32) {
        let path = std::mem::take(&mut self.path);
        self.add_convex_poly_filled(&path, col);
        self.path = path;
        self.path.clear();
    }

    /// Strokes the path and clears it.
    pub fn path_stroke(&mut self, col: u32, closed: bool, thickness: f32) {
        let path = std::mem::take(&mut self.path);
        self.add_polyline(&path, col, closed, thickness);
        self.path = path;
        self.path.clear();
    }

    /// Appends `num_segments + 1` points along an arc. Both ends are included.
    pub fn path_arc_to(&mut self, center: Vec2f, radius: f32, a_min: f32, a_max: f32, num_segments: usize) {
        if radius == 0.0 {
            self.path.push(center);
            return;
        }
        let num_segments = num_segments.max(1);
        self.path.reserve(num_segments + 1);
        for i in 0..=num_segments {
            let a = a_min + (i as f32 / num_segments as f32) * (a_max - a_min);
            self.path.push(vec2f(center.x + a.cos() * radius, center.y + a.sin() * radius));
        }
    }

    /// Arc snapped to the precomputed 12-step circle, angles given in twelfths of a turn.
    pub fn path_arc_to_fast(&mut self, center: Vec2f, radius: f32, a_min_of_12: usize, a_max_of_12: usize) {
        if radius == 0.0 || a_min_of_12 > a_max_of_12 {
            self.path.push(center);
            return;
        }
        for a in a_min_of_12..=a_max_of_12 {
            let c = self.shared.circle_vtx12[a % 12];
            self.path.push(vec2f(center.x + c.x * radius, center.y + c.y * radius));
        }
    }

    /// Cubic bezier from the last path point. Zero segments selects adaptive subdivision.
    pub fn path_bezier_curve_to(&mut self, p2: Vec2f, p3: Vec2f, p4: Vec2f, num_segments: usize) {
        let p1 = match self.path.last() {
            Some(p) => *p,
            None => {
                contract_check!(false, "path_bezier_curve_to needs a starting point");
                return;
            }
        };
        if num_segments == 0 {
            let tol = self.shared.curve_tessellation_tol;
            path_bezier_to_casteljau(&mut self.path, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y, p4.x, p4.y, tol, 0);
        } else {
            let t_step = 1.0 / num_segments as f32;
            for i_step in 1..=num_segments {
                let t = t_step * i_step as f32;
                let u = 1.0 - t;
                let w1 = u * u * u;
                let w2 = 3.0 * u * u * t;
                let w3 = 3.0 * u * t * t;
                let w4 = t * t * t;
                self.path.push(vec2f(w1 * p1.x + w2 * p2.x + w3 * p3.x + w4 * p4.x, w1 * p1.y + w2 * p2.y + w3 * p3.y + w4 * p4.y));
            }
        }
    }

    /// Appends a rectangle, with the selected corners rounded.
    pub fn path_rect(&mut self, a: Vec2f, b: Vec2f, rounding: f32, corners: DrawCornerFlags) {
        let horizontal_pair = corners.contains(DrawCornerFlags::TOP) || corners.contains(DrawCornerFlags::BOT);
        let mut rounding = rounding.min((b.x - a.x).abs() * if horizontal_pair { 0.5 } else { 1.0 } - 1.0);
        let vertical_pair = corners.contains(DrawCornerFlags::LEFT) || corners.contains(DrawCornerFlags::RIGHT);
        rounding = rounding.min((b.y - a.y).abs() * if vertical_pair { 0.5 } else { 1.0 } - 1.0);

        if rounding <= 0.0 || corners.is_empty() {
            self.path_line_to(a);
            self.path_line_to(vec2f(b.x, a.y));
            self.path_line_to(b);
            self.path_line_to(vec2f(a.x, b.y));
        } else {
            let r = |flag: DrawCornerFlags| if corners.contains(flag) { rounding } else { 0.0 };
            let (tl, tr, br, bl) = (r(DrawCornerFlags::TOP_LEFT), r(DrawCornerFlags::TOP_RIGHT), r(DrawCornerFlags::BOT_RIGHT), r(DrawCornerFlags::BOT_LEFT));
            self.path_arc_to_fast(vec2f(a.x + tl, a.y + tl), tl, 6, 9);
            self.path_arc_to_fast(vec2f(b.x - tr, a.y + tr), tr, 9, 12);
            self.path_arc_to_fast(vec2f(b.x - br, b.y - br), br, 0, 3);
            self.path_arc_to_fast(vec2f(a.x + bl, b.y - bl), bl, 3, 6);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // shape emitters
    // ---------------------------------------------------------------------------------------------

    /// Line segment.
    pub fn add_line(&mut self, a: Vec2f, b: Vec2f, col: u32, thickness: f32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        self.path_line_to(vec2f(a.x + 0.5, a.y + 0.5));
        self.path_line_to(vec2f(b.x + 0.5, b.y + 0.5));
        self.path_stroke(col, false, thickness);
    }

    /// Rectangle outline, `a` upper-left and `b` lower-right.
    pub fn add_rect(&mut self, a: Vec2f, b: Vec2f, col: u32, rounding: f32, corners: DrawCornerFlags, thickness: f32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        let inset = if self.flags.contains(DrawListFlags::ANTI_ALIASED_LINES) { 0.5 } else { 0.49 };
        self.path_rect(vec2f(a.x + 0.5, a.y + 0.5), vec2f(b.x - inset, b.y - inset), rounding, corners);
        self.path_stroke(col, true, thickness);
    }

    /// Filled rectangle, `a` upper-left and `b` lower-right.
    pub fn add_rect_filled(&mut self, a: Vec2f, b: Vec2f, col: u32, rounding: f32, corners: DrawCornerFlags) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        if rounding > 0.0 {
            self.path_rect(a, b, rounding, corners);
            self.path_fill_convex(col);
        } else {
            self.prim_reserve(6, 4);
            self.prim_rect(a, b, col);
        }
    }

    /// Filled rectangle with one color per corner.
    pub fn add_rect_filled_multi_color(&mut self, a: Vec2f, c: Vec2f, col_upr_left: u32, col_upr_right: u32, col_bot_right: u32, col_bot_left: u32) {
        if (col_upr_left | col_upr_right | col_bot_right | col_bot_left) & COL32_A_MASK == 0 {
            return;
        }
        let uv = self.shared.tex_uv_white_pixel;
        self.prim_reserve(6, 4);
        let idx = self.vtx_current_idx();
        self.write_indices(&[idx, idx + 1, idx + 2, idx, idx + 2, idx + 3]);
        self.prim_write_vtx(a, uv, col_upr_left);
        self.prim_write_vtx(vec2f(c.x, a.y), uv, col_upr_right);
        self.prim_write_vtx(c, uv, col_bot_right);
        self.prim_write_vtx(vec2f(a.x, c.y), uv, col_bot_left);
    }

    /// Quad outline.
    pub fn add_quad(&mut self, a: Vec2f, b: Vec2f, c: Vec2f, d: Vec2f, col: u32, thickness: f32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        self.path.extend_from_slice(&[a, b, c, d]);
        self.path_stroke(col, true, thickness);
    }

    /// Filled convex quad.
    pub fn add_quad_filled(&mut self, a: Vec2f, b: Vec2f, c: Vec2f, d: Vec2f, col: u32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        self.path.extend_from_slice(&[a, b, c, d]);
        self.path_fill_convex(col);
    }

    /// Triangle outline.
    pub fn add_triangle(&mut self, a: Vec2f, b: Vec2f, c: Vec2f, col: u32, thickness: f32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        self.path.extend_from_slice(&[a, b, c]);
        self.path_stroke(col, true, thickness);
    }

    /// Filled triangle.
    pub fn add_triangle_filled(&mut self, a: Vec2f, b: Vec2f, c: Vec2f, col: u32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        self.path.extend_from_slice(&[a, b, c]);
        self.path_fill_convex(col);
    }

    /// Circle outline approximated with `num_segments` segments.
    pub fn add_circle(&mut self, center: Vec2f, radius: f32, col: u32, num_segments: usize, thickness: f32) {
        if col & COL32_A_MASK == 0 || num_segments <= 2 {
            return;
        }
        // closed shape: the last point would repeat the first
        let a_max = std::f32::consts::PI * 2.0 * (num_segments as f32 - 1.0) / num_segments as f32;
        self.path_arc_to(center, radius - 0.5, 0.0, a_max, num_segments - 1);
        self.path_stroke(col, true, thickness);
    }

    /// Filled circle approximated with `num_segments` segments.
    pub fn add_circle_filled(&mut self, center: Vec2f, radius: f32, col: u32, num_segments: usize) {
        if col & COL32_A_MASK == 0 || num_segments <= 2 {
            return;
        }
        let a_max = std::f32::consts::PI * 2.0 * (num_segments as f32 - 1.0) / num_segments as f32;
        self.path_arc_to(center, radius, 0.0, a_max, num_segments - 1);
        self.path_fill_convex(col);
    }

    /// Cubic bezier curve.
    pub fn add_bezier_curve(&mut self, pos0: Vec2f, cp0: Vec2f, cp1: Vec2f, pos1: Vec2f, col: u32, thickness: f32, num_segments: usize) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        self.path_line_to(pos0);
        self.path_bezier_curve_to(cp0, cp1, pos1, num_segments);
        self.path_stroke(col, false, thickness);
    }

    /// Text rendered by `font`. A zero `font_size` selects the shared default size.
    #[allow(clippy::too_many_arguments)]
    pub fn add_text(&mut self, font: &dyn Font, font_size: f32, pos: Vec2f, col: u32, text: &str, wrap_width: f32, cpu_fine_clip: Option<ClipRect>) {
        if col & COL32_A_MASK == 0 || text.is_empty() {
            return;
        }
        contract_check!(
            font.texture_id() == self.current_texture_id(),
            "font texture {:?} is not bound, push it with push_texture_id",
            font.texture_id()
        );
        let font_size = if font_size == 0.0 { self.shared.font_size } else { font_size };
        let clip = match cpu_fine_clip {
            Some(fine) => self.current_clip_rect().intersect(&fine),
            None => self.current_clip_rect(),
        };
        font.render_text(self, font_size, pos, col, clip, text, wrap_width, cpu_fine_clip.is_some());
    }

    fn push_texture_if_needed(&mut self, texture_id: TextureId) -> bool {
        let push = self.texture_id_stack.last() != Some(&texture_id);
        if push {
            self.push_texture_id(texture_id);
        }
        push
    }

    /// Textured rectangle.
    pub fn add_image(&mut self, texture_id: TextureId, a: Vec2f, b: Vec2f, uv_a: Vec2f, uv_b: Vec2f, col: u32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        let pushed = self.push_texture_if_needed(texture_id);
        self.prim_reserve(6, 4);
        self.prim_rect_uv(a, b, uv_a, uv_b, col);
        if pushed {
            self.pop_texture_id();
        }
    }

    /// Textured quad.
    #[allow(clippy::too_many_arguments)]
    pub fn add_image_quad(&mut self, texture_id: TextureId, a: Vec2f, b: Vec2f, c: Vec2f, d: Vec2f, uv_a: Vec2f, uv_b: Vec2f, uv_c: Vec2f, uv_d: Vec2f, col: u32) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        let pushed = self.push_texture_if_needed(texture_id);
        self.prim_reserve(6, 4);
        self.prim_quad_uv(a, b, c, d, uv_a, uv_b, uv_c, uv_d, col);
        if pushed {
            self.pop_texture_id();
        }
    }

    /// Textured rectangle with rounded corners.
    #[allow(clippy::too_many_arguments)]
    pub fn add_image_rounded(&mut self, texture_id: TextureId, a: Vec2f, b: Vec2f, uv_a: Vec2f, uv_b: Vec2f, col: u32, rounding: f32, corners: DrawCornerFlags) {
        if col & COL32_A_MASK == 0 {
            return;
        }
        if rounding <= 0.0 || !corners.intersects(DrawCornerFlags::ALL) {
            self.add_image(texture_id, a, b, uv_a, uv_b, col);
            return;
        }
        let pushed = self.push_texture_if_needed(texture_id);
        let vert_start = self.vtx_buffer.len();
        self.path_rect(a, b, rounding, corners);
        self.path_fill_convex(col);
        let vert_end = self.vtx_buffer.len();
        self.shade_verts_linear_uv(vert_start, vert_end, a, b, uv_a, uv_b, true);
        if pushed {
            self.pop_texture_id();
        }
    }

    /// Maps the positions of a vertex range linearly onto a UV rectangle.
    #[allow(clippy::too_many_arguments)]
    pub fn shade_verts_linear_uv(&mut self, vert_start: usize, vert_end: usize, a: Vec2f, b: Vec2f, uv_a: Vec2f, uv_b: Vec2f, clamp: bool) {
        let size = vec2f(b.x - a.x, b.y - a.y);
        let uv_size = vec2f(uv_b.x - uv_a.x, uv_b.y - uv_a.y);
        let scale = vec2f(
            if size.x != 0.0 { uv_size.x / size.x } else { 0.0 },
            if size.y != 0.0 { uv_size.y / size.y } else { 0.0 },
        );
        let (min, max) = (vec2f(uv_a.x.min(uv_b.x), uv_a.y.min(uv_b.y)), vec2f(uv_a.x.max(uv_b.x), uv_a.y.max(uv_b.y)));
        for v in &mut self.vtx_buffer[vert_start..vert_end] {
            let mut uv = vec2f(uv_a.x + (v.pos.x - a.x) * scale.x, uv_a.y + (v.pos.y - a.y) * scale.y);
            if clamp {
                uv = vec2f(uv.x.clamp(min.x, max.x), uv.y.clamp(min.y, max.y));
            }
            v.uv = uv;
        }
    }

    /// Strokes a polyline.
    ///
    /// With anti-aliasing a thin line costs 3 vertices per point (core and two transparent
    /// fringes), a thick one 4 (two opaque edges and two fringes). Joints use the averaged
    /// normal of the adjacent segments.
    #[inline(never)]
    pub fn add_polyline(&mut self, points: &[Vec2f], col: u32, closed: bool, thickness: f32) {
        let points_count = points.len();
        if points_count < 2 || col & COL32_A_MASK == 0 {
            return;
        }

        let uv = self.shared.tex_uv_white_pixel;
        let count = if closed { points_count } else { points_count - 1 };
        let thick_line = thickness > 1.0;

        if self.flags.contains(DrawListFlags::ANTI_ALIASED_LINES) {
            const AA_SIZE: f32 = 1.0;
            let col_trans = col & !COL32_A_MASK;

            let idx_count = count * if thick_line { 18 } else { 12 };
            let vtx_count = points_count * if thick_line { 4 } else { 3 };
            self.prim_reserve(idx_count, vtx_count);
            let base = self.vtx_current_idx();

            let mut normals = vec![Vec2f::default(); points_count];
            for i1 in 0..count {
                let i2 = if i1 + 1 == points_count { 0 } else { i1 + 1 };
                let (dx, dy) = normalize_over_zero(points[i2].x - points[i1].x, points[i2].y - points[i1].y);
                normals[i1] = vec2f(dy, -dx);
            }
            if !closed {
                normals[points_count - 1] = normals[points_count - 2];
            }

            let offset = |p: Vec2f, n: Vec2f, s: f32| vec2f(p.x + n.x * s, p.y + n.y * s);

            if !thick_line {
                let mut temp = vec![Vec2f::default(); points_count * 2];
                if !closed {
                    let last = points_count - 1;
                    temp[0] = offset(points[0], normals[0], AA_SIZE);
                    temp[1] = offset(points[0], normals[0], -AA_SIZE);
                    temp[last * 2] = offset(points[last], normals[last], AA_SIZE);
                    temp[last * 2 + 1] = offset(points[last], normals[last], -AA_SIZE);
                }

                let mut idx1 = base;
                for i1 in 0..count {
                    let i2 = if i1 + 1 == points_count { 0 } else { i1 + 1 };
                    let idx2 = if i1 + 1 == points_count { base } else { idx1 + 3 };

                    let (dm_x, dm_y) = fix_normal((normals[i1].x + normals[i2].x) * 0.5, (normals[i1].y + normals[i2].y) * 0.5);
                    let dm = vec2f(dm_x * AA_SIZE, dm_y * AA_SIZE);
                    temp[i2 * 2] = offset(points[i2], dm, 1.0);
                    temp[i2 * 2 + 1] = offset(points[i2], dm, -1.0);

                    self.write_indices(&[
                        idx2, idx1, idx1 + 2, idx1 + 2, idx2 + 2, idx2, //
                        idx2 + 1, idx1 + 1, idx1, idx1, idx2, idx2 + 1,
                    ]);
                    idx1 = idx2;
                }

                for i in 0..points_count {
                    self.prim_write_vtx(points[i], uv, col);
                    self.prim_write_vtx(temp[i * 2], uv, col_trans);
                    self.prim_write_vtx(temp[i * 2 + 1], uv, col_trans);
                }
            } else {
                let half_inner = (thickness - AA_SIZE) * 0.5;
                let mut temp = vec![Vec2f::default(); points_count * 4];
                if !closed {
                    let last = points_count - 1;
                    for (p, n, at) in [(points[0], normals[0], 0), (points[last], normals[last], last * 4)] {
                        temp[at] = offset(p, n, half_inner + AA_SIZE);
                        temp[at + 1] = offset(p, n, half_inner);
                        temp[at + 2] = offset(p, n, -half_inner);
                        temp[at + 3] = offset(p, n, -(half_inner + AA_SIZE));
                    }
                }

                let mut idx1 = base;
                for i1 in 0..count {
                    let i2 = if i1 + 1 == points_count { 0 } else { i1 + 1 };
                    let idx2 = if i1 + 1 == points_count { base } else { idx1 + 4 };

                    let (dm_x, dm_y) = fix_normal((normals[i1].x + normals[i2].x) * 0.5, (normals[i1].y + normals[i2].y) * 0.5);
                    let dm = vec2f(dm_x, dm_y);
                    temp[i2 * 4] = offset(points[i2], dm, half_inner + AA_SIZE);
                    temp[i2 * 4 + 1] = offset(points[i2], dm, half_inner);
                    temp[i2 * 4 + 2] = offset(points[i2], dm, -half_inner);
                    temp[i2 * 4 + 3] = offset(points[i2], dm, -(half_inner + AA_SIZE));

                    self.write_indices(&[
                        idx2 + 1, idx1 + 1, idx1 + 2, idx1 + 2, idx2 + 2, idx2 + 1, //
                        idx2 + 1, idx1 + 1, idx1, idx1, idx2, idx2 + 1, //
                        idx2 + 2, idx1 + 2, idx1 + 3, idx1 + 3, idx2 + 3, idx2 + 2,
                    ]);
                    idx1 = idx2;
                }

                for i in 0..points_count {
                    self.prim_write_vtx(temp[i * 4], uv, col_trans);
                    self.prim_write_vtx(temp[i * 4 + 1], uv, col);
                    self.prim_write_vtx(temp[i * 4 + 2], uv, col);
                    self.prim_write_vtx(temp[i * 4 + 3], uv, col_trans);
                }
            }
        } else {
            self.prim_reserve(count * 6, count * 4);
            for i1 in 0..count {
                let i2 = if i1 + 1 == points_count { 0 } else { i1 + 1 };
                let (p1, p2) = (points[i1], points[i2]);
                let (dx, dy) = normalize_over_zero(p2.x - p1.x, p2.y - p1.y);
                let (dx, dy) = (dx * thickness * 0.5, dy * thickness * 0.5);

                let idx = self.vtx_current_idx();
                self.write_indices(&[idx, idx + 1, idx + 2, idx, idx + 2, idx + 3]);
                self.prim_write_vtx(vec2f(p1.x + dy, p1.y - dx), uv, col);
                self.prim_write_vtx(vec2f(p2.x + dy, p2.y - dx), uv, col);
                self.prim_write_vtx(vec2f(p2.x - dy, p2.y + dx), uv, col);
                self.prim_write_vtx(vec2f(p1.x - dy, p1.y + dx), uv, col);
            }
        }
    }

    /// Fills a convex polygon. Anti-aliasing needs the points in clockwise order.
    ///
    /// The interior is a fan from the first point. With anti-aliasing each point gets an inner
    /// opaque vertex and an outer transparent one, and the fringe ring is made of quads between them.
    #[inline(never)]
    pub fn add_convex_poly_filled(&mut self, points: &[Vec2f], col: u32) {
        let points_count = points.len();
        if points_count < 3 || col & COL32_A_MASK == 0 {
            return;
        }

        let uv = self.shared.tex_uv_white_pixel;

        if self.flags.contains(DrawListFlags::ANTI_ALIASED_FILL) {
            const AA_SIZE: f32 = 1.0;
            let col_trans = col & !COL32_A_MASK;
            let idx_count = (points_count - 2) * 3 + points_count * 6;
            let vtx_count = points_count * 2;
            self.prim_reserve(idx_count, vtx_count);

            let vtx_inner = self.vtx_current_idx();
            let vtx_outer = vtx_inner + 1;
            for i in 2..points_count {
                self.write_indices(&[vtx_inner, vtx_inner + ((i - 1) << 1), vtx_inner + (i << 1)]);
            }

            let mut normals = vec![Vec2f::default(); points_count];
            let mut i0 = points_count - 1;
            for i1 in 0..points_count {
                let (dx, dy) = normalize_over_zero(points[i1].x - points[i0].x, points[i1].y - points[i0].y);
                normals[i0] = vec2f(dy, -dx);
                i0 = i1;
            }

            let mut i0 = points_count - 1;
            for i1 in 0..points_count {
                let (n0, n1) = (normals[i0], normals[i1]);
                let (dm_x, dm_y) = fix_normal((n0.x + n1.x) * 0.5, (n0.y + n1.y) * 0.5);
                let (dm_x, dm_y) = (dm_x * AA_SIZE * 0.5, dm_y * AA_SIZE * 0.5);

                self.prim_write_vtx(vec2f(points[i1].x - dm_x, points[i1].y - dm_y), uv, col);
                self.prim_write_vtx(vec2f(points[i1].x + dm_x, points[i1].y + dm_y), uv, col_trans);

                self.write_indices(&[
                    vtx_inner + (i1 << 1),
                    vtx_inner + (i0 << 1),
                    vtx_outer + (i0 << 1),
                    vtx_outer + (i0 << 1),
                    vtx_outer + (i1 << 1),
                    vtx_inner + (i1 << 1),
                ]);
                i0 = i1;
            }
        } else {
            self.prim_reserve((points_count - 2) * 3, points_count);
            let base = self.vtx_current_idx();
            for p in points {
                self.prim_write_vtx(*p, uv, col);
            }
            for i in 2..points_count {
                self.write_indices(&[base, base + i - 1, base + i]);
            }
        }
    }

    // ---------------------------------------------------------------------------------------------
    // finalization
    // ---------------------------------------------------------------------------------------------

    /// Moves the list into the frame output unless it has nothing to draw.
    ///
    /// A trailing empty command is dropped first.
    pub fn add_to(mut self, out: &mut Vec<DrawList>) {
        if let Some(last) = self.cmd_buffer.last() {
            if last.elem_count == 0 && last.user_callback.is_none() {
                self.cmd_buffer.pop();
            }
        }
        if self.cmd_buffer.is_empty() {
            return;
        }

        contract_check!(
            self.vtx_buffer.len() == self.vtx_write_end && self.idx_buffer.len() == self.idx_write_end,
            "draw list {} has an unwritten reservation",
            self.owner_name
        );
        if !self.flags.contains(DrawListFlags::ALLOW_VTX_OFFSET) {
            contract_check!(
                self.vtx_buffer.len() < (1 << 16),
                "draw list {} holds {} vertices, more than 16-bit indices can address",
                self.owner_name,
                self.vtx_buffer.len()
            );
        }
        out.push(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RED: u32 = col32(255, 0, 0, 255);

    fn elem_total(dl: &DrawList) -> usize { dl.cmd_buffer.iter().map(|c| c.elem_count as usize).sum() }

    #[test]
    fn filled_rect_on_fresh_list() {
        let mut dl = DrawList::default();
        dl.add_rect_filled(vec2f(0.0, 0.0), vec2f(10.0, 10.0), COL32_WHITE, 0.0, DrawCornerFlags::ALL);
        assert_eq!(dl.cmd_buffer.len(), 1);
        assert_eq!(dl.cmd_buffer[0].elem_count, 6);
        assert_eq!(dl.vtx_buffer.len(), 4);
        assert_eq!(dl.idx_buffer, vec![0, 1, 2, 0, 2, 3]);
        let corners: Vec<(f32, f32)> = dl.vtx_buffer.iter().map(|v| (v.pos.x, v.pos.y)).collect();
        assert_eq!(corners, vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    }

    #[test]
    fn transparent_color_emits_nothing() {
        let mut dl = DrawList::default();
        let clear = col32(255, 255, 255, 0);
        let (a, b, c, d) = (vec2f(0.0, 0.0), vec2f(10.0, 0.0), vec2f(10.0, 10.0), vec2f(0.0, 10.0));
        dl.add_line(a, c, clear, 1.0);
        dl.add_rect(a, c, clear, 2.0, DrawCornerFlags::ALL, 1.0);
        dl.add_rect_filled(a, c, clear, 0.0, DrawCornerFlags::ALL);
        dl.add_rect_filled_multi_color(a, c, clear, clear, clear, clear);
        dl.add_quad(a, b, c, d, clear, 1.0);
        dl.add_quad_filled(a, b, c, d, clear);
        dl.add_triangle(a, b, c, clear, 1.0);
        dl.add_triangle_filled(a, b, c, clear);
        dl.add_circle(a, 5.0, clear, 12, 1.0);
        dl.add_circle_filled(a, 5.0, clear, 12);
        dl.add_bezier_curve(a, b, c, d, clear, 1.0, 0);
        dl.add_image(TextureId::new(3), a, c, a, c, clear);
        dl.add_text(&MonospaceFont::default(), 0.0, a, clear, "hidden", 0.0, None);
        assert!(dl.vtx_buffer.is_empty());
        assert!(dl.idx_buffer.is_empty());
        assert!(dl.path().is_empty());
    }

    #[test]
    fn aa_stroke_vertex_budget() {
        let mut dl = DrawList::default();
        dl.add_line(vec2f(0.0, 0.0), vec2f(10.0, 0.0), RED, 1.0);
        assert_eq!((dl.vtx_buffer.len(), dl.idx_buffer.len()), (6, 12));

        dl.add_line(vec2f(0.0, 0.0), vec2f(10.0, 0.0), RED, 3.0);
        assert_eq!((dl.vtx_buffer.len(), dl.idx_buffer.len()), (6 + 8, 12 + 18));

        dl.add_triangle(vec2f(0.0, 0.0), vec2f(10.0, 0.0), vec2f(0.0, 10.0), RED, 1.0);
        assert_eq!((dl.vtx_buffer.len(), dl.idx_buffer.len()), (14 + 9, 30 + 36));
        assert_eq!(elem_total(&dl), dl.idx_buffer.len());
    }

    #[test]
    fn thin_stroke_has_transparent_fringe() {
        let mut dl = DrawList::default();
        dl.add_line(vec2f(0.0, 0.0), vec2f(10.0, 0.0), RED, 1.0);
        assert_eq!(dl.vtx_buffer[0].col, RED);
        assert_eq!(dl.vtx_buffer[1].col & COL32_A_MASK, 0);
        assert_eq!(dl.vtx_buffer[2].col & COL32_A_MASK, 0);
        // fringe sits one pixel away from the core on each side
        assert!((dl.vtx_buffer[1].pos.y - dl.vtx_buffer[0].pos.y).abs() > 0.99);
    }

    #[test]
    fn non_aa_stroke_and_fill() {
        let mut dl = DrawList::default();
        dl.flags = DrawListFlags::empty();
        dl.add_line(vec2f(0.0, 0.0), vec2f(10.0, 0.0), RED, 2.0);
        assert_eq!((dl.vtx_buffer.len(), dl.idx_buffer.len()), (4, 6));
        dl.add_quad_filled(vec2f(0.0, 0.0), vec2f(10.0, 0.0), vec2f(10.0, 10.0), vec2f(0.0, 10.0), RED);
        assert_eq!((dl.vtx_buffer.len(), dl.idx_buffer.len()), (8, 12));
        assert_eq!(&dl.idx_buffer[6..], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn aa_convex_fill_budget() {
        let mut dl = DrawList::default();
        dl.add_triangle_filled(vec2f(0.0, 0.0), vec2f(10.0, 0.0), vec2f(0.0, 10.0), RED);
        assert_eq!(dl.vtx_buffer.len(), 6);
        assert_eq!(dl.idx_buffer.len(), 3 + 18);
        assert_eq!(&dl.idx_buffer[..3], &[0, 2, 4]);
    }

    #[test]
    fn rounded_rect_path_corners() {
        let mut dl = DrawList::default();
        dl.path_rect(vec2f(0.0, 0.0), vec2f(100.0, 50.0), 8.0, DrawCornerFlags::ALL);
        assert_eq!(dl.path().len(), 16);
        dl.path_clear();
        dl.path_rect(vec2f(0.0, 0.0), vec2f(100.0, 50.0), 8.0, DrawCornerFlags::TOP);
        // unrounded corners collapse to their center point
        assert_eq!(dl.path().len(), 4 + 4 + 1 + 1);
        dl.path_clear();
        dl.path_rect(vec2f(0.0, 0.0), vec2f(1.5, 1.5), 8.0, DrawCornerFlags::ALL);
        assert_eq!(dl.path().len(), 4);
    }

    #[test]
    fn bezier_adaptive_ends_on_target() {
        let mut dl = DrawList::default();
        dl.path_line_to(vec2f(0.0, 0.0));
        dl.path_bezier_curve_to(vec2f(0.0, 100.0), vec2f(100.0, 100.0), vec2f(100.0, 0.0), 0);
        let last = *dl.path().last().unwrap();
        assert_eq!((last.x, last.y), (100.0, 0.0));
        assert!(dl.path().len() > 4);
        dl.path_clear();
        dl.path_line_to(vec2f(0.0, 0.0));
        dl.path_bezier_curve_to(vec2f(0.0, 100.0), vec2f(100.0, 100.0), vec2f(100.0, 0.0), 8);
        assert_eq!(dl.path().len(), 9);
    }

    #[test]
    fn same_clip_rect_does_not_open_a_command() {
        let mut dl = DrawList::default();
        dl.push_clip_rect(vec2f(0.0, 0.0), vec2f(100.0, 100.0), false);
        dl.add_rect_filled(vec2f(0.0, 0.0), vec2f(10.0, 10.0), RED, 0.0, DrawCornerFlags::ALL);
        dl.push_clip_rect(vec2f(0.0, 0.0), vec2f(100.0, 100.0), false);
        dl.add_rect_filled(vec2f(0.0, 0.0), vec2f(10.0, 10.0), RED, 0.0, DrawCornerFlags::ALL);
        dl.pop_clip_rect();
        assert_eq!(dl.cmd_buffer.len(), 1);

        dl.push_clip_rect(vec2f(0.0, 0.0), vec2f(50.0, 50.0), false);
        assert_eq!(dl.cmd_buffer.len(), 2);
        // empty command is reused, then dropped when it would repeat the previous one
        dl.push_clip_rect(vec2f(0.0, 0.0), vec2f(40.0, 40.0), false);
        assert_eq!(dl.cmd_buffer.len(), 2);
        assert_eq!(dl.cmd_buffer[1].clip_rect, ClipRect::new(0.0, 0.0, 40.0, 40.0));
        dl.pop_clip_rect();
        dl.pop_clip_rect();
        assert_eq!(dl.cmd_buffer.len(), 1);
        dl.pop_clip_rect();
    }

    #[test]
    fn intersecting_clip_rect_is_clamped() {
        let mut dl = DrawList::default();
        dl.push_clip_rect(vec2f(10.0, 10.0), vec2f(50.0, 50.0), false);
        dl.push_clip_rect(vec2f(60.0, 0.0), vec2f(100.0, 20.0), true);
        let cr = dl.current_clip_rect();
        assert!(cr.is_valid());
        assert_eq!((cr.x1, cr.y1, cr.x2, cr.y2), (60.0, 10.0, 60.0, 20.0));
    }

    #[test]
    fn texture_change_splits_commands() {
        let mut dl = DrawList::default();
        dl.add_rect_filled(vec2f(0.0, 0.0), vec2f(10.0, 10.0), RED, 0.0, DrawCornerFlags::ALL);
        dl.push_texture_id(TextureId::default());
        assert_eq!(dl.cmd_buffer.len(), 1);
        dl.pop_texture_id();
        dl.add_image(TextureId::new(9), vec2f(0.0, 0.0), vec2f(4.0, 4.0), vec2f(0.0, 0.0), vec2f(1.0, 1.0), COL32_WHITE);
        assert_eq!(dl.cmd_buffer.len(), 3);
        assert_eq!(dl.cmd_buffer[1].texture_id, TextureId::new(9));
        assert_eq!(dl.cmd_buffer[1].elem_count, 6);
        assert_eq!(dl.cmd_buffer[2].elem_count, 0);
        let mut out = Vec::new();
        dl.add_to(&mut out);
        assert_eq!(out[0].cmd_buffer.len(), 2);
    }

    #[test]
    fn rounded_image_uvs_stay_in_range() {
        let mut dl = DrawList::default();
        dl.add_image_rounded(TextureId::new(2), vec2f(0.0, 0.0), vec2f(20.0, 20.0), vec2f(0.0, 0.0), vec2f(1.0, 1.0), COL32_WHITE, 5.0, DrawCornerFlags::ALL);
        assert!(!dl.vtx_buffer.is_empty());
        assert!(dl.vtx_buffer.iter().all(|v| (0.0..=1.0).contains(&v.uv.x) && (0.0..=1.0).contains(&v.uv.y)));
    }

    #[test]
    fn large_mesh_splits_on_vtx_offset() {
        let mut dl = DrawList::default();
        dl.flags |= DrawListFlags::ALLOW_VTX_OFFSET;
        for i in 0..16384 {
            let x = (i % 128) as f32;
            dl.add_rect_filled(vec2f(x, 0.0), vec2f(x + 1.0, 1.0), RED, 0.0, DrawCornerFlags::ALL);
        }
        assert_eq!(dl.cmd_buffer.len(), 2);
        assert_eq!(dl.cmd_buffer[1].vtx_offset, 65532);
        assert_eq!(dl.cmd_buffer[1].idx_offset as usize, 16383 * 6);
        assert_eq!(&dl.idx_buffer[16383 * 6..], &[0, 1, 2, 0, 2, 3]);
        assert_eq!(elem_total(&dl), dl.idx_buffer.len());
    }

    #[test]
    fn large_mesh_without_vtx_offset_flags_overflow() {
        let mut dl = DrawList::default();
        dl.flags.remove(DrawListFlags::ALLOW_VTX_OFFSET);
        for i in 0..16384 {
            let x = (i % 128) as f32;
            dl.add_rect_filled(vec2f(x, 0.0), vec2f(x + 1.0, 1.0), RED, 0.0, DrawCornerFlags::ALL);
        }
        // 65536 vertices still fit in 0..=65535
        assert!(!dl.has_index_overflow());
        dl.add_rect_filled(vec2f(0.0, 0.0), vec2f(1.0, 1.0), RED, 0.0, DrawCornerFlags::ALL);
        assert!(dl.has_index_overflow());
        assert_eq!(dl.cmd_buffer.len(), 1);
        assert_eq!(elem_total(&dl), dl.idx_buffer.len());
        dl.clear();
        assert!(!dl.has_index_overflow());
    }

    #[test]
    fn callback_gets_its_own_command() {
        let mut dl = DrawList::default();
        dl.add_rect_filled(vec2f(0.0, 0.0), vec2f(10.0, 10.0), RED, 0.0, DrawCornerFlags::ALL);
        dl.add_callback(Rc::new(|_, _| {}), 42);
        dl.add_rect_filled(vec2f(0.0, 0.0), vec2f(10.0, 10.0), RED, 0.0, DrawCornerFlags::ALL);
        assert_eq!(dl.cmd_buffer.len(), 3);
        assert!(dl.cmd_buffer[1].user_callback.is_some());
        assert_eq!(dl.cmd_buffer[1].user_callback_data, 42);
        assert_eq!(dl.cmd_buffer[2].idx_offset, 6);
    }

    #[test]
    fn add_to_skips_empty_lists() {
        let mut out = Vec::new();
        let mut dl = DrawList::default();
        dl.push_clip_rect_full_screen();
        dl.add_to(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn unreserve_returns_unused_room() {
        let mut dl = DrawList::default();
        dl.prim_reserve(12, 8);
        dl.prim_rect(vec2f(0.0, 0.0), vec2f(1.0, 1.0), RED);
        dl.prim_unreserve(6, 4);
        assert_eq!(dl.cmd_buffer[0].elem_count, 6);
        dl.add_rect_filled(vec2f(0.0, 0.0), vec2f(10.0, 10.0), RED, 0.0, DrawCornerFlags::ALL);
        assert_eq!(elem_total(&dl), 12);
    }

    #[test]
    fn clone_output_copies_buffers_only() {
        let mut dl = DrawList::default();
        dl.push_clip_rect(vec2f(0.0, 0.0), vec2f(5.0, 5.0), false);
        dl.add_rect_filled(vec2f(0.0, 0.0), vec2f(10.0, 10.0), RED, 0.0, DrawCornerFlags::ALL);
        let copy = dl.clone_output();
        assert_eq!(copy.cmd_buffer.len(), 1);
        assert_eq!(copy.vtx_buffer.len(), 4);
        assert_eq!(copy.clip_rect_depth(), 0);
    }

    proptest! {
        #[test]
        fn elem_counts_cover_index_buffer(ops in prop::collection::vec((0u8..8, 0.0f32..200.0, 0.0f32..200.0, 1.0f32..40.0), 1..48)) {
            let mut dl = DrawList::default();
            let mut clip_depth = 0;
            for (kind, x, y, s) in ops {
                let (a, b) = (vec2f(x, y), vec2f(x + s, y + s));
                match kind {
                    0 => dl.add_rect_filled(a, b, RED, 0.0, DrawCornerFlags::ALL),
                    1 => dl.add_rect_filled(a, b, RED, s * 0.3, DrawCornerFlags::ALL),
                    2 => dl.add_rect(a, b, RED, s * 0.2, DrawCornerFlags::TOP, 1.0 + s * 0.05),
                    3 => dl.add_circle_filled(a, s, RED, 12),
                    4 => dl.add_line(a, b, RED, s * 0.1),
                    5 => {
                        dl.push_clip_rect(a, b, true);
                        clip_depth += 1;
                    }
                    6 if clip_depth > 0 => {
                        dl.pop_clip_rect();
                        clip_depth -= 1;
                    }
                    _ => dl.add_image(TextureId::new(kind as u32), a, b, vec2f(0.0, 0.0), vec2f(1.0, 1.0), COL32_WHITE),
                }
            }
            let mut out = Vec::new();
            dl.add_to(&mut out);
            for list in &out {
                prop_assert_eq!(elem_total(list), list.idx_buffer.len());
                let mut expected_offset = 0;
                for cmd in &list.cmd_buffer {
                    prop_assert_eq!(cmd.idx_offset as usize, expected_offset);
                    prop_assert_eq!(cmd.elem_count % 3, 0);
                    expected_offset += cmd.elem_count as usize;
                }
                prop_assert!(list.idx_buffer.iter().all(|i| (*i as usize) < list.vtx_buffer.len()));
            }
        }
    }
}
