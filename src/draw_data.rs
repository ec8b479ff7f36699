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
use super::*;

#[derive(Clone, Debug, Default)]
/// Everything a renderer needs for one frame: the draw lists in back-to-front order and the viewport.
///
/// Valid from `render` until the next `new_frame`. Cloning it decouples a renderer running
/// behind the UI thread from the next frame's mutations.
pub struct DrawData {
    /// `true` once `render` has filled the structure.
    pub valid: bool,
    /// Draw lists to render, in order.
    pub cmd_lists: Vec<DrawList>,
    /// Sum of the index buffer lengths.
    pub total_idx_count: usize,
    /// Sum of the vertex buffer lengths.
    pub total_vtx_count: usize,
    /// Upper-left corner of the viewport.
    pub display_pos: Vec2f,
    /// Size of the viewport.
    pub display_size: Vec2f,
    /// Framebuffer pixels per display unit.
    pub framebuffer_scale: Vec2f,
}

impl DrawData {
    /// Fills the structure from the frame's lists and computes the totals.
    pub fn setup(&mut self, lists: Vec<DrawList>, display_pos: Vec2f, display_size: Vec2f, framebuffer_scale: Vec2f) {
        self.valid = true;
        self.total_idx_count = lists.iter().map(|l| l.idx_buffer.len()).sum();
        self.total_vtx_count = lists.iter().map(|l| l.vtx_buffer.len()).sum();
        self.cmd_lists = lists;
        self.display_pos = display_pos;
        self.display_size = display_size;
        self.framebuffer_scale = framebuffer_scale;
    }

    /// Invalidates the structure and hands the lists back for reuse.
    pub fn clear(&mut self) -> Vec<DrawList> {
        self.valid = false;
        self.total_idx_count = 0;
        self.total_vtx_count = 0;
        self.display_pos = Vec2f::default();
        self.display_size = Vec2f::default();
        self.framebuffer_scale = Vec2f::default();
        std::mem::take(&mut self.cmd_lists)
    }

    /// Converts every list to non-indexed triangles, for renderers that cannot draw indexed.
    pub fn de_index_all_buffers(&mut self) {
        self.total_vtx_count = 0;
        self.total_idx_count = 0;
        for list in &mut self.cmd_lists {
            if list.idx_buffer.is_empty() {
                self.total_vtx_count += list.vtx_buffer.len();
                continue;
            }
            let mut vertices = Vec::with_capacity(list.idx_buffer.len());
            for cmd in &mut list.cmd_buffer {
                let start = cmd.idx_offset as usize;
                // idx_offset now addresses the first vertex of the command
                cmd.idx_offset = vertices.len() as u32;
                for idx in &list.idx_buffer[start..start + cmd.elem_count as usize] {
                    vertices.push(list.vtx_buffer[cmd.vtx_offset as usize + *idx as usize]);
                }
                cmd.vtx_offset = 0;
            }
            list.vtx_buffer = vertices;
            list.idx_buffer.clear();
            self.total_vtx_count += list.vtx_buffer.len();
        }
    }

    /// Scales every command's clip rectangle, for framebuffers at a different resolution.
    pub fn scale_clip_rects(&mut self, fb_scale: Vec2f) {
        for cmd in self.cmd_lists.iter_mut().flat_map(|l| l.cmd_buffer.iter_mut()) {
            let cr = &mut cmd.clip_rect;
            *cr = ClipRect::new(cr.x1 * fb_scale.x, cr.y1 * fb_scale.y, cr.x2 * fb_scale.x, cr.y2 * fb_scale.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with_quads(n: usize) -> DrawList {
        let mut dl = DrawList::default();
        for i in 0..n {
            let x = i as f32 * 10.0;
            dl.add_rect_filled(vec2f(x, 0.0), vec2f(x + 5.0, 5.0), COL32_WHITE, 0.0, DrawCornerFlags::ALL);
        }
        dl
    }

    #[test]
    fn setup_sums_totals() {
        let mut dd = DrawData::default();
        dd.setup(vec![list_with_quads(2), list_with_quads(3)], Vec2f::default(), vec2f(800.0, 600.0), vec2f(1.0, 1.0));
        assert!(dd.valid);
        assert_eq!(dd.total_vtx_count, 20);
        assert_eq!(dd.total_idx_count, 30);
        let lists = dd.clear();
        assert_eq!(lists.len(), 2);
        assert!(!dd.valid);
        assert!(dd.cmd_lists.is_empty());
    }

    #[test]
    fn de_index_expands_triangles() {
        let mut dd = DrawData::default();
        dd.setup(vec![list_with_quads(2)], Vec2f::default(), vec2f(100.0, 100.0), vec2f(1.0, 1.0));
        dd.de_index_all_buffers();
        let list = &dd.cmd_lists[0];
        assert_eq!(list.vtx_buffer.len(), 12);
        assert!(list.idx_buffer.is_empty());
        assert_eq!(dd.total_vtx_count, 12);
        assert_eq!(dd.total_idx_count, 0);
        // second triangle of the second quad ends on its lower-left corner
        assert_eq!((list.vtx_buffer[11].pos.x, list.vtx_buffer[11].pos.y), (10.0, 5.0));
    }

    #[test]
    fn clip_rects_scale_with_framebuffer() {
        let mut dl = DrawList::default();
        dl.push_clip_rect(vec2f(10.0, 20.0), vec2f(30.0, 40.0), false);
        dl.add_rect_filled(vec2f(10.0, 20.0), vec2f(15.0, 25.0), COL32_WHITE, 0.0, DrawCornerFlags::ALL);
        let mut dd = DrawData::default();
        dd.setup(vec![dl], Vec2f::default(), vec2f(100.0, 100.0), vec2f(2.0, 2.0));
        dd.scale_clip_rects(vec2f(2.0, 2.0));
        assert_eq!(dd.cmd_lists[0].cmd_buffer[0].clip_rect, ClipRect::new(20.0, 40.0, 60.0, 80.0));
    }
}
