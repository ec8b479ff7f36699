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
//! Cursor-driven item placement inside the current window.
use super::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Status of the last submitted item, filled by [`Context::item_add`].
    pub struct ItemStatusFlags : u32 {
        /// The pointer was over the item rectangle (clipped by the window) when the item was added.
        const HOVERED_RECT = 1 << 0;
    }
}

/// Per-window layout state, rebuilt at the first `begin` of every frame.
///
/// Items are placed top to bottom: [`Context::item_size`] advances the cursor to the next line,
/// [`Context::same_line`] brings it back to the end of the previous item.
#[derive(Clone, Debug, Default)]
pub struct WindowTempData {
    pub(crate) cursor_pos: Vec2f,
    pub(crate) cursor_pos_prev_line: Vec2f,
    pub(crate) cursor_start_pos: Vec2f,
    pub(crate) cursor_max_pos: Vec2f,
    pub(crate) curr_line_size: Vec2f,
    pub(crate) prev_line_size: Vec2f,
    pub(crate) curr_line_text_base_offset: f32,
    pub(crate) prev_line_text_base_offset: f32,
    pub(crate) indent: f32,
    pub(crate) last_item_id: Id,
    pub(crate) last_item_status_flags: ItemStatusFlags,
    pub(crate) last_item_rect: Rect,
}

impl WindowTempData {
    pub(crate) fn reset(&mut self, start: Vec2f, indent: f32) {
        *self = Self {
            cursor_pos: start,
            cursor_pos_prev_line: start,
            cursor_start_pos: start,
            cursor_max_pos: start,
            indent,
            ..Self::default()
        };
    }

    /// Screen position where the next item goes.
    pub fn cursor_pos(&self) -> Vec2f { self.cursor_pos }

    /// Bottom-right extent reached by the items so far.
    pub fn cursor_max_pos(&self) -> Vec2f { self.cursor_max_pos }
}

impl Context {
    /// Advances the layout cursor past an item of `size`.
    ///
    /// `text_baseline_y` aligns text of items on the same line; pass a negative value to ignore it.
    #[inline(never)]
    pub fn item_size(&mut self, size: Vec2f, text_baseline_y: f32) {
        let spacing_y = self.style.item_spacing.y;
        let w = self.current_window_mut();
        if w.skip_items {
            return;
        }

        let dc = &mut w.dc;
        let offset_to_match_baseline_y = if text_baseline_y >= 0.0 { (dc.curr_line_text_base_offset - text_baseline_y).max(0.0) } else { 0.0 };
        let line_height = dc.curr_line_size.y.max(size.y + offset_to_match_baseline_y);

        dc.cursor_pos_prev_line = vec2f(dc.cursor_pos.x + size.x, dc.cursor_pos.y);
        dc.cursor_pos = vec2f((w.pos.x + dc.indent).floor(), (dc.cursor_pos.y + line_height + spacing_y).floor());
        dc.cursor_max_pos.x = dc.cursor_max_pos.x.max(dc.cursor_pos_prev_line.x);
        dc.cursor_max_pos.y = dc.cursor_max_pos.y.max(dc.cursor_pos.y - spacing_y);

        dc.prev_line_size.y = line_height;
        dc.curr_line_size.y = 0.0;
        dc.prev_line_text_base_offset = dc.curr_line_text_base_offset.max(text_baseline_y);
        dc.curr_line_text_base_offset = 0.0;
    }

    /// Records `bb` as the last item and tests it against the window clip rectangle.
    ///
    /// Returns `false` when the item is clipped out, in which case the caller should skip its
    /// interaction and rendering. The active item is never clipped so it keeps receiving input.
    pub fn item_add(&mut self, bb: Rect, id: Id) -> bool {
        {
            let w = self.current_window_mut();
            w.dc.last_item_id = id;
            w.dc.last_item_rect = bb;
            w.dc.last_item_status_flags = ItemStatusFlags::empty();
        }
        if id.is_some() {
            self.keep_alive_id(id);
        }
        if self.is_clipped_ex(&bb, id) {
            return false;
        }

        if self.is_mouse_hovering_rect(bb.min, bb.max, true) {
            self.current_window_mut().dc.last_item_status_flags |= ItemStatusFlags::HOVERED_RECT;
        }
        true
    }

    pub(crate) fn is_clipped_ex(&self, bb: &Rect, id: Id) -> bool { !bb.overlaps(&self.current_window().clip_rect) && (id.is_none() || id != self.active_id) }

    /// Places the next item on the same line as the previous one.
    ///
    /// With `offset_from_start_x` the item goes at that offset from the window's left edge,
    /// otherwise after the previous item plus `spacing_w` (style spacing when negative).
    pub fn same_line(&mut self, offset_from_start_x: f32, spacing_w: f32) {
        let item_spacing_x = self.style.item_spacing.x;
        let w = self.current_window_mut();
        if w.skip_items {
            return;
        }

        let dc = &mut w.dc;
        if offset_from_start_x != 0.0 {
            dc.cursor_pos.x = w.pos.x + offset_from_start_x + spacing_w.max(0.0);
        } else {
            let spacing_w = if spacing_w < 0.0 { item_spacing_x } else { spacing_w };
            dc.cursor_pos.x = dc.cursor_pos_prev_line.x + spacing_w;
        }
        dc.cursor_pos.y = dc.cursor_pos_prev_line.y;
        dc.curr_line_size = dc.prev_line_size;
        dc.curr_line_text_base_offset = dc.prev_line_text_base_offset;
    }

    /// Ends the current line, keeping its height, or adds an empty line of text height.
    pub fn new_line(&mut self) {
        if self.current_window().skip_items {
            return;
        }
        if self.current_window().dc.curr_line_size.y > 0.0 {
            self.item_size(Vec2f::default(), -1.0);
        } else {
            self.item_size(vec2f(0.0, self.font_size), -1.0);
        }
    }

    /// Adds vertical spacing.
    pub fn spacing(&mut self) {
        if self.current_window().skip_items {
            return;
        }
        self.item_size(Vec2f::default(), -1.0);
    }

    /// Reserves an empty item of `size`.
    pub fn dummy(&mut self, size: Vec2f) {
        if self.current_window().skip_items {
            return;
        }
        let bb = Rect::from_pos_size(self.current_window().dc.cursor_pos, size);
        self.item_size(size, -1.0);
        self.item_add(bb, Id::NONE);
    }

    /// Moves the content start to the right by `indent_w`, or by the style indent when zero.
    pub fn indent(&mut self, indent_w: f32) {
        let w = if indent_w != 0.0 { indent_w } else { self.style.indent_spacing };
        let win = self.current_window_mut();
        win.dc.indent += w;
        win.dc.cursor_pos.x = win.pos.x + win.dc.indent;
    }

    /// Reverts a matching [`Context::indent`].
    pub fn unindent(&mut self, indent_w: f32) {
        let w = if indent_w != 0.0 { indent_w } else { self.style.indent_spacing };
        let win = self.current_window_mut();
        win.dc.indent -= w;
        win.dc.cursor_pos.x = win.pos.x + win.dc.indent;
    }

    /// Cursor position in screen space.
    pub fn cursor_screen_pos(&self) -> Vec2f { self.current_window().dc.cursor_pos }

    /// Moves the cursor to a screen position.
    pub fn set_cursor_screen_pos(&mut self, pos: Vec2f) {
        let dc = &mut self.current_window_mut().dc;
        dc.cursor_pos = pos;
        dc.cursor_max_pos.x = dc.cursor_max_pos.x.max(pos.x);
        dc.cursor_max_pos.y = dc.cursor_max_pos.y.max(pos.y);
    }

    /// Cursor position relative to the window origin.
    pub fn cursor_pos(&self) -> Vec2f {
        let w = self.current_window();
        vec2f(w.dc.cursor_pos.x - w.pos.x, w.dc.cursor_pos.y - w.pos.y)
    }

    /// Moves the cursor to a position relative to the window origin.
    pub fn set_cursor_pos(&mut self, local: Vec2f) {
        let origin = self.current_window().pos;
        self.set_cursor_screen_pos(vec2f(origin.x + local.x, origin.y + local.y));
    }

    /// Space left between the cursor and the bottom-right of the content region.
    pub fn content_region_avail(&self) -> Vec2f {
        let w = self.current_window();
        let max = w.content_region_rect.max;
        vec2f(max.x - w.dc.cursor_pos.x, max.y - w.dc.cursor_pos.y)
    }

    /// Identifier of the last submitted item.
    pub fn last_item_id(&self) -> Id { self.current_window().dc.last_item_id }

    /// Bounding box of the last submitted item.
    pub fn last_item_rect(&self) -> Rect { self.current_window().dc.last_item_rect }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn begin_test_window(ctx: &mut Context) -> Vec2f {
        ctx.new_frame();
        ctx.set_next_window_pos(vec2f(10.0, 20.0), Cond::Always);
        ctx.set_next_window_size(vec2f(300.0, 200.0), Cond::Always);
        assert!(ctx.begin("layout", None, WindowFlags::NO_TITLE_BAR));
        ctx.cursor_screen_pos()
    }

    #[test]
    fn items_stack_vertically() {
        let mut ctx = headless_context();
        let start = begin_test_window(&mut ctx);
        assert_eq!((start.x, start.y), (18.0, 28.0));

        ctx.dummy(vec2f(50.0, 10.0));
        let p = ctx.cursor_screen_pos();
        assert_eq!((p.x, p.y), (18.0, 42.0));

        ctx.same_line(0.0, -1.0);
        let p = ctx.cursor_screen_pos();
        assert_eq!((p.x, p.y), (76.0, 28.0));

        // the taller item on the same line sets the line height
        ctx.dummy(vec2f(5.0, 30.0));
        let p = ctx.cursor_screen_pos();
        assert_eq!(p.y, 62.0);
        let max = ctx.current_window().dc.cursor_max_pos();
        assert_eq!((max.x, max.y), (81.0, 58.0));
        ctx.end();
        assert!(ctx.end_frame().is_ok());
    }

    #[test]
    fn indent_moves_next_line_start() {
        let mut ctx = headless_context();
        let start = begin_test_window(&mut ctx);
        ctx.indent(0.0);
        assert_eq!(ctx.cursor_screen_pos().x, start.x + 21.0);
        ctx.dummy(vec2f(10.0, 10.0));
        assert_eq!(ctx.cursor_screen_pos().x, start.x + 21.0);
        ctx.unindent(0.0);
        assert_eq!(ctx.cursor_screen_pos().x, start.x);
        ctx.end();
        assert!(ctx.end_frame().is_ok());
    }

    #[test]
    fn clipped_items_are_rejected() {
        let mut ctx = headless_context();
        begin_test_window(&mut ctx);
        assert!(ctx.item_add(Rect::new(20.0, 30.0, 40.0, 40.0), Id::new(7)));
        assert_eq!(ctx.last_item_id(), Id::new(7));
        assert!(!ctx.item_add(Rect::new(500.0, 500.0, 510.0, 510.0), Id::new(8)));
        // the last item is recorded even when clipped
        assert_eq!(ctx.last_item_id(), Id::new(8));
        ctx.end();
        assert!(ctx.end_frame().is_ok());
    }

    #[test]
    fn content_region_shrinks_with_cursor() {
        let mut ctx = headless_context();
        begin_test_window(&mut ctx);
        let avail = ctx.content_region_avail();
        assert_eq!((avail.x, avail.y), (284.0, 184.0));
        ctx.set_cursor_pos(vec2f(8.0, 108.0));
        assert_eq!(ctx.content_region_avail().y, 84.0);
        ctx.end();
        assert!(ctx.end_frame().is_ok());
    }
}
