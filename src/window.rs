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
//! Windows: the containers owning a draw list, an id stack and the layout cursor.
use super::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Options accepted by [`Context::begin`].
    pub struct WindowFlags : u32 {
        /// No title bar, the content starts at the top padding.
        const NO_TITLE_BAR = 1 << 0;
        /// No background fill and no border.
        const NO_BACKGROUND = 1 << 7;
        /// The window never becomes the hovered window, so pointer input passes through it.
        const NO_INPUTS = 1 << 9;
    }
}

const DEFAULT_WINDOW_POS: Vec2f = Vec2f { x: 60.0, y: 60.0 };
const DEFAULT_WINDOW_SIZE: Vec2f = Vec2f { x: 400.0, y: 300.0 };

/// Name of the window receiving the items submitted outside any `begin`/`end` pair.
pub const IMPLICIT_WINDOW_NAME: &str = "Debug##Default";

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct NextWindowData {
    pub(crate) pos: Option<(Vec2f, Cond)>,
    pub(crate) size: Option<(Vec2f, Cond)>,
}

/// A window owned by the [`Context`].
///
/// Windows persist across frames; a window that is not submitted for a frame simply stays
/// inactive and is not rendered.
#[derive(Debug)]
pub struct Window {
    pub(crate) name: String,
    pub(crate) id: Id,
    pub(crate) flags: WindowFlags,
    pub(crate) pos: Vec2f,
    pub(crate) size: Vec2f,
    pub(crate) dc: WindowTempData,
    pub(crate) id_stack: IdStack,
    pub(crate) draw_list: DrawList,
    pub(crate) clip_rect: Rect,
    pub(crate) inner_clip_rect: Rect,
    pub(crate) content_region_rect: Rect,
    pub(crate) title_bar_height: f32,
    pub(crate) move_id: Id,
    pub(crate) active: bool,
    pub(crate) was_active: bool,
    pub(crate) write_accessed: bool,
    pub(crate) skip_items: bool,
    pub(crate) appearing: bool,
    pub(crate) begin_count: u32,
    pub(crate) last_frame_active: i32,
    pos_once_used: bool,
    size_once_used: bool,
}

impl Window {
    pub(crate) fn new(name: &str, shared: &DrawListSharedData) -> Self {
        let id = Id::new(hash_str(HASH_SEED, name));
        let id_stack = IdStack::with_root(id);
        let move_id = id_stack.get_id_str("#MOVE");
        let mut draw_list = DrawList::new(shared);
        draw_list.owner_name = name.to_string();
        Self {
            name: name.to_string(),
            id,
            flags: WindowFlags::empty(),
            pos: DEFAULT_WINDOW_POS,
            size: DEFAULT_WINDOW_SIZE,
            dc: WindowTempData::default(),
            id_stack,
            draw_list,
            clip_rect: Rect::default(),
            inner_clip_rect: Rect::default(),
            content_region_rect: Rect::default(),
            title_bar_height: 0.0,
            move_id,
            active: false,
            was_active: false,
            write_accessed: false,
            skip_items: false,
            appearing: false,
            begin_count: 0,
            last_frame_active: -1,
            pos_once_used: false,
            size_once_used: false,
        }
    }

    /// Name passed to `begin`, including any `##` suffix.
    pub fn name(&self) -> &str { &self.name }

    /// Identifier hashed from the name.
    pub fn id(&self) -> Id { self.id }

    /// Flags of the last `begin`.
    pub fn flags(&self) -> WindowFlags { self.flags }

    /// Upper-left corner in screen space.
    pub fn pos(&self) -> Vec2f { self.pos }

    /// Outer size, title bar included.
    pub fn size(&self) -> Vec2f { self.size }

    /// Outer rectangle.
    pub fn rect(&self) -> Rect { Rect::from_pos_size(self.pos, self.size) }

    /// Returns `true` if the window was submitted this frame.
    pub fn is_active(&self) -> bool { self.active }

    /// Returns `true` if the window was submitted last frame.
    pub fn was_active(&self) -> bool { self.was_active }

    /// Geometry emitted into the window so far this frame.
    pub fn draw_list(&self) -> &DrawList { &self.draw_list }

    /// Layout state of the window.
    pub fn temp_data(&self) -> &WindowTempData { &self.dc }

    pub(crate) fn title_bar_rect(&self) -> Rect { Rect::from_pos_size(self.pos, vec2f(self.size.x, self.title_bar_height)) }

    /// Hashes a rectangle relative to the window into an identifier, for items that have none.
    pub(crate) fn get_id_from_rect(&self, r: &Rect) -> Id {
        let rel = [
            (r.min.x - self.pos.x).floor() as i32,
            (r.min.y - self.pos.y).floor() as i32,
            (r.max.x - self.pos.x).floor() as i32,
            (r.max.y - self.pos.y).floor() as i32,
        ];
        self.id_stack.get_id_from_ints(&rel)
    }
}

fn cond_applies(cond: Cond, created: bool, appearing: bool, once_used: &mut bool) -> bool {
    match cond {
        Cond::Always => true,
        Cond::Once => !std::mem::replace(once_used, true),
        Cond::FirstUseEver => created,
        Cond::Appearing => appearing,
    }
}

impl Context {
    pub(crate) fn current_window_index(&self) -> usize { self.current_window_stack.last().copied().unwrap_or(0) }

    /// Window receiving the items, the implicit one outside any `begin`/`end` pair.
    pub fn current_window(&self) -> &Window { &self.windows[self.current_window_index()] }

    /// Mutable access to the current window, which marks it as written to this frame.
    pub(crate) fn current_window_mut(&mut self) -> &mut Window {
        let idx = self.current_window_index();
        let w = &mut self.windows[idx];
        w.write_accessed = true;
        w
    }

    pub(crate) fn find_window_index(&self, id: Id) -> Option<usize> { self.windows.iter().position(|w| w.id == id) }

    /// Looks a window up by identifier.
    pub fn find_window(&self, id: Id) -> Option<&Window> { self.find_window_index(id).map(|i| &self.windows[i]) }

    /// Looks a window up by name.
    pub fn find_window_by_name(&self, name: &str) -> Option<&Window> { self.find_window(Id::new(hash_str(HASH_SEED, name))) }

    /// Windows in back to front order.
    pub fn windows(&self) -> &[Window] { &self.windows }

    /// Sets the position of the next window to begin.
    pub fn set_next_window_pos(&mut self, pos: Vec2f, cond: Cond) { self.next_window.pos = Some((pos, cond)); }

    /// Sets the outer size of the next window to begin.
    pub fn set_next_window_size(&mut self, size: Vec2f, cond: Cond) { self.next_window.size = Some((size, cond)); }

    /// Starts submitting items into the window `name`, creating it on first use.
    ///
    /// When `open` is given, the title bar shows a close button that sets it to `false`.
    /// [`Context::end`] must be called whatever this returns; `false` means items are skipped.
    #[inline(never)]
    #[must_use]
    pub fn begin(&mut self, name: &str, open: Option<&mut bool>, flags: WindowFlags) -> bool {
        contract_check!(!name.is_empty(), "window name must not be empty");
        contract_check!(self.within_frame_scope, "begin({}) called outside new_frame/end_frame", name);

        let id = Id::new(hash_str(HASH_SEED, name));
        let (idx, created) = match self.find_window_index(id) {
            Some(idx) => (idx, false),
            None => {
                log::debug!("window {} created", name);
                self.windows.push(Window::new(name, &self.shared_data));
                (self.windows.len() - 1, true)
            }
        };
        self.current_window_stack.push(idx);

        let frame = self.frame_count;
        let next = std::mem::take(&mut self.next_window);
        let first_begin_of_frame = self.windows[idx].last_frame_active != frame;
        if !first_begin_of_frame {
            let w = &mut self.windows[idx];
            w.begin_count += 1;
            return !w.skip_items;
        }

        {
            let w = &mut self.windows[idx];
            w.appearing = w.last_frame_active < frame - 1;
            w.flags = flags;
            w.active = true;
            w.last_frame_active = frame;
            w.begin_count = 1;
            if let Some((pos, cond)) = next.pos {
                if cond_applies(cond, created, w.appearing, &mut w.pos_once_used) {
                    w.pos = vec2f(pos.x.floor(), pos.y.floor());
                }
            }
            if let Some((size, cond)) = next.size {
                if cond_applies(cond, created, w.appearing, &mut w.size_once_used) {
                    w.size = vec2f(size.x.floor(), size.y.floor());
                }
            }
        }
        self.setup_window_frame(idx);
        self.render_window_decorations(idx, open);

        let w = &mut self.windows[idx];
        let clip = w.inner_clip_rect;
        w.draw_list.push_clip_rect(clip.min, clip.max, true);
        w.clip_rect = w.draw_list.current_clip_rect().to_rect();
        w.skip_items = !w.active;
        !w.skip_items
    }

    fn setup_window_frame(&mut self, idx: usize) {
        let style = self.style;
        let font_size = self.font_size;
        let texture = self.font.texture_id();
        let w = &mut self.windows[idx];

        w.id_stack.truncate(1);
        w.title_bar_height = if w.flags.contains(WindowFlags::NO_TITLE_BAR) { 0.0 } else { font_size + style.frame_padding.y * 2.0 };

        let inner = Rect::new(w.pos.x, w.pos.y + w.title_bar_height, w.pos.x + w.size.x, w.pos.y + w.size.y);
        let pad_x = (style.window_padding.x * 0.5 - style.window_border_size).floor().max(0.0);
        w.inner_clip_rect = Rect::new(
            (0.5 + inner.min.x + pad_x).floor(),
            (0.5 + inner.min.y).floor(),
            (0.5 + inner.max.x - pad_x).floor(),
            (0.5 + inner.max.y).floor(),
        );
        w.content_region_rect = Rect::new(
            inner.min.x + style.window_padding.x,
            inner.min.y + style.window_padding.y,
            inner.max.x - style.window_padding.x,
            inner.max.y - style.window_padding.y,
        );
        let start = w.content_region_rect.min;
        w.dc.reset(vec2f(start.x.floor(), start.y.floor()), style.window_padding.x);

        w.draw_list.reset_for_new_frame(&self.shared_data);
        w.draw_list.owner_name.clone_from(&w.name);
        w.draw_list.push_texture_id(texture);
        // decorations are clipped by the outer rectangle only
        let outer = w.rect();
        w.draw_list.push_clip_rect(outer.min, outer.max, false);
        w.clip_rect = w.draw_list.current_clip_rect().to_rect();
    }

    fn render_window_decorations(&mut self, idx: usize, open: Option<&mut bool>) {
        let style = self.style;
        let focused = self.focused_window == Some(self.windows[idx].id);
        {
            let w = &mut self.windows[idx];
            let (min, max) = (w.pos, vec2f(w.pos.x + w.size.x, w.pos.y + w.size.y));
            if !w.flags.contains(WindowFlags::NO_BACKGROUND) {
                w.draw_list.add_rect_filled(vec2f(min.x, min.y + w.title_bar_height), max, style.color_u32(StyleColor::WindowBg), 0.0, DrawCornerFlags::ALL);
            }
            if w.title_bar_height > 0.0 {
                let col = if focused { StyleColor::TitleBgActive } else { StyleColor::TitleBg };
                let tb = w.title_bar_rect();
                w.draw_list.add_rect_filled(tb.min, tb.max, style.color_u32(col), 0.0, DrawCornerFlags::ALL);
            }
            if style.window_border_size > 0.0 && !w.flags.contains(WindowFlags::NO_BACKGROUND) {
                w.draw_list.add_rect(min, max, style.color_u32(StyleColor::Border), 0.0, DrawCornerFlags::ALL, style.window_border_size);
            }
        }

        if self.windows[idx].title_bar_height <= 0.0 {
            return;
        }

        let title_bar = self.windows[idx].title_bar_rect();
        let mut text_clip_max_x = title_bar.max.x - style.frame_padding.x;
        if let Some(open) = open {
            let close_id = self.windows[idx].id_stack.get_id_str("#CLOSE");
            let close_pos = vec2f(title_bar.max.x - style.frame_padding.x - self.font_size, title_bar.min.y);
            if self.close_button(close_id, close_pos) {
                *open = false;
            }
            text_clip_max_x = close_pos.x - style.item_inner_spacing.x;
        }

        let font = self.font.clone();
        let w = &mut self.windows[idx];
        let label = find_rendered_text_end(&w.name);
        let text_pos = vec2f(title_bar.min.x + style.frame_padding.x, title_bar.min.y + style.frame_padding.y);
        let clip = ClipRect::new(title_bar.min.x, title_bar.min.y, text_clip_max_x, title_bar.max.y);
        w.draw_list.add_text(&*font, self.font_size, text_pos, style.color_u32(StyleColor::Text), label, 0.0, Some(clip));

        // the title bar stands as the last item until the first widget
        w.dc.last_item_id = w.move_id;
        w.dc.last_item_rect = title_bar;
        w.dc.last_item_status_flags = ItemStatusFlags::empty();
        if self.is_mouse_hovering_rect(title_bar.min, title_bar.max, false) {
            self.windows[idx].dc.last_item_status_flags |= ItemStatusFlags::HOVERED_RECT;
        }
    }

    /// Closes the window opened by the matching [`Context::begin`].
    pub fn end(&mut self) {
        if self.current_window_stack.len() <= 1 && self.pushed_implicit_window {
            log::warn!("end called with no window left to close");
            self.pending_frame_error.get_or_insert(FrameError::TooManyEnds);
            return;
        }
        self.end_window();
    }

    pub(crate) fn end_window(&mut self) {
        let Some(idx) = self.current_window_stack.pop() else {
            return;
        };
        let w = &mut self.windows[idx];
        if w.draw_list.clip_rect_depth() > 0 {
            w.draw_list.pop_clip_rect();
        }
        contract_check!(w.id_stack.depth() == 1, "window {} ended with {} unpopped id(s)", w.name, w.id_stack.depth() - 1);
    }

    /// Draw list of the current window.
    pub fn window_draw_list(&mut self) -> &mut DrawList { &mut self.current_window_mut().draw_list }

    /// Pushes a clip rectangle on the current window, intersected with the current one when asked.
    pub fn push_clip_rect(&mut self, min: Vec2f, max: Vec2f, intersect_with_current: bool) {
        let w = self.current_window_mut();
        w.draw_list.push_clip_rect(min, max, intersect_with_current);
        w.clip_rect = w.draw_list.current_clip_rect().to_rect();
    }

    /// Pops the clip rectangle pushed by [`Context::push_clip_rect`].
    pub fn pop_clip_rect(&mut self) {
        let w = self.current_window_mut();
        w.draw_list.pop_clip_rect();
        w.clip_rect = w.draw_list.current_clip_rect().to_rect();
    }

    /// Hashes `s` against the current window's id stack.
    pub fn get_id(&self, s: &str) -> Id { self.current_window().id_stack.get_id_str(s) }

    /// Hashes an integer against the current window's id stack.
    pub fn get_id_int(&self, n: i32) -> Id { self.current_window().id_stack.get_id_int(n) }

    /// Pushes a string scope on the current window's id stack.
    pub fn push_id(&mut self, s: &str) { self.current_window_mut().id_stack.push_str(s); }

    /// Pushes an integer scope on the current window's id stack.
    pub fn push_id_int(&mut self, n: i32) { self.current_window_mut().id_stack.push_int(n); }

    /// Pops the scope pushed by [`Context::push_id`] or [`Context::push_id_int`].
    pub fn pop_id(&mut self) { self.current_window_mut().id_stack.pop(); }

    /// Moves window `id` to the front and gives it focus.
    ///
    /// The z-order change is applied at the end of the frame so window indices stay stable while
    /// windows are being submitted.
    pub fn focus_window(&mut self, id: Option<Id>) { self.focused_window = id; }

    pub(crate) fn bring_focused_to_front(&mut self) {
        let Some(id) = self.focused_window else {
            return;
        };
        contract_check!(self.current_window_stack.is_empty(), "windows reordered while {} are open", self.current_window_stack.len());
        if let Some(idx) = self.find_window_index(id) {
            let w = self.windows.remove(idx);
            self.windows.push(w);
        }
    }

    /// Finds the front-most window under the pointer among those active last frame.
    pub(crate) fn update_hovered_window(&mut self) {
        let mouse = self.input.mouse_pos;
        self.hovered_window = self
            .windows
            .iter()
            .rev()
            .find(|w| w.active && !w.flags.contains(WindowFlags::NO_INPUTS) && w.rect().contains_point(mouse))
            .map(|w| w.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_persists_and_applies_conditions() {
        let mut ctx = headless_context();
        ctx.new_frame();
        ctx.set_next_window_pos(vec2f(100.0, 100.0), Cond::FirstUseEver);
        assert!(ctx.begin("Tools", None, WindowFlags::empty()));
        let id = ctx.current_window().id();
        ctx.end();
        ctx.end_frame().unwrap();
        assert_eq!(ctx.find_window(id).unwrap().pos().x, 100.0);

        ctx.new_frame();
        ctx.set_next_window_pos(vec2f(300.0, 300.0), Cond::FirstUseEver);
        assert!(ctx.begin("Tools", None, WindowFlags::empty()));
        ctx.end();
        ctx.end_frame().unwrap();
        let w = ctx.find_window_by_name("Tools").unwrap();
        assert_eq!(w.pos().x, 100.0);
        assert!(w.is_active());
    }

    #[test]
    fn close_button_clears_open_flag() {
        let mut ctx = headless_context();
        let mut open = true;
        // frame 1 lays the window out, frame 2 presses, frame 3 releases
        for (down, frame) in [(false, 0), (true, 1), (false, 2)] {
            ctx.input.mousemove(392.0, 28.0);
            ctx.input.mouse_down[0] = down;
            ctx.new_frame();
            ctx.set_next_window_pos(vec2f(0.0, 20.0), Cond::Always);
            ctx.set_next_window_size(vec2f(400.0, 200.0), Cond::Always);
            let _ = ctx.begin("Closable", Some(&mut open), WindowFlags::empty());
            ctx.end();
            ctx.end_frame().unwrap();
            if frame < 2 {
                assert!(open);
            }
        }
        assert!(!open);
    }

    #[test]
    fn push_id_scopes_hashes() {
        let mut ctx = headless_context();
        ctx.new_frame();
        let _ = ctx.begin("Ids", None, WindowFlags::empty());
        let a = ctx.get_id("button");
        ctx.push_id_int(3);
        let b = ctx.get_id("button");
        ctx.pop_id();
        assert_ne!(a, b);
        assert_eq!(a, ctx.get_id("button"));
        assert_eq!(ctx.get_id("x###same"), ctx.get_id("y###same"));
        assert_ne!(ctx.get_id("x##same"), ctx.get_id("y##same"));
        ctx.end();
        ctx.end_frame().unwrap();
    }

    #[test]
    fn window_clip_rect_follows_pushes() {
        let mut ctx = headless_context();
        ctx.new_frame();
        ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Always);
        let _ = ctx.begin("Clip", None, WindowFlags::NO_TITLE_BAR);
        let before = ctx.current_window().clip_rect;
        ctx.push_clip_rect(vec2f(10.0, 10.0), vec2f(20.0, 20.0), true);
        assert_eq!(ctx.current_window().clip_rect.width(), 10.0);
        ctx.pop_clip_rect();
        assert_eq!(ctx.current_window().clip_rect.width(), before.width());
        ctx.end();
        ctx.end_frame().unwrap();
    }
}
