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
//! Hovered/active item tracking and the button behavior every clickable item builds on.
use super::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Options of [`Context::button_behavior`].
    pub struct ButtonFlags : u32 {
        /// Repeat the press while held.
        const REPEAT = 1 << 0;
        /// Press on click then release over the item (default).
        const PRESSED_ON_CLICK_RELEASE = 1 << 1;
        /// Press on click.
        const PRESSED_ON_CLICK = 1 << 2;
        /// Press on release, no need to click over the item.
        const PRESSED_ON_RELEASE = 1 << 3;
        /// Press on double click.
        const PRESSED_ON_DOUBLE_CLICK = 1 << 4;
        /// Let a later item overlap this one.
        const ALLOW_ITEM_OVERLAP = 1 << 6;
        /// Never reacts.
        const DISABLED = 1 << 9;
        /// Press without holding the active id, so no drag is possible.
        const NO_HOLDING_ACTIVE_ID = 1 << 11;
        /// Press after hovering for a while during a drag and drop.
        const PRESSED_ON_DRAG_DROP_HOLD = 1 << 12;
    }
}

impl ButtonFlags {
    const PRESSED_ON_MASK: Self = Self::PRESSED_ON_CLICK_RELEASE.union(Self::PRESSED_ON_CLICK).union(Self::PRESSED_ON_RELEASE).union(Self::PRESSED_ON_DOUBLE_CLICK);
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Options of [`Context::is_item_hovered`].
    pub struct HoveredFlags : u32 {
        /// Hovered even while another item is active, for drag and drop targets.
        const ALLOW_WHEN_BLOCKED_BY_ACTIVE_ITEM = 1 << 5;
        /// Hovered even if another window is in front.
        const ALLOW_WHEN_OVERLAPPED = 1 << 6;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Direction an arrow points to.
pub enum Dir {
    /// Pointing left.
    Left,
    /// Pointing right.
    Right,
    /// Pointing up.
    Up,
    /// Pointing down.
    Down,
}

impl Context {
    /// Makes `id` the active item, owned by `window`. Pass [`Id::NONE`] to clear.
    pub fn set_active_id(&mut self, id: Id, window: Option<Id>) {
        self.active_id_is_just_activated = self.active_id != id;
        if self.active_id_is_just_activated {
            self.active_id_timer = 0.0;
            self.active_id_has_been_pressed = false;
        }
        self.active_id = id;
        self.active_id_allow_overlap = false;
        self.active_id_window = window;
        if id.is_some() {
            self.active_id_is_alive = id;
        }
    }

    /// Releases the active item.
    pub fn clear_active_id(&mut self) { self.set_active_id(Id::NONE, None); }

    /// Identifier of the active item, [`Id::NONE`] when nothing is held.
    pub fn active_id(&self) -> Id { self.active_id }

    /// Identifier of the hovered item.
    pub fn hovered_id(&self) -> Id { self.hovered_id }

    /// Makes `id` the hovered item.
    pub fn set_hovered_id(&mut self, id: Id) {
        self.hovered_id = id;
        self.hovered_id_allow_overlap = false;
        if id.is_some() && self.hovered_id_previous_frame != id {
            self.hovered_id_timer = 0.0;
            self.hovered_id_not_active_timer = 0.0;
        }
    }

    /// Keeps the active item alive when it is not submitted through `item_add` this frame.
    pub fn keep_alive_id(&mut self, id: Id) {
        if self.active_id == id {
            self.active_id_is_alive = id;
        }
        if self.active_id_previous_frame == id {
            self.active_id_previous_frame_is_alive = true;
        }
    }

    /// Lets later items overlap the last one while it is hovered or active.
    pub fn set_item_allow_overlap(&mut self) {
        let id = self.current_window().dc.last_item_id;
        if self.hovered_id == id {
            self.hovered_id_allow_overlap = true;
        }
        if self.active_id == id {
            self.active_id_allow_overlap = true;
        }
    }

    /// Returns `true` if the pointer is inside `[min, max)`, clipped by the current window when asked.
    pub fn is_mouse_hovering_rect(&self, min: Vec2f, max: Vec2f, clip: bool) -> bool {
        let mut r = Rect::from_min_max(min, max);
        if clip {
            r = r.clip_with(&self.current_window().clip_rect);
        }
        r.contains_point(self.input.mouse_pos)
    }

    /// Returns `true` and marks `id` hovered if the pointer is over `bb` and nothing else owns it.
    pub fn item_hoverable(&mut self, bb: &Rect, id: Id) -> bool {
        if self.hovered_id.is_some() && self.hovered_id != id && !self.hovered_id_allow_overlap {
            return false;
        }
        if self.hovered_window != Some(self.current_window().id) {
            return false;
        }
        if self.active_id.is_some() && self.active_id != id && !self.active_id_allow_overlap {
            return false;
        }
        if !self.is_mouse_hovering_rect(bb.min, bb.max, true) {
            return false;
        }
        self.set_hovered_id(id);
        true
    }

    /// Returns `true` if the last item is hovered.
    pub fn is_item_hovered(&self, flags: HoveredFlags) -> bool {
        let w = self.current_window();
        if !w.dc.last_item_status_flags.contains(ItemStatusFlags::HOVERED_RECT) {
            return false;
        }
        if self.hovered_window != Some(w.id) && !flags.contains(HoveredFlags::ALLOW_WHEN_OVERLAPPED) {
            return false;
        }
        if !flags.contains(HoveredFlags::ALLOW_WHEN_BLOCKED_BY_ACTIVE_ITEM)
            && self.active_id.is_some()
            && self.active_id != w.dc.last_item_id
            && !self.active_id_allow_overlap
            && self.active_id != w.move_id
        {
            return false;
        }
        // the title bar stands as last item until the first widget
        !(w.dc.last_item_id == w.move_id && w.write_accessed)
    }

    /// Returns `true` if the last item is the active one.
    pub fn is_item_active(&self) -> bool { self.active_id.is_some() && self.active_id == self.current_window().dc.last_item_id }

    /// Returns `true` on the frame `btn` went down, and on every repeat tick when `repeat` is set.
    pub fn is_mouse_clicked(&self, btn: MouseButton, repeat: bool) -> bool {
        let t = self.input.mouse_down_duration(btn);
        if t == 0.0 {
            return true;
        }
        let cfg = &self.config.input;
        if repeat && t > cfg.key_repeat_delay {
            let rate = cfg.key_repeat_rate * 0.50;
            return calc_typematic_repeat_amount(t - self.input.delta_time, t, cfg.key_repeat_delay, rate) > 0;
        }
        false
    }

    /// Returns `true` while `btn` is held past the drag threshold (`lock_threshold`, or the
    /// configured one when negative).
    pub fn is_mouse_dragging(&self, btn: MouseButton, lock_threshold: f32) -> bool {
        if !self.input.is_mouse_down(btn) {
            return false;
        }
        let threshold = if lock_threshold < 0.0 { self.config.input.mouse_drag_threshold } else { lock_threshold };
        self.input.mouse_drag_max_distance_sqr(btn) >= threshold * threshold
    }

    /// Pointer motion since `btn` went down, zero until the drag threshold is crossed.
    pub fn mouse_drag_delta(&self, btn: MouseButton, lock_threshold: f32) -> Vec2f {
        if !self.is_mouse_dragging(btn, lock_threshold) {
            return Vec2f::default();
        }
        let (pos, from) = (self.input.mouse_pos, self.input.mouse_clicked_pos(btn));
        vec2f(pos.x - from.x, pos.y - from.y)
    }

    /// Runs the hover/press/hold logic of a clickable item occupying `bb`.
    ///
    /// Returns `(pressed, hovered, held)`. The press edge depends on the `PRESSED_ON_*` flag,
    /// click-release being the default.
    #[inline(never)]
    pub fn button_behavior(&mut self, bb: &Rect, id: Id, flags: ButtonFlags) -> (bool, bool, bool) {
        if flags.contains(ButtonFlags::DISABLED) {
            if self.active_id == id {
                self.clear_active_id();
            }
            return (false, false, false);
        }

        let flags = if flags.intersects(ButtonFlags::PRESSED_ON_MASK) { flags } else { flags | ButtonFlags::PRESSED_ON_CLICK_RELEASE };
        let window_id = self.current_window().id;
        let mut pressed = false;
        let mut hovered = self.item_hoverable(bb, id);

        // a drag source does not report as hovered
        if hovered && self.drag_drop.active && self.drag_drop.payload.source_id == id && !self.drag_drop.source_flags.contains(DragDropFlags::SOURCE_NO_DISABLE_HOVER) {
            hovered = false;
        }

        // holding a payload over the item long enough presses it
        if self.drag_drop.active
            && flags.contains(ButtonFlags::PRESSED_ON_DRAG_DROP_HOLD)
            && !self.drag_drop.source_flags.contains(DragDropFlags::SOURCE_NO_HOLD_TO_OPEN_OTHERS)
            && self.is_item_hovered(HoveredFlags::ALLOW_WHEN_BLOCKED_BY_ACTIVE_ITEM)
        {
            hovered = true;
            self.set_hovered_id(id);
            let t = self.hovered_id_timer;
            if calc_typematic_repeat_amount(t + 0.0001 - self.input.delta_time, t + 0.0001, 0.70, 0.00) > 0 {
                pressed = true;
                self.focus_window(Some(window_id));
            }
        }

        // overlap mode requires last frame's hovered id to be none or this item
        if hovered && flags.contains(ButtonFlags::ALLOW_ITEM_OVERLAP) && self.hovered_id_previous_frame != id && self.hovered_id_previous_frame.is_some() {
            hovered = false;
        }

        if hovered {
            let clicked = self.input.is_mouse_clicked(MouseButton::Left);
            if flags.contains(ButtonFlags::PRESSED_ON_CLICK_RELEASE) && clicked {
                self.set_active_id(id, Some(window_id));
                self.focus_window(Some(window_id));
            }
            if (flags.contains(ButtonFlags::PRESSED_ON_CLICK) && clicked) || (flags.contains(ButtonFlags::PRESSED_ON_DOUBLE_CLICK) && self.input.is_mouse_double_clicked(MouseButton::Left)) {
                pressed = true;
                if flags.contains(ButtonFlags::NO_HOLDING_ACTIVE_ID) {
                    self.clear_active_id();
                } else {
                    self.set_active_id(id, Some(window_id));
                }
                self.focus_window(Some(window_id));
            }
            if flags.contains(ButtonFlags::PRESSED_ON_RELEASE) && self.input.is_mouse_released(MouseButton::Left) {
                // repeat mode trumps on-release
                if !(flags.contains(ButtonFlags::REPEAT) && self.input.mouse_down_duration_prev[0] >= self.config.input.key_repeat_delay) {
                    pressed = true;
                }
                self.clear_active_id();
            }
            if flags.contains(ButtonFlags::REPEAT) && self.active_id == id && self.input.mouse_down_duration(MouseButton::Left) > 0.0 && self.is_mouse_clicked(MouseButton::Left, true) {
                pressed = true;
            }
        }

        let mut held = false;
        if self.active_id == id {
            if pressed {
                self.active_id_has_been_pressed = true;
            }
            if self.active_id_is_just_activated {
                self.active_id_click_offset = vec2f(self.input.mouse_pos.x - bb.min.x, self.input.mouse_pos.y - bb.min.y);
            }
            if self.input.is_mouse_down(MouseButton::Left) {
                held = true;
            } else {
                if hovered && flags.contains(ButtonFlags::PRESSED_ON_CLICK_RELEASE) && !self.drag_drop.active {
                    let is_repeating_already = flags.contains(ButtonFlags::REPEAT) && self.input.mouse_down_duration_prev[0] >= self.config.input.key_repeat_delay;
                    if !is_repeating_already {
                        pressed = true;
                    }
                }
                self.clear_active_id();
            }
        }

        (pressed, hovered, held)
    }

    /// Size of `text` in the current font, hiding anything after `##` when asked.
    pub fn calc_text_size(&self, text: &str, hide_text_after_double_hash: bool, wrap_width: f32) -> Vec2f {
        let text = if hide_text_after_double_hash { find_rendered_text_end(text) } else { text };
        if text.is_empty() {
            return vec2f(0.0, self.font_size);
        }
        let size = self.font.calc_text_size(self.font_size, text, wrap_width);
        vec2f((size.x + 0.95).floor(), size.y)
    }

    pub(crate) fn render_text_clipped(&mut self, pos: Vec2f, clip: &Rect, text: &str, col: u32) {
        let text = find_rendered_text_end(text);
        if text.is_empty() {
            return;
        }
        let font = self.font.clone();
        let font_size = self.font_size;
        let dl = &mut self.current_window_mut().draw_list;
        dl.add_text(&*font, font_size, pos, col, text, 0.0, Some(clip.to_clip_rect()));
    }

    /// Invisible clickable area of `size` at the cursor. Returns `true` when pressed.
    pub fn invisible_button(&mut self, str_id: &str, size: Vec2f) -> bool {
        if self.current_window().skip_items {
            return false;
        }
        contract_check!(size.x != 0.0 && size.y != 0.0, "invisible_button {} has a zero size", str_id);
        let id = self.get_id(str_id);
        let bb = Rect::from_pos_size(self.cursor_screen_pos(), size);
        self.item_size(size, -1.0);
        if !self.item_add(bb, id) {
            return false;
        }
        self.button_behavior(&bb, id, ButtonFlags::empty()).0
    }

    /// Framed button sized to its label. Returns `true` when pressed.
    pub fn button(&mut self, label: &str) -> bool { self.button_ex(label, Vec2f::default(), ButtonFlags::empty()) }

    /// Framed button with an explicit size (zero components fit the label) and behavior flags.
    pub fn button_ex(&mut self, label: &str, size: Vec2f, flags: ButtonFlags) -> bool {
        if self.current_window().skip_items {
            return false;
        }
        let style = self.style;
        let id = self.get_id(label);
        let label_size = self.calc_text_size(label, true, -1.0);
        let pos = self.cursor_screen_pos();
        let size = vec2f(
            if size.x > 0.0 { size.x } else { label_size.x + style.frame_padding.x * 2.0 },
            if size.y > 0.0 { size.y } else { label_size.y + style.frame_padding.y * 2.0 },
        );
        let bb = Rect::from_pos_size(pos, size);
        self.item_size(size, style.frame_padding.y);
        if !self.item_add(bb, id) {
            return false;
        }

        let (pressed, hovered, held) = self.button_behavior(&bb, id, flags);
        let col = match (held, hovered) {
            (true, true) => StyleColor::ButtonActive,
            (_, true) => StyleColor::ButtonHovered,
            _ => StyleColor::Button,
        };
        self.current_window_mut().draw_list.add_rect_filled(bb.min, bb.max, style.color_u32(col), 0.0, DrawCornerFlags::ALL);
        let text_pos = vec2f(
            bb.min.x + ((size.x - label_size.x) * 0.5).max(style.frame_padding.x),
            bb.min.y + ((size.y - label_size.y) * 0.5).max(style.frame_padding.y),
        );
        let clip = Rect::new(bb.min.x + style.frame_padding.x, bb.min.y, bb.max.x - style.frame_padding.x, bb.max.y);
        self.render_text_clipped(text_pos, &clip, label, style.color_u32(StyleColor::Text));
        pressed
    }

    /// Square button showing an arrow. Returns `true` when pressed.
    pub fn arrow_button_ex(&mut self, str_id: &str, dir: Dir, size: Vec2f, flags: ButtonFlags) -> bool {
        if self.current_window().skip_items {
            return false;
        }
        let style = self.style;
        let fs = self.font_size;
        let id = self.get_id(str_id);
        let bb = Rect::from_pos_size(self.cursor_screen_pos(), size);
        let frame_height = fs + style.frame_padding.y * 2.0;
        self.item_size(size, if size.y >= frame_height { style.frame_padding.y } else { -1.0 });
        if !self.item_add(bb, id) {
            return false;
        }

        let (pressed, hovered, held) = self.button_behavior(&bb, id, flags);
        let col = match (held, hovered) {
            (true, true) => StyleColor::ButtonActive,
            (_, true) => StyleColor::ButtonHovered,
            _ => StyleColor::Button,
        };
        let dl = &mut self.current_window_mut().draw_list;
        dl.add_rect_filled(bb.min, bb.max, style.color_u32(col), 0.0, DrawCornerFlags::ALL);

        let r = fs * 0.40;
        let center = vec2f(bb.min.x + ((size.x - fs) * 0.5).max(0.0) + fs * 0.5, bb.min.y + ((size.y - fs) * 0.5).max(0.0) + fs * 0.5);
        let (a, b, c) = match dir {
            Dir::Right => ((0.750 * r, 0.0), (-0.750 * r, 0.866 * r), (-0.750 * r, -0.866 * r)),
            Dir::Left => ((-0.750 * r, 0.0), (0.750 * r, -0.866 * r), (0.750 * r, 0.866 * r)),
            Dir::Down => ((0.0, 0.750 * r), (-0.866 * r, -0.750 * r), (0.866 * r, -0.750 * r)),
            Dir::Up => ((0.0, -0.750 * r), (0.866 * r, 0.750 * r), (-0.866 * r, 0.750 * r)),
        };
        let at = |(x, y): (f32, f32)| vec2f(center.x + x, center.y + y);
        dl.add_triangle_filled(at(a), at(b), at(c), style.color_u32(StyleColor::Text));
        pressed
    }

    /// Round close button with a cross, used by window title bars and tabs.
    ///
    /// Interaction happens even when clipped, only the rendering is skipped.
    pub fn close_button(&mut self, id: Id, pos: Vec2f) -> bool {
        let style = self.style;
        let fs = self.font_size;
        let bb = Rect::new(pos.x, pos.y, pos.x + fs + style.frame_padding.x * 2.0, pos.y + fs + style.frame_padding.y * 2.0);
        let is_clipped = !self.item_add(bb, id);
        let (pressed, hovered, held) = self.button_behavior(&bb, id, ButtonFlags::empty());
        if is_clipped {
            return pressed;
        }

        let center = bb.center();
        let dl = &mut self.current_window_mut().draw_list;
        if hovered {
            let col = if held { StyleColor::ButtonActive } else { StyleColor::ButtonHovered };
            dl.add_circle_filled(center, (fs * 0.5 + 1.0).max(2.0), style.color_u32(col), 9);
        }
        let cross_extent = fs * 0.5 * 0.7071 - 1.0;
        let cross_col = style.color_u32(StyleColor::Text);
        let c = vec2f(center.x - 0.5, center.y - 0.5);
        dl.add_line(vec2f(c.x + cross_extent, c.y + cross_extent), vec2f(c.x - cross_extent, c.y - cross_extent), cross_col, 1.0);
        dl.add_line(vec2f(c.x + cross_extent, c.y - cross_extent), vec2f(c.x - cross_extent, c.y + cross_extent), cross_col, 1.0);
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // runs one frame with a single button at a fixed spot
    fn button_frame(ctx: &mut Context, mouse: (f32, f32), down: bool) -> bool {
        ctx.input.mousemove(mouse.0, mouse.1);
        ctx.input.mouse_down[0] = down;
        ctx.new_frame();
        ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Always);
        let _ = ctx.begin("Buttons", None, WindowFlags::NO_TITLE_BAR);
        let pressed = ctx.button("Go");
        ctx.end();
        ctx.end_frame().unwrap();
        pressed
    }

    #[test]
    fn click_release_presses_once() {
        let mut ctx = headless_context();
        assert!(!button_frame(&mut ctx, (12.0, 12.0), false));
        assert!(!button_frame(&mut ctx, (12.0, 12.0), true));
        assert!(ctx.active_id().is_some());
        assert!(button_frame(&mut ctx, (12.0, 12.0), false));
        assert!(ctx.active_id().is_none());
        assert!(!button_frame(&mut ctx, (12.0, 12.0), false));
    }

    #[test]
    fn release_outside_does_not_press() {
        let mut ctx = headless_context();
        button_frame(&mut ctx, (12.0, 12.0), false);
        button_frame(&mut ctx, (12.0, 12.0), true);
        assert!(!button_frame(&mut ctx, (250.0, 250.0), true));
        assert!(!button_frame(&mut ctx, (250.0, 250.0), false));
        assert!(ctx.active_id().is_none());
    }

    #[test]
    fn dragging_needs_threshold() {
        let mut ctx = headless_context();
        button_frame(&mut ctx, (12.0, 12.0), false);
        button_frame(&mut ctx, (12.0, 12.0), true);
        button_frame(&mut ctx, (15.0, 12.0), true);
        assert!(!ctx.is_mouse_dragging(MouseButton::Left, -1.0));
        button_frame(&mut ctx, (30.0, 12.0), true);
        assert!(ctx.is_mouse_dragging(MouseButton::Left, -1.0));
        let d = ctx.mouse_drag_delta(MouseButton::Left, -1.0);
        assert_eq!((d.x, d.y), (18.0, 0.0));
    }

    #[test]
    fn hovered_item_reports_hover() {
        let mut ctx = headless_context();
        button_frame(&mut ctx, (12.0, 12.0), false);
        ctx.input.mousemove(12.0, 12.0);
        ctx.new_frame();
        ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Always);
        let _ = ctx.begin("Buttons", None, WindowFlags::NO_TITLE_BAR);
        ctx.button("Go");
        assert!(ctx.is_item_hovered(HoveredFlags::empty()));
        ctx.button("Other");
        assert!(!ctx.is_item_hovered(HoveredFlags::empty()));
        ctx.end();
        ctx.end_frame().unwrap();
    }

    #[test]
    fn label_suffix_is_hidden_from_size() {
        let ctx = headless_context();
        let a = ctx.calc_text_size("Save##1", true, -1.0);
        let b = ctx.calc_text_size("Save", false, -1.0);
        assert_eq!(a.x, b.x);
        assert!(ctx.calc_text_size("Save##1", false, -1.0).x > b.x);
    }
}
