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
use std::rc::Rc;

use super::*;

/// Tab bars not submitted for this many frames are dropped.
const TAB_BAR_GC_FRAMES: usize = 60 * 60;

#[derive(Clone, Debug)]
/// Behavioral settings of a [`Context`].
pub struct Config {
    /// Capabilities reported by the renderer.
    pub backend_flags: BackendFlags,
    /// Mouse and keyboard timing thresholds.
    pub input: InputConfig,
    /// Seconds between a settings change and the `want_save_ini_settings` request.
    pub ini_saving_rate: f32,
    /// Size of the main viewport.
    pub display_size: Vec2f,
    /// Framebuffer pixels per display unit.
    pub framebuffer_scale: Vec2f,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_flags: BackendFlags::empty(),
            input: InputConfig::default(),
            ini_saving_rate: 5.0,
            display_size: Vec2f::default(),
            framebuffer_scale: vec2f(1.0, 1.0),
        }
    }
}

/// One UI session: windows, input, interaction state and the frame's draw data.
///
/// Everything is reached through this object; independent contexts can coexist.
/// A frame is `new_frame`, window/widget calls, then `render` (or `end_frame` alone when nothing
/// is drawn), and [`Context::frame`] wraps the three.
pub struct Context {
    /// Behavioral settings.
    pub config: Config,
    /// Visual settings.
    pub style: Style,
    /// Input state, fed by the host before `new_frame`.
    pub input: Input,

    pub(crate) font: Rc<dyn Font>,
    pub(crate) font_size: f32,
    pub(crate) shared_data: DrawListSharedData,

    pub(crate) time: f64,
    pub(crate) frame_count: i32,
    pub(crate) frame_count_ended: i32,
    pub(crate) frame_count_rendered: i32,
    pub(crate) within_frame_scope: bool,
    pub(crate) pending_frame_error: Option<FrameError>,

    pub(crate) windows: Vec<Window>,
    pub(crate) current_window_stack: Vec<usize>,
    pub(crate) next_window: NextWindowData,
    pub(crate) focused_window: Option<Id>,
    pub(crate) hovered_window: Option<Id>,
    pub(crate) pushed_implicit_window: bool,

    pub(crate) hovered_id: Id,
    pub(crate) hovered_id_allow_overlap: bool,
    pub(crate) hovered_id_previous_frame: Id,
    pub(crate) hovered_id_timer: f32,
    pub(crate) hovered_id_not_active_timer: f32,

    pub(crate) active_id: Id,
    pub(crate) active_id_is_alive: Id,
    pub(crate) active_id_timer: f32,
    pub(crate) active_id_is_just_activated: bool,
    pub(crate) active_id_allow_overlap: bool,
    pub(crate) active_id_has_been_pressed: bool,
    pub(crate) active_id_click_offset: Vec2f,
    pub(crate) active_id_window: Option<Id>,
    pub(crate) active_id_previous_frame: Id,
    pub(crate) active_id_previous_frame_is_alive: bool,

    pub(crate) drag_drop: DragDropState,

    pub(crate) tab_bars: Pool<TabBar>,
    pub(crate) current_tab_bar: Vec<Id>,

    background_draw_list: DrawList,
    foreground_draw_list: DrawList,
    draw_data: DrawData,
    recycled_lists: Vec<DrawList>,

    pub(crate) settings_dirty_timer: f32,
    want_save_ini_settings: bool,
}

impl Context {
    /// Creates a context drawing text with `font`.
    pub fn new(font: Rc<dyn Font>) -> Self {
        let mut shared_data = DrawListSharedData::default();
        shared_data.font_size = font.font_size();
        shared_data.tex_uv_white_pixel = font.tex_uv_white_pixel();

        let mut background_draw_list = DrawList::new(&shared_data);
        background_draw_list.owner_name = "##Background".to_string();
        let mut foreground_draw_list = DrawList::new(&shared_data);
        foreground_draw_list.owner_name = "##Foreground".to_string();
        let windows = vec![Window::new(IMPLICIT_WINDOW_NAME, &shared_data)];

        Self {
            config: Config::default(),
            style: Style::default(),
            input: Input::default(),
            font_size: font.font_size(),
            font,
            shared_data,
            time: 0.0,
            frame_count: 0,
            frame_count_ended: -1,
            frame_count_rendered: -1,
            within_frame_scope: false,
            pending_frame_error: None,
            windows,
            current_window_stack: Vec::new(),
            next_window: NextWindowData::default(),
            focused_window: None,
            hovered_window: None,
            pushed_implicit_window: false,
            hovered_id: Id::NONE,
            hovered_id_allow_overlap: false,
            hovered_id_previous_frame: Id::NONE,
            hovered_id_timer: 0.0,
            hovered_id_not_active_timer: 0.0,
            active_id: Id::NONE,
            active_id_is_alive: Id::NONE,
            active_id_timer: 0.0,
            active_id_is_just_activated: false,
            active_id_allow_overlap: false,
            active_id_has_been_pressed: false,
            active_id_click_offset: Vec2f::default(),
            active_id_window: None,
            active_id_previous_frame: Id::NONE,
            active_id_previous_frame_is_alive: false,
            drag_drop: DragDropState::default(),
            tab_bars: Pool::default(),
            current_tab_bar: Vec::new(),
            background_draw_list,
            foreground_draw_list,
            draw_data: DrawData::default(),
            recycled_lists: Vec::new(),
            settings_dirty_timer: 0.0,
            want_save_ini_settings: false,
        }
    }

    /// Font used for every text item.
    pub fn font(&self) -> &Rc<dyn Font> { &self.font }

    /// Replaces the font, effective from the next frame.
    pub fn set_font(&mut self, font: Rc<dyn Font>) { self.font = font; }

    /// Current text size in pixels.
    pub fn font_size(&self) -> f32 { self.font_size }

    /// Number of frames started so far, the current one included.
    pub fn frame_count(&self) -> i32 { self.frame_count }

    /// Seconds accumulated from `Input::delta_time`.
    pub fn time(&self) -> f64 { self.time }

    /// Shared draw settings of the current frame.
    pub fn draw_list_shared_data(&self) -> &DrawListSharedData { &self.shared_data }

    /// Draw list rendered behind every window.
    pub fn background_draw_list(&mut self) -> &mut DrawList { &mut self.background_draw_list }

    /// Draw list rendered over every window.
    pub fn foreground_draw_list(&mut self) -> &mut DrawList { &mut self.foreground_draw_list }

    /// Result of the last `render`, until the next `new_frame`.
    pub fn draw_data(&self) -> Option<&DrawData> { if self.draw_data.valid { Some(&self.draw_data) } else { None } }

    /// Requests a settings save once the saving rate has elapsed without further changes.
    pub fn mark_ini_settings_dirty(&mut self) {
        if self.settings_dirty_timer <= 0.0 {
            self.settings_dirty_timer = self.config.ini_saving_rate;
        }
    }

    /// Returns `true` when the host should persist the settings.
    pub fn want_save_ini_settings(&self) -> bool { self.want_save_ini_settings }

    /// Acknowledges a save request.
    pub fn clear_want_save_ini_settings(&mut self) { self.want_save_ini_settings = false; }

    fn update_settings(&mut self) {
        if self.settings_dirty_timer > 0.0 {
            self.settings_dirty_timer -= self.input.delta_time;
            if self.settings_dirty_timer <= 0.0 {
                self.want_save_ini_settings = true;
                self.settings_dirty_timer = 0.0;
            }
        }
    }

    fn rebuild_shared_data(&mut self) {
        let sd = &mut self.shared_data;
        sd.font_size = self.font_size;
        sd.tex_uv_white_pixel = self.font.tex_uv_white_pixel();
        sd.curve_tessellation_tol = self.style.curve_tessellation_tol;
        sd.clip_rect_fullscreen = ClipRect::new(0.0, 0.0, self.config.display_size.x, self.config.display_size.y);
        sd.initial_flags = DrawListFlags::empty();
        if self.style.anti_aliased_lines {
            sd.initial_flags |= DrawListFlags::ANTI_ALIASED_LINES;
        }
        if self.style.anti_aliased_fill {
            sd.initial_flags |= DrawListFlags::ANTI_ALIASED_FILL;
        }
        if self.config.backend_flags.has_vtx_offset() {
            sd.initial_flags |= DrawListFlags::ALLOW_VTX_OFFSET;
        }
    }

    fn recycled_list(&mut self) -> DrawList { self.recycled_lists.pop().unwrap_or_else(|| DrawList::new(&self.shared_data)) }

    fn update_interaction_ids(&mut self) {
        let dt = self.input.delta_time;

        // the drag source stays alive even when it is no longer submitted
        if self.drag_drop.active && self.drag_drop.payload.source_id == self.active_id {
            self.keep_alive_id(self.drag_drop.payload.source_id);
        }

        if self.hovered_id_previous_frame.is_none() {
            self.hovered_id_timer = 0.0;
        }
        if self.hovered_id_previous_frame.is_none() || (self.hovered_id.is_some() && self.active_id == self.hovered_id) {
            self.hovered_id_not_active_timer = 0.0;
        }
        if self.hovered_id.is_some() {
            self.hovered_id_timer += dt;
            if self.active_id != self.hovered_id {
                self.hovered_id_not_active_timer += dt;
            }
        }
        self.hovered_id_previous_frame = self.hovered_id;
        self.hovered_id = Id::NONE;
        self.hovered_id_allow_overlap = false;

        if self.active_id.is_some() && self.active_id_is_alive != self.active_id && self.active_id_previous_frame == self.active_id {
            log::debug!("active item {:?} not submitted, releasing it", self.active_id);
            self.clear_active_id();
        }
        if self.active_id.is_some() {
            self.active_id_timer += dt;
        }
        self.active_id_previous_frame = self.active_id;
        self.active_id_is_alive = Id::NONE;
        self.active_id_previous_frame_is_alive = false;
        self.active_id_is_just_activated = false;

        self.drag_drop.accept_id_prev = self.drag_drop.accept_id_curr;
        self.drag_drop.accept_id_curr = Id::NONE;
        self.drag_drop.accept_id_curr_rect_surface = f32::MAX;
    }

    /// Starts a frame: updates input and interaction state and opens the implicit window.
    #[inline(never)]
    pub fn new_frame(&mut self) {
        contract_check!(!self.within_frame_scope, "new_frame called twice, missing end_frame or render");
        contract_check!(self.input.delta_time >= 0.0, "negative delta time {}", self.input.delta_time);
        contract_check!(
            self.config.display_size.x >= 0.0 && self.config.display_size.y >= 0.0,
            "invalid display size {}x{}",
            self.config.display_size.x,
            self.config.display_size.y
        );
        contract_check!(self.style.curve_tessellation_tol > 0.0, "invalid curve tessellation tolerance");

        self.update_settings();
        self.time += self.input.delta_time as f64;
        self.within_frame_scope = true;
        self.frame_count += 1;
        self.pending_frame_error = None;

        self.font_size = self.font.font_size();
        self.rebuild_shared_data();
        let texture = self.font.texture_id();
        for dl in [&mut self.background_draw_list, &mut self.foreground_draw_list] {
            dl.reset_for_new_frame(&self.shared_data);
            dl.push_texture_id(texture);
            dl.push_clip_rect_full_screen();
        }

        for mut dl in self.draw_data.clear() {
            dl.clear();
            self.recycled_lists.push(dl);
        }

        self.update_interaction_ids();
        self.input.update(self.time, &self.config.input);
        // hovering uses the windows submitted last frame
        self.update_hovered_window();

        for w in &mut self.windows {
            w.was_active = w.active;
            w.begin_count = 0;
            w.active = false;
            w.write_accessed = false;
        }
        let focused_alive = self.focused_window.and_then(|id| self.find_window(id)).is_some_and(|w| w.was_active);
        if self.focused_window.is_some() && !focused_alive {
            self.focused_window = self.windows.iter().rev().find(|w| w.was_active).map(|w| w.id);
        }

        self.current_window_stack.clear();
        self.current_tab_bar.clear();
        self.next_window = NextWindowData::default();

        self.set_next_window_size(vec2f(400.0, 400.0), Cond::FirstUseEver);
        let _ = self.begin(IMPLICIT_WINDOW_NAME, None, WindowFlags::empty());
        self.pushed_implicit_window = true;
    }

    /// Ends the frame without rendering.
    ///
    /// Windows left open are closed and reported as [`FrameError::UnclosedWindows`]; the frame is
    /// complete and consistent whatever is returned.
    #[inline(never)]
    pub fn end_frame(&mut self) -> Result<()> {
        if self.frame_count_ended == self.frame_count && !self.within_frame_scope {
            return Ok(());
        }
        if !self.within_frame_scope {
            log::warn!("end_frame called without new_frame");
            return Err(FrameError::FrameNotStarted);
        }

        let mut result = match self.pending_frame_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        };

        let unclosed = self.current_window_stack.len().saturating_sub(1);
        if unclosed > 0 {
            log::warn!("{} window(s) still open at end of frame, closing them", unclosed);
            while self.current_window_stack.len() > 1 {
                self.end_window();
            }
            result = Err(FrameError::UnclosedWindows { count: unclosed });
        }

        // the implicit window is only drawn when something was submitted into it
        self.pushed_implicit_window = false;
        let idx = self.current_window_index();
        if !self.windows[idx].write_accessed {
            self.windows[idx].active = false;
        }
        self.end_window();

        self.elapse_drag_drop();

        self.within_frame_scope = false;
        self.frame_count_ended = self.frame_count;

        if self.input.is_mouse_clicked(MouseButton::Left) && self.active_id.is_none() {
            self.focus_window(self.hovered_window);
        }
        self.bring_focused_to_front();
        self.tab_bars.gc(self.frame_count as usize, TAB_BAR_GC_FRAMES);

        self.input.end_frame();
        result
    }

    /// Ends the frame if needed and gathers the draw lists into the frame's [`DrawData`].
    ///
    /// Lists are ordered background first, then active windows back to front, then foreground.
    #[inline(never)]
    pub fn render(&mut self) -> Result<()> {
        let result = if self.frame_count_ended != self.frame_count || self.within_frame_scope { self.end_frame() } else { Ok(()) };
        if matches!(result, Err(FrameError::FrameNotStarted)) || self.frame_count_rendered == self.frame_count {
            return result;
        }
        self.frame_count_rendered = self.frame_count;

        let mut lists = Vec::with_capacity(self.windows.len() + 2);
        let fresh = self.recycled_list();
        std::mem::replace(&mut self.background_draw_list, fresh).add_to(&mut lists);
        for idx in 0..self.windows.len() {
            if !self.windows[idx].active {
                continue;
            }
            let fresh = self.recycled_list();
            std::mem::replace(&mut self.windows[idx].draw_list, fresh).add_to(&mut lists);
        }
        let fresh = self.recycled_list();
        std::mem::replace(&mut self.foreground_draw_list, fresh).add_to(&mut lists);

        self.draw_data.setup(lists, Vec2f::default(), self.config.display_size, self.config.framebuffer_scale);
        log::trace!("frame {} rendered {} list(s)", self.frame_count, self.draw_data.cmd_lists.len());
        result
    }

    /// Runs `f` between `new_frame` and `render`.
    pub fn frame<F: FnOnce(&mut Self)>(&mut self, f: F) -> Result<()> {
        self.new_frame();
        f(self);
        self.render()
    }
}

#[cfg(test)]
pub(crate) fn headless_context() -> Context {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ctx = Context::new(Rc::new(MonospaceFont::default()));
    ctx.config.display_size = vec2f(800.0, 600.0);
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclosed_windows_are_recovered() {
        let mut ctx = headless_context();
        ctx.new_frame();
        let _ = ctx.begin("Left open", None, WindowFlags::empty());
        assert_eq!(ctx.end_frame(), Err(FrameError::UnclosedWindows { count: 1 }));
        assert!(ctx.current_window_stack.is_empty());

        // the next frame starts clean
        ctx.new_frame();
        let _ = ctx.begin("Left open", None, WindowFlags::empty());
        ctx.end();
        assert_eq!(ctx.end_frame(), Ok(()));
    }

    #[test]
    fn extra_end_is_reported() {
        let mut ctx = headless_context();
        ctx.new_frame();
        ctx.end();
        assert_eq!(ctx.current_window_stack.len(), 1);
        assert_eq!(ctx.render(), Err(FrameError::TooManyEnds));
        assert!(ctx.draw_data().is_some());
    }

    #[test]
    fn ending_without_frame_fails() {
        let mut ctx = headless_context();
        assert_eq!(ctx.end_frame(), Err(FrameError::FrameNotStarted));
        assert_eq!(ctx.render(), Err(FrameError::FrameNotStarted));
        assert!(ctx.draw_data().is_none());
        assert_eq!(ctx.frame(|_| ()), Ok(()));
        // ending twice is harmless
        assert_eq!(ctx.end_frame(), Ok(()));
    }

    #[test]
    fn render_orders_lists() {
        let mut ctx = headless_context();
        ctx.frame(|ctx| {
            ctx.background_draw_list().add_rect_filled(vec2f(0.0, 0.0), vec2f(800.0, 600.0), COL32_BLACK, 0.0, DrawCornerFlags::ALL);
            let _ = ctx.begin("Back", None, WindowFlags::empty());
            ctx.end();
            let _ = ctx.begin("Front", None, WindowFlags::empty());
            ctx.end();
            ctx.foreground_draw_list().add_line(vec2f(0.0, 0.0), vec2f(10.0, 10.0), COL32_WHITE, 1.0);
        })
        .unwrap();

        let dd = ctx.draw_data().unwrap();
        let owners: Vec<&str> = dd.cmd_lists.iter().map(|l| l.owner_name.as_str()).collect();
        // the untouched implicit window is not rendered
        assert_eq!(owners, ["##Background", "Back", "Front", "##Foreground"]);
        assert_eq!(dd.total_idx_count, dd.cmd_lists.iter().map(|l| l.idx_buffer.len()).sum::<usize>());
        assert_eq!((dd.display_size.x, dd.display_size.y), (800.0, 600.0));

        ctx.new_frame();
        assert!(ctx.draw_data().is_none());
        assert!(ctx.end_frame().is_ok());
    }

    #[test]
    fn click_brings_window_to_front() {
        let mut ctx = headless_context();
        let layout = |ctx: &mut Context| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::FirstUseEver);
            let _ = ctx.begin("A", None, WindowFlags::empty());
            ctx.end();
            ctx.set_next_window_pos(vec2f(200.0, 0.0), Cond::FirstUseEver);
            let _ = ctx.begin("B", None, WindowFlags::empty());
            ctx.end();
        };
        ctx.frame(layout).unwrap();
        assert_eq!(ctx.windows().last().unwrap().name(), "B");

        ctx.input.mousemove(50.0, 100.0);
        ctx.input.mousedown(MouseButton::Left);
        ctx.frame(layout).unwrap();
        assert_eq!(ctx.windows().last().unwrap().name(), "A");
    }

    #[test]
    fn settings_save_is_requested_after_delay() {
        let mut ctx = headless_context();
        ctx.config.ini_saving_rate = 0.05;
        ctx.input.delta_time = 0.02;
        ctx.mark_ini_settings_dirty();
        for _ in 0..2 {
            ctx.frame(|_| ()).unwrap();
            assert!(!ctx.want_save_ini_settings());
        }
        ctx.frame(|_| ()).unwrap();
        assert!(ctx.want_save_ini_settings());
        ctx.clear_want_save_ini_settings();
        assert!(!ctx.want_save_ini_settings());
    }

    #[test]
    fn shared_data_follows_style_and_backend() {
        let mut ctx = headless_context();
        ctx.style.anti_aliased_fill = false;
        ctx.config.backend_flags = BackendFlags::RENDERER_HAS_VTX_OFFSET;
        ctx.frame(|_| ()).unwrap();
        let flags = ctx.draw_list_shared_data().initial_flags;
        assert!(flags.contains(DrawListFlags::ALLOW_VTX_OFFSET));
        assert!(!flags.contains(DrawListFlags::ANTI_ALIASED_FILL));
        assert_eq!(ctx.draw_list_shared_data().clip_rect_fullscreen, ClipRect::new(0.0, 0.0, 800.0, 600.0));
    }
}
