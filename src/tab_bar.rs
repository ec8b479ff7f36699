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
//! Tab bars: ordering, width fitting, scrolling, reordering and selection of tab items.
use super::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Options of [`Context::begin_tab_bar`].
    pub struct TabBarFlags : u32 {
        /// Tabs can be dragged to change their order.
        const REORDERABLE = 1 << 0;
        /// Newly appearing tabs get selected.
        const AUTO_SELECT_NEW_TABS = 1 << 1;
        /// Middle clicking a tab does not close it.
        const NO_CLOSE_WITH_MIDDLE_MOUSE_BUTTON = 1 << 3;
        /// No scrolling arrows under the scroll fitting policy.
        const NO_TAB_LIST_SCROLLING_BUTTONS = 1 << 4;
        /// Shrink tabs, largest first, when they do not fit.
        const FITTING_POLICY_RESIZE_DOWN = 1 << 6;
        /// Keep ideal widths and scroll when tabs do not fit.
        const FITTING_POLICY_SCROLL = 1 << 7;
        /// Every fitting policy.
        const FITTING_POLICY_MASK = Self::FITTING_POLICY_RESIZE_DOWN.bits() | Self::FITTING_POLICY_SCROLL.bits();
        /// Policy applied when none is given.
        const FITTING_POLICY_DEFAULT = Self::FITTING_POLICY_RESIZE_DOWN.bits();
        /// The bar belongs to a dock node: tab ids are global and tabs are bound to windows.
        const DOCK_NODE = 1 << 20;
        /// The bar's host has focus, selected tabs use the active color.
        const IS_FOCUSED = 1 << 21;
        /// Reorders mark the settings dirty.
        const SAVE_SETTINGS = 1 << 22;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Options of [`Context::begin_tab_item`].
    pub struct TabItemFlags : u32 {
        /// Shows an unsaved marker, and closing selects the tab instead of removing it at once.
        const UNSAVED_DOCUMENT = 1 << 0;
        /// Selects the tab programmatically.
        const SET_SELECTED = 1 << 1;
        /// Middle clicking the tab does not close it.
        const NO_CLOSE_WITH_MIDDLE_MOUSE_BUTTON = 1 << 2;
        /// `begin_tab_item` does not push the tab id on the id stack.
        const NO_PUSH_ID = 1 << 3;
        /// No close button, set when no `open` flag is passed.
        const NO_CLOSE_BUTTON = 1 << 20;
    }
}

/// Widest a tab can get, in font sizes.
const TAB_MAX_WIDTH_IN_FONT_SIZES: f32 = 20.0;

#[derive(Clone, Debug)]
/// One tab of a [`TabBar`].
pub struct TabItem {
    pub(crate) id: Id,
    pub(crate) flags: TabItemFlags,
    pub(crate) window: Option<Id>,
    pub(crate) name: String,
    pub(crate) last_frame_visible: i32,
    pub(crate) last_frame_selected: i32,
    pub(crate) offset: f32,
    pub(crate) width: f32,
    pub(crate) content_width: f32,
    pub(crate) begin_order: i32,
    pub(crate) want_close: bool,
}

impl Default for TabItem {
    fn default() -> Self {
        Self {
            id: Id::NONE,
            flags: TabItemFlags::empty(),
            window: None,
            name: String::new(),
            last_frame_visible: -1,
            last_frame_selected: -1,
            offset: 0.0,
            width: 0.0,
            content_width: 0.0,
            begin_order: -1,
            want_close: false,
        }
    }
}

impl TabItem {
    /// Identifier of the tab.
    pub fn id(&self) -> Id { self.id }

    /// Label as submitted, or the bound window's name.
    pub fn name(&self) -> &str { &self.name }

    /// Window the tab is bound to, for dock node bars.
    pub fn window(&self) -> Option<Id> { self.window }

    /// Distance from the bar's left edge.
    pub fn offset(&self) -> f32 { self.offset }

    /// Width assigned by the last layout.
    pub fn width(&self) -> f32 { self.width }

    /// Width needed to show the whole label.
    pub fn content_width(&self) -> f32 { self.content_width }
}

#[derive(Copy, Clone, Debug)]
/// Width entry handed to [`shrink_widths`].
pub struct ShrinkWidthItem {
    /// Index of the owner of the width.
    pub index: usize,
    /// Width, shrunk in place.
    pub width: f32,
}

/// Removes `width_excess` from `items`, largest widths first, then rounds every width down.
///
/// Widths never drop below one pixel. The fractions lost to rounding are handed back as whole
/// pixels to the lowest indices. `items` is left sorted by decreasing width.
pub fn shrink_widths(items: &mut [ShrinkWidthItem], mut width_excess: f32) {
    let count = items.len();
    if count == 0 {
        return;
    }
    if count == 1 {
        items[0].width = (items[0].width - width_excess).max(1.0);
        return;
    }

    items.sort_by(|a, b| b.width.total_cmp(&a.width).then(a.index.cmp(&b.index)));
    let mut count_same_width = 1;
    while width_excess > 0.0 {
        while count_same_width < count && items[0].width <= items[count_same_width].width {
            count_same_width += 1;
        }
        let max_width_to_remove_per_item = if count_same_width < count { items[0].width - items[count_same_width].width } else { items[0].width - 1.0 };
        if max_width_to_remove_per_item <= 0.0 {
            break;
        }
        let width_to_remove_per_item = (width_excess / count_same_width as f32).min(max_width_to_remove_per_item);
        for item in &mut items[..count_same_width] {
            item.width -= width_to_remove_per_item;
        }
        width_excess -= width_to_remove_per_item * count_same_width as f32;
    }

    let mut rounding_excess = 0.0;
    for item in items.iter_mut() {
        let rounded = item.width.floor();
        rounding_excess += item.width - rounded;
        item.width = rounded;
    }
    if rounding_excess > 0.0 {
        let extra = (rounding_excess + 0.01) as usize;
        for item in items.iter_mut().filter(|item| item.index < extra) {
            item.width += 1.0;
        }
    }
}

#[derive(Clone, Debug)]
/// Persistent state of a tab bar, kept by the [`Context`] across frames.
pub struct TabBar {
    pub(crate) tabs: Vec<TabItem>,
    pub(crate) id: Id,
    pub(crate) selected_tab_id: Id,
    pub(crate) next_selected_tab_id: Id,
    pub(crate) visible_tab_id: Id,
    pub(crate) curr_frame_visible: i32,
    pub(crate) prev_frame_visible: i32,
    pub(crate) bar_rect: Rect,
    pub(crate) last_tab_content_height: f32,
    pub(crate) width_all_tabs: f32,
    pub(crate) width_all_tabs_ideal: f32,
    pub(crate) offset_next_tab: f32,
    pub(crate) scrolling_anim: f32,
    pub(crate) scrolling_target: f32,
    pub(crate) scrolling_target_dist_to_visibility: f32,
    pub(crate) scrolling_speed: f32,
    pub(crate) flags: TabBarFlags,
    pub(crate) reorder_request_tab_id: Id,
    pub(crate) reorder_request_dir: i32,
    pub(crate) tabs_active_count: i32,
    pub(crate) want_layout: bool,
    pub(crate) visible_tab_was_submitted: bool,
    pub(crate) last_tab_item_idx: Option<usize>,
    pub(crate) frame_padding: Vec2f,
    pub(crate) undock_request: Option<Id>,
    pub(crate) preview_tab_id: Option<Id>,
}

impl Default for TabBar {
    fn default() -> Self {
        Self {
            tabs: Vec::new(),
            id: Id::NONE,
            selected_tab_id: Id::NONE,
            next_selected_tab_id: Id::NONE,
            visible_tab_id: Id::NONE,
            curr_frame_visible: -1,
            prev_frame_visible: -1,
            bar_rect: Rect::default(),
            last_tab_content_height: 0.0,
            width_all_tabs: 0.0,
            width_all_tabs_ideal: 0.0,
            offset_next_tab: 0.0,
            scrolling_anim: 0.0,
            scrolling_target: 0.0,
            scrolling_target_dist_to_visibility: 0.0,
            scrolling_speed: 0.0,
            flags: TabBarFlags::empty(),
            reorder_request_tab_id: Id::NONE,
            reorder_request_dir: 0,
            tabs_active_count: 0,
            want_layout: false,
            visible_tab_was_submitted: false,
            last_tab_item_idx: None,
            frame_padding: Vec2f::default(),
            undock_request: None,
            preview_tab_id: None,
        }
    }
}

impl TabBar {
    /// Identifier of the bar.
    pub fn id(&self) -> Id { self.id }

    /// Tabs in display order.
    pub fn tabs(&self) -> &[TabItem] { &self.tabs }

    /// Flags of the last `begin_tab_bar`.
    pub fn flags(&self) -> TabBarFlags { self.flags }

    /// Selected tab, [`Id::NONE`] when none.
    pub fn selected_tab_id(&self) -> Id { self.selected_tab_id }

    /// Tab whose contents are shown this frame.
    pub fn visible_tab_id(&self) -> Id { self.visible_tab_id }

    /// Rectangle of the bar in screen space.
    pub fn bar_rect(&self) -> Rect { self.bar_rect }

    /// Width of all tabs as laid out, spacing included.
    pub fn width_all_tabs(&self) -> f32 { self.width_all_tabs }

    /// Width all tabs would need at their ideal size.
    pub fn width_all_tabs_ideal(&self) -> f32 { self.width_all_tabs_ideal }

    /// Current horizontal scroll of the tabs.
    pub fn scrolling(&self) -> f32 { self.scrolling_anim }

    /// Shows `tab_id` instead of the selected tab until cleared, without changing the selection.
    pub fn set_preview_tab(&mut self, tab_id: Option<Id>) { self.preview_tab_id = tab_id; }

    /// Returns the window whose tab was dragged out of a dock node bar, once.
    pub fn take_undock_request(&mut self) -> Option<Id> { self.undock_request.take() }

    /// Position of `tab_id` in display order.
    pub fn tab_order(&self, tab_id: Id) -> Option<usize> {
        if tab_id.is_none() {
            return None;
        }
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    /// Looks a tab up by identifier.
    pub fn find_tab_by_id(&self, tab_id: Id) -> Option<&TabItem> { self.tab_order(tab_id).map(|i| &self.tabs[i]) }

    /// Registers a tab bound to `window` ahead of its submission, so its order can be chosen.
    pub fn add_tab(&mut self, flags: TabItemFlags, window: &Window, frame_count: i32) {
        contract_check!(self.find_tab_by_id(window.id()).is_none(), "tab for window {} already exists", window.name());
        let last_frame_visible = if self.curr_frame_visible == -1 { frame_count - 1 } else { self.curr_frame_visible };
        self.tabs.push(TabItem {
            id: window.id(),
            flags,
            window: Some(window.id()),
            name: window.name().to_string(),
            last_frame_visible,
            ..TabItem::default()
        });
    }

    /// Removes a tab and forgets it in every selection field.
    pub fn remove_tab(&mut self, tab_id: Id) {
        if let Some(order) = self.tab_order(tab_id) {
            self.tabs.remove(order);
        }
        self.forget_tab(tab_id);
    }

    fn forget_tab(&mut self, tab_id: Id) {
        if self.visible_tab_id == tab_id {
            self.visible_tab_id = Id::NONE;
        }
        if self.selected_tab_id == tab_id {
            self.selected_tab_id = Id::NONE;
        }
        if self.next_selected_tab_id == tab_id {
            self.next_selected_tab_id = Id::NONE;
        }
    }

    /// Handles a close request on a tab.
    ///
    /// A visible saved tab is hidden right away so another one is selected without a frame of
    /// lag. A hidden unsaved tab gets selected first so the user sees what is being closed.
    pub fn close_tab(&mut self, tab_id: Id) {
        let Some(order) = self.tab_order(tab_id) else {
            return;
        };
        let unsaved = self.tabs[order].flags.contains(TabItemFlags::UNSAVED_DOCUMENT);
        if self.visible_tab_id == tab_id && !unsaved {
            self.tabs[order].last_frame_visible = -1;
            self.selected_tab_id = Id::NONE;
            self.next_selected_tab_id = Id::NONE;
        } else if self.visible_tab_id != tab_id && unsaved {
            self.next_selected_tab_id = tab_id;
        }
    }

    /// Asks the next layout to move `tab_id` one slot left (`-1`) or right (`+1`).
    pub fn queue_reorder(&mut self, tab_id: Id, dir: i32) {
        contract_check!(dir == -1 || dir == 1, "reorder direction must be -1 or +1, got {}", dir);
        contract_check!(self.reorder_request_tab_id.is_none(), "a reorder is already queued");
        self.reorder_request_tab_id = tab_id;
        self.reorder_request_dir = dir;
    }

    /// Applies the queued reorder by swapping the tab with its neighbor.
    ///
    /// Returns `false` when the tab is gone or the neighbor would be out of bounds.
    pub fn process_reorder(&mut self) -> bool {
        let Some(order) = self.tab_order(self.reorder_request_tab_id) else {
            return false;
        };
        let target = order as i64 + self.reorder_request_dir as i64;
        if target < 0 || target >= self.tabs.len() as i64 {
            return false;
        }
        self.tabs.swap(order, target as usize);
        log::debug!("tab bar {:?}: tab {:?} moved from {} to {}", self.id, self.reorder_request_tab_id, order, target);
        true
    }

    /// Most recently selected tab among those bound to a window active last frame.
    pub fn find_most_recently_selected(&self, windows: &[Window]) -> Option<&TabItem> {
        let was_active = |id: Id| windows.iter().any(|w| w.id() == id && w.was_active());
        let mut best: Option<&TabItem> = None;
        for tab in &self.tabs {
            if best.is_some_and(|b| b.last_frame_selected >= tab.last_frame_selected) {
                continue;
            }
            if tab.window.is_some_and(was_active) {
                best = Some(tab);
            }
        }
        best
    }

    /// Clamps a scroll offset to the scrollable range.
    pub fn scroll_clamp(&self, scrolling: f32) -> f32 { scrolling.min(self.width_all_tabs - self.bar_rect.width()).max(0.0) }

    /// Sets the scroll target so the tab at `order` becomes visible, with a `margin` of its
    /// neighbors.
    pub(crate) fn scroll_to_tab(&mut self, order: usize, margin: f32) {
        let tab = &self.tabs[order];
        let tab_x1 = tab.offset + if order > 0 { -margin } else { 0.0 };
        let tab_x2 = tab.offset + tab.width + if order + 1 < self.tabs.len() { margin } else { 1.0 };
        let bar_width = self.bar_rect.width();
        self.scrolling_target_dist_to_visibility = 0.0;
        if self.scrolling_target > tab_x1 || tab_x2 - tab_x1 >= bar_width {
            self.scrolling_target_dist_to_visibility = (self.scrolling_anim - tab_x2).max(0.0);
            self.scrolling_target = tab_x1;
        } else if self.scrolling_target < tab_x2 - bar_width {
            self.scrolling_target_dist_to_visibility = ((tab_x1 - bar_width) - self.scrolling_anim).max(0.0);
            self.scrolling_target = tab_x2 - bar_width;
        }
    }

    // drops tabs not submitted last frame or asked to close
    fn compact(&mut self) {
        let prev_frame_visible = self.prev_frame_visible;
        let mut removed = Vec::new();
        self.tabs.retain(|t| {
            let keep = t.last_frame_visible >= prev_frame_visible && !t.want_close;
            if !keep {
                removed.push(t.id);
            }
            keep
        });
        for id in removed {
            self.forget_tab(id);
        }
    }
}

impl Context {
    /// Bar state of `id`, as hashed from the `str_id` of [`Context::begin_tab_bar`].
    pub fn tab_bar(&self, id: Id) -> Option<&TabBar> { self.tab_bars.get(id) }

    /// Mutable bar state, to register tabs or queue reorders between frames.
    pub fn tab_bar_mut(&mut self, id: Id) -> Option<&mut TabBar> { self.tab_bars.get_mut(id) }

    fn with_tab_bar<R, F: FnOnce(&mut Self, &mut TabBar) -> R>(&mut self, id: Id, f: F) -> Option<R> {
        let mut bar = self.tab_bars.take(id)?;
        let r = f(self, &mut bar);
        self.tab_bars.restore(id, bar, self.frame_count as usize);
        Some(r)
    }

    fn current_tab_bar_id(&self) -> Option<Id> { self.current_tab_bar.last().copied() }

    /// Starts a tab bar spanning the available width at the cursor.
    ///
    /// Must be paired with [`Context::end_tab_bar`] when it returns `true`.
    #[must_use]
    pub fn begin_tab_bar(&mut self, str_id: &str, flags: TabBarFlags) -> bool {
        if self.current_window().skip_items {
            return false;
        }
        let id = self.get_id(str_id);
        let cursor = self.cursor_screen_pos();
        let bb = Rect::new(cursor.x, cursor.y, self.current_window().content_region_rect.max.x, cursor.y + self.font_size + self.style.frame_padding.y * 2.0);
        self.begin_tab_bar_ex(id, bb, flags | TabBarFlags::IS_FOCUSED)
    }

    /// Starts the tab bar `id` over an explicit rectangle.
    pub fn begin_tab_bar_ex(&mut self, id: Id, bb: Rect, flags: TabBarFlags) -> bool {
        if self.current_window().skip_items {
            return false;
        }
        if !self.tab_bars.contains(id) {
            self.tab_bars.get_or_add(id, self.frame_count as usize).id = id;
        }
        if !flags.contains(TabBarFlags::DOCK_NODE) {
            self.current_window_mut().id_stack.push_id(id);
        }
        self.current_tab_bar.push(id);

        self.with_tab_bar(id, |ctx, bar| {
            if bar.curr_frame_visible == ctx.frame_count {
                log::debug!("tab bar {:?} begun twice in frame {}", id, ctx.frame_count);
                return;
            }

            // switching to reorderable restores the submission order
            let mut flags = flags;
            if flags.contains(TabBarFlags::REORDERABLE) != bar.flags.contains(TabBarFlags::REORDERABLE)
                && !bar.tabs.is_empty()
                && bar.prev_frame_visible != -1
                && !bar.flags.contains(TabBarFlags::DOCK_NODE)
            {
                bar.tabs.sort_by_key(|t| t.begin_order);
            }
            if !flags.intersects(TabBarFlags::FITTING_POLICY_MASK) {
                flags |= TabBarFlags::FITTING_POLICY_DEFAULT;
            }

            bar.flags = flags;
            bar.bar_rect = bb;
            bar.want_layout = true;
            bar.prev_frame_visible = bar.curr_frame_visible;
            bar.curr_frame_visible = ctx.frame_count;
            bar.frame_padding = ctx.style.frame_padding;
            bar.tabs_active_count = 0;

            // items submitted before the first tab overlap the bar instead of vanishing
            let spacing_y = ctx.style.item_spacing.y;
            ctx.current_window_mut().dc.cursor_pos = vec2f(bb.min.x, bb.max.y + spacing_y);

            let col = if flags.contains(TabBarFlags::IS_FOCUSED) { StyleColor::TabActive } else { StyleColor::TabUnfocusedActive };
            let col = ctx.style.color_u32(col);
            let half_pad = (ctx.style.window_padding.x * 0.5).floor();
            let y = bb.max.y - 1.0;
            ctx.window_draw_list().add_line(vec2f(bb.min.x - half_pad, y), vec2f(bb.max.x + half_pad, y), col, 1.0);
        });
        true
    }

    /// Ends the tab bar opened by [`Context::begin_tab_bar`].
    pub fn end_tab_bar(&mut self) {
        if self.current_window().skip_items {
            return;
        }
        let Some(id) = self.current_tab_bar_id() else {
            contract_check!(false, "end_tab_bar without begin_tab_bar");
            return;
        };

        let dock_node = self
            .with_tab_bar(id, |ctx, bar| {
                if bar.want_layout {
                    ctx.tab_bar_layout(bar);
                }
                // keep the last content height while no tab contents are submitted
                let appearing = bar.prev_frame_visible + 1 < ctx.frame_count;
                let dc = &mut ctx.current_window_mut().dc;
                if bar.visible_tab_was_submitted || bar.visible_tab_id.is_none() || appearing {
                    bar.last_tab_content_height = (dc.cursor_pos.y - bar.bar_rect.max.y).max(0.0);
                } else {
                    dc.cursor_pos.y = bar.bar_rect.max.y + bar.last_tab_content_height;
                }
                bar.flags.contains(TabBarFlags::DOCK_NODE)
            })
            .unwrap_or(false);

        if !dock_node {
            self.pop_id();
        }
        self.current_tab_bar.pop();
    }

    /// Submits a tab. Returns `true` when its contents should be shown.
    ///
    /// With `open`, the tab has a close button setting it to `false`. When it returns `true`,
    /// [`Context::end_tab_item`] must follow the contents.
    #[must_use]
    pub fn begin_tab_item(&mut self, label: &str, open: Option<&mut bool>, flags: TabItemFlags) -> bool {
        if self.current_window().skip_items {
            return false;
        }
        let Some(bar_id) = self.current_tab_bar_id() else {
            contract_check!(false, "begin_tab_item outside begin_tab_bar/end_tab_bar");
            return false;
        };

        let visible = self.with_tab_bar(bar_id, |ctx, bar| ctx.tab_item_ex(bar, label, open, flags, None)).unwrap_or(false);
        if visible && !flags.contains(TabItemFlags::NO_PUSH_ID) {
            let tab_id = self.tab_bars.get(bar_id).and_then(|b| b.last_tab_item_idx.map(|i| b.tabs[i].id));
            if let Some(tab_id) = tab_id {
                self.current_window_mut().id_stack.push_id(tab_id);
            }
        }
        visible
    }

    /// Ends the tab opened by a [`Context::begin_tab_item`] that returned `true`.
    pub fn end_tab_item(&mut self) {
        if self.current_window().skip_items {
            return;
        }
        let Some(bar_id) = self.current_tab_bar_id() else {
            contract_check!(false, "end_tab_item outside begin_tab_bar/end_tab_bar");
            return;
        };
        let Some(bar) = self.tab_bars.get(bar_id) else {
            return;
        };
        let Some(idx) = bar.last_tab_item_idx else {
            contract_check!(false, "end_tab_item without begin_tab_item");
            return;
        };
        if !bar.tabs[idx].flags.contains(TabItemFlags::NO_PUSH_ID) {
            self.pop_id();
        }
    }

    /// Closes the tab `label` of the current bar at its next layout.
    ///
    /// Call it between `begin_tab_bar` and the first `begin_tab_item` to remove a tab without a
    /// frame of flicker.
    pub fn set_tab_item_closed(&mut self, label: &str) {
        let Some(bar_id) = self.current_tab_bar_id() else {
            return;
        };
        let is_dock_node = self.tab_bars.get(bar_id).is_none_or(|b| b.flags.contains(TabBarFlags::DOCK_NODE));
        if is_dock_node {
            return;
        }
        let tab_id = self.get_id(label);
        if let Some(bar) = self.tab_bars.get_mut(bar_id) {
            if let Some(order) = bar.tab_order(tab_id) {
                bar.tabs[order].want_close = true;
            }
        }
    }

    fn calc_tab_id(&mut self, bar: &TabBar, label: &str) -> Id {
        if bar.flags.contains(TabBarFlags::DOCK_NODE) {
            let id = Id::new(hash_str(HASH_SEED, label));
            self.keep_alive_id(id);
            id
        } else {
            self.get_id(label)
        }
    }

    /// Size of a tab showing `label`, capped at the maximum tab width.
    pub fn tab_item_calc_size(&self, label: &str, has_close_button: bool) -> Vec2f {
        let style = &self.style;
        let label_size = self.calc_text_size(label, true, -1.0);
        let mut size = vec2f(label_size.x + style.frame_padding.x, label_size.y + style.frame_padding.y * 2.0);
        if has_close_button {
            size.x += style.frame_padding.x + style.item_inner_spacing.x + self.font_size;
        } else {
            size.x += style.frame_padding.x + 1.0;
        }
        vec2f(size.x.min(self.font_size * TAB_MAX_WIDTH_IN_FONT_SIZES), size.y)
    }

    /// Draws the rounded-top shape of a tab.
    pub fn tab_item_background(&mut self, bb: &Rect, col: u32) {
        let style = self.style;
        let width = bb.width();
        contract_check!(width > 0.0, "tab background needs a positive width");
        let rounding = style.tab_rounding.min(width * 0.5 - 1.0).max(0.0);
        let (y1, y2) = (bb.min.y + 1.0, bb.max.y - 1.0);
        let dl = self.window_draw_list();
        dl.path_line_to(vec2f(bb.min.x, y2));
        dl.path_arc_to_fast(vec2f(bb.min.x + rounding, y1 + rounding), rounding, 6, 9);
        dl.path_arc_to_fast(vec2f(bb.max.x - rounding, y1 + rounding), rounding, 9, 12);
        dl.path_line_to(vec2f(bb.max.x, y2));
        dl.path_fill_convex(col);
        if style.tab_border_size > 0.0 {
            dl.path_line_to(vec2f(bb.min.x + 0.5, y2));
            dl.path_arc_to_fast(vec2f(bb.min.x + rounding + 0.5, y1 + rounding + 0.5), rounding, 6, 9);
            dl.path_arc_to_fast(vec2f(bb.max.x - rounding - 0.5, y1 + rounding + 0.5), rounding, 9, 12);
            dl.path_line_to(vec2f(bb.max.x - 0.5, y2));
            dl.path_stroke(style.color_u32(StyleColor::Border), false, style.tab_border_size);
        }
    }

    /// Draws a tab label and runs its close button. Returns `true` when the tab is closed.
    #[allow(clippy::too_many_arguments)]
    pub fn tab_item_label_and_close_button(&mut self, bb: &Rect, flags: TabItemFlags, frame_padding: Vec2f, label: &str, tab_id: Id, close_button_id: Id, is_contents_visible: bool) -> bool {
        const UNSAVED_MARKER: &str = "*";
        if bb.width() <= 1.0 {
            return false;
        }
        let label_size = self.calc_text_size(label, true, -1.0);
        let text_col = self.style.color_u32(StyleColor::Text);

        let mut text_clip = Rect::new(bb.min.x + frame_padding.x, bb.min.y + frame_padding.y, bb.max.x - frame_padding.x, bb.max.y);
        if flags.contains(TabItemFlags::UNSAVED_DOCUMENT) {
            text_clip.max.x -= self.calc_text_size(UNSAVED_MARKER, false, -1.0).x;
            let marker_pos = vec2f((bb.min.x + frame_padding.x + label_size.x + 2.0).min(text_clip.max.x), bb.min.y + frame_padding.y + (-self.font_size * 0.25).floor());
            let marker_clip = Rect::new(marker_pos.x, marker_pos.y, bb.max.x - frame_padding.x, bb.max.y - frame_padding.y);
            self.render_text_clipped(marker_pos, &marker_clip, UNSAVED_MARKER, text_col);
        }

        let mut close_button_pressed = false;
        let close_button_visible = close_button_id.is_some()
            && (is_contents_visible || bb.width() >= self.style.tab_min_width_for_unselected_close_button)
            && [tab_id, close_button_id].iter().any(|id| self.hovered_id == *id || self.active_id == *id);
        if close_button_visible {
            // the close button must not replace the tab as last item
            let last_item = self.current_window().dc.clone();
            let backup_padding = self.style.frame_padding;
            self.style.frame_padding = frame_padding;
            let close_pos = vec2f(bb.max.x - frame_padding.x * 2.0 - self.font_size, bb.min.y);
            if self.close_button(close_button_id, close_pos) {
                close_button_pressed = true;
            }
            self.style.frame_padding = backup_padding;
            let dc = &mut self.current_window_mut().dc;
            dc.last_item_id = last_item.last_item_id;
            dc.last_item_rect = last_item.last_item_rect;
            dc.last_item_status_flags = last_item.last_item_status_flags;

            if !flags.contains(TabItemFlags::NO_CLOSE_WITH_MIDDLE_MOUSE_BUTTON) && self.input.is_mouse_clicked(MouseButton::Middle) {
                close_button_pressed = true;
            }
            text_clip.max.x -= self.font_size;
        }

        self.render_text_clipped(text_clip.min, &text_clip, label, text_col);
        close_button_pressed
    }

    /// Submits a tab into `bar`, optionally bound to a docked window.
    #[inline(never)]
    pub fn tab_item_ex(&mut self, bar: &mut TabBar, label: &str, open: Option<&mut bool>, flags: TabItemFlags, docked_window: Option<Id>) -> bool {
        if bar.want_layout {
            self.tab_bar_layout(bar);
        }
        if self.current_window().skip_items {
            return false;
        }

        let id = self.calc_tab_id(bar, label);

        // a closed tab still registers its id so the previous item is not reused
        if open.as_deref() == Some(&false) {
            self.item_add(Rect::default(), id);
            return false;
        }

        let mut flags = flags;
        let mut open = open;
        if flags.contains(TabItemFlags::NO_CLOSE_BUTTON) {
            open = None;
        } else if open.is_none() {
            flags |= TabItemFlags::NO_CLOSE_BUTTON;
        }

        let mut size = self.tab_item_calc_size(label, open.is_some());
        let frame = self.frame_count;

        let (order, tab_is_new) = match bar.tab_order(id) {
            Some(order) => (order, false),
            None => {
                bar.tabs.push(TabItem { id, width: size.x, ..TabItem::default() });
                (bar.tabs.len() - 1, true)
            }
        };
        bar.last_tab_item_idx = Some(order);
        let begin_order = bar.tabs_active_count;
        bar.tabs_active_count += 1;

        let tab_bar_appearing = bar.prev_frame_visible + 1 < frame;
        let tab_bar_focused = bar.flags.contains(TabBarFlags::IS_FOCUSED);
        let tab_appearing;
        {
            let tab = &mut bar.tabs[order];
            tab.content_width = size.x;
            tab.begin_order = begin_order;
            tab_appearing = tab.last_frame_visible + 1 < frame;
            tab.last_frame_visible = frame;
            tab.flags = flags;
            tab.window = docked_window;
            tab.name.clear();
            tab.name.push_str(label);
        }

        // without reordering, submission order is display order
        if !tab_appearing && !bar.flags.contains(TabBarFlags::REORDERABLE) {
            bar.tabs[order].offset = bar.offset_next_tab;
            bar.offset_next_tab += bar.tabs[order].width + self.style.item_inner_spacing.x;
        }

        if tab_appearing && bar.flags.contains(TabBarFlags::AUTO_SELECT_NEW_TABS) && bar.next_selected_tab_id.is_none() && (!tab_bar_appearing || bar.selected_tab_id.is_none()) {
            bar.next_selected_tab_id = id;
        }
        if flags.contains(TabItemFlags::SET_SELECTED) && bar.selected_tab_id != id {
            bar.next_selected_tab_id = id;
        }

        let mut tab_contents_visible = bar.visible_tab_id == id;
        if tab_contents_visible {
            bar.visible_tab_was_submitted = true;
        }

        // the very first frame of a bar shows its only tab to avoid a blank frame
        if !tab_contents_visible
            && bar.selected_tab_id.is_none()
            && tab_bar_appearing
            && docked_window.is_none()
            && bar.tabs.len() == 1
            && !bar.flags.contains(TabBarFlags::AUTO_SELECT_NEW_TABS)
        {
            tab_contents_visible = true;
        }

        if tab_appearing && (!tab_bar_appearing || tab_is_new) {
            self.item_add(Rect::default(), id);
            return tab_contents_visible;
        }

        if bar.selected_tab_id == id {
            bar.tabs[order].last_frame_selected = frame;
        }

        let backup_cursor_pos = self.current_window().dc.cursor_pos;

        size.x = bar.tabs[order].width;
        let pos = vec2f(bar.bar_rect.min.x + bar.tabs[order].offset.floor() - bar.scrolling_anim, bar.bar_rect.min.y);
        let bb = Rect::from_pos_size(pos, size);
        self.current_window_mut().dc.cursor_pos = pos;

        // the close button has no CPU clipping, so clip the whole tab when it overflows the bar
        let want_clip_rect = bb.min.x < bar.bar_rect.min.x || bb.max.x > bar.bar_rect.max.x;
        if want_clip_rect {
            self.push_clip_rect(vec2f(bb.min.x.max(bar.bar_rect.min.x), bb.min.y - 1.0), vec2f(bar.bar_rect.max.x, bb.max.y), true);
        }

        let backup_cursor_max_pos = self.current_window().dc.cursor_max_pos;
        self.item_size(bb.size(), self.style.frame_padding.y);
        self.current_window_mut().dc.cursor_max_pos = backup_cursor_max_pos;

        if !self.item_add(bb, id) {
            if want_clip_rect {
                self.pop_clip_rect();
            }
            self.current_window_mut().dc.cursor_pos = backup_cursor_pos;
            return tab_contents_visible;
        }

        let mut button_flags = ButtonFlags::PRESSED_ON_CLICK | ButtonFlags::ALLOW_ITEM_OVERLAP;
        if self.drag_drop.active && !self.drag_drop.payload.is_data_type(PAYLOAD_TYPE_WINDOW) {
            button_flags |= ButtonFlags::PRESSED_ON_DRAG_DROP_HOLD;
        }
        let (pressed, hovered, held) = self.button_behavior(&bb, id, button_flags);
        if pressed {
            bar.next_selected_tab_id = id;
        }
        let hovered = hovered || self.hovered_id == id;

        if held && docked_window.is_some() && self.active_id == id && self.active_id_is_just_activated {
            self.active_id_window = docked_window;
        }

        // the close button may overlap the tab unless it is being dragged
        if !held {
            self.set_item_allow_overlap();
        }

        if held && !tab_appearing && self.is_mouse_dragging(MouseButton::Left, -1.0) {
            let mouse = self.input.mouse_pos;
            let mouse_delta_x = self.input.mouse_delta.x;
            let reorderable = bar.flags.contains(TabBarFlags::REORDERABLE);
            let mut drag_distance_from_edge_x = 0.0;
            if !self.drag_drop.active && (reorderable || docked_window.is_some()) {
                // a moved tab jumps to the other side of the pointer, so the motion direction matters too
                if mouse_delta_x < 0.0 && mouse.x < bb.min.x {
                    drag_distance_from_edge_x = bb.min.x - mouse.x;
                    if reorderable && bar.reorder_request_tab_id.is_none() {
                        bar.queue_reorder(id, -1);
                    }
                } else if mouse_delta_x > 0.0 && mouse.x > bb.max.x {
                    drag_distance_from_edge_x = mouse.x - bb.max.x;
                    if reorderable && bar.reorder_request_tab_id.is_none() {
                        bar.queue_reorder(id, 1);
                    }
                }
            }

            if let Some(window_id) = docked_window {
                let mut undocking = self.drag_drop.active && self.drag_drop.payload.source_id == id;
                if !undocking {
                    let base = self.font_size;
                    let threshold_x = base * 2.2;
                    let threshold_y = base * 1.5 + ((self.input.mouse_drag_max_distance_abs(MouseButton::Left).x.abs() - base * 2.0) * 0.2).clamp(0.0, base * 4.0);
                    let distance_from_edge_y = (bb.min.y - mouse.y).max(mouse.y - bb.max.y);
                    let at_edge = (bar.reorder_request_dir < 0 && order == 0) || (bar.reorder_request_dir > 0 && order + 1 == bar.tabs.len());
                    undocking = distance_from_edge_y >= threshold_y || (drag_distance_from_edge_x > threshold_x && at_edge);
                }
                if undocking {
                    log::debug!("tab {} dragged out of tab bar {:?}", label, bar.id);
                    bar.undock_request = Some(window_id);
                    if let Some(move_id) = self.find_window(window_id).map(|w| w.move_id) {
                        self.set_active_id(move_id, Some(window_id));
                    }
                }
            }
        }

        let col = match (held || hovered, tab_contents_visible, tab_bar_focused) {
            (true, _, _) => StyleColor::TabHovered,
            (false, true, true) => StyleColor::TabActive,
            (false, true, false) => StyleColor::TabUnfocusedActive,
            (false, false, true) => StyleColor::Tab,
            (false, false, false) => StyleColor::TabUnfocused,
        };
        self.tab_item_background(&bb, self.style.color_u32(col));

        // right click selects, so a context menu opens on the tab it belongs to
        if self.is_item_hovered(HoveredFlags::empty()) && (self.input.is_mouse_clicked(MouseButton::Right) || self.input.is_mouse_released(MouseButton::Right)) {
            bar.next_selected_tab_id = id;
        }

        if bar.flags.contains(TabBarFlags::NO_CLOSE_WITH_MIDDLE_MOUSE_BUTTON) {
            flags |= TabItemFlags::NO_CLOSE_WITH_MIDDLE_MOUSE_BUTTON;
        }

        let close_button_id = if open.as_deref() == Some(&true) { self.get_id_int(id.raw().wrapping_add(1) as i32) } else { Id::NONE };
        let frame_padding = bar.frame_padding;
        let just_closed = self.tab_item_label_and_close_button(&bb, flags, frame_padding, label, id, close_button_id, tab_contents_visible);
        if just_closed {
            if let Some(open) = open {
                *open = false;
                bar.close_tab(id);
            }
        }

        if want_clip_rect {
            self.pop_clip_rect();
        }
        self.current_window_mut().dc.cursor_pos = backup_cursor_pos;
        tab_contents_visible
    }

    /// Lays the tabs out, once per frame before the first tab is submitted.
    ///
    /// Drops stale tabs, applies pending selection and reorder, fits widths to the bar,
    /// updates scrolling and locks in the visible tab.
    #[inline(never)]
    pub fn tab_bar_layout(&mut self, bar: &mut TabBar) {
        bar.want_layout = false;
        bar.compact();

        let mut scroll_track_selected_tab_id = Id::NONE;
        if bar.next_selected_tab_id.is_some() {
            bar.selected_tab_id = bar.next_selected_tab_id;
            bar.next_selected_tab_id = Id::NONE;
            scroll_track_selected_tab_id = bar.selected_tab_id;
        }

        if bar.reorder_request_tab_id.is_some() {
            if bar.process_reorder() {
                if bar.flags.contains(TabBarFlags::SAVE_SETTINGS) {
                    self.mark_ini_settings_dirty();
                }
                if bar.reorder_request_tab_id == bar.selected_tab_id {
                    scroll_track_selected_tab_id = bar.reorder_request_tab_id;
                }
            }
            bar.reorder_request_tab_id = Id::NONE;
        }

        // ideal widths
        let inner_spacing_x = self.style.item_inner_spacing.x;
        let mut shrink_buffer = Vec::with_capacity(bar.tabs.len());
        let mut width_total_contents = 0.0;
        let mut most_recently_selected: Option<usize> = None;
        let mut found_selected_tab_id = false;
        for (n, tab) in bar.tabs.iter_mut().enumerate() {
            contract_check!(tab.last_frame_visible >= bar.prev_frame_visible, "stale tab {} survived compaction", tab.name);
            if tab.id == bar.selected_tab_id {
                found_selected_tab_id = true;
            }
            let has_close_button = !tab.flags.contains(TabItemFlags::NO_CLOSE_BUTTON);
            tab.content_width = self.tab_item_calc_size(&tab.name, has_close_button).x;
            width_total_contents += if n > 0 { inner_spacing_x } else { 0.0 } + tab.content_width;
            shrink_buffer.push(ShrinkWidthItem { index: n, width: tab.content_width });
        }
        for (n, tab) in bar.tabs.iter().enumerate() {
            if most_recently_selected.is_none_or(|m| bar.tabs[m].last_frame_selected < tab.last_frame_selected) {
                most_recently_selected = Some(n);
            }
        }

        let width_avail = bar.bar_rect.width().max(0.0);
        let width_excess = if width_avail < width_total_contents { width_total_contents - width_avail } else { 0.0 };
        if width_excess > 0.0 && bar.flags.contains(TabBarFlags::FITTING_POLICY_RESIZE_DOWN) {
            shrink_widths(&mut shrink_buffer, width_excess);
            for item in &shrink_buffer {
                bar.tabs[item.index].width = item.width.floor();
            }
        } else {
            let tab_max_width = self.font_size * TAB_MAX_WIDTH_IN_FONT_SIZES;
            for tab in &mut bar.tabs {
                tab.width = tab.content_width.min(tab_max_width);
                contract_check!(tab.width > 0.0, "tab {} has no width", tab.name);
            }
        }

        let mut offset_x = 0.0;
        let mut offset_x_ideal = 0.0;
        bar.offset_next_tab = 0.0;
        for tab in &mut bar.tabs {
            tab.offset = offset_x;
            offset_x += tab.width + inner_spacing_x;
            offset_x_ideal += tab.content_width + inner_spacing_x;
        }
        bar.width_all_tabs = (offset_x - inner_spacing_x).max(0.0);
        bar.width_all_tabs_ideal = (offset_x_ideal - inner_spacing_x).max(0.0);

        let scrolling_buttons = bar.width_all_tabs > bar.bar_rect.width()
            && bar.tabs.len() > 1
            && !bar.flags.contains(TabBarFlags::NO_TAB_LIST_SCROLLING_BUTTONS)
            && bar.flags.contains(TabBarFlags::FITTING_POLICY_SCROLL);
        if scrolling_buttons {
            if let Some(order) = self.tab_bar_scrolling_buttons(bar) {
                bar.selected_tab_id = bar.tabs[order].id;
                scroll_track_selected_tab_id = bar.selected_tab_id;
            }
        }

        // a lost selection falls back to the most recently selected tab
        if !found_selected_tab_id {
            bar.selected_tab_id = Id::NONE;
        }
        if bar.selected_tab_id.is_none() && bar.next_selected_tab_id.is_none() {
            if let Some(m) = most_recently_selected {
                bar.selected_tab_id = bar.tabs[m].id;
                scroll_track_selected_tab_id = bar.selected_tab_id;
            }
        }

        bar.visible_tab_id = bar.selected_tab_id;
        bar.visible_tab_was_submitted = false;

        if let Some(preview) = bar.preview_tab_id.filter(|id| bar.tab_order(*id).is_some()) {
            bar.visible_tab_id = preview;
            scroll_track_selected_tab_id = preview;
        }

        if let Some(order) = bar.tab_order(scroll_track_selected_tab_id) {
            bar.scroll_to_tab(order, self.font_size);
        }
        bar.scrolling_anim = bar.scroll_clamp(bar.scrolling_anim);
        bar.scrolling_target = bar.scroll_clamp(bar.scrolling_target);
        if bar.scrolling_anim != bar.scrolling_target {
            // reach the target within a third of a second, or teleport when far off
            bar.scrolling_speed = bar.scrolling_speed.max(70.0 * self.font_size);
            bar.scrolling_speed = bar.scrolling_speed.max((bar.scrolling_target - bar.scrolling_anim).abs() / 0.3);
            let teleport = bar.prev_frame_visible + 1 < self.frame_count || bar.scrolling_target_dist_to_visibility > 10.0 * self.font_size;
            bar.scrolling_anim = if teleport { bar.scrolling_target } else { linear_sweep(bar.scrolling_anim, bar.scrolling_target, self.input.delta_time * bar.scrolling_speed) };
        } else {
            bar.scrolling_speed = 0.0;
        }

        self.current_window_mut().dc.cursor_pos = bar.bar_rect.min;
        self.item_size(vec2f(bar.width_all_tabs_ideal, bar.bar_rect.height()), bar.frame_padding.y);
    }

    /// Draws the two scrolling arrows at the right of the bar and shrinks the bar by their width.
    ///
    /// Returns the order of the tab to select when an arrow was pressed.
    fn tab_bar_scrolling_buttons(&mut self, bar: &mut TabBar) -> Option<usize> {
        let arrow_size = vec2f(self.font_size - 2.0, self.font_size + self.style.frame_padding.y * 2.0);
        let buttons_width = arrow_size.x * 2.0;
        let backup_cursor_pos = self.current_window().dc.cursor_pos;

        let cursor = backup_cursor_pos;
        let buttons_rect = Rect::new(cursor.x, cursor.y, cursor.x + buttons_width, cursor.y);
        let want_clip_rect = !bar.bar_rect.contains_rect(&buttons_rect);
        if want_clip_rect {
            self.push_clip_rect(bar.bar_rect.min, vec2f(bar.bar_rect.max.x + self.style.item_inner_spacing.x, bar.bar_rect.max.y), true);
        }

        let backup_style = self.style;
        let backup_repeat = (self.config.input.key_repeat_delay, self.config.input.key_repeat_rate);
        self.style.colors[StyleColor::Text as usize].a /= 2;
        self.style.colors[StyleColor::Button as usize] = Color::rgba(0, 0, 0, 0);
        self.config.input.key_repeat_delay = 0.25;
        self.config.input.key_repeat_rate = 0.20;

        let flags = ButtonFlags::PRESSED_ON_CLICK | ButtonFlags::REPEAT;
        let mut select_dir = 0;
        self.set_cursor_screen_pos(vec2f(bar.bar_rect.max.x - buttons_width, bar.bar_rect.min.y));
        if self.arrow_button_ex("##<", Dir::Left, arrow_size, flags) {
            select_dir = -1;
        }
        self.set_cursor_screen_pos(vec2f(bar.bar_rect.max.x - buttons_width + arrow_size.x, bar.bar_rect.min.y));
        if self.arrow_button_ex("##>", Dir::Right, arrow_size, flags) {
            select_dir = 1;
        }

        self.style = backup_style;
        (self.config.input.key_repeat_delay, self.config.input.key_repeat_rate) = backup_repeat;
        if want_clip_rect {
            self.pop_clip_rect();
        }

        // at either end, the selected tab is still scrolled into view
        let to_select = match (select_dir, bar.tab_order(bar.selected_tab_id)) {
            (0, _) | (_, None) => None,
            (dir, Some(order)) => {
                let target = order as i64 + dir as i64;
                Some(if target >= 0 && (target as usize) < bar.tabs.len() { target as usize } else { order })
            }
        };
        self.current_window_mut().dc.cursor_pos = backup_cursor_pos;
        bar.bar_rect.max.x -= buttons_width + 1.0;
        to_select
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 3] = ["A", "B", "C"];

    // one frame of a window holding a tab bar with `labels`, returning the bar id and visible labels
    fn tabs_frame(ctx: &mut Context, flags: TabBarFlags, labels: &[&str], bar_width: f32) -> (Id, Vec<String>) {
        ctx.new_frame();
        ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Always);
        ctx.set_next_window_size(vec2f(bar_width + 16.0, 300.0), Cond::Always);
        let _ = ctx.begin("Tabs", None, WindowFlags::NO_TITLE_BAR);
        let bar_id = ctx.get_id("bar");
        let mut visible = Vec::new();
        if ctx.begin_tab_bar("bar", flags) {
            for label in labels {
                if ctx.begin_tab_item(label, None, TabItemFlags::empty()) {
                    visible.push(label.to_string());
                    ctx.end_tab_item();
                }
            }
            ctx.end_tab_bar();
        }
        ctx.end();
        ctx.end_frame().unwrap();
        (bar_id, visible)
    }

    fn order(bar: &TabBar) -> Vec<&str> { bar.tabs().iter().map(|t| t.name()).collect() }

    #[test]
    fn first_tab_is_selected_on_second_frame() {
        let mut ctx = headless_context();
        let (bar_id, visible) = tabs_frame(&mut ctx, TabBarFlags::empty(), &LABELS, 400.0);
        assert_eq!(ctx.tab_bar(bar_id).unwrap().id(), bar_id);
        assert_eq!(ctx.tab_bar(bar_id).unwrap().tabs().len(), 3);
        // the bar is appearing and "A" was its only tab when submitted
        assert_eq!(visible, ["A"]);

        let (_, visible) = tabs_frame(&mut ctx, TabBarFlags::empty(), &LABELS, 400.0);
        let bar = ctx.tab_bar(bar_id).unwrap();
        assert_eq!(bar.tabs().len(), 3);
        assert!(bar.width_all_tabs() <= bar.bar_rect().width());
        assert_eq!(bar.selected_tab_id(), bar.tabs()[0].id());
        assert_eq!(visible, ["A"]);
    }

    #[test]
    fn reorder_then_reverse_restores_order() {
        let mut ctx = headless_context();
        let flags = TabBarFlags::REORDERABLE | TabBarFlags::SAVE_SETTINGS;
        let (bar_id, _) = tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        tabs_frame(&mut ctx, flags, &LABELS, 400.0);

        let b = ctx.tab_bar(bar_id).unwrap().tabs()[1].id();
        ctx.tab_bar_mut(bar_id).unwrap().queue_reorder(b, 1);
        tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        assert_eq!(order(ctx.tab_bar(bar_id).unwrap()), ["A", "C", "B"]);

        ctx.tab_bar_mut(bar_id).unwrap().queue_reorder(b, -1);
        tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        assert_eq!(order(ctx.tab_bar(bar_id).unwrap()), ["A", "B", "C"]);
        // the reorder marked the settings dirty
        assert!(ctx.settings_dirty_timer > 0.0);
    }

    #[test]
    fn dragging_a_tab_past_its_neighbour_reorders() {
        let mut ctx = headless_context();
        let flags = TabBarFlags::REORDERABLE;
        let (bar_id, _) = tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        let bar = ctx.tab_bar(bar_id).unwrap();
        let (b, c) = (bar.tabs()[1].clone(), bar.tabs()[2].clone());
        let x0 = bar.bar_rect().min.x;
        let y = bar.bar_rect().min.y + 5.0;

        ctx.input.mousemove(x0 + b.offset() + b.width() * 0.5, y);
        tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        ctx.input.mousedown(MouseButton::Left);
        tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        assert_eq!(ctx.active_id(), b.id());

        ctx.input.mousemove(x0 + c.offset() + c.width() + 10.0, y);
        tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        assert_eq!(order(ctx.tab_bar(bar_id).unwrap()), LABELS);
        tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        assert_eq!(order(ctx.tab_bar(bar_id).unwrap()), ["A", "C", "B"]);

        // holding still does not queue another move
        tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        assert_eq!(order(ctx.tab_bar(bar_id).unwrap()), ["A", "C", "B"]);
        ctx.input.mouseup(MouseButton::Left);
        tabs_frame(&mut ctx, flags, &LABELS, 400.0);
        assert_eq!(ctx.tab_bar(bar_id).unwrap().selected_tab_id(), b.id());
    }

    #[test]
    fn dragging_a_docked_tab_vertically_requests_undock() {
        const BAR: Id = Id::new(0xd0c);
        let mut ctx = headless_context();
        let frame = |ctx: &mut Context| -> Id {
            ctx.new_frame();
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Always);
            ctx.set_next_window_size(vec2f(320.0, 240.0), Cond::Always);
            let _ = ctx.begin("Host", None, WindowFlags::NO_TITLE_BAR);
            let host = ctx.current_window().id();
            let height = ctx.font_size + ctx.style.frame_padding.y * 2.0;
            if ctx.begin_tab_bar_ex(BAR, Rect::new(8.0, 8.0, 300.0, 8.0 + height), TabBarFlags::DOCK_NODE) {
                ctx.with_tab_bar(BAR, |ctx, bar| ctx.tab_item_ex(bar, "Doc", None, TabItemFlags::empty(), Some(host)));
                ctx.end_tab_bar();
            }
            ctx.end();
            ctx.end_frame().unwrap();
            host
        };
        frame(&mut ctx);
        let host = frame(&mut ctx);
        let bar = ctx.tab_bar(BAR).unwrap();
        let tab = bar.tabs()[0].clone();
        assert_eq!(tab.window(), Some(host));
        let center = vec2f(8.0 + tab.offset() + tab.width() * 0.5, bar.bar_rect().center().y);
        let bottom = bar.bar_rect().max.y;

        ctx.input.mousemove(center.x, center.y);
        frame(&mut ctx);
        ctx.input.mousedown(MouseButton::Left);
        frame(&mut ctx);
        assert_eq!(ctx.active_id(), tab.id());
        // a short drag below the bar is not enough
        ctx.input.mousemove(center.x, bottom + 2.0);
        frame(&mut ctx);
        assert_eq!(ctx.tab_bar_mut(BAR).unwrap().take_undock_request(), None);

        ctx.input.mousemove(center.x, bottom + ctx.font_size * 1.5 + 20.0);
        frame(&mut ctx);
        assert_eq!(ctx.tab_bar_mut(BAR).unwrap().take_undock_request(), Some(host));
        assert_eq!(ctx.tab_bar_mut(BAR).unwrap().take_undock_request(), None);
    }

    #[test]
    fn reorder_out_of_bounds_is_ignored() {
        let mut bar = TabBar::default();
        for (i, name) in LABELS.iter().enumerate() {
            bar.tabs.push(TabItem { id: Id::new(i as u32 + 1), name: name.to_string(), ..TabItem::default() });
        }
        bar.queue_reorder(Id::new(1), -1);
        assert!(!bar.process_reorder());
        bar.reorder_request_tab_id = Id::NONE;
        bar.queue_reorder(Id::new(3), 1);
        assert!(!bar.process_reorder());
        assert_eq!(order(&bar), LABELS);
    }

    #[test]
    fn narrow_bar_shrinks_tabs() {
        let mut ctx = headless_context();
        let labels = ["Alpha document", "Beta", "Gamma notes", "Delta"];
        let (bar_id, _) = tabs_frame(&mut ctx, TabBarFlags::empty(), &labels, 150.0);
        tabs_frame(&mut ctx, TabBarFlags::empty(), &labels, 150.0);
        let bar = ctx.tab_bar(bar_id).unwrap();
        let spacing = ctx.style.item_inner_spacing.x * 3.0;
        let sum: f32 = bar.tabs().iter().map(|t| t.width()).sum();
        assert!(sum + spacing <= bar.bar_rect().width() + 0.01);
        assert!(bar.tabs().iter().all(|t| t.width() >= 1.0));
        assert!(bar.width_all_tabs_ideal() > bar.width_all_tabs());
    }

    #[test]
    fn scroll_policy_keeps_ideal_widths() {
        let mut ctx = headless_context();
        let labels = ["Alpha document", "Beta", "Gamma notes", "Delta"];
        let (bar_id, _) = tabs_frame(&mut ctx, TabBarFlags::FITTING_POLICY_SCROLL, &labels, 150.0);
        tabs_frame(&mut ctx, TabBarFlags::FITTING_POLICY_SCROLL, &labels, 150.0);
        let bar = ctx.tab_bar(bar_id).unwrap();
        assert!(bar.tabs().iter().all(|t| t.width() == t.content_width()));
        // the arrows take their room from the bar
        assert!(bar.bar_rect().width() < 150.0);
        assert_eq!(bar.scroll_clamp(-5.0), 0.0);
        assert_eq!(bar.scroll_clamp(1.0e6), bar.width_all_tabs() - bar.bar_rect().width());
    }

    #[test]
    fn shrink_widths_takes_from_largest_first() {
        let mut items = vec![
            ShrinkWidthItem { index: 0, width: 100.0 },
            ShrinkWidthItem { index: 1, width: 40.0 },
            ShrinkWidthItem { index: 2, width: 70.0 },
        ];
        shrink_widths(&mut items, 50.0);
        items.sort_by_key(|i| i.index);
        let widths: Vec<f32> = items.iter().map(|i| i.width).collect();
        assert_eq!(widths, [60.0, 40.0, 60.0]);

        let mut items = vec![ShrinkWidthItem { index: 0, width: 10.0 }, ShrinkWidthItem { index: 1, width: 10.0 }];
        shrink_widths(&mut items, 100.0);
        assert!(items.iter().all(|i| i.width >= 1.0));
    }

    #[test]
    fn closing_tabs() {
        let mut bar = TabBar::default();
        for (i, name) in LABELS.iter().enumerate() {
            bar.tabs.push(TabItem { id: Id::new(i as u32 + 1), name: name.to_string(), last_frame_visible: 5, ..TabItem::default() });
        }
        bar.visible_tab_id = Id::new(1);
        bar.selected_tab_id = Id::new(1);
        bar.close_tab(Id::new(1));
        assert_eq!(bar.selected_tab_id(), Id::NONE);
        assert_eq!(bar.tabs[0].last_frame_visible, -1);

        // an unsaved hidden tab is selected before closing
        bar.tabs[2].flags = TabItemFlags::UNSAVED_DOCUMENT;
        bar.close_tab(Id::new(3));
        assert_eq!(bar.next_selected_tab_id, Id::new(3));

        bar.remove_tab(Id::new(3));
        assert_eq!(bar.next_selected_tab_id, Id::NONE);
        assert!(bar.find_tab_by_id(Id::new(3)).is_none());
        assert_eq!(bar.tabs().len(), 2);
    }

    #[test]
    fn close_button_closes_selected_tab() {
        let mut ctx = headless_context();
        let mut open_b = true;
        let mut run = |ctx: &mut Context, open_b: &mut bool| {
            ctx.new_frame();
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Always);
            let _ = ctx.begin("Tabs", None, WindowFlags::NO_TITLE_BAR);
            let bar_id = ctx.get_id("bar");
            if ctx.begin_tab_bar("bar", TabBarFlags::empty()) {
                if ctx.begin_tab_item("A", None, TabItemFlags::empty()) {
                    ctx.end_tab_item();
                }
                if ctx.begin_tab_item("B", Some(open_b), TabItemFlags::SET_SELECTED) {
                    ctx.end_tab_item();
                }
                ctx.end_tab_bar();
            }
            ctx.end();
            ctx.end_frame().unwrap();
            bar_id
        };
        run(&mut ctx, &mut open_b);
        let bar_id = run(&mut ctx, &mut open_b);
        run(&mut ctx, &mut open_b);
        let b = ctx.tab_bar(bar_id).unwrap().tabs()[1].clone();
        assert_eq!(ctx.tab_bar(bar_id).unwrap().selected_tab_id(), b.id());

        // middle click over the hovered tab closes it
        let center = vec2f(8.0 + b.offset() + b.width() * 0.5, 8.0 + 5.0);
        ctx.input.mousemove(center.x, center.y);
        run(&mut ctx, &mut open_b);
        ctx.input.mousedown(MouseButton::Middle);
        run(&mut ctx, &mut open_b);
        assert!(!open_b);
        ctx.input.mouseup(MouseButton::Middle);
        run(&mut ctx, &mut open_b);
        run(&mut ctx, &mut open_b);
        let bar = ctx.tab_bar(bar_id).unwrap();
        assert_eq!(bar.tabs().len(), 1);
        assert_eq!(bar.selected_tab_id(), bar.tabs()[0].id());
    }

    #[test]
    fn registered_window_tabs_track_activity() {
        let mut ctx = headless_context();
        ctx.frame(|ctx| {
            let _ = ctx.begin("Doc 1", None, WindowFlags::empty());
            ctx.end();
            let _ = ctx.begin("Doc 2", None, WindowFlags::empty());
            ctx.end();
        })
        .unwrap();
        for _ in 0..2 {
            ctx.frame(|ctx| {
                let _ = ctx.begin("Doc 2", None, WindowFlags::empty());
                ctx.end();
            })
            .unwrap();
        }

        let mut bar = TabBar::default();
        let windows = ctx.windows();
        let doc1 = windows.iter().find(|w| w.name() == "Doc 1").unwrap();
        let doc2 = windows.iter().find(|w| w.name() == "Doc 2").unwrap();
        bar.add_tab(TabItemFlags::empty(), doc1, ctx.frame_count());
        bar.add_tab(TabItemFlags::empty(), doc2, ctx.frame_count());
        assert_eq!(bar.tabs()[0].window(), Some(doc1.id()));
        assert_eq!(bar.tabs()[0].name(), "Doc 1");

        bar.tabs[0].last_frame_selected = 2;
        bar.tabs[1].last_frame_selected = 1;
        // only "Doc 2" was active last frame
        assert_eq!(bar.find_most_recently_selected(windows).map(|t| t.id()), Some(doc2.id()));
    }
}
