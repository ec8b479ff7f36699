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
//! Drag and drop: a payload carried from a source item to the smallest accepting target.
use super::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Options of the drag and drop source and target calls.
    pub struct DragDropFlags : u32 {
        /// The source item keeps reporting hovered while it is dragged.
        const SOURCE_NO_DISABLE_HOVER = 1 << 1;
        /// Dragging over buttons does not press them after a delay.
        const SOURCE_NO_HOLD_TO_OPEN_OTHERS = 1 << 2;
        /// The source may be an item without identifier, one is made up from its rectangle.
        const SOURCE_ALLOW_NULL_ID = 1 << 3;
        /// The source lives outside the UI, such as a file dragged from the OS. Always active.
        const SOURCE_EXTERN = 1 << 4;
        /// The payload expires when the source stops being submitted, even with the mouse held.
        const SOURCE_AUTO_EXPIRE_PAYLOAD = 1 << 5;
        /// `accept_drag_drop_payload` returns the payload before the mouse is released.
        const ACCEPT_BEFORE_DELIVERY = 1 << 10;
        /// No highlight rectangle around the hovered target.
        const ACCEPT_NO_DRAW_DEFAULT_RECT = 1 << 11;
        /// Inspect the payload while hovering, drawing nothing.
        const ACCEPT_PEEK_ONLY = Self::ACCEPT_BEFORE_DELIVERY.bits() | Self::ACCEPT_NO_DRAW_DEFAULT_RECT.bits();
    }
}

/// Payload type used when dragging a window by its tab.
pub const PAYLOAD_TYPE_WINDOW: &str = "_IMWINDOW";

const PAYLOAD_TYPE_MAX_LEN: usize = 32;

#[derive(Clone, Debug)]
/// Data carried by a drag and drop operation.
pub struct Payload {
    pub(crate) data: Vec<u8>,
    pub(crate) data_type: String,
    pub(crate) source_id: Id,
    pub(crate) source_parent_id: Id,
    pub(crate) data_frame_count: i32,
    pub(crate) preview: bool,
    pub(crate) delivery: bool,
}

impl Default for Payload {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            data_type: String::new(),
            source_id: Id::NONE,
            source_parent_id: Id::NONE,
            data_frame_count: -1,
            preview: false,
            delivery: false,
        }
    }
}

impl Payload {
    pub(crate) fn clear(&mut self) {
        self.data.clear();
        self.data_type.clear();
        self.source_id = Id::NONE;
        self.source_parent_id = Id::NONE;
        self.data_frame_count = -1;
        self.preview = false;
        self.delivery = false;
    }

    /// Bytes given to `set_drag_drop_payload`.
    pub fn data(&self) -> &[u8] { &self.data }

    /// Type tag given to `set_drag_drop_payload`.
    pub fn data_type(&self) -> &str { &self.data_type }

    /// Returns `true` if the payload carries `data_type`.
    pub fn is_data_type(&self, data_type: &str) -> bool { self.data_frame_count != -1 && self.data_type == data_type }

    /// Item the payload is dragged from.
    pub fn source_id(&self) -> Id { self.source_id }

    /// Id scope of the source item.
    pub fn source_parent_id(&self) -> Id { self.source_parent_id }

    /// Returns `true` while the payload hovers the target that accepted it last frame.
    pub fn is_preview(&self) -> bool { self.preview }

    /// Returns `true` on the frame the payload is dropped on the target.
    pub fn is_delivery(&self) -> bool { self.delivery }
}

#[derive(Clone, Debug)]
pub(crate) struct DragDropState {
    pub(crate) active: bool,
    pub(crate) within_source_or_target: bool,
    pub(crate) source_flags: DragDropFlags,
    pub(crate) source_frame_count: i32,
    pub(crate) mouse_button: MouseButton,
    pub(crate) payload: Payload,
    pub(crate) target_rect: Rect,
    pub(crate) target_id: Id,
    pub(crate) accept_flags: DragDropFlags,
    pub(crate) accept_id_curr: Id,
    pub(crate) accept_id_prev: Id,
    pub(crate) accept_id_curr_rect_surface: f32,
    pub(crate) accept_frame_count: i32,
    // latched by any target this frame, read by elapse
    pub(crate) delivered: bool,
}

impl Default for DragDropState {
    fn default() -> Self {
        Self {
            active: false,
            within_source_or_target: false,
            source_flags: DragDropFlags::empty(),
            source_frame_count: -1,
            mouse_button: MouseButton::Left,
            payload: Payload::default(),
            target_rect: Rect::default(),
            target_id: Id::NONE,
            accept_flags: DragDropFlags::empty(),
            accept_id_curr: Id::NONE,
            accept_id_prev: Id::NONE,
            accept_id_curr_rect_surface: f32::MAX,
            accept_frame_count: -1,
            delivered: false,
        }
    }
}

impl Context {
    /// Makes the last item a drag source once it is dragged past the threshold.
    ///
    /// When it returns `true`, set the payload with [`Context::set_drag_drop_payload`] then call
    /// [`Context::end_drag_drop_source`].
    #[must_use]
    pub fn begin_drag_drop_source(&mut self, flags: DragDropFlags) -> bool {
        let mouse_button = MouseButton::Left;
        let (source_id, source_parent_id, source_drag_active) = if !flags.contains(DragDropFlags::SOURCE_EXTERN) {
            let mut source_id = self.current_window().dc.last_item_id;
            if source_id.is_some() && self.active_id != source_id {
                return false;
            }
            if !self.input.is_mouse_down(mouse_button) {
                return false;
            }

            let window_id = self.current_window().id;
            if source_id.is_none() {
                if !flags.contains(DragDropFlags::SOURCE_ALLOW_NULL_ID) {
                    contract_check!(false, "drag source on an item without id needs SOURCE_ALLOW_NULL_ID");
                    return false;
                }
                let dc = &self.current_window().dc;
                if !dc.last_item_status_flags.contains(ItemStatusFlags::HOVERED_RECT) && (self.active_id.is_none() || self.active_id_window != Some(window_id)) {
                    return false;
                }

                // items without id get one from their rectangle
                let rect = dc.last_item_rect;
                source_id = self.current_window().get_id_from_rect(&rect);
                self.current_window_mut().dc.last_item_id = source_id;
                self.keep_alive_id(source_id);
                let is_hovered = self.item_hoverable(&rect, source_id);
                if is_hovered && self.input.is_mouse_clicked(mouse_button) {
                    self.set_active_id(source_id, Some(window_id));
                    self.focus_window(Some(window_id));
                }
                // the item keeps reporting hovered on the release frame
                if self.active_id == source_id {
                    self.active_id_allow_overlap = is_hovered;
                }
            } else {
                self.active_id_allow_overlap = false;
            }
            if self.active_id != source_id {
                return false;
            }
            let parent = self.current_window().id_stack.top();
            (source_id, parent, self.is_mouse_dragging(mouse_button, -1.0))
        } else {
            (Id::new(hash_str(HASH_SEED, "#SourceExtern")), Id::NONE, true)
        };

        if !source_drag_active {
            return false;
        }

        if !self.drag_drop.active {
            contract_check!(source_id.is_some(), "drag source without id");
            self.clear_drag_drop();
            let dd = &mut self.drag_drop;
            dd.payload.source_id = source_id;
            dd.payload.source_parent_id = source_parent_id;
            dd.active = true;
            dd.source_flags = flags;
            dd.mouse_button = mouse_button;
            log::debug!("drag started from {:?}", source_id);
        }
        self.drag_drop.source_frame_count = self.frame_count;
        self.drag_drop.within_source_or_target = true;

        if !flags.intersects(DragDropFlags::SOURCE_NO_DISABLE_HOVER | DragDropFlags::SOURCE_EXTERN) {
            self.current_window_mut().dc.last_item_status_flags.remove(ItemStatusFlags::HOVERED_RECT);
        }
        true
    }

    /// Sets the payload of the active source.
    ///
    /// With [`Cond::Once`] the data is only copied the first time. Returns `true` when a target
    /// accepted the payload this frame or the previous one.
    pub fn set_drag_drop_payload(&mut self, data_type: &str, data: &[u8], cond: Cond) -> bool {
        contract_check!(!data_type.is_empty(), "payload type must not be empty");
        contract_check!(data_type.len() < PAYLOAD_TYPE_MAX_LEN, "payload type {} is too long", data_type);
        contract_check!(matches!(cond, Cond::Always | Cond::Once), "payload condition must be Always or Once");
        contract_check!(self.drag_drop.payload.source_id.is_some(), "set_drag_drop_payload called outside a drag source");

        let payload = &mut self.drag_drop.payload;
        if cond == Cond::Always || payload.data_frame_count == -1 {
            payload.data_type.clear();
            payload.data_type.push_str(data_type);
            payload.data.clear();
            payload.data.extend_from_slice(data);
        }
        payload.data_frame_count = self.frame_count;
        let accepted = self.drag_drop.accept_frame_count;
        accepted == self.frame_count || accepted == self.frame_count - 1
    }

    /// Closes the source opened by a successful [`Context::begin_drag_drop_source`].
    ///
    /// A drag that never received a payload is dropped.
    pub fn end_drag_drop_source(&mut self) {
        contract_check!(self.drag_drop.active, "end_drag_drop_source without an active drag");
        contract_check!(self.drag_drop.within_source_or_target, "end_drag_drop_source without begin_drag_drop_source");
        if self.drag_drop.payload.data_frame_count == -1 {
            self.clear_drag_drop();
        }
        self.drag_drop.within_source_or_target = false;
    }

    /// Makes the last item a drop target while a payload hovers it.
    ///
    /// When it returns `true`, call [`Context::accept_drag_drop_payload`] then
    /// [`Context::end_drag_drop_target`].
    #[must_use]
    pub fn begin_drag_drop_target(&mut self) -> bool {
        if !self.drag_drop.active {
            return false;
        }
        let w = self.current_window();
        if !w.dc.last_item_status_flags.contains(ItemStatusFlags::HOVERED_RECT) || self.hovered_window != Some(w.id) {
            return false;
        }
        let rect = w.dc.last_item_rect;
        let id = if w.dc.last_item_id.is_some() { w.dc.last_item_id } else { w.get_id_from_rect(&rect) };
        if self.drag_drop.payload.source_id == id {
            return false;
        }
        self.open_drag_drop_target(rect, id);
        true
    }

    /// Makes an arbitrary rectangle a drop target with identifier `id`.
    #[must_use]
    pub fn begin_drag_drop_target_custom(&mut self, bb: Rect, id: Id) -> bool {
        if !self.drag_drop.active {
            return false;
        }
        let w = self.current_window();
        if self.hovered_window != Some(w.id) || w.skip_items {
            return false;
        }
        contract_check!(id.is_some(), "drop target without id");
        if !self.is_mouse_hovering_rect(bb.min, bb.max, true) || id == self.drag_drop.payload.source_id {
            return false;
        }
        self.open_drag_drop_target(bb, id);
        true
    }

    fn open_drag_drop_target(&mut self, rect: Rect, id: Id) {
        contract_check!(!self.drag_drop.within_source_or_target, "drop target opened inside another source or target");
        let dd = &mut self.drag_drop;
        dd.target_rect = rect;
        dd.target_id = id;
        dd.within_source_or_target = true;
    }

    /// Accepts the payload if it carries `data_type`.
    ///
    /// Among nested targets hovered at once, the one with the smallest rectangle wins. The
    /// payload is returned on the delivery frame, or every frame with
    /// [`DragDropFlags::ACCEPT_BEFORE_DELIVERY`].
    pub fn accept_drag_drop_payload(&mut self, data_type: &str, flags: DragDropFlags) -> Option<&Payload> {
        contract_check!(self.drag_drop.active, "accept_drag_drop_payload without an active drag");
        contract_check!(self.drag_drop.payload.data_frame_count != -1, "accept_drag_drop_payload before the payload is set");
        if !self.drag_drop.payload.is_data_type(data_type) {
            return None;
        }

        let dd = &mut self.drag_drop;
        let was_accepted_previously = dd.accept_id_prev == dd.target_id;
        let r = dd.target_rect;
        let r_surface = r.area();
        if r_surface < dd.accept_id_curr_rect_surface {
            dd.accept_flags = flags;
            dd.accept_id_curr = dd.target_id;
            dd.accept_id_curr_rect_surface = r_surface;
        }

        dd.payload.preview = was_accepted_previously;
        // the source can opt out of the highlight too
        let flags = flags | (dd.source_flags & DragDropFlags::ACCEPT_NO_DRAW_DEFAULT_RECT);
        if !flags.contains(DragDropFlags::ACCEPT_NO_DRAW_DEFAULT_RECT) && was_accepted_previously {
            let r = r.expand(3.5);
            let col = self.style.color_u32(StyleColor::DragDropTarget);
            let w = self.current_window_mut();
            let push_clip_rect = !w.clip_rect.contains_rect(&r);
            if push_clip_rect {
                w.draw_list.push_clip_rect(vec2f(r.min.x - 1.0, r.min.y - 1.0), vec2f(r.max.x + 1.0, r.max.y + 1.0), false);
            }
            w.draw_list.add_rect(r.min, r.max, col, 0.0, DrawCornerFlags::ALL, 2.0);
            if push_clip_rect {
                w.draw_list.pop_clip_rect();
            }
        }

        self.drag_drop.accept_frame_count = self.frame_count;
        let delivery = was_accepted_previously && !self.input.is_mouse_down(self.drag_drop.mouse_button);
        self.drag_drop.payload.delivery = delivery;
        if delivery {
            self.drag_drop.delivered = true;
            log::debug!("payload {} delivered to {:?}", data_type, self.drag_drop.target_id);
        }
        if !delivery && !flags.contains(DragDropFlags::ACCEPT_BEFORE_DELIVERY) {
            return None;
        }
        Some(&self.drag_drop.payload)
    }

    /// Closes the target opened by a successful `begin_drag_drop_target`.
    pub fn end_drag_drop_target(&mut self) {
        contract_check!(self.drag_drop.active, "end_drag_drop_target without an active drag");
        contract_check!(self.drag_drop.within_source_or_target, "end_drag_drop_target without begin_drag_drop_target");
        self.drag_drop.within_source_or_target = false;
    }

    /// Payload of the drag in progress, anywhere in the frame.
    pub fn get_drag_drop_payload(&self) -> Option<&Payload> { if self.drag_drop.active { Some(&self.drag_drop.payload) } else { None } }

    /// Returns `true` while a drag is in progress.
    pub fn is_drag_drop_active(&self) -> bool { self.drag_drop.active }

    /// Cancels the drag in progress.
    pub fn clear_drag_drop(&mut self) {
        let dd = &mut self.drag_drop;
        dd.active = false;
        dd.payload.clear();
        dd.accept_flags = DragDropFlags::empty();
        dd.accept_id_curr = Id::NONE;
        dd.accept_id_prev = Id::NONE;
        dd.accept_id_curr_rect_surface = f32::MAX;
        dd.accept_frame_count = -1;
        dd.delivered = false;
    }

    /// Ends a delivered drag, or one whose source has gone and whose button is released.
    pub(crate) fn elapse_drag_drop(&mut self) {
        if !self.drag_drop.active {
            return;
        }
        let dd = &self.drag_drop;
        let is_delivered = dd.delivered;
        let is_elapsed = dd.payload.data_frame_count + 1 < self.frame_count
            && (dd.source_flags.contains(DragDropFlags::SOURCE_AUTO_EXPIRE_PAYLOAD) || !self.input.is_mouse_down(dd.mouse_button));
        if is_delivered || is_elapsed {
            if is_elapsed && !is_delivered {
                log::debug!("payload from {:?} expired", dd.payload.source_id);
            }
            self.clear_drag_drop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTER: Id = Id::new(0x100);
    const INNER: Id = Id::new(0x200);

    // one frame with a draggable button and two nested targets; returns what (outer, inner) received
    fn dnd_frame(ctx: &mut Context, mouse: (f32, f32), down: bool, data_type: &str) -> (Option<Vec<u8>>, Option<Vec<u8>>) {
        dnd_frame_ordered(ctx, mouse, down, data_type, false)
    }

    fn dnd_frame_ordered(ctx: &mut Context, mouse: (f32, f32), down: bool, data_type: &str, inner_first: bool) -> (Option<Vec<u8>>, Option<Vec<u8>>) {
        ctx.input.mousemove(mouse.0, mouse.1);
        ctx.input.mouse_down[0] = down;
        ctx.new_frame();
        ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Always);
        let _ = ctx.begin("Dnd", None, WindowFlags::NO_TITLE_BAR);
        ctx.button("Src");
        if ctx.begin_drag_drop_source(DragDropFlags::empty()) {
            ctx.set_drag_drop_payload("ITEM", &[42], Cond::Once);
            ctx.end_drag_drop_source();
        }

        let targets = [(Rect::new(100.0, 100.0, 300.0, 250.0), OUTER), (Rect::new(150.0, 150.0, 200.0, 200.0), INNER)];
        let order: [usize; 2] = if inner_first { [1, 0] } else { [0, 1] };
        let mut received = [None, None];
        for i in order {
            let (bb, id) = targets[i];
            if ctx.begin_drag_drop_target_custom(bb, id) {
                received[i] = ctx.accept_drag_drop_payload(data_type, DragDropFlags::empty()).map(|p| p.data().to_vec());
                ctx.end_drag_drop_target();
            }
        }
        ctx.end();
        ctx.end_frame().unwrap();
        let [outer, inner] = received;
        (outer, inner)
    }

    #[test]
    fn smallest_target_gets_single_delivery() {
        for inner_first in [false, true] {
            let mut ctx = headless_context();
            let mut deliveries = Vec::new();
            let steps = [
                ((20.0, 15.0), false),
                ((20.0, 15.0), true),
                ((175.0, 175.0), true),
                ((175.0, 175.0), true),
                ((175.0, 175.0), false),
                ((175.0, 175.0), false),
                ((175.0, 175.0), false),
            ];
            for (mouse, down) in steps {
                let (outer, inner) = dnd_frame_ordered(&mut ctx, mouse, down, "ITEM", inner_first);
                if let Some(data) = outer {
                    deliveries.push(("outer", data));
                }
                if let Some(data) = inner {
                    deliveries.push(("inner", data));
                }
            }
            assert_eq!(deliveries, [("inner", vec![42u8])], "inner_first = {}", inner_first);
            assert!(!ctx.is_drag_drop_active());
        }
    }

    #[test]
    fn larger_target_after_delivery_does_not_reopen_it() {
        let mut ctx = headless_context();
        dnd_frame_ordered(&mut ctx, (20.0, 15.0), false, "ITEM", true);
        dnd_frame_ordered(&mut ctx, (20.0, 15.0), true, "ITEM", true);
        dnd_frame_ordered(&mut ctx, (175.0, 175.0), true, "ITEM", true);
        dnd_frame_ordered(&mut ctx, (175.0, 175.0), true, "ITEM", true);
        assert_eq!(ctx.drag_drop.accept_id_prev, INNER);

        let (outer, inner) = dnd_frame_ordered(&mut ctx, (175.0, 175.0), false, "ITEM", true);
        assert_eq!((outer, inner), (None, Some(vec![42])));
        // the outer target ran after the delivery and must not have undone it
        assert!(!ctx.is_drag_drop_active());
        assert!(!ctx.drag_drop.delivered);
        assert_eq!(dnd_frame_ordered(&mut ctx, (175.0, 175.0), false, "ITEM", true), (None, None));
    }

    #[test]
    fn mismatched_type_is_never_delivered() {
        let mut ctx = headless_context();
        let steps = [((20.0, 15.0), false), ((20.0, 15.0), true), ((175.0, 175.0), true), ((175.0, 175.0), true)];
        for (mouse, down) in steps {
            assert_eq!(dnd_frame(&mut ctx, mouse, down, "OTHER"), (None, None));
        }
        let payload = ctx.get_drag_drop_payload().unwrap();
        assert!(payload.is_data_type("ITEM"));
        assert!(!payload.is_preview());
        // released with no accepting target, the payload outlives the source by one frame
        assert_eq!(dnd_frame(&mut ctx, (175.0, 175.0), false, "OTHER"), (None, None));
        assert!(ctx.get_drag_drop_payload().is_some());
        dnd_frame(&mut ctx, (175.0, 175.0), false, "OTHER");
        assert!(ctx.get_drag_drop_payload().is_none());
    }

    #[test]
    fn source_waits_for_drag_threshold() {
        let mut ctx = headless_context();
        dnd_frame(&mut ctx, (20.0, 15.0), false, "ITEM");
        dnd_frame(&mut ctx, (20.0, 15.0), true, "ITEM");
        assert!(!ctx.is_drag_drop_active());
        dnd_frame(&mut ctx, (22.0, 16.0), true, "ITEM");
        assert!(!ctx.is_drag_drop_active());
        dnd_frame(&mut ctx, (60.0, 16.0), true, "ITEM");
        let payload = ctx.get_drag_drop_payload().unwrap();
        assert_eq!(payload.data(), [42]);
        assert_eq!(payload.data_type(), "ITEM");
    }

    #[test]
    fn extern_payload_auto_expires() {
        let mut ctx = headless_context();
        ctx.frame(|ctx| {
            assert!(ctx.begin_drag_drop_source(DragDropFlags::SOURCE_EXTERN | DragDropFlags::SOURCE_AUTO_EXPIRE_PAYLOAD));
            assert!(!ctx.set_drag_drop_payload("FILES", b"/tmp/a.txt", Cond::Always));
            ctx.end_drag_drop_source();
        })
        .unwrap();
        ctx.frame(|_| ()).unwrap();
        assert!(ctx.get_drag_drop_payload().is_some());
        ctx.frame(|_| ()).unwrap();
        assert!(ctx.get_drag_drop_payload().is_none());
    }

    #[test]
    fn item_without_id_can_be_dragged() {
        let mut ctx = headless_context();
        let frame = |ctx: &mut Context, mouse: (f32, f32), down: bool| {
            ctx.input.mousemove(mouse.0, mouse.1);
            ctx.input.mouse_down[0] = down;
            ctx.new_frame();
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Always);
            let _ = ctx.begin("Dnd", None, WindowFlags::NO_TITLE_BAR);
            ctx.dummy(vec2f(50.0, 50.0));
            let started = ctx.begin_drag_drop_source(DragDropFlags::SOURCE_ALLOW_NULL_ID);
            if started {
                ctx.set_drag_drop_payload("COLOR", &[1, 2, 3], Cond::Always);
                ctx.end_drag_drop_source();
            }
            ctx.end();
            ctx.end_frame().unwrap();
            started
        };
        assert!(!frame(&mut ctx, (20.0, 20.0), false));
        assert!(!frame(&mut ctx, (20.0, 20.0), true));
        assert!(ctx.active_id().is_some());
        assert!(frame(&mut ctx, (120.0, 120.0), true));
        let source = ctx.get_drag_drop_payload().unwrap().source_id();
        assert_eq!(source, ctx.active_id());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside a drag source")]
    fn payload_outside_source_is_a_contract_violation() {
        let mut ctx = headless_context();
        ctx.new_frame();
        ctx.set_drag_drop_payload("ITEM", &[1], Cond::Always);
    }
}
