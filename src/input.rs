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
//! Per-frame input snapshot and the derived mouse/keyboard timing state.
use super::*;

/// Number of tracked mouse buttons.
pub const MOUSE_BUTTON_COUNT: usize = 5;
/// Number of tracked key codes.
pub const KEY_COUNT: usize = 512;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(usize)]
/// Mouse buttons tracked by [`Input`].
pub enum MouseButton {
    /// Primary button.
    Left = 0,
    /// Secondary button.
    Right = 1,
    /// Wheel button.
    Middle = 2,
}

#[derive(Copy, Clone, Debug)]
/// Timing and threshold knobs shared by the input processing and the interaction helpers.
pub struct InputConfig {
    /// Distance in pixels before a held click turns into a drag.
    pub mouse_drag_threshold: f32,
    /// Maximum delay between two clicks to form a double click, in seconds.
    pub mouse_double_click_time: f32,
    /// Maximum distance between two clicks to form a double click.
    pub mouse_double_click_max_dist: f32,
    /// Delay before a held key or button starts repeating, in seconds.
    pub key_repeat_delay: f32,
    /// Interval between repeats, in seconds.
    pub key_repeat_rate: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_drag_threshold: 6.0,
            mouse_double_click_time: 0.30,
            mouse_double_click_max_dist: 6.0,
            key_repeat_delay: 0.25,
            key_repeat_rate: 0.05,
        }
    }
}

/// Raw input fed by the host plus the per-frame state derived from it in `new_frame`.
///
/// Durations are `-1.0` while a button or key is released, `0.0` on the frame it goes down,
/// and grow by `delta_time` every frame it stays down.
#[derive(Clone, Debug)]
pub struct Input {
    /// Seconds elapsed since the previous frame.
    pub delta_time: f32,
    /// Current pointer position. Negative coordinates mean "unavailable".
    pub mouse_pos: Vec2f,
    pub(crate) mouse_pos_prev: Vec2f,
    /// Pointer motion since the previous frame.
    pub mouse_delta: Vec2f,
    /// Host-provided button states.
    pub mouse_down: [bool; MOUSE_BUTTON_COUNT],
    /// Vertical wheel motion accumulated this frame.
    pub mouse_wheel: f32,
    pub(crate) mouse_clicked: [bool; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_double_clicked: [bool; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_released: [bool; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_down_duration: [f32; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_down_duration_prev: [f32; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_clicked_pos: [Vec2f; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_clicked_time: [f64; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_drag_max_distance_sqr: [f32; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_drag_max_distance_abs: [Vec2f; MOUSE_BUTTON_COUNT],
    /// Host-provided key states.
    pub keys_down: Vec<bool>,
    pub(crate) keys_down_duration: Vec<f32>,
    pub(crate) keys_down_duration_prev: Vec<f32>,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            delta_time: 1.0 / 60.0,
            mouse_pos: vec2f(-f32::MAX, -f32::MAX),
            mouse_pos_prev: vec2f(-f32::MAX, -f32::MAX),
            mouse_delta: Vec2f::default(),
            mouse_down: [false; MOUSE_BUTTON_COUNT],
            mouse_wheel: 0.0,
            mouse_clicked: [false; MOUSE_BUTTON_COUNT],
            mouse_double_clicked: [false; MOUSE_BUTTON_COUNT],
            mouse_released: [false; MOUSE_BUTTON_COUNT],
            mouse_down_duration: [-1.0; MOUSE_BUTTON_COUNT],
            mouse_down_duration_prev: [-1.0; MOUSE_BUTTON_COUNT],
            mouse_clicked_pos: [Vec2f::default(); MOUSE_BUTTON_COUNT],
            mouse_clicked_time: [0.0; MOUSE_BUTTON_COUNT],
            mouse_drag_max_distance_sqr: [0.0; MOUSE_BUTTON_COUNT],
            mouse_drag_max_distance_abs: [Vec2f::default(); MOUSE_BUTTON_COUNT],
            keys_down: vec![false; KEY_COUNT],
            keys_down_duration: vec![-1.0; KEY_COUNT],
            keys_down_duration_prev: vec![-1.0; KEY_COUNT],
        }
    }
}

fn is_valid_pos(p: Vec2f) -> bool { p.x >= -256_000.0 && p.y >= -256_000.0 }

fn dist_sqr(a: Vec2f, b: Vec2f) -> f32 {
    let (dx, dy) = (a.x - b.x, a.y - b.y);
    dx * dx + dy * dy
}

impl Input {
    /// Records the pointer position.
    pub fn mousemove(&mut self, x: f32, y: f32) { self.mouse_pos = vec2f(x, y); }

    /// Records a button press.
    pub fn mousedown(&mut self, btn: MouseButton) { self.mouse_down[btn as usize] = true; }

    /// Records a button release.
    pub fn mouseup(&mut self, btn: MouseButton) { self.mouse_down[btn as usize] = false; }

    /// Accumulates wheel motion.
    pub fn scroll(&mut self, dy: f32) { self.mouse_wheel += dy; }

    /// Records a key press.
    pub fn keydown(&mut self, key: usize) {
        if let Some(k) = self.keys_down.get_mut(key) {
            *k = true;
        }
    }

    /// Records a key release.
    pub fn keyup(&mut self, key: usize) {
        if let Some(k) = self.keys_down.get_mut(key) {
            *k = false;
        }
    }

    /// Returns `true` while the button is held.
    pub fn is_mouse_down(&self, btn: MouseButton) -> bool { self.mouse_down[btn as usize] }

    /// Returns `true` on the frame the button went down.
    pub fn is_mouse_clicked(&self, btn: MouseButton) -> bool { self.mouse_clicked[btn as usize] }

    /// Returns `true` on the frame a second click completed a double click.
    pub fn is_mouse_double_clicked(&self, btn: MouseButton) -> bool { self.mouse_double_clicked[btn as usize] }

    /// Returns `true` on the frame the button was released.
    pub fn is_mouse_released(&self, btn: MouseButton) -> bool { self.mouse_released[btn as usize] }

    /// Seconds the button has been held, `-1.0` when released.
    pub fn mouse_down_duration(&self, btn: MouseButton) -> f32 { self.mouse_down_duration[btn as usize] }

    /// Largest squared distance travelled since the button went down.
    pub fn mouse_drag_max_distance_sqr(&self, btn: MouseButton) -> f32 { self.mouse_drag_max_distance_sqr[btn as usize] }

    /// Largest per-axis distance travelled since the button went down.
    pub fn mouse_drag_max_distance_abs(&self, btn: MouseButton) -> Vec2f { self.mouse_drag_max_distance_abs[btn as usize] }

    /// Position where the button last went down.
    pub fn mouse_clicked_pos(&self, btn: MouseButton) -> Vec2f { self.mouse_clicked_pos[btn as usize] }

    /// Returns `true` while the key is held.
    pub fn is_key_down(&self, key: usize) -> bool { self.keys_down.get(key).copied().unwrap_or(false) }

    /// Seconds the key has been held, `-1.0` when released.
    pub fn key_down_duration(&self, key: usize) -> f32 { self.keys_down_duration.get(key).copied().unwrap_or(-1.0) }

    pub(crate) fn key_down_duration_prev(&self, key: usize) -> f32 { self.keys_down_duration_prev.get(key).copied().unwrap_or(-1.0) }

    /// Derives clicks, releases, durations and drag distances from the raw states.
    pub(crate) fn update(&mut self, time: f64, cfg: &InputConfig) {
        for (prev, cur) in self.keys_down_duration_prev.iter_mut().zip(self.keys_down_duration.iter_mut()) {
            *prev = *cur;
        }
        for (i, down) in self.keys_down.iter().enumerate() {
            let d = self.keys_down_duration[i];
            self.keys_down_duration[i] = match (*down, d < 0.0) {
                (true, true) => 0.0,
                (true, false) => d + self.delta_time,
                (false, _) => -1.0,
            };
        }

        if is_valid_pos(self.mouse_pos) {
            self.mouse_pos = vec2f(self.mouse_pos.x.floor(), self.mouse_pos.y.floor());
        }
        // a teleporting or unavailable pointer yields no delta
        self.mouse_delta = if is_valid_pos(self.mouse_pos) && is_valid_pos(self.mouse_pos_prev) {
            vec2f(self.mouse_pos.x - self.mouse_pos_prev.x, self.mouse_pos.y - self.mouse_pos_prev.y)
        } else {
            Vec2f::default()
        };
        self.mouse_pos_prev = self.mouse_pos;

        for i in 0..MOUSE_BUTTON_COUNT {
            let down = self.mouse_down[i];
            let dur = self.mouse_down_duration[i];
            self.mouse_clicked[i] = down && dur < 0.0;
            self.mouse_released[i] = !down && dur >= 0.0;
            self.mouse_down_duration_prev[i] = dur;
            self.mouse_down_duration[i] = if down { if dur < 0.0 { 0.0 } else { dur + self.delta_time } } else { -1.0 };
            self.mouse_double_clicked[i] = false;
            if self.mouse_clicked[i] {
                if time - self.mouse_clicked_time[i] < cfg.mouse_double_click_time as f64 {
                    let delta_from_click = if is_valid_pos(self.mouse_pos) { dist_sqr(self.mouse_pos, self.mouse_clicked_pos[i]) } else { 0.0 };
                    if delta_from_click < cfg.mouse_double_click_max_dist * cfg.mouse_double_click_max_dist {
                        self.mouse_double_clicked[i] = true;
                    }
                    // a third click must not form another double click
                    self.mouse_clicked_time[i] = -f64::MAX;
                } else {
                    self.mouse_clicked_time[i] = time;
                }
                self.mouse_clicked_pos[i] = self.mouse_pos;
                self.mouse_drag_max_distance_sqr[i] = 0.0;
                self.mouse_drag_max_distance_abs[i] = Vec2f::default();
            } else if down && is_valid_pos(self.mouse_pos) {
                let click = self.mouse_clicked_pos[i];
                let abs = &mut self.mouse_drag_max_distance_abs[i];
                abs.x = abs.x.max((self.mouse_pos.x - click.x).abs());
                abs.y = abs.y.max((self.mouse_pos.y - click.y).abs());
                self.mouse_drag_max_distance_sqr[i] = self.mouse_drag_max_distance_sqr[i].max(dist_sqr(self.mouse_pos, click));
            }
        }
    }

    /// Clears the per-frame accumulators once the frame has been processed.
    pub(crate) fn end_frame(&mut self) { self.mouse_wheel = 0.0; }
}

/// Counts how many times a repeating action fires between `t0` and `t1`.
///
/// Returns 1 when the hold starts, then one per `rate` interval after `repeat_delay`.
pub fn calc_typematic_repeat_amount(t0: f32, t1: f32, repeat_delay: f32, repeat_rate: f32) -> i32 {
    if t1 == 0.0 {
        return 1;
    }
    if t0 >= t1 {
        return 0;
    }
    if repeat_rate <= 0.0 {
        return i32::from(t0 < repeat_delay && t1 >= repeat_delay);
    }
    let count_t0 = if t0 < repeat_delay { -1 } else { ((t0 - repeat_delay) / repeat_rate) as i32 };
    let count_t1 = if t1 < repeat_delay { -1 } else { ((t1 - repeat_delay) / repeat_rate) as i32 };
    count_t1 - count_t0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_then_hold_then_release() {
        let cfg = InputConfig::default();
        let mut input = Input::default();
        input.mousemove(10.0, 10.0);
        input.mousedown(MouseButton::Left);
        input.update(0.0, &cfg);
        assert!(input.is_mouse_clicked(MouseButton::Left));
        assert_eq!(input.mouse_down_duration(MouseButton::Left), 0.0);

        input.mousemove(14.0, 13.0);
        input.update(0.016, &cfg);
        assert!(!input.is_mouse_clicked(MouseButton::Left));
        assert!(input.mouse_down_duration(MouseButton::Left) > 0.0);
        assert_eq!(input.mouse_delta.x, 4.0);
        assert_eq!(input.mouse_drag_max_distance_sqr(MouseButton::Left), 25.0);

        input.mouseup(MouseButton::Left);
        input.update(0.032, &cfg);
        assert!(input.is_mouse_released(MouseButton::Left));
        assert_eq!(input.mouse_down_duration(MouseButton::Left), -1.0);
    }

    #[test]
    fn double_click_within_time_and_distance() {
        let cfg = InputConfig::default();
        let mut input = Input::default();
        input.mousemove(5.0, 5.0);
        input.mousedown(MouseButton::Left);
        input.update(1.0, &cfg);
        input.mouseup(MouseButton::Left);
        input.update(1.05, &cfg);
        input.mousedown(MouseButton::Left);
        input.update(1.1, &cfg);
        assert!(input.is_mouse_double_clicked(MouseButton::Left));
    }

    #[test]
    fn unavailable_pointer_has_no_delta() {
        let cfg = InputConfig::default();
        let mut input = Input::default();
        input.update(0.0, &cfg);
        input.mousemove(100.0, 100.0);
        input.update(0.016, &cfg);
        assert_eq!(input.mouse_delta.x, 0.0);
        assert_eq!(input.mouse_delta.y, 0.0);
    }

    #[test]
    fn key_durations_follow_state() {
        let cfg = InputConfig::default();
        let mut input = Input::default();
        input.keydown(42);
        input.update(0.0, &cfg);
        assert_eq!(input.key_down_duration(42), 0.0);
        input.update(0.016, &cfg);
        assert!(input.key_down_duration(42) > 0.0);
        assert_eq!(input.key_down_duration_prev(42), 0.0);
        input.keyup(42);
        input.update(0.032, &cfg);
        assert_eq!(input.key_down_duration(42), -1.0);
        assert!(!input.is_key_down(KEY_COUNT + 10));
    }

    #[test]
    fn typematic_repeat_counts() {
        assert_eq!(calc_typematic_repeat_amount(-1.0, 0.0, 0.25, 0.05), 1);
        assert_eq!(calc_typematic_repeat_amount(0.1, 0.2, 0.25, 0.05), 0);
        assert_eq!(calc_typematic_repeat_amount(0.2, 0.26, 0.25, 0.05), 1);
        assert_eq!(calc_typematic_repeat_amount(0.3, 0.3, 0.25, 0.05), 0);
    }
}
