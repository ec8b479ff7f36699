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
#![deny(missing_docs)]
//! `imcore-redux` is the core of an immediate-mode GUI: the per-frame state machine that turns a
//! sequence of widget calls into an implicit layout and a minimal set of GPU-ready draw commands.
//!
//! The crate covers draw list generation (paths, anti-aliased strokes and fills, clip/texture
//! batching), out-of-order channel splitting, frame draw data aggregation, the tab bar state
//! machine and the drag and drop controller. Everything hangs off an explicit [`Context`]; there
//! is no global state, so independent UI sessions can coexist.

#[macro_use]
mod contract;

mod context;
mod drag_drop;
mod draw_data;
mod draw_list;
mod error;
mod font;
mod id_stack;
mod input;
mod interaction;
mod layout;
mod pool;
mod splitter;
mod tab_bar;
mod window;

pub use context::*;
pub use drag_drop::*;
pub use draw_data::*;
pub use draw_list::*;
pub use error::*;
pub use font::*;
pub use id_stack::*;
pub use input::*;
pub use interaction::*;
pub use layout::*;
pub use pool::*;
pub use rs_math3d::*;
pub use splitter::*;
pub use tab_bar::*;
pub use window::*;

use bitflags::*;

#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
/// Hashed widget identifier. Zero means "no identifier".
pub struct Id(u32);

impl Id {
    /// The empty identifier.
    pub const NONE: Id = Id(0);

    /// Wraps a raw hash value.
    pub const fn new(raw: u32) -> Self { Self(raw) }

    /// Returns the raw hash value.
    pub fn raw(self) -> u32 { self.0 }

    /// Returns `true` for the empty identifier.
    pub fn is_none(self) -> bool { self.0 == 0 }

    /// Returns `true` for any identifier other than [`Id::NONE`].
    pub fn is_some(self) -> bool { self.0 != 0 }
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Handle referencing a renderer-owned texture.
pub struct TextureId(u32);

impl TextureId {
    /// Wraps a renderer texture handle.
    pub const fn new(raw: u32) -> Self { Self(raw) }

    /// Returns the raw numeric identifier stored inside the handle.
    pub fn raw(self) -> u32 { self.0 }
}

/// Mask selecting the alpha byte of a packed color.
pub const COL32_A_MASK: u32 = 0xFF00_0000;
/// Opaque white.
pub const COL32_WHITE: u32 = 0xFFFF_FFFF;
/// Opaque black.
pub const COL32_BLACK: u32 = 0xFF00_0000;

/// Packs 8-bit channels into the `ABGR` layout used by [`DrawVert::col`].
pub const fn col32(r: u8, g: u8, b: u8, a: u8) -> u32 { ((a as u32) << 24) | ((b as u32) << 16) | ((g as u32) << 8) | (r as u32) }

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Builds a color from its four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self { Self { r, g, b, a } }

    /// Packs the color for vertex output.
    pub fn to_u32(self) -> u32 { col32(self.r, self.g, self.b, self.a) }

    /// Returns the color with its alpha multiplied by `factor` (clamped to `0..=1`).
    pub fn scale_alpha(self, factor: f32) -> Self {
        let a = (self.a as f32 * saturate(factor)).round() as u8;
        Self { a, ..self }
    }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[repr(u32)]
/// Identifiers for each of the built-in style colors.
pub enum StyleColor {
    /// Default text color.
    Text = 0,
    /// Window background.
    WindowBg = 1,
    /// Window and tab outlines.
    Border = 2,
    /// Title bar of an unfocused window.
    TitleBg = 3,
    /// Title bar of the focused window.
    TitleBgActive = 4,
    /// Button at rest.
    Button = 5,
    /// Button under the pointer.
    ButtonHovered = 6,
    /// Button being held.
    ButtonActive = 7,
    /// Tab at rest.
    Tab = 8,
    /// Tab under the pointer.
    TabHovered = 9,
    /// Selected tab of a focused bar.
    TabActive = 10,
    /// Tab of an unfocused bar.
    TabUnfocused = 11,
    /// Selected tab of an unfocused bar.
    TabUnfocusedActive = 12,
    /// Outline drawn around an accepting drop target.
    DragDropTarget = 13,
}

impl StyleColor {
    /// Number of color entries in [`Style::colors`].
    pub const COUNT: usize = 14;
}

#[derive(Copy, Clone, Debug)]
/// Collection of visual constants that drive widget appearance and tessellation quality.
pub struct Style {
    /// Global alpha applied to every style color.
    pub alpha: f32,
    /// Padding between a window frame and its contents.
    pub window_padding: Vec2f,
    /// Thickness of window borders, zero disables them.
    pub window_border_size: f32,
    /// Padding inside framed widgets (buttons, tabs).
    pub frame_padding: Vec2f,
    /// Spacing between consecutive items.
    pub item_spacing: Vec2f,
    /// Spacing between the elements of a composite item.
    pub item_inner_spacing: Vec2f,
    /// Horizontal offset applied by `indent`.
    pub indent_spacing: f32,
    /// Corner rounding of tabs.
    pub tab_rounding: f32,
    /// Thickness of tab outlines, zero disables them.
    pub tab_border_size: f32,
    /// Minimum width for an unselected tab to show its close button.
    pub tab_min_width_for_unselected_close_button: f32,
    /// Enables anti-aliased strokes.
    pub anti_aliased_lines: bool,
    /// Enables anti-aliased fills.
    pub anti_aliased_fill: bool,
    /// Bezier tessellation tolerance, smaller is finer.
    pub curve_tessellation_tol: f32,
    /// Palette of [`StyleColor`] entries.
    pub colors: [Color; StyleColor::COUNT],
}

impl Style {
    /// Returns the packed color for `idx` with the global alpha applied.
    pub fn color_u32(&self, idx: StyleColor) -> u32 { self.colors[idx as usize].scale_alpha(self.alpha).to_u32() }

    /// Returns the packed color for `idx` with the global alpha and an extra factor applied.
    pub fn color_u32_alpha(&self, idx: StyleColor, alpha_mul: f32) -> u32 { self.colors[idx as usize].scale_alpha(self.alpha * alpha_mul).to_u32() }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            window_padding: vec2f(8.0, 8.0),
            window_border_size: 1.0,
            frame_padding: vec2f(4.0, 3.0),
            item_spacing: vec2f(8.0, 4.0),
            item_inner_spacing: vec2f(4.0, 4.0),
            indent_spacing: 21.0,
            tab_rounding: 4.0,
            tab_border_size: 0.0,
            tab_min_width_for_unselected_close_button: 0.0,
            anti_aliased_lines: true,
            anti_aliased_fill: true,
            curve_tessellation_tol: 1.25,
            colors: [
                Color::rgba(255, 255, 255, 255),
                Color::rgba(15, 15, 15, 240),
                Color::rgba(110, 110, 128, 128),
                Color::rgba(10, 10, 10, 255),
                Color::rgba(41, 74, 122, 255),
                Color::rgba(66, 150, 250, 102),
                Color::rgba(66, 150, 250, 255),
                Color::rgba(15, 135, 250, 255),
                Color::rgba(46, 89, 148, 220),
                Color::rgba(66, 150, 250, 204),
                Color::rgba(51, 105, 173, 255),
                Color::rgba(17, 26, 38, 248),
                Color::rgba(35, 67, 108, 255),
                Color::rgba(255, 255, 0, 230),
            ],
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Capabilities advertised by the renderer back-end.
    pub struct BackendFlags : u32 {
        /// The renderer honors [`DrawCmd::vtx_offset`], allowing more than 64K vertices per list with 16-bit indices.
        const RENDERER_HAS_VTX_OFFSET = 1 << 3;
    }
}

impl BackendFlags {
    /// Returns `true` if the renderer supports vertex offsets.
    pub fn has_vtx_offset(&self) -> bool { self.intersects(Self::RENDERER_HAS_VTX_OFFSET) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Condition under which a "set" operation takes effect.
pub enum Cond {
    /// Apply on every call.
    #[default]
    Always,
    /// Apply once per runtime session (first call wins).
    Once,
    /// Apply only if the object has never been seen before.
    FirstUseEver,
    /// Apply when the object is appearing after being hidden.
    Appearing,
}

#[derive(Default, Copy, Clone, Debug)]
/// Axis-aligned rectangle stored as min/max corners in screen space.
pub struct Rect {
    /// Upper-left corner.
    pub min: Vec2f,
    /// Lower-right corner.
    pub max: Vec2f,
}

impl Rect {
    /// Builds a rectangle from its corner coordinates.
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self { Self { min: vec2f(min_x, min_y), max: vec2f(max_x, max_y) } }

    /// Builds a rectangle from its corners.
    pub fn from_min_max(min: Vec2f, max: Vec2f) -> Self { Self { min, max } }

    /// Builds a rectangle from a position and a size.
    pub fn from_pos_size(pos: Vec2f, size: Vec2f) -> Self { Self::new(pos.x, pos.y, pos.x + size.x, pos.y + size.y) }

    /// Horizontal extent.
    pub fn width(&self) -> f32 { self.max.x - self.min.x }

    /// Vertical extent.
    pub fn height(&self) -> f32 { self.max.y - self.min.y }

    /// Width and height as a vector.
    pub fn size(&self) -> Vec2f { vec2f(self.width(), self.height()) }

    /// Surface of the rectangle.
    pub fn area(&self) -> f32 { self.width() * self.height() }

    /// Center point.
    pub fn center(&self) -> Vec2f { vec2f((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5) }

    /// Returns `true` if `p` lies inside (min inclusive, max exclusive).
    pub fn contains_point(&self, p: Vec2f) -> bool { p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y }

    /// Returns `true` if `r` lies entirely inside this rectangle.
    pub fn contains_rect(&self, r: &Rect) -> bool { r.min.x >= self.min.x && r.min.y >= self.min.y && r.max.x <= self.max.x && r.max.y <= self.max.y }

    /// Returns `true` if both rectangles share some area.
    pub fn overlaps(&self, r: &Rect) -> bool { r.min.y < self.max.y && r.max.y > self.min.y && r.min.x < self.max.x && r.max.x > self.min.x }

    /// Grows the rectangle by `amount` on every side.
    pub fn expand(&self, amount: f32) -> Rect { Rect::new(self.min.x - amount, self.min.y - amount, self.max.x + amount, self.max.y + amount) }

    /// Intersects with `clip`, keeping the result well-formed.
    pub fn clip_with(&self, clip: &Rect) -> Rect {
        let min = vec2f(self.min.x.max(clip.min.x), self.min.y.max(clip.min.y));
        let max = vec2f(self.max.x.min(clip.max.x), self.max.y.min(clip.max.y));
        Rect::new(min.x, min.y, max.x.max(min.x), max.y.max(min.y))
    }

    /// Returns the rectangle translated by `d`.
    pub fn translate(&self, d: Vec2f) -> Rect { Rect::new(self.min.x + d.x, self.min.y + d.y, self.max.x + d.x, self.max.y + d.y) }

    /// Converts to the `(x1, y1, x2, y2)` clip layout used by draw commands.
    pub fn to_clip_rect(&self) -> ClipRect {
        ClipRect {
            x1: self.min.x,
            y1: self.min.y,
            x2: self.max.x,
            y2: self.max.y,
        }
    }
}

/// Shorthand constructor for [`Vec2f`].
pub fn vec2f(x: f32, y: f32) -> Vec2f { Vec2f { x, y } }

pub(crate) fn saturate(f: f32) -> f32 { f.clamp(0.0, 1.0) }

pub(crate) fn linear_sweep(current: f32, target: f32, speed: f32) -> f32 {
    if current < target {
        return (current + speed).min(target);
    }
    if current > target {
        return (current - speed).max(target);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_colors_abgr() {
        assert_eq!(col32(0x11, 0x22, 0x33, 0x44), 0x4433_2211);
        assert_eq!(Color::rgba(255, 255, 255, 255).to_u32(), COL32_WHITE);
        assert_eq!(Color::rgba(255, 0, 0, 255).scale_alpha(0.0).to_u32() & COL32_A_MASK, 0);
    }

    #[test]
    fn rect_queries() {
        let r = Rect::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(r.width(), 10.0);
        assert_eq!(r.area(), 200.0);
        assert!(r.contains_point(vec2f(5.0, 5.0)));
        assert!(!r.contains_point(vec2f(10.0, 5.0)));
        assert!(r.overlaps(&Rect::new(9.0, 19.0, 30.0, 30.0)));
        assert!(!r.overlaps(&Rect::new(10.0, 0.0, 30.0, 30.0)));
        let c = Rect::new(5.0, 5.0, 50.0, 8.0).clip_with(&r);
        assert_eq!((c.min.x, c.min.y, c.max.x, c.max.y), (5.0, 5.0, 10.0, 8.0));
    }

    #[test]
    fn linear_sweep_stops_at_target() {
        assert_eq!(linear_sweep(0.0, 10.0, 4.0), 4.0);
        assert_eq!(linear_sweep(8.0, 10.0, 4.0), 10.0);
        assert_eq!(linear_sweep(10.0, 2.0, 4.0), 6.0);
        assert_eq!(linear_sweep(3.0, 3.0, 4.0), 3.0);
    }
}
