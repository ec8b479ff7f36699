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
//! Font service boundary: measuring text and emitting glyph quads into a draw list.
use super::*;

/// Describes the interface the core uses to measure and render text.
///
/// Glyph rasterization and atlas packing live outside the core; an implementation only has to
/// produce quads in the [`DrawVert`] format using its atlas texture.
pub trait Font {
    /// Base pixel size of the font.
    fn font_size(&self) -> f32;
    /// Texture holding the glyphs.
    fn texture_id(&self) -> TextureId;
    /// UV of an opaque white texel of the texture, used by untextured primitives.
    fn tex_uv_white_pixel(&self) -> Vec2f;
    /// Size of `text` rendered at `size`, wrapping at `wrap_width` when it is positive.
    fn calc_text_size(&self, size: f32, text: &str, wrap_width: f32) -> Vec2f;
    /// Emits the glyph quads of `text` into `dl`.
    ///
    /// Glyphs entirely outside `clip` are skipped. With `cpu_fine_clip`, glyphs straddling the
    /// rectangle are cut on the CPU instead of relying on the scissor.
    #[allow(clippy::too_many_arguments)]
    fn render_text(&self, dl: &mut DrawList, size: f32, pos: Vec2f, col: u32, clip: ClipRect, text: &str, wrap_width: f32, cpu_fine_clip: bool);
}

#[derive(Copy, Clone, Debug)]
/// Fixed advance font that draws every visible glyph as a solid box.
///
/// Useful headless and in tests, where only the layout metrics matter.
pub struct MonospaceFont {
    /// Base pixel size.
    pub size: f32,
    /// Horizontal advance as a fraction of the size.
    pub advance_ratio: f32,
    /// Texture bound while drawing.
    pub texture: TextureId,
    /// UV used for every glyph vertex.
    pub uv_white_pixel: Vec2f,
}

impl Default for MonospaceFont {
    fn default() -> Self {
        Self {
            size: 13.0,
            advance_ratio: 0.5,
            texture: TextureId::default(),
            uv_white_pixel: Vec2f::default(),
        }
    }
}

impl MonospaceFont {
    fn advance(&self, size: f32) -> f32 { size * self.advance_ratio }

    // (column, line) of every visible glyph, plus the widest line in columns and the line count
    fn walk_glyphs<F: FnMut(usize, usize, char)>(&self, size: f32, text: &str, wrap_width: f32, mut f: F) -> (usize, usize) {
        let advance = self.advance(size);
        let max_cols = if wrap_width > 0.0 && advance > 0.0 { ((wrap_width / advance).floor() as usize).max(1) } else { usize::MAX };
        let (mut col, mut line, mut widest) = (0usize, 0usize, 0usize);
        for c in text.chars() {
            match c {
                '\n' => {
                    line += 1;
                    col = 0;
                }
                '\r' => (),
                _ => {
                    if col >= max_cols {
                        line += 1;
                        col = 0;
                    }
                    if !c.is_whitespace() {
                        f(col, line, c);
                    }
                    col += 1;
                    widest = widest.max(col);
                }
            }
        }
        (widest, line + 1)
    }
}

impl Font for MonospaceFont {
    fn font_size(&self) -> f32 { self.size }

    fn texture_id(&self) -> TextureId { self.texture }

    fn tex_uv_white_pixel(&self) -> Vec2f { self.uv_white_pixel }

    fn calc_text_size(&self, size: f32, text: &str, wrap_width: f32) -> Vec2f {
        if text.is_empty() {
            return vec2f(0.0, size);
        }
        let (cols, lines) = self.walk_glyphs(size, text, wrap_width, |_, _, _| ());
        vec2f(cols as f32 * self.advance(size), lines as f32 * size)
    }

    fn render_text(&self, dl: &mut DrawList, size: f32, pos: Vec2f, col: u32, clip: ClipRect, text: &str, wrap_width: f32, cpu_fine_clip: bool) {
        let advance = self.advance(size);
        let pos = vec2f(pos.x.floor(), pos.y.floor());
        let mut glyphs = Vec::new();
        self.walk_glyphs(size, text, wrap_width, |c, l, _| {
            let x1 = pos.x + c as f32 * advance;
            let y1 = pos.y + l as f32 * size;
            let (x2, y2) = (x1 + advance * 0.8, y1 + size * 0.9);
            if x2 <= clip.x1 || y2 <= clip.y1 || x1 >= clip.x2 || y1 >= clip.y2 {
                return;
            }
            let (x1, y1, x2, y2) = if cpu_fine_clip { (x1.max(clip.x1), y1.max(clip.y1), x2.min(clip.x2), y2.min(clip.y2)) } else { (x1, y1, x2, y2) };
            glyphs.push((vec2f(x1, y1), vec2f(x2, y2)));
        });
        if glyphs.is_empty() {
            return;
        }

        dl.prim_reserve(glyphs.len() * 6, glyphs.len() * 4);
        for (a, b) in glyphs {
            dl.prim_rect_uv(a, b, self.uv_white_pixel, self.uv_white_pixel, col);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_lines_and_wraps() {
        let font = MonospaceFont::default();
        let s = font.calc_text_size(10.0, "abcd", 0.0);
        assert_eq!((s.x, s.y), (20.0, 10.0));
        let s = font.calc_text_size(10.0, "ab\nabcdef", 0.0);
        assert_eq!((s.x, s.y), (30.0, 20.0));
        let s = font.calc_text_size(10.0, "abcdef", 12.0);
        assert_eq!((s.x, s.y), (10.0, 30.0));
    }

    #[test]
    fn renders_one_quad_per_visible_glyph() {
        let font = MonospaceFont::default();
        let mut dl = DrawList::default();
        dl.add_text(&font, 10.0, vec2f(0.0, 0.0), COL32_WHITE, "a b", 0.0, None);
        assert_eq!(dl.vtx_buffer.len(), 8);
        assert_eq!(dl.idx_buffer.len(), 12);
    }

    #[test]
    fn clipped_glyphs_are_skipped() {
        let font = MonospaceFont::default();
        let mut dl = DrawList::default();
        dl.push_clip_rect(vec2f(0.0, 0.0), vec2f(12.0, 100.0), false);
        dl.add_text(&font, 10.0, vec2f(0.0, 0.0), COL32_WHITE, "abcdef", 0.0, None);
        assert_eq!(dl.vtx_buffer.len(), 12);

        dl.add_text(&font, 10.0, vec2f(0.0, 20.0), COL32_WHITE, "abcdef", 0.0, Some(ClipRect::new(0.0, 0.0, 7.0, 100.0)));
        let last = dl.vtx_buffer.last().unwrap();
        assert!(last.pos.x <= 7.0);
    }
}
