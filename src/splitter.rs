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
//! Out-of-order batching: a draw list's command and index buffers split into channels.
use super::*;

#[derive(Clone, Default, Debug)]
/// Command and index buffers of one channel while it is not the active one.
pub struct DrawChannel {
    pub(crate) cmd_buffer: Vec<DrawCmd>,
    pub(crate) idx_buffer: Vec<DrawIdx>,
}

/// Splits a [`DrawList`] into channels that can be filled in any order and merged back in channel order.
///
/// The active channel's buffers live in the draw list itself; its slot here is left empty until
/// the next switch moves them back. Vertices are never split, only commands and indices.
#[derive(Clone, Debug)]
pub struct DrawListSplitter {
    current: usize,
    count: usize,
    channels: Vec<DrawChannel>,
}

impl Default for DrawListSplitter {
    fn default() -> Self {
        Self {
            current: 0,
            count: 1,
            channels: Vec::new(),
        }
    }
}

impl DrawListSplitter {
    /// Active channel index.
    pub fn current(&self) -> usize { self.current }

    /// Number of channels in use.
    pub fn count(&self) -> usize { self.count }

    /// Returns to the unsplit state, keeping channel allocations for reuse.
    pub fn clear(&mut self) {
        self.current = 0;
        self.count = 1;
    }

    /// Returns to the unsplit state and releases every channel.
    pub fn clear_free_memory(&mut self) {
        self.clear();
        self.channels = Vec::new();
    }

    /// Splits `dl` into `count` channels, channel 0 keeping the list's current content.
    pub fn split(&mut self, dl: &mut DrawList, count: usize) {
        contract_check!(self.current == 0 && self.count <= 1, "split called while already split ({} channels)", self.count);
        if self.current != 0 || self.count > 1 || count == 0 {
            return;
        }
        if self.channels.len() < count {
            self.channels.resize_with(count, DrawChannel::default);
        }
        self.count = count;

        // channel 0 is the draw list itself until the first switch
        self.channels[0].cmd_buffer.clear();
        self.channels[0].idx_buffer.clear();
        let seed = DrawCmd {
            clip_rect: dl.current_clip_rect(),
            texture_id: dl.current_texture_id(),
            vtx_offset: dl.vtx_current_offset as u32,
            ..DrawCmd::default()
        };
        for ch in &mut self.channels[1..count] {
            ch.cmd_buffer.clear();
            ch.idx_buffer.clear();
            ch.cmd_buffer.push(seed.clone());
        }
    }

    /// Makes channel `idx` the one receiving primitives.
    pub fn set_current_channel(&mut self, dl: &mut DrawList, idx: usize) {
        contract_check!(idx < self.count, "channel {} out of range (count {})", idx, self.count);
        if idx >= self.count || self.current == idx {
            return;
        }
        let old = &mut self.channels[self.current];
        std::mem::swap(&mut old.cmd_buffer, &mut dl.cmd_buffer);
        std::mem::swap(&mut old.idx_buffer, &mut dl.idx_buffer);
        self.current = idx;
        let new = &mut self.channels[idx];
        std::mem::swap(&mut new.cmd_buffer, &mut dl.cmd_buffer);
        std::mem::swap(&mut new.idx_buffer, &mut dl.idx_buffer);
        dl.sync_write_cursors();
    }

    /// Concatenates every channel back into `dl` in channel order.
    ///
    /// Index offsets are recomputed as commands are appended, and the first command of a channel
    /// is folded into the last one of the previous channel when they share clip rect, texture and
    /// vertex offset.
    #[inline(never)]
    pub fn merge(&mut self, dl: &mut DrawList) {
        if self.count <= 1 {
            return;
        }

        self.set_current_channel(dl, 0);
        pop_trailing_empty(&mut dl.cmd_buffer);

        let mut idx_offset = dl.idx_buffer.len() as u32;
        for ch in &mut self.channels[1..self.count] {
            pop_trailing_empty(&mut ch.cmd_buffer);
            let mut first = true;
            for mut cmd in ch.cmd_buffer.drain(..) {
                if std::mem::take(&mut first) {
                    if let Some(last) = dl.cmd_buffer.last_mut() {
                        if last.can_merge(&cmd) {
                            last.elem_count += cmd.elem_count;
                            idx_offset += cmd.elem_count;
                            continue;
                        }
                    }
                }
                cmd.idx_offset = idx_offset;
                idx_offset += cmd.elem_count;
                dl.cmd_buffer.push(cmd);
            }
            dl.idx_buffer.append(&mut ch.idx_buffer);
        }

        dl.sync_write_cursors();
        // instead of add_draw_cmd, so that empty channels leave no extra command behind
        dl.update_clip_rect();
        self.count = 1;
    }
}

fn pop_trailing_empty(cmds: &mut Vec<DrawCmd>) {
    if let Some(last) = cmds.last() {
        if last.elem_count == 0 && last.user_callback.is_none() {
            cmds.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RED: u32 = col32(255, 0, 0, 255);
    const BLUE: u32 = col32(0, 0, 255, 255);

    fn quad(dl: &mut DrawList, x: f32, col: u32) { dl.add_rect_filled(vec2f(x, 0.0), vec2f(x + 10.0, 10.0), col, 0.0, DrawCornerFlags::ALL); }

    #[test]
    fn merge_keeps_channel_order() {
        let mut dl = DrawList::default();
        dl.channels_split(2);
        dl.channels_set_current(1);
        quad(&mut dl, 0.0, RED);
        dl.channels_set_current(0);
        quad(&mut dl, 20.0, BLUE);
        dl.channels_merge();

        assert_eq!(dl.channels_count(), 1);
        assert_eq!(dl.cmd_buffer.len(), 1);
        assert_eq!(dl.cmd_buffer[0].elem_count, 12);
        assert_eq!(dl.idx_buffer.len(), 12);
        let first_color = dl.vtx_buffer[dl.idx_buffer[0] as usize].col;
        let last_color = dl.vtx_buffer[dl.idx_buffer[11] as usize].col;
        assert_eq!(first_color, BLUE);
        assert_eq!(last_color, RED);
    }

    #[test]
    fn seeded_channels_inherit_clip_rect() {
        let mut dl = DrawList::default();
        dl.push_clip_rect(vec2f(0.0, 0.0), vec2f(50.0, 50.0), false);
        dl.channels_split(3);
        dl.channels_set_current(2);
        assert_eq!(dl.cmd_buffer.len(), 1);
        assert_eq!(dl.cmd_buffer[0].clip_rect, ClipRect::new(0.0, 0.0, 50.0, 50.0));
        quad(&mut dl, 0.0, RED);
        dl.channels_set_current(1);
        dl.push_clip_rect(vec2f(0.0, 0.0), vec2f(10.0, 10.0), false);
        quad(&mut dl, 0.0, BLUE);
        dl.pop_clip_rect();
        dl.channels_merge();

        // channel 1 ends with a different clip rect, so channel 2 cannot fold into it
        let counts: Vec<u32> = dl.cmd_buffer.iter().map(|c| c.elem_count).collect();
        assert_eq!(counts, vec![6, 6]);
        assert_eq!(dl.cmd_buffer[1].idx_offset, 6);
        assert_eq!(dl.cmd_buffer[1].clip_rect, ClipRect::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn merge_without_split_is_noop() {
        let mut dl = DrawList::default();
        quad(&mut dl, 0.0, RED);
        dl.channels_merge();
        assert_eq!(dl.cmd_buffer.len(), 1);
        assert_eq!(dl.idx_buffer.len(), 6);
    }

    #[test]
    fn empty_channels_leave_no_command() {
        let mut dl = DrawList::default();
        quad(&mut dl, 0.0, RED);
        dl.channels_split(4);
        dl.channels_set_current(3);
        dl.channels_merge();
        assert_eq!(dl.cmd_buffer.len(), 1);
        quad(&mut dl, 0.0, RED);
        assert_eq!(dl.cmd_buffer.len(), 1);
        assert_eq!(dl.cmd_buffer[0].elem_count, 12);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "already split")]
    fn nested_split_is_a_contract_violation() {
        let mut dl = DrawList::default();
        dl.channels_split(2);
        dl.channels_split(2);
    }

    proptest! {
        #[test]
        fn merge_is_union_in_channel_order(writes in prop::collection::vec((0usize..4, 0u8..3), 1..40)) {
            let channels = 4;
            let mut dl = DrawList::default();
            dl.channels_split(channels);
            let mut per_channel: Vec<Vec<u32>> = vec![Vec::new(); channels];
            let mut cmds_before = 0;
            for (i, (ch, tex)) in writes.iter().enumerate() {
                dl.channels_set_current(*ch);
                let col = col32(i as u8, *ch as u8, 7, 255);
                dl.add_image(TextureId::new(*tex as u32), vec2f(0.0, 0.0), vec2f(4.0, 4.0), vec2f(0.0, 0.0), vec2f(1.0, 1.0), col);
                per_channel[*ch].push(col);
            }
            for ch in 0..channels {
                dl.channels_set_current(ch);
                cmds_before += dl.cmd_buffer.iter().filter(|c| c.elem_count > 0).count();
            }
            dl.channels_merge();

            let expected: Vec<u32> = per_channel.concat();
            let merged: Vec<u32> = dl.idx_buffer.chunks(6).map(|q| dl.vtx_buffer[q[0] as usize].col).collect();
            prop_assert_eq!(merged, expected);
            let total: u32 = dl.cmd_buffer.iter().map(|c| c.elem_count).sum();
            prop_assert_eq!(total as usize, dl.idx_buffer.len());
            prop_assert!(dl.cmd_buffer.iter().filter(|c| c.elem_count > 0).count() <= cmds_before);
            let mut offset = 0;
            for cmd in &dl.cmd_buffer {
                prop_assert_eq!(cmd.idx_offset, offset);
                offset += cmd.elem_count;
            }
        }
    }
}
