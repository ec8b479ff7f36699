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
use thiserror::Error;

/// Structural problems detected at a frame boundary.
///
/// The context always repairs its state before reporting one of these, so the returned
/// error is informational: the next frame can start normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Windows were left open with `begin` and never closed with `end`.
    #[error("mismatched begin/end: {count} window(s) were not closed and have been force-closed")]
    UnclosedWindows {
        /// Number of windows the context had to close.
        count: usize,
    },
    /// `end` was called more often than `begin`.
    #[error("mismatched begin/end: end was called on the implicit fallback window")]
    TooManyEnds,
    /// `end_frame` or `render` was called without a matching `new_frame`.
    #[error("frame ended without a matching new_frame")]
    FrameNotStarted,
}

/// Result type of the frame boundary operations.
pub type Result<T> = std::result::Result<T, FrameError>;
