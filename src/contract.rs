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
//! Contract checks for programmer errors.
//!
//! A failed check is always reported through `log::error!`. Debug builds panic right after,
//! release builds keep running with the caller's state left as tolerated-but-undefined.
//! Conditions a caller can legitimately hit at runtime go through [`crate::FrameError`] instead.

/// Reports a violated usage contract.
macro_rules! contract_check {
    ($cond:expr, $($arg:tt)+) => {
        if !($cond) {
            log::error!($($arg)+);
            if cfg!(debug_assertions) {
                panic!($($arg)+);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn holding_contract_is_silent() {
        let stack = vec![1, 2, 3];
        contract_check!(!stack.is_empty(), "stack must not be empty");
        assert_eq!(stack.len(), 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "mismatched pop")]
    fn broken_contract_panics_in_debug() {
        let depth = 0;
        contract_check!(depth > 0, "mismatched pop at depth {}", depth);
    }
}
