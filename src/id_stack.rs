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
//! Hashed widget identifiers scoped by a stack of parent ids.
use super::*;

/// Seed used when the stack is empty.
pub const HASH_SEED: u32 = 2166136261;

fn hash_step(h: u32, n: u32) -> u32 { (h ^ n).wrapping_mul(16777619) }

/// Hashes raw bytes on top of `seed`.
pub fn hash_bytes(seed: u32, bytes: &[u8]) -> u32 { bytes.iter().fold(seed, |h, b| hash_step(h, *b as u32)) }

/// Hashes a label on top of `seed`.
///
/// A `###` marker restarts the hash from `seed` so that only the marker and what follows
/// contribute. This lets a label change its visible text while keeping its identity.
pub fn hash_str(seed: u32, s: &str) -> u32 {
    match s.rfind("###") {
        Some(pos) => hash_bytes(seed, &s.as_bytes()[pos..]),
        None => hash_bytes(seed, s.as_bytes()),
    }
}

/// Returns the displayed part of a label: everything before the first `##`.
pub fn find_rendered_text_end(s: &str) -> &str {
    match s.find("##") {
        Some(pos) => &s[..pos],
        None => s,
    }
}

#[derive(Clone, Debug, Default)]
/// Stack of scope ids that every label is hashed against.
pub struct IdStack {
    stack: Vec<Id>,
}

impl IdStack {
    /// Creates a stack whose bottom scope is `root`.
    pub fn with_root(root: Id) -> Self { Self { stack: vec![root] } }

    fn seed(&self) -> u32 {
        match self.stack.last() {
            Some(id) => id.raw(),
            None => HASH_SEED,
        }
    }

    /// Innermost scope id.
    pub fn top(&self) -> Id { Id::new(self.seed()) }

    /// Number of scopes.
    pub fn depth(&self) -> usize { self.stack.len() }

    /// Hashes a label in the current scope.
    pub fn get_id_str(&self, s: &str) -> Id { Id::new(hash_str(self.seed(), s)) }

    /// Hashes an integer in the current scope.
    pub fn get_id_int(&self, n: i32) -> Id { Id::new(hash_bytes(self.seed(), &n.to_be_bytes())) }

    /// Hashes the address of `obj` in the current scope.
    pub fn get_id_ptr<T: ?Sized>(&self, obj: &T) -> Id {
        let ptr = obj as *const T as *const u8 as usize;
        Id::new(hash_bytes(self.seed(), &ptr.to_le_bytes()))
    }

    /// Hashes a sequence of integers in the current scope.
    pub fn get_id_from_ints(&self, ints: &[i32]) -> Id {
        Id::new(ints.iter().fold(self.seed(), |h, n| hash_bytes(h, &n.to_be_bytes())))
    }

    /// Opens a scope hashed from a label.
    pub fn push_str(&mut self, s: &str) {
        let id = self.get_id_str(s);
        self.stack.push(id);
    }

    /// Opens a scope hashed from an integer.
    pub fn push_int(&mut self, n: i32) {
        let id = self.get_id_int(n);
        self.stack.push(id);
    }

    /// Opens a scope with an already computed id.
    pub fn push_id(&mut self, id: Id) { self.stack.push(id); }

    /// Closes the innermost scope. The root scope cannot be popped.
    pub fn pop(&mut self) {
        contract_check!(self.stack.len() > 1, "pop_id called without a matching push_id");
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub(crate) fn truncate(&mut self, depth: usize) { self.stack.truncate(depth.max(1)); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_label_differs_per_scope() {
        let mut ids = IdStack::with_root(Id::new(hash_str(HASH_SEED, "Window")));
        let a = ids.get_id_str("OK");
        ids.push_str("child");
        let b = ids.get_id_str("OK");
        ids.pop();
        assert_ne!(a, b);
        assert_eq!(a, ids.get_id_str("OK"));
    }

    #[test]
    fn triple_hash_keeps_identity_across_labels() {
        let ids = IdStack::with_root(Id::new(1234));
        assert_eq!(ids.get_id_str("Frame 1###anim"), ids.get_id_str("Frame 2###anim"));
        assert_ne!(ids.get_id_str("A##x"), ids.get_id_str("A##y"));
    }

    #[test]
    fn double_hash_hides_suffix() {
        assert_eq!(find_rendered_text_end("Save##menu"), "Save");
        assert_eq!(find_rendered_text_end("Plain"), "Plain");
        assert_eq!(find_rendered_text_end("##hidden"), "");
    }

    #[test]
    fn int_and_rect_ids_are_stable() {
        let ids = IdStack::with_root(Id::new(7));
        assert_eq!(ids.get_id_int(3), ids.get_id_int(3));
        assert_ne!(ids.get_id_int(3), ids.get_id_int(4));
        assert_eq!(ids.get_id_from_ints(&[0, 0, 10, 10]), ids.get_id_from_ints(&[0, 0, 10, 10]));
    }
}
