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
use super::*;
use std::collections::HashMap;

#[derive(Clone)]
struct PoolItem<T> {
    object: T,
    frame: usize,
}

/// Id-keyed storage for objects that persist across frames while they keep being submitted.
///
/// Objects that need `&mut Context` while being operated on are moved out with [`Pool::take`]
/// and moved back with [`Pool::restore`]; the slot stays reserved in between.
#[derive(Clone)]
pub struct Pool<T> {
    items: HashMap<Id, PoolItem<Option<T>>>,
    gc_ids: Vec<Id>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            items: HashMap::default(),
            gc_ids: Vec::default(),
        }
    }
}

impl<T: Default> Pool<T> {
    /// Returns the object for `id`, creating a default one if needed, and stamps it with `frame`.
    pub fn get_or_add(&mut self, id: Id, frame: usize) -> &mut T {
        let item = self.items.entry(id).or_insert_with(|| {
            log::debug!("pool object {:?} created", id);
            PoolItem { object: Some(T::default()), frame }
        });
        item.frame = frame;
        item.object.get_or_insert_with(T::default)
    }
}

impl<T> Pool<T> {
    /// Returns the object for `id` if it is present and not taken out.
    pub fn get(&self, id: Id) -> Option<&T> { self.items.get(&id).and_then(|pi| pi.object.as_ref()) }

    /// Mutable variant of [`Pool::get`].
    pub fn get_mut(&mut self, id: Id) -> Option<&mut T> { self.items.get_mut(&id).and_then(|pi| pi.object.as_mut()) }

    /// Moves the object out of its slot.
    pub fn take(&mut self, id: Id) -> Option<T> { self.items.get_mut(&id).and_then(|pi| pi.object.take()) }

    /// Moves an object back into the slot of `id`.
    pub fn restore(&mut self, id: Id, object: T, frame: usize) {
        let item = self.items.entry(id).or_insert(PoolItem { object: None, frame });
        contract_check!(item.object.is_none(), "pool slot {:?} restored while occupied", id);
        item.object = Some(object);
    }

    /// Drops the object for `id`.
    pub fn remove(&mut self, id: Id) { self.items.remove(&id); }

    /// Returns `true` if a slot exists for `id`.
    pub fn contains(&self, id: Id) -> bool { self.items.contains_key(&id) }

    /// Number of live slots.
    pub fn len(&self) -> usize { self.items.len() }

    /// Returns `true` when no slot is live.
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Drops every object.
    pub fn clear(&mut self) { self.items.clear(); }

    /// Drops objects that have not been touched for more than `max_age` frames.
    pub fn gc(&mut self, current_frame: usize, max_age: usize) {
        self.gc_ids.clear();
        for (id, item) in &self.items {
            if item.object.is_some() && item.frame + max_age < current_frame {
                self.gc_ids.push(*id);
            }
        }

        for gid in &self.gc_ids {
            self.items.remove(gid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_and_restore_keeps_state() {
        let mut pool: Pool<Vec<u32>> = Pool::default();
        pool.get_or_add(Id::new(1), 0).push(5);
        let mut v = pool.take(Id::new(1)).unwrap();
        assert!(pool.get(Id::new(1)).is_none());
        assert!(pool.contains(Id::new(1)));
        v.push(6);
        pool.restore(Id::new(1), v, 0);
        assert_eq!(pool.get(Id::new(1)).unwrap(), &vec![5, 6]);
    }

    #[test]
    fn gc_drops_stale_objects() {
        let mut pool: Pool<u32> = Pool::default();
        *pool.get_or_add(Id::new(1), 0) = 1;
        *pool.get_or_add(Id::new(2), 5) = 2;
        pool.gc(5, 2);
        assert!(pool.get(Id::new(1)).is_none());
        assert_eq!(pool.get(Id::new(2)), Some(&2));
        assert_eq!(pool.len(), 1);
    }
}
