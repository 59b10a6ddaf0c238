//! Navigation
//!
//! A clamped index into the pair list. Both front ends own a [`Browser`]
//! and drive it from buttons, keys, the slider or HTTP requests.

use std::num::IntErrorKind;

use serde::Serialize;

/// Current position in a list of `len` items.
///
/// Every move is clamped to `[0, len - 1]`; with no items every move is a
/// no-op and the index stays 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigator {
    index: usize,
    len: usize,
}

impl Navigator {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Move to `requested`, clamped to the valid range
    pub fn goto(&mut self, requested: i64) -> usize {
        if self.len == 0 {
            return self.index;
        }
        let last = (self.len - 1) as i64;
        self.index = requested.clamp(0, last) as usize;
        self.index
    }

    pub fn next(&mut self) -> usize {
        self.goto(self.index as i64 + 1)
    }

    pub fn prev(&mut self) -> usize {
        self.goto(self.index as i64 - 1)
    }

    /// Move to the index typed by a user. Input that is not an integer is
    /// ignored and `None` is returned. Integers beyond `i64` saturate and
    /// are clamped like any other index.
    pub fn jump(&mut self, input: &str) -> Option<usize> {
        let requested = match input.trim().parse::<i64>() {
            Ok(value) => value,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => return None,
            },
        };
        Some(self.goto(requested))
    }
}

/// Snapshot of the navigation state for status lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigatorStatus<I> {
    /// Zero-based position
    pub index: usize,
    /// Id of the current item, if any
    pub pair_id: Option<I>,
    pub pairs_len: usize,
}

/// A list of items with a navigator over them
#[derive(Debug, Clone)]
pub struct Browser<T> {
    items: Vec<T>,
    nav: Navigator,
}

impl<T> Browser<T> {
    pub fn new(items: Vec<T>) -> Self {
        let nav = Navigator::new(items.len());
        Self { items, nav }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.nav.index()
    }

    /// The item at the current index
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.nav.index())
    }

    pub fn goto(&mut self, requested: i64) -> Option<&T> {
        self.nav.goto(requested);
        self.current()
    }

    pub fn next(&mut self) -> Option<&T> {
        self.nav.next();
        self.current()
    }

    pub fn prev(&mut self) -> Option<&T> {
        self.nav.prev();
        self.current()
    }

    /// See [`Navigator::jump`]; returns `None` when the input was ignored
    pub fn jump(&mut self, input: &str) -> Option<&T> {
        self.nav.jump(input)?;
        self.current()
    }

    /// Status with the current item's id
    pub fn status<I>(&self, id_of: impl Fn(&T) -> I) -> NavigatorStatus<I> {
        NavigatorStatus {
            index: self.nav.index(),
            pair_id: self.current().map(id_of),
            pairs_len: self.items.len(),
        }
    }
}
