// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers for applying sort and drop outcomes to backing data.
//!
//! The engine never mutates an integrator's data. Replaying `sorted` and
//! `dropped` notifications through these helpers reproduces the order the
//! engine shows on screen.

use alloc::vec::Vec;

/// Move the element at `from` to `to`, shifting everything in between by one
/// toward `from`. Both indices are clamped to the slice.
///
/// ```
/// use understory_drag_drop::move_item_in_array;
///
/// let mut v = vec!['a', 'b', 'c', 'd'];
/// move_item_in_array(&mut v, 0, 2);
/// assert_eq!(v, ['b', 'c', 'a', 'd']);
/// ```
pub fn move_item_in_array<T>(items: &mut [T], from: usize, to: usize) {
    let Some(last) = items.len().checked_sub(1) else {
        return;
    };
    let from = from.min(last);
    let to = to.min(last);
    if from < to {
        items[from..=to].rotate_left(1);
    } else if to < from {
        items[to..=from].rotate_right(1);
    }
}

/// Move the element at `current_index` of `source` into `target` at
/// `target_index`. Indices are clamped.
pub fn transfer_array_item<T>(
    source: &mut Vec<T>,
    target: &mut Vec<T>,
    current_index: usize,
    target_index: usize,
) {
    if source.is_empty() {
        return;
    }
    let from = current_index.min(source.len() - 1);
    let to = target_index.min(target.len());
    let item = source.remove(from);
    target.insert(to, item);
}

/// Copy the element at `current_index` of `source` into `target` at
/// `target_index`. Indices are clamped.
pub fn copy_array_item<T: Clone>(
    source: &[T],
    target: &mut Vec<T>,
    current_index: usize,
    target_index: usize,
) {
    if source.is_empty() {
        return;
    }
    let from = current_index.min(source.len() - 1);
    let to = target_index.min(target.len());
    target.insert(to, source[from].clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn move_shifts_between_toward_source() {
        let mut v = vec![0, 1, 2, 3, 4];
        move_item_in_array(&mut v, 3, 1);
        assert_eq!(v, [0, 3, 1, 2, 4]);
        move_item_in_array(&mut v, 0, 4);
        assert_eq!(v, [3, 1, 2, 4, 0]);
    }

    #[test]
    fn move_clamps_out_of_range_indices() {
        let mut v = vec![0, 1, 2];
        move_item_in_array(&mut v, 7, 0);
        assert_eq!(v, [2, 0, 1]);
        let mut empty: Vec<u8> = Vec::new();
        move_item_in_array(&mut empty, 0, 3);
        assert!(empty.is_empty());
    }

    #[test]
    fn transfer_and_copy() {
        let mut a = vec!['x', 'y'];
        let mut b = vec!['z'];
        transfer_array_item(&mut a, &mut b, 0, 9);
        assert_eq!(a, ['y']);
        assert_eq!(b, ['z', 'x']);
        copy_array_item(&a, &mut b, 0, 0);
        assert_eq!(a, ['y']);
        assert_eq!(b, ['y', 'z', 'x']);
    }
}
