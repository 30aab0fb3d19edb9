// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Check-state arbitration for a set of toggle buttons.

use alloc::vec::Vec;

/// Keeps the number of checked buttons in a group between a minimum and a maximum.
///
/// Buttons are identified by `K`, typically an [`ActorId`](crate::ActorId). The group
/// only tracks check state; widgets ask it before toggling with
/// [`set_checked`](Self::set_checked) and render whatever [`is_checked`](Self::is_checked)
/// reports.
///
/// The defaults make a radio group: exactly one button is checked, and checking
/// another unchecks the previous one.
///
/// ```rust
/// use understory_stage::ButtonGroup;
///
/// let mut group = ButtonGroup::new();
/// group.add('a', false);
/// group.add('b', false);
/// group.add('c', false);
/// assert_eq!(group.checked(), Some('a'));
///
/// assert!(group.set_checked('c', true));
/// assert_eq!(group.all_checked(), &['c']);
/// assert!(!group.set_checked('c', false), "one button must stay checked");
/// ```
#[derive(Clone, Debug)]
pub struct ButtonGroup<K> {
    buttons: Vec<K>,
    checked: Vec<K>,
    last_checked: Option<K>,
    min_check_count: usize,
    max_check_count: Option<usize>,
    uncheck_last: bool,
}

impl<K: Copy + Eq> Default for ButtonGroup<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> ButtonGroup<K> {
    /// A radio group: at least one and at most one checked button.
    pub fn new() -> Self {
        Self {
            buttons: Vec::new(),
            checked: Vec::new(),
            last_checked: None,
            min_check_count: 1,
            max_check_count: Some(1),
            uncheck_last: true,
        }
    }

    /// Add a button, checked if `checked` is set or the group is below its minimum.
    ///
    /// A button already in the group is re-added at the end.
    pub fn add(&mut self, button: K, checked: bool) {
        self.remove(button);
        let should_check = checked || self.buttons.len() < self.min_check_count;
        self.buttons.push(button);
        if should_check {
            self.set_checked(button, true);
        }
    }

    /// Remove a button. Returns whether it was in the group.
    ///
    /// The minimum is not enforced on removal.
    pub fn remove(&mut self, button: K) -> bool {
        let Some(i) = self.buttons.iter().position(|&b| b == button) else {
            return false;
        };
        self.buttons.remove(i);
        self.checked.retain(|&b| b != button);
        if self.last_checked == Some(button) {
            self.last_checked = None;
        }
        true
    }

    /// Remove every button.
    pub fn clear(&mut self) {
        self.buttons.clear();
        self.checked.clear();
        self.last_checked = None;
    }

    /// Ask to change a button's check state. Returns whether the state changed.
    ///
    /// Unchecking fails when the group is at its minimum. Checking at the maximum
    /// either unchecks the most recently checked button or fails, depending on
    /// [`set_uncheck_last`](Self::set_uncheck_last).
    pub fn set_checked(&mut self, button: K, checked: bool) -> bool {
        if !self.buttons.contains(&button) || self.is_checked(button) == checked {
            return false;
        }
        if !checked {
            if self.checked.len() <= self.min_check_count {
                return false;
            }
            self.checked.retain(|&b| b != button);
            return true;
        }
        if let Some(max) = self.max_check_count {
            while self.checked.len() >= max {
                if !self.uncheck_last {
                    return false;
                }
                let Some(last) = self
                    .last_checked
                    .filter(|b| self.checked.contains(b))
                    .or_else(|| self.checked.last().copied())
                else {
                    return false;
                };
                self.checked.retain(|&b| b != last);
                self.last_checked = None;
            }
        }
        self.checked.push(button);
        self.last_checked = Some(button);
        true
    }

    /// Whether `button` is checked.
    pub fn is_checked(&self, button: K) -> bool {
        self.checked.contains(&button)
    }

    /// The first checked button, in check order.
    pub fn checked(&self) -> Option<K> {
        self.checked.first().copied()
    }

    /// Position of the first checked button among [`buttons`](Self::buttons).
    pub fn checked_index(&self) -> Option<usize> {
        let first = self.checked()?;
        self.buttons.iter().position(|&b| b == first)
    }

    /// Checked buttons, in check order.
    pub fn all_checked(&self) -> &[K] {
        &self.checked
    }

    /// Buttons, in insertion order.
    pub fn buttons(&self) -> &[K] {
        &self.buttons
    }

    /// Uncheck every button, ignoring the minimum.
    pub fn uncheck_all(&mut self) {
        self.checked.clear();
        self.last_checked = None;
    }

    /// Fewest buttons that may be checked. Not applied retroactively.
    pub fn set_min_check_count(&mut self, min: usize) {
        self.min_check_count = min;
    }

    /// Most buttons that may be checked, or `None` for no limit.
    pub fn set_max_check_count(&mut self, max: Option<usize>) {
        self.max_check_count = max;
    }

    /// Whether checking past the maximum unchecks the most recently checked button
    /// (the default) or is refused.
    pub fn set_uncheck_last(&mut self, uncheck_last: bool) {
        self.uncheck_last = uncheck_last;
    }
}
