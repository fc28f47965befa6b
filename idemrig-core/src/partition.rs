//! Partition of the universe into classes with explicit member lists.
//!
//! Every universe element owns a class slot, used when that element labels a
//! live class. Live classes are threaded on a doubly linked list in insertion
//! order (newest first), so enumeration never rescans dead slots and the order
//! in which classes are visited is reproducible.

use crate::{ids::Element, typed_vec::TVec};
use std::{fmt, iter, mem};

#[derive(Clone, Debug, Default)]
struct ClassSlot {
    prev: Option<Element>,
    next: Option<Element>,
    /// Empty iff the slot does not hold a live class.
    members: Vec<Element>,
}

/// The bookkeeping is inconsistent, nothing computed from it can be trusted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// `element` is stored in class `holder` but recorded as belonging to `recorded`.
    Misfiled {
        element: Element,
        recorded: Element,
        holder: Element,
    },
    /// Class sizes do not add up to the universe.
    Miscounted { expected: usize, found: usize },
    /// `left` and `right` are different classes that a congruence must identify.
    NotCongruent { left: Element, right: Element },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Misfiled {
                element,
                recorded,
                holder,
            } => write!(
                f,
                "{element} is a member of class {holder} but recorded in class {recorded}"
            ),
            Self::Miscounted { expected, found } => {
                write!(f, "classes hold {found} elements, expected {expected}")
            }
            Self::NotCongruent { left, right } => {
                write!(f, "classes {left} and {right} violate congruence")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

#[derive(Clone, Debug)]
pub struct PartitionStore {
    slots: TVec<Element, ClassSlot>,
    /// Current label of every element, bogus while not yet placed.
    label_of: TVec<Element, Element>,
    first: Option<Element>,
    live: usize,
}

impl PartitionStore {
    /// A store over `0..universe` with no classes yet.
    #[must_use]
    pub fn new(universe: usize) -> Self {
        Self {
            slots: TVec::new_with_size(universe, ClassSlot::default()),
            label_of: TVec::new_with_size(universe, Element::bogus()),
            first: None,
            live: 0,
        }
    }

    /// Every element in its own class, labeled by itself.
    #[must_use]
    pub fn discrete(universe: usize) -> Self {
        let mut store = Self::new(universe);
        for e in (0..universe).map(Element) {
            store.new_class(e, e);
        }
        store
    }

    /// Size of the universe.
    #[must_use]
    pub fn universe(&self) -> usize {
        self.slots.len()
    }

    /// Number of live classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[must_use]
    pub fn is_live(&self, label: Element) -> bool {
        !self.slots[label].members.is_empty()
    }

    /// Create the class `label` holding only `seed`, linked first in traversal order.
    pub fn new_class(&mut self, label: Element, seed: Element) {
        assert!(!self.is_live(label), "class {label} already exists");
        assert!(
            self.label_of[seed].is_bogus(),
            "{seed} already belongs to class {}",
            self.label_of[seed]
        );
        let old_first = self.first.replace(label);
        if let Some(old_first) = old_first {
            self.slots[old_first].prev = Some(label);
        }
        let slot = &mut self.slots[label];
        slot.prev = None;
        slot.next = old_first;
        slot.members.push(seed);
        self.label_of[seed] = label;
        self.live += 1;
    }

    /// Place a not yet placed `element` in the live class `label`.
    pub fn add_member(&mut self, label: Element, element: Element) {
        debug_assert!(self.is_live(label), "class {label} is not live");
        assert!(
            self.label_of[element].is_bogus(),
            "{element} already belongs to class {}",
            self.label_of[element]
        );
        self.slots[label].members.push(element);
        self.label_of[element] = label;
    }

    /// Move every member of `gone` into `keep` and unlink `gone`.
    pub fn merge(&mut self, keep: Element, gone: Element) {
        assert!(
            self.is_live(keep) && self.is_live(gone),
            "merging dead class {gone} into {keep}"
        );
        debug_assert_ne!(keep, gone, "merging class {keep} into itself");

        let ClassSlot {
            prev,
            next,
            members,
        } = mem::take(&mut self.slots[gone]);
        for &z in &members {
            self.label_of[z] = keep;
        }
        self.slots[keep].members.extend(members);

        match prev {
            None => self.first = next,
            Some(prev) => self.slots[prev].next = next,
        }
        if let Some(next) = next {
            self.slots[next].prev = prev;
        }
        self.live -= 1;
    }

    /// Live class labels in traversal order. Call again to restart.
    pub fn classes(&self) -> impl Iterator<Item = Element> + use<'_> {
        iter::successors(self.first, |&label| self.slots[label].next)
    }

    /// First live class in traversal order.
    #[must_use]
    pub fn first_class(&self) -> Option<Element> {
        self.first
    }

    /// Successor of the live class `label` in traversal order.
    #[must_use]
    pub fn next_class(&self, label: Element) -> Option<Element> {
        self.slots[label].next
    }

    pub fn class_of(&self, element: Element) -> Element {
        let label = self.label_of[element];
        debug_assert!(!label.is_bogus(), "{element} is not in any class");
        label
    }

    /// Members of `label` in storage order (the order they joined).
    #[must_use]
    pub fn members(&self, label: Element) -> &[Element] {
        &self.slots[label].members
    }

    /// Check that every member is recorded under the class holding it and that
    /// the classes cover the universe.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut found = 0;
        for holder in self.classes() {
            for &element in self.members(holder) {
                let recorded = self.label_of[element];
                if recorded != holder {
                    return Err(InvariantViolation::Misfiled {
                        element,
                        recorded,
                        holder,
                    });
                }
            }
            found += self.members(holder).len();
        }
        if found != self.universe() {
            return Err(InvariantViolation::Miscounted {
                expected: self.universe(),
                found,
            });
        }
        Ok(())
    }
}
