//! Modal stack state machine.
//!
//! The top of the stack is the most recently pushed entry and the only visible overlay. All
//! transitions are total: popping an empty stack and collapsing to a missing root are no-ops.

use serde::{Deserialize, Serialize};

use crate::modal::{Modal, ModalName};

/// Runtime identity of one stacked modal instance. Never reused within a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModalInstanceId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalEntry {
    pub id: ModalInstanceId,
    pub modal: Modal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalStack {
    entries: Vec<ModalEntry>,
    next_instance_id: u64,
}

impl Default for ModalStack {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_instance_id: 1,
        }
    }
}

impl ModalStack {
    /// Appends `modal` on top. Pushing the same tag twice stacks two instances.
    pub fn push(&mut self, modal: Modal) -> ModalInstanceId {
        let id = self.next_instance_id();
        self.entries.push(ModalEntry { id, modal });
        id
    }

    /// Swaps the top entry (if any) for `modal`. Returns the new id and the removed entry's id.
    pub fn replace(&mut self, modal: Modal) -> (ModalInstanceId, Option<ModalInstanceId>) {
        let removed = self.entries.pop().map(|entry| entry.id);
        (self.push(modal), removed)
    }

    /// Removes the top entry; `None` when the stack was already empty.
    pub fn pop(&mut self) -> Option<ModalEntry> {
        self.entries.pop()
    }

    /// Clears the stack regardless of depth, returning the removed entries bottom-first.
    pub fn close(&mut self) -> Vec<ModalEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Truncates everything above the topmost entry tagged `root`, leaving it on top.
    ///
    /// Returns the removed entries bottom-first; empty when `root` is absent or already on top.
    pub fn collapse(&mut self, root: ModalName) -> Vec<ModalEntry> {
        match self.entries.iter().rposition(|entry| entry.modal.name() == root) {
            Some(index) => self.entries.split_off(index + 1),
            None => Vec::new(),
        }
    }

    pub fn top(&self) -> Option<&ModalEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: ModalName) -> bool {
        self.entries.iter().any(|entry| entry.modal.name() == name)
    }

    pub fn contains_instance(&self, id: ModalInstanceId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Entries bottom-first.
    pub fn entries(&self) -> &[ModalEntry] {
        &self.entries
    }

    /// Descriptors bottom-first.
    pub fn modals(&self) -> impl Iterator<Item = &Modal> + '_ {
        self.entries.iter().map(|entry| &entry.modal)
    }

    /// Tags bottom-first.
    pub fn names(&self) -> Vec<ModalName> {
        self.modals().map(Modal::name).collect()
    }

    fn next_instance_id(&mut self) -> ModalInstanceId {
        let id = ModalInstanceId(self.next_instance_id);
        self.next_instance_id = self.next_instance_id.saturating_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::modal::{
        AddAccountOptions, BudgetSummaryOptions, ImportOptions, KeyboardShortcutsOptions,
        NotesOptions,
    };

    fn a() -> Modal {
        Modal::from(ImportOptions::default())
    }

    fn b() -> Modal {
        Modal::from(AddAccountOptions::default())
    }

    fn c() -> Modal {
        Modal::from(KeyboardShortcutsOptions::default())
    }

    fn abc() -> ModalStack {
        let mut stack = ModalStack::default();
        stack.push(a());
        stack.push(b());
        stack.push(c());
        stack
    }

    #[test]
    fn depth_equals_pushes_minus_effective_pops() {
        let mut stack = ModalStack::default();
        let ops = [true, false, false, true, true, false, true, false, false, false];
        let mut expected = 0usize;
        for push in ops {
            if push {
                stack.push(a());
                expected += 1;
            } else {
                stack.pop();
                expected = expected.saturating_sub(1);
            }
            assert_eq!(stack.len(), expected);
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_is_noop() {
        let mut stack = ModalStack::default();
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn push_does_not_deduplicate() {
        let mut stack = ModalStack::default();
        let first = stack.push(a());
        let second = stack.push(a());
        assert_ne!(first, second);
        assert_eq!(stack.names(), vec![ModalName::Import, ModalName::Import]);
    }

    #[test]
    fn push_keeps_payload_exactly() {
        let mut stack = ModalStack::default();
        let options = BudgetSummaryOptions {
            month: "2024-03".into(),
        };
        stack.push(options.clone().into());

        assert_eq!(stack.len(), 1);
        let top = stack.top().expect("top");
        assert_eq!(top.modal.name().as_str(), "budget-summary");
        assert_eq!(top.modal, Modal::BudgetSummary(options));
    }

    #[test]
    fn replace_matches_pop_then_push_in_content() {
        let mut replaced = abc();
        let (_, removed) = replaced.replace(Modal::from(NotesOptions {
            id: "n1".into(),
            name: "Groceries".into(),
        }));
        assert!(removed.is_some());

        let mut manual = abc();
        manual.pop();
        manual.push(Modal::from(NotesOptions {
            id: "n1".into(),
            name: "Groceries".into(),
        }));

        assert_eq!(
            replaced.modals().collect::<Vec<_>>(),
            manual.modals().collect::<Vec<_>>()
        );
    }

    #[test]
    fn replace_on_empty_acts_as_push() {
        let mut stack = ModalStack::default();
        let (id, removed) = stack.replace(a());
        assert_eq!(removed, None);
        assert_eq!(stack.top().map(|entry| entry.id), Some(id));
    }

    #[test]
    fn close_clears_any_depth() {
        let mut stack = abc();
        let removed = stack.close();
        assert_eq!(removed.len(), 3);
        assert!(stack.is_empty());
    }

    #[test]
    fn collapse_to_bottom_root() {
        let mut stack = abc();
        let removed = stack.collapse(ModalName::Import);
        assert_eq!(stack.names(), vec![ModalName::Import]);
        assert_eq!(removed.len(), 2);
    }

    #[test]
    fn collapse_to_missing_root_is_identity() {
        let mut stack = abc();
        let before = stack.clone();
        let removed = stack.collapse(ModalName::GoalTemplates);
        assert!(removed.is_empty());
        assert_eq!(stack, before);
    }

    #[test]
    fn collapse_truncates_to_position_from_top_plus_one() {
        let mut stack = abc();
        stack.collapse(ModalName::AddAccount);
        assert_eq!(stack.names(), vec![ModalName::Import, ModalName::AddAccount]);

        let mut stack = abc();
        stack.collapse(ModalName::KeyboardShortcuts);
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn collapse_picks_topmost_duplicate_root() {
        let mut stack = ModalStack::default();
        stack.push(a());
        stack.push(b());
        let upper_root = stack.push(a());
        stack.push(c());

        stack.collapse(ModalName::Import);

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.top().map(|entry| entry.id), Some(upper_root));
    }

    #[test]
    fn instance_ids_are_not_reused_after_close() {
        let mut stack = ModalStack::default();
        let first = stack.push(a());
        stack.close();
        let second = stack.push(a());
        assert!(second > first);
        assert!(!stack.contains_instance(first));
        assert!(stack.contains(ModalName::Import));
    }
}
