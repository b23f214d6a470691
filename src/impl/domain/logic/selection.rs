use std::collections::HashSet;

use log::warn;

use crate::entities::{CustomerId, WorkingSet};

/// Ids the operator picked for notification. Has no access to the working set
/// of its own; anything that depends on it takes the set as a parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    selected: HashSet<CustomerId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: CustomerId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn select_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = CustomerId>,
    {
        self.selected = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: CustomerId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// State of a "select all" toggle over the given working set.
    pub fn all_selected(&self, working_set: &WorkingSet) -> bool {
        !working_set.is_empty() && working_set.ids().iter().all(|id| self.is_selected(*id))
    }

    /// Selected ids that are present in the working set, in working-set order.
    pub fn selected_ids(&self, working_set: &WorkingSet) -> Vec<CustomerId> {
        working_set
            .ids()
            .into_iter()
            .filter(|id| self.is_selected(*id))
            .collect()
    }

    /// Drops ids that are no longer part of the working set and returns them.
    /// Must be called whenever the working set is replaced.
    pub fn retain_present(&mut self, working_set: &WorkingSet) -> Vec<CustomerId> {
        let mut stale: Vec<CustomerId> = self
            .selected
            .iter()
            .copied()
            .filter(|id| !working_set.contains(*id))
            .collect();
        stale.sort_unstable();
        for id in &stale {
            self.selected.remove(id);
        }
        if !stale.is_empty() {
            warn!("Dropped stale selection (not in current working set): {:?}", stale);
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Customer, ReconciledCustomer};

    fn working_set(ids: &[CustomerId]) -> WorkingSet {
        WorkingSet::new(
            ids.iter()
                .map(|id| ReconciledCustomer {
                    customer: Customer {
                        id: *id,
                        name: format!("c{id}"),
                        primary_phone: None,
                        secondary_phone: None,
                        ledger_balance: -1.0,
                    },
                    effective_balance: -1.0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut s = SelectionManager::new();
        s.toggle(3);
        assert!(s.is_selected(3));
        s.toggle(3);
        assert!(!s.is_selected(3));
        assert!(s.is_empty());
    }

    #[test]
    fn test_select_all_then_toggle_one() {
        let all = vec![1, 2, 3, 4];
        let mut s = SelectionManager::new();
        s.toggle(99);
        s.select_all(all.clone());
        assert_eq!(s.len(), all.len());
        assert!(!s.is_selected(99));
        s.toggle(2);
        assert_eq!(s.len(), all.len() - 1);
    }

    #[test]
    fn test_clear() {
        let mut s = SelectionManager::new();
        s.select_all([1, 2]);
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn test_all_selected_tracks_working_set() {
        let ws = working_set(&[1, 2]);
        let mut s = SelectionManager::new();
        assert!(!s.all_selected(&ws));
        s.select_all(ws.ids());
        assert!(s.all_selected(&ws));
        s.toggle(1);
        assert!(!s.all_selected(&ws));
        assert!(!s.all_selected(&WorkingSet::default()));
    }

    #[test]
    fn test_selected_ids_follow_working_set_order() {
        let ws = working_set(&[5, 3, 8]);
        let mut s = SelectionManager::new();
        s.select_all([8, 5, 42]);
        assert_eq!(s.selected_ids(&ws), vec![5, 8]);
    }

    #[test]
    fn test_retain_present_drops_stale_ids() {
        let mut s = SelectionManager::new();
        s.select_all([1, 2, 3]);
        let stale = s.retain_present(&working_set(&[2, 4]));
        assert_eq!(stale, vec![1, 3]);
        assert_eq!(s.len(), 1);
        assert!(s.is_selected(2));
    }
}
