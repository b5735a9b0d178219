//! Approval index: publisher → approved merchants, O(1) membership.

use std::collections::{HashMap, HashSet};

use crate::Approval;

/// Precomputed from the approval list at config construction.
#[derive(Debug, Clone, Default)]
pub(crate) struct ApprovalIndex {
    by_publisher: HashMap<String, HashSet<String>>,
}

impl ApprovalIndex {
    pub(crate) fn new(approvals: &[Approval]) -> Self {
        let mut by_publisher: HashMap<String, HashSet<String>> = HashMap::new();
        for approval in approvals.iter().filter(|a| a.is_approved()) {
            by_publisher
                .entry(approval.audience.clone())
                .or_default()
                .insert(approval.organization.clone());
        }
        Self { by_publisher }
    }

    pub(crate) fn get(&self, publisher_id: &str) -> ApprovedMerchants<'_> {
        ApprovedMerchants {
            set: self.by_publisher.get(publisher_id),
        }
    }
}

/// The merchants a publisher is approved for.
///
/// Borrowed view into the config's index; empty for unknown publishers.
#[derive(Debug, Clone, Copy)]
pub struct ApprovedMerchants<'a> {
    set: Option<&'a HashSet<String>>,
}

impl<'a> ApprovedMerchants<'a> {
    /// O(1) membership test.
    #[must_use]
    pub fn contains(&self, merchant_id: &str) -> bool {
        self.set.is_some_and(|s| s.contains(merchant_id))
    }

    /// Number of approved merchants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.set.map_or(0, HashSet::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Approved merchant ids, sorted.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<&'a str> {
        let mut ids: Vec<&str> = self
            .set
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApprovalStatus;

    fn index() -> ApprovalIndex {
        ApprovalIndex::new(&[
            Approval::approved("org-pub", "org-a"),
            Approval::approved("org-pub", "org-b"),
            Approval::with_status(ApprovalStatus::Pending, "org-pub", "org-c"),
            Approval::approved("org-other", "org-c"),
        ])
    }

    #[test]
    fn only_approved_records_count() {
        let idx = index();
        let approvals = idx.get("org-pub");
        assert!(approvals.contains("org-a"));
        assert!(approvals.contains("org-b"));
        assert!(!approvals.contains("org-c"));
        assert_eq!(approvals.len(), 2);
        assert_eq!(approvals.to_sorted_vec(), vec!["org-a", "org-b"]);
    }

    #[test]
    fn scoped_by_audience() {
        let idx = index();
        assert!(idx.get("org-other").contains("org-c"));
        assert!(!idx.get("org-other").contains("org-a"));
    }

    #[test]
    fn unknown_publisher_is_empty() {
        let idx = index();
        assert!(idx.get("org-nobody").is_empty());
        assert!(idx.get("").is_empty());
        assert!(!idx.get("").contains(""));
    }
}
