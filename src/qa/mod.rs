//! Static checks run over the built site before publishing.

pub mod images;
pub mod resource_nav;

/// Outcome of a QA pass: how many pages were examined and what failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QaReport {
    pub checked: usize,
    pub errors: Vec<String>,
}

impl QaReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
