//! This module defines the display grouping modes of the dashboard.

/// How the fetched list is partitioned on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    /// A flat list in fetched order.
    #[default]
    None,
    /// One bucket per local calendar day of creation.
    ByDate,
    /// One bucket per `metadata.category`.
    ByCategory,
}

impl GroupMode {
    pub fn next(self) -> Self {
        match self {
            GroupMode::None => GroupMode::ByDate,
            GroupMode::ByDate => GroupMode::ByCategory,
            GroupMode::ByCategory => GroupMode::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GroupMode::None => "none",
            GroupMode::ByDate => "by date",
            GroupMode::ByCategory => "by category",
        }
    }
}
