//! Propagation mode
//!
//! One policy value read from the document element at install time. It fixes
//! the direction (which shadow roots are tracked) and the selection (which
//! sources propagate, which targets receive them).

use std::fmt;
use std::str::FromStr;

use crate::error::ModeError;

/// Which elements are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Only elements using the lifecycle adapter
    Pull,
    /// Every element that attaches a shadow root
    Push,
}

/// Which style sources propagate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelection {
    All,
    /// Only sources carrying the source marker attribute
    Marked,
}

/// Which tracked elements receive styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelection {
    All,
    /// Only elements carrying the target marker attribute
    Select,
}

/// Propagation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleMode {
    direction: Direction,
    sources: SourceSelection,
    targets: TargetSelection,
}

impl StyleMode {
    pub const COMPONENT_PULL: Self = Self::new(Direction::Pull, SourceSelection::All, TargetSelection::All);
    pub const COMPONENT_PULL_MARKED: Self = Self::new(Direction::Pull, SourceSelection::Marked, TargetSelection::All);
    pub const PAGE_PUSH: Self = Self::new(Direction::Push, SourceSelection::All, TargetSelection::All);
    pub const PAGE_PUSH_MARKED: Self = Self::new(Direction::Push, SourceSelection::Marked, TargetSelection::All);
    pub const PAGE_PUSH_SELECT: Self = Self::new(Direction::Push, SourceSelection::All, TargetSelection::Select);
    pub const PAGE_PUSH_SELECT_MARKED: Self = Self::new(Direction::Push, SourceSelection::Marked, TargetSelection::Select);

    /// Every recognized mode with its attribute value
    pub const ALL: [(&'static str, StyleMode); 6] = [
        ("component-pull", Self::COMPONENT_PULL),
        ("component-pull-marked", Self::COMPONENT_PULL_MARKED),
        ("page-push", Self::PAGE_PUSH),
        ("page-push-marked", Self::PAGE_PUSH_MARKED),
        ("page-push-select", Self::PAGE_PUSH_SELECT),
        ("page-push-select-marked", Self::PAGE_PUSH_SELECT_MARKED),
    ];

    const fn new(direction: Direction, sources: SourceSelection, targets: TargetSelection) -> Self {
        Self { direction, sources, targets }
    }

    pub fn direction(self) -> Direction {
        self.direction
    }

    pub fn sources(self) -> SourceSelection {
        self.sources
    }

    pub fn targets(self) -> TargetSelection {
        self.targets
    }

    #[inline]
    pub fn is_pull(self) -> bool {
        self.direction == Direction::Pull
    }

    #[inline]
    pub fn is_push(self) -> bool {
        self.direction == Direction::Push
    }

    /// Attribute value naming this mode
    pub fn as_str(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, mode)| *mode == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }
}

impl FromStr for StyleMode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, mode)| *mode)
            .ok_or_else(|| ModeError::Unrecognized(s.to_string()))
    }
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_modes() {
        for (name, mode) in StyleMode::ALL {
            assert_eq!(name.parse::<StyleMode>(), Ok(mode));
            assert_eq!(mode.to_string(), name);
        }
    }

    #[test]
    fn test_axes() {
        let mode: StyleMode = "page-push-select-marked".parse().unwrap();
        assert!(mode.is_push());
        assert_eq!(mode.sources(), SourceSelection::Marked);
        assert_eq!(mode.targets(), TargetSelection::Select);

        let mode: StyleMode = "component-pull".parse().unwrap();
        assert!(mode.is_pull());
        assert_eq!(mode.sources(), SourceSelection::All);
        assert_eq!(mode.targets(), TargetSelection::All);
    }

    #[test]
    fn test_unrecognized() {
        // No pull-select variants, and matching is exact
        for value in ["component-pull-select", "Page-Push", " page-push", ""] {
            assert_eq!(
                value.parse::<StyleMode>(),
                Err(ModeError::Unrecognized(value.to_string()))
            );
        }
    }
}
