//! Pure geometry for anchored popover placement.
//!
//! Everything here is free of host state: given the target's rectangle,
//! the popover's size, and the current viewport, [`compute_offset`]
//! yields the absolute document position for a given [`Anchor`], and
//! [`suggest_anchor`] proposes a flipped anchor when that position
//! would clip outside the viewport.

use std::result::Result as StdResult;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod anchor;

pub use anchor::Anchor;

/// Convenient result type for the geometry crate.
pub type Result<T> = StdResult<T, Error>;

/// Geometry errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A direction string outside the eight-value anchor set.
    #[error("invalid anchor direction \"{0}\"")]
    InvalidAnchor(String),
}

/// Vertical overlap factor for the south diagonal anchors. Biases the
/// popover upward so its pointer lines up with the target's lower edge.
const SOUTH_DIAGONAL_BIAS: f64 = 0.85;

/// Axis-aligned box in document coordinates (y grows downward).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Rect {
    /// Distance from the document top to the box's top edge.
    pub top: f64,
    /// Distance from the document left to the box's left edge.
    pub left: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl Rect {
    /// Project out the box's dimensions.
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

/// Width and height of an element whose position is being solved for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Size {
    /// Element width.
    pub width: f64,
    /// Element height.
    pub height: f64,
}

/// Absolute document position to assign to the popover.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Offset {
    /// Distance from the document top.
    pub top: f64,
    /// Distance from the document left.
    pub left: f64,
}

/// Currently visible window into the document. Read fresh on every
/// computation; it changes independently of the popover.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Viewport {
    /// Vertical scroll position of the document.
    pub scroll_top: f64,
    /// Horizontal scroll position of the document.
    pub scroll_left: f64,
    /// Visible width.
    pub width: f64,
    /// Visible height.
    pub height: f64,
}

/// Compute the absolute offset placing a popover of `popover` size
/// adjacent to `target` per `anchor`.
pub fn compute_offset(anchor: Anchor, target: Rect, popover: Size) -> Offset {
    let Rect {
        top,
        left,
        width: tw,
        height: th,
    } = target;
    let Size {
        width: ew,
        height: eh,
    } = popover;

    let (off_top, off_left) = match anchor {
        Anchor::North => (top - eh, left + tw / 2.0 - ew / 2.0),
        Anchor::NorthWest => (top, left - ew),
        Anchor::NorthEast => (top, left + tw),
        Anchor::South => (top + th, left + tw / 2.0 - ew / 2.0),
        Anchor::SouthWest => (top + th - eh * SOUTH_DIAGONAL_BIAS, left - ew),
        Anchor::SouthEast => (top + th - eh * SOUTH_DIAGONAL_BIAS, left + tw),
        Anchor::East => (top + th / 2.0 - eh / 2.0, left + tw),
        Anchor::West => (top + th / 2.0 - eh / 2.0, left - ew),
    };
    Offset {
        top: off_top,
        left: off_left,
    }
}

/// Suggest a flipped anchor when `offset` would clip the popover
/// outside `viewport`, or `None` when the placement fits.
///
/// Checks run in fixed priority order and the first hit wins: clipped
/// above suggests [`Anchor::South`], below [`Anchor::North`], right
/// [`Anchor::West`], left [`Anchor::East`]. The caller's preferred
/// `current` anchor is accepted for signature stability but does not
/// influence the result.
pub fn suggest_anchor(
    _current: Anchor,
    offset: Offset,
    popover: Size,
    viewport: Viewport,
) -> Option<Anchor> {
    // too high
    if offset.top < viewport.scroll_top {
        return Some(Anchor::South);
    }
    // too low
    if offset.top + popover.height > viewport.scroll_top + viewport.height {
        return Some(Anchor::North);
    }
    // too far to the right
    if offset.left + popover.width > viewport.scroll_left + viewport.width {
        return Some(Anchor::West);
    }
    // too far to the left
    if offset.left < viewport.scroll_left {
        return Some(Anchor::East);
    }
    None
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const TARGET: Rect = Rect {
        top: 100.0,
        left: 100.0,
        width: 50.0,
        height: 20.0,
    };
    const POPOVER: Size = Size {
        width: 30.0,
        height: 40.0,
    };

    fn offset(top: f64, left: f64) -> Offset {
        Offset { top, left }
    }

    #[test]
    fn offsets_match_placement_table() {
        let cases = [
            (Anchor::North, offset(60.0, 110.0)),
            (Anchor::NorthWest, offset(100.0, 70.0)),
            (Anchor::NorthEast, offset(100.0, 150.0)),
            (Anchor::South, offset(120.0, 110.0)),
            (Anchor::SouthWest, offset(86.0, 70.0)),
            (Anchor::SouthEast, offset(86.0, 150.0)),
            (Anchor::East, offset(90.0, 150.0)),
            (Anchor::West, offset(90.0, 70.0)),
        ];
        for (anchor, want) in cases {
            assert_eq!(
                compute_offset(anchor, TARGET, POPOVER),
                want,
                "anchor {anchor}"
            );
        }
    }

    #[test]
    fn south_diagonals_carry_vertical_bias() {
        // 100 + 20 - 40 * 0.85 = 86
        let off = compute_offset(Anchor::SouthWest, TARGET, POPOVER);
        assert_eq!(off.top, 86.0);
    }

    #[test]
    fn fitting_placement_yields_no_suggestion() {
        let vp = Viewport {
            scroll_top: 0.0,
            scroll_left: 0.0,
            width: 800.0,
            height: 600.0,
        };
        assert_eq!(
            suggest_anchor(Anchor::East, offset(90.0, 150.0), POPOVER, vp),
            None
        );
    }

    #[test]
    fn clipped_above_suggests_south() {
        let vp = Viewport {
            scroll_top: 0.0,
            scroll_left: 0.0,
            width: 800.0,
            height: 600.0,
        };
        assert_eq!(
            suggest_anchor(Anchor::North, offset(-5.0, 10.0), POPOVER, vp),
            Some(Anchor::South)
        );
    }

    #[test]
    fn above_check_outranks_all_others() {
        // Clipped above and far off every other edge at once.
        let vp = Viewport {
            scroll_top: 50.0,
            scroll_left: 50.0,
            width: 100.0,
            height: 100.0,
        };
        assert_eq!(
            suggest_anchor(Anchor::West, offset(0.0, 10_000.0), POPOVER, vp),
            Some(Anchor::South)
        );
    }

    #[test]
    fn remaining_checks_run_in_priority_order() {
        let vp = Viewport {
            scroll_top: 0.0,
            scroll_left: 0.0,
            width: 800.0,
            height: 600.0,
        };
        // Below beats right: bottom overflow and right overflow together.
        assert_eq!(
            suggest_anchor(Anchor::South, offset(590.0, 790.0), POPOVER, vp),
            Some(Anchor::North)
        );
        // Right beats left-only impossible; check right alone.
        assert_eq!(
            suggest_anchor(Anchor::East, offset(100.0, 790.0), POPOVER, vp),
            Some(Anchor::West)
        );
        // Left alone.
        assert_eq!(
            suggest_anchor(Anchor::West, offset(100.0, -1.0), POPOVER, vp),
            Some(Anchor::East)
        );
    }

    #[test]
    fn scrolled_viewport_shifts_the_bounds() {
        let vp = Viewport {
            scroll_top: 500.0,
            scroll_left: 0.0,
            width: 800.0,
            height: 600.0,
        };
        // top=490 is above the scrolled-to region even though positive.
        assert_eq!(
            suggest_anchor(Anchor::East, offset(490.0, 100.0), POPOVER, vp),
            Some(Anchor::South)
        );
        assert_eq!(
            suggest_anchor(Anchor::East, offset(510.0, 100.0), POPOVER, vp),
            None
        );
    }

    proptest! {
        #[test]
        fn cardinal_anchors_center_on_the_target(
            top in 0.0..10_000.0f64,
            left in 0.0..10_000.0f64,
            tw in 0.0..500.0f64,
            th in 0.0..500.0f64,
            ew in 0.0..500.0f64,
            eh in 0.0..500.0f64,
        ) {
            let target = Rect { top, left, width: tw, height: th };
            let size = Size { width: ew, height: eh };

            // North/South center horizontally.
            for anchor in [Anchor::North, Anchor::South] {
                let off = compute_offset(anchor, target, size);
                prop_assert!((off.left + ew / 2.0 - (left + tw / 2.0)).abs() < 1e-9);
            }
            // East/West center vertically.
            for anchor in [Anchor::East, Anchor::West] {
                let off = compute_offset(anchor, target, size);
                prop_assert!((off.top + eh / 2.0 - (top + th / 2.0)).abs() < 1e-9);
            }
        }

        #[test]
        fn no_suggestion_implies_the_popover_fits(
            off_top in -1_000.0..11_000.0f64,
            off_left in -1_000.0..11_000.0f64,
            ew in 0.0..500.0f64,
            eh in 0.0..500.0f64,
            scroll_top in 0.0..5_000.0f64,
            scroll_left in 0.0..5_000.0f64,
            vw in 1.0..2_000.0f64,
            vh in 1.0..2_000.0f64,
        ) {
            let vp = Viewport { scroll_top, scroll_left, width: vw, height: vh };
            let size = Size { width: ew, height: eh };
            let off = Offset { top: off_top, left: off_left };
            if suggest_anchor(Anchor::East, off, size, vp).is_none() {
                prop_assert!(off.top >= scroll_top);
                prop_assert!(off.top + eh <= scroll_top + vh);
                prop_assert!(off.left >= scroll_left);
                prop_assert!(off.left + ew <= scroll_left + vw);
            }
        }
    }
}
