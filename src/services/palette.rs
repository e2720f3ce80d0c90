//! Palette allocator — deterministic display colors for room members.
//!
//! DESIGN
//! ======
//! A fixed 20-entry palette indexed by a per-room monotonic counter, modulo
//! the palette length. Colors repeat once a room exceeds 20 concurrent
//! members; that is a cosmetic collision, not a correctness problem, so no
//! reclamation is attempted when members leave.

/// Display colors assigned to joining participants, in assignment order.
const USER_COLORS: [&str; 20] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#46f0f0",
    "#f032e6", "#bcf60c", "#fabebe", "#008080", "#e6beff", "#9a6324",
    "#fffac8", "#800000", "#aaffc3", "#808000", "#ffd8b1", "#000075",
    "#808080", "#000000",
];

/// Color for the nth join in a room. Cycles past the palette end.
#[must_use]
pub fn color_at(index: usize) -> &'static str {
    USER_COLORS[index % USER_COLORS.len()]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_deterministic() {
        assert_eq!(color_at(0), "#e6194b");
        assert_eq!(color_at(1), "#3cb44b");
        assert_eq!(color_at(19), "#000000");
    }

    #[test]
    fn cycles_past_palette_end() {
        assert_eq!(color_at(20), color_at(0));
        assert_eq!(color_at(41), color_at(1));
    }

    #[test]
    fn all_entries_are_distinct() {
        for i in 0..20 {
            for j in (i + 1)..20 {
                assert_ne!(color_at(i), color_at(j));
            }
        }
    }
}
