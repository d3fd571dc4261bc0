//! Rock-paper-scissors conversion rule
//!
//! The dominant shape converts the other holder; the winner is unaffected.

use super::shape::Shape;

/// Resolve a contact between two shapes, returning the new `(a, b)`
#[inline]
pub fn apply_rule(a: Shape, b: Shape) -> (Shape, Shape) {
    if a.beats(b) {
        (a, a)
    } else if b.beats(a) {
        (b, b)
    } else {
        (a, b)
    }
}
