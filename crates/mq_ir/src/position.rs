//! Line-aware positions.
//!
//! `GraphemePosition` is stamped on tokens by the lexer; `Position` is a
//! caret supplied by a host editor. Both use the same code-unit metric
//! (byte offsets), so they compare directly by line then column.

use std::cmp::Ordering;

/// A token boundary: absolute code unit, code unit within the line, and
/// the zero-based line number.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct GraphemePosition {
    pub code_unit: u32,
    pub line_code_unit: u32,
    pub line_number: u32,
}

/// A caret position inside a document.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Position {
    pub line_number: u32,
    pub line_code_unit: u32,
}

impl Position {
    pub const fn new(line_number: u32, line_code_unit: u32) -> Self {
        Position {
            line_number,
            line_code_unit,
        }
    }

    /// Orders the caret against a token boundary.
    pub fn cmp_grapheme(&self, other: &GraphemePosition) -> Ordering {
        (self.line_number, self.line_code_unit).cmp(&(other.line_number, other.line_code_unit))
    }

    #[inline]
    pub fn is_before(&self, other: &GraphemePosition) -> bool {
        self.cmp_grapheme(other) == Ordering::Less
    }

    #[inline]
    pub fn is_on_or_before(&self, other: &GraphemePosition) -> bool {
        self.cmp_grapheme(other) != Ordering::Greater
    }

    #[inline]
    pub fn is_after(&self, other: &GraphemePosition) -> bool {
        self.cmp_grapheme(other) == Ordering::Greater
    }

    #[inline]
    pub fn is_on_or_after(&self, other: &GraphemePosition) -> bool {
        self.cmp_grapheme(other) != Ordering::Less
    }

    #[inline]
    pub fn is_on(&self, other: &GraphemePosition) -> bool {
        self.cmp_grapheme(other) == Ordering::Equal
    }
}

impl From<GraphemePosition> for Position {
    fn from(value: GraphemePosition) -> Self {
        Position {
            line_number: value.line_number,
            line_code_unit: value.line_code_unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grapheme(line_number: u32, line_code_unit: u32) -> GraphemePosition {
        GraphemePosition {
            code_unit: 0,
            line_code_unit,
            line_number,
        }
    }

    #[test]
    fn caret_orders_by_line_first() {
        let caret = Position::new(1, 0);
        assert!(caret.is_after(&grapheme(0, 99)));
        assert!(caret.is_before(&grapheme(2, 0)));
        assert!(caret.is_on(&grapheme(1, 0)));
    }
}
