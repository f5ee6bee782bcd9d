//! This module defines the `Tape`, an unbounded single tape with a read/write head.
//!
//! Storage grows by one blank cell whenever the head steps past either end, so the
//! head index always addresses a real cell.

use crate::types::{Symbol, TAPE_PADDING};
use std::collections::VecDeque;
use std::fmt;

/// A centered view of the tape returned by [`Tape::visible_window`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// The visible cells.
    pub cells: Vec<Symbol>,
    /// Index of the head inside `cells`.
    pub head: usize,
    /// Absolute index of `cells[0]` in the tape storage.
    pub offset: usize,
}

/// Unbounded bidirectional tape storage with a head position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<Symbol>,
    head: usize,
    blank: Symbol,
}

impl Tape {
    /// Creates a blank tape: `2 * TAPE_PADDING` blank cells with the head at `TAPE_PADDING`.
    pub fn new(blank: Symbol) -> Self {
        Self::with_content("", blank)
    }

    /// Creates a tape holding `content` between two runs of `TAPE_PADDING` blanks.
    /// The head starts on the first content cell.
    pub fn with_content(content: &str, blank: Symbol) -> Self {
        let mut tape = Self {
            cells: VecDeque::new(),
            head: 0,
            blank,
        };
        tape.fill(content.chars());
        tape
    }

    /// Rebuilds a tape from previously recorded storage and head position.
    ///
    /// An empty `cells` falls back to a blank tape and an out of range head is clamped
    /// to the last cell.
    pub fn restore(cells: Vec<Symbol>, head: usize, blank: Symbol) -> Self {
        if cells.is_empty() {
            return Self::new(blank);
        }

        let head = head.min(cells.len() - 1);
        Self {
            cells: cells.into(),
            head,
            blank,
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Replaces the symbol under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell to the left, growing the tape when at the left edge.
    pub fn move_left(&mut self) {
        if self.head == 0 {
            self.cells.push_front(self.blank);
        } else {
            self.head -= 1;
        }
    }

    /// Moves the head one cell to the right, growing the tape when at the right edge.
    pub fn move_right(&mut self) {
        self.head += 1;
        if self.head >= self.cells.len() {
            self.cells.push_back(self.blank);
        }
    }

    /// Returns up to `size` cells centered on the head.
    ///
    /// Near either end of storage the window slides inward to stay full instead of
    /// being cut short; it is only shorter than `size` when the whole tape is.
    pub fn visible_window(&self, size: usize) -> Window {
        let start = self.head.saturating_sub(size / 2);
        let end = (start + size).min(self.cells.len());
        let start = end.saturating_sub(size);

        Window {
            cells: self.cells.range(start..end).copied().collect(),
            head: self.head - start,
            offset: start,
        }
    }

    /// Replaces the storage with fresh padding around `content` (or nothing) and
    /// recenters the head on the padding boundary.
    pub fn reset(&mut self, content: Option<&str>) {
        self.fill(content.unwrap_or_default().chars());
    }

    /// Returns an independent copy of the whole storage.
    pub fn cells(&self) -> Vec<Symbol> {
        self.cells.iter().copied().collect()
    }

    /// Returns the tape content with the blank runs at both ends removed.
    pub fn content(&self) -> String {
        let cells: String = self.cells.iter().collect();
        cells.trim_matches(self.blank).to_string()
    }

    /// Current head index into the storage.
    pub fn head(&self) -> usize {
        self.head
    }

    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// Number of cells currently allocated.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn fill(&mut self, content: impl Iterator<Item = Symbol>) {
        let padding = std::iter::repeat(self.blank).take(TAPE_PADDING);
        self.cells = padding.clone().chain(content).chain(padding).collect();
        self.head = TAPE_PADDING;
    }
}

impl fmt::Display for Tape {
    /// Renders the storage on one line and a `^` under the head on the next.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: String = self.cells.iter().collect();
        writeln!(f, "{cells}")?;
        write!(f, "{:>width$}", "^", width = self.head + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_BLANK_SYMBOL;

    const BLANK: Symbol = DEFAULT_BLANK_SYMBOL;

    #[test]
    fn test_new_tape_is_padded_blank() {
        let tape = Tape::new(BLANK);

        assert_eq!(tape.len(), 2 * TAPE_PADDING);
        assert_eq!(tape.head(), TAPE_PADDING);
        assert_eq!(tape.read(), BLANK);
        assert_eq!(tape.content(), "");
    }

    #[test]
    fn test_with_content_places_head_on_first_symbol() {
        let tape = Tape::with_content("1011", BLANK);

        assert_eq!(tape.len(), 2 * TAPE_PADDING + 4);
        assert_eq!(tape.head(), TAPE_PADDING);
        assert_eq!(tape.read(), '1');
        assert_eq!(tape.content(), "1011");
    }

    #[test]
    fn test_write_then_read() {
        let mut tape = Tape::new(BLANK);
        tape.write('x');
        assert_eq!(tape.read(), 'x');
        assert_eq!(tape.content(), "x");
    }

    #[test]
    fn test_move_left_extends_storage() {
        let mut tape = Tape::with_content("ab", BLANK);
        for _ in 0..TAPE_PADDING {
            tape.move_left();
        }
        assert_eq!(tape.head(), 0);
        let len = tape.len();

        tape.move_left();
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.len(), len + 1);
        assert_eq!(tape.read(), BLANK);

        tape.write('z');
        assert_eq!(tape.content(), format!("z{}ab", "_".repeat(TAPE_PADDING)));
    }

    #[test]
    fn test_move_right_extends_storage() {
        let mut tape = Tape::with_content("ab", BLANK);
        let len = tape.len();
        for _ in 0..(len - TAPE_PADDING) {
            tape.move_right();
        }

        assert_eq!(tape.head(), len);
        assert_eq!(tape.len(), len + 1);
        assert_eq!(tape.read(), BLANK);
    }

    #[test]
    fn test_visible_window_centered() {
        let mut tape = Tape::with_content("abcdefghijklmnopqrstuvwxyz", BLANK);
        for _ in 0..13 {
            tape.move_right();
        }

        let window = tape.visible_window(6);
        assert_eq!(window.cells, vec!['k', 'l', 'm', 'n', 'o', 'p']);
        assert_eq!(window.head, 3);
        assert_eq!(window.offset, TAPE_PADDING + 10);
        assert_eq!(window.cells[window.head], tape.read());
    }

    #[test]
    fn test_visible_window_slides_at_left_edge() {
        let mut tape = Tape::with_content("abc", BLANK);
        for _ in 0..TAPE_PADDING {
            tape.move_left();
        }

        let window = tape.visible_window(8);
        assert_eq!(window.offset, 0);
        assert_eq!(window.head, 0);
        assert_eq!(window.cells.len(), 8);
    }

    #[test]
    fn test_visible_window_slides_at_right_edge() {
        let mut tape = Tape::with_content("abc", BLANK);
        let last = tape.len() - 1;
        for _ in tape.head()..last {
            tape.move_right();
        }

        let window = tape.visible_window(8);
        assert_eq!(window.cells.len(), 8);
        assert_eq!(window.offset, tape.len() - 8);
        assert_eq!(window.head, 7);
    }

    #[test]
    fn test_visible_window_larger_than_tape() {
        let tape = Tape::new(BLANK);
        let window = tape.visible_window(100);

        assert_eq!(window.cells.len(), tape.len());
        assert_eq!(window.offset, 0);
        assert_eq!(window.head, TAPE_PADDING);
    }

    #[test]
    fn test_visible_window_single_cell() {
        let tape = Tape::with_content("xyz", BLANK);
        let window = tape.visible_window(1);

        assert_eq!(window.cells, vec!['x']);
        assert_eq!(window.head, 0);
        assert_eq!(window.offset, TAPE_PADDING);
    }

    #[test]
    fn test_reset_recenters_head() {
        let mut tape = Tape::with_content("abc", BLANK);
        tape.move_right();
        tape.write('X');

        tape.reset(Some("01"));
        assert_eq!(tape.head(), TAPE_PADDING);
        assert_eq!(tape.content(), "01");

        tape.reset(None);
        assert_eq!(tape.content(), "");
        assert_eq!(tape.len(), 2 * TAPE_PADDING);
    }

    #[test]
    fn test_restore_round_trips_cells() {
        let mut tape = Tape::with_content("abc", BLANK);
        tape.move_right();
        let restored = Tape::restore(tape.cells(), tape.head(), BLANK);
        assert_eq!(restored, tape);

        let empty = Tape::restore(Vec::new(), 5, BLANK);
        assert_eq!(empty, Tape::new(BLANK));
    }

    #[test]
    fn test_display_marks_head() {
        let mut tape = Tape::restore(vec!['a', 'b', 'c'], 0, BLANK);
        tape.move_right();
        assert_eq!(tape.to_string(), "abc\n ^");
    }
}
