//! Parametric positions of the Schulz-Mihov Levenshtein automaton.

/// `(offset, edits)`: the automaton sits at word index `base + offset`
/// having spent `edits` errors, for a base index that is only bound at
/// query time.
///
/// Field order matters: the derived `Ord` sorts by offset, then edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Position {
    pub offset: i32,
    pub edits: u8,
}

impl Position {
    pub const fn new(offset: i32, edits: u8) -> Self {
        Self { offset, edits }
    }

    /// `self` reaches every string `other` reaches, with fewer errors.
    pub fn subsumes(&self, other: &Position) -> bool {
        self.edits < other.edits
            && (self.offset - other.offset).abs() <= i32::from(other.edits - self.edits)
    }

    /// Offset minus edits; the largest one decides acceptance and the
    /// final distance of a state.
    pub fn base_offset(&self) -> i32 {
        self.offset - i32::from(self.edits)
    }

    /// Elementary transition on one input character.
    ///
    /// Bit `k` of `vector` is set when word index `base + k` equals the input
    /// character; only the first `window` bits exist, anything past them lies
    /// beyond the end of the word.
    pub fn successors(&self, vector: u32, window: u32, max_distance: u8, out: &mut Vec<Position>) {
        let offset = self.offset as u32;
        let matches_at = |k: u32| k < window && (vector >> k) & 1 == 1;

        if matches_at(offset) {
            out.push(Position::new(self.offset + 1, self.edits));
            return;
        }
        if self.edits >= max_distance {
            return;
        }

        // insertion
        out.push(Position::new(self.offset, self.edits + 1));
        // substitution, impossible once the word is exhausted
        if offset < window {
            out.push(Position::new(self.offset + 1, self.edits + 1));
        }
        // deletion of the j word characters before the nearest match
        for j in 1..=u32::from(max_distance - self.edits) {
            if matches_at(offset + j) {
                out.push(Position::new(self.offset + j as i32 + 1, self.edits + j as u8));
                break;
            }
        }
    }
}

/// Every position reachable from `(0, 0)` within `max_distance` edits:
/// offsets in `[-e, e]` for each edit count `e`, ordered by edits first.
pub(crate) fn subsumption_triangle(max_distance: u8) -> Vec<Position> {
    (0..=max_distance)
        .flat_map(|e| {
            let reach = i32::from(e);
            (-reach..=reach).map(move |offset| Position::new(offset, e))
        })
        .collect()
}
