/// A named seed shape. Cells are 0-indexed `(row, col)` offsets from the
/// pattern's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "glider",
        cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
    },
    Pattern {
        name: "blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "block",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
    },
    Pattern {
        name: "toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "beacon",
        cells: &[
            (0, 0),
            (0, 1),
            (1, 0),
            (1, 1),
            (2, 2),
            (2, 3),
            (3, 2),
            (3, 3),
        ],
    },
    Pattern {
        name: "r-pentomino",
        cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
    },
];

impl Pattern {
    /// Case-insensitive lookup by name.
    pub fn by_name(name: &str) -> Option<&'static Pattern> {
        PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// `(height, width)` of the bounding box.
    pub fn extent(&self) -> (usize, usize) {
        let height = self.cells.iter().map(|&(r, _)| r + 1).max().unwrap_or(0);
        let width = self.cells.iter().map(|&(_, c)| c + 1).max().unwrap_or(0);
        (height, width)
    }

    /// Absolute coordinates of the pattern placed at `origin`, keeping only
    /// cells that land on a `size x size` board.
    pub fn placed_at(&self, origin: (usize, usize), size: usize) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .map(|&(r, c)| (origin.0 + r, origin.1 + c))
            .filter(|&(r, c)| r < size && c < size)
            .collect()
    }

    /// Absolute coordinates of the pattern centred on a `size x size` board.
    pub fn centered(&self, size: usize) -> Vec<(usize, usize)> {
        let (height, width) = self.extent();
        let origin = (
            (size / 2).saturating_sub(height / 2),
            (size / 2).saturating_sub(width / 2),
        );
        self.placed_at(origin, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Pattern::by_name("Glider").map(|p| p.name), Some("glider"));
        assert!(Pattern::by_name("gosper").is_none());
    }

    #[test]
    fn test_extent() {
        let beacon = Pattern::by_name("beacon").unwrap();
        assert_eq!(beacon.extent(), (4, 4));
    }

    #[test]
    fn test_placement_clips_to_board() {
        let block = Pattern::by_name("block").unwrap();
        assert_eq!(block.placed_at((2, 2), 3), vec![(2, 2)]);
        assert_eq!(block.centered(4), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }
}
