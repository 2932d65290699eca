use std::fmt;

/// Grid coordinate `(x, y, z)`
pub type Position = (usize, usize, usize);

/// One of the six axis-aligned moves.
///
/// The declaration order is the cell bit order: `N` is bit 0, `D` is bit 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// -x
    N,
    /// +x
    S,
    /// +y
    E,
    /// -y
    W,
    /// +z
    U,
    /// -z
    D,
}

/// Sequence of moves from the maze start to an exit
pub type Path = Vec<Direction>;

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::N,
        Direction::S,
        Direction::E,
        Direction::W,
        Direction::U,
        Direction::D,
    ];

    pub fn bit(self) -> u64 {
        1 << (self as u32)
    }

    pub fn symbol(self) -> char {
        match self {
            Self::N => 'N',
            Self::S => 'S',
            Self::E => 'E',
            Self::W => 'W',
            Self::U => 'U',
            Self::D => 'D',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.symbol() == symbol)
    }

    pub fn vector(self) -> (isize, isize, isize) {
        match self {
            Self::N => (-1, 0, 0),
            Self::S => (1, 0, 0),
            Self::E => (0, 1, 0),
            Self::W => (0, -1, 0),
            Self::U => (0, 0, 1),
            Self::D => (0, 0, -1),
        }
    }

    /// Target of this move from `pos`, or `None` when it leaves `[0, size)`
    pub fn step(self, pos: Position, size: usize) -> Option<Position> {
        let (dx, dy, dz) = self.vector();
        let axis = |v: usize, d: isize| {
            v.checked_add_signed(d).filter(|&moved| moved < size)
        };
        Some((axis(pos.0, dx)?, axis(pos.1, dy)?, axis(pos.2, dz)?))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Concatenated symbols, the byte form hashed by checksums and commitments
pub fn path_symbols(path: &[Direction]) -> String {
    path.iter().map(|d| d.symbol()).collect()
}

/// Parse a symbol string such as `"SSEU"`; any other character is rejected
pub fn parse_path(symbols: &str) -> Option<Path> {
    symbols.chars().map(Direction::from_symbol).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_order() {
        let bits: Vec<u64> = Direction::ALL.iter().map(|d| d.bit()).collect();
        assert_eq!(bits, vec![1, 2, 4, 8, 16, 32]);
    }

    #[test]
    fn test_step_bounds() {
        assert_eq!(Direction::S.step((0, 0, 0), 4), Some((1, 0, 0)));
        assert_eq!(Direction::N.step((0, 0, 0), 4), None);
        assert_eq!(Direction::U.step((1, 2, 3), 4), None);
        assert_eq!(Direction::W.step((1, 2, 3), 4), Some((1, 1, 3)));
    }

    #[test]
    fn test_parse_path() {
        let path = parse_path("NSEWUD").unwrap();
        assert_eq!(path, Direction::ALL.to_vec());
        assert_eq!(path_symbols(&path), "NSEWUD");
        assert!(parse_path("NSX").is_none());
        assert_eq!(parse_path(""), Some(vec![]));
    }
}
