//! Global tile ids as they appear in layer data.

pub const FLIP_H: u32 = 0x8000_0000; // bit 31
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits (bit 28 is free)

/// Raw GID from a layer cell, flip flags included. `0` is an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileId(pub u32);

/// Flip flags carried in the top bits of a GID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flip {
    /// Mirror horizontally
    pub horizontal: bool,
    /// Mirror vertically
    pub vertical: bool,
    /// Swap x and y (anti-diagonal transpose)
    pub diagonal: bool,
}

impl TileId {
    #[inline] pub fn raw(self) -> u32 { self.0 }
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    #[inline] pub fn is_empty(self) -> bool { self.clean() == 0 }
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }

    #[inline]
    pub fn flip(self) -> Flip {
        Flip {
            horizontal: self.flip_h(),
            vertical: self.flip_v(),
            diagonal: self.flip_d(),
        }
    }
}

impl Flip {
    /// No flip at all.
    pub const NONE: Flip = Flip {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_flip_bits() {
        let id = TileId(5 | FLIP_H | FLIP_D);
        assert_eq!(id.clean(), 5);
        assert!(id.flip_h());
        assert!(!id.flip_v());
        assert!(id.flip_d());
    }

    #[test]
    fn flags_alone_are_an_empty_cell() {
        assert!(TileId(FLIP_V).is_empty());
        assert!(TileId(0).is_empty());
        assert!(!TileId(1).is_empty());
    }
}
