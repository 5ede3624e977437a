//! Particle species (the "type" tag of a particle)
//!
//! A species decides two things: the display colour handed to the rendering
//! sink and the row/column used to look up the attraction matrix.

use serde::Deserialize;

/// One of the six named particle species
/// The discriminant is the dense matrix index
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Red = 0,
    Orange = 1,
    Yellow = 2,
    Green = 3,
    Blue = 4,
    Purple = 5,
}

impl Species {
    /// Number of named species
    pub const COUNT: usize = 6;

    /// All species in index order
    pub const ALL: [Species; Species::COUNT] = [
        Species::Red,
        Species::Orange,
        Species::Yellow,
        Species::Green,
        Species::Blue,
        Species::Purple,
    ];

    /// Dense index into the attraction matrix
    pub fn index(self) -> usize {
        self as usize
    }

    /// Species for a dense index, `None` when out of range
    pub fn from_index(index: usize) -> Option<Species> {
        Self::ALL.get(index).copied()
    }

    /// Display colour as 8-bit `[r, g, b]`
    pub fn color(self) -> [u8; 3] {
        match self {
            Species::Red => [0xEE, 0x22, 0x22],
            Species::Orange => [0xEE, 0x88, 0x22],
            Species::Yellow => [0xEE, 0xEE, 0x22],
            Species::Green => [0x22, 0xEE, 0x22],
            Species::Blue => [0x22, 0x22, 0xEE],
            Species::Purple => [0x88, 0x22, 0xEE],
        }
    }

    /// Display colour as sRGB `[r, g, b]` in `0.0..=1.0`
    pub fn color_f32(self) -> [f32; 3] {
        let [r, g, b] = self.color();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Red => "red",
            Species::Orange => "orange",
            Species::Yellow => "yellow",
            Species::Green => "green",
            Species::Blue => "blue",
            Species::Purple => "purple",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_position_in_all() {
        for (i, s) in Species::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
            assert_eq!(Species::from_index(i), Some(*s));
        }
        assert_eq!(Species::from_index(Species::COUNT), None);
    }

    #[test]
    fn colors_are_distinct() {
        for a in Species::ALL {
            for b in Species::ALL {
                if a != b {
                    assert_ne!(a.color(), b.color(), "{} and {} share a colour", a.name(), b.name());
                }
            }
        }
    }
}
