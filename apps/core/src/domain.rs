use serde::{Deserialize, Serialize};

/// Transport mode tag attached to a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mode {
    Air,
    Rail,
    Bus,
    Ferry,
    Bike,
}

impl Mode {
    pub const ALL: [Self; 5] = [Self::Air, Self::Rail, Self::Bus, Self::Ferry, Self::Bike];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Air => "Air",
            Self::Rail => "Rail",
            Self::Bus => "Bus",
            Self::Ferry => "Ferry",
            Self::Bike => "Bike",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Air),
            1 => Some(Self::Rail),
            2 => Some(Self::Bus),
            3 => Some(Self::Ferry),
            4 => Some(Self::Bike),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Air => 0,
            Self::Rail => 1,
            Self::Bus => 2,
            Self::Ferry => 3,
            Self::Bike => 4,
        }
    }

    /// Accepts any casing; "transit" is the older name for bus service.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "air" => Some(Self::Air),
            "rail" => Some(Self::Rail),
            "bus" | "transit" => Some(Self::Bus),
            "ferry" => Some(Self::Ferry),
            "bike" => Some(Self::Bike),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Air => "Air",
            Self::Rail => "Rail",
            Self::Bus => "Bus / Transit",
            Self::Ferry => "Ferry",
            Self::Bike => "Bike share",
        }
    }

    /// Chip colour as an `(r, g, b)` triple.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Air => (96, 165, 250),
            Self::Rail => (248, 113, 113),
            Self::Bus => (52, 211, 153),
            Self::Ferry => (34, 211, 238),
            Self::Bike => (250, 204, 21),
        }
    }

    pub fn hex(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
