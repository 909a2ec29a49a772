//! Screen edges an AppBar can be anchored to

/// Edge of a monitor the AppBar is bound to
///
/// The discriminants match the shell's `ABE_*` edge codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenEdge {
    Left = 0,
    Top = 1,
    Right = 2,
    Bottom = 3,
}

/// Dimension of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl ScreenEdge {
    pub const ALL: [ScreenEdge; 4] = [
        ScreenEdge::Left,
        ScreenEdge::Top,
        ScreenEdge::Right,
        ScreenEdge::Bottom,
    ];

    /// Dimension constrained by the margin when docked to this edge
    ///
    /// Width for `Left`/`Right`, height for `Top`/`Bottom`. The orthogonal
    /// dimension always spans the whole monitor.
    pub fn anchored_axis(self) -> Axis {
        match self {
            ScreenEdge::Left | ScreenEdge::Right => Axis::Horizontal,
            ScreenEdge::Top | ScreenEdge::Bottom => Axis::Vertical,
        }
    }

    /// Shell edge code (`ABE_LEFT` .. `ABE_BOTTOM`)
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Parses a shell edge code
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ScreenEdge::Left),
            1 => Some(ScreenEdge::Top),
            2 => Some(ScreenEdge::Right),
            3 => Some(ScreenEdge::Bottom),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScreenEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScreenEdge::Left => "left",
            ScreenEdge::Top => "top",
            ScreenEdge::Right => "right",
            ScreenEdge::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ScreenEdge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(ScreenEdge::Left),
            "top" => Ok(ScreenEdge::Top),
            "right" => Ok(ScreenEdge::Right),
            "bottom" => Ok(ScreenEdge::Bottom),
            other => Err(format!("unknown screen edge '{other}'")),
        }
    }
}
