use serde::{Deserialize, Serialize};

/// What a cell holds, fixed once the board is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    Empty,
    /// Adjacent bomb count, always in `1..=8`.
    Number(u8),
    Bomb,
}

impl CellContent {
    /// Content of a safe cell with `adjacent` bombs around it.
    pub const fn from_adjacent(adjacent: u8) -> Self {
        if adjacent == 0 {
            Self::Empty
        } else {
            Self::Number(adjacent)
        }
    }

    pub const fn is_bomb(self) -> bool {
        matches!(self, Self::Bomb)
    }

    /// Adjacent bomb count for safe cells, `None` for bombs.
    pub const fn adjacent_bombs(self) -> Option<u8> {
        match self {
            Self::Empty => Some(0),
            Self::Number(count) => Some(count),
            Self::Bomb => None,
        }
    }
}

impl Default for CellContent {
    fn default() -> Self {
        Self::Empty
    }
}

/// What the player sees of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Hidden,
    Revealed,
    Flagged,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    content: CellContent,
    visibility: Visibility,
    highlighted: bool,
}

impl Cell {
    pub(crate) const fn new(content: CellContent) -> Self {
        Self {
            content,
            visibility: Visibility::Hidden,
            highlighted: false,
        }
    }

    pub const fn content(self) -> CellContent {
        self.content
    }

    pub const fn visibility(self) -> Visibility {
        self.visibility
    }

    /// Set only on the bomb that ended a lost game.
    pub const fn is_highlighted(self) -> bool {
        self.highlighted
    }

    pub const fn is_bomb(self) -> bool {
        self.content.is_bomb()
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self.visibility, Visibility::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.visibility, Visibility::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.visibility, Visibility::Flagged)
    }

    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }
}
