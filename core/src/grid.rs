use alloc::collections::VecDeque;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::array_size;
use crate::*;

/// A board of cells with bombs placed and adjacency numbers computed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    cells: Array2<Cell>,
    bomb_count: CellCount,
}

#[derive(Deserialize)]
struct RawGrid {
    cells: Array2<Cell>,
    bomb_count: CellCount,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GameError;

    /// Rebuilds the board from its bomb positions, the stored numbers and count must agree with it.
    fn try_from(raw: RawGrid) -> Result<Self> {
        let mut grid = Self::from_bomb_mask(raw.cells.map(|cell| cell.is_bomb()))?;
        if grid.bomb_count != raw.bomb_count {
            return Err(GameError::InvalidBoardShape);
        }

        for (cell, stored) in grid.cells.iter_mut().zip(raw.cells.iter()) {
            if cell.content() != stored.content() {
                return Err(GameError::InvalidBoardShape);
            }
            cell.set_visibility(stored.visibility());
            cell.set_highlighted(stored.is_highlighted());
        }

        Ok(grid)
    }
}

impl Grid {
    /// Builds a board from a bomb mask indexed by `(row, col)`.
    pub fn from_bomb_mask(bomb_mask: Array2<bool>) -> Result<Self> {
        let size = array_size(&bomb_mask).ok_or(GameError::InvalidBoardShape)?;
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        let mut bomb_count: CellCount = 0;
        let cells = Array2::from_shape_fn(bomb_mask.dim(), |(row, col)| {
            if bomb_mask[(row, col)] {
                bomb_count += 1;
                return Cell::new(CellContent::Bomb);
            }
            // array_size above guarantees indices fit in Coord
            let adjacent = NeighborIter::new((row as Coord, col as Coord), size)
                .filter(|&pos| bomb_mask[pos.to_nd_index()])
                .count() as u8;
            Cell::new(CellContent::from_adjacent(adjacent))
        });

        if bomb_count >= mult(size.0, size.1) {
            return Err(GameError::TooManyMines);
        }

        Ok(Self { cells, bomb_count })
    }

    pub fn from_bomb_coords(size: Coord2, bomb_coords: &[Coord2]) -> Result<Self> {
        let mut bomb_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in bomb_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            bomb_mask[coords.to_nd_index()] = true;
        }

        Self::from_bomb_mask(bomb_mask)
    }

    pub fn config(&self) -> GameConfig {
        let (rows, cols) = self.size();
        GameConfig::new_unchecked(rows, cols, self.bomb_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        // every constructor goes through from_bomb_mask, which rejects dimensions above Coord::MAX
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn bomb_count(&self) -> CellCount {
        self.bomb_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.bomb_count
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn adjacent_bomb_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_bomb())
            .count() as u8
    }

    /// All cells in row-major order together with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn revealed_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_revealed()).count() as CellCount
    }

    /// Whether any safe cell is still hidden, flagged cells do not count.
    pub fn has_hidden_safe_cell(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.is_hidden() && !cell.is_bomb())
    }

    /// Copies every flag of `other` onto this board, both must have the same size.
    pub(crate) fn copy_flags_from(&mut self, other: &Grid) {
        debug_assert_eq!(self.cells.dim(), other.cells.dim());
        self.cells.zip_mut_with(&other.cells, |cell, previous| {
            if previous.is_flagged() {
                cell.set_visibility(Visibility::Flagged);
            }
        });
    }

    pub(crate) fn set_visibility(&mut self, coords: Coord2, visibility: Visibility) {
        self.cells[coords.to_nd_index()].set_visibility(visibility);
    }

    /// Reveals a hidden safe cell, flooding through empty regions, returns how many cells were opened.
    pub(crate) fn reveal_safe(&mut self, coords: Coord2) -> CellCount {
        let cell = self[coords];
        if !cell.is_hidden() || cell.is_bomb() {
            return 0;
        }

        match cell.content() {
            CellContent::Empty => self.flood_reveal(coords),
            _ => {
                self.set_visibility(coords, Visibility::Revealed);
                1
            }
        }
    }

    /// Opens the connected empty region around `origin` and its numbered border.
    ///
    /// Uses an explicit work-list and a visited mask sized to the board, so every cell is queued at most once.
    fn flood_reveal(&mut self, origin: Coord2) -> CellCount {
        let mut visited: Array2<bool> = Array2::default(self.cells.dim());
        let mut to_visit = VecDeque::from([origin]);
        visited[origin.to_nd_index()] = true;
        let mut opened = 0;

        while let Some(coords) = to_visit.pop_front() {
            let cell = &mut self.cells[coords.to_nd_index()];

            // leave bombs, flags and already opened cells untouched
            if !cell.is_hidden() || cell.is_bomb() {
                continue;
            }

            cell.set_visibility(Visibility::Revealed);
            let content = cell.content();
            opened += 1;
            log::trace!("Flood opened cell at {:?}: {:?}", coords, content);

            if content == CellContent::Empty {
                for neighbor in self.iter_neighbors(coords) {
                    let seen = &mut visited[neighbor.to_nd_index()];
                    if !*seen {
                        *seen = true;
                        to_visit.push_back(neighbor);
                    }
                }
            }
        }

        opened
    }

    /// Shows every bomb after a loss, only the triggering one is highlighted.
    pub(crate) fn explode(&mut self, triggered: Coord2) {
        for cell in self.cells.iter_mut().filter(|cell| cell.is_bomb()) {
            cell.set_visibility(Visibility::Revealed);
        }
        self.cells[triggered.to_nd_index()].set_highlighted(true);
    }

    /// Marks every bomb as flagged after a win.
    pub(crate) fn flag_bombs(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.is_bomb()) {
            cell.set_visibility(Visibility::Flagged);
        }
    }

    pub fn highlighted(&self) -> Option<Coord2> {
        self.iter()
            .find(|(_, cell)| cell.is_highlighted())
            .map(|(coords, _)| coords)
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn grid(size: Coord2, bombs: &[Coord2]) -> Grid {
        Grid::from_bomb_coords(size, bombs).unwrap()
    }

    fn revealed(grid: &Grid) -> Vec<Coord2> {
        grid.iter()
            .filter(|(_, cell)| cell.is_revealed())
            .map(|(coords, _)| coords)
            .collect()
    }

    #[test]
    fn numbers_count_adjacent_bombs() {
        let grid = grid((3, 3), &[(0, 0), (1, 0), (1, 1)]);

        assert_eq!(grid[(0, 1)].content(), CellContent::Number(3));
        assert_eq!(grid[(2, 2)].content(), CellContent::Number(1));
        assert_eq!(grid[(0, 2)].content(), CellContent::Number(1));
        assert_eq!(grid[(2, 0)].content(), CellContent::Number(2));
        assert_eq!(grid[(1, 1)].content(), CellContent::Bomb);
        assert_eq!(grid.bomb_count(), 3);
        assert_eq!(grid.safe_cell_count(), 6);
    }

    #[test]
    fn surrounded_cell_counts_eight() {
        let bombs: Vec<_> = NeighborIter::new((1, 1), (3, 3)).collect();
        let grid = grid((3, 3), &bombs);

        assert_eq!(grid[(1, 1)].content(), CellContent::Number(8));
    }

    #[test]
    fn cells_far_from_bombs_are_empty() {
        let grid = grid((1, 4), &[(0, 0)]);

        assert_eq!(grid[(0, 1)].content(), CellContent::Number(1));
        assert_eq!(grid[(0, 2)].content(), CellContent::Empty);
        assert_eq!(grid[(0, 3)].content(), CellContent::Empty);
    }

    #[test]
    fn rejects_bad_layouts() {
        assert_eq!(
            Grid::from_bomb_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(
            Grid::from_bomb_coords((0, 3), &[]),
            Err(GameError::EmptyBoard)
        );
        assert_eq!(
            Grid::from_bomb_coords((1, 2), &[(0, 0), (0, 1)]),
            Err(GameError::TooManyMines)
        );
    }

    #[test]
    fn flood_reveals_region_and_numbered_border() {
        // 0 0 0 0
        // 1 1 0 0
        // * 1 1 1
        // 1 1 1 *
        let mut grid = grid((4, 4), &[(2, 0), (3, 3)]);

        let opened = grid.reveal_safe((0, 0));

        assert_eq!(opened, 11);
        assert!(grid[(1, 0)].is_revealed());
        assert!(grid[(2, 1)].is_revealed());
        assert!(grid[(2, 3)].is_revealed());
        // behind the numbered border
        assert!(grid[(3, 0)].is_hidden());
        assert!(grid[(3, 1)].is_hidden());
        assert!(grid[(2, 0)].is_hidden());
        assert!(grid[(3, 3)].is_hidden());
    }

    #[test]
    fn flood_stops_at_flags() {
        let mut grid = grid((1, 5), &[(0, 4)]);
        grid.set_visibility((0, 1), Visibility::Flagged);

        let opened = grid.reveal_safe((0, 0));

        assert_eq!(opened, 1);
        assert_eq!(revealed(&grid), [(0, 0)]);
        assert!(grid[(0, 1)].is_flagged());
    }

    #[test]
    fn numbered_cell_reveals_alone() {
        let mut grid = grid((3, 3), &[(0, 0)]);

        assert_eq!(grid.reveal_safe((1, 1)), 1);
        assert_eq!(revealed(&grid), [(1, 1)]);
    }

    #[test]
    fn flood_covers_large_open_board() {
        let mut grid = grid((Coord::MAX, Coord::MAX), &[]);

        let opened = grid.reveal_safe((127, 127));

        assert_eq!(opened, grid.total_cells());
        assert!(!grid.has_hidden_safe_cell());
    }

    #[test]
    fn explode_highlights_only_trigger() {
        let mut grid = grid((2, 2), &[(0, 0), (1, 1)]);
        grid.set_visibility((1, 1), Visibility::Flagged);

        grid.explode((0, 0));

        assert!(grid[(0, 0)].is_revealed());
        assert!(grid[(1, 1)].is_revealed());
        assert!(grid[(0, 0)].is_highlighted());
        assert!(!grid[(1, 1)].is_highlighted());
        assert_eq!(grid.highlighted(), Some((0, 0)));
        assert!(grid[(0, 1)].is_hidden());
    }

    #[test]
    fn adjacent_bomb_count_matches_numbers() {
        let grid = grid((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(grid.adjacent_bomb_count((1, 1)), 2);
        assert_eq!(grid.adjacent_bomb_count((0, 2)), 0);
        assert_eq!(grid.adjacent_bomb_count((0, 0)), 0);
    }

    #[test]
    fn deserialize_keeps_visibility() {
        let mut grid = grid((2, 3), &[(0, 0)]);
        grid.set_visibility((1, 2), Visibility::Revealed);
        grid.set_visibility((0, 0), Visibility::Flagged);

        let json = serde_json::to_string(&grid).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, grid);
    }

    #[test]
    fn deserialize_rejects_tampered_boards() {
        let grid = grid((1, 2), &[(0, 1)]);
        let json = serde_json::to_string(&grid).unwrap();

        let wrong_count = json.replace(r#""bomb_count":1"#, r#""bomb_count":2"#);
        assert!(serde_json::from_str::<Grid>(&wrong_count).is_err());

        let wrong_number = json.replace(r#"{"Number":1}"#, r#"{"Number":3}"#);
        assert_ne!(wrong_number, json);
        assert!(serde_json::from_str::<Grid>(&wrong_number).is_err());

        let all_bombs = json.replace(r#"{"Number":1}"#, r#""Bomb""#);
        assert!(serde_json::from_str::<Grid>(&all_bombs).is_err());
    }

    #[test]
    fn deserialize_rejects_empty_board() {
        let empty = r#"{"cells":{"v":1,"dim":[0,2],"data":[]},"bomb_count":0}"#;
        assert!(serde_json::from_str::<Grid>(empty).is_err());
    }
}
