use crate::cells::{offset_coordinate, Cartesian2DCoordinate, CoordinateSmallVec, GridCell, WallSide,
                   Walls};
use crate::units::{Height, Width};

use petgraph::graph::NodeIndex;
use petgraph::{Graph, Undirected};
use std::error::Error;
use std::fmt;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridError {
    /// Zero width or height at grid creation.
    InvalidDimension,
    /// A coordinate outside `[0, width) × [0, height)`.
    OutOfBounds,
    /// `open_wall_between` called on cells that are not one orthogonal step apart.
    NotAdjacent,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match *self {
            GridError::InvalidDimension => "grid dimensions must be positive",
            GridError::OutOfBounds => "coordinate is outside the grid",
            GridError::NotAdjacent => "cells are not orthogonally adjacent",
        };
        write!(f, "{}", reason)
    }
}

impl Error for GridError {
    fn description(&self) -> &str {
        match *self {
            GridError::InvalidDimension => "invalid grid dimension",
            GridError::OutOfBounds => "coordinate out of bounds",
            GridError::NotAdjacent => "cells not adjacent",
        }
    }
}

/// A rectangular grid of cells carrying per-cell wall and visited flags.
///
/// The walls between two adjacent cells are kept symmetric: carving a
/// passage clears the facing flag on both sides in one call.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Grid {
    width: Width,
    height: Height,
    cells: Vec<GridCell>,
}

impl Grid {
    pub fn new(width: Width, height: Height) -> Result<Grid, GridError> {
        let (Width(w), Height(h)) = (width, height);
        if w == 0 || h == 0 {
            return Err(GridError::InvalidDimension);
        }

        Ok(Grid {
            width,
            height,
            cells: vec![GridCell::enclosed(); w * h],
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width.0 * self.height.0
    }

    /// Is the grid coordinate within the grid's dimensions?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Result<&GridCell, GridError> {
        self.grid_coordinate_to_index(coord)
            .map(|index| &self.cells[index])
            .ok_or(GridError::OutOfBounds)
    }

    fn cell_mut(&mut self, coord: Cartesian2DCoordinate) -> Result<&mut GridCell, GridError> {
        self.grid_coordinate_to_index(coord)
            .map(move |index| &mut self.cells[index])
            .ok_or(GridError::OutOfBounds)
    }

    /// The four wall flags of one cell, `true` meaning the wall is present.
    pub fn walls_of(&self, coord: Cartesian2DCoordinate) -> Result<Walls, GridError> {
        self.cell(coord).map(|cell| cell.walls)
    }

    pub fn is_visited(&self, coord: Cartesian2DCoordinate) -> Result<bool, GridError> {
        self.cell(coord).map(|cell| cell.visited)
    }

    /// Include a cell in the spanning tree. The flag is monotonic for the
    /// lifetime of the grid.
    pub fn mark_visited(&mut self, coord: Cartesian2DCoordinate) -> Result<(), GridError> {
        self.cell_mut(coord).map(|cell| cell.visited = true)
    }

    /// Carve a passage between two orthogonally adjacent cells by clearing
    /// the facing wall flag on each side.
    ///
    /// Both coordinates must be in bounds (`OutOfBounds`) and exactly one
    /// orthogonal step apart (`NotAdjacent`). No wall is touched on failure.
    pub fn open_wall_between(&mut self,
                             a: Cartesian2DCoordinate,
                             b: Cartesian2DCoordinate)
                             -> Result<(), GridError> {
        if !self.is_valid_coordinate(a) || !self.is_valid_coordinate(b) {
            return Err(GridError::OutOfBounds);
        }

        let side = WallSide::ALL
            .iter()
            .cloned()
            .find(|&side| offset_coordinate(a, side) == Some(b))
            .ok_or(GridError::NotAdjacent)?;

        self.cell_mut(a)?.walls.open(side);
        self.cell_mut(b)?.walls.open(side.opposite());
        Ok(())
    }

    /// Is the wall on the given side of a cell missing, i.e. carved through?
    pub fn is_wall_open(&self, coord: Cartesian2DCoordinate, side: WallSide) -> bool {
        self.cell(coord)
            .map(|cell| !cell.walls.is_present(side))
            .unwrap_or(false)
    }

    /// Are two adjacent cells joined by a carved passage?
    pub fn is_passage_between(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        WallSide::ALL
            .iter()
            .cloned()
            .find(|&side| offset_coordinate(a, side) == Some(b))
            .map_or(false, |side| self.is_wall_open(a, side) && self.is_wall_open(b, side.opposite()))
    }

    /// In bounds orthogonal neighbours of a cell, in the fixed Left, Right,
    /// Bottom, Top order.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        WallSide::ALL
            .iter()
            .filter_map(|&side| offset_coordinate(coord, side))
            .filter(|&adjacent_coord| self.is_valid_coordinate(adjacent_coord))
            .collect()
    }

    /// The neighbours of a cell that the generator has not yet visited, in
    /// the same fixed Left, Right, Bottom, Top order. The ordering is a
    /// contract: index `n` of the candidate set is the same on every run,
    /// so a seeded random pick reproduces the same maze.
    pub fn unvisited_neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        self.neighbours(coord)
            .iter()
            .cloned()
            .filter(|&adjacent_coord| {
                self.cell(adjacent_coord).map(|cell| !cell.visited).unwrap_or(false)
            })
            .collect()
    }

    /// The number of carved cell pairs. A perfect maze over N cells has
    /// exactly N - 1 of them.
    pub fn open_passages_count(&self) -> usize {
        self.iter_passages().count()
    }

    /// Row major iteration over all cell coordinates.
    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            row_width: self.width.0,
            cells_count: self.size(),
        }
    }

    /// Iterate over every carved passage as an adjacent coordinate pair.
    /// Each passage is reported once, from its lower-left cell.
    pub fn iter_passages(&self) -> PassageIter {
        PassageIter {
            grid: self,
            cell_iter: self.iter(),
            pending: None,
        }
    }

    /// The carved passages as an undirected graph with one node per cell,
    /// in row major order. Useful for callers that want to run graph
    /// algorithms over the maze without reading wall flags.
    pub fn passage_graph(&self) -> Graph<(), (), Undirected> {
        let mut graph = Graph::with_capacity(self.size(), self.size().saturating_sub(1));
        for _ in 0..self.size() {
            let _ = graph.add_node(());
        }
        for (a, b) in self.iter_passages() {
            let a_index = self.grid_coordinate_to_index(a)
                .expect("passage iter gave an invalid coordinate");
            let b_index = self.grid_coordinate_to_index(b)
                .expect("passage iter gave an invalid coordinate");
            let _ = graph.update_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
        }
        graph
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    row_width: usize,
    cells_count: usize,
}
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let x = self.current_cell_number % self.row_width;
            let y = self.current_cell_number / self.row_width;
            self.current_cell_number += 1;
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = Cartesian2DCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct PassageIter<'a> {
    grid: &'a Grid,
    cell_iter: CellIter,
    pending: Option<(Cartesian2DCoordinate, Cartesian2DCoordinate)>,
}

impl<'a> Iterator for PassageIter<'a> {
    type Item = (Cartesian2DCoordinate, Cartesian2DCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(pair) = self.pending.take() {
            return Some(pair);
        }

        while let Some(coord) = self.cell_iter.next() {
            // Checking only Right and Top visits each wall exactly once.
            let right_pair = self.passage_at(coord, WallSide::Right);
            let top_pair = self.passage_at(coord, WallSide::Top);

            match (right_pair, top_pair) {
                (Some(right), Some(top)) => {
                    self.pending = Some(top);
                    return Some(right);
                }
                (Some(pair), None) | (None, Some(pair)) => return Some(pair),
                (None, None) => continue,
            }
        }
        None
    }
}

impl<'a> PassageIter<'a> {
    fn passage_at(&self,
                  coord: Cartesian2DCoordinate,
                  side: WallSide)
                  -> Option<(Cartesian2DCoordinate, Cartesian2DCoordinate)> {
        offset_coordinate(coord, side)
            .filter(|&neighbour_coord| self.grid.is_valid_coordinate(neighbour_coord))
            .filter(|_| self.grid.is_wall_open(coord, side))
            .map(|neighbour_coord| (coord, neighbour_coord))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {

        const WALL_LR_3: &'static str = "───";
        const WALL_LR: &'static str = "─";
        const WALL_UD: &'static str = "│";
        const WALL_LD: &'static str = "┐";
        const WALL_RU: &'static str = "└";
        const WALL_LU: &'static str = "┘";
        const WALL_RD: &'static str = "┌";
        const WALL_LRU: &'static str = "┴";
        const WALL_LRD: &'static str = "┬";
        const WALL_LRUD: &'static str = "┼";
        const WALL_RUD: &'static str = "├";
        const WALL_LUD: &'static str = "┤";
        const WALL_L: &'static str = "╴";
        const WALL_R: &'static str = "╶";
        const WALL_U: &'static str = "╵";
        const WALL_D: &'static str = "╷";

        let (Width(columns_count), Height(rows_count)) = (self.width, self.height);
        let gc = |x: usize, y: usize| Cartesian2DCoordinate::new(x as u32, y as u32);

        // `y` grows upwards, so the screen renders rows from y = height - 1
        // downwards and the screen-down neighbour of a cell is its Bottom side.
        let right_open = |coord| self.is_wall_open(coord, WallSide::Right);
        let down_open = |coord| self.is_wall_open(coord, WallSide::Bottom);

        // Start by special case rendering the text for the upper boundary
        let top_row_y = rows_count - 1;
        let mut output = String::from(WALL_RD);
        for x in 0..columns_count {
            output.push_str(WALL_LR_3);
            if right_open(gc(x, top_row_y)) {
                output.push_str(WALL_LR);
            } else {
                let is_last_cell = x == columns_count - 1;
                if is_last_cell {
                    output.push_str(WALL_LD);
                } else {
                    output.push_str(WALL_LRD);
                }
            }
        }
        output.push_str("\n");

        for y in (0..rows_count).rev() {

            let is_last_row = y == 0;

            // Starts off by special case rendering the left most boundary of the row.
            // The upper section of the cell is done by the previous row.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::from("");

            for x in 0..columns_count {

                let cell_coord = gc(x, y);
                let is_first_column = x == 0;
                let is_last_column = x == columns_count - 1;
                let east_open = right_open(cell_coord);
                let south_open = down_open(cell_coord);

                // Each cell simply uses the lower wall of the cell above it
                // as its own upper wall, so we only need to worry about the
                // cell's body (room space), its right boundary and its lower
                // boundary minus the lower left corner.
                let body = "   "; // 3 spaces
                let east_boundary = if east_open { " " } else { WALL_UD };
                row_middle_section_render.push_str(body);
                row_middle_section_render.push_str(east_boundary);

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                let south_boundary = if south_open { "   " } else { WALL_LR_3 };
                row_bottom_section_render.push_str(south_boundary);

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => {
                        if east_open {
                            WALL_LR
                        } else {
                            WALL_LRU
                        }
                    }
                    (false, true) => {
                        if south_open {
                            WALL_UD
                        } else {
                            WALL_LUD
                        }
                    }
                    (false, false) => {
                        // The corner below-right of this cell joins up to
                        // four wall sections, one per surrounding passage.
                        let access_corner_from_east = down_open(gc(x + 1, y));
                        let access_corner_from_south = right_open(gc(x, y - 1));
                        let show_right_section = !access_corner_from_east;
                        let show_down_section = !access_corner_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (show_left_section,
                               show_right_section,
                               show_up_section,
                               show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push_str("\n");
            output.push_str(&row_bottom_section_render);
            output.push_str("\n");
        }

        write!(f, "{}", output)
    }
}
