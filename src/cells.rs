use smallvec::SmallVec;
use std::convert::From;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}
impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    /// Number of orthogonal steps between two coordinates.
    pub fn manhattan_distance(self, other: Cartesian2DCoordinate) -> u32 {
        let dx = if self.x > other.x { self.x - other.x } else { other.x - self.x };
        let dy = if self.y > other.y { self.y - other.y } else { other.y - self.y };
        dx + dy
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

/// One side of a cell. `Bottom` is the `y - 1` side and `Top` the `y + 1`
/// side, so `y` increases upwards.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum WallSide {
    Left,
    Right,
    Bottom,
    Top,
}

impl WallSide {
    /// Fixed side enumeration order. Neighbour candidates are produced in
    /// this order before any random selection, so a seeded run always sees
    /// the same candidate indices.
    pub const ALL: [WallSide; 4] = [WallSide::Left, WallSide::Right, WallSide::Bottom, WallSide::Top];

    pub fn opposite(self) -> WallSide {
        match self {
            WallSide::Left => WallSide::Right,
            WallSide::Right => WallSide::Left,
            WallSide::Bottom => WallSide::Top,
            WallSide::Top => WallSide::Bottom,
        }
    }
}

/// Creates a new coordinate offset 1 cell away in the given direction.
/// Returns None if the coordinate is not representable.
pub fn offset_coordinate(coord: Cartesian2DCoordinate, dir: WallSide) -> Option<Cartesian2DCoordinate> {
    let (x, y) = (coord.x, coord.y);
    match dir {
        WallSide::Left => {
            if x > 0 {
                Some(Cartesian2DCoordinate { x: x - 1, y })
            } else {
                None
            }
        }
        WallSide::Right => Some(Cartesian2DCoordinate { x: x + 1, y }),
        WallSide::Bottom => {
            if y > 0 {
                Some(Cartesian2DCoordinate { x, y: y - 1 })
            } else {
                None
            }
        }
        WallSide::Top => Some(Cartesian2DCoordinate { x, y: y + 1 }),
    }
}

/// Wall flags for one cell, `true` meaning the wall is present.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Walls {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Walls {
    /// A fully enclosed cell, the state before any carving.
    pub fn closed() -> Walls {
        Walls {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }

    pub fn is_present(&self, side: WallSide) -> bool {
        match side {
            WallSide::Left => self.left,
            WallSide::Right => self.right,
            WallSide::Bottom => self.bottom,
            WallSide::Top => self.top,
        }
    }

    pub fn open(&mut self, side: WallSide) {
        match side {
            WallSide::Left => self.left = false,
            WallSide::Right => self.right = false,
            WallSide::Bottom => self.bottom = false,
            WallSide::Top => self.top = false,
        }
    }
}

/// One grid cell: the generator's visited flag plus the four wall flags.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct GridCell {
    pub visited: bool,
    pub walls: Walls,
}

impl GridCell {
    pub fn enclosed() -> GridCell {
        GridCell {
            visited: false,
            walls: Walls::closed(),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn opposite_sides() {
        assert_eq!(WallSide::Left.opposite(), WallSide::Right);
        assert_eq!(WallSide::Right.opposite(), WallSide::Left);
        assert_eq!(WallSide::Bottom.opposite(), WallSide::Top);
        assert_eq!(WallSide::Top.opposite(), WallSide::Bottom);
    }

    #[test]
    fn offsets_from_origin() {
        let origin = Cartesian2DCoordinate::new(0, 0);
        assert_eq!(offset_coordinate(origin, WallSide::Left), None);
        assert_eq!(offset_coordinate(origin, WallSide::Bottom), None);
        assert_eq!(offset_coordinate(origin, WallSide::Right),
                   Some(Cartesian2DCoordinate::new(1, 0)));
        assert_eq!(offset_coordinate(origin, WallSide::Top),
                   Some(Cartesian2DCoordinate::new(0, 1)));
    }

    #[test]
    fn offsets_away_from_the_axes() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(offset_coordinate(gc(2, 2), WallSide::Left), Some(gc(1, 2)));
        assert_eq!(offset_coordinate(gc(2, 2), WallSide::Right), Some(gc(3, 2)));
        assert_eq!(offset_coordinate(gc(2, 2), WallSide::Bottom), Some(gc(2, 1)));
        assert_eq!(offset_coordinate(gc(2, 2), WallSide::Top), Some(gc(2, 3)));
    }

    #[test]
    fn manhattan_distances() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(gc(0, 0).manhattan_distance(gc(0, 0)), 0);
        assert_eq!(gc(0, 0).manhattan_distance(gc(1, 0)), 1);
        assert_eq!(gc(3, 1).manhattan_distance(gc(1, 2)), 3);
        assert_eq!(gc(1, 2).manhattan_distance(gc(3, 1)), 3);
    }

    #[test]
    fn new_cells_are_enclosed_and_unvisited() {
        let cell = GridCell::enclosed();
        assert!(!cell.visited);
        for side in WallSide::ALL.iter() {
            assert!(cell.walls.is_present(*side));
        }
    }

    #[test]
    fn opening_a_wall_clears_only_that_flag() {
        let mut walls = Walls::closed();
        walls.open(WallSide::Right);
        assert!(!walls.is_present(WallSide::Right));
        assert!(walls.is_present(WallSide::Left));
        assert!(walls.is_present(WallSide::Bottom));
        assert!(walls.is_present(WallSide::Top));
    }
}
