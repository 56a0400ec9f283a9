use crate::cells::Cartesian2DCoordinate;
use crate::grid::{Grid, GridError};
use crate::units::{Height, Width};

use rand::{Rng, SeedableRng, XorShiftRng};

/// Carve a fresh perfect maze and pick a boundary spawn cell for it.
///
/// One call is one complete generation run: a new grid is allocated, fully
/// carved from `start` and handed back by value together with the spawn
/// coordinate. A `seed` makes the run reproducible, bit for bit; without one
/// a fresh non-deterministic seed is used.
pub fn generate(width: usize,
                height: usize,
                start: Cartesian2DCoordinate,
                seed: Option<u64>)
                -> Result<(Grid, Cartesian2DCoordinate), GridError> {

    let mut grid = Grid::new(Width(width), Height(height))?;
    let mut rng = seed.map(seeded_rng).unwrap_or_else(rand::weak_rng);

    recursive_backtracker(&mut grid, start, &mut rng)?;
    let spawn = edge_spawn(&grid, &mut rng);

    Ok((grid, spawn))
}

/// Apply the recursive backtracker maze generation algorithm to a grid,
/// in its iterative form with an explicit path stack.
///
/// The cell on top of the stack is the tip of the current depth-first
/// passage. While it has unvisited orthogonal neighbours one is picked
/// uniformly at random, the shared wall is carved through and the neighbour
/// becomes the new tip. A tip with no unvisited neighbours is popped,
/// backtracking to the previous cell which may still branch elsewhere.
/// A wall is only ever opened towards an unvisited cell and that cell is
/// marked visited in the same step, so the carved passages can never close
/// a cycle: the finished grid is a spanning tree of the cells, a perfect
/// maze with exactly `width * height - 1` open wall pairs.
pub fn recursive_backtracker(grid: &mut Grid,
                             start: Cartesian2DCoordinate,
                             rng: &mut XorShiftRng)
                             -> Result<(), GridError> {

    if !grid.is_valid_coordinate(start) {
        return Err(GridError::OutOfBounds);
    }

    grid.mark_visited(start)?;
    let mut path_stack = vec![start];

    while let Some(&current) = path_stack.last() {

        let unvisited = grid.unvisited_neighbours(current);
        if unvisited.is_empty() {
            path_stack.pop();
            continue;
        }

        let next = unvisited[rng.gen::<usize>() % unvisited.len()];
        grid.open_wall_between(current, next)?;
        grid.mark_visited(next)?;
        path_stack.push(next);
    }

    Ok(())
}

/// Pick a cell on the boundary of the grid: one of the four sides uniformly
/// at random, then a uniformly random offset along that side.
///
/// The choice is independent of the carved topology but draws from the same
/// random source as the carve, so a whole generation run replays from one seed.
pub fn edge_spawn(grid: &Grid, rng: &mut XorShiftRng) -> Cartesian2DCoordinate {
    let (Width(w), Height(h)) = (grid.width(), grid.height());

    // 0 = left, 1 = right, 2 = bottom, 3 = top
    match rng.gen::<usize>() % 4 {
        0 => Cartesian2DCoordinate::new(0, (rng.gen::<usize>() % h) as u32),
        1 => Cartesian2DCoordinate::new((w - 1) as u32, (rng.gen::<usize>() % h) as u32),
        2 => Cartesian2DCoordinate::new((rng.gen::<usize>() % w) as u32, 0),
        _ => Cartesian2DCoordinate::new((rng.gen::<usize>() % w) as u32, (h - 1) as u32),
    }
}

/// Expand a caller supplied seed into xorshift state. The state words are
/// mixed so that nearby seeds do not give nearby mazes, and the last word is
/// forced odd because the all zero state is invalid for xorshift.
fn seeded_rng(seed: u64) -> XorShiftRng {
    let lo = seed as u32;
    let hi = (seed >> 32) as u32;
    XorShiftRng::from_seed([lo ^ 0x9e37_79b9,
                            hi ^ 0x85eb_ca6b,
                            lo.wrapping_mul(0x27d4_eb2f) ^ hi,
                            (hi ^ lo) | 1])
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::{Cartesian2DCoordinate, WallSide, Walls};
    use crate::utils;

    use petgraph::unionfind::UnionFind;
    use quickcheck::quickcheck;

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn generated(w: usize, h: usize, seed: u64) -> (Grid, Cartesian2DCoordinate) {
        generate(w, h, gc(0, 0), Some(seed)).expect("generation failed")
    }

    // Flood out from `start` over carved passages only, counting the cells reached.
    fn reachable_cells_count(grid: &Grid, start: Cartesian2DCoordinate) -> usize {
        let mut seen = utils::fnv_hashset(grid.size());
        let mut frontier = vec![start];
        seen.insert(start);

        while let Some(coord) = frontier.pop() {
            for neighbour in grid.neighbours(coord).iter().cloned() {
                if grid.is_passage_between(coord, neighbour) && seen.insert(neighbour) {
                    frontier.push(neighbour);
                }
            }
        }
        seen.len()
    }

    #[test]
    fn carved_grid_is_a_spanning_tree() {
        for &(w, h, seed) in &[(7, 7, 1), (12, 5, 99), (1, 9, 3), (9, 1, 4), (2, 2, 0)] {
            let (grid, _) = generated(w, h, seed);
            assert_eq!(grid.open_passages_count(), w * h - 1);
            assert_eq!(reachable_cells_count(&grid, gc(0, 0)), w * h);
        }
    }

    #[test]
    fn carved_passages_are_acyclic() {
        let (grid, _) = generated(10, 10, 42);

        let mut forest = UnionFind::<usize>::new(grid.size());
        for (a, b) in grid.iter_passages() {
            let a_index = grid.grid_coordinate_to_index(a).unwrap();
            let b_index = grid.grid_coordinate_to_index(b).unwrap();
            // A union that joins an already connected pair would be a cycle
            assert!(forest.union(a_index, b_index));
        }
    }

    #[test]
    fn facing_wall_flags_always_agree() {
        use crate::cells::offset_coordinate;

        let (grid, _) = generated(8, 6, 7);
        for coord in grid.iter() {
            for side in WallSide::ALL.iter().cloned() {
                if let Some(neighbour) = offset_coordinate(coord, side)
                    .filter(|&neighbour| grid.is_valid_coordinate(neighbour)) {
                    // Never half open: the two facing flags are one passage
                    assert_eq!(grid.is_wall_open(coord, side),
                               grid.is_wall_open(neighbour, side.opposite()));
                }
            }
        }
    }

    #[test]
    fn identical_seeds_give_identical_runs() {
        let (grid_a, spawn_a) = generated(9, 9, 1234);
        let (grid_b, spawn_b) = generated(9, 9, 1234);
        assert_eq!(grid_a, grid_b);
        assert_eq!(spawn_a, spawn_b);
    }

    #[test]
    fn spawn_cell_lies_on_a_boundary() {
        for seed in 0..200 {
            let (grid, spawn) = generated(6, 4, seed);
            assert!(grid.is_valid_coordinate(spawn));
            assert!(spawn.x == 0 || spawn.x == 5 || spawn.y == 0 || spawn.y == 3);
        }
    }

    #[test]
    fn single_cell_maze_keeps_all_walls() {
        let (grid, spawn) = generate(1, 1, gc(0, 0), None).expect("generation failed");
        assert_eq!(grid.walls_of(gc(0, 0)).unwrap(), Walls::closed());
        assert_eq!(spawn, gc(0, 0));
    }

    #[test]
    fn two_cell_maze_opens_the_only_possible_wall() {
        let (grid, _) = generated(2, 1, 1);

        assert!(grid.is_passage_between(gc(0, 0), gc(1, 0)));
        assert_eq!(grid.open_passages_count(), 1);

        // All the outer walls stay up
        for &(coord, side) in &[(gc(0, 0), WallSide::Left),
                                (gc(0, 0), WallSide::Bottom),
                                (gc(0, 0), WallSide::Top),
                                (gc(1, 0), WallSide::Right),
                                (gc(1, 0), WallSide::Bottom),
                                (gc(1, 0), WallSide::Top)] {
            assert!(!grid.is_wall_open(coord, side));
        }
    }

    #[test]
    fn out_of_bounds_start_fails_without_a_grid() {
        let result = generate(3, 3, gc(5, 5), Some(1));
        assert_eq!(result.unwrap_err(), GridError::OutOfBounds);
    }

    #[test]
    fn zero_dimensions_fail() {
        assert_eq!(generate(0, 3, gc(0, 0), Some(1)).unwrap_err(),
                   GridError::InvalidDimension);
        assert_eq!(generate(3, 0, gc(0, 0), Some(1)).unwrap_err(),
                   GridError::InvalidDimension);
    }

    #[test]
    fn every_cell_is_visited_after_a_run() {
        let (grid, _) = generated(5, 8, 21);
        for coord in grid.iter() {
            assert!(grid.is_visited(coord).unwrap());
        }
    }

    #[test]
    fn seeding_never_produces_dead_rng_state() {
        // The all zero xorshift state would panic in from_seed
        let mut rng = seeded_rng(0);
        let _ = rng.gen::<usize>();
        let mut rng = seeded_rng(u64::max_value());
        let _ = rng.gen::<usize>();
    }

    #[test]
    fn quickcheck_generated_mazes_are_perfect() {
        fn prop(w: u8, h: u8, seed: u64) -> bool {
            let (w, h) = ((w % 12) as usize + 1, (h % 12) as usize + 1);
            let (grid, spawn) = generate(w, h, Cartesian2DCoordinate::new(0, 0), Some(seed))
                .expect("generation failed");

            let on_boundary = spawn.x == 0 || spawn.x as usize == w - 1 || spawn.y == 0 ||
                              spawn.y as usize == h - 1;
            grid.open_passages_count() == w * h - 1 &&
            reachable_cells_count(&grid, Cartesian2DCoordinate::new(0, 0)) == w * h &&
            on_boundary
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }
}
