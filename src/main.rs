use docopt::Docopt;
use mazecarver::{
    cells::Cartesian2DCoordinate,
    generators,
    grid::Grid,
};
use serde_derive::Deserialize;
use std::{
    io,
    io::prelude::*,
    fs::File,
};

const USAGE: &str = "Mazecarver

Usage:
    mazecarver_driver -h | --help
    mazecarver_driver [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--seed=<s>] [--start-x=<x> --start-y=<y>] [--text-out=<path>] [--save-edges=<path>]

Options:
    -h --help            Show this screen.
    --grid-size=<n>      The grid size is n * n.
    --grid-width=<w>     The grid width in a w*h grid [default: 7].
    --grid-height=<h>    The grid height in a w*h grid [default: 7].
    --seed=<s>           Seed for the random source. The same seed always carves the same maze. A fresh unpredictable seed is used if not given.
    --start-x=<x>        x coordinate of the cell the carving starts from [default: 0].
    --start-y=<y>        y coordinate of the cell the carving starts from [default: 0].
    --text-out=<path>    Output file path for the textual rendering of the maze. Prints to stdout if not given.
    --save-edges=<path>  Serialize the carved passages to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    flag_start_x: u32,
    flag_start_y: u32,
    flag_text_out: String,
    flag_save_edges: String,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    // Create the Error, ErrorKind, ResultExt, and Result types
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            MazeFailure(::mazecarver::grid::GridError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };
    let start = Cartesian2DCoordinate::new(args.flag_start_x, args.flag_start_y);

    let (maze_grid, spawn) = generators::generate(width, height, start, args.flag_seed)?;

    if args.flag_text_out.is_empty() {
        println!("{}", maze_grid);
    } else {
        write_text_to_file(&format!("{}", maze_grid), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    println!("spawn cell: ({}, {})", spawn.x, spawn.y);

    if !args.flag_save_edges.is_empty() {

        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
    }

    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    let vertices_count = maze_grid.size();
    let edges_count = maze_grid.open_passages_count();
    graph_data.push_str(vertices_count.to_string().as_ref());
    graph_data.push(' ');
    graph_data.push_str(edges_count.to_string().as_ref());
    graph_data.push('\n');

    for (src, dst) in maze_grid.iter_passages() {
        let index_a = maze_grid
            .grid_coordinate_to_index(src)
            .expect("Passages iter should give valid coordinate");
        let index_b = maze_grid
            .grid_coordinate_to_index(dst)
            .expect("Passages iter should give valid coordinate");
        let src_as_1_based_index = index_a + 1;
        let dst_as_1_based_index = index_b + 1;

        graph_data.push_str(src_as_1_based_index.to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str(dst_as_1_based_index.to_string().as_ref());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
