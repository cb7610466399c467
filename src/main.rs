use std::{
    fs::File,
    io,
    io::prelude::*,
    path::Path,
};

use docopt::Docopt;
use log::info;
use serde_derive::Deserialize;
use tile_mazes::{
    generators::MazeAlgorithm,
    grid_displays::{self, MarkersDisplay},
    placement::MarkerKind,
    renderers,
    session::{MazeConfig, MazeSession},
};

const USAGE: &str = "Tile Mazes

Usage:
    maze_driver -h | --help
    maze_driver [--width=<w> --height=<h>] [--algorithm=<a>] [--collectibles=<n>] [--seed=<s>] [--text-out=<path>] [--image-out=<path> --tile-pixels=<n>]

Options:
    -h --help              Show this screen.
    --width=<w>            Grid width in tiles, at least 3 [default: 20].
    --height=<h>           Grid height in tiles, at least 3 [default: 20].
    --algorithm=<a>        Carving algorithm, dfs or prim [default: prim].
    --collectibles=<n>     Number of collectibles to place [default: 10].
    --seed=<s>             Seed for the random source. A random seed is used and logged if not given.
    --text-out=<path>      Output file path for a textual rendering of the maze. Printed to stdout if not given.
    --image-out=<path>     Output file path for an image rendering of the maze. Always PNG format.
    --tile-pixels=<n>      Pixel count for the side of one tile in the image [default: 10] max 255.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_width: usize,
    flag_height: usize,
    flag_algorithm: String,
    flag_collectibles: usize,
    flag_seed: Option<u64>,
    flag_text_out: String,
    flag_image_out: String,
    flag_tile_pixels: u8,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            ImageFailure(::image::ImageError);
            Io(::std::io::Error);
            InvalidGrid(::tile_mazes::grid::GridError);
            UnknownAlgorithm(::tile_mazes::generators::ParseAlgorithmError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    let algorithm: MazeAlgorithm = args.flag_algorithm.parse()?;

    let mut config = MazeConfig {
        width: args.flag_width,
        height: args.flag_height,
        algorithm,
        seed: args.flag_seed,
        ..MazeConfig::default()
    };
    config.marker_counts.insert(MarkerKind::Collectible, args.flag_collectibles);

    let mut session = MazeSession::new(config)?;
    session.generate();
    info!("generated {} maze with {} passages, seed {}",
          algorithm,
          session.grid().passages_count(),
          session.seed());

    let display = MarkersDisplay::new(session.markers());
    let text = grid_displays::render_text(session.grid(), Some(&display));
    if args.flag_text_out.is_empty() {
        print!("{}", text);
    } else {
        write_text_to_file(&text, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if !args.flag_image_out.is_empty() {
        let render_options = renderers::RenderOptionsBuilder::new()
            .tile_pixels(args.flag_tile_pixels)
            .markers(session.markers())
            .output_file(Some(Path::new(&args.flag_image_out)))
            .build();
        renderers::render_png(session.grid(), &render_options)?;
    }

    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
