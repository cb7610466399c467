use std::path::Path;

use image::error::{ImageError, ParameterError, ParameterErrorKind};
use image::{ImageResult, Rgb, RgbImage};

use crate::cells::Cartesian2DCoordinate;
use crate::grid::Grid;
use crate::placement::{Marker, MarkerKind};
use crate::utils::{self, FnvHashMap};

const WALL_COLOUR: Rgb<u8> = Rgb([0x20, 0x20, 0x30]);
const PASSAGE_COLOUR: Rgb<u8> = Rgb([0xf0, 0xf0, 0xf0]);
const START_COLOUR: Rgb<u8> = Rgb([0x20, 0xa0, 0x40]);
const COLLECTIBLE_COLOUR: Rgb<u8> = Rgb([0xe0, 0xb0, 0x10]);

#[derive(Debug)]
pub struct RenderOptions<'path, 'm> {
    tile_pixels: u8,
    markers: &'m [Marker],
    output_file: Option<&'path Path>,
}

pub struct RenderOptionsBuilder<'path, 'm> {
    options: RenderOptions<'path, 'm>,
}

impl<'path, 'm> RenderOptionsBuilder<'path, 'm> {
    pub fn new() -> RenderOptionsBuilder<'path, 'm> {
        RenderOptionsBuilder {
            options: RenderOptions {
                tile_pixels: 10,
                markers: &[],
                output_file: None,
            },
        }
    }

    /// Side length of one square tile in pixels. Zero is treated as one.
    pub fn tile_pixels(mut self, tile_pixels: u8) -> Self {
        self.options.tile_pixels = tile_pixels;
        self
    }

    pub fn markers(mut self, markers: &'m [Marker]) -> Self {
        self.options.markers = markers;
        self
    }

    /// Save the image as a PNG here as well as returning it.
    pub fn output_file(mut self, output_file: Option<&'path Path>) -> Self {
        self.options.output_file = output_file;
        self
    }

    pub fn build(self) -> RenderOptions<'path, 'm> {
        self.options
    }
}

impl<'path, 'm> Default for RenderOptionsBuilder<'path, 'm> {
    fn default() -> Self {
        RenderOptionsBuilder::new()
    }
}

/// Draw the maze as solid tiles, markers as smaller squares inset in their tile.
pub fn render_png(grid: &Grid, options: &RenderOptions) -> ImageResult<RgbImage> {
    let side = u32::from(options.tile_pixels.max(1));
    let too_large = || ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::DimensionMismatch));
    let img_width = (grid.width().0 as u32).checked_mul(side).ok_or_else(too_large)?;
    let img_height = (grid.height().0 as u32).checked_mul(side).ok_or_else(too_large)?;

    let mut marker_kinds: FnvHashMap<Cartesian2DCoordinate, MarkerKind> =
        utils::fnv_hashmap(options.markers.len());
    for marker in options.markers {
        marker_kinds.insert(marker.position, marker.kind);
    }

    // Tiny tiles are filled completely by their marker.
    let inset = side / 4;
    let is_inset = |offset: u32| offset >= inset && offset < side - inset;

    let img = RgbImage::from_fn(img_width, img_height, |px, py| {
        let coord = Cartesian2DCoordinate::new(px / side, py / side);
        let marker = marker_kinds.get(&coord).filter(|_| is_inset(px % side) && is_inset(py % side));
        match marker {
            Some(MarkerKind::PlayerStart) => START_COLOUR,
            Some(MarkerKind::Collectible) => COLLECTIBLE_COLOUR,
            None if grid.is_passage(coord) => PASSAGE_COLOUR,
            None => WALL_COLOUR,
        }
    });

    if let Some(path) = options.output_file {
        img.save(path)?;
    }

    Ok(img)
}
