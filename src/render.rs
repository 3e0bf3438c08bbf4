//! Map renderer: track points over an OpenStreetMap basemap, written as PNG

use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use plotters::element::BitMapElement;
use plotters::prelude::*;
use tracing::{debug, info};

use crate::basemap::{Basemap, BasemapLoader};
use crate::bounds::calculate_bounds;
use crate::config::{Config, FigureConfig};
use crate::error::{Error, Result};
use crate::projection::{Coordinate, Transformer};
use crate::reader::Track;
use crate::tiles::grid::tile_span;
use crate::tiles::{TileCache, TileSource};
use crate::types::{BoundingBox, Dimensions, Extent};
use crate::zoom::estimate_zoom;

const MARGIN: u32 = 10;
const CAPTION_AREA: u32 = 40;
const X_LABEL_AREA: u32 = 50;
const Y_LABEL_AREA: u32 = 90;

/// Why a track produced no figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No row survived the region filter
    Empty,
    /// Too few points to be worth a figure
    TooFewPoints { found: usize, required: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Empty => write!(f, "No valid GPS data to plot"),
            SkipReason::TooFewPoints { found, required } => {
                write!(f, "Less than {} rows of data ({} found)", required, found)
            }
        }
    }
}

/// Everything needed to draw one figure
#[derive(Debug, Clone)]
pub struct MapFrame {
    /// Track points in Web Mercator metres
    pub points: Vec<Coordinate>,
    /// Bounds of the track in WGS84
    pub bounds: BoundingBox,
    /// Axis limits in Web Mercator metres
    pub extent: Extent,
    /// Zoom estimated from `bounds`
    pub zoom: u8,
}

#[derive(Debug, Clone)]
pub enum Plan {
    Skip(SkipReason),
    Draw(MapFrame),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    /// Zoom estimated from the track
    pub zoom: u8,
    /// Zoom the basemap was fetched at, lower than `zoom` when the tile budget was hit
    pub basemap_zoom: u8,
    pub tiles: usize,
    pub extent: Extent,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Skipped(SkipReason),
    Rendered(RenderSummary),
}

pub struct Renderer<S: TileSource> {
    source: S,
    cache: TileCache,
    transformer: Transformer,
    figure: FigureConfig,
    min_points: usize,
    max_tiles: usize,
    output_dir: PathBuf,
}

impl<S: TileSource> Renderer<S> {
    pub fn new(source: S, config: &Config, output_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            source,
            cache: TileCache::new(config.tiles.cache_tiles),
            transformer: Transformer::web_mercator()?,
            figure: config.figure.clone(),
            min_points: config.min_points,
            max_tiles: config.tiles.max_tiles,
            output_dir: output_dir.into(),
        })
    }

    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Figure path for the track read from `path`: `<output_dir>/<stem>.png`
    pub fn output_path(&self, path: &Path) -> PathBuf {
        let stem = path
            .file_stem()
            .or_else(|| path.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir.join(format!("{}.png", stem))
    }

    /// Applies the skip guards and computes projection, extent and zoom
    pub fn plan(&self, track: &Track) -> Result<Plan> {
        if track.is_empty() {
            return Ok(Plan::Skip(SkipReason::Empty));
        }
        if track.len() < self.min_points {
            return Ok(Plan::Skip(SkipReason::TooFewPoints {
                found: track.len(),
                required: self.min_points,
            }));
        }

        let Some(bounds) = calculate_bounds(&track.points) else {
            return Ok(Plan::Skip(SkipReason::Empty));
        };
        let points = self.transformer.transform_many(&track.points)?;
        let zoom = estimate_zoom(&bounds);

        // Only the two corners of the WGS84 box are reprojected; at this scale
        // the result matches the projected box of all points closely enough.
        let lower_left = self.transformer.transform(bounds.lower_left())?;
        let upper_right = self.transformer.transform(bounds.upper_right())?;
        let extent = Extent::from_corners(lower_left, upper_right).ensure_min_span(tile_span(zoom));

        Ok(Plan::Draw(MapFrame { points, bounds, extent, zoom }))
    }

    /// Renders the track read from `path` to `<output_dir>/<stem>.png`, unless a guard skips it
    pub fn render(&self, track: &Track, path: &Path) -> Result<RenderOutcome> {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

        let frame = match self.plan(track)? {
            Plan::Skip(reason) => {
                info!("Skipping {}: {}", name, reason);
                return Ok(RenderOutcome::Skipped(reason));
            }
            Plan::Draw(frame) => frame,
        };

        info!("Using zoom level: {}", frame.zoom);
        debug!(
            "Bounds {:?} (EPSG:{}), extent {:?} (EPSG:{})",
            frame.bounds,
            self.transformer.source_epsg(),
            frame.extent,
            self.transformer.target_epsg()
        );

        // nothing touches the output file until the whole figure is drawn
        let (basemap, image) = self.draw(&frame, &name)?;

        fs::create_dir_all(&self.output_dir)?;
        let output = self.output_path(path);
        write_png(&output, self.figure.size, &image)?;
        info!("Wrote {}", output.display());

        Ok(RenderOutcome::Rendered(RenderSummary {
            zoom: frame.zoom,
            basemap_zoom: basemap.zoom,
            tiles: basemap.tiles,
            extent: frame.extent,
            output,
        }))
    }

    /// Draws the figure into an RGB buffer of the configured size
    fn draw(&self, frame: &MapFrame, name: &str) -> Result<(Basemap, Vec<u8>)> {
        let size = self.figure.size;
        let mut image = vec![255u8; size.pixel_count() as usize * 3];
        let basemap = self.draw_into(&mut image, frame, name)?;
        Ok((basemap, image))
    }

    fn draw_into(&self, image: &mut [u8], frame: &MapFrame, name: &str) -> Result<Basemap> {
        let size = self.figure.size;
        let annotate = self.figure.annotate;
        let extent = &frame.extent;

        let root = BitMapBackend::with_buffer(image, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        // keep metres square on screen by shrinking the area to the extent's aspect
        let (extra_w, extra_h) = if annotate {
            (Y_LABEL_AREA + 2 * MARGIN, CAPTION_AREA + X_LABEL_AREA + 2 * MARGIN)
        } else {
            (2 * MARGIN, 2 * MARGIN)
        };
        let budget = Dimensions::new(
            size.width.saturating_sub(extra_w).max(1),
            size.height.saturating_sub(extra_h).max(1),
        );
        let plot = budget.fit_aspect(extent);
        let area_size = ((plot.width + extra_w).min(size.width), (plot.height + extra_h).min(size.height));
        let offset = ((size.width - area_size.0) / 2, (size.height - area_size.1) / 2);
        let area = root.clone().shrink(offset, area_size);

        let mut builder = ChartBuilder::on(&area);
        builder.margin(MARGIN);
        if annotate {
            builder
                .caption(format!("GPS Path Visualization: {}", name), ("sans-serif", 24))
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_LABEL_AREA);
        }
        let mut chart = builder
            .build_cartesian_2d(extent.min_x..extent.max_x, extent.min_y..extent.max_y)
            .map_err(render_err)?;

        let (plot_w, plot_h) = chart.plotting_area().dim_in_pixel();
        let mut basemap = BasemapLoader::new(&self.source, &self.cache, self.max_tiles)
            .load(extent, frame.zoom, Dimensions::new(plot_w, plot_h))?;
        let pixels = std::mem::take(&mut basemap.pixels);

        let image: BitMapElement<(f64, f64)> =
            BitMapElement::with_owned_buffer((extent.min_x, extent.max_y), (plot_w, plot_h), pixels)
                .ok_or_else(|| Error::Render("basemap buffer does not match plotting area".to_string()))?;
        chart.draw_series(std::iter::once(image)).map_err(render_err)?;

        if annotate {
            chart
                .configure_mesh()
                .x_desc("Longitude")
                .y_desc("Latitude")
                .x_label_formatter(&|x| format!("{:.0}", x))
                .y_label_formatter(&|y| format!("{:.0}", y))
                .light_line_style(&BLACK.mix(0.1))
                .bold_line_style(&BLACK.mix(0.25))
                .draw()
                .map_err(render_err)?;
        }

        let marker = BLUE.mix(self.figure.alpha).filled();
        let radius = self.figure.marker_size;
        chart
            .draw_series(frame.points.iter().map(|p| Circle::new((p.x, p.y), radius, marker)))
            .map_err(render_err)?;

        let attribution = self.source.attribution();
        if annotate && !attribution.is_empty() {
            let style = ("sans-serif", 12).into_font().color(&BLACK);
            chart
                .plotting_area()
                .strip_coord_spec()
                .draw_text(attribution, &style, (4, plot_h as i32 - 16))
                .map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
        Ok(basemap)
    }
}

fn render_err<E: fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

/// Encodes a tightly packed RGB8 buffer as PNG
fn write_png(path: &Path, size: Dimensions, rgb: &[u8]) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);

    let mut encoder = png::Encoder::new(file, size.width, size.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header().map_err(render_err)?;
    writer.write_image_data(rgb).map_err(render_err)?;
    writer.finish().map_err(render_err)
}
