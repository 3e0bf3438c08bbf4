//! CSV track reader
//!
//! Reads `Longitude`/`Latitude` columns from a CSV file and keeps the rows that
//! fall inside the configured [`Region`], in file order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::projection::Coordinate;
use crate::types::Region;

const LONGITUDE: &str = "Longitude";
const LATITUDE: &str = "Latitude";

#[derive(Debug, Deserialize)]
struct GpsRecord {
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Latitude")]
    latitude: f64,
}

/// Points accepted from one file, plus counters for the rows that were not
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    /// Accepted WGS84 points in input order
    pub points: Vec<Coordinate>,
    /// Data rows read, accepted or not
    pub rows_read: usize,
    /// Rows dropped for lying outside the region
    pub skipped: usize,
}

impl Track {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Reads GPS tracks, filtering them to a region
#[derive(Debug, Clone)]
pub struct TrackReader {
    region: Region,
    preview_rows: usize,
}

impl TrackReader {
    pub fn new(region: Region, preview_rows: usize) -> Self {
        Self { region, preview_rows }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Opens and reads the CSV file at `path`
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Track> {
        let path = path.as_ref();
        debug!("Reading {}", path.display());
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Reads CSV data with a header row from any reader
    pub fn read<R: Read>(&self, rdr: R) -> Result<Track> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let headers = csv_reader.headers()?.clone();
        for column in [LONGITUDE, LATITUDE] {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::MissingColumn(column));
            }
        }

        let mut track = Track::default();

        for (i, result) in csv_reader.deserialize::<GpsRecord>().enumerate() {
            let record = result.map_err(parse_error)?;
            let (lon, lat) = (record.longitude, record.latitude);
            track.rows_read += 1;

            if i < self.preview_rows {
                info!("Row {}: Longitude={}, Latitude={}", i, lon, lat);
            }

            if self.region.contains(lon, lat) {
                track.points.push(Coordinate::from_lonlat(lon, lat));
            } else {
                info!("Data outside region skipped: Longitude={}, Latitude={}", lon, lat);
                track.skipped += 1;
            }
        }

        debug!(
            "Read {} rows: {} accepted, {} outside region",
            track.rows_read,
            track.len(),
            track.skipped
        );
        Ok(track)
    }
}

fn parse_error(e: csv::Error) -> Error {
    match e.kind() {
        csv::ErrorKind::Deserialize { pos, err } => Error::Parse {
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            message: err.to_string(),
        },
        _ => Error::Csv(e),
    }
}
