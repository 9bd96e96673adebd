//! Raster band export: grayscale images and geodetic CSV tables.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::GrayImage;
use probmap_core::{RasterError, Result};

use crate::band::RasterBand;

impl RasterBand {
    /// Render the band as a single-channel 8-bit image.
    ///
    /// Values are rescaled to 0-255 with whole-raster min-max
    /// normalization (a uniform band maps to all zeros), and the grid is
    /// transposed into conventional image row/column orientation.
    pub fn to_image(&self) -> GrayImage {
        let (w, h) = self.resolution;
        let (min, max) = self.min_max();
        let range = max - min;

        GrayImage::from_fn(w as u32, h as u32, |x, y| {
            let value = self.value(x as usize, y as usize);
            let scaled = if range > 0.0 {
                ((value - min) / range * 255.0).round() as u8
            } else {
                0
            };
            image::Luma([scaled])
        })
    }

    /// Save the band as a PNG file.
    pub fn save_image<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image()
            .save(path)
            .map_err(|e| RasterError::Image(e.to_string()))
    }

    /// Write the band as comma-separated values.
    ///
    /// One row per cell in (i outer, j inner) order: latitude, longitude,
    /// and the value at 20 decimal places, plus an optional constant
    /// timestamp column. The header is written only when requested.
    pub fn write_csv<W: Write>(
        &self,
        writer: &mut W,
        time: Option<&str>,
        include_header: bool,
    ) -> Result<()> {
        if include_header {
            match time {
                Some(_) => writeln!(writer, "latitude, longitude, value, datetime")?,
                None => writeln!(writer, "latitude, longitude, value")?,
            }
        }

        let (w, h) = self.resolution;
        for i in 0..w {
            for j in 0..h {
                let polar = self.polar_location(i, j);
                let value = self.value(i, j);
                match time {
                    Some(stamp) => writeln!(
                        writer,
                        "{}, {}, {value:.20}, {stamp}",
                        polar.latitude, polar.longitude
                    )?,
                    None => writeln!(
                        writer,
                        "{}, {}, {value:.20}",
                        polar.latitude, polar.longitude
                    )?,
                }
            }
        }
        Ok(())
    }

    /// Save the band as a CSV file.
    ///
    /// In append mode rows are added to an existing file and no header is
    /// written; otherwise the file is created or truncated with a header.
    pub fn save_csv<P: AsRef<Path>>(&self, path: P, time: Option<&str>, append: bool) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(append)
            .write(true)
            .truncate(!append)
            .open(path)?;
        let mut writer = BufWriter::new(file);
        self.write_csv(&mut writer, time, !append)?;
        writer.flush()?;
        Ok(())
    }
}
