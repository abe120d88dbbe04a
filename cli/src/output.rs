use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Result;
use randomart::Raster;

/// Writes `raster` as an 8-bit RGBA PNG and syncs the file to disk.
pub fn write_png(path: &Path, raster: &Raster) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(&file);
    encode(&mut out, raster)?;
    out.flush()?;
    drop(out);
    file.sync_all()?;
    Ok(())
}

fn encode(out: impl Write, raster: &Raster) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(out, raster.width(), raster.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&raster.to_rgba8())?;
    writer.finish()
}
