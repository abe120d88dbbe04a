use rand::Rng;
use thiserror::Error;

use crate::{
    evaluator::{evaluate, EvalError, Value},
    term::Term,
};

/// One pixel of a rendered image.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Color {
    Gray(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(v) => Some(Color::Gray(upscale(*v))),
            Value::Triple(r, g, b) => Some(Color::Rgb(
                upscale(r.as_number()?),
                upscale(g.as_number()?),
                upscale(b.as_number()?),
            )),
            Value::Bool(_) => None,
        }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        match self {
            Color::Gray(v) => [v, v, v, u8::MAX],
            Color::Rgb(r, g, b) => [r, g, b, u8::MAX],
        }
    }
}

/// Row-major grid of colors.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Raster {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba()).collect()
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Evaluation failed at pixel ({x}, {y})")]
    Eval {
        x: u32,
        y: u32,
        #[source]
        source: EvalError,
    },
    #[error("Expression evaluated to {value} at pixel ({x}, {y}), which is not a color")]
    NotAColor { x: u32, y: u32, value: Value },
}
pub type Result<T> = std::result::Result<T, RenderError>;

/// Scales `v` from [-1, 1] to [0, 255]. Out of range inputs wrap modulo 256;
/// NaN becomes 0.
pub fn upscale(v: f64) -> u8 {
    ((v + 1.0) / 2.0 * 255.0).round() as i64 as u8
}

pub fn normalize(v: u32, size: u32) -> f64 {
    let bound = size.saturating_sub(1).max(1);
    f64::from(v) / f64::from(bound) * 2.0 - 1.0
}

/// The first failing pixel aborts the render.
pub fn render<R: Rng + ?Sized>(
    rng: &mut R,
    width: u32,
    height: u32,
    term: &Term,
) -> Result<Raster> {
    log::debug!("rendering {width}x{height}");
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        let ny = normalize(y, height);
        for x in 0..width {
            let nx = normalize(x, width);
            let value =
                evaluate(rng, nx, ny, term).map_err(|source| RenderError::Eval { x, y, source })?;
            let color = Color::from_value(&value).ok_or(RenderError::NotAColor { x, y, value })?;
            pixels.push(color);
        }
    }
    log::debug!("rendered {} pixels", pixels.len());
    Ok(Raster {
        width,
        height,
        pixels,
    })
}
