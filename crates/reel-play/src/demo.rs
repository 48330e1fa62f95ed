#![forbid(unsafe_code)]

//! Built-in demo corpus, so the player runs without a data file.
//!
//! A framed 77×41 canvas with a highlighted beam that sweeps left and right
//! in a travelling sine wave over a drifting dot field.

use std::f64::consts::TAU;

use reel_render::compiler::DEFAULT_CANVAS;
use reel_render::markup::{CLOSE_TAG, OPEN_TAG};

use crate::corpus::RawCorpus;

/// Frames in one loop of the demo.
pub const DEMO_FRAMES: usize = 48;

/// Beam width in columns.
const BEAM: usize = 7;

/// The demo animation as raw markup.
pub fn corpus() -> RawCorpus {
    (0..DEMO_FRAMES).map(frame).collect()
}

fn frame(index: usize) -> Vec<String> {
    let width = usize::from(DEFAULT_CANVAS.width);
    let height = usize::from(DEFAULT_CANVAS.height);
    (0..height)
        .map(|row| {
            if row == 0 || row == height - 1 {
                border(width)
            } else {
                wave_row(width, height, row, index)
            }
        })
        .collect()
}

fn border(width: usize) -> String {
    let mut line = String::with_capacity(width);
    line.push('+');
    line.extend(std::iter::repeat_n('-', width - 2));
    line.push('+');
    line
}

fn wave_row(width: usize, height: usize, row: usize, index: usize) -> String {
    let phase = TAU * (row as f64 / height as f64 + index as f64 / DEMO_FRAMES as f64);
    let half = width as f64 / 2.0;
    let center = half + (half - BEAM as f64 - 2.0) * phase.sin();
    let start = (center.round() as usize)
        .saturating_sub(BEAM / 2)
        .clamp(1, width - 1 - BEAM);

    let mut line = String::with_capacity(width + OPEN_TAG.len() + CLOSE_TAG.len());
    line.push('|');
    line.extend((1..start).map(|col| dot(col, row, index)));
    line.push_str(OPEN_TAG);
    line.extend(std::iter::repeat_n('#', BEAM));
    line.push_str(CLOSE_TAG);
    line.extend((start + BEAM..width - 1).map(|col| dot(col, row, index)));
    line.push('|');
    line
}

fn dot(col: usize, row: usize, index: usize) -> char {
    if (col + 2 * row + index) % 6 == 0 { '.' } else { ' ' }
}
