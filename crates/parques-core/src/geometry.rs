//! Fixed board geometry.
//!
//! The shared track is a 56-square loop numbered 1-56. Each color enters at
//! its start square, travels the loop and turns into a private 7-square lane
//! once it passes its end boundary.

use crate::piece::Color;
use std::sync::OnceLock;

/// Squares on the shared track (1-indexed, wraps from 56 back to 1)
pub const TRACK_LENGTH: u8 = 56;

/// Squares in each color's private lane; reaching the last one finishes the piece
pub const LANE_LENGTH: u8 = 7;

/// Distance between the start squares of neighbouring colors
pub const COLOR_SPACING: u8 = 14;

/// Per-color start and end squares on the shared track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    starts: [u8; 4],
    ends: [u8; 4],
}

impl Geometry {
    fn build() -> Self {
        let mut starts = [0; 4];
        let mut ends = [0; 4];
        for color in Color::ALL {
            let i = color.order_index();
            starts[i] = 1 + i as u8 * COLOR_SPACING;
            // An end of 0 would never satisfy `position <= end`, so the
            // color whose lane opens at the seam uses the last square instead.
            ends[i] = match i as u8 * COLOR_SPACING {
                0 => TRACK_LENGTH,
                end => end,
            };
        }
        Self { starts, ends }
    }

    /// The process-wide geometry table
    pub fn standard() -> &'static Geometry {
        static GEOMETRY: OnceLock<Geometry> = OnceLock::new();
        GEOMETRY.get_or_init(Geometry::build)
    }

    /// Square a piece of this color enters on when leaving the pool
    pub fn start(&self, color: Color) -> u8 {
        self.starts[color.order_index()]
    }

    /// Last shared-track square before this color turns into its lane
    pub fn end(&self, color: Color) -> u8 {
        self.ends[color.order_index()]
    }

    pub fn track_length(&self) -> u8 {
        TRACK_LENGTH
    }

    pub fn lane_length(&self) -> u8 {
        LANE_LENGTH
    }
}
