//! Edge-replication bleed: the core image transform.
//!
//! ## Why replicate edges?
//!
//! A guillotine or hobby cutter is never pixel-accurate. If the printed
//! sheet stops exactly at the card art, a cut that lands a hair outside
//! the line exposes a white sliver on the finished card. Extending the
//! outermost row/column of pixels outward by a few millimetres means an
//! imprecise cut still lands on ink.
//!
//! ## Why nearest-edge projection, not mirroring or blur?
//!
//! Every bleed pixel must equal exactly one sampled source pixel. Card
//! borders are usually a solid frame colour, and replication continues
//! that frame seamlessly; mirroring would fold interior artwork back
//! into the margin, and any interpolation would introduce colours that
//! were never on the card.

use crate::error::CardbleedError;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One edge of an image, named from the viewer's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// All four edges, in the order the batch reports them.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Edge {
    type Err = CardbleedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Edge::Top),
            "bottom" => Ok(Edge::Bottom),
            "left" => Ok(Edge::Left),
            "right" => Ok(Edge::Right),
            other => Err(CardbleedError::InvalidConfig(format!(
                "Unknown edge '{other}': expected top, bottom, left or right"
            ))),
        }
    }
}

/// Extend an image's borders by `bleed_px` pixels of nearest-edge bleed.
///
/// Returns a new image of size `(W + 2*bleed_px, H + 2*bleed_px)` whose
/// centre is a pixel-for-pixel copy of `src`. Each border pixel takes the
/// value of the nearest source pixel: side strips repeat the adjacent
/// source row or column, and the four corner blocks are flat fills of the
/// corresponding source corner pixel.
///
/// `bleed_px == 0` returns a content-identical copy. A bleed wider than
/// the source itself is fine — the strips are simply wider than the
/// interior.
///
/// # Errors
/// [`CardbleedError::InvalidDimension`] if either source dimension is
/// zero: there is no edge row or column to sample from.
pub fn add_bleed(src: &RgbaImage, bleed_px: u32) -> Result<RgbaImage, CardbleedError> {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return Err(CardbleedError::InvalidDimension {
            width: w,
            height: h,
        });
    }

    let mut out = RgbaImage::new(w + 2 * bleed_px, h + 2 * bleed_px);

    // Nearest-edge projection: clamping the translated coordinates back
    // into the source rectangle yields the interior copy, the four
    // replicated strips, and the flat corner blocks in one pass.
    for (x, y, px) in out.enumerate_pixels_mut() {
        let sx = x.saturating_sub(bleed_px).min(w - 1);
        let sy = y.saturating_sub(bleed_px).min(h - 1);
        *px = *src.get_pixel(sx, sy);
    }

    debug!(
        "Bleed {}px: {}x{} → {}x{}",
        bleed_px,
        w,
        h,
        out.width(),
        out.height()
    );

    Ok(out)
}

/// Trim an `n`-pixel band from each of the named edges.
///
/// Printable sheets often carry a cut line or scanner fringe on the
/// outermost pixels; replicated into the bleed, that artefact would be
/// magnified into a visible frame. Stripping it first means the bleed
/// samples clean artwork.
///
/// Listing an edge twice strips it once. `n == 0` or an empty edge list
/// returns a content-identical copy.
///
/// # Errors
/// [`CardbleedError::InvalidDimension`] if stripping would consume the
/// whole image (also when `src` is already zero-sized).
pub fn strip_edges(src: &RgbaImage, edges: &[Edge], n: u32) -> Result<RgbaImage, CardbleedError> {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return Err(CardbleedError::InvalidDimension {
            width: w,
            height: h,
        });
    }

    let left = if edges.contains(&Edge::Left) { n } else { 0 };
    let right = if edges.contains(&Edge::Right) { n } else { 0 };
    let top = if edges.contains(&Edge::Top) { n } else { 0 };
    let bottom = if edges.contains(&Edge::Bottom) { n } else { 0 };

    let new_w = w.saturating_sub(left + right);
    let new_h = h.saturating_sub(top + bottom);
    if new_w == 0 || new_h == 0 {
        return Err(CardbleedError::InvalidDimension {
            width: new_w,
            height: new_h,
        });
    }

    let cropped = image::imageops::crop_imm(src, left, top, new_w, new_h).to_image();
    debug!("Strip {n}px {edges:?}: {w}x{h} → {new_w}x{new_h}");
    Ok(cropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const A: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const B: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const C: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const D: Rgba<u8> = Rgba([255, 255, 0, 255]);

    /// Row-major 2x2 image [[A, B], [C, D]].
    fn abcd() -> RgbaImage {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, A);
        img.put_pixel(1, 0, B);
        img.put_pixel(0, 1, C);
        img.put_pixel(1, 1, D);
        img
    }

    fn gradient(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, (x + y) as u8, 255]))
    }

    #[test]
    fn output_dimensions_grow_by_twice_the_bleed() {
        let src = gradient(10, 7);
        for bleed in [0, 1, 5, 12] {
            let out = add_bleed(&src, bleed).unwrap();
            assert_eq!(out.dimensions(), (10 + 2 * bleed, 7 + 2 * bleed));
        }
    }

    #[test]
    fn zero_bleed_is_identity() {
        let src = gradient(9, 4);
        let out = add_bleed(&src, 0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn interior_is_preserved() {
        let src = gradient(6, 5);
        let bleed = 3;
        let out = add_bleed(&src, bleed).unwrap();
        for y in 0..5 {
            for x in 0..6 {
                assert_eq!(out.get_pixel(x + bleed, y + bleed), src.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn top_strip_repeats_first_source_row() {
        let src = gradient(6, 5);
        let bleed = 4;
        let out = add_bleed(&src, bleed).unwrap();
        for x in 0..6 {
            for dy in 0..bleed {
                assert_eq!(out.get_pixel(x + bleed, dy), src.get_pixel(x, 0));
            }
        }
    }

    #[test]
    fn bottom_strip_repeats_last_source_row() {
        let src = gradient(6, 5);
        let bleed = 2;
        let out = add_bleed(&src, bleed).unwrap();
        for x in 0..6 {
            for dy in 0..bleed {
                assert_eq!(
                    out.get_pixel(x + bleed, 5 + bleed + dy),
                    src.get_pixel(x, 4)
                );
            }
        }
    }

    #[test]
    fn side_strips_repeat_edge_columns() {
        let src = gradient(6, 5);
        let bleed = 3;
        let out = add_bleed(&src, bleed).unwrap();
        for y in 0..5 {
            for dx in 0..bleed {
                assert_eq!(out.get_pixel(dx, y + bleed), src.get_pixel(0, y));
                assert_eq!(
                    out.get_pixel(6 + bleed + dx, y + bleed),
                    src.get_pixel(5, y)
                );
            }
        }
    }

    #[test]
    fn corners_are_flat_blocks_of_the_corner_pixel() {
        let src = abcd();
        let bleed = 3;
        let out = add_bleed(&src, bleed).unwrap();
        for dy in 0..bleed {
            for dx in 0..bleed {
                assert_eq!(*out.get_pixel(dx, dy), A);
                assert_eq!(*out.get_pixel(bleed + 2 + dx, dy), B);
                assert_eq!(*out.get_pixel(dx, bleed + 2 + dy), C);
                assert_eq!(*out.get_pixel(bleed + 2 + dx, bleed + 2 + dy), D);
            }
        }
    }

    #[test]
    fn two_by_two_with_one_pixel_bleed() {
        // [[A,B],[C,D]] with bleed 1 → AABB / AABB / CCDD / CCDD.
        let out = add_bleed(&abcd(), 1).unwrap();
        let expected = [
            [A, A, B, B],
            [A, A, B, B],
            [C, C, D, D],
            [C, C, D, D],
        ];
        assert_eq!(out.dimensions(), (4, 4));
        for (y, row) in expected.iter().enumerate() {
            for (x, want) in row.iter().enumerate() {
                assert_eq!(out.get_pixel(x as u32, y as u32), want, "at ({x},{y})");
            }
        }
    }

    #[test]
    fn bleed_wider_than_source_succeeds() {
        let out = add_bleed(&abcd(), 10).unwrap();
        assert_eq!(out.dimensions(), (22, 22));
        // Far corner of the top-left block is still the corner pixel.
        assert_eq!(*out.get_pixel(0, 0), A);
        assert_eq!(*out.get_pixel(21, 21), D);
    }

    #[test]
    fn zero_sized_source_is_rejected() {
        let empty = RgbaImage::new(0, 10);
        assert!(matches!(
            add_bleed(&empty, 5),
            Err(CardbleedError::InvalidDimension { width: 0, height: 10 })
        ));
    }

    #[test]
    fn strip_removes_one_band_per_named_edge() {
        let src = gradient(10, 10);
        let out = strip_edges(&src, &[Edge::Left, Edge::Right], 1).unwrap();
        assert_eq!(out.dimensions(), (8, 10));
        let out = strip_edges(&src, &[Edge::Top, Edge::Bottom], 1).unwrap();
        assert_eq!(out.dimensions(), (10, 8));
    }

    #[test]
    fn strip_keeps_the_right_pixels() {
        let src = gradient(10, 10);
        let out = strip_edges(&src, &[Edge::Left, Edge::Top], 2).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(2, 2));
        assert_eq!(out.get_pixel(7, 7), src.get_pixel(9, 9));
    }

    #[test]
    fn strip_nothing_is_identity() {
        let src = gradient(5, 5);
        assert_eq!(strip_edges(&src, &[], 3).unwrap(), src);
        assert_eq!(strip_edges(&src, &Edge::ALL, 0).unwrap(), src);
    }

    #[test]
    fn strip_duplicate_edges_strip_once() {
        let src = gradient(10, 10);
        let out = strip_edges(&src, &[Edge::Left, Edge::Left], 2).unwrap();
        assert_eq!(out.dimensions(), (8, 10));
    }

    #[test]
    fn over_stripping_is_rejected() {
        let src = gradient(4, 4);
        assert!(matches!(
            strip_edges(&src, &[Edge::Left, Edge::Right], 2),
            Err(CardbleedError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn edge_round_trips_through_from_str() {
        for edge in Edge::ALL {
            let parsed: Edge = edge.to_string().parse().unwrap();
            assert_eq!(parsed, edge);
        }
        assert!("middle".parse::<Edge>().is_err());
    }
}
