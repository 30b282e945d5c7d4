//! Frame annotation — face box and name label, drawn straight into the
//! RGB buffer.
//!
//! Labels use an embedded caps-only 5×7 font: lowercase letters render with
//! their uppercase glyphs, anything without a glyph renders as a hollow box.

use facewatch_core::{BoundingBox, Frame, MatchResult};

/// Face box and label color.
const BOX_COLOR: [u8; 3] = [0, 255, 0];
/// Box edge thickness in pixels, grown inward.
const BOX_THICKNESS: u32 = 2;
/// Label text color.
const LABEL_COLOR: [u8; 3] = [0, 0, 0];
/// Gap between the box top and the label baseline.
const LABEL_OFFSET: u32 = 10;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
/// Blank columns between glyphs.
const GLYPH_GAP: u32 = 1;
/// Integer upscale applied to every glyph.
const GLYPH_SCALE: u32 = 2;

/// Draw the overlay for one matched face: a box around it and
/// `"{name} ({confidence})"` above it.
pub fn annotate_match(frame: &mut Frame, region: &BoundingBox, result: &MatchResult) {
    draw_rect(frame, region, BOX_COLOR, BOX_THICKNESS);
    let label = format!("{} ({:.2})", result.display_name(), result.confidence);
    let baseline_y = region.top.saturating_sub(LABEL_OFFSET);
    draw_label(frame, &label, region.left, baseline_y, LABEL_COLOR);
}

/// Draw a rectangle outline, clipped to the frame. The box follows the
/// `[left, right) × [top, bottom)` convention; thickness grows inward.
pub fn draw_rect(frame: &mut Frame, region: &BoundingBox, color: [u8; 3], thickness: u32) {
    for ring in 0..thickness {
        let top = region.top.saturating_add(ring);
        let bottom = region.bottom.saturating_sub(ring + 1);
        let left = region.left.saturating_add(ring);
        let right = region.right.saturating_sub(ring + 1);
        if top > bottom || left > right {
            break;
        }

        for x in left..=right.min(frame.width.saturating_sub(1)) {
            frame.put_pixel(x, top, color);
            frame.put_pixel(x, bottom, color);
        }
        for y in top..=bottom.min(frame.height.saturating_sub(1)) {
            frame.put_pixel(left, y, color);
            frame.put_pixel(right, y, color);
        }
    }
}

/// Render `text` left-to-right from `(x, baseline_y)`, glyphs extending
/// upward from the baseline. Pixels falling outside the frame are clipped.
pub fn draw_label(frame: &mut Frame, text: &str, x: u32, baseline_y: u32, color: [u8; 3]) {
    let glyph_top = baseline_y as i64 - (GLYPH_HEIGHT * GLYPH_SCALE) as i64;
    let mut pen_x = x as i64;

    for c in text.chars() {
        let rows = glyph(c);
        for (row_idx, &row) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if row & (1u8 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        let px = pen_x + (col * GLYPH_SCALE + dx) as i64;
                        let py = glyph_top + (row_idx as u32 * GLYPH_SCALE + dy) as i64;
                        if px >= 0 && py >= 0 {
                            frame.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
        pen_x += ((GLYPH_WIDTH + GLYPH_GAP) * GLYPH_SCALE) as i64;
    }
}

/// 5×7 glyph rows, MSB = leftmost column.
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ' ' => [0; 7],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '-' => [0b00000, 0b00000, 0b00000, 0b01110, 0b00000, 0b00000, 0b00000],
        '_' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        _ => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];

    #[test]
    fn test_draw_rect_outline_and_thickness() {
        let mut frame = Frame::filled(20, 20, WHITE);
        let region = BoundingBox { top: 5, right: 15, bottom: 15, left: 5 };
        draw_rect(&mut frame, &region, BOX_COLOR, 2);

        // Outer ring and second ring are colored; interior is untouched.
        assert_eq!(frame.pixel(5, 5), Some(BOX_COLOR));
        assert_eq!(frame.pixel(14, 14), Some(BOX_COLOR));
        assert_eq!(frame.pixel(6, 6), Some(BOX_COLOR));
        assert_eq!(frame.pixel(7, 7), Some(WHITE));
        assert_eq!(frame.pixel(10, 10), Some(WHITE));
        // One pixel outside the box stays white.
        assert_eq!(frame.pixel(4, 5), Some(WHITE));
    }

    #[test]
    fn test_draw_rect_clips_at_frame_edge() {
        let mut frame = Frame::filled(10, 10, WHITE);
        let region = BoundingBox { top: 5, right: 25, bottom: 25, left: 5 };
        draw_rect(&mut frame, &region, BOX_COLOR, 2);

        // Visible edges are drawn; nothing panics for the off-frame part.
        assert_eq!(frame.pixel(5, 5), Some(BOX_COLOR));
        assert_eq!(frame.pixel(9, 5), Some(BOX_COLOR));
        assert_eq!(frame.pixel(5, 9), Some(BOX_COLOR));
    }

    #[test]
    fn test_draw_rect_degenerate_box() {
        let mut frame = Frame::filled(10, 10, WHITE);
        let region = BoundingBox { top: 5, right: 5, bottom: 5, left: 5 };
        draw_rect(&mut frame, &region, BOX_COLOR, 2);
        assert!(frame.data.iter().all(|&b| b == 255));
    }

    #[test]
    fn test_draw_label_renders_glyph_pixels() {
        let mut frame = Frame::filled(32, 20, WHITE);
        // Baseline at 14 puts the 14-pixel-tall scaled glyph in rows 0..14.
        draw_label(&mut frame, "A", 0, 14, LABEL_COLOR);

        // 'A' top row is .###. — column 0 stays white, column 1 is inked.
        assert_eq!(frame.pixel(0, 0), Some(WHITE));
        assert_eq!(frame.pixel(2, 0), Some(LABEL_COLOR));
        assert_eq!(frame.pixel(3, 0), Some(LABEL_COLOR));
        // Left stroke of 'A', second glyph row.
        assert_eq!(frame.pixel(0, 2), Some(LABEL_COLOR));
    }

    #[test]
    fn test_draw_label_clips_above_frame() {
        let mut frame = Frame::filled(32, 8, WHITE);
        // Baseline 4: most of the glyph lies above row 0 and is clipped.
        draw_label(&mut frame, "H", 0, 4, LABEL_COLOR);

        // Bottom of the 'H' strokes is visible.
        assert_eq!(frame.pixel(0, 3), Some(LABEL_COLOR));
        assert_eq!(frame.pixel(8, 3), Some(LABEL_COLOR));
    }

    #[test]
    fn test_lowercase_maps_to_uppercase_glyph() {
        let mut upper = Frame::filled(16, 16, WHITE);
        let mut lower = Frame::filled(16, 16, WHITE);
        draw_label(&mut upper, "B", 0, 14, LABEL_COLOR);
        draw_label(&mut lower, "b", 0, 14, LABEL_COLOR);
        assert_eq!(upper.data, lower.data);
    }

    #[test]
    fn test_annotate_match_boxes_and_labels() {
        let mut frame = Frame::filled(64, 64, WHITE);
        let region = BoundingBox { top: 20, right: 50, bottom: 50, left: 10 };
        let result = MatchResult {
            identity: Some("alice".into()),
            confidence: 0.7,
            distance: 0.3,
        };
        annotate_match(&mut frame, &region, &result);

        // Box corner.
        assert_eq!(frame.pixel(10, 20), Some(BOX_COLOR));
        // Label baseline sits at top-10; 'A' left stroke lands at x=10.
        let label_area_inked = (0..10u32)
            .any(|y| (10..60u32).any(|x| frame.pixel(x, y) == Some(LABEL_COLOR)));
        assert!(label_area_inked, "expected label pixels above the box");
    }
}
