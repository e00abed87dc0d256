//! Grid layout: turns a cell tree into a monospaced character block.

use crate::border::{BorderChars, BorderStyle};
use crate::cell::{Cell, Grid};
use crate::util::{display_width, pad_right};

/// A rendered cell together with its claimed layout width.
struct Block {
    lines: Vec<String>,
    width: usize,
}

/// Position of a horizontal glyph row within a boxed grid.
enum LineType {
    Top,
    Middle,
    Bottom,
}

/// Renders a cell to its block of lines.
pub(crate) fn block(cell: &Cell, style: BorderStyle) -> Vec<String> {
    cell_block(cell, style).lines
}

/// Measures a cell without exposing the rendered block.
pub(crate) fn measure(cell: &Cell, style: BorderStyle) -> (usize, usize) {
    let b = cell_block(cell, style);
    (b.width, b.lines.len())
}

fn cell_block(cell: &Cell, style: BorderStyle) -> Block {
    match cell {
        Cell::Empty => Block {
            lines: vec![String::new()],
            width: 0,
        },
        Cell::Leaf(leaf) => {
            let content = leaf
                .lines
                .iter()
                .map(|l| display_width(l))
                .max()
                .unwrap_or(0);
            let lines = if leaf.lines.is_empty() {
                vec![String::new()]
            } else {
                leaf.lines.clone()
            };
            Block {
                lines,
                width: content.max(leaf.min_width),
            }
        }
        Cell::Grid(grid) => {
            let lines = grid_block(grid, style);
            let width = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
            Block { lines, width }
        }
    }
}

fn grid_block(grid: &Grid, style: BorderStyle) -> Vec<String> {
    let cols = grid.rows.iter().map(Vec::len).max().unwrap_or(0);
    if cols == 0 {
        return vec![String::new()];
    }

    // Render children first; short rows are padded with empty blocks.
    let blocks: Vec<Vec<Block>> = grid
        .rows
        .iter()
        .map(|row| {
            (0..cols)
                .map(|j| match row.get(j) {
                    Some(cell) => cell_block(cell, style),
                    None => cell_block(&Cell::Empty, style),
                })
                .collect()
        })
        .collect();

    let mut widths = vec![0usize; cols];
    for row in &blocks {
        for (j, b) in row.iter().enumerate() {
            widths[j] = widths[j].max(b.width);
        }
    }

    if style == BorderStyle::None {
        plain_rows(&blocks, &widths)
    } else {
        boxed_rows(grid, &blocks, &widths, style.chars())
    }
}

fn plain_rows(blocks: &[Vec<Block>], widths: &[usize]) -> Vec<String> {
    let mut out = Vec::new();
    for row in blocks {
        let height = row.iter().map(|b| b.lines.len()).max().unwrap_or(1);
        for k in 0..height {
            let mut line = String::new();
            for (j, b) in row.iter().enumerate() {
                if j > 0 {
                    line.push_str("  ");
                }
                let content = b.lines.get(k).map(String::as_str).unwrap_or("");
                line.push_str(&pad_right(content, widths[j]));
            }
            out.push(line.trim_end().to_string());
        }
    }
    out
}

fn boxed_rows(
    grid: &Grid,
    blocks: &[Vec<Block>],
    widths: &[usize],
    ch: BorderChars,
) -> Vec<String> {
    let mut out = Vec::new();
    out.push(glyph_row(&ch, widths, LineType::Top));
    for (i, row) in blocks.iter().enumerate() {
        let height = row.iter().map(|b| b.lines.len()).max().unwrap_or(1);
        for k in 0..height {
            let mut line = String::new();
            line.push(ch.vertical);
            for (j, b) in row.iter().enumerate() {
                let content = b.lines.get(k).map(String::as_str).unwrap_or("");
                line.push(' ');
                line.push_str(&pad_right(content, widths[j]));
                line.push(' ');
                line.push(ch.vertical);
            }
            out.push(line);
        }
        let end_of_header = grid.header_rows > 0 && i + 1 == grid.header_rows;
        if end_of_header && i + 1 < blocks.len() {
            out.push(glyph_row(&ch, widths, LineType::Middle));
        }
    }
    out.push(glyph_row(&ch, widths, LineType::Bottom));
    out
}

fn glyph_row(ch: &BorderChars, widths: &[usize], position: LineType) -> String {
    let (left, junction, right) = match position {
        LineType::Top => (ch.top_left, ch.top_t, ch.top_right),
        LineType::Middle => (ch.left_t, ch.cross, ch.right_t),
        LineType::Bottom => (ch.bottom_left, ch.bottom_t, ch.bottom_right),
    };
    let mut line = String::new();
    line.push(left);
    for (j, w) in widths.iter().enumerate() {
        if j > 0 {
            line.push(junction);
        }
        for _ in 0..w + 2 {
            line.push(ch.horizontal);
        }
    }
    line.push(right);
    line
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_leaf() -> impl Strategy<Value = Cell> {
        "[a-z0-9 ]{0,8}".prop_map(Cell::text)
    }

    proptest! {
        #[test]
        fn boxed_grids_have_uniform_line_width(
            rows in proptest::collection::vec(
                proptest::collection::vec(arb_leaf(), 1..4),
                1..4,
            ),
        ) {
            let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
            let cell = Cell::grid(rows, 0);
            let text = cell.to_text(BorderStyle::Light);
            let widths: Vec<usize> = text.lines().map(display_width).collect();
            prop_assert!(cols > 0);
            prop_assert!(widths.windows(2).all(|w| w[0] == w[1]));
        }

        #[test]
        fn rendering_is_deterministic(
            rows in proptest::collection::vec(
                proptest::collection::vec(arb_leaf(), 1..3),
                1..3,
            ),
        ) {
            let cell = Cell::grid(rows, 1);
            prop_assert_eq!(
                cell.to_text(BorderStyle::Light),
                cell.to_text(BorderStyle::Light)
            );
        }
    }
}
