//! The renderable cell model.
//!
//! A [`Cell`] is either a pre-rendered block of text lines (a leaf), a
//! two-dimensional grid of child cells, or the empty sentinel that stands
//! in for absent values. Cells compose recursively: a grid cell may itself
//! contain grids, and the renderer lays the whole structure out bottom-up.

use crate::border::BorderStyle;
use crate::render;

/// A renderable unit: empty, a text block, or a grid of child cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// The uniform sentinel for null/absent values. Renders as nothing.
    Empty,
    /// A pre-rendered block of text lines.
    Leaf(Leaf),
    /// A two-dimensional grid of child cells.
    Grid(Grid),
}

/// A leaf text block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Leaf {
    /// The text content, one entry per line.
    pub lines: Vec<String>,
    /// Minimum display width this leaf claims during layout.
    pub min_width: usize,
}

/// A grid of child cells with a declared number of header rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Row-major cell storage. Rows may have differing lengths; short rows
    /// are padded with empty cells during layout.
    pub rows: Vec<Vec<Cell>>,
    /// Number of leading rows treated as the header block.
    pub header_rows: usize,
}

impl Cell {
    /// Creates a leaf cell from text, splitting on newlines.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Cell::Leaf(Leaf {
            lines: text.split('\n').map(str::to_string).collect(),
            min_width: 0,
        })
    }

    /// Creates a leaf cell from pre-split lines.
    pub fn lines(lines: Vec<String>) -> Self {
        Cell::Leaf(Leaf {
            lines,
            min_width: 0,
        })
    }

    /// Creates a grid cell.
    pub fn grid(rows: Vec<Vec<Cell>>, header_rows: usize) -> Self {
        Cell::Grid(Grid { rows, header_rows })
    }

    /// Returns `true` for the empty sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The display width of this cell in terminal columns, including any
    /// border glyphs a grid would draw under `style`.
    pub fn width(&self, style: BorderStyle) -> usize {
        render::measure(self, style).0
    }

    /// The height of this cell in lines under `style`.
    pub fn height(&self, style: BorderStyle) -> usize {
        render::measure(self, style).1
    }

    /// Renders this cell to its final character block.
    ///
    /// Grids are laid out with content-driven column widths; nested grids
    /// render to their own blocks first and are then padded into their
    /// parent's column. With [`BorderStyle::None`] columns are separated by
    /// two spaces and no glyph rows are emitted.
    pub fn to_text(&self, style: BorderStyle) -> String {
        render::block(self, style).join("\n")
    }
}

impl Leaf {
    /// Raises the minimum layout width of this leaf.
    pub fn ensure_min_width(&mut self, min_width: usize) {
        self.min_width = self.min_width.max(min_width);
    }
}

impl From<Leaf> for Cell {
    fn from(leaf: Leaf) -> Self {
        Cell::Leaf(leaf)
    }
}

impl From<Grid> for Cell {
    fn from(grid: Grid) -> Self {
        Cell::Grid(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_splits_lines() {
        let cell = Cell::text("a\nbc");
        match cell {
            Cell::Leaf(leaf) => assert_eq!(leaf.lines, vec!["a", "bc"]),
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn empty_renders_to_nothing() {
        assert!(Cell::Empty.is_empty());
        assert!(!Cell::text("x").is_empty());
        assert_eq!(Cell::Empty.to_text(BorderStyle::None), "");
        assert_eq!(Cell::Empty.width(BorderStyle::None), 0);
        assert_eq!(Cell::Empty.height(BorderStyle::None), 1);
    }

    #[test]
    fn conversions_from_parts() {
        let grid = Grid {
            rows: vec![vec![Cell::text("a")]],
            header_rows: 0,
        };
        assert_eq!(Cell::from(grid).to_text(BorderStyle::None), "a");
    }

    #[test]
    fn leaf_width_honors_min_width() {
        let mut leaf = Leaf {
            lines: vec!["ab".to_string()],
            min_width: 0,
        };
        leaf.ensure_min_width(6);
        assert_eq!(Cell::from(leaf).width(BorderStyle::None), 6);
    }

    #[test]
    fn leaf_to_text_is_verbatim() {
        assert_eq!(Cell::text("x\ny").to_text(BorderStyle::Light), "x\ny");
    }
}
