//! Grid placement of fields and their labels
//!
//! Fields declare a logical position `(row_pos, col_pos, row_span, col_span)`.
//! [`GridLayout`] turns that into physical grid cells, reserving alternating
//! rows (top labels) or columns (side labels) for label widgets so a label
//! never lands on its field's cell.
//!
//! Top orientation, field at logical `(r, c, rs, cs)`:
//!
//! ```text
//! label: (2r,     c, 1,        cs)
//! field: (2r + 1, c, 2rs - 1,  cs)
//! ```
//!
//! Side orientation:
//!
//! ```text
//! label: (r, 2c,     1,  1)
//! field: (r, 2c + 1, rs, 2cs - 1)
//! ```
//!
//! Unlabeled fields take the same field cell as a labeled field would, so
//! they line up with labeled siblings.

use iced::{Alignment, Padding};
use serde::{Deserialize, Serialize};

/// Horizontal alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    /// Align to the start (left in LTR)
    Start,
    /// Center horizontally
    #[default]
    Center,
    /// Align to the end (right in LTR)
    End,
}

impl HAlign {
    /// Convert to iced Alignment
    #[must_use]
    pub fn to_iced(self) -> Alignment {
        match self {
            Self::Start => Alignment::Start,
            Self::Center => Alignment::Center,
            Self::End => Alignment::End,
        }
    }
}

/// Vertical alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    /// Align to the top
    Top,
    /// Center vertically
    #[default]
    Center,
    /// Align to the bottom
    Bottom,
}

impl VAlign {
    /// Convert to iced Alignment
    #[must_use]
    pub fn to_iced(self) -> Alignment {
        match self {
            Self::Top => Alignment::Start,
            Self::Center => Alignment::Center,
            Self::Bottom => Alignment::End,
        }
    }
}

/// How a field's key is shown next to its widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// No label
    None,
    /// A separate label widget in its own grid cell
    #[default]
    InlineLabel,
    /// The widget is wrapped in a frame titled with the key
    TitledBorder,
}

/// Where inline labels go relative to their field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelOrientation {
    /// Label in the row above the field
    #[default]
    Top,
    /// Label in the column before the field
    Side,
}

/// Logical position of a field as declared on its descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPosition {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl FieldPosition {
    /// Position with spans clamped to at least one cell
    #[must_use]
    pub fn new(row: usize, col: usize, row_span: usize, col_span: usize) -> Self {
        Self {
            row,
            col,
            row_span: row_span.max(1),
            col_span: col_span.max(1),
        }
    }
}

impl Default for FieldPosition {
    fn default() -> Self {
        Self::new(0, 0, 1, 1)
    }
}

/// Physical grid cell(s) occupied by one widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlacement {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl GridPlacement {
    #[must_use]
    pub const fn new(row: usize, col: usize, row_span: usize, col_span: usize) -> Self {
        Self {
            row,
            col,
            row_span,
            col_span,
        }
    }

    /// One past the last occupied row
    #[must_use]
    pub const fn row_end(&self) -> usize {
        self.row + self.row_span
    }

    /// One past the last occupied column
    #[must_use]
    pub const fn col_end(&self) -> usize {
        self.col + self.col_span
    }

    #[must_use]
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.row_end() && col >= self.col && col < self.col_end()
    }

    #[must_use]
    pub const fn overlaps(&self, other: &GridPlacement) -> bool {
        self.row < other.row_end()
            && other.row < self.row_end()
            && self.col < other.col_end()
            && other.col < self.col_end()
    }
}

/// Placement and alignment of an inline label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub cell: GridPlacement,
    pub align_x: HAlign,
    pub align_y: VAlign,
    pub padding: Padding,
}

/// Where a field and its optional label sit in the grid
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPlacement {
    pub key: String,
    pub field: GridPlacement,
    pub label: Option<LabelPlacement>,
}

/// The placement engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub orientation: LabelOrientation,
    /// Gap between a label and its field
    pub label_padding: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            orientation: LabelOrientation::Top,
            label_padding: 8.0,
        }
    }
}

impl GridLayout {
    #[must_use]
    pub fn new(orientation: LabelOrientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn label_padding(mut self, padding: f32) -> Self {
        self.label_padding = padding;
        self
    }

    /// Place one field.
    ///
    /// Only [`LabelMode::InlineLabel`] produces a label cell; a titled border
    /// is drawn around the field widget itself.
    #[must_use]
    pub fn place(&self, key: &str, position: FieldPosition, mode: LabelMode) -> FieldPlacement {
        let position = FieldPosition::new(
            position.row,
            position.col,
            position.row_span,
            position.col_span,
        );

        let (field, label_cell) = match self.orientation {
            LabelOrientation::Top => (
                GridPlacement::new(
                    2 * position.row + 1,
                    position.col,
                    2 * position.row_span - 1,
                    position.col_span,
                ),
                GridPlacement::new(2 * position.row, position.col, 1, position.col_span),
            ),
            LabelOrientation::Side => (
                GridPlacement::new(
                    position.row,
                    2 * position.col + 1,
                    position.row_span,
                    2 * position.col_span - 1,
                ),
                GridPlacement::new(position.row, 2 * position.col, 1, 1),
            ),
        };

        let label = (mode == LabelMode::InlineLabel).then(|| match self.orientation {
            LabelOrientation::Top => LabelPlacement {
                cell: label_cell,
                align_x: HAlign::End,
                align_y: VAlign::Bottom,
                padding: Padding {
                    top: self.label_padding * 2.0,
                    ..Padding::ZERO
                },
            },
            LabelOrientation::Side => LabelPlacement {
                cell: label_cell,
                align_x: HAlign::End,
                align_y: VAlign::Center,
                padding: Padding {
                    left: self.label_padding,
                    right: self.label_padding,
                    ..Padding::ZERO
                },
            },
        });

        FieldPlacement {
            key: key.to_string(),
            field,
            label,
        }
    }

    /// Place every field in order, warning about overlaps
    pub fn arrange<'a>(
        &self,
        fields: impl IntoIterator<Item = (&'a str, FieldPosition, LabelMode)>,
    ) -> Vec<FieldPlacement> {
        let mut placements: Vec<FieldPlacement> = Vec::new();
        for (key, position, mode) in fields {
            let placement = self.place(key, position, mode);
            warn_overlap(&placements, &placement);
            placements.push(placement);
        }
        placements
    }

    /// First placement in `placements` sharing a cell with `candidate`
    #[must_use]
    pub fn find_overlap<'p>(
        placements: &'p [FieldPlacement],
        candidate: &FieldPlacement,
    ) -> Option<&'p FieldPlacement> {
        placements
            .iter()
            .find(|p| cells(p).any(|x| cells(candidate).any(|y| x.overlaps(&y))))
    }

    /// Grid size `(rows, cols)` needed for the placements
    #[must_use]
    pub fn dimensions(placements: &[FieldPlacement]) -> (usize, usize) {
        placements
            .iter()
            .flat_map(cells)
            .fold((0, 0), |(rows, cols), cell| {
                (rows.max(cell.row_end()), cols.max(cell.col_end()))
            })
    }
}

/// Log when `candidate` overlaps an earlier placement
pub(crate) fn warn_overlap(placements: &[FieldPlacement], candidate: &FieldPlacement) {
    if let Some(other) = GridLayout::find_overlap(placements, candidate) {
        tracing::warn!(
            first = %other.key,
            second = %candidate.key,
            "overlapping grid placement; span interleaving is unverified here"
        );
    }
}

fn cells(placement: &FieldPlacement) -> impl Iterator<Item = GridPlacement> + '_ {
    std::iter::once(placement.field).chain(placement.label.map(|l| l.cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_label_above_field() {
        let layout = GridLayout::new(LabelOrientation::Top);
        let p = layout.place("name", FieldPosition::new(1, 2, 1, 1), LabelMode::InlineLabel);

        assert_eq!(p.field, GridPlacement::new(3, 2, 1, 1));
        let label = p.label.unwrap();
        assert_eq!(label.cell, GridPlacement::new(2, 2, 1, 1));
        assert_eq!(label.align_x, HAlign::End);
        assert_eq!(label.align_y, VAlign::Bottom);
        assert!(label.padding.top > 0.0);
        assert!(!label.cell.overlaps(&p.field));
    }

    #[test]
    fn test_side_label_before_field() {
        let layout = GridLayout::new(LabelOrientation::Side);
        let p = layout.place("name", FieldPosition::new(1, 2, 1, 1), LabelMode::InlineLabel);

        assert_eq!(p.field, GridPlacement::new(1, 5, 1, 1));
        let label = p.label.unwrap();
        assert_eq!(label.cell, GridPlacement::new(1, 4, 1, 1));
        assert_eq!(label.align_x, HAlign::End);
        assert_eq!(label.padding.left, layout.label_padding);
    }

    #[test]
    fn test_spans_widen_field_cell() {
        let top = GridLayout::new(LabelOrientation::Top);
        let p = top.place("notes", FieldPosition::new(0, 0, 3, 2), LabelMode::InlineLabel);
        assert_eq!(p.field, GridPlacement::new(1, 0, 5, 2));
        assert_eq!(p.label.unwrap().cell, GridPlacement::new(0, 0, 1, 2));

        let side = GridLayout::new(LabelOrientation::Side);
        let p = side.place("notes", FieldPosition::new(0, 0, 3, 2), LabelMode::InlineLabel);
        assert_eq!(p.field, GridPlacement::new(0, 1, 3, 3));
    }

    #[test]
    fn test_unlabeled_fields_share_field_cells() {
        let layout = GridLayout::default();
        let labeled = layout.place("a", FieldPosition::new(2, 0, 1, 1), LabelMode::InlineLabel);
        let bare = layout.place("b", FieldPosition::new(2, 1, 1, 1), LabelMode::None);
        let titled = layout.place("c", FieldPosition::new(2, 2, 1, 1), LabelMode::TitledBorder);

        assert!(bare.label.is_none());
        assert!(titled.label.is_none());
        assert_eq!(bare.field.row, labeled.field.row);
        assert_eq!(titled.field.row, labeled.field.row);
    }

    #[test]
    fn test_zero_spans_are_clamped() {
        let layout = GridLayout::default();
        let p = layout.place("a", FieldPosition { row: 0, col: 0, row_span: 0, col_span: 0 }, LabelMode::None);
        assert_eq!(p.field, GridPlacement::new(1, 0, 1, 1));
    }

    #[test]
    fn test_dimensions() {
        let layout = GridLayout::default();
        let placements = layout.arrange([
            ("a", FieldPosition::new(0, 0, 1, 1), LabelMode::InlineLabel),
            ("b", FieldPosition::new(1, 1, 1, 2), LabelMode::InlineLabel),
        ]);
        assert_eq!(GridLayout::dimensions(&placements), (4, 3));
        assert_eq!(GridLayout::dimensions(&[]), (0, 0));
    }

    #[test]
    fn test_grid_placement_geometry() {
        let a = GridPlacement::new(0, 0, 2, 2);
        assert!(a.contains(1, 1));
        assert!(!a.contains(2, 0));
        assert!(a.overlaps(&GridPlacement::new(1, 1, 1, 1)));
        assert!(!a.overlaps(&GridPlacement::new(0, 2, 1, 1)));
    }

    #[test]
    fn test_find_overlap() {
        let layout = GridLayout::default();
        let placed = vec![layout.place("wide", FieldPosition::new(0, 0, 1, 2), LabelMode::InlineLabel)];

        let clash = layout.place("clash", FieldPosition::new(0, 1, 1, 1), LabelMode::None);
        assert_eq!(GridLayout::find_overlap(&placed, &clash).map(|p| p.key.as_str()), Some("wide"));

        let clear = layout.place("clear", FieldPosition::new(1, 0, 1, 1), LabelMode::InlineLabel);
        assert!(GridLayout::find_overlap(&placed, &clear).is_none());
    }
}
