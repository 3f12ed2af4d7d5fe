//! Grid traversal arithmetic for N-column poster grids.
//!
//! All functions are total: they never index out of bounds and repeated
//! presses at a grid edge return the same cell. The last row may hold fewer
//! items than the column count (the ragged row), and every transition clamps
//! the column into that row's actual width.

use serde::{Deserialize, Serialize};

/// A cell in a grid, `(row, col)` both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridSelection {
    pub row: usize,
    pub col: usize,
}

impl GridSelection {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position of this cell in the flat item list.
    pub fn linear_index(&self, columns: usize) -> usize {
        self.row * columns + self.col
    }
}

/// Index of the last row for `total_items` laid out in `columns` columns.
pub fn max_row(total_items: usize, columns: usize) -> usize {
    if total_items == 0 || columns == 0 {
        0
    } else {
        (total_items - 1) / columns
    }
}

/// Number of items in `row`: `columns` everywhere except the ragged last row.
pub fn items_in_row(row: usize, total_items: usize, columns: usize) -> usize {
    if total_items == 0 || columns == 0 {
        return 0;
    }
    let last = max_row(total_items, columns);
    if row < last {
        columns
    } else if row == last {
        total_items - last * columns
    } else {
        0
    }
}

/// Clamp a selection so `row*columns+col < total_items` holds.
pub fn clamp(sel: GridSelection, total_items: usize, columns: usize) -> GridSelection {
    if total_items == 0 || columns == 0 {
        return GridSelection::default();
    }
    let row = sel.row.min(max_row(total_items, columns));
    let col = sel.col.min(items_in_row(row, total_items, columns).saturating_sub(1));
    GridSelection::new(row, col)
}

pub fn up(sel: GridSelection, total_items: usize, columns: usize) -> GridSelection {
    if sel.row == 0 {
        return sel;
    }
    clamp(GridSelection::new(sel.row - 1, sel.col), total_items, columns)
}

pub fn down(sel: GridSelection, total_items: usize, columns: usize) -> GridSelection {
    let target = sel.row.saturating_add(1).min(max_row(total_items, columns));
    clamp(GridSelection::new(target, sel.col), total_items, columns)
}

pub fn left(sel: GridSelection, total_items: usize, columns: usize) -> GridSelection {
    if sel.col > 0 {
        GridSelection::new(sel.row, sel.col - 1)
    } else if sel.row > 0 {
        // Wrap to the previous row's last item.
        let prev = sel.row - 1;
        GridSelection::new(prev, items_in_row(prev, total_items, columns).saturating_sub(1))
    } else {
        sel
    }
}

pub fn right(sel: GridSelection, total_items: usize, columns: usize) -> GridSelection {
    if columns == 0 || total_items == 0 {
        return sel;
    }
    if sel.col + 1 < columns && sel.linear_index(columns) + 1 < total_items {
        GridSelection::new(sel.row, sel.col + 1)
    } else if sel.row < max_row(total_items, columns) {
        // Wrap to the next row's first item.
        clamp(GridSelection::new(sel.row + 1, 0), total_items, columns)
    } else {
        sel
    }
}
