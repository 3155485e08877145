//! Active-cell tracking for the numeric keypad.
//!
//! The cursor refers to rows by id only. Every use re-resolves the id
//! against the row store, since rows can be removed underneath it.

use super::models::{Column, RowId, RowStore};

/// Row access the cursor needs: lookups plus the ability to ask for a new
/// row when navigation runs past the end of the table.
pub trait RowSource {
    fn contains_row(&self, id: RowId) -> bool;

    /// Smallest id strictly greater than `id`, if any.
    fn next_row_after(&self, id: RowId) -> Option<RowId>;

    /// Adds a row at the end. `None` when no id is left to hand out.
    fn append_row(&mut self) -> Option<RowId>;
}

impl RowSource for RowStore {
    fn contains_row(&self, id: RowId) -> bool {
        self.contains(id)
    }

    fn next_row_after(&self, id: RowId) -> Option<RowId> {
        self.iter().map(|row| row.id).filter(|&other| other > id).min()
    }

    fn append_row(&mut self) -> Option<RowId> {
        self.add_row()
    }
}

/// A cell addressed by row id and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTarget {
    pub row_id: RowId,
    pub column: Column,
}

impl ActiveTarget {
    pub fn new(row_id: RowId, column: Column) -> Self {
        Self { row_id, column }
    }
}

/// Where an `advance` landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Column A to column B of the same row.
    SameRow(ActiveTarget),
    /// Column B to column A of the following row.
    NextRow(ActiveTarget),
    /// Past the last row: a row was created and targeted.
    NewRow(ActiveTarget),
}

impl Advance {
    pub fn target(self) -> ActiveTarget {
        match self {
            Advance::SameRow(target) | Advance::NextRow(target) | Advance::NewRow(target) => target,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveCellCursor {
    target: Option<ActiveTarget>,
    open: bool,
}

impl ActiveCellCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open && self.target.is_some()
    }

    /// Last target set, whether or not the keypad is still open.
    pub fn target(&self) -> Option<ActiveTarget> {
        self.target
    }

    /// The target, but only while it still names an existing row.
    pub fn resolve(&self, rows: &impl RowSource) -> Option<ActiveTarget> {
        self.target.filter(|target| rows.contains_row(target.row_id))
    }

    /// Targets `(row_id, column)` and opens the keypad. A missing row leaves
    /// the cursor untouched and returns `false`.
    pub fn open(&mut self, rows: &impl RowSource, row_id: RowId, column: Column) -> bool {
        if !rows.contains_row(row_id) {
            tracing::debug!(row_id, "refusing to open keypad on missing row");
            return false;
        }
        self.target = Some(ActiveTarget::new(row_id, column));
        self.open = true;
        true
    }

    /// Closes the keypad. The last target is kept.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Moves to the next cell in reading order, creating a row when the
    /// current one is the last. Returns `None`, leaving the cursor where it
    /// was, when there is no valid target or no row could be created.
    pub fn advance(&mut self, rows: &mut impl RowSource) -> Option<Advance> {
        let current = self.resolve(rows)?;

        let step = match current.column {
            Column::A => Advance::SameRow(ActiveTarget::new(current.row_id, Column::B)),
            Column::B => match rows.next_row_after(current.row_id) {
                Some(next) => Advance::NextRow(ActiveTarget::new(next, Column::A)),
                None => Advance::NewRow(ActiveTarget::new(rows.append_row()?, Column::A)),
            },
        };

        self.target = Some(step.target());
        Some(step)
    }

    /// Drops the target if its row no longer exists.
    pub fn retain_valid(&mut self, rows: &impl RowSource) {
        if self.target.is_some() && self.resolve(rows).is_none() {
            self.target = None;
            self.open = false;
        }
    }
}
