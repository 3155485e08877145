use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

/// Stable identifier of a row. A new row gets one more than the largest id
/// present.
pub type RowId = u32;

/// Commission rate applied to bill A (0.4%).
pub const COMMISSION_RATE_A: f64 = 0.004;
/// Commission rate applied to bill B (0.2%).
pub const COMMISSION_RATE_B: f64 = 0.002;
/// Number of zeroed rows a fresh or reset table starts with.
pub const DEFAULT_ROW_COUNT: u32 = 9;

/// One of the two bill columns a row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    A,
    B,
}

impl Column {
    /// Letter used in labels and headers.
    pub fn label(self) -> &'static str {
        match self {
            Column::A => "A",
            Column::B => "B",
        }
    }

    /// The column on the other side of the row.
    pub fn other(self) -> Column {
        match self {
            Column::A => Column::B,
            Column::B => Column::A,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: RowId,
    pub bill_a: f64,
    pub bill_b: f64,
}

impl Row {
    /// A zeroed row with the given id.
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            bill_a: 0.0,
            bill_b: 0.0,
        }
    }

    /// Bill amount stored under `column`.
    pub fn bill(&self, column: Column) -> f64 {
        match column {
            Column::A => self.bill_a,
            Column::B => self.bill_b,
        }
    }

    /// 0.4% of bill A. Recomputed on every call.
    pub fn commission_a(&self) -> f64 {
        self.bill_a * COMMISSION_RATE_A
    }

    /// 0.2% of bill B.
    pub fn commission_b(&self) -> f64 {
        self.bill_b * COMMISSION_RATE_B
    }

    pub fn total(&self) -> f64 {
        self.commission_a() + self.commission_b()
    }
}

/// Column sums shown under the table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub bill_a: f64,
    pub commission_a: f64,
    pub bill_b: f64,
    pub commission_b: f64,
    pub total: f64,
}

/// Ordered collection of calculator rows.
///
/// Insertion order is display order. The store never drops below one row,
/// and new ids always exceed every id currently present.
///
/// # Examples
///
/// ```
/// use hoahong::domain::RowStore;
///
/// let mut store = RowStore::default();
/// assert_eq!(store.len(), 9);
/// let id = store.add_row();
/// assert_eq!(id, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowStore {
    rows: Vec<Row>,
}

impl Default for RowStore {
    fn default() -> Self {
        Self {
            rows: default_rows(),
        }
    }
}

fn default_rows() -> Vec<Row> {
    (1..=DEFAULT_ROW_COUNT).map(Row::new).collect()
}

impl RowStore {
    /// Restores a store from a previously persisted list.
    ///
    /// An empty list cannot satisfy the at-least-one-row rule, and a row
    /// holding `RowId::MAX` leaves no id for the next row. Either yields the
    /// default table instead.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        if rows.iter().any(|row| row.id == RowId::MAX) {
            tracing::warn!("saved rows exhaust the id range, starting fresh");
            return Self::default();
        }
        Self { rows }
    }

    /// All rows in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Iterates rows in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Number of rows. Never zero.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks a row up by id.
    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Row at a zero-based display position.
    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// 1-based display position of the row with `id`.
    pub fn ordinal_of(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id).map(|i| i + 1)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.get(id).is_some()
    }

    /// Largest id present.
    pub fn max_id(&self) -> Option<RowId> {
        self.rows.iter().map(|row| row.id).max()
    }

    /// Appends a zeroed row and returns its id.
    ///
    /// Returns `None`, leaving the store unchanged, once the largest id is
    /// `RowId::MAX` and no greater id exists.
    pub fn add_row(&mut self) -> Option<RowId> {
        let id = match self.max_id() {
            Some(max) => match max.checked_add(1) {
                Some(id) => id,
                None => {
                    tracing::warn!(max, "no id left for a new row");
                    return None;
                }
            },
            None => 1,
        };
        self.rows.push(Row::new(id));
        Some(id)
    }

    /// Removes the last row in display order. Returns `false` when only one
    /// row is left, in which case nothing changes.
    pub fn remove_last_row(&mut self) -> bool {
        if self.rows.len() <= 1 {
            return false;
        }
        self.rows.pop();
        true
    }

    /// Sets one bill amount, reporting an unknown id as an error.
    pub fn try_update_cell(&mut self, id: RowId, column: Column, value: f64) -> DomainResult<()> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(DomainError::RowNotFound(id))?;
        match column {
            Column::A => row.bill_a = value,
            Column::B => row.bill_b = value,
        }
        Ok(())
    }

    /// Sets one bill amount. An unknown id is ignored; the return value tells
    /// whether a row was touched.
    pub fn update_cell(&mut self, id: RowId, column: Column, value: f64) -> bool {
        match self.try_update_cell(id, column, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "ignoring cell update");
                false
            }
        }
    }

    /// Back to nine zeroed rows with ids 1 through 9.
    pub fn reset(&mut self) {
        self.rows = default_rows();
    }

    /// Sums of every bill and commission column.
    pub fn totals(&self) -> Totals {
        self.rows.iter().fold(Totals::default(), |acc, row| Totals {
            bill_a: acc.bill_a + row.bill_a,
            commission_a: acc.commission_a + row.commission_a(),
            bill_b: acc.bill_b + row.bill_b,
            commission_b: acc.commission_b + row.commission_b(),
            total: acc.total + row.total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(store: &RowStore) -> Vec<RowId> {
        store.iter().map(|row| row.id).collect()
    }

    #[test]
    fn test_default_store() {
        let store = RowStore::default();
        assert_eq!(ids(&store), (1..=9).collect::<Vec<_>>());
        assert!(store.iter().all(|row| row.bill_a == 0.0 && row.bill_b == 0.0));
    }

    #[test]
    fn test_commission_values() {
        let row = Row {
            id: 1,
            bill_a: 1_000_000.0,
            bill_b: 500_000.0,
        };
        assert_eq!(row.commission_a(), 1_000_000.0 * 0.004);
        assert_eq!(row.commission_b(), 500_000.0 * 0.002);
        assert_eq!(row.total(), row.commission_a() + row.commission_b());
        assert!((row.commission_a() - 4_000.0).abs() < 1e-9);
        assert!((row.commission_b() - 1_000.0).abs() < 1e-9);
        assert!((row.total() - 5_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_commission_tracks_updates() {
        let mut store = RowStore::default();
        store.update_cell(3, Column::A, 250_000.0);
        assert!((store.get(3).unwrap().commission_a() - 1_000.0).abs() < 1e-9);
        store.update_cell(3, Column::A, 0.0);
        assert_eq!(store.get(3).unwrap().commission_a(), 0.0);
    }

    #[test]
    fn test_add_row_uses_max_id() {
        let mut store = RowStore::from_rows(vec![Row::new(4), Row::new(2)]);
        let id = store.add_row();
        assert_eq!(id, Some(5));
        assert_eq!(store.len(), 3);
        assert_eq!(store.rows().last().unwrap().id, 5);
    }

    #[test]
    fn test_add_after_remove_continues_from_max() {
        let mut store = RowStore::default();
        store.add_row();
        assert!(store.remove_last_row());
        assert!(store.remove_last_row());
        assert_eq!(store.len(), 8);
        assert_eq!(store.add_row(), Some(9));
    }

    #[test]
    fn test_remove_last_row_keeps_one() {
        let mut store = RowStore::from_rows(vec![Row::new(1), Row::new(2)]);
        assert!(store.remove_last_row());
        assert_eq!(ids(&store), vec![1]);
        assert!(!store.remove_last_row());
        assert_eq!(ids(&store), vec![1]);
    }

    #[test]
    fn test_update_cell() {
        let mut store = RowStore::default();
        assert!(store.update_cell(2, Column::B, 750.0));
        assert_eq!(store.get(2).unwrap().bill_b, 750.0);
        assert_eq!(store.get(2).unwrap().bill_a, 0.0);
    }

    #[test]
    fn test_update_missing_row_is_noop() {
        let mut store = RowStore::default();
        let before = store.clone();
        assert!(!store.update_cell(42, Column::A, 10.0));
        assert_eq!(store, before);
        assert_eq!(
            store.try_update_cell(42, Column::A, 10.0),
            Err(DomainError::RowNotFound(42))
        );
    }

    #[test]
    fn test_reset_restores_default() {
        let mut store = RowStore::from_rows(vec![Row {
            id: 30,
            bill_a: 5.0,
            bill_b: 6.0,
        }]);
        store.reset();
        assert_eq!(store, RowStore::default());
    }

    #[test]
    fn test_add_row_stops_at_max_id() {
        let mut store = RowStore::from_rows(vec![Row::new(RowId::MAX - 1)]);
        assert_eq!(store.add_row(), Some(RowId::MAX));
        assert_eq!(store.add_row(), None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.max_id(), Some(RowId::MAX));
    }

    #[test]
    fn test_from_rows_rejects_max_id() {
        let store = RowStore::from_rows(vec![Row::new(3), Row::new(RowId::MAX)]);
        assert_eq!(store, RowStore::default());
    }

    #[test]
    fn test_from_empty_rows_falls_back() {
        assert_eq!(RowStore::from_rows(Vec::new()), RowStore::default());
    }

    #[test]
    fn test_ordinal_of() {
        let store = RowStore::from_rows(vec![Row::new(5), Row::new(8)]);
        assert_eq!(store.ordinal_of(8), Some(2));
        assert_eq!(store.ordinal_of(1), None);
    }

    #[test]
    fn test_totals() {
        let mut store = RowStore::default();
        store.update_cell(1, Column::A, 1_000_000.0);
        store.update_cell(2, Column::B, 500_000.0);
        let totals = store.totals();
        assert_eq!(totals.bill_a, 1_000_000.0);
        assert_eq!(totals.bill_b, 500_000.0);
        assert!((totals.total - 5_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_serialized_shape() {
        let store = RowStore::from_rows(vec![Row {
            id: 1,
            bill_a: 10.0,
            bill_b: 0.0,
        }]);
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json, serde_json::json!([{ "id": 1, "billA": 10.0, "billB": 0.0 }]));
    }

    #[test]
    fn test_reload_preserves_rows() {
        let mut store = RowStore::default();
        store.add_row();
        store.update_cell(10, Column::A, 123_456.0);
        store.update_cell(4, Column::B, 9.5);

        let json = serde_json::to_string(&store).unwrap();
        let reloaded: RowStore = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn test_reads_integer_amounts() {
        let store: RowStore =
            serde_json::from_str(r#"[{"id":1,"billA":0,"billB":200000}]"#).unwrap();
        assert_eq!(store.get(1).unwrap().bill_b, 200_000.0);
    }
}
