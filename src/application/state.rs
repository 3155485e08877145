//! Application state for the commission calculator.
//!
//! Ties the row store, the active-cell cursor, the keypad buffer and the
//! display name together, and mirrors every change into the state
//! repository right after it happens.

use crate::domain::{
    ActiveCellCursor, ActiveTarget, Advance, Column, CommissionReport, Keypad, RowId, RowStore,
};
use crate::infrastructure::{export_file_name, today, CsvExporter, StateRepository, XlsxExporter};
use std::path::PathBuf;

/// Represents the current mode of the application.
///
/// The mode decides how key presses are interpreted and which popup is
/// drawn over the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Moving the selection around the table and triggering actions
    Normal,
    /// The numeric keypad is open on the active cell
    Keypad,
    /// Typing the display name
    EditName,
    /// Waiting for the user to confirm a reset
    ConfirmReset,
    /// Help screen is displayed
    Help,
}

/// Which file type an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

pub const RESET_PROMPT: &str = "Bạn có chắc chắn muốn đặt lại bảng tính?";

const KEYPAD_UNFIT_MESSAGE: &str = "Số tiền trong ô này không sửa được bằng bàn phím";
const NO_ROW_ID_MESSAGE: &str = "Không thể thêm hàng mới";

/// Main application state.
///
/// # Examples
///
/// ```
/// use hoahong::application::App;
///
/// let app = App::default();
/// assert_eq!(app.rows.len(), 9);
/// assert_eq!(app.selected_row, 0);
/// ```
pub struct App {
    pub rows: RowStore,
    pub cursor: ActiveCellCursor,
    pub keypad: Keypad,
    pub display_name: String,
    pub mode: AppMode,
    /// Selected row, by display position (zero-based)
    pub selected_row: usize,
    pub selected_column: Column,
    /// Top row visible in the viewport
    pub scroll_row: usize,
    /// Viewport height in rows
    pub viewport_rows: usize,
    pub status_message: Option<String>,
    /// Buffer for the display-name editor
    pub name_input: String,
    /// Cursor position within `name_input`, in characters
    pub cursor_position: usize,
    pub help_scroll: usize,
    pub export_dir: PathBuf,
    repository: StateRepository,
}

impl Default for App {
    fn default() -> Self {
        Self::new(StateRepository::in_memory(), PathBuf::from("."))
    }
}

impl App {
    /// Builds the application from whatever the repository holds.
    pub fn new(repository: StateRepository, export_dir: PathBuf) -> Self {
        let rows = repository.load_rows();
        let display_name = repository.load_display_name();
        Self {
            rows,
            cursor: ActiveCellCursor::new(),
            keypad: Keypad::new(),
            display_name,
            mode: AppMode::Normal,
            selected_row: 0,
            selected_column: Column::A,
            scroll_row: 0,
            viewport_rows: 20,
            status_message: None,
            name_input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
            export_dir,
            repository,
        }
    }

    fn persist_rows(&mut self) {
        if let Err(err) = self.repository.save_rows(&self.rows) {
            tracing::error!(error = %err, "failed to save rows");
            self.status_message = Some(format!("Save failed: {}", err));
        }
    }

    fn persist_display_name(&mut self) {
        if let Err(err) = self.repository.save_display_name(&self.display_name) {
            tracing::error!(error = %err, "failed to save display name");
            self.status_message = Some(format!("Save failed: {}", err));
        }
    }

    /// Id of the row under the table selection.
    pub fn selected_row_id(&self) -> Option<RowId> {
        self.rows.row_at(self.selected_row).map(|row| row.id)
    }

    /// The keypad target, if the keypad is open and its row still exists.
    pub fn active_target(&self) -> Option<ActiveTarget> {
        if self.cursor.is_open() {
            self.cursor.resolve(&self.rows)
        } else {
            None
        }
    }

    /// Moves the selection one row up, scrolling if needed.
    pub fn move_up(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
            self.ensure_cursor_visible();
        }
    }

    /// Moves the selection one row down. Stops at the last row.
    pub fn move_down(&mut self) {
        if self.selected_row + 1 < self.rows.len() {
            self.selected_row += 1;
            self.ensure_cursor_visible();
        }
    }

    /// Selects the Bill A column.
    pub fn move_left(&mut self) {
        self.selected_column = Column::A;
    }

    /// Selects the Bill B column.
    pub fn move_right(&mut self) {
        self.selected_column = Column::B;
    }

    /// Switches the selection between the two bill columns.
    pub fn toggle_column(&mut self) {
        self.selected_column = self.selected_column.other();
    }

    /// Opens the keypad on the selected cell.
    pub fn open_keypad_at_selection(&mut self) {
        if let Some(id) = self.selected_row_id() {
            self.open_keypad(id, self.selected_column);
        }
    }

    /// Opens the keypad on `(row_id, column)`, seeding it with the cell's
    /// current amount.
    ///
    /// # Arguments
    ///
    /// * `row_id` - Row to edit; a missing row is refused
    /// * `column` - Bill column to edit
    ///
    /// Returns `false` without opening when the row is missing or its amount
    /// cannot be represented on the keypad (a fraction, a negative, or more
    /// than 15 digits). The latter sets a status message.
    pub fn open_keypad(&mut self, row_id: RowId, column: Column) -> bool {
        if let Some(value) = self.rows.get(row_id).map(|row| row.bill(column)) {
            if !Keypad::can_load(value) {
                tracing::warn!(row_id, value, "amount does not fit the keypad");
                self.status_message = Some(KEYPAD_UNFIT_MESSAGE.to_string());
                return false;
            }
        }
        if !self.cursor.open(&self.rows, row_id, column) {
            return false;
        }
        self.load_keypad_from_target();
        self.follow_target();
        self.mode = AppMode::Keypad;
        self.status_message = None;
        tracing::debug!(row_id, column = column.label(), "keypad opened");
        true
    }

    /// Closes the keypad and returns to table navigation.
    pub fn close_keypad(&mut self) {
        self.cursor.close();
        self.keypad.clear();
        self.mode = AppMode::Normal;
    }

    /// `Hàng <ordinal> - Bill <column>` for the open keypad.
    pub fn keypad_label(&self) -> Option<String> {
        let target = self.active_target()?;
        let ordinal = self.rows.ordinal_of(target.row_id)?;
        Some(format!("Hàng {} - Bill {}", ordinal, target.column.label()))
    }

    /// Types one digit and writes the new amount to the active cell.
    pub fn keypad_digit(&mut self, digit: char) {
        if self.keypad.push_digit(digit) {
            self.write_keypad_value();
        }
    }

    /// The "000" key.
    pub fn keypad_triple_zero(&mut self) {
        if self.keypad.push_triple_zero() {
            self.write_keypad_value();
        }
    }

    /// Removes the last digit and writes the new amount.
    pub fn keypad_backspace(&mut self) {
        if self.keypad.backspace() {
            self.write_keypad_value();
        }
    }

    /// Sets the active cell back to zero.
    pub fn keypad_clear(&mut self) {
        if self.keypad.clear() {
            self.write_keypad_value();
        }
    }

    /// Moves the keypad to the next cell, adding a row past the end.
    ///
    /// The keypad closes when there is nowhere to go: the target row is
    /// gone, no id is left for a new row, or the next cell holds an amount
    /// the keypad cannot show.
    pub fn keypad_next(&mut self) {
        let Some(step) = self.cursor.advance(&mut self.rows) else {
            let stuck = self.cursor.resolve(&self.rows).is_some();
            self.close_keypad();
            if stuck {
                self.status_message = Some(NO_ROW_ID_MESSAGE.to_string());
            }
            return;
        };

        if let Advance::NewRow(target) = step {
            tracing::info!(row_id = target.row_id, "row added while advancing");
            self.persist_rows();
        }
        self.follow_target();
        if !self.load_keypad_from_target() {
            tracing::warn!(row_id = step.target().row_id, "next amount does not fit the keypad");
            self.close_keypad();
            self.status_message = Some(KEYPAD_UNFIT_MESSAGE.to_string());
        }
    }

    fn write_keypad_value(&mut self) {
        let Some(target) = self.cursor.resolve(&self.rows) else {
            return;
        };
        if self
            .rows
            .update_cell(target.row_id, target.column, self.keypad.value())
        {
            self.persist_rows();
        }
    }

    fn load_keypad_from_target(&mut self) -> bool {
        let value = self
            .cursor
            .resolve(&self.rows)
            .and_then(|target| self.rows.get(target.row_id).map(|row| row.bill(target.column)))
            .unwrap_or(0.0);
        self.keypad.load(value)
    }

    /// Keeps the table selection on the keypad target.
    fn follow_target(&mut self) {
        if let Some(target) = self.cursor.resolve(&self.rows) {
            if let Some(ordinal) = self.rows.ordinal_of(target.row_id) {
                self.selected_row = ordinal - 1;
                self.selected_column = target.column;
                self.ensure_cursor_visible();
            }
        }
    }

    /// Appends a zeroed row and saves the table.
    pub fn add_row(&mut self) {
        let Some(id) = self.rows.add_row() else {
            self.status_message = Some(NO_ROW_ID_MESSAGE.to_string());
            return;
        };
        tracing::info!(row_id = id, "row added");
        self.persist_rows();
        self.status_message = Some(format!("Đã thêm hàng {}", self.rows.len()));
    }

    /// Removes the last row unless it is the only one.
    pub fn remove_last_row(&mut self) {
        if !self.rows.remove_last_row() {
            self.status_message = Some("Cần giữ lại ít nhất một hàng".to_string());
            return;
        }
        tracing::info!(remaining = self.rows.len(), "last row removed");
        self.persist_rows();
        self.after_rows_shrunk();
        self.status_message = Some("Đã xóa hàng cuối".to_string());
    }

    /// Asks for confirmation before resetting.
    pub fn request_reset(&mut self) {
        self.mode = AppMode::ConfirmReset;
        self.status_message = None;
    }

    pub fn cancel_reset(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Restores the nine zeroed rows and clears the display name.
    pub fn confirm_reset(&mut self) {
        self.rows.reset();
        self.display_name.clear();
        tracing::info!("table reset");
        self.persist_rows();
        self.persist_display_name();
        self.after_rows_shrunk();
        self.mode = AppMode::Normal;
        self.status_message = Some("Đã đặt lại bảng tính".to_string());
    }

    fn after_rows_shrunk(&mut self) {
        self.cursor.retain_valid(&self.rows);
        if self.selected_row >= self.rows.len() {
            self.selected_row = self.rows.len().saturating_sub(1);
        }
        self.ensure_cursor_visible();
    }

    /// Opens the name editor on the current display name.
    pub fn start_name_edit(&mut self) {
        self.mode = AppMode::EditName;
        self.name_input = self.display_name.clone();
        self.cursor_position = self.name_input.chars().count();
        self.status_message = None;
    }

    /// Stores the edited name exactly as typed and saves it.
    pub fn finish_name_edit(&mut self) {
        self.display_name = self.name_input.clone();
        self.persist_display_name();
        self.cancel_name_edit();
    }

    /// Leaves the name editor, discarding the buffer.
    pub fn cancel_name_edit(&mut self) {
        self.mode = AppMode::Normal;
        self.name_input.clear();
        self.cursor_position = 0;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.name_input
            .char_indices()
            .nth(char_index)
            .map_or(self.name_input.len(), |(i, _)| i)
    }

    /// Inserts `c` at the cursor.
    pub fn name_insert(&mut self, c: char) {
        let index = self.byte_index(self.cursor_position);
        self.name_input.insert(index, c);
        self.cursor_position += 1;
    }

    /// Deletes the character before the cursor.
    pub fn name_backspace(&mut self) {
        if self.cursor_position > 0 {
            let index = self.byte_index(self.cursor_position - 1);
            self.name_input.remove(index);
            self.cursor_position -= 1;
        }
    }

    /// Deletes the character under the cursor.
    pub fn name_delete(&mut self) {
        if self.cursor_position < self.name_input.chars().count() {
            let index = self.byte_index(self.cursor_position);
            self.name_input.remove(index);
        }
    }

    /// Moves the name cursor one character left.
    pub fn name_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Moves the name cursor one character right.
    pub fn name_cursor_right(&mut self) {
        if self.cursor_position < self.name_input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Jumps to the start of the name.
    pub fn name_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    /// Jumps past the last character.
    pub fn name_cursor_end(&mut self) {
        self.cursor_position = self.name_input.chars().count();
    }

    /// Where an export in `format` would be written today.
    pub fn export_path(&self, format: ExportFormat) -> PathBuf {
        self.export_dir
            .join(export_file_name(&self.display_name, today(), format.extension()))
    }

    /// Writes the report for the current rows. State is never modified apart
    /// from the status message.
    pub fn export(&mut self, format: ExportFormat) {
        let report = CommissionReport::from_rows(&self.rows);
        let path = self.export_path(format);
        let result = match format {
            ExportFormat::Xlsx => XlsxExporter::export(&report, &path),
            ExportFormat::Csv => CsvExporter::export(&report, &path),
        };
        self.set_export_result(result.map(|p| p.display().to_string()).map_err(|e| format!("{:#}", e)));
    }

    /// Processes the result of an export.
    ///
    /// # Arguments
    ///
    /// * `result` - Written file path, or an error message
    pub fn set_export_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(path) => {
                tracing::info!(%path, "report exported");
                self.status_message = Some(format!("Exported to {}", path));
            }
            Err(error) => {
                tracing::error!(%error, "export failed");
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }
    }

    pub fn update_viewport_size(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.ensure_cursor_visible();
    }

    /// Ensures the selected row is visible by adjusting scroll position.
    pub fn ensure_cursor_visible(&mut self) {
        if self.selected_row < self.scroll_row {
            self.scroll_row = self.selected_row;
        } else if self.selected_row >= self.scroll_row + self.viewport_rows {
            self.scroll_row = self.selected_row + 1 - self.viewport_rows;
        }
    }
}
