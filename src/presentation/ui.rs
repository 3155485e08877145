use crate::application::{App, AppMode, RESET_PROMPT};
use crate::domain::{format_vnd, format_vnd_suffixed, Column, REPORT_HEADER};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

const HEADER_HEIGHT: u16 = 3;
const TOTALS_HEIGHT: u16 = 3;
const STATUS_HEIGHT: u16 = 3;

/// Number of data rows the table can show in a terminal `height` rows tall.
pub fn table_viewport_rows(height: u16) -> usize {
    // borders (2) and the column header (1)
    height
        .saturating_sub(HEADER_HEIGHT + TOTALS_HEIGHT + STATUS_HEIGHT + 3)
        .max(1) as usize
}

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(TOTALS_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_table(f, app, chunks[1]);
    render_totals(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);

    match app.mode {
        AppMode::Keypad => render_keypad_popup(f, app),
        AppMode::EditName => render_name_popup(f, app),
        AppMode::ConfirmReset => render_confirm_popup(f),
        AppMode::Help => render_help_popup(f, app.help_scroll),
        AppMode::Normal => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let name = if app.display_name.is_empty() {
        Span::styled("(chưa nhập tên)", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.display_name.as_str(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    };
    let line = Line::from(vec![
        Span::styled("Tên CTV: ", Style::default().fg(Color::Cyan)),
        name,
    ]);
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Hoa Hồng CTV")
            .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
    );
    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let visible_rows = (area.height as usize).saturating_sub(3).max(1);
    let active = app.active_target();

    let header = Row::new(
        REPORT_HEADER
            .iter()
            .map(|title| Cell::from(*title).style(Style::default().fg(Color::Yellow))),
    )
    .height(1);

    let rows = app
        .rows
        .iter()
        .enumerate()
        .skip(app.scroll_row)
        .take(visible_rows)
        .map(|(index, row)| {
            let selected = index == app.selected_row;
            let bill_style = |column: Column| {
                let is_active = active.is_some_and(|t| t.row_id == row.id && t.column == column);
                if is_active {
                    Style::default().bg(Color::Green).fg(Color::Black)
                } else if selected && column == app.selected_column {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                }
            };
            let ordinal_style = if selected {
                Style::default().bg(Color::LightBlue).fg(Color::Black)
            } else {
                Style::default().fg(Color::Yellow)
            };

            Row::new(vec![
                Cell::from((index + 1).to_string()).style(ordinal_style),
                Cell::from(format_vnd(row.bill_a)).style(bill_style(Column::A)),
                Cell::from(format_vnd(row.commission_a())).style(Style::default().fg(Color::Cyan)),
                Cell::from(format_vnd(row.bill_b)).style(bill_style(Column::B)),
                Cell::from(format_vnd(row.commission_b())).style(Style::default().fg(Color::Cyan)),
                Cell::from(format_vnd(row.total())).style(Style::default().fg(Color::Green)),
            ])
            .height(1)
        });

    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(20),
        Constraint::Percentage(17),
        Constraint::Percentage(20),
        Constraint::Percentage(17),
        Constraint::Percentage(20),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!("Bảng tính ({} hàng)", app.rows.len())))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_totals(f: &mut Frame, app: &App, area: Rect) {
    let totals = app.rows.totals();
    let line = Line::from(vec![
        Span::raw("Bill A: "),
        Span::styled(format_vnd(totals.bill_a), Style::default().fg(Color::White)),
        Span::raw("  0.4%: "),
        Span::styled(format_vnd_suffixed(totals.commission_a), Style::default().fg(Color::Cyan)),
        Span::raw("  Bill B: "),
        Span::styled(format_vnd(totals.bill_b), Style::default().fg(Color::White)),
        Span::raw("  0.2%: "),
        Span::styled(format_vnd_suffixed(totals.commission_b), Style::default().fg(Color::Cyan)),
        Span::raw("  TỔNG: "),
        Span::styled(
            format_vnd_suffixed(totals.total),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ]);
    let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Tổng cộng"));
    f.render_widget(widget, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.mode {
        AppMode::Normal => app.status_message.clone().unwrap_or_else(|| {
            "Enter: nhập | a: thêm hàng | d: xóa hàng | r: đặt lại | x: xuất Excel | v: xuất CSV | n: tên | ?: trợ giúp | q: thoát".to_string()
        }),
        AppMode::Keypad => "0-9: số | t: 000 | Backspace: xóa | c: xóa hết | Enter/Tab: tiếp | Esc: đóng".to_string(),
        AppMode::EditName => "Enter: lưu | Esc: hủy".to_string(),
        AppMode::ConfirmReset => "y: đồng ý | n/Esc: hủy".to_string(),
        AppMode::Help => "↑↓/jk: cuộn | PgUp/PgDn: cuộn nhanh | Home: đầu | Esc/q: đóng".to_string(),
    };

    let style = match app.mode {
        AppMode::Normal => Style::default(),
        AppMode::Keypad => Style::default().fg(Color::Green),
        AppMode::EditName => Style::default().fg(Color::Yellow),
        AppMode::ConfirmReset => Style::default().fg(Color::Red),
        AppMode::Help => Style::default().fg(Color::Cyan),
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Trạng thái"))
        .style(style);
    f.render_widget(status, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_keypad_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(34, 12, f.area());
    f.render_widget(Clear, popup_area);

    let label = app.keypad_label().unwrap_or_default();
    let display = format_vnd(app.keypad.value());
    let key_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{:>30}", display),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for keys in [["1", "2", "3"], ["4", "5", "6"], ["7", "8", "9"], ["000", "0", "⌫"]] {
        lines.push(Line::from(
            keys.iter()
                .map(|k| Span::styled(format!("{:^10}", k), key_style))
                .collect::<Vec<_>>(),
        ));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: tiếp   Esc: đóng",
        Style::default().fg(Color::DarkGray),
    )));

    let keypad = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label)
            .style(Style::default().bg(Color::Black)),
    );
    f.render_widget(keypad, popup_area);
}

fn render_name_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(50, 3, f.area());
    f.render_widget(Clear, popup_area);

    let input = Paragraph::new(app.name_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Tên CTV")
            .border_style(Style::default().fg(Color::Yellow))
            .style(Style::default().bg(Color::Black)),
    );
    f.render_widget(input, popup_area);

    let max_x = popup_area.x + popup_area.width.saturating_sub(2);
    let cursor_x = (popup_area.x + app.cursor_position as u16 + 1).min(max_x);
    f.set_cursor_position((cursor_x, popup_area.y + 1));
}

fn render_confirm_popup(f: &mut Frame) {
    let popup_area = centered_rect(50, 5, f.area());
    f.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(RESET_PROMPT),
        Line::from(Span::styled("(y) Đồng ý    (n) Hủy", Style::default().fg(Color::DarkGray))),
    ];
    let confirm = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Đặt Lại")
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(Color::Black)),
    );
    f.render_widget(confirm, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("Trợ giúp (dòng {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"HOA HỒNG CTV - MÁY TÍNH HOA HỒNG

=== CÁCH TÍNH ===
0.4%            Hoa hồng trên Bill A    = Bill A × 0,004
0.2%            Hoa hồng trên Bill B    = Bill B × 0,002
TỔNG            0.4% + 0.2% của từng hàng

=== BẢNG TÍNH ===
↑↓ / jk         Chọn hàng
←→ / hl, Tab    Chọn cột Bill A / Bill B
Enter / F2      Mở bàn phím số tại ô đang chọn
a               Thêm hàng
d               Xóa hàng cuối (luôn giữ ít nhất một hàng)
r               Đặt lại bảng tính (9 hàng trống, xóa tên)
n               Nhập tên CTV

=== BÀN PHÍM SỐ ===
0-9             Nhập số
t               Thêm 000
Backspace       Xóa một chữ số
c / Delete      Xóa hết
Enter / Tab     Sang ô tiếp theo (Bill A → Bill B → hàng sau)
                Ở hàng cuối sẽ tự thêm hàng mới
Esc             Đóng bàn phím

=== XUẤT FILE ===
x / Ctrl+E      Xuất Excel: Hoa_Hong_CTV_<Tên>_<ngày>.xlsx
v               Xuất CSV cùng nội dung
                File được lưu vào thư mục Downloads

=== KHÁC ===
F1 / ?          Mở trợ giúp
q               Thoát

Dữ liệu được lưu tự động sau mỗi thay đổi."#
}
