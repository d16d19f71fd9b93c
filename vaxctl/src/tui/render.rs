//! All ratatui rendering: navigation menu, the four resource panes, status
//! line and key hints.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table};

use crate::api::ResourceApi;

use super::app::{App, MENU_TITLE, MenuItem, Screen, TITLE};
use super::choice::ChoiceList;
use super::editor::{FieldEditor, TextInput};
use super::intent::{DynamicView, View};
use super::keystroke::{KeystrokeEditor, KeystrokeView, is_combo};
use super::models::{DynamicContent, SubModel, ViewerContent};
use super::ordered_select::{FilterState, OrderedSelection};
use super::resource_data::FieldKind;
use super::style as tui_style;
use super::table::{TableView, UNSAVED_BANNER};
use super::viewer::TextViewer;

/// Render the entire TUI layout.
pub fn render<A: ResourceApi>(f: &mut Frame, app: &App<A>) {
    match app.current_model() {
        Some(model) => render_resource(f, app, model),
        None => render_navigation(f, app),
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

struct PaneAreas {
    header: Rect,
    main: Rect,
    data: Rect,
    dynamic: Rect,
    status: Rect,
    viewer: Rect,
    hints: Rect,
}

fn pane_layout(area: Rect) -> PaneAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Header
            Constraint::Percentage(40), // Main / data / dynamic
            Constraint::Length(1),      // Status
            Constraint::Min(3),         // Viewer
            Constraint::Length(1),      // Key hints
        ])
        .split(area);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(35),
            Constraint::Percentage(45),
        ])
        .split(rows[1]);
    PaneAreas {
        header: rows[0],
        main: panes[0],
        data: panes[1],
        dynamic: panes[2],
        status: rows[2],
        viewer: rows[3],
        hints: rows[4],
    }
}

/// Inner heights of the viewer and dynamic panes for a terminal `area`.
pub fn body_heights(area: Rect) -> (usize, usize) {
    let panes = pane_layout(area);
    (
        panes.viewer.height.saturating_sub(2) as usize,
        panes.dynamic.height.saturating_sub(2) as usize,
    )
}

fn pane_block(title: impl Into<String>, active: bool) -> Block<'static> {
    let border = if active {
        tui_style::ACTIVE_BORDER
    } else {
        tui_style::BORDER
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(format!(" {} ", title.into()), tui_style::TITLE))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

fn render_navigation<A: ResourceApi>(f: &mut Frame, app: &App<A>) {
    let area = f.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, rows[0], None);

    let lines: Vec<Line> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.menu_cursor {
                tui_style::SELECTED
            } else {
                Style::default()
            };
            Line::styled(format!(" {} ", item.label()), style)
        })
        .collect();
    let menu = centered(rows[1], 30, MenuItem::ALL.len() as u16 + 2);
    f.render_widget(Clear, menu);
    f.render_widget(Paragraph::new(lines).block(pane_block(MENU_TITLE, true)), menu);

    render_keyhints(f, rows[2], &context_hints(app));
}

fn render_header(f: &mut Frame, area: Rect, screen: Option<&str>) {
    let text = match screen {
        Some(name) => format!(" {TITLE} | {name}"),
        None => format!(" {TITLE}"),
    };
    f.render_widget(Paragraph::new(text).style(tui_style::HEADER), area);
}

// ---------------------------------------------------------------------------
// Resource screens
// ---------------------------------------------------------------------------

fn screen_name(model: &dyn SubModel) -> &'static str {
    MenuItem::ALL
        .iter()
        .find(|item| item.resource() == Some(model.resource()))
        .map(|item| item.label())
        .unwrap_or_default()
}

fn render_resource<A: ResourceApi>(f: &mut Frame, app: &App<A>, model: &dyn SubModel) {
    let areas = pane_layout(f.area());
    let view = model.panes().view;

    render_header(f, areas.header, Some(screen_name(model)));
    render_main(f, model, areas.main, view == View::Main);
    render_data(f, model, areas.data, view == View::Data);
    render_dynamic(f, model, areas.dynamic, view == View::Dynamic);
    render_status(f, model, areas.status);
    render_viewer(f, model, areas.viewer, view == View::Viewer);
    render_keyhints(f, areas.hints, &context_hints(app));
}

fn render_main(f: &mut Frame, model: &dyn SubModel, area: Rect, active: bool) {
    let menu = &model.panes().main;
    let lines: Vec<Line> = menu
        .actions()
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let style = match (i == menu.cursor(), active) {
                (true, true) => tui_style::SELECTED,
                (true, false) => tui_style::TITLE,
                _ => Style::default(),
            };
            Line::styled(action.label(), style)
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(pane_block(menu.title(), active)),
        area,
    );
}

fn render_data(f: &mut Frame, model: &dyn SubModel, area: Rect, active: bool) {
    let data = &model.panes().data;
    let focused = data.focused_index();
    let lines: Vec<Line> = data
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let title_style = match field.kind {
                FieldKind::ReadOnly => tui_style::DIM,
                _ => tui_style::TITLE,
            };
            let value = if field.value.is_empty() {
                Span::styled("-", tui_style::DIM)
            } else {
                Span::raw(field.value.clone())
            };
            let line = Line::from(vec![Span::styled(format!("{}: ", field.title), title_style), value]);
            if active && focused == Some(i) {
                line.style(tui_style::SELECTED)
            } else {
                line
            }
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(pane_block(data.title(), active)),
        area,
    );
}

fn dynamic_title(dynamic: Option<DynamicView>) -> &'static str {
    match dynamic {
        None => "Editor",
        Some(DynamicView::Field(field)) => field,
        Some(DynamicView::YamlSave) => "Save To File",
        Some(DynamicView::YamlPreview) => "YAML",
    }
}

fn render_dynamic(f: &mut Frame, model: &dyn SubModel, area: Rect, active: bool) {
    let block = pane_block(dynamic_title(model.panes().dynamic), active);
    let paragraph = match model.dynamic_content() {
        DynamicContent::Empty => Paragraph::new(Line::styled(
            "Press enter on a field to edit it",
            tui_style::DIM,
        )),
        DynamicContent::Message(text) => Paragraph::new(Line::styled(text, tui_style::DIM)),
        DynamicContent::Editor(editor) => Paragraph::new(editor_lines(editor, active)),
        DynamicContent::Choice(list) => Paragraph::new(choice_lines(list, active)),
        DynamicContent::Selection(selection) => {
            Paragraph::new(selection_lines(selection, active))
        }
        DynamicContent::Keystroke(editor) => Paragraph::new(keystroke_lines(editor, active)),
        DynamicContent::Text(viewer) => text_paragraph(viewer),
    };
    f.render_widget(paragraph.block(block), area);
}

fn input_line(input: &TextInput, mask: Option<char>, active: bool) -> Line<'static> {
    let (before, after) = input.split_at_cursor(mask);
    let mut rest = after.chars();
    let under_cursor = rest.next().map(String::from).unwrap_or_else(|| " ".into());
    let cursor_style = if active {
        tui_style::SELECTED
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled("> ", tui_style::DIM),
        Span::raw(before),
        Span::styled(under_cursor, cursor_style),
        Span::raw(rest.collect::<String>()),
    ])
}

fn editor_lines(editor: &FieldEditor, active: bool) -> Vec<Line<'static>> {
    let mask = editor.is_masked().then_some('*');
    let mut lines = vec![
        Line::styled(editor.prompt().to_string(), tui_style::TITLE),
        input_line(editor.input(), mask, active),
    ];
    match editor.validation() {
        Some(Ok(())) => lines.push(Line::styled("✔", tui_style::INFO)),
        Some(Err(msg)) => lines.push(Line::styled(format!("✘ {msg}"), tui_style::ERROR)),
        None => {}
    }
    lines
}

fn choice_lines(list: &ChoiceList, active: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled(list.prompt(), tui_style::TITLE)];
    lines.extend(list.options().iter().enumerate().map(|(i, option)| {
        let style = if active && i == list.cursor() {
            tui_style::SELECTED
        } else {
            Style::default()
        };
        Line::styled(format!("  {option}"), style)
    }));
    lines
}

/// Rows of a list with the cursor row highlighted while the pane is active.
fn list_lines(title: &str, rows: &[String], cursor: usize, active: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled(title.to_string(), tui_style::TITLE)];
    if rows.is_empty() {
        lines.push(Line::styled("  (empty)", tui_style::DIM));
    }
    lines.extend(rows.iter().enumerate().map(|(i, row)| {
        let style = if active && i == cursor {
            tui_style::SELECTED
        } else {
            Style::default()
        };
        Line::styled(format!("  {row}"), style)
    }));
    lines
}

fn keystroke_lines(editor: &KeystrokeEditor, active: bool) -> Vec<Line<'static>> {
    match editor.view() {
        KeystrokeView::Steps => {
            let rows: Vec<String> = editor
                .steps()
                .iter()
                .map(|step| {
                    let kind = if is_combo(step) { "combo" } else { "text " };
                    format!("[{kind}] {step}")
                })
                .collect();
            list_lines("Key Combo list", &rows, editor.cursor(), active)
        }
        KeystrokeView::Sequence(input) => vec![
            Line::styled("Enter key sequence:", tui_style::TITLE),
            input_line(input, None, active),
        ],
        KeystrokeView::Combo => list_lines(
            "Select multiple keys to be pressed",
            editor.combo(),
            editor.combo_cursor(),
            active,
        ),
        KeystrokeView::Char(input) => vec![
            Line::styled("Enter character:", tui_style::TITLE),
            input_line(input, None, active),
        ],
        KeystrokeView::Special(list) => choice_lines(list, active),
    }
}

fn selection_lines(selection: &OrderedSelection, active: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled(
        selection.title().to_string(),
        tui_style::TITLE,
    )];
    match selection.filter_state() {
        FilterState::Unfiltered => {}
        FilterState::Filtering => lines.push(Line::from(format!("/{}", selection.filter().value()))),
        FilterState::FilterApplied => lines.push(Line::styled(
            format!("filter: {} (esc to clear)", selection.filter().value()),
            tui_style::DIM,
        )),
    }
    let items = selection.items();
    for (row, &index) in selection.visible().iter().enumerate() {
        let item = &items[index];
        let mark = if item.selected { "[x]" } else { "[ ]" };
        let style = if active && row == selection.cursor() {
            tui_style::SELECTED
        } else if item.selected {
            tui_style::CHOSEN
        } else {
            Style::default()
        };
        lines.push(Line::styled(format!("{mark} {}", item.name), style));
    }
    lines
}

fn text_paragraph(viewer: &TextViewer) -> Paragraph<'static> {
    Paragraph::new(viewer.lines()).scroll((viewer.scroll() as u16, 0))
}

fn render_status(f: &mut Frame, model: &dyn SubModel, area: Rect) {
    if let Some(status) = &model.panes().status {
        let line = Line::styled(
            format!(" {}", status.text.replace('\n', " ")),
            tui_style::status_style(status.is_error),
        );
        f.render_widget(Paragraph::new(line), area);
    }
}

fn render_viewer(f: &mut Frame, model: &dyn SubModel, area: Rect, active: bool) {
    match model.viewer_content() {
        ViewerContent::Table(view) => render_table(f, screen_name(model), &view, area, active),
        ViewerContent::Text { title, viewer } => {
            f.render_widget(text_paragraph(viewer).block(pane_block(title, active)), area);
        }
    }
}

fn render_table(f: &mut Frame, name: &str, view: &TableView, area: Rect, active: bool) {
    let (page, pages) = view.page;
    let mut block = pane_block(format!("{name} ({page}/{pages})"), active);
    if view.unsaved {
        block = block.title_bottom(Line::styled(UNSAVED_BANNER, tui_style::PENDING));
    }

    let header = Row::new(view.columns.iter().copied()).style(tui_style::TITLE);
    let rows = view.rows.iter().enumerate().map(|(i, cells)| {
        let row = Row::new(cells.iter().map(|c| c.replace('\n', " ")));
        if view.selected == Some(i) {
            row.style(if active {
                tui_style::SELECTED
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            })
        } else {
            row
        }
    });
    let columns = view.columns.len().max(1) as u32;
    let widths = vec![Constraint::Ratio(1, columns); view.columns.len()];
    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

// ---------------------------------------------------------------------------
// Key hints
// ---------------------------------------------------------------------------

fn render_keyhints(f: &mut Frame, area: Rect, hints: &[(&'static str, &'static str)]) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", tui_style::DIM));
        }
        spans.push(Span::styled(
            *key,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {desc}"), tui_style::DIM));
    }
    let bar = Paragraph::new(Line::from(spans)).style(tui_style::STATUS_BAR);
    f.render_widget(bar, area);
}

pub(crate) fn context_hints<A: ResourceApi>(app: &App<A>) -> Vec<(&'static str, &'static str)> {
    let Screen::Resource(_) = app.screen else {
        return vec![("j/k", "move"), ("enter", "open"), ("q", "quit")];
    };
    let Some(model) = app.current_model() else {
        return Vec::new();
    };
    let mut hints = if model.panes().in_dynamic_editor() {
        vec![("enter", "save"), ("esc", "cancel")]
    } else {
        vec![
            ("tab", "next pane"),
            ("!@#$", "jump"),
            ("b", "back"),
            ("q", "quit"),
        ]
    };
    hints.extend(model.hints());
    hints
}
