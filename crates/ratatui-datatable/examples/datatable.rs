use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui_datatable::config::TableSpec;
use ratatui_datatable::crossterm_input::input_event_from_crossterm;
use ratatui_datatable::filter::FilterMode;
use ratatui_datatable::table::DataTable;
use ratatui_datatable::table::ExportScope;
use ratatui_datatable::table::TableAction;
use ratatui_datatable::theme::Theme;
use serde_json::Value;
use serde_json::json;
use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const TABLE_JSON: &str = r#"{
    "columns": [
        { "accessorKey": "id", "header": "ID", "type": "number", "size": 5, "filterable": false },
        { "accessorKey": "item", "header": "Item", "size": 16 },
        { "accessorKey": "qty", "header": "Qty", "type": "number", "size": 6 },
        { "accessorKey": "status", "header": "Status", "type": "category", "size": 10,
          "filterOptions": ["Received", "Pending", "Rejected"] },
        { "accessorKey": "receivedAt", "header": "Received", "type": "date", "size": 11 },
        { "accessorKey": "notes", "header": "Notes" }
    ],
    "features": {
        "enableRowSelection": true,
        "enableAddItem": true,
        "enableRowActions": true,
        "customButtons": [
            { "label": "Reload", "hotkey": "R", "variant": "outline" },
            { "label": "Purge", "hotkey": "X", "variant": "destructive" }
        ]
    },
    "defaultSorting": [{ "id": "receivedAt", "desc": true }]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let spec = TableSpec::from_json(TABLE_JSON)?;
    let mut table = DataTable::from_spec(spec);
    table.set_rows(sample_rows());

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let theme = Theme::default();

    let res = run(&mut terminal, &theme, &mut table);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(res?)
}

/// Logs go to the file named by `DATATABLE_LOG`; stderr belongs to the terminal UI.
fn init_tracing() -> io::Result<()> {
    let Ok(path) = std::env::var("DATATABLE_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ratatui_datatable_core=trace"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    table: &mut DataTable,
) -> io::Result<()> {
    let mut status = String::from("ready");
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let inner = if table.is_full_screen() {
                area
            } else {
                let block = Block::default()
                    .title(
                        "DataTable (j/k rows, [/] columns, s sort, / search, f filters, F2 inline, \
                         c columns, E export, F fullscreen, Enter expand, q quit)",
                    )
                    .borders(Borders::ALL);
                let inner = block.inner(area);
                f.render_widget(block, area);
                inner
            };

            let buf = f.buffer_mut();
            let table_area = Rect::new(
                inner.x,
                inner.y,
                inner.width,
                inner.height.saturating_sub(1),
            );
            let status_area = Rect::new(inner.x, inner.y + table_area.height, inner.width, 1);
            table.render(table_area, buf, theme);

            let span = Span::styled(status.clone(), theme.text_muted);
            buf.set_span(status_area.x, status_area.y, &span, status_area.width);
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let event = crossterm::event::read()?;
        if let Event::Key(key) = &event {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let idle =
                !table.is_searching() && !table.filters.is_open() && !table.is_menu_open();
            if idle && key.code == KeyCode::Char('q') {
                return Ok(());
            }
            if key.code == KeyCode::F(2) {
                if table.filters.mode() == FilterMode::Inline {
                    table.filters.close();
                } else {
                    table.filters.open_inline();
                }
                continue;
            }
        }

        let Some(ev) = input_event_from_crossterm(event) else {
            continue;
        };
        match table.handle_event(ev) {
            TableAction::None | TableAction::Redraw => {}
            TableAction::CustomButtonPressed(i) => {
                let label = table
                    .config()
                    .custom_buttons
                    .get(i)
                    .map(|b| b.label.clone())
                    .unwrap_or_default();
                status = format!("pressed {label}");
                if label == "Reload" {
                    table.set_rows(sample_rows());
                }
            }
            TableAction::ExportRequested { scope, format } => {
                let rows = table.export_rows(scope).len();
                let what = if scope == ExportScope::All { "all" } else { "page" };
                status = format!("export {what} as {format:?}: {rows} rows");
            }
            TableAction::AddItemRequested => {
                let mut rows = table.rows().to_vec();
                let next = rows.len();
                rows.push(sample_row(next));
                table.set_rows(rows);
                status = format!("added row {}", next + 1);
            }
            TableAction::RowActionsRequested { row } => {
                status = format!("actions for row {}", row + 1);
            }
            TableAction::RowToggled { row, expanded } => {
                status = format!("row {row} expanded={expanded}");
            }
            action => {
                status = format!(
                    "{action:?}  ({} of {} rows)",
                    table.filtered_rows().len(),
                    table.rows().len()
                );
            }
        }
    }
}

fn sample_row(i: usize) -> Value {
    const ITEMS: [&str; 8] = [
        "Hex bolts M8",
        "Wall anchors",
        "Pipe clamps",
        "Cordless drill",
        "Safety gloves",
        "Cable ties",
        "Wood screws",
        "Steel brackets",
    ];
    const STATUS: [&str; 3] = ["Received", "Pending", "Rejected"];
    const NOTES: [&str; 4] = [
        "",
        "Checked on arrival",
        "Partial delivery, remainder expected with the next shipment from the north depot",
        "Supplier flagged a packaging defect; inspect every carton before shelving and report damage",
    ];

    json!({
        "id": i + 1,
        "item": ITEMS[i % ITEMS.len()],
        "qty": (i * 37) % 500,
        "status": STATUS[(i / 3) % STATUS.len()],
        "receivedAt": format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1),
        "notes": NOTES[i % NOTES.len()],
    })
}

fn sample_rows() -> Vec<Value> {
    (0..137).map(sample_row).collect()
}
