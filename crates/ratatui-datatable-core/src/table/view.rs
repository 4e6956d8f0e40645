use crate::config::ButtonVariant;
use crate::config::ColumnConfig;
use crate::config::SortSpec;
use crate::config::TableConfig;
use crate::config::TableSpec;
use crate::filter::FilterMode;
use crate::filter::FilterPopover;
use crate::filter::FilterPopoverAction;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::keymap;
use crate::pager::PagerAction;
use crate::pager::PagerBar;
use crate::pager::PagerBarOptions;
use crate::pager::PaginationState;
use crate::render;
use crate::table::menu;
use crate::table::menu::ExportFormat;
use crate::table::menu::ExportScope;
use crate::table::menu::Menu;
use crate::table::menu::MenuEntry;
use crate::table::menu::MenuKind;
use crate::table::model;
use crate::table::model::RowQuery;
use crate::text::ExpandableText;
use crate::text::ExpandableTextOptions;
use crate::theme::Theme;
use crate::theme::or_theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableAction {
    None,
    Redraw,
    SearchChanged,
    FiltersChanged,
    SortChanged,
    /// The 0-based page index changed.
    PageChanged(usize),
    PageSizeChanged(usize),
    /// Column visibility or pinning changed.
    ColumnsChanged,
    /// A row was expanded or collapsed; `row` indexes the rows passed to
    /// [`DataTable::set_rows`].
    RowToggled { row: usize, expanded: bool },
    SelectionChanged,
    /// An export entry was chosen. [`DataTable::export_rows`] lists the rows it covers.
    ExportRequested {
        scope: ExportScope,
        format: ExportFormat,
    },
    AddItemRequested,
    /// Full screen was switched on (`true`) or off. The host decides what area to give the table.
    FullScreenToggled(bool),
    /// The row action marker of this row (an index into [`DataTable::set_rows`]) was activated.
    RowActionsRequested { row: usize },
    /// The custom toolbar button at this index was activated.
    CustomButtonPressed(usize),
    CaptureAcquired,
    CaptureReleased,
}

#[derive(Clone, Debug)]
pub struct DataTableBindings {
    pub up: Vec<KeyEvent>,
    pub down: Vec<KeyEvent>,
    pub toggle_row: Vec<KeyEvent>,
    pub select_row: Vec<KeyEvent>,
    pub sort: Vec<KeyEvent>,
    pub prev_column: Vec<KeyEvent>,
    pub next_column: Vec<KeyEvent>,
    pub hide_column: Vec<KeyEvent>,
    pub show_all_columns: Vec<KeyEvent>,
    pub pin_column: Vec<KeyEvent>,
    pub move_column_left: Vec<KeyEvent>,
    pub move_column_right: Vec<KeyEvent>,
    pub columns_menu: Vec<KeyEvent>,
    pub search: Vec<KeyEvent>,
    pub filters: Vec<KeyEvent>,
    pub density: Vec<KeyEvent>,
    pub export: Vec<KeyEvent>,
    pub add_item: Vec<KeyEvent>,
    pub full_screen: Vec<KeyEvent>,
    pub row_actions: Vec<KeyEvent>,
    /// Closes an open toolbar menu.
    pub close_menu: Vec<KeyEvent>,
}

impl Default for DataTableBindings {
    fn default() -> Self {
        Self {
            up: vec![keymap::key(KeyCode::Up), keymap::key_char('k')],
            down: vec![keymap::key(KeyCode::Down), keymap::key_char('j')],
            toggle_row: vec![keymap::key(KeyCode::Enter)],
            select_row: vec![keymap::key_char(' ')],
            sort: vec![keymap::key_char('s')],
            prev_column: vec![keymap::key_char('[')],
            next_column: vec![keymap::key_char(']')],
            hide_column: vec![keymap::key_char('v')],
            show_all_columns: vec![keymap::key_char('V')],
            pin_column: vec![keymap::key_char('p')],
            move_column_left: vec![keymap::key_char('<')],
            move_column_right: vec![keymap::key_char('>')],
            columns_menu: vec![keymap::key_char('c')],
            search: vec![keymap::key_char('/')],
            filters: vec![keymap::key_char('f')],
            density: vec![keymap::key_char('d')],
            export: vec![keymap::key_char('E')],
            add_item: vec![keymap::key_char('+')],
            full_screen: vec![keymap::key_char('F')],
            row_actions: vec![keymap::key_char('a')],
            close_menu: vec![keymap::key(KeyCode::Esc)],
        }
    }
}

/// Options for [`DataTable`].
#[derive(Clone, Debug)]
pub struct DataTableOptions {
    pub cell: ExpandableTextOptions,
    pub col_gap: u16,
    pub min_col_width: u16,
    /// Width of the inline filter panel.
    pub filter_panel_width: u16,
    pub empty_message: String,
    pub search_placeholder: String,
    pub style: Style,
    pub header_style: Style,
    pub focused_header_style: Style,
    pub cursor_style: Style,
    pub selected_style: Style,
}

impl Default for DataTableOptions {
    fn default() -> Self {
        Self {
            cell: ExpandableTextOptions::default(),
            col_gap: 1,
            min_col_width: 6,
            filter_panel_width: 38,
            empty_message: "No results.".to_string(),
            search_placeholder: "Search...".to_string(),
            style: Style::default(),
            header_style: Style::default().add_modifier(Modifier::BOLD),
            focused_header_style: Style::default().add_modifier(Modifier::UNDERLINED),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            selected_style: Style::default().add_modifier(Modifier::BOLD),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Search,
    Filters,
    Columns,
    Density,
    Export,
    AddItem,
    FullScreen,
    Custom(usize),
    Header(usize),
    SelectPage,
    Select(usize),
    Toggle(usize),
    RowActions(usize),
    Row(usize),
}

#[derive(Clone, Copy, Debug)]
struct HitRegion {
    x: u16,
    y: u16,
    width: u16,
    target: Target,
}

const SELECT_COL_WIDTH: u16 = 4;
const ROW_ACTIONS_WIDTH: u16 = 2;
const PIN_LABEL_WIDTH: usize = 7;

/// A paginated, searchable, filterable table over JSON rows.
///
/// Rows flow through search, then column filters, then sorting, then pagination. Only the
/// current page is laid out. Each cell is an [`ExpandableText`], so long values are truncated
/// until their row is expanded.
///
/// While search entry is active typed characters edit the search term; Enter keeps it and Esc
/// clears it. Otherwise an open toolbar menu receives keys first, then the filter panel.
#[derive(Clone, Debug)]
pub struct DataTable {
    pub filters: FilterPopover,
    pub pager: PagerBar,
    columns: Vec<ColumnConfig>,
    rows: Vec<Value>,
    config: TableConfig,
    options: DataTableOptions,
    bindings: DataTableBindings,
    search: String,
    searching: bool,
    sort: Option<SortSpec>,
    view: Vec<usize>,
    cursor: usize,
    row_offset: usize,
    focus_col: usize,
    expanded: BTreeSet<usize>,
    selected: BTreeSet<usize>,
    compact: bool,
    full_screen: bool,
    menu: Option<Menu>,
    toolbar: Rect,
    hits: Vec<HitRegion>,
}

impl DataTable {
    pub fn new(columns: Vec<ColumnConfig>, config: TableConfig) -> Self {
        Self::with_options(columns, config, DataTableOptions::default())
    }

    pub fn with_options(
        columns: Vec<ColumnConfig>,
        config: TableConfig,
        options: DataTableOptions,
    ) -> Self {
        let mut pager = PagerBar::with_options(PagerBarOptions {
            page_size_options: config.page_size_options.clone(),
            ..PagerBarOptions::default()
        });
        pager.state = PaginationState::new(config.default_page_size);
        let mut filters = FilterPopover::new();
        filters.panel.set_columns(&columns);

        let mut table = Self {
            filters,
            pager,
            columns,
            rows: Vec::new(),
            config,
            options,
            bindings: DataTableBindings::default(),
            search: String::new(),
            searching: false,
            sort: None,
            view: Vec::new(),
            cursor: 0,
            row_offset: 0,
            focus_col: 0,
            expanded: BTreeSet::new(),
            selected: BTreeSet::new(),
            compact: false,
            full_screen: false,
            menu: None,
            toolbar: Rect::default(),
            hits: Vec::new(),
        };
        table.refresh();
        table
    }

    /// Builds a table from a parsed [`TableSpec`]; the first default sort entry becomes the
    /// initial sort.
    pub fn from_spec(spec: TableSpec) -> Self {
        let TableSpec {
            columns,
            features,
            default_sorting,
        } = spec;
        let mut table = Self::new(columns, features);
        table.sort = default_sorting.into_iter().next();
        table.refresh();
        table
    }

    pub fn set_bindings(&mut self, bindings: DataTableBindings) {
        self.bindings = bindings;
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn options(&self) -> &DataTableOptions {
        &self.options
    }

    /// Replaces the data. Expansion and selection are cleared; the page is kept when possible.
    pub fn set_rows(&mut self, rows: Vec<Value>) {
        self.rows = rows;
        self.expanded.clear();
        self.selected.clear();
        self.refresh();
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    /// Indices of the rows that pass search and filters, in display order, across all pages.
    pub fn filtered_rows(&self) -> &[usize] {
        &self.view
    }

    /// Indices of the rows on the current page.
    pub fn page_rows(&self) -> &[usize] {
        if !self.config.enable_pagination {
            return &self.view;
        }
        let range = self.pager.state.page_range();
        self.view.get(range).unwrap_or(&[])
    }

    /// Rows an export of `scope` covers, in display order.
    pub fn export_rows(&self, scope: ExportScope) -> &[usize] {
        match scope {
            ExportScope::All => &self.view,
            ExportScope::Page => self.page_rows(),
        }
    }

    /// Visible columns, pinned ones first. Relative order is otherwise preserved.
    pub fn display_columns(&self) -> Vec<&ColumnConfig> {
        let visible = self.columns.iter().filter(|c| !c.hidden);
        let (pinned, rest): (Vec<_>, Vec<_>) = visible.partition(|c| c.pinned);
        pinned.into_iter().chain(rest).collect()
    }

    pub fn focused_column(&self) -> Option<&ColumnConfig> {
        self.display_columns().get(self.focus_col).copied()
    }

    /// Source index of the row under the cursor.
    pub fn cursor_row(&self) -> Option<usize> {
        self.page_rows().get(self.cursor).copied()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Sets the global search term and returns to the first page. Returns `true` on change.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search {
            return false;
        }
        self.search = term;
        self.reset_to_first_page();
        true
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.refresh();
    }

    /// Cycles the sort on `key`: ascending, descending, unsorted. Sorting a different column
    /// starts at ascending. Returns `false` if the column cannot be sorted.
    pub fn toggle_sort(&mut self, key: &str) -> bool {
        let sortable = self.config.enable_sorting
            && self
                .columns
                .iter()
                .any(|c| c.accessor_key == key && c.sortable);
        if !sortable {
            return false;
        }
        self.sort = match self.sort.take() {
            Some(s) if s.id == key && !s.desc => Some(SortSpec {
                id: s.id,
                desc: true,
            }),
            Some(s) if s.id == key => None,
            _ => Some(SortSpec {
                id: key.to_string(),
                desc: false,
            }),
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(column = key, sort = ?self.sort, "table sort changed");
        self.refresh();
        true
    }

    /// Hides or shows a column. The last visible column cannot be hidden.
    pub fn set_column_hidden(&mut self, key: &str, hidden: bool) -> bool {
        let visible = self.columns.iter().filter(|c| !c.hidden).count();
        let Some(column) = self.columns.iter_mut().find(|c| c.accessor_key == key) else {
            return false;
        };
        if column.hidden == hidden || (hidden && visible <= 1) {
            return false;
        }
        column.hidden = hidden;
        self.clamp_focus();
        self.refresh();
        true
    }

    pub fn show_all_columns(&mut self) -> bool {
        let mut changed = false;
        for c in self.columns.iter_mut().filter(|c| c.hidden) {
            c.hidden = false;
            changed = true;
        }
        if changed {
            self.refresh();
        }
        changed
    }

    pub fn hidden_count(&self) -> usize {
        self.columns.iter().filter(|c| c.hidden).count()
    }

    pub fn toggle_pinned(&mut self, key: &str) -> bool {
        if !self.config.enable_column_pinning {
            return false;
        }
        let Some(column) = self.columns.iter_mut().find(|c| c.accessor_key == key) else {
            return false;
        };
        column.pinned = !column.pinned;
        // Keep the focus on the column that moved.
        let key = column.accessor_key.clone();
        if let Some(pos) = self
            .display_columns()
            .iter()
            .position(|c| c.accessor_key == key)
        {
            self.focus_col = pos;
        }
        true
    }

    /// Moves a column one place left (`delta < 0`) or right among the displayed columns.
    /// Columns never cross the boundary between pinned and unpinned ones.
    pub fn move_column(&mut self, key: &str, delta: i32) -> bool {
        if !self.config.enable_column_ordering || delta == 0 {
            return false;
        }
        let order: Vec<String> = self
            .display_columns()
            .iter()
            .map(|c| c.accessor_key.clone())
            .collect();
        let Some(pos) = order.iter().position(|k| k == key) else {
            return false;
        };
        let Some(next) = pos.checked_add_signed(delta.signum() as isize) else {
            return false;
        };
        let Some(other) = order.get(next) else {
            return false;
        };
        let index_of = |k: &str| self.columns.iter().position(|c| c.accessor_key == k);
        let (Some(a), Some(b)) = (index_of(key), index_of(other)) else {
            return false;
        };
        if self.columns[a].pinned != self.columns[b].pinned {
            return false;
        }
        // Hidden columns between the two keep their place.
        self.columns.swap(a, b);
        self.focus_col = next;
        true
    }

    pub fn is_expanded(&self, row: usize) -> bool {
        self.expanded.contains(&row)
    }

    pub fn toggle_expanded(&mut self, row: usize) -> TableAction {
        if row >= self.rows.len() {
            return TableAction::None;
        }
        let expanded = if self.expanded.remove(&row) {
            false
        } else {
            self.expanded.insert(row);
            true
        };
        TableAction::RowToggled { row, expanded }
    }

    pub fn selected_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn toggle_selected(&mut self, row: usize) -> TableAction {
        if !self.config.enable_row_selection || row >= self.rows.len() {
            return TableAction::None;
        }
        if !self.selected.remove(&row) {
            self.selected.insert(row);
        }
        TableAction::SelectionChanged
    }

    /// Selects every row on the page, or clears them if all are already selected.
    pub fn toggle_page_selected(&mut self) -> TableAction {
        if !self.config.enable_row_selection {
            return TableAction::None;
        }
        let page: Vec<usize> = self.page_rows().to_vec();
        if page.is_empty() {
            return TableAction::None;
        }
        if page.iter().all(|r| self.selected.contains(r)) {
            for r in &page {
                self.selected.remove(r);
            }
        } else {
            self.selected.extend(page);
        }
        TableAction::SelectionChanged
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    pub fn toggle_full_screen(&mut self) -> TableAction {
        if !self.config.enable_full_screen {
            return TableAction::None;
        }
        self.full_screen = !self.full_screen;
        TableAction::FullScreenToggled(self.full_screen)
    }

    /// Whether the export or column menu is open.
    pub fn is_menu_open(&self) -> bool {
        self.menu.is_some()
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn toggle_density(&mut self) -> bool {
        if !self.config.enable_density_toggle {
            return false;
        }
        self.compact = !self.compact;
        true
    }

    /// Whether a mouse event belongs to the table's own overlays (the floating filter panel).
    /// Hosts that layer other widgets on top use this to route events.
    pub fn wants_mouse(&self, event: &InputEvent) -> bool {
        self.filters.wants_mouse(event)
    }

    pub fn handle_event(&mut self, event: InputEvent) -> TableAction {
        if self.filters.wants_mouse(&event) {
            let action = self.filters.handle_event(event);
            return self.map_filter_action(action);
        }
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(text) => {
                if self.filters.is_open() {
                    let action = self.filters.handle_event(InputEvent::Paste(text));
                    self.map_filter_action(action)
                } else if self.searching {
                    let term = format!("{}{}", self.search, text);
                    self.search_changed(term)
                } else {
                    TableAction::None
                }
            }
            InputEvent::Mouse(m) => self.handle_mouse(m),
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.hits.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = or_theme(self.options.style, theme.text_primary);
        buf.set_style(area, base);

        let mut table_area = area;
        if self.filters.mode() == FilterMode::Inline && area.width > self.options.filter_panel_width + 10 {
            let panel_w = self.options.filter_panel_width;
            table_area.width -= panel_w + 1;
            let sep_x = table_area.right();
            for y in area.top()..area.bottom() {
                buf.set_string(sep_x, y, "│", theme.border);
            }
            let panel_area = Rect::new(sep_x + 1, area.y, panel_w, area.height);
            self.filters.render(panel_area, buf, theme);
        }

        self.render_toolbar(Rect::new(table_area.x, table_area.y, table_area.width, 1), buf, theme);
        if table_area.height < 2 {
            return;
        }

        let footer_h = if table_area.height >= 4 { 1 } else { 0 };
        let grid = Rect::new(
            table_area.x,
            table_area.y + 1,
            table_area.width,
            table_area.height - 1 - footer_h,
        );
        self.render_grid(grid, buf, theme);

        if footer_h > 0 {
            let footer = Rect::new(table_area.x, table_area.bottom() - 1, table_area.width, 1);
            if self.config.enable_pagination {
                self.pager.render(footer, buf, theme);
            } else {
                let text = format!("{} rows", self.view.len());
                render::render_str_clipped(footer.x, footer.y, 0, footer.width, buf, &text, theme.text_muted);
            }
        }

        self.render_menu(area, buf, theme);
        if self.filters.mode() == FilterMode::Floating {
            self.filters.render(area, buf, theme);
        }
    }

    fn render_toolbar(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.toolbar = area;
        let base = or_theme(self.options.style, theme.text_primary);
        let mut items: Vec<(String, Style, Option<Target>)> = Vec::new();

        if self.config.enable_search {
            let (text, style) = if self.searching {
                (format!("/ {}▏", self.search), theme.accent)
            } else if self.search.is_empty() {
                (format!("/ {}", self.options.search_placeholder), theme.text_muted)
            } else {
                (format!("/ {}", self.search), base)
            };
            items.push((text, style, Some(Target::Search)));
        }
        if self.config.enable_filters {
            let style = if self.filters.panel.active_count() > 0 {
                theme.accent
            } else {
                base
            };
            items.push((format!("[{}]", self.filters.trigger_label()), style, Some(Target::Filters)));
        }
        for (i, button) in self.config.custom_buttons.iter().enumerate() {
            let label = match button.hotkey {
                Some(k) => format!("[{} ({k})]", button.label),
                None => format!("[{}]", button.label),
            };
            let style = match button.variant {
                ButtonVariant::Destructive => theme.danger,
                ButtonVariant::Ghost | ButtonVariant::Link => theme.text_muted,
                ButtonVariant::Secondary => theme.badge,
                ButtonVariant::Default | ButtonVariant::Outline => base,
            };
            items.push((label, style, Some(Target::Custom(i))));
        }
        if self.config.enable_add_item {
            items.push(("[+ Add Item]".to_string(), base, Some(Target::AddItem)));
        }
        if self.config.enable_export {
            items.push(("[Export]".to_string(), base, Some(Target::Export)));
        }
        if self.config.enable_column_visibility || self.config.enable_hiding {
            let label = match self.hidden_count() {
                0 => "[Columns]".to_string(),
                n => format!("[Columns ({n} hidden)]"),
            };
            items.push((label, base, Some(Target::Columns)));
        }
        if self.config.enable_density_toggle {
            let label = if self.compact { "[Compact]" } else { "[Comfortable]" };
            items.push((label.to_string(), base, Some(Target::Density)));
        }
        if self.config.enable_full_screen {
            let label = if self.full_screen {
                "[Exit Fullscreen]"
            } else {
                "[Fullscreen]"
            };
            items.push((label.to_string(), base, Some(Target::FullScreen)));
        }
        if self.config.enable_row_selection && !self.selected.is_empty() {
            items.push((format!("{} selected", self.selected.len()), theme.text_muted, None));
        }

        let mut x = area.x;
        for (text, style, target) in items {
            let w = render::display_width(&text) as u16;
            if x + w > area.right() {
                break;
            }
            render::render_str_clipped(x, area.y, 0, w, buf, &text, style);
            if let Some(target) = target {
                self.hits.push(HitRegion {
                    x,
                    y: area.y,
                    width: w,
                    target,
                });
            }
            x += w + 2;
        }
    }

    fn render_grid(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.height == 0 {
            return;
        }
        let base = or_theme(self.options.style, theme.text_primary);
        let cursor_style = self.options.cursor_style.patch(theme.accent);
        let selected_style = or_theme(self.options.selected_style, theme.accent);
        let gap = self.options.col_gap;

        let select_w = if self.config.enable_row_selection {
            SELECT_COL_WIDTH
        } else {
            0
        };
        let actions_w = if self.config.enable_row_actions {
            ROW_ACTIONS_WIDTH
        } else {
            0
        };
        let columns: Vec<ColumnConfig> = self.display_columns().into_iter().cloned().collect();
        let sizes: Vec<Option<u16>> = columns.iter().map(|c| c.size).collect();
        let widths = layout_columns(
            &sizes,
            area.width.saturating_sub(select_w + actions_w),
            gap,
            self.options.min_col_width,
        );
        let mut xs = Vec::with_capacity(columns.len());
        let mut x = area.x + select_w;
        for w in &widths {
            xs.push(x);
            x = x.saturating_add(w + gap);
        }
        let cells_right = area.right().saturating_sub(actions_w);

        let page: Vec<usize> = self.page_rows().to_vec();
        let cell_options = self.cell_options();
        let heights: Vec<u16> = page
            .iter()
            .map(|&row| {
                columns
                    .iter()
                    .zip(&widths)
                    .map(|(c, &w)| self.cell(row, c, &cell_options).height(w))
                    .max()
                    .unwrap_or(1)
            })
            .collect();
        if !heights.is_empty() {
            self.scroll_to_cursor(&heights, area.height.saturating_sub(1));
        }

        // Without a sticky header the header row scrolls away with the first rows.
        let show_header = self.config.enable_sticky || self.row_offset == 0;
        let body = if show_header {
            self.render_header(area, buf, &columns, &widths, &xs, theme);
            Rect::new(area.x, area.y + 1, area.width, area.height.saturating_sub(1))
        } else {
            area
        };

        let pinned_edge = columns
            .iter()
            .rposition(|c| c.pinned)
            .filter(|i| i + 1 < columns.len())
            .map(|i| xs[i] + widths[i]);
        if let Some(edge) = pinned_edge {
            if edge < cells_right {
                for yy in area.top()..area.bottom() {
                    buf.set_string(edge, yy, "│", theme.border);
                }
            }
        }
        if body.height == 0 {
            return;
        }

        if page.is_empty() {
            render::render_str_clipped(
                body.x,
                body.y,
                0,
                body.width,
                buf,
                &self.options.empty_message,
                theme.text_muted,
            );
            return;
        }

        let mut y = body.y;
        for (pos, &row) in page.iter().enumerate().skip(self.row_offset) {
            if y >= body.bottom() {
                break;
            }
            let h = heights[pos].min(body.bottom() - y);
            let row_rect = Rect::new(body.x, y, body.width, h);

            if self.config.enable_row_selection {
                let mark = if self.selected.contains(&row) { "[x]" } else { "[ ]" };
                buf.set_string(body.x, y, mark, base);
                self.push_hit(body.x, y, 3, Target::Select(pos));
            }
            for (i, column) in columns.iter().enumerate() {
                if xs[i] >= cells_right {
                    break;
                }
                let w = widths[i].min(cells_right - xs[i]);
                let mut cell = self.cell(row, column, &cell_options);
                cell.render(Rect::new(xs[i], y, w, h), buf, theme);
                if cell.is_truncatable() && w >= 2 {
                    self.push_hit(xs[i] + w - 1, y, 1, Target::Toggle(row));
                }
            }
            if actions_w > 0 && body.width > actions_w {
                let ax = body.right() - 1;
                buf.set_string(ax, y, "⋯", theme.text_muted);
                self.push_hit(ax, y, 1, Target::RowActions(row));
            }
            self.push_hit(row_rect.x, row_rect.y, row_rect.width, Target::Row(pos));

            if self.selected.contains(&row) {
                buf.set_style(row_rect, selected_style);
            }
            if pos == self.cursor {
                buf.set_style(row_rect, cursor_style);
            }
            y += h;
        }
    }

    fn render_header(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        columns: &[ColumnConfig],
        widths: &[u16],
        xs: &[u16],
        theme: &Theme,
    ) {
        let header_style = self.options.header_style.patch(theme.accent);
        let y = area.y;
        if self.config.enable_row_selection {
            let page = self.page_rows();
            let all = !page.is_empty() && page.iter().all(|r| self.selected.contains(r));
            let mark = if all { "[x]" } else { "[ ]" };
            buf.set_string(area.x, y, mark, header_style);
            self.push_hit(area.x, y, 3, Target::SelectPage);
        }
        for (i, column) in columns.iter().enumerate() {
            let mut label = column.header.clone();
            if let Some(sort) = self.sort.as_ref().filter(|s| s.id == column.accessor_key) {
                label.push_str(if sort.desc { " ▼" } else { " ▲" });
            }
            let mut style = header_style;
            if i == self.focus_col {
                style = style.patch(self.options.focused_header_style);
            }
            let text = render::fit_with_ellipsis(&label, widths[i]);
            let clip = area.right().saturating_sub(xs[i]).min(widths[i]);
            render::render_str_clipped(xs[i], y, 0, clip, buf, &text, style);
            self.push_hit(xs[i], y, clip, Target::Header(i));
        }
    }

    fn render_menu(&mut self, screen: Rect, buf: &mut Buffer, theme: &Theme) {
        let Some(mut menu) = self.menu.take() else {
            return;
        };
        let entries = self.menu_entries(menu.kind, theme);
        let cursor_style = self.options.cursor_style.patch(theme.accent);
        menu.render(screen, buf, &entries, theme.border_active, cursor_style);
        self.menu = Some(menu);
    }

    fn menu_entries(&self, kind: MenuKind, theme: &Theme) -> Vec<MenuEntry> {
        let base = or_theme(self.options.style, theme.text_primary);
        match kind {
            MenuKind::Export => menu::EXPORT_CHOICES
                .iter()
                .map(|&(scope, format)| MenuEntry {
                    text: menu::export_label(scope, format).to_string(),
                    style: base,
                })
                .collect(),
            MenuKind::Columns => {
                let header_w = self
                    .columns
                    .iter()
                    .map(|c| render::display_width(&c.header))
                    .max()
                    .unwrap_or(0);
                self.columns
                    .iter()
                    .map(|c| {
                        let check = if c.hidden { "[ ]" } else { "[x]" };
                        let pad = " ".repeat(header_w - render::display_width(&c.header));
                        let mut text = format!("{check} {}{pad}", c.header);
                        if self.config.enable_column_pinning {
                            let pin = if c.pinned { "[unpin]" } else { "[pin]" };
                            text.push_str(&format!("  {pin:>PIN_LABEL_WIDTH$}"));
                        }
                        let style = if c.hidden { theme.text_muted } else { base };
                        MenuEntry { text, style }
                    })
                    .collect()
            }
        }
    }

    fn cell_options(&self) -> ExpandableTextOptions {
        let mut options = self.options.cell.clone();
        if self.compact {
            options.collapsed_lines = 1;
        }
        options
    }

    fn cell(&self, row: usize, column: &ColumnConfig, options: &ExpandableTextOptions) -> ExpandableText {
        let text = self
            .rows
            .get(row)
            .map(|r| model::cell_text(r, &column.accessor_key).into_owned())
            .unwrap_or_default();
        let mut cell = ExpandableText::with_options(text, options.clone());
        cell.set_search_term(self.search.trim());
        cell.set_expanded(self.expanded.contains(&row));
        cell
    }

    fn scroll_to_cursor(&mut self, heights: &[u16], body_h: u16) {
        self.cursor = self.cursor.min(heights.len().saturating_sub(1));
        if self.cursor < self.row_offset {
            self.row_offset = self.cursor;
        }
        let fits = |from: usize, to: usize| {
            heights[from..=to].iter().map(|&h| h as u32).sum::<u32>() <= body_h as u32
        };
        while self.row_offset < self.cursor && !fits(self.row_offset, self.cursor) {
            self.row_offset += 1;
        }
    }

    fn push_hit(&mut self, x: u16, y: u16, width: u16, target: Target) {
        if width > 0 {
            self.hits.push(HitRegion { x, y, width, target });
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> TableAction {
        if self.searching {
            return self.handle_search_key(key);
        }
        if self.menu.is_some() {
            return self.handle_menu_key(key);
        }
        if self.filters.is_open() {
            let action = self.filters.handle_event(InputEvent::Key(key));
            return self.map_filter_action(action);
        }
        if let Some(c) = key.plain_char() {
            if let Some(i) = self
                .config
                .custom_buttons
                .iter()
                .position(|b| b.hotkey == Some(c))
            {
                return self.custom_button(i);
            }
        }

        let b = &self.bindings;
        if keymap::any_matches(&b.up, &key) {
            return self.move_cursor(-1);
        }
        if keymap::any_matches(&b.down, &key) {
            return self.move_cursor(1);
        }
        if keymap::any_matches(&b.toggle_row, &key) {
            return match self.cursor_row() {
                Some(row) => self.toggle_expanded(row),
                None => TableAction::None,
            };
        }
        if keymap::any_matches(&b.select_row, &key) {
            return match self.cursor_row() {
                Some(row) => self.toggle_selected(row),
                None => TableAction::None,
            };
        }
        if keymap::any_matches(&b.sort, &key) {
            return self.sort_focused();
        }
        if keymap::any_matches(&b.prev_column, &key) {
            return self.move_focus(-1);
        }
        if keymap::any_matches(&b.next_column, &key) {
            return self.move_focus(1);
        }
        if keymap::any_matches(&b.hide_column, &key) {
            return self.hide_focused();
        }
        if keymap::any_matches(&b.show_all_columns, &key) {
            return self.show_all_action();
        }
        if keymap::any_matches(&b.pin_column, &key) {
            return self.pin_focused();
        }
        if keymap::any_matches(&b.move_column_left, &key) {
            return self.move_focused_column(-1);
        }
        if keymap::any_matches(&b.move_column_right, &key) {
            return self.move_focused_column(1);
        }
        if keymap::any_matches(&b.columns_menu, &key) {
            return self.open_menu(MenuKind::Columns);
        }
        if keymap::any_matches(&b.search, &key) {
            return self.start_search();
        }
        if keymap::any_matches(&b.filters, &key) {
            return self.open_filters();
        }
        if keymap::any_matches(&b.density, &key) {
            return if self.toggle_density() {
                TableAction::Redraw
            } else {
                TableAction::None
            };
        }
        if keymap::any_matches(&b.export, &key) {
            return self.open_menu(MenuKind::Export);
        }
        if keymap::any_matches(&b.add_item, &key) {
            return self.add_item();
        }
        if keymap::any_matches(&b.full_screen, &key) {
            return self.toggle_full_screen();
        }
        if keymap::any_matches(&b.row_actions, &key) {
            return match self.cursor_row() {
                Some(row) => self.row_actions(row),
                None => TableAction::None,
            };
        }
        if self.config.enable_pagination {
            let action = self.pager.handle_event(InputEvent::Key(key));
            return self.map_pager_action(action);
        }
        TableAction::None
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> TableAction {
        match key.code {
            KeyCode::Enter => {
                self.searching = false;
                TableAction::Redraw
            }
            KeyCode::Esc => {
                self.searching = false;
                match self.search_changed(String::new()) {
                    TableAction::None => TableAction::Redraw,
                    action => action,
                }
            }
            KeyCode::Backspace => {
                let mut term = self.search.clone();
                term.pop();
                self.search_changed(term)
            }
            KeyCode::Char(c) if key.plain_char().is_some() => {
                let mut term = self.search.clone();
                term.push(c);
                self.search_changed(term)
            }
            _ => TableAction::None,
        }
    }

    fn handle_mouse(&mut self, m: MouseEvent) -> TableAction {
        match m.kind {
            MouseEventKind::ScrollUp => return self.move_cursor(-1),
            MouseEventKind::ScrollDown => return self.move_cursor(1),
            _ => {}
        }
        if !m.is_left_press() {
            return TableAction::None;
        }
        if let Some(inside) = self.menu.as_ref().map(|menu| menu.contains(m.x, m.y)) {
            if inside {
                return self.handle_menu_click(m);
            }
            // A press anywhere else dismisses the menu.
            self.menu = None;
            return TableAction::Redraw;
        }
        // Narrow regions (toggle glyphs, checkboxes) are recorded before the row they sit on.
        let hit = self
            .hits
            .iter()
            .find(|h| h.y == m.y && m.x >= h.x && m.x < h.x + h.width)
            .map(|h| h.target);
        let Some(target) = hit else {
            if self.config.enable_pagination {
                let action = self.pager.handle_event(InputEvent::Mouse(m));
                return self.map_pager_action(action);
            }
            return TableAction::None;
        };
        match target {
            Target::Search => self.start_search(),
            Target::Filters => self.open_filters(),
            Target::Columns => self.open_menu(MenuKind::Columns),
            Target::Density => {
                self.toggle_density();
                TableAction::Redraw
            }
            Target::Export => self.open_menu(MenuKind::Export),
            Target::AddItem => self.add_item(),
            Target::FullScreen => self.toggle_full_screen(),
            Target::RowActions(row) => self.row_actions(row),
            Target::Custom(i) => self.custom_button(i),
            Target::Header(i) => {
                self.focus_col = i;
                match self.sort_focused() {
                    TableAction::None => TableAction::Redraw,
                    action => action,
                }
            }
            Target::SelectPage => self.toggle_page_selected(),
            Target::Select(pos) => match self.page_rows().get(pos).copied() {
                Some(row) => self.toggle_selected(row),
                None => TableAction::None,
            },
            Target::Toggle(row) => self.toggle_expanded(row),
            Target::Row(pos) => {
                self.cursor = pos;
                TableAction::Redraw
            }
        }
    }

    fn start_search(&mut self) -> TableAction {
        if !self.config.enable_search {
            return TableAction::None;
        }
        self.searching = true;
        TableAction::Redraw
    }

    fn search_changed(&mut self, term: String) -> TableAction {
        if self.set_search(term) {
            TableAction::SearchChanged
        } else {
            TableAction::None
        }
    }

    fn open_filters(&mut self) -> TableAction {
        if !self.config.enable_filters {
            return TableAction::None;
        }
        let action = self.filters.toggle_floating();
        self.map_filter_action(action)
    }

    fn open_menu(&mut self, kind: MenuKind) -> TableAction {
        let enabled = match kind {
            MenuKind::Export => self.config.enable_export,
            MenuKind::Columns => self.config.enable_column_visibility || self.config.enable_hiding,
        };
        if !enabled {
            return TableAction::None;
        }
        let target = match kind {
            MenuKind::Export => Target::Export,
            MenuKind::Columns => Target::Columns,
        };
        let anchor_x = self
            .hits
            .iter()
            .find(|h| h.target == target)
            .map_or(self.toolbar.x, |h| h.x);
        self.menu = Some(Menu::new(kind, anchor_x, self.toolbar.y));
        TableAction::Redraw
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> TableAction {
        let Some(kind) = self.menu.as_ref().map(|m| m.kind) else {
            return TableAction::None;
        };
        let len = match kind {
            MenuKind::Export => menu::EXPORT_CHOICES.len(),
            MenuKind::Columns => self.columns.len(),
        };
        let b = &self.bindings;
        let opener = match kind {
            MenuKind::Export => &b.export,
            MenuKind::Columns => &b.columns_menu,
        };
        if keymap::any_matches(&b.close_menu, &key) || keymap::any_matches(opener, &key) {
            self.menu = None;
            return TableAction::Redraw;
        }
        let delta = if keymap::any_matches(&b.up, &key) {
            -1
        } else if keymap::any_matches(&b.down, &key) {
            1
        } else {
            0
        };
        if delta != 0 {
            return match self.menu.as_mut().map(|menu| menu.move_cursor(delta, len)) {
                Some(true) => TableAction::Redraw,
                _ => TableAction::None,
            };
        }

        let cursor = self.menu.as_ref().map_or(0, |m| m.cursor);
        let activate = keymap::any_matches(&b.toggle_row, &key)
            || keymap::any_matches(&b.select_row, &key);
        let pin = keymap::any_matches(&b.pin_column, &key);
        let show_all = keymap::any_matches(&b.show_all_columns, &key);
        match kind {
            MenuKind::Export if activate => self.choose_export(cursor),
            MenuKind::Columns if activate => self.toggle_column_visibility(cursor),
            MenuKind::Columns if pin => self.toggle_column_pin(cursor),
            MenuKind::Columns if show_all => self.show_all_action(),
            _ => TableAction::None,
        }
    }

    fn handle_menu_click(&mut self, m: MouseEvent) -> TableAction {
        let Some(menu) = self.menu.as_mut() else {
            return TableAction::None;
        };
        let Some((index, offset)) = menu.entry_at(m.x, m.y) else {
            // The frame.
            return TableAction::None;
        };
        menu.cursor = index;
        let kind = menu.kind;
        match kind {
            MenuKind::Export => self.choose_export(index),
            MenuKind::Columns => {
                let text_w = self
                    .columns
                    .iter()
                    .map(|c| render::display_width(&c.header))
                    .max()
                    .unwrap_or(0)
                    + 4;
                let pin_x = (text_w + 2) as u16;
                if offset < 3 {
                    self.toggle_column_visibility(index)
                } else if self.config.enable_column_pinning
                    && offset >= pin_x
                    && offset < pin_x + PIN_LABEL_WIDTH as u16
                {
                    self.toggle_column_pin(index)
                } else {
                    TableAction::Redraw
                }
            }
        }
    }

    fn choose_export(&mut self, index: usize) -> TableAction {
        let Some(&(scope, format)) = menu::EXPORT_CHOICES.get(index) else {
            return TableAction::None;
        };
        self.menu = None;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            ?scope,
            ?format,
            rows = self.export_rows(scope).len(),
            "table export requested"
        );
        TableAction::ExportRequested { scope, format }
    }

    fn toggle_column_visibility(&mut self, index: usize) -> TableAction {
        let Some(column) = self.columns.get(index) else {
            return TableAction::None;
        };
        let (key, hidden) = (column.accessor_key.clone(), column.hidden);
        if self.set_column_hidden(&key, !hidden) {
            TableAction::ColumnsChanged
        } else {
            TableAction::None
        }
    }

    fn toggle_column_pin(&mut self, index: usize) -> TableAction {
        let Some(key) = self.columns.get(index).map(|c| c.accessor_key.clone()) else {
            return TableAction::None;
        };
        if self.toggle_pinned(&key) {
            TableAction::ColumnsChanged
        } else {
            TableAction::None
        }
    }

    fn add_item(&mut self) -> TableAction {
        if self.config.enable_add_item {
            TableAction::AddItemRequested
        } else {
            TableAction::None
        }
    }

    fn row_actions(&mut self, row: usize) -> TableAction {
        if !self.config.enable_row_actions || row >= self.rows.len() {
            return TableAction::None;
        }
        TableAction::RowActionsRequested { row }
    }

    fn custom_button(&mut self, index: usize) -> TableAction {
        #[cfg(feature = "tracing")]
        if let Some(b) = self.config.custom_buttons.get(index) {
            tracing::debug!(label = %b.label, "custom table button pressed");
        }
        if index < self.config.custom_buttons.len() {
            TableAction::CustomButtonPressed(index)
        } else {
            TableAction::None
        }
    }

    fn sort_focused(&mut self) -> TableAction {
        let Some(key) = self.focused_column().map(|c| c.accessor_key.clone()) else {
            return TableAction::None;
        };
        if self.toggle_sort(&key) {
            TableAction::SortChanged
        } else {
            TableAction::None
        }
    }

    fn hide_focused(&mut self) -> TableAction {
        if !(self.config.enable_column_visibility || self.config.enable_hiding) {
            return TableAction::None;
        }
        let Some(key) = self.focused_column().map(|c| c.accessor_key.clone()) else {
            return TableAction::None;
        };
        if self.set_column_hidden(&key, true) {
            TableAction::ColumnsChanged
        } else {
            TableAction::None
        }
    }

    fn show_all_action(&mut self) -> TableAction {
        if self.show_all_columns() {
            TableAction::ColumnsChanged
        } else {
            TableAction::None
        }
    }

    fn move_focused_column(&mut self, delta: i32) -> TableAction {
        let Some(key) = self.focused_column().map(|c| c.accessor_key.clone()) else {
            return TableAction::None;
        };
        if self.move_column(&key, delta) {
            TableAction::ColumnsChanged
        } else {
            TableAction::None
        }
    }

    fn pin_focused(&mut self) -> TableAction {
        let Some(key) = self.focused_column().map(|c| c.accessor_key.clone()) else {
            return TableAction::None;
        };
        if self.toggle_pinned(&key) {
            TableAction::ColumnsChanged
        } else {
            TableAction::None
        }
    }

    fn move_cursor(&mut self, delta: i32) -> TableAction {
        let len = self.page_rows().len();
        if len == 0 {
            return TableAction::None;
        }
        let next = (self.cursor as i64 + delta as i64).clamp(0, len as i64 - 1) as usize;
        if next == self.cursor {
            return TableAction::None;
        }
        self.cursor = next;
        TableAction::Redraw
    }

    fn move_focus(&mut self, delta: i32) -> TableAction {
        let len = self.display_columns().len();
        if len == 0 {
            return TableAction::None;
        }
        let next = (self.focus_col as i64 + delta as i64).clamp(0, len as i64 - 1) as usize;
        if next == self.focus_col {
            return TableAction::None;
        }
        self.focus_col = next;
        TableAction::Redraw
    }

    fn map_filter_action(&mut self, action: FilterPopoverAction) -> TableAction {
        match action {
            FilterPopoverAction::None => TableAction::None,
            FilterPopoverAction::Redraw | FilterPopoverAction::Closed => TableAction::Redraw,
            FilterPopoverAction::CaptureAcquired => TableAction::CaptureAcquired,
            FilterPopoverAction::CaptureReleased => TableAction::CaptureReleased,
            FilterPopoverAction::FiltersChanged => {
                self.reset_to_first_page();
                TableAction::FiltersChanged
            }
        }
    }

    fn map_pager_action(&mut self, action: PagerAction) -> TableAction {
        match action {
            PagerAction::None => TableAction::None,
            PagerAction::PageChanged(i) => {
                self.cursor = 0;
                self.row_offset = 0;
                TableAction::PageChanged(i)
            }
            PagerAction::PageSizeChanged(n) => {
                self.cursor = 0;
                self.row_offset = 0;
                TableAction::PageSizeChanged(n)
            }
        }
    }

    fn reset_to_first_page(&mut self) {
        self.pager.state.first();
        self.cursor = 0;
        self.row_offset = 0;
        self.refresh();
    }

    fn clamp_focus(&mut self) {
        let len = self.columns.iter().filter(|c| !c.hidden).count();
        self.focus_col = self.focus_col.min(len.saturating_sub(1));
    }

    /// Re-runs the row pipeline after any change to data, search, filters or sorting.
    fn refresh(&mut self) {
        let query = RowQuery {
            search: &self.search,
            filters: &self.filters.panel.filters,
            sort: self.sort.as_ref(),
        };
        self.view = model::process_rows(&self.rows, &self.columns, &query);
        self.pager.state.set_row_count(self.view.len());
        let len = self.page_rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
        self.row_offset = self.row_offset.min(self.cursor);
    }
}

/// Column widths for `total` columns of space. Sized columns keep their size; the rest share
/// what is left, never going below `min`.
fn layout_columns(sizes: &[Option<u16>], total: u16, gap: u16, min: u16) -> Vec<u16> {
    if sizes.is_empty() {
        return Vec::new();
    }
    let gaps = gap as u32 * (sizes.len() as u32 - 1);
    let fixed: u32 = sizes.iter().flatten().map(|&s| s as u32).sum();
    let flexible = sizes.iter().filter(|s| s.is_none()).count() as u32;
    let left = (total as u32).saturating_sub(fixed + gaps);
    let share = if flexible == 0 { 0 } else { left / flexible };
    let mut extra = if flexible == 0 { 0 } else { left % flexible };
    sizes
        .iter()
        .map(|s| match s {
            Some(w) => *w,
            None => {
                let bonus = if extra > 0 {
                    extra -= 1;
                    1
                } else {
                    0
                };
                (share + bonus).max(min as u32).min(u16::MAX as u32) as u16
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnType;
    use crate::config::CustomButton;
    use crate::filter::FilterValue;
    use crate::input::MouseButton;
    use crate::panel::gesture::Point;
    use serde_json::json;

    fn columns() -> Vec<ColumnConfig> {
        vec![
            ColumnConfig::new("name", "Name").with_size(10),
            ColumnConfig::new("qty", "Qty").with_type(ColumnType::Number).with_size(5),
            ColumnConfig::new("status", "Status")
                .with_type(ColumnType::Category)
                .with_options(vec!["Received".into(), "Pending".into()]),
        ]
    }

    fn rows(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| {
                json!({
                    "name": format!("item-{i:02}"),
                    "qty": (n - i) * 3,
                    "status": if i % 2 == 0 { "Received" } else { "Pending" },
                })
            })
            .collect()
    }

    fn table(n: usize) -> DataTable {
        let mut t = DataTable::new(columns(), TableConfig::default());
        t.set_rows(rows(n));
        t
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    fn ch(c: char) -> InputEvent {
        key(KeyCode::Char(c))
    }

    fn click(x: u16, y: u16) -> InputEvent {
        InputEvent::Mouse(MouseEvent::new(x, y, MouseEventKind::Down(MouseButton::Left)))
    }

    fn drag(x: u16, y: u16) -> InputEvent {
        InputEvent::Mouse(MouseEvent::new(x, y, MouseEventKind::Drag(MouseButton::Left)))
    }

    fn release(x: u16, y: u16) -> InputEvent {
        InputEvent::Mouse(MouseEvent::new(x, y, MouseEventKind::Up(MouseButton::Left)))
    }

    fn draw(t: &mut DataTable, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        buf
    }

    #[test]
    fn layout_shares_remaining_width() {
        assert_eq!(layout_columns(&[Some(10), None, None], 31, 1, 4), vec![10, 10, 9]);
        assert_eq!(layout_columns(&[None, None], 5, 1, 4), vec![4, 4]);
        assert!(layout_columns(&[], 40, 1, 4).is_empty());
    }

    #[test]
    fn pages_follow_default_page_size() {
        let mut t = table(25);
        assert_eq!(t.page_rows().len(), 10);
        assert_eq!(t.pager.state.page_count(), 3);
        assert_eq!(t.handle_event(key(KeyCode::End)), TableAction::PageChanged(2));
        assert_eq!(t.page_rows(), &[20, 21, 22, 23, 24]);
    }

    #[test]
    fn search_entry_filters_and_resets_page() {
        let mut t = table(25);
        t.handle_event(key(KeyCode::Right));
        assert_eq!(t.pager.state.page_index(), 1);

        assert_eq!(t.handle_event(ch('/')), TableAction::Redraw);
        assert!(t.is_searching());
        for c in "item-2".chars() {
            t.handle_event(ch(c));
        }
        assert_eq!(t.pager.state.page_index(), 0);
        assert_eq!(t.filtered_rows(), &[20, 21, 22, 23, 24]);

        t.handle_event(key(KeyCode::Esc));
        assert!(!t.is_searching());
        assert_eq!(t.filtered_rows().len(), 25);
    }

    #[test]
    fn sort_cycles_asc_desc_none() {
        let mut t = table(4);
        t.handle_event(ch(']'));
        assert_eq!(t.focused_column().map(|c| c.accessor_key.as_str()), Some("qty"));

        assert_eq!(t.handle_event(ch('s')), TableAction::SortChanged);
        assert_eq!(t.page_rows(), &[3, 2, 1, 0]);
        t.handle_event(ch('s'));
        assert_eq!(t.page_rows(), &[0, 1, 2, 3]);
        assert!(t.sort().is_some_and(|s| s.desc));
        t.handle_event(ch('s'));
        assert!(t.sort().is_none());
    }

    #[test]
    fn unsortable_columns_are_ignored() {
        let mut cols = columns();
        cols[0].sortable = false;
        let mut t = DataTable::new(cols, TableConfig::default());
        assert_eq!(t.handle_event(ch('s')), TableAction::None);
    }

    #[test]
    fn filters_from_panel_apply_to_rows() {
        let mut t = table(6);
        assert_eq!(t.handle_event(ch('f')), TableAction::Redraw);
        assert!(t.filters.is_open());
        t.filters
            .panel
            .filters
            .set("status", FilterValue::Choice("Pending".into()));
        // Edits through the panel trigger a refresh.
        t.handle_event(ch('i'));
        assert_eq!(t.filtered_rows(), &[1, 3, 5]);
        assert_eq!(t.filters.trigger_label(), "Filters (2)");
    }

    #[test]
    fn hide_and_pin_reorder_display_columns() {
        let mut t = table(2);
        t.handle_event(ch(']'));
        t.handle_event(ch(']'));
        assert_eq!(t.handle_event(ch('p')), TableAction::ColumnsChanged);
        let keys: Vec<&str> = t.display_columns().iter().map(|c| c.accessor_key.as_str()).collect();
        assert_eq!(keys, vec!["status", "name", "qty"]);
        assert_eq!(t.focused_column().map(|c| c.accessor_key.as_str()), Some("status"));

        assert_eq!(t.handle_event(ch('v')), TableAction::ColumnsChanged);
        assert_eq!(t.hidden_count(), 1);
        assert_eq!(t.handle_event(ch('V')), TableAction::ColumnsChanged);
        assert_eq!(t.hidden_count(), 0);
    }

    #[test]
    fn last_visible_column_cannot_be_hidden() {
        let mut t = DataTable::new(vec![ColumnConfig::new("a", "A")], TableConfig::default());
        assert!(!t.set_column_hidden("a", true));
    }

    #[test]
    fn enter_toggles_cursor_row() {
        let mut t = table(3);
        t.handle_event(key(KeyCode::Down));
        assert_eq!(
            t.handle_event(key(KeyCode::Enter)),
            TableAction::RowToggled {
                row: 1,
                expanded: true
            }
        );
        assert!(t.is_expanded(1));
    }

    #[test]
    fn custom_button_hotkey_emits_index() {
        let config = TableConfig {
            custom_buttons: vec![
                CustomButton::new("Refresh").with_hotkey('R'),
                CustomButton::new("Archive").with_hotkey('A'),
            ],
            ..TableConfig::default()
        };
        let mut t = DataTable::new(columns(), config);
        assert_eq!(t.handle_event(ch('A')), TableAction::CustomButtonPressed(1));
    }

    #[test]
    fn row_selection_requires_feature() {
        let mut t = table(3);
        assert_eq!(t.handle_event(ch(' ')), TableAction::None);

        let config = TableConfig {
            enable_row_selection: true,
            ..TableConfig::default()
        };
        let mut t = DataTable::new(columns(), config);
        t.set_rows(rows(3));
        assert_eq!(t.handle_event(ch(' ')), TableAction::SelectionChanged);
        assert_eq!(t.selected_rows().collect::<Vec<_>>(), vec![0]);
        t.toggle_page_selected();
        assert_eq!(t.selected_rows().count(), 3);
    }

    #[test]
    fn render_draws_toolbar_header_rows_and_pager() {
        let mut t = table(12);
        t.toggle_sort("name");
        let area = Rect::new(0, 0, 60, 14);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());

        assert!(render::row_text(&buf, area, 0).starts_with("/ Search...  [Filters]"));
        let header = render::row_text(&buf, area, 1);
        assert!(header.starts_with("Name ▲"));
        assert!(header.contains("Status"));
        assert!(render::row_text(&buf, area, 2).starts_with("item-00"));
        assert!(render::row_text(&buf, area, 13).contains(" 1  2 "));
    }

    #[test]
    fn render_shows_empty_message() {
        let mut t = table(0);
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        assert!(render::row_text(&buf, area, 2).starts_with("No results."));
    }

    #[test]
    fn clicking_a_header_sorts_by_it() {
        let mut t = table(3);
        let area = Rect::new(0, 0, 60, 8);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        // "Qty" starts after the 10-wide name column and a 1-cell gap.
        assert_eq!(t.handle_event(click(11, 1)), TableAction::SortChanged);
        assert_eq!(t.sort().map(|s| s.id.as_str()), Some("qty"));
    }

    #[test]
    fn default_sorting_from_json_is_applied() {
        let spec = TableSpec::from_json(
            r#"{ "columns": [ { "accessorKey": "n", "header": "N", "type": "number" } ],
                 "defaultSorting": [ { "id": "n", "desc": true } ] }"#,
        )
        .unwrap();
        let mut t = DataTable::from_spec(spec);
        t.set_rows(vec![json!({ "n": 1 }), json!({ "n": 3 }), json!({ "n": 2 })]);
        assert_eq!(t.page_rows(), &[1, 2, 0]);
    }

    #[test]
    fn floating_filter_drag_is_bracketed_by_capture_actions() {
        let mut t = table(5);
        let area = Rect::new(0, 0, 100, 30);
        assert_eq!(t.handle_event(ch('f')), TableAction::Redraw);
        draw(&mut t, area);

        // Title row of the overlay, which opens at (4, 2).
        assert_eq!(t.handle_event(click(10, 2)), TableAction::CaptureAcquired);
        let far = drag(90, 28);
        assert!(t.wants_mouse(&far));
        assert_eq!(t.handle_event(far), TableAction::Redraw);
        // Kept on screen: 100x30 minus the 48x18 panel.
        assert_eq!(t.filters.floating().controller().position(), Point::new(52, 12));
        assert_eq!(t.handle_event(release(1, 29)), TableAction::CaptureReleased);
        assert!(!t.wants_mouse(&release(1, 29)));
        assert!(t.filters.is_open());
    }

    #[test]
    fn closing_filters_mid_drag_releases_capture() {
        let mut t = table(5);
        let area = Rect::new(0, 0, 100, 30);
        t.handle_event(ch('f'));
        draw(&mut t, area);

        assert_eq!(t.handle_event(click(10, 2)), TableAction::CaptureAcquired);
        assert_eq!(t.handle_event(key(KeyCode::Esc)), TableAction::CaptureReleased);
        assert!(!t.filters.is_open());
        assert!(!t.filters.floating().controller().is_active());
        assert_eq!(t.handle_event(release(10, 2)), TableAction::None);
    }

    #[test]
    fn export_menu_reports_scope_and_format() {
        let mut t = table(25);
        let area = Rect::new(0, 0, 100, 14);
        draw(&mut t, area);

        assert_eq!(t.handle_event(ch('E')), TableAction::Redraw);
        assert!(t.is_menu_open());
        let buf = draw(&mut t, area);
        assert!(render::row_text(&buf, area, 2).contains("Export All (CSV)"));
        assert!(render::row_text(&buf, area, 5).contains("Export Page (PDF)"));

        t.handle_event(key(KeyCode::Down));
        assert_eq!(
            t.handle_event(key(KeyCode::Enter)),
            TableAction::ExportRequested {
                scope: ExportScope::Page,
                format: ExportFormat::Csv,
            }
        );
        assert!(!t.is_menu_open());
        assert_eq!(t.export_rows(ExportScope::Page).len(), 10);
        assert_eq!(t.export_rows(ExportScope::All).len(), 25);

        // "[Export]" sits at x=24; the third entry is on row 4.
        t.handle_event(click(25, 0));
        draw(&mut t, area);
        assert_eq!(
            t.handle_event(click(26, 4)),
            TableAction::ExportRequested {
                scope: ExportScope::All,
                format: ExportFormat::Pdf,
            }
        );
    }

    #[test]
    fn pressing_outside_an_open_menu_dismisses_it() {
        let mut t = table(3);
        let area = Rect::new(0, 0, 100, 10);
        draw(&mut t, area);
        t.handle_event(ch('E'));
        draw(&mut t, area);
        assert_eq!(t.handle_event(click(90, 8)), TableAction::Redraw);
        assert!(!t.is_menu_open());
    }

    #[test]
    fn columns_menu_restores_a_single_column() {
        let mut t = table(2);
        assert!(t.set_column_hidden("name", true));
        assert!(t.set_column_hidden("qty", true));
        let area = Rect::new(0, 0, 100, 10);
        draw(&mut t, area);

        assert_eq!(t.handle_event(ch('c')), TableAction::Redraw);
        let buf = draw(&mut t, area);
        assert!(render::row_text(&buf, area, 2).contains("[ ] Name"));
        assert!(render::row_text(&buf, area, 4).contains("[x] Status    [pin]"));

        t.handle_event(key(KeyCode::Down));
        assert_eq!(t.handle_event(ch(' ')), TableAction::ColumnsChanged);
        assert_eq!(t.hidden_count(), 1);
        assert!(t.columns()[0].hidden);
        assert!(!t.columns()[1].hidden);

        // "[Columns (2 hidden)]" opened the menu at x=34, so entries start at x=35.
        assert_eq!(t.handle_event(click(35, 2)), TableAction::ColumnsChanged);
        assert_eq!(t.hidden_count(), 0);
        assert_eq!(t.handle_event(click(47, 4)), TableAction::ColumnsChanged);
        assert!(t.columns()[2].pinned);
        assert!(t.is_menu_open());

        assert_eq!(t.handle_event(key(KeyCode::Esc)), TableAction::Redraw);
        assert!(!t.is_menu_open());
    }

    #[test]
    fn add_item_and_full_screen_buttons() {
        let mut t = table(2);
        assert_eq!(t.handle_event(ch('+')), TableAction::None);

        let config = TableConfig {
            enable_add_item: true,
            ..TableConfig::default()
        };
        let mut t = DataTable::new(columns(), config);
        let area = Rect::new(0, 0, 120, 6);
        let buf = draw(&mut t, area);
        let toolbar = render::row_text(&buf, area, 0);
        assert!(toolbar.contains("[+ Add Item]"));
        assert!(toolbar.contains("[Fullscreen]"));

        assert_eq!(t.handle_event(ch('+')), TableAction::AddItemRequested);
        assert_eq!(t.handle_event(click(25, 0)), TableAction::AddItemRequested);
        assert_eq!(t.handle_event(ch('F')), TableAction::FullScreenToggled(true));
        assert!(t.is_full_screen());
        let buf = draw(&mut t, area);
        assert!(render::row_text(&buf, area, 0).contains("[Exit Fullscreen]"));
    }

    #[test]
    fn row_actions_marker_and_key() {
        let mut t = table(3);
        assert_eq!(t.handle_event(ch('a')), TableAction::None);

        let config = TableConfig {
            enable_row_actions: true,
            ..TableConfig::default()
        };
        let mut t = DataTable::new(columns(), config);
        t.set_rows(rows(3));
        let area = Rect::new(0, 0, 60, 8);
        let buf = draw(&mut t, area);
        assert!(render::row_text(&buf, area, 3).ends_with('⋯'));
        assert_eq!(
            t.handle_event(click(59, 3)),
            TableAction::RowActionsRequested { row: 1 }
        );
        assert_eq!(
            t.handle_event(ch('a')),
            TableAction::RowActionsRequested { row: 0 }
        );
    }

    #[test]
    fn header_scrolls_away_unless_sticky() {
        let area = Rect::new(0, 0, 60, 6);
        let mut t = table(10);
        for _ in 0..5 {
            t.handle_event(key(KeyCode::Down));
        }
        let buf = draw(&mut t, area);
        assert!(render::row_text(&buf, area, 1).starts_with("Name"));

        let config = TableConfig {
            enable_sticky: false,
            ..TableConfig::default()
        };
        let mut t = DataTable::new(columns(), config);
        t.set_rows(rows(10));
        for _ in 0..5 {
            t.handle_event(key(KeyCode::Down));
        }
        let buf = draw(&mut t, area);
        assert!(render::row_text(&buf, area, 1).starts_with("item-03"));
    }

    #[test]
    fn columns_move_within_their_pinned_group() {
        let mut t = table(2);
        let keys = |t: &DataTable| -> Vec<String> {
            t.display_columns()
                .iter()
                .map(|c| c.accessor_key.clone())
                .collect()
        };
        t.handle_event(ch(']'));
        assert_eq!(t.handle_event(ch('>')), TableAction::ColumnsChanged);
        assert_eq!(keys(&t), vec!["name", "status", "qty"]);
        assert_eq!(t.focused_column().map(|c| c.accessor_key.as_str()), Some("qty"));
        t.handle_event(ch('<'));
        t.handle_event(ch('<'));
        assert_eq!(keys(&t), vec!["qty", "name", "status"]);
        assert_eq!(t.handle_event(ch('<')), TableAction::None);

        assert!(t.toggle_pinned("status"));
        assert_eq!(keys(&t), vec!["status", "qty", "name"]);
        assert!(!t.move_column("qty", -1));

        let config = TableConfig {
            enable_column_ordering: false,
            ..TableConfig::default()
        };
        let mut t = DataTable::new(columns(), config);
        assert!(!t.move_column("name", 1));
    }

    #[test]
    fn stale_row_count_yields_an_empty_page() {
        let mut t = table(5);
        t.pager.state.set_row_count(50);
        t.pager.state.last();
        assert!(t.page_rows().is_empty());
        assert_eq!(t.cursor_row(), None);
    }
}
