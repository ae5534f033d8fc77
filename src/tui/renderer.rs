use crate::tui::app::{InputMode, SidebarItem};
use crate::tui::utils::{config_color, scroll_percentage};
use crate::tui::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// TUI渲染器，负责处理所有UI渲染逻辑
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// 从app结构体中读取数据并渲染
    pub fn draw(&self, f: &mut Frame, app: &mut App) {
        let sidebar_width = app.config.tui.sidebar_width.clamp(15, 60);

        let rows = if app.config.tui.show_help_bar {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(1)])
                .split(f.area())
        } else {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3)])
                .split(f.area())
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(sidebar_width),
                Constraint::Percentage(100 - sidebar_width),
            ])
            .split(rows[0]);

        self.draw_sidebar(f, app, columns[0]);
        self.draw_page(f, app, columns[1]);

        if app.config.tui.show_help_bar {
            self.draw_help_bar(f, app, rows[1]);
        }
    }

    /// 绘制侧边栏控件
    fn draw_sidebar(&self, f: &mut Frame, app: &mut App, area: Rect) {
        let available = app.outcome.possible_configs();
        let mut lines = vec![
            Line::from(Span::styled(
                "Configure Overview",
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        let mut cursor_line = 0;
        for (index, item) in app.sidebar_items().into_iter().enumerate() {
            let is_cursor = index == app.sidebar_cursor;
            match &item {
                SidebarItem::ResultsFolder => {
                    lines.push(Line::from("What is your results folder?"));
                    if is_cursor {
                        cursor_line = lines.len();
                    }
                    lines.push(self.folder_line(app, is_cursor));
                    lines.push(Line::from(""));
                    lines.push(Line::from("Select what you care about."));
                    lines.push(Line::from(Span::styled(
                        "Select Result Folders",
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                    if available.is_empty() {
                        lines.push(Line::from(Span::styled(
                            "  (no configurations)",
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                }
                SidebarItem::ConfigOption(config) => {
                    let color = config_color(&app.config.tui.palette, &available, config);
                    let checked = app.state.is_selected(config);
                    if is_cursor {
                        cursor_line = lines.len();
                    }
                    lines.push(self.checkbox_line(config, checked, Style::default().fg(color), is_cursor));
                }
                SidebarItem::ShowRawData => {
                    lines.push(Line::from(""));
                    if is_cursor {
                        cursor_line = lines.len();
                    }
                    lines.push(self.checkbox_line("Show Raw Data", app.state.show_raw_data, Style::default(), is_cursor));
                }
                SidebarItem::ShowMarkdown => {
                    if is_cursor {
                        cursor_line = lines.len();
                    }
                    lines.push(self.checkbox_line("Show Raw as Markdown", app.state.show_markdown, Style::default(), is_cursor));
                }
                SidebarItem::ShowIntentErrors => {
                    if is_cursor {
                        cursor_line = lines.len();
                    }
                    lines.push(self.checkbox_line("Show Intent Errors", app.state.show_intent_errors, Style::default(), is_cursor));
                }
            }
        }

        let visible_rows = area.height.saturating_sub(2) as usize;
        // 光标在第一个控件时回到顶部，让标题可见
        let current_offset = if app.sidebar_cursor == 0 { 0 } else { app.sidebar_scroll_offset };
        let scroll_offset = self.calculate_scroll_offset(cursor_line, current_offset, visible_rows);
        app.sidebar_scroll_offset = scroll_offset;

        let title = if lines.len() > visible_rows {
            format!("Controls [{}%]", scroll_percentage(scroll_offset, lines.len(), visible_rows))
        } else {
            "Controls".to_string()
        };

        let sidebar = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((scroll_offset.min(u16::MAX as usize) as u16, 0));
        f.render_widget(sidebar, area);
    }

    /// 计算侧边栏滚动偏移，保证光标所在行可见
    fn calculate_scroll_offset(&self, cursor_line: usize, current_offset: usize, visible_rows: usize) -> usize {
        if visible_rows == 0 {
            return current_offset;
        }

        if cursor_line < current_offset {
            cursor_line
        } else if cursor_line >= current_offset + visible_rows {
            cursor_line.saturating_sub(visible_rows - 1)
        } else {
            current_offset
        }
    }

    /// 结果目录输入框；编辑时显示光标
    fn folder_line(&self, app: &App, is_cursor: bool) -> Line<'static> {
        let (text, style) = match app.input_mode {
            InputMode::EditingFolder => (
                format!(" {}▏", app.folder_input),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ),
            InputMode::Normal => (
                format!(" {} ", app.state.results_folder),
                self.cursor_style(Style::default().fg(Color::Green), is_cursor),
            ),
        };
        Line::from(Span::styled(text, style))
    }

    fn checkbox_line(&self, label: &str, checked: bool, style: Style, is_cursor: bool) -> Line<'static> {
        let mark = if checked { "[x]" } else { "[ ]" };
        Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("{} {}", mark, label), self.cursor_style(style, is_cursor)),
        ])
    }

    /// 获取光标所在控件的样式
    fn cursor_style(&self, style: Style, is_cursor: bool) -> Style {
        if is_cursor {
            style.add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            style
        }
    }

    /// 绘制页面内容
    fn draw_page(&self, f: &mut Frame, app: &mut App, area: Rect) {
        app.set_page_height(area.height.saturating_sub(2) as usize);

        let percentage = scroll_percentage(app.page_scroll_offset, app.page_cache.len(), app.page_height);
        let title = if app.page_cache.len() > app.page_height {
            format!("GridResults [{}%]", percentage)
        } else {
            "GridResults".to_string()
        };

        let page = Paragraph::new(app.page_cache.clone())
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((app.page_scroll_offset.min(u16::MAX as usize) as u16, 0));

        f.render_widget(page, area);
    }

    /// 绘制底部帮助栏
    fn draw_help_bar(&self, f: &mut Frame, app: &App, area: Rect) {
        let keys = &app.config.keybindings;
        let text = match app.input_mode {
            InputMode::EditingFolder => "Enter: apply folder  Esc: cancel".to_string(),
            InputMode::Normal => format!(
                "↑/{}  ↓/{}: move  {}/Enter: toggle  {}: edit folder  {}: all/none  {}/{}: reload  {}/{}: scroll  {}: quit",
                keys.up,
                keys.down,
                keys.toggle,
                keys.edit,
                keys.select_all,
                keys.reload,
                keys.reload_all,
                keys.scroll_up,
                keys.scroll_down,
                keys.quit
            ),
        };
        let help = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))));
        f.render_widget(help, area);
    }
}
