use crate::aggregation::ResultsData;
use crate::models::{CellValue, LongRow, MetricTable, TextTable, TuiConfig, ViewState};
use crate::models::utils::dedup_preserving_order;
use crate::tui::utils::{buffer_to_lines, config_color, display_width, fit_label};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Row, Table, Widget};
use std::sync::Arc;

/// 当前结果目录的加载结果
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Missing,
    Loaded(Arc<ResultsData>),
    Failed(String), // 错误链的展示文本
}

impl LoadOutcome {
    pub fn possible_configs(&self) -> Vec<String> {
        match self {
            LoadOutcome::Loaded(data) => data.possible_configs(),
            _ => Vec::new(),
        }
    }
}

const LABEL_WIDTH_LIMIT: usize = 24;
const TABLE_COLUMN_SPACING: u16 = 3;

/// 由界面状态和已加载的数据生成整页内容
///
/// 每次控件变化都重新调用；本函数不访问磁盘
pub fn render_page(state: &ViewState, outcome: &LoadOutcome, tui: &TuiConfig) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Rasa GridResults Summary",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from("Quick Overview of Crossvalidated Runs"));
    lines.push(Line::from(""));

    let data = match outcome {
        LoadOutcome::Missing => {
            lines.push(Line::from(Span::styled(
                format!("Are you sure this results folder `{}` exists?", state.results_folder),
                Style::default().fg(Color::Yellow),
            )));
            return lines;
        }
        LoadOutcome::Failed(message) => {
            lines.push(Line::from(Span::styled(
                format!("Failed to load `{}`:", state.results_folder),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            for part in message.lines() {
                lines.push(Line::from(Span::styled(part.to_string(), Style::default().fg(Color::Red))));
            }
            return lines;
        }
        LoadOutcome::Loaded(data) => data,
    };

    let available = data.possible_configs();

    let intent = data.intent.filter_configs(&state.selected_configs);
    build_summary_section(&mut lines, "Intent Summary Overview", &intent, state, &available, tui);

    let entity = data.entity.filter_configs(&state.selected_configs);
    build_summary_section(&mut lines, "Entity Summary Overview", &entity, state, &available, tui);

    if state.show_intent_errors {
        build_intent_errors_section(&mut lines, data, state);
    }

    lines
}

fn heading(text: impl Into<String>, color: Color) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

/// 构建一个汇总区块：分面柱状图 + 可选的原始数据表
fn build_summary_section(
    lines: &mut Vec<Line<'static>>,
    title: &str,
    table: &MetricTable,
    state: &ViewState,
    available: &[String],
    tui: &TuiConfig,
) {
    lines.push(heading(title, Color::Magenta));
    lines.push(Line::from(""));
    lines.extend(build_chart_lines(&table.melt(), available, tui));

    if state.show_raw_data {
        lines.push(Line::from(""));
        lines.extend(build_table_lines(&table.to_text_table(), state.raw_as_markdown()));
    }
    lines.push(Line::from(""));
}

/// 构建分面水平柱状图：每个指标一个分面，每个配置一根柱，颜色按配置区分
pub fn build_chart_lines(long_rows: &[LongRow], available: &[String], tui: &TuiConfig) -> Vec<Line<'static>> {
    if long_rows.is_empty() {
        return vec![Line::from(Span::styled(
            "  No data for the selected configurations",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    // 所有分面共用同一刻度，最大值至少为 1.0
    let max_value = long_rows
        .iter()
        .map(|row| row.value)
        .fold(1.0_f64, f64::max);
    let label_width = long_rows
        .iter()
        .map(|row| display_width(&row.config))
        .max()
        .unwrap_or(1)
        .min(LABEL_WIDTH_LIMIT);

    let mut lines = Vec::new();
    for variable in dedup_preserving_order(long_rows.iter().map(|row| row.variable.clone())) {
        lines.push(Line::from(Span::styled(
            format!("  {}", variable),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));

        let facet: Vec<&LongRow> = long_rows.iter().filter(|row| row.variable == variable).collect();
        lines.extend(indent(render_facet(&facet, available, tui, max_value, label_width), "    "));
    }
    lines
}

/// 用 BarChart 渲染一个分面，数值按千分之一取整
fn render_facet(
    facet: &[&LongRow],
    available: &[String],
    tui: &TuiConfig,
    max_value: f64,
    label_width: usize,
) -> Vec<Line<'static>> {
    let bars: Vec<Bar> = facet
        .iter()
        .map(|row| {
            let color = config_color(&tui.palette, available, &row.config);
            Bar::default()
                .value(scaled(row.value))
                .text_value(format!("{:.3}", row.value))
                .label(Line::from(Span::styled(
                    fit_label(&row.config, label_width),
                    Style::default().fg(color),
                )))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(scaled(max_value))
        .data(BarGroup::default().bars(&bars));

    let width = (label_width + 1 + tui.bar_width.max(1)).min(u16::MAX as usize) as u16;
    let area = Rect::new(0, 0, width, bars.len().min(u16::MAX as usize) as u16);
    let mut buffer = Buffer::empty(area);
    chart.render(area, &mut buffer);
    buffer_to_lines(&buffer)
}

fn scaled(value: f64) -> u64 {
    (value.max(0.0) * 1000.0).round() as u64
}

fn indent(lines: Vec<Line<'static>>, prefix: &'static str) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .map(|line| {
            let mut spans = vec![Span::raw(prefix)];
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect()
}

/// 原始数据表：Table 组件渲染的网格，或markdown文本
pub fn build_table_lines(table: &TextTable, as_markdown: bool) -> Vec<Line<'static>> {
    if as_markdown {
        return table
            .to_markdown()
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Gray))))
            .collect();
    }

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(CellValue::to_string_repr).collect())
        .collect();

    // 列宽按显示宽度计算，宽字符占两列
    let widths: Vec<u16> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| display_width(cell))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
                .min(u16::MAX as usize) as u16
        })
        .collect();

    let header = Row::new(
        table
            .headers
            .iter()
            .map(|h| Cell::from(h.clone()).style(Style::default().fg(Color::Yellow))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = cells.into_iter().map(Row::new);

    let grid = Table::new(rows, widths.iter().map(|w| Constraint::Length(*w)))
        .header(header)
        .column_spacing(TABLE_COLUMN_SPACING)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    let inner_width = widths.iter().map(|w| *w as usize).sum::<usize>()
        + TABLE_COLUMN_SPACING as usize * widths.len().saturating_sub(1);
    let width = (inner_width + 2).min(u16::MAX as usize) as u16;
    let height = (table.rows.len() + 3).min(u16::MAX as usize) as u16;
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    Widget::render(grid, area, &mut buffer);
    indent(buffer_to_lines(&buffer), "  ")
}

/// 按选择顺序为每个配置输出标题和错误明细表
fn build_intent_errors_section(lines: &mut Vec<Line<'static>>, data: &ResultsData, state: &ViewState) {
    lines.push(heading("Intent Errors Summary", Color::Magenta));
    lines.push(Line::from("Overview of intent errors to quickly detect wrong labelling."));
    lines.push(Line::from(""));

    for config in &state.selected_configs {
        lines.push(heading(config.clone(), Color::Cyan));
        let rows = data.errors_for_config(config);
        if rows.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No intent errors",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.extend(build_table_lines(&TextTable::from_error_rows(&rows), false));
        }
        lines.push(Line::from(""));
    }
}
