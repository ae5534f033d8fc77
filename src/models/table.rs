use crate::models::CellValue;
use crate::models::models::{IntentErrorRow, LongRow, MetricRow};
use crate::models::utils::dedup_preserving_order;

/// 指标宽表：每行一个配置，每列一个指标
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    pub rows: Vec<MetricRow>,
}

impl MetricTable {
    pub fn new(rows: Vec<MetricRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains_config(&self, config: &str) -> bool {
        self.rows.iter().any(|row| row.config == config)
    }

    /// 表中出现过的配置名（按行顺序去重）
    pub fn configs(&self) -> Vec<String> {
        dedup_preserving_order(self.rows.iter().map(|row| row.config.clone()))
    }

    /// 所有行的指标名并集，按首次出现的顺序
    pub fn metric_names(&self) -> Vec<String> {
        dedup_preserving_order(
            self.rows
                .iter()
                .flat_map(|row| row.values.iter().map(|(name, _)| name.clone())),
        )
    }

    /// 只保留选中的配置
    pub fn filter_configs(&self, selected: &[String]) -> MetricTable {
        MetricTable::new(
            self.rows
                .iter()
                .filter(|row| selected.contains(&row.config))
                .cloned()
                .collect(),
        )
    }

    /// 宽表转长表：先按指标、再按行展开，与绘图时的分面顺序一致
    pub fn melt(&self) -> Vec<LongRow> {
        let mut long_rows = Vec::new();
        for variable in self.metric_names() {
            for row in &self.rows {
                if let Some(value) = row.get(&variable) {
                    long_rows.push(LongRow {
                        config: row.config.clone(),
                        variable: variable.clone(),
                        value,
                    });
                }
            }
        }
        long_rows
    }

    /// 转换为可展示的文本表，列顺序为指标列在前、config列在后
    pub fn to_text_table(&self) -> TextTable {
        let metric_names = self.metric_names();
        let mut headers = metric_names.clone();
        headers.push("config".to_string());

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells: Vec<CellValue> = metric_names
                    .iter()
                    .map(|name| row.get(name).map(CellValue::from).unwrap_or(CellValue::Empty))
                    .collect();
                cells.push(CellValue::String(row.config.clone()));
                cells
            })
            .collect();

        TextTable { headers, rows }
    }
}

/// 通用文本表格，用于原始数据与错误明细的展示；网格形式由TUI的Table组件绘制
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TextTable {
    /// 由错误记录构建表格，不包含config列
    pub fn from_error_rows(rows: &[&IntentErrorRow]) -> Self {
        let headers = dedup_preserving_order(
            rows.iter()
                .flat_map(|row| row.fields.keys().cloned())
                .filter(|key| key != "config"),
        );

        let rows = rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|key| row.fields.get(key).map(CellValue::from).unwrap_or(CellValue::Empty))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| escape_cell(&cell.to_string_repr())).collect())
            .collect()
    }

    fn column_widths(&self, rendered: &[Vec<String>]) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rendered
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// 渲染为markdown管道表
    pub fn to_markdown(&self) -> String {
        let rendered = self.rendered_rows();
        let widths = self.column_widths(&rendered);

        let mut lines = Vec::with_capacity(rendered.len() + 2);
        lines.push(format_markdown_row(&self.headers, &widths));
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat((*w).max(3))).collect();
        lines.push(format!("|{}|", separator.iter().map(|s| format!(" {} ", s)).collect::<Vec<_>>().join("|")));
        for row in &rendered {
            lines.push(format_markdown_row(row, &widths));
        }
        lines.join("\n")
    }
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

fn format_markdown_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| pad(cells.get(i).map(String::as_str).unwrap_or(""), (*w).max(3)))
        .collect();
    format!("| {} |", padded.join(" | "))
}
