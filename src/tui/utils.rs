use ratatui::buffer::{Buffer, Cell};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// 将颜色字符串转换为ratatui的Color
pub fn parse_color(color_str: &str) -> Color {
    let color_map = get_color_map();
    color_map
        .get(&color_str.to_lowercase())
        .copied()
        .unwrap_or(Color::White)
}

/// 获取颜色映射表
fn get_color_map() -> std::collections::HashMap<String, Color> {
    use std::collections::HashMap;

    let mut map = HashMap::new();

    // 基础颜色
    insert_basic_colors(&mut map);

    // 灰色系
    insert_gray_colors(&mut map);

    // 亮色
    insert_light_colors(&mut map);

    map
}

/// 插入基础颜色
fn insert_basic_colors(map: &mut std::collections::HashMap<String, Color>) {
    map.insert("black".to_string(), Color::Black);
    map.insert("red".to_string(), Color::Red);
    map.insert("green".to_string(), Color::Green);
    map.insert("yellow".to_string(), Color::Yellow);
    map.insert("blue".to_string(), Color::Blue);
    map.insert("magenta".to_string(), Color::Magenta);
    map.insert("cyan".to_string(), Color::Cyan);
    map.insert("white".to_string(), Color::White);
}

/// 插入灰色系颜色
fn insert_gray_colors(map: &mut std::collections::HashMap<String, Color>) {
    map.insert("gray".to_string(), Color::Gray);
    map.insert("grey".to_string(), Color::Gray);
    map.insert("dark_gray".to_string(), Color::DarkGray);
    map.insert("dark_grey".to_string(), Color::DarkGray);
}

/// 插入亮色
fn insert_light_colors(map: &mut std::collections::HashMap<String, Color>) {
    map.insert("light_red".to_string(), Color::LightRed);
    map.insert("light_green".to_string(), Color::LightGreen);
    map.insert("light_yellow".to_string(), Color::LightYellow);
    map.insert("light_blue".to_string(), Color::LightBlue);
    map.insert("light_magenta".to_string(), Color::LightMagenta);
    map.insert("light_cyan".to_string(), Color::LightCyan);
}

/// 按配置在可选列表中的位置取调色板颜色，保证同一配置在所有图中颜色一致
pub fn config_color(palette: &[String], available: &[String], config: &str) -> Color {
    if palette.is_empty() {
        return Color::White;
    }
    let index = available.iter().position(|c| c == config).unwrap_or(0);
    parse_color(&palette[index % palette.len()])
}

/// 把离屏渲染好的缓冲区转换为带样式的行，供可滚动的页面使用
///
/// 宽字符之后被占位的单元格会跳过；行尾未着背景色的空白会去掉
pub fn buffer_to_lines(buffer: &Buffer) -> Vec<Line<'static>> {
    let area = buffer.area;
    let mut lines = Vec::with_capacity(area.height as usize);

    for y in area.top()..area.bottom() {
        let cells: Vec<&Cell> = (area.left()..area.right()).map(|x| &buffer[(x, y)]).collect();
        let visible = cells
            .iter()
            .rposition(|cell| cell.symbol() != " " || !matches!(cell.bg, Color::Reset))
            .map_or(0, |last| last + 1);

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut current = String::new();
        let mut current_style = Style::default();
        let mut hidden = 0;
        for cell in &cells[..visible] {
            if hidden > 0 {
                hidden -= 1;
                continue;
            }
            let symbol = cell.symbol();
            hidden = Span::raw(symbol).width().saturating_sub(1);

            let style = cell.style();
            if style != current_style && !current.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut current), current_style));
            }
            current_style = style;
            current.push_str(symbol);
        }
        if !current.is_empty() {
            spans.push(Span::styled(current, current_style));
        }
        lines.push(Line::from(spans));
    }

    lines
}

/// 文本的终端显示宽度（宽字符占两列）
pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// 超过显示宽度时截断并以省略号结尾
pub fn fit_label(label: &str, width: usize) -> String {
    if display_width(label) <= width {
        return label.to_string();
    }

    let mut truncated = String::new();
    for c in label.chars() {
        let candidate = format!("{}{}", truncated, c);
        if display_width(&candidate) + 1 > width {
            break;
        }
        truncated = candidate;
    }
    format!("{}…", truncated)
}

/// 计算滚动百分比
pub fn scroll_percentage(offset: usize, total: usize, visible: usize) -> usize {
    if total > visible {
        ((offset as f64 / (total - visible) as f64) * 100.0).min(100.0) as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("red"), Color::Red);
        assert_eq!(parse_color("green"), Color::Green);
        assert_eq!(parse_color("light_blue"), Color::LightBlue);
        assert_eq!(parse_color("grey"), Color::Gray);
        assert_eq!(parse_color("invalid"), Color::White); // 默认颜色
        assert_eq!(parse_color("RED"), Color::Red); // 测试大小写不敏感
    }

    #[test]
    fn test_config_color_is_stable() {
        let palette = vec!["red".to_string(), "green".to_string()];
        let available = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(config_color(&palette, &available, "a"), Color::Red);
        assert_eq!(config_color(&palette, &available, "b"), Color::Green);
        // 调色板循环使用
        assert_eq!(config_color(&palette, &available, "c"), Color::Red);
        assert_eq!(config_color(&[], &available, "a"), Color::White);
    }

    #[test]
    fn test_buffer_to_lines_keeps_styles() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 8, 2));
        buffer.set_string(0, 0, "ab", Style::default().fg(Color::Red));
        buffer.set_string(2, 0, "cd", Style::default());

        let lines = buffer_to_lines(&buffer);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "abcd");
        assert_eq!(lines[0].spans.len(), 2);
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Red));
        assert_eq!(lines[1].to_string(), "");
    }

    #[test]
    fn test_buffer_to_lines_skips_wide_glyph_padding() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 6, 1));
        buffer.set_string(0, 0, "你好x", Style::default());

        let lines = buffer_to_lines(&buffer);
        assert_eq!(lines[0].to_string(), "你好x");
        assert_eq!(lines[0].width(), 5);
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("你好世界"), 8);
    }

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("cfg", 5), "cfg");
        assert_eq!(fit_label("configuration", 5), "conf…");
        assert_eq!(fit_label("abcde", 5), "abcde");
    }

    #[test]
    fn test_scroll_percentage() {
        assert_eq!(scroll_percentage(0, 10, 20), 0);
        assert_eq!(scroll_percentage(5, 20, 10), 50);
        assert_eq!(scroll_percentage(10, 20, 10), 100);
    }
}
