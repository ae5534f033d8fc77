use crate::aggregation::{FolderStatus, ResultsCache};
use crate::models::{Config, ViewState};
use crate::tui::input::UserAction;
use crate::tui::page::{LoadOutcome, render_page};
use ratatui::text::Line;
use std::path::Path;

/// 侧边栏中的一个控件
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarItem {
    ResultsFolder,
    ConfigOption(String),
    ShowRawData,
    ShowMarkdown,
    ShowIntentErrors,
}

/// 输入模式：普通导航或编辑结果目录
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    EditingFolder,
}

/// TUI应用主结构
pub struct App {
    pub config: Config,
    pub state: ViewState,
    pub outcome: LoadOutcome,
    pub input_mode: InputMode,
    pub folder_input: String,  // 编辑中的结果目录文本
    pub sidebar_cursor: usize, // 当前选中的侧边栏控件索引
    pub sidebar_scroll_offset: usize,
    pub page_cache: Vec<Line<'static>>, // 整页内容缓存，每次状态变化后重建
    pub page_scroll_offset: usize,
    pub page_height: usize, // 上次绘制时页面区域的可见行数
    pub should_quit: bool,
    cache: ResultsCache,
}

impl App {
    pub fn new(config: Config, state: ViewState) -> Self {
        let cache = ResultsCache::new(&config.general, config.reports.clone());
        let folder_input = state.results_folder.clone();
        let mut app = Self {
            config,
            state,
            outcome: LoadOutcome::Missing,
            input_mode: InputMode::Normal,
            folder_input,
            sidebar_cursor: 0,
            sidebar_scroll_offset: 0,
            page_cache: Vec::new(),
            page_scroll_offset: 0,
            page_height: 0,
            should_quit: false,
            cache,
        };
        // 初始化页面内容
        app.refresh();
        app
    }

    /// 处理退出操作
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// 重新计算整页：读取（或命中缓存）结果目录，同步选择集，重建页面
    pub fn refresh(&mut self) {
        let folder = self.state.results_folder.clone();
        self.outcome = match self.cache.get_or_load(Path::new(&folder)) {
            Ok(FolderStatus::Missing) => {
                tracing::warn!("Results folder {} does not exist", folder);
                self.state.clear_selection();
                LoadOutcome::Missing
            }
            Ok(FolderStatus::Loaded(data)) => {
                self.state.sync_selection(&data.possible_configs());
                LoadOutcome::Loaded(data)
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {:#}", folder, e);
                self.state.clear_selection();
                LoadOutcome::Failed(format!("{:#}", e))
            }
        };

        self.page_cache = render_page(&self.state, &self.outcome, &self.config.tui);
        self.clamp_cursor();
        self.clamp_page_scroll();
    }

    /// 当前可见的侧边栏控件列表
    pub fn sidebar_items(&self) -> Vec<SidebarItem> {
        let mut items = vec![SidebarItem::ResultsFolder];
        items.extend(
            self.outcome
                .possible_configs()
                .into_iter()
                .map(SidebarItem::ConfigOption),
        );
        items.push(SidebarItem::ShowRawData);
        // markdown开关只在显示原始数据时出现
        if self.state.show_raw_data {
            items.push(SidebarItem::ShowMarkdown);
        }
        items.push(SidebarItem::ShowIntentErrors);
        items
    }

    pub fn selected_item(&self) -> Option<SidebarItem> {
        self.sidebar_items().into_iter().nth(self.sidebar_cursor)
    }

    /// 处理用户操作；任何改变状态的操作都会触发整页重新渲染
    pub fn handle_action(&mut self, action: UserAction) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_action(action),
            InputMode::EditingFolder => self.handle_editing_action(action),
        }
    }

    fn handle_normal_action(&mut self, action: UserAction) {
        match action {
            UserAction::Quit => self.quit(),
            UserAction::MoveUp => {
                self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1);
            }
            UserAction::MoveDown => {
                self.sidebar_cursor = self.sidebar_cursor.saturating_add(1);
                self.clamp_cursor();
            }
            UserAction::ScrollPageUp => {
                self.page_scroll_offset = self.page_scroll_offset.saturating_sub(self.scroll_step());
            }
            UserAction::ScrollPageDown => {
                self.page_scroll_offset = self.page_scroll_offset.saturating_add(self.scroll_step());
                self.clamp_page_scroll();
            }
            UserAction::Edit => self.start_editing(),
            UserAction::Toggle => self.toggle_selected_item(),
            UserAction::SelectAll => {
                let available = self.outcome.possible_configs();
                self.state.toggle_all(&available);
                self.refresh();
            }
            UserAction::Reload => {
                self.cache.invalidate(Path::new(&self.state.results_folder));
                self.refresh();
            }
            UserAction::ReloadAll => {
                self.cache.clear();
                self.refresh();
            }
            _ => {}
        }
    }

    fn handle_editing_action(&mut self, action: UserAction) {
        match action {
            UserAction::InputChar(c) => self.folder_input.push(c),
            UserAction::Backspace => {
                self.folder_input.pop();
            }
            UserAction::Submit => {
                self.input_mode = InputMode::Normal;
                let folder = self.folder_input.trim().to_string();
                if self.state.set_results_folder(folder) {
                    self.page_scroll_offset = 0;
                }
                self.refresh();
            }
            UserAction::Cancel => {
                self.input_mode = InputMode::Normal;
                self.folder_input = self.state.results_folder.clone();
            }
            _ => {}
        }
    }

    fn start_editing(&mut self) {
        self.input_mode = InputMode::EditingFolder;
        self.folder_input = self.state.results_folder.clone();
        self.sidebar_cursor = 0;
    }

    fn toggle_selected_item(&mut self) {
        match self.selected_item() {
            Some(SidebarItem::ResultsFolder) => self.start_editing(),
            Some(SidebarItem::ConfigOption(config)) => {
                self.state.toggle_config(&config);
                self.refresh();
            }
            Some(SidebarItem::ShowRawData) => {
                self.state.toggle_raw_data();
                self.refresh();
            }
            Some(SidebarItem::ShowMarkdown) => {
                self.state.toggle_markdown();
                self.refresh();
            }
            Some(SidebarItem::ShowIntentErrors) => {
                self.state.toggle_intent_errors();
                self.refresh();
            }
            None => {}
        }
    }

    fn scroll_step(&self) -> usize {
        (self.page_height / 2).max(1)
    }

    fn clamp_cursor(&mut self) {
        let max_index = self.sidebar_items().len().saturating_sub(1);
        self.sidebar_cursor = self.sidebar_cursor.min(max_index);
    }

    /// 根据页面高度限制滚动偏移
    pub fn clamp_page_scroll(&mut self) {
        let max_offset = self.page_cache.len().saturating_sub(self.page_height);
        self.page_scroll_offset = self.page_scroll_offset.min(max_offset);
    }

    /// 绘制时更新可见高度
    pub fn set_page_height(&mut self, height: usize) {
        if self.page_height != height {
            self.page_height = height;
            self.clamp_page_scroll();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn write_report(root: &Path, config: &str, file: &str, content: Value) {
        let dir = root.join(config);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), content.to_string()).unwrap();
    }

    fn weighted(p: f64) -> Value {
        json!({"weighted avg": {"precision": p, "recall": p, "f1-score": p, "support": 5}})
    }

    fn create_test_app() -> (TempDir, App) {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        write_report(root, "cfgA", "intent_report.json", weighted(0.9));
        write_report(root, "cfgB", "intent_report.json", weighted(0.7));
        write_report(root, "cfgB", "DIETClassifier_report.json", weighted(0.5));
        write_report(
            root,
            "cfgA",
            "intent_errors.json",
            json!([{"text": "hi", "intent_prediction": {"name": "greet", "confidence": 0.4}}]),
        );

        let state = ViewState::new(root.to_string_lossy().to_string());
        let app = App::new(Config::default(), state);
        (temp_dir, app)
    }

    fn page_text(app: &App) -> Vec<String> {
        app.page_cache.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_app_quit() {
        let (_dir, mut app) = create_test_app();
        assert!(!app.should_quit);
        app.handle_action(UserAction::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_initial_load_selects_all_configs() {
        let (_dir, app) = create_test_app();
        assert_eq!(app.state.selected_configs, vec!["cfgA", "cfgB"]);
        assert!(matches!(app.outcome, LoadOutcome::Loaded(_)));
        assert_eq!(
            app.sidebar_items(),
            vec![
                SidebarItem::ResultsFolder,
                SidebarItem::ConfigOption("cfgA".to_string()),
                SidebarItem::ConfigOption("cfgB".to_string()),
                SidebarItem::ShowRawData,
                SidebarItem::ShowIntentErrors,
            ]
        );
    }

    #[test]
    fn test_toggle_config_rerenders_page() {
        let (_dir, mut app) = create_test_app();
        app.handle_action(UserAction::MoveDown); // cfgA
        app.handle_action(UserAction::Toggle);

        assert_eq!(app.state.selected_configs, vec!["cfgB"]);
        assert!(!page_text(&app).iter().any(|l| l.contains("cfgA")));
    }

    #[test]
    fn test_markdown_toggle_appears_with_raw_data() {
        let (_dir, mut app) = create_test_app();
        for _ in 0..3 {
            app.handle_action(UserAction::MoveDown);
        }
        assert_eq!(app.selected_item(), Some(SidebarItem::ShowRawData));
        app.handle_action(UserAction::Toggle);
        assert!(app.state.show_raw_data);
        assert!(app.sidebar_items().contains(&SidebarItem::ShowMarkdown));

        app.handle_action(UserAction::MoveDown);
        app.handle_action(UserAction::Toggle);
        assert!(app.state.raw_as_markdown());
        assert!(page_text(&app).iter().any(|l| l.starts_with("| precision")));
    }

    #[test]
    fn test_intent_errors_toggle() {
        let (_dir, mut app) = create_test_app();
        for _ in 0..10 {
            app.handle_action(UserAction::MoveDown);
        }
        assert_eq!(app.selected_item(), Some(SidebarItem::ShowIntentErrors));
        app.handle_action(UserAction::Toggle);

        let page = page_text(&app);
        assert!(page.iter().any(|l| l == "Intent Errors Summary"));
        assert!(page.iter().any(|l| l.contains("greet")));
        assert!(!page.iter().any(|l| l.contains("confidence")));
    }

    #[test]
    fn test_edit_folder_to_missing_shows_warning() {
        let (_dir, mut app) = create_test_app();
        app.handle_action(UserAction::Edit);
        assert_eq!(app.input_mode, InputMode::EditingFolder);

        app.folder_input.clear();
        for c in "does-not-exist".chars() {
            app.handle_action(UserAction::InputChar(c));
        }
        app.handle_action(UserAction::Submit);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.state.results_folder, "does-not-exist");
        assert!(matches!(app.outcome, LoadOutcome::Missing));
        assert!(app.state.selected_configs.is_empty());
        assert!(page_text(&app).iter().any(|l| l.contains("Are you sure this results folder")));
    }

    #[test]
    fn test_edit_cancel_keeps_folder() {
        let (_dir, mut app) = create_test_app();
        let folder = app.state.results_folder.clone();
        app.handle_action(UserAction::Edit);
        app.handle_action(UserAction::Backspace);
        app.handle_action(UserAction::Cancel);
        assert_eq!(app.state.results_folder, folder);
        assert_eq!(app.folder_input, folder);
    }

    #[test]
    fn test_reload_picks_up_new_reports() {
        let (dir, mut app) = create_test_app();
        write_report(dir.path(), "cfgC", "intent_report.json", weighted(0.2));

        // 目录未变化时命中缓存
        app.refresh();
        assert_eq!(app.outcome.possible_configs(), vec!["cfgA", "cfgB"]);

        app.handle_action(UserAction::Reload);
        assert_eq!(app.outcome.possible_configs(), vec!["cfgA", "cfgB", "cfgC"]);
        assert_eq!(app.state.selected_configs, vec!["cfgA", "cfgB", "cfgC"]);
    }

    #[test]
    fn test_reload_all_clears_every_cached_folder() {
        let (dir, mut app) = create_test_app();
        let first = dir.path().to_string_lossy().to_string();

        let other = tempdir().unwrap();
        write_report(other.path(), "cfgX", "intent_report.json", weighted(0.3));
        app.handle_action(UserAction::Edit);
        app.folder_input = other.path().to_string_lossy().to_string();
        app.handle_action(UserAction::Submit);
        assert_eq!(app.outcome.possible_configs(), vec!["cfgX"]);

        // 两个目录都有了新报告；清空缓存后切回第一个目录能看到变化
        write_report(dir.path(), "cfgC", "intent_report.json", weighted(0.2));
        write_report(other.path(), "cfgY", "intent_report.json", weighted(0.2));
        app.handle_action(UserAction::ReloadAll);
        assert_eq!(app.outcome.possible_configs(), vec!["cfgX", "cfgY"]);

        app.handle_action(UserAction::Edit);
        app.folder_input = first;
        app.handle_action(UserAction::Submit);
        assert_eq!(app.outcome.possible_configs(), vec!["cfgA", "cfgB", "cfgC"]);
    }

    #[test]
    fn test_reload_keeps_unchecked_configs_unchecked() {
        let (dir, mut app) = create_test_app();
        app.handle_action(UserAction::MoveDown); // cfgA
        app.handle_action(UserAction::Toggle);
        write_report(dir.path(), "cfgC", "intent_report.json", weighted(0.2));

        app.handle_action(UserAction::Reload);
        assert_eq!(app.state.selected_configs, vec!["cfgB", "cfgC"]);
    }

    #[test]
    fn test_initial_selection_from_command_line() {
        let (dir, _) = create_test_app();
        let mut state = ViewState::new(dir.path().to_string_lossy().to_string());
        state.preselect(vec!["cfgB".to_string(), "cfgZ".to_string()]);

        let app = App::new(Config::default(), state);
        assert_eq!(app.state.selected_configs, vec!["cfgB"]);
        assert!(!page_text(&app).iter().any(|l| l.contains("cfgA")));

        // 侧边栏仍然列出全部配置
        assert!(app.sidebar_items().contains(&SidebarItem::ConfigOption("cfgA".to_string())));
    }

    #[test]
    fn test_page_scroll_is_clamped() {
        let (_dir, mut app) = create_test_app();
        app.set_page_height(5);
        for _ in 0..100 {
            app.handle_action(UserAction::ScrollPageDown);
        }
        assert_eq!(app.page_scroll_offset, app.page_cache.len() - 5);
        app.handle_action(UserAction::ScrollPageUp);
        assert!(app.page_scroll_offset < app.page_cache.len() - 5);
    }
}
