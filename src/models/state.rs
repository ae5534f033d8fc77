use crate::models::utils::dedup_preserving_order;

/// 界面状态：结果目录、已选配置和各个开关
///
/// 渲染函数只读取这个结构，任何控件变化都会触发整页重新渲染
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub results_folder: String,
    pub selected_configs: Vec<String>, // 按选择顺序排列
    pub show_raw_data: bool,
    pub show_markdown: bool,
    pub show_intent_errors: bool,
    selection_folder: Option<String>, // 当前选择集对应的目录，目录变化时重置为全选
    known_configs: Vec<String>,       // 上次同步时可用的配置，用于识别新出现的配置
    initial_selection: Option<Vec<String>>, // 命令行给出的初始选择，首次加载时生效
}

impl ViewState {
    pub fn new(results_folder: impl Into<String>) -> Self {
        Self {
            results_folder: results_folder.into(),
            selected_configs: Vec::new(),
            show_raw_data: false,
            show_markdown: false,
            show_intent_errors: false,
            selection_folder: None,
            known_configs: Vec::new(),
            initial_selection: None,
        }
    }

    /// 指定首次加载时的选择集（按给出的顺序）；空列表表示全选
    pub fn preselect(&mut self, configs: Vec<String>) {
        self.initial_selection = (!configs.is_empty()).then_some(configs);
    }

    /// 修改结果目录，返回目录是否发生变化
    pub fn set_results_folder(&mut self, folder: impl Into<String>) -> bool {
        let folder = folder.into();
        if folder == self.results_folder {
            return false;
        }
        self.results_folder = folder;
        true
    }

    /// 根据当前目录可用的配置同步选择集
    ///
    /// 首次加载某个目录时默认全选（有初始选择时取其与可用配置的交集）；
    /// 同一目录重新加载后移除已不存在的配置，并选中新出现的配置
    pub fn sync_selection(&mut self, available: &[String]) {
        if self.selection_folder.as_deref() != Some(self.results_folder.as_str()) {
            self.selected_configs = match self.initial_selection.take() {
                Some(initial) => {
                    let (known, unknown): (Vec<String>, Vec<String>) =
                        initial.into_iter().partition(|c| available.contains(c));
                    if !unknown.is_empty() {
                        tracing::warn!("Ignoring unknown configurations: {:?}", unknown);
                    }
                    dedup_preserving_order(known)
                }
                None => available.to_vec(),
            };
            self.selection_folder = Some(self.results_folder.clone());
        } else {
            self.selected_configs.retain(|c| available.contains(c));
            for config in available {
                if !self.known_configs.contains(config) && !self.is_selected(config) {
                    self.selected_configs.push(config.clone());
                }
            }
        }
        self.known_configs = available.to_vec();
    }

    /// 目录不存在时清空选择
    pub fn clear_selection(&mut self) {
        self.selected_configs.clear();
        self.selection_folder = None;
        self.known_configs.clear();
    }

    pub fn is_selected(&self, config: &str) -> bool {
        self.selected_configs.iter().any(|c| c == config)
    }

    pub fn toggle_config(&mut self, config: &str) {
        if let Some(pos) = self.selected_configs.iter().position(|c| c == config) {
            self.selected_configs.remove(pos);
        } else {
            self.selected_configs.push(config.to_string());
        }
    }

    /// 全部已选时清空，否则全选
    pub fn toggle_all(&mut self, available: &[String]) {
        if available.iter().all(|c| self.is_selected(c)) {
            self.selected_configs.clear();
        } else {
            self.selected_configs = available.to_vec();
        }
    }

    pub fn toggle_raw_data(&mut self) {
        self.show_raw_data = !self.show_raw_data;
    }

    pub fn toggle_markdown(&mut self) {
        self.show_markdown = !self.show_markdown;
    }

    pub fn toggle_intent_errors(&mut self) {
        self.show_intent_errors = !self.show_intent_errors;
    }

    /// markdown开关只在显示原始数据时生效
    pub fn raw_as_markdown(&self) -> bool {
        self.show_raw_data && self.show_markdown
    }
}
