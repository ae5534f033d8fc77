use serde::Deserialize;

/// 应用程序配置结构
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub reports: ReportsConfig,
    pub tui: TuiConfig,
    pub keybindings: KeybindingsConfig,
}

/// 通用配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub results_folder: String,
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64, // 0 表示缓存永不过期
    #[serde(deserialize_with = "crate::models::utils::deserialize_optional_string")]
    pub log_file: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            results_folder: "gridresults".to_string(),
            cache_enabled: true,
            cache_ttl_secs: 0,
            log_file: None,
        }
    }
}

/// 报告文件命名与解析配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportsConfig {
    pub report_suffix: String,
    pub intent_report_marker: String,
    pub entity_reports: Vec<String>,
    pub errors_file: String,
    pub summary_key: String,
    pub dropped_fields: Vec<String>,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            report_suffix: "_report.json".to_string(),
            intent_report_marker: "intent_report".to_string(),
            entity_reports: vec![
                "CRFEntityExtractor_report.json".to_string(),
                "DIETClassifier_report.json".to_string(),
            ],
            errors_file: "intent_errors.json".to_string(),
            summary_key: "weighted avg".to_string(),
            dropped_fields: vec!["support".to_string()],
        }
    }
}

/// TUI界面配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TuiConfig {
    pub tick_rate_ms: u64,
    pub sidebar_width: u16, // 侧边栏宽度（百分比）
    pub bar_width: usize,   // 柱状图最大字符宽度
    pub palette: Vec<String>,
    pub show_help_bar: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            sidebar_width: 30,
            bar_width: 40,
            palette: ["blue", "light_red", "green", "yellow", "magenta", "cyan", "light_blue", "light_green"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            show_help_bar: true,
        }
    }
}

/// 键盘绑定配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub up: String,
    pub down: String,
    pub toggle: String,
    pub edit: String,
    pub select_all: String,
    pub reload: String,
    pub reload_all: String, // 清空全部缓存后重新读取
    pub scroll_up: String,
    pub scroll_down: String,
    pub quit: String,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            up: "k".to_string(),
            down: "j".to_string(),
            toggle: "space".to_string(),
            edit: "e".to_string(),
            select_all: "a".to_string(),
            reload: "r".to_string(),
            reload_all: "R".to_string(),
            scroll_up: "u".to_string(),
            scroll_down: "d".to_string(),
            quit: "q".to_string(),
        }
    }
}
