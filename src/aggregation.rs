// src/aggregation.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::Result;
use crate::file_utils::{discover_configurations, locate_reports, results_folder_exists};
use crate::models::{GeneralConfig, IntentErrorRow, MetricRow, MetricTable, ReportsConfig};
use crate::report_parser::{read_intent_error_files, read_summary_reports};

/// 一个结果目录聚合后的全部数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsData {
    pub intent: MetricTable,
    pub entity: MetricTable,
    pub errors: Vec<IntentErrorRow>,
    // ————————————————————————————————————————————————————————————————————————
    // 所有 *_report.json 中出现过的配置名（已排序）
    // ————————————————————————————————————————————————————————————————————————
    pub configurations: Vec<String>,
}

impl ResultsData {
    /// 可供选择的配置：意图表中出现的配置，按表顺序去重
    pub fn possible_configs(&self) -> Vec<String> {
        self.intent.configs()
    }

    /// 某个配置的全部意图错误记录
    pub fn errors_for_config(&self, config: &str) -> Vec<&IntentErrorRow> {
        self.errors.iter().filter(|row| row.config == config).collect()
    }
}

/// 为缺失的配置补上全零行
///
/// 对同一个配置集合重复调用结果不变；已有的行（包括同一配置的多行）保持原样
pub fn add_zeros(mut table: MetricTable, all_configs: &[String]) -> MetricTable {
    for config in all_configs {
        if !table.contains_config(config) {
            table.rows.push(MetricRow::zeros(config.clone()));
        }
    }
    table
}

/// 读取结果目录并聚合为意图表、实体表与错误表
pub fn load_results(root: &Path, reports: &ReportsConfig) -> Result<ResultsData> {
    let files = locate_reports(root, reports)?;
    let configurations = discover_configurations(&files.summary);

    let intent = MetricTable::new(read_summary_reports(&files.intent, reports)?);
    let entity = add_zeros(
        MetricTable::new(read_summary_reports(&files.entity, reports)?),
        &configurations,
    );
    let errors = read_intent_error_files(&files.errors)?;

    if intent.is_empty() {
        tracing::warn!("No intent reports found under {}", root.display());
    }
    tracing::info!(
        "Loaded {} configurations from {} ({} intent rows, {} entity rows, {} intent errors)",
        configurations.len(),
        root.display(),
        intent.len(),
        entity.len(),
        errors.len()
    );

    Ok(ResultsData {
        intent,
        entity,
        errors,
        configurations,
    })
}

/// 结果目录的加载状态
#[derive(Debug, Clone)]
pub enum FolderStatus {
    Missing,
    Loaded(Arc<ResultsData>),
}

struct CacheEntry {
    data: Arc<ResultsData>,
    loaded_at: Instant,
}

/// 以目录路径为键的加载缓存
///
/// 只缓存成功的加载结果；支持手动失效和按 TTL 失效
pub struct ResultsCache {
    entries: HashMap<PathBuf, CacheEntry>,
    reports: ReportsConfig,
    enabled: bool,
    ttl: Option<Duration>,
}

impl ResultsCache {
    pub fn new(general: &GeneralConfig, reports: ReportsConfig) -> Self {
        let ttl = (general.cache_ttl_secs > 0).then(|| Duration::from_secs(general.cache_ttl_secs));
        Self {
            entries: HashMap::new(),
            reports,
            enabled: general.cache_enabled,
            ttl,
        }
    }

    /// 获取目录数据，缓存未命中时从磁盘读取
    pub fn get_or_load(&mut self, folder: &Path) -> Result<FolderStatus> {
        if !results_folder_exists(folder) {
            self.entries.remove(folder);
            return Ok(FolderStatus::Missing);
        }

        if let Some(entry) = self.entries.get(folder) {
            if self.is_fresh(entry) {
                tracing::debug!("Cache hit for {}", folder.display());
                return Ok(FolderStatus::Loaded(Arc::clone(&entry.data)));
            }
        }

        tracing::debug!("Cache miss for {}", folder.display());
        let data = Arc::new(load_results(folder, &self.reports)?);
        if self.enabled {
            self.entries.insert(
                folder.to_path_buf(),
                CacheEntry {
                    data: Arc::clone(&data),
                    loaded_at: Instant::now(),
                },
            );
            tracing::debug!("{} result folders cached", self.len());
        }
        Ok(FolderStatus::Loaded(data))
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        match self.ttl {
            Some(ttl) => entry.loaded_at.elapsed() < ttl,
            None => true,
        }
    }

    /// 清空所有目录的缓存
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::info!("Cleared {} cached result folders", self.entries.len());
        }
        self.entries.clear();
    }

    /// 使某个目录的缓存失效
    pub fn invalidate(&mut self, folder: &Path) {
        if self.entries.remove(folder).is_some() {
            tracing::info!("Invalidated cached results for {}", folder.display());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
