// src/report_parser.rs
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use crate::file_utils::config_name_safe;
use crate::models::{IntentErrorRow, MetricRow, ReportsConfig};

// ————————————————————————————————————————————————————————————————————————
// 读取并解析单个JSON文件
// ————————————————————————————————————————————————————————————————————————
fn read_json(file_path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read report file: {}", file_path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON from file: {}", file_path.display()))
}

/// 解析汇总报告，只保留键名包含 summary_key（默认 "weighted avg"）的条目
///
/// 报告顶层是 标签名 → 指标记录 的映射。被丢弃的字段（默认 support）不会出现在结果中，
/// 每一行都带上报告所在目录的配置名。没有匹配的键时返回空列表。
pub fn read_summary_report(file_path: &Path, reports: &ReportsConfig) -> Result<Vec<MetricRow>> {
    let config = config_name_safe(file_path)?;
    let blob = read_json(file_path)?;

    let entries = blob
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("Expected a JSON object at the top of {}", file_path.display()))?;

    let mut rows = Vec::new();
    for (key, record) in entries {
        if !key.contains(&reports.summary_key) {
            continue;
        }

        let record = record.as_object().ok_or_else(|| {
            anyhow::anyhow!("Entry '{}' in {} is not an object", key, file_path.display())
        })?;

        rows.push(MetricRow::new(config.clone(), metric_values(record, &reports.dropped_fields)));
    }

    if rows.is_empty() {
        tracing::debug!("No '{}' entry in {}", reports.summary_key, file_path.display());
    }

    Ok(rows)
}

/// 提取数值字段作为指标，跳过被丢弃的字段
fn metric_values(record: &Map<String, Value>, dropped_fields: &[String]) -> Vec<(String, f64)> {
    record
        .iter()
        .filter(|(name, _)| !dropped_fields.contains(*name))
        .filter_map(|(name, value)| value.as_f64().map(|v| (name.clone(), v)))
        .collect()
}

/// 批量解析多个汇总报告，按输入顺序拼接
pub fn read_summary_reports(file_paths: &[PathBuf], reports: &ReportsConfig) -> Result<Vec<MetricRow>> {
    let mut rows = Vec::new();
    for path in file_paths {
        rows.extend(read_summary_report(path, reports)?);
    }
    Ok(rows)
}

/// 解析意图错误日志
///
/// 每条记录的 `intent_prediction` 对象被替换为其中的 `name` 字符串，
/// 其余字段保持原样；预测对象的其他字段（如 confidence）不保留。
pub fn read_intent_errors(file_path: &Path) -> Result<Vec<IntentErrorRow>> {
    let config = config_name_safe(file_path)?;
    let blob = read_json(file_path)?;

    let records = blob
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("Expected a JSON array at the top of {}", file_path.display()))?;

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            flatten_error_record(record)
                .with_context(|| format!("Invalid record #{} in {}", i, file_path.display()))
                .map(|fields| IntentErrorRow {
                    config: config.clone(),
                    fields,
                })
        })
        .collect()
}

// ————————————————————————————————————————————————————————————————————————
// 展平单条错误记录：intent_prediction { name, ... } → intent_prediction: name
// ————————————————————————————————————————————————————————————————————————
fn flatten_error_record(record: &Value) -> Result<Map<String, Value>> {
    let record = record
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("record is not an object"))?;

    let predicted_name = record
        .get("intent_prediction")
        .and_then(|prediction| prediction.get("name"))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("missing 'intent_prediction.name'"))?;

    let mut fields: Map<String, Value> = record
        .iter()
        .filter(|(key, _)| key.as_str() != "intent_prediction")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    fields.insert("intent_prediction".to_string(), predicted_name);

    Ok(fields)
}

/// 批量解析多个错误日志
pub fn read_intent_error_files(file_paths: &[PathBuf]) -> Result<Vec<IntentErrorRow>> {
    let mut rows = Vec::new();
    for path in file_paths {
        rows.extend(read_intent_errors(path)?);
    }
    Ok(rows)
}
