use serde_json::{Map, Value};

/// 汇总报告中的一行指标，对应一个配置的加权平均结果
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub config: String, // 所属配置名（报告文件的父目录名）
    // ————————————————————————————————————————————————————————————————————————
    // 指标列表，保持报告中的字段顺序，例如 precision, recall, f1-score
    // ————————————————————————————————————————————————————————————————————————
    pub values: Vec<(String, f64)>,
}

impl MetricRow {
    pub fn new(config: impl Into<String>, values: Vec<(String, f64)>) -> Self {
        Self {
            config: config.into(),
            values,
        }
    }

    /// 为缺少实体报告的配置生成全零行
    pub fn zeros(config: impl Into<String>) -> Self {
        Self::new(
            config,
            ["precision", "recall", "f1-score"]
                .iter()
                .map(|name| (name.to_string(), 0.0))
                .collect(),
        )
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == metric)
            .map(|(_, value)| *value)
    }
}

/// 意图分类错误记录，字段集合由上游报告决定
#[derive(Debug, Clone, PartialEq)]
pub struct IntentErrorRow {
    pub config: String,
    pub fields: Map<String, Value>, // 原始字段 + 展平后的 intent_prediction
}

/// 长表中的一行：(配置, 指标名, 数值)
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub config: String,
    pub variable: String,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_row_zeros() {
        let row = MetricRow::zeros("cfgA");
        assert_eq!(row.config, "cfgA");
        assert_eq!(row.get("precision"), Some(0.0));
        assert_eq!(row.get("recall"), Some(0.0));
        assert_eq!(row.get("f1-score"), Some(0.0));
        assert_eq!(row.get("support"), None);
        assert_eq!(row.values.len(), 3);
    }

    #[test]
    fn test_metric_row_get_keeps_order() {
        let row = MetricRow::new(
            "cfgB",
            vec![("recall".to_string(), 0.8), ("precision".to_string(), 0.9)],
        );
        assert_eq!(row.get("precision"), Some(0.9));
        assert_eq!(row.values[0].0, "recall");
    }
}
