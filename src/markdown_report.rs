use crate::aggregation::ResultsData;
use crate::models::{LongRow, MetricTable, TextTable, ViewState};
use crate::models::utils::dedup_preserving_order;
use anyhow::Result;
use std::fmt::Write as FmtWrite;

/// 非交互模式下生成markdown汇总，内容与TUI页面一致
pub fn generate_report(state: &ViewState, data: &ResultsData) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "# Rasa GridResults Summary")?;
    writeln!(output)?;
    writeln!(output, "Quick Overview of Crossvalidated Runs")?;
    writeln!(output)?;

    let intent = data.intent.filter_configs(&state.selected_configs);
    write_summary_section(&mut output, "Intent Summary Overview", &intent, state.show_raw_data)?;

    let entity = data.entity.filter_configs(&state.selected_configs);
    write_summary_section(&mut output, "Entity Summary Overview", &entity, state.show_raw_data)?;

    if state.show_intent_errors {
        writeln!(output, "# Intent Errors Summary")?;
        writeln!(output)?;
        writeln!(output, "Overview of intent errors to quickly detect wrong labelling.")?;
        writeln!(output)?;

        for config in &state.selected_configs {
            writeln!(output, "## {}", config)?;
            writeln!(output)?;
            let rows = data.errors_for_config(config);
            if rows.is_empty() {
                writeln!(output, "_No intent errors_")?;
            } else {
                writeln!(output, "{}", TextTable::from_error_rows(&rows).to_markdown())?;
            }
            writeln!(output)?;
        }
    }

    Ok(output)
}

/// 每个指标一张 config | value 表，对应图中的一个分面
fn write_summary_section(output: &mut String, title: &str, table: &MetricTable, show_raw: bool) -> Result<()> {
    writeln!(output, "## {}", title)?;
    writeln!(output)?;

    let long_rows = table.melt();
    if long_rows.is_empty() {
        writeln!(output, "_No data for the selected configurations_")?;
        writeln!(output)?;
    }

    for variable in dedup_preserving_order(long_rows.iter().map(|row| row.variable.clone())) {
        writeln!(output, "### {}", variable)?;
        writeln!(output)?;
        writeln!(output, "{}", facet_table(&long_rows, &variable).to_markdown())?;
        writeln!(output)?;
    }

    if show_raw {
        writeln!(output, "### Raw Data")?;
        writeln!(output)?;
        writeln!(output, "{}", table.to_text_table().to_markdown())?;
        writeln!(output)?;
    }

    Ok(())
}

fn facet_table(long_rows: &[LongRow], variable: &str) -> TextTable {
    TextTable {
        headers: vec!["config".to_string(), "value".to_string()],
        rows: long_rows
            .iter()
            .filter(|row| row.variable == variable)
            .map(|row| vec![row.config.as_str().into(), row.value.into()])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IntentErrorRow, MetricRow};
    use serde_json::json;

    fn sample_data() -> ResultsData {
        let mut fields = serde_json::Map::new();
        fields.insert("text".to_string(), json!("hi"));
        fields.insert("intent_prediction".to_string(), json!("greet"));

        ResultsData {
            intent: MetricTable::new(vec![
                MetricRow::new("cfgA", vec![("precision".to_string(), 0.9), ("recall".to_string(), 0.8)]),
                MetricRow::new("cfgB", vec![("precision".to_string(), 0.7), ("recall".to_string(), 0.6)]),
            ]),
            entity: MetricTable::new(vec![MetricRow::zeros("cfgA"), MetricRow::zeros("cfgB")]),
            errors: vec![IntentErrorRow {
                config: "cfgB".to_string(),
                fields,
            }],
            configurations: vec!["cfgA".to_string(), "cfgB".to_string()],
        }
    }

    #[test]
    fn test_generate_report_sections() {
        let data = sample_data();
        let mut state = ViewState::new("gridresults");
        state.sync_selection(&data.possible_configs());

        let report = generate_report(&state, &data).unwrap();
        assert!(report.starts_with("# Rasa GridResults Summary"));
        assert!(report.contains("## Intent Summary Overview"));
        assert!(report.contains("## Entity Summary Overview"));
        assert!(report.contains("| cfgA   | 0.900000 |"));
        assert!(!report.contains("Raw Data"));
        assert!(!report.contains("Intent Errors Summary"));
    }

    #[test]
    fn test_generate_report_respects_selection() {
        let data = sample_data();
        let mut state = ViewState::new("gridresults");
        state.sync_selection(&data.possible_configs());
        state.toggle_config("cfgA");
        state.toggle_raw_data();
        state.toggle_intent_errors();

        let report = generate_report(&state, &data).unwrap();
        assert!(!report.contains("cfgA"));
        assert!(report.contains("### Raw Data"));
        assert!(report.contains("## cfgB"));
        assert!(report.contains("| hi   | greet             |"));
    }
}
