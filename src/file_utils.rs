use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{WalkDir, DirEntry};
use anyhow::Result;
use crate::models::ReportsConfig;

/// 一个结果目录下定位到的全部报告文件
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReportFiles {
    pub summary: Vec<PathBuf>, // 所有 *_report.json
    pub intent: Vec<PathBuf>,
    pub entity: Vec<PathBuf>,
    pub errors: Vec<PathBuf>,
}

/// 结果目录是否存在且为目录
pub fn results_folder_exists(root: &Path) -> bool {
    root.is_dir()
}

/// 遍历 `<root>/<configuration>/<file>`，收集文件名满足条件的报告路径
pub fn find_report_files<F>(root: &Path, matches: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&str) -> bool,
{
    // 检查目录是否存在
    if !root.exists() {
        anyhow::bail!("Results folder '{}' does not exist", root.display());
    }

    if !root.is_dir() {
        anyhow::bail!("'{}' is not a directory", root.display());
    }

    let mut report_files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .min_depth(2)
        .max_depth(2)
        .into_iter()
        .filter_map(Result::ok)             // 过滤掉错误条目
        .filter(|entry| is_report_file(entry, &matches)) // 保留符合条件的
        .map(|entry| entry.path().to_path_buf()) // 提取路径
        .collect();                          // 收集成 Vec

    // 文件系统遍历顺序不确定，按路径排序保证表格顺序稳定
    report_files.sort();

    Ok(report_files)
}

/// 检查条目是否为普通文件且文件名满足条件
fn is_report_file<F>(entry: &DirEntry, matches: &F) -> bool
where
    F: Fn(&str) -> bool,
{
    entry.file_type().is_file()
        && entry.file_name().to_str().map(matches).unwrap_or(false)
}

/// 从路径的父目录名中提取配置名（如 "gridresults/cfgA/intent_report.json" → "cfgA"）
pub fn config_name_from_path(path: &Path) -> Option<String> {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().to_string())
}

/// 从路径中提取配置名（带错误处理）
pub fn config_name_safe(path: &Path) -> Result<String> {
    config_name_from_path(path)
        .ok_or_else(|| anyhow::anyhow!("Failed to extract configuration name from path: {}", path.display()))
}

/// 汇总报告中出现过的配置名，去重并排序
pub fn discover_configurations(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| config_name_from_path(p))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 按配置中的命名规则定位意图、实体与错误报告
pub fn locate_reports(root: &Path, reports: &ReportsConfig) -> Result<ReportFiles> {
    let summary = find_report_files(root, |name| name.ends_with(&reports.report_suffix))?;

    let intent = summary
        .iter()
        .filter(|p| {
            p.file_name()
                .map(|name| name.to_string_lossy().contains(&reports.intent_report_marker))
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    // 按实体抽取器逐个收集，保持配置文件中给出的抽取器顺序
    let mut entity = Vec::new();
    for report_name in &reports.entity_reports {
        entity.extend(find_report_files(root, |name| name == report_name.as_str())?);
    }

    let errors = find_report_files(root, |name| name == reports.errors_file)?;

    Ok(ReportFiles {
        summary,
        intent,
        entity,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, config: &str, file: &str) -> PathBuf {
        let dir = root.join(config);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file);
        fs::write(&path, "{}").unwrap();
        path
    }

    #[test]
    fn test_config_name_from_path() {
        let path = Path::new("gridresults/cfgA/intent_report.json");
        assert_eq!(config_name_from_path(path), Some("cfgA".to_string()));

        // 没有父目录
        let path = Path::new("intent_report.json");
        assert_eq!(config_name_from_path(path), None);
    }

    #[test]
    fn test_config_name_safe() {
        let path = Path::new("/tmp/runs/diet-100/intent_errors.json");
        assert_eq!(config_name_safe(path).unwrap(), "diet-100");
        assert!(config_name_safe(Path::new("/")).is_err());
    }

    #[test]
    fn test_find_report_files_depth_and_order() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();

        touch(root, "cfgB", "intent_report.json");
        touch(root, "cfgA", "intent_report.json");
        touch(root, "cfgA", "notes.txt");
        // 根目录下的文件与更深层的文件都不算
        fs::write(root.join("intent_report.json"), "{}").unwrap();
        touch(&root.join("cfgA"), "nested", "intent_report.json");

        let result = find_report_files(root, |name| name.ends_with("_report.json")).unwrap();
        let configs: Vec<String> = result.iter().filter_map(|p| config_name_from_path(p)).collect();
        assert_eq!(configs, vec!["cfgA", "cfgB"]);
    }

    #[test]
    fn test_find_report_files_nonexistent_dir() {
        let result = find_report_files(Path::new("/nonexistent/directory"), |_| true);
        assert!(result.is_err());
        assert!(!results_folder_exists(Path::new("/nonexistent/directory")));
    }

    #[test]
    fn test_find_report_files_file_instead_of_dir() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("file.txt");
        fs::write(&file_path, "test").unwrap();

        assert!(find_report_files(&file_path, |_| true).is_err());
        assert!(!results_folder_exists(&file_path));
    }

    #[test]
    fn test_discover_configurations() {
        let paths = vec![
            PathBuf::from("r/cfgB/intent_report.json"),
            PathBuf::from("r/cfgA/intent_report.json"),
            PathBuf::from("r/cfgA/DIETClassifier_report.json"),
        ];
        assert_eq!(discover_configurations(&paths), vec!["cfgA", "cfgB"]);
    }

    #[test]
    fn test_locate_reports() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();

        touch(root, "cfgA", "intent_report.json");
        touch(root, "cfgB", "intent_report.json");
        touch(root, "cfgB", "DIETClassifier_report.json");
        touch(root, "cfgB", "CRFEntityExtractor_report.json");
        touch(root, "cfgB", "response_selection_report.json");
        touch(root, "cfgA", "intent_errors.json");

        let files = locate_reports(root, &ReportsConfig::default()).unwrap();
        assert_eq!(files.summary.len(), 5);
        assert_eq!(files.intent.len(), 2);
        assert_eq!(files.errors.len(), 1);

        // CRF 报告排在 DIET 报告之前
        let entity_names: Vec<String> = files
            .entity
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(entity_names, vec!["CRFEntityExtractor_report.json", "DIETClassifier_report.json"]);
    }
}
