use serde::{Deserialize, Deserializer};

/// 反序列化可选字符串，将空字符串转换为None
///
/// # 参数
/// - `deserializer`: 用于反序列化的serde反序列化器
///
/// # 返回值
/// 反序列化后的可选字符串，如果原字符串为空则返回None
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.is_empty()))
}

/// 按首次出现的顺序去重
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_yaml;

    #[derive(Debug, Deserialize)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        field: Option<String>,
    }

    #[test]
    fn test_deserialize_optional_string_with_content() {
        let yaml = "field: results.log";
        let test: TestStruct = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(test.field, Some("results.log".to_string()));
    }

    #[test]
    fn test_deserialize_optional_string_with_empty() {
        let yaml = "field: ''";
        let test: TestStruct = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(test.field, None);
    }

    #[test]
    fn test_deserialize_optional_string_with_missing() {
        let test: TestStruct = toml::from_str("").unwrap();
        assert_eq!(test.field, None);
    }

    #[test]
    fn test_dedup_preserving_order() {
        let items = vec!["b", "a", "b", "c", "a"].into_iter().map(String::from);
        assert_eq!(dedup_preserving_order(items), vec!["b", "a", "c"]);
    }
}
