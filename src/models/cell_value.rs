use serde_json::Value as JsonValue;
use std::fmt;

/// 表格单元格的值类型，用于原始数据表与错误表的展示
#[derive(Clone, PartialEq)]
pub enum CellValue {
    String(String), // 字符串
    Float(f64),     // 浮点数
    Int(i64),       // 整数
    Bool(bool),     // 布尔值
    Empty,          // 缺失或null
    // ————————————————————————————————————————————————————————————————————————
    // 嵌套的数组或对象，以紧凑JSON形式展示
    // ————————————————————————————————————————————————————————————————————————
    Nested(String),
}

impl CellValue {
    pub fn to_string_repr(&self) -> String {
        match self {
            CellValue::String(s) => s.clone(),
            CellValue::Float(n) => format!("{:.6}", n),
            CellValue::Int(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
            CellValue::Nested(s) => s.clone(),
        }
    }
}

/// 为CellValue实现Debug trait，使用Display的格式
impl fmt::Debug for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_repr())
    }
}

impl From<&JsonValue> for CellValue {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => CellValue::Empty,
            JsonValue::Bool(b) => CellValue::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    CellValue::Float(f)
                } else {
                    CellValue::String(n.to_string())
                }
            }
            JsonValue::String(s) => CellValue::String(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => CellValue::Nested(value.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}
