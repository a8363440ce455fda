// ==========================================
// OEE 驾驶舱 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析 → 原始行 (表头 → 字符串值)
// 支持: CSV (.csv) / JSON (.json, 扁平对象数组)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始行
pub type RawRecord = HashMap<String, String>;

/// 文件解析器接口
///
/// 返回 (源行号, 原始行); 完全空白的行不返回, 但不影响后续行号
pub trait FileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<(usize, RawRecord)>>;
}

fn check_file(path: &Path, expected_ext: &str) -> ImportResult<()> {
    // 检查文件存在
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    // 检查扩展名
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ext.eq_ignore_ascii_case(expected_ext) {
        return Err(ImportError::UnsupportedFormat(ext.to_string()));
    }

    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<(usize, RawRecord)>> {
        check_file(file_path, "csv")?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            // 表头占第 1 行
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push((row_number, row_map));
        }

        Ok(records)
    }
}

// ==========================================
// JSON Parser 实现
// ==========================================
// 数字/布尔转为字符串, 数组按 ';' 拼接, null 视为空
pub struct JsonParser;

impl FileParser for JsonParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<(usize, RawRecord)>> {
        check_file(file_path, "json")?;

        let file = File::open(file_path)?;
        let rows: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_reader(std::io::BufReader::new(file))?;

        // 行号 = 数组下标 + 1
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                let raw = row
                    .into_iter()
                    .map(|(key, value)| (key.trim().to_string(), json_to_text(&value)))
                    .collect::<RawRecord>();
                (idx + 1, raw)
            })
            .filter(|(_, row)| !row.values().all(|v| v.is_empty()))
            .collect();

        Ok(records)
    }
}

fn json_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(json_to_text)
            .collect::<Vec<_>>()
            .join(";"),
        other => other.to_string(),
    }
}
