// ==========================================
// OEE 驾驶舱 - 班次记录导入器
// ==========================================
// 流程: 按扩展名选择解析器 → 逐行映射 → 汇总拒绝行
// 文件级错误直接返回; 行级错误记录后继续
// ==========================================

use crate::domain::shift::ShiftObservation;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{CsvParser, FileParser, JsonParser};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument, warn};

/// 被拒绝的行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRejection {
    /// 源行号（CSV 为文件行号, 表头为第 1 行; JSON 为数组下标 + 1）
    pub row: usize,
    pub reason: String,
}

/// 导入结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub observations: Vec<ShiftObservation>,
    pub rejected: Vec<RowRejection>,
}

pub struct ShiftImporter {
    mapper: FieldMapper,
}

impl Default for ShiftImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ShiftImporter {
    pub fn new() -> Self {
        Self { mapper: FieldMapper }
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn import_file(&self, path: &Path) -> ImportResult<ImportOutcome> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let parser: Box<dyn FileParser> = match ext.as_str() {
            "csv" => Box::new(CsvParser),
            "json" => Box::new(JsonParser),
            _ => {
                if !path.exists() {
                    return Err(ImportError::FileNotFound(path.display().to_string()));
                }
                return Err(ImportError::UnsupportedFormat(ext));
            }
        };

        let records = parser.parse_to_raw_records(path)?;

        let mut outcome = ImportOutcome::default();
        for (row_number, record) in &records {
            let row_number = *row_number;
            match self.mapper.map_to_observation(record, row_number) {
                Ok(obs) => outcome.observations.push(obs),
                Err(e) if e.is_row_level() => {
                    warn!(row = row_number, error = %e, "行映射失败, 已跳过");
                    outcome.rejected.push(RowRejection {
                        row: row_number,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            imported = outcome.observations.len(),
            rejected = outcome.rejected.len(),
            "班次记录导入完成"
        );
        Ok(outcome)
    }
}
