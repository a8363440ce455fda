// ==========================================
// OEE 驾驶舱 - 字段映射器实现
// ==========================================
// 职责: 原始行 → ShiftObservation + 类型转换
// ==========================================
// 标准表头:
// company_id, line_id, shift_date, shift, planned_time_min, stoppage_min,
// setup_entries_min, actual_production, ideal_cycle_time_min,
// rework, scrap, lost_packages
// ==========================================

use crate::domain::shift::ShiftObservation;
use crate::domain::types::ShiftCode;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;
use chrono::NaiveDate;

pub struct FieldMapper;

impl FieldMapper {
    pub fn map_to_observation(&self, row: &RawRecord, row_number: usize) -> ImportResult<ShiftObservation> {
        Ok(ShiftObservation {
            // 归属
            company_id: self.require_string(row, "company_id", row_number)?,
            line_id: self.require_string(row, "line_id", row_number)?,
            shift_date: self.parse_date(row, "shift_date", row_number)?,
            shift: self.parse_shift(row, "shift", row_number)?,

            // 时间
            planned_time_min: self.require_f64(row, "planned_time_min", row_number)?,
            stoppage_min: self.parse_f64(row, "stoppage_min", row_number)?.unwrap_or(0.0),
            setup_entries_min: self.parse_f64_list(row, "setup_entries_min", row_number)?,

            // 产出
            actual_production: self.require_f64(row, "actual_production", row_number)?,
            ideal_cycle_time_min: self.require_f64(row, "ideal_cycle_time_min", row_number)?,

            // 损失（缺省为 0）
            rework: self.parse_f64(row, "rework", row_number)?.unwrap_or(0.0),
            scrap: self.parse_f64(row, "scrap", row_number)?.unwrap_or(0.0),
            lost_packages: self.parse_f64(row, "lost_packages", row_number)?.unwrap_or(0.0),
        })
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn get_string(&self, row: &RawRecord, field: &str) -> Option<String> {
        row.get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn require_string(&self, row: &RawRecord, field: &str, row_number: usize) -> ImportResult<String> {
        self.get_string(row, field).ok_or_else(|| ImportError::MissingField {
            row: row_number,
            field: field.to_string(),
        })
    }

    fn parse_f64(&self, row: &RawRecord, field: &str, row_number: usize) -> ImportResult<Option<f64>> {
        match self.get_string(row, field) {
            None => Ok(None),
            Some(v) => v
                .parse::<f64>()
                .map(Some)
                .map_err(|e| ImportError::TypeConversionError {
                    row: row_number,
                    field: field.to_string(),
                    message: format!("'{}': {}", v, e),
                }),
        }
    }

    fn require_f64(&self, row: &RawRecord, field: &str, row_number: usize) -> ImportResult<f64> {
        self.parse_f64(row, field, row_number)?
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: field.to_string(),
            })
    }

    /// ';' 分隔的分钟列表, 空白项忽略
    fn parse_f64_list(&self, row: &RawRecord, field: &str, row_number: usize) -> ImportResult<Vec<f64>> {
        let raw = match self.get_string(row, field) {
            Some(v) => v,
            None => return Ok(Vec::new()),
        };

        raw.split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>().map_err(|e| ImportError::TypeConversionError {
                    row: row_number,
                    field: field.to_string(),
                    message: format!("'{}': {}", s, e),
                })
            })
            .collect()
    }

    /// 支持 YYYY-MM-DD 与 YYYYMMDD
    fn parse_date(&self, row: &RawRecord, field: &str, row_number: usize) -> ImportResult<NaiveDate> {
        let value = self.require_string(row, field, row_number)?;
        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&value, "%Y%m%d"))
            .map_err(|_| ImportError::DateFormatError {
                row: row_number,
                field: field.to_string(),
                value,
            })
    }

    fn parse_shift(&self, row: &RawRecord, field: &str, row_number: usize) -> ImportResult<ShiftCode> {
        let value = self.require_string(row, field, row_number)?;
        value
            .parse::<ShiftCode>()
            .map_err(|message| ImportError::TypeConversionError {
                row: row_number,
                field: field.to_string(),
                message,
            })
    }
}
