// ==========================================
// 测试辅助函数
// ==========================================
// 说明: 各集成测试通过 `mod test_helpers;` 引入, 未用到的函数允许存在
// ==========================================
#![allow(dead_code)]

use chrono::NaiveDate;
use oee_dashboard::domain::{ShiftCode, ShiftObservation};
use std::io::Write;
use tempfile::NamedTempFile;

pub const EPS: f64 = 1e-9;

/// 浮点近似断言
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {}, got {}",
        expected,
        actual
    );
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 创建测试用的班次记录（基准: 480 分钟, 节拍 0.4, 无停机无损失）
pub fn create_test_observation(
    company_id: &str,
    line_id: &str,
    shift_date: NaiveDate,
    shift: ShiftCode,
) -> ShiftObservation {
    ShiftObservation {
        company_id: company_id.to_string(),
        line_id: line_id.to_string(),
        shift_date,
        shift,
        planned_time_min: 480.0,
        stoppage_min: 0.0,
        setup_entries_min: Vec::new(),
        actual_production: 1000.0,
        ideal_cycle_time_min: 0.4,
        rework: 0.0,
        scrap: 0.0,
        lost_packages: 0.0,
    }
}

/// 今日全线基准场景: 停机 45, 产量 920, 返工 15 / 报废 25 / 丢失 5
pub fn create_baseline_observation(company_id: &str, line_id: &str) -> ShiftObservation {
    ShiftObservation {
        stoppage_min: 45.0,
        actual_production: 920.0,
        rework: 15.0,
        scrap: 25.0,
        lost_packages: 5.0,
        ..create_test_observation(company_id, line_id, date(2026, 3, 18), ShiftCode::Morning)
    }
}

/// 写入带扩展名的临时文件
pub fn write_temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}
