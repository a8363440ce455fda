// ==========================================
// OEE 驾驶舱 - 导入层
// ==========================================
// 职责: 读取操作员录入的班次记录文件 (CSV / JSON)
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod shift_importer;

pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, FileParser, JsonParser, RawRecord};
pub use shift_importer::{ImportOutcome, RowRejection, ShiftImporter};
