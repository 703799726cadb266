// ==========================================
// 管材采购决策 - 导入层
// ==========================================
// 职责: 外部合同表导入,生成只读合同目录
// 支持: Excel, CSV, SQLite
// ==========================================

// 模块声明
pub mod contract_importer;
pub mod contract_importer_trait;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod sqlite_source;

// 重导出核心类型
pub use contract_importer::{source_for_path, ContractImporter, ContractLoad, FileContractSource};
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use sqlite_source::{SqliteContractSource, CONTRACTS_TABLE_DDL};

// 重导出 Trait 接口
pub use contract_importer_trait::{
    ContractSource, DqValidator, FieldMapper, FileParser, ParsedSheet, RawLoad,
};
