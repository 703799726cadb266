// ==========================================
// 管材采购决策 - 合同导入 Trait
// ==========================================
// 职责: 定义合同表导入管道各阶段接口（不包含实现）
// 管道: 文件解析 → 字段映射 → DQ 校验 → 合同目录
// ==========================================

use crate::domain::contract::{DqReport, DqViolation, RawContractRecord};
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为表头 + 原始行记录（HashMap<列名, 值>）
    ///
    /// 表头始终返回（即使没有数据行）；完全空白的行被跳过
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<ParsedSheet>;
}

// ==========================================
// ParsedSheet - 表格解析结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    /// 表头行（已去除空白与 BOM）
    pub headers: Vec<String>,
    /// 数据行；短行只包含实际出现的列
    pub rows: Vec<HashMap<String, String>>,
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 检查表头是否包含全部必需列
    fn check_headers(&self, headers: &[&str]) -> ImportResult<()>;

    /// 将原始行记录映射为 RawContractRecord
    ///
    /// # 参数
    /// - row: 原始行记录（HashMap<列名, 值>）
    /// - row_number: 行号（用于 DQ 报告）
    ///
    /// # 返回
    /// - Err: 行级类型转换错误（数值/日期）
    fn map_to_raw_contract(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<RawContractRecord>;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 数据质量校验接口（阶段 2）
// 实现者: DqValidator
pub trait DqValidator: Send + Sync {
    /// 校验必填字段（缺失 → Error，该行不可用）
    fn validate_required_fields(&self, record: &RawContractRecord) -> Vec<DqViolation>;

    /// 校验取值（包装形式、数值范围）
    fn validate_values(&self, record: &RawContractRecord) -> Vec<DqViolation>;

    /// 校验重复行（同材料/包装/DE/PN/供应商）
    fn validate_duplicates(&self, records: &[RawContractRecord]) -> Vec<DqViolation>;

    /// 生成 DQ 报告
    fn generate_dq_report(
        &self,
        source: String,
        total_rows: usize,
        loaded: usize,
        violations: Vec<DqViolation>,
    ) -> DqReport;
}

// ==========================================
// RawLoad - 数据源读取结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RawLoad {
    /// 映射成功的行
    pub records: Vec<RawContractRecord>,
    /// 映射阶段产生的行级违规
    pub violations: Vec<DqViolation>,
    /// 数据源总行数（不含表头与空行）
    pub total_rows: usize,
}

// ==========================================
// ContractSource Trait
// ==========================================
// 用途: 合同表数据源（文件 / SQLite）
// 实现者: FileContractSource, SqliteContractSource
pub trait ContractSource: Send + Sync {
    /// 数据源描述（用于日志与 DQ 报告）
    fn describe(&self) -> String;

    /// 读取为原始合同记录
    fn load_raw(&self) -> ImportResult<RawLoad>;
}
