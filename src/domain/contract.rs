// ==========================================
// 管材采购决策 - 合同领域模型
// ==========================================
// 合同表的一行 + 导入阶段的中间结构 + 数据质量报告
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// RawContractRecord - 导入中间结构
// ==========================================
// 字段映射后、DQ 校验前的行记录，所有字段可缺失
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContractRecord {
    pub material: Option<String>,         // 材料
    pub package: Option<String>,          // 包装形式（已规范化）
    pub outer_diameter: Option<f64>,      // DE
    pub nominal_pressure: Option<f64>,    // PN
    pub valid_until: Option<NaiveDate>,   // 合同有效期
    pub supplier: Option<String>,         // 供应商
    pub price: Option<f64>,               // 单价（€/ml）

    // 元信息
    pub row_number: usize,                // 原始文件行号
}

impl RawContractRecord {
    /// 转换为可用合同记录
    ///
    /// 任一必填字段缺失返回 None（由 DQ 校验负责说明原因）
    pub fn into_contract(self) -> Option<ContractRecord> {
        Some(ContractRecord {
            material: self.material?,
            package: self.package?,
            outer_diameter: self.outer_diameter?,
            nominal_pressure: self.nominal_pressure?,
            valid_until: self.valid_until?,
            supplier: self.supplier?,
            price: self.price?,
            row_number: self.row_number,
        })
    }
}

// ==========================================
// ContractRecord - 合同记录
// ==========================================
// 加载后只读，决策引擎不修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub material: String,
    /// 规范化后的包装形式（trim + lowercase）
    pub package: String,
    pub outer_diameter: f64,
    pub nominal_pressure: f64,
    pub valid_until: NaiveDate,
    pub supplier: String,
    pub price: f64,
    pub row_number: usize,
}

// ==========================================
// PriceReference - 合同价参考
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReference {
    pub supplier: String,
    pub price: f64,
}

impl From<&ContractRecord> for PriceReference {
    fn from(record: &ContractRecord) -> Self {
        Self {
            supplier: record.supplier.clone(),
            price: record.price,
        }
    }
}

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Error,   // 错误（该行不进入合同表）
    Warning, // 警告（允许进入）
    Info,    // 提示（仅记录）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,             // 原始文件行号
    pub material: Option<String>,      // 材料（如果可解析）
    pub level: DqLevel,                // 违规级别
    pub field: String,                 // 违规字段
    pub message: String,               // 违规描述
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 总行数
    pub loaded: usize,     // 进入合同表
    pub blocked: usize,    // 阻断（ERROR 行数）
    pub warning: usize,    // 警告条数
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqReport {
    pub source: String,                // 数据源描述（文件路径等）
    pub summary: DqSummary,            // 汇总统计
    pub violations: Vec<DqViolation>,  // 违规明细
}

impl DqReport {
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v.level, DqLevel::Error))
    }
}
