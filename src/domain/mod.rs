// ==========================================
// 管材采购决策 - 领域模型层
// ==========================================
// 职责: 定义合同记录、采购请求、决策结果等实体与类型
// 红线: 不含数据访问逻辑,不含规则逻辑
// ==========================================

pub mod contract;
pub mod purchase;
pub mod types;

// 重导出核心类型
pub use contract::{
    ContractRecord, DqLevel, DqReport, DqSummary, DqViolation, PriceReference, RawContractRecord,
};
pub use purchase::{DecisionResult, PurchaseInput, PurchaseRequest};
pub use types::{normalize_package, Channel, PackageType, RequiredField};
