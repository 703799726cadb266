// ==========================================
// 管材采购决策 - 合同目录层
// ==========================================
// 职责: 内存中的只读合同表 + 有效合同查询
// ==========================================

pub mod contract_catalog;
pub mod shared;

pub use contract_catalog::ContractCatalog;
pub use shared::{CatalogError, SharedCatalog};
