// ==========================================
// 管材采购决策 - 引擎层
// ==========================================
// 职责: 采购渠道规则判定 + 合同价参考
// 红线: 引擎不读文件, 所有规则必须输出 reason
// ==========================================

pub mod decision;
pub mod error;
pub mod messages;
pub mod rules_core;

// 重导出核心引擎
pub use decision::DecisionEngine;
pub use error::{EngineError, EngineResult};
pub use rules_core::ProcurementRules;
