// ==========================================
// 管材采购决策 - 决策引擎错误类型
// ==========================================
// 输入缺失、无匹配合同都不是错误（体现在 DecisionResult 中）
// 只有合同数据不可用时拒绝评估
// ==========================================

use crate::catalog::CatalogError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// 合同表加载失败
    #[error("合同数据不可用，拒绝评估: {0}")]
    DataUnavailable(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl From<CatalogError> for EngineError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::DataUnavailable(reason) => EngineError::DataUnavailable(reason),
            CatalogError::LockPoisoned(msg) => EngineError::InternalError(msg),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
