// ==========================================
// 管材采购决策 - API层错误类型
// ==========================================
// 职责: 将导入/配置/引擎错误转换为调用方可读的错误
// ==========================================

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 合同表不可用（加载失败）
    #[error("合同数据不可用: {0}")]
    DataUnavailable(String),

    #[error("合同表导入失败: {0}")]
    ImportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::DataUnavailable(reason) => ApiError::DataUnavailable(reason),
            EngineError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<crate::catalog::CatalogError> for ApiError {
    fn from(err: crate::catalog::CatalogError) -> Self {
        EngineError::from(err).into()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_unavailable_maps_to_api_unavailable() {
        let err: ApiError = EngineError::DataUnavailable("contracts.xlsx".to_string()).into();
        assert!(matches!(err, ApiError::DataUnavailable(ref r) if r == "contracts.xlsx"));
    }

    #[test]
    fn test_import_error_message_kept() {
        let err: ApiError = ImportError::MissingColumn("Price".to_string()).into();
        assert!(err.to_string().contains("Price"));
    }
}
