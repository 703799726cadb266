// ==========================================
// 管材采购决策 - 共享合同目录快照
// ==========================================
// 职责: 记录加载结果（可用 / 不可用），提供只读快照与整体替换
// 红线: 替换为 load-then-swap，查询中的请求只看到完整快照
// ==========================================

use crate::catalog::contract_catalog::ContractCatalog;
use std::fmt::Display;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{info, warn};

/// 合同目录访问错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// 合同数据加载失败，决策引擎拒绝评估
    #[error("合同数据不可用: {0}")]
    DataUnavailable(String),

    #[error("锁获取失败: {0}")]
    LockPoisoned(String),
}

#[derive(Debug, Clone)]
enum CatalogState {
    Ready(Arc<ContractCatalog>),
    Unavailable { reason: String },
}

// ==========================================
// SharedCatalog - 目录快照持有者
// ==========================================
#[derive(Debug)]
pub struct SharedCatalog {
    state: RwLock<CatalogState>,
}

impl SharedCatalog {
    /// 以已加载的目录创建
    pub fn ready(catalog: ContractCatalog) -> Self {
        Self {
            state: RwLock::new(CatalogState::Ready(Arc::new(catalog))),
        }
    }

    /// 以加载失败状态创建
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(CatalogState::Unavailable {
                reason: reason.into(),
            }),
        }
    }

    /// 由加载结果创建（加载阶段一次性判定 DataUnavailable）
    pub fn from_load_result<E: Display>(result: Result<ContractCatalog, E>) -> Self {
        match result {
            Ok(catalog) => {
                info!(records = catalog.len(), "合同目录加载成功");
                Self::ready(catalog)
            }
            Err(e) => {
                warn!(error = %e, "合同目录加载失败，决策引擎将拒绝评估");
                Self::unavailable(e.to_string())
            }
        }
    }

    /// 获取当前快照
    ///
    /// # 返回
    /// - Ok(Arc<ContractCatalog>): 当前完整快照
    /// - Err(DataUnavailable): 加载失败
    pub fn snapshot(&self) -> Result<Arc<ContractCatalog>, CatalogError> {
        let state = self
            .state
            .read()
            .map_err(|e| CatalogError::LockPoisoned(e.to_string()))?;

        match &*state {
            CatalogState::Ready(catalog) => Ok(Arc::clone(catalog)),
            CatalogState::Unavailable { reason } => {
                Err(CatalogError::DataUnavailable(reason.clone()))
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.snapshot().is_ok()
    }

    /// 整体替换为新加载的目录
    ///
    /// 调用方先完成加载，再替换；持有旧快照的查询不受影响
    pub fn replace(&self, catalog: ContractCatalog) -> Result<(), CatalogError> {
        let records = catalog.len();
        let mut state = self
            .state
            .write()
            .map_err(|e| CatalogError::LockPoisoned(e.to_string()))?;
        *state = CatalogState::Ready(Arc::new(catalog));
        info!(records, "合同目录已替换");
        Ok(())
    }
}

impl From<ContractCatalog> for SharedCatalog {
    fn from(catalog: ContractCatalog) -> Self {
        Self::ready(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::ContractRecord;
    use chrono::NaiveDate;

    fn one_record_catalog(supplier: &str) -> ContractCatalog {
        ContractCatalog::new(vec![ContractRecord {
            material: "PEHD".to_string(),
            package: "barre".to_string(),
            outer_diameter: 160.0,
            nominal_pressure: 16.0,
            valid_until: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            supplier: supplier.to_string(),
            price: 10.0,
            row_number: 2,
        }])
    }

    #[test]
    fn test_unavailable_snapshot_is_distinct_error() {
        let shared = SharedCatalog::unavailable("contracts.xlsx 不存在");
        let err = shared.snapshot().unwrap_err();
        assert!(matches!(err, CatalogError::DataUnavailable(ref r) if r.contains("contracts.xlsx")));
        assert!(!shared.is_available());
    }

    #[test]
    fn test_from_load_result_error() {
        let shared = SharedCatalog::from_load_result::<String>(Err("boom".to_string()));
        assert!(matches!(shared.snapshot(), Err(CatalogError::DataUnavailable(_))));
    }

    #[test]
    fn test_replace_keeps_old_snapshot_intact() {
        let shared = SharedCatalog::ready(one_record_catalog("Old"));
        let before = shared.snapshot().unwrap();

        shared.replace(one_record_catalog("New")).unwrap();

        assert_eq!(before.records()[0].supplier, "Old");
        assert_eq!(shared.snapshot().unwrap().records()[0].supplier, "New");
    }

    #[test]
    fn test_replace_recovers_unavailable() {
        let shared = SharedCatalog::unavailable("missing");
        shared.replace(one_record_catalog("A")).unwrap();
        assert!(shared.is_available());
    }
}
