// ==========================================
// 管材采购决策 - 采购决策 API
// ==========================================
// 职责: 启动时加载合同表、对外提供评估 / 表单选项 / 重新加载
// 表单与命令行只依赖此 API
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::catalog::SharedCatalog;
use crate::config::ProcurementConfig;
use crate::domain::contract::DqReport;
use crate::domain::purchase::{DecisionResult, PurchaseInput};
use crate::domain::types::PackageType;
use crate::engine::DecisionEngine;
use crate::importer::{ContractImporter, DqValidatorImpl};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{info, instrument};

/// 表单可选项（来自合同表）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormOptions {
    pub materials: Vec<String>,
    pub packages: Vec<PackageType>,
    pub outer_diameters: Vec<f64>,
    pub nominal_pressures: Vec<f64>,
}

pub struct PurchaseApi {
    engine: DecisionEngine,
    importer: ContractImporter,
    catalog_path: PathBuf,
    last_report: RwLock<Option<DqReport>>,
}

impl PurchaseApi {
    /// 加载合同表并创建 API
    ///
    /// 加载失败不返回错误：引擎进入 DataUnavailable 状态，每次评估都会拒绝
    #[instrument(skip(config))]
    pub fn bootstrap(config: ProcurementConfig) -> Self {
        let catalog_path = config.resolve_catalog_path();
        let importer = ContractImporter::new(DqValidatorImpl::new(config.price_anomaly_threshold));

        info!(path = %catalog_path.display(), "加载合同表");
        let (loaded, report) = match importer.import_path(&catalog_path) {
            Ok(load) => (Ok(load.catalog), Some(load.report)),
            Err(e) => (Err(e), None),
        };
        let shared = SharedCatalog::from_load_result(loaded);

        Self {
            engine: DecisionEngine::new(Arc::new(shared), Arc::new(config)),
            importer,
            catalog_path,
            last_report: RwLock::new(report),
        }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn catalog_path(&self) -> &PathBuf {
        &self.catalog_path
    }

    /// 评估（本地当天）
    pub fn evaluate(&self, input: &PurchaseInput) -> ApiResult<DecisionResult> {
        Ok(self.engine.evaluate_input(input)?)
    }

    /// 评估（指定基准日期）
    pub fn evaluate_at(&self, input: &PurchaseInput, as_of: NaiveDate) -> ApiResult<DecisionResult> {
        Ok(self.engine.evaluate_at(input, as_of)?)
    }

    /// 表单可选项
    pub fn options(&self) -> ApiResult<FormOptions> {
        let catalog = self.engine.catalog().snapshot()?;
        Ok(FormOptions {
            materials: catalog.materials(),
            packages: vec![PackageType::Couronne, PackageType::Barre, PackageType::Touret],
            outer_diameters: catalog.outer_diameters(),
            nominal_pressures: catalog.nominal_pressures(),
        })
    }

    /// 重新加载合同表（先加载、后替换）
    ///
    /// 加载失败时保留现有快照并返回错误
    pub fn reload(&self) -> ApiResult<DqReport> {
        let load = self.importer.import_path(&self.catalog_path)?;
        self.engine.catalog().replace(load.catalog)?;

        let mut last = self
            .last_report
            .write()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))?;
        *last = Some(load.report.clone());
        Ok(load.report)
    }

    /// 最近一次成功加载的 DQ 报告
    pub fn last_report(&self) -> Option<DqReport> {
        self.last_report.read().ok().and_then(|r| r.clone())
    }
}
