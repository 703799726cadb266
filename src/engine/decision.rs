// ==========================================
// 管材采购决策 - 决策引擎
// ==========================================
// 输入: 五个用户字段 + 合同目录快照
// 输出: 唯一的采购渠道 + 说明 + 合同价参考
// ==========================================
// 判定顺序（先命中先返回）:
// 0. 输入校验 → VALIDATION_ERROR
// 1. 卷盘优先 → TOURET / ESCALATE
// 2. 厂家采购 → FACTORY
// 3. 经销商采购 → DISTRIBUTOR
// 4. 合同价采购 → CONTRACT / ESCALATE
// 5. 兜底 → ESCALATE
// ==========================================

use crate::catalog::{ContractCatalog, SharedCatalog};
use crate::config::ProcurementConfig;
use crate::domain::contract::PriceReference;
use crate::domain::purchase::{DecisionResult, PurchaseInput, PurchaseRequest};
use crate::domain::types::{Channel, PackageType};
use crate::engine::error::EngineResult;
use crate::engine::messages;
use crate::engine::rules_core::ProcurementRules;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info, instrument};

// ==========================================
// DecisionEngine - 采购渠道决策引擎
// ==========================================
// 红线: 不修改合同目录，不持久化结果
pub struct DecisionEngine {
    catalog: Arc<SharedCatalog>,
    config: Arc<ProcurementConfig>,
}

impl DecisionEngine {
    /// 创建新的 DecisionEngine 实例
    ///
    /// # 参数
    /// - catalog: 共享合同目录（可能处于不可用状态）
    /// - config: 采购配置
    pub fn new(catalog: Arc<SharedCatalog>, config: Arc<ProcurementConfig>) -> Self {
        Self { catalog, config }
    }

    /// 以已加载的目录和默认配置创建
    pub fn with_catalog(catalog: ContractCatalog) -> Self {
        Self::new(
            Arc::new(SharedCatalog::ready(catalog)),
            Arc::new(ProcurementConfig::default()),
        )
    }

    pub fn catalog(&self) -> &Arc<SharedCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &ProcurementConfig {
        &self.config
    }

    /// 以五个独立字段评估一次采购（本地当天为基准日期）
    ///
    /// 对外调用约定: evaluate(material, package, quantity, DE, PN)
    pub fn evaluate(
        &self,
        material: Option<&str>,
        package: Option<PackageType>,
        quantity: Option<u32>,
        outer_diameter: Option<f64>,
        nominal_pressure: Option<f64>,
    ) -> EngineResult<DecisionResult> {
        let input = PurchaseInput {
            material: material.map(str::to_string),
            package,
            quantity,
            outer_diameter,
            nominal_pressure,
        };
        self.evaluate_input(&input)
    }

    /// 以表单收集的 PurchaseInput 评估（本地当天为基准日期）
    pub fn evaluate_input(&self, input: &PurchaseInput) -> EngineResult<DecisionResult> {
        self.evaluate_at(input, Local::now().date_naive())
    }

    /// 评估一次采购（指定基准日期）
    ///
    /// # 返回
    /// - Ok(DecisionResult): 唯一渠道（含 VALIDATION_ERROR）
    /// - Err(DataUnavailable): 合同数据不可用，拒绝评估
    #[instrument(skip(self, input), fields(material = ?input.material, package = ?input.package))]
    pub fn evaluate_at(&self, input: &PurchaseInput, as_of: NaiveDate) -> EngineResult<DecisionResult> {
        // 合同数据可用性先于一切判定
        let catalog = self.catalog.snapshot()?;

        let request = match input.validate() {
            Ok(request) => request,
            Err(field) => {
                debug!(field = %field, "输入缺失");
                let mut result =
                    DecisionResult::new(Channel::ValidationError, messages::missing_field(field))
                        .with_reasons(vec![format!("VALIDATION: {} missing", field)]);
                result.missing_field = Some(field);
                return Ok(result);
            }
        };

        let result = self.classify(&request, &catalog, as_of);
        info!(
            channel = %result.channel,
            references = result.price_references.len(),
            "采购决策完成"
        );
        Ok(result)
    }

    /// 按固定顺序判定渠道
    fn classify(
        &self,
        request: &PurchaseRequest,
        catalog: &ContractCatalog,
        as_of: NaiveDate,
    ) -> DecisionResult {
        let thresholds = &self.config.thresholds;
        let contacts = &self.config.contacts;

        // 规则 0: 卷盘优先
        if ProcurementRules::is_touret(request) {
            return self.touret_decision(request, catalog, as_of);
        }

        // 规则 1: 厂家采购
        if let Some(reason) = ProcurementRules::factory_purchase(request, thresholds) {
            let references = self.top_references(request, catalog, as_of);
            let mut reasons = vec![reason];
            reasons.push(lookup_reason(references.len()));
            return DecisionResult::new(Channel::Factory, messages::factory(&references, contacts))
                .with_price_references(references)
                .with_reasons(reasons);
        }

        // 规则 2: 经销商采购（不查合同）
        if let Some(reason) = ProcurementRules::distributor_purchase(request, thresholds) {
            return DecisionResult::new(Channel::Distributor, messages::distributor(contacts))
                .with_reasons(vec![reason]);
        }

        // 规则 3: 合同价采购（仅规则命中时查合同）
        if let Some(reason) = ProcurementRules::contract_purchase(request, thresholds) {
            let references = self.top_references(request, catalog, as_of);
            let reasons = vec![reason, lookup_reason(references.len())];
            if references.is_empty() {
                return DecisionResult::new(
                    Channel::Escalate,
                    messages::contact_category_manager(contacts),
                )
                .with_reasons(reasons);
            }
            return DecisionResult::new(Channel::Contract, messages::contract(&references, contacts))
                .with_price_references(references)
                .with_reasons(reasons);
        }

        // 兜底: 规则区间未覆盖
        DecisionResult::new(Channel::Escalate, messages::manual_analysis(contacts)).with_reasons(
            vec![format!(
                "FALLBACK: no rule for package={} DE={} quantity={}",
                request.package, request.outer_diameter, request.quantity
            )],
        )
    }

    fn touret_decision(
        &self,
        request: &PurchaseRequest,
        catalog: &ContractCatalog,
        as_of: NaiveDate,
    ) -> DecisionResult {
        let contacts = &self.config.contacts;
        let matched = catalog.find_matching(
            &request.material,
            request.lookup_outer_diameter(),
            request.nominal_pressure,
            as_of,
            Some(PackageType::Touret),
            Some(1),
        );

        match matched.first() {
            Some(record) => {
                let reference = PriceReference::from(*record);
                DecisionResult::new(Channel::Touret, messages::touret_found(&reference, contacts))
                    .with_price_references(vec![reference])
                    .with_reasons(vec![
                        "TOURET: package=touret".to_string(),
                        lookup_reason(1),
                    ])
            }
            None => DecisionResult::new(Channel::Escalate, messages::touret_not_found(contacts))
                .with_reasons(vec![
                    "TOURET: package=touret".to_string(),
                    lookup_reason(0),
                ]),
        }
    }

    /// 厂家 / 合同价规则的合同价参考（不过滤包装形式）
    fn top_references(
        &self,
        request: &PurchaseRequest,
        catalog: &ContractCatalog,
        as_of: NaiveDate,
    ) -> Vec<PriceReference> {
        catalog
            .find_matching(
                &request.material,
                request.lookup_outer_diameter(),
                request.nominal_pressure,
                as_of,
                None,
                Some(self.config.price_reference_limit),
            )
            .into_iter()
            .map(PriceReference::from)
            .collect()
    }
}

fn lookup_reason(matched: usize) -> String {
    if matched == 0 {
        "LOOKUP: no active contract".to_string()
    } else {
        format!("LOOKUP: {} active contract(s)", matched)
    }
}
