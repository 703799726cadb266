// ==========================================
// 管材采购决策 - 采购规则纯函数库
// ==========================================
// 职责: 厂家 / 经销商 / 合同价三条规则的判定
// 红线: 无状态、无副作用、无 I/O 操作；命中必须输出 reason
// ==========================================

use crate::config::RuleThresholds;
use crate::domain::purchase::PurchaseRequest;
use crate::domain::types::PackageType;

// ==========================================
// ProcurementRules - 纯函数工具类
// ==========================================
pub struct ProcurementRules;

impl ProcurementRules {
    /// 卷盘优先规则（先于所有数值规则）
    pub fn is_touret(request: &PurchaseRequest) -> bool {
        request.package == PackageType::Touret
    }

    /// 厂家采购规则
    ///
    /// # 规则（任一命中）
    /// 1. barre 且 DE > 315
    /// 2. barre 且 225 <= DE <= 315 且 数量 >= 2000
    /// 3. touret（卷盘规则已先行处理，此处仅作兜底）
    pub fn factory_purchase(request: &PurchaseRequest, t: &RuleThresholds) -> Option<String> {
        let de = request.outer_diameter;
        let qty = request.quantity;

        if request.package == PackageType::Barre && de > t.factory_min_de_exclusive {
            return Some(format!(
                "FACTORY: barre DE={} > {}",
                de, t.factory_min_de_exclusive
            ));
        }

        if request.package == PackageType::Barre
            && in_band(de, t.large_band_min_de, t.large_band_max_de)
            && qty >= t.factory_min_quantity
        {
            return Some(format!(
                "FACTORY: barre {} <= DE={} <= {}, quantity={} >= {}",
                t.large_band_min_de, de, t.large_band_max_de, qty, t.factory_min_quantity
            ));
        }

        if request.package == PackageType::Touret {
            return Some("FACTORY: package=touret".to_string());
        }

        None
    }

    /// 经销商采购规则
    ///
    /// # 规则（任一命中）
    /// 1. couronne
    /// 2. DE < 125
    /// 3. DE < 200 且 数量 < 1200
    pub fn distributor_purchase(request: &PurchaseRequest, t: &RuleThresholds) -> Option<String> {
        let de = request.outer_diameter;
        let qty = request.quantity;

        if request.package == PackageType::Couronne {
            return Some("DISTRIBUTOR: package=couronne".to_string());
        }

        if de < t.distributor_max_de_exclusive {
            return Some(format!(
                "DISTRIBUTOR: DE={} < {}",
                de, t.distributor_max_de_exclusive
            ));
        }

        if de < t.small_order_max_de_exclusive && qty < t.small_order_max_quantity_exclusive {
            return Some(format!(
                "DISTRIBUTOR: DE={} < {}, quantity={} < {}",
                de,
                t.small_order_max_de_exclusive,
                qty,
                t.small_order_max_quantity_exclusive
            ));
        }

        None
    }

    /// 合同价采购规则
    ///
    /// # 规则（任一命中）
    /// 1. barre 且 125 <= DE <= 200 且 数量 >= 1200
    /// 2. barre 且 225 <= DE <= 315 且 数量 < 2000
    pub fn contract_purchase(request: &PurchaseRequest, t: &RuleThresholds) -> Option<String> {
        if request.package != PackageType::Barre {
            return None;
        }

        let de = request.outer_diameter;
        let qty = request.quantity;

        if in_band(de, t.contract_band_min_de, t.contract_band_max_de)
            && qty >= t.contract_min_quantity
        {
            return Some(format!(
                "CONTRACT: barre {} <= DE={} <= {}, quantity={} >= {}",
                t.contract_band_min_de, de, t.contract_band_max_de, qty, t.contract_min_quantity
            ));
        }

        if in_band(de, t.large_band_min_de, t.large_band_max_de) && qty < t.factory_min_quantity {
            return Some(format!(
                "CONTRACT: barre {} <= DE={} <= {}, quantity={} < {}",
                t.large_band_min_de, de, t.large_band_max_de, qty, t.factory_min_quantity
            ));
        }

        None
    }
}

/// 闭区间判定
fn in_band(value: f64, min: f64, max: f64) -> bool {
    min <= value && value <= max
}
