// ==========================================
// 管材采购决策 - 采购请求与决策结果
// ==========================================

use crate::domain::contract::PriceReference;
use crate::domain::types::{Channel, PackageType, RequiredField};
use serde::{Deserialize, Serialize};

// ==========================================
// PurchaseInput - 用户原始输入
// ==========================================
// 表单/命令行收集到的五个字段，均可能缺失
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseInput {
    pub material: Option<String>,
    pub package: Option<PackageType>,
    pub quantity: Option<u32>,
    pub outer_diameter: Option<f64>,
    pub nominal_pressure: Option<f64>,
}

impl PurchaseInput {
    /// 按固定顺序校验必填字段
    ///
    /// material → package → quantity → outer_diameter → nominal_pressure，
    /// 返回第一个缺失的字段。空白材料名视为缺失。
    pub fn validate(&self) -> Result<PurchaseRequest, RequiredField> {
        let material = self
            .material
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(RequiredField::Material)?;
        let package = self.package.ok_or(RequiredField::Package)?;
        let quantity = self.quantity.ok_or(RequiredField::Quantity)?;
        let outer_diameter = self.outer_diameter.ok_or(RequiredField::OuterDiameter)?;
        let nominal_pressure = self
            .nominal_pressure
            .ok_or(RequiredField::NominalPressure)?;

        Ok(PurchaseRequest {
            material: material.to_string(),
            package,
            quantity,
            outer_diameter,
            nominal_pressure,
        })
    }
}

// ==========================================
// PurchaseRequest - 已校验的采购请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub material: String,
    pub package: PackageType,
    pub quantity: u32,          // 线性米
    pub outer_diameter: f64,    // DE
    pub nominal_pressure: f64,  // PN
}

impl PurchaseRequest {
    /// 合同表查询用的 DE（截断为整数）
    pub fn lookup_outer_diameter(&self) -> f64 {
        self.outer_diameter.trunc()
    }
}

// ==========================================
// DecisionResult - 决策结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub channel: Channel,
    pub message: String,
    /// 合同价参考（按价格升序，可能为空）
    pub price_references: Vec<PriceReference>,
    /// 仅 ValidationError 时存在
    pub missing_field: Option<RequiredField>,
    /// 命中规则的判定原因
    pub reasons: Vec<String>,
}

impl DecisionResult {
    pub fn new(channel: Channel, message: impl Into<String>) -> Self {
        Self {
            channel,
            message: message.into(),
            price_references: Vec::new(),
            missing_field: None,
            reasons: Vec::new(),
        }
    }

    pub fn with_price_references(mut self, references: Vec<PriceReference>) -> Self {
        self.price_references = references;
        self
    }

    pub fn with_reasons(mut self, reasons: Vec<String>) -> Self {
        self.reasons = reasons;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> PurchaseInput {
        PurchaseInput {
            material: Some("PEHD".to_string()),
            package: Some(PackageType::Barre),
            quantity: Some(1500),
            outer_diameter: Some(160.0),
            nominal_pressure: Some(16.0),
        }
    }

    #[test]
    fn test_validate_complete() {
        let request = full_input().validate().unwrap();
        assert_eq!(request.material, "PEHD");
        assert_eq!(request.quantity, 1500);
    }

    #[test]
    fn test_validate_first_missing_field_wins() {
        let mut input = full_input();
        input.material = None;
        input.quantity = None;
        assert_eq!(input.validate().unwrap_err(), RequiredField::Material);
    }

    #[test]
    fn test_validate_blank_material() {
        let mut input = full_input();
        input.material = Some("   ".to_string());
        assert_eq!(input.validate().unwrap_err(), RequiredField::Material);
    }

    #[test]
    fn test_validate_each_field_in_order() {
        let mut input = full_input();
        input.nominal_pressure = None;
        assert_eq!(input.validate().unwrap_err(), RequiredField::NominalPressure);
        input.outer_diameter = None;
        assert_eq!(input.validate().unwrap_err(), RequiredField::OuterDiameter);
        input.package = None;
        assert_eq!(input.validate().unwrap_err(), RequiredField::Package);
    }

    #[test]
    fn test_zero_quantity_is_present() {
        let mut input = full_input();
        input.quantity = Some(0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_lookup_outer_diameter_truncates() {
        let mut request = full_input().validate().unwrap();
        request.outer_diameter = 160.9;
        assert_eq!(request.lookup_outer_diameter(), 160.0);
    }
}
