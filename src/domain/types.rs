// ==========================================
// 管材采购决策 - 领域类型定义
// ==========================================
// 包装形式 / 采购渠道 / 必填字段
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 包装形式 (Package Type)
// ==========================================
// 比较前统一 trim + lowercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Couronne, // 盘卷
    Barre,    // 直管
    Touret,   // 卷盘
}

impl PackageType {
    /// 规范化后的字符串形式（与合同表中的规范化值一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Couronne => "couronne",
            PackageType::Barre => "barre",
            PackageType::Touret => "touret",
        }
    }

    /// 解析任意大小写/带空白的包装字符串
    ///
    /// 未知取值返回 None
    pub fn parse_normalized(value: &str) -> Option<Self> {
        match normalize_package(value).as_str() {
            "couronne" => Some(PackageType::Couronne),
            "barre" => Some(PackageType::Barre),
            "touret" => Some(PackageType::Touret),
            _ => None,
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageType::parse_normalized(s)
            .ok_or_else(|| format!("未知包装形式: {} (couronne/barre/touret)", s.trim()))
    }
}

/// 包装字符串规范化: trim + lowercase
pub fn normalize_package(value: &str) -> String {
    value.trim().to_lowercase()
}

// ==========================================
// 采购渠道 (Procurement Channel)
// ==========================================
// 一次评估只产出一个渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Touret,          // 卷盘专用合同
    Factory,         // 厂家采购
    Distributor,     // 经销商采购
    Contract,        // 合同价直采
    Escalate,        // 升级至品类经理
    ValidationError, // 输入缺失
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Touret => write!(f, "TOURET"),
            Channel::Factory => write!(f, "FACTORY"),
            Channel::Distributor => write!(f, "DISTRIBUTOR"),
            Channel::Contract => write!(f, "CONTRACT"),
            Channel::Escalate => write!(f, "ESCALATE"),
            Channel::ValidationError => write!(f, "VALIDATION_ERROR"),
        }
    }
}

// ==========================================
// 必填字段 (Required Field)
// ==========================================
// 声明顺序 = 校验顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Material,
    Package,
    Quantity,
    OuterDiameter,
    NominalPressure,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::Material => "material",
            RequiredField::Package => "package",
            RequiredField::Quantity => "quantity",
            RequiredField::OuterDiameter => "outer_diameter",
            RequiredField::NominalPressure => "nominal_pressure",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
