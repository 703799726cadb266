// ==========================================
// 管材采购决策 - 采购配置
// ==========================================
// 默认值与现行采购规则一致:
// - barre DE > 315 → 厂家
// - barre 225 <= DE <= 315: 数量 >= 2000 → 厂家，否则合同价
// - couronne / DE < 125 / (DE < 200 且数量 < 1200) → 经销商
// - barre 125 <= DE <= 200 且数量 >= 1200 → 合同价
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "PIPE_PROCUREMENT_CONFIG";

/// 合同表路径环境变量
pub const CATALOG_PATH_ENV: &str = "PIPE_PROCUREMENT_CATALOG";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值无效 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

// ==========================================
// RuleThresholds - 规则阈值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    /// barre 超过该 DE（不含）直接厂家采购
    pub factory_min_de_exclusive: f64,
    /// 大口径区间下限（含）
    pub large_band_min_de: f64,
    /// 大口径区间上限（含）
    pub large_band_max_de: f64,
    /// 大口径区间内转厂家采购的最小数量
    pub factory_min_quantity: u32,
    /// 低于该 DE（不含）走经销商
    pub distributor_max_de_exclusive: f64,
    /// 小批量判定的 DE 上限（不含）
    pub small_order_max_de_exclusive: f64,
    /// 小批量数量上限（不含）
    pub small_order_max_quantity_exclusive: u32,
    /// 中口径合同区间下限（含）
    pub contract_band_min_de: f64,
    /// 中口径合同区间上限（含）
    pub contract_band_max_de: f64,
    /// 中口径合同区间最小数量（含）
    pub contract_min_quantity: u32,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            factory_min_de_exclusive: 315.0,
            large_band_min_de: 225.0,
            large_band_max_de: 315.0,
            factory_min_quantity: 2000,
            distributor_max_de_exclusive: 125.0,
            small_order_max_de_exclusive: 200.0,
            small_order_max_quantity_exclusive: 1200,
            contract_band_min_de: 125.0,
            contract_band_max_de: 200.0,
            contract_min_quantity: 1200,
        }
    }
}

impl RuleThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.large_band_min_de > self.large_band_max_de {
            return Err(ConfigError::InvalidValue {
                key: "thresholds.large_band_min_de".to_string(),
                message: format!(
                    "区间下限 {} 大于上限 {}",
                    self.large_band_min_de, self.large_band_max_de
                ),
            });
        }
        if self.contract_band_min_de > self.contract_band_max_de {
            return Err(ConfigError::InvalidValue {
                key: "thresholds.contract_band_min_de".to_string(),
                message: format!(
                    "区间下限 {} 大于上限 {}",
                    self.contract_band_min_de, self.contract_band_max_de
                ),
            });
        }
        Ok(())
    }
}

// ==========================================
// ContactDirectory - 联系人
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDirectory {
    /// 合同厂家
    pub factory_partners: Vec<String>,
    /// 卷盘/厂家交期确认联系人
    pub factory_contact: String,
    /// 品类经理
    pub category_manager: String,
    /// 经销渠道
    pub distribution_desk: String,
}

impl Default for ContactDirectory {
    fn default() -> Self {
        Self {
            factory_partners: vec!["Elydan".to_string(), "Centraltubi".to_string()],
            factory_contact: "Elydan".to_string(),
            category_manager: "Category Manager Achats".to_string(),
            distribution_desk: "Négoce".to_string(),
        }
    }
}

// ==========================================
// ProcurementConfig - 总配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcurementConfig {
    /// 合同表路径（.xlsx/.xls/.csv/.db）
    pub catalog_path: Option<PathBuf>,
    /// 厂家/合同价规则最多给出的价格参考条数
    pub price_reference_limit: usize,
    /// DQ: 单价异常阈值（€/ml）
    pub price_anomaly_threshold: f64,
    pub thresholds: RuleThresholds,
    pub contacts: ContactDirectory,
}

impl Default for ProcurementConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            price_reference_limit: 2,
            price_anomaly_threshold: 10_000.0,
            thresholds: RuleThresholds::default(),
            contacts: ContactDirectory::default(),
        }
    }
}

impl ProcurementConfig {
    /// 从 JSON 文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::from_json(&raw).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;

        info!(path = %path.display(), "配置文件加载完成");
        Ok(config)
    }

    /// 从 JSON 字符串解析并校验
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: ProcurementConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::ParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 按优先级加载: 显式路径 → 环境变量 → 默认值
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Self::from_file(trimmed);
            }
        }

        debug!("未指定配置文件，使用默认配置");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.price_reference_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "price_reference_limit".to_string(),
                message: "至少为 1".to_string(),
            });
        }
        self.thresholds.validate()
    }

    /// 合同表路径: 配置值 → 默认路径
    pub fn resolve_catalog_path(&self) -> PathBuf {
        self.catalog_path
            .clone()
            .unwrap_or_else(default_catalog_path)
    }
}

/// 默认合同表路径
///
/// 1. 环境变量 PIPE_PROCUREMENT_CATALOG
/// 2. 用户数据目录下 pipe-procurement/contracts.xlsx
/// 3. 当前目录 ./contracts.xlsx
pub fn default_catalog_path() -> PathBuf {
    if let Ok(path) = std::env::var(CATALOG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("pipe-procurement").join("contracts.xlsx"),
        None => PathBuf::from("./contracts.xlsx"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_thresholds() {
        let t = RuleThresholds::default();
        assert_eq!(t.factory_min_de_exclusive, 315.0);
        assert_eq!(t.factory_min_quantity, 2000);
        assert_eq!(t.small_order_max_quantity_exclusive, 1200);
        assert_eq!(ProcurementConfig::default().price_reference_limit, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ProcurementConfig::from_json(
            r#"{ "contacts": { "category_manager": "Acheteur Tubes" } }"#,
        )
        .unwrap();

        assert_eq!(config.contacts.category_manager, "Acheteur Tubes");
        assert_eq!(config.contacts.factory_contact, "Elydan");
        assert_eq!(config.thresholds, RuleThresholds::default());
    }

    #[test]
    fn test_invalid_band_rejected() {
        let result = ProcurementConfig::from_json(
            r#"{ "thresholds": { "large_band_min_de": 400.0 } }"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let result = ProcurementConfig::from_json(r#"{ "price_reference_limit": 0 }"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_from_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = ProcurementConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { ref path, .. } if path != "<inline>"));
    }

    #[test]
    fn test_explicit_catalog_path() {
        let config = ProcurementConfig {
            catalog_path: Some(PathBuf::from("/data/contracts_b.xlsx")),
            ..ProcurementConfig::default()
        };
        assert_eq!(
            config.resolve_catalog_path(),
            PathBuf::from("/data/contracts_b.xlsx")
        );
    }
}
