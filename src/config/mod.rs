// ==========================================
// 管材采购决策 - 配置层
// ==========================================
// 职责: 规则阈值、联系人、合同表路径等配置
// 存储: JSON 文件（缺省字段使用默认值）
// ==========================================

pub mod procurement_config;

pub use procurement_config::{
    default_catalog_path, ConfigError, ContactDirectory, ProcurementConfig, RuleThresholds,
    CATALOG_PATH_ENV, CONFIG_PATH_ENV,
};
