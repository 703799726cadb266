// ==========================================
// 管材采购决策 - 核心库
// ==========================================
// 系统定位: 决策支持工具（采购员最终确认）
// 根据数量、包装形式、DE、PN 推荐采购渠道，
// 并引用有效合同价
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 合同目录 - 只读合同表与查询
pub mod catalog;

// 引擎层 - 采购规则
pub mod engine;

// 导入层 - 外部合同表
pub mod importer;

// 配置层
pub mod config;

// 数据库基础设施（SQLite 合同源）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 对外接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    Channel, ContractRecord, DecisionResult, DqReport, PackageType, PriceReference,
    PurchaseInput, PurchaseRequest, RequiredField,
};

pub use catalog::{ContractCatalog, SharedCatalog};

pub use engine::{DecisionEngine, EngineError, ProcurementRules};

pub use importer::{ContractImporter, ImportError};

pub use config::ProcurementConfig;

pub use api::{ApiError, FormOptions, PurchaseApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "管材采购决策";
