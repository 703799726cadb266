// ==========================================
// 管材采购决策 - API 层
// ==========================================

pub mod error;
pub mod purchase_api;

pub use error::{ApiError, ApiResult};
pub use purchase_api::{FormOptions, PurchaseApi};
