// ==========================================
// 维修服务报表引擎 - API 层
// ==========================================
// 职责: 对外报表接口，错误统一为 ApiError
// ==========================================

pub mod error;
pub mod report_api;

pub use error::{ApiError, ApiResult};
pub use report_api::ReportApi;
