//! Tauri 命令模块
//!
//! 提供前端调用的所有 Tauri 命令接口，按功能分组：
//! - report: 报告状态查询与编辑命令
//! - export: 快照导出命令

pub mod export;
pub mod report;

// 重新导出所有命令
pub use export::*;
pub use report::*;
