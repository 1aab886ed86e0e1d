//! 快照导出命令
//!
//! 前端把输出视图栅格化后经 `export_report` 送到后端编码落盘。
//! 导出进行中时新的请求返回 `None`（静默无操作），按钮的
//! 忙碌状态由事件总线转发的导出生命周期事件驱动。

use tracing::info;

use crate::models::{ExportFormat, ExportSettings};
use crate::snapshot::SnapshotPayload;
use crate::AppState;

/// 导出当前报告视图快照
///
/// # 返回
/// - `Some(path)`: 导出完成的落盘路径
/// - `None`: 已有导出在进行中，本次请求被忽略
#[tauri::command]
pub async fn export_report(
    state: tauri::State<'_, AppState>,
    payload: SnapshotPayload,
    format: ExportFormat,
) -> Result<Option<String>, String> {
    state
        .export
        .export(payload, format)
        .await
        .map(|path| path.map(|p| p.to_string_lossy().to_string()))
        .map_err(|e| e.to_string())
}

/// 是否有导出在进行中
#[tauri::command]
pub async fn get_export_status(state: tauri::State<'_, AppState>) -> Result<bool, String> {
    Ok(state.export.is_exporting())
}

/// 获取导出设置（文件名、页面规格、超采样倍率）
#[tauri::command]
pub async fn get_export_settings(
    state: tauri::State<'_, AppState>,
) -> Result<ExportSettings, String> {
    Ok(state.export.settings().clone())
}

/// 用系统默认程序打开最近导出的文件
#[tauri::command]
pub async fn open_export_file(
    state: tauri::State<'_, AppState>,
    format: ExportFormat,
) -> Result<(), String> {
    let path = state.export.output_path(format);
    if !path.exists() {
        return Err(format!("尚未导出 {} 文件", format.extension()));
    }
    info!("打开导出文件: {:?}", path);
    tauri_plugin_opener::open_path(&path, None::<&str>).map_err(|e| e.to_string())
}
