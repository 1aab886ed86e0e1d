// 工作绩效报告生成器 - Tauri应用主库
//
// 后端持有报告状态容器和快照导出管线；前端负责表单渲染、
// 图表和输出视图的栅格化（这些属于 UI 管道，不在后端范围内）

// 声明模块
pub mod commands;
pub mod event_bus;
pub mod export;
pub mod logger;
pub mod metrics;
pub mod models;
pub mod report;
pub mod snapshot;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use tauri::{Emitter, Manager};
use tracing::{info, warn};

use commands::*;
use event_bus::{AppEvent, EventBus};
use export::ExportManager;
use models::ExportSettings;
use report::ReportManager;

/// 应用状态
///
/// 报告状态与导出管线各自由一个管理器负责，经事件总线解耦：
/// - 报告管理器：状态容器的唯一持有者，处理全部编辑命令
/// - 导出管理器：快照解码、编码分发、落盘，持有进行中标志
/// - 事件总线：导出生命周期事件的发布/订阅
#[derive(Clone)]
pub struct AppState {
    /// 报告状态管理器
    pub report: Arc<ReportManager>,
    /// 导出管理器
    pub export: Arc<ExportManager>,
    /// 事件总线
    pub event_bus: Arc<EventBus>,
}

/// 解析导出文件的落盘目录
///
/// 优先用系统下载目录，取不到时退回应用数据目录
fn resolve_output_dir(app: &tauri::AppHandle) -> PathBuf {
    match app.path().download_dir() {
        Ok(dir) => dir,
        Err(e) => {
            warn!("获取下载目录失败（{}），使用应用数据目录", e);
            app.path()
                .app_data_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}

/// 把总线上的导出事件转发为 Tauri 事件，驱动前端按钮的忙碌状态
fn spawn_export_event_forwarder(app: tauri::AppHandle, event_bus: Arc<EventBus>) {
    let mut receiver = event_bus.subscribe();
    tauri::async_runtime::spawn(async move {
        while let Ok(event) = receiver.recv().await {
            let payload = match &event {
                AppEvent::ExportStarted { format } => serde_json::json!({
                    "status": "started",
                    "format": format,
                }),
                AppEvent::ExportCompleted { format, path } => serde_json::json!({
                    "status": "completed",
                    "format": format,
                    "path": path.to_string_lossy(),
                }),
                AppEvent::ExportFailed { format, error } => serde_json::json!({
                    "status": "failed",
                    "format": format,
                    "error": error,
                }),
            };
            let _ = app.emit("export-status", payload);
        }
    });
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // 创建日志广播器
    let log_broadcaster = Arc::new(logger::LogBroadcaster::new());

    // 初始化日志系统（带前端推送功能）
    logger::init_with_broadcaster(log_broadcaster.clone()).expect("Failed to initialize logger");

    tauri::Builder::default()
        .setup(move |app| {
            info!("初始化工作绩效报告生成器...");

            log_broadcaster.set_app_handle(app.handle().clone());

            let event_bus = Arc::new(EventBus::new(100));
            let output_dir = resolve_output_dir(app.handle());
            info!("导出目录: {:?}", output_dir);

            let state = AppState {
                report: Arc::new(ReportManager::new()),
                export: Arc::new(ExportManager::new(
                    output_dir,
                    ExportSettings::default(),
                    event_bus.clone(),
                )),
                event_bus: event_bus.clone(),
            };

            spawn_export_event_forwarder(app.handle().clone(), event_bus);

            app.manage(state);
            Ok(())
        })
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            get_report,
            get_report_metrics,
            get_tasks_text,
            set_working_hour,
            update_tasks_text,
            set_overall_score,
            set_assessment_label,
            set_assessment_score,
            add_assessment_item,
            remove_assessment_item,
            set_initiative_description,
            set_evaluation_field,
            export_report,
            get_export_status,
            get_export_settings,
            open_export_file,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
