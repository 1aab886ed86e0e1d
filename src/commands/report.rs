//! 报告状态命令
//!
//! 前端表单的每次编辑都调用这里的命令写入后端状态容器，
//! 命令返回变更后的完整状态快照，前端据此重渲染输出视图。
//! 状态仅在内存中，应用重启即回到种子数据。

use tracing::info;

use crate::models::{ReportMetrics, ReportState};
use crate::report::EvaluationField;
use crate::AppState;

/// 获取当前报告状态快照
#[tauri::command]
pub async fn get_report(state: tauri::State<'_, AppState>) -> Result<ReportState, String> {
    Ok(state.report.get().await)
}

/// 获取派生指标（合计/稼働日数/日均/任务合计）
#[tauri::command]
pub async fn get_report_metrics(
    state: tauri::State<'_, AppState>,
) -> Result<ReportMetrics, String> {
    Ok(state.report.metrics().await)
}

/// 获取任务列表的批量文本表示
#[tauri::command]
pub async fn get_tasks_text(state: tauri::State<'_, AppState>) -> Result<String, String> {
    Ok(state.report.tasks_as_text().await)
}

/// 更新某一天的稼働时间
#[tauri::command]
pub async fn set_working_hour(
    state: tauri::State<'_, AppState>,
    index: usize,
    value: f64,
) -> Result<ReportState, String> {
    state
        .report
        .set_working_hour(index, value)
        .await
        .map_err(|e| e.to_string())
}

/// 用批量文本整体重建任务列表
#[tauri::command]
pub async fn update_tasks_text(
    state: tauri::State<'_, AppState>,
    text: String,
) -> Result<ReportState, String> {
    let new_state = state.report.replace_tasks_from_text(&text).await;
    info!("任务列表已重建: {} 条", new_state.tasks.len());
    Ok(new_state)
}

/// 设置总合评价分
#[tauri::command]
pub async fn set_overall_score(
    state: tauri::State<'_, AppState>,
    score: f64,
) -> Result<ReportState, String> {
    Ok(state.report.set_overall_score(score).await)
}

/// 更新自我评价项目名称
#[tauri::command]
pub async fn set_assessment_label(
    state: tauri::State<'_, AppState>,
    id: i64,
    label: String,
) -> Result<ReportState, String> {
    Ok(state.report.set_assessment_label(id, label).await)
}

/// 更新自我评价项目评分
#[tauri::command]
pub async fn set_assessment_score(
    state: tauri::State<'_, AppState>,
    id: i64,
    score: f64,
) -> Result<ReportState, String> {
    Ok(state.report.set_assessment_score(id, score).await)
}

/// 追加空白评价项目
#[tauri::command]
pub async fn add_assessment_item(
    state: tauri::State<'_, AppState>,
) -> Result<ReportState, String> {
    Ok(state.report.add_assessment_item().await)
}

/// 按 id 删除评价项目
#[tauri::command]
pub async fn remove_assessment_item(
    state: tauri::State<'_, AppState>,
    id: i64,
) -> Result<ReportState, String> {
    Ok(state.report.remove_assessment_item(id).await)
}

/// 更新施策描述
#[tauri::command]
pub async fn set_initiative_description(
    state: tauri::State<'_, AppState>,
    id: i64,
    description: String,
) -> Result<ReportState, String> {
    Ok(state.report.set_initiative_description(id, description).await)
}

/// 更新总合评价的指定栏目
#[tauri::command]
pub async fn set_evaluation_field(
    state: tauri::State<'_, AppState>,
    field: EvaluationField,
    value: String,
) -> Result<ReportState, String> {
    Ok(state.report.set_evaluation_field(field, value).await)
}
