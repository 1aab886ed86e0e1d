//! 报告状态管理模块
//!
//! `ReportManager` 是顶层状态容器 [`ReportState`] 的唯一持有者，
//! 所有变更命令都经过这里。每次变更都整体替换受影响的子集合
//! （copy-on-write），读取方拿到的是完整克隆，导出管线因此总能
//! 捕获到一个时间点上的一致快照。状态不做持久化，重启即重置。

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::metrics;
use crate::models::{AssessmentItem, ReportMetrics, ReportState};
use crate::utils::task_parser;

/// 总合评价的可更新栏目
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvaluationField {
    Achievements,
    Challenges,
    NextWeekGoals,
}

pub struct ReportManager {
    state: RwLock<ReportState>,
}

impl ReportManager {
    /// 以默认种子数据创建管理器
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ReportState::default()),
        }
    }

    /// 获取当前状态的完整快照
    pub async fn get(&self) -> ReportState {
        self.state.read().await.clone()
    }

    /// 计算当前状态的全部派生指标
    pub async fn metrics(&self) -> ReportMetrics {
        let state = self.state.read().await;
        metrics::compute_all(&state.working_hours, &state.tasks)
    }

    /// 更新某一天的稼働时间
    ///
    /// 非法输入（NaN/无穷/负数）按0处理，与前端数字输入框的
    /// 强制转换行为一致；下标越界是调用方错误
    pub async fn set_working_hour(&self, index: usize, value: f64) -> Result<ReportState> {
        let mut state = self.state.write().await;
        if index >= state.working_hours.len() {
            anyhow::bail!("稼働时间下标越界: {}", index);
        }
        let mut hours = state.working_hours.clone();
        hours[index] = if value.is_finite() && value > 0.0 { value } else { 0.0 };
        state.working_hours = hours;
        Ok(state.clone())
    }

    /// 用批量文本整体重建任务列表
    ///
    /// 旧列表连同旧 id 一起废弃，格式坏掉的行静默丢弃
    pub async fn replace_tasks_from_text(&self, text: &str) -> ReportState {
        let tasks = task_parser::parse_tasks(text);
        let mut state = self.state.write().await;
        state.tasks = tasks;
        state.clone()
    }

    /// 当前任务列表的文本表示（批量编辑框的初始内容）
    pub async fn tasks_as_text(&self) -> String {
        let state = self.state.read().await;
        task_parser::tasks_to_text(&state.tasks)
    }

    /// 设置总合评价分（10分满分，超出范围截断）
    pub async fn set_overall_score(&self, score: f64) -> ReportState {
        let mut state = self.state.write().await;
        state.overall_score = if score.is_finite() {
            score.clamp(0.0, 10.0)
        } else {
            0.0
        };
        state.clone()
    }

    /// 更新自我评价项目的名称
    pub async fn set_assessment_label(&self, id: i64, label: String) -> ReportState {
        let mut state = self.state.write().await;
        state.self_assessment = state
            .self_assessment
            .iter()
            .map(|item| {
                if item.id == id {
                    AssessmentItem { label: label.clone(), ..item.clone() }
                } else {
                    item.clone()
                }
            })
            .collect();
        state.clone()
    }

    /// 更新自我评价项目的评分（各项目5分满分，超出范围截断）
    pub async fn set_assessment_score(&self, id: i64, score: f64) -> ReportState {
        let score = if score.is_finite() { score.clamp(0.0, 5.0) } else { 0.0 };
        let mut state = self.state.write().await;
        state.self_assessment = state
            .self_assessment
            .iter()
            .map(|item| {
                if item.id == id {
                    AssessmentItem { score, ..item.clone() }
                } else {
                    item.clone()
                }
            })
            .collect();
        state.clone()
    }

    /// 追加一个空白评价项目，返回新状态
    ///
    /// 新 id 取当前毫秒时间戳，保证会话内不与既有项目冲突
    pub async fn add_assessment_item(&self) -> ReportState {
        let mut state = self.state.write().await;
        let mut id = chrono::Utc::now().timestamp_millis();
        // 同一毫秒内连续追加时顺延，维持唯一性
        while state.self_assessment.iter().any(|item| item.id == id) {
            id += 1;
        }
        let mut items = state.self_assessment.clone();
        items.push(AssessmentItem {
            id,
            label: String::new(),
            score: 0.0,
        });
        state.self_assessment = items;
        state.clone()
    }

    /// 按 id 删除评价项目
    ///
    /// 只删除命中的那一项，其余项目的顺序和数量保持不变；
    /// id 不存在时等价于无操作
    pub async fn remove_assessment_item(&self, id: i64) -> ReportState {
        let mut state = self.state.write().await;
        state.self_assessment = state
            .self_assessment
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        state.clone()
    }

    /// 更新某条施策的描述（空字符串保留在集合里，展示层负责过滤）
    pub async fn set_initiative_description(&self, id: i64, description: String) -> ReportState {
        let mut state = self.state.write().await;
        let mut data = state.initiatives_data.clone();
        for initiative in data.initiatives.iter_mut() {
            if initiative.id == id {
                initiative.description = description.clone();
            }
        }
        state.initiatives_data = data;
        state.clone()
    }

    /// 更新总合评价的指定栏目
    pub async fn set_evaluation_field(&self, field: EvaluationField, value: String) -> ReportState {
        let mut state = self.state.write().await;
        let mut evaluation = state.overall_evaluation.clone();
        match field {
            EvaluationField::Achievements => evaluation.achievements = value,
            EvaluationField::Challenges => evaluation.challenges = value,
            EvaluationField::NextWeekGoals => evaluation.next_week_goals = value,
        }
        state.overall_evaluation = evaluation;
        state.clone()
    }
}

impl Default for ReportManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_working_hour() {
        let manager = ReportManager::new();
        let state = manager.set_working_hour(2, 6.5).await.unwrap();
        assert_eq!(state.working_hours[2], 6.5);
    }

    #[tokio::test]
    async fn test_set_working_hour_out_of_range() {
        let manager = ReportManager::new();
        assert!(manager.set_working_hour(14, 1.0).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_hour_coerces_to_zero() {
        let manager = ReportManager::new();
        let state = manager.set_working_hour(0, f64::NAN).await.unwrap();
        assert_eq!(state.working_hours[0], 0.0);
        let state = manager.set_working_hour(1, -3.0).await.unwrap();
        assert_eq!(state.working_hours[1], 0.0);
    }

    #[tokio::test]
    async fn test_replace_tasks_discards_old_list() {
        let manager = ReportManager::new();
        let state = manager.replace_tasks_from_text("新タスク: 1.5\n別タスク: 2").await;
        assert_eq!(state.tasks.len(), 2);
        assert_eq!(state.tasks[0].description, "新タスク");
    }

    #[tokio::test]
    async fn test_overall_score_clamped() {
        let manager = ReportManager::new();
        let state = manager.set_overall_score(12.0).await;
        assert_eq!(state.overall_score, 10.0);
        let state = manager.set_overall_score(-1.0).await;
        assert_eq!(state.overall_score, 0.0);
    }

    #[tokio::test]
    async fn test_remove_assessment_item_preserves_rest() {
        let manager = ReportManager::new();
        let before = manager.get().await.self_assessment;
        let target = before[2].id;
        let state = manager.remove_assessment_item(target).await;
        assert_eq!(state.self_assessment.len(), before.len() - 1);
        // 其余项目顺序不变
        let remaining_ids: Vec<i64> = state.self_assessment.iter().map(|i| i.id).collect();
        let expected: Vec<i64> = before
            .iter()
            .map(|i| i.id)
            .filter(|id| *id != target)
            .collect();
        assert_eq!(remaining_ids, expected);
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_noop() {
        let manager = ReportManager::new();
        let before = manager.get().await;
        let state = manager.remove_assessment_item(-42).await;
        assert_eq!(state.self_assessment, before.self_assessment);
    }

    #[tokio::test]
    async fn test_add_assessment_item_appends_blank() {
        let manager = ReportManager::new();
        let state = manager.add_assessment_item().await;
        assert_eq!(state.self_assessment.len(), 6);
        let added = state.self_assessment.last().unwrap();
        assert!(added.label.is_empty());
        assert_eq!(added.score, 0.0);
    }

    #[tokio::test]
    async fn test_assessment_score_clamped_to_five() {
        let manager = ReportManager::new();
        let state = manager.set_assessment_score(1, 9.0).await;
        let item = state.self_assessment.iter().find(|i| i.id == 1).unwrap();
        assert_eq!(item.score, 5.0);
    }

    #[tokio::test]
    async fn test_set_evaluation_field() {
        let manager = ReportManager::new();
        let state = manager
            .set_evaluation_field(EvaluationField::Challenges, "見積もり精度".to_string())
            .await;
        assert_eq!(state.overall_evaluation.challenges, "見積もり精度");
    }

    #[tokio::test]
    async fn test_initiative_update_keeps_empty_slots() {
        let manager = ReportManager::new();
        let state = manager
            .set_initiative_description(3, "新しい施策".to_string())
            .await;
        assert_eq!(state.initiatives_data.initiatives.len(), 4);
        assert_eq!(state.initiatives_data.initiatives[2].description, "新しい施策");
    }

    #[tokio::test]
    async fn test_tasks_text_round_trip() {
        let manager = ReportManager::new();
        let text = manager.tasks_as_text().await;
        let state = manager.replace_tasks_from_text(&text).await;
        assert_eq!(state.tasks.len(), 5);
        assert_eq!(state.tasks[3].description, "〇〇機能の設計");
        assert_eq!(state.tasks[3].time, 10.0);
    }
}
