// 数据模型模块 - 定义所有的数据结构

use serde::{Deserialize, Serialize};

/// 两周的稼働时间天数（周四起始，木金土日月火水 × 2）
pub const WORKING_DAYS: usize = 14;

/// 单个任务条目
///
/// `id` 在会话内唯一，由批量解析时的时间戳加行号生成；
/// 批量文本每次编辑都会整体重建任务列表，旧 id 全部废弃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// 会话内唯一ID
    pub id: i64,
    /// 任务描述
    pub description: String,
    /// 耗时（小时）
    pub time: f64,
}

/// 自定义自我评价项目（各项目5分满分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentItem {
    /// 会话内唯一ID
    pub id: i64,
    /// 评价项目名称
    pub label: String,
    /// 评分（0-5）
    pub score: f64,
}

/// 单条实施施策
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initiative {
    pub id: i64,
    /// 自由文本，空字符串在展示层过滤，底层集合保留
    pub description: String,
}

/// 实施施策集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiativesData {
    pub initiatives: Vec<Initiative>,
}

/// 总合评价的三个自由文本栏目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallEvaluation {
    /// 達成できたこと
    pub achievements: String,
    /// 課題点
    pub challenges: String,
    /// 次週の目標
    pub next_week_goals: String,
}

/// 应用顶层状态容器
///
/// 全部状态由 ReportManager 单一持有，所有变更以整体替换
/// 子结构的方式进行（copy-on-write），不做字段级原地修改，
/// 保证导出管线读到的永远是一个时间点上的一致快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportState {
    /// 14天稼働时间（第1周 木-水、第2周 木-水）
    pub working_hours: Vec<f64>,
    /// 任务列表
    pub tasks: Vec<Task>,
    /// 总合评价分（10分满分，与各项目评分相互独立）
    pub overall_score: f64,
    /// 自我评价项目
    pub self_assessment: Vec<AssessmentItem>,
    /// 总合评价文本
    pub overall_evaluation: OverallEvaluation,
    /// 实施施策
    pub initiatives_data: InitiativesData,
}

impl Default for ReportState {
    fn default() -> Self {
        let base_id = chrono::Utc::now().timestamp_millis();
        Self {
            working_hours: vec![
                4.0, 5.0, 0.0, 0.0, 4.0, 5.0, 4.5, // 第1周: 木 金 土 日 月 火 水
                4.0, 5.0, 0.0, 0.0, 4.0, 5.0, 4.5, // 第2周: 木 金 土 日 月 火 水
            ],
            tasks: vec![
                Task { id: base_id + 1, description: "顧客インタビュー準備".to_string(), time: 3.5 },
                Task { id: base_id + 2, description: "新規リード施策Aの実行".to_string(), time: 8.0 },
                Task { id: base_id + 3, description: "チーム定例・情報共有".to_string(), time: 2.5 },
                Task { id: base_id + 4, description: "〇〇機能の設計".to_string(), time: 10.0 },
                Task { id: base_id + 5, description: "△△のバグ修正".to_string(), time: 4.0 },
            ],
            overall_score: 7.5,
            self_assessment: vec![
                AssessmentItem { id: 1, label: "知識・スキル".to_string(), score: 3.5 },
                AssessmentItem { id: 2, label: "コミュニケーション".to_string(), score: 4.0 },
                AssessmentItem { id: 3, label: "問題解決力".to_string(), score: 3.8 },
                AssessmentItem { id: 4, label: "チーム貢献度".to_string(), score: 4.2 },
                AssessmentItem { id: 5, label: "時間管理".to_string(), score: 4.5 },
            ],
            overall_evaluation: OverallEvaluation {
                achievements: "ユーザーインタビューから得られた洞察を元に、◯◯という施策を実施し、△△という効果が見られました。".to_string(),
                challenges: "タスクの優先順位付けに時間がかかってしまうことがあった。".to_string(),
                next_week_goals: "次週は〇〇のタスクを完了させ、△△の技術調査を開始する。".to_string(),
            },
            initiatives_data: InitiativesData {
                initiatives: vec![
                    Initiative { id: 1, description: "（例）顧客インタビュー実施（10社）".to_string() },
                    Initiative { id: 2, description: "（例）新規リード獲得施策の実行".to_string() },
                    Initiative { id: 3, description: String::new() },
                    Initiative { id: 4, description: String::new() },
                ],
            },
        }
    }
}

/// 导出页面规格枚举
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    /// A4 纵向 (210mm × 297mm)
    A4,
}

impl PageFormat {
    /// 页面尺寸（毫米，宽 × 高）
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            Self::A4 => (210.0, 297.0),
        }
    }
}

/// 导出设置（仅内存中生效，不做持久化——状态在重启后重置是设计行为）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// 输出文件主名（不含扩展名）
    pub file_stem: String,
    /// PDF 页面规格
    pub page_format: PageFormat,
    /// 前端栅格化的超采样倍率
    pub supersample: f32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_stem: "work-performance-report".to_string(),
            page_format: PageFormat::A4,
            supersample: 2.0,
        }
    }
}

/// 导出格式枚举
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
        }
    }
}

/// 派生指标汇总（由 metrics 模块的纯函数计算，每次请求重新计算）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    /// 合计稼働时间
    pub total_hours: f64,
    /// 稼働日数（时长严格大于0的天数）
    pub working_days_count: usize,
    /// 日均稼働时间（稼働日数为0时取0）
    pub average_hours_per_day: f64,
    /// 任务耗时合计
    pub total_task_hours: f64,
}
