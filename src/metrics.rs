//! 派生指标模块
//!
//! 从状态容器计算汇总数值的纯函数，无副作用，
//! 输入量很小，每次渲染/请求时直接重新计算，不做缓存

use crate::models::{ReportMetrics, Task};

/// 合计稼働时间（全部14天之和）
pub fn total_hours(hours: &[f64]) -> f64 {
    hours.iter().sum()
}

/// 稼働日数（时长严格大于0的天数）
pub fn working_days_count(hours: &[f64]) -> usize {
    hours.iter().filter(|h| **h > 0.0).count()
}

/// 日均稼働时间
///
/// 稼働日数为0时返回0，避免除零
pub fn average_hours_per_day(hours: &[f64]) -> f64 {
    let days = working_days_count(hours);
    if days == 0 {
        return 0.0;
    }
    total_hours(hours) / days as f64
}

/// 任务耗时合计
pub fn total_task_hours(tasks: &[Task]) -> f64 {
    tasks.iter().map(|t| t.time).sum()
}

/// 一次性计算全部派生指标
pub fn compute_all(hours: &[f64], tasks: &[Task]) -> ReportMetrics {
    ReportMetrics {
        total_hours: total_hours(hours),
        working_days_count: working_days_count(hours),
        average_hours_per_day: average_hours_per_day(hours),
        total_task_hours: total_task_hours(tasks),
    }
}
