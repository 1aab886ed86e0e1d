//! 任务批量文本解析工具
//!
//! 把多行自由文本还原成任务列表，行格式为 `描述: 时间`，
//! 冒号支持半角 `:` 和全角 `：`，前后可以有空白。
//! 不符合格式的行直接丢弃，不向用户报错（有损的尽力解析）

use regex::Regex;
use std::sync::OnceLock;

use crate::models::Task;

/// 行匹配正则（只编译一次）
fn line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?)\s*[:：]\s*([\d.]+)").unwrap())
}

/// 从批量文本解析任务列表
///
/// id 由当前时间戳（毫秒）加行号生成，同一毫秒内的批量解析
/// 也能保证 id 唯一
///
/// # 参数
/// - `text`: 多行输入文本
///
/// # 返回
/// 新的任务列表，旧列表应被整体替换
pub fn parse_tasks(text: &str) -> Vec<Task> {
    parse_tasks_with_base(text, chrono::Utc::now().timestamp_millis())
}

/// 同 [`parse_tasks`]，但 id 基数由调用方指定（便于测试）
pub fn parse_tasks_with_base(text: &str, base_id: i64) -> Vec<Task> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let caps = line_regex().captures(line)?;
            let description = caps[1].trim();
            // 时间必须是合法十进制数（最多一个小数点），否则整行丢弃
            let time: f64 = caps[2].parse().ok()?;
            if description.is_empty() {
                return None;
            }
            Some(Task {
                id: base_id + index as i64,
                description: description.to_string(),
                time,
            })
        })
        .collect()
}

/// 任务列表的反向序列化（`描述: 时间` 按行拼接）
///
/// 输出必须能被 [`parse_tasks`] 再次解析，保证格式良好数据的
/// 编辑-再解析往返稳定（描述里含冒号等边界输入不在保证范围）
pub fn tasks_to_text(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|task| format!("{}: {}", task.description, task.time))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_lines() {
        let tasks = parse_tasks_with_base("タスクA: 1.5\nタスクB: 3", 100);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "タスクA");
        assert_eq!(tasks[0].time, 1.5);
        assert_eq!(tasks[1].description, "タスクB");
        assert_eq!(tasks[1].time, 3.0);
    }

    #[test]
    fn test_parse_drops_malformed_lines() {
        // 全角冒号行也要能解析，中间的坏行静默丢弃
        let tasks = parse_tasks_with_base("Task A: 2.5\ngarbage line\nTask B：3", 0);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "Task A");
        assert_eq!(tasks[0].time, 2.5);
        assert_eq!(tasks[1].description, "Task B");
        assert_eq!(tasks[1].time, 3.0);
    }

    #[test]
    fn test_parse_drops_invalid_number() {
        // 多个小数点不是合法数字
        let tasks = parse_tasks_with_base("Task A: 1.2.3\nTask B: 2", 0);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "Task B");
    }

    #[test]
    fn test_parse_drops_empty_description() {
        let tasks = parse_tasks_with_base(": 2.5\n  ：3\nTask C: 1", 0);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "Task C");
    }

    #[test]
    fn test_parse_ids_unique_within_batch() {
        let tasks = parse_tasks_with_base("A: 1\nB: 2\nC: 3", 42);
        assert_eq!(tasks[0].id, 42);
        assert_eq!(tasks[1].id, 43);
        assert_eq!(tasks[2].id, 44);
    }

    #[test]
    fn test_colon_with_surrounding_whitespace() {
        let tasks = parse_tasks_with_base("会議準備  :  1.0", 0);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "会議準備");
        assert_eq!(tasks[0].time, 1.0);
    }

    #[test]
    fn test_round_trip_preserves_pairs() {
        let original = parse_tasks_with_base("設計レビュー: 2.5\n実装: 10\nバグ修正: 0.5", 7);
        let text = tasks_to_text(&original);
        let reparsed = parse_tasks_with_base(&text, 9000);
        assert_eq!(reparsed.len(), original.len());
        for (a, b) in original.iter().zip(reparsed.iter()) {
            // id 允许不同，(描述, 时间) 对必须一致且保持顺序
            assert_eq!(a.description, b.description);
            assert_eq!(a.time, b.time);
        }
    }

    #[test]
    fn test_empty_input_yields_empty_list() {
        assert!(parse_tasks_with_base("", 0).is_empty());
        assert!(parse_tasks_with_base("\n\n", 0).is_empty());
    }
}
