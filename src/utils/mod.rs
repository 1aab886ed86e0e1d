// 工具模块

pub mod task_parser;
