// API 数据传输对象模块
// 包含所有与前端交互的数据结构

pub mod admin;
pub mod common;

pub use admin::*;
pub use common::*;
