//! 页面控制器：列表视图与表单的可复用状态机
//!
//! 核心逻辑是纯数据结构（不触碰 DOM），Leptos 信号只做薄封装，
//! 因此全部状态转移都能在宿主机上直接测试。

pub mod form;
pub mod list;
