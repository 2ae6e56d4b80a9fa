//! # 桌游合集核心逻辑库
//!
//! 这个 `core` crate 包含了几款回合制小游戏的状态管理和规则：
//! 可配置的石头剪刀布（含自适应电脑对手）、井字棋和二十一点。
//! 它不做任何输入输出，控制台界面由上层的客户端负责。

mod opponent;
mod rps;
pub mod tictactoe;
pub mod twenty_one;

pub use opponent::*;

pub use rps::*;
