//! 西洋跳棋 AI 引擎
//!
//! 包含:
//! - 棋局评估函数（子力 + 位置分）
//! - Minimax + Alpha-Beta 剪枝（Hard 难度，固定 5 层）
//! - 可注入种子的均匀随机选择（Easy 难度）

mod evaluate;
mod search;

pub use evaluate::{Evaluator, KING_VALUE, MAN_VALUE};
pub use search::{AiConfig, AiEngine, Difficulty, HARD_SEARCH_DEPTH};
