//! 西洋跳棋共享核心库
//!
//! 包含:
//! - 棋子、棋盘、位置等核心数据结构
//! - 走法生成和规则验证（强制吃子、连跳、升王）
//! - 终局判定
//! - 代数坐标表示法 (A1-H8)

mod board;
mod constants;
mod error;
mod moves;
mod notation;
mod piece;

pub use board::Board;
pub use constants::*;
pub use error::{GameError, Result, RuleViolation};
pub use moves::{Move, MoveGenerator};
pub use notation::Notation;
pub use piece::{Piece, Position, Side};
