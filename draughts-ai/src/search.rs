//! 搜索引擎
//!
//! Easy 难度为均匀随机选择（可注入种子保证测试可复现），
//! Hard 难度为固定 5 层的 Minimax + Alpha-Beta 剪枝。
//! 两种难度返回的走法都严格来自当前局面的合法走法集。

use draughts_core::{Board, Move, MoveGenerator, Side};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::evaluate::Evaluator;

/// Hard 难度的固定搜索深度（半回合数）
pub const HARD_SEARCH_DEPTH: u8 = 5;

/// 输赢的终局分值（比任何子力评估都大）
const WIN_SCORE: i32 = 10_000;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：均匀随机选择合法走法
    Easy,
    /// 困难：Alpha-Beta 搜索 5 层
    Hard,
}

/// AI 配置
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub max_depth: u8,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                max_depth: 0,
            },
            Difficulty::Hard => Self {
                difficulty,
                max_depth: HARD_SEARCH_DEPTH,
            },
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Hard)
    }
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self::with_seed_config(config, rand::random())
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    /// 使用固定随机种子创建（测试用，Easy 难度可复现）
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_seed_config(AiConfig::from_difficulty(difficulty), seed)
    }

    fn with_seed_config(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            nodes_searched: 0,
        }
    }

    /// 选择走法
    ///
    /// 仅当合法走法集为空时返回 None（调用方应事先做终局检查）。
    pub fn choose(&mut self, board: &Board, side: Side) -> Option<Move> {
        let moves = MoveGenerator::legal_moves(board, side);
        if moves.is_empty() {
            return None;
        }

        // 只有一个走法时无需搜索
        if moves.len() == 1 {
            return moves.into_iter().next();
        }

        match self.config.difficulty {
            Difficulty::Easy => moves.choose(&mut self.rng).cloned(),
            Difficulty::Hard => Some(self.search(board, side, moves)),
        }
    }

    /// 根节点搜索：在合法走法集内取最优
    fn search(&mut self, board: &Board, side: Side, mut moves: Vec<Move>) -> Move {
        self.nodes_searched = 0;

        let mut best_score = i32::MIN;
        let mut best_index = 0;

        for (index, mv) in moves.iter().enumerate() {
            let next = MoveGenerator::apply(board, mv);
            let score = -self.alpha_beta(
                &next,
                side.opponent(),
                self.config.max_depth - 1,
                i32::MIN + 1,
                -best_score.max(i32::MIN + 1),
            );

            if score > best_score {
                best_score = score;
                best_index = index;
            }
        }

        tracing::debug!(
            nodes = self.nodes_searched,
            score = best_score,
            "alpha-beta 搜索完成"
        );

        moves.swap_remove(best_index)
    }

    /// Alpha-Beta 搜索（negamax 形式，返回 side 视角的分值）
    fn alpha_beta(&mut self, board: &Board, side: Side, depth: u8, mut alpha: i32, beta: i32) -> i32 {
        self.nodes_searched += 1;

        let moves = MoveGenerator::legal_moves(board, side);

        // 无子可动即告负；深度越浅的败局分值越低，促使 AI 拖延败局、尽快取胜
        if moves.is_empty() {
            return -WIN_SCORE - depth as i32;
        }

        if depth == 0 {
            return self.evaluate(board, side);
        }

        for mv in moves {
            let next = MoveGenerator::apply(board, &mv);
            let score = -self.alpha_beta(&next, side.opponent(), depth - 1, -beta, -alpha);

            if score >= beta {
                return beta; // Beta 剪枝
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    /// 评估当前局面（side 视角）
    fn evaluate(&self, board: &Board, side: Side) -> i32 {
        let score = Evaluator::evaluate(board);
        match side {
            Side::White => score,
            Side::Black => -score,
        }
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draughts_core::{Piece, Position};

    #[test]
    fn test_easy_returns_legal_move() {
        let board = Board::initial();
        let mut engine = AiEngine::with_seed(Difficulty::Easy, 7);

        let legal = MoveGenerator::legal_moves(&board, Side::White);
        for _ in 0..20 {
            let mv = engine.choose(&board, Side::White).unwrap();
            assert!(legal.contains(&mv), "Easy 选择必须来自合法走法集");
        }
    }

    #[test]
    fn test_easy_seeded_reproducible() {
        let board = Board::initial();

        let mut a = AiEngine::with_seed(Difficulty::Easy, 42);
        let mut b = AiEngine::with_seed(Difficulty::Easy, 42);

        for _ in 0..10 {
            assert_eq!(a.choose(&board, Side::White), b.choose(&board, Side::White));
        }
    }

    #[test]
    fn test_hard_returns_legal_move() {
        let board = Board::initial();
        let mut engine = AiEngine::with_seed(Difficulty::Hard, 1);

        let legal = MoveGenerator::legal_moves(&board, Side::Black);
        let mv = engine.choose(&board, Side::Black).unwrap();
        assert!(legal.contains(&mv), "Hard 选择必须来自合法走法集");
    }

    #[test]
    fn test_hard_deterministic() {
        let board = Board::initial();

        let mut a = AiEngine::with_seed(Difficulty::Hard, 1);
        let mut b = AiEngine::with_seed(Difficulty::Hard, 2);

        // Hard 不依赖随机数，不同种子结果一致
        assert_eq!(a.choose(&board, Side::White), b.choose(&board, Side::White));
    }

    #[test]
    fn test_no_moves_returns_none() {
        let mut board = Board::empty();
        board.set(Position::new_unchecked(0, 0), Some(Piece::man(Side::White)));

        let mut engine = AiEngine::from_difficulty(Difficulty::Hard);
        assert!(engine.choose(&board, Side::Black).is_none());
    }

    #[test]
    fn test_hard_prefers_winning_capture() {
        // 黑方只剩一个兵，白王可以直接吃掉它终结对局
        let mut board = Board::empty();
        board.set(Position::new_unchecked(4, 4), Some(Piece::king(Side::White)));
        board.set(Position::new_unchecked(3, 3), Some(Piece::man(Side::Black)));

        let mut engine = AiEngine::with_seed(Difficulty::Hard, 1);
        let mv = engine.choose(&board, Side::White).unwrap();

        assert!(mv.is_capture());
        let after = MoveGenerator::apply(&board, &mv);
        assert_eq!(after.count(Side::Black), 0);
    }

    #[test]
    fn test_hard_avoids_immediate_loss() {
        // 白兵 C3 若走 D4 会被 E5 的黑兵吃掉；B4 是安全的
        let mut board = Board::empty();
        board.set(Position::new_unchecked(2, 2), Some(Piece::man(Side::White)));
        board.set(Position::new_unchecked(4, 4), Some(Piece::man(Side::Black)));
        // 给双方各留一个远处的子，避免搜索树里出现清盘终局干扰
        board.set(Position::new_unchecked(0, 0), Some(Piece::king(Side::White)));
        board.set(Position::new_unchecked(7, 7), Some(Piece::king(Side::Black)));

        let mut engine = AiEngine::with_seed(Difficulty::Hard, 1);
        let mv = engine.choose(&board, Side::White).unwrap();

        assert_ne!(
            mv.to,
            Position::new_unchecked(3, 3),
            "不应送子: {:?}",
            mv
        );
    }

    #[test]
    fn test_single_move_shortcut() {
        let mut board = Board::empty();
        // 只有一个吃子走法
        board.set(Position::new_unchecked(2, 2), Some(Piece::man(Side::White)));
        board.set(Position::new_unchecked(3, 3), Some(Piece::man(Side::Black)));

        let mut engine = AiEngine::with_seed(Difficulty::Easy, 3);
        let mv = engine.choose(&board, Side::White).unwrap();
        assert_eq!(mv.to, Position::new_unchecked(4, 4));
    }
}
