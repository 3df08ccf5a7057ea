//! 走法生成和验证
//!
//! 实现强制吃子规则：只要存在吃子走法，合法走法集只包含吃子走法。
//! 连跳由同一棋子一次性走完，作为单个走法返回。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{Piece, Position, Side};

/// 走法
///
/// 吃子走法表示一条完整的连跳链：`to` 是最终落点，
/// `captured` 按跳吃顺序记录每个被吃棋子的位置。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始位置
    pub from: Position,
    /// 最终落点
    pub to: Position,
    /// 被吃棋子的位置（按顺序）
    pub captured: Vec<Position>,
    /// 本步是否升王
    pub promotes: bool,
}

impl Move {
    /// 创建平移走法
    pub fn step(from: Position, to: Position, promotes: bool) -> Self {
        Self {
            from,
            to,
            captured: Vec::new(),
            promotes,
        }
    }

    /// 是否为吃子走法
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_capture() {
            write!(f, "{} x {} ({} captured)", self.from, self.to, self.captured.len())
        } else {
            write!(f, "{} -> {}", self.from, self.to)
        }
    }
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定阵营的所有合法走法
    ///
    /// 强制吃子：存在任何吃子走法时，结果只包含吃子走法。
    pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
        let captures = Self::generate_captures(board, side);
        if !captures.is_empty() {
            return captures;
        }
        Self::generate_steps(board, side)
    }

    /// 生成所有吃子走法（每条完整连跳链一个走法）
    fn generate_captures(board: &Board, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();

        for (pos, piece) in board.pieces(side) {
            // 起点先腾空，连跳中王可以绕回起点落子
            let mut scratch = board.clone();
            scratch.set(pos, None);

            let mut captured = Vec::new();
            Self::chain_jumps(&scratch, pos, pos, piece, &mut captured, &mut moves);
        }

        moves
    }

    /// 深度优先扩展连跳链
    ///
    /// `scratch` 中不包含移动中的棋子和已被吃掉的棋子。
    /// 链无法继续延伸时输出一个完整走法；兵跳到升王行立即升王并结束连跳。
    fn chain_jumps(
        scratch: &Board,
        origin: Position,
        pos: Position,
        piece: Piece,
        captured: &mut Vec<Position>,
        moves: &mut Vec<Move>,
    ) {
        let mut extended = false;

        for &(dx, dy) in piece.directions() {
            let (mid, land) = match (pos.offset(dx, dy), pos.offset(dx * 2, dy * 2)) {
                (Some(mid), Some(land)) => (mid, land),
                _ => continue,
            };

            match scratch.get(mid) {
                Some(other) if other.color != piece.color => {}
                _ => continue,
            }

            if scratch.get(land).is_some() {
                continue;
            }

            extended = true;
            captured.push(mid);

            if !piece.king && land.y == piece.color.crowning_row() {
                // 升王结束连跳
                moves.push(Move {
                    from: origin,
                    to: land,
                    captured: captured.clone(),
                    promotes: true,
                });
            } else {
                let mut next = scratch.clone();
                next.set(mid, None);
                Self::chain_jumps(&next, origin, land, piece, captured, moves);
            }

            captured.pop();
        }

        if !extended && !captured.is_empty() {
            moves.push(Move {
                from: origin,
                to: pos,
                captured: captured.clone(),
                promotes: false,
            });
        }
    }

    /// 生成所有平移走法（单格斜走）
    fn generate_steps(board: &Board, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();

        for (pos, piece) in board.pieces(side) {
            for &(dx, dy) in piece.directions() {
                if let Some(to) = pos.offset(dx, dy) {
                    if board.get(to).is_none() {
                        let promotes = !piece.king && to.y == piece.color.crowning_row();
                        moves.push(Move::step(pos, to, promotes));
                    }
                }
            }
        }

        moves
    }

    /// 应用走法，返回新棋盘
    ///
    /// 移除所有被吃棋子、移动棋子、到达升王行则升王。
    /// 纯函数：相同的 (board, move) 总是产生相同结果。
    pub fn apply(board: &Board, mv: &Move) -> Board {
        let mut next = board.clone();

        let piece = match next.get(mv.from) {
            Some(piece) => piece,
            None => return next,
        };

        for &pos in &mv.captured {
            next.set(pos, None);
        }

        next.set(mv.from, None);

        let landed = if !piece.king && mv.to.y == piece.color.crowning_row() {
            piece.crowned()
        } else {
            piece
        };
        next.set(mv.to, Some(landed));

        next
    }

    /// 终局判定：轮到走子的一方无合法走法即告负
    ///
    /// 返回获胜方；局面未分出胜负时返回 None。
    /// 和棋（无吃子步数阈值）由会话层计数判定，不在此处。
    pub fn winner(board: &Board, side_to_move: Side) -> Option<Side> {
        if Self::legal_moves(board, side_to_move).is_empty() {
            Some(side_to_move.opponent())
        } else {
            None
        }
    }
}
