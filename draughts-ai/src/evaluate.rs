//! 棋局评估函数

use draughts_core::{Board, Piece, Position, Side};

/// 兵的子力分值
pub const MAN_VALUE: i32 = 100;

/// 王的子力分值
pub const KING_VALUE: i32 = 250;

/// 评估器
pub struct Evaluator;

/// 棋子位置分值表（白方视角，黑方按 180 度旋转取值）
/// 索引为 y * 8 + x，只有深色格有非零值
mod position_tables {
    /// 兵的位置分值：越靠近升王行越高，中路略优于边路
    pub const MAN: [i32; 64] = [
         0,  0,  0,  0,  0,  0,  0,  0,
         0,  4,  0,  6,  0,  6,  0,  4,
         8,  0, 10,  0, 10,  0,  8,  0,
         0, 12,  0, 16,  0, 16,  0, 12,
        18,  0, 22,  0, 22,  0, 18,  0,
         0, 24,  0, 28,  0, 28,  0, 24,
        32,  0, 36,  0, 36,  0, 32,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  // 升王行由子力分体现
    ];

    /// 王的位置分值：控制中心（180 度旋转对称）
    pub const KING: [i32; 64] = [
         0,  0,  4,  0,  4,  0,  0,  0,
         0,  4,  0,  8,  0,  8,  0,  0,
         4,  0, 10,  0, 10,  0,  4,  0,
         0,  8,  0, 12,  0, 12,  0,  4,
         4,  0, 12,  0, 12,  0,  8,  0,
         0,  4,  0, 10,  0, 10,  0,  4,
         0,  0,  8,  0,  8,  0,  4,  0,
         0,  0,  0,  4,  0,  4,  0,  0,
    ];
}

impl Evaluator {
    /// 评估棋局（白方视角，正值对白方有利）
    pub fn evaluate(board: &Board) -> i32 {
        let mut score = 0;

        for (pos, piece) in board.all_pieces() {
            let piece_score = Self::evaluate_piece(pos, piece);
            match piece.color {
                Side::White => score += piece_score,
                Side::Black => score -= piece_score,
            }
        }

        score
    }

    /// 评估单个棋子的价值（包括位置分）
    fn evaluate_piece(pos: Position, piece: Piece) -> i32 {
        let base_value = if piece.king { KING_VALUE } else { MAN_VALUE };
        base_value + Self::position_bonus(pos, piece)
    }

    /// 获取位置加成分
    fn position_bonus(pos: Position, piece: Piece) -> i32 {
        let index = match piece.color {
            Side::White => pos.y as usize * 8 + pos.x as usize,
            // 黑方按 180 度旋转取值（只翻转 y 会落到浅色格上）
            Side::Black => (7 - pos.y as usize) * 8 + (7 - pos.x as usize),
        };

        if piece.king {
            position_tables::KING[index]
        } else {
            position_tables::MAN[index]
        }
    }

    /// 快速评估（仅计算子力差）
    pub fn evaluate_material(board: &Board) -> i32 {
        let mut score = 0;
        for (_, piece) in board.all_pieces() {
            let value = if piece.king { KING_VALUE } else { MAN_VALUE };
            match piece.color {
                Side::White => score += value,
                Side::Black => score -= value,
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draughts_core::Piece;

    #[test]
    fn test_initial_balance() {
        let board = Board::initial();
        assert_eq!(Evaluator::evaluate_material(&board), 0);
        assert_eq!(Evaluator::evaluate(&board), 0, "对称初始局面应该为 0");
    }

    #[test]
    fn test_material_advantage() {
        let mut board = Board::initial();
        // 拿掉一个黑兵
        let (pos, _) = board.pieces(Side::Black)[0];
        board.set(pos, None);

        assert_eq!(Evaluator::evaluate_material(&board), MAN_VALUE);
        assert!(Evaluator::evaluate(&board) > 0);
    }

    #[test]
    fn test_king_worth_more_than_man() {
        let mut with_king = Board::empty();
        with_king.set(Position::new_unchecked(3, 3), Some(Piece::king(Side::White)));

        let mut with_man = Board::empty();
        with_man.set(Position::new_unchecked(3, 3), Some(Piece::man(Side::White)));

        assert!(
            Evaluator::evaluate(&with_king) > Evaluator::evaluate(&with_man),
            "王的价值应该高于兵"
        );
    }

    #[test]
    fn test_advanced_man_bonus() {
        // 接近升王行的兵比初始行的兵价值高
        let mut advanced = Board::empty();
        advanced.set(Position::new_unchecked(2, 6), Some(Piece::man(Side::White)));

        let mut home = Board::empty();
        home.set(Position::new_unchecked(2, 0), Some(Piece::man(Side::White)));

        assert!(Evaluator::evaluate(&advanced) > Evaluator::evaluate(&home));
    }

    #[test]
    fn test_black_mirror() {
        // 对称位置的黑白兵位置分相同
        let mut board = Board::empty();
        board.set(Position::new_unchecked(2, 2), Some(Piece::man(Side::White)));
        board.set(Position::new_unchecked(5, 5), Some(Piece::man(Side::Black)));

        assert_eq!(Evaluator::evaluate(&board), 0, "镜像局面应该平衡");
    }
}
