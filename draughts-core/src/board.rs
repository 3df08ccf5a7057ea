//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;
use crate::error::{GameError, RuleViolation};
use crate::piece::{Piece, Position, Side};

/// 棋盘
///
/// 8x8 行优先存储，索引为 y * 8 + x。棋子只会出现在深色格上，
/// 浅色格恒为空。序列化格式即对外 API 的棋盘格式。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; BOARD_SIZE * BOARD_SIZE],
        }
    }

    /// 创建初始棋盘
    ///
    /// 白方 12 个兵占据 1-3 行的深色格，黑方 12 个兵占据 6-8 行的深色格。
    pub fn initial() -> Self {
        let mut board = Self::empty();

        for y in 0..3u8 {
            for x in 0..BOARD_SIZE as u8 {
                let pos = Position::new_unchecked(x, y);
                if pos.is_dark() {
                    board.set(pos, Some(Piece::man(Side::White)));
                }
            }
        }

        for y in 5..8u8 {
            for x in 0..BOARD_SIZE as u8 {
                let pos = Position::new_unchecked(x, y);
                if pos.is_dark() {
                    board.set(pos, Some(Piece::man(Side::Black)));
                }
            }
        }

        board
    }

    /// 获取指定位置的棋子
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[pos.to_index()]
        } else {
            None
        }
    }

    /// 设置指定位置的棋子
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if pos.is_valid() {
            self.squares[pos.to_index()] = piece;
        }
    }

    /// 获取指定阵营的所有棋子位置
    pub fn pieces(&self, side: Side) -> Vec<(Position, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.color == side)
            .collect()
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> Vec<(Position, Piece)> {
        let mut result = Vec::new();
        for index in 0..self.squares.len() {
            if let Some(piece) = self.squares[index] {
                if let Some(pos) = Position::from_index(index) {
                    result.push((pos, piece));
                }
            }
        }
        result
    }

    /// 统计指定阵营的棋子数
    pub fn count(&self, side: Side) -> usize {
        self.pieces(side).len()
    }

    /// 校验结构合法性：64 格且浅色格为空
    pub fn validate(&self) -> Result<(), GameError> {
        if self.squares.len() != BOARD_SIZE * BOARD_SIZE {
            return Err(RuleViolation::NotValidArray.into());
        }
        for index in 0..self.squares.len() {
            let pos = Position::from_index(index).ok_or(RuleViolation::NotValidArray)?;
            if !pos.is_dark() && self.squares[index].is_some() {
                return Err(RuleViolation::NotValidArray.into());
            }
        }
        Ok(())
    }

    /// 从持久化的 JSON 解析并校验
    pub fn from_json(raw: &str) -> Result<Self, GameError> {
        let board: Board = serde_json::from_str(raw)?;
        board.validate()?;
        Ok(board)
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PIECES_PER_SIDE;

    #[test]
    fn test_initial_board() {
        let board = Board::initial();

        assert_eq!(board.count(Side::White), PIECES_PER_SIDE);
        assert_eq!(board.count(Side::Black), PIECES_PER_SIDE);

        // 白方兵在 A1
        assert_eq!(
            board.get(Position::new_unchecked(0, 0)),
            Some(Piece::man(Side::White))
        );
        // 黑方兵在 B6 (x=1, y=5)
        assert_eq!(
            board.get(Position::new_unchecked(1, 5)),
            Some(Piece::man(Side::Black))
        );
        // 4-5 行（y=3,4）是空的
        for x in 0..8u8 {
            assert!(board.get(Position::new_unchecked(x, 3)).is_none());
            assert!(board.get(Position::new_unchecked(x, 4)).is_none());
        }
    }

    #[test]
    fn test_light_squares_empty() {
        let board = Board::initial();
        for index in 0..64 {
            let pos = Position::from_index(index).unwrap();
            if !pos.is_dark() {
                assert!(board.get(pos).is_none(), "浅色格必须为空: {}", pos);
            }
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let board = Board::initial();
        let json = board.to_json().unwrap();
        let parsed = Board::from_json(&json).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_from_json_malformed() {
        let result = Board::from_json("not a board");
        assert!(matches!(result, Err(GameError::Parse(_))));
    }

    #[test]
    fn test_from_json_wrong_length() {
        let json = serde_json::to_string(&vec![Option::<Piece>::None; 10]).unwrap();
        let result = Board::from_json(&json);
        assert!(matches!(
            result,
            Err(GameError::Rule(RuleViolation::NotValidArray))
        ));
    }

    #[test]
    fn test_from_json_piece_on_light_square() {
        let mut squares = vec![Option::<Piece>::None; 64];
        // B1 (index 1) 是浅色格
        squares[1] = Some(Piece::man(Side::White));
        let json = serde_json::to_string(&squares).unwrap();
        let result = Board::from_json(&json);
        assert!(matches!(
            result,
            Err(GameError::Rule(RuleViolation::NotValidArray))
        ));
    }
}
