//! 代数坐标表示法
//!
//! 对外 API 使用列字母 + 行数字 (A1-H8) 表示位置，
//! 核心内部使用 (x, y) 坐标。只有深色格可被寻址。

use crate::error::{GameError, RuleViolation};
use crate::piece::Position;

/// 坐标转换
pub struct Notation;

impl Notation {
    /// 解析代数坐标（大小写均可），只接受深色格
    pub fn parse(input: &str) -> Result<Position, GameError> {
        let mut chars = input.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => {
                return Err(GameError::Validation(format!(
                    "expected algebraic square like 'C3', got '{input}'"
                )))
            }
        };

        let file = file.to_ascii_uppercase();
        if !('A'..='H').contains(&file) {
            return Err(GameError::Validation(format!("invalid file '{file}'")));
        }
        let rank = match rank.to_digit(10) {
            Some(rank @ 1..=8) => rank,
            _ => {
                return Err(GameError::Validation(format!("invalid rank '{rank}'")));
            }
        };

        let pos = Position::new_unchecked(file as u8 - b'A', (rank - 1) as u8);
        if !pos.is_dark() {
            return Err(RuleViolation::NotPlayable.into());
        }
        Ok(pos)
    }

    /// 格式化为代数坐标
    pub fn format(pos: Position) -> String {
        pos.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Notation::parse("A1").unwrap(), Position::new_unchecked(0, 0));
        assert_eq!(Notation::parse("C3").unwrap(), Position::new_unchecked(2, 2));
        assert_eq!(Notation::parse("H8").unwrap(), Position::new_unchecked(7, 7));
        // 小写同样接受
        assert_eq!(Notation::parse("b2").unwrap(), Position::new_unchecked(1, 1));
    }

    #[test]
    fn test_parse_light_square_rejected() {
        let result = Notation::parse("B1");
        assert!(matches!(
            result,
            Err(GameError::Rule(RuleViolation::NotPlayable))
        ));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(Notation::parse(""), Err(GameError::Validation(_))));
        assert!(matches!(Notation::parse("Z9"), Err(GameError::Validation(_))));
        assert!(matches!(Notation::parse("A0"), Err(GameError::Validation(_))));
        assert!(matches!(Notation::parse("A10"), Err(GameError::Validation(_))));
    }

    #[test]
    fn test_format_roundtrip() {
        for input in ["A1", "C3", "F6", "H8"] {
            let pos = Notation::parse(input).unwrap();
            assert_eq!(Notation::format(pos), input);
        }
    }
}
