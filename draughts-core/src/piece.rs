//! 棋子定义

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 白方（先手，在下方，向 y 增大方向前进）
    White,
    /// 黑方（后手，在上方，向 y 减小方向前进）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// 前进方向（y 轴增量）
    pub fn forward(&self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// 升王行（最远的一行）
    pub fn crowning_row(&self) -> u8 {
        match self {
            Side::White => (BOARD_SIZE - 1) as u8,
            Side::Black => 0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

/// 棋子
///
/// 序列化格式即对外 API 格式: `{"color": "white", "king": false}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Side,
    pub king: bool,
}

impl Piece {
    /// 创建新兵
    pub fn man(color: Side) -> Self {
        Self { color, king: false }
    }

    /// 创建王
    pub fn king(color: Side) -> Self {
        Self { color, king: true }
    }

    /// 升王（不可逆）
    pub fn crowned(self) -> Self {
        Self {
            color: self.color,
            king: true,
        }
    }

    /// 可移动的斜向方向（兵只能向前，王四个方向）
    pub fn directions(&self) -> &'static [(i8, i8)] {
        const ALL: [(i8, i8); 4] = [(-1, 1), (1, 1), (-1, -1), (1, -1)];
        const UP: [(i8, i8); 2] = [(-1, 1), (1, 1)];
        const DOWN: [(i8, i8); 2] = [(-1, -1), (1, -1)];

        if self.king {
            &ALL
        } else {
            match self.color {
                Side::White => &UP,
                Side::Black => &DOWN,
            }
        }
    }
}

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 列 (0-7, 对应 A-H)
    pub x: u8,
    /// 行 (0-7, 对应 1-8)
    pub y: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(x: u8, y: u8) -> Option<Self> {
        if (x as usize) < BOARD_SIZE && (y as usize) < BOARD_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    /// 检查是否为深色格（唯一可落子的格子，A1 为深色格）
    pub fn is_dark(&self) -> bool {
        (self.x + self.y) % 2 == 0
    }

    /// 获取偏移后的位置
    pub fn offset(&self, dx: i8, dy: i8) -> Option<Position> {
        let new_x = self.x as i8 + dx;
        let new_y = self.y as i8 + dy;
        if new_x >= 0
            && (new_x as usize) < BOARD_SIZE
            && new_y >= 0
            && (new_y as usize) < BOARD_SIZE
        {
            Some(Position {
                x: new_x as u8,
                y: new_y as u8,
            })
        } else {
            None
        }
    }

    /// 转换为 64 格数组索引（行优先）
    pub fn to_index(&self) -> usize {
        self.y as usize * BOARD_SIZE + self.x as usize
    }

    /// 从 64 格数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Position {
                x: (index % BOARD_SIZE) as u8,
                y: (index / BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 深色格线性编号 (0-31)，浅色格返回 None
    pub fn dark_index(&self) -> Option<usize> {
        if self.is_dark() {
            Some(self.y as usize * 4 + self.x as usize / 2)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'A' + self.x) as char, self.y + 1)
    }
}
