//! 西洋跳棋会话服务
//!
//! 在规则引擎（draughts-core）和 AI（draughts-ai）之上编排完整
//! 对局：会话持久化、逐会话并发控制、惰性超时、代币扣费与
//! 积分结算、PvE 的 AI 回应以及历史记录查询。

pub mod config;
pub mod history;
pub mod orchestrator;
pub mod record;
pub mod session;
pub mod store;

pub use config::SessionConfig;
pub use history::HistoryEntry;
pub use orchestrator::{GameService, MoveOutcome, StatusReport};
pub use record::MoveRecord;
pub use session::{GameSession, PlayerId, SessionId, SessionStatus, SessionType};
pub use store::{DebitOutcome, Economy, Identity, MemoryStore, MoveStore, SessionStore};
