//! Reply decision: whether a classified item earns an automated reply, and
//! the reply text when it does.

pub mod decision;

pub use decision::{ReplyDecision, ReplyDecisionEngine, ReplyPolicy};
