//! Intent classification and auto-reply for social-media posts and comments.
//!
//! Items fetched from the platform are tokenized, tagged with a province,
//! classified by a served model and, when the predicted intent is a
//! "seeking" intent with enough confidence, answered with a templated reply.

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod dedup;
pub mod pipeline;
pub mod platform;
pub mod reply;
pub mod text;
