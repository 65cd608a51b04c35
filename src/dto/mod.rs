/// Generic search and purge bodies.
pub mod collection;
/// Game catalog and deals bodies.
pub mod game;
/// Health endpoint body.
pub mod health;
/// Moderation queue, log and analysis bodies.
pub mod moderation;
/// Recommendation bodies.
pub mod recommendation;
/// Review and rating bodies.
pub mod review;
/// Tag bodies.
pub mod tag;
/// Account and session bodies.
pub mod user;
pub mod validation;
