// Compliance reporting: weighted maturity scoring, gap analysis, and the
// level-4 roadmap. The scorer is pure and synchronous — persistence and the
// HTTP surface live in handlers.

pub mod handlers;
pub mod scorer;
