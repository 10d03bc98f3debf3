//! Pure feed operations: filtering, reactions, summaries, and text helpers.

pub mod filter;
pub mod mention;
pub mod reaction;
pub mod summary;
pub mod timeago;

pub use filter::{apply_filter, matches, project_for};
pub use mention::{Span, highlight_mentions, mentioned_names, render_marked};
pub use reaction::{QUICK_REACTIONS, append_reply, toggle_reaction};
pub use summary::{BarScale, TypeSummary, summarize};
pub use timeago::time_ago;
