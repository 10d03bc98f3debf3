//! Domain types: users, activities, reactions, and filters.

pub mod activity;
pub mod filter;
pub mod user;

pub use activity::{
    Activity, ActivityType, InvalidActivityType, ReactionChange, Reactions, Reply, Thread,
};
pub use filter::Filter;
pub use user::User;
