pub mod dedup;
pub mod pipeline;
pub mod publish_service;
pub mod traits;

pub use pipeline::{Pipeline, RunReport};
pub use publish_service::DiscordNotifier;
pub use traits::Notifier;
