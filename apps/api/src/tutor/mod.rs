// AI tutor chat.

pub mod handlers;
pub mod prompts;
