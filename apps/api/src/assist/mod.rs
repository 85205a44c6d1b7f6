// AI assist: thin pass-through from the editor to the AI client.

pub mod handlers;
pub mod prompts;
