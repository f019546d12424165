//! Weather chat: intent extraction, Gemini adapter and the assistant
//! that combines them

pub mod assistant;
pub mod gemini;
pub mod intent;

pub use assistant::{ChatAssistant, ChatReply};
pub use gemini::GeminiClient;
pub use intent::{Intent, classify, extract_location, is_weather_query};
