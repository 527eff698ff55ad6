pub mod health;
pub mod tts;
pub mod voices;
