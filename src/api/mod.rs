pub mod attendance;
pub mod chatbot;
pub mod employee;
pub mod leave;
