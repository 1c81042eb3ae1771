pub mod completion_service;
pub mod conversation_structurer;
pub mod sales_analyzer;
