pub mod analyze_call_use_case;
pub mod stage_observer;
pub mod upload_store;
