pub mod briefing;
pub mod email;
