pub mod admin_cards;
pub mod admin_talks;
pub mod cards;
pub mod mappings;
pub mod search;
pub mod talks;
pub mod themes;
pub mod validation;
