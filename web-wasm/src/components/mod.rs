pub mod plot;
pub mod section_card;
pub mod status_badge;
