pub mod inventory;
pub mod offer_update;
