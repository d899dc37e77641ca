pub mod candidates;
pub mod dispatch;
pub mod insights;
pub mod interactions;
pub mod shared;
pub mod startup;
pub mod swipe;
pub mod swiper;
