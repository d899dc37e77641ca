//! # moqi-pipeline
//!
//! The swipe → feedback → allocation → results pipeline that turns a
//! swiper's sequential choices into persisted interaction rows.
//!
//! - [`candidates`]: startups the swiper has not interacted with yet
//! - [`swipe`]: walks the candidate list recording like/dislike decisions
//! - [`feedback`]: per-startup feedback preference edits
//! - [`allocation`]: the fixed 100-coin budget, adjusted in steps of 10
//! - [`results`]: ranked summary of liked and disliked startups
//! - [`session`]: the explicit per-swiper session driving the stages
//! - [`insights`]: startup-side totals over persisted interactions
//!
//! Every store call goes through a [`guard::RequestGuard`] so a stalled
//! backend surfaces as a retryable timeout instead of hanging the session.

pub mod allocation;
pub mod candidates;
pub mod error;
pub mod feedback;
pub mod guard;
pub mod insights;
pub mod results;
pub mod session;
pub mod swipe;

pub use error::PipelineError;
pub use session::PipelineSession;
