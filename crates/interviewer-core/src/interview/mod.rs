//! The interview itself: session context, turn-taking, completion gate,
//! extraction and the finalize pipeline.

pub mod controller;
pub mod extraction;
pub mod gate;
pub mod pipeline;
pub mod prompt;
pub mod session;
