//! VisualQuest — narrative session bounded context.
//!
//! Responsible for the choice-driven adventure lifecycle: image attachment,
//! story start, decision handling, conclusion, and reset.

pub mod application;
pub mod domain;
