//! Map marker de-overlap ("spiderfy") and planning-application address matching.

pub mod cli_utils;
pub mod feature_io;
pub mod planning_match;
pub mod spiderfy;
