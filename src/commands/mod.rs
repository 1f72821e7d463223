pub mod examples;
pub mod format;
pub mod parse;
pub mod split;
