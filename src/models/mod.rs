mod story;

pub use story::{HnItem, RankPatch, Story, SummaryPatch};
