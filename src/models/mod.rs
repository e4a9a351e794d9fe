mod record;
mod search;

pub use record::{PartialRecord, ResultRecord};
pub use search::{CacheKey, SearchMode, SearchRequest};
