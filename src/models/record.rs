use serde::{Deserialize, Serialize};

/// Display fields derived from the metadata lookup, before images are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRecord {
    pub title: String,
    pub subtitle: String,
    pub tags: String,
    pub search_q: String,
    pub random_limit: u32,
}

impl PartialRecord {
    pub fn with_images(self, images: Vec<String>) -> ResultRecord {
        ResultRecord {
            title: self.title,
            subtitle: self.subtitle,
            tags: self.tags,
            search_q: self.search_q,
            random_limit: self.random_limit,
            images,
        }
    }
}

/// The assembled page payload. This is exactly what gets cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: String,
    pub subtitle: String,
    pub tags: String,
    pub search_q: String,
    pub random_limit: u32,
    pub images: Vec<String>,
}
