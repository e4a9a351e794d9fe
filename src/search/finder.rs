use rand::Rng;

use crate::error::SearchError;
use crate::models::{PartialRecord, ResultRecord};
use crate::providers::ImageProvider;

/// Number of images requested per search.
pub const IMAGE_COUNT: u32 = 6;

/// Uniform offset in `[0, limit)`, or 0 when `limit` is 0.
pub fn pick_offset<R: Rng>(rng: &mut R, limit: u32) -> u32 {
    if limit == 0 {
        0
    } else {
        rng.gen_range(0..limit)
    }
}

/// Fetch images for `partial` starting at a random page offset, so repeated
/// searches show different results. Finding nothing is not an error.
pub async fn find_images(
    provider: &dyn ImageProvider,
    partial: PartialRecord,
) -> Result<ResultRecord, SearchError> {
    let offset = pick_offset(&mut rand::thread_rng(), partial.random_limit);
    let mut images = provider
        .search(&partial.search_q, IMAGE_COUNT, offset)
        .await?;
    images.truncate(IMAGE_COUNT as usize);

    tracing::debug!(
        "Found {} images for {:?} at offset {}",
        images.len(),
        partial.search_q,
        offset
    );

    Ok(partial.with_images(images))
}
