use std::cmp::Reverse;
use std::sync::Arc;

use crate::api::{CatService, ImageQuery, Order};
use crate::app::{Result, WhiskerError};
use crate::domain::Cat;

/// Parameters for fetching the image gallery of one breed.
#[derive(Debug, Clone, Default)]
pub struct BreedImagesQuery {
    pub breed_id: String,
    pub limit: Option<i32>,
    pub page: Option<i32>,
    pub size: Option<String>,
    pub mime_types: Option<String>,
    pub format: Option<String>,
    pub order: Option<Order>,
    pub include_breeds: Option<bool>,
    pub include_categories: Option<bool>,
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    pub prioritize_quality: bool,
}

impl BreedImagesQuery {
    /// Reject a blank breed id before any network call; clamp the rest.
    pub fn validated(&self) -> Result<Self> {
        if self.breed_id.trim().is_empty() {
            return Err(WhiskerError::Validation("Breed ID cannot be blank".into()));
        }
        let mut query = self.clone();
        query.limit = query.limit.map(|l| l.clamp(1, 100));
        query.page = query.page.map(|p| p.max(0));
        Ok(query)
    }

    fn to_image_query(&self) -> ImageQuery {
        ImageQuery {
            limit: self.limit,
            size: self.size.clone(),
            mime_types: self.mime_types.clone(),
            format: self.format.clone(),
            order: self.order,
            page: self.page,
            category_ids: None,
            breed_ids: Some(self.breed_id.clone()),
            include_breeds: self.include_breeds,
            include_categories: self.include_categories,
        }
    }
}

/// Fetch images for one breed, optionally ranked by metadata quality.
pub struct GetImagesByBreed {
    service: Arc<dyn CatService>,
}

impl GetImagesByBreed {
    pub fn new(service: Arc<dyn CatService>) -> Self {
        Self { service }
    }

    pub async fn run(&self, query: BreedImagesQuery) -> Result<Vec<Cat>> {
        let query = query.validated()?;
        let cats = self.service.search_images(&query.to_image_query()).await?;
        Ok(process_cats(cats, &query))
    }
}

fn process_cats(cats: Vec<Cat>, query: &BreedImagesQuery) -> Vec<Cat> {
    let mut cats: Vec<Cat> = cats
        .into_iter()
        .filter(|cat| !cat.image_url.trim().is_empty())
        .collect();

    if query.min_width.is_some() || query.min_height.is_some() {
        cats.retain(|cat| {
            let width_ok = query.min_width.map_or(true, |w| cat.width >= w);
            let height_ok = query.min_height.map_or(true, |h| cat.height >= h);
            width_ok && height_ok
        });
    }

    if query.include_breeds == Some(true) {
        cats.retain(|cat| !cat.breeds.is_empty());
    }

    if query.prioritize_quality {
        cats.sort_by_key(|cat| (Reverse(quality_score(cat)), Reverse(cat.pixel_area())));
    }

    cats
}

/// Heuristic metadata-richness score. The weights are tunable; these are
/// the values the ranking has shipped with.
pub(crate) fn quality_score(cat: &Cat) -> i32 {
    let mut score = 0;
    if !cat.breeds.is_empty() {
        score += 10;
    }
    if cat
        .breeds
        .iter()
        .any(|b| b.description.as_deref().is_some_and(|s| !s.trim().is_empty()))
    {
        score += 5;
    }
    if cat
        .breeds
        .iter()
        .any(|b| b.temperament.as_deref().is_some_and(|s| !s.trim().is_empty()))
    {
        score += 3;
    }
    if !cat.categories.is_empty() {
        score += 2;
    }
    score
}
