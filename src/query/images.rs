use std::sync::Arc;

use crate::api::{CatService, ImageQuery, Order};
use crate::app::Result;
use crate::domain::Cat;

/// Caller-facing parameters for a random-cats fetch, before sanitation.
#[derive(Debug, Clone)]
pub struct RandomCatsQuery {
    pub limit: i32,
    pub size: Option<String>,
    pub mime_types: Option<String>,
    pub format: Option<String>,
    pub order: Option<Order>,
    pub page: Option<i32>,
    pub category_ids: Option<String>,
    pub breed_ids: Option<String>,
    pub prefer_breeds_with_info: bool,
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    pub include_breeds: Option<bool>,
    pub include_categories: Option<bool>,
}

impl Default for RandomCatsQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            size: None,
            mime_types: None,
            format: None,
            order: None,
            page: None,
            category_ids: None,
            breed_ids: None,
            prefer_breeds_with_info: false,
            min_width: None,
            min_height: None,
            include_breeds: None,
            include_categories: None,
        }
    }
}

impl RandomCatsQuery {
    /// Clamp out-of-range values instead of rejecting them: limit into
    /// [1,100], page to zero or above.
    pub fn sanitized(&self) -> Self {
        let mut query = self.clone();
        query.limit = query.limit.clamp(1, 100);
        query.page = query.page.map(|p| p.max(0));
        query
    }

    fn to_image_query(&self) -> ImageQuery {
        ImageQuery {
            limit: Some(self.limit),
            size: self.size.clone(),
            mime_types: self.mime_types.clone(),
            format: self.format.clone(),
            order: self.order,
            page: self.page,
            category_ids: self.category_ids.clone(),
            breed_ids: self.breed_ids.clone(),
            include_breeds: self.include_breeds,
            include_categories: self.include_categories,
        }
    }
}

/// Fetch a page of random cats and apply the client-side filters.
pub struct GetRandomCats {
    service: Arc<dyn CatService>,
}

impl GetRandomCats {
    pub fn new(service: Arc<dyn CatService>) -> Self {
        Self { service }
    }

    pub async fn run(&self, query: RandomCatsQuery) -> Result<Vec<Cat>> {
        let query = query.sanitized();
        let cats = self.service.search_images(&query.to_image_query()).await?;
        Ok(apply_post_filters(cats, &query))
    }
}

/// The filters the remote search cannot express, applied to a fetched page.
pub(crate) fn apply_post_filters(cats: Vec<Cat>, query: &RandomCatsQuery) -> Vec<Cat> {
    let original = cats.len();
    let mut cats: Vec<Cat> = cats
        .into_iter()
        .filter(|cat| !cat.image_url.trim().is_empty())
        .collect();

    if query.prefer_breeds_with_info {
        let before = cats.len();
        cats.retain(|cat| !cat.breeds.is_empty() && cat.has_breed_info());
        tracing::debug!("Breed info filter: {} -> {} cats", before, cats.len());
    }

    if query.min_width.is_some() || query.min_height.is_some() {
        let before = cats.len();
        cats.retain(|cat| {
            let width_ok = query.min_width.map_or(true, |w| cat.width >= w);
            let height_ok = query.min_height.map_or(true, |h| cat.height >= h);
            width_ok && height_ok
        });
        tracing::debug!("Size filter: {} -> {} cats", before, cats.len());
    }

    tracing::debug!("Total filtering: {} -> {} cats", original, cats.len());
    cats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Breed;

    fn cat(id: &str, url: &str, width: i32, height: i32) -> Cat {
        Cat {
            id: id.into(),
            image_url: url.into(),
            width,
            height,
            breeds: Vec::new(),
            categories: Vec::new(),
            sub_id: None,
            created_at: None,
            original_filename: None,
            breed_ids: None,
            pending: None,
            approved: None,
        }
    }

    #[test]
    fn test_limit_clamped_into_range() {
        let high = RandomCatsQuery {
            limit: 500,
            ..RandomCatsQuery::default()
        };
        assert_eq!(high.sanitized().limit, 100);

        let low = RandomCatsQuery {
            limit: 0,
            ..RandomCatsQuery::default()
        };
        assert_eq!(low.sanitized().limit, 1);

        let negative = RandomCatsQuery {
            limit: -7,
            ..RandomCatsQuery::default()
        };
        assert_eq!(negative.sanitized().limit, 1);
    }

    #[test]
    fn test_negative_page_clamped_to_zero() {
        let query = RandomCatsQuery {
            page: Some(-3),
            ..RandomCatsQuery::default()
        };
        assert_eq!(query.sanitized().page, Some(0));

        let unset = RandomCatsQuery::default();
        assert_eq!(unset.sanitized().page, None);
    }

    #[test]
    fn test_blank_image_urls_dropped() {
        let cats = vec![cat("a", "https://x/a.jpg", 100, 100), cat("b", "  ", 100, 100)];
        let kept = apply_post_filters(cats, &RandomCatsQuery::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
    }

    #[test]
    fn test_prefer_breeds_with_info_filter() {
        let mut with_info = cat("a", "https://x/a.jpg", 100, 100);
        with_info.breeds = vec![Breed {
            temperament: Some("Calm".into()),
            ..Breed::named("brit", "British Shorthair")
        }];
        let mut without_info = cat("b", "https://x/b.jpg", 100, 100);
        without_info.breeds = vec![Breed::named("mala", "Malayan")];
        let breedless = cat("c", "https://x/c.jpg", 100, 100);

        let query = RandomCatsQuery {
            prefer_breeds_with_info: true,
            ..RandomCatsQuery::default()
        };
        let kept = apply_post_filters(vec![with_info, without_info, breedless], &query);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
    }

    #[test]
    fn test_min_dimension_filter() {
        let cats = vec![
            cat("small", "https://x/s.jpg", 640, 480),
            cat("large", "https://x/l.jpg", 1024, 768),
        ];
        let query = RandomCatsQuery {
            min_width: Some(800),
            min_height: Some(600),
            ..RandomCatsQuery::default()
        };
        let kept = apply_post_filters(cats, &query);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "large");
    }
}
