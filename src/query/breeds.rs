use std::cmp::Reverse;
use std::sync::Arc;

use crate::api::CatService;
use crate::app::Result;
use crate::domain::Breed;
use crate::query::contains_ignore_case;

/// Sort key for breed listings. The level sorts are descending, so the
/// most affectionate/energetic/intelligent breeds come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreedSort {
    Name,
    Origin,
    AffectionLevel,
    EnergyLevel,
    Intelligence,
}

#[derive(Debug, Clone, Default)]
pub struct BreedQuery {
    pub attach_breed: Option<i32>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
    pub filter_by_origin: Option<String>,
    pub filter_by_temperament: Option<String>,
    pub sort_by: Option<BreedSort>,
}

impl BreedQuery {
    pub fn sanitized(&self) -> Self {
        let mut query = self.clone();
        query.limit = query.limit.map(|l| l.clamp(1, 100));
        query.page = query.page.map(|p| p.max(0));
        query
    }
}

/// Fetch, filter and rank breed listings and searches.
pub struct GetBreeds {
    service: Arc<dyn CatService>,
}

impl GetBreeds {
    pub fn new(service: Arc<dyn CatService>) -> Self {
        Self { service }
    }

    pub async fn run(&self, query: BreedQuery) -> Result<Vec<Breed>> {
        let query = query.sanitized();
        let breeds = self
            .service
            .list_breeds(query.attach_breed, query.page, query.limit)
            .await?;
        Ok(process_breeds(breeds, &query))
    }

    /// Search breeds by name. Blank queries return an empty result
    /// without touching the network; everything else is ranked by match
    /// relevance.
    pub async fn search(&self, query: &str) -> Result<Vec<Breed>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let breeds = self.service.search_breeds(query).await?;
        Ok(rank_by_relevance(breeds, query))
    }
}

fn process_breeds(mut breeds: Vec<Breed>, query: &BreedQuery) -> Vec<Breed> {
    if let Some(origin) = &query.filter_by_origin {
        breeds.retain(|breed| {
            breed
                .origin
                .as_deref()
                .is_some_and(|o| contains_ignore_case(o, origin))
        });
    }

    if let Some(temperament) = &query.filter_by_temperament {
        breeds.retain(|breed| {
            breed
                .temperament
                .as_deref()
                .is_some_and(|t| contains_ignore_case(t, temperament))
        });
    }

    match query.sort_by {
        Some(BreedSort::Name) => breeds.sort_by(|a, b| a.name.cmp(&b.name)),
        Some(BreedSort::Origin) => {
            breeds.sort_by(|a, b| a.origin.as_deref().unwrap_or("").cmp(b.origin.as_deref().unwrap_or("")))
        }
        Some(BreedSort::AffectionLevel) => {
            breeds.sort_by_key(|b| Reverse(b.affection_level.unwrap_or(0)))
        }
        Some(BreedSort::EnergyLevel) => breeds.sort_by_key(|b| Reverse(b.energy_level.unwrap_or(0))),
        Some(BreedSort::Intelligence) => breeds.sort_by_key(|b| Reverse(b.intelligence.unwrap_or(0))),
        None => {}
    }

    breeds
}

/// Match quality of a breed name against a search query: exact match
/// ranks 0, prefix match 1, substring match 2, anything else 3. All
/// comparisons are case-insensitive.
pub(crate) fn relevance_rank(name: &str, query: &str) -> u8 {
    let name = name.to_lowercase();
    let query = query.to_lowercase();
    if name == query {
        0
    } else if name.starts_with(&query) {
        1
    } else if name.contains(&query) {
        2
    } else {
        3
    }
}

/// Stable sort by relevance rank, ties broken alphabetically by name.
fn rank_by_relevance(mut breeds: Vec<Breed>, query: &str) -> Vec<Breed> {
    breeds.sort_by(|a, b| {
        relevance_rank(&a.name, query)
            .cmp(&relevance_rank(&b.name, query))
            .then_with(|| a.name.cmp(&b.name))
    });
    breeds
}
