use std::sync::Arc;

use crate::api::CatService;
use crate::app::Result;
use crate::domain::Category;
use crate::query::contains_ignore_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySort {
    Name,
    Id,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryQuery {
    pub limit: Option<i32>,
    pub page: Option<i32>,
    pub filter_by_name: Option<String>,
    pub sort_by: Option<CategorySort>,
}

impl CategoryQuery {
    pub fn sanitized(&self) -> Self {
        let mut query = self.clone();
        query.limit = query.limit.map(|l| l.clamp(1, 100));
        query.page = query.page.map(|p| p.max(0));
        query
    }
}

/// Fetch the category listing used by the filter menu.
pub struct GetCategories {
    service: Arc<dyn CatService>,
}

impl GetCategories {
    pub fn new(service: Arc<dyn CatService>) -> Self {
        Self { service }
    }

    pub async fn run(&self, query: CategoryQuery) -> Result<Vec<Category>> {
        let query = query.sanitized();
        let categories = self.service.list_categories(query.limit, query.page).await?;
        Ok(process_categories(categories, &query))
    }
}

fn process_categories(mut categories: Vec<Category>, query: &CategoryQuery) -> Vec<Category> {
    if let Some(name) = &query.filter_by_name {
        categories.retain(|category| contains_ignore_case(&category.name, name));
    }

    match query.sort_by {
        Some(CategorySort::Name) => categories.sort_by(|a, b| a.name.cmp(&b.name)),
        Some(CategorySort::Id) => categories.sort_by_key(|c| c.id),
        None => {}
    }

    categories
}
