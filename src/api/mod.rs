pub mod http;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Breed, Cat, Category};

pub use http::HttpCatService;

/// Result ordering accepted by the image search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Random,
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Random => "RANDOM",
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// Wire-level parameters for `GET images/search`.
///
/// Every field is optional; omitted fields fall back to the remote
/// defaults (notably `limit`, which defaults to 1 server-side).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageQuery {
    pub limit: Option<i32>,
    pub size: Option<String>,
    pub mime_types: Option<String>,
    pub format: Option<String>,
    pub order: Option<Order>,
    pub page: Option<i32>,
    pub category_ids: Option<String>,
    pub breed_ids: Option<String>,
    pub include_breeds: Option<bool>,
    pub include_categories: Option<bool>,
}

impl ImageQuery {
    /// Render the set parameters as query pairs, skipping unset ones.
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(size) = &self.size {
            pairs.push(("size", size.clone()));
        }
        if let Some(mime_types) = &self.mime_types {
            pairs.push(("mime_types", mime_types.clone()));
        }
        if let Some(format) = &self.format {
            pairs.push(("format", format.clone()));
        }
        if let Some(order) = self.order {
            pairs.push(("order", order.as_str().to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(category_ids) = &self.category_ids {
            pairs.push(("category_ids", category_ids.clone()));
        }
        if let Some(breed_ids) = &self.breed_ids {
            pairs.push(("breed_ids", breed_ids.clone()));
        }
        if let Some(include_breeds) = self.include_breeds {
            pairs.push(("include_breeds", include_breeds.to_string()));
        }
        if let Some(include_categories) = self.include_categories {
            pairs.push(("include_categories", include_categories.to_string()));
        }
        pairs
    }
}

/// A new image to push to the remote collection.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub sub_id: Option<String>,
    pub breed_ids: Option<String>,
}

/// Remote cat image API.
///
/// Pure request/response mapping, no state. The feed controller and the
/// query layer only ever see this trait so tests can substitute a mock.
#[async_trait]
pub trait CatService: Send + Sync {
    async fn search_images(&self, query: &ImageQuery) -> Result<Vec<Cat>>;

    async fn get_image(&self, image_id: &str) -> Result<Cat>;

    async fn upload_image(&self, upload: &ImageUpload) -> Result<Cat>;

    async fn delete_image(&self, image_id: &str) -> Result<()>;

    async fn list_breeds(
        &self,
        attach_breed: Option<i32>,
        page: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<Breed>>;

    async fn search_breeds(&self, query: &str) -> Result<Vec<Breed>>;

    async fn list_categories(&self, limit: Option<i32>, page: Option<i32>) -> Result<Vec<Category>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_renders_no_pairs() {
        assert!(ImageQuery::default().to_query().is_empty());
    }

    #[test]
    fn test_query_renders_set_pairs() {
        let query = ImageQuery {
            limit: Some(10),
            size: Some("med".into()),
            order: Some(Order::Asc),
            page: Some(2),
            breed_ids: Some("siam".into()),
            include_breeds: Some(true),
            ..ImageQuery::default()
        };
        let pairs = query.to_query();
        assert!(pairs.contains(&("limit", "10".into())));
        assert!(pairs.contains(&("size", "med".into())));
        assert!(pairs.contains(&("order", "ASC".into())));
        assert!(pairs.contains(&("page", "2".into())));
        assert!(pairs.contains(&("breed_ids", "siam".into())));
        assert!(pairs.contains(&("include_breeds", "true".into())));
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn test_order_wire_values() {
        assert_eq!(Order::Random.as_str(), "RANDOM");
        assert_eq!(Order::Asc.as_str(), "ASC");
        assert_eq!(Order::Desc.as_str(), "DESC");
    }
}
