use serde::{Deserialize, Serialize};

use crate::domain::{Breed, Category};

/// One cat image record as returned by the image search endpoint.
///
/// Immutable once constructed; the feed replaces records wholesale on
/// re-fetch, never mutates them in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cat {
    pub id: String,
    #[serde(rename = "url")]
    pub image_url: String,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub breeds: Vec<Breed>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub sub_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub breed_ids: Option<String>,
    #[serde(default)]
    pub pending: Option<i32>,
    #[serde(default)]
    pub approved: Option<i32>,
}

impl Cat {
    /// True when at least one attached breed carries a description,
    /// temperament or origin worth showing.
    pub fn has_breed_info(&self) -> bool {
        self.breeds.iter().any(|breed| {
            breed.description.as_deref().is_some_and(|s| !s.trim().is_empty())
                || breed.temperament.as_deref().is_some_and(|s| !s.trim().is_empty())
                || breed.origin.as_deref().is_some_and(|s| !s.trim().is_empty())
        })
    }

    /// Pixel area, used as a tie-breaker when ranking by quality.
    pub fn pixel_area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn primary_breed(&self) -> Option<&Breed> {
        self.breeds.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Breed;

    fn cat_with_breed(breed: Breed) -> Cat {
        Cat {
            id: "abc".into(),
            image_url: "https://cdn2.thecatapi.com/images/abc.jpg".into(),
            width: 640,
            height: 480,
            breeds: vec![breed],
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
    fn test_has_breed_info_with_description() {
        let breed = Breed {
            description: Some("A very round cat".into()),
            ..Breed::named("brit", "British Shorthair")
        };
        assert!(cat_with_breed(breed).has_breed_info());
    }

    #[test]
    fn test_has_breed_info_blank_fields_do_not_count() {
        let breed = Breed {
            description: Some("   ".into()),
            temperament: Some("".into()),
            ..Breed::named("brit", "British Shorthair")
        };
        assert!(!cat_with_breed(breed).has_breed_info());
    }

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{
            "id": "MTY3ODIyMQ",
            "url": "https://cdn2.thecatapi.com/images/MTY3ODIyMQ.jpg",
            "width": 1204,
            "height": 1445,
            "sub_id": "user-1",
            "original_filename": "cat.jpg"
        }"#;
        let cat: Cat = serde_json::from_str(json).unwrap();
        assert_eq!(cat.id, "MTY3ODIyMQ");
        assert_eq!(cat.image_url, "https://cdn2.thecatapi.com/images/MTY3ODIyMQ.jpg");
        assert_eq!(cat.sub_id.as_deref(), Some("user-1"));
        assert!(cat.breeds.is_empty());
        assert!(cat.categories.is_empty());
    }

    #[test]
    fn test_pixel_area() {
        let cat = cat_with_breed(Breed::named("brit", "British Shorthair"));
        assert_eq!(cat.pixel_area(), 640 * 480);
    }
}
