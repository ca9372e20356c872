use serde::{Deserialize, Serialize};

/// Breed metadata attached to cat images and returned by the breed
/// endpoints. Almost every field is optional on the wire; the integer
/// scales run 0-5.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Breed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub temperament: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub country_codes: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub life_span: Option<String>,
    #[serde(default)]
    pub indoor: Option<i32>,
    #[serde(default)]
    pub lap: Option<i32>,
    #[serde(default)]
    pub alt_names: Option<String>,
    #[serde(default)]
    pub adaptability: Option<i32>,
    #[serde(default)]
    pub affection_level: Option<i32>,
    #[serde(default)]
    pub child_friendly: Option<i32>,
    #[serde(default)]
    pub dog_friendly: Option<i32>,
    #[serde(default)]
    pub energy_level: Option<i32>,
    #[serde(default)]
    pub grooming: Option<i32>,
    #[serde(default)]
    pub health_issues: Option<i32>,
    #[serde(default)]
    pub intelligence: Option<i32>,
    #[serde(default)]
    pub shedding_level: Option<i32>,
    #[serde(default)]
    pub social_needs: Option<i32>,
    #[serde(default)]
    pub stranger_friendly: Option<i32>,
    #[serde(default)]
    pub vocalisation: Option<i32>,
    #[serde(default)]
    pub experimental: Option<i32>,
    #[serde(default)]
    pub hairless: Option<i32>,
    #[serde(default)]
    pub natural: Option<i32>,
    #[serde(default)]
    pub rare: Option<i32>,
    #[serde(default)]
    pub rex: Option<i32>,
    #[serde(default)]
    pub suppressed_tail: Option<i32>,
    #[serde(default)]
    pub short_legs: Option<i32>,
    #[serde(default)]
    pub wikipedia_url: Option<String>,
    #[serde(default)]
    pub hypoallergenic: Option<i32>,
    #[serde(default)]
    pub reference_image_id: Option<String>,
    #[serde(default)]
    pub weight: Option<Weight>,
}

/// Weight range as display strings, e.g. `7 - 10` / `3 - 5`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weight {
    pub imperial: String,
    pub metric: String,
}

impl Breed {
    /// Minimal breed with only id and name set, the shape most tests and
    /// the filter menus care about.
    pub fn named(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }
}
