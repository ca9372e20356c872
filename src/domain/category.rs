use serde::{Deserialize, Serialize};

/// Image category, e.g. `boxes`, `hats`, `sinks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
}
