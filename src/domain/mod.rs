pub mod breed;
pub mod cat;
pub mod category;

pub use breed::{Breed, Weight};
pub use cat::Cat;
pub use category::Category;
