pub mod relations;
pub mod validation;

pub use relations::load_article_relations;
pub use validation::{FieldErrors, Validator};
