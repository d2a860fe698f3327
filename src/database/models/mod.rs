pub mod article;
pub mod category;
pub mod permission;
pub mod token;
pub mod user;

pub use article::{Article, ArticleChanges, NewArticle};
pub use category::{Category, NewCategory};
pub use permission::Permission;
pub use token::{NewToken, PersonalAccessToken};
pub use user::{NewUser, User};
