use serde_json::Value;

use crate::database::models::{Article, Category, User};

use super::resource::{to_one, DocumentError, Field, JsonApiResource, ResourceObject};

pub const ARTICLES: &str = "articles";
pub const CATEGORIES: &str = "categories";
pub const AUTHORS: &str = "authors";

pub const CATEGORY: &str = "category";
pub const AUTHOR: &str = "author";

impl JsonApiResource for Article {
    const TYPE: &'static str = ARTICLES;
    const RELATIONSHIPS: &'static [&'static str] = &[CATEGORY, AUTHOR];

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<Article>] = &[
            ("title", |a: &Article| Value::String(a.title.clone())),
            ("slug", |a: &Article| Value::String(a.slug.clone())),
            ("content", |a: &Article| Value::String(a.content.clone())),
        ];
        FIELDS
    }

    fn route_key(&self) -> String {
        self.slug.clone()
    }

    fn related(&self, relation: &str) -> Result<Vec<ResourceObject>, DocumentError> {
        match relation {
            CATEGORY => to_one(Self::TYPE, relation, self.category.as_ref()),
            AUTHOR => to_one(Self::TYPE, relation, self.author.as_ref()),
            _ => Err(DocumentError::UnknownRelation {
                resource_type: Self::TYPE,
                relation: relation.to_string(),
            }),
        }
    }
}

impl JsonApiResource for Category {
    const TYPE: &'static str = CATEGORIES;

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<Category>] = &[("name", |c: &Category| Value::String(c.name.clone()))];
        FIELDS
    }

    fn route_key(&self) -> String {
        self.slug.clone()
    }
}

impl JsonApiResource for User {
    const TYPE: &'static str = AUTHORS;

    fn fields() -> &'static [Field<Self>] {
        const FIELDS: &[Field<User>] = &[("name", |u: &User| Value::String(u.name.clone()))];
        FIELDS
    }

    fn route_key(&self) -> String {
        self.id.to_string()
    }
}
