//! Category store operations.

use sea_orm::prelude::*;
use uuid::Uuid;

use crate::{Category, EngineError, NewCategory, ResultEngine, categories, commands::CategoryPatch};

use super::{Engine, normalize_required_name};

impl Engine {
    pub async fn create_category(&self, cmd: NewCategory) -> ResultEngine<Category> {
        let name = normalize_required_name(&cmd.name, "category")?;

        let mut category = Category::new(name, cmd.kind);
        category.icon = cmd.icon;
        category.color = cmd.color;
        category.parent_id = cmd.parent_id;

        categories::ActiveModel::from(&category)
            .insert(&self.database)
            .await?;
        Ok(category)
    }

    pub async fn category(&self, id: Uuid) -> ResultEngine<Category> {
        let model = categories::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("category {id}")))?;
        Category::try_from(model)
    }

    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find().all(&self.database).await?;
        models.into_iter().map(Category::try_from).collect()
    }

    /// Case-insensitive partial match on the category name.
    ///
    /// Candidates are fetched and filtered in Rust so matching behaves the
    /// same regardless of the storage backend's collation.
    pub async fn find_categories_by_name(&self, query: &str) -> ResultEngine<Vec<Category>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches = self.list_categories().await?;
        matches.retain(|category| category.name.to_lowercase().contains(&needle));
        Ok(matches)
    }

    /// Apply a partial update; `None` fields keep their stored value.
    pub async fn update_category(&self, id: Uuid, patch: CategoryPatch) -> ResultEngine<Category> {
        let mut category = self.category(id).await?;

        if let Some(name) = patch.name {
            category.name = normalize_required_name(&name, "category")?;
        }
        if let Some(kind) = patch.kind {
            category.kind = kind;
        }
        if let Some(icon) = patch.icon {
            category.icon = Some(icon);
        }
        if let Some(color) = patch.color {
            category.color = Some(color);
        }
        if let Some(parent_id) = patch.parent_id {
            category.parent_id = Some(parent_id);
        }

        categories::ActiveModel::from(&category)
            .update(&self.database)
            .await?;
        Ok(category)
    }

    pub async fn remove_category(&self, id: Uuid) -> ResultEngine<()> {
        let result = categories::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::NotFound(format!("category {id}")));
        }
        Ok(())
    }
}
