//! Category registry for spending/income classification.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Whether a category classifies income or expenses.
///
/// The kind is immutable in practice; pairing a category with a transaction
/// of the opposite type is a silent semantic error, not a rejected one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for CategoryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidRequest(format!(
                "invalid category kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// One level of nesting: subcategories point at a top-level parent.
    pub parent_id: Option<Uuid>,
    /// Marks rows inserted by the default seeding.
    pub is_default: bool,
}

impl Category {
    pub fn new(name: String, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            icon: None,
            color: None,
            parent_id: None,
            is_default: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub kind: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub parent_id: Option<String>,
    pub is_default: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(value: &Category) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            icon: ActiveValue::Set(value.icon.clone()),
            color: ActiveValue::Set(value.color.clone()),
            parent_id: ActiveValue::Set(value.parent_id.map(|id| id.to_string())),
            is_default: ActiveValue::Set(value.is_default),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound(format!("category {}", model.id)))?,
            name: model.name,
            kind: CategoryKind::try_from(model.kind.as_str())?,
            icon: model.icon,
            color: model.color,
            parent_id: model.parent_id.and_then(|s| Uuid::parse_str(&s).ok()),
            is_default: model.is_default,
        })
    }
}
