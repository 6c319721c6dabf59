//! Cart state entity - Key-value slots holding serialized carts.
//!
//! Each row is one storage slot. The `value` column carries the whole cart
//! as a JSON list and is overwritten in full on every save.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart state database model - one serialized cart per key
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Storage slot key (e.g., `"menu_cart_v1"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Serialized cart contents
    pub value: String,
    /// When this slot was last written
    pub updated_at: DateTime,
}

/// `CartState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
