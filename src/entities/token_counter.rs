use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-day sequence for repair tokens. Bumped with an atomic
/// increment-and-read inside the intake transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "token_counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub day_key: String,

    pub last_seq: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
