//! Notification template model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

/// Which user action a template is shown after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Purchase,
    Borrow,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Purchase => "purchase",
            TemplateType::Borrow => "borrow",
        }
    }
}

impl std::fmt::Display for TemplateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "purchase" => Ok(TemplateType::Purchase),
            "borrow" => Ok(TemplateType::Borrow),
            _ => Err(format!("Invalid template type: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for TemplateType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for TemplateType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for TemplateType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Admin-configurable message shown to users after a purchase or borrow
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NotificationTemplate {
    pub id: i32,
    pub template_type: TemplateType,
    pub title: String,
    pub message: String,
    pub is_active: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Update (upsert) template request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTemplate {
    pub title: Option<String>,
    pub message: Option<String>,
    pub is_active: Option<bool>,
}
