//! Action rows and the action type table.
//!
//! Action types are persisted as ordinals into [`ActionType::TABLE`]. The
//! table is append-only: an ordinal, once assigned, always names the same
//! connector. Everything outside the storage boundary sees the string name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{Audit, Id, RowKind, Scope, Version};

/// Connector or transform kind of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Transformer,
    RestApi,
    GraphQl,
    Redis,
    MySql,
    MariaDb,
    PostgreSql,
    MongoDb,
    TiDb,
    Elasticsearch,
    S3,
    Smtp,
    SupabaseDb,
    Firebase,
    ClickHouse,
    MsSql,
    HuggingFace,
    DynamoDb,
    Snowflake,
    CouchDb,
    HfEndpoint,
    Oracle,
}

impl ActionType {
    /// Ordinal-to-type table. Append new types at the end only.
    pub const TABLE: [ActionType; 22] = [
        ActionType::Transformer,
        ActionType::RestApi,
        ActionType::GraphQl,
        ActionType::Redis,
        ActionType::MySql,
        ActionType::MariaDb,
        ActionType::PostgreSql,
        ActionType::MongoDb,
        ActionType::TiDb,
        ActionType::Elasticsearch,
        ActionType::S3,
        ActionType::Smtp,
        ActionType::SupabaseDb,
        ActionType::Firebase,
        ActionType::ClickHouse,
        ActionType::MsSql,
        ActionType::HuggingFace,
        ActionType::DynamoDb,
        ActionType::Snowflake,
        ActionType::CouchDb,
        ActionType::HfEndpoint,
        ActionType::Oracle,
    ];

    /// The stored ordinal.
    pub fn ordinal(self) -> u8 {
        match self {
            ActionType::Transformer => 0,
            ActionType::RestApi => 1,
            ActionType::GraphQl => 2,
            ActionType::Redis => 3,
            ActionType::MySql => 4,
            ActionType::MariaDb => 5,
            ActionType::PostgreSql => 6,
            ActionType::MongoDb => 7,
            ActionType::TiDb => 8,
            ActionType::Elasticsearch => 9,
            ActionType::S3 => 10,
            ActionType::Smtp => 11,
            ActionType::SupabaseDb => 12,
            ActionType::Firebase => 13,
            ActionType::ClickHouse => 14,
            ActionType::MsSql => 15,
            ActionType::HuggingFace => 16,
            ActionType::DynamoDb => 17,
            ActionType::Snowflake => 18,
            ActionType::CouchDb => 19,
            ActionType::HfEndpoint => 20,
            ActionType::Oracle => 21,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::TABLE.get(usize::from(ordinal)).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Transformer => "transformer",
            ActionType::RestApi => "restapi",
            ActionType::GraphQl => "graphql",
            ActionType::Redis => "redis",
            ActionType::MySql => "mysql",
            ActionType::MariaDb => "mariadb",
            ActionType::PostgreSql => "postgresql",
            ActionType::MongoDb => "mongodb",
            ActionType::TiDb => "tidb",
            ActionType::Elasticsearch => "elasticsearch",
            ActionType::S3 => "s3",
            ActionType::Smtp => "smtp",
            ActionType::SupabaseDb => "supabasedb",
            ActionType::Firebase => "firebase",
            ActionType::ClickHouse => "clickhouse",
            ActionType::MsSql => "mssql",
            ActionType::HuggingFace => "huggingface",
            ActionType::DynamoDb => "dynamodb",
            ActionType::Snowflake => "snowflake",
            ActionType::CouchDb => "couchdb",
            ActionType::HfEndpoint => "hfendpoint",
            ActionType::Oracle => "oracle",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::TABLE
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown action type: {}", s))
    }
}

/// Outside storage an action type is its name.
impl Serialize for ActionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter storing an [`ActionType`] as its ordinal.
pub mod ordinal {
    use super::*;

    pub fn serialize<S: Serializer>(kind: &ActionType, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(kind.ordinal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ActionType, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        ActionType::from_ordinal(raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown action type ordinal {}", raw)))
    }
}

/// A stored connector/transform configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: Id,
    pub app: Id,
    pub version: Version,

    /// External resource this action runs against. Not cloned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Id>,

    pub name: String,

    #[serde(with = "ordinal")]
    pub action_type: ActionType,

    #[serde(default)]
    pub template: Map<String, Value>,

    #[serde(default)]
    pub transformer: Map<String, Value>,

    pub trigger_mode: String,

    #[serde(flatten)]
    pub audit: Audit,
}

versioned_row!(Action, ActionType, RowKind::Action, action_type);

impl Action {
    pub fn new(
        scope: Scope,
        name: impl Into<String>,
        action_type: ActionType,
        trigger_mode: impl Into<String>,
        audit: Audit,
    ) -> Self {
        Self {
            id: 0,
            app: scope.app,
            version: scope.version,
            resource: None,
            name: name.into(),
            action_type,
            template: Map::new(),
            transformer: Map::new(),
            trigger_mode: trigger_mode.into(),
            audit,
        }
    }

    pub fn with_resource(mut self, resource: Id) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn with_template(mut self, template: Map<String, Value>) -> Self {
        self.template = template;
        self
    }

    pub fn with_transformer(mut self, transformer: Map<String, Value>) -> Self {
        self.transformer = transformer;
        self
    }
}
