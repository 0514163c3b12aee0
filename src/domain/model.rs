//! Cloud Controller v3 resource shapes.
//!
//! Only the fields the lookup chain and its output need are required; every
//! other field the API returns is either optional here or ignored by serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub first: Option<Link>,
    #[serde(default)]
    pub last: Option<Link>,
    #[serde(default)]
    pub next: Option<Link>,
    #[serde(default)]
    pub previous: Option<Link>,
}

/// 所有 list endpoint 共用的分頁外殼
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub pagination: Pagination,
    pub resources: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn has_more_pages(&self) -> bool {
        self.pagination.total_pages > 1 || self.pagination.next.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidRef {
    pub guid: String,
}

/// `{ "data": { "guid": ... } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToOne {
    pub data: GuidRef,
}

/// 同上，但 `data` 可能為 null（例如未指定 quota 的 space）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalToOne {
    #[serde(default)]
    pub data: Option<GuidRef>,
}

/// 每個資源的 `links`，例如 `self`、`space`、`organization`
pub type Links = BTreeMap<String, Link>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToMany {
    #[serde(default)]
    pub data: Vec<GuidRef>,
}

// region Domains

/// TCP domain 才會有 router group，HTTP domain 為 null
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterGroup {
    pub guid: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainRelationships {
    #[serde(default)]
    pub organization: OptionalToOne,
    #[serde(default)]
    pub shared_organizations: ToMany,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub guid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub router_group: Option<RouterGroup>,
    #[serde(default)]
    pub supported_protocols: Vec<String>,
    #[serde(default)]
    pub relationships: DomainRelationships,
    #[serde(default)]
    pub links: Links,
}

impl Domain {
    /// 擁有此 domain 的 org；共用 domain 沒有
    pub fn organization_guid(&self) -> Option<&str> {
        self.relationships
            .organization
            .data
            .as_ref()
            .map(|d| d.guid.as_str())
    }
}

// endregion

// region Routes

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRef {
    #[serde(rename = "type")]
    pub process_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationApp {
    pub guid: String,
    pub process: ProcessRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub guid: String,
    pub app: DestinationApp,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRelationships {
    pub space: ToOne,
    pub domain: ToOne,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub guid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub protocol: String,
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub destinations: Vec<Destination>,
    pub relationships: RouteRelationships,
    #[serde(default)]
    pub links: Links,
}

// endregion

// region Apps

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleData {
    #[serde(default)]
    pub buildpacks: Vec<String>,
    #[serde(default)]
    pub stack: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lifecycle {
    #[serde(rename = "type")]
    pub lifecycle_type: String,
    #[serde(default)]
    pub data: LifecycleData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppRelationships {
    pub space: ToOne,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub guid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub lifecycle: Option<Lifecycle>,
    pub relationships: AppRelationships,
    #[serde(default)]
    pub links: Links,
}

impl App {
    pub fn space_guid(&self) -> &str {
        &self.relationships.space.data.guid
    }
}

// endregion

// region Spaces

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceRelationships {
    pub organization: ToOne,
    #[serde(default)]
    pub quota: OptionalToOne,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    pub guid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub relationships: SpaceRelationships,
    #[serde(default)]
    pub links: Links,
}

impl Space {
    pub fn organization_guid(&self) -> &str {
        &self.relationships.organization.data.guid
    }
}

// endregion

// region Organizations

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationRelationships {
    #[serde(default)]
    pub quota: OptionalToOne,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub guid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub relationships: OrganizationRelationships,
    #[serde(default)]
    pub links: Links,
}

// endregion

/// 解析鏈的最終結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub organization: Organization,
    pub space: Space,
    pub app: App,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Organization: {} ({})",
            self.organization.name, self.organization.guid
        )?;
        writeln!(f, "Space       : {} ({})", self.space.name, self.space.guid)?;
        write!(f, "App         : {} ({})", self.app.name, self.app.guid)
    }
}
