use crate::domain::model::{App, Domain, Organization, Route, Space};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 解析鏈需要的 Cloud Controller 查詢。
///
/// 每個方法回傳的錯誤都已帶上步驟前綴（例如 `get domains: ...`）。
#[async_trait]
pub trait CloudController: Send + Sync {
    /// 依名稱篩選 domain，只看第一頁
    async fn get_domains(&self, names: &[String]) -> Result<Vec<Domain>>;

    /// 依 host 與所屬 domain guid 篩選 route，只看第一頁
    async fn get_routes(&self, hosts: &[String], domain_guids: &[String]) -> Result<Vec<Route>>;

    async fn get_app(&self, guid: &str) -> Result<App>;

    async fn get_space(&self, guid: &str) -> Result<Space>;

    async fn get_organization(&self, guid: &str) -> Result<Organization>;
}
