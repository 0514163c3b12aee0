use crate::domain::model::{Resolution, Route};
use crate::domain::ports::CloudController;
use crate::utils::error::{LookupError, ResourceKind, Result};

/// 把 `myapp.example.com` 這類 hostname 解析成擁有它的 org / space / app
pub struct RouteResolver<C: CloudController> {
    api: C,
}

impl<C: CloudController> RouteResolver<C> {
    pub fn new(api: C) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    pub async fn resolve(&self, query: &str) -> Result<Resolution> {
        let (host, domain_name) = split_hostname(query)?;
        tracing::debug!("🔎 Resolving host '{}' on domain '{}'", host, domain_name);

        let domains = self.api.get_domains(&[domain_name.to_string()]).await?;
        let domain = exactly_one(domains, ResourceKind::Domain)?;
        tracing::debug!("Domain: {} ({})", domain.name, domain.guid);

        let routes = self
            .api
            .get_routes(&[host.to_string()], &[domain.guid])
            .await?;
        let route = exactly_one(routes, ResourceKind::Route)?;
        tracing::debug!("Route: {} ({})", route.url, route.guid);

        let app_guid = sole_destination_app(&route)?;

        let app = self.api.get_app(app_guid).await?;
        let space = self.api.get_space(app.space_guid()).await?;
        let organization = self.api.get_organization(space.organization_guid()).await?;

        tracing::debug!(
            "✅ {} -> {} / {} / {}",
            query,
            organization.name,
            space.name,
            app.name
        );

        Ok(Resolution {
            organization,
            space,
            app,
        })
    }
}

/// 以第一個 `.` 切成 host 與 domain
pub fn split_hostname(query: &str) -> Result<(&str, &str)> {
    query
        .split_once('.')
        .ok_or_else(|| LookupError::NotADomain(query.to_string()))
}

/// 沒有 tie-break：零筆或多筆都是錯誤
fn exactly_one<T>(items: Vec<T>, kind: ResourceKind) -> Result<T> {
    let mut items = items.into_iter();
    match (items.next(), items.next()) {
        (None, _) => Err(LookupError::NoMatch(kind)),
        (Some(item), None) => Ok(item),
        (Some(_), Some(_)) => Err(LookupError::MultipleMatches(kind)),
    }
}

fn sole_destination_app(route: &Route) -> Result<&str> {
    match route.destinations.as_slice() {
        [] => Err(LookupError::NoDestination),
        [destination] => Ok(&destination.app.guid),
        _ => Err(LookupError::MultipleDestinations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{App, Domain, Organization, Space};
    use crate::utils::error::{ApiError, ApiStep, WithStep};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// 記錄每次呼叫的 in-memory Cloud Controller
    #[derive(Default)]
    struct MockCloudController {
        domains: Vec<Domain>,
        routes: Vec<Route>,
        apps: Vec<App>,
        spaces: Vec<Space>,
        organizations: Vec<Organization>,
        fail_at: Option<ApiStep>,
        calls: Mutex<Vec<String>>,
    }

    impl MockCloudController {
        fn record(&self, step: ApiStep, detail: String) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}({})", step, detail));
            if self.fail_at == Some(step) {
                return Err(ApiError::Status {
                    status: 500,
                    body: "boom".to_string(),
                })
                .with_step(step);
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CloudController for MockCloudController {
        async fn get_domains(&self, names: &[String]) -> Result<Vec<Domain>> {
            self.record(ApiStep::GetDomains, names.join(","))?;
            Ok(self.domains.clone())
        }

        async fn get_routes(&self, hosts: &[String], domain_guids: &[String]) -> Result<Vec<Route>> {
            self.record(
                ApiStep::GetRoutes,
                format!("{};{}", hosts.join(","), domain_guids.join(",")),
            )?;
            Ok(self.routes.clone())
        }

        async fn get_app(&self, guid: &str) -> Result<App> {
            self.record(ApiStep::GetApp, guid.to_string())?;
            Ok(self.apps.iter().find(|a| a.guid == guid).cloned().unwrap())
        }

        async fn get_space(&self, guid: &str) -> Result<Space> {
            self.record(ApiStep::GetSpace, guid.to_string())?;
            Ok(self.spaces.iter().find(|s| s.guid == guid).cloned().unwrap())
        }

        async fn get_organization(&self, guid: &str) -> Result<Organization> {
            self.record(ApiStep::GetOrganization, guid.to_string())?;
            Ok(self
                .organizations
                .iter()
                .find(|o| o.guid == guid)
                .cloned()
                .unwrap())
        }
    }

    const TS: &str = "2024-01-01T00:00:00Z";

    fn domain(guid: &str) -> Domain {
        serde_json::from_value(json!({
            "guid": guid, "created_at": TS, "updated_at": TS,
            "name": "example.com", "router_group": null,
            "relationships": { "organization": { "data": null } }
        }))
        .unwrap()
    }

    fn route(guid: &str, app_guids: &[&str]) -> Route {
        let destinations: Vec<_> = app_guids
            .iter()
            .enumerate()
            .map(|(i, app)| {
                json!({
                    "guid": format!("dst-{}", i),
                    "app": { "guid": app, "process": { "type": "web" } },
                    "port": 8080
                })
            })
            .collect();
        serde_json::from_value(json!({
            "guid": guid, "created_at": TS, "updated_at": TS,
            "protocol": "http", "host": "myapp", "path": "", "port": null,
            "url": "myapp.example.com",
            "destinations": destinations,
            "relationships": {
                "space": { "data": { "guid": "space-1" } },
                "domain": { "data": { "guid": "domain-1" } }
            }
        }))
        .unwrap()
    }

    fn app() -> App {
        serde_json::from_value(json!({
            "guid": "app-1", "created_at": TS, "updated_at": TS,
            "name": "myapp", "state": "STARTED",
            "lifecycle": { "type": "buildpack", "data": { "buildpacks": [], "stack": "cflinuxfs4" } },
            "relationships": { "space": { "data": { "guid": "space-1" } } }
        }))
        .unwrap()
    }

    fn space() -> Space {
        serde_json::from_value(json!({
            "guid": "space-1", "created_at": TS, "updated_at": TS, "name": "dev",
            "relationships": {
                "organization": { "data": { "guid": "org-1" } },
                "quota": { "data": null }
            }
        }))
        .unwrap()
    }

    fn organization() -> Organization {
        serde_json::from_value(json!({
            "guid": "org-1", "created_at": TS, "updated_at": TS,
            "name": "acme", "suspended": false,
            "relationships": { "quota": { "data": { "guid": "quota-1" } } }
        }))
        .unwrap()
    }

    fn happy_controller() -> MockCloudController {
        MockCloudController {
            domains: vec![domain("domain-1")],
            routes: vec![route("route-1", &["app-1"])],
            apps: vec![app()],
            spaces: vec![space()],
            organizations: vec![organization()],
            ..Default::default()
        }
    }

    #[test]
    fn test_split_hostname_on_first_dot() {
        assert_eq!(
            split_hostname("myapp.apps.example.com").unwrap(),
            ("myapp", "apps.example.com")
        );
        assert_eq!(split_hostname(".example.com").unwrap(), ("", "example.com"));
        assert!(matches!(
            split_hostname("localhost"),
            Err(LookupError::NotADomain(q)) if q == "localhost"
        ));
    }

    #[tokio::test]
    async fn test_resolve_returns_chain() {
        let resolver = RouteResolver::new(happy_controller());

        let resolution = resolver.resolve("myapp.example.com").await.unwrap();

        assert_eq!(resolution.organization.guid, "org-1");
        assert_eq!(resolution.space.guid, "space-1");
        assert_eq!(resolution.app.guid, "app-1");
        assert_eq!(
            resolver.api().calls(),
            vec![
                "get domains(example.com)",
                "get routes(myapp;domain-1)",
                "get app(app-1)",
                "get space(space-1)",
                "get organization(org-1)",
            ]
        );
    }

    #[tokio::test]
    async fn test_not_a_domain_makes_no_calls() {
        let resolver = RouteResolver::new(happy_controller());

        let err = resolver.resolve("localhost").await.unwrap_err();

        assert_eq!(err.to_string(), "'localhost' is not a domain");
        assert!(resolver.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_domain_multiplicity() {
        let resolver = RouteResolver::new(MockCloudController {
            domains: vec![],
            ..happy_controller()
        });
        let err = resolver.resolve("myapp.example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "found no matching domains");
        assert_eq!(resolver.api().calls().len(), 1);

        let resolver = RouteResolver::new(MockCloudController {
            domains: vec![domain("domain-1"), domain("domain-2")],
            ..happy_controller()
        });
        let err = resolver.resolve("myapp.example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "found multiple matching domains");
        assert_eq!(resolver.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_route_multiplicity() {
        let resolver = RouteResolver::new(MockCloudController {
            routes: vec![],
            ..happy_controller()
        });
        let err = resolver.resolve("myapp.example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "found no matching routes");
        assert_eq!(resolver.api().calls().len(), 2);

        let resolver = RouteResolver::new(MockCloudController {
            routes: vec![route("route-1", &["app-1"]), route("route-2", &["app-1"])],
            ..happy_controller()
        });
        let err = resolver.resolve("myapp.example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "found multiple matching routes");
        assert_eq!(resolver.api().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_destination_multiplicity() {
        let resolver = RouteResolver::new(MockCloudController {
            routes: vec![route("route-1", &[])],
            ..happy_controller()
        });
        let err = resolver.resolve("myapp.example.com").await.unwrap_err();
        assert!(matches!(err, LookupError::NoDestination));
        assert_eq!(resolver.api().calls().len(), 2);

        let resolver = RouteResolver::new(MockCloudController {
            routes: vec![route("route-1", &["app-1", "app-2"])],
            ..happy_controller()
        });
        let err = resolver.resolve("myapp.example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "route has multiple destinations");
        assert_eq!(resolver.api().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_short_circuits_chain() {
        let steps = [
            (ApiStep::GetDomains, 1),
            (ApiStep::GetRoutes, 2),
            (ApiStep::GetApp, 3),
            (ApiStep::GetSpace, 4),
            (ApiStep::GetOrganization, 5),
        ];

        for (step, expected_calls) in steps {
            let resolver = RouteResolver::new(MockCloudController {
                fail_at: Some(step),
                ..happy_controller()
            });

            let err = resolver.resolve("myapp.example.com").await.unwrap_err();

            assert_eq!(err.step(), Some(step));
            assert!(err.to_string().starts_with(&format!("{}: ", step)));
            assert_eq!(resolver.api().calls().len(), expected_calls);
        }
    }
}
