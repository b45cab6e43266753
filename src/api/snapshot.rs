// Route snapshot module
// Shared view of the proxy routing table rendered by the routes endpoints

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::RouteEntry;

/// Current proxy routing table, replaced wholesale by its owner
#[derive(Clone, Default)]
pub struct RouteSnapshot {
    routes: Arc<RwLock<Vec<RouteEntry>>>,
}

impl RouteSnapshot {
    pub fn new(routes: Vec<RouteEntry>) -> Self {
        Self {
            routes: Arc::new(RwLock::new(routes)),
        }
    }

    /// Replace the whole table
    pub async fn replace(&self, routes: Vec<RouteEntry>) {
        *self.routes.write().await = routes;
    }

    /// Routes whose source starts with `prefix`, ordered by source then service
    pub async fn filtered(&self, prefix: Option<&str>) -> Vec<RouteEntry> {
        let routes = self.routes.read().await;
        let mut selected: Vec<RouteEntry> = routes
            .iter()
            .filter(|r| prefix.map_or(true, |p| r.src.starts_with(p)))
            .cloned()
            .collect();
        selected.sort_by(|a, b| a.src.cmp(&b.src).then_with(|| a.service.cmp(&b.service)));
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(service: &str, src: &str) -> RouteEntry {
        RouteEntry {
            service: service.to_string(),
            src: src.to_string(),
            dst: format!("http://{service}:8080/"),
            weight: 1.0,
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_filtered_and_sorted() {
        let snapshot = RouteSnapshot::new(vec![
            entry("web", "/"),
            entry("users", "/api/users"),
            entry("orders", "/api/orders"),
        ]);

        let all = snapshot.filtered(None).await;
        let srcs: Vec<&str> = all.iter().map(|r| r.src.as_str()).collect();
        assert_eq!(srcs, vec!["/", "/api/orders", "/api/users"]);

        let api = snapshot.filtered(Some("/api")).await;
        assert_eq!(api.len(), 2);
    }

    #[tokio::test]
    async fn test_replace() {
        let snapshot = RouteSnapshot::new(vec![entry("web", "/")]);
        snapshot.replace(Vec::new()).await;
        assert!(snapshot.filtered(None).await.is_empty());
    }
}
