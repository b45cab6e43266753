//! Admin UI module
//!
//! Server-rendered HTML pages. Every page shares the same header carrying
//! the server identity (title, color theme, version).

use async_trait::async_trait;
use hyper::{Method, StatusCode};
use std::fmt::Write as _;
use std::sync::Arc;

use crate::api::{self, Registry, RouteSnapshot};
use crate::config::ServerIdentity;
use crate::handler::{AdminHandler, AdminRequest, AdminResponse};
use crate::http;
use crate::routing::{API_MANUAL_PATH, UI_MANUAL_PATH, UI_ROUTES_PATH};

/// Routing table page
pub struct RoutesUiHandler {
    identity: Arc<ServerIdentity>,
    snapshot: RouteSnapshot,
}

impl RoutesUiHandler {
    pub const fn new(identity: Arc<ServerIdentity>, snapshot: RouteSnapshot) -> Self {
        Self { identity, snapshot }
    }
}

#[async_trait]
impl AdminHandler for RoutesUiHandler {
    async fn handle(&self, req: &AdminRequest) -> AdminResponse {
        let filter = api::query_param(req, "prefix");
        let routes = self.snapshot.filtered(filter.as_deref()).await;

        let mut rows = String::new();
        for (i, route) in routes.iter().enumerate() {
            let _ = write!(
                rows,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
                i + 1,
                escape(&route.service),
                escape(&route.src),
                escape(&route.dst),
                route.weight,
                escape(&route.tags.join(", ")),
            );
        }

        let body = format!(
            "<form method=\"get\"><input name=\"prefix\" placeholder=\"filter by source prefix\" value=\"{}\"></form>\
             <table><thead><tr><th>#</th><th>Service</th><th>Source</th><th>Dest</th><th>Weight</th><th>Tags</th></tr></thead>\
             <tbody>{rows}</tbody></table>",
            escape(filter.as_deref().unwrap_or("")),
        );
        http::build_html_response(page(&self.identity, "Routes", &body))
    }
}

/// Manual configuration editor page
pub struct ManualUiHandler {
    identity: Arc<ServerIdentity>,
    prefix: String,
    registry: Arc<dyn Registry>,
}

impl ManualUiHandler {
    pub fn new(
        identity: Arc<ServerIdentity>,
        prefix: impl Into<String>,
        registry: Arc<dyn Registry>,
    ) -> Self {
        Self {
            identity,
            prefix: prefix.into(),
            registry,
        }
    }
}

#[async_trait]
impl AdminHandler for ManualUiHandler {
    async fn handle(&self, req: &AdminRequest) -> AdminResponse {
        if !matches!(*req.method(), Method::GET | Method::HEAD) {
            return http::build_405_response("GET, HEAD");
        }

        let path = http::decoded_path(req.uri());
        let name = path
            .strip_prefix(UI_MANUAL_PATH)
            .unwrap_or("")
            .trim_end_matches('/');

        // A registry outage only hides the path list; the editor still renders
        let paths = self.registry.list(&self.prefix).await.unwrap_or_default();
        let mut links = String::new();
        for key in &paths {
            if let Some(suffix) = key.strip_prefix(&self.prefix) {
                let label = if suffix.is_empty() { "default" } else { suffix };
                let _ = write!(
                    links,
                    "<li><a href=\"{UI_MANUAL_PATH}{}\">{}</a></li>",
                    escape(suffix),
                    escape(label)
                );
            }
        }

        let mut body = format!(
            "<ul class=\"paths\">{links}</ul>\
             <form id=\"manual\" data-api=\"{API_MANUAL_PATH}{}\">\
             <textarea id=\"value\" name=\"value\"></textarea>\
             <button type=\"submit\">Save</button> <span id=\"status\"></span>\
             </form>",
            escape(name),
        );
        if !self.identity.commands.is_empty() {
            let _ = write!(
                body,
                "<pre class=\"help\">{}</pre>",
                escape(&self.identity.commands)
            );
        }
        body.push_str("<script src=\"/fabio/assets/code/manual.js\"></script>");

        let heading = if name.is_empty() {
            "Manual Overrides".to_string()
        } else {
            format!("Manual Overrides: {}", escape(name))
        };
        http::build_html_response(page(&self.identity, &heading, &body))
    }
}

/// Wrap page content in the shared layout
fn page(identity: &ServerIdentity, heading: &str, body: &str) -> String {
    let title = if identity.title.is_empty() {
        "fabio".to_string()
    } else {
        format!("fabio - {}", escape(&identity.title))
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"/fabio/assets/css/main.css\">\n</head>\n<body>\n\
         <nav class=\"{color}\"><img src=\"/fabio/assets/logo.svg\" alt=\"\">{title} \
         <a href=\"{UI_ROUTES_PATH}\">Routes</a> <a href=\"{UI_MANUAL_PATH}\">Manual</a> \
         <span class=\"version\">{version}</span></nav>\n\
         <main>\n<h1>{heading}</h1>\n{body}\n</main>\n</body>\n</html>\n",
        color = escape(&identity.color),
        version = escape(&identity.version),
    )
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryRegistry;
    use crate::config::RouteEntry;
    use crate::handler::test_support::*;

    fn identity() -> Arc<ServerIdentity> {
        Arc::new(ServerIdentity {
            title: "edge".to_string(),
            color: "blue".to_string(),
            version: "1.6.3".to_string(),
            commands: "route add <svc> <src> <dst>".to_string(),
        })
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape("plain"), "plain");
    }

    #[tokio::test]
    async fn test_routes_page() {
        let snapshot = RouteSnapshot::new(vec![RouteEntry {
            service: "web<1>".to_string(),
            src: "/".to_string(),
            dst: "http://web:8080/".to_string(),
            weight: 0.5,
            tags: Vec::new(),
        }]);
        let resp = RoutesUiHandler::new(identity(), snapshot)
            .handle(&get(UI_ROUTES_PATH))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");

        let html = body_string(resp).await;
        assert!(html.contains("<title>fabio - edge</title>"));
        assert!(html.contains("<nav class=\"blue\">"));
        assert!(html.contains("1.6.3"));
        assert!(html.contains("web&lt;1&gt;"));
        assert!(html.contains("0.50"));
    }

    #[tokio::test]
    async fn test_manual_page_lists_paths() {
        let registry: Arc<dyn Registry> = Arc::new(MemoryRegistry::new());
        registry
            .put("fabio/config", String::new(), None)
            .await
            .unwrap();
        registry
            .put("fabio/config/canary", String::new(), None)
            .await
            .unwrap();

        let h = ManualUiHandler::new(identity(), "fabio/config", registry);
        let resp = h.handle(&get("/fabio/manual/canary")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let html = body_string(resp).await;
        assert!(html.contains("href=\"/fabio/manual/canary\""));
        assert!(html.contains(">default</a>"));
        assert!(html.contains("data-api=\"/fabio/api/manual/canary\""));
        assert!(html.contains("route add &lt;svc&gt;"));
        assert!(html.contains("Manual Overrides: /canary"));
    }

    #[tokio::test]
    async fn test_manual_page_rejects_writes() {
        let h = ManualUiHandler::new(identity(), "fabio/config", Arc::new(MemoryRegistry::new()));
        let resp = h.handle(&request("POST", "/fabio/manual", "")).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
