use std::io;
use std::sync::Arc;

use chrono::Utc;
use ntex::web;
use spdlog::{error, info};

use crate::config::{Config, SiteMeta};
use crate::content::post_source::DirectorySource;
use crate::feed::{build_rss, build_sitemap, collect_posts, sitemap_urls, RSS_CONTENT_TYPE, SITEMAP_CONTENT_TYPE};

struct AppState {
    site: SiteMeta,
    source: DirectorySource,
}

fn xml_response(content_type: &str, document: crate::error::Result<String>) -> web::HttpResponse {
    match document {
        Ok(body) => web::HttpResponse::Ok()
            .content_type(content_type)
            .body(body),
        Err(e) => {
            error!("Error rendering document: {}", e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error rendering document: {}", e))
        }
    }
}

#[web::get("/rss.xml")]
async fn rss(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let posts = collect_posts(&state.source);
    xml_response(RSS_CONTENT_TYPE, build_rss(&posts, &state.site, Utc::now()))
}

#[web::get("/sitemap.xml")]
async fn sitemap(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let posts = collect_posts(&state.source);
    xml_response(SITEMAP_CONTENT_TYPE, build_sitemap(&posts, &state.site, Utc::now()))
}

#[web::get("/api/__sitemap__/urls")]
async fn sitemap_url_list(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let posts = collect_posts(&state.source);
    web::HttpResponse::Ok().json(&sitemap_urls(&posts))
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let Some(server) = config.server.clone() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "missing [server] section in configuration",
        ));
    };

    let source = DirectorySource::new(&config.paths.content_dir);
    info!("Serving feeds for {} from {}", config.site.url, source.blog_dir().display());

    let app_state = Arc::new(AppState {
        site: config.site_meta(),
        source,
    });

    info!("Listening on {}:{}", server.address, server.port);
    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(rss)
            .service(sitemap)
            .service(sitemap_url_list)
    })
        .bind((server.address, server.port))?
        .run()
        .await
}
