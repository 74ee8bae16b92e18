//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod bearer;
pub mod content;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiResult, json_config, query_config};

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
///
/// `/content/search` is registered ahead of `/content/{id}` so the literal
/// segment wins.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::refresh_token)
        .service(content::search_content)
        .service(content::list_content)
        .service(content::create_content)
        .service(content::get_content)
        .service(content::update_content)
        .service(content::delete_content)
        .service(content::admin_list_content);
}
