//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod todos;
pub mod token_config;
pub mod users;
mod validation;

use actix_web::web;

pub use error::{ApiResult, json_error_handler, route_not_found};

/// Register the account and to-do routes plus the JSON body limits.
///
/// The caller supplies `web::Data<HttpState>`, the [`crate::Trace`]
/// middleware and the [`route_not_found`] default service.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use todo_backend::inbound::http::{configure, route_not_found};
///
/// let _app = App::new()
///     .configure(configure)
///     .default_service(web::to(route_not_found));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(users::register)
        .service(users::login)
        .service(todos::list_todos)
        .service(todos::get_todo)
        .service(todos::create_todo)
        .service(todos::update_todo)
        .service(todos::delete_todo);
}
