//! Wire repositories into the domain services behind `HttpState`.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use todo_backend::domain::ports::{TodoRepository, UserRepository};
use todo_backend::domain::{AccountService, OwnershipGuard, OwnershipPolicy, TodoService, TokenSigner};
use todo_backend::inbound::http::state::{HttpState, HttpStatePorts};
use todo_backend::outbound::memory::{InMemoryTodoRepository, InMemoryUserRepository};
use todo_backend::outbound::password::BcryptPasswordHasher;
use todo_backend::outbound::persistence::{DieselTodoRepository, DieselUserRepository};

use super::ServerConfig;

/// Build the account and to-do services over one pair of repositories.
fn build_ports<U, T>(
    users: Arc<U>,
    todos: Arc<T>,
    signer: TokenSigner,
    ownership: OwnershipPolicy,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(
        users,
        Arc::new(BcryptPasswordHasher::default()),
        Arc::new(signer),
        Arc::clone(&clock),
    ));
    let todo_service = Arc::new(TodoService::new(
        todos,
        OwnershipGuard::new(ownership),
        clock,
    ));
    HttpStatePorts {
        registration: accounts.clone(),
        login: accounts.clone(),
        authenticator: accounts,
        todos: todo_service.clone(),
        todos_query: todo_service,
    }
}

/// PostgreSQL repositories when a pool is configured, in-memory otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let signer = config.signer.clone();
    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselTodoRepository::new(pool.clone())),
            signer,
            config.ownership,
            clock,
        ),
        None => build_ports(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTodoRepository::new()),
            signer,
            config.ownership,
            clock,
        ),
    };
    web::Data::new(HttpState::new(ports))
}
