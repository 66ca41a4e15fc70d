//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{
    MockLoginService, MockRegistrationService, MockRequestAuthenticator, MockTodoCommand,
    MockTodoQuery,
};

use super::state::{HttpState, HttpStatePorts};

/// One mock per driving port. Unconfigured mocks panic when called, so
/// tests only set expectations on the ports they exercise.
#[derive(Default)]
pub struct MockPorts {
    pub registration: MockRegistrationService,
    pub login: MockLoginService,
    pub authenticator: MockRequestAuthenticator,
    pub todos: MockTodoCommand,
    pub todos_query: MockTodoQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            registration: Arc::new(self.registration),
            login: Arc::new(self.login),
            authenticator: Arc::new(self.authenticator),
            todos: Arc::new(self.todos),
            todos_query: Arc::new(self.todos_query),
        })
    }
}
