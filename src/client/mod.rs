//! Cliente da API de usuários: estado, runtime, HTTP e renderização.

pub mod api;
pub mod runtime;
pub mod state;
pub mod view;

pub use api::{ClientError, HttpUsersApi, UsersApi};
pub use runtime::{ClientHandle, ClientRuntime};
pub use state::{ClientState, Draft, Event, Field};
