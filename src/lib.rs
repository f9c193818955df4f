//! Multi-tenant leave management: balances, a manager → HR approval
//! workflow, and the role and policy checks that guard every step.

pub mod api;
pub mod auth;
pub mod config;
pub mod docs;
pub mod error;
pub mod leave;
pub mod model;
pub mod policy;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use error::{LeaveError, LeaveResult};
