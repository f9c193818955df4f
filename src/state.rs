use std::sync::Arc;

use crate::leave::LeaveService;

/// Shared by every worker; handed to handlers as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub leave: Arc<LeaveService>,
}

impl AppState {
    pub fn new(leave: LeaveService) -> Self {
        Self { leave: Arc::new(leave) }
    }
}
