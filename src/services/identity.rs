use crate::model::Actor;

/// Supplies the authorization subject of the current request. How the
/// subject was authenticated is the provider's business.
pub trait IdentityProvider {
    fn current_actor(&self) -> Actor;
}

impl IdentityProvider for Actor {
    fn current_actor(&self) -> Actor {
        self.clone()
    }
}
