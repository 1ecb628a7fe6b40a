pub mod firebase;

use crate::domain::models::AuthenticatorBox;

pub struct AuthManager {}

impl AuthManager {
    pub fn get() -> AuthenticatorBox {
        return Box::<firebase::Firebase>::default();
    }
}
