use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::model::{Actor, DepartmentId, EmployeeId, RoleCode, TenantId};

/// Claims carried by an access token. Tokens are issued elsewhere; this
/// service only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub role: RoleCode,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    #[serde(default)]
    pub manager_id: Option<EmployeeId>,
    pub exp: usize,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.employee_id,
            tenant_id: self.tenant_id,
            role: self.role,
            department_id: self.department_id,
            manager_id: self.manager_id,
            grants: Vec::new(),
        }
    }
}

/// Decodes and validates an access token. Refresh tokens are refused.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())?;

    if claims.token_type != TokenType::Access {
        return Err("refresh tokens cannot be used for API calls".to_string());
    }
    Ok(claims)
}
