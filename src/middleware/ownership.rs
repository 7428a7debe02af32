//! Ownership rule for catalog mutations: only the admin that owns a product
//! may change it or its variants.

use uuid::Uuid;

use super::auth::AuthAdmin;
use crate::database::models::Product;
use crate::error::ApiError;

pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Product {
    fn owner_id(&self) -> Uuid {
        self.admin_id
    }
}

pub fn owns<R: Owned + ?Sized>(admin: &AuthAdmin, resource: &R) -> bool {
    resource.owner_id() == admin.admin_id
}

pub fn authorize<R: Owned + ?Sized>(admin: &AuthAdmin, resource: &R) -> Result<(), ApiError> {
    if owns(admin, resource) {
        Ok(())
    } else {
        tracing::warn!("Admin {} denied access to resource owned by {}", admin.admin_id, resource.owner_id());
        Err(ApiError::unauthorized("Unauthorized with this Admin ID"))
    }
}
