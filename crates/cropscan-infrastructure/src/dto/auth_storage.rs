//! Auth snapshot DTOs and migrations

use cropscan_core::snapshot::AuthSnapshot;
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

/// Auth snapshot V1.0.0: the bearer token, nothing else.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct AuthStorageV1_0_0 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl IntoDomain<AuthSnapshot> for AuthStorageV1_0_0 {
    fn into_domain(self) -> AuthSnapshot {
        AuthSnapshot { token: self.token }
    }
}

impl FromDomain<AuthSnapshot> for AuthStorageV1_0_0 {
    fn from_domain(snapshot: AuthSnapshot) -> Self {
        AuthStorageV1_0_0 {
            token: snapshot.token,
        }
    }
}

/// Creates a Migrator for the auth snapshot.
pub fn create_auth_storage_migrator()
-> Result<version_migrate::Migrator, version_migrate::MigrationError> {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("auth_storage")
        .from::<AuthStorageV1_0_0>()
        .into_with_save::<AuthSnapshot>();
    migrator.register(path)?;
    Ok(migrator)
}
