//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into core services as an
//! `Arc<CoreConfig>`. Request handling never reads environment variables.

use crate::constants::{
    APPOINTMENTS_COLLECTION, DEFAULT_REST_ADDR, DOCTORS_COLLECTION, PATIENTS_COLLECTION,
    PRESCRIPTIONS_COLLECTION,
};
use crate::{CareError, CareResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    uploads_dir: PathBuf,
    admin_api_key: Option<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`, creating the data and uploads directories if missing.
    ///
    /// A blank `admin_api_key` is treated as unset.
    pub fn new(
        data_dir: PathBuf,
        uploads_dir: PathBuf,
        admin_api_key: Option<String>,
    ) -> CareResult<Self> {
        for dir in [&data_dir, &uploads_dir] {
            if dir.exists() && !dir.is_dir() {
                return Err(CareError::InvalidInput(format!(
                    "not a directory: {}",
                    dir.display()
                )));
            }
            std::fs::create_dir_all(dir).map_err(CareError::StorageDirCreation)?;
        }

        for collection in [
            DOCTORS_COLLECTION,
            PATIENTS_COLLECTION,
            APPOINTMENTS_COLLECTION,
            PRESCRIPTIONS_COLLECTION,
        ] {
            std::fs::create_dir_all(data_dir.join(collection))
                .map_err(CareError::StorageDirCreation)?;
        }

        let admin_api_key = admin_api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(Self {
            data_dir,
            uploads_dir,
            admin_api_key,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn admin_api_key(&self) -> Option<&str> {
        self.admin_api_key.as_deref()
    }
}

/// Resolve the REST listen address from optional `CAREBOOK_REST_ADDR` and `PORT` values.
///
/// `PORT` replaces only the port of the address. Blank values count as unset.
pub fn rest_addr_from_env_values(
    addr: Option<String>,
    port: Option<String>,
) -> CareResult<String> {
    let addr = addr
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| DEFAULT_REST_ADDR.to_string());

    let Some(port) = port.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) else {
        return Ok(addr);
    };

    let port: u16 = port
        .parse()
        .map_err(|_| CareError::InvalidInput(format!("PORT is not a valid port: {}", port)))?;
    let host = addr.rsplit_once(':').map(|(h, _)| h).unwrap_or(&addr);

    Ok(format!("{}:{}", host, port))
}
