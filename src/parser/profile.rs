//! Profile file loading.
//!
//! A missing file or syntactically invalid JSON is fatal; a structurally
//! sparse capture is not (see the schema defaults).

use crate::parser::schema::ProfileData;
use crate::utils::error::LoadError;
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a samply/Firefox Profiler JSON capture from disk
///
/// # Errors
/// * `LoadError::FileNotFound` - the path does not exist
/// * `LoadError::Io` - the file cannot be read
/// * `LoadError::Json` - the contents are not valid JSON
pub fn load_profile(path: impl AsRef<Path>) -> Result<ProfileData, LoadError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    info!("Loading profile: {}", path.display());

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let data: ProfileData = serde_json::from_reader(reader)?;

    debug!(
        "Loaded profile: {} libs, {} threads",
        data.libs.len(),
        data.threads.len()
    );

    Ok(data)
}
