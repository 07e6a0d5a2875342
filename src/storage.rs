use crate::errors::AppError;
use serde::{Serialize, de::DeserializeOwned};
use std::{env, io::ErrorKind, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub const ROOT_ENV: &str = "EXERCISE_STREAK_DIR";

pub fn resolve_root(dir: Option<PathBuf>) -> PathBuf {
    root_from(dir, env::var(ROOT_ENV).ok())
}

fn root_from(dir: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    if let Some(dir) = dir {
        return dir;
    }

    match env_value {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from("."),
    }
}

/// Reads a JSON file, falling back to the default value when it is missing or malformed.
pub async fn load_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                T::default()
            }
        },
        Err(err) if err.kind() == ErrorKind::NotFound => T::default(),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            T::default()
        }
    }
}

/// Like [`load_or_default`], but a file that exists and cannot be parsed is an error.
/// Used before rewriting a file so that a damaged log is never replaced by an empty one.
pub async fn load_strict<T>(path: &Path) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
            AppError::invalid_input(format!("{} is not valid: {err}", path.display()))
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(err.into()),
    }
}

pub async fn persist_json<T: Serialize>(path: &Path, data: &T) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    write_atomic(path, &payload).await
}

pub async fn read_document(path: &Path) -> Result<String, AppError> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(AppError::not_found(format!(
            "{} does not exist",
            path.display()
        ))),
        Err(err) => Err(err.into()),
    }
}

/// Writes to a sibling temp file and renames it over `path`.
pub async fn write_atomic(path: &Path, payload: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::invalid_input(format!("{} is not a file path", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(format!(".tmp.{}", std::process::id()));
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, payload).await?;
    if let Err(err) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(err.into());
    }
    Ok(())
}
