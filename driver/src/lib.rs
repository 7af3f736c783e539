use error_stack::{Report, ResultExt};
use kernel::KernelError;

pub mod cache;
pub mod database;
pub mod error;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .map_err(Report::from)
        .change_context(KernelError::Internal)
        .attach_printable_lazy(|| format!("Failed to read environment variable `{key}`"))
}

/// Like [`env`], but falls back to `default` when the variable is not set.
pub fn env_or<T>(key: &str, default: T) -> error_stack::Result<T, KernelError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match dotenvy::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(Report::from)
            .change_context(KernelError::Internal)
            .attach_printable_lazy(|| format!("Invalid value for `{key}`: {raw}")),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(default),
        Err(error) => Err(Report::from(error).change_context(KernelError::Internal)),
    }
}
