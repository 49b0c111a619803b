use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("store error: {0}")]
    Store(#[from] engine::StoreError),
    #[error("http error: {0}")]
    Api(#[from] remote::ApiError),
    #[error("sync error: {0}")]
    Sync(#[from] remote::SyncError),
    #[error("invalid setting: {0} must be at least 1")]
    InvalidSetting(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
