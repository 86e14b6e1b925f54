pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Malformed record for illust {illust_id}: {message}")]
	MalformedRecord { illust_id: i64, message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<shiori_storage::Error> for Error {
	fn from(err: shiori_storage::Error) -> Self {
		match err {
			shiori_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}
