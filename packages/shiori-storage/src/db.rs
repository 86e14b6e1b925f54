use std::str::FromStr;

use sqlx::{
	SqlitePool,
	sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{Result, schema};

pub struct Db {
	pub pool: SqlitePool,
}
impl Db {
	pub async fn connect(cfg: &shiori_config::Sqlite) -> Result<Self> {
		let options = SqliteConnectOptions::from_str(&cfg.path)?
			.create_if_missing(true)
			.foreign_keys(true);
		let pool = SqlitePoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.connect_with(options)
			.await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		for statement in schema::INIT_SQL.split(';') {
			// A chunk that holds only comments or whitespace (e.g. the
			// file header or the tail after the last statement) must not
			// reach the store.
			let is_blank = statement.lines().all(|line| {
				let line = line.trim();

				line.is_empty() || line.starts_with("--")
			});

			if is_blank {
				continue;
			}

			sqlx::query(statement).execute(&self.pool).await?;
		}

		tracing::debug!("Store schema ensured.");

		Ok(())
	}
}
