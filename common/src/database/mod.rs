mod ulid;

pub use sqlx;

pub use self::ulid::Ulid;

pub type Pool = sqlx::PgPool;
