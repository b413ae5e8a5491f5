use std::fmt;
use std::str::FromStr;

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgHasArrayType, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type};

/// A ULID stored in Postgres as `uuid` and shown everywhere else in its
/// 26 character Crockford base32 form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Ulid(pub ulid::Ulid);

impl Ulid {
	pub fn new() -> Self {
		Self(ulid::Ulid::new())
	}
}

impl Default for Ulid {
	fn default() -> Self {
		Self(ulid::Ulid::nil())
	}
}

impl fmt::Display for Ulid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl fmt::Debug for Ulid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Ulid({})", self.0)
	}
}

impl FromStr for Ulid {
	type Err = ulid::DecodeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ulid::Ulid::from_string(s).map(Self)
	}
}

impl Type<Postgres> for Ulid {
	fn type_info() -> PgTypeInfo {
		<uuid::Uuid as Type<Postgres>>::type_info()
	}
}

impl PgHasArrayType for Ulid {
	fn array_type_info() -> PgTypeInfo {
		<uuid::Uuid as PgHasArrayType>::array_type_info()
	}
}

impl Encode<'_, Postgres> for Ulid {
	fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
		<uuid::Uuid as Encode<'_, Postgres>>::encode_by_ref(&uuid::Uuid::from(self.0), buf)
	}
}

impl<'r> Decode<'r, Postgres> for Ulid {
	fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
		let id = <uuid::Uuid as Decode<'r, Postgres>>::decode(value)?;
		Ok(Self(ulid::Ulid::from(id)))
	}
}

impl From<ulid::Ulid> for Ulid {
	fn from(id: ulid::Ulid) -> Self {
		Self(id)
	}
}

impl From<Ulid> for ulid::Ulid {
	fn from(id: Ulid) -> Self {
		id.0
	}
}

impl From<uuid::Uuid> for Ulid {
	fn from(id: uuid::Uuid) -> Self {
		Self(ulid::Ulid::from(id))
	}
}

impl From<Ulid> for uuid::Uuid {
	fn from(id: Ulid) -> Self {
		id.0.into()
	}
}
