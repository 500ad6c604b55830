mod album;
mod comment;
mod photo;
mod user;

pub use album::Album;
pub use comment::Comment;
pub use photo::{Photo, PhotoMetadata};
pub use user::User;

/// Collection names used by the app.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ALBUMS: &str = "albums";
    pub const PHOTOS: &str = "photos";
    pub const COMMENTS: &str = "comments";
}

use common::store::{Fields, StoreError};
use serde::de::DeserializeOwned;

/// Decode document fields into an entity shape.
pub(crate) fn decode<T: DeserializeOwned>(fields: Fields) -> Result<T, StoreError> {
    Ok(serde_json::from_value(serde_json::Value::Object(fields))?)
}
