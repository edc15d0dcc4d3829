pub mod categories;
pub mod products;
pub mod reviews;
pub mod users;

use serde::{Deserialize, Deserializer};

/// Deserialize a present field into `Some`, so that with `#[serde(default)]`
/// a missing key stays `None` while an explicit `null` becomes `Some(None)`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
