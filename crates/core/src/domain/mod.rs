pub mod analysis;
pub mod sleeper;
pub mod week;

use serde::{Deserialize, Deserializer};

/// Sleeper sends `null` for empty lists and maps; treat it like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
