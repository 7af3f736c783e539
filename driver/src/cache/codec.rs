use error_stack::ResultExt;
use kernel::KernelError;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ConvertError;

pub(crate) fn compress<T: Serialize + ?Sized>(
    value: &T,
    level: i32,
) -> error_stack::Result<Vec<u8>, KernelError> {
    let json = serde_json::to_vec(value).convert_error()?;
    zstd::stream::encode_all(json.as_slice(), level)
        .convert_error()
        .attach_printable("Failed to compress cache snapshot")
}

pub(crate) fn decompress<T: DeserializeOwned>(data: &[u8]) -> error_stack::Result<T, KernelError> {
    let json = zstd::stream::decode_all(data)
        .convert_error()
        .attach_printable("Failed to decompress cache snapshot")?;
    serde_json::from_slice(&json).convert_error()
}
