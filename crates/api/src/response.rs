//! Shared response envelope for JSON handlers.
//!
//! Successful JSON responses wrap their payload as `{ "data": ... }`.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
