//! Remote control
//!
//! Triggers flow from the server to stations only.

use super::{not_supported, HandlerContext};
use crate::error::DispatchError;
use csms_shared::{Request, Response};

pub async fn handle(_ctx: &HandlerContext, request: Request) -> Result<Response, DispatchError> {
    Err(not_supported(&request))
}
