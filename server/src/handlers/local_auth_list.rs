//! Local authorization list
//!
//! Every action of this category is initiated by the server, so stations
//! have nothing to send here.

use super::{not_supported, HandlerContext};
use crate::error::DispatchError;
use csms_shared::{Request, Response};

pub async fn handle(_ctx: &HandlerContext, request: Request) -> Result<Response, DispatchError> {
    Err(not_supported(&request))
}
