//! Authorization handler

use super::{not_supported, HandlerContext};
use crate::error::DispatchError;
use csms_shared::{AuthorizationStatus, AuthorizeRequest, AuthorizeResponse, IdTokenInfo, Request, Response};
use tracing::{info, warn};

pub async fn handle(ctx: &HandlerContext, request: Request) -> Result<Response, DispatchError> {
    match request {
        Request::Authorize(req) => Ok(Response::Authorize(handle_authorize(ctx, &req))),
        other => Err(not_supported(&other)),
    }
}

/// Handle Authorize. Any non-blank token is accepted.
pub fn handle_authorize(ctx: &HandlerContext, request: &AuthorizeRequest) -> AuthorizeResponse {
    let token = request
        .id_token
        .as_ref()
        .map(|t| t.id_token.trim())
        .unwrap_or_default();

    let status = if token.is_empty() {
        warn!(station = ctx.station(), "authorization request without token");
        AuthorizationStatus::Invalid
    } else {
        info!(station = ctx.station(), "client {} authorized", token);
        AuthorizationStatus::Accepted
    };

    AuthorizeResponse {
        id_token_info: Some(IdTokenInfo::with_status(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_context;
    use csms_shared::{IdToken, IdTokenType};

    fn status(response: &AuthorizeResponse) -> AuthorizationStatus {
        response
            .id_token_info
            .as_ref()
            .map(|i| i.status())
            .expect("token info")
    }

    #[test]
    fn test_token_accepted() {
        let ctx = test_context("CS001");
        let request = AuthorizeRequest {
            id_token: Some(IdToken::new("l33t", IdTokenType::KeyCode)),
        };
        assert_eq!(status(&handle_authorize(&ctx, &request)), AuthorizationStatus::Accepted);
    }

    #[test]
    fn test_blank_token_invalid() {
        let ctx = test_context("CS001");
        assert_eq!(
            status(&handle_authorize(&ctx, &AuthorizeRequest { id_token: None })),
            AuthorizationStatus::Invalid
        );

        let request = AuthorizeRequest {
            id_token: Some(IdToken::new("  ", IdTokenType::Central)),
        };
        assert_eq!(status(&handle_authorize(&ctx, &request)), AuthorizationStatus::Invalid);
    }
}
