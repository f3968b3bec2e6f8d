use std::net::SocketAddr;

use axum::{
    RequestPartsExt,
    extract::{ConnectInfo, FromRequestParts},
    http::{StatusCode, request::Parts},
};

use crate::types::ConnectionInfo;

impl<S> FromRequestParts<S> for ConnectionInfo
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get("User-Agent")
            .and_then(|header| header.to_str().ok())
            .map(|ua| ua.to_string());

        // X-Forwarded-For (first hop) wins over the socket address
        let forwarded = parts
            .headers
            .get("X-Forwarded-For")
            .and_then(|header| header.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty());

        let ip = match forwarded {
            Some(ip) => Some(ip),
            None => parts
                .extract::<ConnectInfo<SocketAddr>>()
                .await
                .ok()
                .map(|addr| addr.ip().to_string()),
        };

        Ok(ConnectionInfo { ip, user_agent })
    }
}
