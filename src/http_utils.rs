use axum::http::StatusCode;

pub fn to_http500<E>(err: E) -> (StatusCode, String)
where
    E: std::error::Error,
{
    tracing::error!("request failed: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub fn to_http400<E>(err: E) -> (StatusCode, String)
where
    E: std::error::Error,
{
    (StatusCode::BAD_REQUEST, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction::InvalidTransaction;

    #[test]
    fn maps_errors_to_status_codes() {
        let (status, body) = to_http400(InvalidTransaction::Amount(-2.0));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("-2"));

        let (status, _) = to_http500(std::io::Error::other("disk full"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
