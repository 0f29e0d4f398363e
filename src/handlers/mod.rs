pub mod health;
pub mod market;
pub mod stock;

use actix_web::{http::StatusCode, web, HttpResponse};

use crate::error::ChartError;
use crate::models::ApiResponse;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(stock::config)
            .configure(market::config)
    );
}

/// 错误对应的 HTTP 状态码
pub fn error_status(err: &ChartError) -> StatusCode {
    match err {
        ChartError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ChartError::Provider { code: 404, .. } => StatusCode::NOT_FOUND,
        ChartError::Provider { .. } | ChartError::UnknownProvider { .. } | ChartError::Transport(_) => {
            StatusCode::BAD_GATEWAY
        }
        ChartError::MalformedData(_) | ChartError::EmptyDataset => StatusCode::UNPROCESSABLE_ENTITY,
        ChartError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 统一的错误响应
pub fn error_response(err: &ChartError) -> HttpResponse {
    HttpResponse::build(error_status(err)).json(ApiResponse::<()>::from(err))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(error_status(&ChartError::InvalidInput(InputError::EmptyTicker)), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_status(&ChartError::Provider { code: 404, message: "INVALID TICKER".into() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&ChartError::Provider { code: 402, message: "EXCEEDED API CALLS".into() }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(error_status(&ChartError::UnknownProvider { code: 500 }), StatusCode::BAD_GATEWAY);
        assert_eq!(
            error_status(&ChartError::Transport("connection refused".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&ChartError::MalformedData("missing field `high`".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(error_status(&ChartError::EmptyDataset), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_status(&ChartError::Render("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
