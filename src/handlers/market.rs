//! 市场概览接口
//!
//! - GET /market/summary?range=ytd - 三个指数代理的均价对比图

use actix_web::{web, HttpResponse, Result};

use crate::error::ChartError;
use crate::models::{ApiResponse, ChartQuery, DateRange, MarketSummary};
use crate::services::render::comparison_chart;
use crate::services::summary::build_comparison;
use crate::state::AppState;

use super::error_response;

const SUMMARY_TITLE: &str = "Market Summary";

async fn build_market_summary(state: &AppState, range: Option<&str>) -> Result<MarketSummary, ChartError> {
    let range = match range {
        Some(value) => DateRange::parse(value)?,
        None => state.default_range.clone(),
    };

    let comparison = build_comparison(state.source.as_ref(), &state.benchmarks, &range).await?;
    let chart = state.renderer.render(&comparison_chart(SUMMARY_TITLE, &comparison))?;

    Ok(MarketSummary {
        range,
        comparison,
        chart,
    })
}

/// 获取市场概览
///
/// GET /api/v1/market/summary
pub async fn get_market_summary(
    state: web::Data<AppState>,
    query: web::Query<ChartQuery>,
) -> Result<HttpResponse> {
    match build_market_summary(&state, query.range.as_deref()).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary))),
        Err(e) => {
            log::warn!("生成市场概览失败: {}", e);
            Ok(error_response(&e))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/market/summary", web::get().to(get_market_summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{bars, default_source, state_with};
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_market_summary() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(default_source())))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/market/summary?range=1m").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        let data = &body["data"];
        assert_eq!(data["range"], "1m");
        assert_eq!(data["comparison"]["dates"].as_array().unwrap().len(), 3);

        let lines = data["comparison"]["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 3);
        for line in lines {
            assert_eq!(line["avg_price"].as_array().unwrap().len(), 3);
        }
        assert_eq!(lines[0]["ticker"], "spy");
        assert_eq!(data["chart"]["div"], r#"<div id="chart-market-summary" class="chart"></div>"#);
    }

    #[actix_web::test]
    async fn test_market_summary_misaligned() {
        let mut source = default_source();
        let mut short = bars(400.0);
        short.pop();
        source.data.insert("qqq".to_string(), short);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(source)))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/market/summary").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "MALFORMED_DATA");
    }

    #[actix_web::test]
    async fn test_market_summary_provider_failure() {
        let mut source = default_source();
        source.failures.insert("dia".to_string(), ChartError::UnknownProvider { code: 503 });

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(source)))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/market/summary").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Error 503, UNKNOWN PROVIDER ERROR");
    }
}
