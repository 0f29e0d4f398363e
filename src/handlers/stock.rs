//! 股票图表接口
//!
//! - GET  /stocks/{ticker}/chart?range=ytd - 获取单只股票的价格图
//! - POST /stocks/lookup - 提交查询表单，跳转到价格图

use actix_web::{http::header, web, HttpResponse, Result};

use crate::error::ChartError;
use crate::models::{ApiResponse, ChartQuery, ChartRequest, LookupForm, StockChart, Ticker};
use crate::services::render::price_chart;
use crate::services::series::build_series;
use crate::state::AppState;

use super::error_response;

/// 获取 → 转换 → 渲染
async fn build_stock_chart(
    state: &AppState,
    ticker: &str,
    range: Option<&str>,
) -> Result<StockChart, ChartError> {
    let ChartRequest { ticker, range } = ChartRequest::new(ticker, range, &state.default_range)?;

    let bars = state.source.fetch_series(ticker.as_str(), &range).await?;
    let series = build_series(&bars)?;
    let spec = price_chart(&ticker.display_name(), &series, state.chart_options);
    let chart = state.renderer.render(&spec)?;

    Ok(StockChart {
        ticker: ticker.display_name(),
        range,
        tooltips: series.tooltip_rows(),
        series,
        chart,
    })
}

/// 获取单只股票的价格图
///
/// GET /api/v1/stocks/{ticker}/chart
///
/// # 参数
/// - ticker: 股票代码（1~5 个字母）
/// - range: 日期范围，缺省为配置中的默认值
pub async fn get_stock_chart(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ChartQuery>,
) -> Result<HttpResponse> {
    let ticker = path.into_inner();

    match build_stock_chart(&state, &ticker, query.range.as_deref()).await {
        Ok(chart) => {
            let message = format!("Found {}!", chart.ticker);
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(chart, message)))
        }
        Err(e) => {
            log::warn!("生成 {} 价格图失败: {}", ticker, e);
            Ok(error_response(&e))
        }
    }
}

/// 股票查询表单
///
/// POST /api/v1/stocks/lookup
///
/// 校验通过后 303 跳转到价格图，否则返回 400 和错误信息
pub async fn lookup(form: web::Form<LookupForm>) -> Result<HttpResponse> {
    match Ticker::parse(&form.ticker) {
        Ok(ticker) => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, format!("/api/v1/stocks/{}/chart", ticker)))
            .finish()),
        Err(e) => Ok(error_response(&ChartError::from(e))),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stocks")
            .route("/lookup", web::post().to(lookup))
            .route("/{ticker}/chart", web::get().to(get_stock_chart))
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{default_source, state_with};
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_chart_success() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(default_source())))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/stocks/AAPL/chart").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Found AAPL!");
        assert_eq!(body["data"]["ticker"], "AAPL");
        assert_eq!(body["data"]["range"], "ytd");
        assert_eq!(body["data"]["series"]["avg_price"][0], 181.0);
        assert_eq!(body["data"]["series"]["dates"].as_array().unwrap().len(), 3);
        assert_eq!(body["data"]["tooltips"][2]["volume"], "3,000");
        assert_eq!(body["data"]["chart"]["div"], r#"<div id="chart-aapl" class="chart"></div>"#);
    }

    #[actix_web::test]
    async fn test_chart_invalid_ticker() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(default_source())))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/stocks/aapl1/chart").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INVALID_INPUT");
        assert!(body["message"].as_str().unwrap().starts_with("Error"));
    }

    #[actix_web::test]
    async fn test_chart_invalid_range() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(default_source())))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/stocks/aapl/chart?range=10y").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_chart_unknown_ticker_from_provider() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(default_source())))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/stocks/zzzz/chart").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Error 404, INVALID TICKER");
        assert_eq!(body["code"], "PROVIDER_ERROR");
    }

    #[actix_web::test]
    async fn test_chart_empty_dataset() {
        let mut source = default_source();
        source.data.insert("ibm".to_string(), Vec::new());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(source)))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/stocks/ibm/chart").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "EMPTY_DATASET");
    }

    #[actix_web::test]
    async fn test_lookup_form_redirects() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(default_source())))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/stocks/lookup")
            .set_form([("ticker", "TSLA")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/api/v1/stocks/tsla/chart"
        );
    }

    #[actix_web::test]
    async fn test_lookup_form_rejects_bad_ticker() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(default_source())))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/stocks/lookup")
            .set_form([("ticker", "a!b")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
