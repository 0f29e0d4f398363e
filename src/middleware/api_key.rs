//! API Key 认证中间件
//!
//! 通过 Header 中的 Authorization: Bearer <token> 进行认证。
//! 未配置 API Key 时放行所有请求，健康检查接口始终放行。

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::models::ApiResponse;

/// API Key 中间件
pub struct ApiKeyMiddleware {
    /// None 表示不启用认证
    api_key: Option<Rc<String>>,
}

impl ApiKeyMiddleware {
    pub fn new(api_key: String) -> Self {
        let api_key = api_key.trim().to_string();
        Self {
            api_key: (!api_key.is_empty()).then(|| Rc::new(api_key)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ApiKeyMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ApiKeyMiddlewareService {
            service: Rc::new(service),
            api_key: self.api_key.clone(),
        })
    }
}

pub struct ApiKeyMiddlewareService<S> {
    service: Rc<S>,
    api_key: Option<Rc<String>>,
}

/// 健康检查路径，无需认证
const HEALTH_PATH: &str = "/api/v1/health";

fn is_exempt(req: &ServiceRequest) -> bool {
    req.path() == HEALTH_PATH
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

impl<S, B> Service<ServiceRequest> for ApiKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let api_key = self.api_key.clone();

        Box::pin(async move {
            let authorized = match api_key.as_deref() {
                None => true,
                Some(_) if is_exempt(&req) => true,
                Some(expected) => bearer_token(&req) == Some(expected.as_str()),
            };

            if authorized {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            log::warn!("拒绝未认证请求: {} {}", req.method(), req.path());
            let mut body = ApiResponse::<()>::error("Error 401, INVALID BEARER TOKEN".to_string());
            body.code = Some("UNAUTHORIZED".to_string());
            let response = HttpResponse::Unauthorized().json(body);
            Ok(req.into_response(response).map_into_right_body())
        })
    }
}
