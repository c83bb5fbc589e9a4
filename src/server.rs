//! HTTP 服务器与路由
//!
//! 每条注册的策略各占一个路径，另有绕过准入管道的就绪探针和
//! 诊断端点。配置了证书就走 TLS，否则降级为明文 HTTP 并告警。

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::{info, warn};

use k8s_admission_core::AdmitHandler;
use k8s_admission_webhooks::{InternalLoadBalancer, NoReservedNamespace};

use crate::config::Config;
use crate::serve::serve;
use crate::tls;

/// 准入 webhook 服务器
///
/// 策略在启动时构造一次，请求路径上只读。
pub struct WebhookServer {
    config: Config,
    no_default_namespace: AdmitHandler,
    no_external_ip_load_balancers: AdmitHandler,
}

impl WebhookServer {
    /// 用解析好的配置构造服务器并注册全部策略
    pub fn new(config: Config) -> Self {
        let no_default_namespace = AdmitHandler::delegate_to_v1(Arc::new(
            NoReservedNamespace::new(config.reserved_namespace.clone()),
        ));
        let no_external_ip_load_balancers = AdmitHandler::delegate_to_v1(Arc::new(
            InternalLoadBalancer::new(&config.cloud_provider),
        ));

        WebhookServer {
            config,
            no_default_namespace,
            no_external_ip_load_balancers,
        }
    }

    /// 按路径分发一次 HTTP 请求
    pub async fn route(&self, req: Request<Body>) -> Response<Body> {
        match (req.method(), req.uri().path()) {
            (&Method::POST, "/no-default-namespace") => {
                info!("checking resource against the reserved namespace");
                serve(req, &self.no_default_namespace).await
            }
            (&Method::POST, "/no-external-ip-load-balancers") => {
                info!("checking load balancers for external IP addresses");
                serve(req, &self.no_external_ip_load_balancers).await
            }
            (&Method::GET, "/readyz") => {
                info!("handling readiness probe");
                text_response("ok")
            }
            (&Method::GET, "/ping") => {
                info!("handling a ping");
                text_response("pong")
            }
            (&Method::GET, "/message") => {
                info!("reading config message and returning it");
                text_response(&self.config.message)
            }
            _ => {
                let mut response = Response::new(Body::from("Not Found"));
                *response.status_mut() = StatusCode::NOT_FOUND;
                response
            }
        }
    }

    /// 启动服务器并阻塞到退出
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let tls_config = match (&self.config.cert_file, &self.config.key_file) {
            (Some(cert_file), Some(key_file)) => {
                info!("certificate information identified, serving with TLS enabled");
                Some(tls::load_server_config(cert_file, key_file)?)
            }
            _ => {
                warn!("no certificate data for TLS provided, falling back to serving unsecured endpoints");
                None
            }
        };

        let server = Arc::new(self);
        match tls_config {
            Some(tls_config) => run_tls(server, addr, tls_config).await,
            None => run_plain(server, addr).await,
        }
    }
}

async fn run_plain(server: Arc<WebhookServer>, addr: SocketAddr) -> Result<()> {
    let make_svc = make_service_fn(move |_conn| {
        let server = server.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let server = server.clone();
                async move { Ok::<_, Infallible>(server.route(req).await) }
            }))
        }
    });

    info!(%addr, "listening without TLS");
    Server::bind(&addr)
        .serve(make_svc)
        .await
        .context("HTTP server error")
}

async fn run_tls(
    server: Arc<WebhookServer>,
    addr: SocketAddr,
    tls_config: rustls::ServerConfig,
) -> Result<()> {
    let acceptor = TlsAcceptor::from(Arc::new(tls_config));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(%addr, "listening with TLS");
    loop {
        let (stream, peer) = listener.accept().await.context("accepting connection")?;
        let acceptor = acceptor.clone();
        let server = server.clone();

        tokio::spawn(async move {
            let stream = match acceptor.accept(stream).await {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(error = %err, %peer, "TLS handshake failed");
                    return;
                }
            };

            let service = service_fn(move |req| {
                let server = server.clone();
                async move { Ok::<_, Infallible>(server.route(req).await) }
            });

            // 状态已经发出后的写失败只能记录，无法撤回
            if let Err(err) = hyper::server::conn::Http::new()
                .serve_connection(stream, service)
                .await
            {
                warn!(error = %err, %peer, "connection error");
            }
        });
    }
}

fn text_response(body: &str) -> Response<Body> {
    let mut response = Response::new(Body::from(body.to_string()));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}
