use std::net::SocketAddr;

use bemyguide_server::{
    app, config::AppConfig, shutdown::shutdown_signal, utils::logging::init_logging, AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화 (guard는 프로세스 종료 시까지 유지)
    let _guard = init_logging();

    // 3. 설정 및 상태 구성
    let config = AppConfig::from_env()?;
    let port = config.server_port;
    let state = AppState::from_config(config).await?;

    // 4. 서버 실행
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
