use axum::Router;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use binocular_rehab::config::{Config, LimitsConfig, SessionConfig, SimulatorConfig};
use binocular_rehab::routes::build_router;
use binocular_rehab::session::spawn_session_worker;
use binocular_rehab::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    pub shutdown_tx: broadcast::Sender<()>,
    pub worker: JoinHandle<()>,
}

// 直接构造 Config，避免 set_var 造成多线程测试环境变量竞态
fn test_config(limits: LimitsConfig) -> Config {
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        session: SessionConfig::default(),
        limits,
        simulator: SimulatorConfig::default(),
    }
}

fn spawn_with_config(config: Config) -> TestApp {
    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let (session, worker) = spawn_session_worker(&config, shutdown_tx.subscribe());
    let state = AppState::new(session, &config, shutdown_tx.clone());
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        shutdown_tx,
        worker,
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with_config(test_config(LimitsConfig::default()))
}

pub async fn spawn_test_app_with_limits(max_frames_per_batch: usize, max_sse: usize) -> TestApp {
    spawn_with_config(test_config(LimitsConfig {
        max_frames_per_batch,
        max_sse_connections: max_sse,
    }))
}

pub async fn spawn_simulated_app(seed: u64) -> TestApp {
    let mut config = test_config(LimitsConfig::default());
    config.simulator = SimulatorConfig {
        enabled: true,
        fps: 200,
        seed,
        drop_rate: 0.1,
        fault_rate: 0.05,
    };
    spawn_with_config(config)
}
