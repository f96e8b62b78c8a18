use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::{
    DEFAULT_MAX_FRAMES_PER_BATCH, DEFAULT_MAX_SSE_CONNECTIONS, DEFAULT_SESSION_COMMAND_BUFFER,
    DEFAULT_SIMULATOR_FPS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub session: SessionConfig,
    pub limits: LimitsConfig,
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 会话 worker 命令通道容量
    pub command_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command_buffer: DEFAULT_SESSION_COMMAND_BUFFER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_frames_per_batch: usize,
    pub max_sse_connections: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_frames_per_batch: DEFAULT_MAX_FRAMES_PER_BATCH,
            max_sse_connections: DEFAULT_MAX_SSE_CONNECTIONS,
        }
    }
}

/// 合成关键点源，用于无摄像头的演示与长时间运行测试
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub enabled: bool,
    pub fps: u32,
    pub seed: u64,
    /// 每帧未检测到人脸的概率
    pub drop_rate: f64,
    /// 每帧检测器抛错的概率
    pub fault_rate: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            fps: DEFAULT_SIMULATOR_FPS,
            seed: 42,
            drop_rate: 0.05,
            fault_rate: 0.01,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:3000"),
            session: SessionConfig {
                command_buffer: env_or_parse(
                    "SESSION_COMMAND_BUFFER",
                    DEFAULT_SESSION_COMMAND_BUFFER,
                )
                .max(1),
            },
            limits: LimitsConfig {
                max_frames_per_batch: env_or_parse(
                    "MAX_FRAMES_PER_BATCH",
                    DEFAULT_MAX_FRAMES_PER_BATCH,
                )
                .max(1),
                max_sse_connections: env_or_parse(
                    "MAX_SSE_CONNECTIONS",
                    DEFAULT_MAX_SSE_CONNECTIONS,
                ),
            },
            simulator: SimulatorConfig {
                enabled: env_or_bool("SIMULATOR_ENABLED", false),
                fps: env_or_parse("SIMULATOR_FPS", DEFAULT_SIMULATOR_FPS).clamp(1, 240),
                seed: env_or_parse("SIMULATOR_SEED", 42_u64),
                drop_rate: env_or_parse("SIMULATOR_DROP_RATE", 0.05_f64).clamp(0.0, 1.0),
                fault_rate: env_or_parse("SIMULATOR_FAULT_RATE", 0.01_f64).clamp(0.0, 1.0),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
