/// 会话 worker 命令通道默认容量
pub const DEFAULT_SESSION_COMMAND_BUFFER: usize = 256;

/// 单次请求最多携带的帧数（60fps 下约 4 秒）
pub const DEFAULT_MAX_FRAMES_PER_BATCH: usize = 240;

/// SSE 并发连接上限
pub const DEFAULT_MAX_SSE_CONNECTIONS: usize = 32;

/// 合成关键点源的默认帧率
pub const DEFAULT_SIMULATOR_FPS: u32 = 60;

/// 实时事件广播通道容量，慢消费者会丢帧事件
pub const EVENT_CHANNEL_CAPACITY: usize = 512;

/// Maximum request body size: 1 MiB.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;
