//! Device signal generation.
//!
//! A weak client descriptor sent with login and signup so the backend can
//! do its own risk scoring. It is advisory: every capability may be missing,
//! and generation never fails.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Encoded signal length.
pub const SIGNAL_LEN: usize = 32;
/// Segment used when a capability is unavailable.
pub const FALLBACK_SEGMENT: &str = "unavailable";

const RENDER_SAMPLE: &str = "Device fingerprint";

/// Source of the raw values the signal is built from.
pub trait DeviceSource: Send + Sync {
    fn user_agent(&self) -> Option<String>;
    fn locale(&self) -> Option<String>;
    /// `(width, height)`.
    fn screen_resolution(&self) -> Option<(u32, u32)>;
    /// Minutes, `UTC - local` (positive west of Greenwich).
    fn timezone_offset_minutes(&self) -> Option<i32>;
    /// Checksum of a rendered sample, stable per device.
    fn render_checksum(&self) -> Option<String>;
}

/// Source backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSource;

impl DeviceSource for SystemSource {
    fn user_agent(&self) -> Option<String> {
        Some(format!(
            "shopluxe/{} ({}; {})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH
        ))
    }

    fn locale(&self) -> Option<String> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .map(|v| v.split('.').next().unwrap_or_default().replace('_', "-"))
            .find(|v| !v.is_empty() && v != "C" && v != "POSIX")
    }

    fn screen_resolution(&self) -> Option<(u32, u32)> {
        let cols = std::env::var("COLUMNS").ok()?.parse().ok()?;
        let lines = std::env::var("LINES").ok()?.parse().ok()?;
        Some((cols, lines))
    }

    fn timezone_offset_minutes(&self) -> Option<i32> {
        let offset = chrono::Local::now().offset().local_minus_utc();
        Some(-offset / 60)
    }

    fn render_checksum(&self) -> Option<String> {
        let host = std::env::var("HOSTNAME")
            .or_else(|_| std::env::var("COMPUTERNAME"))
            .ok()?;
        let mut hasher = Sha256::new();
        hasher.update(RENDER_SAMPLE.as_bytes());
        hasher.update(host.as_bytes());
        hasher.update(std::env::consts::OS.as_bytes());
        Some(
            hasher
                .finalize()
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect(),
        )
    }
}

/// Builds the encoded device signal from a [`DeviceSource`].
pub struct DeviceSignal {
    source: Box<dyn DeviceSource>,
}

impl Default for DeviceSignal {
    fn default() -> Self {
        Self::new(SystemSource)
    }
}

impl std::fmt::Debug for DeviceSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSignal").finish_non_exhaustive()
    }
}

impl DeviceSignal {
    pub fn new(source: impl DeviceSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Joined raw segments, before encoding.
    pub fn raw(&self) -> String {
        let p = &self.source;
        let segments = [
            p.user_agent(),
            p.locale(),
            p.screen_resolution().map(|(w, h)| format!("{w}x{h}")),
            p.timezone_offset_minutes().map(|m| m.to_string()),
            p.render_checksum(),
        ];
        segments
            .into_iter()
            .map(|s| s.unwrap_or_else(|| FALLBACK_SEGMENT.to_string()))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Base64 of the joined segments, truncated to [`SIGNAL_LEN`].
    pub fn generate(&self) -> String {
        let mut encoded = STANDARD.encode(self.raw());
        encoded.truncate(SIGNAL_LEN);
        encoded
    }
}
