//! Maps `Box<dyn Error>` from the `LineSource` boundary to typed `HeatmapError`.
//!
//! With feature `hardware-errors`, `heatmap_hardware::HwError` is downcast for
//! precise mapping; otherwise the message text decides.

use crate::error::HeatmapError;

/// Map a trait-boundary error to a typed `HeatmapError`.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> HeatmapError {
    #[cfg(feature = "hardware-errors")]
    {
        use heatmap_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Timeout(_) => HeatmapError::SourceTimeout,
                other => HeatmapError::Source(other.to_string()),
            };
        }
    }

    if let Some(io) = e.downcast_ref::<std::io::Error>() {
        if io.kind() == std::io::ErrorKind::TimedOut {
            return HeatmapError::SourceTimeout;
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        HeatmapError::SourceTimeout
    } else {
        HeatmapError::Source(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_timeout_maps_to_source_timeout() {
        let e = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert!(matches!(map_hw_error(&e), HeatmapError::SourceTimeout));
    }

    #[test]
    fn other_errors_keep_their_message() {
        let e = std::io::Error::other("port vanished");
        match map_hw_error(&e) {
            HeatmapError::Source(msg) => assert_eq!(msg, "port vanished"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn hw_errors_are_downcast() {
        use heatmap_hardware::error::HwError;
        assert!(matches!(
            map_hw_error(&HwError::Timeout(3)),
            HeatmapError::SourceTimeout
        ));
        assert!(matches!(
            map_hw_error(&HwError::Serial("busy".into())),
            HeatmapError::Source(_)
        ));
    }
}
