//! Human-readable error descriptions and structured JSON error formatting.

use heatmap_core::{CsvError, HeatmapError};

fn find<T: std::error::Error + 'static>(err: &eyre::Report) -> Option<&T> {
    err.chain().find_map(|e| e.downcast_ref::<T>())
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(he) = find::<HeatmapError>(err) {
        return match he {
            HeatmapError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: A value in the TOML is missing, misspelled or out of range.\nHow to fix: Edit the config file (see etc/heatmap.toml for a sample), then rerun."
            ),
            HeatmapError::Encode(msg) => format!(
                "What happened: The frame could not be encoded as PNG ({msg}).\nLikely causes: The grid grew so large the image exceeds encoder limits.\nHow to fix: Lower grid.max_dim or render.max_cell_px, or reset the grid."
            ),
            HeatmapError::Io(msg) => format!(
                "What happened: File access failed ({msg}).\nLikely causes: The output directory is not writable or an input file does not exist.\nHow to fix: Check the paths given to --out, --grid, --resume or push.path and their permissions."
            ),
            HeatmapError::Decode(msg) => format!(
                "What happened: The background picture could not be read ({msg}).\nLikely causes: The file is not a PNG/JPEG or is truncated.\nHow to fix: Point --background or render.background at a valid PNG or JPEG."
            ),
            HeatmapError::SourceTimeout => "What happened: The measurement source timed out.\nLikely causes: The device is idle, sends no newline, or the baud rate is wrong.\nHow to fix: Check serial.baud_rate and the device output, or raise source.read_timeout_ms.".to_string(),
            HeatmapError::Source(msg) => format!(
                "What happened: The measurement source is unavailable ({msg}).\nLikely causes: Device unplugged, wrong serial.port, or missing permissions.\nHow to fix: Check the connection and serial.port, or run with --mode simulated."
            ),
        };
    }

    if let Some(ce) = find::<CsvError>(err) {
        return format!(
            "What happened: The grid CSV is malformed ({ce}).\nLikely causes: The file was edited by hand or was not written by `heatmap run`.\nHow to fix: Fix the reported line/column or export the grid again."
        );
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 2 config, 3 encode, 4 file access, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(he) = find::<HeatmapError>(err) {
        return match he {
            HeatmapError::Config(_) => 2,
            HeatmapError::Encode(_) => 3,
            HeatmapError::Io(_) | HeatmapError::Decode(_) => 4,
            HeatmapError::Source(_) | HeatmapError::SourceTimeout => 1,
        };
    }
    if find::<CsvError>(err).is_some() {
        return 4;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(he) = find::<HeatmapError>(err) {
        return match he {
            HeatmapError::Config(_) => "Config",
            HeatmapError::Encode(_) => "Encode",
            HeatmapError::Io(_) => "Io",
            HeatmapError::Decode(_) => "Decode",
            HeatmapError::Source(_) => "Source",
            HeatmapError::SourceTimeout => "SourceTimeout",
        };
    }
    if find::<CsvError>(err).is_some() {
        return "Csv";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    #[test]
    fn config_errors_exit_with_two() {
        let e = eyre::Report::new(HeatmapError::Config("refresh.interval_ms must be in [100, 2000]".into()));
        assert_eq!(exit_code_for_error(&e), 2);
        assert!(humanize(&e).starts_with("What happened: Invalid configuration"));
    }

    #[test]
    fn wrapped_errors_are_found_in_the_chain() {
        let e: eyre::Result<()> = Err(HeatmapError::Io("out/map.png: denied".into()).into());
        let e = e.wrap_err("write frame").unwrap_err();
        assert_eq!(exit_code_for_error(&e), 4);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(v["reason"], "Io");
        assert_eq!(v["exit_code"], 4);
    }

    #[test]
    fn unknown_errors_fall_back() {
        let e = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&e), 1);
        assert!(humanize(&e).contains("Original: boom"));
    }
}
