use metrics::{counter, histogram};
use std::time::Duration;

/// Metric names used by the extraction and query pipeline
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    // Extraction metrics
    pub extractions_total: &'static str,
    pub extraction_duration: &'static str,
    pub messages_extracted_total: &'static str,

    // Query metrics
    pub filter_passes_total: &'static str,
    pub filter_duration: &'static str,
    pub messages_considered: &'static str,
    pub messages_selected: &'static str,
    pub filter_warnings_total: &'static str,

    // Error metrics
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            extractions_total: "parsepal_extractions_total",
            extraction_duration: "parsepal_extraction_duration_seconds",
            messages_extracted_total: "parsepal_messages_extracted_total",

            filter_passes_total: "parsepal_filter_passes_total",
            filter_duration: "parsepal_filter_duration_seconds",
            messages_considered: "parsepal_messages_considered",
            messages_selected: "parsepal_messages_selected",
            filter_warnings_total: "parsepal_filter_warnings_total",

            errors_total: "parsepal_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Record one extraction attempt
    pub fn record_extraction(&self, count: usize, duration: Duration, success: bool) {
        let status = if success { "success" } else { "error" };

        counter!(self.extractions_total, "status" => status).increment(1);
        histogram!(self.extraction_duration, "status" => status).record(duration.as_secs_f64());
        counter!(self.messages_extracted_total).increment(count as u64);
    }

    /// Record one filter pass
    #[allow(clippy::cast_precision_loss)]
    pub fn record_filter_pass(&self, input: usize, output: usize, warnings: usize, duration: Duration) {
        counter!(self.filter_passes_total).increment(1);
        histogram!(self.filter_duration).record(duration.as_secs_f64());
        histogram!(self.messages_considered).record(input as f64);
        histogram!(self.messages_selected).record(output as f64);
        if warnings > 0 {
            counter!(self.filter_warnings_total).increment(warnings as u64);
        }
        tracing::debug!(input, output, warnings, "Filter pass completed");
    }

    /// Record error metrics
    pub fn record_error(&self, error_type: &'static str, operation: &'static str) {
        counter!(self.errors_total, "type" => error_type, "operation" => operation).increment(1);
    }
}
