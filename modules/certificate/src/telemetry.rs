use signary_common::fingerprint::Fingerprint;

/// Counters emitted by the certificate service.
///
/// Invoked after the corresponding change was committed, at most once per
/// actual state change. Implementations must not block.
pub trait TelemetrySink: Send + Sync {
    fn certificate_added(&self, fingerprint: &Fingerprint);

    fn certificate_activated(&self, fingerprint: &Fingerprint);

    fn certificate_deactivated(&self, fingerprint: &Fingerprint);
}

/// Telemetry sink writing to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTelemetry;

impl TelemetrySink for LogTelemetry {
    fn certificate_added(&self, fingerprint: &Fingerprint) {
        log::debug!("certificate added: {fingerprint}");
    }

    fn certificate_activated(&self, fingerprint: &Fingerprint) {
        log::debug!("certificate activated: {fingerprint}");
    }

    fn certificate_deactivated(&self, fingerprint: &Fingerprint) {
        log::debug!("certificate deactivated: {fingerprint}");
    }
}
