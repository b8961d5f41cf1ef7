use tokio::select;
use tokio_util::sync::CancellationToken;

/// Detects signals sent to the process. Returns as soon as either a signal arrives or some other
/// part of the daemon cancels the token.
///
/// On Windows detached processes can't detect signals sent to them, so `tabtally stop` kills
/// the process instead.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}
