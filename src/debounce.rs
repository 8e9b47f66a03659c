use std::time::Duration;
use tokio::sync::mpsc;

/// Forwards the last value of each burst once `idle` has passed without a
/// newer one. A value still pending when the input closes is dropped.
pub fn debounced<T: Send + 'static>(mut input: mpsc::Receiver<T>, idle: Duration) -> mpsc::Receiver<T> {
    let (output, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            let timer = tokio::time::sleep(idle);
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => pending = Some(value),
                    None => break,
                },
                _ = timer, if pending.is_some() => {
                    if let Some(value) = pending.take() {
                        if output.send(value).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });
    rx
}
