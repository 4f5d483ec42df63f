use crate::events::AppEvent;
use crate::sys::command::Command;
use async_channel::Sender;
use std::io::ErrorKind;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/circlechart.sock";

/// Forwards every valid command line on `reader` as an [`AppEvent`]. Returns
/// early once the app side of `tx` is gone.
async fn serve_lines<R>(reader: R, tx: &Sender<AppEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                log::debug!("Received {:?}", command);
                if tx.send(command.into()).await.is_err() {
                    return;
                }
            }
            Err(e) => log::warn!("Ignoring {:?}: {}", line, e),
        }
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    match fs_err::remove_file(SOCKET_PATH) {
        Ok(()) => log::debug!("Removed stale socket {}", SOCKET_PATH),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("{}", e),
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    serve_lines(stream, &tx).await;
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circlechart_core::ProgressSpec;

    #[tokio::test]
    async fn test_serve_lines_skips_bad_commands() {
        let (tx, rx) = async_channel::unbounded();
        let input: &[u8] = b"progress 1 2\n\nwobble\nprogress 1 0\ndebug on\nreload\n";

        serve_lines(input, &tx).await;
        drop(tx);

        let mut events = Vec::new();
        while let Ok(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                AppEvent::Progress(ProgressSpec::new(1.0, 2.0).unwrap()),
                AppEvent::Debug(true),
                AppEvent::ConfigReload,
            ]
        );
    }

    #[tokio::test]
    async fn test_serve_lines_stops_when_app_is_gone() {
        let (tx, rx) = async_channel::unbounded();
        drop(rx);
        serve_lines(&b"debug on\ndebug off\n"[..], &tx).await;
        assert!(tx.is_closed());
    }
}
