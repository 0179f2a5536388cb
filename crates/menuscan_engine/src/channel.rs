use engine_logging::{engine_info, engine_warn};
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::client::EventSink;
use crate::wire::ChannelFrame;
use crate::{ChannelError, EngineEvent};

/// Builds the status-channel endpoint for a job from the HTTP API base.
pub fn channel_url(base_url: &str, job_id: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{ws_base}/bulk/ws/{job_id}")
}

/// Decodes one channel frame: JSON tagged `update` or `complete`.
pub fn decode_frame(text: &str) -> Result<ChannelFrame, ChannelError> {
    serde_json::from_str(text).map_err(|err| ChannelError::Decode(err.to_string()))
}

/// Runs one job's status channel until the terminal frame or disconnect.
///
/// Frames are delivered to the sink in arrival order, never buffered or
/// reordered. Undecodable frames are logged and skipped so a server
/// protocol extension cannot kill the stream. The client sends nothing
/// after connecting. Exactly one of `JobComplete` or `ChannelClosed` is
/// emitted before returning.
pub async fn run_status_channel(url: &str, sink: &dyn EventSink) -> Result<(), ChannelError> {
    let (mut stream, _response) = match connect_async(url).await {
        Ok(connected) => connected,
        Err(err) => {
            sink.emit(EngineEvent::ChannelClosed);
            return Err(ChannelError::Connect(err.to_string()));
        }
    };
    engine_info!("status channel open: {url}");

    while let Some(frame) = stream.next().await {
        let message = match frame {
            Ok(message) => message,
            Err(err) => {
                engine_warn!("status channel transport error: {err}");
                sink.emit(EngineEvent::ChannelClosed);
                return Err(ChannelError::Transport(err.to_string()));
            }
        };
        match message {
            Message::Text(text) => match decode_frame(text.as_str()) {
                Ok(ChannelFrame::Update { data }) => {
                    sink.emit(EngineEvent::ItemUpdate(data));
                }
                Ok(ChannelFrame::Complete) => {
                    engine_info!("status channel complete: {url}");
                    sink.emit(EngineEvent::JobComplete);
                    let _ = stream.close(None).await;
                    return Ok(());
                }
                Err(err) => engine_warn!("skipping undecodable channel frame: {err}"),
            },
            Message::Close(_) => break,
            // Ping/pong are answered by the transport; binary frames are
            // not part of the protocol.
            _ => {}
        }
    }

    engine_info!("status channel closed without completion: {url}");
    sink.emit(EngineEvent::ChannelClosed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_url_switches_scheme_and_appends_job_path() {
        assert_eq!(
            channel_url("http://localhost:8000/api/v1/", "job-9"),
            "ws://localhost:8000/api/v1/bulk/ws/job-9"
        );
        assert_eq!(
            channel_url("https://menuscan.example/api/v1", "abc"),
            "wss://menuscan.example/api/v1/bulk/ws/abc"
        );
    }
}
