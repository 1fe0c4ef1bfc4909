// GET /ws/{userId} handler

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;
use warp::ws::{Message, WebSocket, Ws};

use crate::models::{ClientMessage, Keywords, ServerMessage};
use crate::workflow::{StoryWorkflow, WorkflowEvent};

/// Incoming WebSocket frame, reduced to what the dispatch loop cares about
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Text(String),
    Close,
    Other,
}

impl From<Message> for Frame {
    fn from(message: Message) -> Self {
        if message.is_close() {
            Frame::Close
        } else if message.is_text() {
            Frame::Text(message.to_str().unwrap_or_default().to_string())
        } else {
            Frame::Other
        }
    }
}

/// Failure to deliver a server message
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("WebSocket error: {0}")]
    Transport(#[from] warp::Error),

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

enum Flow {
    Continue,
    Close,
}

pub async fn ws_handler(
    user_id: String,
    ws: Ws,
    workflow: Arc<StoryWorkflow>,
) -> Result<impl warp::Reply, Infallible> {
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, user_id, workflow)))
}

async fn handle_socket(socket: WebSocket, user_id: String, workflow: Arc<StoryWorkflow>) {
    let (ws_tx, ws_rx) = socket.split();

    let outgoing = ws_tx.with(|msg: ServerMessage| {
        futures_util::future::ready(
            serde_json::to_string(&msg)
                .map(Message::text)
                .map_err(ConnectionError::from),
        )
    });
    let incoming = ws_rx.map(|frame| frame.map(Frame::from));

    run_connection(incoming, Box::pin(outgoing), &user_id, &workflow).await;
}

/// Serve one client connection until it closes
///
/// Frames are handled one at a time, so a second `generate_story` waits for
/// the first to finish.
pub async fn run_connection<I, O, E>(
    mut incoming: I,
    mut outgoing: O,
    user_id: &str,
    workflow: &StoryWorkflow,
) where
    I: Stream<Item = Result<Frame, E>> + Unpin,
    O: Sink<ServerMessage> + Unpin,
    O::Error: Display,
    E: Display,
{
    tracing::info!(%user_id, "Client connected");

    if let Err(e) = outgoing.send(ServerMessage::connected()).await {
        tracing::warn!(%user_id, error = %e, "Failed to send connection confirmation");
        return;
    }

    while let Some(frame) = incoming.next().await {
        let text = match frame {
            Ok(Frame::Text(text)) => text,
            Ok(Frame::Close) => {
                tracing::info!(%user_id, "Client disconnected");
                break;
            }
            Ok(Frame::Other) => continue,
            Err(e) => {
                tracing::error!(%user_id, error = %e, "WebSocket error");
                break;
            }
        };

        match handle_message(&text, user_id, workflow, &mut outgoing).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Close) => break,
            Err(e) => {
                tracing::debug!(%user_id, error = %e, "Send failed, client is gone");
                break;
            }
        }
    }

    tracing::info!(%user_id, "Client connection closed");
}

async fn handle_message<O>(
    text: &str,
    user_id: &str,
    workflow: &StoryWorkflow,
    outgoing: &mut O,
) -> Result<Flow, O::Error>
where
    O: Sink<ServerMessage> + Unpin,
{
    let message = match ClientMessage::parse(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::error!(%user_id, error = %e, "Malformed client message");
            outgoing
                .send(ServerMessage::error(format!("Server error: {}", e)))
                .await?;
            return Ok(Flow::Close);
        }
    };

    match message {
        ClientMessage::GenerateStory { data } => {
            generate_story(data, user_id, workflow, outgoing).await?;
        }
        ClientMessage::Ping => outgoing.send(ServerMessage::Pong).await?,
        ClientMessage::Unknown => {
            tracing::warn!(%user_id, raw = %text, "Unknown message type");
        }
    }

    Ok(Flow::Continue)
}

async fn generate_story<O>(
    keywords: Keywords,
    user_id: &str,
    workflow: &StoryWorkflow,
    outgoing: &mut O,
) -> Result<(), O::Error>
where
    O: Sink<ServerMessage> + Unpin,
{
    outgoing.send(ServerMessage::processing()).await?;

    let mut events = workflow.run(user_id, keywords.0);
    while let Some(event) = events.next().await {
        let message = match event {
            Ok(WorkflowEvent::StoryCompleted(story)) => {
                tracing::info!(%user_id, chars = story.len(), "Sending story");
                ServerMessage::StoryComplete { data: story }
            }
            Ok(WorkflowEvent::StoryEmpty) => ServerMessage::error("No story was generated"),
            Ok(WorkflowEvent::KeyframeGenerated(keyframe)) => {
                tracing::info!(%user_id, keyframe = keyframe.keyframe, "Sending image keyframe");
                ServerMessage::ImageGenerated { data: keyframe }
            }
            Ok(WorkflowEvent::ImagesCompleted(_)) => continue,
            Err(e) => {
                tracing::error!(%user_id, error = %e, "Error generating story");
                outgoing
                    .send(ServerMessage::error(format!("Story generation failed: {}", e)))
                    .await?;
                return Ok(());
            }
        };
        outgoing.send(message).await?;
    }

    outgoing.send(ServerMessage::turn_complete()).await
}
