//! Landmark frame sources
//!
//! Pose estimation runs outside this process. Frames arrive as JSON, one per
//! UDP datagram or per line of a replay file / stdin, and are forwarded to the
//! frame loop through a bounded channel.

use crate::error::{GestureError, Result};
use crate::types::{HandFrame, HandPose, Landmark, MAX_HANDS};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// Env var naming the UDP address the hand listener binds to
pub const UDP_ADDR_ENV: &str = "RAYOS_HANDS_UDP_ADDR";

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum JsonPoint {
    Xyz([f32; 3]),
    Xy([f32; 2]),
    Object(Landmark),
}

impl From<JsonPoint> for Landmark {
    fn from(p: JsonPoint) -> Self {
        match p {
            JsonPoint::Xyz([x, y, z]) => Landmark { x, y, z },
            JsonPoint::Xy([x, y]) => Landmark::new(x, y),
            JsonPoint::Object(l) => l,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonFrameMsg {
    Bare(Vec<Vec<JsonPoint>>),
    Object {
        hands: Vec<Vec<JsonPoint>>,
        #[serde(default)]
        timestamp: Option<u64>,
    },
}

/// Where frames come from
#[derive(Debug, Clone)]
pub enum FrameSource {
    Udp(SocketAddr),
    Replay { path: PathBuf, fps: f32 },
    Stdin,
}

impl FrameSource {
    /// Start feeding frames into `tx`. Fails if the source cannot be opened.
    pub async fn spawn(self, tx: mpsc::Sender<HandFrame>) -> Result<()> {
        match self {
            Self::Udp(addr) => spawn_udp_hands_task(addr, tx).await,
            Self::Replay { path, fps } => spawn_replay_task(path, fps, tx).await,
            Self::Stdin => {
                spawn_line_task(BufReader::new(tokio::io::stdin()), None, tx);
                Ok(())
            }
        }
    }
}

pub fn udp_hands_addr_from_env() -> Option<SocketAddr> {
    let raw = std::env::var(UDP_ADDR_ENV).ok()?;
    raw.parse::<SocketAddr>().ok()
}

/// Parse one frame message.
///
/// Accepts `{"hands": [[[x,y(,z)], ...], ...], "timestamp": 123}` or a bare
/// array of hands. Points may also be `{"x":..,"y":..}` objects. At most two
/// hands are kept. If either of them is not 21 finite points the frame comes
/// back with no hands at all.
pub fn parse_hands_message(msg: &str) -> Option<HandFrame> {
    let msg = msg.trim();
    if msg.is_empty() {
        return None;
    }

    let (raw_hands, timestamp) = match serde_json::from_str::<JsonFrameMsg>(msg) {
        Ok(JsonFrameMsg::Object { hands, timestamp }) => (hands, timestamp),
        Ok(JsonFrameMsg::Bare(hands)) => (hands, None),
        Err(e) => {
            log::debug!("Skipping unparseable hand message: {e}");
            return None;
        }
    };

    let hands: Result<Vec<HandPose>> = raw_hands
        .into_iter()
        .take(MAX_HANDS)
        .map(|points| {
            let points: Vec<Landmark> = points.into_iter().map(Landmark::from).collect();
            HandPose::new(&points)
        })
        .collect();

    // Hand order decides the primary hand, so one bad hand spoils the frame
    let hands = hands.unwrap_or_else(|e| {
        log::debug!("Discarding hands in frame: {e}");
        Vec::new()
    });

    let mut frame = HandFrame::new(hands);
    frame.timestamp = timestamp;
    Some(frame)
}

pub async fn spawn_udp_hands_task(bind_addr: SocketAddr, tx: mpsc::Sender<HandFrame>) -> Result<()> {
    let sock = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| GestureError::Source(format!("bind UDP {bind_addr}: {e}")))?;
    log::info!("UDP hand listener bound on {bind_addr}");

    tokio::spawn(async move {
        let mut buf = vec![0u8; 16 * 1024];
        loop {
            let (len, _src) = match sock.recv_from(&mut buf).await {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("UDP hand recv error: {e}");
                    continue;
                }
            };

            if let Ok(s) = std::str::from_utf8(&buf[..len]) {
                if let Some(frame) = parse_hands_message(s) {
                    if tx.send(frame).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    Ok(())
}

pub async fn spawn_replay_task(path: PathBuf, fps: f32, tx: mpsc::Sender<HandFrame>) -> Result<()> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(GestureError::Source(format!("invalid replay fps {fps}")));
    }
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| GestureError::Source(format!("open {}: {e}", path.display())))?;
    log::info!("Replaying hand frames from {} at {fps} fps", path.display());

    spawn_line_task(
        BufReader::new(file),
        Some(Duration::from_secs_f32(1.0 / fps)),
        tx,
    );
    Ok(())
}

fn spawn_line_task<R>(reader: BufReader<R>, pace: Option<Duration>, tx: mpsc::Sender<HandFrame>)
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = pace.map(tokio::time::interval);
        let mut lines = reader.lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    log::warn!("Frame source read error: {e}");
                    break;
                }
            };
            let Some(frame) = parse_hands_message(&line) else {
                continue;
            };
            if let Some(ticker) = ticker.as_mut() {
                ticker.tick().await;
            }
            if tx.send(frame).await.is_err() {
                break;
            }
        }
        log::info!("Frame source exhausted");
    });
}
