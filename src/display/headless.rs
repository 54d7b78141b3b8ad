//! Headless mode: no drawing, markers are logged when an animation settles.
//!
//! Useful on machines without a terminal or for driving the radar purely
//! over the control socket:
//! ```bash
//! cyradar --mode headless &
//! cyradar rotate 90 left
//! ```

use anyhow::Result;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::Config;
use crate::display::MarkerLayer;
use crate::ipc::IpcCommand;
use crate::radar::transform::to_polar;
use crate::radar::SetId;
use crate::session::RadarSession;

pub async fn run(
    config: Config,
    mut session: RadarSession,
    mut ipc_rx: Option<mpsc::Receiver<IpcCommand>>,
) -> Result<()> {
    info!("Headless mode running. Press Ctrl+C to stop.");
    info!(
        "Tracking {} blue and {} red points",
        session.registry().len(SetId::Blue),
        session.registry().len(SetId::Red)
    );

    // Create shutdown handler
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        shutdown_tx.send(true).ok();
    });

    let mut markers = MarkerLayer::new();
    session.paint_initial(&mut markers);
    log_markers(&markers);

    let mut ticker = tokio::time::interval(config.frame_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown_rx.changed() => break,
        }

        if tick(&mut session, &mut markers, ipc_rx.as_mut(), Instant::now()) {
            log_markers(&markers);
        }
    }

    info!("Headless mode stopped");
    Ok(())
}

/// Apply queued IPC commands, then run one frame. Returns true when this
/// frame finished the last running animation.
fn tick(
    session: &mut RadarSession,
    markers: &mut MarkerLayer,
    ipc_rx: Option<&mut mpsc::Receiver<IpcCommand>>,
    now: Instant,
) -> bool {
    if let Some(rx) = ipc_rx {
        while let Ok(cmd) = rx.try_recv() {
            crate::ipc::process_ipc_command(cmd, session, now);
        }
    }

    let was_animating = session.is_animating();
    let pending = session.frame(now, markers);
    if was_animating {
        debug!(
            "Frame painted ({} paints total), {} task(s) pending",
            markers.paints(),
            pending
        );
    }
    was_animating && pending == 0
}

fn log_markers(markers: &MarkerLayer) {
    for set in SetId::ALL {
        let points: Vec<String> = markers
            .markers(set)
            .iter()
            .map(|&p| {
                let polar = to_polar(p);
                format!("{:.2}cm@{:.1}°", polar.distance, polar.angle_degrees)
            })
            .collect();
        info!("{} markers: {}", set, points.join(" "));
    }
}
