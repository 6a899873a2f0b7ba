//! In-process director + guest demo.
//!
//! Runs a miniature show: the director starts playback, holds for a safety
//! stop, resumes, and the guest follows through the same command stream it
//! would receive over the wire. Run with `RUST_LOG=debug` to watch state
//! transitions.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use cuesync_core::clock::{SystemClock, WallClock};
use cuesync_core::element::{ElementId, ScriptElement};
use cuesync_protocol::message::CommandKind;
use cuesync_protocol::runtime::ShowRuntime;

fn cue(id: &str, offset_ms: i64, name: &str) -> ScriptElement {
    ScriptElement {
        element_id: ElementId::from(id),
        offset_ms,
        duration_ms: None,
        element_name: name.to_owned(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let wall: Arc<dyn WallClock> = Arc::new(SystemClock);
            let elements = [
                cue("e1", 0, "House to half"),
                cue("e2", 1_500, "Curtain up"),
                cue("e3", 3_000, "Opening number"),
            ];

            let mut director = ShowRuntime::new(Arc::clone(&wall));
            let mut guest = ShowRuntime::new(wall);
            let curtain = chrono::Utc::now();
            for runtime in [&director, &guest] {
                let session = runtime.session();
                let mut session = session.borrow_mut();
                session.set_script_start(Some(curtain));
                session.load_elements(&elements, 1_000);
            }

            for element in &elements {
                let id = element.element_id.clone();
                let name = element.element_name.clone();
                guest
                    .session()
                    .borrow_mut()
                    .subscribe_element(&id, move |visual| {
                        tracing::info!(cue = %name, ?visual, "guest cue state changed");
                    });
            }

            tracing::info!("director starts the show");
            director.play();
            guest.apply_command(&director.command_message(CommandKind::Play));

            tokio::time::sleep(Duration::from_millis(1_800)).await;

            tracing::info!("safety hold");
            director.safety();
            guest.apply_command(&director.command_message(CommandKind::Safety));
            tokio::time::sleep(Duration::from_millis(1_100)).await;

            tracing::info!("resuming");
            director.play();
            guest.apply_command(&director.command_message(CommandKind::Play));
            guest.apply_status(&director.heartbeat());

            tokio::time::sleep(Duration::from_millis(2_000)).await;

            tracing::info!(
                director_show_time = director.session().borrow().current_show_time(),
                guest_show_time = guest.session().borrow().current_show_time(),
                "winding down"
            );
            director.stop();
            guest.apply_command(&director.command_message(CommandKind::Stop));

            director.destroy();
            guest.destroy();
        })
        .await;

    Ok(())
}
