use dioxus::document::eval;
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use quiz_core::input::{InputPolicy, KeyCode, KeyCombo};
use services::QuizSession;
use services::error::CameraError;
use services::proctoring::Visibility;

use crate::bridge::CameraRequest;

/// Reports `document.hidden` on every visibility change.
pub(super) const VISIBILITY_WATCH: &str = r#"(function() {
    if (window.__quizVisibility) {
        document.removeEventListener("visibilitychange", window.__quizVisibility);
    }
    window.__quizVisibility = () => dioxus.send(document.hidden);
    document.addEventListener("visibilitychange", window.__quizVisibility);
})();"#;

/// Streams live in `window.__quizCameras`, keyed by the request id that
/// opened them. Starting a new one stops every stream it replaces.
pub(super) fn camera_start_script(id: u64) -> String {
    format!(
        r#"(async function() {{
    const id = "{id}";
    const streams = (window.__quizCameras = window.__quizCameras || {{}});
    if (!navigator.mediaDevices || !navigator.mediaDevices.getUserMedia) {{
        dioxus.send({{ ok: false, error: "media devices unsupported" }});
        return;
    }}
    try {{
        const stream = await navigator.mediaDevices.getUserMedia({{ video: true }});
        for (const [old, replaced] of Object.entries(streams)) {{
            replaced.getTracks().forEach((track) => track.stop());
            delete streams[old];
        }}
        streams[id] = stream;
        const video = document.getElementById("camera");
        if (video) {{
            video.srcObject = stream;
        }}
        dioxus.send({{ ok: true, error: null }});
    }} catch (err) {{
        dioxus.send({{ ok: false, error: String((err && err.name) || err) }});
    }}
}})();"#
    )
}

/// Stop the stream opened by request `id`, if it is still running.
pub(super) fn camera_stop_script(id: u64) -> String {
    format!(
        r#"(function() {{
    const streams = window.__quizCameras || {{}};
    const stream = streams["{id}"];
    if (!stream) {{
        return;
    }}
    stream.getTracks().forEach((track) => track.stop());
    delete streams["{id}"];
    const video = document.getElementById("camera");
    if (video && video.srcObject === stream) {{
        video.srcObject = null;
    }}
}})();"#
    )
}

/// Stop every stream, used when the page goes away.
pub(super) const CAMERA_STOP_ALL: &str = r#"(function() {
    const streams = window.__quizCameras || {};
    for (const [id, stream] of Object.entries(streams)) {
        stream.getTracks().forEach((track) => track.stop());
        delete streams[id];
    }
    const video = document.getElementById("camera");
    if (video) {
        video.srcObject = null;
    }
})();"#;

/// Script that makes the webview swallow the policy's key combinations and,
/// if the policy says so, the context menu. Re-running it swaps the policy.
pub(super) fn input_guard_script(policy: &InputPolicy) -> String {
    let combos = policy.blocked().map(combo_js).collect::<Vec<_>>().join(",");
    let context_menu = policy.blocks_context_menu();
    format!(
        r#"(function() {{
    window.__quizGuard = {{ combos: [{combos}], contextMenu: {context_menu} }};
    if (window.__quizGuardInstalled) {{
        return;
    }}
    window.__quizGuardInstalled = true;
    document.addEventListener("keydown", (e) => {{
        const guard = window.__quizGuard;
        if (!guard || !e.key) {{
            return;
        }}
        const key = e.key.toLowerCase();
        const primary = e.ctrlKey || e.metaKey;
        const hit = guard.combos.some((c) =>
            c.key === key && c.primary === primary && c.shift === e.shiftKey && c.alt === e.altKey
        );
        if (hit) {{
            e.preventDefault();
        }}
    }}, true);
    document.addEventListener("contextmenu", (e) => {{
        const guard = window.__quizGuard;
        if (guard && guard.contextMenu) {{
            e.preventDefault();
        }}
    }}, true);
}})();"#
    )
}

fn combo_js(combo: &KeyCombo) -> String {
    let key = match combo.key {
        KeyCode::Char(c) => c.to_ascii_lowercase().to_string(),
        KeyCode::Function(n) => format!("f{n}"),
    };
    format!(
        "{{key:{key:?},primary:{},shift:{},alt:{}}}",
        combo.primary, combo.shift, combo.alt
    )
}

/// Forward host visibility changes to the session until the page goes away.
pub(super) async fn watch_visibility(session: QuizSession) {
    let mut watcher = eval(VISIBILITY_WATCH);
    while let Ok(hidden) = watcher.recv::<bool>().await {
        let visibility = if hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
        session.visibility_changed(visibility);
    }
    debug!("visibility watcher closed");
}

#[derive(Debug, Deserialize)]
struct CameraReply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Serve camera requests from the session with the webview's media API.
pub(super) async fn serve_camera(mut requests: UnboundedReceiver<CameraRequest>) {
    while let Some(request) = requests.recv().await {
        match request {
            CameraRequest::Start { id, reply } => {
                let _ = reply.send(start_camera(id).await);
            }
            CameraRequest::Stop { id } => {
                debug!(id, "stopping camera stream");
                let _ = eval(&camera_stop_script(id)).await;
            }
        }
    }
}

async fn start_camera(id: u64) -> Result<(), CameraError> {
    let mut script = eval(&camera_start_script(id));
    match script.recv::<CameraReply>().await {
        Ok(CameraReply { ok: true, .. }) => Ok(()),
        Ok(CameraReply { error, .. }) => Err(CameraError::PermissionDenied(
            error.unwrap_or_else(|| "unknown".to_string()),
        )),
        Err(err) => {
            warn!(error = ?err, "camera script did not answer");
            Err(CameraError::Unavailable)
        }
    }
}
