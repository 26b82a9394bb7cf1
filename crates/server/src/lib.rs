use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse},
    routing::get,
    routing::post,
    Json, Router,
};
use peekaboo_engine::{
    resolve_placement, score_candidates, GameSession, SelectError, SelectorConfig, SessionConfig,
    SessionError,
};
use peekaboo_protocol::{
    ClickOutcome, DetectedObject, ErrorBody, ImageSize, Placement, ProcessResponse, SessionView,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

pub mod compose;
pub mod detect;

use detect::{LumaBlockDetector, ObjectDetector};

/// Uploads are photos; give them headroom beyond axum's 2 MB default.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Upper bound on live sessions. Inserting past the bound evicts the oldest
/// entry together with its composite file.
const DEFAULT_MAX_SESSIONS: usize = 64;

static ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn new_id(prefix: &str) -> String {
    let c = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let ts = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    format!("{prefix}-{ts}-{c}")
}

struct SessionEntry {
    session: GameSession,
    composite_path: Option<PathBuf>,
    created_at: Instant,
}

impl SessionEntry {
    /// Drop the entry's on-disk composite. Best-effort; a missing file is not
    /// an error.
    fn discard_composite(&mut self) {
        if let Some(path) = self.composite_path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                log::debug!("could not remove composite {}: {e}", path.display());
            }
        }
    }
}

pub struct AppState {
    pub outputs_dir: PathBuf,
    pub selector: SelectorConfig,
    pub session_cfg: SessionConfig,
    pub detector: Box<dyn ObjectDetector>,
    pub max_sessions: usize,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl AppState {
    pub fn new(data_dir: PathBuf) -> anyhow::Result<Self> {
        use anyhow::Context;
        let outputs_dir = data_dir.join("outputs");
        std::fs::create_dir_all(&outputs_dir)
            .with_context(|| format!("create outputs dir: {}", outputs_dir.display()))?;
        Ok(Self {
            outputs_dir,
            selector: SelectorConfig::default(),
            session_cfg: SessionConfig::default(),
            detector: Box::new(LumaBlockDetector::default()),
            max_sessions: DEFAULT_MAX_SESSIONS,
            sessions: Mutex::new(HashMap::new()),
        })
    }
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn bad_request(msg: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(msg)))
}

fn unprocessable(msg: impl Into<String>) -> ApiError {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody::new(msg)))
}

fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("no such session")))
}

fn conflict(err: SessionError) -> ApiError {
    (StatusCode::CONFLICT, Json(ErrorBody::new(err.to_string())))
}

fn internal(msg: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(msg)),
    )
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let outputs = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            axum::http::header::CACHE_CONTROL,
            axum::http::HeaderValue::from_static("public, max-age=3600"),
        ))
        .service(ServeDir::new(state.outputs_dir.clone()));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/process", post(api_process))
        .route("/api/session/{id}", get(api_session_get))
        .route("/api/session/{id}/click", post(api_session_click))
        .route("/api/session/{id}/give-up", post(api_session_give_up))
        .route("/api/session/{id}/play-again", post(api_session_play_again))
        .route("/api/session/{id}/reset", post(api_session_reset))
        .nest_service("/outputs", outputs)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
        // Local game server: loopback peers only.
        .layer(middleware::from_fn(ip_allowlist))
        // Never `Access-Control-Allow-Origin: *`; a random website in the
        // user's browser has no business probing local uploads.
        .layer(local_only_cors())
}

async fn health() -> &'static str {
    "ok"
}

async fn index() -> Html<&'static str> {
    Html(GAME_HTML)
}

struct Processed {
    placement: Placement,
    objects_detected: usize,
    composite_name: String,
    reason: Option<serde_json::Value>,
}

/// Decode, detect, place, composite. Everything here is "upstream" from the
/// session's point of view; any failure maps to one rejected round.
fn process_round(
    state: &AppState,
    bytes: &[u8],
    supplied: Option<Vec<DetectedObject>>,
) -> anyhow::Result<Processed> {
    use anyhow::Context;

    let img = image::load_from_memory(bytes).context("decode uploaded image")?;
    let size = ImageSize::new(img.width(), img.height());

    let objects = match supplied {
        Some(objects) => objects,
        None => state.detector.detect(&img),
    };
    log::debug!(
        "processing {}x{} image, {} candidate objects",
        size.width,
        size.height,
        objects.len()
    );

    let reason = serde_json::to_value(score_candidates(&objects, size, &state.selector)).ok();
    let placement = resolve_placement(&objects, size, &state.selector).map_err(|e| match e {
        SelectError::NoCandidates => anyhow::anyhow!("no usable objects found in the image"),
        SelectError::EmptyImage => anyhow::anyhow!("image has no pixels"),
    })?;

    let composite = compose::overlay_target(
        &img,
        placement.x_norm * size.width as f32,
        placement.y_norm * size.height as f32,
        state.selector.sprite_w,
        state.selector.sprite_h,
    );
    let composite_name = format!("{}_output.png", new_id("img"));
    let path = state.outputs_dir.join(&composite_name);
    composite
        .save_with_format(&path, image::ImageFormat::Png)
        .with_context(|| format!("write composite: {}", path.display()))?;

    Ok(Processed {
        placement,
        objects_detected: objects.len(),
        composite_name,
        reason,
    })
}

pub async fn api_process(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut supplied: Option<Vec<DetectedObject>> = None;
    let mut replaces: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("image") => {
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("read image field: {e}")))?;
                upload = Some((mime, bytes.to_vec()));
            }
            Some("objects") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("read objects field: {e}")))?;
                supplied = Some(
                    serde_json::from_str(&text)
                        .map_err(|e| bad_request(format!("invalid objects payload: {e}")))?,
                );
            }
            // Previous session this upload supersedes; its entry is evicted
            // once the new round is stored.
            Some("session") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("read session field: {e}")))?;
                replaces = Some(text);
            }
            _ => {}
        }
    }

    let (mime, bytes) = upload.ok_or_else(|| bad_request("missing image upload field"))?;

    let mut session = GameSession::new(state.session_cfg);
    let token = session
        .image_selected(&mime)
        .map_err(|e| bad_request(e.to_string()))?;

    // Decode + detection + PNG encode are pure CPU work on a possibly large
    // photo; keep them off the async workers.
    let pipeline_state = state.clone();
    let processed = tokio::task::spawn_blocking(move || {
        process_round(&pipeline_state, &bytes, supplied)
    })
    .await
    .map_err(|e| internal(format!("processing task failed: {e}")))?;

    let now = Instant::now();
    match processed {
        Ok(processed) => {
            session
                .processing_complete(token, Ok(processed.placement.clone()), now)
                .map_err(|e| internal(e.to_string()))?;

            let session_id = new_id("s");
            let view = session.view(now);
            let composite_path = state.outputs_dir.join(&processed.composite_name);
            let mut sessions = state.sessions.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(mut old) = replaces.and_then(|id| sessions.remove(&id)) {
                old.discard_composite();
            }
            while sessions.len() >= state.max_sessions {
                let oldest = sessions
                    .iter()
                    .min_by_key(|(_, e)| e.created_at)
                    .map(|(id, _)| id.clone());
                match oldest.and_then(|id| sessions.remove(&id)) {
                    Some(mut evicted) => evicted.discard_composite(),
                    None => break,
                }
            }
            sessions.insert(
                session_id.clone(),
                SessionEntry {
                    session,
                    composite_path: Some(composite_path),
                    created_at: now,
                },
            );
            log::info!(
                "session {session_id}: hidden behind {:?} ({} objects)",
                processed.placement.occluder_label,
                processed.objects_detected
            );

            Ok(Json(ProcessResponse {
                session_id,
                target: processed.placement,
                objects_detected: processed.objects_detected,
                composite_image_url: format!("/outputs/{}", processed.composite_name),
                reason: processed.reason,
                session: view,
            }))
        }
        Err(err) => {
            let reason = format!("{err:#}");
            log::warn!("processing failed: {reason}");
            // The session is dropped, not stored: no partial round survives.
            let _ = session.processing_complete(token, Err(reason.clone()), now);
            Err(unprocessable(reason))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ClickInput {
    pub x: f32,
    pub y: f32,
    /// Rendered size of the image element, not the source resolution.
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub struct ClickResponse {
    pub outcome: ClickOutcome,
    pub session: SessionView,
}

pub async fn api_session_get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let sessions = state.sessions.lock().unwrap_or_else(|e| e.into_inner());
    let entry = sessions.get(&id).ok_or_else(not_found)?;
    Ok(Json(entry.session.view(Instant::now())))
}

pub async fn api_session_click(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<ClickInput>,
) -> Result<Json<ClickResponse>, ApiError> {
    if input.width == 0 || input.height == 0 {
        return Err(bad_request("rendered size must be positive"));
    }
    let now = Instant::now();
    let mut sessions = state.sessions.lock().unwrap_or_else(|e| e.into_inner());
    let entry = sessions.get_mut(&id).ok_or_else(not_found)?;
    let outcome = entry
        .session
        .handle_click(
            (input.x, input.y),
            ImageSize::new(input.width, input.height),
            now,
        )
        .map_err(conflict)?;
    Ok(Json(ClickResponse {
        outcome,
        session: entry.session.view(now),
    }))
}

pub async fn api_session_give_up(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let now = Instant::now();
    let mut sessions = state.sessions.lock().unwrap_or_else(|e| e.into_inner());
    let entry = sessions.get_mut(&id).ok_or_else(not_found)?;
    entry.session.give_up(now).map_err(conflict)?;
    Ok(Json(entry.session.view(now)))
}

pub async fn api_session_play_again(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let now = Instant::now();
    let mut sessions = state.sessions.lock().unwrap_or_else(|e| e.into_inner());
    let entry = sessions.get_mut(&id).ok_or_else(not_found)?;
    entry.session.play_again(now).map_err(conflict)?;
    Ok(Json(entry.session.view(now)))
}

pub async fn api_session_reset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.lock().unwrap_or_else(|e| e.into_inner());
    let mut entry = sessions.remove(&id).ok_or_else(not_found)?;
    drop(sessions);
    // The session is destroyed, not reset in place: entry plus composite go
    // away and the id stops resolving.
    entry.discard_composite();
    entry.session.reset();
    Ok(Json(entry.session.view(Instant::now())))
}

pub async fn serve(addr: SocketAddr, data_dir: PathBuf) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_listener(listener, data_dir, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;
    Ok(())
}

pub async fn serve_listener(
    listener: tokio::net::TcpListener,
    data_dir: PathBuf,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<SocketAddr> {
    let state = Arc::new(AppState::new(data_dir)?);
    let app = build_router(state);
    let addr = listener.local_addr()?;
    log::info!("listening on http://{addr}");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    Ok(addr)
}

async fn ip_allowlist(
    axum::extract::ConnectInfo(peer): axum::extract::ConnectInfo<SocketAddr>,
    req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    if is_allowed_peer_ip(peer.ip()) {
        return next.run(req).await;
    }
    (StatusCode::FORBIDDEN, "forbidden").into_response()
}

fn local_only_cors() -> CorsLayer {
    use axum::http::header;
    use axum::http::HeaderValue;
    use axum::http::Method;

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _req| {
            is_allowed_local_origin(origin)
        }))
}

fn is_allowed_local_origin(origin: &axum::http::HeaderValue) -> bool {
    let Ok(s) = origin.to_str() else {
        return false;
    };
    is_http_origin_for_host(s, "localhost") || is_http_origin_for_host(s, "127.0.0.1")
}

fn is_http_origin_for_host(origin: &str, host: &str) -> bool {
    for scheme in ["http://", "https://"] {
        if let Some(rest) = origin.strip_prefix(scheme) {
            if let Some(after) = rest.strip_prefix(host) {
                // Origin is just scheme://host[:port]
                return after.is_empty() || after.starts_with(':');
            }
        }
    }
    false
}

fn is_allowed_peer_ip(ip: IpAddr) -> bool {
    ip.is_loopback()
}


const GAME_HTML: &str = r###"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <meta name="theme-color" content="#10121c" />
  <title>Peekaboo</title>
  <style>
    :root{
      --bg:#10121c;
      --panel:#1a1d2e;
      --edge:#39405f;
      --ink:#e8eaf6;
      --muted:#8b92b3;
      --accent:#ffd45e;
      --hit:#4df5bf;
      --miss:#ff7198;
    }
    *{box-sizing:border-box;margin:0;padding:0}
    body{
      font-family:Inter,system-ui,sans-serif;
      background:var(--bg);color:var(--ink);
      min-height:100vh;display:flex;flex-direction:column;align-items:center;
      padding:24px 16px;gap:16px;
    }
    h1{font-size:20px;letter-spacing:.5px}
    h1 span{color:var(--accent)}
    .sub{font-size:12px;color:var(--muted)}
    .panel{
      width:min(900px,100%);
      border:1px solid var(--edge);border-radius:14px;background:var(--panel);
      padding:14px;
    }
    .uploader{display:flex;align-items:center;gap:12px;flex-wrap:wrap}
    .btn{
      border:1px solid var(--edge);background:#222742;color:var(--ink);
      border-radius:10px;padding:8px 12px;font-weight:600;cursor:pointer;
    }
    .btn:hover{border-color:var(--accent)}
    .btn:disabled{opacity:.4;cursor:default}
    .hud{display:flex;gap:18px;font-size:13px;color:var(--muted);align-items:center;flex-wrap:wrap}
    .hud strong{color:var(--ink);font-variant-numeric:tabular-nums}
    .stage{position:relative;display:none;line-height:0}
    .stage img{max-width:100%;border-radius:10px;cursor:crosshair;user-select:none}
    .marker{
      position:absolute;width:26px;height:26px;margin:-13px 0 0 -13px;
      border-radius:50%;border:2px solid var(--miss);pointer-events:none;
      transition:opacity .3s;
    }
    .marker.hit{border-color:var(--hit);box-shadow:0 0 0 4px #4df5bf33}
    .marker.reveal{border-color:var(--accent);box-shadow:0 0 0 4px #ffd45e33}
    #status{font-size:13px;color:var(--muted);min-height:18px}
    #status.err{color:var(--miss)}
    #status.win{color:var(--hit)}
  </style>
</head>
<body>
  <h1>Peek<span>a</span>boo</h1>
  <div class="sub">Upload a photo. Something is hiding in it. Find it.</div>

  <div class="panel uploader">
    <input id="file" type="file" accept="image/*" />
    <button id="giveUpBtn" class="btn" type="button" disabled>give up</button>
    <button id="againBtn" class="btn" type="button" disabled>play again</button>
    <button id="resetBtn" class="btn" type="button" disabled>reset</button>
    <div class="hud">
      <span>attempts <strong id="attempts">0</strong></span>
      <span>time <strong id="timer">0:00</strong></span>
      <span>score <strong id="score">-</strong></span>
    </div>
  </div>

  <div class="panel">
    <div id="stage" class="stage">
      <img id="photo" alt="processed upload" draggable="false" />
    </div>
    <div id="status">waiting for an image</div>
  </div>

  <script>
  (function(){
    const $ = (id) => document.getElementById(id);
    const fileInput = $("file");
    const giveUpBtn = $("giveUpBtn");
    const againBtn = $("againBtn");
    const resetBtn = $("resetBtn");
    const stage = $("stage");
    const photo = $("photo");
    const statusEl = $("status");

    let sessionId = null;
    let playing = false;
    let busy = false;
    let roundStart = null;
    let timerHandle = null;
    let missTtl = 1000;
    // Monotonic request sequence: a response for a superseded upload is
    // discarded instead of applied.
    let requestSeq = 0;

    function setStatus(text, cls){
      statusEl.textContent = text;
      statusEl.className = cls || "";
    }

    function setButtons(){
      giveUpBtn.disabled = busy || !playing;
      againBtn.disabled = busy || playing || !sessionId;
      resetBtn.disabled = busy || !sessionId;
      fileInput.disabled = busy;
    }

    function clearMarkers(){
      for (const el of stage.querySelectorAll(".marker")) el.remove();
    }

    function addMarker(x, y, kind){
      const rect = photo.getBoundingClientRect();
      const el = document.createElement("div");
      el.className = "marker" + (kind ? " " + kind : "");
      el.style.left = (x / rect.width * 100) + "%";
      el.style.top = (y / rect.height * 100) + "%";
      stage.appendChild(el);
      if (!kind){
        setTimeout(() => { el.style.opacity = "0"; setTimeout(() => el.remove(), 300); }, missTtl);
      }
    }

    function startTimer(){
      roundStart = performance.now();
      stopTimer();
      timerHandle = setInterval(() => {
        const s = Math.floor((performance.now() - roundStart) / 1000);
        $("timer").textContent = Math.floor(s / 60) + ":" + String(s % 60).padStart(2, "0");
      }, 100);
    }

    function stopTimer(){
      if (timerHandle !== null){ clearInterval(timerHandle); timerHandle = null; }
    }

    function applyView(view){
      missTtl = view.miss_marker_ttl_ms;
      $("attempts").textContent = view.attempts;
      $("timer").textContent = view.elapsed_display;
      $("score").textContent = view.score === undefined || view.score === null ? "-" : view.score;
      playing = view.state === "playing";
      if (!playing) stopTimer();
      setButtons();
    }

    function revealTarget(view){
      if (!view.target) return;
      const rect = photo.getBoundingClientRect();
      addMarker(view.target.x_norm * rect.width, view.target.y_norm * rect.height, "reveal");
    }

    async function post(path, body){
      const r = await fetch(path, {
        method: "POST",
        headers: body ? { "content-type": "application/json" } : {},
        body: body ? JSON.stringify(body) : undefined,
      });
      const j = await r.json();
      if (!r.ok) throw new Error(j.error || ("request failed: " + r.status));
      return j;
    }

    fileInput.addEventListener("change", async () => {
      const file = fileInput.files && fileInput.files[0];
      if (!file) return;
      if (!file.type.startsWith("image/")){
        setStatus("that is not an image file", "err");
        fileInput.value = "";
        return;
      }

      const seq = ++requestSeq;
      busy = true;
      setButtons();
      setStatus("processing...");
      try{
        const form = new FormData();
        form.append("image", file);
        if (sessionId) form.append("session", sessionId);
        const r = await fetch("/api/process", { method: "POST", body: form });
        const j = await r.json();
        if (seq !== requestSeq) return; // superseded by a newer upload
        if (!r.ok) throw new Error(j.error || "processing failed");

        sessionId = j.session_id;
        clearMarkers();
        photo.src = j.composite_image_url;
        stage.style.display = "block";
        applyView(j.session);
        startTimer();
        const spot = j.target.occluder_label === "none"
          ? "no occluder found; it is hiding in plain sight"
          : "it is hiding somewhere... click to find it";
        setStatus(spot);
      }catch(e){
        if (seq === requestSeq) setStatus(e.message, "err");
      }finally{
        if (seq === requestSeq){ busy = false; setButtons(); }
      }
    });

    photo.addEventListener("click", async (e) => {
      if (!playing || busy || !sessionId) return;
      const rect = photo.getBoundingClientRect();
      const x = e.clientX - rect.left;
      const y = e.clientY - rect.top;
      try{
        const j = await post("/api/session/" + sessionId + "/click", {
          x: x, y: y,
          width: Math.round(rect.width),
          height: Math.round(rect.height),
        });
        addMarker(x, y, j.outcome.hit ? "hit" : null);
        applyView(j.session);
        if (j.outcome.hit){
          setStatus("found it! score " + (j.outcome.score === null || j.outcome.score === undefined ? "-" : j.outcome.score), "win");
        }
      }catch(err){
        setStatus(err.message, "err");
      }
    });

    giveUpBtn.addEventListener("click", async () => {
      if (!sessionId) return;
      try{
        const view = await post("/api/session/" + sessionId + "/give-up");
        applyView(view);
        revealTarget(view);
        setStatus("it was right there");
      }catch(err){ setStatus(err.message, "err"); }
    });

    againBtn.addEventListener("click", async () => {
      if (!sessionId) return;
      try{
        const view = await post("/api/session/" + sessionId + "/play-again");
        clearMarkers();
        applyView(view);
        startTimer();
        setStatus("same hiding spot, fresh round");
      }catch(err){ setStatus(err.message, "err"); }
    });

    resetBtn.addEventListener("click", async () => {
      if (!sessionId) return;
      try{
        const view = await post("/api/session/" + sessionId + "/reset");
        applyView(view);
      }catch(_e){}
      sessionId = null;
      playing = false;
      stopTimer();
      clearMarkers();
      stage.style.display = "none";
      photo.removeAttribute("src");
      fileInput.value = "";
      $("attempts").textContent = "0";
      $("timer").textContent = "0:00";
      $("score").textContent = "-";
      setButtons();
      setStatus("waiting for an image");
    });

    setButtons();
  })();
  </script>
</body>
</html>
"###;
