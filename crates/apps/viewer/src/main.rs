use std::path::PathBuf;

use clap::Parser;
use controller::{HeadlessMap, MapController, ResizeObserver};
use formats::load_sites_from_path;
use foundation::geo::{BoundsCorners, LngLat, Size};
use foundation::ids::SiteId;
use foundation::time::Time;
use runtime::Frame;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use viewport::{PopupCandidate, ViewportConfig, ViewportState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless site map session")]
struct Args {
    /// Viewport configuration (JSON); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// GeoJSON FeatureCollection of Point sites
    #[arg(long)]
    sites: PathBuf,

    /// Select a site by id (repeatable; the last one wins)
    #[arg(long)]
    select: Vec<String>,

    /// Programmatic flight: LNG,LAT,ZOOM
    #[arg(long, value_parser = parse_fly_to)]
    fly_to: Option<FlyTarget>,

    /// Window resize at session start: WIDTHxHEIGHT
    #[arg(long, value_parser = parse_size)]
    resize: Option<Size>,

    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Frame delta time (seconds)
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
}

#[derive(Debug, Copy, Clone)]
struct FlyTarget {
    center: LngLat,
    zoom: f64,
}

#[derive(Serialize)]
struct Summary<'a> {
    center: LngLat,
    zoom: f64,
    bounds: BoundsCorners,
    window: Size,
    selected: Option<&'a SiteId>,
    popup: Option<PopupCandidate>,
    flights_commanded: u64,
    still_flying: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    if !(args.dt > 0.0 && args.dt.is_finite()) {
        return Err(format!("--dt must be a positive number, got {}", args.dt));
    }

    let config = match &args.config {
        Some(path) => ViewportConfig::load(path).map_err(|e| e.to_string())?,
        None => ViewportConfig::default(),
    };
    let sites = load_sites_from_path(&args.sites).map_err(|e| e.to_string())?;
    info!(count = sites.len(), path = %args.sites.display(), "sites loaded");

    let mut state = ViewportState::new(config);
    let mut map = HeadlessMap::from_config(state.config());
    let mut controller = MapController::attach(&mut state, &map);
    let mut resize = ResizeObserver::new(state.config().resize_debounce_ms);

    map.load();
    let events = map.drain_events();
    controller.dispatch(&mut state, &mut map, events);

    // Sites arrive after the widget has loaded, as with a fetched dataset.
    state.set_sites(sites);
    controller.update(&mut state, &mut map);

    for id in &args.select {
        let id = SiteId::new(id.clone());
        if !state.sites().iter().any(|s| s.id == id) {
            warn!(site = %id, "unknown site id ignored");
            continue;
        }
        state.set_selected_site(Some(id));
        controller.update(&mut state, &mut map);
    }

    if let Some(target) = args.fly_to {
        state.request_transition(target.center, target.zoom);
    }
    if let Some(size) = args.resize {
        resize.on_resize(Time::ZERO, size);
    }

    let mut frame = Frame::new(0, args.dt);
    for _ in 0..args.frames {
        map.advance(frame.dt_s);
        resize.poll(frame.time, &mut state, &mut map);
        let events = map.drain_events();
        controller.dispatch(&mut state, &mut map, events);
        frame = frame.next();
    }
    if map.is_flying() || resize.is_pending() {
        warn!(frames = args.frames, "session ended before the map settled");
    }

    let summary = Summary {
        center: state.center(),
        zoom: state.zoom(),
        bounds: state.bounds_as_corners(),
        window: state.window_size(),
        selected: state.selected_site(),
        popup: state.popup_candidate(),
        flights_commanded: controller.flights_commanded(),
        still_flying: map.is_flying(),
    };
    let out = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    println!("{out}");
    Ok(())
}

fn parse_fly_to(s: &str) -> Result<FlyTarget, String> {
    let parts = parse_numbers(s, ',')?;
    match parts.as_slice() {
        [lng, lat, zoom] => Ok(FlyTarget {
            center: LngLat::new(*lng, *lat),
            zoom: *zoom,
        }),
        _ => Err(format!("expected LNG,LAT,ZOOM, got {s:?}")),
    }
}

fn parse_size(s: &str) -> Result<Size, String> {
    let parts = parse_numbers(s, 'x')?;
    match parts.as_slice() {
        [w, h] if *w > 0.0 && *h > 0.0 => Ok(Size::new(*w, *h)),
        _ => Err(format!("expected WIDTHxHEIGHT with positive sides, got {s:?}")),
    }
}

fn parse_numbers(s: &str, sep: char) -> Result<Vec<f64>, String> {
    s.split(sep)
        .map(|p| {
            let v: f64 = p
                .trim()
                .parse()
                .map_err(|_| format!("invalid number {p:?} in {s:?}"))?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err(format!("non-finite number in {s:?}"))
            }
        })
        .collect()
}
