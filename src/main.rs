use splash_field::sequencer::SequencerEvent;
use splash_field::surface::{RecordingHost, RecordingSurface, SurfaceSize};
use splash_field::{SplashConfig, SplashScreen};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let seconds = parse_arg(&args, "--seconds").unwrap_or(10.0);
    let fps = parse_arg(&args, "--fps").unwrap_or(60.0).max(1.0);
    let width = parse_arg(&args, "--width").unwrap_or(1280.0);
    let height = parse_arg(&args, "--height").unwrap_or(720.0);

    let viewport = SurfaceSize::clamped(width, height);
    let surface = RecordingSurface::new(viewport);
    let mut splash = match SplashScreen::mount(
        SplashConfig::default(),
        Some(surface),
        viewport,
        RecordingHost::default(),
        0.0,
    ) {
        Ok(splash) => splash,
        Err(err) => {
            eprintln!("failed to mount splash: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "Splash smoke run: {:.1}s @ {:.1}fps on {}x{} ({} stages, {:.2}s timeline)",
        seconds,
        fps,
        viewport.width(),
        viewport.height(),
        splash.timeline().len(),
        splash.timeline().total_duration()
    );

    let frame_dt = 1.0 / fps;
    let mut t = 0.0f32;
    let mut was_locked = splash.is_locked();
    while t < seconds {
        for event in splash.frame(t).unwrap_or_default() {
            match event {
                SequencerEvent::StageStarted { index, id } => {
                    println!("t={t:.2}s stage {index} started: {id:?}");
                }
                SequencerEvent::Completed => println!("t={t:.2}s complete"),
                SequencerEvent::WarmUpStarted => {}
            }
        }
        if was_locked && !splash.is_locked() {
            println!("t={t:.2}s page unlocked");
        }
        was_locked = splash.is_locked();
        t += frame_dt;
    }

    splash.dispose();
    let lines = splash.field().map_or(0, |f| f.last_draw_list().lines.len());

    println!(
        "Done. state={:?} frames={} last_frame_connections={} content_revealed={}",
        splash.state(),
        splash.field().map_or(0, |f| f.frames()),
        lines,
        splash.content_revealed()
    );
}

fn parse_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter()
        .position(|v| v == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse::<f32>().ok())
}
