use std::path::Path;
use std::rc::Rc;

use glam::Vec2;
use magnidock::host::sim::{SimDock, SimPointer};
use magnidock::host::{DockHost, PointerDevice};
use magnidock::input::InteractionKind;
use magnidock::options::DockEdge;
use magnidock::scheduler::Scheduler;
use magnidock::{EngineInstance, Options};
use web_time::{Duration, Instant};

/// Icons in the simulated dock.
const ICON_COUNT: usize = 5;
/// Ticks the pointer spends on each sweep position.
const DWELL_TICKS: u32 = 8;

/// Virtual clock driving the scheduler without sleeping.
struct Clock {
    start: Instant,
    elapsed: Duration,
}

impl Clock {
    fn advance(&mut self, by: Duration) -> Instant {
        self.elapsed += by;
        self.start + self.elapsed
    }
}

fn run_ticks(
    clock: &mut Clock,
    scheduler: &Scheduler,
    dock: &SimDock,
    engine: &EngineInstance,
    ticks: u32,
) {
    for _ in 0..ticks {
        let now = clock.advance(engine.tick_interval());
        scheduler.run_pending(now);
        dock.relayout();
    }
    match engine.last_report().map(|r| serde_json::to_string(&r)) {
        Some(Ok(json)) => log::info!("{json}"),
        Some(Err(e)) => log::error!("failed to serialize tick report: {e}"),
        None => log::info!("no tick has run yet"),
    }
}

fn main() {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    let start = Instant::now();
    let mut clock = Clock {
        start,
        elapsed: Duration::ZERO,
    };
    let scheduler = Scheduler::new("magnidock-sim", start);
    let dock = SimDock::with_icons(
        DockEdge::Bottom,
        Vec2::new(400.0, 1000.0),
        options.dock.base_icon_size,
        ICON_COUNT,
    );
    let pointer = SimPointer::new(Vec2::new(0.0, 0.0));
    let mut engine = EngineInstance::attach(
        Rc::clone(&dock) as Rc<dyn DockHost>,
        Rc::clone(&pointer) as Rc<dyn PointerDevice>,
        options,
        &scheduler,
    );

    // Sweep across every icon center, left to right
    engine.on_interaction(InteractionKind::Enter);
    for index in 0..ICON_COUNT {
        let Some(icon) = dock.icon(index) else {
            continue;
        };
        pointer.set(icon.center());
        engine.on_interaction(InteractionKind::Motion);
        log::info!("pointer over {}", icon.id());
        run_ticks(&mut clock, &scheduler, &dock, &engine, DWELL_TICKS);
    }

    pointer.set(Vec2::new(0.0, 0.0));
    engine.on_interaction(InteractionKind::Leave);
    log::info!("pointer left the dock");
    run_ticks(&mut clock, &scheduler, &dock, &engine, DWELL_TICKS * 4);

    log::info!(
        "throttle after settling: {:?}",
        engine.throttle_state()
    );
    engine.detach();
    scheduler.shutdown();
}
