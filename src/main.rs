//! Gridwalk entry point
//!
//! Builds a maze, prints it, then walks the actor along the solution code
//! with a fixed-step clock.
//!
//! Usage: `gridwalk [SIZE | easy | medium | hard | CONFIG.json] [SEED]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gridwalk (native) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_config(args: &[String]) -> gridwalk::MazeConfig {
    use gridwalk::{Difficulty, MazeConfig};

    let mut config = match args.first() {
        Some(arg) if arg.ends_with(".json") => MazeConfig::load_or_default(arg),
        Some(arg) => {
            if let Ok(size) = arg.parse::<usize>() {
                MazeConfig {
                    grid_size: size,
                    ..MazeConfig::default()
                }
            } else if let Some(difficulty) = Difficulty::from_str(arg) {
                MazeConfig::from_difficulty(difficulty)
            } else {
                log::warn!("Unrecognized argument '{}', using defaults", arg);
                MazeConfig::default()
            }
        }
        None => MazeConfig::default(),
    };

    if let Some(seed) = args.get(1).and_then(|s| s.parse::<u64>().ok()) {
        config.seed = Some(seed);
    }
    config
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use gridwalk::consts::TICK_DT;
    use gridwalk::renderer::{Renderer, TextRenderer};
    use gridwalk::sim::{ActorState, Grid, Maze, StepClock, Walls};

    /// Lets the demo keep reading frames after handing the renderer to the maze
    struct SharedText(Rc<RefCell<TextRenderer>>);

    impl Renderer for SharedText {
        fn grid_built(&mut self, grid: &Grid, walls: &Walls, cell_size: f32) {
            self.0.borrow_mut().grid_built(grid, walls, cell_size);
        }

        fn actor_moved(&mut self, actor: &ActorState) {
            self.0.borrow_mut().actor_moved(actor);
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_config(&args);

    let text = Rc::new(RefCell::new(TextRenderer::new()));
    let solved = Rc::new(Cell::new(false));
    let flag = Rc::clone(&solved);
    let mut maze = Maze::new(&config)?
        .with_renderer(Box::new(SharedText(Rc::clone(&text))))
        .on_success(move || flag.set(true));

    let seed = maze
        .seed()
        .map_or_else(|| "none".to_string(), |seed| seed.to_string());
    println!(
        "{}x{} maze, seed {}, cell {:.1}px, actor {:.1}px",
        maze.grid().size(),
        maze.grid().size(),
        seed,
        maze.cell_size(),
        config.actor_size()
    );
    print!("{}", text.borrow().frame());
    println!("Solution: {}", maze.code());

    // Feed the clock a steady 60 fps until each move settles
    let mut clock = StepClock::default();
    let moves: Vec<_> = maze.code().expand().collect();
    for dir in moves {
        log::debug!("Move {} from {:?}", dir.as_str(), maze.actor().cell);
        let handle = maze.request_direction(dir)?;
        while !handle.is_settled() {
            for _ in 0..clock.update(TICK_DT) {
                maze.tick();
            }
        }
        if let Some(Err(e)) = handle.status() {
            return Err(e.into());
        }
    }

    print!("{}", text.borrow().frame());
    let stats = maze.stats();
    println!(
        "Moves: {} completed, {} blocked; {} ticks; solved: {}",
        stats.completed,
        stats.blocked,
        clock.ticks,
        solved.get()
    );
    Ok(())
}
