use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use outbreak_map::app::App;
use outbreak_map::cli::Cli;
use outbreak_map::data::{self, Dataset};
use outbreak_map::engine::{Engine, RenderParams, Selection};
use outbreak_map::map::MapRenderer;
use outbreak_map::{logging, ui};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref(), !cli.print)?;

    let dataset = Arc::new(load_dataset(&cli)?);
    let engine = Engine::new(dataset);
    let selection = cli.selection(engine.dataset().total_days());

    if cli.print {
        print_selection(&engine.render(&selection));
        return Ok(());
    }

    let mut coastlines = data::load_coastlines(&cli.basemap);
    if coastlines.is_empty() {
        coastlines = data::generate_simple_world();
    }
    let renderer = MapRenderer::new(coastlines);

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, engine, selection, renderer);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// The CSV export when present, the built-in demo otherwise
fn load_dataset(cli: &Cli) -> Result<Dataset> {
    if cli.data.exists() {
        data::load_csv(&cli.data).with_context(|| format!("loading {}", cli.data.display()))
    } else {
        tracing::warn!("{} not found, using the demo dataset", cli.data.display());
        Ok(data::demo_dataset()?)
    }
}

fn print_selection(params: &RenderParams) {
    let labels = &params.labels;
    println!("{}", labels.date);
    println!("{}  [{}]", labels.cases.text, labels.cases.badge);
    println!("{}", labels.per_capita);
    println!("{}  [{}]", labels.deaths.text, labels.deaths.badge);
    println!("{}", labels.death_rate);
    println!();
    for marker in &params.markers {
        println!(
            "{}  (size {:.1}, opacity {:.2})",
            params.hover_lines(marker).join(" | "),
            marker.area,
            marker.opacity
        );
    }
}

/// Handle mouse events for hovering, panning and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_at(mouse.column, mouse.row, true),
        MouseEventKind::ScrollDown => app.zoom_at(mouse.column, mouse.row, false),
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(),
        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    engine: Engine,
    selection: Selection,
    renderer: MapRenderer,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(engine, selection, renderer, size.width as usize, size.height as usize);

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    // Selection
                    KeyCode::Char('m') | KeyCode::Char('M') => app.cycle_metric(),
                    KeyCode::Char('c') | KeyCode::Char('C') => app.toggle_rate(),
                    KeyCode::Char('p') | KeyCode::Char('P') => app.toggle_population_filter(),
                    KeyCode::Right | KeyCode::Char('.') => app.step_day(1),
                    KeyCode::Left | KeyCode::Char(',') => app.step_day(-1),
                    KeyCode::PageUp => app.step_day(-7),
                    KeyCode::PageDown => app.step_day(7),
                    KeyCode::Home => app.first_day(),
                    KeyCode::End => app.last_day(),

                    // Pan with hjkl
                    KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Char('k') | KeyCode::Up => app.pan(0, -6),
                    KeyCode::Char('j') | KeyCode::Down => app.pan(0, 6),

                    // Zoom
                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
